//! Retry wrapper: bounded re-invocation with multiplicative backoff.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::error::AgentError;

use super::{Node, Outcome};

/// Wraps a node so that failures are retried up to `tries` total attempts.
///
/// After each failed attempt (except the last) the wrapper sleeps the
/// current delay, then multiplies it by 1.5 — scaled by a random factor in
/// [0.5, 1.0] when jitter is enabled. The final attempt's error propagates
/// unmodified.
pub struct Retry<C, P> {
    inner: Arc<dyn Node<C, P>>,
    tries: u32,
    backoff: Duration,
    jitter: bool,
}

impl<C, P> Retry<C, P>
where
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    /// Wraps `inner`; `tries` is clamped to at least one attempt.
    pub fn new(inner: Arc<dyn Node<C, P>>, tries: u32, backoff: Duration, jitter: bool) -> Self {
        Retry {
            inner,
            tries: tries.max(1),
            backoff,
            jitter,
        }
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        let factor = if self.jitter {
            1.5 * rand::thread_rng().gen_range(0.5..=1.0)
        } else {
            1.5
        };
        delay.mul_f64(factor)
    }
}

#[async_trait]
impl<C, P> Node<C, P> for Retry<C, P>
where
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    async fn invoke(&self, ctx: &mut C, params: &P) -> Result<Outcome, AgentError> {
        let mut delay = self.backoff;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.inner.invoke(ctx, params).await {
                Ok(outcome) => return Ok(outcome),
                Err(err) => {
                    if attempt >= self.tries {
                        return Err(err);
                    }
                    tracing::warn!(attempt, error = %err, "node failed, backing off");
                    tokio::time::sleep(delay).await;
                    delay = self.next_delay(delay);
                }
            }
        }
    }
}
