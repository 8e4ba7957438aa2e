//! Action-routed node graph: the minimal execution engine under the agent.
//!
//! A [`Node`] is one unit of work returning an ([`Action`], value) pair; a
//! [`Flow`] routes between nodes through an action→node edge table until an
//! action has no edge, at which point the last value is returned. The run
//! loop is iterative, never recursive, so an indefinitely looping plan
//! cannot overflow the call stack. [`BatchFlow`] fans a flow out over many
//! parameter bundles under one shared concurrency gate, and [`Retry`] wraps
//! any node with bounded backoff.

mod action;
mod node;
mod retry;
mod run;

pub use action::Action;
pub use node::{Node, Outcome};
pub use retry::Retry;
pub use run::{BatchFlow, Flow};
