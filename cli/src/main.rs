//! mull binary: run the reasoning agent on one natural-language task.
//!
//! Configuration comes from the environment (after `config` applies `.env`
//! and the XDG config file): `OPENAI_API_KEY` is required, `OPENAI_BASE_URL`
//! and `OPENAI_MODEL` optional. Progress narration goes to stdout; tracing
//! goes to `LOG_FILE` or nowhere.

mod logging;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use mull::{
    AgentOptions, Augmenter, LlmClient, OpenAiChat, Orchestrator, PageScraper, QwantSearch,
};

#[derive(Parser, Debug)]
#[command(name = "mull")]
#[command(about = "mull — iterative reasoning agent over one task")]
struct Args {
    /// The task or question to reason about
    task: String,

    /// Let the model branch into explore/critique/revise/spawn
    #[arg(long)]
    branch: bool,

    /// Resolve the plan's search queries through web search and scraping
    #[arg(long)]
    augment: bool,

    /// URLs fetched per search query
    #[arg(long, value_name = "N", default_value_t = 5)]
    max_urls: usize,

    /// Revisions allowed before critique is forced to pass (0 = unlimited)
    #[arg(long, value_name = "N", default_value_t = 3)]
    max_revisions: u32,

    /// Model name (overrides OPENAI_MODEL)
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// API base URL (overrides OPENAI_BASE_URL)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Print only the final answer
    #[arg(short, long)]
    quiet: bool,
}

fn build_llm(args: &Args) -> Result<OpenAiChat, String> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| "OPENAI_API_KEY is not set (env, .env, or XDG config)".to_string())?;
    let mut llm = OpenAiChat::new(api_key);
    if let Some(base_url) = args
        .base_url
        .clone()
        .or_else(|| std::env::var("OPENAI_BASE_URL").ok())
    {
        llm = llm.with_base_url(base_url);
    }
    if let Some(model) = args
        .model
        .clone()
        .or_else(|| std::env::var("OPENAI_MODEL").ok())
    {
        llm = llm.with_model(model);
    }
    Ok(llm)
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = config::load_and_apply("mull", None) {
        eprintln!("config error: {err}");
        return ExitCode::FAILURE;
    }
    if let Err(err) = logging::init() {
        eprintln!("logging error: {err}");
        return ExitCode::FAILURE;
    }

    let args = Args::parse();

    let llm = match build_llm(&args) {
        Ok(llm) => Arc::new(llm) as Arc<dyn LlmClient>,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let augmenter = args.augment.then(|| {
        Arc::new(
            Augmenter::new(
                Arc::new(QwantSearch::new()),
                Arc::new(PageScraper::new()),
            )
            .with_max_urls_per_query(args.max_urls),
        )
    });

    let options = AgentOptions {
        branching: args.branch,
        max_revisions: (args.max_revisions > 0).then_some(args.max_revisions),
        narrate: !args.quiet,
        ..AgentOptions::default()
    };

    let orchestrator = Orchestrator::new(llm, augmenter, options);
    match orchestrator.run(&args.task).await {
        Ok(outcome) => {
            match outcome.solution {
                Some(solution) => {
                    if args.quiet {
                        println!("{solution}");
                    }
                    ExitCode::SUCCESS
                }
                None => {
                    eprintln!("run finished without an answer");
                    ExitCode::FAILURE
                }
            }
        }
        Err(err) => {
            eprintln!("run failed: {err}");
            ExitCode::FAILURE
        }
    }
}
