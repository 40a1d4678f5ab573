//! Wayfinder CLI binary: ask the travel-planning assistant one question and
//! stream the answer to stdout.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;
use wayfinder::TravelAgent;

#[derive(Parser, Debug)]
#[command(name = "wayfinder")]
#[command(about = "Wayfinder — multi-agent travel planning from the command line")]
struct Args {
    /// Travel question, e.g. "Plan a trip from Beijing to Hangzhou next Friday"
    query: String,

    /// Verbose: log agent routing and tool calls
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<(), wayfinder::AgentError> {
    let agent = TravelAgent::from_env()?;
    let mut stream = agent.process_query(&args.query).await?;

    let mut stdout = std::io::stdout();
    while let Some(item) = stream.next().await {
        let fragment = item?;
        print!("{fragment}");
        let _ = stdout.flush();
    }
    println!();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
