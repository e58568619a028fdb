mod search_cmd;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use tracing_subscriber::EnvFilter;

use crate::search_cmd::InteractiveCommand;
use crate::search_cmd::QueryCommand;
use crate::search_cmd::SourceArgs;

/// Filter a catalog navigation the way its search box does.
#[derive(Debug, Parser)]
#[command(name = "catalog-nav", version)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply one query and print the resulting navigation.
    Query(QueryCommand),

    /// Treat every stdin line as an input event while the index loads.
    Interactive(InteractiveCommand),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("catalog_nav=info")),
        )
        .init();

    match cli.command {
        Command::Query(cmd) => search_cmd::run_query(cli.source, cmd).await,
        Command::Interactive(cmd) => search_cmd::run_interactive(cli.source, cmd).await,
    }
}
