use crate::demo::{run_demo, run_profile, run_score, DemoArgs, ProfileArgs, ScoreArgs};
use crate::export::{run_export, ExportArgs};
use crate::server;
use apex_score::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ApexScore",
    about = "Generate synthetic loan applicants and score them from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Generate the deterministic profile for one identifier
    Profile(ProfileArgs),
    /// Score a set of behavioral indicators without touching the store
    Score(ScoreArgs),
    /// Write generated applicants to CSV
    Export(ExportArgs),
    /// Walk through the demo portfolio: profiles, actions, stats
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Profile(args) => run_profile(args),
        Command::Score(args) => run_score(args),
        Command::Export(args) => run_export(args),
        Command::Demo(args) => run_demo(args),
    }
}
