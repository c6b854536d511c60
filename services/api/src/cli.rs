use crate::demo::{run_demo, run_report, DemoArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scorecard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "KPI Scorecard Service",
    about = "Serve and inspect evaluated KPI series for consulting engagements",
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
    /// Work with KPI scorecards from the command line
    Kpi {
        #[command(subcommand)]
        command: KpiCommand,
    },
    /// Seed synthetic engagement data and print its scorecard
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum KpiCommand {
    /// Evaluate a scorecard from catalog and measurement CSV exports
    Report(ReportArgs),
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
        Command::Kpi {
            command: KpiCommand::Report(args),
        } => run_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
