use clap::Parser;
use sip_planner::api::{Cli, Command, render_report, run_http_server};

#[tokio::main]
async fn main() {
    sip_planner::logging::init_logging("info");

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = run_http_server(port).await {
                tracing::error!(error = %e, "server error");
                std::process::exit(1);
            }
        }
        Command::Report(args) => match render_report(args) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
    }
}
