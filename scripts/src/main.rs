use std::process::ExitCode;

use clap::Parser;
use community_scripts::{
    cli::{is_informational, Cli},
    secrets::EnvSecrets,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Secrets may be provided through a `.env` file in the working directory
    dotenv::dotenv().ok();

    // Usage errors exit like every other failure, not with clap's own code
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if is_informational(&e) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };

    tracing_subscriber::fmt()
        .pretty()
        .with_writer(std::io::stderr)
        .init();

    match cli.run(&EnvSecrets).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error ({}): {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}
