use std::process::ExitCode;

use clap::Parser;
use console::style;

mod cli;
mod error;
mod panic_hook;

#[tokio::main]
async fn main() -> ExitCode {
    panic_hook::set();
    dotenv::dotenv().ok();

    let cli = cli::Cli::parse();
    epochval_utils::log::init(cli.verbose);

    match cli.handle().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", style("error:").red());
            ExitCode::FAILURE
        }
    }
}
