//! Dealfeed command line

use std::process;

use dealfeed_app::logging;
use tracing::error;

use crate::cli::Cli;

mod cli;

#[tokio::main]
pub async fn main() {
    let cli = Cli::load();

    if let Err(error) = logging::init_subscriber(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging setup error: {error}");
        }

        process::exit(1);
    }

    if let Err(message) = cli.run().await {
        error!(%message, "command failed");

        #[expect(
            clippy::print_stderr,
            reason = "command errors are reported to the user on stderr"
        )]
        {
            eprintln!("{message}");
        }

        process::exit(1);
    }
}
