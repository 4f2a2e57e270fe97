mod cli;
mod client;
mod error;
mod feed;
mod server;
mod util;

#[cfg(test)]
mod test_utils;

use clap::Parser;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let cli = cli::Cli::parse();
  cli.run().await
}
