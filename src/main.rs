mod cli;
mod display;
mod export;
mod form;
mod parser;
mod schedule;
mod session;
mod web;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run().await
}
