mod cmd;

use anyhow::Result;
use clap::Parser;

/// evoshare: Shamir secret sharing of short texts over Mersenne prime fields.
///
/// `split` hands out N shares at once; `evolve` welcomes participants one at a time
/// without fixing N in advance. Any K shares recover the text; fewer reveal nothing.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: cmd::Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cmd::run(cli.command)
}
