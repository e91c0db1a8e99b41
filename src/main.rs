use anyhow::Result;
use billtime::cli::Cli;

fn main() -> Result<()> {
    // With no subcommand the CLI opens the interactive timer
    let cli = Cli::parse();
    cli.run()
}
