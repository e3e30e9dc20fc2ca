mod cli;
mod run;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::List(args)) => run::list(args.presets.as_deref()),
        None => run::run(cli.run),
    }
}
