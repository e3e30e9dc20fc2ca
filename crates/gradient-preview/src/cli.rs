use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "gradient-preview",
    author,
    version,
    about = "Drive an animated gradient headlessly and print per-frame uniforms",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Preset TOML file; the bundled presets are used when omitted.
    #[arg(value_name = "PRESETS")]
    pub presets: Option<PathBuf>,

    /// Gradient shown before the first sequence step (defaults to `defaults.gradient`).
    #[arg(long, value_name = "NAME")]
    pub gradient: Option<String>,

    /// Nominal refresh rate of the simulated display.
    #[arg(long, value_name = "FPS", default_value_t = 60.0)]
    pub fps: f64,

    /// Number of frames to simulate (defaults to the sequence length plus one second).
    #[arg(long, value_name = "COUNT")]
    pub frames: Option<u64>,

    /// Vary the frame interval around the nominal rate to mimic a busy host.
    #[arg(long)]
    pub jitter: bool,

    /// Output format: `summary` (one readable line per frame) or `jsonl`.
    #[arg(
        long,
        value_name = "FORMAT",
        value_parser = parse_output_format,
        default_value = "summary"
    )]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    JsonLines,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the gradients and sequence steps defined in a preset file.
    List(ListArgs),
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    #[arg(value_name = "PRESETS")]
    pub presets: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_output_format(value: &str) -> Result<OutputFormat, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("output format must not be empty".to_string());
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "summary" | "text" => Ok(OutputFormat::Summary),
        "jsonl" | "json" | "ndjson" => Ok(OutputFormat::JsonLines),
        other => Err(format!(
            "unknown output format '{other}'; expected summary or jsonl"
        )),
    }
}
