//! CLI argument definitions and parsing.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Resolve speaking styles into engine-ready prosody parameters.
#[derive(Parser, Debug)]
#[command(name = "prosody-rs")]
#[command(about = "Resolve speaking styles into TTS prosody parameters and SSML")]
#[command(version)]
pub struct Args {
    /// Style to resolve (defaults to the catalog's default style)
    #[arg(short, long)]
    pub style: Option<String>,

    /// Intensity from 1 (subtle) to 5 (strongest)
    #[arg(short, long, allow_negative_numbers = true)]
    pub intensity: Option<i64>,

    /// Voice id used to look up calibration and tag SSML output
    #[arg(long)]
    pub voice: Option<String>,

    /// Text to wrap in SSML
    #[arg(short, long, conflicts_with = "script")]
    pub text: Option<String>,

    /// Annotated script file with [pause=SECONDS] markers
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Language tag for SSML output
    #[arg(long, default_value = "en-US")]
    pub lang: String,

    /// Directory holding styles.yaml and calibration.yaml
    #[arg(short, long)]
    pub config_dir: Option<PathBuf>,

    /// List all available styles
    #[arg(long)]
    pub list_styles: bool,

    /// Show the definition of a style
    #[arg(long)]
    pub style_info: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Whether SSML should be produced.
    pub fn wants_markup(&self) -> bool {
        self.text.is_some() || self.script.is_some()
    }
}

/// How results are printed.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `name: value` line per parameter
    #[default]
    Text,

    /// A JSON object
    Json,

    /// The SSML document only (needs --text or --script)
    Ssml,
}

impl OutputFormat {
    /// Returns the CLI argument string for this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Ssml => "ssml",
        }
    }
}
