//! Tagmark CLI
//!
//! Usage:
//!   tagmark [OPTIONS] [FILE]
//!
//! Options:
//!   -t, --tags <FILE>      Tag set file (TOML format), layered over the built-in tags
//!       --target <TARGET>  Output format: html or text
//!       --static           Render through the generated command tree
//!       --strict           Raise unknown commands and out-of-range blocks as errors
//!       --strict-fences    Reject blocks left open at end of input
//!   -v, --verbose          Increase log output (repeatable)
//!   -h, --help             Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;

use tagmark::{render_with_config, Mode, ParserConfig, Policy, RenderConfig, RenderError, TagSet, Target};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetArg {
    Html,
    Text,
}

impl From<TargetArg> for Target {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Html => Target::Html,
            TargetArg::Text => Target::Text,
        }
    }
}

#[derive(Parser)]
#[command(name = "tagmark")]
#[command(about = "Compile tagmark markup to HTML or plain text")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Tag set file (TOML format), layered over the built-in tags
    #[arg(short, long)]
    tags: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "html")]
    target: TargetArg,

    /// Render through the generated command tree instead of resolver sequences
    #[arg(long = "static")]
    static_mode: bool,

    /// Raise unknown commands and out-of-range blocks as errors
    #[arg(long)]
    strict: bool,

    /// Reject blocks left open at end of input
    #[arg(long)]
    strict_fences: bool,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    // Load tag set
    let tags = match &cli.tags {
        Some(path) => match TagSet::from_file(path) {
            Ok(custom) => TagSet::default().merge(custom),
            Err(e) => {
                eprintln!("Error loading tag set '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => TagSet::default(),
    };

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let config = RenderConfig::new()
        .with_tags(tags)
        .with_target(cli.target.into())
        .with_mode(if cli.static_mode { Mode::Static } else { Mode::Dynamic })
        .with_policy(if cli.strict { Policy::Strict } else { Policy::Lenient })
        .with_parser(ParserConfig::new().with_strict_fences(cli.strict_fences));
    log::debug!("rendering {} with {:?}", filename, config);

    match render_with_config(&source, &config) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(RenderError::Parse(errors)) => {
            for error in &errors {
                eprint!("{}", error.format(&source, &filename));
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
