//! Layer Arrange CLI
//!
//! Usage:
//!   layer-arrange [OPTIONS] <SCENE> <COMMAND>
//!
//! Commands:
//!   align <MODE>         Align the selection (left, right, top, bottom, h_center, v_center)
//!   distribute <MODE>    Distribute the selection along an axis
//!   edge-to-edge <SIDE>  Pack the selection without gaps
//!
//! Options:
//!   -s, --settings <FILE>  Settings file holding the default anchor (TOML format);
//!                          `align --anchor <ANCHOR> --save-anchor` updates it
//!   -o, --output <FILE>    Write the updated scene here instead of stdout
//!   -v, --verbose          More logging (repeat for trace output)

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use layer_arrange::{
    align, distribute, AlignMode, AnchorMode, ArrangeConfig, DistributeMode, Document, Settings,
};

#[derive(Parser)]
#[command(name = "layer-arrange")]
#[command(about = "Align and distribute the selected layers of a scene")]
struct Cli {
    /// Scene file (TOML format)
    scene: PathBuf,

    /// Settings file holding the default anchor (TOML format)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Write the updated scene here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Align the selection to an anchor
    Align {
        /// left, right, top, bottom, h_center or v_center
        mode: AlignMode,

        /// Anchor to align to; defaults to the settings file, then "selected"
        #[arg(short, long)]
        anchor: Option<AnchorMode>,

        /// Store the anchor in the settings file for later runs
        #[arg(long, requires = "anchor")]
        save_anchor: bool,
    },

    /// Distribute the selection along an axis
    Distribute {
        /// left, h_center, right, top, v_center, bottom, horizontal or vertical
        mode: DistributeMode,

        /// Literal gap between nodes (horizontal and vertical modes)
        #[arg(long, allow_negative_numbers = true)]
        spacing: Option<i32>,

        /// Keep the last node in place instead of the first
        #[arg(short, long)]
        reverse: bool,
    },

    /// Pack the selection edge to edge towards one side
    EdgeToEdge {
        #[arg(value_enum)]
        side: Side,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // A settings file that does not exist yet means defaults
    let settings = match &cli.settings {
        Some(path) if path.exists() => match Settings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        _ => Settings::default(),
    };

    let mut doc = match Document::from_file(&cli.scene) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error loading scene '{}': {}", cli.scene.display(), e);
            std::process::exit(1);
        }
    };

    let config = settings.to_config();
    let result = match cli.command {
        Command::Align {
            mode,
            anchor,
            save_anchor,
        } => {
            let config = match anchor {
                Some(anchor) => config.with_anchor(anchor),
                None => config,
            };
            let result = align(&mut doc, mode, &config);
            if save_anchor && result.is_ok() {
                store_anchor(cli.settings.as_deref(), config.anchor);
            }
            result
        }
        Command::Distribute {
            mode,
            spacing,
            reverse,
        } => {
            let config = ArrangeConfig {
                spacing,
                reverse,
                ..config
            };
            distribute(&mut doc, mode, &config)
        }
        Command::EdgeToEdge { side } => {
            let (mode, reverse) = match side {
                Side::Left => (DistributeMode::Horizontal, false),
                Side::Right => (DistributeMode::Horizontal, true),
                Side::Top => (DistributeMode::Vertical, false),
                Side::Bottom => (DistributeMode::Vertical, true),
            };
            let config = config.with_spacing(0).with_reverse(reverse);
            distribute(&mut doc, mode, &config)
        }
    };

    match result {
        Ok(outcome) => eprintln!("{}", outcome),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    let text = match doc.to_toml_string() {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, text) {
                eprintln!("Error writing file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => print!("{}", text),
    }
}

/// Write `anchor` back to the settings file
fn store_anchor(path: Option<&Path>, anchor: AnchorMode) {
    let Some(path) = path else {
        eprintln!("Error: --save-anchor needs a settings file (--settings)");
        std::process::exit(1);
    };
    if let Err(e) = (Settings { anchor }).save(path) {
        eprintln!("Error writing settings '{}': {}", path.display(), e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over the verbosity flag
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("layer_arrange={}", level.as_str().to_lowercase())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
