//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand, ValueHint};

use crate::domain::Point;

/// Treemap of a directory tree or of world population by region
#[derive(Parser, Debug)]
#[command(name = "treemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding `.treemap.toml` (default: cwd)
    #[arg(
        short = 'C',
        long,
        global = true,
        env = "TREEMAP_CONFIG_DIR",
        value_hint = ValueHint::DirPath
    )]
    pub config_dir: Option<PathBuf>,

    /// Canvas width, overrides `canvas.width`
    #[arg(long, global = true)]
    pub width: Option<i64>,

    /// Canvas height, overrides `canvas.height`
    #[arg(long, global = true)]
    pub height: Option<i64>,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the tree comes from. Without any of these the working directory is scanned.
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Scan a file or directory
    #[arg(long = "fs", global = true, value_hint = ValueHint::AnyPath)]
    pub fs: Option<PathBuf>,

    /// World Bank population document
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub population: Option<PathBuf>,

    /// World Bank country/region document
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub regions: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print one line per tile: x y width height color label
    Layout,

    /// Show the hierarchy as a tree
    Tree,

    /// Print the path of the leaf under a point
    Inspect {
        /// Point as X,Y
        #[arg(long, value_parser = parse_point)]
        at: Point,
    },

    /// Delete the leaf under a point
    Delete {
        /// Point as X,Y
        #[arg(long, value_parser = parse_point)]
        at: Point,
    },

    /// Grow or shrink the leaf under a point by one percent per step
    #[command(group(ArgGroup::new("direction").required(true).args(["grow", "shrink"])))]
    Resize {
        /// Point as X,Y
        #[arg(long, value_parser = parse_point)]
        at: Point,
        /// Grow the leaf
        #[arg(long)]
        grow: bool,
        /// Shrink the leaf
        #[arg(long)]
        shrink: bool,
        /// Number of steps
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },

    /// Apply a script of session events
    Replay {
        /// Script file: `select X Y`, `delete X Y`, `grow`, `shrink`
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}

/// Parse `X,Y` into a point.
pub fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {}", s))?;
    let x = x.trim().parse().map_err(|_| format!("bad x coordinate: {}", x))?;
    let y = y.trim().parse().map_err(|_| format!("bad y coordinate: {}", y))?;
    Ok(Point::new(x, y))
}
