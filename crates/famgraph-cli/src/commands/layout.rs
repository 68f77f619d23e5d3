//! Layout command
//!
//! Usage: famgraph layout <FILE> [--root <ID>] [--direction vertical|horizontal]
//!        [--focus <ID> --depth <N>] [--config <FILE>] [--output <FILE>]

use clap::Args;
use famgraph_core::layout::{
    filter_by_depth, layout_tree, LayoutConfig, LayoutDirection, LayoutStats, TreeLayout,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct LayoutArgs {
    /// Export document to read
    pub file: PathBuf,

    /// Root person for generation numbers
    #[arg(short, long)]
    pub root: Option<String>,

    /// vertical (TB) or horizontal (LR)
    #[arg(short, long, default_value = "vertical")]
    pub direction: LayoutDirection,

    /// Person at the centre of a depth-bounded view
    #[arg(long, requires = "depth")]
    pub focus: Option<String>,

    /// Number of generations in the depth-bounded view
    #[arg(long, requires = "focus")]
    pub depth: Option<u32>,

    /// TOML file with a [layout] table
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// On-disk configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub layout: LayoutConfig,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        Ok(toml::from_str(&text)?)
    }
}

#[derive(Debug, Serialize)]
struct LayoutOutput<'a> {
    #[serde(flatten)]
    layout: &'a TreeLayout,
    stats: LayoutStats,
}

/// Execute layout command
pub fn execute(args: LayoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let doc = super::load_document(&args.file)?;
    let snapshot = doc.to_snapshot();

    let mut layout = layout_tree(
        &snapshot,
        args.root.as_deref(),
        args.direction,
        &config.layout,
    );
    if let (Some(focus), Some(depth)) = (&args.focus, args.depth) {
        layout = filter_by_depth(&layout, focus, depth);
    }

    let output = LayoutOutput {
        stats: layout.stats(),
        layout: &layout,
    };
    let json = serde_json::to_string_pretty(&output)?;

    super::emit(args.output.as_ref(), &json)
}
