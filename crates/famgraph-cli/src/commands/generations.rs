//! Generations command
//!
//! Usage: famgraph generations <FILE> [--root <ID>] [--json]

use clap::Args;
use famgraph_core::traversal::generation::compute_generations;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GenerationsArgs {
    /// Export document to read
    pub file: PathBuf,

    /// Root person (default: every person without recorded parents)
    #[arg(short, long)]
    pub root: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Execute generations command
pub fn execute(args: GenerationsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let doc = super::load_document(&args.file)?;
    let snapshot = doc.to_snapshot();

    let generations = compute_generations(&snapshot, args.root.as_deref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&generations)?);
        return Ok(());
    }

    let mut rows: Vec<(&String, &i32)> = generations.iter().collect();
    rows.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
    for (id, generation) in rows {
        println!("{}\t{}", generation, id);
    }

    Ok(())
}
