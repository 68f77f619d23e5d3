//! Check command
//!
//! Usage: famgraph check <FILE>

use clap::Args;
use famgraph_core::rules::invariants::{find_dangling_relationships, find_parent_cycles};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Export document to read
    pub file: PathBuf,
}

/// Execute check command
pub fn execute(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let doc = super::load_document(&args.file)?;
    let snapshot = doc.to_snapshot();

    let dangling = find_dangling_relationships(&snapshot);
    let cycles = find_parent_cycles(&snapshot);

    for (relationship_id, person_id) in &dangling {
        println!(
            "dangling: relationship {} references missing person {}",
            relationship_id, person_id
        );
    }
    for person_id in &cycles {
        println!("cycle: {} is their own ancestor", person_id);
    }

    let problems = dangling.len() + cycles.len();
    if problems > 0 {
        return Err(format!("{} problem(s) found", problems).into());
    }

    println!(
        "✓ {} persons, {} relationships, no problems",
        snapshot.len(),
        snapshot.relationships().len()
    );
    Ok(())
}
