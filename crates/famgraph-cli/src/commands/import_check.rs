//! Import check command
//!
//! Usage: famgraph import-check <EXISTING> <INCOMING> [--json]

use clap::Args;
use famgraph_core::exchange::{
    check_referential_integrity, detect_overlap, import_stats, ImportStats, Overlap,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImportCheckArgs {
    /// Document holding the current tree
    pub existing: PathBuf,

    /// Document to be imported
    pub incoming: PathBuf,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct DroppedEntry {
    relationship_id: String,
    missing_person_id: Option<String>,
    reason: String,
}

#[derive(Debug, Serialize)]
struct ImportCheckReport {
    incoming: ImportStats,
    persons: Overlap,
    accepted_relationships: usize,
    dropped_relationships: Vec<DroppedEntry>,
}

/// Execute import-check command
pub fn execute(args: ImportCheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let existing = super::load_document(&args.existing)?;
    let incoming = super::load_document(&args.incoming)?;

    let overlap = detect_overlap(existing.person_ids(), incoming.person_ids());
    let integrity = check_referential_integrity(existing.person_ids(), &incoming);

    let report = ImportCheckReport {
        incoming: import_stats(&incoming),
        persons: overlap,
        accepted_relationships: integrity.accepted.len(),
        dropped_relationships: integrity
            .dropped
            .iter()
            .map(|d| DroppedEntry {
                relationship_id: d.relationship_id.clone(),
                missing_person_id: d.missing_person_id().map(str::to_string),
                reason: d.to_error().to_string(),
            })
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Incoming: version {}, exported {}",
        report.incoming.version, report.incoming.export_date
    );
    println!(
        "Persons: {} new, {} already present",
        report.persons.new_count, report.persons.duplicate_count
    );
    println!(
        "Relationships: {} accepted, {} dropped",
        report.accepted_relationships,
        report.dropped_relationships.len()
    );
    for dropped in &report.dropped_relationships {
        println!("  - {}: {}", dropped.relationship_id, dropped.reason);
    }

    Ok(())
}
