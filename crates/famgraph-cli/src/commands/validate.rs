//! Validate command
//!
//! Usage: famgraph validate <FILE> --type <TYPE> --person1 <ID> --person2 <ID> [--id <ID>]
//!
//! Exit status: 0 accepted, 1 rejected or invalid, 2 accepted with a warning.

use clap::Args;
use famgraph_core::rules::validation::{validate_relationship, ValidationOutcome};
use famgraph_core::{RelationshipDraft, RelationshipType};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Export document to read
    pub file: PathBuf,

    /// PARENT_CHILD, SPOUSE, SIBLING, ADOPTED or STEP
    #[arg(long = "type")]
    pub kind: RelationshipType,

    /// Parent for PARENT_CHILD, otherwise either endpoint
    #[arg(long)]
    pub person1: String,

    /// Child for PARENT_CHILD, otherwise either endpoint
    #[arg(long)]
    pub person2: String,

    /// Existing relationship being re-checked
    #[arg(long)]
    pub id: Option<String>,
}

/// Execute validate command, returning the process exit status
pub fn execute(args: ValidateArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let doc = super::load_document(&args.file)?;
    let snapshot = doc.to_snapshot();

    let mut draft = RelationshipDraft::new(args.kind, args.person1, args.person2);
    draft.id = args.id;

    let code = match validate_relationship(&snapshot, &draft)? {
        ValidationOutcome::Accepted => {
            println!("accepted");
            0
        }
        ValidationOutcome::Warning(warning) => {
            println!("warning: {}", warning.message);
            2
        }
        ValidationOutcome::Rejected(rejection) => {
            println!("rejected ({}): {}", rejection.kind, rejection.reason);
            1
        }
    };

    Ok(code)
}
