//! Review command: the manual review queue written by `generate`.

use anyhow::{Context, Result};
use brief_core::ReviewQueue;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
pub struct ReviewArgs {
    /// Output directory holding MANUAL_REVIEW.md
    #[arg(long, value_name = "DIR", default_value = ".brief-out")]
    pub out: PathBuf,

    /// Empty the queue after the listed reports were checked
    #[arg(long)]
    pub clear: bool,
}

pub fn execute(args: &ReviewArgs) -> Result<()> {
    let queue = ReviewQueue::new(&args.out);

    if !queue.is_pending() {
        println!("{}", "No reports awaiting manual review.".green());
        return Ok(());
    }

    if args.clear {
        queue
            .clear()
            .with_context(|| format!("Failed to clear {}", queue.path().display()))?;
        info!(path = %queue.path().display(), "Manual review queue cleared");
        println!("Cleared {}", queue.path().display());
        return Ok(());
    }

    let content = std::fs::read_to_string(queue.path())
        .with_context(|| format!("Failed to read {}", queue.path().display()))?;
    print!("{content}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clear_empties_pending_queue() {
        let dir = TempDir::new().unwrap();
        let queue = ReviewQueue::new(dir.path());
        std::fs::write(queue.path(), "## Cloud Migration (cto)\n").unwrap();
        assert!(queue.is_pending());

        let args = ReviewArgs {
            out: dir.path().to_path_buf(),
            clear: true,
        };
        execute(&args).unwrap();
        assert!(!queue.is_pending());
    }

    #[test]
    fn test_missing_queue_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let args = ReviewArgs {
            out: dir.path().join("never-written"),
            clear: false,
        };
        assert!(execute(&args).is_ok());
    }
}
