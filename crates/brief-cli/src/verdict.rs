//! Verdict command: parse saved judge output.

use anyhow::{Context, Result};
use brief_core::VerdictParser;
use clap::Parser;
use std::io::Read;

#[derive(Parser, Debug)]
pub struct VerdictArgs {
    /// File with judge output, or `-` for stdin
    pub file: String,
}

pub fn execute(args: &VerdictArgs) -> Result<()> {
    let text = if args.file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read judge output from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read judge output from {}", args.file))?
    };

    let verdict = VerdictParser::parse(&text);
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}
