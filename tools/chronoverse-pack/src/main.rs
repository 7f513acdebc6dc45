//! chronoverse-pack: build the flash content image
//!
//! Reads `<prefix>HH.json` for hours 01..=24 from a directory and writes a
//! single image for the firmware's content partition:
//!
//! ```text
//! chronoverse-pack --input data/ --output content.bin
//! espflash write-bin 0x300000 content.bin
//! ```

mod pack;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chronoverse_content::DEFAULT_PREFIX;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "chronoverse-pack")]
#[command(about = "Pack per-hour content buckets into a flash image")]
struct Cli {
    /// Directory holding the per-hour JSON files
    #[arg(long)]
    input: PathBuf,
    /// Image file to write
    #[arg(long)]
    output: PathBuf,
    /// File name prefix before the two-digit hour
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let packed = pack::pack_dir(&cli.input, &cli.prefix)?;
    fs::write(&cli.output, &packed.image)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    for (hour, entries) in &packed.summary.hours {
        println!("hour {hour}: {entries} entries");
    }
    if !packed.summary.missing.is_empty() {
        let missing: Vec<String> = packed
            .summary
            .missing
            .iter()
            .map(ToString::to_string)
            .collect();
        eprintln!("warning: no bucket for hours {}", missing.join(", "));
    }
    println!(
        "wrote {} ({} bytes, {} hours)",
        cli.output.display(),
        packed.image.len(),
        packed.summary.hours.len()
    );
    Ok(())
}
