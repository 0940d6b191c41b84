//! Repair Export CLI - convert maintenance-report workbooks
//!
//! # Main Command
//!
//! ```bash
//! repair-export convert report.xlsx export.xlsx
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! repair-export split "Fix printer by Alice"   # Show how a handling note splits
//! repair-export inspect report.xlsx            # Dump the loaded sheet as JSON
//! ```

use clap::{Parser, Subcommand};
use repair_export::logs::{last_error, LogEntry, LogFeed};
use repair_export::{convert, read_table, split_text};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "repair-export")]
#[command(about = "Convert maintenance-report workbooks into the five-column export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a report workbook
    Convert {
        /// Source report (.xlsx)
        input: PathBuf,

        /// Destination workbook; ".xlsx" is appended when no extension is given
        output: PathBuf,
    },

    /// Split a handling note into processing record and executor
    Split {
        /// Note text, e.g. "Fix printer by Alice"
        text: String,
    },

    /// Load a report and print its header and rows as JSON
    Inspect {
        /// Source report (.xlsx)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert { input, output } => cmd_convert(&input, &output),
        Commands::Split { text } => cmd_split(&text),
        Commands::Inspect { input, output } => cmd_inspect(&input, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let output = with_default_extension(output);
    eprintln!("📄 Converting: {}", input.display());

    let mut feed = LogFeed::subscribe();
    let converted = convert(input, &output);
    let entries = feed.drain();
    for entry in &entries {
        eprintln!("{}", entry.render());
    }

    if !converted {
        eprintln!("\n{}", failure_notice(&entries));
        std::process::exit(1);
    }

    eprintln!("\n✅ 轉換成功！檔案已成功儲存。");
    eprintln!("   {}", output.display());
    Ok(())
}

fn cmd_split(text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = split_text(text);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn cmd_inspect(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Loading: {}", input.display());

    let table = read_table(input)?;
    eprintln!("   Columns: {}", table.headers.join(", "));
    eprintln!("✅ Loaded {} rows", table.row_count());

    let json = serde_json::to_string_pretty(&table)?;
    write_output(&json, output)?;
    Ok(())
}

/// Final message shown when a conversion fails.
fn failure_notice(entries: &[LogEntry]) -> String {
    let message = last_error(entries).unwrap_or("處理失敗：unknown error");
    format!("❌ 錯誤\n   {}", message)
}

/// Mirror a save dialog: a bare file name gets the workbook extension.
fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("xlsx")
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
