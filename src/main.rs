use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use codetable::{source, CodeTableBuilder, CodeTableReader, HEADER_SIZE};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "codetable")]
#[command(about = "Build and read index-accelerated binary code tables")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a binary code table from text lines and/or CSV exports
    Build {
        /// Input files; `.csv` files are read as tables, others as `<code> <word>` lines
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output binary file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Decode a binary code table into `<code> <word>` lines
    Decode {
        /// Binary code table
        input: PathBuf,

        /// Output text file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Absolute offset to start scanning from
        #[arg(long, conflicts_with = "letter")]
        offset: Option<usize>,

        /// Only decode the group of codes starting with this letter
        #[arg(long)]
        letter: Option<char>,
    },

    /// Print the index table of a binary code table
    Index {
        /// Binary code table
        input: PathBuf,
    },

    /// Convert CSV exports into `<code> <word>` lines
    Convert {
        /// CSV files with `编码` and `词条` columns
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output text file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Report lines that occur more than once in a text file
    Dupes {
        /// Text file to check
        input: PathBuf,

        /// Maximum number of duplicate lines to list
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build { inputs, output } => run_build(&inputs, &output),
        Commands::Decode {
            input,
            output,
            offset,
            letter,
        } => run_decode(&input, output.as_deref(), offset, letter),
        Commands::Index { input } => run_index(&input),
        Commands::Convert { inputs, output } => run_convert(&inputs, &output),
        Commands::Dupes { input, limit } => run_dupes(&input, limit),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn run_build(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let mut builder = CodeTableBuilder::new();
    for input in inputs {
        if is_csv(input) {
            let mut rows = source::read_table(input)
                .with_context(|| format!("Failed to read table {}", input.display()))?;
            source::order_by_rank(&mut rows);
            builder.extend_pairs(rows.into_iter().map(|row| (row.code, row.word)));
        } else {
            let lines = source::read_lines(input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            builder.extend_lines(lines);
        }
    }

    let table = builder.build().context("Failed to build code table")?;
    table
        .write_to(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Built {} records into {}", table.records.len(), output.display());
    println!("  {}", table.summary);
    for rejected in &table.summary.rejected {
        println!("  rejected '{}': {}", rejected.code, rejected.reason);
    }
    println!("End offsets relative to {:#x}:", HEADER_SIZE);
    for (letter, end) in ('a'..='z').zip(table.index.end_offsets()) {
        println!("  {}: {}", letter, end);
    }
    Ok(())
}

fn run_decode(
    input: &Path,
    output: Option<&Path>,
    offset: Option<usize>,
    letter: Option<char>,
) -> Result<()> {
    let reader = CodeTableReader::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;

    let records = match (letter, offset) {
        (Some(letter), _) => reader
            .iter_letter(letter)
            .with_context(|| format!("Cannot locate group '{}'", letter))?,
        (None, Some(offset)) => reader.iter_from(offset),
        (None, None) => reader.iter_records(),
    };
    let report = records.into_report();

    match output {
        Some(path) => {
            source::write_lines(path, &report.records)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let mut out = BufWriter::new(io::stdout().lock());
            for record in &report.records {
                writeln!(out, "{}", source::format_line(record))?;
            }
            out.flush()?;
        }
    }

    eprintln!(
        "Processed {} records, skipped {}",
        report.processed(),
        report.skipped_count()
    );
    for skipped in &report.skipped {
        eprintln!("  {:#x}: {}", skipped.offset, skipped.error);
    }
    if let Some(e) = &report.truncated {
        eprintln!("  stopped early: {}", e);
    }
    Ok(())
}

fn run_index(input: &Path) -> Result<()> {
    let reader = CodeTableReader::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let index = reader.index_table()?;

    println!("Index table ({} bytes of data):", reader.data_region_len());
    for (letter, entry) in ('a'..='z').zip(index.entries().windows(2)) {
        println!("  {}: {}..{} ({} bytes)", letter, entry[0], entry[1], entry[1].saturating_sub(entry[0]));
    }
    if !index.is_monotonic() {
        bail!("Index table is not monotonic");
    }
    if index.data_len() as usize != reader.data_region_len() {
        println!(
            "warning: index covers {} bytes but the data region has {}",
            index.data_len(),
            reader.data_region_len()
        );
    }
    Ok(())
}

fn run_convert(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let mut out = BufWriter::new(
        std::fs::File::create(output)
            .with_context(|| format!("Failed to create {}", output.display()))?,
    );
    let mut total = 0;
    for input in inputs {
        let rows = source::read_table(input)
            .with_context(|| format!("Failed to read table {}", input.display()))?;
        for row in &rows {
            writeln!(out, "{} {}", row.code, row.word)?;
        }
        total += rows.len();
    }
    out.flush()?;
    println!("Converted {} rows into {}", total, output.display());
    Ok(())
}

fn run_dupes(input: &Path, limit: usize) -> Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let text = codetable::decode_text_lossy(&bytes);
    let dupes = source::duplicate_lines(&text);

    if dupes.is_empty() {
        println!("No duplicate lines in {}", input.display());
        return Ok(());
    }
    println!("Found {} duplicate lines in {}:", dupes.len(), input.display());
    for (i, dupe) in dupes.iter().take(limit).enumerate() {
        let shown: String = dupe.line.chars().take(100).collect();
        let ellipsis = if dupe.line.chars().count() > 100 { "..." } else { "" };
        println!("{}. {} times: {}{}", i + 1, dupe.count, shown, ellipsis);
    }
    if dupes.len() > limit {
        println!("... and {} more", dupes.len() - limit);
    }
    Ok(())
}
