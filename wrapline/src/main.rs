// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use wrapline_core::{Buffer, BufferConfig, BufferError, DisplayLine, Document, SourceCol};

/// Load a text file into a wrapped line buffer and inspect its display rows
#[derive(Debug, Parser)]
#[command(name = "wrapline", version)]
struct Args {
    /// File to load
    file: PathBuf,

    /// Display width in columns
    #[arg(short, long, env = "WRAPLINE_WIDTH", default_value_t = wrapline_core::config::DEFAULT_DISPLAY_WIDTH)]
    width: usize,

    /// Tab stop used when expanding tabs on load
    #[arg(short, long, env = "WRAPLINE_TAB_SIZE", default_value_t = wrapline_core::config::DEFAULT_TAB_SIZE)]
    tab_size: usize,

    /// Rewrap to this width after loading
    #[arg(long, value_name = "N")]
    rewrap: Option<usize>,

    /// Print the display position of a source position (LINE:COL or LINE:end)
    #[arg(long, value_name = "LINE:COL", value_parser = parse_location)]
    locate: Vec<(usize, SourceCol)>,

    /// Verify the structural invariants of the buffer
    #[arg(long)]
    check: bool,

    /// Save the buffer to this path
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,

    /// Do not print display rows
    #[arg(short, long)]
    quiet: bool,
}

fn parse_location(s: &str) -> Result<(usize, SourceCol), String> {
    let (line, col) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COL, got '{s}'"))?;
    let line = line
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid line '{line}'"))?;
    Ok((line, col.parse()?))
}

/// One display row as `row  line:col_start  marker |content|`
fn format_row(row: usize, line: &DisplayLine) -> String {
    let marker = if line.is_line_end() { '$' } else { ' ' };
    format!(
        "{row:>5}  {:>5}:{:<5} {marker} |{}|",
        line.source_line(),
        line.col_start(),
        line.text()
    )
}

fn print_rows(out: &mut impl Write, buffer: &Buffer) -> std::io::Result<()> {
    for (row, line) in buffer.lines().enumerate() {
        writeln!(out, "{}", format_row(row, line))?;
    }
    Ok(())
}

async fn run(args: Args) -> Result<bool, BufferError> {
    let config = BufferConfig::new(args.width, args.tab_size)?;
    let mut doc = Document::open(&args.file, config).await?;
    tracing::info!(
        path = %args.file.display(),
        display_lines = doc.buffer().line_count(),
        source_lines = doc.buffer().source_line_count(),
        "loaded"
    );

    if let Some(width) = args.rewrap {
        doc.resize_columns(width)?;
    }

    let mut stdout = std::io::stdout().lock();
    if !args.quiet {
        print_rows(&mut stdout, doc.buffer())?;
    }

    for &(line, col) in &args.locate {
        let pos = doc.display_coords(line, col)?;
        writeln!(stdout, "{line}:{col} -> {}:{}", pos.row, pos.col)?;
    }

    let mut healthy = true;
    if args.check {
        match doc.buffer().check_integrity() {
            Ok(()) => writeln!(stdout, "integrity: ok")?,
            Err(err) => {
                writeln!(stdout, "integrity: {err}")?;
                healthy = false;
            }
        }
    }

    if let Some(output) = &args.output {
        doc.save_as(output).await?;
        tracing::info!(path = %output.display(), "saved");
    }

    Ok(healthy)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        assert_eq!(parse_location("3:7"), Ok((3, SourceCol::At(7))));
        assert_eq!(parse_location("0:end"), Ok((0, SourceCol::LineEnd)));
        assert!(parse_location("3").is_err());
        assert!(parse_location("x:1").is_err());
        assert!(parse_location("1:y").is_err());
    }

    #[test]
    fn test_format_row() {
        let buffer = Buffer::from_text(3, "abcd").unwrap();
        let rows: Vec<String> = buffer
            .lines()
            .enumerate()
            .map(|(row, line)| format_row(row, line))
            .collect();
        assert_eq!(rows[0], "    0      0:0       |abc|");
        assert_eq!(rows[1], "    1      0:3     $ |d|");
    }

    #[test]
    fn test_args() {
        let args = Args::try_parse_from([
            "wrapline", "notes.txt", "-w", "20", "--locate", "1:4", "--locate", "2:end", "--check",
        ])
        .unwrap();
        assert_eq!(args.width, 20);
        assert_eq!(args.locate.len(), 2);
        assert!(args.check);
        assert!(!args.quiet);
    }
}
