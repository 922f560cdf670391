//! # gsheets-cli
//!
//! Command-line interface for reading and editing Google Sheets.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use gsheets_auth::{acquire_token, CodeSource};
use gsheets_core::{transpose, CallOptions, CellPosition, CellSpan, CellValue, ValueMatrix};
use gsheets_session::{SessionConfig, SheetPropertiesExt, SheetSession};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// gsheets - read and edit Google Sheets from the shell
#[derive(Parser)]
#[command(name = "gsheets")]
#[command(author, version, about = "Google Sheets from the command line", long_about = None)]
struct Cli {
    /// OAuth client-secret file
    #[arg(long, env = "GSHEETS_CREDENTIALS", default_value = "credentials.json")]
    credentials: PathBuf,

    /// Token file (written by `gsheets token`)
    #[arg(long, env = "GSHEETS_TOKEN", default_value = "token.json")]
    token: PathBuf,

    /// Request the read-only scope
    #[arg(long)]
    read_only: bool,

    /// Per-call timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Output format for values
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Output format for value matrices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// JSON array of rows
    Json,
    /// Tab-separated rows (default)
    #[default]
    Table,
}

#[derive(Args, Debug)]
struct Target {
    /// Spreadsheet to operate on
    #[arg(long = "spreadsheet-id", short = 's', env = "GSHEETS_SPREADSHEET_ID")]
    spreadsheet_id: String,
}

#[derive(Args, Debug)]
struct WriteArgs {
    #[command(flatten)]
    target: Target,

    /// A1 range to write
    range: String,

    /// JSON matrix, or @FILE to read it from a file
    values: String,

    /// Parse values as if typed, so formulas are evaluated
    #[arg(long)]
    formulas: bool,

    /// The matrix is a list of columns rather than rows
    #[arg(long)]
    columns: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authorize access and write the token file
    Token {
        /// Receive the browser redirect on this local port instead of pasting
        /// the code (0 picks a free port)
        #[arg(long, value_name = "PORT", num_args = 0..=1, default_missing_value = "0")]
        loopback: Option<u16>,
    },
    /// Read computed values
    Read {
        #[command(flatten)]
        target: Target,
        range: String,
    },
    /// Read formula text
    ReadFormulas {
        #[command(flatten)]
        target: Target,
        range: String,
    },
    /// Overwrite a range
    Update(WriteArgs),
    /// Append rows after the table in a range
    Append(WriteArgs),
    /// Clear the values in a range
    Clear {
        #[command(flatten)]
        target: Target,
        range: String,
    },
    /// Rename a sheet
    Rename {
        #[command(flatten)]
        target: Target,
        gid: i32,
        title: String,
    },
    /// Hide a sheet
    Hide {
        #[command(flatten)]
        target: Target,
        gid: i32,
    },
    /// Show a hidden sheet
    Unhide {
        #[command(flatten)]
        target: Target,
        gid: i32,
    },
    /// Copy a block of cells between sheets
    CopyPaste {
        #[command(flatten)]
        target: Target,
        /// Source sheet GID
        #[arg(long)]
        from: i32,
        /// Destination sheet GID
        #[arg(long)]
        to: i32,
        /// Source cells as ROW,COL or ROW,COL:ROW,COL (1-based)
        #[arg(value_parser = parse_span)]
        source: CellSpan,
        /// Destination cells, same notation
        #[arg(value_parser = parse_span)]
        dest: CellSpan,
        /// Paste formulas only, without formatting
        #[arg(long)]
        formulas_only: bool,
    },
    /// Copy a sheet from another spreadsheet into this one
    CopyFrom {
        #[command(flatten)]
        target: Target,
        /// Spreadsheet holding the sheet
        source_id: String,
        /// GID of the sheet to copy
        gid: i32,
        /// Rename (and unhide) the copy
        #[arg(long)]
        name: Option<String>,
    },
    /// List sheets, or resolve one sheet by index, GID or name
    Resolve {
        #[command(flatten)]
        target: Target,
        #[arg(long, conflicts_with_all = ["gid", "name"])]
        index: Option<i32>,
        #[arg(long, conflicts_with = "name")]
        gid: Option<i32>,
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    run(cli, CallOptions::new().with_cancellation(cancel)).await
}

async fn run(cli: Cli, opts: CallOptions) -> Result<()> {
    let format = cli.format;

    match &cli.command {
        Command::Token { loopback } => {
            let credentials = read_file(&cli.credentials)?;
            let source = match loopback {
                Some(port) => CodeSource::loopback(*port),
                None => CodeSource::stdin(),
            };
            let opts = opts.or_deadline(cli.timeout.map(Duration::from_secs));
            acquire_token(
                &credentials,
                &cli.token,
                cli.read_only,
                source,
                std::io::stdout(),
                &opts,
            )
            .await
            .context("Failed to acquire token")?;
        }
        Command::Read { target, range } => {
            let values = open(&cli, target).await?.read_values(range, &opts).await?;
            print_matrix(&values, format)?;
        }
        Command::ReadFormulas { target, range } => {
            let values = open(&cli, target).await?.read_formulas(range, &opts).await?;
            print_matrix(&values, format)?;
        }
        Command::Update(args) => {
            let values = load_matrix(args)?;
            let session = open(&cli, &args.target).await?;
            let response = if args.formulas {
                session.update_formulas(&args.range, &values, &opts).await?
            } else {
                session.update_values(&args.range, &values, &opts).await?
            };
            done(&format!(
                "Updated {} cells in {}",
                response.updated_cells.unwrap_or_default(),
                response.updated_range.unwrap_or_default()
            ));
        }
        Command::Append(args) => {
            let values = load_matrix(args)?;
            let session = open(&cli, &args.target).await?;
            let response = if args.formulas {
                session.append_formulas(&args.range, &values, &opts).await?
            } else {
                session.append_values(&args.range, &values, &opts).await?
            };
            match response.updates {
                Some(updates) => done(&format!(
                    "Appended {} cells at {}",
                    updates.updated_cells.unwrap_or_default(),
                    updates.updated_range.unwrap_or_default()
                )),
                None => done("Appended"),
            }
        }
        Command::Clear { target, range } => {
            let response = open(&cli, target).await?.clear(range, &opts).await?;
            done(&format!(
                "Cleared {}",
                response.cleared_range.unwrap_or_default()
            ));
        }
        Command::Rename { target, gid, title } => {
            open(&cli, target).await?.rename_sheet(*gid, title, &opts).await?;
            done(&format!("Renamed sheet {gid} to '{title}'"));
        }
        Command::Hide { target, gid } => {
            open(&cli, target).await?.set_sheet_hidden(*gid, true, &opts).await?;
            done(&format!("Hid sheet {gid}"));
        }
        Command::Unhide { target, gid } => {
            open(&cli, target).await?.set_sheet_hidden(*gid, false, &opts).await?;
            done(&format!("Unhid sheet {gid}"));
        }
        Command::CopyPaste {
            target,
            from,
            to,
            source,
            dest,
            formulas_only,
        } => {
            open(&cli, target).await?
                .copy_paste(*from, *to, *source, *dest, !formulas_only, &opts)
                .await?;
            done(&format!("Pasted sheet {from} into sheet {to}"));
        }
        Command::CopyFrom {
            target,
            source_id,
            gid,
            name,
        } => {
            let copied = open(&cli, target).await?
                .copy_sheet_from(source_id, *gid, name.as_deref(), &opts)
                .await?;
            done(&format!(
                "Copied as '{}' (gid {})",
                copied.title_str(),
                copied.gid()
            ));
        }
        Command::Resolve {
            target,
            index,
            gid,
            name,
        } => {
            let session = open(&cli, target).await?;
            if let Some(index) = index {
                let gid = session.gid_by_index(*index, &opts).await?;
                let name = session.name_by_index(*index, &opts).await?;
                println!("{index}\t{gid}\t{name}");
            } else if let Some(gid) = gid {
                println!("{gid}\t{}", session.name_by_gid(*gid, &opts).await?);
            } else if let Some(name) = name {
                println!("{}\t{name}", session.gid_by_name(name, &opts).await?);
            } else {
                for sheet in session.sheets(&opts).await? {
                    let hidden = if sheet.is_hidden() { " (hidden)" } else { "" };
                    println!(
                        "{}\t{}\t{}{}",
                        sheet.position(),
                        sheet.gid(),
                        sheet.title_str(),
                        hidden.dimmed()
                    );
                }
            }
        }
    }

    Ok(())
}

/// Build a session from the credential and token files.
async fn open(cli: &Cli, target: &Target) -> Result<SheetSession> {
    let credentials = read_file(&cli.credentials)?;
    let token = read_file(&cli.token).context("No usable token; run `gsheets token` first")?;

    let mut config = SessionConfig::default();
    if let Some(secs) = cli.timeout {
        config = config.with_default_deadline(Duration::from_secs(secs));
    }

    let session = SheetSession::with_config(
        &credentials,
        &token,
        target.spreadsheet_id.as_str(),
        cli.read_only,
        config,
    )
    .await?;
    Ok(session)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Parse the matrix argument, transposing column-major input.
fn load_matrix(args: &WriteArgs) -> Result<ValueMatrix> {
    let text = match args.values.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {path}"))?,
        None => args.values.clone(),
    };
    let matrix = parse_matrix(&text)?;
    if args.columns {
        Ok(transpose(&matrix)?)
    } else {
        Ok(matrix)
    }
}

fn parse_matrix(text: &str) -> Result<ValueMatrix> {
    let value: CellValue =
        serde_json::from_str(text).context("Values must be a JSON array of arrays")?;
    let CellValue::Array(rows) = value else {
        bail!("Values must be a JSON array of arrays");
    };
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| match row {
            CellValue::Array(cells) => Ok(cells),
            other => bail!("Row {i} is not an array: {other}"),
        })
        .collect()
}

/// Parse `ROW,COL` or `ROW,COL:ROW,COL` (1-based, inclusive).
fn parse_span(s: &str) -> Result<CellSpan> {
    fn position(s: &str) -> Result<CellPosition> {
        let (row, column) = s
            .split_once(',')
            .with_context(|| format!("Invalid cell '{s}'. Expected ROW,COL"))?;
        let row = row.trim().parse::<i32>().with_context(|| format!("Invalid row in '{s}'"))?;
        let column = column
            .trim()
            .parse::<i32>()
            .with_context(|| format!("Invalid column in '{s}'"))?;
        Ok(CellPosition::new(row, column))
    }

    match s.split_once(':') {
        Some((start, end)) => Ok(CellSpan::new(position(start)?, position(end)?)),
        None => Ok(CellSpan::single(position(s)?)),
    }
}

fn print_matrix(values: &ValueMatrix, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(values)?),
        OutputFormat::Table => {
            if values.is_empty() {
                println!("{}", "(empty range)".dimmed());
            }
            for row in values {
                let cells: Vec<_> = row.iter().map(format_cell).collect();
                println!("{}", cells.join("\t"));
            }
        }
    }
    Ok(())
}

/// Format a cell for table output.
fn format_cell(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn done(message: &str) {
    println!("{} {message}", "✓".green().bold());
}
