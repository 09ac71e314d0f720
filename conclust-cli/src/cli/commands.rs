//! Command implementations and argument parsing for the conclust CLI.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use conclust_core::{
    ConclustBuilder, ConclustError, Dendrogram, Dissimilarity, DissimilarityError, Linkage,
    LinkageParseError,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "conclust", about = "Run constrained agglomerative clustering.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster a condensed dissimilarity file.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Text file of condensed dissimilarities: the upper triangle of the
    /// symmetric matrix, row-major, whitespace or comma separated. The
    /// observation count is inferred from the value count.
    pub dissimilarities: PathBuf,

    /// Linkage method selector, matched by unambiguous prefix.
    #[arg(long, default_value = "complete", value_parser = parse_method)]
    pub method: Linkage,

    /// Beta for flexible clustering, in [-1, 1).
    #[arg(long)]
    pub beta: Option<f64>,

    /// Links file constraining merges: one zero-based pair `a b` per line.
    #[arg(long, conflicts_with = "chronological")]
    pub links: Option<PathBuf>,

    /// Constrain merges to the chronological path over the input order.
    #[arg(long)]
    pub chronological: bool,

    /// Members file: one positive weight per observation, enabling runs
    /// that start from pre-aggregated clusters.
    #[arg(long)]
    pub members: Option<PathBuf>,
}

fn parse_method(raw: &str) -> Result<Linkage, LinkageParseError> {
    Linkage::from_str(raw)
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while loading an input file.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A numeric token could not be parsed.
    #[error("`{path}` line {line}: `{token}` is not a number")]
    InvalidNumber {
        /// File containing the offending token.
        path: PathBuf,
        /// One-based line number of the offending token.
        line: usize,
        /// The token that failed to parse.
        token: String,
    },
    /// The dissimilarity value count fits no observation count.
    #[error("{got} values do not form a condensed triangle n(n-1)/2 for any n >= 2")]
    NotCondensed {
        /// Number of values read from the file.
        got: usize,
    },
    /// A links line did not hold exactly two observation indices.
    #[error("`{path}` line {line}: expected two observation indices, got `{content}`")]
    MalformedLink {
        /// File containing the offending line.
        path: PathBuf,
        /// One-based line number of the offending line.
        line: usize,
        /// The line that failed to parse.
        content: String,
    },
    /// Dissimilarity validation failed.
    #[error(transparent)]
    Dissimilarity(#[from] DissimilarityError),
    /// Core configuration or run validation failed.
    #[error(transparent)]
    Core(#[from] ConclustError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name derived from the dissimilarity input file.
    pub input_name: String,
    /// The assembled clustering result.
    pub dendrogram: Dendrogram,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading inputs or running the engine fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use conclust_cli::cli::{Cli, Command, RunCommand, run_cli};
/// # use clap::Parser;
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "1.0 4.0 2.0\n")?;
/// let cli = Cli::try_parse_from([
///     "conclust",
///     "run",
///     file.path().to_str().ok_or("non-utf8 temp path")?,
///     "--method",
///     "single",
/// ])?;
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.dendrogram.steps().len(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(path = field::Empty, method = field::Empty, constrained = field::Empty),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    span.record("path", field::display(command.dissimilarities.display()));
    span.record("method", field::display(command.method));
    span.record(
        "constrained",
        field::display(command.links.is_some() || command.chronological),
    );

    let values = read_numbers(&command.dissimilarities)?;
    let n = infer_observation_count(values.len())
        .ok_or(CliError::NotCondensed { got: values.len() })?;
    let input = Dissimilarity::from_condensed(n, values)?;

    let mut builder = ConclustBuilder::new().with_method(command.method);
    if let Some(beta) = command.beta {
        builder = builder.with_beta(beta);
    }
    if let Some(path) = &command.links {
        builder = builder.with_links(read_links(path)?);
    }
    if command.chronological {
        builder = builder.chronological();
    }
    if let Some(path) = &command.members {
        builder = builder.with_members(read_numbers(path)?);
    }

    let dendrogram = builder.build()?.run(&input)?;
    info!(
        observations = n,
        merges = dendrogram.steps().len(),
        disjoint_groups = dendrogram.disjoint_groups(),
        "command completed"
    );
    Ok(ExecutionSummary {
        input_name: derive_input_name(&command.dissimilarities),
        dendrogram,
    })
}

/// Reads whitespace- or comma-separated floats from a text file.
fn read_numbers(path: &Path) -> Result<Vec<f64>, CliError> {
    let text = read_file(path)?;
    let mut values = Vec::new();
    for (index, line) in text.lines().enumerate() {
        for token in tokens(line) {
            let value: f64 = token.parse().map_err(|_| CliError::InvalidNumber {
                path: path.to_path_buf(),
                line: index + 1,
                token: token.to_owned(),
            })?;
            values.push(value);
        }
    }
    Ok(values)
}

/// Reads one zero-based `a b` pair per non-empty line.
fn read_links(path: &Path) -> Result<Vec<(usize, usize)>, CliError> {
    let text = read_file(path)?;
    let mut links = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let fields: Vec<&str> = tokens(line).collect();
        if fields.is_empty() {
            continue;
        }
        let pair = match fields.as_slice() {
            [a, b] => a.parse().ok().zip(b.parse().ok()),
            _ => None,
        };
        let Some(link) = pair else {
            return Err(CliError::MalformedLink {
                path: path.to_path_buf(),
                line: index + 1,
                content: line.to_owned(),
            });
        };
        links.push(link);
    }
    Ok(links)
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split([' ', '\t', ',']).filter(|token| !token.is_empty())
}

/// Solves `len == n(n-1)/2` for the observation count, if any fits.
fn infer_observation_count(len: usize) -> Option<usize> {
    let mut n: usize = 2;
    while n * (n - 1) / 2 < len {
        n += 1;
    }
    (n * (n - 1) / 2 == len).then_some(n)
}

fn derive_input_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "dissimilarities".to_owned())
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// Merge operands use the classical signed encoding (negative for original
/// observations, positive for earlier merges); a missing height renders as
/// `NA`.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let dendrogram = &summary.dendrogram;
    writeln!(writer, "input: {}", summary.input_name)?;
    writeln!(writer, "method: {}", dendrogram.method())?;
    writeln!(writer, "observations: {}", dendrogram.len())?;
    writeln!(writer, "merges:")?;
    let heights = dendrogram.heights();
    for (index, merge) in dendrogram.merge_matrix().iter().enumerate() {
        let height = heights[index].map_or_else(|| "NA".to_owned(), |value| format!("{value}"));
        writeln!(writer, "{}\t{}\t{}\t{height}", index + 1, merge[0], merge[1])?;
    }
    let order: Vec<String> = dendrogram
        .order()
        .iter()
        .map(ToString::to_string)
        .collect();
    writeln!(writer, "order: {}", order.join(" "))?;
    if dendrogram.disjoint_groups() > 1 {
        writeln!(
            writer,
            "disjoint groups: {0} (cut at {0} groups to recover the constraint components)",
            dendrogram.disjoint_groups()
        )?;
    }
    Ok(())
}
