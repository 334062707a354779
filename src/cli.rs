// src/cli.rs
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::consts::{DEFAULT_CATALOGUE, DEFAULT_INPUTS, DEFAULT_SPLIT_PREFIX};
use crate::config::{ChunkBudget, CleanPolicy, DatasetFamily, PackOptions};
use crate::progress::Progress;
use crate::runner::{self, FileStatus, RunSummary, Stage};

/// Normalize, deduplicate and chunk exam-paper catalogues.
#[derive(Debug, Parser)]
#[command(name = "paper_pack", version, about)]
pub struct Cli {
    /// Debug-level logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Remove `Year: "Unknown"` rows with an empty session from flat catalogues.
    Clean {
        /// Remove rows with either condition instead of both.
        #[arg(long)]
        either: bool,
        #[command(flatten)]
        io: Io,
    },
    /// Split a combined flat catalogue into one file per category.
    Split {
        /// File name prefix for the per-category files.
        #[arg(long, default_value = DEFAULT_SPLIT_PREFIX)]
        prefix: String,
        #[command(flatten)]
        io: Io,
    },
    /// Rewrite catalogues into the dictionary-encoded form.
    Compress {
        #[command(flatten)]
        family: FamilyArg,
        #[command(flatten)]
        io: Io,
    },
    /// Group by subject and write size-bounded artifacts.
    Optimize {
        #[command(flatten)]
        family: FamilyArg,
        /// Byte budget per chunk.
        #[arg(long, default_value_t = ChunkBudget::default().max_chunk_bytes)]
        max_chunk_bytes: usize,
        /// Datasets up to this many bytes stay a single file.
        #[arg(long, default_value_t = ChunkBudget::default().single_file_limit)]
        single_file_limit: usize,
        #[command(flatten)]
        io: Io,
    },
}

#[derive(Debug, Args)]
pub struct Io {
    /// Write results into this directory instead of over the inputs.
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
    /// Catalogue files; defaults to the standard set under public/.
    pub inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct FamilyArg {
    /// Dataset family; detected from the document or file name when omitted.
    #[arg(long, value_enum)]
    pub family: Option<DatasetFamily>,
}

const CATALOGUE_ONLY: &[&str] = &[DEFAULT_CATALOGUE];

/// Prints per-file status lines to stdout.
struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
}

impl Cli {
    /// Stage, inputs and options for this invocation.
    pub fn plan(self) -> (Stage, Vec<PathBuf>, PackOptions) {
        let mut opts = PackOptions::default();

        let (stage, io, defaults): (Stage, Io, &[&str]) = match self.command {
            Command::Clean { either, io } => {
                if either {
                    opts.clean_policy = CleanPolicy::Either;
                }
                (Stage::Clean, io, CATALOGUE_ONLY)
            }
            Command::Split { prefix, io } => {
                opts.split_prefix = prefix;
                (Stage::Split, io, CATALOGUE_ONLY)
            }
            Command::Compress { family, io } => {
                opts.family = family.family;
                (Stage::Compress, io, DEFAULT_INPUTS)
            }
            Command::Optimize { family, max_chunk_bytes, single_file_limit, io } => {
                opts.family = family.family;
                opts.budget = ChunkBudget { max_chunk_bytes, single_file_limit };
                (Stage::Optimize, io, DEFAULT_INPUTS)
            }
        };

        opts.out_dir = io.out_dir;
        let inputs = if io.inputs.is_empty() {
            defaults.iter().map(PathBuf::from).collect()
        } else {
            io.inputs
        };
        (stage, inputs, opts)
    }
}

/// Run the stage and print the summary.
/// Returns the summary so the binary can pick an exit code.
pub fn run(cli: Cli) -> RunSummary {
    let (stage, inputs, opts) = cli.plan();
    let mut progress = ConsoleProgress;
    let summary = runner::run(stage, &inputs, &opts, Some(&mut progress));
    print_summary(&summary);
    summary
}

pub fn print_summary(summary: &RunSummary) {
    for f in &summary.files {
        let status = match &f.status {
            FileStatus::Done => "ok".to_string(),
            FileStatus::Missing => "missing".to_string(),
            FileStatus::Skipped(why) => format!("skipped ({why})"),
            FileStatus::Failed(e) => format!("FAILED ({e})"),
        };
        println!(
            "{}: {} read, {} dropped, {} removed: {}",
            f.input.display(),
            f.read,
            f.dropped,
            f.removed,
            status
        );
        for w in &f.written {
            println!("  wrote {} ({:.2} MB)", w.path.display(), w.bytes as f64 / (1024.0 * 1024.0));
        }
        for d in &f.deleted {
            println!("  removed {}", d.display());
        }
    }
    println!(
        "{}: {} files, {} records read, {} dropped, {} removed, {} failed",
        summary.stage.name(),
        summary.files.len(),
        summary.records_read(),
        summary.records_dropped(),
        summary.records_removed(),
        summary.failures()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(args: &[&str]) -> (Stage, Vec<PathBuf>, PackOptions) {
        Cli::try_parse_from(args).unwrap().plan()
    }

    #[test]
    fn optimize_defaults_to_standard_inputs() {
        let (stage, inputs, opts) = plan(&["paper_pack", "optimize"]);
        assert_eq!(stage, Stage::Optimize);
        assert_eq!(inputs.len(), DEFAULT_INPUTS.len());
        assert_eq!(opts.budget, ChunkBudget::default());
        assert_eq!(opts.family, None);
    }

    #[test]
    fn optimize_flags() {
        let (_, inputs, opts) = plan(&[
            "paper_pack", "optimize", "--family", "ial", "--max-chunk-bytes", "1000",
            "--single-file-limit", "2000", "-o", "dist", "a.json", "b.json",
        ]);
        assert_eq!(inputs, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
        assert_eq!(opts.family, Some(DatasetFamily::Ial));
        assert_eq!(opts.budget, ChunkBudget { max_chunk_bytes: 1000, single_file_limit: 2000 });
        assert_eq!(opts.out_dir, Some(PathBuf::from("dist")));
    }

    #[test]
    fn clean_policy_flag() {
        let (stage, inputs, opts) = plan(&["paper_pack", "clean", "--either"]);
        assert_eq!(stage, Stage::Clean);
        assert_eq!(inputs, vec![PathBuf::from(DEFAULT_CATALOGUE)]);
        assert_eq!(opts.clean_policy, CleanPolicy::Either);

        let (_, _, opts) = plan(&["paper_pack", "clean", "x.json"]);
        assert_eq!(opts.clean_policy, CleanPolicy::Both);
    }

    #[test]
    fn unknown_family_is_rejected() {
        assert!(Cli::try_parse_from(["paper_pack", "compress", "--family", "edexcel"]).is_err());
    }
}
