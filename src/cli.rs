use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::application::dto::OutputFormat;
use crate::bom_structure::policies::QuantityMode;

/// Resolve bills of materials from a legacy relation table
#[derive(Parser, Debug)]
#[command(name = "bom-trace")]
#[command(version)]
#[command(
    about = "Resolve, compare and check bills of materials stored in a parent/child relation table",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Output format: json or markdown
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// SQLite database holding the relation table
    #[arg(long, global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Path to config file (default: auto-discover bom-trace.config.yml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log resolver activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// How quantities add up when flattening: per-instance or compounded
    #[arg(long, global = true, value_name = "MODE")]
    pub quantity_mode: Option<QuantityMode>,

    /// Codes per attribute query
    #[arg(long, global = true, value_name = "N")]
    pub chunk_size: Option<usize>,

    /// Relation queries in flight at once
    #[arg(long, global = true, value_name = "N")]
    pub max_workers: Option<usize>,

    /// Timeout of a single relation query, in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub query_timeout_ms: Option<u64>,

    /// Overall time limit of the command, in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub deadline_ms: Option<u64>,

    /// Deepest level that is still expanded
    #[arg(long, global = true, value_name = "N")]
    pub max_depth: Option<usize>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Expand an article into its full component tree
    Resolve {
        /// Article code of the root
        code: String,
    },

    /// List the articles that use a code directly
    Parents {
        /// Article code to look up
        code: String,
    },

    /// List the top-level articles a code ends up in
    TerminalAncestors {
        /// Article code to look up
        code: String,
    },

    /// Compare the structures of several articles
    ///
    /// Structures scraped from printed reports can join the comparison with
    /// --report ORIGIN=PATH (tab-separated rows: code cell, quantity, description).
    Compare {
        /// Article codes to resolve and compare
        codes: Vec<String>,

        /// Structure report to compare as well
        #[arg(long = "report", value_name = "ORIGIN=PATH", value_parser = parse_report_source)]
        reports: Vec<ReportSource>,
    },

    /// Check the codes read from a document against the BOM of its main article
    Reconcile {
        /// Main article of the document
        main_code: String,

        /// File with one extracted code per line
        #[arg(long, value_name = "FILE")]
        codes: PathBuf,
    },
}

/// A structure report given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSource {
    pub origin: String,
    pub path: PathBuf,
}

fn parse_report_source(raw: &str) -> Result<ReportSource, String> {
    let (origin, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("Invalid report: {}. Please specify ORIGIN=PATH", raw))?;

    if origin.trim().is_empty() || path.trim().is_empty() {
        return Err(format!(
            "Invalid report: {}. Both ORIGIN and PATH must be given",
            raw
        ));
    }

    Ok(ReportSource {
        origin: origin.trim().to_string(),
        path: PathBuf::from(path.trim()),
    })
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_resolve_with_global_flags() {
        let args = parse(&[
            "bom-trace",
            "resolve",
            "AX-100",
            "--format",
            "md",
            "--database",
            "bom.sqlite",
        ]);
        assert_eq!(
            args.command,
            Command::Resolve {
                code: "AX-100".to_string()
            }
        );
        assert_eq!(args.format, Some(OutputFormat::Markdown));
        assert_eq!(args.database, Some(PathBuf::from("bom.sqlite")));
        assert!(!args.verbose);
    }

    #[test]
    fn test_format_defaults_to_unset() {
        let args = parse(&["bom-trace", "parents", "B"]);
        assert!(args.format.is_none());
        assert!(args.output.is_none());
        assert!(args.quantity_mode.is_none());
    }

    #[test]
    fn test_terminal_ancestors_subcommand_name() {
        let args = parse(&["bom-trace", "terminal-ancestors", "D", "-v"]);
        assert_eq!(
            args.command,
            Command::TerminalAncestors {
                code: "D".to_string()
            }
        );
        assert!(args.verbose);
    }

    #[test]
    fn test_compare_codes_and_reports() {
        let args = parse(&[
            "bom-trace",
            "compare",
            "A",
            "B",
            "--report",
            "A-OLD=old.tsv",
        ]);
        let Command::Compare { codes, reports } = args.command else {
            panic!("expected compare");
        };
        assert_eq!(codes, vec!["A", "B"]);
        assert_eq!(
            reports,
            vec![ReportSource {
                origin: "A-OLD".to_string(),
                path: PathBuf::from("old.tsv"),
            }]
        );
    }

    #[test]
    fn test_report_source_requires_origin_and_path() {
        assert!(parse_report_source("old.tsv").is_err());
        assert!(parse_report_source("=old.tsv").is_err());
        assert!(parse_report_source("A=").is_err());
        assert!(Args::try_parse_from(["bom-trace", "compare", "A", "--report", "x"]).is_err());
    }

    #[test]
    fn test_reconcile_requires_codes_file() {
        assert!(Args::try_parse_from(["bom-trace", "reconcile", "A"]).is_err());

        let args = parse(&[
            "bom-trace",
            "reconcile",
            "A",
            "--codes",
            "ocr.txt",
            "--quantity-mode",
            "compounded",
        ]);
        assert_eq!(args.quantity_mode, Some(QuantityMode::Compounded));
        assert!(matches!(args.command, Command::Reconcile { .. }));
    }

    #[test]
    fn test_resolver_overrides() {
        let args = parse(&[
            "bom-trace",
            "resolve",
            "A",
            "--chunk-size",
            "200",
            "--max-workers",
            "8",
            "--query-timeout-ms",
            "1500",
            "--deadline-ms",
            "60000",
            "--max-depth",
            "12",
        ]);
        assert_eq!(args.chunk_size, Some(200));
        assert_eq!(args.max_workers, Some(8));
        assert_eq!(args.query_timeout_ms, Some(1500));
        assert_eq!(args.deadline_ms, Some(60000));
        assert_eq!(args.max_depth, Some(12));
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let result = Args::try_parse_from(["bom-trace", "resolve", "A", "-f", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Args::try_parse_from(["bom-trace"]).is_err());
    }
}
