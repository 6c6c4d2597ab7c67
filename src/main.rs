use bom_trace::adapters::outbound::console::StderrProgressReporter;
use bom_trace::adapters::outbound::filesystem::FileSystemReader;
use bom_trace::adapters::outbound::persistence::{CachingRelationGateway, SqliteRelationStore};
use bom_trace::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use bom_trace::application::use_cases::{
    CompareStructuresUseCase, ReconcileDocumentUseCase, ResolveAncestorsUseCase,
    ResolveStructureUseCase,
};
use bom_trace::bom_structure::domain::{ArticleCode, ResolvedStructure};
use bom_trace::bom_structure::services::ReportStructureParser;
use bom_trace::cli::{Args, Command, ReportSource};
use bom_trace::config::{discover_config, load_config_from_path, merge_with_args};
use bom_trace::ports::outbound::{InputReader, ProgressReporter};
use bom_trace::shared::error::{ExitCode, ResolutionError};
use bom_trace::shared::Result;
use std::io::IsTerminal;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(exit_code) => process::exit(exit_code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

/// Diagnostics go to stderr; `--verbose` wins over `RUST_LOG`
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,bom_trace=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .init();
}

async fn run(args: Args) -> Result<ExitCode> {
    // Config file: explicit path, or auto-discovered in the working directory
    let config = match args.config.as_deref() {
        Some(path) => Some(load_config_from_path(path)?),
        None => discover_config(&std::env::current_dir()?)?,
    };
    let options = merge_with_args(&args, config)?;

    // Create adapters (Dependency Injection)
    let gateway = CachingRelationGateway::new(SqliteRelationStore::new(&options.database)?);
    let reader = FileSystemReader::new();
    let progress_reporter = StderrProgressReporter::new();
    let formatter = FormatterFactory::create(options.format);
    let presenter = PresenterFactory::create(PresenterType::from(args.output.clone()));

    let (output, exit_code) = match args.command {
        Command::Resolve { code } => {
            let use_case = ResolveStructureUseCase::new(gateway, options.settings);
            let structure = use_case.execute(&code).await?;
            (formatter.format_structure(&structure)?, ExitCode::Success)
        }
        Command::Parents { code } => {
            let use_case = ResolveAncestorsUseCase::new(gateway, options.settings);
            let response = use_case.parents(&code).await?;
            (formatter.format_ancestors(&response)?, ExitCode::Success)
        }
        Command::TerminalAncestors { code } => {
            let use_case = ResolveAncestorsUseCase::new(gateway, options.settings);
            let response = use_case.terminal_ancestors(&code).await?;
            (formatter.format_ancestors(&response)?, ExitCode::Success)
        }
        Command::Compare { codes, reports } => {
            let imported = import_reports(&reader, &progress_reporter, &reports)?;
            let use_case =
                CompareStructuresUseCase::new(gateway, options.settings, progress_reporter);
            let response = use_case.execute(&codes, imported).await?;
            let exit_code = if response.has_differences() {
                ExitCode::DiscrepanciesDetected
            } else {
                ExitCode::Success
            };
            (formatter.format_comparison(&response)?, exit_code)
        }
        Command::Reconcile { main_code, codes } => {
            let extracted = reader.read_extracted_codes(&codes)?;
            let use_case =
                ReconcileDocumentUseCase::new(gateway, options.settings, progress_reporter);
            let response = use_case.execute(&main_code, &extracted[..]).await?;
            let exit_code = if response.has_discrepancies() {
                ExitCode::DiscrepanciesDetected
            } else {
                ExitCode::Success
            };
            (formatter.format_document_check(&response)?, exit_code)
        }
    };

    presenter.present(&output)?;
    Ok(exit_code)
}

/// Builds the structures of `--report` files; a report of an unknown article
/// takes part as an empty structure
fn import_reports(
    reader: &impl InputReader,
    progress_reporter: &impl ProgressReporter,
    reports: &[ReportSource],
) -> Result<Vec<ResolvedStructure>> {
    let mut structures = Vec::with_capacity(reports.len());

    for report in reports {
        let origin = ArticleCode::new(&report.origin)?;
        let text = reader.read_structure_report(&report.path)?;

        match ReportStructureParser::parse_tsv(origin.clone(), &text) {
            Ok(structure) => structures.push(structure),
            Err(ResolutionError::NotFound { .. }) => {
                progress_reporter.report_error(&format!(
                    "⚠️  Report {} lists no article {}, compared as empty",
                    report.path.display(),
                    origin
                ));
                structures.push(ResolvedStructure::empty(origin));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(structures)
}
