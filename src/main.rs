use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process;

use movecheck_core::config::{Ontology, PathMap};
use movecheck_core::graph::builder;
use movecheck_core::graph::resolver::FsProber;
use movecheck_core::migrate::{self, SourceCache};
use movecheck_core::records;
use movecheck_core::report::{self, ValidationOptions};
use movecheck_core::types::{FileMove, Severity, ValidationReport};

#[derive(Parser)]
#[command(name = "movecheck", version, about = "Domain boundary validator and import rewriter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the dependency graph against the domain ontology
    Check {
        /// Classifier output (JSON)
        #[arg(long, value_name = "FILE")]
        records: PathBuf,
        /// Project root holding tsconfig.json / jsconfig.json
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Domain ontology (TOML); built-in rules when absent
        #[arg(long, value_name = "FILE")]
        ontology: Option<PathBuf>,
        /// Emit the full report as JSON
        #[arg(long)]
        json: bool,
        /// Simple-cycle enumeration cap
        #[arg(long, default_value = "1000")]
        max_cycles: usize,
    },
    /// Simulate a batch of moves and plan the import rewrites
    Plan {
        #[arg(long, value_name = "FILE")]
        records: PathBuf,
        /// Proposed moves (JSON)
        #[arg(long, value_name = "FILE")]
        moves: PathBuf,
        #[arg(long, default_value = ".")]
        root: PathBuf,
        #[arg(long, value_name = "FILE")]
        ontology: Option<PathBuf>,
        #[arg(long)]
        json: bool,
        #[arg(long, default_value = "1000")]
        max_cycles: usize,
    },
    /// Simulate, then rewrite imports on disk
    Apply {
        #[arg(long, value_name = "FILE")]
        records: PathBuf,
        #[arg(long, value_name = "FILE")]
        moves: PathBuf,
        #[arg(long, default_value = ".")]
        root: PathBuf,
        #[arg(long, value_name = "FILE")]
        ontology: Option<PathBuf>,
        /// Compute and report edits without writing files
        #[arg(long)]
        dry_run: bool,
        /// Proceed even when the simulation reports errors
        #[arg(long, short)]
        force: bool,
        #[arg(long, default_value = "1000")]
        max_cycles: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            records,
            root,
            ontology,
            json,
            max_cycles,
        } => run_check(&records, &root, ontology.as_deref(), json, max_cycles),
        Commands::Plan {
            records,
            moves,
            root,
            ontology,
            json,
            max_cycles,
        } => run_plan(
            &records,
            &moves,
            &root,
            ontology.as_deref(),
            json,
            max_cycles,
        ),
        Commands::Apply {
            records,
            moves,
            root,
            ontology,
            dry_run,
            force,
            max_cycles,
        } => run_apply(
            &records,
            &moves,
            &root,
            ontology.as_deref(),
            dry_run,
            force,
            max_cycles,
        ),
    }
}

fn load_ontology(path: Option<&Path>) -> Result<Ontology> {
    match path {
        Some(p) => Ontology::load(p).with_context(|| format!("loading ontology {}", p.display())),
        None => Ok(Ontology::default()),
    }
}

fn build_graph(
    records_path: &Path,
    root: &Path,
) -> Result<(movecheck_core::graph::GraphSnapshot, PathMap)> {
    let records = records::load_records(records_path)
        .with_context(|| format!("loading records {}", records_path.display()))?;
    let pathmap = PathMap::load_or_default(root);
    let graph = builder::build(&records, &pathmap, &FsProber);
    Ok((graph, pathmap))
}

fn run_check(
    records_path: &Path,
    root: &Path,
    ontology_path: Option<&Path>,
    json: bool,
    max_cycles: usize,
) -> Result<()> {
    let ontology = load_ontology(ontology_path)?;
    let (graph, _) = build_graph(records_path, root)?;

    let options = ValidationOptions { max_cycles };
    let report = report::validate_graph(&graph, &ontology, &options);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
        if !report.domain_violations.is_empty() {
            println!("Suggested fixes:");
            for fix in report::suggest_fixes(&ontology, &report.domain_violations) {
                println!("  {} {} ({})", "→".cyan(), fix.description, fix.alternative);
            }
        }
    }

    if !report.is_valid {
        process::exit(1);
    }
    Ok(())
}

fn run_plan(
    records_path: &Path,
    moves_path: &Path,
    root: &Path,
    ontology_path: Option<&Path>,
    json: bool,
    max_cycles: usize,
) -> Result<()> {
    let ontology = load_ontology(ontology_path)?;
    let (graph, pathmap) = build_graph(records_path, root)?;
    let moves = records::load_moves(moves_path)
        .with_context(|| format!("loading moves {}", moves_path.display()))?;

    let options = ValidationOptions { max_cycles };
    let report = migrate::simulate_moves(&graph, &ontology, &moves, &options);

    let mut cache = SourceCache::new();
    let plan = migrate::create_plan(&pathmap, &moves, &mut cache, &FsProber)?;

    if json {
        #[derive(serde::Serialize)]
        struct PlanOutput<'a> {
            report: &'a ValidationReport,
            plan: &'a migrate::ImportRewritePlan,
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&PlanOutput {
                report: &report,
                plan: &plan
            })?
        );
    } else {
        print_report(&report);
        print_plan_summary(&plan, &moves);
    }

    if !report.is_valid {
        process::exit(1);
    }
    Ok(())
}

fn run_apply(
    records_path: &Path,
    moves_path: &Path,
    root: &Path,
    ontology_path: Option<&Path>,
    dry_run: bool,
    force: bool,
    max_cycles: usize,
) -> Result<()> {
    let ontology = load_ontology(ontology_path)?;
    let (graph, pathmap) = build_graph(records_path, root)?;
    let moves = records::load_moves(moves_path)
        .with_context(|| format!("loading moves {}", moves_path.display()))?;

    let options = ValidationOptions { max_cycles };
    let report = migrate::simulate_moves(&graph, &ontology, &moves, &options);
    print_report(&report);

    if !report.is_valid && !force {
        println!(
            "{}",
            "Refusing to apply: simulation reported errors (use --force to override)."
                .red()
                .bold()
        );
        process::exit(1);
    }

    let mut cache = SourceCache::new();
    let plan = migrate::create_plan(&pathmap, &moves, &mut cache, &FsProber)?;
    print_plan_summary(&plan, &moves);

    let outcome = migrate::apply_plan(&plan, dry_run);
    let verb = if outcome.dry_run { "Would update" } else { "Updated" };
    println!(
        "{verb} {} imports across {} files.",
        outcome.imports_updated, outcome.files_updated
    );
    for error in &outcome.errors {
        println!("  {} {error}", "✗".red());
    }

    if !dry_run {
        // Verified against the future layout: the physical moves belong to
        // the surrounding checkpointed process, not to this command.
        let broken = migrate::verify_plan(&plan, &pathmap, &mut cache, &FsProber)?;
        if broken.is_empty() {
            println!("{}", "✅ All rewritten imports resolve.".green().bold());
        } else {
            for (file, failures) in &broken {
                for failure in failures {
                    println!("  {} {}: {failure}", "✗".red(), file.display());
                }
            }
            println!(
                "{}",
                format!("❌ {} files have unresolved imports after rewrite.", broken.len())
                    .red()
                    .bold()
            );
            process::exit(1);
        }
    }

    if !outcome.errors.is_empty() {
        process::exit(1);
    }
    Ok(())
}

fn print_report(report: &ValidationReport) {
    println!(
        "Graph: {} files, {} dependencies",
        report.total_files, report.total_dependencies
    );

    for violation in &report.domain_violations {
        let marker = severity_marker(violation.severity);
        println!("  {marker} {}", violation.description);
    }
    for cycle in &report.cyclic_dependencies {
        let marker = severity_marker(cycle.severity);
        println!("  {marker} {}", cycle.description);
    }
    if report.cycles_truncated {
        println!("  {} cycle enumeration truncated at cap", "!".yellow());
    }
    for surface in &report.public_surface_violations {
        println!("  {} {}", "!".yellow(), surface.description);
    }
    if !report.orphaned_files.is_empty() {
        println!("  {} orphaned files: {}", "!".yellow(), report.orphaned_files.len());
    }

    if report.is_valid {
        println!("{}", "✅ Domain boundaries are clean.".green().bold());
    } else {
        println!(
            "{}",
            format!(
                "❌ {} errors, {} warnings, {} error cycles.",
                report.error_count(),
                report.warning_count(),
                report.error_cycle_count()
            )
            .red()
            .bold()
        );
        if report.can_proceed_with_warnings {
            println!("{}", "Within tolerance: may proceed with warnings.".yellow());
        }
    }
}

fn severity_marker(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Error => "✗".red(),
        Severity::Warning => "!".yellow(),
    }
}

fn print_plan_summary(plan: &migrate::ImportRewritePlan, moves: &[FileMove]) {
    println!(
        "Plan: {} moves, {} import updates, {} affected files",
        moves.len(),
        plan.total_updates(),
        plan.affected_files.len()
    );
    for update in &plan.updates {
        println!(
            "  {} {}:{} {} -> {}",
            "~".cyan(),
            update.file_path.display(),
            update.line,
            update.old_specifier,
            update.new_specifier
        );
    }
    for pm in &plan.pathmap_updates {
        println!(
            "  {} path mapping '{}': {} -> {}",
            "~".cyan(),
            pm.pattern,
            pm.old_target.display(),
            pm.new_target.display()
        );
    }
}
