//! Divergence minimizer CLI.
//!
//! Takes a rule plus a corpus file with a known subject/reference checker
//! divergence and automatically shrinks it to a minimal reproduction using
//! delta debugging (block deletion + line deletion).

use std::fs;
use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result, bail};
use clap::Parser;

use dm_cli::{parse_locus, program_available};
use dm_core::candidate::Candidate;
use dm_core::divergence::{DivergenceSpec, MismatchKind, SourceLocus};
use dm_core::error::ReduceError;
use dm_core::reduce;
use dm_core::report::{ReductionReport, rule_file_stem};
use dm_core::session::ReductionSession;
use dm_oracle::config::CheckerConfig;
use dm_oracle::oracle::Oracle;
use dm_oracle::predicate::DivergencePredicate;
use dm_oracle::process::ProcessOracle;
use dm_oracle::validity::ProcessValidity;

/// Delta reducer for checker divergences.
#[derive(Parser, Debug)]
#[command(name = "divmin")]
#[command(author, version, about = "Shrink a checker divergence to a minimal reproduction", long_about = None)]
struct Args {
    /// Rule under investigation (e.g. Style/SymbolProc)
    rule: String,

    /// Corpus repository id (e.g. mastodon__mastodon__c1f398a)
    repo_id: String,

    /// Divergence locus as path:line, relative to the repository
    location: String,

    /// Divergence kind to preserve (extra or missing)
    #[arg(long = "kind", default_value = "extra")]
    kind: String,

    /// Corpus checkout root
    #[arg(long = "corpus-root", default_value = "corpus")]
    corpus_root: PathBuf,

    /// Checker command configuration (JSON)
    #[arg(long = "checkers", default_value = "checkers.json")]
    checkers: PathBuf,

    /// Output directory (default: divmin-reduce under the system temp dir)
    #[arg(long = "out-dir")]
    out_dir: Option<PathBuf>,

    /// Assume reference silence survives deletion and skip reference
    /// checks while reducing. Extra-kind only, and only honored when the
    /// initial reference report is empty. Heuristic: a reference checker
    /// that can start firing after a deletion will over-reduce.
    #[arg(long = "skip-reference")]
    skip_reference: bool,

    /// Also write the run report as JSON next to the reduced file
    #[arg(long = "json")]
    json: bool,

    /// Print each reduction step
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let kind: MismatchKind = args
        .kind
        .parse()
        .map_err(|_| anyhow::anyhow!("--kind must be 'extra' or 'missing', got '{}'", args.kind))?;
    let (rel_path, target_line) = parse_locus(&args.location)?;

    let config = CheckerConfig::load_from_file(&args.checkers)
        .with_context(|| format!("loading checker config {}", args.checkers.display()))?;

    // Prerequisite: the subject checker must exist. Checked before any
    // file is touched.
    if !program_available(&config.subject.program) {
        return Err(ReduceError::PrerequisiteMissing {
            path: config.subject.program.clone(),
        }
        .into());
    }

    let source_path = args.corpus_root.join(&args.repo_id).join(&rel_path);
    if !source_path.exists() {
        bail!("source file not found: {}", source_path.display());
    }
    let raw = fs::read(&source_path)
        .with_context(|| format!("reading {}", source_path.display()))?;
    let source = String::from_utf8_lossy(&raw);
    let candidate = Candidate::from_text(&source).ok_or(ReduceError::EmptyInput)?;
    let original_lines = candidate.len();

    println!(
        "Reducing {} {} in {}/{}:{}",
        args.rule,
        kind,
        args.repo_id,
        rel_path.display(),
        target_line
    );
    println!("Original: {original_lines} lines");
    println!();

    // The work file keeps the source file's name: some rules are
    // path-sensitive.
    let out_dir = args
        .out_dir
        .unwrap_or_else(|| std::env::temp_dir().join("divmin-reduce"));
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let file_name = source_path
        .file_name()
        .map(|n| n.to_owned())
        .unwrap_or_else(|| "candidate".into());
    let work_path = out_dir.join(&file_name);
    fs::write(&work_path, candidate.text())
        .with_context(|| format!("writing {}", work_path.display()))?;

    let subject = ProcessOracle::new(
        config.subject.clone(),
        config.env.clone(),
        out_dir.join("subject-stdout.json"),
    );
    let reference = ProcessOracle::new(
        config.reference.clone(),
        config.env.clone(),
        out_dir.join("reference-stdout.json"),
    );
    let validity = ProcessValidity::new(config.validity.clone(), config.env.clone());

    eprintln!("Verifying initial mismatch...");
    let initial_subject = subject.evaluate(&args.rule, &work_path).into_report();
    let initial_reference = reference.evaluate(&args.rule, &work_path).into_report();

    let mut skip_reference = false;
    match kind {
        MismatchKind::Extra => {
            if initial_subject.is_empty() {
                eprintln!(
                    "Error: subject doesn't fire on this file for {}",
                    args.rule
                );
                eprintln!("Cannot reduce an extra report that doesn't exist.");
                return Err(ReduceError::InitialReproductionFailed {
                    rule_id: args.rule.clone(),
                    kind,
                }
                .into());
            }
            if initial_reference.is_empty() {
                eprintln!(
                    "Confirmed extra report: subject={} offenses, reference=0",
                    initial_subject.len()
                );
                if args.skip_reference {
                    skip_reference = true;
                    eprintln!(
                        "Optimization: skipping reference checks during reduction (baseline is 0)"
                    );
                }
            } else {
                eprintln!(
                    "Warning: reference also fires ({} offenses). Both tools agree — this may not be a true extra report.",
                    initial_reference.len()
                );
                eprintln!(
                    "Proceeding anyway (will try to find a subset where only the subject fires)."
                );
                if args.skip_reference {
                    eprintln!("Ignoring --skip-reference: the initial reference report is not empty.");
                }
            }
        }
        MismatchKind::Missing => {
            if initial_reference.is_empty() {
                eprintln!(
                    "Error: reference doesn't fire on this file for {}",
                    args.rule
                );
                eprintln!("Cannot reduce a missing report that doesn't exist.");
                return Err(ReduceError::InitialReproductionFailed {
                    rule_id: args.rule.clone(),
                    kind,
                }
                .into());
            }
            if initial_subject.is_empty() {
                eprintln!(
                    "Confirmed missing report: reference={} offenses, subject=0",
                    initial_reference.len()
                );
            } else {
                eprintln!(
                    "Warning: subject also fires ({} offenses). Both tools agree — this may not be a true missing report.",
                    initial_subject.len()
                );
                eprintln!(
                    "Proceeding anyway (will try to find a subset where only the reference fires)."
                );
            }
            if args.skip_reference {
                eprintln!("Ignoring --skip-reference: it only applies to extra reports.");
            }
        }
    }
    eprintln!();

    let spec = DivergenceSpec {
        rule_id: args.rule.clone(),
        kind,
        locus: SourceLocus {
            path: rel_path.clone(),
            line: target_line,
        },
    };
    let mut session = ReductionSession::new(spec, candidate);
    let mut predicate = DivergencePredicate::new(
        args.rule.clone(),
        kind,
        subject,
        reference,
        validity,
        work_path.clone(),
    )
    .with_skip_reference(skip_reference)
    .with_verbose(args.verbose);

    // The formal gate: one counted predicate evaluation of the pristine
    // input. Aborts without writing any output on failure.
    reduce::check_initial(&mut session, &mut predicate)?;

    eprintln!("Phase 1: block deletion...");
    reduce::reduce_blocks(&mut session, &mut predicate, args.verbose);
    eprintln!(
        "Phase 1 done: {} -> {} lines",
        original_lines,
        session.current().len()
    );

    eprintln!("Phase 2: line deletion...");
    reduce::reduce_lines(&mut session, &mut predicate, args.verbose);
    eprintln!("Phase 2 done: {} lines", session.current().len());

    // Emit the reduced file under a rule-derived name, and rewrite the
    // work file so the final state can be re-verified in place.
    let stem = rule_file_stem(&args.rule);
    let output_name = match source_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_reduced.{ext}"),
        None => format!("{stem}_reduced"),
    };
    let output_path = out_dir.join(output_name);
    fs::write(&output_path, session.current().text())
        .with_context(|| format!("writing {}", output_path.display()))?;
    fs::write(&work_path, session.current().text())?;

    let report = ReductionReport::from_session(&session, original_lines);
    if args.json {
        let report_path = out_dir.join(format!("{stem}_report.json"));
        fs::write(&report_path, report.to_json())
            .with_context(|| format!("writing {}", report_path.display()))?;
    }

    println!("Wrote: {}", output_path.display());
    report.print_summary();

    Ok(())
}
