use anyhow::{Context, Result};
use clap::Parser;
use globset::{Glob, GlobMatcher};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use walkdir::WalkDir;

use strcarve::cli::Args;
use strcarve::filter::{filter, FilterCriteria};
use strcarve::report::{FileReport, JsonReport, ReportMetadata, TextSink};
use strcarve::scanner::scan_with_progress;
use strcarve::source::open_source;
use strcarve::{patterns, Hit, NarrowCodec, ScanProgress};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("Invalid arguments: {}", e);
        std::process::exit(1);
    }

    init_tracing(args.quiet || args.silent);

    if args.list_patterns {
        print_pattern_catalog();
        return Ok(());
    }

    if !args.quiet {
        println!(
            "{} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        println!();
    }

    let files = collect_files(&args)?;
    if files.is_empty() {
        warn!("no files matched the given input options");
        return Ok(());
    }

    let criteria = build_criteria(&args)?;
    let config = args.scan_config();
    if config.narrow {
        NarrowCodec::resolve(config.code_page)
            .with_context(|| format!("unusable --cp value {}", config.code_page))?;
    }

    let mut text_sink = match &args.output {
        Some(path) => Some(TextSink::append(path).with_context(|| {
            format!("cannot open output file {}", path.display())
        })?),
        None => None,
    };
    let mut json_report = args
        .json
        .as_ref()
        .map(|_| JsonReport::new(ReportMetadata::new(args.min, args.max_length(), args.code_page)));

    let started = Instant::now();
    let mut total_matches = 0u64;

    for path in &files {
        if !args.quiet {
            println!("Searching {}...", path.display());
        }

        // A bad file is fatal for that file only; the run moves on
        let source = match open_source(path) {
            Ok(source) => source,
            Err(e) => {
                warn!("cannot open {}: {}", path.display(), e);
                continue;
            }
        };

        let result = scan_with_progress(source.as_ref(), &config, |p: &ScanProgress| {
            if p.total_windows > 1 {
                info!(
                    "chunk {} of {}, {} hits so far",
                    p.window_index, p.total_windows, p.hits_so_far
                );
            }
        });
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("scan of {} failed: {}", path.display(), e);
                continue;
            }
        };

        for diagnostic in &outcome.diagnostics {
            warn!("{}", diagnostic);
        }

        let sorted = outcome.hits.into_sorted(args.sort_order());
        let (reported, match_count) = filter(&sorted, &criteria);
        total_matches += match_count;

        emit_hits(&reported, &args, &mut text_sink)?;

        if let Some(report) = &mut json_report {
            report.push_file(FileReport::new(
                path.display().to_string(),
                &outcome.stats,
                match_count,
                &reported,
            ));
        }

        if !args.quiet {
            println!();
            let suffix = if match_count == 1 { "" } else { "es" };
            println!(
                "Found {} match{} in {} ({:.3} seconds)",
                match_count,
                suffix,
                path.display(),
                outcome.stats.duration_secs
            );
            if outcome.stats.boundary_hits_found {
                println!("Strings prefixed by two spaces were found at a chunk boundary");
            }
            println!();
        }
    }

    if let Some(sink) = &mut text_sink {
        sink.flush()?;
    }
    if let (Some(report), Some(path)) = (&json_report, &args.json) {
        report
            .write_to(path)
            .with_context(|| format!("cannot write JSON report to {}", path.display()))?;
    }

    if !args.quiet && files.len() > 1 {
        let suffix = if total_matches == 1 { "" } else { "es" };
        println!(
            "Found {} match{} across {} files ({:.3} seconds)",
            total_matches,
            suffix,
            files.len(),
            started.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_pattern_catalog() {
    println!("Built-in patterns, usable anywhere a regex is accepted (--lr):");
    println!();
    for entry in patterns::all() {
        println!("  {:<12}{}", entry.name, entry.description);
    }
}

/// Resolve -f / -d into the concrete list of files to scan, applying the
/// directory mask and size cap when given.
fn collect_files(args: &Args) -> Result<Vec<PathBuf>> {
    if let Some(file) = &args.file {
        return Ok(vec![file.clone()]);
    }

    let dir = args.dir.as_ref().expect("validated: -f or -d present");
    let matcher = match &args.mask {
        Some(mask) => Some(
            Glob::new(mask)
                .with_context(|| format!("invalid file mask {:?}", mask))?
                .compile_matcher(),
        ),
        None => None,
    };
    let max_size = args.max_file_size();

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !mask_matches(&matcher, entry.path()) {
            continue;
        }
        if let Some(cap) = max_size {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if size > cap {
                info!(
                    "skipping {} ({} bytes exceeds --ms {})",
                    entry.path().display(),
                    size,
                    cap
                );
                continue;
            }
        }
        files.push(entry.into_path());
    }

    files.sort();
    Ok(files)
}

fn mask_matches(matcher: &Option<GlobMatcher>, path: &Path) -> bool {
    match matcher {
        Some(m) => path.file_name().map(|n| m.is_match(n)).unwrap_or(false),
        None => true,
    }
}

/// Assemble filter criteria from the inline options and criteria files.
/// Built-in pattern names given to --lr are expanded from the catalog.
fn build_criteria(args: &Args) -> Result<FilterCriteria> {
    let mut literals = args.literal.clone();
    if let Some(path) = &args.literal_file {
        literals.extend(read_lines(path)?);
    }

    let mut regexes: Vec<String> = Vec::new();
    for entry in args.regex.iter().cloned().chain(
        args.regex_file
            .as_ref()
            .map(|p| read_lines(p))
            .transpose()?
            .unwrap_or_default(),
    ) {
        match patterns::lookup(&entry) {
            Some(catalog) => regexes.push(catalog.pattern.to_string()),
            None => regexes.push(entry),
        }
    }

    let (criteria, diagnostics) = FilterCriteria::new(literals, regexes, args.regex_only);
    for diagnostic in diagnostics {
        warn!("{}", diagnostic);
    }
    Ok(criteria)
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read criteria file {}", path.display()))?;
    Ok(content.lines().map(str::to_string).collect())
}

fn emit_hits(hits: &[Hit], args: &Args, sink: &mut Option<TextSink>) -> Result<()> {
    for hit in hits {
        let line = hit.to_string();
        if !args.silent {
            println!("{}", line);
        }
        if let Some(sink) = sink {
            sink.write_line(&line)?;
        }
    }
    Ok(())
}
