//! resume-tailor CLI - resume parsing and section regeneration tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use resume_tailor::render::{to_json, to_text};
use resume_tailor::{
    Document, JsonFormat, RegenerationPolicy, ResumeTailor, SectionUpdates, Tailor,
};

#[derive(Parser)]
#[command(name = "resume-tailor")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Detect resume sections, extract entities and rewrite sections in place", long_about = None)]
struct Cli {
    /// Section header similarity threshold
    #[arg(long, global = true, env = "RESUME_TAILOR_THRESHOLD")]
    threshold: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse resumes into sections, experience, skills and projects
    Parse {
        /// Input files (plain text, or document JSON with --document)
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Inputs are document JSON rather than plain text
        #[arg(short, long)]
        document: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show the detected sections of a resume
    Sections {
        /// Input file (plain text, or document JSON with --document)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Input is document JSON rather than plain text
        #[arg(short, long)]
        document: bool,
    },

    /// Rewrite whitelisted sections of a document
    Regenerate {
        /// Document JSON
        #[arg(value_name = "DOCUMENT")]
        input: PathBuf,

        /// Section updates JSON (section key to replacement content)
        #[arg(value_name = "UPDATES")]
        updates: PathBuf,

        /// Output document JSON (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Regeneration policy JSON
        #[arg(long, value_name = "FILE", env = "RESUME_TAILOR_POLICY")]
        policy: Option<PathBuf>,

        /// Write the regeneration report to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let threshold = cli.threshold;

    let result = match cli.command {
        Commands::Parse {
            inputs,
            document,
            output,
            compact,
        } => cmd_parse(threshold, &inputs, document, output.as_deref(), compact),
        Commands::Sections { input, document } => cmd_sections(threshold, &input, document),
        Commands::Regenerate {
            input,
            updates,
            output,
            policy,
            report,
        } => cmd_regenerate(
            threshold,
            &input,
            &updates,
            output.as_deref(),
            policy.as_deref(),
            report.as_deref(),
        ),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build(
    threshold: Option<f32>,
    policy: Option<RegenerationPolicy>,
) -> Result<Tailor, Box<dyn std::error::Error>> {
    let mut builder = ResumeTailor::new();
    if let Some(threshold) = threshold {
        builder = builder.with_header_threshold(threshold);
    }
    if let Some(policy) = policy {
        builder = builder.with_policy(policy);
    }
    Ok(builder.build()?)
}

fn read_document(path: &Path) -> Result<Document, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| format!("{}: {}", path.display(), e).into())
}

fn read_text(path: &Path, document: bool) -> Result<String, Box<dyn std::error::Error>> {
    if document {
        Ok(to_text(&read_document(path)?))
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_parse(
    threshold: Option<f32>,
    inputs: &[PathBuf],
    document: bool,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tailor = build(threshold, None)?;
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    if let [input] = inputs {
        let parsed = tailor.parse(&read_text(input, document)?);
        return write_output(output, &to_json(&parsed, format)?);
    }

    let pb = ProgressBar::new(inputs.len() as u64 + 1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reading inputs...");
    let mut texts = Vec::with_capacity(inputs.len());
    for input in inputs {
        texts.push(read_text(input, document)?);
        pb.inc(1);
    }

    pb.set_message("Parsing...");
    let parsed = tailor.parse_batch(&texts);
    pb.inc(1);
    pb.finish_and_clear();

    write_output(output, &to_json(&parsed, format)?)
}

fn cmd_sections(
    threshold: Option<f32>,
    input: &Path,
    document: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tailor = build(threshold, None)?;

    println!("{}", "Detected Sections".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    if document {
        let doc = read_document(input)?;
        let map = tailor.sections(&doc);
        if map.is_empty() {
            println!("{}", "No section headers detected".yellow());
        }
        for range in map.iter() {
            let span = if range.is_empty() {
                "empty".dimmed().to_string()
            } else {
                format!("paragraphs {}-{}", range.content_start, range.content_end)
            };
            println!(
                "{:>4}  {:<16} {} ({})",
                range.header_index,
                range.section_type.as_str().bold(),
                range.header_text,
                span
            );
        }
        return Ok(());
    }

    let text = fs::read_to_string(input)?;
    let headers = tailor.parser().detect_headers(&text);
    if headers.is_empty() {
        println!("{}", "No section headers detected".yellow());
    }
    for header in headers {
        println!(
            "{:>4}  {:<16} {}",
            header.line + 1,
            header.section.as_str().bold(),
            header.text
        );
    }
    Ok(())
}

fn cmd_regenerate(
    threshold: Option<f32>,
    input: &Path,
    updates: &Path,
    output: Option<&Path>,
    policy: Option<&Path>,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let policy = match policy {
        Some(path) => Some(serde_json::from_str::<RegenerationPolicy>(
            &fs::read_to_string(path)?,
        )?),
        None => None,
    };
    let tailor = build(threshold, policy)?;

    let mut doc = read_document(input)?;
    let updates = SectionUpdates::from_json(&fs::read_to_string(updates)?)?;
    log::debug!(
        "Loaded {} replacements ({} rejected) for {} paragraphs",
        updates.len(),
        updates.rejected().len(),
        doc.paragraph_count()
    );

    // Nothing is written unless every protected section verified.
    let report = tailor.regenerate(&mut doc, &updates)?;

    for outcome in &report.applied {
        eprintln!(
            "{} {} ({} lines, {} links kept)",
            "Rewrote".green(),
            outcome.section,
            outcome.lines.len(),
            outcome.links_preserved
        );
    }
    for skipped in &report.skipped {
        eprintln!("{} {} ({:?})", "Skipped".yellow(), skipped.key, skipped.reason);
    }
    for (section, dropped) in &report.dropped_contacts {
        eprintln!(
            "{} {} no longer contains {}",
            "Note:".cyan(),
            section,
            dropped.join(", ")
        );
    }

    if let Some(path) = report_path {
        fs::write(path, to_json(&report, JsonFormat::Pretty)?)?;
    }
    write_output(output, &to_json(&doc, JsonFormat::Pretty)?)
}

fn cmd_version() {
    println!("{} {}", "resume-tailor".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Resume section detection and format-preserving rewriting");
    println!();
    println!("License: MIT");
}
