//! site2skill main entry point
//!
//! This is the command-line interface for turning a documentation site into
//! a packaged skill bundle and searching the result.

use anyhow::Context;
use clap::{Parser, Subcommand};
use site2skill::audit::audit_corpus;
use site2skill::bundle::{package, SkillFormat};
use site2skill::config::{load_config_with_hash, Config};
use site2skill::convert::{convert_file, convert_html, decode_html};
use site2skill::crawler::run_crawl;
use site2skill::document::normalize_file;
use site2skill::pipeline::{run_generate, GenerateOptions};
use site2skill::search::{format_json, format_text, search_corpus, SearchOptions};
use site2skill::TracingReporter;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// site2skill: turn a documentation website into an agent skill
///
/// Mirrors a documentation site, converts every page to Markdown with
/// provenance frontmatter, lays the pages out as a skill bundle, validates
/// it and packages it as a `.skill` archive.
#[derive(Parser, Debug)]
#[command(name = "site2skill")]
#[command(version)]
#[command(about = "Turn a documentation website into an agent skill", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the whole pipeline: fetch, convert, normalize, generate, validate, package
    Generate {
        /// URL of the documentation site
        url: String,

        /// Name of the skill
        name: String,

        /// Base output directory for the skill structure
        #[arg(long, default_value = ".claude/skills")]
        output: PathBuf,

        /// Output directory for the .skill file
        #[arg(long, default_value = ".")]
        skill_output: PathBuf,

        /// Temporary directory for processing
        #[arg(long, default_value = "build")]
        temp_dir: PathBuf,

        /// Skip the download step and use the existing crawl in the temp dir
        #[arg(long)]
        skip_fetch: bool,

        /// Remove the temporary directory after completion
        #[arg(long)]
        clean: bool,

        /// Output format: claude or codex
        #[arg(long, default_value = "claude")]
        format: SkillFormat,
    },

    /// Mirror a documentation site into <DIR>/crawl
    Fetch {
        /// URL of the documentation site
        url: String,

        /// Output directory
        #[arg(short, long, default_value = "build/download")]
        output: PathBuf,
    },

    /// Convert one HTML file to a Markdown document
    Convert {
        /// HTML file to convert
        html: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source URL recorded in the frontmatter
        #[arg(long)]
        url: Option<String>,

        /// Fetch timestamp recorded in the frontmatter
        #[arg(long)]
        fetched_at: Option<String>,
    },

    /// Rewrite relative links of a Markdown document as absolute URLs
    Normalize {
        /// Markdown file to normalize
        markdown: PathBuf,

        /// Output file (in place when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a skill directory
    Validate {
        /// Skill directory
        skill_dir: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Package a skill directory as <NAME>.skill
    Package {
        /// Skill directory
        skill_dir: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Search the documents of a skill
    Search {
        /// Free-text query
        query: String,

        /// Skill directory
        #[arg(long, default_value = ".")]
        skill_dir: PathBuf,

        /// Maximum number of results
        #[arg(long)]
        max_results: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site2skill=info,warn"),
            1 => EnvFilter::new("site2skill=debug,info"),
            2 => EnvFilter::new("site2skill=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::debug!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Runs one subcommand; `Ok(false)` means it completed but failed its check
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = load_settings(cli.config.as_ref())?;
    let reporter = TracingReporter;

    match cli.command {
        Command::Generate {
            url,
            name,
            output,
            skill_output,
            temp_dir,
            skip_fetch,
            clean,
            format,
        } => {
            let options = GenerateOptions {
                url,
                skill_name: name,
                output,
                skill_output,
                temp_dir,
                skip_fetch,
                clean,
                format,
            };
            run_generate(&options, &config, &reporter)
                .await
                .context("Skill generation failed")?;
        }

        Command::Fetch { url, output } => {
            let outcome = run_crawl(&url, &output, &config.crawler, &reporter)
                .await
                .context("Failed to fetch site")?;
            tracing::info!(
                "Fetcher finished ({}); files are in {}",
                outcome.status,
                outcome.crawl_dir.display()
            );
        }

        Command::Convert {
            html,
            output,
            url,
            fetched_at,
        } => match output {
            Some(output) => {
                let converted = convert_file(
                    &html,
                    &output,
                    url.as_deref(),
                    fetched_at.as_deref(),
                    &reporter,
                )?;
                if converted {
                    tracing::info!("Converted {} -> {}", html.display(), output.display());
                }
                return Ok(converted);
            }
            None => {
                let bytes = std::fs::read(&html)
                    .with_context(|| format!("Failed to read {}", html.display()))?;
                let source = decode_html(&bytes);
                let Some(document) = convert_html(&source, url.as_deref(), fetched_at.as_deref())
                else {
                    tracing::warn!("No main content found in {}", html.display());
                    return Ok(false);
                };
                print!("{}", document.to_text());
            }
        },

        Command::Normalize { markdown, output } => {
            let output = output.unwrap_or_else(|| markdown.clone());
            let normalized = normalize_file(&markdown, &output, &reporter)?;
            if normalized {
                tracing::info!("Normalized links in {}", output.display());
            }
        }

        Command::Validate { skill_dir, json } => {
            let report = audit_corpus(&skill_dir, &config.audit, &reporter);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            return Ok(report.valid);
        }

        Command::Package { skill_dir, output } => {
            let archive = package(&skill_dir, &output, &reporter)?;
            println!("{}", archive.display());
        }

        Command::Search {
            query,
            skill_dir,
            max_results,
            json,
        } => {
            let mut options = SearchOptions::from(&config.search);
            if let Some(max_results) = max_results {
                options.max_results = max_results;
            }

            let results = search_corpus(&skill_dir, &query, &options, &reporter)?;
            if json {
                println!("{}", format_json(&results)?);
            } else {
                print!("{}", format_text(&results, &query));
            }
        }
    }

    Ok(true)
}
