//! Crawl orchestration
//!
//! Runs the external fetcher as a child process, streams its output through
//! a bounded channel, keeps a live progress line on stderr and classifies
//! the exit status. Timeouts are fatal; any other non-clean exit leaves the
//! downloaded pages in place and is reported as a warning.

use crate::config::CrawlerConfig;
use crate::crawler::command::{build_fetch_args, resolve_program};
use crate::crawler::progress::{format_elapsed, CrawlProgress};
use crate::crawler::status::ExitClass;
use crate::report::Reporter;
use crate::url::{extract_domain, validate_target_url};
use crate::{Result, SkillError, UrlError};
use std::collections::BTreeSet;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Lines buffered between the output readers and the progress loop
const LINE_CHANNEL_CAPACITY: usize = 256;

/// Name of the crawl directory under the output directory
pub const CRAWL_DIR_NAME: &str = "crawl";

/// Result of one crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// How the fetcher exited
    pub status: ExitClass,
    /// URLs the fetcher reported as saved
    pub downloaded: BTreeSet<String>,
    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
    /// Directory holding the mirrored site
    pub crawl_dir: PathBuf,
}

/// Drives the external fetcher for one target
pub struct CrawlOrchestrator {
    config: CrawlerConfig,
    show_progress: bool,
}

impl CrawlOrchestrator {
    /// Creates an orchestrator for the given crawler settings
    pub fn new(config: CrawlerConfig) -> Self {
        Self {
            config,
            show_progress: true,
        }
    }

    /// Enables or disables the live progress line
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Mirrors `target` into `<output_dir>/crawl`
    ///
    /// Preconditions (valid URL, fetcher present) are checked before the
    /// crawl directory is touched. An existing crawl directory is replaced.
    /// Ctrl-C stops the fetcher and keeps what it downloaded.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - The fetcher ran, possibly with partial success
    /// * `Err(SkillError)` - A precondition failed or the crawl timed out
    pub async fn run(
        &self,
        target: &str,
        output_dir: &Path,
        reporter: &dyn Reporter,
    ) -> Result<CrawlOutcome> {
        self.run_until(target, output_dir, reporter, interrupt_signal())
            .await
    }

    /// Same as [`run`](Self::run), with `cancel` standing in for Ctrl-C
    ///
    /// When `cancel` completes the fetcher is stopped and the outcome is
    /// [`ExitClass::Interrupted`].
    pub async fn run_until<F>(
        &self,
        target: &str,
        output_dir: &Path,
        reporter: &dyn Reporter,
        cancel: F,
    ) -> Result<CrawlOutcome>
    where
        F: Future<Output = ()>,
    {
        let url = validate_target_url(target)?;
        let domain =
            extract_domain(&url).ok_or_else(|| UrlError::MissingDomain(target.to_string()))?;
        let program = resolve_program(&self.config.program)?;

        let crawl_dir = output_dir.join(CRAWL_DIR_NAME);
        prepare_crawl_dir(output_dir, &crawl_dir)?;

        let args = build_fetch_args(url.as_str(), &domain, &crawl_dir, &self.config);
        reporter.info(&format!("Downloading {} to {}...", url, crawl_dir.display()));
        tracing::debug!("Fetcher command: {} {}", program.display(), args.join(" "));

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SkillError::file("run", &program, e))?;

        let (tx, mut rx) = mpsc::channel(LINE_CHANNEL_CAPACITY);
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, tx.clone()));
        }
        drop(tx);

        let started = Instant::now();
        let line_timeout = Duration::from_secs(self.config.line_timeout_secs);
        let deadline = (self.config.overall_timeout_secs > 0)
            .then(|| started + Duration::from_secs(self.config.overall_timeout_secs));

        tokio::pin!(cancel);
        let mut output_closed = false;
        let mut progress = CrawlProgress::new();

        // Once both pipes close, the fetcher gets one line timeout to exit
        let status = loop {
            tokio::select! {
                received = tokio::time::timeout(line_timeout, rx.recv()), if !output_closed => {
                    match received {
                        Ok(Some(line)) => {
                            tracing::trace!("fetcher: {}", line);
                            if progress.observe(&line) && self.show_progress {
                                print_progress(&progress.status_line(started.elapsed()));
                            }
                        }
                        Ok(None) => output_closed = true,
                        Err(_) => {
                            self.finish_progress();
                            stop_child(&mut child).await;
                            return Err(SkillError::CrawlTimeout {
                                seconds: self.config.line_timeout_secs,
                                what: "fetcher output",
                            });
                        }
                    }
                }
                waited = tokio::time::timeout(line_timeout, child.wait()), if output_closed => {
                    match waited {
                        Ok(Ok(exit)) => break ExitClass::from_code(exit.code()),
                        Ok(Err(e)) => {
                            self.finish_progress();
                            return Err(SkillError::file("wait for", &program, e));
                        }
                        Err(_) => {
                            self.finish_progress();
                            stop_child(&mut child).await;
                            return Err(SkillError::CrawlTimeout {
                                seconds: self.config.line_timeout_secs,
                                what: "the fetcher exiting",
                            });
                        }
                    }
                }
                _ = wait_for_deadline(deadline) => {
                    self.finish_progress();
                    stop_child(&mut child).await;
                    return Err(SkillError::CrawlTimeout {
                        seconds: self.config.overall_timeout_secs,
                        what: "the crawl finishing",
                    });
                }
                _ = &mut cancel => {
                    stop_child(&mut child).await;
                    break ExitClass::Interrupted;
                }
            }
        };

        self.finish_progress();
        if let Some(warning) = status.warning() {
            reporter.warn(&warning);
        }

        let elapsed = started.elapsed();
        let downloaded = progress.into_downloaded();
        reporter.info(&format!(
            "Download complete: {} pages in {}",
            downloaded.len(),
            format_elapsed(elapsed)
        ));

        Ok(CrawlOutcome {
            status,
            downloaded,
            elapsed,
            crawl_dir,
        })
    }

    fn finish_progress(&self) {
        if self.show_progress {
            eprintln!();
        }
    }
}

/// Runs a complete crawl operation
///
/// This is the main entry point for fetching a site. It will:
/// 1. Validate the target URL and locate the fetcher
/// 2. Recreate `<output_dir>/crawl`
/// 3. Stream the fetcher's output while showing progress
/// 4. Classify the exit status
///
/// # Arguments
///
/// * `target` - The documentation site URL
/// * `output_dir` - Directory that receives the `crawl/` subdirectory
/// * `config` - The crawler configuration
/// * `reporter` - Sink for progress and warning messages
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The crawl ran to completion or partial success
/// * `Err(SkillError)` - A precondition failed or the crawl timed out
pub async fn run_crawl(
    target: &str,
    output_dir: &Path,
    config: &CrawlerConfig,
    reporter: &dyn Reporter,
) -> Result<CrawlOutcome> {
    CrawlOrchestrator::new(config.clone())
        .run(target, output_dir, reporter)
        .await
}

fn prepare_crawl_dir(output_dir: &Path, crawl_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| SkillError::file("create directory", output_dir, e))?;
    if crawl_dir.exists() {
        std::fs::remove_dir_all(crawl_dir)
            .map_err(|e| SkillError::file("remove directory", crawl_dir, e))?;
    }
    std::fs::create_dir_all(crawl_dir)
        .map_err(|e| SkillError::file("create directory", crawl_dir, e))?;
    Ok(())
}

/// Forwards every line of `reader` into the channel, decoding lossily
async fn forward_lines<R>(reader: R, tx: mpsc::Sender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(['\r', '\n'])
                    .to_string();
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::debug!("Stopped reading fetcher output: {}", e);
                break;
            }
        }
    }
}

/// Completes on Ctrl-C; never completes when the handler cannot be installed
async fn interrupt_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::debug!("Interrupt handling unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn stop_child(child: &mut Child) {
    if let Err(e) = child.kill().await {
        tracing::debug!("Failed to stop fetcher: {}", e);
    }
}

fn print_progress(line: &str) {
    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "{}", line);
    let _ = stderr.flush();
}
