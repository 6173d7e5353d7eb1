//! Integration tests for the skill pipeline
//!
//! These tests seed a crawl directory (or use a fake fetcher script) and run
//! the pipeline end-to-end through packaging, then search the bundle.

use site2skill::bundle::SkillFormat;
use site2skill::config::{Config, CrawlerConfig};
use site2skill::pipeline::{run_generate, GenerateOptions};
use site2skill::search::{format_json, search_corpus, SearchOptions};
use site2skill::{Document, MemoryReporter};
use std::fs;
use std::io::Read;
use std::path::Path;

const GUIDE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Caching Guide</title><script>track()</script></head>
<body>
  <header class="site-header">Example Docs</header>
  <div class="sidebar"><a href="/other">Other</a></div>
  <main>
    <h1>Caching</h1>
    <p>The cache stores responses. Configure the cache with <code>ttl</code>.</p>
    <h2>Invalidation</h2>
    <ul>
      <li>Purge the cache by key</li>
      <li>See <a href="../reference/api.html#purge">the purge API</a></li>
    </ul>
    <p>Clearing the cache is safe. A warm cache is fast.</p>
  </main>
  <footer>Copyright</footer>
</body>
</html>"#;

const REFERENCE_PAGE: &str = r#"<html>
<head><title>API Reference</title></head>
<body>
  <article>
    <h1>API Reference</h1>
    <p>Every endpoint supports the cache header.</p>
    <pre><code class="language-bash">curl https://api.example.com/v1/purge</code></pre>
    <table>
      <tr><th>Name</th><th>Type</th></tr>
      <tr><td>key</td><td>string</td></tr>
    </table>
  </article>
</body>
</html>"#;

/// Writes a small mirrored site in the layout the fetcher produces
fn seed_crawl(crawl_dir: &Path) {
    let guide = crawl_dir.join("docs.example.com/guide");
    let reference = crawl_dir.join("docs.example.com/reference");
    fs::create_dir_all(&guide).unwrap();
    fs::create_dir_all(&reference).unwrap();
    fs::write(guide.join("caching.html"), GUIDE_PAGE).unwrap();
    fs::write(reference.join("api.html"), REFERENCE_PAGE).unwrap();
    fs::write(guide.join("frames.html"), "<frameset><frame src=\"a\"></frameset>").unwrap();
}

fn test_options(root: &Path) -> GenerateOptions {
    let mut options = GenerateOptions::new("https://docs.example.com/guide/", "exampledocs");
    options.temp_dir = root.join("build");
    options.output = root.join("skills");
    options.skill_output = root.join("dist");
    options
}

#[tokio::test]
async fn test_skip_fetch_pipeline_through_search() {
    let root = tempfile::tempdir().unwrap();
    let mut options = test_options(root.path());
    options.skip_fetch = true;
    seed_crawl(&options.crawl_dir());

    let reporter = MemoryReporter::new();
    let summary = run_generate(&options, &Config::default(), &reporter)
        .await
        .expect("pipeline should succeed");

    // Conversion: two pages converted, the frameset page skipped with a warning
    assert_eq!(summary.converted.processed, 2);
    assert_eq!(summary.converted.skipped, 1);
    assert!(reporter
        .warnings()
        .iter()
        .any(|w| w.contains("frames.html")));

    // Documents carry provenance and absolute links, with boilerplate gone
    let guide_text = fs::read_to_string(summary.skill_dir.join("docs/caching.md")).unwrap();
    let guide = Document::from_text(&guide_text, "Untitled");
    assert_eq!(guide.title, "Caching Guide");
    assert_eq!(
        guide.source_url.as_deref(),
        Some("https://docs.example.com/guide/caching")
    );
    assert!(guide.fetched_at.is_some());
    assert!(guide.body.starts_with("# Caching\n"));
    assert!(guide
        .body
        .contains("(https://docs.example.com/reference/api.html#purge)"));
    assert!(!guide.body.contains("Example Docs"));
    assert!(!guide.body.contains("Copyright"));
    assert!(!guide.body.contains("track()"));

    let reference_text = fs::read_to_string(summary.skill_dir.join("docs/api.md")).unwrap();
    assert!(reference_text.contains("```bash\ncurl https://api.example.com/v1/purge\n```"));
    assert!(reference_text.contains("| Name | Type |"));

    // Audit and archive
    assert!(summary.audit.valid);
    assert_eq!(summary.audit.size.largest.len(), 2);
    assert_eq!(summary.archive, root.path().join("dist/exampledocs.skill"));

    let mut archive = zip::ZipArchive::new(fs::File::open(&summary.archive).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    assert_eq!(
        names,
        vec!["SKILL.md", "docs/", "docs/api.md", "docs/caching.md"]
    );
    let mut skill_md = String::new();
    archive
        .by_name("SKILL.md")
        .unwrap()
        .read_to_string(&mut skill_md)
        .unwrap();
    assert!(skill_md.contains("description: \"EXAMPLEDOCS documentation assistant\""));

    // Search over the generated bundle
    let results = search_corpus(
        &summary.skill_dir,
        "cache",
        &SearchOptions::default(),
        &reporter,
    )
    .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].file, "docs/caching.md");
    assert!(results[0].matches > results[1].matches);
    assert_eq!(results[0].title, "Caching Guide");
    assert_eq!(results[1].file, "docs/api.md");
    assert_eq!(results[1].source_url, "https://docs.example.com/reference/api");
    assert!(!results[0].excerpts.is_empty());

    let json: serde_json::Value = serde_json::from_str(&format_json(&results).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["title"], "Caching Guide");
}

#[tokio::test]
async fn test_codex_format_has_plain_descriptor() {
    let root = tempfile::tempdir().unwrap();
    let mut options = test_options(root.path());
    options.skip_fetch = true;
    options.format = SkillFormat::Codex;
    seed_crawl(&options.crawl_dir());

    let summary = run_generate(&options, &Config::default(), &MemoryReporter::new())
        .await
        .unwrap();

    let descriptor = fs::read_to_string(summary.skill_dir.join("SKILL.md")).unwrap();
    assert!(descriptor.starts_with("# EXAMPLEDOCS Documentation Skill"));
    // Codex descriptors carry no frontmatter; the audit still passes with warnings
    assert!(summary.audit.valid);
    assert!(summary
        .audit
        .warnings
        .iter()
        .any(|w| w.contains("frontmatter")));
}

#[tokio::test]
async fn test_strict_size_failure_still_packages() {
    let root = tempfile::tempdir().unwrap();
    let mut options = test_options(root.path());
    options.skip_fetch = true;
    seed_crawl(&options.crawl_dir());

    let mut config = Config::default();
    config.audit.size_budget_bytes = 16;
    config.audit.strict_size = true;

    let reporter = MemoryReporter::new();
    let summary = run_generate(&options, &config, &reporter).await.unwrap();

    assert!(!summary.audit.valid);
    assert!(summary.archive.is_file());
    assert!(reporter
        .warnings()
        .iter()
        .any(|w| w.contains("Validation failed")));
}

#[cfg(unix)]
#[tokio::test]
async fn test_full_pipeline_with_fake_fetcher() {
    use std::os::unix::fs::PermissionsExt;

    let root = tempfile::tempdir().unwrap();
    let bin = tempfile::tempdir().unwrap();

    // Mirrors one page into the directory given with -P, logging like wget
    let script = bin.path().join("fake-wget");
    fs::write(
        &script,
        r#"#!/bin/sh
dir=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-P" ]; then dir="$2"; fi
  shift
done
mkdir -p "$dir/docs.example.com/guide"
cat > "$dir/docs.example.com/guide/index.html" <<'HTML'
<html><head><title>Welcome</title></head><body><main><p>Start with the cache.</p></main></body></html>
HTML
echo "--2024-03-01 12:00:00--  https://docs.example.com/guide/" 1>&2
echo "Saving to: 'docs.example.com/guide/index.html'" 1>&2
echo "--2024-03-01 12:00:01--  https://docs.example.com/guide/missing" 1>&2
echo "ERROR 404: Not Found." 1>&2
exit 8
"#,
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let config = Config {
        crawler: CrawlerConfig {
            program: script.display().to_string(),
            ..CrawlerConfig::default()
        },
        ..Config::default()
    };

    // Leftovers from an earlier run are removed before fetching
    let options = test_options(root.path());
    fs::create_dir_all(options.markdown_dir()).unwrap();
    fs::write(options.markdown_dir().join("stale.md"), "stale").unwrap();

    let reporter = MemoryReporter::new();
    let summary = run_generate(&options, &config, &reporter).await.unwrap();

    let crawl = summary.crawl.expect("fetch step ran");
    assert!(crawl.status.is_partial());
    assert_eq!(crawl.downloaded.len(), 1);
    assert!(reporter.warnings().iter().any(|w| w.contains("exit code 8")));

    assert_eq!(summary.converted.processed, 1);
    let doc = fs::read_to_string(summary.skill_dir.join("docs/index.md")).unwrap();
    assert!(doc.contains("source_url: \"https://docs.example.com/guide/index\""));
    assert!(!summary.skill_dir.join("docs/stale.md").exists());
    assert!(summary.archive.is_file());
}
