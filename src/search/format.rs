//! Search result output

use crate::search::SearchResult;
use crate::Result;

const RULE_WIDTH: usize = 40;

/// Formats results as a human-readable numbered list
pub fn format_text(results: &[SearchResult], query: &str) -> String {
    if results.is_empty() {
        return format!("No matches found for '{}'.\n", query);
    }

    let mut out = String::new();
    out.push_str(&format!("Search Results for '{}'\n", query));
    out.push_str(&format!("Found matches in {} files.\n\n", results.len()));

    for (i, result) in results.iter().enumerate() {
        out.push_str(&format!("{}. {} ({})\n", i + 1, result.file, result.title));
        out.push_str(&format!(
            "   Matches: {} | Source: {}\n",
            result.matches,
            or_unknown(&result.source_url)
        ));
        out.push_str(&format!("   Fetched: {}\n", or_unknown(&result.fetched_at)));
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push('\n');

        for (j, excerpt) in result.excerpts.iter().enumerate() {
            if j > 0 {
                out.push_str("   ...\n");
            }
            out.push_str(excerpt);
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

/// Formats results as a pretty-printed JSON array
pub fn format_json(results: &[SearchResult]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "Unknown"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SearchResult {
        SearchResult {
            file: "docs/cache.md".to_string(),
            title: "Caching".to_string(),
            matches: 5,
            excerpts: vec!["first".to_string(), "second".to_string()],
            source_url: "https://docs.example.com/cache".to_string(),
            fetched_at: String::new(),
        }
    }

    #[test]
    fn test_format_text() {
        let text = format_text(&[sample()], "cache");
        assert!(text.starts_with("Search Results for 'cache'\nFound matches in 1 files.\n"));
        assert!(text.contains("1. docs/cache.md (Caching)\n"));
        assert!(text.contains("Matches: 5 | Source: https://docs.example.com/cache\n"));
        assert!(text.contains("Fetched: Unknown\n"));
        assert!(text.contains("first\n   ...\nsecond\n"));
    }

    #[test]
    fn test_format_text_empty() {
        assert_eq!(format_text(&[], "nothing"), "No matches found for 'nothing'.\n");
    }

    #[test]
    fn test_format_json_shape() {
        let json = format_json(&[sample()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value[0];
        assert_eq!(first["file"], "docs/cache.md");
        assert_eq!(first["title"], "Caching");
        assert_eq!(first["matches"], 5);
        assert_eq!(first["excerpts"].as_array().unwrap().len(), 2);
        assert_eq!(first["source_url"], "https://docs.example.com/cache");
        assert_eq!(first["fetched_at"], "");
    }
}
