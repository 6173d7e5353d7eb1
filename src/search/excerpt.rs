//! Context excerpts around matching lines

/// Indices of lines containing any of `terms` (case-insensitive)
///
/// `terms` must already be lowercase.
pub fn matching_lines(lines: &[&str], terms: &[String]) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| {
            let lower = line.to_lowercase();
            terms.iter().any(|term| lower.contains(term.as_str()))
        })
        .map(|(index, _)| index)
        .collect()
}

/// Clusters sorted line indices whose gap is at most `2 * radius + 1`
pub fn group_lines(indices: &[usize], radius: usize) -> Vec<Vec<usize>> {
    let max_gap = 2 * radius + 1;
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for &index in indices {
        match groups.last_mut() {
            Some(group) if group.last().is_some_and(|&last| index - last <= max_gap) => {
                group.push(index);
            }
            _ => groups.push(vec![index]),
        }
    }

    groups
}

/// Builds up to `max_excerpts` excerpts from `body`
///
/// Each excerpt spans `radius` lines of context on both sides of a group of
/// nearby matches.
pub fn excerpts(body: &str, terms: &[String], radius: usize, max_excerpts: usize) -> Vec<String> {
    let lines: Vec<&str> = body.lines().collect();
    let matches = matching_lines(&lines, terms);

    group_lines(&matches, radius)
        .into_iter()
        .take(max_excerpts)
        .filter_map(|group| {
            let first = *group.first()?;
            let last = *group.last()?;
            let start = first.saturating_sub(radius);
            let end = (last + radius + 1).min(lines.len());
            Some(lines[start..end].join("\n"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn numbered(count: usize, hits: &[usize]) -> String {
        (0..count)
            .map(|i| {
                if hits.contains(&i) {
                    format!("line {} mentions Cache", i)
                } else {
                    format!("line {}", i)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_nearby_matches_form_one_excerpt() {
        let body = numbered(30, &[10, 12]);
        let result = excerpts(&body, &terms(&["cache"]), 3, 3);

        assert_eq!(result.len(), 1);
        let lines: Vec<&str> = result[0].lines().collect();
        assert_eq!(lines.first(), Some(&"line 7"));
        assert_eq!(lines.last(), Some(&"line 15"));
    }

    #[test]
    fn test_distant_matches_form_separate_excerpts() {
        let body = numbered(50, &[10, 30]);
        let result = excerpts(&body, &terms(&["cache"]), 3, 3);

        assert_eq!(result.len(), 2);
        assert!(result[0].starts_with("line 7\n"));
        assert!(result[1].starts_with("line 27\n"));
        assert!(result[1].ends_with("line 33"));
    }

    #[test]
    fn test_group_boundary_is_inclusive() {
        // radius 3 merges gaps up to 7
        assert_eq!(group_lines(&[0, 7], 3), vec![vec![0, 7]]);
        assert_eq!(group_lines(&[0, 8], 3), vec![vec![0], vec![8]]);
        assert!(group_lines(&[], 3).is_empty());
    }

    #[test]
    fn test_excerpts_clamped_to_document() {
        let body = numbered(3, &[0, 2]);
        let result = excerpts(&body, &terms(&["cache"]), 3, 3);
        assert_eq!(result, vec![body]);
    }

    #[test]
    fn test_excerpts_capped() {
        let body = numbered(200, &[0, 40, 80, 120, 160]);
        let result = excerpts(&body, &terms(&["cache"]), 3, 3);
        assert_eq!(result.len(), 3);
        assert!(result[2].contains("line 80 mentions"));
    }

    #[test]
    fn test_matching_lines_any_term() {
        let lines = ["Install", "Configure TOKENS", "nothing", "token refresh"];
        assert_eq!(
            matching_lines(&lines, &terms(&["install", "token"])),
            vec![0, 1, 3]
        );
    }
}
