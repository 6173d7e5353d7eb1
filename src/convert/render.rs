//! Markdown rendering of a parsed HTML subtree
//!
//! A small tree walker in the spirit of an HTML-to-Markdown converter:
//! block elements are separated by blank lines, headings use ATX markers,
//! lists are indented two spaces per level, `<pre>` becomes a fenced block
//! and tables become GFM pipe tables. Output is not post-processed here.

use scraper::{ElementRef, Node};

/// Tags whose content is never rendered
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "title", "button",
];

/// Tags rendered as blank-line separated blocks
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "body", "html", "aside", "figure", "figcaption",
    "details", "summary", "dl", "dt", "dd", "address", "form", "fieldset", "center",
];

/// Renders the children of `root` to Markdown
pub fn render_markdown(root: ElementRef<'_>) -> String {
    let mut renderer = MarkdownRenderer::default();
    renderer.render_children(root);
    renderer.out
}

#[derive(Default)]
struct MarkdownRenderer {
    out: String,
}

impl MarkdownRenderer {
    fn render_children(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push_text(text),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.render_element(child);
                    }
                }
                _ => {}
            }
        }
    }

    fn render_element(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();
        match name {
            _ if SKIPPED_TAGS.contains(&name) => {}
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => self.render_heading(element, name),
            "ul" => self.render_list(element, false),
            "ol" => self.render_list(element, true),
            "pre" => self.render_code_block(element),
            "blockquote" => self.render_blockquote(element),
            "table" => self.render_table(element),
            "hr" => {
                self.ensure_blank_line();
                self.out.push_str("* * *");
                self.ensure_blank_line();
            }
            "br" => {
                self.trim_trailing_spaces();
                self.out.push('\n');
            }
            "a" => self.render_link(element),
            "img" => self.render_image(element),
            "strong" | "b" => self.render_wrapped(element, "**"),
            "em" | "i" => self.render_wrapped(element, "*"),
            "code" | "kbd" | "samp" => {
                let code = element.text().collect::<String>();
                if !code.is_empty() {
                    self.out.push('`');
                    self.out.push_str(&code);
                    self.out.push('`');
                }
            }
            _ if BLOCK_TAGS.contains(&name) => {
                self.ensure_blank_line();
                self.render_children(element);
                self.ensure_blank_line();
            }
            _ => self.render_children(element),
        }
    }

    /// Appends text with HTML whitespace collapsing
    fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            if c.is_whitespace() {
                if !self.out.is_empty() && !self.out.ends_with([' ', '\n']) {
                    self.out.push(' ');
                }
            } else {
                self.out.push(c);
            }
        }
    }

    fn trim_trailing_spaces(&mut self) {
        let trimmed = self.out.trim_end_matches([' ', '\t']).len();
        self.out.truncate(trimmed);
    }

    /// Ends the current block with exactly one blank line
    fn ensure_blank_line(&mut self) {
        self.trim_trailing_spaces();
        if self.out.is_empty() || self.out.ends_with("\n\n") {
            return;
        }
        if self.out.ends_with('\n') {
            self.out.push('\n');
        } else {
            self.out.push_str("\n\n");
        }
    }

    fn render_heading(&mut self, element: ElementRef<'_>, name: &str) {
        let level = name[1..].parse::<usize>().unwrap_or(1);
        let text = inline_text(element);
        if text.is_empty() {
            return;
        }
        self.ensure_blank_line();
        self.out.push_str(&"#".repeat(level));
        self.out.push(' ');
        self.out.push_str(&text);
        self.ensure_blank_line();
    }

    fn render_link(&mut self, element: ElementRef<'_>) {
        let text = inline_text(element);
        let href = element
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|h| !h.is_empty() && !h.starts_with("javascript:"));

        match href {
            Some(href) if !text.is_empty() => {
                self.push_separator();
                self.out.push('[');
                self.out.push_str(&text);
                self.out.push_str("](");
                self.out.push_str(&href.replace(' ', "%20"));
                self.out.push(')');
            }
            _ => self.push_text(&text),
        }
    }

    fn render_image(&mut self, element: ElementRef<'_>) {
        let Some(src) = element.value().attr("src").filter(|s| !s.trim().is_empty()) else {
            return;
        };
        let alt = element.value().attr("alt").unwrap_or("").trim();
        self.push_separator();
        self.out.push_str("![");
        self.out.push_str(alt);
        self.out.push_str("](");
        self.out.push_str(&src.trim().replace(' ', "%20"));
        self.out.push(')');
    }

    fn render_wrapped(&mut self, element: ElementRef<'_>, marker: &str) {
        let text = inline_text(element);
        if text.is_empty() {
            return;
        }
        self.push_separator();
        self.out.push_str(marker);
        self.out.push_str(&text);
        self.out.push_str(marker);
    }

    /// Keeps inline constructs apart from preceding words
    fn push_separator(&mut self) {
        if self
            .out
            .chars()
            .last()
            .is_some_and(|c| c.is_alphanumeric())
        {
            self.out.push(' ');
        }
    }

    fn render_code_block(&mut self, element: ElementRef<'_>) {
        let language = element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.value().name() == "code")
            .flat_map(|code| code.value().classes().collect::<Vec<_>>())
            .chain(element.value().classes())
            .find_map(|class| {
                class
                    .strip_prefix("language-")
                    .or_else(|| class.strip_prefix("lang-"))
            })
            .unwrap_or("");

        let code = element.text().collect::<String>();

        self.ensure_blank_line();
        self.out.push_str("```");
        self.out.push_str(language);
        self.out.push('\n');
        self.out.push_str(code.trim_end_matches('\n'));
        self.out.push_str("\n```");
        self.ensure_blank_line();
    }

    fn render_list(&mut self, element: ElementRef<'_>, ordered: bool) {
        self.ensure_blank_line();

        let start = element
            .value()
            .attr("start")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1);

        let items = element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.value().name() == "li");

        for (index, item) in items.enumerate() {
            let marker = if ordered {
                format!("{}. ", start + index)
            } else {
                "- ".to_string()
            };
            let indent = " ".repeat(marker.len());

            let content = render_fragment(item);
            let mut lines = content.lines().filter(|line| !line.trim().is_empty());

            self.out.push_str(&marker);
            if let Some(first) = lines.next() {
                self.out.push_str(first);
            }
            self.out.push('\n');
            for line in lines {
                self.out.push_str(&indent);
                self.out.push_str(line);
                self.out.push('\n');
            }
        }

        self.ensure_blank_line();
    }

    fn render_blockquote(&mut self, element: ElementRef<'_>) {
        let content = render_fragment(element);
        if content.is_empty() {
            return;
        }
        self.ensure_blank_line();
        for line in content.lines() {
            if line.is_empty() {
                self.out.push_str(">\n");
            } else {
                self.out.push_str("> ");
                self.out.push_str(line);
                self.out.push('\n');
            }
        }
        self.ensure_blank_line();
    }

    fn render_table(&mut self, element: ElementRef<'_>) {
        let rows: Vec<Vec<String>> = element
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "tr")
            .map(|row| {
                row.children()
                    .filter_map(ElementRef::wrap)
                    .filter(|cell| matches!(cell.value().name(), "th" | "td"))
                    .map(|cell| inline_text(cell).replace('|', "\\|"))
                    .collect::<Vec<_>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect();

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return;
        }

        self.ensure_blank_line();
        for (index, row) in rows.iter().enumerate() {
            self.out.push('|');
            for column in 0..columns {
                self.out.push(' ');
                self.out.push_str(row.get(column).map_or("", String::as_str));
                self.out.push_str(" |");
            }
            self.out.push('\n');

            if index == 0 {
                self.out.push('|');
                for _ in 0..columns {
                    self.out.push_str(" --- |");
                }
                self.out.push('\n');
            }
        }
        self.ensure_blank_line();
    }
}

/// Renders an element's children on their own and trims the result
fn render_fragment(element: ElementRef<'_>) -> String {
    render_markdown(element).trim().to_string()
}

/// Renders an element's children as a single line of inline Markdown
fn inline_text(element: ElementRef<'_>) -> String {
    render_fragment(element)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn render_body(html: &str) -> String {
        let doc = Html::parse_document(html);
        let selector = Selector::parse("body").unwrap();
        let body = doc.select(&selector).next().unwrap();
        render_markdown(body).trim().to_string()
    }

    #[test]
    fn test_atx_headings() {
        let md = render_body("<h1>Title</h1><h2>Sub <code>x</code></h2><h6>Deep</h6>");
        assert_eq!(md, "# Title\n\n## Sub `x`\n\n###### Deep");
    }

    #[test]
    fn test_paragraphs_and_whitespace() {
        let md = render_body("<p>  Hello\n   world  </p><p>Second</p>");
        assert_eq!(md, "Hello world\n\nSecond");
    }

    #[test]
    fn test_links_and_emphasis() {
        let md = render_body(
            r#"<p>Read <a href="../guide.html">the <b>guide</b></a> or <a href="javascript:void(0)">this</a> <em>now</em>.</p>"#,
        );
        assert_eq!(
            md,
            "Read [the **guide**](../guide.html) or this *now*."
        );
    }

    #[test]
    fn test_image() {
        let md = render_body(r#"<p><img src="img/a b.png" alt="Arch"></p>"#);
        assert_eq!(md, "![Arch](img/a%20b.png)");
    }

    #[test]
    fn test_code_block_with_language() {
        let md = render_body(
            "<pre><code class=\"language-rust\">fn main() {\n    println!(\"hi\");\n}\n</code></pre>",
        );
        assert_eq!(md, "```rust\nfn main() {\n    println!(\"hi\");\n}\n```");
    }

    #[test]
    fn test_nested_lists() {
        let md = render_body("<ul><li>One<ul><li>Inner</li></ul></li><li>Two</li></ul><ol start=\"3\"><li>C</li><li>D</li></ol>");
        assert_eq!(md, "- One\n  - Inner\n- Two\n\n3. C\n4. D");
    }

    #[test]
    fn test_blockquote() {
        let md = render_body("<blockquote><p>Quoted</p><p>Twice</p></blockquote>");
        assert_eq!(md, "> Quoted\n>\n> Twice");
    }

    #[test]
    fn test_table() {
        let md = render_body(
            "<table><thead><tr><th>Name</th><th>Type</th></tr></thead>\
             <tbody><tr><td>id</td><td>a|b</td></tr><tr><td>only</td></tr></tbody></table>",
        );
        assert_eq!(
            md,
            "| Name | Type |\n| --- | --- |\n| id | a\\|b |\n| only |  |"
        );
    }

    #[test]
    fn test_skipped_tags() {
        let md = render_body("<p>Visible</p><template><p>Hidden</p></template><button>Click</button>");
        assert_eq!(md, "Visible");
    }
}
