//! Markdown to HTML rendering using pulldown-cmark.

use pulldown_cmark::{Options, Parser, html};

/// Options for markdown rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable heading attributes extension (e.g., `# Heading {#custom-id}`)
    pub heading_attributes: bool,
    /// Enable definition lists extension
    pub definition_lists: bool,
}

impl MarkdownOptions {
    /// The common extension set: tables, strikethrough, heading
    /// attributes and definition lists.
    pub fn common() -> Self {
        Self {
            tables: true,
            footnotes: false,
            strikethrough: true,
            heading_attributes: true,
            definition_lists: true,
        }
    }

    /// Convert to pulldown-cmark Options
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        if self.definition_lists {
            opts.insert(Options::ENABLE_DEFINITION_LIST);
        }
        opts
    }
}

/// Render a markdown body to an HTML fragment.
pub fn render_markdown(markdown: &str, options: &MarkdownOptions) -> String {
    let parser = Parser::new_ext(markdown, options.to_pulldown_options());
    let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading() {
        let html = render_markdown("# Hi\n", &MarkdownOptions::common());
        assert_eq!(html, "<h1>Hi</h1>\n");
    }

    #[test]
    fn test_paragraph_and_emphasis() {
        let html = render_markdown("Hello *world*", &MarkdownOptions::common());
        assert_eq!(html, "<p>Hello <em>world</em></p>\n");
    }

    #[test]
    fn test_tables_option() {
        let src = "| a | b |\n|---|---|\n| 1 | 2 |\n";

        let with = render_markdown(src, &MarkdownOptions::common());
        assert!(with.contains("<table>"));

        let without = render_markdown(src, &MarkdownOptions::default());
        assert!(!without.contains("<table>"));
    }

    #[test]
    fn test_strikethrough() {
        let html = render_markdown("~~gone~~", &MarkdownOptions::common());
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_code_block_is_escaped() {
        let html = render_markdown("```\n<b>\n```\n", &MarkdownOptions::common());
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(render_markdown("", &MarkdownOptions::common()), "");
    }
}
