use htmd::HtmlToMarkdown;
use htmd::options::{CodeBlockStyle, HeadingStyle, Options};

/// HTML to Markdown converter with fenced code blocks and ATX headings.
///
/// Pure: the same input always yields the same output.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownConverter;

impl MarkdownConverter {
    pub fn new() -> Self {
        Self
    }

    /// Converts content HTML to Markdown, trimmed. Conversion errors yield
    /// an empty string.
    pub fn convert(&self, html: &str) -> String {
        build_converter().convert(html).map(|md| md.trim().to_string()).unwrap_or_default()
    }
}

fn build_converter() -> HtmlToMarkdown {
    let options = Options {
        code_block_style: CodeBlockStyle::Fenced,
        heading_style: HeadingStyle::Atx,
        ..Default::default()
    };

    HtmlToMarkdown::builder().options(options).skip_tags(vec!["script", "style"]).build()
}
