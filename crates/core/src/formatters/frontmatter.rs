use crate::result::PageMeta;

/// Frontmatter delimiter line.
pub const DELIMITER: &str = "---";

/// Prepends a `---` delimited metadata block to `body`.
///
/// Field order is fixed: title, url, domain, crawled_at, content_hash,
/// excerpt. The block, a blank line, then the body.
pub fn compose(body: &str, meta: &PageMeta) -> String {
    let fields = [
        ("title", meta.title.as_str()),
        ("url", meta.url.as_str()),
        ("domain", meta.domain.as_str()),
        ("crawled_at", meta.crawled_at.as_str()),
        ("content_hash", meta.content_hash.as_str()),
        ("excerpt", meta.excerpt.as_str()),
    ];

    let mut output = String::with_capacity(body.len() + 512);
    output.push_str(DELIMITER);
    output.push('\n');
    for (key, value) in fields {
        output.push_str(&format!("{key}: {}\n", quote(value)));
    }
    output.push_str(DELIMITER);
    output.push_str("\n\n");
    output.push_str(body);

    output
}

/// Double-quotes a value for the block. Backslashes and quotes are escaped;
/// each run of line breaks collapses to one space.
fn quote(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('"');

    let mut in_break = false;
    for ch in value.chars() {
        match ch {
            '\r' | '\n' => {
                if !in_break {
                    escaped.push(' ');
                }
                in_break = true;
                continue;
            }
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            _ => escaped.push(ch),
        }
        in_break = false;
    }

    escaped.push('"');
    escaped
}
