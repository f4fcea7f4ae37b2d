pub mod frontmatter;
pub mod markdown;

pub use frontmatter::compose as compose_frontmatter;
pub use markdown::MarkdownConverter;
