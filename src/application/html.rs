//! Rendering of user-supplied content.
//!
//! Plain text is escaped and never interpreted as markup. Content explicitly
//! flagged as HTML goes through an allow-list sanitizer.

use std::collections::HashSet;

const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "del", "em", "i", "li", "ol", "p", "pre", "s", "span",
    "strong", "u", "ul",
];

const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

const LINK_REL: &str = "noopener noreferrer nofollow";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentKind {
    #[default]
    Text,
    Html,
}

pub fn render_user_content(content: &str, kind: ContentKind) -> String {
    match kind {
        ContentKind::Text => escape_text(content),
        ContentKind::Html => sanitize_html(content),
    }
}

/// Strips everything outside the allow-list: scripts and styles (with their
/// content), event handler attributes, unknown tags and non-web URL schemes.
pub fn sanitize_html(input: &str) -> String {
    ammonia::Builder::default()
        .tags(ALLOWED_TAGS.iter().copied().collect::<HashSet<_>>())
        .url_schemes(ALLOWED_URL_SCHEMES.iter().copied().collect::<HashSet<_>>())
        .link_rel(Some(LINK_REL))
        .clean(input)
        .to_string()
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
