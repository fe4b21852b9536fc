//! MessageML / PresentationML text helpers.

use std::sync::LazyLock;

use regex::Regex;

static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*(br|/p|/div|/li|/tr|/h[1-6])\b[^>]*>").expect("valid regex")
});
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Escape text for inclusion in a MessageML body.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wrap plain text in a `<messageML>` envelope.
pub fn wrap(text: &str) -> String {
    format!("<messageML>{}</messageML>", escape(text))
}

/// Strip markup from a PresentationML body and decode entities.
pub fn to_plain_text(markup: &str) -> String {
    let spaced = BLOCK_TAG.replace_all(markup, " ");
    let stripped = ANY_TAG.replace_all(&spaced, "");
    let decoded = decode_entities(&stripped);
    WHITESPACE.replace_all(decoded.trim(), " ").into_owned()
}

fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(text, |caps: &regex::Captures| {
        let raw = &caps[1];
        let code = match raw.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    // &amp; last so "&amp;lt;" stays "&lt;"
    numeric
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::{escape, to_plain_text, wrap};

    #[test]
    fn wraps_and_escapes() {
        assert_eq!(wrap("a<b & \"c\""), "<messageML>a&lt;b &amp; &quot;c&quot;</messageML>");
        assert_eq!(escape("it's"), "it&apos;s");
    }

    #[test]
    fn strips_presentation_ml() {
        let body = r#"<div data-format="PresentationML" data-version="2.0" class="wysiwyg"><p>Hello <b>wor</b>ld</p><p>second&nbsp;line</p></div>"#;
        assert_eq!(to_plain_text(body), "Hello world second line");
    }

    #[test]
    fn decodes_entities_once() {
        assert_eq!(to_plain_text("&amp;lt; &#65;&#x42; &gt;"), "&lt; AB >");
    }

    #[test]
    fn line_breaks_become_spaces() {
        assert_eq!(to_plain_text("one<br/>two"), "one two");
    }
}
