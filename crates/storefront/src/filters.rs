//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use waste2worth_core::Price;

static BOLD: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal, checked by tests
    Regex::new(r"\*\*([^*]+)\*\*").unwrap()
});

static ITALIC: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal, checked by tests
    Regex::new(r"\*([^*]+)\*").unwrap()
});

/// Format a decimal amount as Indian rupees.
#[must_use]
pub fn format_inr(amount: Decimal) -> String {
    Price::inr(amount).to_string()
}

/// Escape the HTML-significant characters.
fn escape_html(text: &str) -> String {
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

/// Render assistant text to safe HTML: escape first, then the lightweight
/// markup (`**bold**`, `*italic*`, newlines).
#[must_use]
pub fn render_chat_markup(text: &str) -> String {
    let escaped = escape_html(text);
    let bolded = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    let emphasized = ITALIC.replace_all(&bolded, "<em>$1</em>");
    emphasized.replace('\n', "<br>")
}

/// Render assistant markup to HTML. The output is pre-escaped, so pair it
/// with `|safe` in templates: `{{ message.text|chat_markup|safe }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn chat_markup(text: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(render_chat_markup(&text.to_string()))
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_inr_two_decimals() {
        assert_eq!(format_inr(Decimal::from(599)), "₹599.00");
        assert_eq!(format_inr(Decimal::new(505, 1)), "₹50.50");
    }

    #[test]
    fn test_chat_markup_escapes_html() {
        let html = render_chat_markup("<script>alert(1)</script>");
        assert_eq!(html, "&lt;script&gt;alert(1)&lt;/script&gt;");
    }

    #[test]
    fn test_chat_markup_bold() {
        let html = render_chat_markup("our **eco** products");
        assert_eq!(html, "our <strong>eco</strong> products");
    }

    #[test]
    fn test_chat_markup_italic() {
        let html = render_chat_markup("so *green* today");
        assert_eq!(html, "so <em>green</em> today");
    }

    #[test]
    fn test_chat_markup_bold_before_italic() {
        let html = render_chat_markup("**bold** and *italic*");
        assert_eq!(html, "<strong>bold</strong> and <em>italic</em>");
    }

    #[test]
    fn test_chat_markup_line_breaks() {
        let html = render_chat_markup("line one\nline two");
        assert_eq!(html, "line one<br>line two");
    }

    #[test]
    fn test_chat_markup_markup_inside_escaped_text() {
        let html = render_chat_markup("**<b>**");
        assert_eq!(html, "<strong>&lt;b&gt;</strong>");
    }
}
