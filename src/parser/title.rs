//! Title detection and removal for message bodies
//!
//! A message's title, if any, is the text of its first bold run (`<strong>` or
//! `<b>`). Extraction and removal share that rule so stored content never
//! duplicates a detected title.
//!
//! Note the extraction rule is deliberately loose: it takes the first bold run
//! anywhere in the fragment, not only a bold run in leading position. A message
//! whose first line is plain text but that bolds a phrase later still gets that
//! phrase as its title. This matches the behavior the preview markup has been
//! imported with historically, so it is kept as-is.

use regex::Regex;
use ego_tree::{NodeId, NodeRef};
use scraper::{Html, Node, Selector};
use std::fmt::Write as _;
use std::ops::Deref;
use std::sync::LazyLock;

use crate::parser::sanitize::strip_html_tags;

static BOLD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("strong, b").unwrap());

/// Tags serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Extract a title candidate from a message body fragment
///
/// Returns the trimmed text of the first bold run when one exists and has
/// non-whitespace text, otherwise the first non-empty line of the detagged
/// text. A blank result means "no title"; callers treat it as absent.
///
/// # Examples
///
/// ```
/// use telepost::parser::title::extract_title;
///
/// assert_eq!(extract_title("<strong>Hello</strong><br>World"), "Hello");
/// assert_eq!(extract_title("Plain first line<br>second"), "Plain first line");
/// assert_eq!(extract_title(""), "");
/// ```
#[must_use]
pub fn extract_title(text_html: &str) -> String {
    let trimmed = text_html.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(trimmed);
    if let Some(bold) = fragment.select(&BOLD_SELECTOR).next() {
        let candidate = bold.text().collect::<String>().trim().to_string();
        if !candidate.is_empty() {
            return candidate;
        }
    }

    first_nonempty_line(&strip_html_tags(trimmed))
}

/// Remove a previously extracted title from a message body fragment
///
/// Parses the fragment and rebuilds it without the first bold run when that
/// run's trimmed text equals `title_text` exactly; one `<br>` immediately
/// following the removed run is consumed along with it. Siblings and the rest
/// of the structure are preserved. When the first bold run does not match, or
/// `title_text` is blank, the input is returned unchanged, which also makes a
/// second application with the same title a no-op.
///
/// # Examples
///
/// ```
/// use telepost::parser::title::remove_title;
///
/// assert_eq!(remove_title("<strong>Hello</strong><br>World", "Hello"), "World");
/// assert_eq!(remove_title("<strong>Other</strong> text", "Hello"), "<strong>Other</strong> text");
/// ```
#[must_use]
pub fn remove_title(text_html: &str, title_text: &str) -> String {
    let title = title_text.trim();
    if title.is_empty() || text_html.is_empty() {
        return text_html.to_string();
    }

    let fragment = Html::parse_fragment(text_html);
    let target = fragment
        .select(&BOLD_SELECTOR)
        .next()
        .filter(|bold| bold.text().collect::<String>().trim() == title)
        .map(|bold| bold.id());

    let Some(target) = target else {
        return text_html.to_string();
    };

    let mut out = String::new();
    let mut consume_break = false;
    write_children(*fragment.root_element(), target, &mut consume_break, &mut out);
    out
}

/// Regex-based title removal for the fallback parser
///
/// Two ordered substitution passes, each removing at most one match anchored
/// at the start of the string: first a bold-wrapped exact match of the title
/// (optionally followed by a line break), then a plain-text exact match
/// (optionally followed by a line break). The second pass is an idempotent
/// no-op when the first already matched.
#[must_use]
pub fn remove_title_lossy(text_html: &str, title_text: &str) -> String {
    let title = title_text.trim();
    if title.is_empty() || text_html.is_empty() {
        return text_html.to_string();
    }

    let escaped = regex::escape(title);
    let mut result = text_html.to_string();

    if let Ok(bold_re) = Regex::new(&format!(
        r"(?is)^\s*<\s*(?:strong|b)[^>]*>\s*{escaped}\s*<\s*/\s*(?:strong|b)\s*>\s*(?:<br\s*/?\s*>\s*)?"
    )) {
        result = bold_re.replace(&result, "").to_string();
    }

    if let Ok(plain_re) = Regex::new(&format!(r"(?is)^\s*{escaped}\s*(?:<br\s*/?\s*>\s*)?")) {
        result = plain_re.replace(&result, "").to_string();
    }

    result
}

fn first_nonempty_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Serialize the children of `parent`, excluding the target subtree
///
/// `consume_break` is set when the target has just been skipped; it swallows
/// whitespace-only text nodes and one `<br>` that follow the removed run.
fn write_children(
    parent: NodeRef<'_, Node>,
    target: NodeId,
    consume_break: &mut bool,
    out: &mut String,
) {
    for child in parent.children() {
        if child.id() == target {
            *consume_break = true;
            continue;
        }

        if *consume_break {
            match child.value() {
                Node::Text(text) if text.trim().is_empty() => continue,
                Node::Element(el) if el.name() == "br" => {
                    *consume_break = false;
                    continue;
                }
                _ => *consume_break = false,
            }
        }

        write_node(child, target, consume_break, out);
    }
}

fn write_node(node: NodeRef<'_, Node>, target: NodeId, consume_break: &mut bool, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&html_escape::encode_text(text.deref())),
        Node::Element(el) => {
            let name = el.name();
            out.push('<');
            out.push_str(name);
            for (attr, value) in el.attrs() {
                let _ = write!(
                    out,
                    " {attr}=\"{}\"",
                    html_escape::encode_double_quoted_attribute(value)
                );
            }
            out.push('>');
            if !VOID_ELEMENTS.contains(&name) {
                write_children(node, target, consume_break, out);
                let _ = write!(out, "</{name}>");
            }
        }
        Node::Comment(comment) => {
            let _ = write!(out, "<!--{}-->", comment.deref());
        }
        _ => {}
    }
}
