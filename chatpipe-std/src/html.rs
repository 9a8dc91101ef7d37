//! HTML reduction transformer.
//!
//! Chat bodies arrive as rendered HTML. [`ReduceHtml`] brings them back to
//! the plain text a user typed, so filters and commands match on `!echo hi`
//! rather than `<p>!echo hi</p>`.

use chatpipe_core::{BoxError, ChatMessage, Stage, StageError};
use regex::Regex;
use std::sync::LazyLock;

static PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)</?p[\w =#"':/\\.\-?]*>"#).expect("paragraph pattern is valid")
});

static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)</?a[\w -=#"':/\\.\-?]*>"#).expect("anchor pattern is valid")
});

static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[\w -=#"':/\\.\-?]*>"#).expect("image pattern is valid")
});

static ALT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"alt="([\w:()]+)""#).expect("alt pattern is valid"));

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern is valid"));

static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

const STAGE: &str = "reduce_html";

/// Turns a rendered chat body back into plain text.
///
/// - paragraph and link tags are removed, link text is kept
/// - the first `<kbd>` pair (custom link targets) is unwrapped
/// - emote images become their `alt` text; the mirrored and plain `echo`
///   emotes become `(((` and `)))`
/// - `<br>` becomes a newline, any other tag is dropped
/// - common entities are unescaped and the result is trimmed
///
/// An emote image without a usable `alt` is a [`StageError::Malformed`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ReduceHtml;

impl ReduceHtml {
    /// Reduce a body.
    pub fn reduce(&self, html: &str) -> Result<String, StageError> {
        let text = PARAGRAPH.replace_all(html, "");
        let text = ANCHOR.replace_all(&text, "");
        let text = text.replacen("<kbd>", "", 1).replacen("</kbd>", "", 1);
        let text = replace_emotes(&text)?;
        let text = LINE_BREAK.replace_all(&text, "\n");
        let text = ANY_TAG.replace_all(&text, "");
        Ok(unescape(&text).trim().to_owned())
    }
}

impl Stage<ChatMessage> for ReduceHtml {
    type Output = ChatMessage;

    fn apply(&self, input: &ChatMessage) -> Result<Option<ChatMessage>, BoxError> {
        let reduced = self.reduce(&input.message)?;
        Ok(Some(input.with_message(reduced)))
    }
}

fn replace_emotes(text: &str) -> Result<String, StageError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for tag in IMAGE.find_iter(text) {
        out.push_str(&text[last..tag.start()]);
        out.push_str(emote(tag.as_str())?);
        last = tag.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

fn emote(tag: &str) -> Result<&str, StageError> {
    // Both echo emotes share one alt; the left one is mirrored with CSS.
    if tag.contains(r#"alt="echo""#) {
        return Ok(if tag.contains("scaleX(-1)") { "(((" } else { ")))" });
    }
    ALT.captures(tag)
        .and_then(|caps| caps.get(1))
        .map(|alt| alt.as_str())
        .ok_or_else(|| StageError::Malformed {
            stage: STAGE,
            reason: format!("emote without alt text: {tag}"),
        })
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
