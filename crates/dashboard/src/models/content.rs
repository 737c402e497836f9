//! Rich-text content entries.

use serde::{Deserialize, Serialize};

use userdash_core::{ContentId, Timestamp, UserId};

/// A rich-text entry written by a user, stored under `userContent`.
///
/// `user_id` is a soft reference: it is not checked against the user
/// collection and deleting the user leaves the entry in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    pub id: ContentId,
    /// Author ID (`anonymous` when written without a session).
    pub user_id: UserId,
    /// Author name at the time of writing.
    pub user_name: String,
    /// Rich-text markup as produced by the editor.
    pub content: String,
    pub last_edited: Timestamp,
}

impl ContentEntry {
    /// The entry's text with markup removed.
    #[must_use]
    pub fn plain_text(&self) -> String {
        strip_tags(&self.content)
    }

    /// Number of words in the entry's text.
    #[must_use]
    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }

    /// Up to `max_chars` characters of plain text, with `…` when cut.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        let text = self.plain_text();
        let text = text.trim();
        if text.chars().count() <= max_chars {
            return text.to_owned();
        }
        let mut cut: String = text.chars().take(max_chars).collect();
        cut.push('…');
        cut
    }
}

/// Remove `<...>` tags from rich-text markup.
///
/// This is a plain tag stripper, not an HTML parser: entities are left
/// as-is and an unterminated `<` drops the rest of the input.
#[must_use]
pub fn strip_tags(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

/// Count whitespace-separated words in the text of `markup`.
#[must_use]
pub fn word_count(markup: &str) -> usize {
    strip_tags(markup).split_whitespace().count()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(content: &str) -> ContentEntry {
        ContentEntry {
            id: ContentId::new("c1"),
            user_id: UserId::anonymous(),
            user_name: "Anonymous".to_owned(),
            content: content.to_owned(),
            last_edited: Timestamp::now(),
        }
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("no markup"), "no markup");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("<p>one two</p> <p>three</p>"), 3);
        // Tags are removed, not replaced by spaces.
        assert_eq!(word_count("<p>one</p><p>two</p>"), 1);
        assert_eq!(word_count("<p></p>"), 0);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_preview_truncates() {
        let e = entry("<p>abcdefghij</p>");
        assert_eq!(e.preview(4), "abcd…");
        assert_eq!(e.preview(20), "abcdefghij");
    }

    #[test]
    fn test_stored_shape() {
        let json = serde_json::to_value(entry("<p>x</p>")).unwrap();
        assert_eq!(json["userId"], "anonymous");
        assert_eq!(json["userName"], "Anonymous");
        assert!(json.get("lastEdited").is_some());
    }
}
