//! Note model.
//!
//! A note is the single stored record the checklist is edited against.
//! `body` holds the serialized item list; `text` is a denormalized
//! `"{title}\n\n{body}"` copy kept for full-text consumers.

use serde::{Deserialize, Serialize};

/// Title applied when a save omits it.
pub const DEFAULT_TITLE: &str = "untitled";

/// Body applied when a save omits it.
pub const DEFAULT_BODY: &str = "body";

/// Text applied when a save omits it.
pub const DEFAULT_TEXT: &str = "untitled\nbody";

/// Marker some titles carry in front; hidden when displayed.
const TITLE_MARKER: &str = "= ";

/// A stored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: String,

    /// Raw title, possibly with the `"= "` marker
    pub title: String,

    /// Denormalized title + body
    pub text: String,

    /// Serialized checklist
    pub body: String,

    /// Author name; empty when unknown
    pub author: String,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Note {
    /// Title as shown to the user, without the leading `"= "` marker.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.strip_prefix(TITLE_MARKER).unwrap_or(&self.title)
    }
}

/// Upsert input for a note store.
///
/// Absent fields take the `DEFAULT_*` values on both create and update.
/// An absent (or empty) id creates a new note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    pub author: String,
}

impl SaveNote {
    /// Save input that rewrites `note` with a new body.
    ///
    /// `text` is rebuilt as `"{title}\n\n{body}"`.
    #[must_use]
    pub fn from_note(note: &Note, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            id: Some(note.id.clone()),
            text: Some(format!("{}\n\n{}", note.title, body)),
            title: Some(note.title.clone()),
            body: Some(body),
            author: note.author.clone(),
        }
    }

    /// Replace the title, keeping `text` consistent with it.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.text = Some(format!("{}\n\n{}", title, self.body_or_default()));
        self.title = Some(title);
        self
    }

    #[must_use]
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    #[must_use]
    pub fn body_or_default(&self) -> &str {
        self.body.as_deref().unwrap_or(DEFAULT_BODY)
    }

    #[must_use]
    pub fn text_or_default(&self) -> &str {
        self.text.as_deref().unwrap_or(DEFAULT_TEXT)
    }

    /// Id to upsert against; empty ids count as absent.
    #[must_use]
    pub fn target_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// The record the store is expected to return, for optimistic display.
    ///
    /// Timestamps and a missing id are taken from `previous` when there is one.
    #[must_use]
    pub fn to_optimistic_note(&self, previous: Option<&Note>) -> Note {
        let now = chrono::Utc::now().timestamp_millis();
        Note {
            id: self
                .target_id()
                .or(previous.map(|p| p.id.as_str()))
                .unwrap_or_default()
                .to_string(),
            title: self.title_or_default().to_string(),
            text: self.text_or_default().to_string(),
            body: self.body_or_default().to_string(),
            author: self.author.clone(),
            created_at: previous.map_or(now, |p| p.created_at),
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str, body: &str) -> Note {
        Note {
            id: "home".to_string(),
            title: title.to_string(),
            text: format!("{title}\n\n{body}"),
            body: body.to_string(),
            author: "ana".to_string(),
            created_at: 1,
            updated_at: 2,
        }
    }

    #[test]
    fn test_display_title_strips_marker() {
        assert_eq!(note("= Groceries", "").display_title(), "Groceries");
        assert_eq!(note("Groceries", "").display_title(), "Groceries");
        assert_eq!(note("a = b", "").display_title(), "a = b");
    }

    #[test]
    fn test_from_note_rebuilds_text() {
        let input = SaveNote::from_note(&note("= Groceries", "milk\to"), "eggs\tx");
        assert_eq!(input.id.as_deref(), Some("home"));
        assert_eq!(input.text.as_deref(), Some("= Groceries\n\neggs\tx"));
        assert_eq!(input.author, "ana");

        let renamed = input.with_title("Shop");
        assert_eq!(renamed.text.as_deref(), Some("Shop\n\neggs\tx"));
    }

    #[test]
    fn test_defaults_apply_to_absent_fields() {
        let input = SaveNote {
            id: Some(String::new()),
            text: None,
            title: None,
            body: None,
            author: "ana".to_string(),
        };
        assert_eq!(input.target_id(), None);
        assert_eq!(input.title_or_default(), "untitled");
        assert_eq!(input.body_or_default(), "body");
        assert_eq!(input.text_or_default(), "untitled\nbody");
    }

    #[test]
    fn test_optimistic_note_keeps_previous_timestamps() {
        let previous = note("Groceries", "milk\to");
        let input = SaveNote::from_note(&previous, "eggs\to");
        let optimistic = input.to_optimistic_note(Some(&previous));
        assert_eq!(optimistic.id, "home");
        assert_eq!(optimistic.body, "eggs\to");
        assert_eq!(optimistic.created_at, 1);
    }
}
