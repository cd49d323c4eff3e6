//! Textual edit model for wiring existing source files.
//!
//! An edit plan is a list of [`Edit`]s applied in order against one file's
//! content in memory. Every edit is idempotent: before inserting, the patcher
//! checks a guard substring and reports [`EditOutcome::AlreadyPresent`] when
//! it is found.
//!
//! ```text
//!   Insert ──▶ guard found? ──yes──▶ AlreadyPresent
//!                  │no
//!                  ▼
//!            first anchor that matches ──none──▶ AnchorMissing
//!                  │
//!                  ▼
//!              Applied
//! ```

use serde::Serialize;

/// Where an insertion goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Anchor {
    /// Before the line whose trimmed text equals the marker; indented like it.
    Marker(String),
    /// Before the line whose trimmed text equals this text; indented like it.
    BeforeLine(String),
    /// After the line whose trimmed text equals this text, one tab deeper.
    AfterLine(String),
    /// Before the first column-0 `)` that follows the line containing the
    /// opener, indented with one tab.
    BlockEnd(String),
}

/// One logical change to a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditKind {
    /// Inserts unindented `text` (may span lines) at the first matching
    /// anchor. `guard` defaults to the text itself.
    Insert {
        text: String,
        guard: Option<String>,
        anchors: Vec<Anchor>,
    },
    /// Replaces the first alternative of `from` found with `to`. Skipped
    /// when `unless` is present in the content.
    Replace {
        from: Vec<String>,
        to: String,
        unless: Option<String>,
    },
    /// Drops every line containing the substring.
    RemoveLines { containing: String },
    /// Drops a block starting at a line containing `start_containing` and
    /// ending at the first following line whose trimmed text equals
    /// `end_trimmed`.
    RemoveBlock {
        start_containing: String,
        end_trimmed: String,
    },
    /// Replaces every occurrence.
    ReplaceAll { from: String, to: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    /// Short description used in warnings, e.g. `import orderapp`.
    pub label: String,
    pub kind: EditKind,
}

impl Edit {
    pub fn insert(label: impl Into<String>, text: impl Into<String>, anchors: Vec<Anchor>) -> Self {
        Self {
            label: label.into(),
            kind: EditKind::Insert {
                text: text.into(),
                guard: None,
                anchors,
            },
        }
    }

    pub fn insert_guarded(
        label: impl Into<String>,
        text: impl Into<String>,
        guard: impl Into<String>,
        anchors: Vec<Anchor>,
    ) -> Self {
        Self {
            label: label.into(),
            kind: EditKind::Insert {
                text: text.into(),
                guard: Some(guard.into()),
                anchors,
            },
        }
    }

    pub fn replace(
        label: impl Into<String>,
        from: Vec<String>,
        to: impl Into<String>,
        unless: Option<String>,
    ) -> Self {
        Self {
            label: label.into(),
            kind: EditKind::Replace {
                from,
                to: to.into(),
                unless,
            },
        }
    }

    pub fn remove_lines(label: impl Into<String>, containing: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: EditKind::RemoveLines {
                containing: containing.into(),
            },
        }
    }

    pub fn remove_block(
        label: impl Into<String>,
        start_containing: impl Into<String>,
        end_trimmed: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            kind: EditKind::RemoveBlock {
                start_containing: start_containing.into(),
                end_trimmed: end_trimmed.into(),
            },
        }
    }

    pub fn replace_all(label: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: EditKind::ReplaceAll {
                from: from.into(),
                to: to.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOutcome {
    Applied,
    AlreadyPresent,
    AnchorMissing,
}

/// Result of applying an edit plan to one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub content: String,
    /// One `(label, outcome)` per edit, in plan order.
    pub outcomes: Vec<(String, EditOutcome)>,
}

impl PatchReport {
    pub fn changed(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, outcome)| *outcome == EditOutcome::Applied)
    }

    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == EditOutcome::AnchorMissing)
            .map(|(label, _)| label.as_str())
    }
}
