//! Line-oriented patcher for Go sources.
//!
//! Anchors are matched against trimmed lines, so formatting by `gofmt`
//! between runs does not break wiring. Content is split on `\n` and joined
//! back unchanged, which keeps a trailing newline and any `\r` intact.

use tracing::{debug, instrument};

use soliton_gen_core::application::ports::SourcePatcher;
use soliton_gen_core::domain::{Anchor, Edit, EditKind, EditOutcome, PatchReport};
use soliton_gen_core::error::GenResult;

/// Applies [`Edit`] plans against marker comments and structural anchors.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerPatcher;

impl MarkerPatcher {
    pub fn new() -> Self {
        Self
    }
}

fn indentation(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

fn position(lines: &[String], pred: impl Fn(&str) -> bool) -> Option<usize> {
    lines.iter().position(|line| pred(line))
}

/// Index to insert at and the indentation to use, for the first anchor
/// that matches.
fn locate(lines: &[String], anchors: &[Anchor]) -> Option<(usize, String)> {
    anchors.iter().find_map(|anchor| match anchor {
        Anchor::Marker(text) | Anchor::BeforeLine(text) => {
            position(lines, |l| l.trim() == text.trim())
                .map(|idx| (idx, indentation(&lines[idx]).to_string()))
        }
        Anchor::AfterLine(text) => position(lines, |l| l.trim() == text.trim())
            .map(|idx| (idx + 1, format!("{}\t", indentation(&lines[idx])))),
        Anchor::BlockEnd(opener) => {
            let start = position(lines, |l| l.contains(opener.as_str()))?;
            lines[start + 1..]
                .iter()
                .position(|l| l.trim_end() == ")")
                .map(|offset| (start + 1 + offset, "\t".to_string()))
        }
    })
}

fn insert(lines: &mut Vec<String>, content: &str, text: &str, guard: Option<&str>, anchors: &[Anchor]) -> EditOutcome {
    if content.contains(guard.unwrap_or(text)) {
        return EditOutcome::AlreadyPresent;
    }
    let Some((at, indent)) = locate(lines, anchors) else {
        return EditOutcome::AnchorMissing;
    };

    let block = text.lines().map(|line| {
        if line.is_empty() {
            String::new()
        } else {
            format!("{indent}{line}")
        }
    });
    lines.splice(at..at, block);
    EditOutcome::Applied
}

fn remove_block(lines: &mut Vec<String>, start_containing: &str, end_trimmed: &str) -> EditOutcome {
    let Some(start) = position(lines, |l| l.contains(start_containing)) else {
        return EditOutcome::AlreadyPresent;
    };
    match lines[start..].iter().position(|l| l.trim() == end_trimmed) {
        Some(offset) => {
            lines.drain(start..=start + offset);
            EditOutcome::Applied
        }
        None => EditOutcome::AnchorMissing,
    }
}

fn apply_one(content: &str, edit: &Edit) -> (String, EditOutcome) {
    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();

    let outcome = match &edit.kind {
        EditKind::Insert {
            text,
            guard,
            anchors,
        } => insert(&mut lines, content, text, guard.as_deref(), anchors),

        EditKind::Replace { from, to, unless } => {
            if unless.as_deref().is_some_and(|u| content.contains(u)) {
                return (content.to_string(), EditOutcome::AlreadyPresent);
            }
            return match from.iter().find(|f| !f.is_empty() && content.contains(f.as_str())) {
                Some(found) => (content.replacen(found.as_str(), to, 1), EditOutcome::Applied),
                None => (content.to_string(), EditOutcome::AnchorMissing),
            };
        }

        EditKind::RemoveLines { containing } => {
            let before = lines.len();
            lines.retain(|l| !l.contains(containing.as_str()));
            if lines.len() == before {
                EditOutcome::AlreadyPresent
            } else {
                EditOutcome::Applied
            }
        }

        EditKind::RemoveBlock {
            start_containing,
            end_trimmed,
        } => remove_block(&mut lines, start_containing, end_trimmed),

        EditKind::ReplaceAll { from, to } => {
            if from.is_empty() || !content.contains(from.as_str()) {
                return (content.to_string(), EditOutcome::AlreadyPresent);
            }
            return (content.replace(from.as_str(), to), EditOutcome::Applied);
        }
    };

    match outcome {
        EditOutcome::Applied => (lines.join("\n"), outcome),
        _ => (content.to_string(), outcome),
    }
}

impl SourcePatcher for MarkerPatcher {
    #[instrument(skip_all, fields(edits = edits.len()))]
    fn apply(&self, content: &str, edits: &[Edit]) -> GenResult<PatchReport> {
        let mut current = content.to_string();
        let mut outcomes = Vec::with_capacity(edits.len());

        for edit in edits {
            let (next, outcome) = apply_one(&current, edit);
            debug!(label = %edit.label, ?outcome, "Edit");
            current = next;
            outcomes.push((edit.label.clone(), outcome));
        }

        Ok(PatchReport {
            content: current,
            outcomes,
        })
    }
}
