//! Reads Claude Code transcript files.
//!
//! Transcripts are JSON Lines; each entry records one turn. Assistant
//! turns carry a message with a list of content blocks, of which only
//! the `text` blocks are notification material.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;

/// Returns the text of the last assistant turn, or None when the file is
/// missing, unreadable, or contains no assistant text. Lines that fail to
/// parse are skipped; transcripts of interrupted sessions often end with
/// a partial line.
pub fn last_assistant_message(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let reader = BufReader::new(file);

    let mut last = None;
    for line in reader.lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }
        let Ok(entry) = serde_json::from_str::<Value>(&line) else {
            continue;
        };
        if entry.get("type").and_then(Value::as_str) != Some("assistant") {
            continue;
        }
        let Some(blocks) = entry.pointer("/message/content").and_then(Value::as_array) else {
            continue;
        };

        let text = blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n");
        if !text.trim().is_empty() {
            last = Some(text);
        }
    }
    last
}
