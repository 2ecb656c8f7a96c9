//! Hook configuration model and the non-destructive merge algorithm.
//!
//! The hooks section of settings.json maps an event name to an ordered
//! list of bindings; the order determines execution order within that
//! event. Merging must never disturb bindings owned by the user or by
//! other tools.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::layout::{self, HOOK_BINARY};

/// Value of the `managedBy` field on hook commands written by this
/// installer. Claude Code ignores unknown fields, so the marker rides
/// along in settings.json and identifies our entries unambiguously.
pub const OWNERSHIP_MARKER: &str = "pushover-hook";

/// Event key → ordered bindings, as stored under `"hooks"` in settings.json.
pub type HooksDocument = BTreeMap<String, Vec<EventBinding>>;

/// One entry in an event's binding list.
///
/// Unknown fields are captured in `extra` so a merge round-trips user
/// data untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBinding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    #[serde(default)]
    pub hooks: Vec<HookCommand>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookCommand {
    #[serde(rename = "type")]
    pub kind: String,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(rename = "managedBy", skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HookCommand {
    fn managed(event: &str, timeout: u64) -> Self {
        Self {
            kind: "command".to_string(),
            command: layout::hook_command(event),
            timeout: Some(timeout),
            managed_by: Some(OWNERSHIP_MARKER.to_string()),
            extra: Map::new(),
        }
    }
}

/// A command is ours if it carries the structured marker, or (for entries
/// written by installers that predate the marker) if the command string
/// mentions the hook binary name.
fn command_is_owned(command: &HookCommand) -> bool {
    command.managed_by.as_deref() == Some(OWNERSHIP_MARKER) || command.command.contains(HOOK_BINARY)
}

/// A binding is owned when any of its commands is ours.
pub fn binding_is_owned(binding: &EventBinding) -> bool {
    binding.hooks.iter().any(command_is_owned)
}

/// Bindings count as the same entry when their command lists are equal.
/// Matcher and unknown fields do not participate in this comparison.
fn same_binding(a: &EventBinding, b: &EventBinding) -> bool {
    a.hooks == b.hooks
}

/// The full set of bindings this installer manages: one binding per
/// lifecycle event, each with a single marked command.
pub fn managed_hooks(timeout: u64) -> HooksDocument {
    let binding = |event: &str, matcher: Option<&str>| EventBinding {
        matcher: matcher.map(str::to_string),
        hooks: vec![HookCommand::managed(event, timeout)],
        extra: Map::new(),
    };

    BTreeMap::from([
        (
            "UserPromptSubmit".to_string(),
            vec![binding("user-prompt-submit", None)],
        ),
        ("Stop".to_string(), vec![binding("stop", None)]),
        (
            "Notification".to_string(),
            vec![binding("notification", Some("permission_prompt|idle_prompt"))],
        ),
    ])
}

/// What a merge did, for reporting.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Event keys newly added to the document.
    pub added_events: Vec<String>,
    /// Previously installed owned bindings that were replaced.
    pub replaced: usize,
    /// Non-owned incoming bindings appended to an existing event.
    pub appended: usize,
    /// Incoming bindings skipped because an equal one was already there.
    pub skipped: usize,
}

/// Merges `incoming` bindings into `existing`.
///
/// Per incoming event: missing keys are inserted verbatim. For present
/// keys, an owned incoming binding replaces every owned binding already
/// there and lands at the end of the list, so fresh installs run after
/// any third-party hooks on the same event. Non-owned incoming bindings
/// are appended unless an equal binding already exists.
///
/// Idempotent: merging the same document twice equals merging it once.
pub fn merge(existing: &HooksDocument, incoming: &HooksDocument) -> (HooksDocument, MergeReport) {
    let mut merged = existing.clone();
    let mut report = MergeReport::default();

    for (event, bindings) in incoming {
        let Some(current) = merged.get_mut(event) else {
            merged.insert(event.clone(), bindings.clone());
            report.added_events.push(event.clone());
            continue;
        };

        for binding in bindings {
            if binding_is_owned(binding) {
                let before = current.len();
                current.retain(|b| !binding_is_owned(b));
                report.replaced += before - current.len();
                current.push(binding.clone());
            } else if current.iter().any(|b| same_binding(b, binding)) {
                report.skipped += 1;
            } else {
                current.push(binding.clone());
                report.appended += 1;
            }
        }
    }

    (merged, report)
}
