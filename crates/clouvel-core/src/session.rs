//! Session continuity across context compaction.
//!
//! The pre-compact hook captures a [`SessionSnapshot`] of repo signals into a
//! single JSON file; the session-start hook replays it as additional context
//! when a session is resumed or compacted. Neither hook ever fails the host:
//! every collection error drops the affected field and is logged at debug.

use crate::config::{RecoveryConfig, SnapshotConfig};
use crate::error::Result;
use crate::{io, paths};
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const SESSION_START_EVENT: &str = "SessionStart";

// ---------------------------------------------------------------------------
// HookEvent
// ---------------------------------------------------------------------------

/// Event payload the host writes to a hook's stdin. Every field is optional
/// and fields the hooks do not use are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookEvent {
    #[serde(default)]
    pub session_id: Option<String>,
    /// `startup`, `resume`, `compact` or `clear` (session-start only).
    #[serde(default)]
    pub source: Option<String>,
    /// `manual` or `auto` (pre-compact only).
    #[serde(default)]
    pub trigger: Option<String>,
}

impl HookEvent {
    pub fn parse(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Missing source is treated as a fresh startup.
    pub fn source(&self) -> SessionSource {
        match self.source.as_deref() {
            None | Some("startup") => SessionSource::Startup,
            Some("resume") => SessionSource::Resume,
            Some("compact") => SessionSource::Compact,
            Some(other) => SessionSource::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSource {
    Startup,
    Resume,
    Compact,
    Other(String),
}

impl SessionSource {
    pub fn replays_snapshot(&self) -> bool {
        !matches!(self, SessionSource::Startup)
    }
}

impl fmt::Display for SessionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionSource::Startup => f.write_str("startup"),
            SessionSource::Resume => f.write_str("resume"),
            SessionSource::Compact => f.write_str("compact"),
            SessionSource::Other(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_md: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
}

// ---------------------------------------------------------------------------
// Hook output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: String,
    pub additional_context: String,
}

/// Exact stdout shape of the session-start hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStartOutput {
    pub hook_specific_output: HookSpecificOutput,
}

impl SessionStartOutput {
    pub fn new(additional_context: impl Into<String>) -> Self {
        Self {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: SESSION_START_EVENT.to_string(),
                additional_context: additional_context.into(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// Location of the snapshot for one project root. Passed to both hooks.
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
    path: PathBuf,
}

impl SessionStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            path: paths::session_state_path(root),
        }
    }

    /// Collect a snapshot from the project root. Never fails; unreadable
    /// sources are left out.
    pub fn capture(&self, event: &HookEvent, cfg: &SnapshotConfig) -> SessionSnapshot {
        let root = &self.root;
        let (active_plan, plan_content) = match swallow(
            "active_plan",
            find_active_plan(root, &cfg.active_plan_markers, cfg.plan_excerpt_chars),
        ) {
            Some((name, content)) => (Some(name), Some(content)),
            None => (None, None),
        };

        SessionSnapshot {
            timestamp: Some(Utc::now().to_rfc3339()),
            trigger: Some(event.trigger.clone().unwrap_or_else(|| "unknown".to_string())),
            session_id: Some(event.session_id.clone().unwrap_or_default()),
            current_md: swallow(
                "current_md",
                read_status_excerpt(root, cfg.status_excerpt_chars),
            ),
            active_plan,
            plan_content,
            rules: swallow("rules", extract_rules(root, cfg.max_rules_per_kind)),
            git_branch: swallow("git_branch", read_git_branch(root)),
        }
    }

    /// Overwrite the stored snapshot.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        let data = serde_json::to_string_pretty(snapshot)?;
        io::atomic_write(&self.path, data.as_bytes())
    }

    /// `Ok(None)` when no snapshot has been written yet.
    pub fn load(&self) -> Result<Option<SessionSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Pre-compact hook: capture and persist. Write failures are logged only.
    pub fn on_compact(&self, event: &HookEvent, cfg: &SnapshotConfig) -> SessionSnapshot {
        let snapshot = self.capture(event, cfg);
        match self.save(&snapshot) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "session snapshot saved"),
            Err(e) => tracing::warn!(error = %e, "failed to write session snapshot"),
        }
        snapshot
    }

    /// Session-start hook: recovery context, or an empty string when there is
    /// nothing to replay. The snapshot is left in place.
    pub fn on_session_start(&self, event: &HookEvent, cfg: &RecoveryConfig) -> String {
        let source = event.source();
        if !source.replays_snapshot() {
            return String::new();
        }
        match self.load() {
            Ok(Some(snapshot)) => render_recovery(&snapshot, &source, cfg),
            Ok(None) => String::new(),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unreadable session snapshot");
                String::new()
            }
        }
    }
}

fn swallow<T>(field: &str, result: Result<Option<T>>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(field, error = %e, "snapshot field skipped");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Collectors
// ---------------------------------------------------------------------------

fn read_status_excerpt(root: &Path, max_chars: usize) -> Result<Option<String>> {
    let path = paths::current_status_path(root);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(io::truncate_chars(&content, max_chars).to_string()))
}

/// First `PLAN-*.md` (by file name) containing one of `markers`.
fn find_active_plan(
    root: &Path,
    markers: &[String],
    max_chars: usize,
) -> Result<Option<(String, String)>> {
    let dir = paths::plans_dir(root);
    if !dir.is_dir() {
        return Ok(None);
    }
    let mut names: Vec<String> = std::fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("PLAN-") && n.ends_with(".md"))
        .collect();
    names.sort();

    for name in names {
        let content = match std::fs::read_to_string(dir.join(&name)) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(plan = %name, error = %e, "skipping unreadable plan");
                continue;
            }
        };
        if markers.iter().any(|m| content.contains(m.as_str())) {
            let excerpt = io::truncate_chars(&content, max_chars).to_string();
            return Ok(Some((name, excerpt)));
        }
    }
    Ok(None)
}

static NEVER_RE: OnceLock<Regex> = OnceLock::new();
static ALWAYS_RE: OnceLock<Regex> = OnceLock::new();

fn never_re() -> &'static Regex {
    NEVER_RE.get_or_init(|| Regex::new(r"(?i)NEVER[:\s]+([^\n]+)").unwrap())
}

fn always_re() -> &'static Regex {
    ALWAYS_RE.get_or_init(|| Regex::new(r"(?i)ALWAYS[:\s]+([^\n]+)").unwrap())
}

/// Up to `per_kind` NEVER rules followed by up to `per_kind` ALWAYS rules.
pub fn rules_from_text(text: &str, per_kind: usize) -> Vec<String> {
    let mut rules = Vec::new();
    for (label, re) in [("NEVER", never_re()), ("ALWAYS", always_re())] {
        rules.extend(
            re.captures_iter(text)
                .filter_map(|c| c.get(1))
                .take(per_kind)
                .map(|m| format!("{label}: {}", m.as_str().trim())),
        );
    }
    rules
}

fn extract_rules(root: &Path, per_kind: usize) -> Result<Option<Vec<String>>> {
    let path = paths::claude_md_path(root);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let rules = rules_from_text(&content, per_kind);
    Ok(if rules.is_empty() { None } else { Some(rules) })
}

/// Branch name from `.git/HEAD`; `None` for a detached HEAD.
fn read_git_branch(root: &Path) -> Result<Option<String>> {
    let path = paths::git_head_path(root);
    if !path.exists() {
        return Ok(None);
    }
    let head = std::fs::read_to_string(path)?;
    Ok(head
        .trim()
        .strip_prefix("ref: refs/heads/")
        .map(str::to_string))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn first_lines(text: &str, n: usize) -> String {
    text.split('\n').take(n).collect::<Vec<_>>().join("\n")
}

pub fn render_recovery(
    snapshot: &SessionSnapshot,
    source: &SessionSource,
    cfg: &RecoveryConfig,
) -> String {
    let mut parts: Vec<String> = vec![
        "# Context Recovery (Auto-injected)".to_string(),
        String::new(),
        format!("> **Source**: {source}"),
        format!(
            "> **Saved at**: {}",
            snapshot.timestamp.as_deref().unwrap_or("unknown")
        ),
    ];

    if let Some(branch) = snapshot.git_branch.as_deref().filter(|b| !b.is_empty()) {
        parts.push(format!("> **Branch**: {branch}"));
    }

    if let Some(plan) = snapshot.active_plan.as_deref().filter(|p| !p.is_empty()) {
        parts.push(String::new());
        parts.push(format!("## Active Plan: {plan}"));
        parts.push(String::new());
        parts.push("```markdown".to_string());
        parts.push(first_lines(
            snapshot.plan_content.as_deref().unwrap_or_default(),
            cfg.plan_lines,
        ));
        parts.push("```".to_string());
    }

    if let Some(current) = snapshot.current_md.as_deref().filter(|c| !c.is_empty()) {
        parts.push(String::new());
        parts.push("## Current Status (from current.md)".to_string());
        parts.push(String::new());
        parts.push(first_lines(current, cfg.status_lines));
    }

    if let Some(rules) = snapshot.rules.as_ref().filter(|r| !r.is_empty()) {
        parts.push(String::new());
        parts.push("## Key Rules".to_string());
        parts.extend(rules.iter().map(|r| format!("- {r}")));
    }

    parts.push(String::new());
    parts.push("---".to_string());
    parts.push("**Continue where you left off.**".to_string());
    parts.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
