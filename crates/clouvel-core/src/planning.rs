//! Persistent planning state: task plan, findings log and progress log.
//!
//! `planning.yaml` is the source of truth. Each markdown view is written only
//! by the operation that owns it: `init_planning` writes all three,
//! `save_finding` appends to `findings.md` and `update_progress` rewrites
//! `progress.md`. Hand edits to `task_plan.md` are folded back into the record
//! on load. A planning directory without a record is imported from its views.

use crate::error::{ClouvelError, Result};
use crate::markdown;
use crate::{io, paths};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl Goal {
    pub fn pending(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: false,
        }
    }

    pub fn checklist_line(&self) -> String {
        let mark = if self.done { "x" } else { " " };
        format!("- [{mark}] {}", self.text)
    }
}

/// One investigation record. Never edited once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub recorded_at: DateTime<Utc>,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub updated_at: DateTime<Utc>,
    /// Accumulates across updates; duplicates are kept.
    #[serde(default)]
    pub completed: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_progress: Option<String>,
    /// Replaced wholesale by each update.
    #[serde(default)]
    pub blockers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl Progress {
    fn empty(now: DateTime<Utc>) -> Self {
        Self {
            updated_at: now,
            completed: Vec::new(),
            in_progress: None,
            blockers: Vec::new(),
            next: None,
        }
    }
}

fn default_constraints() -> Vec<String> {
    vec![
        "Stay within the scope defined in the PRD".to_string(),
        "No deploys without tests".to_string(),
    ]
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningState {
    #[serde(default = "default_version")]
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub task: String,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approach: Option<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub findings: Vec<Finding>,
    /// Verbatim `findings.md` captured on import; new findings render after it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_findings: Option<String>,
    pub progress: Progress,
}

impl PlanningState {
    pub fn new(task: impl Into<String>, goals: &[String]) -> Self {
        let now = Utc::now();
        Self {
            version: 1,
            created_at: now,
            task: task.into(),
            goals: clean_items(goals).into_iter().map(Goal::pending).collect(),
            approach: None,
            constraints: default_constraints(),
            findings: Vec::new(),
            imported_findings: None,
            progress: Progress::empty(now),
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Load the planning record. `document` names the view the caller needs and
    /// is reported in [`ClouvelError::NotInitialized`] when nothing is found.
    pub fn load(root: &Path, document: &str) -> Result<Self> {
        let record = paths::planning_record_path(root);
        if record.exists() {
            let data = std::fs::read_to_string(&record)?;
            let mut state: PlanningState = serde_yaml::from_str(&data)?;
            if let Some(plan) = read_optional(&paths::task_plan_path(root))? {
                state.apply_task_plan(&plan);
            }
            return Ok(state);
        }
        if paths::planning_dir(root).join(document).exists() {
            tracing::info!(document, "importing planning documents without a record");
            return Self::import_markdown(root);
        }
        Err(ClouvelError::NotInitialized {
            document: document.to_string(),
        })
    }

    /// Write `planning.yaml` only.
    pub fn save_record(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::planning_record_path(root), data.as_bytes())
    }

    /// Write the record and regenerate all three views.
    fn save_all(&self, root: &Path) -> Result<()> {
        self.save_record(root)?;
        io::atomic_write(
            &paths::task_plan_path(root),
            markdown::render_task_plan(self).as_bytes(),
        )?;
        io::atomic_write(
            &paths::findings_path(root),
            markdown::render_findings(self).as_bytes(),
        )?;
        io::atomic_write(
            &paths::progress_path(root),
            markdown::render_progress(&self.progress).as_bytes(),
        )
    }

    /// Take task, goals, approach and constraints from a `task_plan.md`.
    /// Sections the document lacks leave the record's value alone.
    fn apply_task_plan(&mut self, doc: &str) {
        let task = markdown::section_text(doc, markdown::TASK_HEADINGS);
        if !task.is_empty() {
            self.task = task;
        }
        if markdown::has_section(doc, markdown::GOALS_HEADINGS) {
            self.goals = markdown::section_lines(doc, markdown::GOALS_HEADINGS)
                .into_iter()
                .filter_map(markdown::parse_goal)
                .collect();
        }
        if markdown::has_section(doc, markdown::APPROACH_HEADINGS) {
            let approach = markdown::section_text(doc, markdown::APPROACH_HEADINGS);
            self.approach =
                Some(approach).filter(|a| !a.is_empty() && !markdown::is_placeholder(a));
        }
        if markdown::has_section(doc, markdown::CONSTRAINTS_HEADINGS) {
            self.constraints = markdown::section_items(doc, markdown::CONSTRAINTS_HEADINGS);
        }
    }

    /// Rebuild a record from markdown views written before `planning.yaml` existed.
    pub fn import_markdown(root: &Path) -> Result<Self> {
        let task_plan = read_optional(&paths::task_plan_path(root))?.unwrap_or_default();
        let progress_doc = read_optional(&paths::progress_path(root))?.unwrap_or_default();

        let mut state = PlanningState::new("", &[]);
        state.apply_task_plan(&task_plan);

        let progress = &mut state.progress;
        progress.completed = markdown::section_items(&progress_doc, markdown::COMPLETED_HEADINGS);
        progress.in_progress =
            markdown::section_items(&progress_doc, markdown::IN_PROGRESS_HEADINGS)
                .into_iter()
                .next();
        progress.blockers = markdown::section_items(&progress_doc, markdown::BLOCKERS_HEADINGS);
        let next = markdown::section_text(&progress_doc, markdown::NEXT_HEADINGS);
        if !next.is_empty() && !markdown::is_placeholder(&next) {
            progress.next = Some(next);
        }

        state.imported_findings = read_optional(&paths::findings_path(root))?;
        Ok(state)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    if path.exists() {
        Ok(Some(std::fs::read_to_string(path)?))
    } else {
        Ok(None)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Trimmed, with blank entries dropped.
fn clean_items(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPlan {
    pub task: String,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub approach: Option<String>,
    /// Empty keeps the default constraints.
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl NewPlan {
    pub fn new(task: impl Into<String>, goals: &[String]) -> Self {
        Self {
            task: task.into(),
            goals: goals.to_vec(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanningInit {
    pub planning_dir: String,
    pub files: Vec<String>,
    pub goals: usize,
}

impl PlanningInit {
    pub fn render(&self) -> String {
        let mut out = format!(
            "# Planning initialized\n\nPath: `{}`\n\n",
            self.planning_dir
        );
        for f in &self.files {
            out.push_str(&format!("- {f}\n"));
        }
        out.push_str(&format!(
            "\nGoals: {}\n\n\
             ## Next steps\n\n\
             1. Check goals: `refresh_goals`\n\
             2. Log research: `save_finding`\n\
             3. Record progress: `update_progress`\n",
            self.goals
        ));
        out
    }
}

/// Reset the planning store. Any previous plan, findings and progress are discarded.
pub fn init_planning(root: &Path, plan: NewPlan) -> Result<PlanningInit> {
    if !root.exists() {
        return Err(ClouvelError::PathNotFound(root.display().to_string()));
    }
    let mut state = PlanningState::new(plan.task, &plan.goals);
    state.approach = non_empty(plan.approach.as_deref());
    let constraints = clean_items(&plan.constraints);
    if !constraints.is_empty() {
        state.constraints = constraints;
    }
    state.save_all(root)?;
    tracing::debug!(goals = state.goals.len(), "planning store initialized");

    Ok(PlanningInit {
        planning_dir: paths::planning_dir(root).display().to_string(),
        files: vec![
            paths::TASK_PLAN_MD.to_string(),
            paths::FINDINGS_MD.to_string(),
            paths::PROGRESS_MD.to_string(),
        ],
        goals: state.goals.len(),
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFinding {
    pub topic: String,
    #[serde(default)]
    pub question: Option<String>,
    pub body: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FindingSaved {
    pub topic: String,
    pub index: usize,
    pub path: String,
}

impl FindingSaved {
    pub fn render(&self) -> String {
        format!(
            "Finding #{} recorded: {}\n\nSaved to `{}`\n",
            self.index, self.topic, self.path
        )
    }
}

/// Append one finding. The bytes already in `findings.md`, hand-written
/// entries included, are kept as an exact prefix.
pub fn save_finding(root: &Path, new: NewFinding) -> Result<FindingSaved> {
    let mut state = PlanningState::load(root, paths::FINDINGS_MD)?;
    let finding = Finding {
        recorded_at: Utc::now(),
        topic: new.topic.trim().to_string(),
        question: non_empty(new.question.as_deref()),
        body: new.body,
        source: non_empty(new.source.as_deref()),
        conclusion: non_empty(new.conclusion.as_deref()),
    };
    let entry = markdown::render_finding(&finding);
    state.findings.push(finding);

    let path = paths::findings_path(root);
    let log = match read_optional(&path)? {
        Some(mut existing) => {
            existing.push_str(&entry);
            existing
        }
        None => markdown::render_findings(&state),
    };
    io::atomic_write(&path, log.as_bytes())?;
    state.save_record(root)?;

    Ok(FindingSaved {
        topic: new.topic,
        index: state.findings.len(),
        path: path.display().to_string(),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalsSummary {
    pub task: String,
    /// Checklist lines exactly as they appear in `task_plan.md`.
    pub goals: Vec<String>,
    pub progress_excerpt: String,
    pub truncated: bool,
}

impl GoalsSummary {
    pub fn render(&self) -> String {
        let goals = if self.goals.is_empty() {
            "*(no goals)*".to_string()
        } else {
            self.goals.join("\n")
        };
        let ellipsis = if self.truncated { "..." } else { "" };
        format!(
            "# Goal reminder\n\n\
             ## Current task\n\n{}\n\n\
             ## Goals\n\n{goals}\n\n\
             ---\n\n\
             ## Current progress\n\n{}{ellipsis}\n\n\
             ---\n\n\
             ## Next actions\n\n\
             1. Pick one of the goals above\n\
             2. Focus on it\n\
             3. Record it with `update_progress` when done\n",
            self.task, self.progress_excerpt
        )
    }
}

pub fn refresh_goals(root: &Path, excerpt_chars: usize) -> Result<GoalsSummary> {
    let state = PlanningState::load(root, paths::TASK_PLAN_MD)?;
    let progress = markdown::render_progress(&state.progress);
    let excerpt = io::truncate_chars(&progress, excerpt_chars);

    Ok(GoalsSummary {
        task: state.task.clone(),
        goals: state.goals.iter().map(Goal::checklist_line).collect(),
        truncated: excerpt.len() < progress.len(),
        progress_excerpt: excerpt.to_string(),
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressUpdate {
    #[serde(default)]
    pub completed: Vec<String>,
    #[serde(default)]
    pub in_progress: Option<String>,
    #[serde(default)]
    pub blockers: Vec<String>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub completed_total: usize,
    pub completed_added: usize,
    pub in_progress: Option<String>,
    pub blockers: usize,
    pub next: Option<String>,
    pub path: String,
}

impl ProgressSummary {
    pub fn render(&self) -> String {
        format!(
            "Progress updated\n  \
             completed:   {} (+{})\n  \
             in progress: {}\n  \
             blockers:    {}\n  \
             next:        {}\n",
            self.completed_total,
            self.completed_added,
            self.in_progress.as_deref().unwrap_or("-"),
            self.blockers,
            self.next.as_deref().unwrap_or("-"),
        )
    }
}

/// Completed items accumulate; in-progress, blockers and next are replaced.
/// Only `progress.md` and the record are written.
pub fn update_progress(root: &Path, update: ProgressUpdate) -> Result<ProgressSummary> {
    let mut state = PlanningState::load(root, paths::PROGRESS_MD)?;
    let added = clean_items(&update.completed);
    let completed_added = added.len();

    let progress = &mut state.progress;
    progress.completed.extend(added);
    progress.in_progress = non_empty(update.in_progress.as_deref());
    progress.blockers = clean_items(&update.blockers);
    progress.next = non_empty(update.next.as_deref());
    progress.updated_at = Utc::now();

    let path = paths::progress_path(root);
    io::atomic_write(&path, markdown::render_progress(&state.progress).as_bytes())?;
    state.save_record(root)?;

    Ok(ProgressSummary {
        completed_total: state.progress.completed.len(),
        completed_added,
        in_progress: state.progress.in_progress.clone(),
        blockers: state.progress.blockers.len(),
        next: state.progress.next.clone(),
        path: path.display().to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn goals(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn finding(topic: &str, body: &str) -> NewFinding {
        NewFinding {
            topic: topic.to_string(),
            body: body.to_string(),
            ..Default::default()
        }
    }

    fn completed(items: &[&str]) -> ProgressUpdate {
        ProgressUpdate {
            completed: goals(items),
            ..Default::default()
        }
    }

    #[test]
    fn init_writes_record_and_views() {
        let dir = TempDir::new().unwrap();
        let plan = NewPlan::new("Build login", &goals(&["Add form"]));
        let result = init_planning(dir.path(), plan).unwrap();
        assert_eq!(result.goals, 1);
        for f in ["planning.yaml", "task_plan.md", "findings.md", "progress.md"] {
            assert!(dir.path().join(".claude/planning").join(f).exists(), "{f}");
        }
        let plan = std::fs::read_to_string(paths::task_plan_path(dir.path())).unwrap();
        assert!(plan.contains("## Current Task\n\nBuild login"));
        assert!(plan.contains("- [ ] Add form"));
    }

    #[test]
    fn init_on_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let err = init_planning(&dir.path().join("nope"), NewPlan::new("t", &[])).unwrap_err();
        assert!(matches!(err, ClouvelError::PathNotFound(_)));
    }

    #[test]
    fn empty_goals_render_placeholder() {
        let dir = TempDir::new().unwrap();
        init_planning(dir.path(), NewPlan::new("Task", &[])).unwrap();
        let plan = std::fs::read_to_string(paths::task_plan_path(dir.path())).unwrap();
        assert!(plan.contains("- [ ] (goals to be defined)"));
        let summary = refresh_goals(dir.path(), 500).unwrap();
        assert!(summary.goals.is_empty());
    }

    #[test]
    fn refresh_goals_returns_supplied_goals_unchecked() {
        let dir = TempDir::new().unwrap();
        let plan = NewPlan::new("Build login", &goals(&["Add form", "Add validation"]));
        init_planning(dir.path(), plan).unwrap();
        let summary = refresh_goals(dir.path(), 500).unwrap();
        assert_eq!(summary.goals, vec!["- [ ] Add form", "- [ ] Add validation"]);
        assert_eq!(summary.task, "Build login");
        assert!(summary.render().contains("- [ ] Add validation"));
    }

    #[test]
    fn refresh_goals_truncates_progress() {
        let dir = TempDir::new().unwrap();
        init_planning(dir.path(), NewPlan::new("t", &[])).unwrap();
        let summary = refresh_goals(dir.path(), 20).unwrap();
        assert!(summary.truncated);
        assert_eq!(summary.progress_excerpt.chars().count(), 20);
        assert!(summary.render().contains(&format!("{}...", summary.progress_excerpt)));

        let full = refresh_goals(dir.path(), 100_000).unwrap();
        assert!(!full.truncated);
    }

    #[test]
    fn operations_require_initialization() {
        let dir = TempDir::new().unwrap();
        let err = refresh_goals(dir.path(), 500).unwrap_err();
        assert!(matches!(err, ClouvelError::NotInitialized { ref document } if document == "task_plan.md"));
        assert!(err.to_string().contains("init_planning"));

        let err = save_finding(dir.path(), finding("t", "b")).unwrap_err();
        assert!(matches!(err, ClouvelError::NotInitialized { ref document } if document == "findings.md"));

        let err = update_progress(dir.path(), completed(&["x"])).unwrap_err();
        assert!(matches!(err, ClouvelError::NotInitialized { ref document } if document == "progress.md"));
    }

    #[test]
    fn save_finding_is_append_only() {
        let dir = TempDir::new().unwrap();
        init_planning(dir.path(), NewPlan::new("t", &[])).unwrap();
        let path = paths::findings_path(dir.path());

        let before = std::fs::read_to_string(&path).unwrap();
        save_finding(dir.path(), finding("Auth", "JWT works")).unwrap();
        let middle = std::fs::read_to_string(&path).unwrap();
        save_finding(
            dir.path(),
            NewFinding {
                topic: "Cache".into(),
                question: Some("Which store?".into()),
                body: "Redis".into(),
                source: Some("docs".into()),
                conclusion: None,
            },
        )
        .unwrap();
        let after = std::fs::read_to_string(&path).unwrap();

        assert!(middle.len() > before.len() && middle.starts_with(&before));
        assert!(after.len() > middle.len() && after.starts_with(&middle));
        assert_eq!(after.matches("\n---\n\n## [").count(), 2);
        assert!(after.find("Auth").unwrap() < after.find("Cache").unwrap());
        assert!(middle.contains("### Question\n(not specified)"));
        assert!(after.contains("### Question\nWhich store?"));
        assert!(after.contains("### Conclusion\n(not specified)"));
    }

    #[test]
    fn completed_accumulates_and_blockers_replace() {
        let dir = TempDir::new().unwrap();
        init_planning(dir.path(), NewPlan::new("t", &[])).unwrap();

        update_progress(
            dir.path(),
            ProgressUpdate {
                completed: goals(&["Task A"]),
                blockers: goals(&["waiting on API"]),
                ..Default::default()
            },
        )
        .unwrap();
        let summary = update_progress(dir.path(), completed(&["Task B"])).unwrap();

        assert_eq!(summary.completed_total, 2);
        assert_eq!(summary.blockers, 0);
        let state = PlanningState::load(dir.path(), paths::PROGRESS_MD).unwrap();
        assert_eq!(state.progress.completed, vec!["Task A", "Task B"]);
        assert!(state.progress.blockers.is_empty());

        let doc = std::fs::read_to_string(paths::progress_path(dir.path())).unwrap();
        assert!(doc.contains("## Completed\n\n- Task A\n- Task B"));
        assert!(doc.contains("## Blockers\n\n*(none)*"));
    }

    #[test]
    fn completed_keeps_duplicates() {
        let dir = TempDir::new().unwrap();
        init_planning(dir.path(), NewPlan::new("t", &[])).unwrap();
        update_progress(dir.path(), completed(&["same"])).unwrap();
        let summary = update_progress(dir.path(), completed(&["same"])).unwrap();
        assert_eq!(summary.completed_total, 2);
    }

    #[test]
    fn in_progress_and_next_are_replaced() {
        let dir = TempDir::new().unwrap();
        init_planning(dir.path(), NewPlan::new("t", &[])).unwrap();
        update_progress(
            dir.path(),
            ProgressUpdate {
                in_progress: Some("login form".into()),
                next: Some("validation".into()),
                ..Default::default()
            },
        )
        .unwrap();
        let summary = update_progress(dir.path(), ProgressUpdate::default()).unwrap();
        assert_eq!(summary.in_progress, None);
        assert_eq!(summary.next, None);
        let doc = std::fs::read_to_string(paths::progress_path(dir.path())).unwrap();
        assert!(doc.contains("## In Progress\n\n*(none)*"));
        assert!(doc.contains("## Next\n\n*(to be decided)*"));
    }

    #[test]
    fn init_is_a_hard_reset() {
        let dir = TempDir::new().unwrap();
        init_planning(dir.path(), NewPlan::new("first", &[])).unwrap();
        save_finding(dir.path(), finding("old", "gone")).unwrap();
        update_progress(dir.path(), completed(&["old work"])).unwrap();

        init_planning(dir.path(), NewPlan::new("second", &[])).unwrap();
        let state = PlanningState::load(dir.path(), paths::TASK_PLAN_MD).unwrap();
        assert_eq!(state.task, "second");
        assert!(state.findings.is_empty());
        assert!(state.progress.completed.is_empty());
    }

    #[test]
    fn legacy_markdown_is_imported() {
        let dir = TempDir::new().unwrap();
        let planning = dir.path().join(".claude/planning");
        std::fs::create_dir_all(&planning).unwrap();
        std::fs::write(
            planning.join("task_plan.md"),
            "# Task Plan\n\n## Current Task\n\nBuild login\n\n---\n\n## Goals\n\n- [ ] Add form\n- [x] Add route\n\n---\n\n## Approach\n\n(write the plan before starting)\n",
        )
        .unwrap();
        std::fs::write(
            planning.join("progress.md"),
            "# Progress\n\n## Completed\n\n- Task A\n\n---\n\n## In Progress\n\n*(none)*\n\n---\n\n## Blockers\n\n- slow CI\n\n---\n\n## Next\n\n*(to be decided)*\n\n---\n",
        )
        .unwrap();
        let legacy_findings = "# Findings\n\nold notes\n";
        std::fs::write(planning.join("findings.md"), legacy_findings).unwrap();

        let summary = refresh_goals(dir.path(), 500).unwrap();
        assert_eq!(summary.task, "Build login");
        assert_eq!(summary.goals, vec!["- [ ] Add form", "- [x] Add route"]);

        update_progress(dir.path(), completed(&["Task B"])).unwrap();
        let state = PlanningState::load(dir.path(), paths::PROGRESS_MD).unwrap();
        assert_eq!(state.progress.completed, vec!["Task A", "Task B"]);
        assert_eq!(state.approach, None);

        save_finding(dir.path(), finding("new", "entry")).unwrap();
        let findings = std::fs::read_to_string(planning.join("findings.md")).unwrap();
        assert!(findings.starts_with(legacy_findings));
        assert!(findings.contains("] new"));
    }

    #[test]
    fn init_accepts_approach_and_constraints() {
        let dir = TempDir::new().unwrap();
        let plan = NewPlan {
            task: "Build login".into(),
            goals: goals(&["Add form"]),
            approach: Some("Server-rendered form first".into()),
            constraints: goals(&["No new dependencies", "  "]),
        };
        init_planning(dir.path(), plan).unwrap();

        let doc = std::fs::read_to_string(paths::task_plan_path(dir.path())).unwrap();
        assert!(doc.contains("## Approach\n\nServer-rendered form first"));
        assert!(doc.contains("## Constraints\n\n- No new dependencies\n\n"));
        let state = PlanningState::load(dir.path(), paths::TASK_PLAN_MD).unwrap();
        assert_eq!(state.constraints, vec!["No new dependencies"]);
    }

    #[test]
    fn hand_edited_task_plan_survives_other_operations() {
        let dir = TempDir::new().unwrap();
        init_planning(dir.path(), NewPlan::new("Build login", &goals(&["Add form"]))).unwrap();
        let path = paths::task_plan_path(dir.path());
        let edited = std::fs::read_to_string(&path)
            .unwrap()
            .replace(markdown::NO_APPROACH, "Reuse the session middleware")
            .replace("- [ ] Add form", "- [x] Add form");
        std::fs::write(&path, &edited).unwrap();

        save_finding(dir.path(), finding("Auth", "JWT works")).unwrap();
        update_progress(dir.path(), completed(&["Task A"])).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), edited);
        let summary = refresh_goals(dir.path(), 500).unwrap();
        assert_eq!(summary.goals, vec!["- [x] Add form"]);
        let state = PlanningState::load(dir.path(), paths::TASK_PLAN_MD).unwrap();
        assert_eq!(state.approach.as_deref(), Some("Reuse the session middleware"));
    }

    #[test]
    fn hand_written_findings_are_kept_as_prefix() {
        let dir = TempDir::new().unwrap();
        init_planning(dir.path(), NewPlan::new("t", &[])).unwrap();
        let path = paths::findings_path(dir.path());
        let mut log = std::fs::read_to_string(&path).unwrap();
        log.push_str("\n---\n\n## Manual note\n\nCache headers are ignored by the proxy.\n");
        std::fs::write(&path, &log).unwrap();

        save_finding(dir.path(), finding("Proxy", "strips ETag")).unwrap();
        let after = std::fs::read_to_string(&path).unwrap();
        assert!(after.len() > log.len() && after.starts_with(&log));
        assert!(after.ends_with("### Conclusion\n(not specified)\n"));
    }

    #[test]
    fn progress_update_leaves_findings_untouched() {
        let dir = TempDir::new().unwrap();
        init_planning(dir.path(), NewPlan::new("t", &[])).unwrap();
        save_finding(dir.path(), finding("Auth", "JWT works")).unwrap();
        let path = paths::findings_path(dir.path());
        let before = std::fs::read_to_string(&path).unwrap();

        update_progress(dir.path(), completed(&["Task A"])).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn korean_planning_files_are_imported() {
        let dir = TempDir::new().unwrap();
        let planning = dir.path().join(".claude/planning");
        std::fs::create_dir_all(&planning).unwrap();
        std::fs::write(
            planning.join("task_plan.md"),
            "# Task Plan\n\n> 생성일: 2025-01-10 09:00\n\n---\n\n\
             ## 현재 작업\n\n로그인 구현\n\n---\n\n\
             ## 목표\n\n- [ ] 폼 추가\n- [x] 라우트 추가\n\n---\n\n\
             ## 접근 방식\n\n(작업 시작 전 계획 작성)\n\n---\n\n\
             ## 제약 조건\n\n- PRD에 명시된 범위 내에서만 작업\n- 테스트 없이 배포 금지\n\n---\n",
        )
        .unwrap();
        std::fs::write(
            planning.join("progress.md"),
            "# Progress\n\n> 마지막 업데이트: 2025-01-10 10:00\n\n---\n\n\
             ## 완료 (Completed)\n\n- Task A\n\n---\n\n\
             ## 진행중 (In Progress)\n\n*(없음)*\n\n---\n\n\
             ## 블로커 (Blockers)\n\n*(없음)*\n\n---\n\n\
             ## 다음 할 일 (Next)\n\n*(결정 필요)*\n\n---\n",
        )
        .unwrap();

        let summary = update_progress(dir.path(), completed(&["Task B"])).unwrap();
        assert_eq!(summary.completed_total, 2);
        assert_eq!(summary.blockers, 0);
        assert_eq!(summary.next, None);

        let state = PlanningState::load(dir.path(), paths::PROGRESS_MD).unwrap();
        assert_eq!(state.progress.completed, vec!["Task A", "Task B"]);
        assert_eq!(state.task, "로그인 구현");
        assert_eq!(state.goals.len(), 2);
        assert!(state.goals[1].done);
        assert_eq!(state.approach, None);
        assert_eq!(state.constraints.len(), 2);
    }
}
