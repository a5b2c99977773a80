//! Markdown views of the planning record, and the heading scanner used to
//! fold hand edits back into the record and to import planning documents that
//! predate `planning.yaml`.
//!
//! Headings are fixed literals. Renaming one breaks import of older files, so
//! the constants below are the only place they are spelled out.

use crate::planning::{Finding, Goal, PlanningState, Progress};

pub const TASK_HEADING: &str = "## Current Task";
pub const GOALS_HEADING: &str = "## Goals";
pub const APPROACH_HEADING: &str = "## Approach";
pub const CONSTRAINTS_HEADING: &str = "## Constraints";
pub const COMPLETED_HEADING: &str = "## Completed";
pub const IN_PROGRESS_HEADING: &str = "## In Progress";
pub const BLOCKERS_HEADING: &str = "## Blockers";
pub const NEXT_HEADING: &str = "## Next";

// Accepted on scan, rendered heading first. The Korean forms are the ones
// older planning directories were written with.
pub const TASK_HEADINGS: &[&str] = &[TASK_HEADING, "## 현재 작업"];
pub const GOALS_HEADINGS: &[&str] = &[GOALS_HEADING, "## 목표"];
pub const APPROACH_HEADINGS: &[&str] = &[APPROACH_HEADING, "## 접근 방식"];
pub const CONSTRAINTS_HEADINGS: &[&str] = &[CONSTRAINTS_HEADING, "## 제약 조건"];
pub const COMPLETED_HEADINGS: &[&str] = &[COMPLETED_HEADING, "## 완료 (Completed)", "## 완료"];
pub const IN_PROGRESS_HEADINGS: &[&str] =
    &[IN_PROGRESS_HEADING, "## 진행중 (In Progress)", "## 진행중"];
pub const BLOCKERS_HEADINGS: &[&str] = &[BLOCKERS_HEADING, "## 블로커 (Blockers)", "## 블로커"];
pub const NEXT_HEADINGS: &[&str] = &[NEXT_HEADING, "## 다음 할 일 (Next)", "## 다음 할 일"];

pub const NO_GOALS: &str = "(goals to be defined)";
pub const NO_APPROACH: &str = "(write the plan before starting)";
pub const NONE_YET: &str = "*(none yet)*";
pub const NONE: &str = "*(none)*";
pub const UNDECIDED: &str = "*(to be decided)*";
pub const NOT_SPECIFIED: &str = "(not specified)";

const PLACEHOLDERS: &[&str] = &[
    NO_GOALS,
    NO_APPROACH,
    NONE_YET,
    NONE,
    UNDECIDED,
    "(목표 정의 필요)",
    "(작업 시작 전 계획 작성)",
    "*(아직 없음)*",
    "*(없음)*",
    "*(결정 필요)*",
];

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// True for the sentinel text an empty section renders with.
pub fn is_placeholder(text: &str) -> bool {
    PLACEHOLDERS.contains(&text.trim())
}

// ---------------------------------------------------------------------------
// Section scanning
// ---------------------------------------------------------------------------

fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 {
        return None;
    }
    match line[hashes..].chars().next() {
        Some(' ') | None => Some(hashes),
        _ => None,
    }
}

/// Whether any of `headings` appears as a line of `doc`.
pub fn has_section(doc: &str, headings: &[&str]) -> bool {
    doc.lines().any(|l| headings.contains(&l.trim_end()))
}

/// Lines between the first of `headings` found and the next heading of equal
/// or higher level. Returns an empty vec when no heading matches.
pub fn section_lines<'a>(doc: &'a str, headings: &[&str]) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut level = None;
    for line in doc.lines() {
        match level {
            Some(level) => {
                if heading_level(line).is_some_and(|l| l <= level) {
                    break;
                }
                out.push(line);
            }
            None if headings.contains(&line.trim_end()) => level = heading_level(line),
            None => {}
        }
    }
    out
}

/// Bullet items (`- ...`) of a section, marker stripped, trimmed, placeholders dropped.
pub fn section_items(doc: &str, headings: &[&str]) -> Vec<String> {
    section_lines(doc, headings)
        .into_iter()
        .filter_map(|l| l.trim().strip_prefix("- "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !is_placeholder(s))
        .collect()
}

/// Free text of a section up to its closing horizontal rule, trimmed.
pub fn section_text(doc: &str, headings: &[&str]) -> String {
    section_lines(doc, headings)
        .into_iter()
        .take_while(|l| l.trim() != "---")
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Parse a `- [ ] text` / `- [x] text` line into a goal.
pub fn parse_goal(line: &str) -> Option<Goal> {
    let rest = line.trim().strip_prefix("- ")?;
    let (done, text) = if let Some(t) = rest.strip_prefix("[ ] ") {
        (false, t)
    } else if let Some(t) = rest
        .strip_prefix("[x] ")
        .or_else(|| rest.strip_prefix("[X] "))
    {
        (true, t)
    } else {
        (false, rest)
    };
    let text = text.trim();
    if text.is_empty() || is_placeholder(text) {
        return None;
    }
    Some(Goal {
        text: text.to_string(),
        done,
    })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn bullets_or(items: &[String], placeholder: &str) -> String {
    if items.is_empty() {
        placeholder.to_string()
    } else {
        items
            .iter()
            .map(|i| format!("- {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn render_task_plan(state: &PlanningState) -> String {
    let goals = if state.goals.is_empty() {
        format!("- [ ] {NO_GOALS}")
    } else {
        state
            .goals
            .iter()
            .map(Goal::checklist_line)
            .collect::<Vec<_>>()
            .join("\n")
    };
    let approach = state.approach.as_deref().unwrap_or(NO_APPROACH);
    format!(
        "# Task Plan\n\n\
         > Created: {created}\n\n\
         ---\n\n\
         {TASK_HEADING}\n\n{task}\n\n\
         ---\n\n\
         {GOALS_HEADING}\n\n{goals}\n\n\
         ---\n\n\
         {APPROACH_HEADING}\n\n{approach}\n\n\
         ---\n\n\
         {CONSTRAINTS_HEADING}\n\n{constraints}\n\n\
         ---\n\n\
         > 💡 Use `refresh_goals` to re-read the current goals.\n",
        created = state.created_at.format(TIME_FORMAT),
        task = state.task,
        constraints = bullets_or(&state.constraints, NONE),
    )
}

/// Header of a fresh findings log. Stable for the lifetime of the record so
/// that each append only adds bytes at the end.
pub fn render_findings_header(state: &PlanningState) -> String {
    format!(
        "# Findings\n\n\
         > Investigation log\n\
         > Created: {}\n\n\
         ---\n\n\
         ## 2-Action Rule\n\n\
         > After every 2 view/browser actions, record a finding here!\n",
        state.created_at.format(TIME_FORMAT)
    )
}

pub fn render_finding(finding: &Finding) -> String {
    let or_unspecified = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_SPECIFIED.to_string());
    format!(
        "\n---\n\n\
         ## [{ts}] {topic}\n\n\
         ### Question\n{question}\n\n\
         ### Findings\n{body}\n\n\
         ### Source\n{source}\n\n\
         ### Conclusion\n{conclusion}\n",
        ts = finding.recorded_at.format(TIME_FORMAT),
        topic = finding.topic,
        question = or_unspecified(&finding.question),
        body = finding.body,
        source = or_unspecified(&finding.source),
        conclusion = or_unspecified(&finding.conclusion),
    )
}

pub fn render_findings(state: &PlanningState) -> String {
    let mut out = match &state.imported_findings {
        Some(raw) => raw.clone(),
        None => render_findings_header(state),
    };
    for finding in &state.findings {
        out.push_str(&render_finding(finding));
    }
    out
}

pub fn render_progress(progress: &Progress) -> String {
    let in_progress = match &progress.in_progress {
        Some(item) => format!("- {item}"),
        None => NONE.to_string(),
    };
    format!(
        "# Progress\n\n\
         > Last updated: {updated}\n\n\
         ---\n\n\
         {COMPLETED_HEADING}\n\n{completed}\n\n\
         ---\n\n\
         {IN_PROGRESS_HEADING}\n\n{in_progress}\n\n\
         ---\n\n\
         {BLOCKERS_HEADING}\n\n{blockers}\n\n\
         ---\n\n\
         {NEXT_HEADING}\n\n{next}\n\n\
         ---\n\n\
         > 💡 Update with `update_progress`.\n",
        updated = progress.updated_at.format(TIME_FORMAT),
        completed = bullets_or(&progress.completed, NONE_YET),
        blockers = bullets_or(&progress.blockers, NONE),
        next = progress.next.as_deref().unwrap_or(UNDECIDED),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Title\n\n## Goals\n\n- [ ] one\n- [x] two\n\n### Detail\n\n- nested\n\n## Other\n\n- out\n";

    #[test]
    fn section_stops_at_same_level_heading() {
        let items = section_items(DOC, GOALS_HEADINGS);
        assert_eq!(items, vec!["[ ] one", "[x] two", "nested"]);
    }

    #[test]
    fn missing_heading_is_empty() {
        assert!(section_lines(DOC, &["## Nope"]).is_empty());
    }

    #[test]
    fn heading_match_is_literal() {
        let doc = "## Goals (v2)\n- [ ] hidden\n";
        assert!(section_lines(doc, GOALS_HEADINGS).is_empty());
    }

    #[test]
    fn hashtag_text_is_not_a_heading() {
        let doc = "## Goals\n#tag line\n- [ ] kept\n";
        assert_eq!(section_items(doc, GOALS_HEADINGS), vec!["[ ] kept"]);
    }

    #[test]
    fn parse_goal_variants() {
        assert_eq!(
            parse_goal("- [ ] Add form"),
            Some(Goal {
                text: "Add form".into(),
                done: false
            })
        );
        assert!(parse_goal("  - [x] Ship").unwrap().done);
        assert_eq!(parse_goal("- [ ] (goals to be defined)"), None);
        assert_eq!(parse_goal("not a bullet"), None);
    }

    #[test]
    fn section_text_stops_at_rule() {
        let doc = "## Next\n\nship it\n\n---\n\n> footer\n";
        assert_eq!(section_text(doc, NEXT_HEADINGS), "ship it");
    }

    #[test]
    fn korean_headings_and_placeholders_are_recognized() {
        let doc = "# Progress\n\n## 완료 (Completed)\n\n- Task A\n\n---\n\n\
                   ## 진행중 (In Progress)\n\n*(없음)*\n\n---\n\n\
                   ## 다음 할 일 (Next)\n\n*(결정 필요)*\n";
        assert_eq!(section_items(doc, COMPLETED_HEADINGS), vec!["Task A"]);
        assert!(section_items(doc, IN_PROGRESS_HEADINGS).is_empty());
        assert!(is_placeholder(&section_text(doc, NEXT_HEADINGS)));
        assert!(has_section(doc, NEXT_HEADINGS));
        assert!(!has_section(doc, BLOCKERS_HEADINGS));
        assert_eq!(parse_goal("- [ ] (목표 정의 필요)"), None);
    }

    #[test]
    fn short_korean_completed_heading_matches() {
        let doc = "## 완료\n\n- one\n- two\n\n## 블로커\n\n- CI\n";
        assert_eq!(section_items(doc, COMPLETED_HEADINGS), vec!["one", "two"]);
        assert_eq!(section_items(doc, BLOCKERS_HEADINGS), vec!["CI"]);
    }
}
