use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const DOCS_DIR: &str = "docs";

pub const CLAUDE_DIR: &str = ".claude";
pub const PLANNING_DIR: &str = ".claude/planning";
pub const PLANS_DIR: &str = ".claude/plans";
pub const COMMANDS_DIR: &str = ".claude/commands";
pub const TEMPLATES_DIR: &str = ".claude/templates";
pub const SCRIPTS_DIR: &str = "scripts";

pub const CONFIG_FILE: &str = ".claude/clouvel.yaml";
pub const SETTINGS_FILE: &str = ".claude/settings.json";
pub const SESSION_STATE_FILE: &str = ".claude/status/session-state.json";
pub const CURRENT_STATUS_FILE: &str = ".claude/status/current.md";
pub const GIT_HEAD_FILE: &str = ".git/HEAD";

pub const PLANNING_RECORD: &str = "planning.yaml";
pub const TASK_PLAN_MD: &str = "task_plan.md";
pub const FINDINGS_MD: &str = "findings.md";
pub const PROGRESS_MD: &str = "progress.md";

pub const CLAUDE_MD: &str = "CLAUDE.md";
pub const ERROR_LOG_MD: &str = "ERROR_LOG.md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn docs_dir(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}

pub fn claude_dir(root: &Path) -> PathBuf {
    root.join(CLAUDE_DIR)
}

pub fn planning_dir(root: &Path) -> PathBuf {
    root.join(PLANNING_DIR)
}

pub fn planning_record_path(root: &Path) -> PathBuf {
    planning_dir(root).join(PLANNING_RECORD)
}

pub fn task_plan_path(root: &Path) -> PathBuf {
    planning_dir(root).join(TASK_PLAN_MD)
}

pub fn findings_path(root: &Path) -> PathBuf {
    planning_dir(root).join(FINDINGS_MD)
}

pub fn progress_path(root: &Path) -> PathBuf {
    planning_dir(root).join(PROGRESS_MD)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn session_state_path(root: &Path) -> PathBuf {
    root.join(SESSION_STATE_FILE)
}

pub fn current_status_path(root: &Path) -> PathBuf {
    root.join(CURRENT_STATUS_FILE)
}

pub fn plans_dir(root: &Path) -> PathBuf {
    root.join(PLANS_DIR)
}

pub fn claude_md_path(root: &Path) -> PathBuf {
    root.join(CLAUDE_MD)
}

pub fn git_head_path(root: &Path) -> PathBuf {
    root.join(GIT_HEAD_FILE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            task_plan_path(root),
            PathBuf::from("/tmp/proj/.claude/planning/task_plan.md")
        );
        assert_eq!(
            session_state_path(root),
            PathBuf::from("/tmp/proj/.claude/status/session-state.json")
        );
        assert_eq!(git_head_path(root), PathBuf::from("/tmp/proj/.git/HEAD"));
        assert_eq!(docs_dir(root, DOCS_DIR), PathBuf::from("/tmp/proj/docs"));
    }
}
