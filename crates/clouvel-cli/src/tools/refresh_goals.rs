use super::{path_schema, project_root, ClouvelTool};
use clouvel_core::{config::Config, planning::refresh_goals};
use std::path::Path;

pub struct RefreshGoalsTool;

impl ClouvelTool for RefreshGoalsTool {
    fn name(&self) -> &str {
        "refresh_goals"
    }

    fn description(&self) -> &str {
        "Re-read the current task, goals and progress to keep focus during long sessions"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": path_schema("Project root (default: server root)")
            }
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let project = project_root(&args, root);
        let config = Config::load(&project).map_err(|e| e.to_string())?;
        let summary = refresh_goals(&project, config.planning.progress_excerpt_chars)
            .map_err(|e| e.to_string())?;
        Ok(serde_json::json!({
            "task": summary.task,
            "goals": summary.goals,
            "report": summary.render(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clouvel_core::planning::{init_planning, NewPlan};
    use tempfile::TempDir;

    #[test]
    fn returns_unchecked_goals() {
        let dir = TempDir::new().unwrap();
        let goals = vec!["Add form".to_string(), "Add route".to_string()];
        init_planning(dir.path(), NewPlan::new("Build login", &goals)).unwrap();

        let result = RefreshGoalsTool.call(serde_json::json!({}), dir.path()).unwrap();
        assert_eq!(result["task"], "Build login");
        assert_eq!(
            result["goals"],
            serde_json::json!(["- [ ] Add form", "- [ ] Add route"])
        );
    }
}
