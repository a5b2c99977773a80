use super::{
    optional_string, path_schema, project_root, required_str, string_list, with_report,
    ClouvelTool,
};
use clouvel_core::planning::{init_planning, NewPlan};
use std::path::Path;

pub struct InitPlanningTool;

impl ClouvelTool for InitPlanningTool {
    fn name(&self) -> &str {
        "init_planning"
    }

    fn description(&self) -> &str {
        "Start a new task: writes task_plan.md, findings.md and progress.md under \
         .claude/planning. Replaces any previous plan."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": path_schema("Project root (default: server root)"),
                "task": {
                    "type": "string",
                    "description": "The task being worked on"
                },
                "goals": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Goals for the task"
                },
                "approach": {
                    "type": "string",
                    "description": "How the task will be approached"
                },
                "constraints": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Constraints (default: stay within the PRD, no deploys without tests)"
                }
            },
            "required": ["task"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let plan = NewPlan {
            task: required_str(&args, "task")?.to_string(),
            goals: string_list(&args, "goals"),
            approach: optional_string(&args, "approach"),
            constraints: string_list(&args, "constraints"),
        };
        let project = project_root(&args, root);
        let result = init_planning(&project, plan).map_err(|e| e.to_string())?;
        with_report(&result, result.render())
    }
}
