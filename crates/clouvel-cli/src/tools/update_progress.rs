use super::{
    optional_string, path_schema, project_root, string_list, with_report, ClouvelTool,
};
use clouvel_core::planning::{update_progress, ProgressUpdate};
use std::path::Path;

pub struct UpdateProgressTool;

impl ClouvelTool for UpdateProgressTool {
    fn name(&self) -> &str {
        "update_progress"
    }

    fn description(&self) -> &str {
        "Record progress: completed items accumulate, while in-progress, blockers and next \
         are replaced"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": path_schema("Project root (default: server root)"),
                "completed": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Items finished since the last update"
                },
                "in_progress": { "type": "string", "description": "Current item" },
                "blockers": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Current blockers (replaces the previous list)"
                },
                "next": { "type": "string", "description": "Next step" }
            }
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let update = ProgressUpdate {
            completed: string_list(&args, "completed"),
            in_progress: optional_string(&args, "in_progress"),
            blockers: string_list(&args, "blockers"),
            next: optional_string(&args, "next"),
        };
        let project = project_root(&args, root);
        let summary = update_progress(&project, update).map_err(|e| e.to_string())?;
        with_report(&summary, summary.render())
    }
}
