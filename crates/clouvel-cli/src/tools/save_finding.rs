use super::{
    optional_string, path_schema, project_root, required_str, with_report, ClouvelTool,
};
use clouvel_core::planning::{save_finding, NewFinding};
use std::path::Path;

pub struct SaveFindingTool;

impl ClouvelTool for SaveFindingTool {
    fn name(&self) -> &str {
        "save_finding"
    }

    fn description(&self) -> &str {
        "Append an investigation finding to findings.md (2-Action Rule: record one after \
         every two view or browser actions)"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": path_schema("Project root (default: server root)"),
                "topic": { "type": "string", "description": "Short topic title" },
                "question": { "type": "string", "description": "What was investigated" },
                "findings": { "type": "string", "description": "What was found" },
                "source": { "type": "string", "description": "Where it was found" },
                "conclusion": { "type": "string", "description": "How it will be applied" }
            },
            "required": ["topic", "findings"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let finding = NewFinding {
            topic: required_str(&args, "topic")?.to_string(),
            question: optional_string(&args, "question"),
            body: required_str(&args, "findings")?.to_string(),
            source: optional_string(&args, "source"),
            conclusion: optional_string(&args, "conclusion"),
        };
        let project = project_root(&args, root);
        let saved = save_finding(&project, finding).map_err(|e| e.to_string())?;
        with_report(&saved, saved.render())
    }
}
