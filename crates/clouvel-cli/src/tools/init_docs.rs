use super::{path_schema, project_root, with_report, ClouvelTool};
use clouvel_core::{config::Config, docs::init_docs};
use std::path::Path;

pub struct InitDocsTool;

impl ClouvelTool for InitDocsTool {
    fn name(&self) -> &str {
        "init_docs"
    }

    fn description(&self) -> &str {
        "Create the docs directory with PRD, architecture, API, database and verification \
         templates. Existing files are never overwritten."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": path_schema("Project root (default: server root)"),
                "project_name": {
                    "type": "string",
                    "description": "Project name used in template titles"
                }
            },
            "required": ["project_name"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let project_name = super::required_str(&args, "project_name")?;
        let project = project_root(&args, root);
        let config = Config::load(&project).map_err(|e| e.to_string())?;
        let result =
            init_docs(&config.docs_path(&project), project_name).map_err(|e| e.to_string())?;
        with_report(&result, result.render())
    }
}
