use super::{path_schema, project_root, with_report, ClouvelTool};
use clouvel_core::scaffold::install_shovel;
use std::path::Path;

pub struct InstallShovelTool;

impl ClouvelTool for InstallShovelTool {
    fn name(&self) -> &str {
        "install_shovel"
    }

    fn description(&self) -> &str {
        "Install the Shovel .claude/ layout: settings, slash commands, templates and the \
         gate script"
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
        let report = install_shovel(&project).map_err(|e| e.to_string())?;
        with_report(&report, report.render())
    }
}
