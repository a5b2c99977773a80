use super::{path_schema, project_root, with_report, ClouvelTool};
use clouvel_core::scaffold::sync_commands;
use std::path::Path;

pub struct SyncCommandsTool;

impl ClouvelTool for SyncCommandsTool {
    fn name(&self) -> &str {
        "sync_commands"
    }

    fn description(&self) -> &str {
        "Link clouvel tools with Shovel slash commands and refresh the integration section \
         in CLAUDE.md"
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
        let report = sync_commands(&project).map_err(|e| e.to_string())?;
        with_report(&report, report.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clouvel_core::scaffold::install_shovel;
    use tempfile::TempDir;

    #[test]
    fn requires_scaffold() {
        let dir = TempDir::new().unwrap();
        let err = SyncCommandsTool.call(serde_json::json!({}), dir.path()).unwrap_err();
        assert!(err.contains("install_shovel"), "{err}");
    }

    #[test]
    fn inserts_claude_md_section() {
        let dir = TempDir::new().unwrap();
        install_shovel(dir.path()).unwrap();
        std::fs::write(dir.path().join("CLAUDE.md"), "# Rules\n").unwrap();

        let result = SyncCommandsTool.call(serde_json::json!({}), dir.path()).unwrap();
        assert_eq!(result["claude_md"], "inserted");
    }
}
