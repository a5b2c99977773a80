use super::{docs_dir, path_schema, ClouvelTool};
use clouvel_core::docs::list_directory;
use std::path::Path;

pub struct ScanDocsTool;

impl ClouvelTool for ScanDocsTool {
    fn name(&self) -> &str {
        "scan_docs"
    }

    fn description(&self) -> &str {
        "List the files in the documents directory with their sizes"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": path_schema("Directory to list (default: the configured docs dir)")
            }
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let dir = docs_dir(&args, root)?;
        let listing = list_directory(&dir).map_err(|e| e.to_string())?;
        Ok(serde_json::json!({
            "path": listing.path,
            "count": listing.count,
            "files": listing.files.iter().map(|f| f.label()).collect::<Vec<_>>(),
            "report": listing.render(),
        }))
    }
}
