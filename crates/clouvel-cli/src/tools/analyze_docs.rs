use super::{docs_dir, path_schema, ClouvelTool};
use clouvel_core::gate::analyze;
use std::path::Path;

pub struct AnalyzeDocsTool;

impl ClouvelTool for AnalyzeDocsTool {
    fn name(&self) -> &str {
        "analyze_docs"
    }

    fn description(&self) -> &str {
        "Report which required documents are present and the coverage percentage"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": path_schema("Documents directory (default: the configured docs dir)")
            }
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String> {
        let dir = docs_dir(&args, root)?;
        let report = analyze(&dir).map_err(|e| e.to_string())?;
        serde_json::to_value(&report).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reports_partial_coverage() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/PRD.md"), "x").unwrap();
        std::fs::write(dir.path().join("docs/openapi.yaml"), "x").unwrap();

        let result = AnalyzeDocsTool.call(serde_json::json!({}), dir.path()).unwrap();
        assert_eq!(result["percent"], 40);
        assert_eq!(result["missing"].as_array().unwrap().len(), 3);
    }
}
