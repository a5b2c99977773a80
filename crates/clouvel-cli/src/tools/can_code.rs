use super::{docs_dir, path_schema, ClouvelTool};
use clouvel_core::gate::check_gate;
use std::path::Path;

pub struct CanCodeTool;

impl ClouvelTool for CanCodeTool {
    fn name(&self) -> &str {
        "can_code"
    }

    fn description(&self) -> &str {
        "Check whether coding may start. Blocks until PRD, architecture, API spec, \
         DB schema and verification plan documents exist. Call before writing any code."
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
        let decision = check_gate(&dir).map_err(|e| e.to_string())?;
        serde_json::to_value(&decision).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn blocks_with_single_draft() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/prd_draft.txt"), "draft").unwrap();

        let result = CanCodeTool.call(serde_json::json!({}), dir.path()).unwrap();
        assert_eq!(result["status"], "blocked");
        assert_eq!(result["missing"].as_array().unwrap().len(), 4);
        assert_eq!(result["next_document"], "Architecture");
    }

    #[test]
    fn allows_with_full_set_at_explicit_path() {
        let dir = TempDir::new().unwrap();
        let specs = dir.path().join("specs");
        std::fs::create_dir_all(&specs).unwrap();
        for f in ["PRD.md", "architecture.md", "api.yaml", "schema.sql", "test_plan.md"] {
            std::fs::write(specs.join(f), "x").unwrap();
        }

        let result = CanCodeTool
            .call(serde_json::json!({"path": "specs"}), dir.path())
            .unwrap();
        assert_eq!(result["status"], "allowed");
    }

    #[test]
    fn missing_dir_is_blocked_not_an_error() {
        let dir = TempDir::new().unwrap();
        let result = CanCodeTool.call(serde_json::json!({}), dir.path()).unwrap();
        assert_eq!(result["status"], "blocked");
        assert_eq!(result["reason"], "documents directory missing");
    }
}
