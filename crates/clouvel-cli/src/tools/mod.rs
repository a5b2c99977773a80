use clouvel_core::config::Config;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub mod analyze_docs;
pub mod can_code;
pub mod init_docs;
pub mod init_planning;
pub mod install_shovel;
pub mod refresh_goals;
pub mod save_finding;
pub mod scan_docs;
pub mod sync_commands;
pub mod update_progress;

pub trait ClouvelTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> serde_json::Value;
    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String>;
}

pub fn all_tools() -> Vec<Box<dyn ClouvelTool>> {
    vec![
        Box::new(can_code::CanCodeTool),
        Box::new(scan_docs::ScanDocsTool),
        Box::new(analyze_docs::AnalyzeDocsTool),
        Box::new(init_docs::InitDocsTool),
        Box::new(init_planning::InitPlanningTool),
        Box::new(save_finding::SaveFindingTool),
        Box::new(refresh_goals::RefreshGoalsTool),
        Box::new(update_progress::UpdateProgressTool),
        Box::new(install_shovel::InstallShovelTool),
        Box::new(sync_commands::SyncCommandsTool),
    ]
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

/// Optional `path` argument, resolved against the server root when relative.
pub(crate) fn path_arg(args: &serde_json::Value, root: &Path) -> Option<PathBuf> {
    args["path"]
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(|s| root.join(s))
}

/// Project root for a call: the `path` argument, or the server root.
pub(crate) fn project_root(args: &serde_json::Value, root: &Path) -> PathBuf {
    path_arg(args, root).unwrap_or_else(|| root.to_path_buf())
}

/// Documents directory for a call: the `path` argument, or the configured docs dir.
pub(crate) fn docs_dir(args: &serde_json::Value, root: &Path) -> Result<PathBuf, String> {
    if let Some(p) = path_arg(args, root) {
        return Ok(p);
    }
    let config = Config::load(root).map_err(|e| e.to_string())?;
    Ok(config.docs_path(root))
}

pub(crate) fn required_str<'a>(args: &'a serde_json::Value, key: &str) -> Result<&'a str, String> {
    args[key]
        .as_str()
        .ok_or_else(|| format!("missing required argument: {key}"))
}

pub(crate) fn optional_string(args: &serde_json::Value, key: &str) -> Option<String> {
    args[key].as_str().map(str::to_string)
}

/// String array argument; absent or non-array yields an empty list.
pub(crate) fn string_list(args: &serde_json::Value, key: &str) -> Vec<String> {
    args[key]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Serialize a tool result and attach its rendered summary as `report`, the
/// text the MCP server hands back to the assistant.
pub(crate) fn with_report<T: Serialize>(
    result: &T,
    report: String,
) -> Result<serde_json::Value, String> {
    let mut value = serde_json::to_value(result).map_err(|e| e.to_string())?;
    match value.as_object_mut() {
        Some(fields) => {
            fields.insert("report".to_string(), report.into());
            Ok(value)
        }
        None => Err("tool result is not an object".to_string()),
    }
}

pub(crate) fn path_schema(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}
