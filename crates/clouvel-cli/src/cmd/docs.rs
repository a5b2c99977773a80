use crate::output::{print_json, print_table};
use anyhow::Context;
use clouvel_core::{config::Config, docs, gate};
use std::path::{Path, PathBuf};

/// Explicit directory, or the configured docs dir under `root`.
fn docs_dir(root: &Path, path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match path {
        Some(p) => Ok(p),
        None => {
            let config = Config::load(root).context("failed to load config")?;
            Ok(config.docs_path(root))
        }
    }
}

// ---------------------------------------------------------------------------
// can-code
// ---------------------------------------------------------------------------

pub fn can_code(root: &Path, path: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let dir = docs_dir(root, path)?;
    let decision = gate::check_gate(&dir)
        .with_context(|| format!("failed to check {}", dir.display()))?;

    if json {
        print_json(&decision)?;
    } else {
        println!("{}", decision.report);
    }

    if !decision.is_allowed() {
        let next = decision.next_document.as_deref().unwrap_or("PRD");
        anyhow::bail!("coding blocked: write the {next} next");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// scan-docs
// ---------------------------------------------------------------------------

pub fn scan(root: &Path, path: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let dir = docs_dir(root, path)?;
    let listing = docs::list_directory(&dir)?;

    if json {
        return print_json(&listing);
    }
    if listing.files.is_empty() {
        println!("No files in {}.", listing.path);
        return Ok(());
    }
    let rows = listing
        .files
        .iter()
        .map(|f| vec![f.name.clone(), docs::group_thousands(f.size)])
        .collect();
    print_table(&["FILE", "BYTES"], rows);
    println!("\n{} file(s)", listing.count);
    Ok(())
}

// ---------------------------------------------------------------------------
// analyze-docs
// ---------------------------------------------------------------------------

pub fn analyze(root: &Path, path: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let dir = docs_dir(root, path)?;
    let report = gate::analyze(&dir)?;
    if json {
        print_json(&report)
    } else {
        println!("{}", report.report);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// init-docs
// ---------------------------------------------------------------------------

pub fn init(root: &Path, project_name: Option<String>, json: bool) -> anyhow::Result<()> {
    let project_name = project_name.unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    });
    let config = Config::load(root).context("failed to load config")?;
    let result = docs::init_docs(&config.docs_path(root), &project_name)
        .context("failed to initialize docs")?;

    if json {
        print_json(&result)
    } else {
        print!("{}", result.render());
        Ok(())
    }
}
