use crate::error::{ClouvelError, Result};
use crate::io;
use chrono::Local;
use serde::Serialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ListedFile {
    pub name: String,
    pub size: u64,
}

impl ListedFile {
    /// `name (1,234 bytes)`
    pub fn label(&self) -> String {
        format!("{} ({} bytes)", self.name, group_thousands(self.size))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub path: String,
    pub count: usize,
    pub files: Vec<ListedFile>,
}

impl Listing {
    pub fn render(&self) -> String {
        let mut out = format!("📁 {}\n{} file(s)\n\n", self.path, self.count);
        let labels: Vec<String> = self.files.iter().map(ListedFile::label).collect();
        out.push_str(&labels.join("\n"));
        out
    }
}

/// List the immediate files of `dir`, sorted by name.
pub fn list_directory(dir: &Path) -> Result<Listing> {
    if !dir.exists() {
        return Err(ClouvelError::PathNotFound(dir.display().to_string()));
    }
    if !dir.is_dir() {
        return Err(ClouvelError::NotADirectory(dir.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        // Follow symlinks; a dangling link is skipped.
        let Ok(meta) = std::fs::metadata(entry.path()) else {
            continue;
        };
        if meta.is_file() {
            files.push(ListedFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: meta.len(),
            });
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Listing {
        path: dir.display().to_string(),
        count: files.len(),
        files,
    })
}

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

/// Template files written by [`init_docs`], in catalog order.
pub const DOC_TEMPLATES: &[(&str, &str, &str)] = &[
    ("PRD.md", "PRD", "## One-line summary"),
    ("ARCHITECTURE.md", "Architecture", "## System structure"),
    ("API.md", "API Spec", "## Endpoints"),
    ("DATABASE.md", "DB Schema", "## Tables"),
    ("VERIFICATION.md", "Verification Plan", "## Test cases"),
];

#[derive(Debug, Clone, Serialize)]
pub struct DocsInit {
    pub docs_path: String,
    pub created: Vec<String>,
    pub existing: Vec<String>,
}

impl DocsInit {
    pub fn render(&self) -> String {
        let mut out = format!(
            "## docs directory initialized\n\nPath: `{}`\n\n",
            self.docs_path
        );
        if self.created.is_empty() {
            out.push_str("All files already exist.\n\n");
        } else {
            out.push_str("### Created\n");
            for f in &self.created {
                out.push_str(&format!("- {f}\n"));
            }
            out.push('\n');
        }
        out.push_str(
            "### Next steps\n1. Start with PRD.md\n2. Run `can_code` once every document is written\n",
        );
        out
    }
}

fn template_body(project_name: &str, title: &str, section: &str, date: &str) -> String {
    format!("# {project_name} {title}\n\n> Created: {date}\n\n{section}\n\n[To be written]\n")
}

/// Ensure `docs_dir` exists and write each missing template. Existing files
/// are never overwritten, so a second call writes nothing.
pub fn init_docs(docs_dir: &Path, project_name: &str) -> Result<DocsInit> {
    io::ensure_dir(docs_dir)?;
    let date = Local::now().format("%Y-%m-%d").to_string();

    let mut created = Vec::new();
    let mut existing = Vec::new();
    for (file, title, section) in DOC_TEMPLATES {
        let body = template_body(project_name, title, section, &date);
        if io::write_if_missing(&docs_dir.join(file), body.as_bytes())? {
            created.push(file.to_string());
        } else {
            existing.push(file.to_string());
        }
    }

    Ok(DocsInit {
        docs_path: docs_dir.display().to_string(),
        created,
        existing,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
