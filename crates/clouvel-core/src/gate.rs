//! Document gate: decides whether code may be written based on which
//! planning documents are present in a docs directory.
//!
//! Detection looks only at immediate file names (lower-cased), never at file
//! contents. A category is detected when any file name matches any of its
//! patterns.

use crate::error::{ClouvelError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// DocumentKind / Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Prd,
    Architecture,
    ApiSpec,
    DbSchema,
    Verification,
}

impl DocumentKind {
    /// Catalog order. Reports and "write next" guidance follow this order.
    pub fn all() -> &'static [DocumentKind] {
        &[
            DocumentKind::Prd,
            DocumentKind::Architecture,
            DocumentKind::ApiSpec,
            DocumentKind::DbSchema,
            DocumentKind::Verification,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Prd => "prd",
            DocumentKind::Architecture => "architecture",
            DocumentKind::ApiSpec => "api_spec",
            DocumentKind::DbSchema => "db_schema",
            DocumentKind::Verification => "verification",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DocumentKind::Prd => "PRD",
            DocumentKind::Architecture => "Architecture",
            DocumentKind::ApiSpec => "API Spec",
            DocumentKind::DbSchema => "DB Schema",
            DocumentKind::Verification => "Verification Plan",
        }
    }

    fn patterns(self) -> &'static [&'static str] {
        match self {
            DocumentKind::Prd => &["prd", "product.?requirement"],
            DocumentKind::Architecture => &["architect", "module"],
            DocumentKind::ApiSpec => &["api", "swagger", "openapi"],
            DocumentKind::DbSchema => &["schema", "database", "db"],
            DocumentKind::Verification => &["verif", "test.?plan"],
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Absence always blocks.
    Critical,
    /// Reported but never blocks.
    Recommended,
}

// ---------------------------------------------------------------------------
// RequiredDocumentSpec
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct RequiredDocumentSpec {
    pub kind: DocumentKind,
    pub display_name: &'static str,
    pub patterns: Vec<Regex>,
    pub priority: Priority,
}

impl RequiredDocumentSpec {
    /// True if at least one file name matches at least one pattern.
    pub fn is_detected<S: AsRef<str>>(&self, file_names: &[S]) -> bool {
        file_names.iter().any(|name| {
            let name = name.as_ref().to_lowercase();
            self.patterns.iter().any(|p| p.is_match(&name))
        })
    }
}

static CATALOG: OnceLock<Vec<RequiredDocumentSpec>> = OnceLock::new();

pub fn required_documents() -> &'static [RequiredDocumentSpec] {
    CATALOG.get_or_init(|| {
        DocumentKind::all()
            .iter()
            .map(|&kind| RequiredDocumentSpec {
                kind,
                display_name: kind.display_name(),
                patterns: kind
                    .patterns()
                    .iter()
                    .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
                    .collect(),
                priority: Priority::Critical,
            })
            .collect()
    })
}

// ---------------------------------------------------------------------------
// DocumentScan
// ---------------------------------------------------------------------------

/// Derived view of a docs directory: which catalog entries are present.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentScan {
    /// Lower-cased immediate file names, sorted.
    pub files: Vec<String>,
    pub detected: Vec<DocumentKind>,
    pub missing: Vec<DocumentKind>,
}

impl DocumentScan {
    pub fn from_file_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut files: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().to_lowercase())
            .collect();
        files.sort();

        let mut detected = Vec::new();
        let mut missing = Vec::new();
        for spec in required_documents() {
            if spec.is_detected(&files) {
                detected.push(spec.kind);
            } else {
                missing.push(spec.kind);
            }
        }
        Self {
            files,
            detected,
            missing,
        }
    }

    /// Scan the immediate files of `dir` (subdirectories are ignored).
    pub fn scan(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            return Err(ClouvelError::PathNotFound(dir.display().to_string()));
        }
        if !dir.is_dir() {
            return Err(ClouvelError::NotADirectory(dir.display().to_string()));
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            // Follows symlinks, so linked documents count.
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(Self::from_file_names(names))
    }

    fn critical_missing(&self) -> Vec<DocumentKind> {
        required_documents()
            .iter()
            .filter(|s| s.priority == Priority::Critical && self.missing.contains(&s.kind))
            .map(|s| s.kind)
            .collect()
    }

    /// Fraction of critical categories detected. 1.0 when none are critical.
    pub fn coverage(&self) -> f64 {
        let critical: Vec<&RequiredDocumentSpec> = required_documents()
            .iter()
            .filter(|s| s.priority == Priority::Critical)
            .collect();
        if critical.is_empty() {
            return 1.0;
        }
        let found = critical
            .iter()
            .filter(|s| self.detected.contains(&s.kind))
            .count();
        found as f64 / critical.len() as f64
    }

    pub fn allows_coding(&self) -> bool {
        self.critical_missing().is_empty()
    }
}

fn display_names(kinds: &[DocumentKind]) -> Vec<String> {
    kinds.iter().map(|k| k.display_name().to_string()).collect()
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("- {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// GateDecision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    Allowed,
    Blocked,
}

#[derive(Debug, Clone, Serialize)]
pub struct GateDecision {
    pub status: GateStatus,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub detected: Vec<String>,
    pub missing: Vec<String>,
    /// The first missing critical document in catalog order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_document: Option<String>,
    pub report: String,
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        self.status == GateStatus::Allowed
    }
}

/// Decide whether coding may start. Never mutates the filesystem.
pub fn check_gate(dir: &Path) -> Result<GateDecision> {
    let path = dir.display().to_string();

    let scan = match DocumentScan::scan(dir) {
        Ok(scan) => scan,
        Err(ClouvelError::PathNotFound(_)) => return Ok(directory_missing(path)),
        Err(ClouvelError::NotADirectory(_)) => {
            let mut decision = directory_missing(path);
            decision.reason = Some("documents path is not a directory".to_string());
            return Ok(decision);
        }
        Err(e) => return Err(e),
    };

    let detected = display_names(&scan.detected);
    let critical_missing = scan.critical_missing();

    if critical_missing.is_empty() {
        let report = format!(
            "# ✅ Coding allowed\n\n\
             ## Documents\n\
             All required documents are in place:\n{}\n\n\
             ## Before writing code\n\
             - [ ] Follow the requirements in the PRD\n\
             - [ ] Respect the module boundaries in the architecture doc\n\
             - [ ] Implement the interfaces exactly as the API spec describes\n\
             - [ ] Match the persistence layout in the DB schema\n\
             - [ ] Test according to the verification plan\n",
            bullet_list(&detected)
        );
        return Ok(GateDecision {
            status: GateStatus::Allowed,
            path,
            reason: None,
            detected,
            missing: display_names(&scan.missing),
            next_document: None,
            report,
        });
    }

    let missing = display_names(&critical_missing);
    let next = missing[0].clone();
    let detected_block = if detected.is_empty() {
        "none".to_string()
    } else {
        bullet_list(&detected)
    };
    let report = format!(
        "# ⛔ Coding blocked\n\n\
         ## Current state\n\
         ✅ Present:\n{detected_block}\n\n\
         ❌ Missing (required):\n{}\n\n\
         ## What to do now\n\
         Do not write code. Instead:\n\n\
         1. Write the **{next}** next\n\
         2. Then write, in order: {}\n\
         3. Use `init_docs` to create templates for every missing document\n\n\
         ## Message for the user\n\
         \"Before writing code we need the design documents. \
         {} required document(s) are missing: {}. Shall I help write the {next}?\"\n",
        bullet_list(&missing),
        missing.join(", "),
        missing.len(),
        missing.join(", "),
    );

    Ok(GateDecision {
        status: GateStatus::Blocked,
        path,
        reason: Some("required documents missing".to_string()),
        detected,
        missing,
        next_document: Some(next),
        report,
    })
}

fn directory_missing(path: String) -> GateDecision {
    let report = format!(
        "# ⛔ Coding blocked\n\n\
         ## Reason\n\
         Documents directory not found: `{path}`\n\n\
         ## What to do now\n\
         1. Create the `docs` directory\n\
         2. Write the PRD (product requirements document) first\n\
         3. `init_docs` scaffolds templates for all required documents\n\n\
         **Documents first, code later.**\n"
    );
    let missing = display_names(DocumentKind::all());
    GateDecision {
        status: GateStatus::Blocked,
        path,
        reason: Some("documents directory missing".to_string()),
        detected: Vec::new(),
        next_document: missing.first().cloned(),
        missing,
        report,
    }
}

// ---------------------------------------------------------------------------
// CoverageReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub path: String,
    /// Fraction in `0.0..=1.0`.
    pub coverage: f64,
    pub percent: u32,
    pub detected: Vec<String>,
    pub missing: Vec<String>,
    pub report: String,
}

/// Informational variant of [`check_gate`]: coverage only, never blocks.
pub fn analyze(dir: &Path) -> Result<CoverageReport> {
    let scan = DocumentScan::scan(dir)?;
    let coverage = scan.coverage();
    let percent = (coverage * 100.0).round() as u32;
    let detected = display_names(&scan.detected);
    let missing = display_names(&scan.missing);

    let mut report = format!(
        "## Analysis: {}\n\nCoverage: {percent}%\n\n",
        dir.display()
    );
    if !detected.is_empty() {
        report.push_str(&format!("### Present\n{}\n\n", bullet_list(&detected)));
    }
    if missing.is_empty() {
        report.push_str("✅ All required documents present. Ready to start coding.\n");
    } else {
        report.push_str(&format!(
            "### Missing (to write)\n{}\n\n",
            bullet_list(&missing)
        ));
        report.push_str(&format!(
            "⛔ Write {} document(s) before starting to code.\n",
            missing.len()
        ));
    }

    Ok(CoverageReport {
        path: dir.display().to_string(),
        coverage,
        percent,
        detected,
        missing,
        report,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
