//! Shovel scaffold: the `.claude/` command, template and hook layout, and the
//! managed integration section in `CLAUDE.md`.

use crate::error::{ClouvelError, Result};
use crate::{io, paths};
use serde::Serialize;
use serde_json::json;
use std::path::Path;

/// Marker that opens the managed section in CLAUDE.md.
pub const SECTION_START: &str = "<!-- clouvel:start -->";
/// Closing marker for the managed section in CLAUDE.md.
pub const SECTION_END: &str = "<!-- clouvel:end -->";

const SUBDIRS: &[&str] = &["commands", "templates", "evidence", "logs", "plans"];

const COMMANDS: &[(&str, &str)] = &[
    ("start.md", START_COMMAND),
    ("check-complete.md", CHECK_COMPLETE_COMMAND),
    ("gate.md", GATE_COMMAND),
    ("verify.md", VERIFY_COMMAND),
    ("plan.md", PLAN_COMMAND),
    ("implement.md", IMPLEMENT_COMMAND),
    ("handoff.md", HANDOFF_COMMAND),
];

const TEMPLATES: &[(&str, &str)] = &[
    ("PRD.template.md", PRD_TEMPLATE),
    ("findings.template.md", FINDINGS_TEMPLATE),
];

const WORKFLOW: &str =
    "/start -> /plan -> /implement -> /check-complete -> /gate -> /handoff -> /verify";

/// MCP tool to slash command pairs reported by [`sync_commands`].
pub const COMMAND_LINKS: &[(&str, &str)] = &[
    ("can_code", "/plan (blocked until docs pass)"),
    ("analyze_docs", "/start"),
    ("init_planning", "/plan"),
    ("save_finding", "2-Action Rule"),
    ("refresh_goals", "/implement"),
    ("scan_docs", "/check-complete"),
    ("update_progress", "/handoff"),
    ("install_shovel", "/gate"),
];

// ---------------------------------------------------------------------------
// install
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldReport {
    pub root: String,
    /// Paths relative to the root, in write order.
    pub written: Vec<String>,
    /// Files left alone because they already existed.
    pub kept: Vec<String>,
}

impl ScaffoldReport {
    pub fn render(&self) -> String {
        let mut out = String::from("## Shovel installed\n\n### Written\n");
        for f in &self.written {
            out.push_str(&format!("- {f}\n"));
        }
        if !self.kept.is_empty() {
            out.push_str("\n### Kept\n");
            for f in &self.kept {
                out.push_str(&format!("- {f}\n"));
            }
        }
        out.push_str(&format!("\n### Workflow\n\n```\n{WORKFLOW}\n```\n"));
        out
    }
}

pub fn settings_json() -> serde_json::Value {
    json!({
        "$schema": "https://json.schemastore.org/claude-code-settings.json",
        "permissions": {
            "allow": [
                "Bash(cargo:*)", "Bash(pnpm:*)", "Bash(npm:*)", "Bash(npx:*)",
                "Bash(bash scripts/*)", "Bash(mkdir:*)", "Bash(cat:*)", "Bash(ls:*)",
                "Bash(head:*)", "Bash(tail:*)", "Bash(grep:*)", "Bash(find:*)",
                "Bash(wc:*)", "Bash(pwd)", "Bash(date:*)",
                "Bash(git diff:*)", "Bash(git status:*)", "Bash(git log:*)",
                "Bash(git add:*)", "Bash(git commit:*)", "Bash(git branch:*)",
                "Bash(git checkout:*)", "Bash(git rev-parse:*)",
                "Read", "Write", "Edit", "MultiEdit", "Grep", "LS"
            ],
            "deny": [
                "Bash(rm -rf /)", "Bash(rm -rf ~)", "Bash(rm -rf .)",
                "Bash(sudo:*)", "Bash(chmod 777:*)",
                "Bash(curl * | bash)", "Bash(wget * | bash)",
                "Read(.env)", "Read(.env.*)", "Read(**/secrets/**)",
                "Read(**/*.pem)", "Read(**/*.key)"
            ]
        },
        "hooks": {
            "PreCompact": [
                { "hooks": [{ "type": "command", "command": "clouvel hook pre-compact" }] }
            ],
            "SessionStart": [
                { "hooks": [{ "type": "command", "command": "clouvel hook session-start" }] }
            ],
            "Stop": [
                { "hooks": [{
                    "type": "command",
                    "command": "echo \"[$(date '+%Y-%m-%d %H:%M:%S')] Session End\" >> \"$CLAUDE_PROJECT_DIR/.claude/logs/sessions.log\" 2>/dev/null || true"
                }] }
            ]
        }
    })
}

/// Install (or refresh) the Shovel layout under `root`. Managed files are
/// always rewritten; `ERROR_LOG.md` is only created.
pub fn install_shovel(root: &Path) -> Result<ScaffoldReport> {
    if !root.is_dir() {
        return Err(ClouvelError::PathNotFound(root.display().to_string()));
    }
    let claude = paths::claude_dir(root);
    let mut written = Vec::new();
    let mut kept = Vec::new();

    for sub in SUBDIRS {
        io::ensure_dir(&claude.join(sub))?;
    }

    let settings = serde_json::to_string_pretty(&settings_json())?;
    io::atomic_write(&root.join(paths::SETTINGS_FILE), settings.as_bytes())?;
    written.push(paths::SETTINGS_FILE.to_string());

    for (file, body) in COMMANDS {
        io::atomic_write(&root.join(paths::COMMANDS_DIR).join(file), body.as_bytes())?;
        written.push(format!("{}/{file}", paths::COMMANDS_DIR));
    }
    for (file, body) in TEMPLATES {
        io::atomic_write(&root.join(paths::TEMPLATES_DIR).join(file), body.as_bytes())?;
        written.push(format!("{}/{file}", paths::TEMPLATES_DIR));
    }

    let gate = root.join(paths::SCRIPTS_DIR).join("gate.sh");
    io::atomic_write(&gate, GATE_SCRIPT.as_bytes())?;
    make_executable(&gate)?;
    written.push(format!("{}/gate.sh", paths::SCRIPTS_DIR));

    if io::write_if_missing(&root.join(paths::ERROR_LOG_MD), ERROR_LOG.as_bytes())? {
        written.push(paths::ERROR_LOG_MD.to_string());
    } else {
        kept.push(paths::ERROR_LOG_MD.to_string());
    }

    tracing::info!(root = %root.display(), files = written.len(), "shovel installed");
    Ok(ScaffoldReport {
        root: root.display().to_string(),
        written,
        kept,
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaudeMdUpdate {
    /// No CLAUDE.md at the root; nothing written.
    Missing,
    Inserted,
    Refreshed,
    /// Start marker without an end marker; file left untouched.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandLink {
    pub tool: String,
    pub command: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub links: Vec<CommandLink>,
    pub claude_md: ClaudeMdUpdate,
}

impl SyncReport {
    pub fn render(&self) -> String {
        let mut out = String::from("## Clouvel + Shovel synced\n\n### Linked tools\n\n");
        for link in &self.links {
            out.push_str(&format!("- {} <-> {}\n", link.tool, link.command));
        }
        let note = match self.claude_md {
            ClaudeMdUpdate::Missing => "CLAUDE.md not found; no section written.",
            ClaudeMdUpdate::Inserted => "Integration section added to CLAUDE.md.",
            ClaudeMdUpdate::Refreshed => "Integration section in CLAUDE.md refreshed.",
            ClaudeMdUpdate::Skipped => {
                "CLAUDE.md has a clouvel:start marker but no clouvel:end; left unchanged."
            }
        };
        out.push_str(&format!("\n{note}\n"));
        out
    }
}

fn integration_section() -> String {
    format!(
        "{SECTION_START}\n\
         ## Clouvel Integration\n\n\
         > MCP tools wired to Shovel commands.\n\n\
         - `can_code` blocked: stop and write the missing document\n\
         - `save_finding`: applies the 2-Action Rule\n\
         - `refresh_goals`: re-read goals before each `/implement` step\n\
         - `update_progress`: record state before `/handoff`\n\n\
         ```\n\
         can_code -> {WORKFLOW}\n\
         ```\n\
         {SECTION_END}"
    )
}

/// Report tool links and insert or refresh the managed CLAUDE.md section.
/// Requires an installed `.claude/` directory.
pub fn sync_commands(root: &Path) -> Result<SyncReport> {
    if !paths::claude_dir(root).is_dir() {
        return Err(ClouvelError::ScaffoldMissing);
    }

    let links = COMMAND_LINKS
        .iter()
        .map(|(tool, command)| CommandLink {
            tool: tool.to_string(),
            command: command.to_string(),
        })
        .collect();

    let claude_md = paths::claude_md_path(root);
    let section = integration_section();
    let update = if !claude_md.exists() {
        ClaudeMdUpdate::Missing
    } else {
        let existing = std::fs::read_to_string(&claude_md)?;
        if existing.contains(SECTION_START) {
            if io::replace_between_markers(&claude_md, SECTION_START, SECTION_END, &section)? {
                ClaudeMdUpdate::Refreshed
            } else {
                tracing::warn!("CLAUDE.md has clouvel:start but no clouvel:end marker");
                ClaudeMdUpdate::Skipped
            }
        } else {
            let sep = if existing.ends_with('\n') { "\n" } else { "\n\n" };
            let updated = format!("{existing}{sep}{section}\n");
            io::atomic_write(&claude_md, updated.as_bytes())?;
            ClaudeMdUpdate::Inserted
        }
    };

    Ok(SyncReport {
        links,
        claude_md: update,
    })
}

// ---------------------------------------------------------------------------
// Managed content
// ---------------------------------------------------------------------------

const START_COMMAND: &str = r#"# /start

> Run once when a project is first set up.

1. Inspect the project layout
2. Detect the stack
3. Create or update `CLAUDE.md`
4. Check `docs/` with `can_code`

Next: write `docs/PRD.md`, then `/plan`.
"#;

const CHECK_COMPLETE_COMMAND: &str = r#"# /check-complete

> Required before calling anything done.

## Hollow code
- [ ] No TODOs or placeholders
- [ ] No functions that only log
- [ ] No hardcoded dummy data

## Wiring
- [ ] Imports and exports connect
- [ ] Routes are registered
- [ ] The UI actually calls it

## Behavior
- [ ] The feature is reachable in the running app
- [ ] Buttons and links work
- [ ] The end-to-end flow completes

Result: PASS, or FAIL with the problems to fix. Next: `/gate`.
"#;

const GATE_COMMAND: &str = r#"# /gate

> The only definition of done: lint, test and build all PASS.

## Run

```bash
bash scripts/gate.sh
```

| Step | Command | On failure |
|------|---------|------------|
| 1 | lint | stop |
| 2 | test | stop |
| 3 | build | stop |

A PASS writes an evidence report to `.claude/evidence/`.
Never declare work complete without a gate PASS.
"#;

const VERIFY_COMMAND: &str = r#"# /verify

> Verify with fresh context: `/handoff`, then `/clear`, then `/verify`.

## Usage

```
/verify [file|feature|full]
```

Code reviewed in the session that wrote it hides its own problems.
"#;

const PLAN_COMMAND: &str = r#"# /plan

> Plan a task from the PRD.

1. Read `docs/PRD.md`
2. Break the task into steps
3. Define execution order
4. List the expected outputs

Features missing from the PRD cannot be planned; move them to the backlog.
"#;

const IMPLEMENT_COMMAND: &str = r#"# /implement

> Execute an approved plan step by step.

Prerequisites: `/plan` done and approved.

1. Run each step in order
2. Check it off when done
3. Call `refresh_goals` before starting the next step

Next: `/check-complete`, then `/gate` and `/handoff`.
"#;

const HANDOFF_COMMAND: &str = r#"# /handoff

> Record intent and decisions at the end of a step.

```markdown
## Handoff: [feature]
- **Done**: what changed
- **Why**: why this way
- **Watch**: pitfalls
- **Next**: what comes after
```

Next: `/clear`, then `/verify`.
"#;

const PRD_TEMPLATE: &str = r#"# PRD: [project]

> Created: YYYY-MM-DD

## 1. Summary

**One line**: [what this is]
**Users**: [who uses it]

## 2. Problem

## 3. Solution

| Feature | Description | Priority |
|---------|-------------|----------|
| ... | ... | P0 |

### Out of scope (backlog)

## 4. Technical spec

## 5. Success metrics
"#;

const FINDINGS_TEMPLATE: &str = r#"# Findings

> Investigation log (2-Action Rule)

Record a finding after every two view/browser actions.

---

## [YYYY-MM-DD] Topic

**Question**:
**Source**:
**Findings**:
**Conclusion**:

---
"#;

const GATE_SCRIPT: &str = r#"#!/usr/bin/env bash
# lint -> test -> build
set -e

run_step() {
    local name="$1"; shift
    echo "Step: $name"
    if "$@"; then
        echo "PASS $name"
    else
        echo "FAIL $name"
        exit 1
    fi
}

if [ -f Cargo.toml ]; then
    run_step lint cargo clippy --all-targets -- -D warnings
    run_step test cargo test --all
    run_step build cargo build --release
else
    run_step lint npm run lint
    run_step test npm run test
    run_step build npm run build
fi

mkdir -p .claude/evidence
EVIDENCE_FILE=".claude/evidence/$(date +%Y%m%d_%H%M%S).md"
cat > "$EVIDENCE_FILE" << EOF
# Gate Evidence

> Status: PASS
> Timestamp: $(date -Iseconds)
> Commit: $(git rev-parse --short HEAD 2>/dev/null || echo "no-git")
EOF

echo "Gate PASS: $EVIDENCE_FILE"
"#;

const ERROR_LOG: &str = "# ERROR_LOG\n\n> Record errors as they happen.\n\n---\n\n";

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
