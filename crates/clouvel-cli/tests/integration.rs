#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn clouvel(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("clouvel").unwrap();
    cmd.current_dir(dir.path())
        .env("CLAUDE_PROJECT_DIR", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn write_docs(dir: &TempDir, files: &[&str]) {
    let docs = dir.path().join("docs");
    std::fs::create_dir_all(&docs).unwrap();
    for f in files {
        std::fs::write(docs.join(f), "content").unwrap();
    }
}

fn read(dir: &TempDir, rel: &str) -> String {
    std::fs::read_to_string(dir.path().join(rel)).unwrap()
}

// ---------------------------------------------------------------------------
// can-code / scan-docs / analyze-docs / init-docs
// ---------------------------------------------------------------------------

#[test]
fn can_code_blocks_on_single_draft() {
    let dir = TempDir::new().unwrap();
    write_docs(&dir, &["prd_draft.txt"]);

    clouvel(&dir)
        .arg("can-code")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Coding blocked"))
        .stdout(predicate::str::contains("Write the **Architecture** next"))
        .stderr(predicate::str::contains("coding blocked"));
}

#[test]
fn can_code_allows_full_document_set() {
    let dir = TempDir::new().unwrap();
    write_docs(
        &dir,
        &["PRD.md", "architecture.md", "api.yaml", "schema.sql", "test_plan.md"],
    );

    clouvel(&dir)
        .arg("can-code")
        .assert()
        .success()
        .stdout(predicate::str::contains("Coding allowed"));
}

#[test]
fn can_code_json_reports_missing() {
    let dir = TempDir::new().unwrap();
    write_docs(&dir, &["PRD.md"]);

    let output = clouvel(&dir)
        .args(["--json", "can-code"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "blocked");
    assert_eq!(value["missing"].as_array().unwrap().len(), 4);
}

#[test]
fn scan_docs_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    clouvel(&dir)
        .arg("scan-docs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("path not found"));
}

#[test]
fn scan_docs_lists_files() {
    let dir = TempDir::new().unwrap();
    write_docs(&dir, &["PRD.md", "api.yaml"]);
    clouvel(&dir)
        .arg("scan-docs")
        .assert()
        .success()
        .stdout(predicate::str::contains("PRD.md"))
        .stdout(predicate::str::contains("2 file(s)"));
}

#[test]
fn analyze_docs_reports_percentage() {
    let dir = TempDir::new().unwrap();
    write_docs(&dir, &["PRD.md"]);
    clouvel(&dir)
        .arg("analyze-docs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Coverage: 20%"));
}

#[test]
fn init_docs_then_gate_passes() {
    let dir = TempDir::new().unwrap();
    clouvel(&dir)
        .args(["init-docs", "--project-name", "Acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PRD.md"));
    assert!(read(&dir, "docs/PRD.md").starts_with("# Acme PRD"));

    clouvel(&dir).arg("can-code").assert().success();

    clouvel(&dir)
        .args(["init-docs", "--project-name", "Acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All files already exist"));
}

// ---------------------------------------------------------------------------
// planning
// ---------------------------------------------------------------------------

#[test]
fn planning_commands_require_init() {
    let dir = TempDir::new().unwrap();
    clouvel(&dir)
        .args(["planning", "goals"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("init_planning"));
}

#[test]
fn planning_round_trip() {
    let dir = TempDir::new().unwrap();
    clouvel(&dir)
        .args([
            "planning", "init", "Build login", "--goal", "Add form", "--goal", "Add route",
        ])
        .assert()
        .success();

    clouvel(&dir)
        .args(["planning", "goals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- [ ] Add form"))
        .stdout(predicate::str::contains("- [ ] Add route"));

    clouvel(&dir)
        .args(["planning", "progress", "--completed", "Task A"])
        .assert()
        .success();
    clouvel(&dir)
        .args(["planning", "progress", "--completed", "Task B"])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed:   2 (+1)"));

    let progress = read(&dir, ".claude/planning/progress.md");
    assert!(progress.contains("- Task A\n- Task B"));
}

#[test]
fn findings_log_only_grows() {
    let dir = TempDir::new().unwrap();
    clouvel(&dir)
        .args(["planning", "init", "Investigate"])
        .assert()
        .success();

    clouvel(&dir)
        .args(["planning", "finding", "Auth", "--body", "uses JWT"])
        .assert()
        .success();
    let before = read(&dir, ".claude/planning/findings.md");

    clouvel(&dir)
        .args([
            "planning", "finding", "Storage", "--body", "postgres", "--source", "README",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Finding #2"));
    let after = read(&dir, ".claude/planning/findings.md");

    assert!(after.starts_with(&before));
    assert!(after.contains("### Source\nREADME"));
}

#[test]
fn planning_init_takes_approach_and_keeps_hand_edits() {
    let dir = TempDir::new().unwrap();
    clouvel(&dir)
        .args([
            "planning",
            "init",
            "Build login",
            "--goal",
            "Add form",
            "--approach",
            "Form first",
            "--constraint",
            "No new crates",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Planning initialized"));

    let plan_path = dir.path().join(".claude/planning/task_plan.md");
    let plan = read(&dir, ".claude/planning/task_plan.md");
    assert!(plan.contains("## Approach\n\nForm first"));
    assert!(plan.contains("- No new crates"));
    std::fs::write(&plan_path, plan.replace("- [ ] Add form", "- [x] Add form")).unwrap();

    clouvel(&dir)
        .args(["planning", "finding", "Auth", "--body", "uses JWT"])
        .assert()
        .success();
    clouvel(&dir)
        .args(["planning", "goals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- [x] Add form"));
}

#[cfg(unix)]
#[test]
fn can_code_follows_symlinked_documents() {
    let dir = TempDir::new().unwrap();
    let shared = TempDir::new().unwrap();
    let docs = dir.path().join("docs");
    std::fs::create_dir_all(&docs).unwrap();
    for f in ["PRD.md", "architecture.md", "api.yaml", "schema.sql", "test_plan.md"] {
        std::fs::write(shared.path().join(f), "content").unwrap();
        std::os::unix::fs::symlink(shared.path().join(f), docs.join(f)).unwrap();
    }

    clouvel(&dir)
        .arg("can-code")
        .assert()
        .success()
        .stdout(predicate::str::contains("Coding allowed"));
}

// ---------------------------------------------------------------------------
// hooks
// ---------------------------------------------------------------------------

#[test]
fn pre_compact_rejects_non_json() {
    let dir = TempDir::new().unwrap();
    clouvel(&dir)
        .args(["hook", "pre-compact"])
        .write_stdin("not json")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn session_start_on_startup_is_empty() {
    let dir = TempDir::new().unwrap();
    let output = clouvel(&dir)
        .args(["hook", "session-start"])
        .write_stdin(r#"{"source":"startup"}"#)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["hookSpecificOutput"]["hookEventName"], "SessionStart");
    assert_eq!(value["hookSpecificOutput"]["additionalContext"], "");
}

#[test]
fn session_start_tolerates_malformed_input() {
    let dir = TempDir::new().unwrap();
    clouvel(&dir)
        .args(["hook", "session-start"])
        .write_stdin("{{{")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"additionalContext\":\"\""));
}

#[test]
fn compact_then_resume_recovers_context() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".git")).unwrap();
    std::fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/feature/login\n").unwrap();
    std::fs::create_dir_all(dir.path().join(".claude/plans")).unwrap();
    std::fs::write(
        dir.path().join(".claude/plans/PLAN-001.md"),
        "# Login\nstatus: IN_PROGRESS\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("CLAUDE.md"), "NEVER: skip the gate\n").unwrap();

    clouvel(&dir)
        .args(["hook", "pre-compact"])
        .write_stdin(r#"{"trigger":"auto","session_id":"s1"}"#)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(dir.path().join(".claude/status/session-state.json").exists());

    let output = clouvel(&dir)
        .args(["hook", "session-start"])
        .write_stdin(r#"{"source":"resume"}"#)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let context = value["hookSpecificOutput"]["additionalContext"]
        .as_str()
        .unwrap();
    assert!(context.starts_with("# Context Recovery (Auto-injected)"));
    assert!(context.contains("> **Branch**: feature/login"));
    assert!(context.contains("## Active Plan: PLAN-001.md"));
    assert!(context.contains("- NEVER: skip the gate"));
}

// ---------------------------------------------------------------------------
// shovel / config
// ---------------------------------------------------------------------------

#[test]
fn shovel_sync_requires_install() {
    let dir = TempDir::new().unwrap();
    clouvel(&dir)
        .args(["shovel", "sync"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("install_shovel"));
}

#[test]
fn shovel_install_and_sync() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("CLAUDE.md"), "# Project\n").unwrap();

    clouvel(&dir).args(["shovel", "install"]).assert().success();
    assert!(dir.path().join(".claude/settings.json").exists());
    assert!(dir.path().join(".claude/commands/gate.md").exists());
    assert!(dir.path().join(".claude/commands/start.md").exists());
    assert!(dir.path().join(".claude/commands/check-complete.md").exists());

    clouvel(&dir)
        .args(["shovel", "sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("section added"));
    clouvel(&dir)
        .args(["shovel", "sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("section refreshed"));

    let claude_md = read(&dir, "CLAUDE.md");
    assert_eq!(claude_md.matches("<!-- clouvel:start -->").count(), 1);
}

#[test]
fn config_defaults_without_file() {
    let dir = TempDir::new().unwrap();
    clouvel(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("source: defaults"))
        .stdout(predicate::str::contains("docs_dir: docs"));
}

#[test]
fn config_validate_flags_errors() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
    std::fs::write(
        dir.path().join(".claude/clouvel.yaml"),
        "docs_dir: \"\"\nrecovery:\n  plan_lines: 0\n",
    )
    .unwrap();

    clouvel(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] docs_dir is empty"));
}

#[test]
fn custom_docs_dir_is_used_by_gate() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
    std::fs::write(dir.path().join(".claude/clouvel.yaml"), "docs_dir: specs\n").unwrap();

    clouvel(&dir)
        .args(["init-docs", "--project-name", "Acme"])
        .assert()
        .success();
    assert!(dir.path().join("specs/PRD.md").exists());
    clouvel(&dir).arg("can-code").assert().success();
}
