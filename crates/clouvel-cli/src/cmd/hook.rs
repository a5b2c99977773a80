//! Host hook entry points. Both read one JSON event from stdin.
//!
//! `pre-compact` prints nothing and fails only when stdin is unreadable or not
//! JSON. `session-start` always prints exactly one output object and succeeds.

use anyhow::Context;
use clap::Subcommand;
use clouvel_core::{
    config::Config,
    session::{HookEvent, SessionStartOutput, SessionStore},
};
use std::io::Read;
use std::path::Path;

#[derive(Subcommand)]
pub enum HookSubcommand {
    /// Snapshot session state before the context is compacted
    PreCompact,
    /// Print recovery context for a resumed or compacted session
    SessionStart,
}

pub fn run(root: &Path, subcmd: HookSubcommand) -> anyhow::Result<()> {
    match subcmd {
        HookSubcommand::PreCompact => pre_compact(root),
        HookSubcommand::SessionStart => session_start(root),
    }
}

fn read_stdin() -> std::io::Result<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

/// Hooks must not fail on a bad config file; fall back to defaults.
fn load_config(root: &Path) -> Config {
    Config::load(root).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid config, using defaults");
        Config::default()
    })
}

fn pre_compact(root: &Path) -> anyhow::Result<()> {
    let input = read_stdin().context("failed to read hook input")?;
    let event = HookEvent::parse(&input).context("hook input is not a JSON object")?;
    let config = load_config(root);
    SessionStore::new(root).on_compact(&event, &config.snapshot);
    Ok(())
}

fn session_start(root: &Path) -> anyhow::Result<()> {
    let context = match read_stdin()
        .map_err(anyhow::Error::from)
        .and_then(|s| HookEvent::parse(&s).map_err(anyhow::Error::from))
    {
        Ok(event) => {
            let config = load_config(root);
            SessionStore::new(root).on_session_start(&event, &config.recovery)
        }
        Err(e) => {
            tracing::debug!(error = %e, "malformed session-start input");
            String::new()
        }
    };
    let output = serde_json::to_string(&SessionStartOutput::new(context))?;
    println!("{output}");
    Ok(())
}
