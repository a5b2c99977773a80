use std::path::{Path, PathBuf};

/// Resolve the project root.
///
/// Priority:
/// 1. `--root` flag / `CLAUDE_PROJECT_DIR` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for a project `.claude/`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = std::env::var_os("HOME").map(PathBuf::from);

    // ~/.claude holds user-level settings, not a project.
    find_upward(&cwd, |dir| {
        dir.join(".claude").is_dir() && home.as_deref() != Some(dir)
    })
    .or_else(|| find_upward(&cwd, |dir| dir.join(".git").exists()))
    .unwrap_or(cwd)
}

fn find_upward(start: &Path, is_root: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    start.ancestors().find(|d| is_root(d)).map(Path::to_path_buf)
}
