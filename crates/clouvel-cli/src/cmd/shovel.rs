use crate::output::{print_json, print_table};
use clap::Subcommand;
use clouvel_core::scaffold;
use std::path::Path;

#[derive(Subcommand)]
pub enum ShovelSubcommand {
    /// Install or refresh the .claude/ commands, templates, settings and gate script
    Install,
    /// Link clouvel tools to Shovel commands and refresh the CLAUDE.md section
    Sync,
}

pub fn run(root: &Path, subcmd: ShovelSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ShovelSubcommand::Install => {
            let report = scaffold::install_shovel(root)?;
            if json {
                print_json(&report)
            } else {
                print!("{}", report.render());
                Ok(())
            }
        }
        ShovelSubcommand::Sync => {
            let report = scaffold::sync_commands(root)?;
            if json {
                return print_json(&report);
            }
            let rows = report
                .links
                .iter()
                .map(|l| vec![l.tool.clone(), l.command.clone()])
                .collect();
            print_table(&["TOOL", "COMMAND"], rows);
            println!("\nCLAUDE.md: {}", claude_md_label(report.claude_md));
            Ok(())
        }
    }
}

fn claude_md_label(update: scaffold::ClaudeMdUpdate) -> &'static str {
    use scaffold::ClaudeMdUpdate::*;
    match update {
        Missing => "not found",
        Inserted => "section added",
        Refreshed => "section refreshed",
        Skipped => "unterminated clouvel:start marker, left unchanged",
    }
}
