use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use clouvel_core::{
    config::Config,
    planning::{self, NewFinding, NewPlan, ProgressUpdate},
};
use std::path::Path;

#[derive(Subcommand)]
pub enum PlanningSubcommand {
    /// Start a new task plan (replaces any existing plan, findings and progress)
    Init {
        /// The task being worked on
        task: String,
        /// A goal for the task (repeatable)
        #[arg(long = "goal")]
        goals: Vec<String>,
        /// How the task will be approached
        #[arg(long)]
        approach: Option<String>,
        /// A constraint (repeatable; replaces the defaults)
        #[arg(long = "constraint")]
        constraints: Vec<String>,
    },

    /// Append a finding to the investigation log
    Finding {
        /// Short topic title
        topic: String,
        /// What was found
        #[arg(long)]
        body: String,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        conclusion: Option<String>,
    },

    /// Show the current task, goals and a progress excerpt
    Goals,

    /// Record progress
    Progress {
        /// A completed item (repeatable; accumulates)
        #[arg(long = "completed")]
        completed: Vec<String>,
        /// The item currently in progress
        #[arg(long)]
        in_progress: Option<String>,
        /// A blocker (repeatable; replaces the previous list)
        #[arg(long = "blocker")]
        blockers: Vec<String>,
        /// The next step
        #[arg(long)]
        next: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: PlanningSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        PlanningSubcommand::Init {
            task,
            goals,
            approach,
            constraints,
        } => init(
            root,
            NewPlan {
                task,
                goals,
                approach,
                constraints,
            },
            json,
        ),
        PlanningSubcommand::Finding {
            topic,
            body,
            question,
            source,
            conclusion,
        } => finding(
            root,
            NewFinding {
                topic,
                question,
                body,
                source,
                conclusion,
            },
            json,
        ),
        PlanningSubcommand::Goals => goals(root, json),
        PlanningSubcommand::Progress {
            completed,
            in_progress,
            blockers,
            next,
        } => progress(
            root,
            ProgressUpdate {
                completed,
                in_progress,
                blockers,
                next,
            },
            json,
        ),
    }
}

fn init(root: &Path, plan: NewPlan, json: bool) -> anyhow::Result<()> {
    let result = planning::init_planning(root, plan)?;
    if json {
        print_json(&result)
    } else {
        print!("{}", result.render());
        Ok(())
    }
}

fn finding(root: &Path, new: NewFinding, json: bool) -> anyhow::Result<()> {
    let saved = planning::save_finding(root, new)?;
    if json {
        print_json(&saved)
    } else {
        print!("{}", saved.render());
        Ok(())
    }
}

fn goals(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let summary = planning::refresh_goals(root, config.planning.progress_excerpt_chars)?;
    if json {
        print_json(&summary)
    } else {
        print!("{}", summary.render());
        Ok(())
    }
}

fn progress(root: &Path, update: ProgressUpdate, json: bool) -> anyhow::Result<()> {
    let summary = planning::update_progress(root, update)?;
    if json {
        print_json(&summary)
    } else {
        print!("{}", summary.render());
        Ok(())
    }
}
