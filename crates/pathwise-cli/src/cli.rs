//! Command-line argument wrappers and their handlers
//!
//! Argument structs carry the clap derives and convert into the core
//! parameter types, so clap never leaks into `pathwise-core`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Navigator
//! ```
//!
//! [`Cli`] runs each command against the navigator and hands the markdown
//! produced by the core `Display` impls to the terminal renderer.

use std::{fmt::Display, fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use pathwise_core::{
    display::{CreateResult, LifeEvents, OperationStatus, RoadmapHistory},
    params::*,
    Navigator, PathwiseError,
};

use crate::renderer::TerminalRenderer;

// ============================================================================
// User commands
// ============================================================================

/// Create or replace a learner profile
#[derive(Args)]
pub struct CreateUserArgs {
    /// Identifier used by every other command
    pub user_id: String,
    #[arg(short, long, help = "Display name")]
    pub name: String,
    #[arg(short, long, help = "Job role the roadmap targets, e.g. 'Data Analyst'")]
    pub target_role: String,
    #[arg(short, long, help = "Hours per week available for learning (3-40)")]
    pub weekly_hours: u32,
    #[arg(long, help = "Contact email")]
    pub email: Option<String>,
    #[arg(long, help = "beginner, intermediate or advanced")]
    pub skill_level: Option<String>,
    #[arg(short, long, help = "'flexible', '3 months', '6 months', '1 year' or 'N weeks'")]
    pub deadline: Option<String>,
    #[arg(long, help = "free_only, mixed or paid_allowed")]
    pub financial_constraint: Option<String>,
    #[arg(long, help = "student, working_professional, career_break or transitioning")]
    pub situation: Option<String>,
    #[arg(short, long, help = "Free-text background")]
    pub background: Option<String>,
}

impl From<CreateUserArgs> for SaveUser {
    fn from(val: CreateUserArgs) -> Self {
        SaveUser {
            user_id: val.user_id,
            name: val.name,
            email: val.email,
            target_role: val.target_role,
            skill_level: val.skill_level,
            weekly_hours: val.weekly_hours,
            deadline: val.deadline,
            financial_constraint: val.financial_constraint,
            situation: val.situation,
            background: val.background,
        }
    }
}

/// Identifies a user
#[derive(Args)]
pub struct UserIdArgs {
    #[arg(help = "Identifier of the user")]
    pub user_id: String,
}

impl From<UserIdArgs> for UserId {
    fn from(val: UserIdArgs) -> Self {
        UserId {
            user_id: val.user_id,
        }
    }
}

/// Edit a learner profile
///
/// Absent flags keep their stored value. After the edit the rebalance rules
/// run against the previous profile; `--rebalance` applies their
/// recommendation right away.
#[derive(Args)]
pub struct UpdateUserArgs {
    #[arg(help = "Identifier of the user to update")]
    pub user_id: String,
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(short, long)]
    pub target_role: Option<String>,
    #[arg(long)]
    pub skill_level: Option<String>,
    #[arg(short, long, help = "New weekly hours (3-40)")]
    pub weekly_hours: Option<u32>,
    #[arg(short, long)]
    pub deadline: Option<String>,
    #[arg(long)]
    pub financial_constraint: Option<String>,
    #[arg(long)]
    pub situation: Option<String>,
    #[arg(short, long)]
    pub background: Option<String>,
    #[arg(long, help = "Rebalance immediately when the rules recommend it")]
    pub rebalance: bool,
}

impl From<&UpdateUserArgs> for UpdateUser {
    fn from(val: &UpdateUserArgs) -> Self {
        UpdateUser {
            user_id: val.user_id.clone(),
            name: val.name.clone(),
            email: val.email.clone(),
            target_role: val.target_role.clone(),
            skill_level: val.skill_level.clone(),
            weekly_hours: val.weekly_hours,
            deadline: val.deadline.clone(),
            financial_constraint: val.financial_constraint.clone(),
            situation: val.situation.clone(),
            background: val.background.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create or replace a learner profile
    #[command(alias = "c")]
    Create(CreateUserArgs),
    /// Show a learner profile
    #[command(alias = "s")]
    Show(UserIdArgs),
    /// Edit a learner profile
    #[command(alias = "u")]
    Update(UpdateUserArgs),
}

// ============================================================================
// Roadmap commands
// ============================================================================

/// Create the first roadmap for a user
///
/// Without `--from-file` the built-in generator produces the roadmap. With
/// it, the file is read as generator output (JSON, optionally wrapped in
/// prose or a markdown code fence) and sanitized before it is stored.
#[derive(Args)]
pub struct GenerateRoadmapArgs {
    #[arg(help = "Identifier of the user")]
    pub user_id: String,
    #[arg(short, long, help = "File holding generator output to use as the roadmap")]
    pub from_file: Option<PathBuf>,
}

/// Move the week pointer of the active roadmap
#[derive(Args)]
pub struct SetWeekArgs {
    #[arg(help = "Identifier of the user")]
    pub user_id: String,
    #[arg(help = "Week to move to; clamped to the roadmap length")]
    pub week: u32,
}

impl From<SetWeekArgs> for SetWeek {
    fn from(val: SetWeekArgs) -> Self {
        SetWeek {
            user_id: val.user_id,
            week: val.week,
        }
    }
}

#[derive(Subcommand)]
pub enum RoadmapCommands {
    /// Create the first roadmap for a user
    #[command(alias = "g")]
    Generate(GenerateRoadmapArgs),
    /// Show the active roadmap
    #[command(alias = "s")]
    Show(UserIdArgs),
    /// List every roadmap version, most recent first
    #[command(alias = "h")]
    History(UserIdArgs),
    /// Show the current week with its tasks
    #[command(alias = "w")]
    Week(UserIdArgs),
    /// Move to the next week
    #[command(alias = "a")]
    Advance(UserIdArgs),
    /// Jump to a specific week
    SetWeek(SetWeekArgs),
}

// ============================================================================
// Task commands
// ============================================================================

/// List tasks of the active roadmap
#[derive(Args)]
pub struct ListTasksArgs {
    #[arg(help = "Identifier of the user")]
    pub user_id: String,
    #[arg(short, long, help = "Only list tasks of this week")]
    pub week: Option<u32>,
}

impl From<ListTasksArgs> for ListTasks {
    fn from(val: ListTasksArgs) -> Self {
        ListTasks {
            user_id: val.user_id,
            week: val.week,
        }
    }
}

/// Identifies a task
#[derive(Args)]
pub struct TaskIdArgs {
    #[arg(help = "Task ID as shown by 'task list'")]
    pub task_id: u64,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List tasks of the active roadmap
    #[command(aliases = ["l", "ls"])]
    List(ListTasksArgs),
    /// Mark a pending task as completed
    #[command(alias = "d")]
    Done(TaskIdArgs),
    /// Mark a pending task as skipped
    #[command(alias = "s")]
    Skip(TaskIdArgs),
}

// ============================================================================
// Progress and rebalancing
// ============================================================================

/// Show progress against the expected pace
#[derive(Args)]
pub struct ProgressArgs {
    #[arg(help = "Identifier of the user")]
    pub user_id: String,
}

impl From<ProgressArgs> for UserId {
    fn from(val: ProgressArgs) -> Self {
        UserId {
            user_id: val.user_id,
        }
    }
}

/// Check whether the roadmap should be rebalanced
///
/// The `--previous-*` flags describe the profile before a recent edit so the
/// profile-change rules can fire.
#[derive(Args)]
pub struct EvaluateArgs {
    #[arg(help = "Identifier of the user")]
    pub user_id: String,
    #[arg(long, help = "Weekly hours before the last profile edit")]
    pub previous_weekly_hours: Option<u32>,
    #[arg(long, help = "Deadline before the last profile edit")]
    pub previous_deadline: Option<String>,
    #[arg(long, help = "Situation before the last profile edit")]
    pub previous_situation: Option<String>,
    #[arg(long, help = "Rebalance immediately when a rebalance is recommended")]
    pub apply: bool,
}

impl From<&EvaluateArgs> for EvaluateRebalance {
    fn from(val: &EvaluateArgs) -> Self {
        EvaluateRebalance {
            user_id: val.user_id.clone(),
            previous_weekly_hours: val.previous_weekly_hours,
            previous_deadline: val.previous_deadline.clone(),
            previous_situation: val.previous_situation.clone(),
        }
    }
}

/// Rebuild the active roadmap as a new version
#[derive(Args)]
pub struct RebalanceArgs {
    #[arg(help = "Identifier of the user")]
    pub user_id: String,
    #[arg(short, long, help = "Why the roadmap is rebalanced")]
    pub reason: Option<String>,
    #[arg(short, long, help = "New weekly hours (3-40)", conflicts_with = "life_event")]
    pub weekly_hours: Option<u32>,
    #[arg(short, long, help = "New deadline, e.g. '3 months' or '16 weeks'")]
    pub deadline: Option<String>,
    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Weeks to add (positive) or remove (negative)"
    )]
    pub timeline_change_weeks: Option<i32>,
    #[arg(short, long, help = "Life event preset; see 'pw events'")]
    pub life_event: Option<String>,
    #[arg(long, value_enum, help = "Trigger to record for this rebalance")]
    pub trigger: Option<TriggerArg>,
    #[arg(short, long, help = "File holding generator output to use as the roadmap")]
    pub from_file: Option<PathBuf>,
}

/// Command-line spelling of rebalance triggers
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TriggerArg {
    MissedTasks,
    HoursChanged,
    DeadlineChanged,
    SituationChanged,
    AheadOfSchedule,
    UserRequested,
}

impl std::fmt::Display for TriggerArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TriggerArg::MissedTasks => "missed_tasks",
            TriggerArg::HoursChanged => "hours_changed",
            TriggerArg::DeadlineChanged => "deadline_changed",
            TriggerArg::SituationChanged => "situation_changed",
            TriggerArg::AheadOfSchedule => "ahead_of_schedule",
            TriggerArg::UserRequested => "user_requested",
        };
        f.write_str(name)
    }
}

/// Reads captured generator output for `--from-file`.
fn read_generator_output(path: Option<PathBuf>) -> Result<Option<String>> {
    path.map(|path| {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read generator output from {}", path.display()))
    })
    .transpose()
}

// ============================================================================
// Handler
// ============================================================================

/// Runs CLI commands against a navigator.
pub struct Cli {
    navigator: Navigator,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(navigator: Navigator, renderer: TerminalRenderer) -> Self {
        Self {
            navigator,
            renderer,
        }
    }

    pub fn into_navigator(self) -> Navigator {
        self.navigator
    }

    fn print(&self, output: impl Display) -> Result<()> {
        self.renderer.render(&output.to_string())
    }

    pub async fn handle_user_command(&self, command: UserCommands) -> Result<()> {
        match command {
            UserCommands::Create(args) => {
                let user = self
                    .navigator
                    .create_user(&args.into())
                    .await
                    .context("Failed to save user")?;
                self.print(CreateResult::new(user))
            }
            UserCommands::Show(args) => {
                let user = self.navigator.show_user(&args.into()).await?;
                self.print(user)
            }
            UserCommands::Update(args) => self.update_user(args).await,
        }
    }

    async fn update_user(&self, args: UpdateUserArgs) -> Result<()> {
        let update = self
            .navigator
            .update_user(&UpdateUser::from(&args))
            .await
            .context("Failed to update user")?;
        self.print(&update)?;

        // Profile edits only matter for rebalancing once a roadmap exists.
        let previous = Some(&update.previous);
        if args.rebalance {
            match self.navigator.rebalance_if_needed(&args.user_id, previous).await {
                Ok(check) => self.print(check)?,
                Err(PathwiseError::NoActiveRoadmap { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        } else {
            match self.navigator.evaluate_against(&args.user_id, previous).await {
                Ok(recommendation) if recommendation.should_rebalance => {
                    self.print(recommendation)?;
                    self.print(format!(
                        "\nRun `pw rebalance {}` to apply it.\n",
                        args.user_id
                    ))?;
                }
                Ok(_) | Err(PathwiseError::NoActiveRoadmap { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    pub async fn handle_roadmap_command(&self, command: RoadmapCommands) -> Result<()> {
        match command {
            RoadmapCommands::Generate(args) => {
                let params = GenerateRoadmap {
                    user_id: args.user_id,
                    roadmap: read_generator_output(args.from_file)?,
                };
                let created = self
                    .navigator
                    .generate_roadmap(&params)
                    .await
                    .context("Failed to generate roadmap")?;
                self.print(created)
            }
            RoadmapCommands::Show(args) => {
                let roadmap = self.navigator.active_roadmap(&args.into()).await?;
                self.print(roadmap)
            }
            RoadmapCommands::History(args) => {
                let history = self.navigator.roadmap_history(&args.into()).await?;
                self.print(RoadmapHistory(history))
            }
            RoadmapCommands::Week(args) => {
                let view = self.navigator.current_week(&args.into()).await?;
                self.print(view)
            }
            RoadmapCommands::Advance(args) => {
                let roadmap = self.navigator.advance_week(&args.into()).await?;
                let message = if roadmap.is_final_week() {
                    format!(
                        "On week {} of {}, the final week",
                        roadmap.current_week, roadmap.total_weeks
                    )
                } else {
                    format!(
                        "Moved to week {} of {}",
                        roadmap.current_week, roadmap.total_weeks
                    )
                };
                self.print(OperationStatus::success(message))
            }
            RoadmapCommands::SetWeek(args) => {
                let params: SetWeek = args.into();
                if !self.navigator.set_current_week(&params).await? {
                    return self.print(OperationStatus::failure(format!(
                        "User '{}' has no active roadmap",
                        params.user_id
                    )));
                }
                let roadmap = self
                    .navigator
                    .active_roadmap(&UserId {
                        user_id: params.user_id,
                    })
                    .await?;
                self.print(OperationStatus::success(format!(
                    "Moved to week {} of {}",
                    roadmap.current_week, roadmap.total_weeks
                )))
            }
        }
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        let (task_id, status) = match command {
            TaskCommands::List(args) => {
                let tasks = self.navigator.list_tasks(&args.into()).await?;
                return self.print(tasks);
            }
            TaskCommands::Done(args) => (args.task_id, "completed"),
            TaskCommands::Skip(args) => (args.task_id, "skipped"),
        };

        let task = self
            .navigator
            .update_task(&UpdateTask {
                task_id,
                status: status.to_string(),
            })
            .await
            .with_context(|| format!("Failed to update task {task_id}"))?;
        self.print(OperationStatus::success(format!(
            "Marked task {} as {}",
            task.id, task.status
        )))?;
        self.print(task)
    }

    pub async fn show_progress(&self, params: &UserId) -> Result<()> {
        let report = self.navigator.progress(params).await?;
        self.print(report)
    }

    pub async fn evaluate(&self, args: EvaluateArgs) -> Result<()> {
        let params = EvaluateRebalance::from(&args);
        if !args.apply {
            let recommendation = self.navigator.evaluate(&params).await?;
            return self.print(recommendation);
        }

        let user = self
            .navigator
            .show_user(&UserId {
                user_id: args.user_id.clone(),
            })
            .await?;
        let previous = params.previous_profile(&user)?;
        let check = self
            .navigator
            .rebalance_if_needed(&args.user_id, previous.as_ref())
            .await
            .context("Failed to rebalance roadmap")?;
        self.print(check)
    }

    pub async fn rebalance(&self, args: RebalanceArgs) -> Result<()> {
        let params = RebalanceRoadmap {
            user_id: args.user_id,
            reason: args.reason,
            weekly_hours: args.weekly_hours,
            deadline: args.deadline,
            timeline_change_weeks: args.timeline_change_weeks,
            life_event: args.life_event,
            trigger: args.trigger.map(|trigger| trigger.to_string()),
            roadmap: read_generator_output(args.from_file)?,
        };
        let update = self
            .navigator
            .rebalance_roadmap(&params)
            .await
            .context("Failed to rebalance roadmap")?;
        self.print(update)
    }

    pub fn list_life_events(&self) -> Result<()> {
        self.print(format!("# Life events\n\n{}", LifeEvents))
    }
}
