use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::features::report::{HistoryKind, ReportPeriod};
use crate::features::session::Side;

#[derive(Parser)]
#[command(name = "babytrack")]
#[command(about = "Track nursing, sleep, diapers and feedings from the terminal")]
#[command(long_about = "babytrack - baby care tracking from the command line

Time nursing and sleep sessions with pause and resume, log diaper changes
and bottle feedings, and review today's summary or weekly reports. Open
sessions live in the database, so a timer started in one terminal can be
stopped from another or picked up after a restart.

QUICK START:
  babytrack nursing start --side left   Start nursing on the left side
  babytrack nursing switch              Close this side, start the other
  babytrack nursing stop                Finish the session
  babytrack log pee                     Log a wet diaper
  babytrack summary                     Today at a glance
  babytrack tui                         Live dashboard

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Defaults to `general.default_output` from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Data directory holding config.yaml and the database
    #[arg(long, global = true, env = "BABYTRACK_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Time a nursing session
    ///
    /// Sessions can be paused and resumed; paused time does not count.
    /// Switching sides closes the current side's session and opens one on
    /// the other side.
    ///
    /// # Examples
    ///
    ///   babytrack nursing start --side right
    ///   babytrack nursing pause
    ///   babytrack nursing resume
    ///   babytrack nursing status -o json
    #[command(alias = "n")]
    Nursing(NursingArgs),

    /// Time a sleep session
    ///
    /// # Examples
    ///
    ///   babytrack sleep start
    ///   babytrack sleep stop
    #[command(alias = "s")]
    Sleep(SleepArgs),

    /// Log a diaper change or a bottle feeding
    ///
    /// # Examples
    ///
    ///   babytrack log pee
    ///   babytrack log poop
    ///   babytrack log feeding
    #[command(alias = "l")]
    Log(LogArgs),

    /// List recent records, newest first
    ///
    /// # Examples
    ///
    ///   babytrack history
    ///   babytrack history --kind nursing --limit 5
    #[command(alias = "h")]
    History(HistoryArgs),

    /// Delete a record by id
    ///
    /// Ids are shown by `babytrack history`.
    ///
    /// # Examples
    ///
    ///   babytrack delete diaper 12
    ///   babytrack delete session 40
    Delete(DeleteArgs),

    /// Show today's summary
    ///
    /// Counts diapers, feedings, nursing and sleep for the current local day
    /// and suggests which side to nurse next.
    Summary,

    /// Show a report over the last 7, 30 or 90 days
    ///
    /// # Examples
    ///
    ///   babytrack report
    ///   babytrack report month
    Report(ReportArgs),

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   babytrack completions zsh > ~/.zsh/completions/_babytrack
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,

        /// Print installation instructions instead of the script
        #[arg(long)]
        install: bool,
    },

    /// Launch the live dashboard
    ///
    /// Keys: Tab switch panel, s start, p pause/resume, x stop, w switch
    /// side, d discard, 1 pee, 2 poop, 3 feeding, q quit.
    Tui,
}

/// Nursing command arguments.
#[derive(Args)]
pub struct NursingArgs {
    #[command(subcommand)]
    pub command: NursingCommands,
}

/// Nursing subcommands.
#[derive(Subcommand)]
pub enum NursingCommands {
    /// Start a nursing session
    Start {
        /// Side to nurse on (defaults to `timer.default_side`)
        #[arg(long, short = 's', value_enum)]
        side: Option<Side>,
    },

    /// Pause the running session
    Pause,

    /// Resume the paused session
    Resume,

    /// Stop the session and record its duration
    Stop,

    /// Switch sides
    ///
    /// While running, closes this side's session and starts the other side.
    /// Otherwise changes the side the next start will use.
    Switch,

    /// Delete the open session without recording it
    Discard,

    /// Show the current session
    Status,
}

/// Sleep command arguments.
#[derive(Args)]
pub struct SleepArgs {
    #[command(subcommand)]
    pub command: SleepCommands,
}

/// Sleep subcommands.
#[derive(Subcommand)]
pub enum SleepCommands {
    /// Start a sleep session
    Start,

    /// Pause the running session
    Pause,

    /// Resume the paused session
    Resume,

    /// Stop the session and record its duration
    Stop,

    /// Delete the open session without recording it
    Discard,

    /// Show the current session
    Status,
}

/// Log command arguments.
#[derive(Args)]
pub struct LogArgs {
    #[command(subcommand)]
    pub command: LogCommands,
}

/// Quick record subcommands.
#[derive(Subcommand)]
pub enum LogCommands {
    /// Wet diaper
    Pee,

    /// Dirty diaper
    Poop,

    /// Bottle feeding
    Feeding,
}

/// History command arguments.
#[derive(Args)]
pub struct HistoryArgs {
    /// Which records to list
    #[arg(long, short = 'k', value_enum, default_value = "all")]
    pub kind: HistoryKind,

    /// Maximum number of entries
    #[arg(long, short = 'n', default_value = "20")]
    pub limit: usize,
}

/// Record type addressed by `delete`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteTarget {
    /// A diaper change.
    Diaper,
    /// A bottle feeding.
    Feeding,
    /// A nursing or sleep session.
    Session,
}

/// Delete command arguments.
#[derive(Args)]
pub struct DeleteArgs {
    /// Record type
    #[arg(value_enum)]
    pub target: DeleteTarget,

    /// Record id
    pub id: i64,
}

/// Report command arguments.
#[derive(Args)]
pub struct ReportArgs {
    /// Period to cover (defaults to `reports.default_period`)
    #[arg(value_enum)]
    pub period: Option<ReportPeriod>,
}
