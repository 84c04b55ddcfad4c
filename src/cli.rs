use crate::store::DEFAULT_GATEWAY_URL;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fitstore",
    about = "Store and fetch GPS, heart-rate and calorie samples through the analytical-store gateway"
)]
pub struct Cli {
    /// Base URL of the store gateway
    #[arg(long, env = "CLICKHOUSE_SERVICE_URL", default_value = DEFAULT_GATEWAY_URL, global = true)]
    pub gateway_url: String,

    /// Per-request timeout in seconds (transport default when unset)
    #[arg(long, env = "GATEWAY_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Check that the gateway answers
    Ping,

    /// GPS traces
    Gps {
        #[command(subcommand)]
        action: ExerciseAction,
    },

    /// Heart-rate samples
    HeartRate {
        #[command(subcommand)]
        action: ExerciseAction,
    },

    /// Calorie totals
    Calories {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExerciseAction {
    /// Save the aggregate(s) in a JSON file (one object or an array)
    Save {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print everything stored for an exercise as JSON
    Get {
        #[arg(value_name = "EXERCISE_ID")]
        exercise_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// Save the aggregate(s) in a JSON file (one object or an array)
    Save {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print everything stored for a user as JSON
    Get {
        #[arg(value_name = "USER_ID")]
        user_id: String,
    },
}
