use clap::{Parser, Subcommand};
use ironlog::{
    models::OneRMFormula,
    sessions::{Period, SessionSort},
};

#[derive(Parser)]
#[command(name = "ironlog", version, about = "Workout import and progression tracking")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Print JSON instead of formatted text
    #[arg(global = true, long)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a pasted workout summary (from a file or stdin)
    #[command(visible_alias = "i")]
    Import {
        /// Text file holding the pasted session; reads stdin when omitted
        file: Option<String>,

        /// File the session under this date (YYYY-MM-DD) instead of the detected one
        #[arg(short, long)]
        date: Option<String>,

        /// Save without asking to confirm the date
        #[arg(short, long)]
        yes: bool,
    },

    /// Show everything logged on one date
    Log {
        /// Date in YYYY-MM-DD format
        #[arg(short, long)]
        date: String,
    },

    /// Show the per-session progression of one exercise
    #[command(visible_alias = "h",
              trailing_var_arg = true,
              verbatim_doc_comment)]
    History {
        /// Exercise name, exactly as logged
        #[arg(required = true)]
        exercise: Vec<String>,

        /// Show a graph of the estimated 1RM
        #[arg(short, long)]
        graph: bool,

        /// One-rep-max formula (defaults to the `formula` config key, then epley)
        #[arg(short, long, value_enum)]
        formula: Option<OneRMFormula>,
    },

    /// List logged sessions, newest first, with totals
    #[command(visible_alias = "s")]
    Sessions {
        /// Only sessions whose exercises or title contain this text, or whose date does
        #[arg(short, long)]
        search: Option<String>,

        /// How far back to look
        #[arg(short, long, value_enum, default_value_t = Period::All)]
        period: Period,

        /// Order of the listing
        #[arg(long, value_enum, default_value_t = SessionSort::DateDesc)]
        sort: SessionSort,
    },

    /// Record or review daily energy, sleep and motivation
    #[command(subcommand)]
    Feeling(FeelingCmd),

    /// List every exercise in the log
    #[command(visible_alias = "ex")]
    Exercises,

    /// Show logged workouts in a calendar view
    #[command(visible_alias = "cal")]
    Calendar {
        /// Calendar year (the current one when omitted)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month number, 1 to 12 (the current one when omitted)
        #[arg(short, long)]
        month: Option<u32>,
    },

    /// Print the training summary used as coaching context
    Context,

    /// View or edit ironlog config
    #[command(subcommand)]
    Config(ConfigCmd),

    /// Back up or restore the stored log
    #[command(subcommand)]
    Db(DbCmd),
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Show the effective settings
    List,

    /// Print one setting
    Get { key: String },

    /// Store a setting (`db` or `formula`)
    Set { key: String, val: String },

    /// Drop a setting, reverting to its default
    Unset { key: String },
}

#[derive(Subcommand)]
pub enum FeelingCmd {
    /// Rate today (or --date) from 1 to 10; replaces an earlier entry for that day
    Add {
        #[arg(short, long)]
        energy: u8,

        #[arg(short, long)]
        sleep: u8,

        #[arg(short, long)]
        motivation: u8,

        /// Date in YYYY-MM-DD format (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show the most recent entries
    List {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 7)]
        last: usize,
    },
}

#[derive(Subcommand)]
pub enum DbCmd {
    /// Export all workout data to a JSON file
    Export {
        /// Output file path (defaults to dump.json)
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Replace all workout data with the contents of a JSON export
    Import {
        /// Input JSON file path
        file: String,
    },
}
