use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Learn Uyghur vocabulary from the terminal
#[derive(Debug, Parser)]
#[command(name = "uyghurly", version, about = "Uyghurly - learn Uyghur vocabulary")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding local storage, accounts and profiles
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Fixed seed for lesson exercises and quizzes
    #[arg(short, long, global = true)]
    pub seed: Option<u64>,

    /// Profile name under <data-dir>/profiles
    #[arg(short, long, global = true, default_value = "main")]
    pub profile: String,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List units and their quiz status
    Units,
    /// List lessons, optionally for one unit
    Lessons {
        /// Unit id or title
        #[arg(short, long)]
        unit: Option<String>,
    },
    /// Show a lesson's vocabulary
    Lesson { slug: String },
    /// Take a unit quiz
    Quiz {
        /// Unit id or title
        unit: String,
        /// Comma-separated option numbers, one per question, instead of prompting
        #[arg(short, long, value_delimiter = ',')]
        answers: Option<Vec<usize>>,
    },
    /// Check an answer the way lessons do
    Check { answer: String, expected: String },
    /// Search the dictionary
    Dictionary {
        /// Empty lists every entry
        #[arg(default_value = "")]
        term: String,
    },
    /// Show progress statistics
    Progress,
    /// Practice a lesson interactively
    Practice { slug: String },
    /// Show or change display settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },
    /// Account management
    Account {
        #[command(subcommand)]
        action: AccountCommands,
    },
    /// Admin progress tools
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FontSizeArg {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommands {
    Theme { value: Option<ThemeArg> },
    FontSize { value: Option<FontSizeArg> },
    /// Theme auto, font size medium
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommands {
    Signup(SignupArgs),
    Login(LoginArgs),
    /// Sign in with a Google account
    Google(GoogleArgs),
    /// Continue as a guest; progress stays on this device
    Guest,
    Logout,
    Whoami,
    /// Change display name and username
    Update(UpdateArgs),
    Delete,
    /// Pull passed quizzes from the account into local progress
    Sync,
}

#[derive(Debug, Clone, Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    /// Defaults to the password
    #[arg(long)]
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Clone, Args)]
pub struct GoogleArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub username: String,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    CompleteLessons,
    CompleteQuizzes,
    Clear,
}
