use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "dump")]
#[command(about = "Capture anything from the command line and browse what The Dump organized")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// CLI profile name
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Quick capture: dump "my thought here"
    #[arg(trailing_var_arg = true)]
    pub note: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage the stored ID token
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Show folder counts by category, date, and file type
    Counts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List notes
    List(ListArgs),
    /// Show a full note
    Show {
        /// Note ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a note's title or content
    Edit {
        /// Note ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New content (opens $EDITOR when neither flag is given)
        #[arg(long)]
        content: Option<String>,
    },
    /// Manage sub-categories
    #[command(name = "subcategory")]
    SubCategory {
        #[command(subcommand)]
        command: SubCategoryCommands,
    },
    /// Pick the categories your notes are sorted into
    Onboard(OnboardArgs),
    /// Upload a file, photo, or voice memo
    Upload {
        /// File to upload
        path: PathBuf,
        /// Capture kind (guessed from the file type when omitted)
        #[arg(long, value_enum)]
        kind: Option<CaptureKind>,
    },
    /// Show subscription tier and token usage
    Usage {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct ListArgs {
    /// Only notes in this category
    #[arg(long, conflicts_with_all = ["mime_group", "date_group", "recent"])]
    pub category: Option<String>,
    /// Narrow a category to one sub-category
    #[arg(long, requires = "category")]
    pub sub_category: Option<String>,
    /// Only notes of this file type group (e.g. image, audio)
    #[arg(long, conflicts_with_all = ["date_group", "recent"])]
    pub mime_group: Option<String>,
    /// Only notes from this date group (e.g. "Today", "This Week")
    #[arg(long, conflicts_with = "recent")]
    pub date_group: Option<String>,
    /// Latest N notes, without paging
    #[arg(long, value_name = "N")]
    pub recent: Option<u32>,
    /// Free-text search
    #[arg(short, long)]
    pub query: Option<String>,
    /// Number of pages to fetch
    #[arg(long, default_value = "1")]
    pub pages: usize,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug, Default)]
pub struct OnboardArgs {
    /// Preset id (content_creator, entrepreneur, life_and_work)
    #[arg(long, conflicts_with = "category")]
    pub preset: Option<String>,
    /// Custom category; repeat 3 to 10 times
    #[arg(long = "category", value_name = "NAME")]
    pub category: Vec<String>,
    /// Submit custom categories without definitions or keywords
    #[arg(long, requires = "category")]
    pub skip_definitions: bool,
    /// List presets and domain suggestions
    #[arg(long)]
    pub list: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CaptureKind {
    Photo,
    Audio,
    File,
    Text,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// API base URL
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// IANA time zone sent with date filters
        #[arg(long, value_name = "ZONE")]
        time_zone: Option<String>,
        /// Notes per page
        #[arg(long, value_name = "N")]
        page_size: Option<u32>,
        /// Signed-in user id (scopes the onboarding flag)
        #[arg(long, value_name = "ID")]
        user_id: Option<String>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved profile
    Show,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store an ID token in the keychain (read from stdin when omitted)
    Login {
        /// ID token issued by the sign-in provider
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,
    },
    /// Show auth status for profile
    Status,
    /// Remove the stored token
    Logout,
}

#[derive(Subcommand)]
pub enum SubCategoryCommands {
    /// Create a sub-category under a category
    Add {
        /// Parent category
        #[arg(long)]
        category: String,
        /// Sub-category name
        name: String,
        /// What belongs here
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated keywords
        #[arg(long)]
        keywords: Option<String>,
    },
}
