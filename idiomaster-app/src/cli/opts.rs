use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(name = "idiomaster", version, about = "Idiomaster CLI: a daily idiom, quizzes, and progress tracking")]
pub struct Cli {
    /// Directory holding the prefs file (defaults to the app data dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Idiom catalog JSON file (defaults to the bundled catalog)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Quiz question bank JSON file (defaults to the bundled bank)
    #[arg(long)]
    pub questions: Option<PathBuf>,

    /// Ask quiz questions in English instead of Japanese
    #[arg(long)]
    pub english: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Show today's idiom (counts as viewing it)
    Today,
    /// List idioms in the library
    List(ListArgs),
    /// Show one idiom in full (must be unlocked)
    View { idiom_id: String },
    /// Quiz yourself
    #[command(subcommand)]
    Quiz(QuizCmd),
    /// Manage favorite idioms
    #[command(subcommand)]
    Fav(FavCmd),
    /// Show learning statistics
    Stats,
    /// Toggle the Pro plan
    #[command(subcommand)]
    Pro(ProCmd),
    /// Translate text and get a matching idiom suggestion
    Translate(TranslateArgs),
    /// Developer utilities
    #[command(subcommand)]
    Dev(DevCmd),
}

#[derive(Debug, Args, Clone)]
pub struct ListArgs {
    /// Only idioms of this level (A1..C2)
    #[arg(long)]
    pub level: Option<String>,
    /// Only idioms carrying this tag
    #[arg(long)]
    pub tag: Option<String>,
    /// Substring search over title, meaning, nuance and tags
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum QuizCmd {
    /// Quiz one idiom; passing marks it learned
    Idiom { idiom_id: String },
    /// Mixed quiz over every idiom of a level
    Level { level: String },
}

#[derive(Debug, Subcommand, Clone)]
pub enum FavCmd {
    Add { idiom_id: String },
    Rm { idiom_id: String },
    List,
    Clear,
}

#[derive(Debug, Subcommand, Clone)]
pub enum ProCmd {
    On,
    Off,
}

#[derive(Debug, Args, Clone)]
pub struct TranslateArgs {
    pub text: String,
    /// Simulated backend latency in milliseconds
    #[arg(long, default_value_t = 1500)]
    pub delay_ms: u64,
}

#[derive(Debug, Subcommand, Clone)]
pub enum DevCmd {
    /// Pin the app's notion of today (YYYY-MM-DD)
    SetDate { date: String },
    /// Drop the pinned date
    ClearDate,
    /// Wipe all progress (asks for confirmation)
    Reset,
}
