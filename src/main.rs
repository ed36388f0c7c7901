//! EduDash - student dashboard CLI
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use edudash::cli::courses::{CoursePatch, CoursesAction, CoursesOptions, NewCourse};
use edudash::cli::news::{NewsAction, NewsOptions};
use edudash::cli::profile::{ProfileAction, ProfileOptions, ProfilePatch};
use edudash::cli::ranking::RankingOptions;
use edudash::cli::reset::ResetOptions;
use edudash::cli::summary::SummaryOptions;
use edudash::cli::sync::SyncOptions;
use edudash::cli::transcript::TranscriptOptions;
use edudash::cli::{
    CoursesCommand, NewsCommand, ProfileCommand, RankingCommand, ResetCommand, SummaryCommand,
    SyncCommand, TranscriptCommand,
};
use edudash::config::{edudash_home, Config};
use edudash::core::transcript::Language;
use edudash::core::{AnnouncementCategory, AnnouncementFilter, LetterGrade};
use edudash::error::{exit_codes, EduDashError};
use edudash::logging::init_logging;
use edudash::{FileKeyValueStore, SeedData, StudentStateStore};

// =============================================================================
// CLI Definition
// =============================================================================

/// EduDash - grades, standing and school news from the terminal
#[derive(Parser)]
#[command(name = "edudash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, short, global = true)]
    json: bool,

    /// Suppress output
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard overview
    Summary,

    /// List or edit courses
    Courses {
        #[command(subcommand)]
        action: Option<CoursesCmd>,
    },

    /// List announcements or mark one as read
    News {
        #[command(subcommand)]
        action: Option<NewsCmd>,
    },

    /// Show or edit the student profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileCmd>,
    },

    /// Show the class leaderboard
    Ranking {
        /// Maximum number of rows
        #[arg(long, short)]
        limit: Option<usize>,
    },

    /// Export the academic transcript
    Transcript {
        /// Label language (en, es, fr, ru, uz)
        #[arg(long, default_value = "en")]
        lang: Language,
        /// Write the transcript to a file
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Sync with the school server
    Sync,

    /// Discard local data and reload the seed dataset
    Reset {
        /// Confirm the reset
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum CoursesCmd {
    /// List courses
    List,
    /// Add a course
    Add {
        /// Course name
        #[arg(long)]
        name: String,
        /// Course code (e.g. MATH-201)
        #[arg(long)]
        code: String,
        /// Credit weight
        #[arg(long)]
        credits: f64,
        /// Letter grade (A+, A, A-, ... F)
        #[arg(long, allow_hyphen_values = true)]
        grade: LetterGrade,
        #[command(flatten)]
        details: CourseDetails,
    },
    /// Edit a course
    Update {
        /// Course ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New code
        #[arg(long)]
        code: Option<String>,
        /// New credit weight
        #[arg(long)]
        credits: Option<f64>,
        /// New letter grade
        #[arg(long, allow_hyphen_values = true)]
        grade: Option<LetterGrade>,
        #[command(flatten)]
        details: CourseDetails,
    },
    /// Remove a course
    Delete {
        /// Course ID
        id: String,
    },
}

#[derive(Args)]
struct CourseDetails {
    /// Semester label
    #[arg(long)]
    semester: Option<String>,
    /// Instructor name
    #[arg(long)]
    teacher: Option<String>,
    /// Display color
    #[arg(long)]
    color: Option<String>,
}

#[derive(Subcommand)]
enum NewsCmd {
    /// List announcements
    List {
        /// Only unread announcements
        #[arg(long, short)]
        unread: bool,
        /// Only this category (general, academic, event, urgent)
        #[arg(long, short)]
        category: Option<AnnouncementCategory>,
        /// Maximum number of announcements
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// Mark an announcement as read
    Read {
        /// Announcement ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ProfileCmd {
    /// Show the profile
    Show,
    /// Edit profile fields
    Set {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Grade level (e.g. "11th Grade")
        #[arg(long)]
        grade: Option<String>,
        #[arg(long)]
        section: Option<String>,
        /// Avatar URL; empty clears it
        #[arg(long)]
        avatar: Option<String>,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    setup_panic_handler();

    let cli = Cli::parse();
    let config = Config::load();

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("edudash warning: {}", e);
    }

    let store = match open_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("edudash error: {}", e);
            return ExitCode::from(exit_codes::SETUP as u8);
        }
    };

    run(cli, &store).await
}

/// Set up the global panic handler.
///
/// On panic, logs to ~/.edudash/crash.log and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("edudash panic: {}", info);

        if let Some(home) = edudash_home() {
            let crash_log = home.join("crash.log");
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Build the file-backed store from configuration and load it.
async fn open_store(config: &Config) -> Result<StudentStateStore<FileKeyValueStore>, EduDashError> {
    let data_dir = config.resolved_data_dir().ok_or_else(|| {
        EduDashError::config("Could not determine data directory (no home directory)")
    })?;
    let kv = FileKeyValueStore::with_dir(data_dir)?;
    let seed = SeedData::load(config.seed.path.as_deref())?;

    let store = StudentStateStore::new(kv, seed).with_sync_delay(config.sync.delay());
    store.load().await;
    Ok(store)
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::FAILURE as u8)
    }
}

/// Print formatted output and map success to an exit code.
fn emit(formatted: String, success: bool) -> ExitCode {
    if !formatted.is_empty() {
        println!("{}", formatted);
    }
    success_to_exit_code(success)
}

/// Dispatch a parsed command against a loaded store.
async fn run(cli: Cli, store: &StudentStateStore<FileKeyValueStore>) -> ExitCode {
    let (json, quiet) = (cli.json, cli.quiet);

    match cli.command {
        Commands::Summary => {
            let cmd = SummaryCommand::new(store);
            let options = SummaryOptions { json, quiet };
            let output = cmd.run(&options).await;
            emit(cmd.format_output(&output, &options), output.success)
        }
        Commands::Courses { action } => {
            let cmd = CoursesCommand::new(store);
            let options = CoursesOptions { json, quiet };
            let action = action.map(courses_action).unwrap_or(CoursesAction::List);
            let output = cmd.run(&action, &options).await;
            emit(cmd.format_output(&output, &options), output.success)
        }
        Commands::News { action } => {
            let cmd = NewsCommand::new(store);
            let (action, options) = match action {
                None => (NewsAction::List, NewsOptions::default()),
                Some(NewsCmd::List {
                    unread,
                    category,
                    limit,
                }) => (
                    NewsAction::List,
                    NewsOptions {
                        filter: AnnouncementFilter {
                            unread_only: unread,
                            category,
                        },
                        limit,
                        ..Default::default()
                    },
                ),
                Some(NewsCmd::Read { id }) => (NewsAction::Read { id }, NewsOptions::default()),
            };
            let options = NewsOptions {
                json,
                quiet,
                ..options
            };
            let output = cmd.run(&action, &options).await;
            emit(cmd.format_output(&output, &options), output.success)
        }
        Commands::Profile { action } => {
            let cmd = ProfileCommand::new(store);
            let options = ProfileOptions { json, quiet };
            let action = match action {
                None | Some(ProfileCmd::Show) => ProfileAction::Show,
                Some(ProfileCmd::Set {
                    first_name,
                    last_name,
                    email,
                    grade,
                    section,
                    avatar,
                }) => ProfileAction::Set(ProfilePatch {
                    first_name,
                    last_name,
                    email,
                    grade,
                    section,
                    avatar,
                }),
            };
            let output = cmd.run(&action, &options).await;
            emit(cmd.format_output(&output, &options), output.success)
        }
        Commands::Ranking { limit } => {
            let cmd = RankingCommand::new(store);
            let options = RankingOptions { json, quiet, limit };
            let output = cmd.run(&options).await;
            emit(cmd.format_output(&output, &options), output.success)
        }
        Commands::Transcript { lang, output } => {
            let cmd = TranscriptCommand::new(store);
            let options = TranscriptOptions {
                json,
                quiet,
                language: lang,
                output_path: output,
            };
            let output = cmd.run(&options).await;
            emit(cmd.format_output(&output, &options), output.success)
        }
        Commands::Sync => {
            let cmd = SyncCommand::new(store);
            let options = SyncOptions { json, quiet };
            let output = cmd.run(&options).await;
            emit(cmd.format_output(&output, &options), output.success)
        }
        Commands::Reset { force } => {
            let cmd = ResetCommand::new(store);
            let options = ResetOptions { json, quiet, force };
            let output = cmd.run(&options).await;
            emit(cmd.format_output(&output, &options), output.success)
        }
    }
}

fn courses_action(cmd: CoursesCmd) -> CoursesAction {
    match cmd {
        CoursesCmd::List => CoursesAction::List,
        CoursesCmd::Add {
            name,
            code,
            credits,
            grade,
            details,
        } => CoursesAction::Add(NewCourse {
            name,
            code,
            credits,
            grade,
            semester: details.semester,
            teacher: details.teacher,
            color: details.color,
        }),
        CoursesCmd::Update {
            id,
            name,
            code,
            credits,
            grade,
            details,
        } => CoursesAction::Update {
            id,
            patch: CoursePatch {
                name,
                code,
                credits,
                grade,
                semester: details.semester,
                teacher: details.teacher,
                color: details.color,
            },
        },
        CoursesCmd::Delete { id } => CoursesAction::Delete { id },
    }
}

// =============================================================================
// Tests
// =============================================================================
