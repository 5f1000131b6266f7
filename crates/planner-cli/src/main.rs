use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "student-planner", version, about = "Student Planner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Weekly courses
    Course {
        #[command(subcommand)]
        action: commands::course::CourseAction,
    },
    /// Assignments with due dates
    Assignment {
        #[command(subcommand)]
        action: commands::assignment::AssignmentAction,
    },
    /// Exams
    Exam {
        #[command(subcommand)]
        action: commands::exam::ExamAction,
    },
    /// Daily habits
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// To-do tasks
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Free-text notes
    Note {
        #[command(subcommand)]
        action: commands::note::NoteAction,
    },
    /// Render the dashboard
    View(commands::view::ViewArgs),
    /// Show the focus course
    Focus(commands::focus::FocusArgs),
    /// Switch dark mode
    DarkMode {
        #[arg(value_enum)]
        state: commands::appearance::DarkModeState,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Sign in to cloud sync
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Manual cloud sync
    Sync {
        #[command(subcommand)]
        action: commands::sync::SyncAction,
    },
    /// Serve the dashboard on localhost
    Serve(commands::serve::ServeArgs),
    /// Show what is playing
    Media,
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_logging() {
    // STUDENT_PLANNER_LOG wins; otherwise the configured level.
    let filter = EnvFilter::try_from_env("STUDENT_PLANNER_LOG").unwrap_or_else(|_| {
        EnvFilter::new(planner_core::Config::load_or_default().logging.level)
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Course { action } => commands::course::run(action),
        Commands::Assignment { action } => commands::assignment::run(action),
        Commands::Exam { action } => commands::exam::run(action),
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Note { action } => commands::note::run(action),
        Commands::View(args) => commands::view::run(args),
        Commands::Focus(args) => commands::focus::run(args),
        Commands::DarkMode { state } => commands::appearance::run(state),
        Commands::Config { action } => commands::config::run(action),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Sync { action } => commands::sync::run(action),
        Commands::Serve(args) => commands::serve::run(args),
        Commands::Media => commands::media::run(),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "student-planner", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
