use anyhow::Result;
use clap::{Parser, Subcommand};
use test_triage::commands;

/// Test-suite organizer CLI.
///
/// This CLI is a thin wrapper around `triage-core` (exposed in code as
/// `triage_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "test-triage",
    version,
    about = "Organize test suites by behavioral intent",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new test-triage project at the given root.
    ///
    /// This will:
    /// - Create a `.triage` metadata directory and the project database.
    /// - Create `reports` and `organized` directories.
    /// - Write a `.triage/project.json` config file.
    InitProject {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional project name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,
    },

    /// Show basic information about an existing test-triage project.
    ///
    /// This reads `.triage/project.json` and reports key paths and config values.
    ProjectInfo {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Scan source files for test declarations and classify them.
    ///
    /// Each path may be a single file or a directory, which is walked
    /// recursively for source files. Results are stored in the project
    /// database and summarized in a report under `reports/`.
    Scan {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Files or directories to scan, relative to the project root.
        #[arg(required = true)]
        paths: Vec<String>,

        /// Emit the full per-file scan results as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List test cases recorded in the project database.
    ListTests {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Only list tests carrying this category (auth, empty-db, positive, negative).
        #[arg(long)]
        category: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show per-category totals and the most recent scan run.
    Status {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Regroup recorded test cases into per-category files under `organized/`.
    Organize {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::InitProject { root, name } => commands::init_project_command(&root, name)?,
        Command::ProjectInfo { root, json } => commands::project_info_command(&root, json)?,
        Command::Scan { root, paths, json } => commands::scan_command(&root, &paths, json)?,
        Command::ListTests { root, category, json } => {
            commands::list_tests_command(&root, category.as_deref(), json)?
        }
        Command::Status { root, json } => commands::status_command(&root, json)?,
        Command::Organize { root } => commands::organize_command(&root)?,
    }

    Ok(())
}
