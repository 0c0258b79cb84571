use clap::{Parser, Subcommand};
use std::path::PathBuf;

use prehook::HookEnv;

/// Run project tasks from git hooks and check commit messages.
#[derive(Debug, Parser)]
#[command(name = "prehook", version, about)]
struct Cli {
    /// Log resolution steps and stage changes to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path below the working directory to start the manifest search from
    // Git hooks run from the top level get `GIT_PREFIX=""`; HookEnv drops it.
    #[arg(long, global = true, env = "GIT_PREFIX")]
    prefix: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the tasks declared for a hook label
    Run {
        /// Hook label, e.g. pre-commit or pre-push
        label: String,
    },
    /// Run pre-commit tasks when there is something to commit
    PreCommit {
        /// Run even when the working tree is clean
        #[arg(short, long)]
        force: bool,
    },
    /// Run pre-push tasks
    PrePush {
        /// Arguments git passes to the hook (remote name and URL)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        git_args: Vec<String>,
    },
    /// Validate a commit message with the configured wizard
    CommitMsg {
        /// Message file; defaults to the repository's COMMIT_EDITMSG
        file: Option<PathBuf>,
    },
    /// Run pre-commit tasks, prompt for a message and commit
    CommitWizard,
    /// Install git hook shims that call prehook
    Install {
        /// Hooks directory; defaults to git's hooks path
        #[arg(long)]
        hooks_dir: Option<PathBuf>,
    },
    /// Remove prehook's git hook shims
    Uninstall {
        #[arg(long)]
        hooks_dir: Option<PathBuf>,
    },
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(false)
                .unicode(true)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();
    prehook::logging::init(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("prehook: cannot read the working directory: {e}");
            std::process::exit(1);
        }
    };
    let env = HookEnv::new(cwd, cli.prefix.map(PathBuf::from));

    let code = match cli.command {
        Commands::Run { label } => prehook::run_hook(&label, &env),
        Commands::PreCommit { force } => prehook::run_pre_commit(force, &env),
        Commands::PrePush { git_args } => {
            tracing::debug!(?git_args, "pre-push arguments from git");
            prehook::run_hook("pre-push", &env)
        }
        Commands::CommitMsg { file } => prehook::run_commit_msg(file.as_deref(), &env),
        Commands::CommitWizard => prehook::run_commit_wizard(&env),
        Commands::Install { hooks_dir } => prehook::run_install(hooks_dir.as_deref(), &env),
        Commands::Uninstall { hooks_dir } => prehook::run_uninstall(hooks_dir.as_deref(), &env),
    };
    std::process::exit(code);
}
