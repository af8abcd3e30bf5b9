mod commands;

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taskdeck::config::{Config, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Parser)]
#[command(name = "td", version, about = "Personal task list client")]
struct Cli {
    /// Base URL of the task API
    #[arg(long, global = true, env = "TASKDECK_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Session file (default: <config dir>/taskdeck/session.json)
    #[arg(long, global = true, env = "TASKDECK_SESSION")]
    session_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "TASKDECK_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Output as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the browser client
    Serve {
        /// Address to bind
        #[arg(long, env = "TASKDECK_BIND", default_value = "127.0.0.1")]
        bind: IpAddr,
        /// Port to listen on
        #[arg(short, long, env = "TASKDECK_PORT", default_value_t = 3000)]
        port: u16,
    },
    /// Sign in and store the session
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long, env = "TASKDECK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        /// Account email
        email: String,
        /// Password (prompted twice when omitted)
        #[arg(long, env = "TASKDECK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List tasks, pending first
    List,
    /// Show one task
    Show {
        /// Task ID
        id: String,
    },
    /// Create a task
    Create {
        /// Task title
        title: String,
        /// Task description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Edit a task
    Edit {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description (empty string clears it)
        #[arg(short, long)]
        description: Option<String>,
        /// Set the completion flag
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Flip a task between pending and completed
    Toggle {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn init_tracing(serving: bool) {
    let default_level = if serving { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env("TASKDECK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::new(&cli.api_url, cli.session_file, cli.timeout)?;
    let json = cli.json;

    match cli.command {
        Commands::Serve { bind, port } => commands::serve::run(&config, bind, port).await,
        Commands::Login { email, password } => {
            commands::login::run(&config, email.as_deref(), password.as_deref(), json).await
        }
        Commands::Register { email, password } => {
            commands::register::run(&config, &email, password.as_deref(), json).await
        }
        Commands::Logout => commands::logout::run(&config),
        Commands::Whoami => commands::whoami::run(&config, json).await,
        Commands::List => commands::list::run(&config, json).await,
        Commands::Show { id } => commands::show::run(&config, &id, json).await,
        Commands::Create { title, description } => {
            commands::create::run(&config, &title, description.as_deref(), json).await
        }
        Commands::Edit {
            id,
            title,
            description,
            completed,
        } => {
            let edits = commands::edit::Edits {
                title: title.as_deref(),
                description: description.as_deref(),
                completed,
            };
            commands::edit::run(&config, &id, edits, json).await
        }
        Commands::Toggle { id } => commands::toggle::run(&config, &id, json).await,
        Commands::Delete { id, yes } => commands::delete::run(&config, &id, yes).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Serve { .. }));

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
