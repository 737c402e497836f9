//! userdash CLI - the dashboard views from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (mock: any non-blank email and password)
//! ud-cli auth login -e ada@example.com -p hunter2
//!
//! # Manage users
//! ud-cli users add -n "Ada Lovelace" -e ada@example.com --phone "(555) 123-4567"
//! ud-cli users list --search ada --status active
//! ud-cli users deactivate <ID>
//!
//! # Write content
//! ud-cli content add "<p>Hello</p>"
//!
//! # Watch the stats cards refresh
//! ud-cli watch --ticks 3
//! ```
//!
//! # Commands
//!
//! - `users` - List, add, update, activate/deactivate, remove users; stats
//! - `content` - Rich-text entries
//! - `editor` - Legacy scratch buffer
//! - `auth` - Mock sign-in, sign-up and session
//! - `activity` - Activity chart series
//! - `watch` - Run the refresh controllers and print each snapshot

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use userdash_core::UserStatus;
use userdash_dashboard::config::DashboardConfig;
use userdash_dashboard::{AppError, AppState};

mod commands;

#[derive(Parser)]
#[command(name = "ud-cli")]
#[command(author, version, about = "userdash dashboard CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
    /// Manage rich-text content entries
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
    /// Read or write the editor scratch buffer
    Editor {
        #[command(subcommand)]
        action: EditorAction,
    },
    /// Sign in, sign up, sign out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Print the activity chart series
    Activity,
    /// Poll the store and print refreshed stats
    Watch {
        /// Stop after this many refreshes (default: run until Ctrl-C)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Refresh on every local write instead of on a timer
        #[arg(long)]
        live: bool,
    },
}

#[derive(Subcommand)]
enum UsersAction {
    /// List users
    List {
        /// Case-insensitive name filter
        #[arg(short, long)]
        search: Option<String>,

        /// Only users with this status (`active`, `inactive`)
        #[arg(long)]
        status: Option<UserStatus>,
    },
    /// Add a user
    Add(commands::users::UserFields),
    /// Change fields of a user
    Update {
        /// User ID
        id: String,

        #[command(flatten)]
        fields: commands::users::PatchFields,
    },
    /// Mark a user active
    Activate {
        /// User ID
        id: String,
    },
    /// Mark a user inactive
    Deactivate {
        /// User ID
        id: String,
    },
    /// Remove a user
    Remove {
        /// User ID
        id: String,
    },
    /// Show total, active and inactive counts
    Stats,
}

#[derive(Subcommand)]
enum ContentAction {
    /// List entries
    List {
        /// Only entries by this author ID
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Save a new entry as the signed-in user (or anonymously)
    Add {
        /// Rich-text markup
        content: String,
    },
    /// Replace an entry's markup
    Edit {
        /// Entry ID
        id: String,

        /// Rich-text markup
        content: String,
    },
    /// Remove an entry
    Remove {
        /// Entry ID
        id: String,
    },
}

#[derive(Subcommand)]
enum EditorAction {
    /// Print the buffer with its plain text and word count
    Show,
    /// Overwrite the buffer
    Save {
        /// Rich-text markup
        content: String,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "USERDASH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in with a Google account
    Google {
        /// Account email (defaults to the first account in the picker)
        #[arg(short, long)]
        email: Option<String>,

        /// Name to show on the dashboard
        #[arg(short, long)]
        name: String,
    },
    /// Create an account and sign in
    Signup {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "USERDASH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// One-click Google sign-up
    GoogleSignup,
    /// Sign out
    Logout,
    /// Show the signed-in session
    Whoami,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries command output only
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "userdash_dashboard=info,ud_cli=info".into());

    // USERDASH_LOG_JSON switches to one JSON object per line for log shippers
    let json = std::env::var("USERDASH_LOG_JSON").is_ok();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        commands::print_notice(&e.notice());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = DashboardConfig::from_env()?;
    let state = AppState::open(config);

    match cli.command {
        Commands::Users { action } => match action {
            UsersAction::List { search, status } => {
                commands::users::list(&state, search.as_deref(), status);
            }
            UsersAction::Add(fields) => commands::users::add(&state, fields)?,
            UsersAction::Update { id, fields } => commands::users::update(&state, &id, fields)?,
            UsersAction::Activate { id } => commands::users::set_active(&state, &id, true)?,
            UsersAction::Deactivate { id } => commands::users::set_active(&state, &id, false)?,
            UsersAction::Remove { id } => commands::users::remove(&state, &id)?,
            UsersAction::Stats => commands::users::stats(&state),
        },
        Commands::Content { action } => match action {
            ContentAction::List { user } => commands::content::list(&state, user.as_deref()),
            ContentAction::Add { content } => commands::content::add(&state, &content)?,
            ContentAction::Edit { id, content } => commands::content::edit(&state, &id, &content)?,
            ContentAction::Remove { id } => commands::content::remove(&state, &id)?,
        },
        Commands::Editor { action } => match action {
            EditorAction::Show => commands::editor::show(&state),
            EditorAction::Save { content } => commands::editor::save(&state, &content)?,
        },
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(&state, &email, password).await?;
            }
            AuthAction::Google { email, name } => {
                commands::auth::google(&state, email.as_deref(), &name).await?;
            }
            AuthAction::Signup {
                name,
                email,
                password,
            } => commands::auth::sign_up(&state, &name, &email, password).await?,
            AuthAction::GoogleSignup => commands::auth::sign_up_with_google(&state).await?,
            AuthAction::Logout => commands::auth::logout(&state)?,
            AuthAction::Whoami => commands::auth::whoami(&state),
        },
        Commands::Activity => commands::activity::show(&state),
        Commands::Watch { ticks, live } => commands::watch::run(&state, ticks, live).await,
    }
    Ok(())
}
