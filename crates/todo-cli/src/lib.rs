use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, anyhow};
use clap::Parser;
use todo_api_client::TodoHttpClient;
use todo_client_core::app::{LOGIN_DISABLED_MESSAGE, LOGIN_REQUIRED_MESSAGE};
use todo_client_core::auth::{REGISTRATION_SUCCESS_MESSAGE, authenticate, register};
use todo_client_core::config::{normalize_base_url, resolve_backend_base_url};
use todo_client_core::flags::load_feature_flags;
use todo_client_core::{
    ActionOutcome, AppAction, AppState, Credentials, LoginOutcome, RegistrationOutcome,
    SessionController, TodoId, TodoSync, TodoSyncState, TokenStore,
};

mod token_file;

pub use token_file::{FileTokenStore, default_token_path};

const BASE_URL_SOURCE_FLAG: &str = "--base-url";

#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(about = "Todo client: session, feature flags, and todo sync from a terminal")]
pub struct TodoCli {
    /// Backend base URL (overrides TODO_BACKEND_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// File holding the bearer token
    #[arg(long, global = true)]
    pub token_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Print the backend feature flags
    Flags,
    /// Create an account
    Register { username: String, password: String },
    /// Exchange credentials for a token and store it
    Login { username: String, password: String },
    /// Forget the stored token
    Logout,
    /// Show session and backend configuration
    Status,
    /// List todos
    List {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a todo
    Add { title: String },
    /// Rename a todo
    Edit {
        #[arg(value_parser = parse_todo_id)]
        id: TodoId,
        title: String,
    },
    /// Delete a todo
    Delete {
        #[arg(value_parser = parse_todo_id)]
        id: TodoId,
    },
}

/// Numeric ids become `TodoId::Number`; anything else stays opaque.
fn parse_todo_id(raw: &str) -> Result<TodoId, std::convert::Infallible> {
    raw.parse()
}

pub async fn run() -> anyhow::Result<()> {
    let cli = TodoCli::parse();
    execute(cli, &mut std::io::stdout()).await
}

/// Runs one command, writing user-facing output to `out`.
pub async fn execute<W: Write>(cli: TodoCli, out: &mut W) -> anyhow::Result<()> {
    let (base_url, source) = match cli.base_url.as_deref() {
        Some(raw) => (
            normalize_base_url(raw).context("invalid --base-url")?,
            BASE_URL_SOURCE_FLAG,
        ),
        None => resolve_backend_base_url().context("invalid backend base url")?,
    };
    let token_path = match cli.token_file {
        Some(path) => path,
        None => default_token_path().ok_or_else(|| anyhow!("no config directory; pass --token-file"))?,
    };
    tracing::debug!(%base_url, source, token_path = %token_path.display(), "cli configured");

    let store = FileTokenStore::new(token_path);
    let client = TodoHttpClient::from_base_url(&base_url)?;

    match cli.command {
        Commands::Flags => {
            let flags = load_feature_flags(&client).await;
            writeln!(out, "{}", flags.to_pretty_json())?;
        }
        Commands::Register { username, password } => {
            let credentials = Credentials::new(username, password)?;
            match register(&client, &credentials).await {
                RegistrationOutcome::Registered => writeln!(out, "{REGISTRATION_SUCCESS_MESSAGE}")?,
                RegistrationOutcome::Failed(message) => writeln!(out, "{message}")?,
            }
        }
        Commands::Login { username, password } => {
            let credentials = Credentials::new(username, password)?;
            let mut app = AppState::initialize(&store);
            app.apply_action(AppAction::FlagsLoaded(load_feature_flags(&client).await));
            if !app.flags().login_enabled() {
                writeln!(out, "{LOGIN_DISABLED_MESSAGE}")?;
                return Ok(());
            }
            match authenticate(&client, &credentials).await {
                LoginOutcome::Authenticated(token) => {
                    app.apply_action(AppAction::LoggedIn(token));
                    if !app.session().is_authenticated() {
                        return Err(anyhow!(
                            "could not store token in {}",
                            store.path().display()
                        ));
                    }
                    writeln!(out, "Logged in")?;
                }
                LoginOutcome::Failed(message) => writeln!(out, "{message}")?,
            }
        }
        Commands::Logout => {
            SessionController::initialize(&store)
                .logout()
                .with_context(|| format!("failed to clear {}", store.path().display()))?;
            writeln!(out, "Logged out")?;
        }
        Commands::Status => {
            let authenticated = AppState::initialize(&store).session().is_authenticated();
            writeln!(
                out,
                "session: {}",
                if authenticated { "logged in" } else { "logged out" }
            )?;
            writeln!(out, "backend: {base_url} ({source})")?;
            writeln!(out, "token file: {}", store.path().display())?;
        }
        Commands::List { json } => {
            let Some(sync) = mount_sync(&store, client, out)? else {
                return Ok(());
            };
            sync.refresh().await;
            if json {
                print_json(out, &sync.snapshot())?;
            } else {
                print_todos(out, &sync.snapshot())?;
            }
        }
        Commands::Add { title } => {
            let Some(sync) = mount_sync(&store, client, out)? else {
                return Ok(());
            };
            let outcome = sync.create(&title).await;
            finish_mutation(out, &sync, outcome)?;
        }
        Commands::Edit { id, title } => {
            let Some(sync) = mount_sync(&store, client, out)? else {
                return Ok(());
            };
            let outcome = sync.update(&id, &title).await;
            finish_mutation(out, &sync, outcome)?;
        }
        Commands::Delete { id } => {
            let Some(sync) = mount_sync(&store, client, out)? else {
                return Ok(());
            };
            let outcome = sync.delete(&id).await;
            finish_mutation(out, &sync, outcome)?;
        }
    }
    Ok(())
}

fn mount_sync<W: Write>(
    store: &FileTokenStore,
    client: TodoHttpClient,
    out: &mut W,
) -> anyhow::Result<Option<TodoSync<TodoHttpClient>>> {
    let token = store
        .get()
        .with_context(|| format!("failed to read {}", store.path().display()))?;
    let sync = token.and_then(|token| TodoSync::mount(Rc::new(client), &token));
    if sync.is_none() {
        writeln!(out, "{LOGIN_REQUIRED_MESSAGE}")?;
    }
    Ok(sync)
}

/// Prints the refetched list or the unauthorized message. Skipped and
/// failed mutations print nothing and issue no further requests.
fn finish_mutation<W: Write>(
    out: &mut W,
    sync: &TodoSync<TodoHttpClient>,
    outcome: ActionOutcome,
) -> anyhow::Result<()> {
    match outcome {
        ActionOutcome::Completed | ActionOutcome::Unauthorized => {
            print_todos(out, &sync.snapshot())
        }
        ActionOutcome::Skipped | ActionOutcome::Failed => Ok(()),
    }
}

fn print_todos<W: Write>(out: &mut W, state: &TodoSyncState) -> anyhow::Result<()> {
    if let Some(message) = state.error_message() {
        writeln!(out, "{message}")?;
    }
    if state.items.is_empty() {
        writeln!(out, "No todos.")?;
    }
    for todo in &state.items {
        writeln!(out, "{}\t{}", todo.id, todo.title)?;
    }
    Ok(())
}

fn print_json<W: Write>(out: &mut W, state: &TodoSyncState) -> anyhow::Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(state)?)?;
    Ok(())
}
