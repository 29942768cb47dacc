use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    screen::{IdOf, ScreenKind},
    AdminBackend, AdminScreen, Confirmer, DeleteOutcome, FetchOutcome, HttpAdminClient,
    Notifier, SpecialtyScreen, SubmitOutcome, UserScreen,
};
use shared::domain::{SpecialtyId, UserId};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod console;
mod render;

use config::{load_settings, DEFAULT_CONFIG_PATH};
use console::{AssumeYes, ConsoleNotifier, StdinConfirmer};

#[derive(Parser, Debug)]
#[command(about = "Manage clinic specialties and users from the terminal")]
struct Cli {
    /// Backend base URL; overrides the settings file and environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Bearer token sent with every request.
    #[arg(long)]
    token: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    Specialties(SpecialtyCommand),
    #[command(subcommand)]
    Users(UserCommand),
}

#[derive(Subcommand, Debug)]
enum SpecialtyCommand {
    List,
    Edit {
        id: i64,
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    List,
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config)?;
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(token) = cli.token {
        settings.api_token = Some(token);
    }

    let mut client = HttpAdminClient::with_timeout(&settings.api_url, settings.request_timeout())
        .with_context(|| format!("invalid api url '{}'", settings.api_url))?;
    if let Some(token) = settings.api_token {
        client = client.with_bearer_token(token);
    }
    info!(api_url = %client.base_url(), "admin console starting");

    let backend: Arc<dyn AdminBackend> = Arc::new(client);
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);

    match cli.command {
        Command::Specialties(command) => {
            let screen = SpecialtyScreen::specialties(backend, notifier);
            run_specialties(&screen, command).await
        }
        Command::Users(command) => {
            let confirmer: Arc<dyn Confirmer> = match &command {
                UserCommand::Delete { yes: true, .. } => Arc::new(AssumeYes),
                _ => Arc::new(StdinConfirmer),
            };
            let screen = UserScreen::users(backend, notifier, confirmer);
            run_users(&screen, command).await
        }
    }
}

async fn run_specialties(screen: &SpecialtyScreen, command: SpecialtyCommand) -> Result<()> {
    load(screen).await?;
    match command {
        SpecialtyCommand::List => {
            print!("{}", render::specialty_table(&screen.records().await));
        }
        SpecialtyCommand::Edit { id, name } => {
            open(screen, SpecialtyId(id)).await?;
            screen.update_form(|form| form.name = name).await?;
            save(screen).await?;
            print!("{}", render::specialty_table(&screen.records().await));
        }
    }
    Ok(())
}

async fn run_users(screen: &UserScreen, command: UserCommand) -> Result<()> {
    load(screen).await?;
    match command {
        UserCommand::List => {
            print!("{}", render::user_table(&screen.records().await));
        }
        UserCommand::Edit { id, name, email } => {
            if name.is_none() && email.is_none() {
                bail!("nothing to change: pass --name and/or --email");
            }
            open(screen, UserId(id)).await?;
            screen
                .update_form(|form| {
                    if let Some(name) = name {
                        form.name = name;
                    }
                    if let Some(email) = email {
                        form.email = email;
                    }
                })
                .await?;
            save(screen).await?;
            print!("{}", render::user_table(&screen.records().await));
        }
        UserCommand::Delete { id, .. } => match screen.delete(UserId(id)).await {
            DeleteOutcome::Deleted => {
                print!("{}", render::user_table(&screen.records().await));
            }
            DeleteOutcome::Declined => bail!("delete of user {id} cancelled"),
            DeleteOutcome::Failed { .. } => bail!("delete of user {id} failed"),
        },
    }
    Ok(())
}

async fn load<K: ScreenKind>(screen: &AdminScreen<K>) -> Result<()> {
    match screen.activate().await {
        FetchOutcome::Committed { .. } | FetchOutcome::Stale => Ok(()),
        FetchOutcome::Failed => bail!("could not load {}", K::NAME),
    }
}

async fn open<K: ScreenKind>(screen: &AdminScreen<K>, id: IdOf<K>) -> Result<()> {
    screen.open_editor(id).await?;
    if let Some(editor) = screen.editor().await {
        println!("Editando {}", editor.target_name());
    }
    Ok(())
}

async fn save<K: ScreenKind>(screen: &AdminScreen<K>) -> Result<()> {
    match screen.submit().await {
        SubmitOutcome::Saved => Ok(()),
        SubmitOutcome::Invalid(errors) => bail!("invalid input: {errors}"),
        SubmitOutcome::Failed { .. } => bail!("{} update failed", K::NAME),
        SubmitOutcome::NotOpen | SubmitOutcome::AlreadySubmitting => {
            bail!("no edit was submitted")
        }
    }
}
