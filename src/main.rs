//! A scrollytelling portfolio for the terminal.
//!
//! Run the binary to launch the interactive viewer (showcase, helix,
//! detail pages and the admin panel).  Subcommands manage the project
//! collection from scripts.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr, Stderr};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{Actions, AppState},
    thumb_runtime::ThumbUpdate,
};
use crate::config::AppConfig;
use crate::core::actions::{ProjectActions, ProjectForm};
use crate::core::auth::{IdentityProvider, LocalIdentityProvider, Session};
use crate::core::db::open_db;
use crate::core::helix::ViewportClass;
use crate::core::repo::{ProjectRepository, SqliteProjectRepository};
use crate::core::store::FsObjectStore;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Scrollytelling portfolio viewer")]
struct Cli {
    /// SQLite database file (overrides `db_path`).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Object store directory (overrides `store_dir`).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Force the mobile layout regardless of terminal width.
    #[arg(long)]
    mobile: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Debug)]
struct AdminArgs {
    /// Admin account (defaults to `admin_email` from the config).
    #[arg(long)]
    email: Option<String>,

    #[arg(long, env = "FOLIO_ADMIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List projects, newest first.
    List,
    /// Print one project.
    Show { slug: String },
    /// Insert the demo collection into an empty database.
    Seed,
    /// Create a project.  `--image` may be a URL or a local file to upload.
    Add {
        #[command(flatten)]
        admin: AdminArgs,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        year: String,
        #[arg(long)]
        image: String,
    },
    /// Delete a project by id.
    Delete {
        id: String,
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Upload an image to the object store and print its public URL.
    Upload {
        file: PathBuf,
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Request a password reset email.
    ResetPassword {
        #[arg(long)]
        email: String,
    },
    /// Change the admin password.
    Passwd {
        #[command(flatten)]
        admin: AdminArgs,
        #[arg(long)]
        new_password: String,
    },
}

// ───────────────────────────────────────── wiring ────────────

fn build_actions(config: &AppConfig) -> Result<Actions> {
    let db_path = config.db_path();
    let conn = open_db(&db_path)
        .with_context(|| format!("opening database {}", db_path.display()))?;
    let store = FsObjectStore::new(config.store_dir(), config.public_base_url());
    Ok(ProjectActions::new(SqliteProjectRepository::new(conn), store))
}

fn identity_for(config: &AppConfig) -> LocalIdentityProvider {
    LocalIdentityProvider::new(config.admin_email.as_deref(), config.admin_password.as_deref())
}

fn admin_session(
    identity: &LocalIdentityProvider,
    config: &AppConfig,
    args: &AdminArgs,
) -> Result<Session> {
    let email = args
        .email
        .clone()
        .or_else(|| config.admin_email.clone())
        .context("no admin email: pass --email or set admin_email in the config")?;
    let password = args.password.clone().unwrap_or_default();
    Ok(identity.sign_in(&email, &password)?)
}

fn init_stderr_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();
}

/// The viewer owns the terminal, so logs go to `<data_dir>/folio.log`.
fn init_file_tracing() -> Result<()> {
    let dir = config::data_dir();
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("folio.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ───────────────────────────────────────── subcommands ───────

fn run_command(command: Command, config: &AppConfig) -> Result<()> {
    let actions = build_actions(config)?;
    let identity = identity_for(config);

    match command {
        Command::List => {
            for p in actions.list_projects() {
                println!("{}\t{}\t{}\t{}\t{}", p.id, p.slug, p.year, p.category, p.title);
            }
        }
        Command::Show { slug } => {
            let Some(p) = actions.project_by_slug(&slug) else {
                bail!("no project with slug {slug:?}");
            };
            println!("{}", p.title);
            println!("{} · {}", p.category, p.year);
            println!("slug:      {}", p.slug);
            println!("id:        {}", p.id);
            println!("thumbnail: {}", p.thumbnail);
            println!("created:   {}", p.created_at.to_rfc3339());
            println!();
            println!("{}", p.description);
        }
        Command::Seed => {
            let inserted = actions.repo().seed_demo_projects()?;
            println!("seeded {inserted} projects");
        }
        Command::Add {
            admin,
            title,
            description,
            category,
            year,
            image,
        } => {
            let session = admin_session(&identity, config, &admin)?;
            let form = ProjectForm {
                title,
                description,
                category,
                year,
                image,
            };
            let result = actions.create_project(Some(&session), &form);
            if let Some(err) = result.error {
                bail!(err);
            }
            println!("project created");
        }
        Command::Delete { id, admin } => {
            let session = admin_session(&identity, config, &admin)?;
            let Some(project) = actions.repo().get_by_id(&id)? else {
                bail!("no project with id {id:?}");
            };
            let result = actions.delete_project(Some(&session), &id);
            if let Some(err) = result.error {
                bail!(err);
            }
            println!("deleted {:?}", project.title);
        }
        Command::Upload { file, admin } => {
            let session = admin_session(&identity, config, &admin)?;
            match actions.upload_thumbnail(Some(&session), &file) {
                Ok(url) => println!("{url}"),
                Err(result) => bail!(result.error.unwrap_or_default()),
            }
        }
        Command::ResetPassword { email } => {
            let message = identity.reset_password(&email)?;
            println!("{message}");
        }
        Command::Passwd {
            admin,
            new_password,
        } => {
            let session = admin_session(&identity, config, &admin)?;
            identity.update_password(&session, &new_password)?;
            // Persist against the on-disk config, not the CLI overrides.
            let mut on_disk = AppConfig::load();
            on_disk.admin_password = Some(new_password);
            on_disk.save()?;
            identity.sign_out(&session);
            println!("password updated");
        }
    }
    Ok(())
}

// ───────────────────────────────────────── viewer ────────────

type Term = Terminal<CrosstermBackend<Stderr>>;

async fn run_viewer(config: AppConfig, mobile: bool) -> Result<()> {
    let actions = build_actions(&config)?;
    let identity = identity_for(&config);
    let viewport = crossterm::terminal::size()?;
    let forced = mobile.then_some(ViewportClass::Mobile);
    let mut state = AppState::new(config, actions, identity, viewport, forced);

    let (thumb_tx, mut thumb_rx) = mpsc::unbounded_channel::<ThumbUpdate>();
    state.set_thumb_sender(thumb_tx);
    state.reload_projects();
    tracing::info!(projects = state.projects.len(), "viewer started");

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut state, &mut thumb_rx).await;

    // ── teardown (also after a failed loop) ──────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Term,
    state: &mut AppState,
    thumb_rx: &mut mpsc::UnboundedReceiver<ThumbUpdate>,
) -> Result<()> {
    let frame = Duration::from_millis(state.config.frame_ms);
    let mut events = spawn_event_reader(frame);
    let mut ticker = tokio::time::interval(frame);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(f, state))?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m),
                    AppEvent::Resize(w, h) => state.resize(w, h),
                }
            }

            Some(update) = thumb_rx.recv() => {
                state.apply_thumb(update);
                // Decodes finish in bursts; take them all before redrawing.
                while let Ok(more) = thumb_rx.try_recv() {
                    state.apply_thumb(more);
                }
            }

            _ = ticker.tick() => {
                let now = Instant::now();
                state.tick(now.duration_since(last_tick).as_secs_f64());
                last_tick = now;
            }
        }

        if state.should_quit {
            break;
        }
    }

    events.shutdown();
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }
    if let Some(store) = cli.store {
        config.store_dir = Some(store);
    }

    match cli.command {
        Some(command) => {
            init_stderr_tracing();
            run_command(command, &config)
        }
        None => {
            init_file_tracing()?;
            run_viewer(config, cli.mobile).await
        }
    }
}
