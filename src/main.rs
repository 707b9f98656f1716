mod cli;
mod config;
mod fixtures;
mod model;
mod prepare;
mod render;
mod rows;
mod search;
mod session;
mod state;

use anyhow::Result;
use clap::Parser;
use std::cell::RefCell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shelf", about = "An interactive product catalogue browser")]
pub struct Args {
    #[arg(short, long, help = "One-shot mode: print rows for this query and exit")]
    pub query: Option<String>,

    #[arg(long, help = "Filter by owning user (id or name)")]
    pub user: Option<String>,

    #[arg(long, help = "Filter by category (id or title)")]
    pub category: Option<String>,

    #[arg(
        long,
        value_name = "KEY[:DIR]",
        help = "Sort rows: id, name, category, user; direction asc or desc"
    )]
    pub sort: Option<String>,

    #[arg(long, help = "Print rows as JSON and exit")]
    pub json: bool,

    #[arg(
        long,
        env = "SHELF_DATA",
        help = "Catalogue JSON file (replaces the embedded fixtures)"
    )]
    pub data: Option<PathBuf>,

    #[arg(long, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "SHELF_SESSIONS_DIR", help = "Session logs directory")]
    pub sessions_dir: Option<PathBuf>,

    #[arg(long, help = "Disable the session log")]
    pub no_session_log: bool,

    #[arg(long, help = "Verbose output (print event traces)")]
    pub verbose: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = if let Some(config_path) = &args.config {
        config::Config::load_from(config_path)?
    } else {
        config::Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: failed to load config: {}", e);
            config::Config::default()
        })
    };

    // Config problems degrade to warnings; the offending fields fall
    // back to their defaults.
    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Warning: invalid config {}", error);
        }
    }

    // Load the catalogue once; everything downstream borrows from it.
    let owned;
    let (catalog, data_source) = match args.data.clone().or_else(|| config.data_file.clone()) {
        Some(path) => {
            owned = fixtures::load_from(&path)?;
            (&owned, path.display().to_string())
        }
        None => (fixtures::embedded(), "embedded".to_string()),
    };

    for warning in catalog.lint() {
        eprintln!("Warning: {}", warning);
    }

    let prepared = prepare::prepare_categories(catalog);

    // Seed the view state from config, then CLI flags.
    let mut state = state::ViewState::default();
    if let Some(sort) = &config.default_sort {
        state.sort = cli::parse_sort(sort);
    }
    if let Some(sort) = &args.sort {
        state.sort = Some(
            cli::parse_sort(sort)
                .ok_or_else(|| anyhow::anyhow!("invalid --sort value: {}", sort))?,
        );
    }
    if let Some(user) = &args.user {
        let id = cli::resolve_user(catalog, user)
            .ok_or_else(|| anyhow::anyhow!("unknown user: {}. Try an id or a name.", user))?;
        state.selected_user = Some(id);
    }
    if let Some(category) = &args.category {
        let id = cli::resolve_category(catalog, category).ok_or_else(|| {
            anyhow::anyhow!("unknown category: {}. Try an id or a title.", category)
        })?;
        state.selected_category = Some(id);
    }
    if let Some(query) = &args.query {
        state.query = query.clone();
    }

    let one_shot = args.query.is_some() || args.json;

    let session_id = uuid::Uuid::new_v4().to_string();
    let session = if args.no_session_log || !config.session_log.enabled {
        None
    } else {
        let sessions_dir = args
            .sessions_dir
            .clone()
            .or_else(|| config.sessions_dir.clone())
            .unwrap_or_else(|| PathBuf::from(".shelf").join("sessions"));
        std::fs::create_dir_all(&sessions_dir)?;
        let path = sessions_dir.join(format!("{}.jsonl", session_id));
        Some(session::SessionLog::new(&path, &session_id)?)
    };

    let ctx = cli::Context {
        args,
        config,
        catalog,
        prepared,
        session_id,
        state: RefCell::new(state),
        session: RefCell::new(session),
    };

    if let Some(log) = ctx.session.borrow_mut().as_mut() {
        if let Err(e) = log.session_start(&data_source, !one_shot) {
            eprintln!("Warning: failed to write session log: {}", e);
        }
    }

    if one_shot {
        cli::run_once(&ctx)
    } else {
        cli::run_repl(ctx)
    }
}
