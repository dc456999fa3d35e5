use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::Terminal;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::config::{initial_route, RuntimeConfig};
use pokedex::effect::Effect;
use pokedex::logging;
use pokedex::reducer::reducer;
use pokedex::state::AppState;
use pokedex::storage::{self, CaughtFlags};
use pokedex::ui::{PokedexComponentId, PokedexContext, PokedexUi};

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Gen 1-3 pokedex with search, filters and caught tracking")]
struct Args {
    #[command(flatten)]
    debug: DebugCliArgs,
    /// Open the detail page for this national dex number.
    #[arg(long)]
    id: Option<String>,
    /// Start at a location such as `detail?id=25`.
    #[arg(long, conflicts_with = "id")]
    location: Option<String>,
    #[arg(long, env = "POKEDEX_API_BASE")]
    api_base: Option<String>,
    /// Where caught flags and the log file live.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    #[arg(long)]
    cache_dir: Option<PathBuf>,
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let config = RuntimeConfig::resolve(
        args.api_base.clone(),
        args.data_dir.clone(),
        args.cache_dir.clone(),
        args.no_cache,
    );
    if let Err(err) = logging::init(&config.log_path()) {
        eprintln!("pokedex: {err}");
    }
    tracing::info!(api_base = %config.api_base, data_dir = %config.data_dir.display(), "starting");

    let debug = DebugSession::new(args.debug);
    let route = initial_route(args.location.as_deref(), args.id.as_deref());
    let flags = storage::load_flags(&config.store_path()).unwrap_or_else(|err| {
        tracing::warn!(%err, "caught store unreadable, starting empty");
        CaughtFlags::default()
    });

    let state = debug
        .load_state_or_else_async(|| {
            let flags = flags.clone();
            async move { Ok::<AppState, io::Error>(AppState::new(route, flags)) }
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, config).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("exiting");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    config: RuntimeConfig,
) -> io::Result<DebugRunOutput<AppState>> {
    let config = Arc::new(config);
    let ui = Rc::new(RefCell::new(PokedexUi::new()));
    let mut bus: EventBus<AppState, Action, PokedexComponentId, PokedexContext> =
        EventBus::new();
    let keybindings: Keybindings<PokedexContext> = Keybindings::new();

    let ui_catalog = Rc::clone(&ui);
    bus.register(PokedexComponentId::Catalog, move |event, state| {
        ui_catalog
            .borrow_mut()
            .handle_catalog_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(PokedexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(PokedexComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) if !state.catalog.search.active => match key.code {
            crossterm::event::KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            crossterm::event::KeyCode::Char('/') if state.detail.is_none() => {
                HandlerResponse::action(Action::SearchStart)
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(120), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, config.clone()),
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, config: Arc<RuntimeConfig>) {
    match effect {
        Effect::LoadCatalog { limit } => {
            let client = config.api_client();
            ctx.tasks().spawn(TaskKey::new("catalog"), async move {
                match client.fetch_catalog(limit).await {
                    Ok(entries) => Action::CatalogDidLoad(entries),
                    Err(error) => {
                        tracing::error!(%error, "catalog request failed");
                        Action::CatalogDidError(error)
                    }
                }
            });
        }
        Effect::PrefetchDetail { id } => {
            let client = config.api_client();
            let key = format!("prefetch_{id}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match client.fetch_detail(id).await {
                    Ok(_) => Action::EntryPrefetchDidLoad { id },
                    Err(error) => {
                        tracing::error!(id, %error, "detail prefetch failed");
                        Action::EntryPrefetchDidError { id, error }
                    }
                }
            });
        }
        Effect::LoadDetail { id, token } => {
            let client = config.api_client();
            // One key per token: an older load is left to finish and dropped by the reducer.
            let key = format!("detail_{token}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match client.fetch_detail(id).await {
                    Ok(record) => Action::DetailDidLoad { token, record },
                    Err(error) => {
                        tracing::error!(id, %token, %error, "detail request failed");
                        Action::DetailDidError { token, id, error }
                    }
                }
            });
        }
        Effect::PersistCaught { flags } => {
            let path = config.store_path();
            if let Err(err) = storage::save_flags(&path, &flags) {
                tracing::error!(%err, "failed to persist caught flags");
            }
        }
    }
}
