//! gridpanel entrypoint.
//!
//! Builds one paginated (or scrolling) panel against the in-memory backend,
//! opens it for a simulated viewer and presses the panel's own "next" item
//! `--pages` times, printing the slot grid and title after every step. The
//! clicks go through the registry exactly as host events would.
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use core_actions::PanelRegistry;
use core_config::{PanelSettings, load_from};
use core_events::{ClickEvent, HostEvent, InteractionEvent, PanelCommand, PanelId, ViewerId};
use core_model::{COLUMNS, PaginationRegion};
use core_render::Surface;
use core_state::{Panel, PanelBuilder, PanelItem, ScrollDirection};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

const VIEWER: ViewerId = ViewerId(1);
const CELL: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScrollArg {
    Vertical,
    Horizontal,
}

impl From<ScrollArg> for ScrollDirection {
    fn from(arg: ScrollArg) -> Self {
        match arg {
            ScrollArg::Vertical => ScrollDirection::Vertical,
            ScrollArg::Horizontal => ScrollDirection::Horizontal,
        }
    }
}

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "gridpanel", version, about = "Paginated panel simulator")]
struct Args {
    /// Grid rows (clamped to the configured ceiling).
    #[arg(long, default_value_t = 3)]
    rows: u8,
    /// Number of page items in the backlog.
    #[arg(long, default_value_t = 40)]
    items: usize,
    /// Items per page; 0 computes it from the free slots.
    #[arg(long, default_value_t = 0)]
    page_size: usize,
    /// Scroll step; 0 computes it from the layout. Only used with --scroll.
    #[arg(long, default_value_t = 0)]
    step_size: usize,
    /// Scroll instead of paging.
    #[arg(long, value_enum)]
    scroll: Option<ScrollArg>,
    /// Restrict page content to the first N rows.
    #[arg(long)]
    region_rows: Option<usize>,
    /// Optional configuration file path (overrides discovery of `gridpanel.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// How many times to press "next".
    #[arg(long, default_value_t = 2)]
    pages: usize,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("gridpanel.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "gridpanel.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// Last-row navigation slots: previous in the first column, next in the last.
fn nav_slots(rows: usize) -> (usize, usize) {
    let base = (rows - 1) * COLUMNS;
    (base, base + COLUMNS - 1)
}

fn build_panel(args: &Args, settings: PanelSettings) -> Result<Panel<String>> {
    let mut builder = PanelBuilder::new()
        .rows(args.rows)
        .dynamic_title("Gallery")
        .settings(settings)
        .disable_all_interactions();
    builder = match args.scroll {
        Some(direction) => builder
            .scrolling(direction.into())
            .page_size(args.page_size)
            .step_size(args.step_size),
        None => builder.paginated(args.page_size),
    };
    if let Some(n) = args.region_rows {
        let rows: Vec<usize> = (1..=n.min(usize::from(args.rows).saturating_sub(1)).max(1)).collect();
        builder = builder.region(PaginationRegion::rows(&rows));
    }
    let mut panel = builder.build().context("building panel")?;

    let (prev, next) = nav_slots(panel.rows());
    panel.set_item(
        prev,
        PanelItem::with_handler("<".to_string(), |ctx| ctx.request(PanelCommand::PreviousPage)),
    )?;
    panel.set_item(
        next,
        PanelItem::with_handler(">".to_string(), |ctx| ctx.request(PanelCommand::NextPage)),
    )?;
    panel.add_page_items((0..args.items).map(|i| PanelItem::new(format!("item{i}"))))?;
    Ok(panel)
}

/// Title line followed by one text row per surface row; empty slots print `.`.
fn render_grid(surface: &dyn Surface<String>) -> String {
    let mut out = format!("[{}]\n", surface.title());
    for row in 0..surface.size().div_ceil(COLUMNS) {
        let cells: Vec<String> = (0..COLUMNS)
            .map(|col| {
                let text = surface
                    .slot(row * COLUMNS + col)
                    .map(|p| p.payload().as_str())
                    .unwrap_or(".");
                let clipped: String = text.chars().take(CELL).collect();
                format!("{clipped:<CELL$}")
            })
            .collect();
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }
    out
}

fn press(registry: &mut PanelRegistry<String>, id: PanelId, slot: usize) -> Option<bool> {
    let shown = registry.get(id)?.surface().slot(slot).cloned();
    let click = ClickEvent::panel(VIEWER, slot).with_current(shown);
    let result = registry.handle(HostEvent::for_panel(id, InteractionEvent::Click(click)))?;
    Some(result.denied)
}

fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config = load_from(args.config.clone())?;
    let settings = config.panel_settings();
    info!(target: "runtime.startup", rows = args.rows, items = args.items, scroll = ?args.scroll, max_rows = settings.max_rows, "bootstrap_complete");
    let close_delay = settings.close_delay_ticks;

    let mut registry = PanelRegistry::new();
    let id = registry.insert(build_panel(&args, settings)?);
    if !registry.open(id, &VIEWER, 1) {
        anyhow::bail!("viewer could not open the panel");
    }
    let (_, next) = nav_slots(registry.get(id).map(Panel::rows).unwrap_or(1));

    if let Some(panel) = registry.get(id) {
        print!("{}", render_grid(panel.surface()));
    }
    for _ in 0..args.pages {
        let before = registry.get(id).map(Panel::page_number);
        let denied = press(&mut registry, id, next).unwrap_or(true);
        let after = registry.get(id).map(Panel::page_number);
        if before == after {
            println!("-- last page reached --");
            break;
        }
        if let Some(panel) = registry.get(id) {
            println!("-- next (host move denied: {denied}) --");
            print!("{}", render_grid(panel.surface()));
        }
    }

    registry.close(id, VIEWER, true);
    let closed = registry.tick(close_delay);
    info!(target: "runtime", closed, "shutdown");
    println!("-- closed after {close_delay} ticks --");
    drop(startup.log_guard.take());
    Ok(())
}
