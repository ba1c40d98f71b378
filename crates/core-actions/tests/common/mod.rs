#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use std::cell::RefCell;
use std::rc::Rc;

use core_events::{ClickEvent, ClickHandler, HandlerContext, ViewerId, handler};
use core_state::{Panel, PanelBuilder};

pub type Log = Rc<RefCell<Vec<&'static str>>>;

pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<&'static str> {
    log.borrow().clone()
}

/// Click handler that only records its name.
pub fn recording(log: &Log, name: &'static str) -> ClickHandler<String> {
    let log = log.clone();
    handler(move |_ctx: &mut HandlerContext<ClickEvent<String>>| log.borrow_mut().push(name))
}

pub fn plain(rows: u8) -> Panel<String> {
    PanelBuilder::new().title("Test").rows(rows).build().unwrap()
}

pub const VIEWER: ViewerId = ViewerId(1);

/// Panel click carrying whatever the surface currently shows at `slot`.
pub fn click_shown(panel: &Panel<String>, slot: usize) -> ClickEvent<String> {
    ClickEvent::panel(VIEWER, slot).with_current(panel.surface().slot(slot).cloned())
}
