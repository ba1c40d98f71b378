//! Fluent panel construction.
//!
//! Everything has a default except the title: a builder without `title` or
//! one of the dynamic title setters fails with `MissingRequiredTitle`. Rows
//! default to one and are clamped into `1..=settings.max_rows`. The last of
//! `paginated`/`scrolling` wins; `page_size`, `step_size` and `region` only
//! matter for the mode that uses them.

use std::rc::Rc;

use core_config::PanelSettings;
use core_model::{FixedLayout, Geometry, PaginationRegion, Payload};
use core_render::{MemoryProvider, SurfaceProvider};
use tracing::debug;

use crate::{
    DynamicTitle, InteractionState, Pagination, PaginationState, Panel, PanelError, PanelMode,
    Permissions, ScrollDirection, Scrolling,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeKind {
    Plain,
    Paginated,
    Scrolling(ScrollDirection),
}

enum TitleSpec<P> {
    Missing,
    Static(String),
    PageBound(String),
    Dynamic(DynamicTitle<P>),
}

pub struct PanelBuilder<P: Payload> {
    title: TitleSpec<P>,
    rows: u8,
    layout: Option<FixedLayout>,
    mode: ModeKind,
    page_size: usize,
    step_size: usize,
    region: Option<PaginationRegion>,
    permissions: Permissions,
    title_updates_on_item_click: bool,
    provider: Option<Rc<dyn SurfaceProvider<P>>>,
    settings: PanelSettings,
}

impl<P: Payload> Default for PanelBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload> PanelBuilder<P> {
    pub fn new() -> Self {
        Self {
            title: TitleSpec::Missing,
            rows: 1,
            layout: None,
            mode: ModeKind::Plain,
            page_size: 0,
            step_size: 0,
            region: None,
            permissions: Permissions::empty(),
            title_updates_on_item_click: false,
            provider: None,
            settings: PanelSettings::default(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = TitleSpec::Static(title.into());
        self
    }

    /// Title showing `base` with the page numbers, formatted with the
    /// configured page template.
    pub fn dynamic_title(mut self, base: impl Into<String>) -> Self {
        self.title = TitleSpec::PageBound(base.into());
        self
    }

    pub fn dynamic_title_with<F>(mut self, base: impl Into<String>, f: F) -> Self
    where
        F: Fn(&PaginationState) -> String + 'static,
    {
        self.title = TitleSpec::Dynamic(DynamicTitle::pagination_with(base, f));
        self
    }

    /// Title recomputed from the last clicked item. Turns on title updates
    /// for item clicks.
    pub fn interaction_title(self, base: impl Into<String>) -> Self {
        self.interaction_title_with(base, |state: &InteractionState<P>| state.base.clone())
    }

    pub fn interaction_title_with<F>(mut self, base: impl Into<String>, f: F) -> Self
    where
        F: Fn(&InteractionState<P>) -> String + 'static,
    {
        self.title = TitleSpec::Dynamic(DynamicTitle::interaction_with(base, f));
        self.title_updates_on_item_click = true;
        self
    }

    pub fn update_title_on_item_click(mut self, enabled: bool) -> Self {
        self.title_updates_on_item_click = enabled;
        self
    }

    pub fn rows(mut self, rows: u8) -> Self {
        self.rows = rows;
        self.layout = None;
        self
    }

    /// Use a host-defined fixed layout instead of a grid.
    pub fn layout(mut self, layout: FixedLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Paginated panel; `page_size == 0` computes the size lazily.
    pub fn paginated(mut self, page_size: usize) -> Self {
        self.mode = ModeKind::Paginated;
        self.page_size = page_size;
        self
    }

    pub fn scrolling(mut self, direction: ScrollDirection) -> Self {
        self.mode = ModeKind::Scrolling(direction);
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    pub fn step_size(mut self, step: usize) -> Self {
        self.step_size = step;
        self
    }

    pub fn region(mut self, region: PaginationRegion) -> Self {
        self.region = Some(region);
        self
    }

    pub fn disable_item_place(mut self) -> Self {
        self.permissions.insert(Permissions::PREVENT_PLACE);
        self
    }

    pub fn disable_item_take(mut self) -> Self {
        self.permissions.insert(Permissions::PREVENT_TAKE);
        self
    }

    pub fn disable_item_swap(mut self) -> Self {
        self.permissions.insert(Permissions::PREVENT_SWAP);
        self
    }

    pub fn disable_item_drop(mut self) -> Self {
        self.permissions.insert(Permissions::PREVENT_DROP);
        self
    }

    pub fn disable_other_actions(mut self) -> Self {
        self.permissions.insert(Permissions::PREVENT_OTHER);
        self
    }

    pub fn disable_all_interactions(mut self) -> Self {
        self.permissions = Permissions::locked();
        self
    }

    pub fn provider(mut self, provider: Rc<dyn SurfaceProvider<P>>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn settings(mut self, settings: PanelSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Result<Panel<P>, PanelError> {
        let title = match self.title {
            TitleSpec::Missing => return Err(PanelError::MissingRequiredTitle),
            TitleSpec::Static(title) => DynamicTitle::Static(title),
            TitleSpec::PageBound(base) => DynamicTitle::pagination(base, self.settings.page_format.clone()),
            TitleSpec::Dynamic(title) => title,
        };
        let geometry = match self.layout {
            Some(layout) => Geometry::Fixed(layout),
            None => Geometry::grid(self.rows.clamp(1, self.settings.max_rows.max(1))),
        };
        let mode = match self.mode {
            ModeKind::Plain => PanelMode::Plain,
            ModeKind::Paginated => PanelMode::Paginated(Pagination::new(self.page_size, self.region)),
            ModeKind::Scrolling(direction) => PanelMode::Scrolling(Scrolling::new(
                Pagination::new(self.page_size, self.region),
                direction,
                self.step_size,
            )),
        };
        let provider = self.provider.unwrap_or_else(|| Rc::new(MemoryProvider));

        let mut panel = Panel::with_mode(title, geometry, mode, provider, self.settings);
        panel.permissions = self.permissions;
        panel.flags.title_updates_on_item_click = self.title_updates_on_item_click;
        debug!(target: "panel.lifecycle", panel = %panel.id, geometry = %geometry, kind = ?self.mode, "panel_built");
        Ok(panel)
    }
}
