//! Dynamic titles.
//!
//! A panel title is either a fixed label or recomputed from state:
//!
//! * `Pagination` – `{base, page, pages}`, refreshed whenever the visible
//!   page changes (open, next, previous, set_page_number).
//! * `Interaction` – `{base, clicked item, slot, click kind, action}`,
//!   refreshed after an authenticated item click when the panel has
//!   `title_updates_on_item_click` set.
//!
//! Recomputing only replaces the displayed title (`Surface::set_title`); it
//! never re-renders items or recreates the surface.

use std::fmt;
use std::rc::Rc;

use core_events::{ClickKind, RawAction};
use core_model::Payload;

use crate::PanelItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pub base: String,
    pub page: usize,
    pub pages: usize,
}

#[derive(Debug, Clone)]
pub struct InteractionState<P> {
    pub base: String,
    pub clicked_item: Option<PanelItem<P>>,
    pub slot: Option<usize>,
    pub click_kind: Option<ClickKind>,
    pub action: Option<RawAction>,
}

impl<P> InteractionState<P> {
    fn initial(base: String) -> Self {
        Self {
            base,
            clicked_item: None,
            slot: None,
            click_kind: None,
            action: None,
        }
    }
}

pub type TitleFormat<S> = Rc<dyn Fn(&S) -> String>;

/// Substitute `{base}`, `{page}` and `{pages}` in a page title template.
pub fn format_page_title(template: &str, state: &PaginationState) -> String {
    template
        .replace("{pages}", &state.pages.to_string())
        .replace("{page}", &state.page.to_string())
        .replace("{base}", &state.base)
}

#[derive(Clone)]
pub enum DynamicTitle<P> {
    Static(String),
    Pagination {
        state: PaginationState,
        format: TitleFormat<PaginationState>,
    },
    Interaction {
        state: InteractionState<P>,
        format: TitleFormat<InteractionState<P>>,
    },
}

impl<P: Payload> DynamicTitle<P> {
    /// Page-bound title rendered through a `{base}/{page}/{pages}` template.
    pub fn pagination(base: impl Into<String>, template: impl Into<String>) -> Self {
        let template = template.into();
        Self::pagination_with(base, move |state| format_page_title(&template, state))
    }

    pub fn pagination_with<F>(base: impl Into<String>, f: F) -> Self
    where
        F: Fn(&PaginationState) -> String + 'static,
    {
        DynamicTitle::Pagination {
            state: PaginationState {
                base: base.into(),
                page: 1,
                pages: 1,
            },
            format: Rc::new(f),
        }
    }

    /// Interaction-bound title; shows the base label until a click updates it.
    pub fn interaction(base: impl Into<String>) -> Self {
        Self::interaction_with(base, |state: &InteractionState<P>| state.base.clone())
    }

    pub fn interaction_with<F>(base: impl Into<String>, f: F) -> Self
    where
        F: Fn(&InteractionState<P>) -> String + 'static,
    {
        DynamicTitle::Interaction {
            state: InteractionState::initial(base.into()),
            format: Rc::new(f),
        }
    }

    pub fn base(&self) -> &str {
        match self {
            DynamicTitle::Static(title) => title,
            DynamicTitle::Pagination { state, .. } => &state.base,
            DynamicTitle::Interaction { state, .. } => &state.base,
        }
    }

    pub fn render(&self) -> String {
        match self {
            DynamicTitle::Static(title) => title.clone(),
            DynamicTitle::Pagination { state, format } => format(state),
            DynamicTitle::Interaction { state, format } => format(state),
        }
    }

    pub fn is_pagination(&self) -> bool {
        matches!(self, DynamicTitle::Pagination { .. })
    }

    pub fn is_interaction(&self) -> bool {
        matches!(self, DynamicTitle::Interaction { .. })
    }

    /// Store new page numbers; `None` unless this is a pagination title.
    pub fn update_pagination(&mut self, page: usize, pages: usize) -> Option<String> {
        match self {
            DynamicTitle::Pagination { state, format } => {
                state.page = page;
                state.pages = pages;
                Some(format(state))
            }
            _ => None,
        }
    }

    /// Record a click; `None` unless this is an interaction title.
    pub fn update_interaction(
        &mut self,
        item: Option<PanelItem<P>>,
        slot: usize,
        click_kind: ClickKind,
        action: RawAction,
    ) -> Option<String> {
        match self {
            DynamicTitle::Interaction { state, format } => {
                state.clicked_item = item;
                state.slot = Some(slot);
                state.click_kind = Some(click_kind);
                state.action = Some(action);
                Some(format(state))
            }
            _ => None,
        }
    }
}

impl<P> fmt::Debug for DynamicTitle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicTitle::Static(title) => f.debug_tuple("Static").field(title).finish(),
            DynamicTitle::Pagination { state, .. } => {
                f.debug_struct("Pagination").field("state", state).finish()
            }
            DynamicTitle::Interaction { state, .. } => f
                .debug_struct("Interaction")
                .field("base", &state.base)
                .field("slot", &state.slot)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn page_template_substitutes_all_placeholders() {
        let state = PaginationState {
            base: "Shop".into(),
            page: 2,
            pages: 7,
        };
        assert_eq!(
            format_page_title("{base} - Page {page}/{pages}", &state),
            "Shop - Page 2/7"
        );
        assert_eq!(format_page_title("[{pages}] {base}", &state), "[7] Shop");
    }

    #[test]
    fn pagination_update_recomputes() {
        let mut title: DynamicTitle<&str> = DynamicTitle::pagination("Shop", "{base} {page}/{pages}");
        assert_eq!(title.render(), "Shop 1/1");
        assert_eq!(title.update_pagination(3, 4).as_deref(), Some("Shop 3/4"));
        assert_eq!(title.update_interaction(None, 0, ClickKind::Left, RawAction::PickupAll), None);
    }

    #[test]
    fn interaction_defaults_to_base_and_accepts_formatter() {
        let mut plain: DynamicTitle<&str> = DynamicTitle::interaction("Menu");
        assert_eq!(plain.render(), "Menu");
        assert_eq!(
            plain
                .update_interaction(None, 4, ClickKind::Right, RawAction::PickupHalf)
                .as_deref(),
            Some("Menu")
        );

        let mut custom: DynamicTitle<&str> = DynamicTitle::interaction_with("Menu", |s| {
            let picked = s.clicked_item.as_ref().map(|i| *i.payload()).unwrap_or("-");
            format!("{} [{}@{}]", s.base, picked, s.slot.unwrap_or(0))
        });
        let item = PanelItem::new("gem");
        assert_eq!(
            custom
                .update_interaction(Some(item), 13, ClickKind::Left, RawAction::PickupAll)
                .as_deref(),
            Some("Menu [gem@13]")
        );
        assert_eq!(custom.update_pagination(1, 1), None);
    }
}
