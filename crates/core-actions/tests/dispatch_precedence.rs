mod common;
use common::*;

use core_actions::dispatch;
use core_events::{
    ClickEvent, ClickKind, DragEvent, HandlerContext, InteractionEvent, PanelCommand, RawAction,
    Region, TickQueue, handler,
};
use core_model::{ItemId, TaggedPayload};
use core_state::{PanelBuilder, PanelItem};
use pretty_assertions::assert_eq;

fn click(event: ClickEvent<String>) -> InteractionEvent<String> {
    InteractionEvent::Click(event)
}

#[test]
fn secondary_click_skips_slot_handler() {
    let mut panel = plain(1);
    let log = log();
    panel.set_secondary_click_handler(Some(recording(&log, "secondary")));
    panel.set_top_click_handler(Some(recording(&log, "top")));
    panel.set_default_click_handler(Some(recording(&log, "any")));
    panel.add_slot_handler(3, recording(&log, "slot")).unwrap();
    panel.open(&VIEWER);

    let event = ClickEvent::new(VIEWER, Some(Region::Secondary), 3, RawAction::PickupAll, ClickKind::Left);
    let result = dispatch(&mut panel, click(event), &mut TickQueue::new());

    assert_eq!(entries(&log), vec!["secondary", "any"]);
    assert_eq!(result.handlers_run, 2);
}

#[test]
fn panel_click_runs_full_chain_in_order() {
    let mut panel = plain(1);
    let log = log();
    panel.set_top_click_handler(Some(recording(&log, "top")));
    panel.set_secondary_click_handler(Some(recording(&log, "secondary")));
    panel.set_default_click_handler(Some(recording(&log, "any")));
    panel.add_slot_handler(4, recording(&log, "slot")).unwrap();
    let item_log = log.clone();
    let item = PanelItem::with_handler("gem".to_string(), move |_ctx| item_log.borrow_mut().push("item"));
    panel.set_item(4, item).unwrap();
    panel.open(&VIEWER);

    let event = click_shown(&panel, 4);
    let result = dispatch(&mut panel, click(event), &mut TickQueue::new());

    assert_eq!(entries(&log), vec!["top", "any", "slot", "item"]);
    assert_eq!(result.handlers_run, 4);
    assert!(!result.denied);
}

#[test]
fn outside_click_stops_after_outside_handler() {
    let mut panel = plain(1);
    let log = log();
    panel.set_default_click_handler(Some(recording(&log, "any")));
    let result = dispatch(&mut panel, click(ClickEvent::outside(VIEWER)), &mut TickQueue::new());
    assert!(entries(&log).is_empty());
    assert_eq!(result.handlers_run, 0);

    panel.set_outside_click_handler(Some(recording(&log, "outside")));
    dispatch(&mut panel, click(ClickEvent::outside(VIEWER)), &mut TickQueue::new());
    assert_eq!(entries(&log), vec!["outside"]);
}

#[test]
fn forged_payload_never_reaches_item_handler() {
    let mut panel = plain(1);
    let log = log();
    let item_log = log.clone();
    let item = PanelItem::with_handler("sword".to_string(), move |_ctx| item_log.borrow_mut().push("item"));
    panel.set_item(4, item).unwrap();
    panel.open(&VIEWER);

    let forged = TaggedPayload::tagged("sword".to_string(), ItemId::next());
    let event = ClickEvent::panel(VIEWER, 4).with_current(Some(forged));
    dispatch(&mut panel, click(event), &mut TickQueue::new());

    let untagged = ClickEvent::panel(VIEWER, 4).with_current(Some(TaggedPayload::untagged("sword".to_string())));
    dispatch(&mut panel, click(untagged), &mut TickQueue::new());

    let empty = ClickEvent::panel(VIEWER, 4);
    dispatch(&mut panel, click(empty), &mut TickQueue::new());
    assert!(entries(&log).is_empty());

    let genuine = click_shown(&panel, 4);
    dispatch(&mut panel, click(genuine), &mut TickQueue::new());
    assert_eq!(entries(&log), vec!["item"]);
}

#[test]
fn page_items_resolve_before_fixed_items() {
    let mut panel = PanelBuilder::<String>::new().title("Shop").rows(1).paginated(3).build().unwrap();
    let log = log();
    let page_log = log.clone();
    panel
        .add_page_items([PanelItem::with_handler("apple".to_string(), move |_ctx| {
            page_log.borrow_mut().push("page")
        })])
        .unwrap();
    panel.open(&VIEWER);

    let event = click_shown(&panel, 0);
    dispatch(&mut panel, click(event), &mut TickQueue::new());
    assert_eq!(entries(&log), vec!["page"]);
}

#[test]
fn fixed_item_over_a_page_slot_handles_its_clicks() {
    let mut panel = PanelBuilder::<String>::new().title("Shop").rows(1).paginated(3).build().unwrap();
    let log = log();
    let page_items = (0..3).map(|i| {
        let page_log = log.clone();
        PanelItem::with_handler(format!("p{i}"), move |_ctx| page_log.borrow_mut().push("page"))
    });
    panel.add_page_items(page_items).unwrap();
    panel.open(&VIEWER);

    let fixed_log = log.clone();
    let back = PanelItem::with_handler("back".to_string(), move |_ctx| fixed_log.borrow_mut().push("fixed"));
    panel.replace_item(0, back).unwrap();

    let on_fixed = click_shown(&panel, 0);
    dispatch(&mut panel, click(on_fixed), &mut TickQueue::new());
    let on_page = click_shown(&panel, 1);
    dispatch(&mut panel, click(on_page), &mut TickQueue::new());
    assert_eq!(entries(&log), vec!["fixed", "page"]);
}

#[test]
fn handler_deny_survives_and_classifier_adds_its_own() {
    let mut panel = plain(1);
    panel.set_default_click_handler(Some(handler(|ctx: &mut HandlerContext<ClickEvent<String>>| ctx.deny())));
    let result = dispatch(&mut panel, click(ClickEvent::panel(VIEWER, 0)), &mut TickQueue::new());
    assert!(result.denied);

    let mut locked = plain(1);
    locked.disable_item_take();
    let take = ClickEvent::panel(VIEWER, 2).with_action(RawAction::PickupHalf, ClickKind::Right);
    assert!(dispatch(&mut locked, click(take), &mut TickQueue::new()).denied);
    let place = ClickEvent::panel(VIEWER, 2).with_action(RawAction::PlaceAll, ClickKind::Left);
    assert!(!dispatch(&mut locked, click(place), &mut TickQueue::new()).denied);
}

#[test]
fn item_handler_commands_apply_after_the_chain() {
    let mut panel = PanelBuilder::<String>::new().title("Book").rows(1).paginated(0).build().unwrap();
    let next = PanelItem::with_handler("next".to_string(), |ctx| ctx.request(PanelCommand::NextPage));
    panel.set_item(8, next).unwrap();
    panel
        .add_page_items((0..20).map(|i| PanelItem::new(format!("page{i}"))))
        .unwrap();
    panel.open(&VIEWER);
    assert_eq!(panel.page_size(), 8);

    let event = click_shown(&panel, 8);
    let result = dispatch(&mut panel, click(event), &mut TickQueue::new());
    assert_eq!(result.commands_applied, 1);
    assert_eq!(panel.page_number(), 2);
    assert_eq!(panel.surface().slot(0).map(|p| p.payload().as_str()), Some("page8"));
}

#[test]
fn interaction_title_follows_item_clicks() {
    let mut panel = PanelBuilder::<String>::new()
        .rows(1)
        .interaction_title_with("Pick", |state| match (&state.clicked_item, state.slot) {
            (Some(item), Some(slot)) => format!("{}: {} @ {}", state.base, item.payload(), slot),
            _ => state.base.clone(),
        })
        .build()
        .unwrap();
    panel.set_item(2, PanelItem::new("ruby".to_string())).unwrap();
    panel.open(&VIEWER);
    assert_eq!(panel.title(), "Pick");

    let event = click_shown(&panel, 2);
    dispatch(&mut panel, click(event), &mut TickQueue::new());
    assert_eq!(panel.title(), "Pick: ruby @ 2");
    assert_eq!(panel.surface().title(), "Pick: ruby @ 2");

    // empty slot: no item resolved, title unchanged
    dispatch(&mut panel, click(ClickEvent::panel(VIEWER, 5)), &mut TickQueue::new());
    assert_eq!(panel.title(), "Pick: ruby @ 2");
}

#[test]
fn drag_runs_handler_and_checks_place_permission() {
    let mut panel = plain(3);
    let log = log();
    let drag_log = log.clone();
    panel.set_drag_handler(Some(handler(move |_ctx: &mut HandlerContext<DragEvent>| {
        drag_log.borrow_mut().push("drag")
    })));
    panel.disable_item_place();

    let into_panel = InteractionEvent::Drag(DragEvent::new(VIEWER, [2, 30], 27));
    let result = dispatch(&mut panel, into_panel, &mut TickQueue::new());
    assert!(result.denied);
    assert_eq!(result.handlers_run, 1);

    let own_area = InteractionEvent::Drag(DragEvent::new(VIEWER, [28, 30], 27));
    assert!(!dispatch(&mut panel, own_area, &mut TickQueue::new()).denied);
    assert_eq!(entries(&log), vec!["drag", "drag"]);
}
