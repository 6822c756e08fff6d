mod common;

use chrono::{Duration, NaiveDate};
use rand::{rngs::StdRng, Rng, SeedableRng};

use rondo_core::components::{Calendar, Menu, MenuItem, Panel};
use rondo_core::components::calendar::EPOCH;
use rondo_core::proto::StateBlob;
use rondo_core::{Component, Tree};

/// Root panel holding a calendar (child 0) and a menu (child 1), with
/// fixed defaults set before tracking begins.
fn build_tree() -> Tree {
    let mut calendar = Calendar::new();
    calendar.set_visible_date(EPOCH);

    let mut menu = Menu::new();
    let mut file = MenuItem::new("File", "file");
    file.add_child(MenuItem::new("Open", "open"));
    file.add_child(MenuItem::new("Save", "save"));
    menu.add_item(file);
    menu.add_item(MenuItem::new("Help", "help"));

    let mut root = Panel::new();
    root.add_child(Box::new(calendar));
    root.add_child(Box::new(menu));
    let mut tree = Tree::new(Box::new(root));
    tree.track();
    tree
}

fn calendar_of(tree: &Tree) -> &Calendar {
    tree.get(&vec![0].into()).and_then(|n| n.as_any().downcast_ref::<Calendar>()).unwrap()
}

fn calendar_of_mut(tree: &mut Tree) -> &mut Calendar {
    tree.get_mut(&vec![0].into()).and_then(|n| n.as_any_mut().downcast_mut::<Calendar>()).unwrap()
}

fn menu_of(tree: &Tree) -> &Menu {
    tree.get(&vec![1].into()).and_then(|n| n.as_any().downcast_ref::<Menu>()).unwrap()
}

#[test]
fn untouched_tree_captures_nothing() {
    let tree = build_tree();
    assert!(tree.capture().unwrap().is_none());
}

#[test]
fn single_mutation_round_trips() {
    let mut tree = build_tree();
    let date = NaiveDate::from_ymd_opt(2003, 7, 14).unwrap();
    calendar_of_mut(&mut tree).set_visible_date(date);

    let blob = tree.serialize().unwrap();
    let mut fresh = build_tree();
    fresh.restore_blob(&blob).unwrap();
    assert_eq!(calendar_of(&fresh).visible_date(), date);
}

#[test]
fn capture_is_sparse() {
    // Dirtying one node must not drag sibling state into the entry.
    let mut tree = build_tree();
    calendar_of_mut(&mut tree).select_date(EPOCH + Duration::days(42));

    let entry = tree.capture().unwrap().expect("calendar selection is dirty");
    assert!(entry.own.is_none());
    assert_eq!(entry.children.len(), 2);
    assert!(entry.children[0].is_some(), "calendar captured");
    assert!(entry.children[1].is_none(), "menu stayed clean");
}

#[test]
fn restored_state_is_dirty_again() {
    let mut tree = build_tree();
    calendar_of_mut(&mut tree).set_visible_date(EPOCH + Duration::days(100));
    let blob = tree.serialize().unwrap();

    let mut second = build_tree();
    second.restore_blob(&blob).unwrap();
    // No new mutations this trip; the restored key must still survive.
    let blob = second.serialize().unwrap();

    let mut third = build_tree();
    third.restore_blob(&blob).unwrap();
    assert_eq!(calendar_of(&third).visible_date(), EPOCH + Duration::days(100));
}

#[test]
fn randomized_mutations_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x52_4f_4e_44);
    for _ in 0..50 {
        let mut tree = build_tree();
        let date = EPOCH + Duration::days(rng.gen_range(0..20_000));
        let span = rng.gen_range(1..=30u32);
        {
            let calendar = calendar_of_mut(&mut tree);
            match rng.gen_range(0..4) {
                0 => calendar.set_visible_date(date),
                1 => calendar.select_date(date),
                2 => {
                    calendar.day_style().set_fore_color("#336699");
                    calendar.weekend_day_style().set_font_bold(true);
                }
                _ => {
                    calendar.handle_argument(&Calendar::select_range_argument(date, span)).unwrap();
                }
            }
        }

        let blob = tree.serialize().unwrap();
        let mut fresh = build_tree();
        fresh.restore_blob(&blob).unwrap();

        let before = calendar_of(&tree);
        let after = calendar_of(&fresh);
        assert_eq!(before.visible_date(), after.visible_date());
        assert_eq!(before.selected_dates(), after.selected_dates());
        assert_eq!(before.day_style_created(), after.day_style_created());
    }
}

#[test]
fn blob_survives_base64_transport() {
    let mut tree = build_tree();
    calendar_of_mut(&mut tree).select_date(EPOCH + Duration::days(7));
    let blob = tree.serialize().unwrap();

    let carried = StateBlob::from_base64(blob.to_base64()).unwrap();
    assert_eq!(carried, blob);

    let mut fresh = build_tree();
    fresh.restore_blob(&carried).unwrap();
    assert_eq!(calendar_of(&fresh).selected_dates(), calendar_of(&tree).selected_dates());
}

#[test]
fn menu_item_state_nests_in_child_slots() {
    let mut tree = build_tree();
    {
        let menu = tree.get_mut(&vec![1].into()).and_then(|n| n.as_any_mut().downcast_mut::<Menu>()).unwrap();
        menu.handle_argument("0_1").unwrap();
    }
    let entry = tree.capture().unwrap().expect("menu selection is dirty");
    let menu_entry = entry.children[1].as_ref().expect("menu captured");
    assert!(menu_entry.own.is_some(), "selected path rides the menu's own entry");
    // File item (child 0) captured nothing itself; its Save child did.
    let file_entry = menu_entry.children[0].as_ref().expect("nested item captured");
    assert!(file_entry.children[1].is_some(), "Save item's Selected flag");

    let blob = tree.serialize().unwrap();
    let mut fresh = build_tree();
    fresh.restore_blob(&blob).unwrap();
    let menu = menu_of(&fresh);
    assert_eq!(menu.selected_path(), Some("0_1"));
    assert!(menu.item_at(&vec![0, 1].into()).unwrap().is_selected());
    assert!(!menu.item_at(&vec![0, 0].into()).unwrap().is_selected());
}
