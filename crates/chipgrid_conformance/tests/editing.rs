//! Editing content graphs inside a registry, with routing on every change.

use chipgrid_common::Vec2;
use chipgrid_conformance::*;
use chipgrid_diagnostics::DiagnosticSink;
use chipgrid_edit::{ContentEditor, ContentError};
use chipgrid_ir::{Chip, ChipContent, ChipId, Pin};
use chipgrid_registry::TypeRegistry;

/// `g1` (and) above `g2` (not) inside a 5x5 type `top` under a 10x10 base.
fn two_gates() -> (TypeRegistry, ContentEditor) {
    let mut registry = registry_with_base(Vec2::new(10, 10));
    let mut ed = open_type(&mut registry, "top", Vec2::new(5, 5));
    assert!(ed.add_chip(Chip::new("g1", "and", Vec2::new(4, 2)), &registry));
    assert!(ed.add_chip(Chip::new("g2", "not", Vec2::new(10, 14)), &registry));
    (registry, ed)
}

#[test]
fn duplicate_connection_is_refused() {
    let (registry, mut ed) = two_gates();
    assert!(ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &registry));
    assert!(!ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &registry));
    assert!(!ed.connect(Pin::input("g2", "A"), Pin::output("g1", "R"), 1, &registry));
    assert_eq!(ed.content().connections.len(), 1);
}

#[test]
fn removing_a_chip_prunes_every_wire_touching_it() {
    let (registry, mut ed) = two_gates();
    ed.connect(Pin::input("top", "A"), Pin::input("g1", "A"), 0, &registry);
    ed.connect(Pin::input("top", "B"), Pin::input("g1", "B"), 0, &registry);
    ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &registry);
    ed.connect(Pin::output("g2", "R"), Pin::output("top", "R"), 0, &registry);
    assert_eq!(ed.content().connections.len(), 4);

    assert!(ed.remove_chip(&ChipId::new("g1")));
    let left = &ed.content().connections;
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].source, Pin::output("g2", "R"));
}

#[test]
fn content_survives_a_json_round_trip() {
    let (registry, mut ed) = two_gates();
    ed.connect(Pin::input("top", "A"), Pin::input("g1", "A"), 0, &registry);
    ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 1, &registry);
    ed.rotate_chip(&ChipId::new("g2"), 1, &registry);

    let json = serde_json::to_string(ed.content()).unwrap();
    let mut back: ChipContent = serde_json::from_str(&json).unwrap();
    back.size = ed.content().size;
    assert_eq!(&back, ed.content());
}

#[test]
fn committed_content_is_visible_to_the_next_editor() {
    let (mut registry, mut ed) = two_gates();
    ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &registry);
    let owner = ed.owner().clone();
    ed.commit(&mut registry).unwrap();

    let reopened = ContentEditor::open(&registry, &owner);
    assert_eq!(reopened.content().chips.len(), 2);
    assert_eq!(reopened.content().connections.len(), 1);
}

#[test]
fn stacked_pins_route_without_a_search() {
    let mut registry = registry_with_base(Vec2::new(10, 10));
    let mut ed = open_type(&mut registry, "top", Vec2::new(5, 5));
    ed.add_chip(Chip::new("n1", "not", Vec2::new(4, 2)), &registry);
    ed.add_chip(Chip::new("n2", "not", Vec2::new(4, 4)), &registry);

    assert!(ed.connect(Pin::output("n1", "R"), Pin::input("n2", "A"), 0, &registry));
    let con = &ed.content().connections[0];
    assert!(con.valid_path);
    assert_eq!(con.path, [Vec2::new(4, 4), Vec2::new(4, 3)]);
}

#[test]
fn fully_blocked_wire_is_kept_but_invalid() {
    let (mut registry, mut ed) = two_gates();
    let wall = registry.new_type("wall").unwrap().unwrap();
    assert_eq!(registry.set_size(&wall, Vec2::new(20, 1)).unwrap(), Vec2::new(20, 1));
    assert!(ed.add_chip(Chip::new("w", "wall", Vec2::new(0, 8)), &registry));

    assert!(ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &registry));
    let con = &ed.content().connections[0];
    assert!(!con.valid_path);
    assert!(con.path.is_empty());

    let errors = ed.errors(&registry);
    assert!(matches!(errors.as_slice(), [ContentError::InvalidConnection(_)]));
    let sink = DiagnosticSink::new();
    assert_eq!(ed.report(&registry, &sink), 1);
    assert_eq!(sink.diagnostics()[0].code.to_string(), "E101");
}

#[test]
fn removing_the_obstacle_and_rerouting_repairs_the_wire() {
    let (mut registry, mut ed) = two_gates();
    let wall = registry.new_type("wall").unwrap().unwrap();
    registry.set_size(&wall, Vec2::new(20, 1)).unwrap();
    ed.add_chip(Chip::new("w", "wall", Vec2::new(0, 8)), &registry);
    ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &registry);
    assert!(!ed.content().connections[0].valid_path);

    ed.remove_chip(&ChipId::new("w"));
    ed.update_connections_for_chip(None, &registry);
    assert!(ed.content().connections[0].valid_path);
    assert!(ed.errors(&registry).is_empty());
}

#[test]
fn global_reroute_twice_changes_nothing() {
    let (registry, mut ed) = two_gates();
    ed.connect(Pin::input("top", "A"), Pin::input("g1", "A"), 0, &registry);
    ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &registry);
    ed.connect(Pin::output("g2", "R"), Pin::output("top", "R"), 0, &registry);

    ed.update_connections_for_chip(None, &registry);
    let once = ed.content().connections.clone();
    ed.update_connections_for_chip(None, &registry);
    assert_eq!(ed.content().connections, once);
}

#[test]
fn child_that_outgrows_its_container_is_reported() {
    let (mut registry, mut ed) = two_gates();
    let part = registry.new_type("part").unwrap().unwrap();
    registry.set_size(&part, Vec2::new(2, 2)).unwrap();
    assert!(ed.add_chip(Chip::new("p", "part", Vec2::ZERO), &registry));

    registry.set_size(&part, Vec2::new(6, 6)).unwrap();
    let errors = ed.errors(&registry);
    assert_eq!(errors, [ContentError::ChipTooLarge(ChipId::new("p"))]);
}
