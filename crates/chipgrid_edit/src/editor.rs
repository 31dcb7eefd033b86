//! The content editing handle.

use crate::errors::{content_errors, ContentError};
use chipgrid_common::{Rect, Vec2};
use chipgrid_diagnostics::DiagnosticSink;
use chipgrid_ir::{Chip, ChipContent, ChipId, ConnectionId, ConstValue, Connection, Pin, TypeLookup, TypeName};
use chipgrid_registry::{RegistryError, TypeRegistry};
use chipgrid_route::{update_connections_for_chip, CostGrid, RouteSettings, Router};

/// Half-width of the square searched by [`ContentEditor::connection_at_pos`].
const WIRE_HIT_PAD: f64 = 0.1;

/// Padding around chip bodies for [`ContentEditor::chip_at_pos`].
const CHIP_HIT_PAD: f64 = 0.3;

/// A working copy of the content of one custom chip type.
///
/// Type definitions are passed to each call instead of being held, so the
/// registry stays free to be borrowed mutably by [`commit`](Self::commit).
#[derive(Clone, Debug)]
pub struct ContentEditor {
    owner: TypeName,
    content: ChipContent,
    settings: RouteSettings,
}

impl ContentEditor {
    /// Wraps `content`, the graph of type `owner`.
    pub fn new(owner: TypeName, content: ChipContent, settings: RouteSettings) -> Self {
        Self {
            owner,
            content,
            settings,
        }
    }

    /// Starts editing a copy of `owner`'s content.
    pub fn open(registry: &TypeRegistry, owner: &TypeName) -> Self {
        let data = registry.get_data(owner);
        let mut content = data.content;
        content.size = data.size;
        Self::new(owner.clone(), content, registry.route_settings())
    }

    /// Writes the content back into `registry`.
    pub fn commit(self, registry: &mut TypeRegistry) -> Result<(), RegistryError> {
        registry.set_content(&self.owner, self.content)
    }

    /// The type whose content this is.
    pub fn owner(&self) -> &TypeName {
        &self.owner
    }

    /// The current graph.
    pub fn content(&self) -> &ChipContent {
        &self.content
    }

    /// Gives up the graph without committing it.
    pub fn into_content(self) -> ChipContent {
        self.content
    }

    /// Routing grid extent in cells.
    pub fn grid_size(&self) -> Vec2 {
        self.content.grid_size(self.settings.scale)
    }

    /// Looks up a child chip.
    pub fn chip(&self, id: &ChipId) -> Option<&Chip> {
        self.content.chip(id)
    }

    /// Looks up a wire by its identity.
    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.content.connections.iter().find(|c| c.id() == *id)
    }

    /// Places a chip, clamped into the grid.
    ///
    /// Refused when the id is empty, taken, or names the owner's boundary, and
    /// when a custom chip's area is not smaller than the owner's.
    pub fn add_chip(&mut self, mut chip: Chip, types: &dyn TypeLookup) -> bool {
        if chip.id.is_empty() || chip.id.is_boundary_of(&self.owner) || self.content.chips.contains_key(&chip.id) {
            return false;
        }
        if !types.is_standard(&chip.type_name) && chip.size(types).area() >= self.content.size.area() {
            return false;
        }
        chip.clamp_to_grid(self.grid_size(), types);
        self.content.chips.insert(chip.id.clone(), chip);
        true
    }

    /// Removes a chip and every wire attached to it.
    pub fn remove_chip(&mut self, id: &ChipId) -> bool {
        if self.content.chips.remove(id).is_none() {
            return false;
        }
        self.disconnect_chip(id);
        true
    }

    /// Moves a chip, clamped into the grid, and re-routes its wires.
    pub fn move_chip(&mut self, id: &ChipId, pos: Vec2, types: &dyn TypeLookup) -> bool {
        let grid = self.grid_size();
        let Some(chip) = self.content.chips.get_mut(id) else {
            return false;
        };
        chip.set_pos(pos, grid, types);
        self.update_connections_for_chip(Some(id), types);
        true
    }

    /// Turns a chip by `by` quarter turns, clamped into the grid, and
    /// re-routes its wires.
    pub fn rotate_chip(&mut self, id: &ChipId, by: i32, types: &dyn TypeLookup) -> bool {
        let grid = self.grid_size();
        let Some(chip) = self.content.chips.get_mut(id) else {
            return false;
        };
        chip.rotate(by);
        chip.clamp_to_grid(grid, types);
        self.update_connections_for_chip(Some(id), types);
        true
    }

    /// Sets a constant on a chip if its type declares the slot.
    pub fn set_constant(&mut self, id: &ChipId, key: &str, value: ConstValue, types: &dyn TypeLookup) -> bool {
        match self.content.chips.get_mut(id) {
            Some(chip) => chip.set_constant(key, value, types),
            None => false,
        }
    }

    /// Returns `true` if any wire ends on `pin`.
    pub fn pin_is_connected(&self, pin: &Pin) -> bool {
        self.content.connections_for_pin(pin).next().is_some()
    }

    /// Whether `pin` exists here, and if so whether it is a boundary port.
    fn endpoint(&self, pin: &Pin, types: &dyn TypeLookup) -> Option<bool> {
        if pin.chip.is_boundary_of(&self.owner) {
            types.type_data(&self.owner).pin_index(&pin.name, pin.output)?;
            return Some(true);
        }
        let chip = self.content.chip(&pin.chip)?;
        types.type_data(&chip.type_name).pin_index(&pin.name, pin.output)?;
        Some(false)
    }

    /// Wires two pins together, routing the new wire straight away.
    ///
    /// Inside the content the owner's inputs act as drivers and its outputs as
    /// sinks, the reverse of a child chip. Refused when either pin does not
    /// exist, when a sink already has a driver, or when the pins cannot form a
    /// driver/sink pair. The driving pin becomes the wire's source whatever
    /// order the pins are given in.
    pub fn connect(&mut self, a: Pin, b: Pin, layer: i32, types: &dyn TypeLookup) -> bool {
        let (Some(a_base), Some(b_base)) = (self.endpoint(&a, types), self.endpoint(&b, types)) else {
            return false;
        };

        let driven = |pin: &Pin, base: bool| self.pin_is_connected(pin) && pin.output == base;
        if driven(&a, a_base) || driven(&b, b_base) {
            return false;
        }

        let one_base = a_base != b_base;
        if one_base == (a.output != b.output) {
            return false;
        }

        let swap = if a_base && b_base {
            a.output
        } else if one_base {
            if a.output {
                a_base
            } else {
                b_base
            }
        } else {
            !a.output
        };
        let (source, target) = if swap { (b, a) } else { (a, b) };

        let mut con = Connection::new(source, target, layer);
        Router::new(&self.owner, &self.content, types, self.settings)
            .route(&con)
            .apply_to(&mut con);
        self.content.connections.push(con);
        true
    }

    /// Removes every wire on `pin`. Returns how many were removed.
    pub fn disconnect(&mut self, pin: &Pin) -> usize {
        let before = self.content.connections.len();
        self.content.connections.retain(|c| !c.uses_pin(pin));
        before - self.content.connections.len()
    }

    /// Removes every wire on any pin of `chip`.
    pub fn disconnect_chip(&mut self, chip: &ChipId) -> usize {
        let before = self.content.connections.len();
        self.content.connections.retain(|c| !c.uses_chip(chip));
        before - self.content.connections.len()
    }

    /// Re-routes the wires of `chip`, or every wire without a hand-drawn path.
    pub fn update_connections_for_chip(&mut self, chip: Option<&ChipId>, types: &dyn TypeLookup) -> usize {
        update_connections_for_chip(&self.owner, &mut self.content, types, self.settings, chip)
    }

    /// The routing cost grid, as seen by `exclude` when given.
    pub fn grid_matrix(&self, exclude: Option<&Connection>, types: &dyn TypeLookup) -> CostGrid {
        Router::new(&self.owner, &self.content, types, self.settings).cost_grid(exclude)
    }

    /// Changes the content's size, pulls every chip back into the grid, and
    /// re-routes every wire without a hand-drawn path.
    pub fn set_size(&mut self, size: Vec2, types: &dyn TypeLookup) {
        self.content.size = size;
        let grid = self.grid_size();
        for chip in self.content.chips.values_mut() {
            chip.clamp_to_grid(grid, types);
        }
        self.update_connections_for_chip(None, types);
    }

    /// The first wire whose path passes through `pos`.
    pub fn connection_at_pos(&self, pos: Vec2) -> Option<&Connection> {
        let hit = Rect::from_point(pos).pad(WIRE_HIT_PAD);
        self.content.connections.iter().find(|c| c.path_intersects_rect(&hit))
    }

    /// The first chip whose slightly padded body covers `pos`.
    pub fn chip_at_pos(&self, pos: Vec2, types: &dyn TypeLookup) -> Option<&Chip> {
        let (x, y) = (f64::from(pos.x), f64::from(pos.y));
        self.content
            .chips
            .values()
            .find(|c| c.rect(types).pad(CHIP_HIT_PAD).contains(x, y))
    }

    /// Chips whose half-cell padded bodies overlap `chip`, excluding itself.
    pub fn overlaps<'a>(&'a self, chip: &'a Chip, types: &'a dyn TypeLookup) -> impl Iterator<Item = &'a Chip> + 'a {
        self.content
            .chips
            .values()
            .filter(move |other| other.id != chip.id && other.intersects_chip(chip, types) > 0.0)
    }

    /// Everything currently wrong with the graph.
    pub fn errors(&self, types: &dyn TypeLookup) -> Vec<ContentError> {
        content_errors(&self.content, self.content.size, types)
    }

    /// Emits [`errors`](Self::errors) as diagnostics. Returns how many.
    pub fn report(&self, types: &dyn TypeLookup, sink: &DiagnosticSink) -> usize {
        let errors = self.errors(types);
        sink.extend(errors.iter().map(|e| e.to_diagnostic(&self.owner)));
        errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{E101, E102};
    use chipgrid_common::Rotation;
    use chipgrid_config::ChipgridConfig;
    use chipgrid_ir::{standard_library, ChipTypeData};
    use std::collections::BTreeMap;

    fn custom(size: Vec2, inputs: &[&str], outputs: &[&str]) -> ChipTypeData {
        let mut data = ChipTypeData::skeleton();
        data.size = size;
        data.inputs = inputs.iter().map(|s| s.to_string()).collect();
        data.outputs = outputs.iter().map(|s| s.to_string()).collect();
        data.sanitized()
    }

    fn types() -> BTreeMap<TypeName, ChipTypeData> {
        let mut types = standard_library().unwrap();
        types.insert(TypeName::new("top"), custom(Vec2::new(5, 5), &["X", "Y"], &["Z"]));
        types.insert(TypeName::new("half"), custom(Vec2::new(2, 2), &["A"], &["R"]));
        types.insert(TypeName::new("huge"), custom(Vec2::new(5, 5), &[], &[]));
        types.insert(TypeName::new("wall"), custom(Vec2::new(20, 1), &[], &[]));
        types
    }

    fn editor() -> ContentEditor {
        ContentEditor::new(TypeName::new("top"), ChipContent::new(Vec2::new(5, 5)), RouteSettings::default())
    }

    fn id(s: &str) -> ChipId {
        ChipId::new(s)
    }

    /// Two gates, `g1` above `g2`, with room to route between them.
    fn two_gates() -> (ContentEditor, BTreeMap<TypeName, ChipTypeData>) {
        let types = types();
        let mut ed = editor();
        assert!(ed.add_chip(Chip::new("g1", "and", Vec2::new(4, 2)), &types));
        assert!(ed.add_chip(Chip::new("g2", "not", Vec2::new(10, 14)), &types));
        (ed, types)
    }

    #[test]
    fn add_chip_clamps_into_grid() {
        let types = types();
        let mut ed = editor();
        assert!(ed.add_chip(Chip::new("g", "and", Vec2::new(100, -3)), &types));
        assert_eq!(ed.chip(&id("g")).unwrap().pos, Vec2::new(19, 0));
    }

    #[test]
    fn add_chip_refuses_bad_ids() {
        let types = types();
        let mut ed = editor();
        assert!(ed.add_chip(Chip::new("g", "and", Vec2::ONE), &types));
        assert!(!ed.add_chip(Chip::new("G", "or", Vec2::ONE), &types));
        assert!(!ed.add_chip(Chip::new("top", "or", Vec2::ONE), &types));
        assert!(!ed.add_chip(Chip::new("", "or", Vec2::ONE), &types));
    }

    #[test]
    fn add_chip_refuses_custom_chips_that_do_not_fit() {
        let types = types();
        let mut ed = editor();
        assert!(!ed.add_chip(Chip::new("h", "huge", Vec2::ZERO), &types));
        assert!(ed.add_chip(Chip::new("s", "half", Vec2::ZERO), &types));
        assert!(ed.add_chip(Chip::new("w", "wall", Vec2::ZERO), &types));
    }

    #[test]
    fn connect_normalizes_direction() {
        let (mut ed, types) = two_gates();
        assert!(ed.connect(Pin::input("g2", "A"), Pin::output("g1", "R"), 0, &types));
        let con = &ed.content().connections[0];
        assert_eq!(con.source, Pin::output("g1", "R"));
        assert_eq!(con.target, Pin::input("g2", "A"));
        assert!(con.valid_path);
        assert!(!con.path.is_empty());
    }

    #[test]
    fn second_driver_is_refused() {
        let (mut ed, types) = two_gates();
        assert!(ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &types));
        assert!(!ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &types));
        assert!(!ed.connect(Pin::input("top", "X"), Pin::input("g2", "A"), 0, &types));
        assert_eq!(ed.content().connections.len(), 1);
    }

    #[test]
    fn outputs_may_fan_out() {
        let (mut ed, types) = two_gates();
        assert!(ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &types));
        assert!(ed.connect(Pin::output("g1", "R"), Pin::output("top", "Z"), 0, &types));
        assert!(ed.connect(Pin::input("top", "X"), Pin::input("g1", "A"), 0, &types));
        assert!(ed.connect(Pin::input("top", "X"), Pin::input("g1", "B"), 0, &types));
        assert_eq!(ed.content().connections.len(), 4);
    }

    #[test]
    fn child_pins_need_opposite_orientation() {
        let (mut ed, types) = two_gates();
        assert!(!ed.connect(Pin::input("g1", "A"), Pin::input("g2", "A"), 0, &types));
        assert!(!ed.connect(Pin::output("g1", "R"), Pin::output("g2", "R"), 0, &types));
    }

    #[test]
    fn boundary_pins_need_matching_orientation() {
        let (mut ed, types) = two_gates();
        assert!(!ed.connect(Pin::input("top", "X"), Pin::output("g1", "R"), 0, &types));
        assert!(!ed.connect(Pin::output("top", "Z"), Pin::input("g1", "A"), 0, &types));

        assert!(ed.connect(Pin::output("top", "Z"), Pin::output("g2", "R"), 0, &types));
        let con = &ed.content().connections[0];
        assert_eq!(con.source, Pin::output("g2", "R"));
        assert_eq!(con.target, Pin::output("top", "Z"));
    }

    #[test]
    fn boundary_to_boundary_runs_input_to_output() {
        let (mut ed, types) = two_gates();
        assert!(ed.connect(Pin::output("top", "Z"), Pin::input("top", "Y"), 0, &types));
        let con = &ed.content().connections[0];
        assert_eq!(con.source, Pin::input("top", "Y"));
        assert_eq!(con.target, Pin::output("top", "Z"));
        assert!(!ed.connect(Pin::input("top", "X"), Pin::output("top", "Z"), 0, &types));
    }

    #[test]
    fn unknown_pins_are_refused() {
        let (mut ed, types) = two_gates();
        assert!(!ed.connect(Pin::output("ghost", "R"), Pin::input("g2", "A"), 0, &types));
        assert!(!ed.connect(Pin::output("g1", "Q"), Pin::input("g2", "A"), 0, &types));
        assert!(!ed.connect(Pin::input("top", "W"), Pin::input("g2", "A"), 0, &types));
    }

    #[test]
    fn removing_a_chip_prunes_its_wires() {
        let (mut ed, types) = two_gates();
        ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &types);
        ed.connect(Pin::input("top", "X"), Pin::input("g1", "A"), 0, &types);
        ed.connect(Pin::output("g2", "R"), Pin::output("top", "Z"), 0, &types);

        assert!(ed.remove_chip(&id("g1")));
        assert!(!ed.remove_chip(&id("g1")));
        assert!(ed.content().connections.iter().all(|c| !c.uses_chip(&id("g1"))));
        assert_eq!(ed.content().connections.len(), 1);
    }

    #[test]
    fn disconnect_removes_every_wire_on_the_pin() {
        let (mut ed, types) = two_gates();
        ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &types);
        ed.connect(Pin::output("g1", "R"), Pin::output("top", "Z"), 0, &types);
        assert_eq!(ed.disconnect(&Pin::output("g1", "R")), 2);
        assert!(!ed.pin_is_connected(&Pin::input("g2", "A")));
    }

    #[test]
    fn moving_a_chip_reroutes_its_wires() {
        let (mut ed, types) = two_gates();
        ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &types);
        assert!(ed.move_chip(&id("g2"), Vec2::new(15, 12), &types));
        let con = &ed.content().connections[0];
        assert!(con.valid_path);
        assert_eq!(con.path.last().copied(), Some(Vec2::new(15, 11)));
        assert!(!ed.move_chip(&id("ghost"), Vec2::ZERO, &types));
    }

    #[test]
    fn rotating_keeps_the_chip_inside() {
        let types = types();
        let mut ed = editor();
        ed.add_chip(Chip::new("a", "add", Vec2::new(18, 0)), &types);
        assert!(ed.rotate_chip(&id("a"), 1, &types));
        let chip = ed.chip(&id("a")).unwrap();
        assert_eq!(chip.rotation, Rotation::R1);
        assert_eq!(chip.pos, Vec2::new(18, 0));
        assert!(ed.rotate_chip(&id("a"), -1, &types));
        assert_eq!(ed.chip(&id("a")).unwrap().rotation, Rotation::R0);
    }

    #[test]
    fn blocked_route_is_recorded_not_fatal() {
        let (mut ed, types) = two_gates();
        assert!(ed.add_chip(Chip::new("w", "wall", Vec2::new(0, 8)), &types));
        assert!(ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &types));

        let con = &ed.content().connections[0];
        assert!(!con.valid_path);
        let errors = ed.errors(&types);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ContentError::InvalidConnection(_)));

        let sink = DiagnosticSink::new();
        assert_eq!(ed.report(&types, &sink), 1);
        assert_eq!(sink.diagnostics()[0].code, E101);
    }

    #[test]
    fn shrunk_child_type_is_reported() {
        let mut types = types();
        let mut ed = editor();
        assert!(ed.add_chip(Chip::new("s", "half", Vec2::ZERO), &types));
        types.insert(TypeName::new("half"), custom(Vec2::new(6, 6), &["A"], &["R"]));
        let errors = ed.errors(&types);
        assert_eq!(errors, [ContentError::ChipTooLarge(id("s"))]);
        assert_eq!(errors[0].to_diagnostic(ed.owner()).code, E102);
    }

    #[test]
    fn global_update_is_idempotent() {
        let (mut ed, types) = two_gates();
        ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &types);
        ed.connect(Pin::input("top", "X"), Pin::input("g1", "A"), 0, &types);
        ed.connect(Pin::output("g2", "R"), Pin::output("top", "Z"), 0, &types);

        ed.update_connections_for_chip(None, &types);
        let first = ed.content().connections.clone();
        ed.update_connections_for_chip(None, &types);
        assert_eq!(ed.content().connections, first);
    }

    #[test]
    fn grid_matrix_covers_the_content() {
        let (ed, types) = two_gates();
        let grid = ed.grid_matrix(None, &types);
        assert_eq!((grid.width(), grid.height()), (21, 21));
        assert_eq!(grid.get(Vec2::new(4, 2)), Some(10));
        assert_eq!(grid.get(Vec2::new(4, 1)), Some(9));
    }

    #[test]
    fn hit_testing() {
        let (mut ed, types) = two_gates();
        ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &types);
        let on_path = ed.content().connections[0].path[1];

        assert_eq!(ed.chip_at_pos(Vec2::new(5, 3), &types).map(|c| c.id.as_str()), Some("g1"));
        assert!(ed.chip_at_pos(Vec2::new(0, 19), &types).is_none());
        assert!(ed.connection_at_pos(on_path).is_some());
        assert!(ed.connection_at_pos(Vec2::new(20, 0)).is_none());
    }

    #[test]
    fn overlapping_chips_are_found() {
        let (mut ed, types) = two_gates();
        ed.add_chip(Chip::new("g3", "or", Vec2::new(5, 3)), &types);
        let g3 = ed.chip(&id("g3")).unwrap().clone();
        let hits: Vec<_> = ed.overlaps(&g3, &types).map(|c| c.id.as_str()).collect();
        assert_eq!(hits, ["g1"]);
    }

    #[test]
    fn set_size_reclamps_and_reroutes() {
        let (mut ed, types) = two_gates();
        ed.connect(Pin::output("g1", "R"), Pin::input("g2", "A"), 0, &types);
        ed.set_size(Vec2::new(3, 3), &types);
        assert_eq!(ed.grid_size(), Vec2::new(12, 12));
        assert_eq!(ed.chip(&id("g2")).unwrap().pos, Vec2::new(10, 11));
        let con = &ed.content().connections[0];
        assert!(con.path.iter().all(|p| p.x <= 12 && p.y <= 12));
    }

    #[test]
    fn constants_only_for_declared_slots() {
        let types = types();
        let mut ed = editor();
        ed.add_chip(Chip::new("k", "const", Vec2::ONE), &types);
        assert!(ed.set_constant(&id("k"), "value", ConstValue::from(3), &types));
        assert!(!ed.set_constant(&id("k"), "other", ConstValue::from(3), &types));
        assert!(!ed.set_constant(&id("nope"), "value", ConstValue::from(3), &types));
    }

    #[test]
    fn commit_writes_back_to_the_registry() {
        let mut registry = TypeRegistry::in_memory(&ChipgridConfig::default()).unwrap();
        let base = registry.base_type().clone();
        registry.set_size(&base, Vec2::new(10, 10)).unwrap();
        let top = TypeName::new("top");
        registry.new_type(top.clone()).unwrap();
        registry.set_size(&top, Vec2::new(3, 3)).unwrap();

        let mut ed = ContentEditor::open(&registry, &top);
        assert_eq!(ed.grid_size(), Vec2::new(12, 12));
        assert!(ed.add_chip(Chip::new("g", "and", Vec2::new(4, 4)), &registry));
        assert!(ed.connect(Pin::input("top", "A"), Pin::input("g", "A"), 0, &registry));
        ed.commit(&mut registry).unwrap();

        let data = registry.get_data(&top);
        assert_eq!(data.content.chips.len(), 1);
        assert_eq!(data.content.connections.len(), 1);
        assert_eq!(data.content.size, Vec2::new(3, 3));
    }
}
