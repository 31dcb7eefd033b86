//! The chip type registry.

use crate::error::{RegistryError, StoreError};
use crate::store::{MemoryStore, TypeStore};
use chipgrid_common::Vec2;
use chipgrid_config::ChipgridConfig;
use chipgrid_ir::{standard_library, Chip, ChipContent, ChipSource, ChipTypeData, TypeLookup, TypeName};
use chipgrid_route::{update_connections_for_chip, RouteSettings};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Standard and custom chip types, keyed by lower-cased name.
///
/// Reads never fail: unknown names resolve to [`ChipTypeData::skeleton`].
/// Setters ignore standard types and write custom types back to the store
/// after every change.
pub struct TypeRegistry {
    standard: BTreeMap<TypeName, ChipTypeData>,
    custom: BTreeMap<TypeName, ChipTypeData>,
    base: TypeName,
    base_max_size: Vec2,
    route: RouteSettings,
    store: Box<dyn TypeStore>,
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("standard", &self.standard.len())
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl TypeRegistry {
    /// Loads the standard library and every type in `store`.
    ///
    /// Stored records that shadow a standard name are ignored.
    pub fn open(config: &ChipgridConfig, mut store: Box<dyn TypeStore>) -> Result<Self, RegistryError> {
        let standard = standard_library()?;
        let custom = store
            .load_all()?
            .into_iter()
            .filter(|(name, _)| !standard.contains_key(name))
            .map(|(name, data)| (name, data.sanitized()))
            .collect();

        Ok(Self {
            standard,
            custom,
            base: TypeName::new(&config.editor.base_chip),
            base_max_size: config.editor.base_max_size,
            route: RouteSettings::from_config(config),
            store,
        })
    }

    /// A registry that keeps custom types in memory only.
    pub fn in_memory(config: &ChipgridConfig) -> Result<Self, RegistryError> {
        Self::open(config, Box::new(MemoryStore::new()))
    }

    /// The type currently being edited.
    pub fn base_type(&self) -> &TypeName {
        &self.base
    }

    /// Changes which type is being edited. Does not register it.
    pub fn set_base_type(&mut self, name: impl Into<TypeName>) {
        self.base = name.into();
    }

    /// Grid scale and routing costs.
    pub fn route_settings(&self) -> RouteSettings {
        self.route
    }

    /// A copy of the definition of `name`, or the skeleton if unknown.
    ///
    /// Changes to the copy have no effect until handed back through a setter
    /// or [`set_content`](Self::set_content).
    pub fn get_data(&self, name: &TypeName) -> ChipTypeData {
        self.type_data(name).into_owned()
    }

    /// Returns `true` if `name` is a standard or custom type.
    pub fn contains(&self, name: &TypeName) -> bool {
        self.standard.contains_key(name) || self.custom.contains_key(name)
    }

    /// Returns `true` if `name` is a registered custom type.
    pub fn is_custom(&self, name: &TypeName) -> bool {
        self.custom.contains_key(name)
    }

    /// Standard types followed by custom ones.
    pub fn type_list(&self) -> Vec<TypeName> {
        let mut list = self.standard_type_list();
        list.extend(self.custom_type_list());
        list
    }

    /// Names of the bundled types.
    pub fn standard_type_list(&self) -> Vec<TypeName> {
        self.standard.keys().cloned().collect()
    }

    /// Names of custom types other than the base type.
    pub fn custom_type_list(&self) -> Vec<TypeName> {
        self.custom.keys().filter(|n| **n != self.base).cloned().collect()
    }

    /// All custom types.
    pub fn custom_types(&self) -> &BTreeMap<TypeName, ChipTypeData> {
        &self.custom
    }

    /// Registers `name` as a custom type, keeping any existing definition.
    ///
    /// Returns `None` when the name belongs to a standard type.
    pub fn new_type(&mut self, name: impl Into<TypeName>) -> Result<Option<TypeName>, RegistryError> {
        let name = name.into();
        if self.is_standard(&name) {
            return Ok(None);
        }
        let data = self.get_data(&name);
        self.put(&name, data)?;
        Ok(Some(name))
    }

    /// Resizes a custom type and returns the size it ended up with.
    ///
    /// The size is kept within `1..=base_max_size`. Types other than the base
    /// type must also stay strictly smaller in area than the base type, so
    /// oversized requests lose rows or columns from their shorter side first.
    /// Child chips are pulled back inside the new grid and every wire without
    /// a hand-drawn path is routed again.
    pub fn set_size(&mut self, name: &TypeName, size: Vec2) -> Result<Vec2, RegistryError> {
        if self.is_standard(name) {
            return Ok(self.type_data(name).size);
        }

        let mut data = self.get_data(name);
        let size = size.clamp_vec(Vec2::ONE, self.base_max_size);
        data.size = if *name == self.base {
            size
        } else {
            fit_below(size, self.type_data(&self.base).size.area())
        };
        data.sanitize();

        let mut content = std::mem::take(&mut data.content);
        {
            let types = Pending {
                registry: self,
                name,
                data: &data,
            };
            let grid = data.size * self.route.scale;
            for chip in content.chips.values_mut() {
                chip.clamp_to_grid(grid, &types);
            }
            update_connections_for_chip(name, &mut content, &types, self.route, None);
        }
        data.content = content;

        let size = data.size;
        self.put(name, data)?;
        Ok(size)
    }

    /// Renames the input at `index`.
    ///
    /// The name is upper-cased. It is applied only if `index` is in range and
    /// no other input already has that name; an empty name always applies.
    /// Returns whether the port changed.
    pub fn set_input(&mut self, name: &TypeName, index: usize, port: &str) -> Result<bool, RegistryError> {
        self.set_port(name, index, port, false)
    }

    /// Renames the output at `index`, with the rules of [`set_input`](Self::set_input).
    pub fn set_output(&mut self, name: &TypeName, index: usize, port: &str) -> Result<bool, RegistryError> {
        self.set_port(name, index, port, true)
    }

    fn set_port(&mut self, name: &TypeName, index: usize, port: &str, output: bool) -> Result<bool, RegistryError> {
        if self.is_standard(name) {
            return Ok(false);
        }
        let mut data = self.get_data(name);
        let port = port.trim().to_uppercase();
        let ports = if output { &mut data.outputs } else { &mut data.inputs };
        let applied = index < ports.len() && (port.is_empty() || !ports.contains(&port));
        if applied {
            ports[index] = port;
        }
        self.put(name, data)?;
        Ok(applied)
    }

    /// Adds a constant slot.
    pub fn add_const(&mut self, name: &TypeName, constant: &str) -> Result<(), RegistryError> {
        if self.is_standard(name) {
            return Ok(());
        }
        let mut data = self.get_data(name);
        data.constants.push(constant.to_string());
        self.put(name, data)
    }

    /// Removes a constant slot, matching case-insensitively.
    pub fn remove_const(&mut self, name: &TypeName, constant: &str) -> Result<(), RegistryError> {
        if self.is_standard(name) {
            return Ok(());
        }
        let constant = constant.trim().to_uppercase();
        let mut data = self.get_data(name);
        data.constants.retain(|c| *c != constant);
        self.put(name, data)
    }

    /// Replaces the content graph of a custom type.
    pub fn set_content(&mut self, name: &TypeName, content: ChipContent) -> Result<(), RegistryError> {
        if self.is_standard(name) {
            return Ok(());
        }
        let mut data = self.get_data(name);
        data.content = content;
        self.put(name, data)
    }

    /// Forgets a custom type and deletes its record.
    pub fn remove_type(&mut self, name: &TypeName) -> Result<bool, RegistryError> {
        if self.custom.remove(name).is_none() {
            return Ok(false);
        }
        self.store.remove(name)?;
        Ok(true)
    }

    /// Forgets every custom type and deletes their records.
    pub fn reset(&mut self) -> Result<(), RegistryError> {
        let names: Vec<TypeName> = self.custom.keys().cloned().collect();
        for name in &names {
            self.remove_type(name)?;
        }
        Ok(())
    }

    /// Reloads the types another session changed since the last sync.
    ///
    /// Types whose record disappeared are dropped. Returns the affected names.
    pub fn sync_external(&mut self) -> Result<Vec<TypeName>, RegistryError> {
        let changed = self.store.poll_changes()?;
        for name in &changed {
            if self.standard.contains_key(name) {
                continue;
            }
            match self.store.load(name)? {
                Some(data) => {
                    self.custom.insert(name.clone(), data.sanitized());
                }
                None => {
                    self.custom.remove(name);
                }
            }
        }
        Ok(changed)
    }

    /// All custom types as one JSON object keyed by type name.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        serde_json::to_string_pretty(&self.custom).map_err(|e| {
            RegistryError::Store(StoreError::Serialization {
                reason: e.to_string(),
            })
        })
    }

    /// A compiler input with `root` as the top chip and every custom type.
    pub fn to_source(&self, root: &TypeName) -> ChipSource {
        ChipSource {
            chip: Chip::new(root.boundary_id(), root.clone(), Vec2::ONE),
            chip_data: self.custom.clone(),
        }
    }

    fn put(&mut self, name: &TypeName, data: ChipTypeData) -> Result<(), RegistryError> {
        let data = data.sanitized();
        self.store.save(name, &data)?;
        self.custom.insert(name.clone(), data);
        Ok(())
    }
}

impl TypeLookup for TypeRegistry {
    fn type_data(&self, name: &TypeName) -> Cow<'_, ChipTypeData> {
        match self.standard.get(name).or_else(|| self.custom.get(name)) {
            Some(data) => Cow::Borrowed(data),
            None => Cow::Owned(ChipTypeData::skeleton()),
        }
    }

    fn is_standard(&self, name: &TypeName) -> bool {
        self.standard.contains_key(name)
    }
}

/// The registry as it will look once `name` is replaced by `data`.
struct Pending<'a> {
    registry: &'a TypeRegistry,
    name: &'a TypeName,
    data: &'a ChipTypeData,
}

impl TypeLookup for Pending<'_> {
    fn type_data(&self, name: &TypeName) -> Cow<'_, ChipTypeData> {
        if name == self.name {
            Cow::Borrowed(self.data)
        } else {
            self.registry.type_data(name)
        }
    }

    fn is_standard(&self, name: &TypeName) -> bool {
        self.registry.is_standard(name)
    }
}

/// Shrinks `size` until its area is below `limit`, shorter side first.
///
/// Stops at `{1, 1}` even if the limit is still not met.
fn fit_below(mut size: Vec2, limit: i64) -> Vec2 {
    let x_first = size.x < size.y;
    while size.area() >= limit {
        let shrink_x = if x_first { size.x > 1 } else { size.y == 1 };
        if shrink_x && size.x > 1 {
            size.x -= 1;
        } else if !shrink_x && size.y > 1 {
            size.y -= 1;
        } else {
            break;
        }
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DirStore;
    use chipgrid_ir::{ChipId, Connection, Pin};

    fn registry() -> TypeRegistry {
        TypeRegistry::in_memory(&ChipgridConfig::default()).unwrap()
    }

    fn name(s: &str) -> TypeName {
        TypeName::new(s)
    }

    #[test]
    fn standard_library_is_loaded() {
        let reg = registry();
        let list = reg.standard_type_list();
        assert_eq!(list.len(), 11);
        assert!(reg.is_standard(&name("AND")));
        assert!(reg.is_standard(&name("mux")));
        assert!(reg.custom_type_list().is_empty());
    }

    #[test]
    fn unknown_types_read_as_skeleton() {
        let reg = registry();
        assert_eq!(reg.get_data(&name("missing")), ChipTypeData::skeleton());
        assert!(!reg.contains(&name("missing")));
    }

    #[test]
    fn new_type_refuses_standard_names() {
        let mut reg = registry();
        assert_eq!(reg.new_type("Xor").unwrap(), None);
        assert_eq!(reg.new_type("Adder").unwrap(), Some(name("adder")));
        assert!(reg.is_custom(&name("adder")));
        assert_eq!(reg.custom_type_list(), [name("adder")]);
    }

    #[test]
    fn new_type_keeps_existing_definition() {
        let mut reg = registry();
        reg.new_type("adder").unwrap();
        reg.add_const(&name("adder"), "width").unwrap();
        reg.new_type("ADDER").unwrap();
        assert_eq!(reg.get_data(&name("adder")).constants, ["WIDTH"]);
    }

    #[test]
    fn base_type_is_not_listed_as_custom() {
        let mut reg = registry();
        reg.new_type("base").unwrap();
        reg.new_type("half").unwrap();
        assert_eq!(reg.custom_type_list(), [name("half")]);
        assert_eq!(reg.type_list().len(), 12);
    }

    #[test]
    fn standard_setters_do_nothing() {
        let mut reg = registry();
        let and = name("and");
        let before = reg.get_data(&and);

        assert_eq!(reg.set_size(&and, Vec2::new(7, 7)).unwrap(), before.size);
        assert!(!reg.set_input(&and, 0, "Q").unwrap());
        assert!(!reg.set_output(&and, 0, "Q").unwrap());
        reg.add_const(&and, "K").unwrap();
        reg.remove_const(&and, "A").unwrap();
        reg.set_content(&and, ChipContent::new(Vec2::new(3, 3))).unwrap();

        assert_eq!(reg.get_data(&and), before);
        assert!(!reg.is_custom(&and));
    }

    #[test]
    fn resize_stays_below_base_area() {
        let mut reg = registry();
        let base = reg.base_type().clone();
        reg.new_type(base.clone()).unwrap();
        assert_eq!(reg.set_size(&base, Vec2::new(5, 5)).unwrap(), Vec2::new(5, 5));

        reg.new_type("inner").unwrap();
        let got = reg.set_size(&name("inner"), Vec2::new(20, 20)).unwrap();
        assert!(got.area() < 25);
        assert_eq!(got, Vec2::new(20, 1));
        assert_eq!(reg.get_data(&name("inner")).size, got);
    }

    #[test]
    fn resize_shrinks_the_shorter_side_first() {
        assert_eq!(fit_below(Vec2::new(3, 8), 12), Vec2::new(1, 8));
        assert_eq!(fit_below(Vec2::new(3, 8), 8), Vec2::new(1, 7));
        assert_eq!(fit_below(Vec2::new(4, 2), 100), Vec2::new(4, 2));
        assert_eq!(fit_below(Vec2::new(4, 2), 1), Vec2::ONE);
    }

    #[test]
    fn base_resize_is_only_bounded_by_max_size() {
        let mut reg = registry();
        let base = reg.base_type().clone();
        let got = reg.set_size(&base, Vec2::new(2000, 0)).unwrap();
        assert_eq!(got, Vec2::new(1000, 1));
    }

    #[test]
    fn resize_resanitizes_ports() {
        let mut reg = registry();
        let base = reg.base_type().clone();
        reg.set_size(&base, Vec2::new(10, 10)).unwrap();
        reg.new_type("wide").unwrap();
        reg.set_size(&name("wide"), Vec2::new(3, 2)).unwrap();
        let data = reg.get_data(&name("wide"));
        assert_eq!(data.inputs, ["A", "B", "", ""]);
        assert_eq!(data.outputs.len(), 4);
        assert_eq!(data.content.size, Vec2::new(3, 2));
    }

    #[test]
    fn resize_pulls_children_inside_and_reroutes() {
        let mut reg = registry();
        let base = reg.base_type().clone();
        reg.set_size(&base, Vec2::new(10, 10)).unwrap();
        let top = name("top");
        reg.new_type(top.clone()).unwrap();
        reg.set_size(&top, Vec2::new(4, 4)).unwrap();

        let mut content = reg.get_data(&top).content;
        content.chips.insert(ChipId::new("g"), Chip::new("g", "and", Vec2::new(14, 14)));
        content
            .connections
            .push(Connection::new(Pin::input("top", "A"), Pin::input("g", "A"), 0));
        reg.set_content(&top, content).unwrap();

        reg.set_size(&top, Vec2::new(2, 2)).unwrap();
        let data = reg.get_data(&top);
        assert_eq!(data.content.chips[&ChipId::new("g")].pos, Vec2::new(7, 7));
        let wire = &data.content.connections[0];
        assert!(wire.valid_path);
        assert!(wire.path.iter().all(|p| p.x <= 8 && p.y <= 8));
    }

    #[test]
    fn port_names_must_be_unique_per_side() {
        let mut reg = registry();
        let t = name("t");
        reg.new_type(t.clone()).unwrap();
        assert!(!reg.set_input(&t, 1, "a").unwrap());
        assert!(reg.set_input(&t, 1, "c").unwrap());
        assert!(reg.set_output(&t, 1, "a").unwrap());
        assert!(!reg.set_input(&t, 5, "z").unwrap());
        assert!(reg.set_input(&t, 0, "").unwrap());

        let data = reg.get_data(&t);
        assert_eq!(data.inputs, ["", "C"]);
        assert_eq!(data.outputs, ["R", "A"]);
    }

    #[test]
    fn constants_are_canonical() {
        let mut reg = registry();
        let t = name("t");
        reg.new_type(t.clone()).unwrap();
        reg.add_const(&t, "width").unwrap();
        reg.add_const(&t, "WIDTH").unwrap();
        reg.add_const(&t, " ").unwrap();
        reg.add_const(&t, "depth").unwrap();
        assert_eq!(reg.get_data(&t).constants, ["WIDTH", "DEPTH"]);

        reg.remove_const(&t, "width").unwrap();
        assert_eq!(reg.get_data(&t).constants, ["DEPTH"]);
    }

    #[test]
    fn source_contains_custom_types() {
        let mut reg = registry();
        reg.new_type("and3").unwrap();
        let source = reg.to_source(&name("and3"));
        assert_eq!(source.chip.type_name, name("and3"));
        assert!(source.chip_data.contains_key(&name("and3")));
        assert!(!source.chip_data.contains_key(&name("and")));
    }

    #[test]
    fn json_export_is_keyed_by_name() {
        let mut reg = registry();
        reg.new_type("half").unwrap();
        let value: serde_json::Value = serde_json::from_str(&reg.to_json().unwrap()).unwrap();
        assert_eq!(value["half"]["type"], "custom");
    }

    #[test]
    fn reset_forgets_custom_types() {
        let mut reg = registry();
        reg.new_type("a").unwrap();
        reg.new_type("b").unwrap();
        reg.reset().unwrap();
        assert!(reg.custom_types().is_empty());
        assert!(!reg.remove_type(&name("a")).unwrap());
    }

    #[test]
    fn changes_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChipgridConfig::default();
        let open = || TypeRegistry::open(&config, Box::new(DirStore::new(dir.path(), "T_"))).unwrap();

        let mut reg = open();
        reg.new_type("half").unwrap();
        reg.set_output(&name("half"), 1, "carry").unwrap();
        drop(reg);

        let reg = open();
        assert_eq!(reg.get_data(&name("half")).outputs, ["R", "CARRY"]);
    }

    #[test]
    fn stored_records_cannot_shadow_standard_types() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStore::new(dir.path(), "T_");
        store.save(&name("and"), &ChipTypeData::skeleton()).unwrap();

        let reg = TypeRegistry::open(&ChipgridConfig::default(), Box::new(store)).unwrap();
        assert!(reg.get_data(&name("and")).inline_code().is_some());
        assert!(!reg.is_custom(&name("and")));
    }

    #[test]
    fn stored_sizes_are_bounded_on_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("T_huge.json"), r#"{ "size": { "x": 2000000000, "y": -7 } }"#).unwrap();

        let reg = TypeRegistry::open(&ChipgridConfig::default(), Box::new(DirStore::new(dir.path(), "T_"))).unwrap();
        let data = reg.get_data(&name("huge"));
        assert_eq!(data.size, Vec2::new(1000, 1));
        assert_eq!(data.inputs.len(), 1001);
        assert_eq!(data.outputs.len(), 1001);
    }

    #[test]
    fn external_changes_are_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChipgridConfig::default();
        let mut reg = TypeRegistry::open(&config, Box::new(DirStore::new(dir.path(), "T_"))).unwrap();
        reg.new_type("half").unwrap();
        reg.new_type("gone").unwrap();
        assert!(reg.sync_external().unwrap().is_empty());

        let mut other = TypeRegistry::open(&config, Box::new(DirStore::new(dir.path(), "T_"))).unwrap();
        other.add_const(&name("half"), "k").unwrap();
        other.remove_type(&name("gone")).unwrap();

        assert_eq!(reg.sync_external().unwrap(), [name("gone"), name("half")]);
        assert_eq!(reg.get_data(&name("half")).constants, ["K"]);
        assert!(!reg.is_custom(&name("gone")));
    }
}
