//! Where pins sit on the content grid.

use crate::settings::RouteSettings;
use chipgrid_common::Vec2;
use chipgrid_ir::{ChipContent, Pin, TypeLookup, TypeName};

/// A pin's grid cell and the free cell in front of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinPlacement {
    /// The cell the pin is drawn on.
    pub anchor: Vec2,
    /// Unit vector pointing away from the chip.
    pub normal: Vec2,
    /// `anchor + normal`, the end point used by the router.
    pub stand_off: Vec2,
    /// `true` when the pin is one of the owning type's own ports.
    pub boundary: bool,
}

/// Resolves `pin` inside `content`, which belongs to type `owner`.
///
/// Child pins follow their chip's rotation. The owner's own ports sit on the
/// grid edge: inputs along the top row, outputs along the bottom row, one
/// every `scale` cells, with the stand-off clamped back into the grid.
/// Returns `None` if the chip or the port does not exist.
pub(crate) fn place_pin(
    owner: &TypeName,
    content: &ChipContent,
    types: &dyn TypeLookup,
    settings: &RouteSettings,
    pin: &Pin,
) -> Option<PinPlacement> {
    if pin.chip.is_boundary_of(owner) {
        let data = types.type_data(owner);
        let index = i32::try_from(data.pin_index(&pin.name, pin.output)?).ok()?;
        let grid = content.grid_size(settings.scale);
        let anchor = Vec2::new(index * settings.scale, if pin.output { grid.y } else { 0 });
        let normal = Vec2::new(0, if pin.output { 1 } else { -1 });
        let stand_off = anchor + normal;
        return Some(PinPlacement {
            anchor,
            normal,
            stand_off: Vec2::new(stand_off.x, stand_off.y.clamp(0, grid.y)),
            boundary: true,
        });
    }

    let chip = content.chip(&pin.chip)?;
    let data = types.type_data(&chip.type_name);
    let index = data.pin_index(&pin.name, pin.output)?;
    let (offset, normal) = chip.rotation.pin_offset(data.size, index, pin.output);
    let anchor = chip.pos + offset;
    Some(PinPlacement {
        anchor,
        normal,
        stand_off: anchor + normal,
        boundary: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chipgrid_common::Rotation;
    use chipgrid_ir::{Chip, ChipId, ChipTypeData};
    use std::collections::BTreeMap;

    fn setup(rotation: Rotation) -> (TypeName, ChipContent, BTreeMap<TypeName, ChipTypeData>) {
        let mut types = BTreeMap::new();
        let mut top = ChipTypeData::skeleton();
        top.size = Vec2::new(3, 3);
        top.inputs = vec!["X".into(), "".into(), "Y".into(), "".into()];
        top.outputs = vec!["".into(), "Z".into(), "".into(), "".into()];
        types.insert(TypeName::new("top"), top);
        let mut gate = ChipTypeData::skeleton();
        gate.code = Some("x".into());
        types.insert(TypeName::new("and"), gate);

        let mut content = ChipContent::new(Vec2::new(3, 3));
        let chip = Chip::new("g", "and", Vec2::new(4, 4)).with_rotation(rotation);
        content.chips.insert(ChipId::new("g"), chip);
        (TypeName::new("top"), content, types)
    }

    fn place(rotation: Rotation, pin: Pin) -> Option<PinPlacement> {
        let (owner, content, types) = setup(rotation);
        place_pin(&owner, &content, &types, &RouteSettings::default(), &pin)
    }

    #[test]
    fn unrotated_child_pins() {
        let a = place(Rotation::R0, Pin::input("g", "B")).unwrap();
        assert_eq!(a.anchor, Vec2::new(5, 4));
        assert_eq!(a.stand_off, Vec2::new(5, 3));
        let r = place(Rotation::R0, Pin::output("g", "R")).unwrap();
        assert_eq!(r.anchor, Vec2::new(4, 5));
        assert_eq!(r.stand_off, Vec2::new(4, 6));
    }

    #[test]
    fn rotated_child_pins() {
        // a quarter turn puts inputs on the right edge
        let a = place(Rotation::R1, Pin::input("g", "A")).unwrap();
        assert_eq!(a.anchor, Vec2::new(5, 4));
        assert_eq!(a.stand_off, Vec2::new(6, 4));
        let r = place(Rotation::R3, Pin::output("g", "R")).unwrap();
        assert_eq!(r.anchor, Vec2::new(5, 5));
        assert_eq!(r.stand_off, Vec2::new(6, 5));
    }

    #[test]
    fn boundary_pins_on_grid_edges() {
        let y = place(Rotation::R0, Pin::input("top", "Y")).unwrap();
        assert_eq!(y.anchor, Vec2::new(8, 0));
        assert_eq!(y.stand_off, Vec2::new(8, 0));
        assert!(y.boundary);
        let z = place(Rotation::R0, Pin::output("top", "Z")).unwrap();
        assert_eq!(z.anchor, Vec2::new(4, 12));
        assert_eq!(z.stand_off, Vec2::new(4, 12));
    }

    #[test]
    fn unknown_pins_do_not_resolve() {
        assert!(place(Rotation::R0, Pin::input("g", "Q")).is_none());
        assert!(place(Rotation::R0, Pin::input("ghost", "A")).is_none());
        assert!(place(Rotation::R0, Pin::output("top", "")).is_none());
    }
}
