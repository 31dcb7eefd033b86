//! Per-cell traversal costs for the router.

use crate::anchor::place_pin;
use crate::settings::RouteSettings;
use chipgrid_common::Vec2;
use chipgrid_ir::{ChipContent, Connection, Pin, TypeLookup, TypeName};
use std::fmt;

/// Traversal costs over `(grid.x + 1) x (grid.y + 1)` cells.
///
/// `0` is free, `pin_cost` marks the cell in front of a pin, and `max_cost`
/// marks chip bodies and wires already routed on the same layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostGrid {
    width: i32,
    height: i32,
    cells: Vec<u32>,
}

impl CostGrid {
    /// A grid of free cells.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![0; (width as usize) * (height as usize)],
        }
    }

    /// Builds the cost grid used to route `exclude`.
    ///
    /// With `Some(con)`, only wires on `con`'s layer are obstacles, and `con`
    /// itself plus every wire sharing its source are left out so fan-out
    /// branches may overlap.
    pub fn build(
        owner: &TypeName,
        content: &ChipContent,
        types: &dyn TypeLookup,
        settings: &RouteSettings,
        exclude: Option<&Connection>,
    ) -> Self {
        let extent = content.grid_size(settings.scale);
        let mut grid = Self::new(extent.x + 1, extent.y + 1);

        let obstacles = content.connections.iter().filter(|c| match exclude {
            Some(ex) => c.layer == ex.layer && c.id() != ex.id() && c.source != ex.source,
            None => true,
        });
        for con in obstacles {
            for &p in &con.path {
                grid.set(p, settings.max_cost);
            }
        }

        for chip in content.chips.values() {
            let footprint = chip.footprint(types);
            for x in 0..=footprint.x {
                for y in 0..=footprint.y {
                    grid.set(chip.pos + Vec2::new(x, y), settings.max_cost);
                }
            }
        }

        for chip in content.chips.values() {
            let data = types.type_data(&chip.type_name);
            for output in [true, false] {
                for name in data.named_ports(output) {
                    let pin = Pin::new(chip.id.clone(), output, name);
                    if let Some(placed) = place_pin(owner, content, types, settings, &pin) {
                        grid.raise_below(placed.stand_off, settings.pin_cost, settings.max_cost);
                    }
                }
            }
        }
        grid
    }

    /// Number of columns.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, p: Vec2) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            return None;
        }
        usize::try_from(p.y * self.width + p.x).ok()
    }

    /// Returns `true` if `p` lies on the grid.
    pub fn contains(&self, p: Vec2) -> bool {
        self.index(p).is_some()
    }

    /// Cost of a cell, `None` off the grid.
    pub fn get(&self, p: Vec2) -> Option<u32> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Sets a cell. Off-grid writes are ignored.
    pub fn set(&mut self, p: Vec2, cost: u32) {
        if let Some(i) = self.index(p) {
            self.cells[i] = cost;
        }
    }

    /// Sets a cell to `cost` unless it is already at `ceiling` or above.
    fn raise_below(&mut self, p: Vec2, cost: u32, ceiling: u32) {
        if let Some(i) = self.index(p) {
            if self.cells[i] < ceiling {
                self.cells[i] = cost;
            }
        }
    }

    /// Row-major copy of the costs.
    pub fn rows(&self) -> Vec<Vec<u32>> {
        if self.width == 0 {
            return vec![Vec::new(); self.height as usize];
        }
        self.cells.chunks(self.width as usize).map(<[u32]>::to_vec).collect()
    }
}

/// One character per cell: `.` free, `#` blocked, digits for anything else.
impl fmt::Display for CostGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row
                .iter()
                .map(|&c| match c {
                    0 => '.',
                    1..=9 => char::from_digit(c, 10).unwrap_or('?'),
                    _ => '#',
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
