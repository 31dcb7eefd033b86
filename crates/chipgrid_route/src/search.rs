//! Routing a single connection.

use crate::anchor::{place_pin, PinPlacement};
use crate::grid::CostGrid;
use crate::settings::RouteSettings;
use chipgrid_common::Vec2;
use chipgrid_ir::{ChipContent, Connection, Pin, TypeLookup, TypeName};
use pathfinding::prelude::astar;

/// What routing one connection produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The pins face each other across at most one cell; no search was run.
    Direct(Vec<Vec2>),
    /// A* found this path between the two stand-off cells.
    Searched(Vec<Vec2>),
    /// An endpoint did not resolve or no path exists.
    Failed,
}

impl RouteOutcome {
    /// Returns `true` unless routing failed.
    pub fn is_valid(&self) -> bool {
        !matches!(self, RouteOutcome::Failed)
    }

    /// The routed cells, empty on failure.
    pub fn path(&self) -> &[Vec2] {
        match self {
            RouteOutcome::Direct(p) | RouteOutcome::Searched(p) => p,
            RouteOutcome::Failed => &[],
        }
    }

    /// Stores the outcome on a connection.
    pub fn apply_to(self, con: &mut Connection) {
        con.valid_path = self.is_valid();
        con.path = match self {
            RouteOutcome::Direct(p) | RouteOutcome::Searched(p) => p,
            RouteOutcome::Failed => Vec::new(),
        };
    }
}

/// Routes connections inside the content of one chip type.
pub struct Router<'a> {
    owner: &'a TypeName,
    content: &'a ChipContent,
    types: &'a dyn TypeLookup,
    settings: RouteSettings,
}

impl<'a> Router<'a> {
    /// A router for `content`, which belongs to type `owner`.
    pub fn new(
        owner: &'a TypeName,
        content: &'a ChipContent,
        types: &'a dyn TypeLookup,
        settings: RouteSettings,
    ) -> Self {
        Self {
            owner,
            content,
            types,
            settings,
        }
    }

    /// Anchor and stand-off of a pin, `None` if it does not exist.
    pub fn place(&self, pin: &Pin) -> Option<PinPlacement> {
        place_pin(self.owner, self.content, self.types, &self.settings, pin)
    }

    /// The cost grid used to route `exclude`, or the full grid.
    pub fn cost_grid(&self, exclude: Option<&Connection>) -> CostGrid {
        CostGrid::build(self.owner, self.content, self.types, &self.settings, exclude)
    }

    /// Squared distance between the two pin anchors, if both resolve.
    pub fn pin_distance_squared(&self, con: &Connection) -> Option<i64> {
        let a = self.place(&con.source)?;
        let b = self.place(&con.target)?;
        Some(a.anchor.distance_squared(b.anchor))
    }

    /// Finds a path for `con` without modifying anything.
    pub fn route(&self, con: &Connection) -> RouteOutcome {
        let (Some(source), Some(target)) = (self.place(&con.source), self.place(&con.target)) else {
            return RouteOutcome::Failed;
        };
        let start = source.stand_off;
        let end = target.stand_off;

        if start == end {
            return RouteOutcome::Direct(vec![start]);
        }
        if source.anchor == end || target.anchor == start {
            return RouteOutcome::Direct(vec![start, end]);
        }

        let grid = self.cost_grid(Some(con));
        match self.search(&grid, start, end) {
            Some(path) => RouteOutcome::Searched(path),
            None => RouteOutcome::Failed,
        }
    }

    /// Shortest 4-connected path from `start` to `end`.
    ///
    /// Each step costs one plus the cost of the cell entered. Cells at or
    /// above `max_cost` cannot be entered; the start cell is always allowed.
    fn search(&self, grid: &CostGrid, start: Vec2, end: Vec2) -> Option<Vec<Vec2>> {
        let max_cost = self.settings.max_cost;
        let passable = |p: Vec2| grid.get(p).is_some_and(|c| c < max_cost);
        if !grid.contains(start) || !passable(end) {
            return None;
        }

        const STEPS: [Vec2; 4] = [Vec2::new(0, -1), Vec2::new(1, 0), Vec2::new(0, 1), Vec2::new(-1, 0)];
        let (path, _cost) = astar(
            &start,
            |&p| {
                STEPS
                    .iter()
                    .map(move |&d| p + d)
                    .filter_map(|n| grid.get(n).filter(|&c| c < max_cost).map(|c| (n, 1 + c)))
                    .collect::<Vec<_>>()
            },
            |&p| p.manhattan(end),
            |&p| p == end,
        )?;
        Some(path)
    }
}
