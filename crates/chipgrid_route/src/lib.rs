//! Orthogonal wire routing on a chip's content grid.
//!
//! Each connection runs between the *stand-off* cells of its two pins, one
//! cell outward from the pin along its facing direction. Routes are searched
//! with A* over a [`CostGrid`] where chip bodies and same-layer wires block
//! passage and the cells in front of pins are expensive. Adjacent pins skip
//! the search entirely.
//!
//! Routing works on one connection at a time; [`update_connections_for_chip`]
//! re-routes a batch shortest-first so short wires claim cells before long
//! ones.

#![warn(missing_docs)]

mod anchor;
mod grid;
mod search;
mod settings;
mod update;

pub use anchor::PinPlacement;
pub use grid::CostGrid;
pub use search::{RouteOutcome, Router};
pub use settings::RouteSettings;
pub use update::{update_connections_for_chip, UNRESOLVED_DISTANCE};
