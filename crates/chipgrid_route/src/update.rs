//! Incremental re-routing after an edit.

use crate::search::Router;
use crate::settings::RouteSettings;
use chipgrid_ir::{ChipContent, ChipId, TypeLookup, TypeName};

/// Sort key for connections whose pins cannot be located.
pub const UNRESOLVED_DISTANCE: i64 = 1_000_000;

/// Re-routes the connections touching `chip`, or every connection without a
/// hand-drawn path when `chip` is `None`.
///
/// Selected paths are cleared first, then routed one by one in ascending
/// pin-to-pin distance. Ties keep their original order, so running it twice
/// without an edit in between yields the same paths. Returns how many
/// connections were routed.
pub fn update_connections_for_chip(
    owner: &TypeName,
    content: &mut ChipContent,
    types: &dyn TypeLookup,
    settings: RouteSettings,
    chip: Option<&ChipId>,
) -> usize {
    let selected: Vec<usize> = content
        .connections
        .iter()
        .enumerate()
        .filter(|(_, c)| match chip {
            Some(id) => c.uses_chip(id),
            None => !c.custom_path,
        })
        .map(|(i, _)| i)
        .collect();

    for &i in &selected {
        content.connections[i].clear_path();
    }

    let mut order: Vec<(i64, usize)> = {
        let router = Router::new(owner, content, types, settings);
        selected
            .iter()
            .map(|&i| {
                let d = router
                    .pin_distance_squared(&content.connections[i])
                    .unwrap_or(UNRESOLVED_DISTANCE);
                (d, i)
            })
            .collect()
    };
    order.sort_by_key(|&(d, _)| d);

    for &(_, i) in &order {
        let outcome = Router::new(owner, content, types, settings).route(&content.connections[i]);
        outcome.apply_to(&mut content.connections[i]);
    }
    order.len()
}
