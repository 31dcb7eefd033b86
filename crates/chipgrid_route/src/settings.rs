use chipgrid_config::ChipgridConfig;

/// Grid scale and cost thresholds used while routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteSettings {
    /// Grid cells per unit of type size.
    pub scale: i32,
    /// Cells at or above this cost are impassable.
    pub max_cost: u32,
    /// Cost written to the cell in front of each pin.
    pub pin_cost: u32,
}

impl RouteSettings {
    /// Picks the routing values out of a loaded configuration.
    pub fn from_config(config: &ChipgridConfig) -> Self {
        Self {
            scale: config.editor.scale_factor,
            max_cost: config.routing.max_cost,
            pin_cost: config.routing.pin_cost,
        }
    }
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self::from_config(&ChipgridConfig::default())
    }
}
