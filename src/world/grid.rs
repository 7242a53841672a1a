//! Grid geometry: the mapping between world block coordinates and claim
//! grid cells.
//!
//! Each horizontal axis is configured independently with a plot size and a
//! road size. A cell spans `plot_size + road_size` blocks on its axis; the
//! first `plot_size` blocks of that span are the plot interior, the rest
//! are the road strip that follows the plot.

use super::core::GridCell;

/// Plot/road layout along a single axis.
///
/// Sizes are clamped on construction (`max(1, plot)`, `max(0, road)`) so
/// the modulo arithmetic below can never divide by zero. The clamp is
/// silent; degenerate configuration is not a reportable error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisGeometry {
    plot_size: i32,
    road_size: i32,
}

impl AxisGeometry {
    pub fn new(plot_size: i32, road_size: i32) -> Self {
        Self {
            plot_size: plot_size.max(1),
            road_size: road_size.max(0),
        }
    }

    pub fn plot_size(self) -> i32 {
        self.plot_size
    }

    pub fn road_size(self) -> i32 {
        self.road_size
    }

    /// Full period of the grid on this axis. Always >= 1.
    pub fn total_size(self) -> i32 {
        self.plot_size + self.road_size
    }

    /// Grid index of the cell containing a world coordinate.
    ///
    /// True mathematical floor division, so negative coordinates land in
    /// negative cells: with a total size of 36, world -1 is in cell -1.
    pub fn world_to_grid(self, world: i32) -> i32 {
        world.div_euclid(self.total_size())
    }

    /// Minimum (origin) world coordinate of a grid cell on this axis.
    pub fn grid_to_world(self, grid: i32) -> i32 {
        grid * self.total_size()
    }

    /// Offset of a world coordinate within its cell, in `[0, total_size)`.
    pub fn local(self, world: i32) -> i32 {
        world.rem_euclid(self.total_size())
    }

    /// Whether a world coordinate falls in the plot span of its cell.
    pub fn is_inside_plot(self, world: i32) -> bool {
        self.local(world) < self.plot_size
    }
}

/// Two-axis grid geometry for a plot world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    pub x: AxisGeometry,
    pub z: AxisGeometry,
}

impl GridGeometry {
    pub fn new(x: AxisGeometry, z: AxisGeometry) -> Self {
        Self { x, z }
    }

    /// Uniform layout, same sizes on both axes.
    pub fn square(plot_size: i32, road_size: i32) -> Self {
        let axis = AxisGeometry::new(plot_size, road_size);
        Self { x: axis, z: axis }
    }

    /// Grid cell containing the given world column.
    pub fn cell_of(&self, world_x: i32, world_z: i32) -> GridCell {
        GridCell::new(self.x.world_to_grid(world_x), self.z.world_to_grid(world_z))
    }

    /// Whether a world column is inside a plot on both axes (i.e. not on
    /// any road strip).
    pub fn is_inside_plot(&self, world_x: i32, world_z: i32) -> bool {
        self.x.is_inside_plot(world_x) && self.z.is_inside_plot(world_z)
    }

    /// Origin (minimum world coordinates) of a grid cell.
    pub fn cell_origin(&self, cell: GridCell) -> (i32, i32) {
        (self.x.grid_to_world(cell.x), self.z.grid_to_world(cell.z))
    }
}
