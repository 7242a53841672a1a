//! The plot world chunk generator.
//!
//! Terrain layout depends only on the grid geometry and the configured
//! materials, never on claim state: a chunk looks the same whether its
//! plots are owned or not, and generation never touches the claim table.

use super::prefab::{PrefabSet, PrefabTemplate, Rotation};
use super::{SpawnPoint, WorldGenerator};
use crate::config::PlotConfig;
use crate::constants::core::{CHUNK_SIZE, GROUND_HEIGHT, WORLD_HEIGHT};
use crate::world::core::{BlockId, BlockRegistry, ChunkPos};
use crate::world::grid::GridGeometry;
use crate::world::storage::chunk_operations;
use crate::world::storage::GeneratedChunk;
use std::sync::Arc;

/// Default ground tint, ARGB. A mid grass green.
pub const DEFAULT_TINT: u32 = 0xFF5B9E28;

/// Classification of a single world column within the grid period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Inside a plot, away from its edge.
    PlotInterior,
    /// The 1-block perimeter of the plot interior.
    PlotBorder,
    /// Road strip running along the X axis (separates plots along Z).
    RoadX,
    /// Road strip running along the Z axis (separates plots along X).
    RoadZ,
    /// Where the two road strips overlap.
    Intersection,
}

impl ColumnKind {
    /// Road surface classes, including intersections.
    pub fn is_road(self) -> bool {
        matches!(
            self,
            ColumnKind::RoadX | ColumnKind::RoadZ | ColumnKind::Intersection
        )
    }
}

/// Classify a world column by its offsets within the grid period.
pub fn classify_column(geometry: &GridGeometry, world_x: i32, world_z: i32) -> ColumnKind {
    let mod_x = geometry.x.local(world_x);
    let mod_z = geometry.z.local(world_z);
    let on_road_x = mod_x >= geometry.x.plot_size();
    let on_road_z = mod_z >= geometry.z.plot_size();

    match (on_road_x, on_road_z) {
        (true, true) => ColumnKind::Intersection,
        (true, false) => ColumnKind::RoadZ,
        (false, true) => ColumnKind::RoadX,
        (false, false) => {
            if mod_x == 0
                || mod_x == geometry.x.plot_size() - 1
                || mod_z == 0
                || mod_z == geometry.z.plot_size() - 1
            {
                ColumnKind::PlotBorder
            } else {
                ColumnKind::PlotInterior
            }
        }
    }
}

/// Resolved block ids for the layer fill.
#[derive(Debug, Clone, Copy)]
pub struct MaterialIds {
    pub bedrock: BlockId,
    pub filling: BlockId,
    pub plot_surface: BlockId,
    pub plot_sub_surface: BlockId,
    pub road_surface: BlockId,
    pub border: BlockId,
}

impl MaterialIds {
    /// Resolve the configured material names once, with the fallback
    /// chain of the original layout: everything degrades toward the
    /// filler, the border degrades toward the road surface. A lookup
    /// miss never aborts generation.
    pub fn resolve(config: &PlotConfig, registry: &BlockRegistry) -> Self {
        let filling = registry.resolve_or(&config.blocks.filling, BlockId::EMPTY);
        let road_surface = registry.resolve_or(&config.blocks.road_surface, filling);
        Self {
            bedrock: registry.resolve_or(&config.blocks.bedrock, filling),
            filling,
            plot_surface: registry.resolve_or(&config.blocks.plot_surface, filling),
            plot_sub_surface: registry.resolve_or(&config.blocks.plot_sub_surface, filling),
            road_surface,
            border: registry.resolve_or(&config.blocks.border, road_surface),
        }
    }
}

/// Generates the plot grid terrain, one chunk column at a time.
pub struct PlotWorldGenerator {
    geometry: GridGeometry,
    materials: MaterialIds,
    prefabs: PrefabSet,
    registry: Arc<BlockRegistry>,
    tint: u32,
    environment: u16,
}

impl PlotWorldGenerator {
    pub fn new(config: &PlotConfig, registry: Arc<BlockRegistry>, prefabs: PrefabSet) -> Self {
        let materials = MaterialIds::resolve(config, &registry);
        log::info!(
            "[PlotWorldGenerator::new] geometry {:?}, materials {:?}",
            config.geometry(),
            materials
        );
        Self {
            geometry: config.geometry(),
            materials,
            prefabs,
            registry,
            tint: DEFAULT_TINT,
            environment: 0,
        }
    }

    pub fn with_tint(mut self, tint: u32) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_environment(mut self, environment: u16) -> Self {
        self.environment = environment;
        self
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn materials(&self) -> MaterialIds {
        self.materials
    }

    /// Write the vertical layers for one column, bottom-up.
    fn fill_column(&self, chunk: &mut GeneratedChunk, x: i32, z: i32, kind: ColumnKind) {
        chunk_operations::set_tint(chunk, x, z, self.tint);
        chunk_operations::set_environment(chunk, x, z, self.environment);

        // Layer 0: bedrock floor
        chunk_operations::set_block(chunk, x, 0, z, self.materials.bedrock);

        // Structural fill up to three blocks below the surface
        for y in 1..GROUND_HEIGHT - 3 {
            chunk_operations::set_block(chunk, x, y, z, self.materials.filling);
        }

        // 3-block sub-surface: road sub-base under road classes
        let sub_surface = if kind.is_road() {
            self.materials.filling
        } else {
            self.materials.plot_sub_surface
        };
        for y in GROUND_HEIGHT - 3..GROUND_HEIGHT {
            chunk_operations::set_block(chunk, x, y, z, sub_surface);
        }

        // Surface layer
        let surface = if kind.is_road() {
            self.materials.road_surface
        } else {
            self.materials.plot_surface
        };
        chunk_operations::set_block(chunk, x, GROUND_HEIGHT, z, surface);

        // Border columns carry one extra block above the surface
        if kind == ColumnKind::PlotBorder {
            chunk_operations::set_block(chunk, x, GROUND_HEIGHT + 1, z, self.materials.border);
        }
    }

    /// Overlay the configured templates on every grid cell whose tile
    /// overlaps this chunk's footprint.
    fn overlay_prefabs(&self, chunk: &mut GeneratedChunk) {
        if self.prefabs.plot.is_none()
            && self.prefabs.road.is_none()
            && self.prefabs.intersection.is_none()
        {
            return;
        }

        let pos = chunk.position;
        let grid_x0 = self.geometry.x.world_to_grid(pos.min_world_x());
        let grid_x1 = self.geometry.x.world_to_grid(pos.max_world_x());
        let grid_z0 = self.geometry.z.world_to_grid(pos.min_world_z());
        let grid_z1 = self.geometry.z.world_to_grid(pos.max_world_z());

        let plot_x = self.geometry.x.plot_size();
        let plot_z = self.geometry.z.plot_size();

        for grid_x in grid_x0..=grid_x1 {
            for grid_z in grid_z0..=grid_z1 {
                let origin_x = self.geometry.x.grid_to_world(grid_x);
                let origin_z = self.geometry.z.grid_to_world(grid_z);

                if let Some(template) = &self.prefabs.plot {
                    self.paste(chunk, template, origin_x, origin_z, Rotation::None);
                }
                if let Some(template) = &self.prefabs.road {
                    // East road strip runs along Z, so the template turns
                    // a quarter; the south strip keeps its orientation.
                    self.paste(
                        chunk,
                        template,
                        origin_x + plot_x,
                        origin_z,
                        Rotation::Clockwise90,
                    );
                    self.paste(chunk, template, origin_x, origin_z + plot_z, Rotation::None);
                }
                if let Some(template) = &self.prefabs.intersection {
                    self.paste(
                        chunk,
                        template,
                        origin_x + plot_x,
                        origin_z + plot_z,
                        Rotation::None,
                    );
                }
            }
        }
    }

    /// Write one template instance anchored at a world position, clipped
    /// to this chunk's footprint and the valid vertical range.
    fn paste(
        &self,
        chunk: &mut GeneratedChunk,
        template: &PrefabTemplate,
        anchor_x: i32,
        anchor_z: i32,
        rotation: Rotation,
    ) {
        if template.is_empty() {
            return;
        }

        let bounds = template.bounds();
        let chunk_min_x = chunk.position.min_world_x();
        let chunk_min_z = chunk.position.min_world_z();

        for block in template.blocks() {
            let local_x = block.x - bounds.min_x;
            let local_y = block.y - bounds.min_y;
            let local_z = block.z - bounds.min_z;

            let (rot_x, rot_z) = rotation.apply(local_x, local_z, bounds.depth_z());
            let world_y = GROUND_HEIGHT + 1 + local_y;

            let chunk_x = anchor_x + rot_x - chunk_min_x;
            let chunk_z = anchor_z + rot_z - chunk_min_z;

            // Clipping, not an error: out-of-chunk and out-of-range
            // placements are silently skipped.
            if !(0..CHUNK_SIZE).contains(&chunk_x)
                || !(0..CHUNK_SIZE).contains(&chunk_z)
                || !(0..WORLD_HEIGHT).contains(&world_y)
            {
                continue;
            }

            let id = block.block_id(&self.registry, self.materials.filling);
            chunk_operations::set_block(chunk, chunk_x, world_y, chunk_z, id);
        }
    }
}

impl WorldGenerator for PlotWorldGenerator {
    fn generate(
        &self,
        _seed: u32,
        index: u64,
        cx: i32,
        cz: i32,
        still_needed: &(dyn Fn(u64) -> bool + Sync),
    ) -> Option<GeneratedChunk> {
        let mut chunk = chunk_operations::create_chunk(ChunkPos::new(cx, cz), index);

        for x in 0..CHUNK_SIZE {
            // Cooperative cancellation point, checked every 8 columns
            if x % 8 == 0 && !still_needed(index) {
                log::debug!(
                    "[PlotWorldGenerator::generate] chunk ({}, {}) no longer needed, aborting",
                    cx,
                    cz
                );
                return None;
            }

            let world_x = cx * CHUNK_SIZE + x;
            for z in 0..CHUNK_SIZE {
                let world_z = cz * CHUNK_SIZE + z;
                let kind = classify_column(&self.geometry, world_x, world_z);
                self.fill_column(&mut chunk, x, z, kind);
            }
        }

        self.overlay_prefabs(&mut chunk);
        Some(chunk)
    }

    fn spawn_points(&self, _seed: u32) -> Vec<SpawnPoint> {
        vec![SpawnPoint {
            x: self.geometry.x.plot_size() as f64 / 2.0,
            y: GROUND_HEIGHT as f64 + 1.5,
            z: self.geometry.z.plot_size() as f64 / 2.0,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::storage::chunk_operations::get_block;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registry_for(config: &PlotConfig) -> BlockRegistry {
        let mut registry = BlockRegistry::new();
        registry.register(&config.blocks.bedrock);
        registry.register(&config.blocks.filling);
        registry.register(&config.blocks.plot_surface);
        registry.register(&config.blocks.plot_sub_surface);
        registry.register(&config.blocks.road_surface);
        registry.register(&config.blocks.border);
        registry
    }

    fn generator() -> PlotWorldGenerator {
        let config = PlotConfig::default();
        let registry = Arc::new(registry_for(&config));
        PlotWorldGenerator::new(&config, registry, PrefabSet::default())
    }

    fn always(_: u64) -> bool {
        true
    }

    #[test]
    fn test_classification_five_ways() {
        let geometry = GridGeometry::square(32, 4);
        assert_eq!(classify_column(&geometry, 5, 5), ColumnKind::PlotInterior);
        assert_eq!(classify_column(&geometry, 31, 5), ColumnKind::PlotBorder);
        assert_eq!(classify_column(&geometry, 0, 5), ColumnKind::PlotBorder);
        assert_eq!(classify_column(&geometry, 32, 5), ColumnKind::RoadZ);
        assert_eq!(classify_column(&geometry, 5, 32), ColumnKind::RoadX);
        assert_eq!(classify_column(&geometry, 32, 32), ColumnKind::Intersection);
        // Negative coordinates classify through floored modulo
        assert_eq!(classify_column(&geometry, -1, 5), ColumnKind::RoadZ);
        assert_eq!(classify_column(&geometry, -36, -36), ColumnKind::PlotBorder);
    }

    #[test]
    fn test_layer_fill() {
        let gen = generator();
        let materials = gen.materials();
        let chunk = gen.generate(0, 0, 0, 0, &always).expect("generated");

        // Plot interior column (5, 5)
        assert_eq!(get_block(&chunk, 5, 0, 5), materials.bedrock);
        assert_eq!(get_block(&chunk, 5, 30, 5), materials.filling);
        assert_eq!(get_block(&chunk, 5, GROUND_HEIGHT - 1, 5), materials.plot_sub_surface);
        assert_eq!(get_block(&chunk, 5, GROUND_HEIGHT, 5), materials.plot_surface);
        assert_eq!(get_block(&chunk, 5, GROUND_HEIGHT + 1, 5), BlockId::EMPTY);

        // Border column (31, 5) carries one extra block
        assert_eq!(get_block(&chunk, 31, GROUND_HEIGHT, 5), materials.plot_surface);
        assert_eq!(get_block(&chunk, 31, GROUND_HEIGHT + 1, 5), materials.border);
        assert_eq!(get_block(&chunk, 31, GROUND_HEIGHT + 2, 5), BlockId::EMPTY);
    }

    #[test]
    fn test_road_layers_in_neighbor_chunk() {
        let gen = generator();
        let materials = gen.materials();
        // Chunk (1, 1) covers world 32..63 on both axes: road and
        // intersection columns live here.
        let chunk = gen.generate(0, 3, 1, 1, &always).expect("generated");

        // World (32, 32) is the intersection corner -> local (0, 0)
        assert_eq!(get_block(&chunk, 0, GROUND_HEIGHT, 0), materials.road_surface);
        assert_eq!(
            get_block(&chunk, 0, GROUND_HEIGHT - 1, 0),
            materials.filling
        );
        assert_eq!(get_block(&chunk, 0, GROUND_HEIGHT + 1, 0), BlockId::EMPTY);

        // World (36, 37) is inside the next plot -> border at local (4, 5)
        assert_eq!(get_block(&chunk, 4, GROUND_HEIGHT, 5), materials.plot_surface);
    }

    #[test]
    fn test_determinism() {
        let gen = generator();
        let a = gen.generate(7, 99, -3, 12, &always).expect("generated");
        let b = gen.generate(7, 99, -3, 12, &always).expect("generated");
        assert_eq!(a, b);
    }

    #[test]
    fn test_cancellation_returns_none() {
        let gen = generator();
        assert!(gen.generate(0, 5, 0, 0, &|_| false).is_none());

        // Cancel after the first check: generation still aborts mid-chunk
        let calls = AtomicUsize::new(0);
        let cancel_after_first = move |_: u64| calls.fetch_add(1, Ordering::SeqCst) == 0;
        assert!(gen.generate(0, 5, 0, 0, &cancel_after_first).is_none());
    }

    #[test]
    fn test_prefab_overlay_and_clipping() {
        let config = PlotConfig::default();
        let mut registry = registry_for(&config);
        let marker = registry.register("Deco_Lantern");
        let registry = Arc::new(registry);

        // Two blocks: one at the plot origin, one 40 blocks east (outside
        // chunk (0,0) but inside chunk (1,0)).
        let template = Arc::new(PrefabTemplate::new(
            "deco",
            vec![
                (0, 0, 0, "Deco_Lantern".to_string()),
                (40, 0, 0, "Deco_Lantern".to_string()),
            ],
        ));
        let prefabs = PrefabSet {
            plot: Some(template),
            ..PrefabSet::default()
        };
        let gen = PlotWorldGenerator::new(&config, registry, prefabs);

        let chunk = gen.generate(0, 0, 0, 0, &always).expect("generated");
        assert_eq!(get_block(&chunk, 0, GROUND_HEIGHT + 1, 0), marker);
        // The far block is outside this chunk's footprint: clipped
        for x in 0..CHUNK_SIZE {
            for z in 1..CHUNK_SIZE {
                assert_ne!(get_block(&chunk, x, GROUND_HEIGHT + 1, z), marker);
            }
        }

        // The neighbor chunk picks it up at world x=40 -> local x=8
        let east = gen.generate(0, 1, 1, 0, &always).expect("generated");
        assert_eq!(get_block(&east, 8, GROUND_HEIGHT + 1, 0), marker);
    }

    #[test]
    fn test_road_prefab_rotates_on_east_strip() {
        let config = PlotConfig::default();
        let mut registry = registry_for(&config);
        let marker = registry.register("Deco_Post");
        let registry = Arc::new(registry);

        // 1 wide (X), 3 deep (Z): rotated a quarter turn it becomes
        // 3 wide, 1 deep.
        let template = Arc::new(PrefabTemplate::new(
            "posts",
            vec![
                (0, 0, 0, "Deco_Post".to_string()),
                (0, 0, 2, "Deco_Post".to_string()),
            ],
        ));
        let prefabs = PrefabSet {
            road: Some(template),
            ..PrefabSet::default()
        };
        let gen = PlotWorldGenerator::new(&config, registry, prefabs);

        // Chunk (1,0) covers world x 32..63; the east strip of cell (0,0)
        // starts at world x=32. Clockwise90 maps (0,0,0)->(2,0) and
        // (0,0,2)->(0,0) relative to the anchor.
        let chunk = gen.generate(0, 0, 1, 0, &always).expect("generated");
        assert_eq!(get_block(&chunk, 2, GROUND_HEIGHT + 1, 0), marker);
        assert_eq!(get_block(&chunk, 0, GROUND_HEIGHT + 1, 0), marker);
        assert_eq!(get_block(&chunk, 1, GROUND_HEIGHT + 1, 0), BlockId::EMPTY);

        // The south strip keeps the template unrotated: world z=32+0 and 34
        let south = gen.generate(0, 0, 0, 1, &always).expect("generated");
        assert_eq!(get_block(&south, 0, GROUND_HEIGHT + 1, 0), marker);
        assert_eq!(get_block(&south, 0, GROUND_HEIGHT + 1, 2), marker);
    }

    #[test]
    fn test_material_fallback_chain() {
        let mut config = PlotConfig::default();
        config.blocks.border = "No_Such_Border".to_string();
        config.blocks.road_surface = "No_Such_Road".to_string();

        // Only the filler is registered; the overridden names miss
        let mut registry = BlockRegistry::new();
        let filling = registry.register(&config.blocks.filling);

        let materials = MaterialIds::resolve(&config, &registry);
        assert_eq!(materials.road_surface, filling);
        assert_eq!(materials.border, filling); // degrades via road surface
    }

    #[test]
    fn test_spawn_point_at_plot_center() {
        let gen = generator();
        let spawns = gen.spawn_points(0);
        assert_eq!(spawns.len(), 1);
        assert_eq!(spawns[0].x, 16.0);
        assert_eq!(spawns[0].y, GROUND_HEIGHT as f64 + 1.5);
    }
}
