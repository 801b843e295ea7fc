//! Placement Allocator
//!
//! Maps the ordered record lists onto disjoint grid cells. Three strategies
//! share one occupancy set:
//!
//! - **Ring** (primary timeline): one or two concentric rings around the
//!   grid center.
//! - **Spiral** (projects, then secondary timeline offset past them):
//!   perimeter-inward order with all ring cells removed.
//! - **Residual** (interests): row-major order over whatever is left.
//!
//! Two cells are reserved before any record lands: the center "park" cell
//! is never assigned, and the "home" cell (first unoccupied cell in
//! row-major scan, computed after ring/spiral allocation) is withheld from
//! residual allocation.
//!
//! Allocation is index-driven, not occupancy-checked: within one strategy
//! the caller's indices decide the cells, and what happens past the end of
//! a strategy's order is an explicit per-category [`OverflowPolicy`].

pub mod order;
pub mod palette;

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};

use city_events::{PlacedRecord, RecordCategory, RecordEntry, RecordSet};

use crate::grid::{Cell, GridLayout};
use crate::rng;

/// What to do when a category asks for more cells than its order holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Alias via modulo; later records share cells with earlier ones.
    #[default]
    Wrap,
    /// Refuse the allocation with [`PlacementError::Overflow`].
    Error,
}

/// Per-category overflow policies for the index-driven strategies.
///
/// Residual allocation always wraps: its contract is to yield a cell for
/// any index rather than fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverflowPolicies {
    pub primary: OverflowPolicy,
    pub secondary: OverflowPolicy,
    pub projects: OverflowPolicy,
}

/// Errors from the placement pass.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error(
        "{category:?} requested {requested} cells but the {strategy} order holds {capacity}"
    )]
    Overflow {
        category: RecordCategory,
        strategy: &'static str,
        requested: usize,
        capacity: usize,
    },
}

/// Assigns records to grid cells, tracking occupancy across strategies.
///
/// One allocator instance performs one allocation pass; the occupancy set
/// only grows. Rebuilding the scene means building a fresh allocator.
pub struct PlacementAllocator {
    layout: GridLayout,
    ring_order: Vec<Cell>,
    spiral_order: Vec<Cell>,
    residual_order: Vec<Cell>,
    occupied: HashSet<usize>,
    park: Cell,
    home: Option<Cell>,
    wrap_warned: bool,
}

impl PlacementAllocator {
    pub fn new(layout: GridLayout) -> Self {
        let park = layout.center_cell();
        let ring_order = order::ring_order(layout.dimension(), park);
        let ring_set: HashSet<usize> = ring_order
            .iter()
            .map(|c| c.index(layout.dimension()))
            .collect();
        let park_index = park.index(layout.dimension());
        let spiral_order: Vec<Cell> = order::spiral_order(layout.dimension())
            .into_iter()
            .filter(|c| {
                let index = c.index(layout.dimension());
                !ring_set.contains(&index) && index != park_index
            })
            .collect();

        Self {
            layout,
            ring_order,
            spiral_order,
            residual_order: Vec::new(),
            occupied: HashSet::new(),
            park,
            home: None,
            wrap_warned: false,
        }
    }

    /// The reserved park cell; never assigned to any record.
    pub fn park(&self) -> Cell {
        self.park
    }

    /// The reserved home cell, once residual allocation has begun.
    pub fn home(&self) -> Option<Cell> {
        self.home
    }

    pub fn ring_capacity(&self) -> usize {
        self.ring_order.len()
    }

    pub fn spiral_capacity(&self) -> usize {
        self.spiral_order.len()
    }

    /// Resolve a ring-allocated record to its cell.
    pub fn resolve_ring(
        &mut self,
        index: usize,
        category: RecordCategory,
        policy: OverflowPolicy,
    ) -> Result<Cell, PlacementError> {
        let cell = Self::resolve_indexed(
            &self.ring_order,
            index,
            category,
            "ring",
            policy,
            &mut self.wrap_warned,
        )?;
        self.occupied.insert(cell.index(self.layout.dimension()));
        Ok(cell)
    }

    /// Resolve a spiral-allocated record to its cell.
    ///
    /// `offset` shifts this category's indices within the shared spiral
    /// order, so two categories can interleave without colliding: the
    /// second category passes the first one's record count.
    pub fn resolve_spiral(
        &mut self,
        index: usize,
        offset: usize,
        category: RecordCategory,
        policy: OverflowPolicy,
    ) -> Result<Cell, PlacementError> {
        let cell = Self::resolve_indexed(
            &self.spiral_order,
            index + offset,
            category,
            "spiral",
            policy,
            &mut self.wrap_warned,
        )?;
        self.occupied.insert(cell.index(self.layout.dimension()));
        Ok(cell)
    }

    fn resolve_indexed(
        order: &[Cell],
        index: usize,
        category: RecordCategory,
        strategy: &'static str,
        policy: OverflowPolicy,
        wrap_warned: &mut bool,
    ) -> Result<Cell, PlacementError> {
        if order.is_empty() || (index >= order.len() && policy == OverflowPolicy::Error) {
            return Err(PlacementError::Overflow {
                category,
                strategy,
                requested: index + 1,
                capacity: order.len(),
            });
        }
        if index >= order.len() && !*wrap_warned {
            *wrap_warned = true;
            warn!(
                ?category,
                strategy,
                index,
                capacity = order.len(),
                "placement order exhausted, wrapping via modulo"
            );
        }
        Ok(order[index % order.len()])
    }

    /// Reserve the home cell: the first cell in row-major scan that is
    /// neither the park nor already occupied. Must run after ring/spiral
    /// allocation and before any residual resolution; its result depends on
    /// the occupancy accumulated so far.
    pub fn reserve_home(&mut self) -> Cell {
        if let Some(home) = self.home {
            return home;
        }
        let dimension = self.layout.dimension();
        let park_index = self.park.index(dimension);
        let home = (0..self.layout.cell_count())
            .map(|i| Cell::new(i / dimension, i % dimension))
            .find(|c| {
                let index = c.index(dimension);
                index != park_index && !self.occupied.contains(&index)
            })
            .unwrap_or(Cell::new(0, 0));
        debug!(row = home.row, col = home.col, "reserved home cell");
        self.home = Some(home);
        self.residual_order = self.build_residual_order(home);
        home
    }

    fn build_residual_order(&self, home: Cell) -> Vec<Cell> {
        let dimension = self.layout.dimension();
        let park_index = self.park.index(dimension);
        let home_index = home.index(dimension);
        let reserved_only: Vec<Cell> = (0..self.layout.cell_count())
            .map(|i| Cell::new(i / dimension, i % dimension))
            .filter(|c| {
                let index = c.index(dimension);
                index != park_index && index != home_index
            })
            .collect();
        let unoccupied: Vec<Cell> = reserved_only
            .iter()
            .copied()
            .filter(|c| !self.occupied.contains(&c.index(dimension)))
            .collect();
        if !unoccupied.is_empty() {
            return unoccupied;
        }
        // A saturated grid still yields cells: ignore prior occupancy
        // rather than fail.
        warn!("residual order empty, falling back to all cells minus park and home");
        if reserved_only.is_empty() {
            vec![home]
        } else {
            reserved_only
        }
    }

    /// Resolve a residual-allocated record to its cell. Always succeeds;
    /// indices past the end wrap via modulo.
    pub fn resolve_residual(&mut self, index: usize) -> Cell {
        if self.home.is_none() {
            self.reserve_home();
        }
        let cell = self.residual_order[index % self.residual_order.len()];
        self.occupied.insert(cell.index(self.layout.dimension()));
        cell
    }

    /// Run the full allocation pass over a record set.
    ///
    /// Category order is fixed: primary timeline (ring), projects (spiral),
    /// secondary timeline (spiral, offset past the projects), then home
    /// reservation, then interests (residual). Colors combine the scene
    /// seed with each record's stable id.
    pub fn place_records(
        &mut self,
        records: &RecordSet,
        seed: u64,
        policies: OverflowPolicies,
    ) -> Result<Vec<PlacedRecord>, PlacementError> {
        let mut placed = Vec::with_capacity(records.len());

        for (index, record) in records.primary_timeline.iter().enumerate() {
            let cell = self.resolve_ring(index, RecordCategory::PrimaryTimeline, policies.primary)?;
            placed.push(self.placed(RecordCategory::PrimaryTimeline, record, index, cell, seed));
        }

        let project_count = records.projects.len();
        for (index, record) in records.projects.iter().enumerate() {
            let cell =
                self.resolve_spiral(index, 0, RecordCategory::Project, policies.projects)?;
            placed.push(self.placed(RecordCategory::Project, record, index, cell, seed));
        }
        for (index, record) in records.secondary_timeline.iter().enumerate() {
            let cell = self.resolve_spiral(
                index,
                project_count,
                RecordCategory::SecondaryTimeline,
                policies.secondary,
            )?;
            placed.push(self.placed(RecordCategory::SecondaryTimeline, record, index, cell, seed));
        }

        self.reserve_home();

        for (index, record) in records.interests.iter().enumerate() {
            let cell = self.resolve_residual(index);
            placed.push(self.placed(RecordCategory::Interest, record, index, cell, seed));
        }

        debug!(count = placed.len(), "placement pass complete");
        Ok(placed)
    }

    fn placed(
        &self,
        category: RecordCategory,
        record: &RecordEntry,
        index: usize,
        cell: Cell,
        seed: u64,
    ) -> PlacedRecord {
        let id_seed = (seed ^ rng::hash_str(&record.id)) as i64;
        PlacedRecord {
            category,
            stable_id: record.id.clone(),
            row: cell.row,
            col: cell.col,
            position: self.layout.cell_center(cell),
            color: palette::color_for(category, index, id_seed),
            height: building_height(category, record.weight),
        }
    }
}

/// Building height for a record: a per-category base plus a span scaled by
/// the record's weight.
pub fn building_height(category: RecordCategory, weight: f32) -> f64 {
    let weight = f64::from(weight.clamp(0.0, 1.0));
    match category {
        RecordCategory::PrimaryTimeline => 8.0 + weight * 22.0,
        RecordCategory::SecondaryTimeline => 6.0 + weight * 14.0,
        RecordCategory::Project => 5.0 + weight * 12.0,
        RecordCategory::Interest => 3.0 + weight * 6.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use city_events::fixtures;

    fn allocator_5x5() -> PlacementAllocator {
        PlacementAllocator::new(GridLayout::new(10.0, 4.0, 5))
    }

    #[test]
    fn test_ring_index_zero_is_inner_top_left() {
        let mut alloc = allocator_5x5();
        let cell = alloc
            .resolve_ring(0, RecordCategory::PrimaryTimeline, OverflowPolicy::Error)
            .unwrap();
        assert_eq!(cell, Cell::new(1, 1));
    }

    #[test]
    fn test_spiral_excludes_ring_cells() {
        let alloc = allocator_5x5();
        let ring: Vec<Cell> = vec![
            Cell::new(1, 1),
            Cell::new(1, 2),
            Cell::new(1, 3),
            Cell::new(2, 1),
            Cell::new(2, 3),
            Cell::new(3, 1),
            Cell::new(3, 2),
            Cell::new(3, 3),
        ];
        for cell in &alloc.spiral_order {
            assert!(!ring.contains(cell), "spiral contains ring cell {:?}", cell);
        }
        assert_eq!(alloc.spiral_order[0], Cell::new(0, 0));
    }

    #[test]
    fn test_spiral_excludes_park() {
        let alloc = allocator_5x5();
        assert!(!alloc.spiral_order.contains(&alloc.park()));
    }

    #[test]
    fn test_ring_disjoint_within_capacity() {
        let mut alloc = allocator_5x5();
        let capacity = alloc.ring_capacity();
        let mut seen = HashSet::new();
        for index in 0..capacity {
            let cell = alloc
                .resolve_ring(index, RecordCategory::PrimaryTimeline, OverflowPolicy::Error)
                .unwrap();
            assert!(seen.insert(cell), "duplicate cell {:?}", cell);
            assert_ne!(cell, alloc.park());
        }
    }

    #[test]
    fn test_overflow_error_policy() {
        let mut alloc = allocator_5x5();
        let capacity = alloc.ring_capacity();
        let result = alloc.resolve_ring(
            capacity,
            RecordCategory::PrimaryTimeline,
            OverflowPolicy::Error,
        );
        assert!(matches!(
            result,
            Err(PlacementError::Overflow { requested, capacity: c, .. })
                if requested == capacity + 1 && c == capacity
        ));
    }

    #[test]
    fn test_overflow_wrap_policy_aliases() {
        let mut alloc = allocator_5x5();
        let capacity = alloc.ring_capacity();
        let first = alloc
            .resolve_ring(0, RecordCategory::PrimaryTimeline, OverflowPolicy::Wrap)
            .unwrap();
        let wrapped = alloc
            .resolve_ring(capacity, RecordCategory::PrimaryTimeline, OverflowPolicy::Wrap)
            .unwrap();
        assert_eq!(first, wrapped);
    }

    #[test]
    fn test_home_is_first_free_row_major() {
        let mut alloc = allocator_5x5();
        // Nothing allocated yet: (0,0) is free.
        assert_eq!(alloc.reserve_home(), Cell::new(0, 0));
    }

    #[test]
    fn test_home_moves_when_spiral_takes_the_corner() {
        let mut alloc = allocator_5x5();
        // Spiral index 0 occupies (0,0), so home shifts one cell right.
        alloc
            .resolve_spiral(0, 0, RecordCategory::Project, OverflowPolicy::Error)
            .unwrap();
        assert_eq!(alloc.reserve_home(), Cell::new(0, 1));
    }

    #[test]
    fn test_residual_skips_park_home_and_occupied() {
        let mut alloc = allocator_5x5();
        alloc
            .resolve_ring(0, RecordCategory::PrimaryTimeline, OverflowPolicy::Error)
            .unwrap();
        let home = alloc.reserve_home();
        let park = alloc.park();
        let mut seen = HashSet::new();
        let residual_len = alloc.residual_order.len();
        for index in 0..residual_len {
            let cell = alloc.resolve_residual(index);
            assert_ne!(cell, park);
            assert_ne!(cell, home);
            assert_ne!(cell, Cell::new(1, 1), "occupied ring cell reused");
            assert!(seen.insert(cell));
        }
    }

    #[test]
    fn test_residual_fallback_when_saturated() {
        let layout = GridLayout::new(10.0, 4.0, 3);
        let mut alloc = PlacementAllocator::new(layout);
        // A 3x3 grid has an 8-cell ring around the center park; fill it all.
        for index in 0..alloc.ring_capacity() {
            alloc
                .resolve_ring(index, RecordCategory::PrimaryTimeline, OverflowPolicy::Error)
                .unwrap();
        }
        // Every non-park cell is occupied, so the fallback order must still
        // produce cells (all cells minus park and home).
        let cell = alloc.resolve_residual(0);
        assert_ne!(cell, alloc.park());
        assert_ne!(cell, alloc.home().unwrap());
    }

    #[test]
    fn test_full_pass_is_disjoint_for_fixture_volume() {
        let records = fixtures::sample_records();
        let mut alloc = PlacementAllocator::new(GridLayout::new(10.0, 4.0, 9));
        let placed = alloc
            .place_records(&records, 42, OverflowPolicies::default())
            .unwrap();
        assert_eq!(placed.len(), records.len());

        let park = alloc.park();
        let home = alloc.home().unwrap();
        let mut seen = HashSet::new();
        for p in &placed {
            let cell = Cell::new(p.row, p.col);
            assert_ne!(cell, park, "{} landed on the park", p.stable_id);
            assert_ne!(cell, home, "{} landed on the home cell", p.stable_id);
            assert!(seen.insert(cell), "{} shares a cell", p.stable_id);
        }
    }

    #[test]
    fn test_full_pass_is_deterministic() {
        let records = fixtures::sample_records();
        let layout = GridLayout::new(10.0, 4.0, 9);
        let a = PlacementAllocator::new(layout)
            .place_records(&records, 7, OverflowPolicies::default())
            .unwrap();
        let b = PlacementAllocator::new(layout)
            .place_records(&records, 7, OverflowPolicies::default())
            .unwrap();
        for (pa, pb) in a.iter().zip(&b) {
            assert_eq!(pa.row, pb.row);
            assert_eq!(pa.col, pb.col);
            assert_eq!(pa.color, pb.color);
            assert_eq!(pa.height, pb.height);
        }
    }

    #[test]
    fn test_interleaved_spiral_categories_do_not_collide() {
        let mut alloc = allocator_5x5();
        let projects = 3;
        let mut seen = HashSet::new();
        for index in 0..projects {
            let cell = alloc
                .resolve_spiral(index, 0, RecordCategory::Project, OverflowPolicy::Error)
                .unwrap();
            assert!(seen.insert(cell));
        }
        for index in 0..2 {
            let cell = alloc
                .resolve_spiral(
                    index,
                    projects,
                    RecordCategory::SecondaryTimeline,
                    OverflowPolicy::Error,
                )
                .unwrap();
            assert!(seen.insert(cell), "secondary collided with projects");
        }
    }

    #[test]
    fn test_building_height_scales_with_weight() {
        let low = building_height(RecordCategory::PrimaryTimeline, 0.0);
        let high = building_height(RecordCategory::PrimaryTimeline, 1.0);
        assert!(high > low);
        // Weight is clamped.
        assert_eq!(building_height(RecordCategory::Interest, 2.0), 9.0);
    }
}
