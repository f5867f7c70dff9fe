// Implements an unbounded uniform spatial hash for broad-phase collision detection.

use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::collision::Aabb;

/// Grid coordinates of a cell.
pub type CellKey = (i32, i32);

/// Inclusive rectangular range of cells covered by a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub min_col: i32,
    pub min_row: i32,
    pub max_col: i32,
    pub max_row: i32,
}

impl CellRange {
    /// Number of cells in the range.
    pub fn cell_count(&self) -> u64 {
        let cols = (i64::from(self.max_col) - i64::from(self.min_col) + 1) as u64;
        let rows = (i64::from(self.max_row) - i64::from(self.min_row) + 1) as u64;
        cols.saturating_mul(rows)
    }

    pub fn contains(&self, (col, row): CellKey) -> bool {
        col >= self.min_col && col <= self.max_col && row >= self.min_row && row <= self.max_row
    }

    fn cells(self) -> impl Iterator<Item = CellKey> {
        (self.min_row..=self.max_row).flat_map(move |row| (self.min_col..=self.max_col).map(move |col| (col, row)))
    }
}

/// Occupancy figures for debug overlays and tooling dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SpatialHashStats {
    pub cell_count: usize,
    pub entity_count: usize,
    pub average_entities_per_cell: f64,
    pub max_entities_per_cell: usize,
}

/// A uniform grid keyed by cell coordinates, covering the whole plane.
///
/// Every entry occupies exactly the cells its bounding box spans. A reverse map from
/// key to cell range makes removal proportional to the number of occupied cells.
#[derive(Debug)]
pub struct SpatialHash<K> {
    cell_size: f64,
    inv_cell_size: f64,
    cells: FxHashMap<CellKey, Vec<K>>,
    occupied: FxHashMap<K, CellRange>,

    // Temporary storage to avoid allocations during queries
    query_seen: FxHashSet<K>,
}

impl<K: Copy + Eq + Hash> SpatialHash<K> {
    /// Creates a new SpatialHash. `cell_size` must be positive and finite.
    pub fn new(cell_size: f64) -> Self {
        debug_assert!(cell_size.is_finite() && cell_size > 0.0, "Cell size must be positive");
        SpatialHash {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: FxHashMap::default(),
            occupied: FxHashMap::default(),
            query_seen: FxHashSet::default(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Determines the range of grid cells overlapped by a box. A zero-size box still
    /// resolves to the single cell containing it. Non-finite boxes have no range.
    pub fn cell_range(&self, bounds: &Aabb) -> Option<CellRange> {
        if !bounds.is_finite() {
            return None;
        }
        let to_cell = |v: f64| (v * self.inv_cell_size).floor() as i32;
        Some(CellRange {
            min_col: to_cell(bounds.min.x),
            min_row: to_cell(bounds.min.y),
            max_col: to_cell(bounds.max.x),
            max_row: to_cell(bounds.max.y),
        })
    }

    /// Inserts `key` into every cell `bounds` spans, replacing any previous membership.
    /// Returns `false` (leaving the key absent) when the bounds are not finite.
    pub fn insert(&mut self, key: K, bounds: &Aabb) -> bool {
        self.remove(key);
        let Some(range) = self.cell_range(bounds) else {
            return false;
        };
        for cell in range.cells() {
            self.cells.entry(cell).or_default().push(key);
        }
        self.occupied.insert(key, range);
        true
    }

    /// Moves `key` to new bounds, touching the cells only if its range changed.
    pub fn update(&mut self, key: K, bounds: &Aabb) -> bool {
        match (self.occupied.get(&key), self.cell_range(bounds)) {
            (Some(current), Some(next)) if *current == next => true,
            _ => self.insert(key, bounds),
        }
    }

    /// Removes `key` from every cell it occupies. Unknown keys are a no-op.
    pub fn remove(&mut self, key: K) -> bool {
        let Some(range) = self.occupied.remove(&key) else {
            return false;
        };
        for cell in range.cells() {
            if let Some(members) = self.cells.get_mut(&cell) {
                members.retain(|k| *k != key);
                if members.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
        true
    }

    pub fn contains(&self, key: K) -> bool {
        self.occupied.contains_key(&key)
    }

    /// Clears all entries from the grid.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.occupied.clear();
    }

    /// Writes every key found in the cells `bounds` spans into `out`, each once.
    /// `out` is cleared first.
    pub fn query_into(&mut self, bounds: &Aabb, out: &mut Vec<K>) {
        out.clear();
        self.query_seen.clear();
        let Some(range) = self.cell_range(bounds) else {
            return;
        };

        // Huge query boxes (long rays) walk the occupied cells instead of the range.
        if range.cell_count() > self.cells.len() as u64 {
            for (cell, members) in &self.cells {
                if range.contains(*cell) {
                    Self::collect_unique(members, &mut self.query_seen, out);
                }
            }
        } else {
            for cell in range.cells() {
                if let Some(members) = self.cells.get(&cell) {
                    Self::collect_unique(members, &mut self.query_seen, out);
                }
            }
        }
    }

    /// Allocating convenience over [`SpatialHash::query_into`].
    pub fn query(&mut self, bounds: &Aabb) -> Vec<K> {
        let mut out = Vec::new();
        self.query_into(bounds, &mut out);
        out
    }

    fn collect_unique(members: &[K], seen: &mut FxHashSet<K>, out: &mut Vec<K>) {
        for key in members {
            if seen.insert(*key) {
                out.push(*key);
            }
        }
    }

    pub fn stats(&self) -> SpatialHashStats {
        let cell_count = self.cells.len();
        let memberships: usize = self.cells.values().map(Vec::len).sum();
        SpatialHashStats {
            cell_count,
            entity_count: self.occupied.len(),
            average_entities_per_cell: if cell_count == 0 {
                0.0
            } else {
                memberships as f64 / cell_count as f64
            },
            max_entities_per_cell: self.cells.values().map(Vec::len).max().unwrap_or(0),
        }
    }
}
