use std::collections::HashMap;

/// Integer grid coordinate of a bucket.
pub type Cell = (i32, i32);

#[derive(Clone, Debug)]
/// Uniform-grid spatial index over entity positions.
///
/// Buckets hold indices into the slice the index was last rebuilt from, so
/// the index is only meaningful until that slice is reordered or resized.
/// Rebuild it once per tick before querying.
///
/// # Query semantics
/// Queries are conservative: they return every entity stored in any cell the
/// square `[x-r, x+r] x [y-r, y+r]` overlaps. Callers must re-filter by exact
/// squared distance.
///
/// # Implementation Notes
/// - Cells are unbounded (`floor(x / cell_size)`), so entities outside the
///   arena are still indexed and found.
/// - Non-finite positions are skipped at rebuild time.
/// - Bucket vectors are reused across rebuilds to avoid reallocation.
///
/// # Examples
/// ```
/// use swimbots_core::spatial_hash::SpatialHash;
///
/// let mut index = SpatialHash::new(10.0);
/// let positions = vec![(15.0, 15.0), (25.0, 25.0), (85.0, 85.0)];
/// index.rebuild(&positions, |p| *p);
///
/// let mut nearby = Vec::new();
/// index.query_into(15.0, 15.0, 20.0, &mut nearby);
/// assert!(nearby.contains(&0) && nearby.contains(&1));
/// ```
pub struct SpatialHash {
    pub cell_size: f64,
    buckets: HashMap<Cell, Vec<usize>>,
    len: usize,
}

impl SpatialHash {
    /// Creates an empty index. `cell_size` must be positive and finite; the
    /// world validates this before constructing its indices.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            buckets: HashMap::new(),
            len: 0,
        }
    }

    /// Number of entities indexed by the last rebuild.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cell containing a world coordinate, or `None` for non-finite input
    /// or coordinates too large for an `i32` cell.
    #[inline]
    pub fn cell_of(&self, x: f64, y: f64) -> Option<Cell> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let cx = (x / self.cell_size).floor();
        let cy = (y / self.cell_size).floor();
        if cx.abs() > i32::MAX as f64 || cy.abs() > i32::MAX as f64 {
            return None;
        }
        Some((cx as i32, cy as i32))
    }

    /// Clears every bucket and re-inserts `items` by position.
    pub fn rebuild<T, F>(&mut self, items: &[T], position: F)
    where
        F: Fn(&T) -> (f64, f64),
    {
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
        self.len = 0;

        for (idx, item) in items.iter().enumerate() {
            let (x, y) = position(item);
            if let Some(cell) = self.cell_of(x, y) {
                self.buckets.entry(cell).or_default().push(idx);
                self.len += 1;
            }
        }

        // Drop buckets that stayed empty so the map does not grow without bound
        // as entities drift across the arena.
        self.buckets.retain(|_, bucket| !bucket.is_empty());
    }

    /// Cell span of the query square, saturated to the `i32` grid so that
    /// huge radii still cover every occupied cell.
    fn cell_range(&self, x: f64, y: f64, radius: f64) -> Option<(Cell, Cell)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let r = if radius.is_nan() { 0.0 } else { radius.max(0.0) };
        // `as` saturates on overflow and maps infinities to the i32 bounds.
        let cell = |v: f64| (v / self.cell_size).floor() as i32;
        Some(((cell(x - r), cell(y - r)), (cell(x + r), cell(y + r))))
    }

    /// Visits every candidate index in the cells overlapping the query square.
    pub fn query_callback<F>(&self, x: f64, y: f64, radius: f64, mut callback: F)
    where
        F: FnMut(usize),
    {
        let Some(((min_cx, min_cy), (max_cx, max_cy))) = self.cell_range(x, y, radius) else {
            return;
        };

        // Sparse walk when the square covers more cells than are occupied.
        let span = (i128::from(max_cx) - i128::from(min_cx) + 1)
            * (i128::from(max_cy) - i128::from(min_cy) + 1);
        if span > self.buckets.len() as i128 {
            // Sorted so candidate order does not depend on the hasher state.
            let mut cells: Vec<Cell> = self
                .buckets
                .keys()
                .copied()
                .filter(|&(cx, cy)| cx >= min_cx && cx <= max_cx && cy >= min_cy && cy <= max_cy)
                .collect();
            cells.sort_unstable_by_key(|&(cx, cy)| (cy, cx));
            for cell in cells {
                if let Some(bucket) = self.buckets.get(&cell) {
                    bucket.iter().for_each(|&idx| callback(idx));
                }
            }
            return;
        }

        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                if let Some(bucket) = self.buckets.get(&(cx, cy)) {
                    bucket.iter().for_each(|&idx| callback(idx));
                }
            }
        }
    }

    #[inline]
    pub fn query_into(&self, x: f64, y: f64, radius: f64, result: &mut Vec<usize>) {
        result.clear();
        self.query_callback(x, y, radius, |idx| result.push(idx));
    }

    /// Allocating variant of [`query_into`](Self::query_into).
    pub fn query_radius(&self, x: f64, y: f64, radius: f64) -> Vec<usize> {
        let mut result = Vec::new();
        self.query_into(x, y, radius, &mut result);
        result
    }

    pub fn count_nearby(&self, x: f64, y: f64, radius: f64) -> usize {
        let mut count = 0;
        self.query_callback(x, y, radius, |_| count += 1);
        count
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_spatial_hash_query_finds_nearby() {
        let mut sh = SpatialHash::new(5.0);
        let data = vec![(1.0, 1.0), (2.0, 2.0), (10.0, 10.0)];
        sh.rebuild(&data, |p| *p);

        let mut count = 0;
        sh.query_callback(1.5, 1.5, 2.0, |_| count += 1);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_spatial_hash_insert_and_query_same_cell() {
        let mut sh = SpatialHash::new(5.0);
        sh.rebuild(&[(1.0, 1.0)], |p| *p);
        assert_eq!(sh.query_radius(1.0, 1.0, 1.0), vec![0]);
    }

    #[test]
    fn test_spatial_hash_clear() {
        let mut sh = SpatialHash::new(5.0);
        sh.rebuild(&[(1.0, 1.0)], |p| *p);
        sh.rebuild(&[] as &[(f64, f64)], |p| *p);
        assert_eq!(sh.count_nearby(1.0, 1.0, 10.0), 0);
        assert!(sh.is_empty());
    }

    #[test]
    fn test_negative_coordinates_use_floor() {
        let sh = SpatialHash::new(10.0);
        assert_eq!(sh.cell_of(-0.5, 0.5), Some((-1, 0)));
        assert_eq!(sh.cell_of(9.99, -10.0), Some((0, -1)));

        let mut sh = SpatialHash::new(10.0);
        sh.rebuild(&[(-5.0, -5.0), (5.0, 5.0)], |p| *p);
        let mut found = sh.query_radius(0.0, 0.0, 1.0);
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn test_non_finite_positions_are_skipped() {
        let mut sh = SpatialHash::new(10.0);
        sh.rebuild(&[(f64::NAN, 1.0), (1.0, 1.0), (f64::INFINITY, 0.0)], |p| *p);
        assert_eq!(sh.len(), 1);
        assert_eq!(sh.query_radius(1.0, 1.0, 5.0), vec![1]);
        assert!(sh.query_radius(f64::NAN, 0.0, 5.0).is_empty());
    }

    #[test]
    fn test_query_is_conservative() {
        let mut sh = SpatialHash::new(10.0);
        // Same cell as the query point but farther than the radius.
        sh.rebuild(&[(9.0, 9.0)], |p| *p);
        assert_eq!(sh.query_radius(0.5, 0.5, 1.0), vec![0]);
    }

    #[test]
    fn test_huge_radius_uses_sparse_walk() {
        let mut sh = SpatialHash::new(1.0);
        let data: Vec<(f64, f64)> = (0..10).map(|i| (i as f64 * 100.0, 0.0)).collect();
        sh.rebuild(&data, |p| *p);
        assert_eq!(sh.count_nearby(0.0, 0.0, 1.0e6), 10);
    }

    #[test]
    fn test_radius_past_grid_limits_still_finds_entities() {
        let mut sh = SpatialHash::new(1.0);
        sh.rebuild(&[(0.0, 0.0)], |p| *p);
        assert_eq!(sh.query_radius(0.0, 0.0, 2.0e9), vec![0]);
        assert_eq!(sh.query_radius(0.0, 0.0, 1.0e10), vec![0]);
        assert_eq!(sh.query_radius(0.0, 0.0, f64::MAX), vec![0]);
        assert_eq!(sh.query_radius(0.0, 0.0, f64::INFINITY), vec![0]);
        assert_eq!(sh.query_radius(0.0, 0.0, f64::NAN), vec![0]);
    }

    #[test]
    fn test_sparse_walk_order_is_stable() {
        let data: Vec<(f64, f64)> = (0..50)
            .map(|i| ((i * 37 % 500) as f64, (i * 91 % 300) as f64))
            .collect();
        let mut a = SpatialHash::new(7.0);
        let mut b = SpatialHash::new(7.0);
        a.rebuild(&data, |p| *p);
        b.rebuild(&data, |p| *p);
        let (qa, qb) = (a.query_radius(250.0, 150.0, 1.0e5), b.query_radius(250.0, 150.0, 1.0e5));
        assert_eq!(qa.len(), 50);
        assert_eq!(qa, qb);
        // Row-major cell order.
        let cells: Vec<_> = qa.iter().map(|&i| a.cell_of(data[i].0, data[i].1).unwrap()).collect();
        assert!(cells.windows(2).all(|w| (w[0].1, w[0].0) <= (w[1].1, w[1].0)));
    }
}
