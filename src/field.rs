// OgmaNeo Rust port - receptive field geometry and weight indexing

use crate::helpers::*;

/// Square window of a visible layer seen by one hidden column.
///
/// The window is centred on the hidden column projected onto the visible
/// layer and spans `2 * radius + 1` cells per axis. Parts of it may hang
/// over the layer edge; [`positions`](Self::positions) only yields the
/// in-bounds cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReceptiveField {
    pub diam: i32,
    pub field_lower_bound: Int2,
    pub iter_lower_bound: Int2,
    pub iter_upper_bound: Int2,
    pub visible_size: Int2,
}

impl ReceptiveField {
    pub fn new(column_pos: Int2, h_to_v: Float2, visible_size: Int3, radius: i32) -> Self {
        let visible_center = project(column_pos, h_to_v);
        let field_lower_bound =
            Int2::new(visible_center.x - radius, visible_center.y - radius);

        Self {
            diam: radius * 2 + 1,
            field_lower_bound,
            iter_lower_bound: Int2::new(field_lower_bound.x.max(0), field_lower_bound.y.max(0)),
            iter_upper_bound: Int2::new(
                (visible_center.x + radius).min(visible_size.x - 1),
                (visible_center.y + radius).min(visible_size.y - 1),
            ),
            visible_size: Int2::new(visible_size.x, visible_size.y),
        }
    }

    /// Offset of `visible_pos` inside the full (unclipped) window.
    pub fn offset(&self, visible_pos: Int2) -> Int2 {
        Int2::new(
            visible_pos.x - self.field_lower_bound.x,
            visible_pos.y - self.field_lower_bound.y,
        )
    }

    /// In-bounds cells as `(visible_column_index, offset)`, x-major.
    pub fn positions(&self) -> impl Iterator<Item = (usize, Int2)> + '_ {
        (self.iter_lower_bound.x..=self.iter_upper_bound.x).flat_map(move |ix| {
            (self.iter_lower_bound.y..=self.iter_upper_bound.y).map(move |iy| {
                let pos = Int2::new(ix, iy);
                (address2(pos, self.visible_size), self.offset(pos))
            })
        })
    }
}

/// Size of one hidden column's contiguous block of weights.
pub fn weights_per_column(hidden_column_size: i32, radius: i32, visible_column_size: i32) -> usize {
    let diam = (radius * 2 + 1) as usize;
    hidden_column_size as usize * diam * diam * visible_column_size as usize
}

/// Index of a weight inside its hidden column's block.
///
/// `hidden_ci + hz * (offset.y + diam * (offset.x + diam * visible_ci))`
pub fn column_weight_index(
    hidden_ci: usize,
    offset: Int2,
    visible_ci: usize,
    hidden_column_size: i32,
    diam: i32,
) -> usize {
    hidden_ci
        + hidden_column_size as usize
            * (offset.y as usize + diam as usize * (offset.x as usize + diam as usize * visible_ci))
}

/// Flat index of the weight linking (hidden column, hidden cell, field offset,
/// visible cell) in a visible layer's weight tensor.
pub fn weight_index(
    hidden_column_index: usize,
    hidden_ci: usize,
    offset: Int2,
    visible_ci: usize,
    hidden_column_size: i32,
    radius: i32,
    visible_column_size: i32,
) -> usize {
    hidden_column_index * weights_per_column(hidden_column_size, radius, visible_column_size)
        + column_weight_index(hidden_ci, offset, visible_ci, hidden_column_size, radius * 2 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_field_is_full() {
        let field = ReceptiveField::new(
            Int2::new(2, 2),
            Float2::new(1.0, 1.0),
            Int3::new(5, 5, 4),
            1,
        );
        assert_eq!(field.positions().count(), 9);
        assert_eq!(field.field_lower_bound, Int2::new(1, 1));
    }

    #[test]
    fn test_corner_field_skips_overhang() {
        let field = ReceptiveField::new(
            Int2::new(0, 0),
            Float2::new(1.0, 1.0),
            Int3::new(2, 2, 2),
            1,
        );
        assert_eq!(field.field_lower_bound, Int2::new(-1, -1));

        let (columns, offsets): (Vec<usize>, Vec<Int2>) = field.positions().unzip();
        assert_eq!(columns, vec![0, 1, 2, 3]);
        assert_eq!(
            offsets,
            vec![Int2::new(1, 1), Int2::new(1, 2), Int2::new(2, 1), Int2::new(2, 2)]
        );
    }

    #[test]
    fn test_positions_yield_visible_column_indices() {
        let field = ReceptiveField::new(
            Int2::new(1, 1),
            Float2::new(1.0, 1.0),
            Int3::new(2, 2, 2),
            0,
        );
        let positions: Vec<(usize, Int2)> = field.positions().collect();
        assert_eq!(positions, vec![(3, Int2::new(0, 0))]);
    }

    #[test]
    fn test_weight_index_is_column_contiguous() {
        let (hz, radius, vz) = (3, 1, 2);
        let per_column = weights_per_column(hz, radius, vz);
        assert_eq!(per_column, 3 * 9 * 2);

        // first and last weight of column 1 bracket its block
        assert_eq!(weight_index(1, 0, Int2::new(0, 0), 0, hz, radius, vz), per_column);
        assert_eq!(
            weight_index(1, 2, Int2::new(2, 2), 1, hz, radius, vz),
            2 * per_column - 1
        );
    }

    #[test]
    fn test_weight_index_is_injective() {
        let (hz, radius, vz) = (2, 1, 3);
        let diam = radius * 2 + 1;
        let mut seen = std::collections::HashSet::new();
        for column in 0..4 {
            for hc in 0..hz as usize {
                for ox in 0..diam {
                    for oy in 0..diam {
                        for vc in 0..vz as usize {
                            let wi =
                                weight_index(column, hc, Int2::new(ox, oy), vc, hz, radius, vz);
                            assert!(seen.insert(wi));
                        }
                    }
                }
            }
        }
        assert_eq!(seen.len(), 4 * weights_per_column(hz, radius, vz));
    }
}
