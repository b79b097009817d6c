//! Axis reordering of the sparse block list into a dense 3-D layout.

use crate::types::{Axis, Structure};

/// Dense array of palette indices, indexed `[primary][row][col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout3D {
    dims: [usize; 3],
    cells: Vec<usize>,
}

impl Layout3D {
    fn new(dims: [usize; 3], fill: usize) -> Self {
        Self {
            dims,
            cells: vec![fill; dims[0] * dims[1] * dims[2]],
        }
    }

    /// Axis lengths as `[primary, row, col]`.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Number of layers along the primary axis.
    pub fn layer_count(&self) -> usize {
        self.dims[0]
    }

    pub fn get(&self, primary: usize, row: usize, col: usize) -> usize {
        self.cells[(primary * self.dims[1] + row) * self.dims[2] + col]
    }

    fn set(&mut self, primary: usize, row: usize, col: usize, value: usize) {
        self.cells[(primary * self.dims[1] + row) * self.dims[2] + col] = value;
    }

    /// Borrow one layer as a 2-D view.
    pub fn layer(&self, primary: usize) -> LayerSlice<'_> {
        let stride = self.dims[1] * self.dims[2];
        LayerSlice {
            rows: self.dims[1],
            cols: self.dims[2],
            cells: &self.cells[primary * stride..(primary + 1) * stride],
        }
    }
}

/// A borrowed 2-D slice of a [`Layout3D`].
#[derive(Debug, Clone, Copy)]
pub struct LayerSlice<'a> {
    rows: usize,
    cols: usize,
    cells: &'a [usize],
}

impl LayerSlice<'_> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> usize {
        self.cells[row * self.cols + col]
    }
}

/// Reorder the structure's block list into a dense layout with the chosen
/// axis as the layer axis.
///
/// Cells no block writes to default to the palette's air entry when one
/// exists, else to index 0. Duplicate positions overwrite silently
/// (last-wins); vanilla structure files do not produce them.
pub fn slice(structure: &Structure, axis: Axis) -> Layout3D {
    let order = axis.order();
    let dims = [
        structure.size[order[0]] as usize,
        structure.size[order[1]] as usize,
        structure.size[order[2]] as usize,
    ];

    let fill = structure.air_index().unwrap_or(0);
    let mut layout = Layout3D::new(dims, fill);

    for block in &structure.blocks {
        layout.set(
            block.pos[order[0]] as usize,
            block.pos[order[1]] as usize,
            block.pos[order[2]] as usize,
            block.state,
        );
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockState, PositionedBlock};
    use glam::{IVec3, UVec3};

    fn structure(size: (u32, u32, u32), blocks: Vec<PositionedBlock>) -> Structure {
        Structure {
            size: UVec3::new(size.0, size.1, size.2),
            blocks,
            palette: vec![
                BlockState::new("minecraft:air"),
                BlockState::new("minecraft:stone"),
                BlockState::new("minecraft:dirt"),
            ],
        }
    }

    #[test]
    fn test_dims_follow_axis_permutation() {
        let s = structure((2, 3, 4), vec![]);
        assert_eq!(slice(&s, Axis::X).dims(), [2, 4, 3]);
        assert_eq!(slice(&s, Axis::Y).dims(), [3, 4, 2]);
        assert_eq!(slice(&s, Axis::Z).dims(), [4, 2, 3]);
    }

    #[test]
    fn test_blocks_land_at_permuted_coordinates() {
        let s = structure(
            (2, 3, 4),
            vec![PositionedBlock::new(IVec3::new(1, 2, 3), 1)],
        );

        // y layout: primary = y, row = z, col = x.
        let layout = slice(&s, Axis::Y);
        assert_eq!(layout.get(2, 3, 1), 1);

        // Everything else stays air.
        let non_air: usize = (0..3)
            .flat_map(|p| (0..4).flat_map(move |r| (0..2).map(move |c| (p, r, c))))
            .filter(|&(p, r, c)| layout.get(p, r, c) != 0)
            .count();
        assert_eq!(non_air, 1);
    }

    #[test]
    fn test_unwritten_cells_default_to_air_index() {
        let mut s = structure((1, 1, 1), vec![]);
        // Air is not palette entry 0 here.
        s.palette = vec![
            BlockState::new("minecraft:stone"),
            BlockState::new("minecraft:air"),
        ];
        let layout = slice(&s, Axis::Y);
        assert_eq!(layout.get(0, 0, 0), 1);
    }

    #[test]
    fn test_duplicate_positions_last_write_wins() {
        let s = structure(
            (1, 1, 1),
            vec![
                PositionedBlock::new(IVec3::ZERO, 1),
                PositionedBlock::new(IVec3::ZERO, 2),
            ],
        );
        let layout = slice(&s, Axis::Y);
        assert_eq!(layout.get(0, 0, 0), 2);
    }

    #[test]
    fn test_layer_view() {
        let s = structure(
            (2, 2, 1),
            vec![
                PositionedBlock::new(IVec3::new(0, 1, 0), 1),
                PositionedBlock::new(IVec3::new(1, 1, 0), 2),
            ],
        );
        let layout = slice(&s, Axis::Y);
        let layer = layout.layer(1);
        assert_eq!((layer.rows(), layer.cols()), (1, 2));
        assert_eq!(layer.get(0, 0), 1);
        assert_eq!(layer.get(0, 1), 2);
    }
}
