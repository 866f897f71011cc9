/// Single coordinate axis used for row/column counts and positions.
pub type Coord = u8;

/// Count type used for mine counts, cell counts and linear indices.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, column)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Row-major walk over the 3x3 block around a cell, clipped to the board and
/// skipping the cell itself.
#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Coord2,
    first_column: Coord,
    last: Coord2,
    cursor: Option<Coord2>,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord2, bounds: Coord2) -> Self {
        let (row, column) = center;
        let (rows, columns) = bounds;
        let last_row = row.saturating_add(1).min(rows.saturating_sub(1));
        let last_column = column.saturating_add(1).min(columns.saturating_sub(1));
        let first_column = column.saturating_sub(1);

        Self {
            center,
            first_column,
            last: (last_row, last_column),
            cursor: Some((row.saturating_sub(1), first_column)),
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current @ (row, column) = self.cursor?;
            self.cursor = if column < self.last.1 {
                Some((row, column + 1))
            } else if row < self.last.0 {
                Some((row + 1, self.first_column))
            } else {
                None
            };

            if current != self.center {
                return Some(current);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_scan_row_major() {
        let neighbors: Vec<_> = NeighborIter::new((1, 1), (3, 3)).collect();

        assert_eq!(
            neighbors,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)]
        );
    }

    #[test]
    fn neighbors_clip_at_far_edge() {
        let neighbors: Vec<_> = NeighborIter::new((7, 7), (8, 8)).collect();

        assert_eq!(neighbors, vec![(6, 6), (6, 7), (7, 6)]);
    }

    #[test]
    fn neighbors_clip_at_origin() {
        let neighbors: Vec<_> = NeighborIter::new((0, 0), (8, 8)).collect();

        assert_eq!(neighbors, vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn neighbors_along_top_edge() {
        let neighbors: Vec<_> = NeighborIter::new((0, 4), (8, 8)).collect();

        assert_eq!(neighbors, vec![(0, 3), (0, 5), (1, 3), (1, 4), (1, 5)]);
    }

    #[test]
    fn mult_saturates() {
        assert_eq!(mult(8, 8), 64);
        assert_eq!(mult(255, 255), 65025);
    }
}
