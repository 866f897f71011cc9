use core::fmt;
use std::collections::BTreeSet;

use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Smallest accepted row or column count.
pub const MIN_DIMENSION: Coord = 8;

/// Default density, 10 mines for every 64 cells.
const DEFAULT_MINES_PER_64_CELLS: u32 = 10;

/// Binary mine layout of a rectangular board, stored as a set of row-major linear indices.
///
/// The shape is fixed at construction, only the placement can change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MineGridFields")]
pub struct MineGrid {
    size: Coord2,
    mine_count: CellCount,
    mine_indices: BTreeSet<CellCount>,
}

/// Unchecked serialized form, turned into a [`MineGrid`] only after validation.
#[derive(Deserialize)]
struct MineGridFields {
    size: Coord2,
    mine_count: CellCount,
    #[serde(default)]
    mine_indices: BTreeSet<CellCount>,
}

impl TryFrom<MineGridFields> for MineGrid {
    type Error = GameError;

    fn try_from(fields: MineGridFields) -> Result<Self> {
        let (rows, columns) = fields.size;
        let mut grid = Self::new(rows, columns, Some(fields.mine_count))?;

        // an empty set is a grid whose mines are not placed yet
        if !fields.mine_indices.is_empty() {
            if fields.mine_indices.len() != usize::from(grid.mine_count) {
                return Err(GameError::InvalidMineCount);
            }
            if fields.mine_indices.iter().any(|&index| index >= grid.cell_count()) {
                return Err(GameError::OutOfRange);
            }
            grid.mine_indices = fields.mine_indices;
        }

        Ok(grid)
    }
}

impl MineGrid {
    /// Validates the shape and mine count, mines are not placed yet.
    ///
    /// Without an explicit count the board gets `floor(cells * 10 / 64)` mines.
    pub fn new(rows: Coord, columns: Coord, mines: Option<CellCount>) -> Result<Self> {
        let size = Self::validate_size(rows, columns)?;
        let total = mult(rows, columns);
        let mine_count = match mines {
            Some(0) => return Err(GameError::InvalidMineCount),
            Some(mines) => mines,
            None => default_mine_count(total),
        };
        if mine_count >= total {
            return Err(GameError::InvalidMineCount);
        }

        Ok(Self {
            size,
            mine_count,
            mine_indices: BTreeSet::new(),
        })
    }

    /// Builds a grid with mines at exactly the given cells, duplicates collapse.
    pub fn from_mine_coords(rows: Coord, columns: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let size = Self::validate_size(rows, columns)?;
        let mut grid = Self {
            size,
            mine_count: 0,
            mine_indices: BTreeSet::new(),
        };

        for &coords in mine_coords {
            let index = grid.to_linear_index(coords)?;
            grid.mine_indices.insert(index);
        }

        let mine_count: CellCount = grid
            .mine_indices
            .len()
            .try_into()
            .map_err(|_| GameError::InvalidMineCount)?;
        if mine_count == 0 || mine_count >= grid.cell_count() {
            return Err(GameError::InvalidMineCount);
        }
        grid.mine_count = mine_count;

        Ok(grid)
    }

    fn validate_size(rows: Coord, columns: Coord) -> Result<Coord2> {
        if rows < MIN_DIMENSION || columns < MIN_DIMENSION {
            Err(GameError::InvalidDimension)
        } else {
            Ok((rows, columns))
        }
    }

    /// Clears the current placement and draws `mine_count` distinct cells uniformly.
    pub fn place_mines_randomly<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let total = self.cell_count();
        let wanted = usize::from(self.mine_count);

        self.mine_indices.clear();
        let mut draws: u32 = 0;
        while self.mine_indices.len() < wanted {
            // duplicates are simply drawn again
            self.mine_indices.insert(rng.random_range(0..total));
            draws += 1;
        }

        log::trace!(
            "Placed {} mines on {:?} with {} draws",
            self.mine_count,
            self.size,
            draws
        );
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn row_count(&self) -> Coord {
        self.size.0
    }

    pub fn column_count(&self) -> Coord {
        self.size.1
    }

    pub fn cell_count(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.cell_count() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn mine_indices(&self) -> &BTreeSet<CellCount> {
        &self.mine_indices
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.size.0 && coords.1 < self.size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfRange)
        }
    }

    pub fn to_linear_index(&self, coords: Coord2) -> Result<CellCount> {
        let (row, column) = self.validate_coords(coords)?;
        Ok(mult(row, self.size.1) + CellCount::from(column))
    }

    pub fn to_grid_coords(&self, index: CellCount) -> Result<Coord2> {
        if index >= self.cell_count() {
            return Err(GameError::OutOfRange);
        }
        let columns = CellCount::from(self.size.1);
        // both parts are below the grid dimensions, so they fit a Coord
        Ok(((index / columns) as Coord, (index % columns) as Coord))
    }

    /// Up to 8 adjacent cells in row-major order, clipped at the board edges.
    pub fn neighbor_coords(&self, coords: Coord2) -> Result<NeighborIter> {
        let coords = self.validate_coords(coords)?;
        Ok(self.iter_neighbors(coords))
    }

    pub fn is_mine(&self, coords: Coord2) -> Result<bool> {
        let coords = self.validate_coords(coords)?;
        Ok(self.contains_mine(coords))
    }

    pub fn count_adjacent_mines(&self, coords: Coord2) -> Result<u8> {
        let coords = self.validate_coords(coords)?;
        Ok(self.adjacent_mine_count(coords))
    }

    /// Mine mask laid out as `[row, column]`.
    pub fn mine_mask(&self) -> Array2<bool> {
        let mut mask: Array2<bool> = Array2::default(self.size.to_nd_index());
        let columns = CellCount::from(self.size.1);
        for &index in &self.mine_indices {
            mask[[usize::from(index / columns), usize::from(index % columns)]] = true;
        }
        mask
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size)
    }

    /// Caller guarantees `coords` are in bounds.
    pub(crate) fn contains_mine(&self, (row, column): Coord2) -> bool {
        let index = mult(row, self.size.1) + CellCount::from(column);
        self.mine_indices.contains(&index)
    }

    /// Caller guarantees `coords` are in bounds.
    pub(crate) fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors
        self.iter_neighbors(coords)
            .filter(|&pos| self.contains_mine(pos))
            .count() as u8
    }
}

/// `floor(total * 10 / 64)`, computed wide to avoid overflow on large boards.
pub fn default_mine_count(total: CellCount) -> CellCount {
    let mines = u32::from(total) * DEFAULT_MINES_PER_64_CELLS / 64;
    // always smaller than total
    mines as CellCount
}

impl fmt::Display for MineGrid {
    /// Binary matrix dump, `1` marks a mine.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.mine_mask().rows() {
            let mut first = true;
            for &is_mine in row {
                if !first {
                    f.write_str(" ")?;
                }
                first = false;
                f.write_str(if is_mine { "1" } else { "0" })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn new_rejects_small_dimensions() {
        assert_eq!(MineGrid::new(7, 8, Some(5)), Err(GameError::InvalidDimension));
        assert_eq!(MineGrid::new(8, 7, None), Err(GameError::InvalidDimension));
    }

    #[test]
    fn new_rejects_bad_mine_counts() {
        assert_eq!(MineGrid::new(8, 8, Some(64)), Err(GameError::InvalidMineCount));
        assert_eq!(MineGrid::new(8, 8, Some(0)), Err(GameError::InvalidMineCount));
        assert!(MineGrid::new(8, 8, Some(63)).is_ok());
    }

    #[test]
    fn new_defaults_to_reference_density() {
        assert_eq!(MineGrid::new(8, 8, None).unwrap().mine_count(), 10);
        assert_eq!(MineGrid::new(12, 24, None).unwrap().mine_count(), 45);
        assert_eq!(MineGrid::new(255, 255, None).unwrap().mine_count(), 10160);
    }

    #[test]
    fn linear_index_round_trips() {
        for (rows, columns) in [(8, 8), (12, 24), (30, 9)] {
            let grid = MineGrid::new(rows, columns, None).unwrap();
            for row in 0..rows {
                for column in 0..columns {
                    let index = grid.to_linear_index((row, column)).unwrap();
                    assert_eq!(
                        index,
                        CellCount::from(row) * CellCount::from(columns) + CellCount::from(column)
                    );
                    assert_eq!(grid.to_grid_coords(index).unwrap(), (row, column));
                }
            }
        }
    }

    #[test]
    fn conversions_reject_out_of_range() {
        let grid = MineGrid::new(8, 10, None).unwrap();

        assert_eq!(grid.to_linear_index((8, 0)), Err(GameError::OutOfRange));
        assert_eq!(grid.to_linear_index((0, 10)), Err(GameError::OutOfRange));
        assert_eq!(grid.to_grid_coords(80), Err(GameError::OutOfRange));
        assert_eq!(grid.is_mine((9, 9)), Err(GameError::OutOfRange));
        assert!(grid.neighbor_coords((8, 8)).is_err());
    }

    #[test]
    fn placement_has_exact_count() {
        let mut rng = SmallRng::seed_from_u64(7);
        for (rows, columns, mines) in [(8, 8, 10), (8, 8, 63), (12, 24, 30), (16, 30, 99)] {
            let mut grid = MineGrid::new(rows, columns, Some(mines)).unwrap();
            grid.place_mines_randomly(&mut rng);
            assert_eq!(grid.mine_indices().len(), usize::from(mines));
            assert!(grid.mine_indices().iter().all(|&index| index < grid.cell_count()));
        }
    }

    #[test]
    fn placement_clears_previous_layout() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut grid = MineGrid::new(8, 8, Some(1)).unwrap();

        for _ in 0..16 {
            grid.place_mines_randomly(&mut rng);
            assert_eq!(grid.mine_indices().len(), 1);
        }
    }

    #[test]
    fn corner_has_three_neighbors() {
        let grid = MineGrid::new(8, 8, None).unwrap();
        let neighbors: Vec<_> = grid.neighbor_coords((0, 0)).unwrap().collect();

        assert_eq!(neighbors, vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn interior_has_eight_neighbors() {
        let grid = MineGrid::new(12, 24, None).unwrap();

        assert_eq!(grid.neighbor_coords((4, 4)).unwrap().count(), 8);
    }

    #[test]
    fn counts_adjacent_mines() {
        let grid = MineGrid::from_mine_coords(8, 8, &[(0, 0), (0, 1), (2, 2)]).unwrap();

        assert_eq!(grid.count_adjacent_mines((1, 1)).unwrap(), 3);
        assert_eq!(grid.count_adjacent_mines((0, 0)).unwrap(), 1);
        assert_eq!(grid.count_adjacent_mines((7, 7)).unwrap(), 0);
        assert!(grid.is_mine((2, 2)).unwrap());
        assert!(!grid.is_mine((1, 1)).unwrap());
    }

    #[test]
    fn from_mine_coords_collapses_duplicates() {
        let grid = MineGrid::from_mine_coords(8, 8, &[(3, 3), (3, 3)]).unwrap();

        assert_eq!(grid.mine_count(), 1);
        assert_eq!(
            MineGrid::from_mine_coords(8, 8, &[]),
            Err(GameError::InvalidMineCount)
        );
        assert_eq!(
            MineGrid::from_mine_coords(8, 8, &[(8, 0)]),
            Err(GameError::OutOfRange)
        );
    }

    #[test]
    fn displays_binary_matrix() {
        let grid = MineGrid::from_mine_coords(8, 8, &[(0, 1), (7, 7)]).unwrap();
        let dump = grid.to_string();
        let lines: Vec<_> = dump.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "0 1 0 0 0 0 0 0");
        assert_eq!(lines[7], "0 0 0 0 0 0 0 1");
    }

    #[test]
    fn deserialize_keeps_placement() {
        let grid = MineGrid::from_mine_coords(8, 8, &[(0, 1), (7, 7)]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<MineGrid>(&json).unwrap(), grid);

        let unplaced: MineGrid =
            serde_json::from_str(r#"{"size":[8,8],"mine_count":10}"#).unwrap();
        assert_eq!(unplaced.mine_count(), 10);
        assert!(unplaced.mine_indices().is_empty());
    }

    #[test]
    fn deserialize_rejects_invalid_grids() {
        for json in [
            r#"{"size":[2,2],"mine_count":9,"mine_indices":[]}"#,
            r#"{"size":[8,8],"mine_count":64,"mine_indices":[]}"#,
            r#"{"size":[8,8],"mine_count":0,"mine_indices":[]}"#,
            r#"{"size":[8,8],"mine_count":2,"mine_indices":[1]}"#,
            r#"{"size":[8,8],"mine_count":2,"mine_indices":[1,64]}"#,
        ] {
            assert!(serde_json::from_str::<MineGrid>(json).is_err(), "{}", json);
        }
    }
}
