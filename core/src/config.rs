use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Board parameters chosen by the player before a game starts.
///
/// Without `mines` the board uses the default density of [`default_mine_count`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: Coord,
    pub columns: Coord,
    pub mines: Option<CellCount>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(MIN_DIMENSION, MIN_DIMENSION, None)
    }
}

impl GameConfig {
    pub const fn new(rows: Coord, columns: Coord, mines: Option<CellCount>) -> Self {
        Self {
            rows,
            columns,
            mines,
        }
    }

    pub fn build_grid(&self) -> Result<MineGrid> {
        MineGrid::new(self.rows, self.columns, self.mines)
    }

    pub fn validate(&self) -> Result<()> {
        self.build_grid().map(|_| ())
    }
}

impl FromStr for GameConfig {
    type Err = GameError;

    /// Parses `"rows, columns[, mines]"`, ignoring surrounding commas and whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let fields = s
            .trim_matches(|c: char| c == ',' || c.is_whitespace())
            .split(',')
            .map(|field| field.trim().parse::<i64>())
            .collect::<core::result::Result<Vec<_>, _>>()
            .map_err(|_| GameError::InvalidConfig)?;

        let (rows, columns, mines) = match *fields.as_slice() {
            [rows, columns] => (rows, columns, None),
            [rows, columns, mines] => (rows, columns, Some(mines)),
            _ => return Err(GameError::InvalidConfig),
        };

        let rows = Coord::try_from(rows).map_err(|_| GameError::InvalidDimension)?;
        let columns = Coord::try_from(columns).map_err(|_| GameError::InvalidDimension)?;
        let mines = mines
            .map(|mines| CellCount::try_from(mines).map_err(|_| GameError::InvalidMineCount))
            .transpose()?;

        let config = Self::new(rows, columns, mines);
        config.validate()?;
        Ok(config)
    }
}

impl fmt::Display for GameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.rows, self.columns)?;
        if let Some(mines) = self.mines {
            write!(f, ", {}", mines)?;
        }
        Ok(())
    }
}
