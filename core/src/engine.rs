use std::collections::{BTreeSet, VecDeque};

use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// First-click re-placements beyond this many are logged as a warning.
const UNUSUAL_REDRAWS: u32 = 64;

fn redraw_log_level(redraws: u32) -> Option<log::Level> {
    match redraws {
        0 => None,
        n if n > UNUSUAL_REDRAWS => Some(log::Level::Warn),
        _ => Some(log::Level::Debug),
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Per-game progress: visited cells, flag markers and the terminal outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealState {
    visited: BTreeSet<Coord2>,
    flags: Array2<bool>,
    flags_left: isize,
    outcome: Outcome,
    first_move: bool,
    detonated: Option<Coord2>,
}

impl RevealState {
    pub fn new(grid: &MineGrid) -> Self {
        Self {
            visited: BTreeSet::new(),
            flags: Array2::default(grid.size().to_nd_index()),
            flags_left: grid.mine_count() as isize,
            outcome: Outcome::default(),
            first_move: true,
            detonated: None,
        }
    }

    pub fn visited(&self) -> &BTreeSet<Coord2> {
        &self.visited
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn is_first_move(&self) -> bool {
        self.first_move
    }

    pub fn detonated(&self) -> Option<Coord2> {
        self.detonated
    }

    pub fn flags_left(&self) -> isize {
        self.flags_left
    }

    /// Every cell that is not a mine has been visited.
    fn all_safe_cells_visited(&self, grid: &MineGrid) -> bool {
        self.visited.len() == usize::from(grid.safe_cell_count())
    }
}

/// Drives one game from clicks: first-move safety, flood-fill disclosure and win/loss detection.
#[derive(Clone, Debug)]
pub struct RevealEngine<T: Ticker = Stopwatch> {
    grid: MineGrid,
    state: RevealState,
    ticker: T,
    rng: SmallRng,
}

impl<T: Ticker> RevealEngine<T> {
    /// Starts a game on a freshly randomized placement.
    pub fn new(mut grid: MineGrid, ticker: T, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        grid.place_mines_randomly(&mut rng);
        Self::with_rng(grid, ticker, rng)
    }

    /// Starts a game keeping the placement already in `grid`.
    ///
    /// The seed is only used if the first click lands on a mine and the layout has to be redrawn.
    pub fn with_layout(grid: MineGrid, ticker: T, seed: u64) -> Self {
        Self::with_rng(grid, ticker, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(grid: MineGrid, ticker: T, rng: SmallRng) -> Self {
        Self {
            state: RevealState::new(&grid),
            grid,
            ticker,
            rng,
        }
    }

    pub fn grid(&self) -> &MineGrid {
        &self.grid
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    pub fn outcome(&self) -> Outcome {
        self.state.outcome
    }

    pub fn is_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn is_first_move(&self) -> bool {
        self.state.first_move
    }

    pub fn detonated(&self) -> Option<Coord2> {
        self.state.detonated
    }

    pub fn flags_left(&self) -> isize {
        self.state.flags_left
    }

    pub fn visited_count(&self) -> usize {
        self.state.visited.len()
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.state.visited.contains(&coords)
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.state
            .flags
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.grid.validate_coords(coords)?;
        Ok(if self.state.detonated == Some(coords) {
            CellView::Detonated
        } else if self.is_revealed(coords) {
            CellView::Revealed(self.grid.adjacent_mine_count(coords))
        } else if self.is_flagged(coords) {
            CellView::Flagged
        } else {
            CellView::Hidden
        })
    }

    /// Player-visible snapshot of the whole board, indexed `[row, column]`.
    pub fn board(&self) -> Array2<CellView> {
        let (rows, columns) = self.grid.size();
        let mut board = Array2::default(self.grid.size().to_nd_index());
        for row in 0..rows {
            for column in 0..columns {
                // coordinates come from the grid's own bounds
                if let Ok(view) = self.cell_view((row, column)) {
                    board[(row, column).to_nd_index()] = view;
                }
            }
        }
        board
    }

    /// Redraws the mines and clears all progress, keeping the board shape.
    pub fn new_game<O: GameObserver + ?Sized>(&mut self, observer: &mut O) {
        self.ticker.stop();
        self.ticker.reset();
        self.grid.place_mines_randomly(&mut self.rng);
        self.state = RevealState::new(&self.grid);
        log::debug!("New game on {:?} with {} mines", self.grid.size(), self.grid.mine_count());
        observer.on_flag_count_changed(self.state.flags_left);
    }

    /// Swaps in a board of a different shape or mine count and starts over on it.
    pub fn replace_grid<O: GameObserver + ?Sized>(&mut self, grid: MineGrid, observer: &mut O) {
        self.grid = grid;
        self.new_game(observer);
    }

    pub fn reveal<O: GameObserver + ?Sized>(
        &mut self,
        coords: Coord2,
        observer: &mut O,
    ) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_not_finished()?;

        if self.state.first_move {
            self.secure_first_move(coords);
        }

        if self.grid.contains_mine(coords) {
            self.lose(coords, observer);
            return Ok(RevealOutcome::HitMine);
        }

        if self.state.visited.contains(&coords) {
            return Ok(RevealOutcome::NoChange);
        }

        Ok(self.flood_reveal(coords, observer))
    }

    pub fn toggle_flag<O: GameObserver + ?Sized>(
        &mut self,
        coords: Coord2,
        observer: &mut O,
    ) -> Result<FlagOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_not_finished()?;

        if self.state.visited.contains(&coords) {
            return Ok(FlagOutcome::NoChange);
        }

        let flag = &mut self.state.flags[coords.to_nd_index()];
        *flag = !*flag;
        if *flag {
            self.state.flags_left -= 1;
        } else {
            self.state.flags_left += 1;
        }
        observer.on_flag_count_changed(self.state.flags_left);

        Ok(FlagOutcome::Changed)
    }

    /// Redraws the layout until `coords` is safe, then starts the clock.
    fn secure_first_move(&mut self, coords: Coord2) {
        let mut redraws: u32 = 0;
        // terminates since there are fewer mines than cells
        while self.grid.contains_mine(coords) {
            self.grid.place_mines_randomly(&mut self.rng);
            redraws += 1;
        }
        if let Some(level) = redraw_log_level(redraws) {
            log::log!(
                level,
                "Moved mines away from first click {:?} after {} redraws",
                coords,
                redraws
            );
        }

        self.ticker.start();
        self.state.first_move = false;
    }

    fn flood_reveal<O: GameObserver + ?Sized>(
        &mut self,
        start: Coord2,
        observer: &mut O,
    ) -> RevealOutcome {
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit_coords) = to_visit.pop_front() {
            if !self.state.visited.insert(visit_coords) {
                continue;
            }

            self.drop_flag(visit_coords, observer);
            observer.on_cell_revealed(visit_coords);

            let adjacent_mines = self.grid.adjacent_mine_count(visit_coords);
            log::trace!("Revealed {:?}, adjacent mines: {}", visit_coords, adjacent_mines);
            if adjacent_mines > 0 {
                observer.on_adjacent_mine_count(visit_coords, adjacent_mines);
            }

            if self.state.all_safe_cells_visited(&self.grid) {
                self.win(observer);
                return RevealOutcome::Won;
            }

            if adjacent_mines == 0 {
                to_visit.extend(
                    self.grid
                        .iter_neighbors(visit_coords)
                        .filter(|pos| !self.state.visited.contains(pos)),
                );
            }
        }

        RevealOutcome::Revealed
    }

    fn drop_flag<O: GameObserver + ?Sized>(&mut self, coords: Coord2, observer: &mut O) {
        let flag = &mut self.state.flags[coords.to_nd_index()];
        if *flag {
            *flag = false;
            self.state.flags_left += 1;
            observer.on_flag_count_changed(self.state.flags_left);
        }
    }

    fn win<O: GameObserver + ?Sized>(&mut self, observer: &mut O) {
        self.state.outcome = Outcome::Won;
        self.ticker.stop();
        log::debug!("Game won after {} reveals", self.state.visited.len());
        observer.on_game_won();
    }

    fn lose<O: GameObserver + ?Sized>(&mut self, coords: Coord2, observer: &mut O) {
        self.state.outcome = Outcome::Lost;
        self.state.detonated = Some(coords);
        self.ticker.stop();
        log::debug!("Game lost on mine at {:?}", coords);
        observer.on_game_lost(coords);
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_game_over() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
