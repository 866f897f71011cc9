use serde::{Deserialize, Serialize};

use crate::*;

/// Hooks through which the engine reports state changes to a presentation layer.
///
/// Every method defaults to doing nothing, so a front-end only implements what it draws.
pub trait GameObserver {
    fn on_cell_revealed(&mut self, _coords: Coord2) {}

    /// Only called for cells with at least one adjacent mine.
    fn on_adjacent_mine_count(&mut self, _coords: Coord2, _count: u8) {}

    fn on_game_won(&mut self) {}

    fn on_game_lost(&mut self, _detonated: Coord2) {}

    fn on_flag_count_changed(&mut self, _flags_left: isize) {}
}

impl GameObserver for () {}

/// Recorded form of a single observer callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CellRevealed(Coord2),
    AdjacentMineCount(Coord2, u8),
    Won,
    Lost(Coord2),
    FlagCountChanged(isize),
}

impl GameObserver for Vec<GameEvent> {
    fn on_cell_revealed(&mut self, coords: Coord2) {
        self.push(GameEvent::CellRevealed(coords));
    }

    fn on_adjacent_mine_count(&mut self, coords: Coord2, count: u8) {
        self.push(GameEvent::AdjacentMineCount(coords, count));
    }

    fn on_game_won(&mut self) {
        self.push(GameEvent::Won);
    }

    fn on_game_lost(&mut self, detonated: Coord2) {
        self.push(GameEvent::Lost(detonated));
    }

    fn on_flag_count_changed(&mut self, flags_left: isize) {
        self.push(GameEvent::FlagCountChanged(flags_left));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_records_in_order() {
        let mut events = Vec::new();

        events.on_cell_revealed((1, 2));
        events.on_adjacent_mine_count((1, 2), 3);
        events.on_flag_count_changed(-1);
        events.on_game_lost((0, 0));

        assert_eq!(
            events,
            vec![
                GameEvent::CellRevealed((1, 2)),
                GameEvent::AdjacentMineCount((1, 2), 3),
                GameEvent::FlagCountChanged(-1),
                GameEvent::Lost((0, 0)),
            ]
        );
    }

    #[test]
    fn events_serialize() {
        let json = serde_json::to_string(&GameEvent::AdjacentMineCount((3, 4), 2)).unwrap();

        assert_eq!(json, r#"{"AdjacentMineCount":[[3,4],2]}"#);
    }
}
