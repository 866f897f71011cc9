use std::io::{self, Write};

use mineclear_core::*;

/// Text rendering of the board plus the status line, fed by engine callbacks.
#[derive(Debug, Default)]
pub struct TerminalView {
    message: Option<String>,
    revealed_this_turn: usize,
}

impl TerminalView {
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn has_message(&self) -> bool {
        self.message.is_some()
    }

    pub fn draw<W: Write, T: Ticker>(
        &mut self,
        out: &mut W,
        engine: &RevealEngine<T>,
        time: ElapsedTime,
    ) -> io::Result<()> {
        let board = engine.board();
        let (_, columns) = engine.grid().size();

        write!(out, "    ")?;
        for column in 0..columns {
            write!(out, "{:>3}", column)?;
        }
        writeln!(out)?;

        for (row, cells) in board.rows().into_iter().enumerate() {
            write!(out, "{:>3} ", row)?;
            for &cell in cells {
                write!(out, "{:>3}", symbol(cell))?;
            }
            writeln!(out)?;
        }

        writeln!(out, "flags {:>4}   time {}", engine.flags_left(), time)?;
        if let Some(message) = self.message.take() {
            writeln!(out, "{}", message)?;
        }
        if self.revealed_this_turn > 0 {
            log::debug!("{} cells revealed", self.revealed_this_turn);
            self.revealed_this_turn = 0;
        }
        out.flush()
    }
}

fn symbol(cell: CellView) -> char {
    match cell {
        CellView::Hidden => '#',
        CellView::Flagged => 'F',
        CellView::Revealed(0) => '.',
        // at most 8 adjacent mines
        CellView::Revealed(count) => char::from(b'0' + count),
        CellView::Detonated => '*',
    }
}

impl GameObserver for TerminalView {
    fn on_cell_revealed(&mut self, _coords: Coord2) {
        self.revealed_this_turn += 1;
    }

    fn on_game_won(&mut self) {
        self.set_message("You cleared the field!");
    }

    fn on_game_lost(&mut self, (row, column): Coord2) {
        self.set_message(format!("You stepped on a mine at {} {}.", row, column));
    }

    fn on_flag_count_changed(&mut self, flags_left: isize) {
        log::debug!("{} flags left", flags_left);
    }
}
