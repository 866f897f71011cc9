use std::str::FromStr;

use mineclear_core::{Coord, Coord2, GameConfig, GameError};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  r ROW COL              reveal a cell
  f ROW COL              toggle a flag
  n                      new game on the same board
  c ROWS,COLS[,MINES]    new board, mines default to 10 per 64 cells
  h                      this help
  q                      quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    NewGame,
    Configure(GameConfig),
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command {0:?}, type h for help")]
    Unknown(String),
    #[error("Expected a row and a column")]
    BadCoords,
    #[error(transparent)]
    Config(#[from] GameError),
}

fn parse_coords(args: &str) -> Result<Coord2, CommandError> {
    let mut parts = args.split_whitespace().map(str::parse::<Coord>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(row)), Some(Ok(column)), None) => Ok((row, column)),
        _ => Err(CommandError::BadCoords),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, args) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        Ok(match verb {
            "r" | "reveal" => Command::Reveal(parse_coords(args)?),
            "f" | "flag" => Command::Flag(parse_coords(args)?),
            "n" | "new" => Command::NewGame,
            "c" | "config" => Command::Configure(args.parse()?),
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" => Command::Quit,
            _ => return Err(CommandError::Unknown(verb.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moves() {
        assert_eq!("r 3 4".parse::<Command>(), Ok(Command::Reveal((3, 4))));
        assert_eq!("  flag 0   7 ".parse::<Command>(), Ok(Command::Flag((0, 7))));
        assert_eq!("n".parse::<Command>(), Ok(Command::NewGame));
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn parses_board_config() {
        assert_eq!(
            "c 12, 24, 30".parse::<Command>(),
            Ok(Command::Configure(GameConfig::new(12, 24, Some(30))))
        );
        assert_eq!(
            "c 7,8".parse::<Command>(),
            Err(CommandError::Config(GameError::InvalidDimension))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!("r 3".parse::<Command>(), Err(CommandError::BadCoords));
        assert_eq!("r 3 4 5".parse::<Command>(), Err(CommandError::BadCoords));
        assert_eq!("f -1 2".parse::<Command>(), Err(CommandError::BadCoords));
        assert_eq!(
            "boom".parse::<Command>(),
            Err(CommandError::Unknown("boom".to_string()))
        );
    }
}
