//! Game model for a single-player mine-detection puzzle.
//!
//! [`MineGrid`] owns the mine placement and answers spatial queries, [`RevealEngine`] turns clicks
//! into flood-fill disclosure and win/loss transitions, and reports them through a
//! [`GameObserver`]. Elapsed time is delegated to a [`Ticker`], with [`Stopwatch`] as the stock
//! implementation.

pub use cell::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use observer::*;
pub use session::*;
pub use ticker::*;
pub use types::*;

mod cell;
mod config;
mod engine;
mod error;
mod grid;
mod observer;
mod session;
mod ticker;
mod types;
