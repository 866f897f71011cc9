use crate::*;

/// A sequence of games on a configurable board, as driven by a front-end's
/// "new game" and "change size" controls.
#[derive(Clone, Debug)]
pub struct GameSession<T: Ticker = Stopwatch> {
    config: GameConfig,
    engine: RevealEngine<T>,
}

impl<T: Ticker> GameSession<T> {
    pub fn new(config: GameConfig, mut ticker: T, seed: u64) -> Result<Self> {
        let grid = config.build_grid()?;
        ticker.reset();
        Ok(Self {
            config,
            engine: RevealEngine::new(grid, ticker, seed),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn engine(&self) -> &RevealEngine<T> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut RevealEngine<T> {
        &mut self.engine
    }

    pub fn reveal<O: GameObserver + ?Sized>(
        &mut self,
        coords: Coord2,
        observer: &mut O,
    ) -> Result<RevealOutcome> {
        self.engine.reveal(coords, observer)
    }

    pub fn toggle_flag<O: GameObserver + ?Sized>(
        &mut self,
        coords: Coord2,
        observer: &mut O,
    ) -> Result<FlagOutcome> {
        self.engine.toggle_flag(coords, observer)
    }

    /// Same board, fresh mines.
    pub fn new_game<O: GameObserver + ?Sized>(&mut self, observer: &mut O) {
        self.engine.new_game(observer);
    }

    /// Validates `config` before touching the running game, then starts over with it.
    pub fn reconfigure<O: GameObserver + ?Sized>(
        &mut self,
        config: GameConfig,
        observer: &mut O,
    ) -> Result<()> {
        let grid = config.build_grid()?;
        log::debug!("Reconfigured board to {}", config);
        self.config = config;
        self.engine.replace_grid(grid, observer);
        Ok(())
    }
}
