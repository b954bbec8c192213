//! Game controller state machine
//!
//! Composes slicing, shuffling, the board and the level timer into the
//! playable game: level progression, the swap-animation window, timer
//! expiry and the game-over/restart flow.
//!
//! The controller is driven entirely by the embedder: taps come in
//! through [`Game::select`], the animation collaborator reports back
//! through [`Game::complete_swap`], and the scheduled one-second
//! callbacks land in [`Game::on_timer_tick`]. Outward notifications
//! accumulate as [`GameEvent`]s, drained with [`Game::drain_events`].

use image::RgbaImage;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::PuzzleError;
use super::board::{PuzzleBoard, SelectionResult};
use super::piece;
use super::shuffle;
use super::timer::{LevelTimer, Tick, TimerEpoch, time_for_level};
use crate::consts::{BASE_GRID_SIZE, MIN_GRID_SIZE};
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Accepting selections
    Playing,
    /// Exchange committed, swap animation in flight - selection input
    /// is rejected until the completion callback fires
    Swapping,
    /// Puzzle solved; waiting for the level-up acknowledgement
    Solved,
    /// Timer expired. Terminal until an explicit restart
    GameOver,
}

/// The single in-flight exchange.
///
/// Held from the `Exchanged` selection until [`Game::complete_swap`];
/// the animation sink reads the two positions (and their pixel offsets
/// via [`crate::layout::GridLayout`]) to slide the tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapInFlight {
    pub first: usize,
    pub second: usize,
}

/// Outward notification for the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Countdown moved to this many remaining seconds
    TimeChanged(u32),
    /// Puzzle solved; the UI should announce and then call
    /// [`Game::next_level_ack`]
    NextLevel(u32),
    /// Time ran out before the puzzle was solved
    GameOver,
}

/// The puzzle game state machine.
///
/// Owns the source image, the current board, the level timer and the
/// seeded RNG. All mutation happens through `&mut self` on the single
/// control thread; there is no interior locking.
#[derive(Debug, Clone)]
pub struct Game {
    source: RgbaImage,
    seed: u64,
    rng: Pcg32,
    level: u32,
    grid_size: u32,
    board: PuzzleBoard,
    timer: LevelTimer,
    timer_enabled: bool,
    phase: Phase,
    pending_swap: Option<SwapInFlight>,
    terminated: bool,
    events: Vec<GameEvent>,
}

impl Game {
    /// Start a timed game at level 1 on a 3x3 grid.
    pub fn new(source: RgbaImage, seed: u64) -> Result<Self, PuzzleError> {
        Self::new_with(source, seed, &Settings::default())
    }

    /// Start a game with explicit settings (timer enable).
    pub fn new_with(source: RgbaImage, seed: u64, settings: &Settings) -> Result<Self, PuzzleError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let board = Self::deal(&source, BASE_GRID_SIZE, &mut rng)?;
        let mut game = Self {
            source,
            seed,
            rng,
            level: 1,
            grid_size: BASE_GRID_SIZE,
            board,
            timer: LevelTimer::new(),
            timer_enabled: settings.timer_enabled,
            phase: Phase::Playing,
            pending_swap: None,
            terminated: false,
            events: Vec::new(),
        };
        if game.timer_enabled {
            let seconds = time_for_level(game.level);
            game.timer.start(seconds);
            game.events.push(GameEvent::TimeChanged(seconds));
        }
        log::info!("new game (seed {seed}): level 1, {BASE_GRID_SIZE}x{BASE_GRID_SIZE}");
        Ok(game)
    }

    /// Slice and shuffle a fresh board at `grid_size`
    fn deal(
        source: &RgbaImage,
        grid_size: u32,
        rng: &mut Pcg32,
    ) -> Result<PuzzleBoard, PuzzleError> {
        let mut pieces = piece::slice(source, grid_size)?;
        shuffle::shuffle(&mut pieces, rng);
        PuzzleBoard::new(pieces)
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The live board, for the render sink
    #[inline]
    pub fn board(&self) -> &PuzzleBoard {
        &self.board
    }

    /// The level countdown; the embedder schedules ticks against
    /// `timer().epoch()`
    #[inline]
    pub fn timer(&self) -> &LevelTimer {
        &self.timer
    }

    /// The exchange awaiting its animation-completion callback, if any
    #[inline]
    pub fn pending_swap(&self) -> Option<SwapInFlight> {
        self.pending_swap
    }

    /// Take all notifications emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Handle a tap on a board position.
    ///
    /// Out-of-range positions are rejected with no state change. While
    /// not in [`Phase::Playing`] (swap in flight, solved, game over) the
    /// tap is ignored and reported as `Cleared` - never queued.
    pub fn select(&mut self, position: usize) -> Result<SelectionResult, PuzzleError> {
        if self.terminated {
            return Ok(SelectionResult::Cleared);
        }
        if position >= self.board.slot_count() {
            return Err(PuzzleError::PositionOutOfRange {
                position,
                slots: self.board.slot_count(),
            });
        }
        if self.phase != Phase::Playing {
            log::debug!("select({position}) ignored in {:?}", self.phase);
            return Ok(SelectionResult::Cleared);
        }

        let result = self.board.select(position)?;
        if let SelectionResult::Exchanged { first, second } = result {
            self.phase = Phase::Swapping;
            self.pending_swap = Some(SwapInFlight { first, second });
            log::debug!("exchange {first} <-> {second} in flight");
        }
        Ok(result)
    }

    /// Animation-completion callback for the in-flight exchange.
    ///
    /// Finalizes the swap window: checks the solved condition and either
    /// announces the next level or returns to `Playing`. If the timer
    /// expired mid-animation the game is already over and only the
    /// in-flight token is discarded.
    pub fn complete_swap(&mut self) {
        if self.terminated {
            return;
        }
        if self.pending_swap.take().is_none() {
            return;
        }
        if self.phase != Phase::Swapping {
            return;
        }

        if self.board.is_solved() {
            self.timer.stop();
            self.phase = Phase::Solved;
            log::info!("level {} solved", self.level);
            self.events.push(GameEvent::NextLevel(self.level + 1));
        } else {
            self.phase = Phase::Playing;
        }
    }

    /// Forward a scheduled one-second timer firing.
    ///
    /// Stale epochs are ignored. Expiry moves the game to `GameOver`
    /// unless the puzzle was already solved.
    pub fn on_timer_tick(&mut self, epoch: TimerEpoch) {
        if self.terminated {
            return;
        }
        match self.timer.on_tick(epoch) {
            Tick::Stale => {}
            Tick::Running(remaining) => self.events.push(GameEvent::TimeChanged(remaining)),
            Tick::Expired => {
                if self.phase != Phase::Solved {
                    self.phase = Phase::GameOver;
                    log::info!("time expired at level {}", self.level);
                    self.events.push(GameEvent::TimeChanged(0));
                    self.events.push(GameEvent::GameOver);
                }
            }
        }
    }

    /// Advance after the UI acknowledged the level-up announcement.
    ///
    /// Grows the grid by one, deals a fresh board and restarts the
    /// countdown. A no-op unless the puzzle is in [`Phase::Solved`].
    pub fn next_level_ack(&mut self) -> Result<(), PuzzleError> {
        if self.terminated || self.phase != Phase::Solved {
            return Ok(());
        }
        self.enter_level(self.level + 1, self.grid_size + 1)
    }

    /// Restart after a game over: one grid size easier, floored at 3x3.
    ///
    /// Keeps `grid == level + 2` in step by also stepping the level
    /// back, floored at 1. A no-op unless in [`Phase::GameOver`].
    pub fn restart(&mut self) -> Result<(), PuzzleError> {
        if self.terminated || self.phase != Phase::GameOver {
            return Ok(());
        }
        let grid_size = (self.grid_size.saturating_sub(1)).max(MIN_GRID_SIZE);
        let level = (self.level.saturating_sub(1)).max(1);
        self.enter_level(level, grid_size)
    }

    /// Suspend the countdown. Does not change the gameplay phase.
    pub fn pause_game(&mut self) {
        if !self.terminated {
            self.timer.pause();
        }
    }

    /// Continue a paused countdown; returns the fresh tick epoch, or
    /// `None` if nothing was paused.
    pub fn resume_game(&mut self) -> Option<TimerEpoch> {
        if self.terminated {
            return None;
        }
        self.timer.resume()
    }

    /// Terminate the controller: stops the timer, discards any in-flight
    /// swap, and silences all further commands and events.
    pub fn quit(&mut self) {
        if self.terminated {
            return;
        }
        log::info!("game quit at level {}", self.level);
        self.terminated = true;
        self.timer.stop();
        self.pending_swap = None;
        self.events.clear();
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Discard the old board and pieces, deal at `grid_size`, restart
    /// the countdown. Commits nothing if slicing rejects the grid.
    fn enter_level(&mut self, level: u32, grid_size: u32) -> Result<(), PuzzleError> {
        let board = Self::deal(&self.source, grid_size, &mut self.rng)?;
        self.level = level;
        self.grid_size = grid_size;
        self.board = board;
        self.pending_swap = None;
        self.phase = Phase::Playing;
        if self.timer_enabled {
            let seconds = time_for_level(level);
            self.timer.start(seconds);
            self.events.push(GameEvent::TimeChanged(seconds));
        }
        log::info!("level {level}: {grid_size}x{grid_size}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn test_image() -> RgbaImage {
        RgbaImage::from_fn(96, 96, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    fn timed_game(seed: u64) -> Game {
        Game::new(test_image(), seed).unwrap()
    }

    fn origin_at(game: &Game, position: usize) -> usize {
        game.board().piece_at(position).unwrap().origin_index()
    }

    /// One corrective swap: land some misplaced piece on its origin.
    fn solve_one(game: &mut Game) {
        let n = game.board().slot_count();
        let target = (0..n).find(|&p| origin_at(game, p) != p).unwrap();
        let holder = (0..n).find(|&q| origin_at(game, q) == target).unwrap();
        game.select(holder).unwrap();
        game.select(target).unwrap();
        game.complete_swap();
    }

    fn solve_level(game: &mut Game) {
        if game.board().is_solved() {
            // Dealt already solved; unsolve with one swap so the solved
            // check still runs through a completed exchange.
            game.select(0).unwrap();
            game.select(1).unwrap();
            game.complete_swap();
        }
        while game.phase() == Phase::Playing {
            solve_one(game);
        }
        assert_eq!(game.phase(), Phase::Solved);
    }

    fn expire_timer(game: &mut Game) {
        let epoch = game.timer().epoch();
        let remaining = game.timer().remaining();
        for _ in 0..remaining {
            game.on_timer_tick(epoch);
        }
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn test_new_game_starts_level_1_on_3x3() {
        let mut game = timed_game(11);
        assert_eq!(game.level(), 1);
        assert_eq!(game.grid_size(), 3);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.board().slot_count(), 9);
        assert_eq!(game.drain_events(), vec![GameEvent::TimeChanged(120)]);
    }

    #[test]
    fn test_select_pair_commits_exchange() {
        let mut game = timed_game(11);
        let (a, b) = (origin_at(&game, 0), origin_at(&game, 1));

        assert_eq!(game.select(0), Ok(SelectionResult::Armed(0)));
        assert_eq!(
            game.select(1),
            Ok(SelectionResult::Exchanged {
                first: 0,
                second: 1
            })
        );
        assert_eq!(game.phase(), Phase::Swapping);
        assert_eq!(game.pending_swap(), Some(SwapInFlight { first: 0, second: 1 }));
        assert_eq!(origin_at(&game, 0), b);
        assert_eq!(origin_at(&game, 1), a);
    }

    #[test]
    fn test_selection_rejected_while_swapping() {
        let mut game = timed_game(11);
        game.select(0).unwrap();
        game.select(1).unwrap();

        assert_eq!(game.select(2), Ok(SelectionResult::Cleared));
        assert_eq!(game.board().first_selected(), None);
        assert_eq!(game.pending_swap(), Some(SwapInFlight { first: 0, second: 1 }));
    }

    #[test]
    fn test_out_of_range_select_is_invalid_input() {
        let mut game = timed_game(11);
        assert_eq!(
            game.select(9),
            Err(PuzzleError::PositionOutOfRange {
                position: 9,
                slots: 9
            })
        );
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn test_solve_announces_next_level_and_stops_timer() {
        let mut game = timed_game(11);
        game.drain_events();
        solve_level(&mut game);

        assert!(game.board().is_solved());
        assert!(!game.timer().is_running());
        let events = game.drain_events();
        assert_eq!(events.last(), Some(&GameEvent::NextLevel(2)));
        // Level advances only on acknowledgement
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn test_next_level_ack_grows_grid_and_restarts_timer() {
        let mut game = timed_game(11);
        solve_level(&mut game);
        game.drain_events();

        game.next_level_ack().unwrap();
        assert_eq!(game.level(), 2);
        assert_eq!(game.grid_size(), 4);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.board().slot_count(), 16);
        assert_eq!(game.drain_events(), vec![GameEvent::TimeChanged(240)]);
        assert!(game.timer().is_running());
    }

    #[test]
    fn test_ack_is_noop_unless_solved() {
        let mut game = timed_game(11);
        game.next_level_ack().unwrap();
        assert_eq!(game.level(), 1);
        assert_eq!(game.grid_size(), 3);
    }

    #[test]
    fn test_timer_expiry_ends_game() {
        let mut game = timed_game(11);
        game.drain_events();
        expire_timer(&mut game);

        let events = game.drain_events();
        assert_eq!(events.last(), Some(&GameEvent::GameOver));
        assert_eq!(events[events.len() - 2], GameEvent::TimeChanged(0));
        // Input is now ignored
        assert_eq!(game.select(0), Ok(SelectionResult::Cleared));
    }

    #[test]
    fn test_expiry_mid_swap_wins_over_completion() {
        let mut game = timed_game(11);
        game.select(0).unwrap();
        game.select(1).unwrap();
        assert_eq!(game.phase(), Phase::Swapping);

        expire_timer(&mut game);
        game.complete_swap();
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.pending_swap(), None);
    }

    #[test]
    fn test_restart_steps_grid_back_one() {
        let mut game = timed_game(11);
        // Reach level 3 (5x5)
        solve_level(&mut game);
        game.next_level_ack().unwrap();
        solve_level(&mut game);
        game.next_level_ack().unwrap();
        assert_eq!(game.grid_size(), 5);

        expire_timer(&mut game);
        game.restart().unwrap();
        assert_eq!(game.grid_size(), 4);
        assert_eq!(game.level(), 2);
        assert_eq!(game.phase(), Phase::Playing);
        assert!(game.timer().is_running());
    }

    #[test]
    fn test_restart_floors_at_3x3() {
        let mut game = timed_game(11);
        expire_timer(&mut game);
        game.restart().unwrap();
        assert_eq!(game.grid_size(), 3);
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let mut game = timed_game(11);
        game.drain_events();
        let epoch = game.timer().epoch();
        for _ in 0..50 {
            game.on_timer_tick(epoch);
        }
        assert_eq!(game.timer().remaining(), 70);

        game.pause_game();
        game.on_timer_tick(epoch); // in-flight tick, must be ignored
        assert_eq!(game.timer().remaining(), 70);
        assert_eq!(game.phase(), Phase::Playing);

        let epoch = game.resume_game().unwrap();
        game.on_timer_tick(epoch);
        assert_eq!(game.timer().remaining(), 69);
    }

    #[test]
    fn test_untimed_game_never_ticks() {
        let settings = Settings {
            timer_enabled: false,
            ..Settings::default()
        };
        let mut game = Game::new_with(test_image(), 11, &settings).unwrap();
        assert_eq!(game.drain_events(), vec![]);
        assert_eq!(game.timer().state(), crate::game::TimerState::Idle);

        solve_level(&mut game);
        assert_eq!(game.drain_events(), vec![GameEvent::NextLevel(2)]);
    }

    #[test]
    fn test_quit_silences_controller() {
        let mut game = timed_game(11);
        game.quit();

        assert!(game.is_terminated());
        assert_eq!(game.drain_events(), vec![]);
        assert_eq!(game.select(0), Ok(SelectionResult::Cleared));
        game.on_timer_tick(game.timer().epoch());
        game.next_level_ack().unwrap();
        game.restart().unwrap();
        assert_eq!(game.drain_events(), vec![]);
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn test_same_seed_same_shuffle() {
        let a = timed_game(77);
        let b = timed_game(77);
        for p in 0..9 {
            assert_eq!(origin_at(&a, p), origin_at(&b, p));
        }
    }
}
