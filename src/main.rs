//! Tile Swap demo driver
//!
//! Plays the engine against itself: slices a synthetic image, solves
//! each board with corrective swaps, feeds simulated one-second timer
//! callbacks through the controller, and prints the event stream a real
//! UI would render.
//!
//! Usage: `tile-swap [seed]`

use std::time::{SystemTime, UNIX_EPOCH};

use image::{Rgba, RgbaImage};

use tile_swap::game::{Game, GameEvent, Phase, SelectionResult};
use tile_swap::{Records, Settings};

/// Square panel the demo pretends to render into
const PANEL_SIDE: u32 = 480;
/// Levels to play before quitting
const DEMO_LEVELS: u32 = 3;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0x5EED);

    let settings = Settings::default();
    let source = demo_image(PANEL_SIDE, PANEL_SIDE);
    let mut game = Game::new_with(source, seed, &settings).expect("demo image slices cleanly");
    let mut records = Records::new();

    println!("tile-swap demo (seed {seed})");
    log::info!("panel {PANEL_SIDE}px, swap animation {}ms", settings.swap_duration_ms);

    while game.level() <= DEMO_LEVELS && !game.is_terminated() {
        match game.phase() {
            Phase::Playing => {
                play_corrective_swap(&mut game, &settings);
                // Each move costs the demo player a second of clock
                game.on_timer_tick(game.timer().epoch());
            }
            // The demo completes every swap synchronously, but be safe
            Phase::Swapping => game.complete_swap(),
            Phase::Solved => {
                println!(
                    "  solved {0}x{0} with {1}s to spare",
                    game.grid_size(),
                    game.timer().remaining()
                );
                game.next_level_ack().expect("next grid fits the image");
            }
            Phase::GameOver => {
                records.add(game.level(), 0, unix_millis());
                game.restart().expect("restart grid fits the image");
            }
        }

        for event in game.drain_events() {
            match event {
                GameEvent::TimeChanged(seconds) => log::debug!("{seconds}s remaining"),
                GameEvent::NextLevel(level) => println!("level up -> {level}"),
                GameEvent::GameOver => println!("game over"),
            }
        }
    }

    records.add(game.level(), game.timer().remaining(), unix_millis());
    if let Some(best) = records.best() {
        println!(
            "best run: level {} with {}s left",
            best.level, best.seconds_left
        );
    }
    game.quit();
}

/// One corrective swap: land some misplaced piece on its origin slot.
fn play_corrective_swap(game: &mut Game, settings: &Settings) {
    let board = game.board();
    let n = board.slot_count();
    let Some(target) = (0..n).find(|&p| board.piece_at(p).unwrap().origin_index() != p) else {
        return;
    };
    let holder = (0..n)
        .find(|&q| board.piece_at(q).unwrap().origin_index() == target)
        .expect("board is a permutation");

    game.select(holder).expect("position in range");
    let result = game.select(target).expect("position in range");
    debug_assert!(matches!(result, SelectionResult::Exchanged { .. }));

    if let Some(swap) = game.pending_swap() {
        let layout = settings.layout_for(PANEL_SIDE, game.grid_size());
        let (delta, _) = layout.swap_deltas(swap);
        log::debug!(
            "sliding {} <-> {} by ({}, {}) over {}ms",
            swap.first,
            swap.second,
            delta.x,
            delta.y,
            settings.swap_duration_ms
        );
    }
    // A real UI would run the slide animation here before reporting back
    game.complete_swap();
}

/// Synthetic source image: a gradient with enough texture that every
/// tile is distinct
fn demo_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        let b = ((x ^ y) & 0xFF) as u8;
        Rgba([r, g, b, 255])
    })
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
