/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use config::GameConfig;
use sim::event::GameEvent;
use sim::profile::Difficulty;
use sim::save;
use sim::step;
use sim::world::{Phase, WorldState};
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    let high_scores = save::load();

    let mut world = WorldState::new(config.timing.clone(), high_scores);
    world.muted = config.start_muted;

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    let mut rng = StdRng::from_entropy();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &mut rng);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Maze Chase!");
    if let Some(session) = &world.session {
        println!("Final Score: {}", session.score);
    }
}

fn game_loop<R: Rng>(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    rng: &mut R,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(world.timing.tick_rate_ms);

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(world, &kb, rng) {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            world.anim_tick = world.anim_tick.wrapping_add(1);

            if world.phase == Phase::Playing && !world.paused {
                let input = kb.frame_input();
                let events = match world.session.as_mut() {
                    Some(session) => step::step(session, input, rng),
                    // Playing without a session is a programming error,
                    // not a runtime condition.
                    None => unreachable!("ticked while Playing with no session"),
                };
                process_events(world, sound, &events);
            }

            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Phase-level key handling. Returns true to quit the program.
fn handle_meta<R: Rng>(world: &mut WorldState, kb: &InputState, rng: &mut R) -> bool {
    if kb.any_pressed(&[KeyCode::Char('q'), KeyCode::Char('Q')]) {
        return true;
    }
    if kb.any_pressed(&[KeyCode::Char('m'), KeyCode::Char('M')]) {
        world.muted = !world.muted;
    }

    match world.phase {
        Phase::ModeSelect => {
            let n = Difficulty::ALL.len();
            if kb.was_pressed(KeyCode::Up) {
                world.menu_cursor = (world.menu_cursor + n - 1) % n;
            }
            if kb.was_pressed(KeyCode::Down) {
                world.menu_cursor = (world.menu_cursor + 1) % n;
            }
            for (ch, difficulty) in [
                ('1', Difficulty::Easy),
                ('2', Difficulty::Medium),
                ('3', Difficulty::Hard),
            ] {
                if kb.was_pressed(KeyCode::Char(ch)) {
                    world.start_session(difficulty, rng);
                    return false;
                }
            }
            if kb.any_pressed(&[KeyCode::Enter, KeyCode::Char(' ')]) {
                world.start_session(Difficulty::ALL[world.menu_cursor], rng);
            }
        }
        Phase::Playing => {
            if kb.any_pressed(&[KeyCode::Char('p'), KeyCode::Char('P')]) {
                world.paused = !world.paused;
            }
        }
        Phase::GameOver => {
            if kb.any_pressed(&[KeyCode::Enter, KeyCode::Char('r'), KeyCode::Char('R')]) {
                world.restart();
            }
        }
    }

    false
}

/// React to step events: session end bookkeeping, then sound.
fn process_events(world: &mut WorldState, sound: Option<&SoundEngine>, events: &[GameEvent]) {
    for event in events {
        if matches!(event, GameEvent::GameOver) {
            finish_session(world);
        }
    }

    if world.muted {
        return;
    }
    let Some(sfx) = sound else {
        return;
    };
    for event in events {
        match event {
            GameEvent::DotEaten { .. } => sfx.play_dot(),
            GameEvent::PowerPelletEaten { .. } => sfx.play_pellet(),
            GameEvent::FruitEaten { .. } => sfx.play_fruit(),
            GameEvent::PursuerEaten { .. } => sfx.play_eat(),
            GameEvent::PlayerCaught => sfx.play_caught(),
            GameEvent::LevelCleared { .. } => sfx.play_level(),
            GameEvent::GameOver => sfx.play_game_over(),
            _ => {}
        }
    }
}

/// The run ended: enter the terminal phase and persist an improved
/// high score for the session's difficulty.
fn finish_session(world: &mut WorldState) {
    world.phase = Phase::GameOver;
    if let Some(session) = &world.session {
        if world.high_scores.record(session.difficulty, session.score) {
            save::store(&world.high_scores);
        }
    }
}
