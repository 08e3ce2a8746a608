/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::OpenOptions;
use std::time::{Duration, Instant};

use config::GameConfig;
use domain::intent::Intent;
use sim::step::{step, TickInput};
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::{Command, InputKey, InputState};
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(2);

fn main() {
    let config = GameConfig::load();
    init_logging(&config);

    match &config.source {
        Some(path) => log::info!("config loaded from {}", path.display()),
        None => log::info!("no config.toml found, using defaults"),
    }
    for problem in &config.problems {
        log::warn!("config: {problem}");
    }

    let mut world = WorldState::new(session_seed(&config));
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        // raw mode may already be on
        let _ = renderer.cleanup();
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Maze Chase!");
    println!("Final Score: {}", world.score);
}

/// Route `log` output to a file; the terminal belongs to the renderer.
fn init_logging(config: &GameConfig) {
    let path = config.log_path();
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file {}: {e}", path.display());
            return;
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn session_seed(config: &GameConfig) -> u64 {
    config.seed.unwrap_or_else(rand::random)
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = renderer.enable_key_release()?;
    log::debug!("key release events: {}", kb.honor_release);

    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    log::info!("gamepad present at startup: {}", gp.connected);

    let mut intent: Intent<InputKey> = Intent::new();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    let mut last_tick = Instant::now();
    let mut paused = false;

    renderer.render(world, paused)?;

    loop {
        kb.drain_events();
        gp.update();

        if kb.has_command(Command::Quit) || gp.cancel_pressed() {
            break;
        }
        kb.apply(&mut intent);
        gp.apply(&mut intent);

        if world.is_over() {
            if kb.has_command(Command::Restart) || gp.confirm_pressed() {
                *world = WorldState::new(session_seed(config));
                intent.clear();
                paused = false;
            }
        } else if kb.has_command(Command::Pause) {
            paused = !paused;
            log::debug!("paused: {paused}");
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick_rate {
            last_tick = Instant::now();
            if !paused {
                let events = step(world, TickInput { intent: intent.current(), dt: elapsed });
                if let Some(s) = sound { s.play_events(&events); }
            }
            renderer.render(world, paused)?;
        }

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}
