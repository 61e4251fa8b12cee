//! Gift Dash headless runner
//!
//! Plays one run with the built-in autopilot and prints the session summary
//! as JSON. Usage: `gift-dash [tuning.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use gift_dash::consts::TICK_MS;
    use gift_dash::sim::{GameEvent, autopilot};
    use gift_dash::{Engine, Tuning};

    /// Give up after ten minutes of simulated play
    const MAX_TICKS: u32 = 6000;

    env_logger::init();
    log::info!("Gift Dash (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) if path != "-" => {
            let json = std::fs::read_to_string(&path)?;
            log::info!("Loaded tuning from {}", path);
            Tuning::from_json(&json)?
        }
        _ => Tuning::default(),
    };
    let seed = match args.next() {
        Some(seed) => seed.parse::<u64>()?,
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_millis() as u64,
    };
    log::info!("Game initialized with seed: {}", seed);

    let mut engine = Engine::new(seed, tuning);
    engine.start();

    for _ in 0..MAX_TICKS {
        if let Some(direction) = autopilot::choose_move(engine.state()) {
            engine.move_player(direction);
        }
        engine.update(TICK_MS);

        for event in engine.drain_events() {
            match event {
                GameEvent::GameOver { cause } => log::info!("Game over: {:?}", cause),
                other => log::debug!("{:?}", other),
            }
        }
        if !engine.state().is_running() {
            break;
        }
    }

    match engine.summary() {
        Some(summary) => println!("{}", serde_json::to_string_pretty(summary)?),
        None => {
            log::warn!("Autopilot survived {} ticks", MAX_TICKS);
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        }
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; the presentation layer drives `Engine` directly
}
