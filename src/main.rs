//! Spike Bounce entry point
//!
//! Native builds run a headless autopilot session against the on-disk
//! preference store and log the result. The browser build is driven through
//! `WebGame` (see `platform::web`).

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use spike_bounce::config::ConfigError;
    use spike_bounce::consts::SIM_DT;
    use spike_bounce::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
    use spike_bounce::platform::OfflinePlatform;
    use spike_bounce::sim::{GameEvent, SessionEvent};
    use spike_bounce::{GameConfig, TickInput, World};

    /// Give up after this much simulated time
    const MAX_SECONDS: f32 = 120.0;

    struct Args {
        seed: u64,
        config: Option<PathBuf>,
        ephemeral: bool,
    }

    fn parse_args() -> Args {
        let mut args = Args {
            seed: 12345,
            config: None,
            ephemeral: false,
        };
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--seed" => match iter.next().map(|s| s.parse()) {
                    Some(Ok(seed)) => args.seed = seed,
                    _ => log::warn!("--seed needs an integer, keeping {}", args.seed),
                },
                "--config" => args.config = iter.next().map(PathBuf::from),
                "--ephemeral" => args.ephemeral = true,
                other => log::warn!("Ignoring unknown argument {:?}", other),
            }
        }
        args
    }

    pub fn run() -> Result<(), ConfigError> {
        log::info!("Spike Bounce (native) starting...");

        let args = parse_args();
        let config = GameConfig::load_or_default(args.config.as_deref());

        let store: Box<dyn KeyValueStore> = match JsonFileStore::default_path() {
            Some(path) if !args.ephemeral => Box::new(JsonFileStore::open(path)),
            _ => Box::new(MemoryStore::new()),
        };

        let mut world = World::new(config, store, args.seed)?;
        let mut services = OfflinePlatform;
        world.pump_platform(&mut services);

        let input = TickInput {
            tap: false,
            autopilot: true,
        };
        let mut elapsed = 0.0;
        while elapsed < MAX_SECONDS && !world.session.is_over() {
            world.frame(SIM_DT, &input);
            world.pump_platform(&mut services);
            elapsed += SIM_DT;

            for event in world.drain_events() {
                match event {
                    GameEvent::Session(SessionEvent::StageChanged { stage, .. }) => {
                        log::info!("Stage {} at {:.1}s", stage, elapsed);
                    }
                    GameEvent::BerryCollected => log::debug!("Berry at {:.1}s", elapsed),
                    _ => {}
                }
            }
        }

        let session = &world.session;
        log::info!(
            "Run finished after {:.1}s: score {}, stage {}, berries {} (best {}, games {})",
            elapsed,
            session.score,
            session.stage,
            session.session_berries,
            session.best_score,
            session.games_played
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    spike_bounce::platform::init_logging();
    if let Err(e) = headless::run() {
        log::error!("Cannot start: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_start, this is just to satisfy the compiler
}
