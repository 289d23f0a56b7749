//! Hex Drop entry point
//!
//! Native builds run a headless demo: a session driven at a fixed timestep
//! with an autoplay solver, logging every notification and printing the
//! leaderboard when the run ends. The browser build uses `hex_drop::web`.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use clap::Parser;
    use hex_drop::consts::SIM_DT_MS;
    use hex_drop::platform::FileStore;
    use hex_drop::sim::autoplay;
    use hex_drop::sim::{GameEvent, Intent, Session, SessionPhase, tick};

    /// Headless Hex Drop demo: an autoplay bot works through a few levels
    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    pub struct Options {
        /// RNG seed; defaults to the current time
        #[arg(long, value_name = "SEED")]
        pub seed: Option<u64>,

        /// Quit after clearing this many levels
        #[arg(
            long,
            value_name = "COUNT",
            default_value_t = 3,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        pub levels: u32,

        /// Game time the bot spends per answer
        #[arg(
            long = "think-ms",
            value_name = "MILLISECONDS",
            default_value_t = 2_000
        )]
        pub think_ms: u64,
    }

    impl Options {
        fn seed(&self) -> u64 {
            self.seed.unwrap_or_else(|| {
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_millis() as u64)
                    .unwrap_or(0)
            })
        }
    }

    pub fn run(opts: Options) {
        let store = FileStore::in_data_dir()
            .unwrap_or_else(|| FileStore::new(std::env::temp_dir().join("hex-drop")));
        log::info!("Storing scores in {}", store.dir().display());

        let seed = opts.seed();
        let mut session = Session::new(seed, store);
        log::info!("Seed {}", seed);
        session.apply(Intent::StartGame);

        let mut think_left = opts.think_ms;
        loop {
            tick(&mut session, SIM_DT_MS);

            for event in session.drain_events() {
                report(&event);
            }

            match session.phase() {
                SessionPhase::Playing => {}
                SessionPhase::LevelComplete => {
                    if session.level() >= opts.levels {
                        session.apply(Intent::EndGame);
                    } else {
                        session.apply(Intent::StartNextLevel);
                    }
                    continue;
                }
                SessionPhase::GameOver => break,
                SessionPhase::Idle | SessionPhase::Paused => break,
            }

            think_left = think_left.saturating_sub(SIM_DT_MS);
            if think_left == 0 {
                think_left = opts.think_ms;
                for intent in autoplay::next_move(session.problems()) {
                    session.apply(intent);
                }
            }
        }

        for event in session.drain_events() {
            report(&event);
        }
        println!(
            "Played {}s, reached level {}",
            session.elapsed_secs(),
            session.level()
        );
    }

    fn report(event: &GameEvent) {
        match event {
            GameEvent::ProblemSpawned { problem } => {
                if problem.is_reverse {
                    log::info!("#{}: {} (hex) = ?", problem.id, problem.display_hex());
                } else {
                    log::info!("#{}: ??? = {}", problem.id, problem.target);
                }
            }
            GameEvent::ProblemSolved { problem, points } => {
                log::info!("#{} solved (+{})", problem.id, points);
            }
            GameEvent::BoardCleared { bonus } => log::info!("Board clear! +{}", bonus),
            GameEvent::LevelCompleted {
                level,
                score,
                problems_completed,
            } => {
                println!(
                    "Level {} complete: score {}, {} solved",
                    level, score, problems_completed
                );
            }
            GameEvent::GameOver {
                final_score,
                level,
                problems_completed,
                leaderboard,
            } => {
                println!(
                    "Game over: score {}, level {}, {} solved",
                    final_score, level, problems_completed
                );
                println!("High scores:");
                let current = hex_drop::highscores::rank_of(leaderboard, *final_score);
                for (i, entry) in leaderboard.iter().take(10).enumerate() {
                    let marker = if Some(i + 1) == current { "  <" } else { "" };
                    println!("{:>3}. {:>7}  {}{}", i + 1, entry.score, entry.date, marker);
                }
            }
            GameEvent::ProblemRemoved { .. }
            | GameEvent::ScoreToast { .. }
            | GameEvent::SuccessSound => {}
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Hex Drop (native) starting...");
    demo::run(demo::Options::parse());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is hex_drop::web::wasm_start, this is just to satisfy the compiler
}
