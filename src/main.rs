//! Bubble Shooter entry point
//!
//! Natively this runs a headless, bot-driven session and prints its stats.
//! The browser build is driven from `bubble_shooter::web` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result};
    use clap::Parser;

    use bubble_shooter::consts::SIM_DT;
    use bubble_shooter::sim::{AutoAim, GameEvent, GameState, TickInput, tick};
    use bubble_shooter::{HighScores, Palette, Settings};

    /// Ticks allowed for one shot to resolve before giving up
    const MAX_FLIGHT_TICKS: u32 = 600;

    #[derive(Parser)]
    #[command(name = "bubble-shooter", version, about = "Play a seeded bubble shooter session headlessly")]
    struct Cli {
        /// Board seed; defaults to the clock
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many shots
        #[arg(long, default_value_t = 200)]
        max_shots: u32,
        /// Settings JSON file
        #[arg(long)]
        config: Option<PathBuf>,
        /// High score file to record the run in
        #[arg(long)]
        scores: Option<PathBuf>,
    }

    fn now_ms() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0)
    }

    fn log_event(event: &GameEvent, settings: &Settings) {
        let hold = settings
            .presentation
            .display_for(event)
            .map(|d| format!(" (animate {}ms)", d.as_millis()))
            .unwrap_or_default();
        match event {
            GameEvent::ShotFired { id, angle } => log::debug!("{} fired at {:.3} rad", id, angle),
            GameEvent::BubbleSettled { bubble, adjusted } => {
                log::debug!("{} settled at {:?} (adjusted: {})", bubble.id, bubble.cell(), adjusted)
            }
            GameEvent::MatchFound { bubbles, combo } => {
                log::info!("Popped {} (combo: {}){}", bubbles.len(), combo, hold)
            }
            GameEvent::BubblesDetached { bubbles } => log::info!("Dropped {}{}", bubbles.len(), hold),
            GameEvent::ScoreAwarded { points, total } => log::info!("+{} -> {}{}", points, total, hold),
            other => log::info!("{:?}", other),
        }
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();

        let settings = match &cli.config {
            Some(path) => Settings::load(path).with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };
        let seed = cli.seed.unwrap_or_else(|| now_ms() as u64);
        let palette = Palette::default();

        log::info!("Bubble Shooter (native) starting with seed {}", seed);

        let mut state = GameState::with_settings(seed, &settings, palette.len());
        let mut bot = AutoAim::new(seed);
        let mut events = Vec::new();
        let mut flight_ticks = 0;

        while !state.is_finished() {
            let mut input = TickInput::default();
            if state.projectile.is_none() {
                if state.shots_total >= cli.max_shots {
                    log::info!("Shot limit {} reached", cli.max_shots);
                    break;
                }
                input.shoot = Some(bot.aim(&state));
                flight_ticks = 0;
            } else {
                flight_ticks += 1;
                anyhow::ensure!(flight_ticks < MAX_FLIGHT_TICKS, "shot {} never resolved", state.shots_total);
            }

            tick(&mut state, &input, SIM_DT, &mut events);
            for event in events.drain(..) {
                log_event(&event, &settings);
            }
        }

        let stats = state.stats();
        println!("{}", serde_json::to_string_pretty(&stats)?);

        if let Some(path) = &cli.scores {
            let mut scores = HighScores::load(path).with_context(|| format!("loading {}", path.display()))?;
            match scores.add_score(&stats, now_ms()) {
                Some(rank) => {
                    log::info!("New high score, rank {}", rank);
                    scores.save(path).with_context(|| format!("saving {}", path.display()))?;
                }
                None => log::info!("Score {} did not place", stats.score),
            }
        }

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is bubble_shooter::web::start, this is just to satisfy the compiler
}
