//! Centipede entry point
//!
//! In the browser `wasm_main` hands the page's canvas to `platform::web::run`,
//! which owns the animation loop. Natively this binary runs a headless demo
//! session with the autopilot at the controls and prints a JSON summary.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use centipede::platform::headless::{DemoInput, LastFrame, LogSink};
    use centipede::runner::Sinks;
    use centipede::sim::GamePhase;
    use centipede::{Runner, Tuning, TuningError};
    use clap::Parser;

    /// Frame length of a 60 Hz display
    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Debug, thiserror::Error)]
    pub enum CliError {
        #[error("could not read {path}: {source}")]
        Io {
            path: PathBuf,
            source: std::io::Error,
        },
        #[error(transparent)]
        Tuning(#[from] TuningError),
    }

    /// Headless Centipede demo: the autopilot plays and a JSON summary is printed
    #[derive(Debug, Parser)]
    #[command(name = "centipede", version, about)]
    pub struct Options {
        /// Seed for the run; the same seed replays the same game
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Frames to simulate at 60 Hz (stops early on game over)
        #[arg(long, default_value_t = 3600)]
        frames: u64,
        /// JSON file overriding gameplay tuning
        #[arg(long, value_name = "PATH")]
        tuning: Option<PathBuf>,
        /// Also print the final snapshot as JSON
        #[arg(long)]
        snapshot: bool,
    }

    fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning, CliError> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        let tuning = Tuning::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn run(opts: Options) -> Result<(), CliError> {
        let tuning = load_tuning(opts.tuning.as_ref())?;

        log::info!("Centipede (headless) starting with seed: {}", opts.seed);
        let mut runner = Runner::new(opts.seed, tuning)?;
        let mut audio = LogSink::default();
        let mut notes = LogSink::default();
        let mut last = LastFrame::default();
        let mut input = DemoInput;

        for _ in 0..opts.frames {
            runner.frame(
                FRAME_MS,
                &mut input,
                &mut Sinks {
                    audio: &mut audio,
                    notifications: &mut notes,
                    render: &mut last,
                },
            );
            if runner.state.phase == GamePhase::GameOver {
                break;
            }
        }

        let state = &runner.state;
        let summary = serde_json::json!({
            "seed": state.seed,
            "frames": last.frames,
            "ticks": state.time_ticks,
            "score": state.score,
            "lives": state.lives,
            "level": state.level,
            "phase": state.phase,
            "sounds": audio.sounds_played,
        });
        println!("{summary}");
        if opts.snapshot {
            println!("{}", runner.snapshot().to_json());
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = native::Options::parse();
    if let Err(err) = native::run(opts) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), wasm_bindgen::JsValue> {
    centipede::platform::web::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
