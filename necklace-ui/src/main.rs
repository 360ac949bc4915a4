mod app;
mod backend;
mod render;
mod transport;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use necklace_core::config::Config;
use necklace_core::project;
use necklace_types::StoreState;

use app::App;
use backend::TerminalBackend;

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("necklace")
        .join("necklace.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path).or_else(|_| File::create("/tmp/necklace.log")) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("necklace: cannot create log file: {}", e);
            return;
        }
    };

    if let Err(e) = WriteLogger::init(log_level, simplelog::Config::default(), log_file) {
        eprintln!("necklace: failed to initialize logger: {}", e);
        return;
    }

    log::info!("necklace starting (log level: {:?})", log_level);
}

fn load_state(path: &Path, config: &Config) -> StoreState {
    if path.exists() {
        match project::load_project(path) {
            Ok(state) => return state,
            Err(e) => log::warn!(target: "project", "could not load {}: {}", path.display(), e),
        }
    }
    let mut state = StoreState::new();
    state.theme = config.theme();
    state
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    let project_path = args
        .iter()
        .position(|a| a == "--project")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .unwrap_or_else(project::default_project_path);

    let config = Config::load();
    let frame_time = Duration::from_secs_f64(1.0 / config.frame_rate() as f64);
    let state = load_state(&project_path, &config);
    let mut app = App::new(config, state, project_path);

    let mut backend = TerminalBackend::new()?;
    backend.start()?;

    let start = Instant::now();
    let mut last_frame = start;
    let result = loop {
        let until_frame = frame_time.saturating_sub(last_frame.elapsed());
        match backend.poll_key(until_frame) {
            Ok(Some(key)) => app.handle_key(key),
            Ok(None) => {}
            Err(e) => break Err(e),
        }
        if app.should_quit() {
            break Ok(());
        }

        let now = Instant::now();
        let now_ms = now.duration_since(start).as_secs_f64() * 1000.0;
        if now.duration_since(last_frame) < frame_time {
            app.wake(now_ms);
            continue;
        }
        let dt_ms = now.duration_since(last_frame).as_secs_f64() * 1000.0;
        last_frame = now;

        app.frame(dt_ms, now_ms);
        if let Err(e) = backend.draw(|frame| render::render(frame, &app)) {
            break Err(e);
        }
    };

    backend.stop()?;
    log::info!("necklace exiting");
    result
}
