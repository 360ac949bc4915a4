use std::path::PathBuf;

use crossterm::event::KeyCode;

use necklace_core::config::Config;
use necklace_core::project;
use necklace_core::rack::Rack;
use necklace_core::scene::MemoryScene;
use necklace_core::store::Store;
use necklace_types::{
    Dispatcher, ParamChange, PatternParams, ProcessorData, StateChange, StoreAction,
    StoreState, MAX_STEPS,
};

use crate::transport::Transport;

pub type SceneFactory = fn(&ProcessorData) -> MemoryScene;

/// Horizontal distance between processors created from the keyboard.
const PROCESSOR_SPACING: f32 = 26.0;

fn new_scene(_: &ProcessorData) -> MemoryScene {
    MemoryScene::new()
}

pub struct App {
    config: Config,
    store: Store,
    rack: Rack<MemoryScene, SceneFactory>,
    transport: Transport,
    project_path: PathBuf,
    status: String,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, state: StoreState, project_path: PathBuf) -> Self {
        let mut store = Store::new(state);
        let mut rack: Rack<MemoryScene, SceneFactory> = Rack::new(new_scene);
        rack.initialize(&mut store);
        let transport = Transport::new(config.bpm());

        let mut app = Self {
            config,
            store,
            rack,
            transport,
            project_path,
            status: String::new(),
            should_quit: false,
        };
        if app.store.state().processors.is_empty() {
            app.create_processor();
        } else if app.store.state().selected_id.is_none() {
            let first = app.store.state().processors[0].id;
            app.store.dispatch(&StoreAction::SelectProcessor(Some(first)));
        }
        app.rack.process_notifications(&mut app.store);
        app.rack.update_select_circle(app.store.state().selected_id);
        app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn state(&self) -> &StoreState {
        self.store.state()
    }

    pub fn rack(&self) -> &Rack<MemoryScene, SceneFactory> {
        &self.rack
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn selected(&self) -> Option<&ProcessorData> {
        let id = self.store.state().selected_id?;
        self.store.state().processor(id)
    }

    /// Advance the transport by `dt_ms` and draw one frame at `now_ms`.
    pub fn frame(&mut self, dt_ms: f64, now_ms: f64) {
        self.transport.advance(dt_ms);
        let lookahead_ms = 1000.0 / self.config.frame_rate() as f64;
        let events = self
            .transport
            .collect_onsets(&self.store.state().processors, lookahead_ms);
        self.rack.process_notifications(&mut self.store);
        self.rack.draw(self.transport.position(), &events, now_ms);
    }

    /// Fire ignitions due between frames.
    pub fn wake(&mut self, now_ms: f64) {
        self.rack.fire_due(now_ms);
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up => self.change(|p| ParamChange::Steps((p.steps + 1).min(MAX_STEPS))),
            KeyCode::Down => self.change(|p| ParamChange::Steps(p.steps.saturating_sub(1).max(1))),
            KeyCode::Right => self.change(|p| ParamChange::Pulses(p.pulses + 1)),
            KeyCode::Left => self.change(|p| ParamChange::Pulses(p.pulses.saturating_sub(1))),
            KeyCode::Char(']') => self.change(|p| ParamChange::Rotation(p.rotation + 1)),
            KeyCode::Char('[') => self.change(|p| ParamChange::Rotation(p.rotation - 1)),
            KeyCode::Char('m') => self.change(|p| ParamChange::IsMute(!p.is_mute)),
            KeyCode::Char('n') => self.create_processor(),
            KeyCode::Char('x') => self.delete_selected(),
            KeyCode::Tab => self.select_next(),
            KeyCode::Char('c') => {
                self.store.dispatch(&StoreAction::ToggleConnectMode);
            }
            KeyCode::Char('t') => {
                let theme = self.store.state().theme.next();
                self.status = format!("Theme: {}", theme.name);
                self.store.dispatch(&StoreAction::SetTheme(theme));
            }
            KeyCode::Char('s') => self.save(),
            _ => {}
        }
    }

    fn change(&mut self, f: impl FnOnce(&PatternParams) -> ParamChange) {
        let Some(selected) = self.selected() else {
            return;
        };
        let processor_id = selected.id;
        let change = f(&selected.params);
        self.store
            .dispatch(&StoreAction::ChangeParameter { processor_id, change });
    }

    fn create_processor(&mut self) {
        let x = self.store.state().processors.len() as f32 * PROCESSOR_SPACING;
        let action = StoreAction::CreateProcessor {
            params: self.config.pattern_defaults(),
            position: [x, 0.0, 0.0],
        };
        if let Some(StateChange::ProcessorCreated(data)) = self.store.dispatch(&action) {
            self.store
                .dispatch(&StoreAction::SelectProcessor(Some(data.id)));
            self.status = format!("Created {}", data.params.name);
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.store.state().selected_id else {
            return;
        };
        self.store.dispatch(&StoreAction::DeleteProcessor(id));
        self.select_next();
    }

    fn select_next(&mut self) {
        let state = self.store.state();
        if state.processors.is_empty() {
            return;
        }
        let next = match state
            .selected_id
            .and_then(|id| state.processors.iter().position(|p| p.id == id))
        {
            Some(pos) => (pos + 1) % state.processors.len(),
            None => 0,
        };
        let id = state.processors[next].id;
        self.store.dispatch(&StoreAction::SelectProcessor(Some(id)));
    }

    fn save(&mut self) {
        match project::save_project(&self.project_path, self.store.state()) {
            Ok(()) => self.status = format!("Saved {}", self.project_path.display()),
            Err(e) => {
                log::error!(target: "project", "save failed: {}", e);
                self.status = format!("Save failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use necklace_core::scene::Node;

    fn app(dir: &tempfile::TempDir) -> App {
        App::new(
            Config::from_toml_str(""),
            StoreState::new(),
            dir.path().join("project.json"),
        )
    }

    #[test]
    fn starts_with_one_selected_processor() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);
        assert_eq!(app.state().processors.len(), 1);
        let selected = app.selected().unwrap();
        assert_eq!(selected.params.name, "Processor 1");
        assert!(app.rack().controller(selected.id).unwrap().is_selected());
    }

    #[test]
    fn keys_edit_selected_processor() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char(']'));
        app.handle_key(KeyCode::Char('m'));
        app.frame(16.0, 16.0);

        let params = &app.selected().unwrap().params;
        assert_eq!(params.steps, 15);
        assert_eq!(params.pulses, 5);
        assert_eq!(params.rotation, 1);
        assert!(params.is_mute);

        let id = app.selected().unwrap().id;
        let view = app.rack().controller(id).unwrap();
        assert_eq!(view.scene().markers().len(), 15);
        assert!(view.scene().is_visible(Node::RotatedMarker));
    }

    #[test]
    fn steps_never_drop_below_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        for _ in 0..40 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.selected().unwrap().params.steps, 1);
    }

    #[test]
    fn new_delete_and_tab() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.handle_key(KeyCode::Char('n'));
        app.frame(16.0, 16.0);
        assert_eq!(app.rack().len(), 2);
        assert_eq!(app.selected().unwrap().params.name, "Processor 2");

        app.handle_key(KeyCode::Tab);
        assert_eq!(app.selected().unwrap().params.name, "Processor 1");

        app.handle_key(KeyCode::Char('x'));
        app.frame(16.0, 32.0);
        assert_eq!(app.rack().len(), 1);
        assert_eq!(app.selected().unwrap().params.name, "Processor 2");
    }

    #[test]
    fn edit_right_after_create_reaches_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.handle_key(KeyCode::Char('n'));
        app.handle_key(KeyCode::Up);
        app.frame(16.0, 16.0);

        let selected = app.selected().unwrap();
        assert_eq!(selected.params.steps, 17);
        let view = app.rack().controller(selected.id).unwrap();
        assert_eq!(view.scene().markers().len(), 17);
    }

    #[test]
    fn save_writes_project() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.handle_key(KeyCode::Char('s'));
        assert!(app.status().starts_with("Saved"));
        let loaded = project::load_project(&dir.path().join("project.json")).unwrap();
        assert_eq!(loaded.processors, app.state().processors);
    }

    #[test]
    fn frames_pulse_active_steps() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.frame(0.0, 0.0);
        let id = app.selected().unwrap().id;
        let scene = app.rack().controller(id).unwrap().scene();
        assert_eq!(scene.scale(Node::Marker(0)), Some(2.0));
        assert!(scene.is_visible(Node::CentreDot));
    }

    #[test]
    fn quit_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit());
    }
}
