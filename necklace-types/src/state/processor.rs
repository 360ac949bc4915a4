//! Processor collection held by the store.

use serde::{Deserialize, Serialize};

use super::pattern::PatternParams;
use super::theme::Theme;
use crate::ProcessorId;

const DEFAULT_NAME_PREFIX: &str = "Processor";

/// One pattern processor: its parameters and where its view sits in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorData {
    pub id: ProcessorId,
    pub params: PatternParams,
    pub position: [f32; 3],
}

/// Application-wide state owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    pub processors: Vec<ProcessorData>,
    pub selected_id: Option<ProcessorId>,
    pub connect_mode_active: bool,
    pub theme: Theme,
    pub next_processor_id: u32,
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreState {
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
            selected_id: None,
            connect_mode_active: false,
            theme: Theme::default(),
            next_processor_id: 1,
        }
    }

    pub fn processor(&self, id: ProcessorId) -> Option<&ProcessorData> {
        self.processors.iter().find(|p| p.id == id)
    }

    pub fn processor_mut(&mut self, id: ProcessorId) -> Option<&mut ProcessorData> {
        self.processors.iter_mut().find(|p| p.id == id)
    }

    /// Add a processor and return its id. An empty name is replaced by the
    /// next free "Processor N" name.
    pub fn add_processor(&mut self, mut params: PatternParams, position: [f32; 3]) -> ProcessorId {
        let id = ProcessorId::new(self.next_processor_id);
        self.next_processor_id += 1;
        if params.name.is_empty() {
            params.name = self.default_processor_name();
        }
        self.processors.push(ProcessorData { id, params, position });
        id
    }

    pub fn remove_processor(&mut self, id: ProcessorId) -> bool {
        let before = self.processors.len();
        self.processors.retain(|p| p.id != id);
        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
        self.processors.len() != before
    }

    /// "Processor N" where N is one above the highest number already in use.
    pub fn default_processor_name(&self) -> String {
        let highest = self
            .processors
            .iter()
            .filter(|p| p.params.name.starts_with(DEFAULT_NAME_PREFIX))
            .filter_map(|p| {
                let (_, number) = p.params.name.rsplit_once(' ')?;
                number.trim().parse::<u32>().ok()
            })
            .max()
            .unwrap_or(0);
        format!("{} {}", DEFAULT_NAME_PREFIX, highest + 1)
    }
}
