//! Project save/load as JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use necklace_types::reduce::sanitize_params;
use necklace_types::{PatternParams, ProcessorData, ProcessorId, StoreState, Theme};

const PROJECT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum ProjectError {
    Io(std::io::Error),
    Json(serde_json::Error),
    UnsupportedVersion(u32),
}

impl From<std::io::Error> for ProjectError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ProjectError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl std::fmt::Display for ProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Json(e) => write!(f, "JSON error: {}", e),
            Self::UnsupportedVersion(v) => write!(f, "unsupported project version {}", v),
        }
    }
}

impl std::error::Error for ProjectError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ProjectFile {
    version: u32,
    theme: String,
    processors: Vec<ProcessorEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ProcessorEntry {
    id: ProcessorId,
    position: [f32; 3],
    params: PatternParams,
}

/// `<data_dir>/necklace/project.json`
pub fn default_project_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("necklace")
        .join("project.json")
}

pub fn save_project(path: &Path, state: &StoreState) -> Result<(), ProjectError> {
    let file = ProjectFile {
        version: PROJECT_VERSION,
        theme: state.theme.id.clone(),
        processors: state
            .processors
            .iter()
            .map(|p| ProcessorEntry {
                id: p.id,
                position: p.position,
                params: p.params.clone(),
            })
            .collect(),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&file)?;
    std::fs::write(path, json)?;
    log::info!(
        target: "project",
        "saved {} processors to {}",
        file.processors.len(),
        path.display()
    );
    Ok(())
}

/// Load a project into a fresh store state. Selection and connect mode are
/// not persisted and start cleared.
pub fn load_project(path: &Path) -> Result<StoreState, ProjectError> {
    let contents = std::fs::read_to_string(path)?;
    let file: ProjectFile = serde_json::from_str(&contents)?;
    if file.version > PROJECT_VERSION {
        return Err(ProjectError::UnsupportedVersion(file.version));
    }

    let mut state = StoreState::new();
    state.theme = Theme::by_id(&file.theme).unwrap_or_else(|| {
        log::warn!(target: "project", "unknown theme '{}' in project", file.theme);
        Theme::default()
    });
    state.next_processor_id = file
        .processors
        .iter()
        .map(|p| p.id.get() + 1)
        .max()
        .unwrap_or(1);
    state.processors = file
        .processors
        .into_iter()
        .map(|p| {
            let mut params = p.params;
            if sanitize_params(&mut params) {
                log::warn!(
                    target: "project",
                    "{}: out-of-range params in project, clamped to steps={} pulses={}",
                    p.id,
                    params.steps,
                    params.pulses
                );
            }
            ProcessorData {
                id: p.id,
                params,
                position: p.position,
            }
        })
        .collect();

    log::info!(
        target: "project",
        "loaded {} processors from {}",
        state.processors.len(),
        path.display()
    );
    Ok(state)
}
