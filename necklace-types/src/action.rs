//! Action types for the store.
//!
//! `StoreAction` is what callers dispatch; `StateChange` is the typed
//! notification the store publishes to its subscribers after reducing.

use serde::{Deserialize, Serialize};

use crate::{ParamChange, PatternParams, ProcessorData, ProcessorId, Theme};

/// Intents dispatched to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreAction {
    CreateProcessor {
        params: PatternParams,
        position: [f32; 3],
    },
    DeleteProcessor(ProcessorId),
    SelectProcessor(Option<ProcessorId>),
    /// Move the selected processor's view to (x, y), keeping its depth
    DragSelectedProcessor { x: f32, y: f32 },
    ChangeParameter {
        processor_id: ProcessorId,
        change: ParamChange,
    },
    ToggleConnectMode,
    SetTheme(Theme),
}

/// Notifications published by the store once an action changed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateChange {
    ProcessorCreated(ProcessorData),
    ProcessorDeleted(ProcessorId),
    ProcessorSelected(Option<ProcessorId>),
    SelectedProcessorDragged {
        processor_id: ProcessorId,
        position: [f32; 3],
    },
    /// Carries the change as actually applied (after clamping)
    ParameterChanged {
        processor_id: ProcessorId,
        change: ParamChange,
    },
    ConnectModeToggled(bool),
    ThemeChanged(Theme),
}

impl StateChange {
    /// Processor the notification is addressed to, if it targets a single one.
    pub fn processor_id(&self) -> Option<ProcessorId> {
        match self {
            StateChange::ProcessorCreated(data) => Some(data.id),
            StateChange::ProcessorDeleted(id) => Some(*id),
            StateChange::SelectedProcessorDragged { processor_id, .. }
            | StateChange::ParameterChanged { processor_id, .. } => Some(*processor_id),
            StateChange::ProcessorSelected(_)
            | StateChange::ConnectModeToggled(_)
            | StateChange::ThemeChanged(_) => None,
        }
    }
}
