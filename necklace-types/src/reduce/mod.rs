//! Pure state-mutation reducers for the store.
//!
//! These functions are the single source of truth for action → state
//! mutations. The store calls [`reduce_action`]; pattern views call
//! [`apply_change`] on their own copy of a processor's parameters so both
//! sides clamp values identically.
//!
//! Reducers are pure: they mutate `StoreState` only and never notify,
//! log or touch the scene.

mod params;

pub use params::{apply_change, sanitize_params};

use crate::{StateChange, StoreAction, StoreState};

/// Apply an action to the store state.
///
/// Returns the notification describing what changed, or `None` when the
/// action was a no-op (unknown processor, rejected value, nothing selected).
pub fn reduce_action(action: &StoreAction, state: &mut StoreState) -> Option<StateChange> {
    match action {
        StoreAction::CreateProcessor { params, position } => {
            let mut params = params.clone();
            sanitize_params(&mut params);
            let id = state.add_processor(params, *position);
            state.processor(id).cloned().map(StateChange::ProcessorCreated)
        }
        StoreAction::DeleteProcessor(id) => state
            .remove_processor(*id)
            .then_some(StateChange::ProcessorDeleted(*id)),
        StoreAction::SelectProcessor(id) => {
            if let Some(id) = id {
                state.processor(*id)?;
            }
            state.selected_id = *id;
            Some(StateChange::ProcessorSelected(*id))
        }
        StoreAction::DragSelectedProcessor { x, y } => {
            let id = state.selected_id?;
            let processor = state.processor_mut(id)?;
            processor.position[0] = *x;
            processor.position[1] = *y;
            Some(StateChange::SelectedProcessorDragged {
                processor_id: id,
                position: processor.position,
            })
        }
        StoreAction::ChangeParameter { processor_id, change } => {
            let processor = state.processor_mut(*processor_id)?;
            let applied = apply_change(change, &mut processor.params)?;
            Some(StateChange::ParameterChanged {
                processor_id: *processor_id,
                change: applied,
            })
        }
        StoreAction::ToggleConnectMode => {
            state.connect_mode_active = !state.connect_mode_active;
            Some(StateChange::ConnectModeToggled(state.connect_mode_active))
        }
        StoreAction::SetTheme(theme) => {
            state.theme = theme.clone();
            Some(StateChange::ThemeChanged(theme.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParamChange, PatternParams, ProcessorId, Theme};

    fn state_with_processor() -> (StoreState, ProcessorId) {
        let mut state = StoreState::new();
        let id = state.add_processor(PatternParams::default(), [0.0, 0.0, 0.0]);
        (state, id)
    }

    #[test]
    fn create_processor_notifies_with_data() {
        let mut state = StoreState::new();
        let change = reduce_action(
            &StoreAction::CreateProcessor {
                params: PatternParams::default(),
                position: [1.0, 2.0, 0.0],
            },
            &mut state,
        );
        match change {
            Some(StateChange::ProcessorCreated(data)) => {
                assert_eq!(data.position, [1.0, 2.0, 0.0]);
                assert_eq!(data.params.name, "Processor 1");
            }
            other => panic!("unexpected notification {:?}", other),
        }
    }

    #[test]
    fn create_processor_clamps_params() {
        let mut state = StoreState::new();
        let params = PatternParams { steps: 4, pulses: 9, ..PatternParams::default() };
        let change = reduce_action(
            &StoreAction::CreateProcessor { params, position: [0.0; 3] },
            &mut state,
        );
        match change {
            Some(StateChange::ProcessorCreated(data)) => {
                assert_eq!((data.params.steps, data.params.pulses), (4, 4));
            }
            other => panic!("unexpected notification {:?}", other),
        }
        assert_eq!(state.processors[0].params.pulses, 4);
    }

    #[test]
    fn change_parameter_reports_clamped_value() {
        let (mut state, id) = state_with_processor();
        let change = reduce_action(
            &StoreAction::ChangeParameter { processor_id: id, change: ParamChange::Pulses(99) },
            &mut state,
        );
        assert_eq!(
            change,
            Some(StateChange::ParameterChanged { processor_id: id, change: ParamChange::Pulses(16) })
        );
        assert_eq!(state.processor(id).unwrap().params.pulses, 16);
    }

    #[test]
    fn change_parameter_unknown_processor_is_noop() {
        let (mut state, _) = state_with_processor();
        let before = state.clone();
        let change = reduce_action(
            &StoreAction::ChangeParameter {
                processor_id: ProcessorId::new(42),
                change: ParamChange::Steps(4),
            },
            &mut state,
        );
        assert!(change.is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn drag_requires_selection() {
        let (mut state, id) = state_with_processor();
        assert!(reduce_action(&StoreAction::DragSelectedProcessor { x: 3.0, y: 4.0 }, &mut state).is_none());

        reduce_action(&StoreAction::SelectProcessor(Some(id)), &mut state);
        let change = reduce_action(&StoreAction::DragSelectedProcessor { x: 3.0, y: 4.0 }, &mut state);
        assert_eq!(
            change,
            Some(StateChange::SelectedProcessorDragged { processor_id: id, position: [3.0, 4.0, 0.0] })
        );
    }

    #[test]
    fn select_unknown_processor_ignored() {
        let (mut state, _) = state_with_processor();
        assert!(reduce_action(&StoreAction::SelectProcessor(Some(ProcessorId::new(9))), &mut state).is_none());
        assert_eq!(state.selected_id, None);
    }

    #[test]
    fn toggle_connect_mode_flips() {
        let mut state = StoreState::new();
        assert_eq!(
            reduce_action(&StoreAction::ToggleConnectMode, &mut state),
            Some(StateChange::ConnectModeToggled(true))
        );
        assert_eq!(
            reduce_action(&StoreAction::ToggleConnectMode, &mut state),
            Some(StateChange::ConnectModeToggled(false))
        );
    }

    #[test]
    fn set_theme_stores_theme() {
        let mut state = StoreState::new();
        reduce_action(&StoreAction::SetTheme(Theme::light()), &mut state);
        assert_eq!(state.theme.id, "light");
    }
}
