//! Input handling
//!
//! Maps keyboard events to dashboard state transitions.

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

use crate::capabilities::CapabilitySource;
use crate::state::DashboardState;

/// Handle an input event
pub fn handle_event<S: CapabilitySource>(event: Event, state: &mut DashboardState<S>) -> Result<()> {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key_event(key_event, state)
        }
        _ => Ok(()),
    }
}

/// Handle a key event
fn handle_key_event<S: CapabilitySource>(key: KeyEvent, state: &mut DashboardState<S>) -> Result<()> {
    // Handle help overlay
    if state.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Enter) {
            state.show_help = false;
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => state.should_quit = true,
        KeyCode::Char('?') => state.show_help = true,
        KeyCode::Char('p') | KeyCode::Char('P') => state.show_dashboard = !state.show_dashboard,
        KeyCode::Char('r') | KeyCode::Char('R') => {
            state.reset_requested = true;
            state.set_status("Metrics reset", false);
        }
        KeyCode::Char('m') | KeyCode::Char('M') => state.toggle_reduced_motion(),
        KeyCode::Char('o') | KeyCode::Char('O') => state.toggle_override(),
        KeyCode::Char('e') | KeyCode::Char('E') => state.export_report(),
        KeyCode::Char('i') | KeyCode::Char('I') => state.import_latest_report(),
        KeyCode::Char('d') | KeyCode::Char('D') => state.redetect_device(),
        KeyCode::Up => state.selected_field = state.selected_field.prev(),
        KeyCode::Down => state.selected_field = state.selected_field.next(),
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => state.adjust_selected(true),
        KeyCode::Left | KeyCode::Char('-') => state.adjust_selected(false),
        KeyCode::Char(' ') => state.adjust_selected(true),
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{EnvironmentSignals, FixedCapabilitySource};
    use crate::config::Config;
    use crate::context::PerformanceContext;
    use crossterm::event::KeyModifiers;

    fn press(state: &mut DashboardState<FixedCapabilitySource>, code: KeyCode) {
        let event = Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
        handle_event(event, state).unwrap();
    }

    fn state() -> DashboardState<FixedCapabilitySource> {
        let context = PerformanceContext::new(FixedCapabilitySource(EnvironmentSignals::default()));
        DashboardState::new(Config::default(), context)
    }

    #[test]
    fn test_quit_and_help() {
        let mut state = state();
        press(&mut state, KeyCode::Char('?'));
        assert!(state.show_help);

        // q is swallowed while help is open
        press(&mut state, KeyCode::Char('q'));
        assert!(!state.should_quit);

        press(&mut state, KeyCode::Esc);
        press(&mut state, KeyCode::Char('q'));
        assert!(state.should_quit);
    }

    #[test]
    fn test_motion_key_toggles_capability() {
        let mut state = state();
        press(&mut state, KeyCode::Char('m'));
        assert!(state.context.capabilities().prefers_reduced_motion);
        assert!(!state.context.optimized_props(crate::props::AnimationKind::Text).should_animate);
    }

    #[test]
    fn test_reset_key_sets_request() {
        let mut state = state();
        press(&mut state, KeyCode::Char('r'));
        assert!(state.reset_requested);
    }

    #[test]
    fn test_redetect_key_keeps_motion_toggle() {
        let mut state = state();
        press(&mut state, KeyCode::Char('m'));
        press(&mut state, KeyCode::Char('d'));
        assert!(state.context.capabilities().prefers_reduced_motion);
        assert!(state.status_message.starts_with("Device re-detected"));
    }
}
