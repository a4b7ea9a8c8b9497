//! # Input Events
//!
//! The event model shared by every event source, and the [`EventSource`]
//! trait the live counter reads from.
//!
//! Only button presses on the primary activation channel are counted: events
//! of type [`EventType::Key`] with a scancode of zero and a value of one.

pub mod terminal;

use anyhow::Result;
use std::time::Duration;

pub use terminal::TerminalSource;

pub const BTN_LEFT: &str = "BTN_LEFT";
pub const BTN_RIGHT: &str = "BTN_RIGHT";
pub const BTN_MIDDLE: &str = "BTN_MIDDLE";
pub const REL_LEFT: &str = "REL_LEFT";
pub const REL_RIGHT: &str = "REL_RIGHT";
pub const REL_WHEEL: &str = "REL_WHEEL";

/// Event category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// Buttons and keys
    Key,
    /// Relative motion such as scrolling
    Relative,
    Other,
}

/// A single input occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub event_type: EventType,
    pub code: u16,
    pub scancode: u32,
    /// 1 = press, 0 = release
    pub value: i32,
    /// Symbolic name, e.g. `BTN_LEFT`
    pub key: String,
}

impl InputEvent {
    pub fn press(key: &str) -> Self {
        Self::button(key, 1)
    }

    pub fn release(key: &str) -> Self {
        Self::button(key, 0)
    }

    fn button(key: &str, value: i32) -> Self {
        Self {
            event_type: EventType::Key,
            code: button_code(key),
            scancode: 0,
            value,
            key: key.to_string(),
        }
    }

    /// Whether this event belongs to the monitored class at all
    pub fn is_counted(&self) -> bool {
        self.event_type == EventType::Key && self.scancode == 0
    }

    /// Whether this event is a press in the monitored class
    pub fn is_activation(&self) -> bool {
        self.is_counted() && self.value == 1
    }
}

/// Linux input codes for the buttons we know by name
fn button_code(key: &str) -> u16 {
    match key {
        BTN_LEFT => 0x110,
        BTN_RIGHT => 0x111,
        BTN_MIDDLE => 0x112,
        REL_LEFT => 0x113,
        REL_RIGHT => 0x114,
        _ => 0,
    }
}

/// What a source hands back on each poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    Input(InputEvent),
    /// The user asked to stop from within the source
    Shutdown,
}

/// Trait for reading input events (allows dependency injection for testing)
pub trait EventSource: Send {
    /// Wait up to `timeout` for the next event
    fn next_event(&mut self, timeout: Duration) -> Result<Option<SourceEvent>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let press = InputEvent::press(BTN_LEFT);
        assert!(press.is_counted());
        assert!(press.is_activation());
        assert_eq!(press.code, 0x110);

        let release = InputEvent::release(BTN_LEFT);
        assert!(release.is_counted());
        assert!(!release.is_activation());
    }

    #[test]
    fn test_other_classes_are_not_counted() {
        let mut scroll = InputEvent::press(REL_WHEEL);
        scroll.event_type = EventType::Relative;
        assert!(!scroll.is_activation());

        let mut keyboard = InputEvent::press("KEY_A");
        keyboard.scancode = 30;
        assert!(!keyboard.is_counted());
    }
}
