//! Terminal mouse capture via `crossterm`.
//!
//! Puts the terminal in raw mode with mouse capture enabled and turns
//! button presses and releases into [`InputEvent`]s. Raw mode swallows the
//! interrupt signal, so `Ctrl+C` and `q` are reported as
//! [`SourceEvent::Shutdown`] instead.

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::io;
use std::time::Duration;

use super::{EventSource, EventType, InputEvent, SourceEvent, BTN_LEFT, BTN_MIDDLE, BTN_RIGHT, REL_WHEEL};

/// Production event source that uses crossterm's event polling + read
#[derive(Debug)]
pub struct TerminalSource {
    active: bool,
}

impl TerminalSource {
    /// Enable raw mode and mouse capture on stdout
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode for terminal")?;
        execute!(io::stdout(), EnableMouseCapture).context("Failed to enable mouse capture")?;
        Ok(Self { active: true })
    }

    /// Restore the terminal; safe to call more than once
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(io::stdout(), DisableMouseCapture).context("Failed to restore terminal")?;
        disable_raw_mode().context("Failed to disable raw mode")?;
        Ok(())
    }
}

impl Drop for TerminalSource {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

impl EventSource for TerminalSource {
    fn next_event(&mut self, timeout: Duration) -> Result<Option<SourceEvent>> {
        if !event::poll(timeout).context("Failed to poll for events")? {
            return Ok(None);
        }
        let event = event::read().context("Failed to read terminal event")?;
        Ok(translate(&event))
    }
}

fn button_key(button: MouseButton) -> &'static str {
    match button {
        MouseButton::Left => BTN_LEFT,
        MouseButton::Right => BTN_RIGHT,
        MouseButton::Middle => BTN_MIDDLE,
    }
}

/// Map a terminal event onto the input model
pub fn translate(event: &Event) -> Option<SourceEvent> {
    match event {
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(button) => {
                Some(SourceEvent::Input(InputEvent::press(button_key(button))))
            }
            MouseEventKind::Up(button) => {
                Some(SourceEvent::Input(InputEvent::release(button_key(button))))
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                Some(SourceEvent::Input(InputEvent {
                    event_type: EventType::Relative,
                    code: 0x08,
                    scancode: 0,
                    value: if mouse.kind == MouseEventKind::ScrollUp { 1 } else { -1 },
                    key: REL_WHEEL.to_string(),
                }))
            }
            _ => None,
        },
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(SourceEvent::Shutdown)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(SourceEvent::Shutdown),
            _ => None,
        },
        _ => None,
    }
}
