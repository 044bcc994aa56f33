/// Keyboard sampling.
///
/// Movement wants a level-triggered "is this arrow down right now"
/// signal, but most terminals only deliver Press/Repeat events. Each
/// key's last event time is recorded and the key counts as held until
/// that timestamp goes stale; terminals that do report Release events
/// (keyboard enhancement) clear the key immediately instead.
///
/// Menu actions (difficulty choice, pause, mute, restart) are
/// edge-triggered: they fire only on the frame a key first goes down.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::FrameInput;

/// A key without a Press/Repeat event for this long counts as released.
/// Terminal key-repeat arrives well under this, so a held arrow never
/// flickers between repeats.
const REPEAT_GRACE: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Last Press/Repeat timestamp per key.
    down_at: HashMap<KeyCode, Instant>,
    /// Keys that went down this frame.
    pressed: Vec<KeyCode>,
    /// Ctrl+C seen this frame.
    interrupted: bool,
    /// Trust Release events instead of the grace timeout. Stays false
    /// until keyboard enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            down_at: HashMap::with_capacity(16),
            pressed: Vec::with_capacity(8),
            interrupted: false,
            honor_release: false,
        }
    }

    /// Pump the terminal event queue. Call once per frame, before the
    /// simulation tick.
    pub fn drain_events(&mut self) {
        self.pressed.clear();
        self.interrupted = false;

        while event::poll(Duration::ZERO).unwrap_or(false) {
            let Ok(Event::Key(key)) = event::read() else {
                continue;
            };
            if is_ctrl_c(&key) {
                self.interrupted = true;
            }
            if key.kind == KeyEventKind::Release {
                if self.honor_release {
                    self.down_at.remove(&key.code);
                }
                continue;
            }
            let was_down = self
                .down_at
                .get(&key.code)
                .is_some_and(|t| t.elapsed() < REPEAT_GRACE);
            self.down_at.insert(key.code, Instant::now());
            if !was_down {
                self.pressed.push(key.code);
            }
        }

        // Drop keys whose repeats stopped arriving.
        let now = Instant::now();
        self.down_at
            .retain(|_, t| now.duration_since(*t) < REPEAT_GRACE);
    }

    /// The four direction-held signals for this tick. Arrows and WASD
    /// both count.
    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            up: self.held_any(&[KeyCode::Up, KeyCode::Char('w')]),
            down: self.held_any(&[KeyCode::Down, KeyCode::Char('s')]),
            left: self.held_any(&[KeyCode::Left, KeyCode::Char('a')]),
            right: self.held_any(&[KeyCode::Right, KeyCode::Char('d')]),
        }
    }

    /// Did this key go down this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.interrupted
    }

    fn held(&self, code: KeyCode) -> bool {
        self.down_at
            .get(&code)
            .is_some_and(|t| t.elapsed() < REPEAT_GRACE)
    }

    fn held_any(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|&c| self.held(c))
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}
