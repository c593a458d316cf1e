//! Input buffering
//!
//! Converts raw key-press/key-release events into the two sets the engine
//! consumes each tick: keys currently held, and keys freshly pressed this
//! tick. The just-pressed set is append-only between ticks and cleared by
//! the tick after processing, so a press is honored exactly once no matter
//! how long the key stays down or how many frames elapse between ticks.

use std::collections::BTreeSet;

/// Logical game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Restart,
}

impl Action {
    /// Map a DOM key identity to an action. Unrecognized keys are ignored.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Action::MoveLeft),
            "ArrowRight" | "d" | "D" => Some(Action::MoveRight),
            "ArrowUp" | "w" | "W" => Some(Action::Jump),
            " " => Some(Action::Restart),
            _ => None,
        }
    }
}

/// Held and just-pressed action sets
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: BTreeSet<Action>,
    just_pressed: BTreeSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a key-down event. Auto-repeat while held does not re-trigger
    /// the just-pressed set.
    pub fn key_down(&mut self, key: &str) {
        if let Some(action) = Action::from_key(key) {
            if !self.held.contains(&action) {
                self.just_pressed.insert(action);
            }
            self.held.insert(action);
        }
    }

    /// Process a key-up event
    pub fn key_up(&mut self, key: &str) {
        if let Some(action) = Action::from_key(key) {
            self.held.remove(&action);
            self.just_pressed.remove(&action);
        }
    }

    pub fn held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Consume the edge-triggered set (called by the tick after processing)
    pub fn clear_just_pressed(&mut self) {
        self.just_pressed.clear();
    }

    /// Drop all input state (e.g. on window blur)
    pub fn reset(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
    }
}
