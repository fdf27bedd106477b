//! Event dispatch: the single entry point that turns host input into state
//! changes and host actions.
//!
//! [`EngineCore`] holds everything that does not depend on a browser: the
//! style state, where the canvas sits on the display, and the random source
//! for the randomize button. The browser wrapper lives in [`crate::web`]; the
//! CLI drives `EngineCore` directly.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::color::Rgb;
use crate::hit::hit_test;
use crate::input::{Button, Cursor, DragState, InputEvent};
use crate::layout::TextMeasure;
use crate::state::{BackgroundType, Field, FieldValue, StyleState};
use crate::viewport::{DisplayRect, Point};

/// Question the host asks before carrying out [`Action::ConfirmReset`].
pub const RESET_PROMPT: &str = "Are you sure you want to reset all settings?";

/// Actions returned from [`EngineCore::handle`] for the host to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Repaint the canvas from the current state.
    RenderNeeded,
    /// Write the current state to storage.
    Persist,
    /// Change the pointer affordance over the canvas.
    SetCursor(Cursor),
    /// Ask the user to confirm a reset; answer with [`InputEvent::ResetConfirmed`].
    ConfirmReset,
    /// Encode the canvas as PNG and offer it as a download.
    Export,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub state: StyleState,
    pub display: DisplayRect,
    rng: SmallRng,
}

impl EngineCore {
    /// Create an engine over `state`. `seed` drives the randomize button.
    #[must_use]
    pub fn new(state: StyleState, seed: u64) -> Self {
        Self { state, display: DisplayRect::default(), rng: SmallRng::seed_from_u64(seed) }
    }

    /// Update where the canvas is displayed, in client pixels.
    pub fn set_display_rect(&mut self, display: DisplayRect) {
        self.display = display;
    }

    /// Dispatch one input event. `measure` sizes text for hit-testing.
    pub fn handle<M: TextMeasure + ?Sized>(&mut self, event: InputEvent, measure: &mut M) -> Vec<Action> {
        match event {
            InputEvent::FieldChanged { field, value } => self.on_field_changed(field, &value),
            InputEvent::PointerDown(client) => self.on_pointer_down(client, measure),
            InputEvent::PointerMove(client) => self.on_pointer_move(client, measure),
            InputEvent::PointerUp => self.on_pointer_up(),
            InputEvent::PointerLeave => self.on_pointer_leave(),
            InputEvent::ButtonPressed(button) => self.on_button(button),
            InputEvent::ResetConfirmed => {
                self.reset();
                vec![Action::Persist, Action::RenderNeeded]
            }
        }
    }

    /// Pick a random background type, two random colors and a whole-degree
    /// direction in `0..=360`, all at once.
    pub fn randomize_background(&mut self) {
        let kinds = BackgroundType::ALL;
        self.state.background_type = kinds[self.rng.random_range(0..kinds.len())];
        self.state.color1 = Rgb::random(&mut self.rng);
        self.state.color2 = Rgb::random(&mut self.rng);
        self.state.direction = f64::from(self.rng.random_range(0..=360_u16));
        debug!(
            kind = self.state.background_type.as_str(),
            color1 = %self.state.color1,
            color2 = %self.state.color2,
            direction = self.state.direction,
            "background randomized"
        );
    }

    /// Replace the whole state with the defaults, ending any drag.
    pub fn reset(&mut self) {
        self.state = StyleState::default();
        debug!("state reset to defaults");
    }

    // --- Handlers ---

    fn on_field_changed(&mut self, field: Field, value: &FieldValue) -> Vec<Action> {
        if self.state.apply(field, value) {
            vec![Action::Persist, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    fn on_pointer_down<M: TextMeasure + ?Sized>(&mut self, client: Point, measure: &mut M) -> Vec<Action> {
        let pt = self.display.to_canvas(client);
        if !hit_test(&self.state, pt, measure) {
            return Vec::new();
        }
        self.state.drag = DragState::grab(pt, self.state.anchor());
        debug!(x = pt.x, y = pt.y, "drag started");
        vec![Action::SetCursor(Cursor::Grabbing), Action::RenderNeeded]
    }

    fn on_pointer_move<M: TextMeasure + ?Sized>(&mut self, client: Point, measure: &mut M) -> Vec<Action> {
        let pt = self.display.to_canvas(client);
        match self.state.drag.target(pt) {
            Some(anchor) => {
                self.state.set_anchor(anchor);
                vec![Action::Persist, Action::RenderNeeded]
            }
            None => {
                let cursor = if hit_test(&self.state, pt, measure) { Cursor::Grab } else { Cursor::Default };
                vec![Action::SetCursor(cursor)]
            }
        }
    }

    fn on_pointer_up(&mut self) -> Vec<Action> {
        self.end_drag();
        vec![Action::SetCursor(Cursor::Default), Action::RenderNeeded]
    }

    fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.end_drag();
        vec![Action::RenderNeeded]
    }

    fn on_button(&mut self, button: Button) -> Vec<Action> {
        match button {
            Button::Download => vec![Action::Export],
            Button::Randomize => {
                self.randomize_background();
                vec![Action::Persist, Action::RenderNeeded]
            }
            Button::Reset => vec![Action::ConfirmReset],
        }
    }

    fn end_drag(&mut self) {
        if self.state.is_dragging() {
            debug!(x = self.state.pos_x, y = self.state.pos_y, "drag ended");
        }
        self.state.drag = DragState::Idle;
    }
}

/// Download file name for an export taken at `unix_millis`.
#[must_use]
pub fn export_file_name(unix_millis: u64) -> String {
    format!("cover-{unix_millis}.png")
}
