//! Display list: a surface that records drawing calls instead of pixels.

#[cfg(test)]
#[path = "paint_test.rs"]
mod paint_test;

use std::convert::Infallible;

use serde::Serialize;

use crate::layout::{FixedAdvance, Font, TextMeasure};
use crate::render::{Paint, Shadow, Stroke, Surface, TextStyle};
use crate::state::StyleState;
use crate::viewport::Point;

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PaintCommand {
    Clear,
    FillBackground { paint: Paint },
    StrokeLine { from: Point, to: Point, stroke: Stroke },
    SetTextStyle { style: TextStyle },
    SetShadow { shadow: Shadow },
    FillText { text: String, center: Point },
}

/// Records every call made by [`crate::render::draw`].
///
/// Measurement is delegated to a [`FixedAdvance`] measurer.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    commands: Vec<PaintCommand>,
    measure: FixedAdvance,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    #[must_use]
    pub fn into_commands(self) -> Vec<PaintCommand> {
        self.commands
    }
}

/// Record one frame of `state`.
#[must_use]
pub fn record(state: &StyleState) -> Vec<PaintCommand> {
    let mut recorder = Recorder::new();
    let Ok(()) = crate::render::draw(&mut recorder, state);
    recorder.into_commands()
}

impl TextMeasure for Recorder {
    fn measure_text(&mut self, font: &Font, text: &str) -> f64 {
        self.measure.measure_text(font, text)
    }
}

impl Surface for Recorder {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Infallible> {
        // A clear wipes everything recorded so far, like it wipes pixels.
        self.commands.clear();
        self.commands.push(PaintCommand::Clear);
        Ok(())
    }

    fn fill_background(&mut self, paint: &Paint) -> Result<(), Infallible> {
        self.commands.push(PaintCommand::FillBackground { paint: *paint });
        Ok(())
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), Infallible> {
        self.commands.push(PaintCommand::StrokeLine { from, to, stroke: *stroke });
        Ok(())
    }

    fn set_text_style(&mut self, style: &TextStyle) -> Result<(), Infallible> {
        self.commands.push(PaintCommand::SetTextStyle { style: style.clone() });
        Ok(())
    }

    fn set_shadow(&mut self, shadow: &Shadow) -> Result<(), Infallible> {
        self.commands.push(PaintCommand::SetShadow { shadow: *shadow });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, center: Point) -> Result<(), Infallible> {
        self.commands.push(PaintCommand::FillText { text: text.to_owned(), center });
        Ok(())
    }
}
