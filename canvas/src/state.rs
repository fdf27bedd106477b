//! Style state: the single record describing one cover's appearance.
//!
//! `StyleState` is owned by the host (browser engine or CLI) and passed by
//! reference into the pure renderer and hit-tester. Every user edit arrives
//! as a `(Field, FieldValue)` pair and is applied through
//! [`StyleState::apply`], which only coerces types; it does not clamp ranges.
//!
//! The `drag` field is transient gesture state. It is never persisted (see
//! [`crate::persist`]) and is reset to idle whenever the state is reset.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Rgb;
use crate::consts::CANVAS_CENTER;
use crate::input::DragState;
use crate::viewport::Point;

/// How the background is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    /// Two-stop gradient along `direction`.
    #[default]
    Linear,
    /// Two-stop gradient radiating from the canvas center.
    Radial,
    /// Flat `color1` fill.
    Solid,
}

impl BackgroundType {
    pub const ALL: [Self; 3] = [Self::Linear, Self::Radial, Self::Solid];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Radial => "radial",
            Self::Solid => "solid",
        }
    }
}

impl FromStr for BackgroundType {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "linear" => Ok(Self::Linear),
            "radial" => Ok(Self::Radial),
            "solid" => Ok(Self::Solid),
            other => Err(UnknownName(other.to_owned())),
        }
    }
}

/// Error for a name that does not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown name: {0:?}")]
pub struct UnknownName(pub String);

/// All user-adjustable parameters of a cover plus transient drag state.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleState {
    pub background_type: BackgroundType,
    pub color1: Rgb,
    /// Unused when the background is solid.
    pub color2: Rgb,
    /// Gradient angle in degrees (0 = up); linear backgrounds only.
    pub direction: f64,
    /// Newline-separated lines of text.
    pub text_content: String,
    /// Font size in pixels.
    pub text_size: f64,
    pub text_color: Rgb,
    /// Font family name or CSS font stack.
    pub font_family: String,
    /// CSS font weight, e.g. `"700"`.
    pub font_weight: String,
    /// Extra spacing after each character, in pixels.
    pub letter_spacing: f64,
    /// Line height as a multiple of `text_size`.
    pub line_height: f64,
    /// Center of the text block, in canvas pixels.
    pub pos_x: f64,
    pub pos_y: f64,
    pub text_shadow: bool,
    /// Active gesture. Not persisted.
    pub drag: DragState,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            background_type: BackgroundType::Linear,
            color1: Rgb::new(0xFF, 0x00, 0xCC),
            color2: Rgb::new(0x33, 0x33, 0x99),
            direction: 45.0,
            text_content: "My Playlist".to_owned(),
            text_size: 60.0,
            text_color: Rgb::WHITE,
            font_family: "'Outfit', sans-serif".to_owned(),
            font_weight: "700".to_owned(),
            letter_spacing: 0.0,
            line_height: 1.2,
            pos_x: CANVAS_CENTER,
            pos_y: CANVAS_CENTER,
            text_shadow: true,
            drag: DragState::Idle,
        }
    }
}

impl StyleState {
    /// The text anchor (center of the text block).
    #[must_use]
    pub fn anchor(&self) -> Point {
        Point::new(self.pos_x, self.pos_y)
    }

    /// Move the text anchor.
    pub fn set_anchor(&mut self, anchor: Point) {
        self.pos_x = anchor.x;
        self.pos_y = anchor.y;
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Apply one field edit, coercing `value` to the field's type.
    ///
    /// Returns `false` (leaving the state untouched) when the value cannot be
    /// coerced, or when a size/line-height is not strictly positive.
    pub fn apply(&mut self, field: Field, value: &FieldValue) -> bool {
        let applied = match field {
            Field::BackgroundType => set(&mut self.background_type, value.text().and_then(parse_opt)),
            Field::Color1 => set(&mut self.color1, value.color()),
            Field::Color2 => set(&mut self.color2, value.color()),
            Field::Direction => set(&mut self.direction, value.number()),
            Field::TextContent => set(&mut self.text_content, value.text().map(str::to_owned)),
            Field::TextSize => set(&mut self.text_size, value.number().filter(|v| *v > 0.0)),
            Field::TextColor => set(&mut self.text_color, value.color()),
            Field::LetterSpacing => set(&mut self.letter_spacing, value.number()),
            Field::LineHeight => set(&mut self.line_height, value.number().filter(|v| *v > 0.0)),
            Field::FontFamily => set(&mut self.font_family, value.text().map(str::to_owned)),
            Field::FontWeight => set(&mut self.font_weight, value.text_or_number()),
            Field::PosX => set(&mut self.pos_x, value.number()),
            Field::PosY => set(&mut self.pos_y, value.number()),
            Field::TextShadow => set(&mut self.text_shadow, value.toggle()),
        };

        if !applied {
            debug!(field = %field, ?value, "field edit rejected");
        }
        applied
    }
}

/// An editable field, named as in the persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    BackgroundType,
    Color1,
    Color2,
    Direction,
    TextContent,
    TextSize,
    TextColor,
    LetterSpacing,
    LineHeight,
    FontFamily,
    FontWeight,
    PosX,
    PosY,
    TextShadow,
}

impl Field {
    pub const ALL: [Self; 14] = [
        Self::BackgroundType,
        Self::Color1,
        Self::Color2,
        Self::Direction,
        Self::TextContent,
        Self::TextSize,
        Self::TextColor,
        Self::LetterSpacing,
        Self::LineHeight,
        Self::FontFamily,
        Self::FontWeight,
        Self::PosX,
        Self::PosY,
        Self::TextShadow,
    ];

    /// The persisted key / form field name.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::BackgroundType => "bgType",
            Self::Color1 => "color1",
            Self::Color2 => "color2",
            Self::Direction => "direction",
            Self::TextContent => "textContent",
            Self::TextSize => "textSize",
            Self::TextColor => "textColor",
            Self::LetterSpacing => "letterSpacing",
            Self::LineHeight => "lineHeight",
            Self::FontFamily => "fontFamily",
            Self::FontWeight => "fontWeight",
            Self::PosX => "posX",
            Self::PosY => "posY",
            Self::TextShadow => "textShadow",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| UnknownName(s.to_owned()))
    }
}

/// A raw value emitted by an input control.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text, select and color inputs.
    Text(String),
    /// Range and number inputs.
    Number(f64),
    /// Checkboxes.
    Toggle(bool),
}

impl FieldValue {
    fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) | Self::Toggle(_) => None,
        }
    }

    fn text_or_number(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Toggle(_) => None,
        }
    }

    fn number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => parse_opt::<f64>(s.trim()),
            Self::Toggle(_) => None,
        };
        n.filter(|v| v.is_finite())
    }

    fn color(&self) -> Option<Rgb> {
        self.text().and_then(parse_opt)
    }

    fn toggle(&self) -> Option<bool> {
        match self {
            Self::Toggle(b) => Some(*b),
            Self::Text(s) => match s.trim() {
                "true" | "on" | "1" => Some(true),
                "false" | "off" | "0" => Some(false),
                _ => None,
            },
            Self::Number(_) => None,
        }
    }
}

fn set<T>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

/// Parse, logging the error and treating it as "not coercible".
pub(crate) fn parse_opt<T>(s: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match s.parse() {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(input = s, error = %e, "value not coercible");
            None
        }
    }
}
