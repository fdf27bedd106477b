//! Persistence: the stored form of [`StyleState`] and the storage seam.
//!
//! The stored form is a flat JSON object keyed by the field names in
//! [`Field::key`]. Drag state is never written. Loading merges field by
//! field over the defaults, so a record written by an older build (missing
//! keys) or damaged by hand (wrong types) still loads; only the bad fields
//! fall back.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::color::Rgb;
use crate::error::CoverError;
use crate::input::DragState;
use crate::state::{BackgroundType, Field, StyleState, parse_opt};

/// Storage key under which the state is kept.
pub const STORAGE_KEY: &str = "playlistCoverState";

/// A string key/value store (browser `localStorage`, a directory of files, memory).
pub trait Storage {
    /// Read the value for `key`, `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`CoverError::Storage`] when the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, CoverError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CoverError::Storage`] when the backend cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoverError>;
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoverError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoverError> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// The persisted record: every field except drag state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Persisted<'a> {
    bg_type: BackgroundType,
    color1: Rgb,
    color2: Rgb,
    direction: f64,
    text_content: &'a str,
    text_size: f64,
    text_color: Rgb,
    font_family: &'a str,
    font_weight: &'a str,
    letter_spacing: f64,
    line_height: f64,
    pos_x: f64,
    pos_y: f64,
    text_shadow: bool,
}

impl<'a> From<&'a StyleState> for Persisted<'a> {
    fn from(s: &'a StyleState) -> Self {
        Self {
            bg_type: s.background_type,
            color1: s.color1,
            color2: s.color2,
            direction: s.direction,
            text_content: &s.text_content,
            text_size: s.text_size,
            text_color: s.text_color,
            font_family: &s.font_family,
            font_weight: &s.font_weight,
            letter_spacing: s.letter_spacing,
            line_height: s.line_height,
            pos_x: s.pos_x,
            pos_y: s.pos_y,
            text_shadow: s.text_shadow,
        }
    }
}

/// Serialize `state` to its stored JSON form.
///
/// # Errors
///
/// Returns [`CoverError::Json`] if serialization fails.
pub fn encode(state: &StyleState) -> Result<String, CoverError> {
    Ok(serde_json::to_string(&Persisted::from(state))?)
}

/// Rebuild a state from stored JSON, merging field by field over the defaults.
///
/// Never fails: unparseable input yields the defaults. The result is idle.
#[must_use]
pub fn decode(raw: &str) -> StyleState {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => merge(&value),
        Err(e) => {
            warn!(error = %e, "stored state is not JSON; using defaults");
            StyleState::default()
        }
    }
}

/// Overlay the fields present and well-typed in `value` onto the defaults.
#[must_use]
pub fn merge(value: &Value) -> StyleState {
    let defaults = StyleState::default();
    if !value.is_object() {
        warn!("stored state is not an object; using defaults");
        return defaults;
    }
    let get = |field: Field| value.get(field.key());

    StyleState {
        background_type: get(Field::BackgroundType)
            .and_then(Value::as_str)
            .and_then(parse_opt)
            .unwrap_or(defaults.background_type),
        color1: color(get(Field::Color1)).unwrap_or(defaults.color1),
        color2: color(get(Field::Color2)).unwrap_or(defaults.color2),
        direction: number(get(Field::Direction)).unwrap_or(defaults.direction),
        text_content: string(get(Field::TextContent)).unwrap_or(defaults.text_content),
        text_size: number(get(Field::TextSize))
            .filter(|v| *v > 0.0)
            .unwrap_or(defaults.text_size),
        text_color: color(get(Field::TextColor)).unwrap_or(defaults.text_color),
        font_family: string(get(Field::FontFamily)).unwrap_or(defaults.font_family),
        font_weight: get(Field::FontWeight)
            .and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or(defaults.font_weight),
        letter_spacing: number(get(Field::LetterSpacing)).unwrap_or(defaults.letter_spacing),
        line_height: number(get(Field::LineHeight))
            .filter(|v| *v > 0.0)
            .unwrap_or(defaults.line_height),
        pos_x: number(get(Field::PosX)).unwrap_or(defaults.pos_x),
        pos_y: number(get(Field::PosY)).unwrap_or(defaults.pos_y),
        text_shadow: get(Field::TextShadow)
            .and_then(Value::as_bool)
            .unwrap_or(defaults.text_shadow),
        drag: DragState::Idle,
    }
}

fn number(v: Option<&Value>) -> Option<f64> {
    let n = match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_opt::<f64>(s.trim()),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn string(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str).map(str::to_owned)
}

fn color(v: Option<&Value>) -> Option<Rgb> {
    v.and_then(Value::as_str).and_then(parse_opt)
}

/// Load the state from `storage`, or the defaults when absent or unreadable.
pub fn load<S: Storage + ?Sized>(storage: &S) -> StyleState {
    match storage.get_item(STORAGE_KEY) {
        Ok(Some(raw)) => decode(&raw),
        Ok(None) => StyleState::default(),
        Err(e) => {
            warn!(error = %e, "state load failed; using defaults");
            StyleState::default()
        }
    }
}

/// Write `state` (minus drag state) to `storage`.
///
/// # Errors
///
/// Returns an error if encoding or the storage write fails.
pub fn save<S: Storage + ?Sized>(storage: &mut S, state: &StyleState) -> Result<(), CoverError> {
    let raw = encode(state)?;
    storage.set_item(STORAGE_KEY, &raw)
}
