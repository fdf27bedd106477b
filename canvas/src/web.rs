//! Browser host: `Canvas2D` surface, `localStorage` and the JS-facing engine.
//!
//! The page wires DOM events to [`Engine`] methods. Every method turns its
//! arguments into an [`InputEvent`], runs it through [`EngineCore::handle`],
//! then carries out the returned actions against the DOM.

use std::str::FromStr;

use js_sys::{Array, Reflect};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement};

use crate::color::Rgb;
use crate::consts::CANVAS_SIZE;
use crate::engine::{Action, EngineCore, RESET_PROMPT, export_file_name};
use crate::error::CoverError;
use crate::input::{Button, InputEvent};
use crate::layout::{FixedAdvance, Font, TextMeasure};
use crate::persist::{self, MemoryStorage, Storage};
use crate::render::{Paint, Shadow, Stroke, Surface, TextStyle, draw};
use crate::state::{Field, FieldValue};
use crate::viewport::{DisplayRect, Point};

/// Send log output to the browser console and panics to `console.error`.
/// Later calls are no-ops.
#[cfg(target_arch = "wasm32")]
fn install_console_logging() {
    static INSTALL: std::sync::Once = std::sync::Once::new();
    INSTALL.call_once(|| {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            warn!(error = %e, "console logger not installed; another logger is active");
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn install_console_logging() {}

// =============================================================
// Surface
// =============================================================

/// [`Surface`] over a `CanvasRenderingContext2d`.
pub struct WebSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebSurface {
    /// Bind to the 2D context of `canvas`.
    ///
    /// # Errors
    ///
    /// Fails when the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    fn apply_font(&self, font: &Font) -> Result<(), JsValue> {
        self.ctx.set_font(&font.css());
        self.apply_letter_spacing(font.letter_spacing)
    }

    /// Use the context's `letterSpacing` when the browser has it, otherwise
    /// the canvas element's CSS `letter-spacing`, which text drawing inherits.
    fn apply_letter_spacing(&self, px: f64) -> Result<(), JsValue> {
        let value = format!("{px}px");
        let key = JsValue::from_str("letterSpacing");
        if Reflect::has(&self.ctx, &key)? {
            Reflect::set(&self.ctx, &key, &JsValue::from_str(&value))?;
        } else {
            self.canvas.style().set_property("letter-spacing", &value)?;
        }
        Ok(())
    }

    fn fill_gradient(&self, gradient: &CanvasGradient, from: Rgb, to: Rgb) -> Result<(), JsValue> {
        gradient.add_color_stop(0.0, &from.to_string())?;
        gradient.add_color_stop(1.0, &to.to_string())?;
        self.ctx.set_fill_style_canvas_gradient(gradient);
        Ok(())
    }
}

impl TextMeasure for WebSurface {
    fn measure_text(&mut self, font: &Font, text: &str) -> f64 {
        let measured = self.apply_font(font).and_then(|()| self.ctx.measure_text(text));
        match measured {
            Ok(metrics) => metrics.width(),
            Err(e) => {
                warn!(error = ?e, "measureText failed; using fixed advance");
                FixedAdvance::default().measure_text(font, text)
            }
        }
    }
}

impl Surface for WebSurface {
    type Error = JsValue;

    fn clear(&mut self) -> Result<(), JsValue> {
        self.ctx.clear_rect(0.0, 0.0, CANVAS_SIZE, CANVAS_SIZE);
        Ok(())
    }

    fn fill_background(&mut self, paint: &Paint) -> Result<(), JsValue> {
        match *paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&color.to_string()),
            Paint::Linear { start, end, from, to } => {
                let gradient = self.ctx.create_linear_gradient(start.x, start.y, end.x, end.y);
                self.fill_gradient(&gradient, from, to)?;
            }
            Paint::Radial { center, radius, from, to } => {
                let gradient =
                    self.ctx.create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)?;
                self.fill_gradient(&gradient, from, to)?;
            }
        }
        self.ctx.fill_rect(0.0, 0.0, CANVAS_SIZE, CANVAS_SIZE);
        Ok(())
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), JsValue> {
        self.ctx.set_stroke_style_str(&stroke.color.css());
        self.ctx.set_line_width(stroke.width);
        self.ctx.set_line_dash(&Array::new())?;
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
        Ok(())
    }

    fn set_text_style(&mut self, style: &TextStyle) -> Result<(), JsValue> {
        self.apply_font(&style.font)?;
        self.ctx.set_fill_style_str(&style.color.to_string());
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        Ok(())
    }

    fn set_shadow(&mut self, shadow: &Shadow) -> Result<(), JsValue> {
        self.ctx.set_shadow_color(&shadow.color.css());
        self.ctx.set_shadow_blur(shadow.blur);
        self.ctx.set_shadow_offset_x(shadow.offset_x);
        self.ctx.set_shadow_offset_y(shadow.offset_y);
        Ok(())
    }

    fn fill_text(&mut self, text: &str, center: Point) -> Result<(), JsValue> {
        self.ctx.fill_text(text, center.x, center.y)
    }
}

// =============================================================
// Storage
// =============================================================

/// [`Storage`] over `window.localStorage`.
pub struct LocalStorage(web_sys::Storage);

impl LocalStorage {
    /// The window's local storage, if the browser grants it.
    #[must_use]
    pub fn from_window() -> Option<Self> {
        match web_sys::window()?.local_storage() {
            Ok(storage) => storage.map(Self),
            Err(e) => {
                warn!(error = ?e, "localStorage unavailable");
                None
            }
        }
    }
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoverError> {
        self.0.get_item(key).map_err(|e| CoverError::Storage(format!("{e:?}")))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoverError> {
        self.0.set_item(key, value).map_err(|e| CoverError::Storage(format!("{e:?}")))
    }
}

// =============================================================
// Engine
// =============================================================

/// The canvas engine as seen from JavaScript.
#[wasm_bindgen]
pub struct Engine {
    canvas: HtmlCanvasElement,
    surface: WebSurface,
    storage: Box<dyn Storage>,
    core: EngineCore,
}

#[wasm_bindgen]
impl Engine {
    /// Bind to `canvas`, restore the saved state and draw it.
    ///
    /// # Errors
    ///
    /// Fails when the canvas has no 2D context or the first draw fails.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<Engine, JsValue> {
        install_console_logging();
        let surface = WebSurface::new(canvas.clone())?;
        let storage: Box<dyn Storage> = match LocalStorage::from_window() {
            Some(local) => Box::new(local),
            None => Box::new(MemoryStorage::new()),
        };
        let state = persist::load(&*storage);
        let core = EngineCore::new(state, random_seed());
        let mut engine = Self { canvas, surface, storage, core };
        engine.render()?;
        Ok(engine)
    }

    /// A form control named `key` changed to `value` (string, number or boolean).
    ///
    /// # Errors
    ///
    /// Propagates drawing and DOM failures.
    pub fn on_field_changed(&mut self, key: &str, value: JsValue) -> Result<(), JsValue> {
        let field = match Field::from_str(key) {
            Ok(field) => field,
            Err(e) => {
                warn!(error = %e, "ignoring change to unknown field");
                return Ok(());
            }
        };
        let value = if let Some(b) = value.as_bool() {
            FieldValue::Toggle(b)
        } else if let Some(n) = value.as_f64() {
            FieldValue::Number(n)
        } else if let Some(s) = value.as_string() {
            FieldValue::Text(s)
        } else {
            warn!(field = %field, "ignoring non-scalar field value");
            return Ok(());
        };
        self.dispatch(InputEvent::FieldChanged { field, value })
    }

    /// # Errors
    ///
    /// Propagates drawing and DOM failures.
    pub fn on_pointer_down(&mut self, client_x: f64, client_y: f64) -> Result<(), JsValue> {
        self.dispatch(InputEvent::PointerDown(Point::new(client_x, client_y)))
    }

    /// # Errors
    ///
    /// Propagates drawing and DOM failures.
    pub fn on_pointer_move(&mut self, client_x: f64, client_y: f64) -> Result<(), JsValue> {
        self.dispatch(InputEvent::PointerMove(Point::new(client_x, client_y)))
    }

    /// # Errors
    ///
    /// Propagates drawing and DOM failures.
    pub fn on_pointer_up(&mut self) -> Result<(), JsValue> {
        self.dispatch(InputEvent::PointerUp)
    }

    /// # Errors
    ///
    /// Propagates drawing and DOM failures.
    pub fn on_pointer_leave(&mut self) -> Result<(), JsValue> {
        self.dispatch(InputEvent::PointerLeave)
    }

    /// # Errors
    ///
    /// Propagates encoding and DOM failures.
    pub fn on_download(&mut self) -> Result<(), JsValue> {
        self.dispatch(InputEvent::ButtonPressed(Button::Download))
    }

    /// # Errors
    ///
    /// Propagates drawing and DOM failures.
    pub fn on_randomize(&mut self) -> Result<(), JsValue> {
        self.dispatch(InputEvent::ButtonPressed(Button::Randomize))
    }

    /// # Errors
    ///
    /// Propagates drawing and DOM failures.
    pub fn on_reset(&mut self) -> Result<(), JsValue> {
        self.dispatch(InputEvent::ButtonPressed(Button::Reset))
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Propagates drawing failures.
    pub fn render(&mut self) -> Result<(), JsValue> {
        draw(&mut self.surface, &self.core.state)
    }

    /// The persisted form of the current state, for syncing form controls.
    ///
    /// # Errors
    ///
    /// Fails if the state cannot be serialized.
    pub fn state_json(&self) -> Result<String, JsValue> {
        persist::encode(&self.core.state).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Engine {
    fn dispatch(&mut self, event: InputEvent) -> Result<(), JsValue> {
        let rect = self.canvas.get_bounding_client_rect();
        self.core.set_display_rect(DisplayRect::new(rect.left(), rect.top(), rect.width(), rect.height()));
        for action in self.core.handle(event, &mut self.surface) {
            self.perform(action)?;
        }
        Ok(())
    }

    fn perform(&mut self, action: Action) -> Result<(), JsValue> {
        match action {
            Action::RenderNeeded => self.render(),
            Action::Persist => {
                if let Err(e) = persist::save(&mut *self.storage, &self.core.state) {
                    warn!(error = %e, "state save failed");
                }
                Ok(())
            }
            Action::SetCursor(cursor) => self.canvas.style().set_property("cursor", cursor.css()),
            Action::ConfirmReset => {
                let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
                if window.confirm_with_message(RESET_PROMPT)? {
                    self.dispatch(InputEvent::ResetConfirmed)?;
                }
                Ok(())
            }
            Action::Export => self.export(),
        }
    }

    fn export(&self) -> Result<(), JsValue> {
        let url = self.canvas.to_data_url_with_type("image/png")?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let link = document.create_element("a")?.dyn_into::<HtmlAnchorElement>()?;
        link.set_download(&export_file_name(now_millis()));
        link.set_href(&url);
        link.click();
        Ok(())
    }
}

fn now_millis() -> u64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let millis = js_sys::Date::now().max(0.0) as u64;
    millis
}

fn random_seed() -> u64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let seed = (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64;
    seed
}
