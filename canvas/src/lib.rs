//! Rendering and input engine for the playlist cover editor.
//!
//! The crate compiles to WebAssembly for the browser page and natively for
//! the CLI. It owns the whole cover model: the style state, the renderer
//! that paints it, the hit-tester and drag controller that let a pointer move
//! the text, and the persisted form of the state. Hosts only translate their
//! events into [`input::InputEvent`]s and carry out the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Event dispatch through the testable [`engine::EngineCore`] |
//! | [`state`] | The style record, its fields and value coercion |
//! | [`input`] | Input events, the drag state machine and snapping |
//! | [`render`] | The `Surface` seam and the frame drawing routine |
//! | [`layout`] | Text-block geometry and text measurement |
//! | [`hit`] | Hit-testing against the text block |
//! | [`paint`] | Display-list surface recording drawing calls |
//! | [`raster`] | Native RGBA rasterizer and PNG export (not on wasm) |
//! | [`web`] | `Canvas2D` surface, `localStorage` and the JS engine |
//! | [`persist`] | Stored form of the state and the storage seam |
//! | [`viewport`] | Points and display-to-canvas scaling |
//! | [`color`] | Hex colors |
//! | [`error`] | Persistence and export errors |
//! | [`consts`] | Canvas size, snap band, shadow parameters |

pub mod color;
pub mod consts;
pub mod engine;
pub mod error;
pub mod hit;
pub mod input;
pub mod layout;
pub mod paint;
pub mod persist;
#[cfg(not(target_arch = "wasm32"))]
pub mod raster;
pub mod render;
pub mod state;
pub mod viewport;
pub mod web;
