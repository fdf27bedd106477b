//! Native software rasterizer: a 512×512 RGBA [`Surface`].
//!
//! Backgrounds are evaluated per pixel center. Guide lines are antialiased by
//! distance to the segment. Text is shaped and rasterized with `cosmic-text`;
//! letter spacing is added after every glyph, and the drop shadow is the
//! glyph mask shifted, blurred with three box passes (close to a Gaussian of
//! σ = blur / 2), tinted and composited under the glyphs.
//!
//! Without any installed font the rasterizer still paints background and
//! guides; text is skipped and measured with [`FixedAdvance`].

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use std::convert::Infallible;
use std::io::Cursor;
use std::path::Path;

use cosmic_text::{Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache, Weight, fontdb};
use image::{ImageFormat, RgbaImage};
use tracing::{debug, info, warn};

use crate::color::Rgb;
use crate::consts::{CANVAS_SIZE, CANVAS_SIZE_PX, FIXED_ADVANCE_RATIO, MAX_RASTER_TEXT_PX};
use crate::error::CoverError;
use crate::hit::Bounds;
use crate::layout::{FixedAdvance, Font, TextMeasure};
use crate::render::{Paint, Shadow, Stroke, Surface, TextStyle};
use crate::viewport::Point;

type Pixel = image::Rgba<u8>;

const SIZE: usize = CANVAS_SIZE_PX as usize;
const BLUR_PASSES: usize = 3;

/// RGBA canvas with its own font system.
pub struct Raster {
    image: RgbaImage,
    fonts: FontSystem,
    swash: SwashCache,
    style: Option<TextStyle>,
    shadow: Shadow,
    warned_no_fonts: bool,
}

impl Default for Raster {
    fn default() -> Self {
        Self::new()
    }
}

impl Raster {
    /// A transparent canvas using the system fonts.
    #[must_use]
    pub fn new() -> Self {
        Self::with_font_system(FontSystem::new())
    }

    /// A transparent canvas using `fonts`.
    #[must_use]
    pub fn with_font_system(fonts: FontSystem) -> Self {
        Self {
            image: RgbaImage::new(CANVAS_SIZE_PX, CANVAS_SIZE_PX),
            fonts,
            swash: SwashCache::new(),
            style: None,
            shadow: Shadow::NONE,
            warned_no_fonts: false,
        }
    }

    /// Add every font file found under `dir`.
    pub fn load_font_dir(&mut self, dir: &Path) {
        let before = self.fonts.db().len();
        self.fonts.db_mut().load_fonts_dir(dir);
        info!(dir = %dir.display(), faces = self.fonts.db().len() - before, "fonts loaded");
    }

    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// RGBA at `(x, y)`, `None` outside the canvas.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Encode the current pixels as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`CoverError::Encode`] if the encoder fails.
    pub fn encode_png(&self) -> Result<Vec<u8>, CoverError> {
        let mut out = Cursor::new(Vec::new());
        self.image
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| CoverError::Encode(e.to_string()))?;
        Ok(out.into_inner())
    }

    fn has_fonts(&mut self) -> bool {
        if !self.fonts.db().is_empty() {
            return true;
        }
        if !self.warned_no_fonts {
            warn!("no fonts installed; text will not be drawn");
            self.warned_no_fonts = true;
        }
        false
    }

    fn shape(&mut self, font: &Font, text: &str) -> Buffer {
        let size = to_f32(font.size);
        let mut buffer = Buffer::new(&mut self.fonts, Metrics::new(size, size));
        buffer.set_size(&mut self.fonts, None, None);
        let attrs = attrs_for(self.fonts.db(), font);
        buffer.set_text(&mut self.fonts, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.fonts, false);
        buffer
    }

    /// Coverage of `text` centered on `center`, one value per canvas pixel.
    fn glyph_mask(&mut self, font: &Font, text: &str, center: Point) -> Vec<f32> {
        let mut mask = vec![0.0_f32; SIZE * SIZE];
        let buffer = self.shape(font, text);
        let spacing = to_f32(font.letter_spacing);
        let left = to_f32(center.x) - line_width(&buffer, spacing) / 2.0;
        let top = to_f32(center.y - font.size / 2.0);
        let reach = to_f32(font.size + self.shadow_reach());

        for run in buffer.layout_runs() {
            let baseline = top + run.line_y;
            if !near_canvas(baseline, reach) {
                continue;
            }
            for (i, glyph) in run.glyphs.iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let advance = i as f32 * spacing;
                if !near_canvas(left + advance + glyph.x, reach) {
                    continue;
                }
                let physical = glyph.physical((left + advance, baseline), 1.0);
                let white = Color::rgba(255, 255, 255, 255);
                self.swash.with_pixels(&mut self.fonts, physical.cache_key, white, |x, y, color| {
                    if let Some(idx) = index(physical.x + x, physical.y + y) {
                        mask[idx] = mask[idx].max(f32::from(color.a()) / 255.0);
                    }
                });
            }
        }
        mask
    }

    /// How far the shadow can reach beyond the glyph ink.
    fn shadow_reach(&self) -> f64 {
        if !self.shadow.is_visible() {
            return 0.0;
        }
        self.shadow.offset_x.abs().max(self.shadow.offset_y.abs()) + self.shadow.blur * 2.0
    }

    fn composite(&mut self, mask: &[f32], color: Rgb, alpha: f64) {
        for (cov, px) in mask.iter().zip(self.image.pixels_mut()) {
            if *cov > 0.0 {
                blend(px, color, alpha * f64::from(*cov));
            }
        }
    }
}

impl TextMeasure for Raster {
    fn measure_text(&mut self, font: &Font, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        if !self.has_fonts() {
            return FixedAdvance { ratio: FIXED_ADVANCE_RATIO }.measure_text(font, text);
        }
        let buffer = self.shape(font, text);
        f64::from(line_width(&buffer, to_f32(font.letter_spacing)))
    }
}

impl Surface for Raster {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Infallible> {
        for px in self.image.pixels_mut() {
            *px = image::Rgba([0, 0, 0, 0]);
        }
        Ok(())
    }

    fn fill_background(&mut self, paint: &Paint) -> Result<(), Infallible> {
        for (x, y, px) in self.image.enumerate_pixels_mut() {
            let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            blend(px, paint_at(paint, center), 1.0);
        }
        Ok(())
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), Infallible> {
        let reach = stroke.width / 2.0 + 1.0;
        let (min_x, max_x) = (from.x.min(to.x) - reach, from.x.max(to.x) + reach);
        let (min_y, max_y) = (from.y.min(to.y) - reach, from.y.max(to.y) + reach);
        for (x, y, px) in self.image.enumerate_pixels_mut() {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if p.x < min_x || p.x > max_x || p.y < min_y || p.y > max_y {
                continue;
            }
            let coverage = (stroke.width / 2.0 + 0.5 - segment_distance(p, from, to)).clamp(0.0, 1.0);
            if coverage > 0.0 {
                blend(px, stroke.color.rgb(), stroke.color.a * coverage);
            }
        }
        Ok(())
    }

    fn set_text_style(&mut self, style: &TextStyle) -> Result<(), Infallible> {
        self.style = Some(style.clone());
        Ok(())
    }

    fn set_shadow(&mut self, shadow: &Shadow) -> Result<(), Infallible> {
        self.shadow = *shadow;
        Ok(())
    }

    fn fill_text(&mut self, text: &str, center: Point) -> Result<(), Infallible> {
        let Some(style) = self.style.clone() else {
            warn!("fill_text before set_text_style; skipped");
            return Ok(());
        };
        if text.is_empty() || !self.has_fonts() {
            return Ok(());
        }
        if style.font.size > MAX_RASTER_TEXT_PX {
            warn!(size = style.font.size, "text size beyond rasterizer limit; skipped");
            return Ok(());
        }
        let reach = style.font.size + self.shadow_reach();
        let width = self.measure_text(&style.font, text);
        let line = Bounds::centered(center, width + 2.0 * reach, 2.0 * reach);
        if !overlaps_canvas(&line) {
            debug!(x = center.x, y = center.y, "line entirely off canvas; skipped");
            return Ok(());
        }

        let mask = self.glyph_mask(&style.font, text, center);
        if self.shadow.is_visible() {
            let shadow = self.shadow;
            let mut blurred = shifted(&mask, shadow.offset_x, shadow.offset_y);
            box_blur(&mut blurred, blur_radius(shadow.blur));
            self.composite(&blurred, shadow.color.rgb(), shadow.color.a);
        }
        self.composite(&mask, style.color, 1.0);
        Ok(())
    }
}

/// Pick the first installed family of the CSS stack, or the first generic one.
fn attrs_for<'a>(db: &fontdb::Database, font: &'a Font) -> Attrs<'a> {
    let family = font
        .family
        .split(',')
        .map(|name| name.trim().trim_matches(|c| c == '\'' || c == '"'))
        .find_map(|name| match name {
            "serif" => Some(Family::Serif),
            "sans-serif" => Some(Family::SansSerif),
            "monospace" => Some(Family::Monospace),
            "cursive" => Some(Family::Cursive),
            "fantasy" => Some(Family::Fantasy),
            _ if is_installed(db, name) => Some(Family::Name(name)),
            _ => None,
        })
        .unwrap_or(Family::SansSerif);
    Attrs::new().family(family).weight(parse_weight(&font.weight))
}

fn is_installed(db: &fontdb::Database, name: &str) -> bool {
    !name.is_empty() && db.faces().any(|face| face.families.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)))
}

/// CSS weight keyword or number; anything else is normal.
fn parse_weight(weight: &str) -> Weight {
    match weight.trim() {
        "bold" | "bolder" => Weight::BOLD,
        "lighter" => Weight::LIGHT,
        other => match other.parse::<u16>() {
            Ok(n) if (1..=1000).contains(&n) => Weight(n),
            _ => Weight::NORMAL,
        },
    }
}

fn line_width(buffer: &Buffer, spacing: f32) -> f32 {
    buffer
        .layout_runs()
        .map(|run| {
            #[allow(clippy::cast_precision_loss)]
            let glyphs = run.glyphs.len() as f32;
            glyphs.mul_add(spacing, run.line_w)
        })
        .fold(0.0, f32::max)
}

/// True when `bounds` touches the canvas; false for non-finite edges.
fn overlaps_canvas(bounds: &Bounds) -> bool {
    bounds.right >= 0.0 && bounds.left <= CANVAS_SIZE && bounds.bottom >= 0.0 && bounds.top <= CANVAS_SIZE
}

/// Whether a glyph origin at `v` can put ink on the canvas; keeps glyph
/// offsets well inside `i32` for the glyph cache.
fn near_canvas(v: f32, reach: f32) -> bool {
    v > -reach && v < to_f32(CANVAS_SIZE) + reach
}

fn paint_at(paint: &Paint, p: Point) -> Rgb {
    match *paint {
        Paint::Solid(color) => color,
        Paint::Linear { start, end, from, to } => {
            let d = end - start;
            let len2 = d.x.mul_add(d.x, d.y * d.y);
            let t = if len2 > 0.0 { (p.x - start.x).mul_add(d.x, (p.y - start.y) * d.y) / len2 } else { 0.0 };
            from.lerp(to, t)
        }
        Paint::Radial { center, radius, from, to } => {
            let t = if radius > 0.0 { (p.x - center.x).hypot(p.y - center.y) / radius } else { 1.0 };
            from.lerp(to, t)
        }
    }
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let ap = p - a;
    let len2 = ab.x.mul_add(ab.x, ab.y * ab.y);
    let t = if len2 > 0.0 { (ap.x.mul_add(ab.x, ap.y * ab.y) / len2).clamp(0.0, 1.0) } else { 0.0 };
    (ap.x - ab.x * t).hypot(ap.y - ab.y * t)
}

/// Source-over blend of `color` at `alpha` onto `dst`.
fn blend(dst: &mut Pixel, color: Rgb, alpha: f64) {
    let a = alpha.clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    let [dr, dg, db, da] = dst.0;
    let da = f64::from(da) / 255.0;
    let out_a = a + da * (1.0 - a);
    let mix = |s: u8, d: u8| to_u8((f64::from(s) * a + f64::from(d) * da * (1.0 - a)) / out_a);
    dst.0 = [mix(color.r, dr), mix(color.g, dg), mix(color.b, db), to_u8(out_a * 255.0)];
}

fn to_u8(v: f64) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let out = v.round().clamp(0.0, 255.0) as u8;
    out
}

fn to_f32(v: f64) -> f32 {
    #[allow(clippy::cast_possible_truncation)]
    let out = v as f32;
    out
}

fn index(x: i32, y: i32) -> Option<usize> {
    match (usize::try_from(x), usize::try_from(y)) {
        (Ok(x), Ok(y)) if x < SIZE && y < SIZE => Some(y * SIZE + x),
        _ => None,
    }
}

/// `mask` moved by the rounded offset; pixels moved off the canvas are dropped.
fn shifted(mask: &[f32], dx: f64, dy: f64) -> Vec<f32> {
    #[allow(clippy::cast_possible_truncation)]
    let (dx, dy) = (dx.round() as i32, dy.round() as i32);
    let mut out = vec![0.0_f32; mask.len()];
    for (i, cov) in mask.iter().enumerate().filter(|(_, c)| **c > 0.0) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let (x, y) = ((i % SIZE) as i32, (i / SIZE) as i32);
        if let Some(j) = index(x + dx, y + dy) {
            out[j] = *cov;
        }
    }
    out
}

/// Box radius whose three passes approximate a Gaussian of σ = `blur` / 2.
fn blur_radius(blur: f64) -> usize {
    let sigma = blur / 2.0;
    let width = (4.0 * sigma * sigma + 1.0).sqrt();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let radius = ((width - 1.0) / 2.0).round().max(0.0) as usize;
    radius
}

fn box_blur(mask: &mut [f32], radius: usize) {
    if radius == 0 {
        return;
    }
    let mut tmp = vec![0.0_f32; mask.len()];
    for _ in 0..BLUR_PASSES {
        blur_pass(mask, &mut tmp, radius, true);
        blur_pass(&tmp, mask, radius, false);
    }
}

fn blur_pass(src: &[f32], dst: &mut [f32], radius: usize, horizontal: bool) {
    #[allow(clippy::cast_precision_loss)]
    let window = (2 * radius + 1) as f32;
    for line in 0..SIZE {
        let at = |i: usize| if horizontal { line * SIZE + i } else { i * SIZE + line };
        let mut sum: f32 = (0..=radius.min(SIZE - 1)).map(|i| src[at(i)]).sum();
        for i in 0..SIZE {
            dst[at(i)] = sum / window;
            if i + radius + 1 < SIZE {
                sum += src[at(i + radius + 1)];
            }
            if i >= radius {
                sum -= src[at(i - radius)];
            }
        }
    }
}
