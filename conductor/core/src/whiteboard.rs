//! Whiteboards
//!
//! Each persona has a freehand drawing surface. [`Whiteboard`] is a thin
//! façade that tracks the pen (colour, width, erase mode) and forwards
//! everything else to a [`SketchCanvas`] backend. The default backend,
//! [`StrokeCanvas`], keeps vector strokes and rasterizes them only on export.
//!
//! # History
//!
//! The canvas keeps an action log of strokes and clears. Undo moves the
//! last action to the redo stack, so a clear can be undone like any stroke.
//! Starting a new stroke empties the redo stack.
//!
//! # Export
//!
//! Export produces a PNG on a white background named
//! `<persona-slug>-whiteboard.png`.

use std::path::{Path, PathBuf};

use image::{ImageEncoder, Rgba, RgbaImage};
use thiserror::Error;

use crate::persona::Persona;

/// RGB triple
pub type Rgb = [u8; 3];

/// Canvas background; erasing paints with it
pub const CANVAS_BACKGROUND: Rgb = [0xff, 0xff, 0xff];

/// Selectable stroke widths in pixels
pub const STROKE_WIDTHS: [u32; 6] = [1, 2, 3, 5, 8, 12];

/// Default stroke width
pub const DEFAULT_STROKE_WIDTH: u32 = 3;

/// Whiteboard errors
#[derive(Debug, Error)]
pub enum WhiteboardError {
    /// PNG encoding failed
    #[error("failed to encode whiteboard: {0}")]
    Encode(#[from] image::ImageError),

    /// Canvas has a zero dimension
    #[error("canvas has no area ({width}x{height})")]
    EmptyCanvas {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

/// A named palette entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteColor {
    /// Display name
    pub name: &'static str,
    /// Colour value
    pub rgb: Rgb,
}

/// Stroke colours offered on a persona's whiteboard; the persona's
/// signature colour comes first
#[must_use]
pub fn palette(persona: Persona) -> [PaletteColor; 8] {
    [
        PaletteColor {
            name: "Primary",
            rgb: persona.signature_rgb(),
        },
        PaletteColor {
            name: "Black",
            rgb: [0x00, 0x00, 0x00],
        },
        PaletteColor {
            name: "Red",
            rgb: [0xef, 0x44, 0x44],
        },
        PaletteColor {
            name: "Blue",
            rgb: [0x3b, 0x82, 0xf6],
        },
        PaletteColor {
            name: "Green",
            rgb: [0x10, 0xb9, 0x81],
        },
        PaletteColor {
            name: "Purple",
            rgb: [0x8b, 0x5c, 0xf6],
        },
        PaletteColor {
            name: "Orange",
            rgb: [0xf9, 0x73, 0x16],
        },
        PaletteColor {
            name: "Pink",
            rgb: [0xec, 0x48, 0x99],
        },
    ]
}

/// A point in canvas pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Horizontal, 0 at the left edge
    pub x: f32,
    /// Vertical, 0 at the top edge
    pub y: f32,
}

impl Point {
    /// Construct a point
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One freehand stroke
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// Polyline through the sampled pointer positions
    pub points: Vec<Point>,
    /// Ink colour (the background colour for erase strokes)
    pub color: Rgb,
    /// Width in pixels
    pub width: u32,
    /// Whether this stroke erases
    pub erase: bool,
}

/// Backing canvas used by [`Whiteboard`]
pub trait SketchCanvas: Send {
    /// Canvas size in pixels
    fn size(&self) -> (u32, u32);
    /// Start a stroke at `at`
    fn begin_stroke(&mut self, at: Point, color: Rgb, width: u32);
    /// Extend the stroke in progress
    fn extend_stroke(&mut self, to: Point);
    /// Commit the stroke in progress
    fn end_stroke(&mut self);
    /// Subsequent strokes erase instead of ink
    fn set_erase_mode(&mut self, erase: bool);
    /// Undo the last action; false if there was nothing to undo
    fn undo(&mut self) -> bool;
    /// Redo the last undone action; false if there was nothing to redo
    fn redo(&mut self) -> bool;
    /// Wipe the canvas (undoable)
    fn clear(&mut self);
    /// Committed strokes currently visible, oldest first
    fn visible_strokes(&self) -> Vec<&Stroke>;
    /// Stroke in progress, if any
    fn active_stroke(&self) -> Option<&Stroke>;
    /// Rasterize to PNG bytes
    fn export_png(&self) -> Result<Vec<u8>, WhiteboardError>;
}

#[derive(Clone, Debug, PartialEq)]
enum CanvasAction {
    Stroke(Stroke),
    Clear,
}

/// Vector stroke canvas, rasterized on export
#[derive(Clone, Debug)]
pub struct StrokeCanvas {
    width: u32,
    height: u32,
    actions: Vec<CanvasAction>,
    undone: Vec<CanvasAction>,
    active: Option<Stroke>,
    erase: bool,
}

impl StrokeCanvas {
    /// Create a blank canvas
    pub fn new(width: u32, height: u32) -> Result<Self, WhiteboardError> {
        if width == 0 || height == 0 {
            return Err(WhiteboardError::EmptyCanvas { width, height });
        }
        Ok(Self {
            width,
            height,
            actions: Vec::new(),
            undone: Vec::new(),
            active: None,
            erase: false,
        })
    }

    /// Rasterize visible strokes onto a white image
    #[must_use]
    pub fn rasterize(&self) -> RgbaImage {
        let [r, g, b] = CANVAS_BACKGROUND;
        let mut img = RgbaImage::from_pixel(self.width, self.height, Rgba([r, g, b, 0xff]));
        for stroke in self.visible_strokes() {
            paint_stroke(&mut img, stroke);
        }
        img
    }
}

impl SketchCanvas for StrokeCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn begin_stroke(&mut self, at: Point, color: Rgb, width: u32) {
        let color = if self.erase { CANVAS_BACKGROUND } else { color };
        self.active = Some(Stroke {
            points: vec![at],
            color,
            width: width.max(1),
            erase: self.erase,
        });
    }

    fn extend_stroke(&mut self, to: Point) {
        if let Some(stroke) = self.active.as_mut() {
            if stroke.points.last() != Some(&to) {
                stroke.points.push(to);
            }
        }
    }

    fn end_stroke(&mut self) {
        if let Some(stroke) = self.active.take() {
            self.undone.clear();
            self.actions.push(CanvasAction::Stroke(stroke));
        }
    }

    fn set_erase_mode(&mut self, erase: bool) {
        self.erase = erase;
    }

    fn undo(&mut self) -> bool {
        match self.actions.pop() {
            Some(action) => {
                self.undone.push(action);
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        match self.undone.pop() {
            Some(action) => {
                self.actions.push(action);
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        self.active = None;
        if self.visible_strokes().is_empty() {
            return;
        }
        self.undone.clear();
        self.actions.push(CanvasAction::Clear);
    }

    fn visible_strokes(&self) -> Vec<&Stroke> {
        let since_clear = self
            .actions
            .iter()
            .rposition(|a| matches!(a, CanvasAction::Clear))
            .map_or(0, |i| i + 1);
        self.actions[since_clear..]
            .iter()
            .filter_map(|a| match a {
                CanvasAction::Stroke(s) => Some(s),
                CanvasAction::Clear => None,
            })
            .collect()
    }

    fn active_stroke(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    fn export_png(&self) -> Result<Vec<u8>, WhiteboardError> {
        let img = self.rasterize();
        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf).write_image(
            img.as_raw(),
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(buf)
    }
}

fn paint_stroke(img: &mut RgbaImage, stroke: &Stroke) {
    let [r, g, b] = stroke.color;
    let ink = Rgba([r, g, b, 0xff]);
    let radius = (stroke.width as f32 / 2.0).max(0.5);

    let mut points = stroke.points.iter();
    let Some(&first) = points.next() else {
        return;
    };
    stamp(img, first, radius, ink);
    let mut prev = first;
    for &next in points {
        let dx = next.x - prev.x;
        let dy = next.y - prev.y;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            stamp(img, Point::new(prev.x + dx * t, prev.y + dy * t), radius, ink);
        }
        prev = next;
    }
}

/// Paint a filled disc of `radius` centred on `at`
fn stamp(img: &mut RgbaImage, at: Point, radius: f32, ink: Rgba<u8>) {
    let (w, h) = img.dimensions();
    let reach = radius.ceil() as i64;
    let cx = at.x.round() as i64;
    let cy = at.y.round() as i64;
    let r2 = radius * radius;
    for oy in -reach..=reach {
        for ox in -reach..=reach {
            if (ox * ox + oy * oy) as f32 > r2 {
                continue;
            }
            let (x, y) = (cx + ox, cy + oy);
            if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
                img.put_pixel(x as u32, y as u32, ink);
            }
        }
    }
}

/// A persona's whiteboard: pen state plus a canvas backend
#[derive(Debug)]
pub struct Whiteboard<C: SketchCanvas = StrokeCanvas> {
    persona: Persona,
    canvas: C,
    color: Rgb,
    stroke_width: u32,
    erase: bool,
}

impl Whiteboard<StrokeCanvas> {
    /// Create a blank whiteboard with a [`StrokeCanvas`]
    pub fn new(
        persona: Persona,
        width: u32,
        height: u32,
        stroke_width: u32,
    ) -> Result<Self, WhiteboardError> {
        Ok(Self::with_canvas(
            persona,
            StrokeCanvas::new(width, height)?,
            stroke_width,
        ))
    }
}

impl<C: SketchCanvas> Whiteboard<C> {
    /// Wrap an existing canvas
    pub fn with_canvas(persona: Persona, canvas: C, stroke_width: u32) -> Self {
        let stroke_width = if STROKE_WIDTHS.contains(&stroke_width) {
            stroke_width
        } else {
            DEFAULT_STROKE_WIDTH
        };
        Self {
            persona,
            canvas,
            color: persona.signature_rgb(),
            stroke_width,
            erase: false,
        }
    }

    /// Owner
    pub fn persona(&self) -> Persona {
        self.persona
    }

    /// Panel title
    pub fn title(&self) -> &'static str {
        self.persona.whiteboard_title()
    }

    /// Backing canvas
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Colours on offer
    pub fn palette(&self) -> [PaletteColor; 8] {
        palette(self.persona)
    }

    /// Current ink colour
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Pick an ink colour
    pub fn set_color(&mut self, rgb: Rgb) {
        self.color = rgb;
    }

    /// Advance to the next palette colour
    pub fn cycle_color(&mut self) -> PaletteColor {
        let palette = self.palette();
        let next = palette
            .iter()
            .position(|c| c.rgb == self.color)
            .map_or(0, |i| (i + 1) % palette.len());
        self.color = palette[next].rgb;
        palette[next]
    }

    /// Current stroke width
    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    /// Pick a stroke width; only widths from [`STROKE_WIDTHS`] are accepted
    pub fn set_stroke_width(&mut self, width: u32) -> bool {
        if STROKE_WIDTHS.contains(&width) {
            self.stroke_width = width;
            true
        } else {
            false
        }
    }

    /// Advance to the next stroke width
    pub fn cycle_stroke_width(&mut self) -> u32 {
        let next = STROKE_WIDTHS
            .iter()
            .position(|w| *w == self.stroke_width)
            .map_or(0, |i| (i + 1) % STROKE_WIDTHS.len());
        self.stroke_width = STROKE_WIDTHS[next];
        self.stroke_width
    }

    /// Whether the pen erases
    pub fn erase_mode(&self) -> bool {
        self.erase
    }

    /// Flip between pen and eraser
    pub fn toggle_erase(&mut self) -> bool {
        self.set_erase(!self.erase);
        self.erase
    }

    /// Select the pen (or eraser) explicitly
    pub fn set_erase(&mut self, erase: bool) {
        self.erase = erase;
        self.canvas.set_erase_mode(erase);
    }

    /// Pointer pressed
    pub fn pen_down(&mut self, at: Point) {
        self.canvas.begin_stroke(at, self.color, self.stroke_width);
    }

    /// Pointer dragged
    pub fn pen_move(&mut self, to: Point) {
        self.canvas.extend_stroke(to);
    }

    /// Pointer released
    pub fn pen_up(&mut self) {
        self.canvas.end_stroke();
    }

    /// Undo the last stroke or clear
    pub fn undo(&mut self) -> bool {
        self.canvas.undo()
    }

    /// Redo the last undone action
    pub fn redo(&mut self) -> bool {
        self.canvas.redo()
    }

    /// Wipe the board
    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    /// Export file name, `<slug>-whiteboard.png`
    pub fn file_name(&self) -> String {
        format!("{}-whiteboard.png", self.persona.slug())
    }

    /// Where an export into `dir` lands
    pub fn export_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }

    /// Rasterize to PNG bytes
    pub fn export_png(&self) -> Result<Vec<u8>, WhiteboardError> {
        self.canvas.export_png()
    }
}
