//! Whiteboard Panel
//!
//! Hosts the two persona whiteboards, maps mouse drags onto the active
//! board and draws strokes with a braille canvas. Exports are written with
//! `tokio::fs` so a slow disk never stalls the frame loop for long.

use std::path::{Path, PathBuf};

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use thiserror::Error;

use duel_core::whiteboard::PaletteColor;
use duel_core::{
    Persona, Point, SketchCanvas, Stroke, Whiteboard, WhiteboardError, WhiteboardSettings,
};

use crate::theme::{persona_color, rgb, DIM_GRAY, PAPER_WHITE};

/// Errors from exporting a board to disk
#[derive(Debug, Error)]
pub enum ExportError {
    /// The board could not be rasterized
    #[error(transparent)]
    Render(#[from] WhiteboardError),

    /// Writing the PNG failed
    #[error("could not write {}: {source}", path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Both persona whiteboards plus panel state
pub struct WhiteboardPanel {
    boards: [Whiteboard; 2],
    active: Persona,
    visible: bool,
    export_dir: PathBuf,
    /// Inner canvas area from the last render, for mouse mapping
    canvas_area: Option<Rect>,
    drawing: bool,
}

fn slot(persona: Persona) -> usize {
    match persona {
        Persona::Levin => 0,
        Persona::Barandes => 1,
    }
}

impl WhiteboardPanel {
    /// Create blank boards for both personas
    pub fn new(settings: &WhiteboardSettings) -> Result<Self, WhiteboardError> {
        let board = |persona| {
            Whiteboard::new(
                persona,
                settings.width,
                settings.height,
                settings.default_stroke_width,
            )
        };
        Ok(Self {
            boards: [board(Persona::Levin)?, board(Persona::Barandes)?],
            active: Persona::FIRST,
            visible: false,
            export_dir: settings.export_dir.clone(),
            canvas_area: None,
            drawing: false,
        })
    }

    /// Whether the panel is showing
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the panel
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        if !self.visible {
            self.finish_stroke();
            self.canvas_area = None;
        }
        self.visible
    }

    /// Whose board is active
    pub fn active(&self) -> Persona {
        self.active
    }

    /// Switch to the other persona's board
    pub fn switch(&mut self) -> Persona {
        self.finish_stroke();
        self.active = self.active.counterpart();
        self.active
    }

    /// A persona's board
    pub fn board(&self, persona: Persona) -> &Whiteboard {
        &self.boards[slot(persona)]
    }

    /// The active board
    pub fn active_board_mut(&mut self) -> &mut Whiteboard {
        &mut self.boards[slot(self.active)]
    }

    /// Where exports go
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Name of the active ink colour
    pub fn color_name(&self) -> &'static str {
        let board = self.board(self.active);
        board
            .palette()
            .iter()
            .find(|c| c.rgb == board.color())
            .map_or("Custom", |c| c.name)
    }

    /// Cycle the active board's ink colour
    pub fn cycle_color(&mut self) -> PaletteColor {
        self.active_board_mut().cycle_color()
    }

    /// Handle a mouse event; returns whether the panel consumed it
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        let Some(area) = self.canvas_area.filter(|_| self.visible) else {
            return false;
        };
        let (width, height) = self.board(self.active).canvas().size();

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(at) = canvas_point(area, mouse.column, mouse.row, width, height) else {
                    return false;
                };
                self.active_board_mut().pen_down(at);
                self.drawing = true;
                true
            }
            MouseEventKind::Drag(MouseButton::Left) if self.drawing => {
                let at = clamped_point(area, mouse.column, mouse.row, width, height);
                self.active_board_mut().pen_move(at);
                true
            }
            MouseEventKind::Up(MouseButton::Left) if self.drawing => {
                self.finish_stroke();
                true
            }
            _ => false,
        }
    }

    fn finish_stroke(&mut self) {
        if self.drawing {
            self.active_board_mut().pen_up();
            self.drawing = false;
        }
    }

    /// Write the active board to `<slug>-whiteboard.png` in the export directory
    pub async fn export_active(&self) -> Result<PathBuf, ExportError> {
        let board = self.board(self.active);
        let png = board.export_png()?;
        let path = board.export_path(&self.export_dir);
        if let Err(source) = tokio::fs::write(&path, png).await {
            return Err(ExportError::Write { path, source });
        }
        tracing::info!(persona = ?self.active, path = %path.display(), "Whiteboard exported");
        Ok(path)
    }

    /// Render the panel into `area`
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let board = self.board(self.active);
        let accent = persona_color(self.active);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .title(Span::styled(
                format!(" {} ", board.title()),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [canvas_area, toolbar_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(2)]).areas(inner);
        self.canvas_area = Some(canvas_area);

        let board = self.board(self.active);
        let (width, height) = board.canvas().size();
        let strokes: Vec<Stroke> = board
            .canvas()
            .visible_strokes()
            .into_iter()
            .chain(board.canvas().active_stroke())
            .cloned()
            .collect();
        let dot = dot_size(canvas_area, width, height);

        let canvas = Canvas::default()
            .background_color(PAPER_WHITE)
            .marker(Marker::Braille)
            .x_bounds([0.0, f64::from(width)])
            .y_bounds([0.0, f64::from(height)])
            .paint(move |ctx| {
                for stroke in &strokes {
                    paint_stroke(ctx, stroke, f64::from(height), dot);
                }
            });
        frame.render_widget(canvas, canvas_area);

        frame.render_widget(Paragraph::new(self.toolbar()), toolbar_area);
    }

    fn toolbar(&self) -> Vec<Line<'static>> {
        let board = self.board(self.active);
        let tool = if board.erase_mode() { "eraser" } else { "pen" };
        let swatch = Span::styled("■", Style::default().fg(rgb(board.color())));
        let dim = Style::default().fg(DIM_GRAY);
        vec![
            Line::from(vec![
                Span::raw(format!(" {tool}  ")),
                swatch,
                Span::raw(format!(" {}  width {}", self.color_name(), board.stroke_width())),
            ]),
            Line::from(Span::styled(
                " F3 switch  F4 pen/eraser  F5 colour  F6 width  F7 undo  F8 redo  F9 clear  F10 export",
                dim,
            )),
        ]
    }
}

/// Canvas pixels covered by one braille dot, the larger of the two axes
fn dot_size(area: Rect, width: u32, height: u32) -> f64 {
    let dots_x = f64::from(area.width.max(1)) * 2.0;
    let dots_y = f64::from(area.height.max(1)) * 4.0;
    (f64::from(width) / dots_x).max(f64::from(height) / dots_y)
}

fn paint_stroke(ctx: &mut Context<'_>, stroke: &Stroke, height: f64, dot: f64) {
    let color = rgb(stroke.color);
    // Canvas y grows upward; board y grows downward
    let flip = |p: &duel_core::Point| (f64::from(p.x), height - f64::from(p.y));

    if stroke.points.len() == 1 {
        let coords = [flip(&stroke.points[0])];
        ctx.draw(&Points {
            coords: &coords,
            color,
        });
        return;
    }

    // Wide strokes get parallel passes one dot apart
    let passes = (f64::from(stroke.width) / dot).floor().max(0.0) as i32;
    for pair in stroke.points.windows(2) {
        let (x1, y1) = flip(&pair[0]);
        let (x2, y2) = flip(&pair[1]);
        for i in -(passes / 2)..=(passes / 2) {
            let off = f64::from(i) * dot;
            ctx.draw(&CanvasLine::new(x1, y1 + off, x2, y2 + off, color));
            if i != 0 {
                ctx.draw(&CanvasLine::new(x1 + off, y1, x2 + off, y2, color));
            }
        }
    }
}

/// Map a terminal cell inside `area` to canvas pixels (cell centre)
pub fn canvas_point(area: Rect, column: u16, row: u16, width: u32, height: u32) -> Option<Point> {
    if column < area.x || column >= area.right() || row < area.y || row >= area.bottom() {
        return None;
    }
    Some(clamped_point(area, column, row, width, height))
}

/// Like [`canvas_point`], clamping cells outside `area` to its edge
pub fn clamped_point(area: Rect, column: u16, row: u16, width: u32, height: u32) -> Point {
    let col = column.clamp(area.x, area.right().saturating_sub(1).max(area.x)) - area.x;
    let row = row.clamp(area.y, area.bottom().saturating_sub(1).max(area.y)) - area.y;
    let half_cells_x = f32::from(area.width.max(1)) * 2.0;
    let half_cells_y = f32::from(area.height.max(1)) * 2.0;
    Point::new(
        (f32::from(col) * 2.0 + 1.0) * width as f32 / half_cells_x,
        (f32::from(row) * 2.0 + 1.0) * height as f32 / half_cells_y,
    )
}
