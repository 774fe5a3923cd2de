//! Rendering layer.
//!
//! The simulation only talks to the two traits below: a [`Canvas`] that can
//! be cleared and filled with squares, and a [`ScoreDisplay`] that shows the
//! win/lose counters. [`TerminalSurface`] implements both on top of
//! crossterm; tests plug in recorders instead.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::entities::{Board, Entity, Rgb, Scoreboard};
use crate::geometry::bounding_box;

// ── Traits ───────────────────────────────────────────────────────────────────

pub trait Canvas {
    /// Wipe the whole `width` × `height` surface to `color`.
    fn clear(&mut self, color: Rgb, width: f64, height: f64) -> io::Result<()>;

    /// Fill the square with top-left corner (`x`, `y`) and side `size`.
    fn fill_rect(&mut self, x: i64, y: i64, size: i64, color: Rgb) -> io::Result<()>;

    /// Called once a full frame has been drawn.
    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub trait ScoreDisplay {
    fn show_scores(&mut self, scores: &Scoreboard) -> io::Result<()>;
}

/// Draw one full frame: background, then every entity's box in order.
pub fn render<C: Canvas + ?Sized>(
    canvas: &mut C,
    board: &Board,
    entities: &[Entity],
) -> io::Result<()> {
    canvas.clear(board.background, board.x, board.y)?;
    for entity in entities {
        let b = bounding_box(entity, entity.position);
        canvas.fill_rect(
            b[0].x.round() as i64,
            b[0].y.round() as i64,
            entity.size.round() as i64,
            entity.color,
        )?;
    }
    canvas.present()
}

// ── Terminal surface ─────────────────────────────────────────────────────────

const C_HUD_WIN: Color = Color::Green;
const C_HUD_LOSE: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;
const C_PAUSED: Color = Color::Yellow;

const PAUSED_LABEL: &str = "   [ PAUSED ]";
/// First column after the score counters on the HUD row.
const PAUSED_COL: u16 = 24;

const HINT: &str = "←↑→↓ / WASD : Move   SPACE / click : Start-Stop   R : Reset   Q : Quit";

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Board drawn with true-colour cells. Row 0 holds the scores, the last
/// row the controls hint; everything in between is the scaled board.
pub struct TerminalSurface<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    /// World size of the board currently shown.
    world: (f64, f64),
    scores: Scoreboard,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        TerminalSurface {
            out,
            cols,
            rows,
            world: (1.0, 1.0),
            scores: Scoreboard::default(),
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    fn play_rows(&self) -> u16 {
        self.rows.saturating_sub(2)
    }

    /// Map a world span [`from`, `to`) to a cell span, at least one cell wide.
    fn cells(from: f64, to: f64, world: f64, cells: u16) -> (u16, u16) {
        let scale = cells as f64 / world;
        let start = (from * scale).floor().max(0.0);
        let end = (to * scale).ceil().max(start + 1.0).min(cells as f64);
        (start as u16, end as u16)
    }

    fn draw_hud(&mut self) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(1, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_WIN))?;
        self.out.queue(Print(format!("Wins:{:>4}", self.scores.win)))?;
        self.out.queue(style::SetForegroundColor(C_HUD_LOSE))?;
        self.out.queue(Print(format!("   Losses:{:>4}", self.scores.lose)))?;
        self.out.queue(style::ResetColor)?;
        Ok(())
    }

    /// Show the pause marker next to the scores, or blank it while running.
    /// A full redraw wipes the marker, so call this after every frame.
    pub fn show_running(&mut self, running: bool) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(PAUSED_COL, 0))?;
        if running {
            self.out.queue(Print(" ".repeat(PAUSED_LABEL.len())))?;
        } else {
            self.out.queue(style::SetForegroundColor(C_PAUSED))?;
            self.out.queue(Print(PAUSED_LABEL))?;
            self.out.queue(style::ResetColor)?;
        }
        self.out.flush()
    }
}

impl<W: Write> Canvas for TerminalSurface<W> {
    fn clear(&mut self, color: Rgb, width: f64, height: f64) -> io::Result<()> {
        self.world = (width, height);
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.out.queue(style::SetBackgroundColor(to_color(color)))?;
        let blank = " ".repeat(self.cols as usize);
        for row in 0..self.play_rows() {
            self.out.queue(cursor::MoveTo(0, row + 1))?;
            self.out.queue(Print(&blank))?;
        }
        self.out.queue(style::ResetColor)?;
        Ok(())
    }

    fn fill_rect(&mut self, x: i64, y: i64, size: i64, color: Rgb) -> io::Result<()> {
        let (c0, c1) = Self::cells(x as f64, (x + size) as f64, self.world.0, self.cols);
        let (r0, r1) = Self::cells(y as f64, (y + size) as f64, self.world.1, self.play_rows());
        if c0 >= c1 || r0 >= r1 {
            return Ok(());
        }
        let span = " ".repeat((c1 - c0) as usize);
        self.out.queue(style::SetBackgroundColor(to_color(color)))?;
        for row in r0..r1 {
            self.out.queue(cursor::MoveTo(c0, row + 1))?;
            self.out.queue(Print(&span))?;
        }
        self.out.queue(style::ResetColor)?;
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.draw_hud()?;
        self.out.queue(cursor::MoveTo(1, self.rows.saturating_sub(1)))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print(HINT))?;
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> ScoreDisplay for TerminalSurface<W> {
    fn show_scores(&mut self, scores: &Scoreboard) -> io::Result<()> {
        self.scores = *scores;
        self.draw_hud()?;
        self.out.flush()
    }
}
