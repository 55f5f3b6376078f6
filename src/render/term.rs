//! Character-cell renderer for the course board
//!
//! One character per board cell. Zones draw under mobs because the
//! world iterates in insertion order and scenes install zones first.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::core::config::SimConfig;
use crate::core::error::Result;
use crate::core::types::EntityKind;
use crate::render::color::Color;
use crate::render::Renderer;
use crate::world::World;

pub struct TermRenderer<W: Write> {
    out: W,
    units_per_cell: f32,
    cells: u32,
    clear_between: bool,
}

impl TermRenderer<io::Stdout> {
    /// Renders to stdout, clearing the screen before each frame
    pub fn stdout(config: &SimConfig) -> Self {
        Self {
            out: io::stdout(),
            units_per_cell: config.cell_size,
            cells: config.board_cells,
            clear_between: true,
        }
    }
}

impl<W: Write> TermRenderer<W> {
    /// Renders into any writer, appending frames without clearing
    pub fn new(out: W, config: &SimConfig) -> Self {
        Self {
            out,
            units_per_cell: config.cell_size,
            cells: config.board_cells,
            clear_between: false,
        }
    }

    fn cell_of(&self, coord: f32) -> Option<usize> {
        let idx = (coord / self.units_per_cell).floor() as i32;
        if idx < 0 || idx >= self.cells as i32 {
            return None;
        }
        Some(idx as usize)
    }
}

fn term_color(color: Color) -> crossterm::style::Color {
    crossterm::style::Color::Rgb {
        r: (color.r.clamp(0.0, 1.0) * 255.0) as u8,
        g: (color.g.clamp(0.0, 1.0) * 255.0) as u8,
        b: (color.b.clamp(0.0, 1.0) * 255.0) as u8,
    }
}

impl<W: Write> Renderer for TermRenderer<W> {
    fn draw(&mut self, world: &World) -> Result<()> {
        let side = self.cells as usize;
        let mut grid = vec![(' ', None); side * side];

        for entity in world.iter() {
            let Some(col) = self.cell_of(entity.shape.center.x) else {
                continue;
            };
            let Some(row) = self.cell_of(entity.shape.center.y) else {
                continue;
            };
            // Fill tints the glyph; stroke only shows on outline-only shapes.
            let tint = entity.shape.fill.or(entity.shape.stroke).map(term_color);
            let cell = match entity.kind {
                // Invisible zones still get a placeholder so the course
                // layout stays readable.
                EntityKind::Zone if entity.shape.opacity <= 0.0 => {
                    ('\u{b7}', Some(crossterm::style::Color::DarkGrey))
                }
                EntityKind::Zone => ('#', tint),
                EntityKind::Mob => ('o', tint),
            };
            grid[row * side + col] = cell;
        }

        if self.clear_between {
            queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        for row in 0..side {
            for col in 0..side {
                let (glyph, color) = grid[row * side + col];
                match color {
                    Some(c) => queue!(self.out, SetForegroundColor(c), Print(glyph), ResetColor)?,
                    None => queue!(self.out, Print(glyph))?,
                }
            }
            queue!(self.out, Print('\n'))?;
        }
        queue!(
            self.out,
            Print(format!(
                "tick {}  mobs {}\n",
                world.current_tick,
                world.count_kind(EntityKind::Mob)
            ))
        )?;
        self.out.flush()?;
        Ok(())
    }
}
