//! Rendering for the course simulation
//!
//! Renderers receive the full world once per tick and redraw from
//! scratch. They never modify simulation state.

pub mod color;
pub mod term;

use crate::core::error::Result;
use crate::world::World;

/// One full-frame redraw per tick
pub trait Renderer {
    fn draw(&mut self, world: &World) -> Result<()>;
}

/// Discards every frame. The default for headless runs.
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _world: &World) -> Result<()> {
        Ok(())
    }
}
