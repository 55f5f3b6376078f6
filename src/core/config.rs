//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other.

/// Configuration for the course simulation
///
/// The defaults reproduce the standard course exactly; changing them shifts
/// pacing and geometry together, so the relationships below matter more
/// than the individual values.
#[derive(Debug, Clone)]
pub struct SimConfig {
    // === MOVEMENT ===
    /// Distance a mob covers per axis per tick (world units)
    ///
    /// Movement is axis-wise: a diagonal step moves BOTH axes by this
    /// amount. Arrival tests use exact equality, so every course leg must
    /// be a multiple of this value or mobs oscillate around their target
    /// forever.
    pub move_speed: f32,

    /// Per-axis slack for the zone overlap test (world units)
    ///
    /// Two shapes overlap when both center deltas are within this
    /// tolerance. It is deliberately smaller than `move_speed` on the
    /// standard course, so a mob only registers a zone at exact arrival.
    pub proximity_tolerance: f32,

    // === TIMING ===
    /// Target frame interval for paced runs (milliseconds)
    ///
    /// Interval gates measure wall-clock milliseconds, not ticks, so the
    /// number of ticks between gated firings scales with this value.
    /// At 16 ms (~60 fps) a 1000 ms spawn gate passes every 63 ticks.
    pub tick_interval_ms: u64,

    /// Default period for the standard course's spawn gate (milliseconds)
    ///
    /// The gate is strict: it passes only once MORE than this many
    /// milliseconds have elapsed since the previous firing.
    pub spawn_interval_ms: u64,

    // === BOARD ===
    /// Edge length of one board cell (world units)
    ///
    /// Zones are one cell square and mobs spawn with a radius of a quarter
    /// cell. Course coordinates are expressed in half-cell steps.
    pub cell_size: f32,

    /// Board dimension in cells (the board is square)
    pub board_cells: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            proximity_tolerance: 2.0,
            tick_interval_ms: 16,
            spawn_interval_ms: 1000,
            cell_size: 48.0,
            board_cells: 8,
        }
    }
}

impl SimConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Board edge length in world units
    pub fn board_span(&self) -> f32 {
        self.cell_size * self.board_cells as f32
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.move_speed <= 0.0 {
            return Err(format!("move_speed ({}) must be positive", self.move_speed));
        }

        if self.proximity_tolerance < 0.0 {
            return Err(format!(
                "proximity_tolerance ({}) must not be negative",
                self.proximity_tolerance
            ));
        }

        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be positive".into());
        }

        if self.cell_size <= 0.0 || self.board_cells == 0 {
            return Err(format!(
                "board must have positive extent (cell_size {}, board_cells {})",
                self.cell_size, self.board_cells
            ));
        }

        Ok(())
    }
}
