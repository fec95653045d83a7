/// Battle configuration constants.
///
/// This module defines the board geometry and the resolution limits shared by
/// every battle, real or demo.

/// Number of rows in the battle grid.
pub const GRID_ROWS: usize = 8;

/// Number of columns in the battle grid.
pub const GRID_COLS: usize = 6;

/// Depth of each side's home band (rows nearest its own edge).
/// Placement inside the band is validated by the army builder, not here.
pub const HOME_BAND_DEPTH: usize = 3;

/// Hard upper bound on ticks before a battle is declared a draw.
pub const MAX_TICKS: u32 = 200;

/// How many rows ahead an archer scans for a lane target.
pub const ARCHER_LANE_DEPTH: usize = 4;
