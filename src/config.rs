use egui::{Pos2, Vec2, vec2};
use serde::{Deserialize, Serialize};

use crate::symmetry::WallpaperGroup;

/// Upper bound on grid counts; generation cost is O(Nx·Ny·|group|).
pub const MAX_GRID: i32 = 50;
pub const MIN_SPACING: f32 = 1.0;

pub const MIN_LINE_WIDTH: f32 = 0.1;
pub const MAX_LINE_WIDTH: f32 = 10.0;
pub const DELTA_LINE_WIDTH: f32 = 0.1;

pub const DEFAULT_CANVAS_SIZE: Vec2 = vec2(1600.0, 1200.0);
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Pixel density of exported PNG tiles
pub const PNG_TILE_SCALE: f32 = 4.0;

/// Pick radius for canvas-rendered handles.
pub const DEFAULT_HIT_RADIUS: f32 = 4.0;
pub const TOUCH_HIT_RADIUS: f32 = 15.0;

/// Which family of symmetry is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symmetry {
    None,
    Wallpaper(WallpaperGroup),
    Rosette,
}

impl Symmetry {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Wallpaper(group) => group.name(),
            Self::Rosette => "rosette",
        }
    }
}

/// Symmetry and view parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymmetryState {
    pub sym: Symmetry,
    /// Symmetry center
    pub x: f32,
    pub y: f32,
    /// Lattice spacing
    pub d: f32,
    /// Lattice tilt in radians
    pub t: f32,
    pub nx: i32,
    pub ny: i32,
    pub nrot: i32,
    pub nref: i32,
    /// Rosette orientation in degrees
    pub rot: f32,
    /// Recompute Nx, Ny from the canvas size whenever the spacing changes
    pub dynamic_grid_size: bool,
}

impl Default for SymmetryState {
    fn default() -> Self {
        Self {
            sym: Symmetry::Wallpaper(WallpaperGroup::P6m),
            x: 800.0,
            y: 400.0,
            d: 100.0,
            t: 0.0,
            nx: 18,
            ny: 14,
            nrot: 3,
            nref: 2,
            rot: 0.0,
            dynamic_grid_size: true,
        }
    }
}

impl SymmetryState {
    pub fn center(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    /// Grid counts that cover `canvas` twice over, capped at [`MAX_GRID`].
    pub fn grid_for_canvas(&self, canvas: Vec2) -> (i32, i32) {
        let d = self.d.max(MIN_SPACING);
        let nx = ((canvas.x / d) * 2.0).round() as i32;
        let ny = ((canvas.y / d) * 2.0).round() as i32;
        (nx.clamp(1, MAX_GRID), ny.clamp(1, MAX_GRID))
    }

    /// Centers the symmetry on `canvas` and sizes the grid to cover it.
    pub fn fit_to_canvas(&mut self, canvas: Vec2) {
        self.x = (canvas.x / 2.0).round();
        self.y = (canvas.y / 2.0).round();
        let (nx, ny) = self.grid_for_canvas(canvas);
        self.nx = nx;
        self.ny = ny;
    }
}
