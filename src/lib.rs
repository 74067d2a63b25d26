#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod components;
pub mod config;
pub mod editor;
pub mod error;
pub mod file_handler;
pub mod history;
pub mod input;
pub mod operation;
pub mod panels;
pub mod persistence;
pub mod surface;
pub mod symmetry;
pub mod tools;

pub use app::EscherApp;
pub use config::{Symmetry, SymmetryState};
pub use editor::SketchEditor;
pub use error::{HistoryError, PersistenceError, SymmetryError};
pub use history::HistoryStack;
pub use input::{InputEvent, InputLocation};
pub use operation::{DrawOperation, Primitive, Style};
pub use surface::{PixmapSurface, ShapeSurface, SvgSurface, Surface};
pub use symmetry::{
    AffineTransform, AffineTransformSet, TransformCache, WallpaperGroup, generate_rosette,
    generate_symmetry_uncached, generate_tiling, identity_set,
};
pub use tools::{ToolKind, ToolSession, ToolType};
