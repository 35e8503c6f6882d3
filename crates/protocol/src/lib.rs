pub mod action;
pub mod commands;
pub mod theme;
pub mod types;

pub use action::{Action, FormField, SectionKind};
pub use commands::{RenderCommand, TextAlign};
pub use theme::{ThemeMode, ThemeToken};
pub use types::{Color, Point, Rect, Viewport};
