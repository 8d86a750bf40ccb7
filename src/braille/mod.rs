mod canvas;

pub use canvas::{BrailleCanvas, Cell, Rgb, DOTS_PER_CELL};
