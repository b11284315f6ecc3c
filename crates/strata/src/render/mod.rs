//! Diagram generation: DOT text, the legend, the HTML report and the
//! external renderer.

pub mod dot;
pub mod graphviz;
pub mod html;
pub mod legend;

pub use graphviz::{FORMATS, Graphviz, Renderer};
