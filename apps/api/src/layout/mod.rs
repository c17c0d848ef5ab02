// Print layout: static font metrics, page geometry and single-column flow.
// Flowing is CPU-bound; callers on the async runtime run it inside
// tokio::task::spawn_blocking together with rasterization.

pub mod flow;
pub mod font_metrics;

pub use flow::{flow, Column, LaidLine, Run};
pub use font_metrics::{FontFamily, PageFormat};
