#![forbid(unsafe_code)]

mod rendering;
mod splatmaps;

pub use rendering::{init_tracing, render_placements_to_png, RenderConfig};
pub use splatmaps::{load_png_alphamap, save_alphamap_png, synthetic_splatmap};
