//! Design spec extraction for sketchbook.
//!
//! This crate reads SVG artboards exported from design documents and pulls out
//! the color swatches (rectangles) and text styles (text layers) they declare,
//! and keeps them in a lookup keyed by artboard name.

pub mod context;
pub mod extract;
pub mod node;
pub mod svg;
pub mod types;

pub use context::{asset_name, SpecsContext};
pub use extract::{
    class_name, extract_specs, is_vector_asset, specs_for_path, specs_from_svg, SpecError,
};
pub use node::{closest_attr, AttributedNode};
pub use svg::{SvgDocument, SvgNode};
pub use types::{ColorSwatch, Specs, TextProps, TextStyle};
