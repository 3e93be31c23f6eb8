//! Font assets.
//!
//! Text is measured and drawn from the same font database, so a box fitted to a measured label
//! also fits the label as it is rasterized.

/// System font database, face selection and the SVG font resolver.
pub mod fonts;
