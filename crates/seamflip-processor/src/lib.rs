//! # seamflip Processor
//!
//! Rewrites the perimeter blocks of a G-code program so they are traversed in the
//! opposite direction, leaving every other line untouched.
//!
//! ```text
//! lines ──► PerimeterSegmenter ──► pass-through lines ─────────────┐
//!               │                                                  ├──► output
//!               └─ block trace ──► reverse_block ──► synthesizer ──┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use seamflip_processor::reverse_perimeters;
//!
//! let output = reverse_perimeters([
//!     "; printing object cube",
//!     "G1 X0 Y0",
//!     ";TYPE:Perimeter",
//!     "G1 X1 Y0 E1",
//!     "G1 X1 Y1 E1",
//!     ";TYPE:Infill",
//! ]);
//! assert_eq!(output[3], "G0 X1.000 Y1.000");
//! assert_eq!(output.last().map(String::as_str), Some(";TYPE:Infill"));
//! ```

pub mod format;
pub mod reverser;
pub mod segmenter;
pub mod synthesizer;

pub use reverser::reverse_block;
pub use segmenter::{
    process_lines, reverse_perimeters, PerimeterSegmenter, ReversalOutput, ReversalStats,
    SegmenterState,
};
pub use synthesizer::synthesize_transition;
