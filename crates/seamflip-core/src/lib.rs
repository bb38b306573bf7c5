//! # seamflip Core
//!
//! Machine state tracking for slicer-generated G-code.
//!
//! - **movement**: the cumulative machine state snapshot and the line fold that updates it
//! - **markers**: the comment and command vocabulary recognised in the stream
//! - **policy**: processing options shared between the processor and the settings layer
//!
//! Nothing in this crate performs I/O or fails: every function is total over any input line.

pub mod markers;
pub mod movement;
pub mod numeric;
pub mod policy;

pub use markers::BlockMarker;
pub use movement::{update_movement, MotionKind, Movement};
pub use policy::{ProcessingOptions, UnterminatedBlockPolicy};
