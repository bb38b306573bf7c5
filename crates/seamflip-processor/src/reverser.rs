//! Reversal of one captured perimeter block

use seamflip_core::movement::{MotionKind, Movement};

use crate::format;
use crate::synthesizer::synthesize_transition;

/// Produce the lines that traverse `trace` backwards.
///
/// `trace[0]` is the state the block was entered with; the remaining entries are the
/// states after each motion line, optionally followed by an idle sentinel
/// ([`MotionKind::None`]) holding the metadata in force when the block ended.
///
/// The output starts with a rapid move to the original end point and finishes with
/// an explicit move back to it at the original final feed rate, followed by the
/// original final acceleration, so whatever follows the block sees the same state
/// it would have seen without the reversal. A trace shorter than two entries
/// produces nothing.
pub fn reverse_block(trace: &[Movement]) -> Vec<String> {
    if trace.len() < 2 {
        return Vec::new();
    }
    let last_original = trace[trace.len() - 1];

    let working = if last_original.motion == MotionKind::None {
        &trace[..trace.len() - 1]
    } else {
        trace
    };
    let first_original = working[0];

    let mut lines = vec![format::rapid_xy(&last_original.position)];

    let mut next = Movement {
        position: last_original.position,
        ..first_original
    };
    for index in (1..working.len()).rev() {
        let current = &working[index];
        let previous = &working[index - 1];
        lines.extend(synthesize_transition(current, previous, &next));
        next = *current;
    }

    lines.push(format::linear_xyz_at(
        &last_original.position,
        last_original.feed_rate,
    ));
    lines.push(format::acceleration(last_original.acceleration));

    tracing::trace!(
        moves = working.len() - 1,
        lines = lines.len(),
        "reversed perimeter block"
    );
    lines
}
