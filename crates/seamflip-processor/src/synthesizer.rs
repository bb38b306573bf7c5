//! Line synthesis for one step of a reversed perimeter walk
//!
//! Each step re-draws the segment that originally ran from `previous` to `current`,
//! this time from `current` back to `previous`. `next` is the state the machine is
//! in when the step starts (the step emitted just before it), so only settings that
//! differ from `next` need to be written.

use std::fmt::Write;

use seamflip_core::markers::perimeter_type_comment;
use seamflip_core::movement::{MotionKind, Movement};

use crate::format;

/// Lines that take the machine from `next` through the reversed `current` segment.
///
/// Order is fixed: role comment, width, height, acceleration, fan, feed rate, then
/// the motion line. A `current` with [`MotionKind::None`] yields only the settings.
pub fn synthesize_transition(
    current: &Movement,
    previous: &Movement,
    next: &Movement,
) -> Vec<String> {
    let mut lines = Vec::new();

    if current.is_overhang_perimeter != next.is_overhang_perimeter {
        lines.push(perimeter_type_comment(current.is_overhang_perimeter));
    }
    if current.line_width != next.line_width {
        lines.push(format::width(current.line_width));
    }
    if current.line_height != next.line_height {
        lines.push(format::height(current.line_height));
    }
    if current.acceleration != next.acceleration {
        lines.push(format::acceleration(current.acceleration));
    }
    if current.fan_speed != next.fan_speed {
        lines.push(format::fan_speed(current.fan_speed));
    }
    if current.feed_rate != next.feed_rate {
        lines.push(format::feed_rate(current.feed_rate));
    }

    if let Some(line) = reversed_motion(current, previous) {
        lines.push(line);
    }
    lines
}

/// The motion line drawing `current`'s segment backwards, ending at `previous`
fn reversed_motion(current: &Movement, previous: &Movement) -> Option<String> {
    let kind = current.motion.reversed();
    let code = kind.code()?;

    let mut line = format!("G{code}");
    let from = &current.position;
    let to = &previous.position;

    // write! into a String cannot fail
    if !from.same_xy(to) {
        let _ = write!(line, " X{:.3} Y{:.3}", to.x, to.y);
    }
    if from.z != to.z {
        let _ = write!(line, " Z{:.3}", to.z);
    }
    if kind.is_arc() {
        // centre is fixed in space; re-express it relative to the new start point
        let center_x = to.x + current.arc_center_offset.i;
        let center_y = to.y + current.arc_center_offset.j;
        let _ = write!(
            line,
            " I{:.3} J{:.3}",
            center_x - from.x,
            center_y - from.y
        );
    }
    if current.extrusion != 0.0 {
        let _ = write!(line, " E{:.5}", current.extrusion);
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seamflip_core::movement::{ArcOffset, Position};

    fn at(x: f64, y: f64, z: f64) -> Movement {
        Movement {
            position: Position::new(x, y, z),
            motion: MotionKind::Linear,
            ..Movement::default()
        }
    }

    #[test]
    fn test_plain_reversed_move() {
        let previous = at(0.0, 0.0, 0.2);
        let current = Movement {
            extrusion: 0.5,
            ..at(10.0, 0.0, 0.2)
        };
        let lines = synthesize_transition(&current, &previous, &current);
        assert_eq!(lines, vec!["G1 X0.000 Y0.000 E0.50000"]);
    }

    #[test]
    fn test_minimal_diff_omits_unchanged_axes() {
        let previous = at(5.0, 5.0, 0.2);
        let current = at(5.0, 5.0, 0.4);
        let lines = synthesize_transition(&current, &previous, &current);
        assert_eq!(lines, vec!["G1 Z0.200"]);

        let current = at(6.0, 5.0, 0.2);
        let lines = synthesize_transition(&current, &previous, &current);
        // both planar words are written when either differs
        assert_eq!(lines, vec!["G1 X5.000 Y5.000"]);
    }

    #[test]
    fn test_settings_precede_motion_in_fixed_order() {
        let next = at(0.0, 0.0, 0.0);
        let current = Movement {
            is_overhang_perimeter: true,
            line_width: 0.45,
            line_height: 0.2,
            acceleration: 800.0,
            fan_speed: 255.0,
            feed_rate: 1200.5,
            ..at(1.0, 0.0, 0.0)
        };
        let lines = synthesize_transition(&current, &next, &next);
        assert_eq!(
            lines,
            vec![
                ";TYPE:Overhang perimeter",
                ";WIDTH:0.450000",
                ";HEIGHT:0.200000",
                "M204 S800",
                "M106 S255",
                "G1 F1200",
                "G1 X0.000 Y0.000",
            ]
        );
    }

    #[test]
    fn test_back_to_plain_perimeter() {
        let next = Movement {
            is_overhang_perimeter: true,
            ..at(0.0, 0.0, 0.0)
        };
        let current = at(1.0, 1.0, 0.0);
        let lines = synthesize_transition(&current, &current, &next);
        assert_eq!(lines, vec![";TYPE:Perimeter", "G1"]);
    }

    #[test]
    fn test_idle_state_emits_only_settings() {
        let next = at(0.0, 0.0, 0.0);
        let current = Movement {
            motion: MotionKind::None,
            fan_speed: 100.0,
            ..at(3.0, 3.0, 0.0)
        };
        let lines = synthesize_transition(&current, &next, &next);
        assert_eq!(lines, vec!["M106 S100"]);
    }

    #[test]
    fn test_clockwise_arc_becomes_counter_clockwise() {
        // quarter circle around (0,0) from (5,0) to (0,5), clockwise as recorded
        let previous = at(5.0, 0.0, 0.0);
        let current = Movement {
            motion: MotionKind::ArcCw,
            arc_center_offset: ArcOffset { i: -5.0, j: 0.0 },
            extrusion: 0.3,
            ..at(0.0, 5.0, 0.0)
        };
        let lines = synthesize_transition(&current, &previous, &current);
        assert_eq!(lines, vec!["G3 X5.000 Y0.000 I0.000 J-5.000 E0.30000"]);
    }

    #[test]
    fn test_counter_clockwise_arc_becomes_clockwise() {
        let previous = at(0.0, 0.0, 0.0);
        let current = Movement {
            motion: MotionKind::ArcCcw,
            arc_center_offset: ArcOffset { i: 2.0, j: 0.0 },
            ..at(4.0, 0.0, 0.0)
        };
        let lines = synthesize_transition(&current, &previous, &current);
        assert_eq!(lines, vec!["G2 X0.000 Y0.000 I-2.000 J0.000"]);
    }

    #[test]
    fn test_rapid_stays_rapid() {
        let previous = at(0.0, 0.0, 0.0);
        let current = Movement {
            motion: MotionKind::Rapid,
            ..at(2.0, 2.0, 0.0)
        };
        let lines = synthesize_transition(&current, &previous, &current);
        assert_eq!(lines, vec!["G0 X0.000 Y0.000"]);
    }
}
