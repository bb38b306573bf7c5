use proptest::prelude::*;
use seamflip_core::{update_movement, MotionKind, Movement};

fn coordinate() -> impl Strategy<Value = f64> {
    (-50_000i32..50_000).prop_map(|v| f64::from(v) / 1000.0)
}

proptest! {
    #[test]
    fn motion_without_e_always_clears_extrusion(
        previous in coordinate(),
        x in coordinate(),
        code in 0u32..4,
    ) {
        let mut m = Movement::new();
        update_movement(&format!("G1 X0 E{previous:.3}"), &mut m);
        let moved = update_movement(&format!("G{code} X{x:.3}"), &mut m);
        prop_assert!(moved);
        prop_assert_eq!(m.extrusion, 0.0);
    }

    #[test]
    fn unmentioned_axes_persist(x in coordinate(), y in coordinate(), z in coordinate()) {
        let mut m = Movement::new();
        update_movement(&format!("G1 X{x:.3} Y{y:.3} Z{z:.3}"), &mut m);
        update_movement(&format!("G1 X{:.3}", x + 1.0), &mut m);
        prop_assert_eq!(m.position.y, format!("{y:.3}").parse::<f64>().unwrap());
        prop_assert_eq!(m.position.z, format!("{z:.3}").parse::<f64>().unwrap());
    }

    #[test]
    fn comments_never_move_or_change_motion(text in "[ -~]{0,40}") {
        let mut m = Movement::new();
        update_movement("G2 X1 Y1 I1 J0", &mut m);
        let moved = update_movement(&format!(";{text}"), &mut m);
        prop_assert!(!moved);
        prop_assert_eq!(m.motion, MotionKind::ArcCw);
        prop_assert_eq!(m.position, Movement::new().fold("G2 X1 Y1 I1 J0").0.position);
    }

    #[test]
    fn fold_matches_update(line in "(G[0-3]( [XYZEFIJ]-?[0-9]{1,3}(\\.[0-9]{1,3})?){0,5})|(M204 S[0-9]{1,4})|(;WIDTH:0\\.[0-9]{1,3})") {
        let mut in_place = Movement::new();
        let moved = update_movement(&line, &mut in_place);
        let (folded, folded_moved) = Movement::new().fold(&line);
        prop_assert_eq!(in_place, folded);
        prop_assert_eq!(moved, folded_moved);
    }
}
