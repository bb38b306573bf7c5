use proptest::prelude::*;
use seamflip_core::movement::{Movement, Position};
use seamflip_core::policy::ProcessingOptions;
use seamflip_processor::{process_lines, reverse_perimeters};

const LAYER: &[&str] = &[
    "; generated by PrusaSlicer",
    "M107",
    ";LAYER_CHANGE",
    ";Z:0.2",
    "G1 Z0.2 F9000",
    "; printing object box.stl id:0 copy 0",
    "M204 S1000",
    "G1 X10 Y10 F9000",
    ";TYPE:Perimeter",
    ";WIDTH:0.449999",
    ";HEIGHT:0.2",
    "G1 F1800",
    "G1 X30 Y10 E0.9",
    "G2 X40 Y20 I0 J10 E0.6",
    ";TYPE:Overhang perimeter",
    ";WIDTH:0.5",
    "M106 S255",
    "G1 X40 Y40 E0.9",
    ";TYPE:External perimeter",
    "G1 X10 Y40 E1.1",
    "; stop printing object box.stl id:0 copy 0",
    "M107",
];

#[test]
fn test_realistic_layer() {
    let out = reverse_perimeters(LAYER);
    let expected = [
        "; generated by PrusaSlicer",
        "M107",
        ";LAYER_CHANGE",
        ";Z:0.2",
        "G1 Z0.2 F9000",
        "; printing object box.stl id:0 copy 0",
        "M204 S1000",
        "G1 X10 Y10 F9000",
        ";TYPE:Perimeter",
        "G0 X40.000 Y40.000",
        ";TYPE:Overhang perimeter",
        ";WIDTH:0.500000",
        ";HEIGHT:0.200000",
        "M106 S255",
        "G1 F1800",
        "G1 X40.000 Y20.000 E0.90000",
        ";TYPE:Perimeter",
        ";WIDTH:0.449999",
        "M106 S0",
        "G3 X30.000 Y10.000 I-10.000 J0.000 E0.60000",
        "G1 X10.000 Y10.000 E0.90000",
        "G1 X40.000 Y40.000 Z0.000 F1800",
        "M204 S1000",
        ";TYPE:External perimeter",
        "G1 X10 Y40 E1.1",
        "; stop printing object box.stl id:0 copy 0",
        "M107",
    ];
    assert_eq!(out, expected);
}

#[test]
fn test_layer_change_between_objects_is_restored() {
    let options = ProcessingOptions {
        track_outside_objects: true,
        ..ProcessingOptions::default()
    };
    let out = process_lines(LAYER, options).lines;
    assert!(out.contains(&"G1 X40.000 Y40.000 Z0.200 F1800".to_string()));
    assert!(!out.iter().any(|l| l.contains("Z0.000")));
}

#[test]
fn test_every_object_is_processed() {
    let mut input: Vec<&str> = LAYER.to_vec();
    input.extend_from_slice(LAYER);
    let out = process_lines(&input, ProcessingOptions::default());
    assert_eq!(out.stats.blocks_reversed, 2);
    assert_eq!(out.stats.moves_reversed, 6);
    assert!(!out.stats.unterminated_block);
}

#[test]
fn test_passthrough_lines_keep_relative_order() {
    let out = reverse_perimeters(LAYER);
    let marker = out
        .iter()
        .position(|l| l == ";TYPE:External perimeter")
        .unwrap();
    assert_eq!(&out[..9], &LAYER[..9]);
    assert_eq!(&out[marker..], &LAYER[18..]);
}

fn point() -> impl Strategy<Value = (i32, i32)> {
    (-100_000i32..100_000, -100_000i32..100_000)
}

fn coord(v: i32) -> f64 {
    format!("{:.3}", f64::from(v) / 1000.0).parse().unwrap()
}

proptest! {
    #[test]
    fn reversed_block_visits_points_backwards(
        start in point(),
        points in prop::collection::vec((point(), 0u8..3), 2..20),
    ) {
        let mut input = vec![
            "; printing object part".to_string(),
            format!("G1 X{:.3} Y{:.3}", f64::from(start.0) / 1000.0, f64::from(start.1) / 1000.0),
            ";TYPE:Perimeter".to_string(),
        ];
        for ((x, y), kind) in &points {
            let (x, y) = (f64::from(*x) / 1000.0, f64::from(*y) / 1000.0);
            input.push(match kind {
                0 => format!("G1 X{x:.3} Y{y:.3} E0.1"),
                1 => format!("G2 X{x:.3} Y{y:.3} I1 J0 E0.1"),
                _ => format!("G3 X{x:.3} Y{y:.3} I0 J1 E0.1"),
            });
        }
        input.push(";TYPE:Infill".to_string());

        let out = reverse_perimeters(&input);
        let block = &out[3..out.len() - 1];

        // replay the synthesized block from the entry position
        let mut state = Movement::new();
        state.position = Position::new(coord(start.0), coord(start.1), 0.0);
        let mut visited = Vec::new();
        for line in block {
            let (next, moved) = state.fold(line);
            state = next;
            if moved {
                visited.push((state.position.x, state.position.y));
            }
        }

        let mut expected: Vec<(f64, f64)> = points
            .iter()
            .rev()
            .map(|((x, y), _)| (coord(*x), coord(*y)))
            .collect();
        expected.push((coord(start.0), coord(start.1)));
        let end = expected[0];
        expected.push(end);

        // first the rapid to the end point, then every point backwards, then the restore move
        prop_assert_eq!(visited.first().copied(), Some(end));
        prop_assert_eq!(&visited[1..], &expected[1..]);

        let cw_in = points.iter().filter(|(_, k)| *k == 1).count();
        let ccw_in = points.iter().filter(|(_, k)| *k == 2).count();
        let cw_out = block.iter().filter(|l| l.starts_with("G2")).count();
        let ccw_out = block.iter().filter(|l| l.starts_with("G3")).count();
        prop_assert_eq!(cw_in, ccw_out);
        prop_assert_eq!(ccw_in, cw_out);
    }
}
