use quire_annotation::{Annotation, to_segments};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_annotations(rng: &mut StdRng, count: usize, size: usize) -> Vec<Annotation> {
    (0..count)
        .map(|i| {
            let from = rng.gen_range(0..size);
            let to = rng.gen_range(from..=size);
            Annotation::new(format!("a{i}"), from, to)
        })
        .collect()
}

fn covering_ids(annotations: &[Annotation], pos: usize) -> Vec<String> {
    let mut ids: Vec<String> = annotations
        .iter()
        .filter(|a| a.from <= pos && pos < a.to)
        .map(|a| a.id.clone())
        .collect();
    ids.sort();
    ids
}

#[test]
fn test_segments_partition_covered_positions() {
    let mut rng = StdRng::seed_from_u64(0x5e9);
    let size = 60;

    for _ in 0..200 {
        let count = rng.gen_range(0..12);
        let annotations = random_annotations(&mut rng, count, size);
        let segments = to_segments(&annotations);

        for pair in segments.windows(2) {
            assert!(pair[0].from < pair[0].to);
            assert!(pair[0].to <= pair[1].from, "segments overlap: {pair:?}");
        }

        for pos in 0..size {
            let expected = covering_ids(&annotations, pos);
            let containing: Vec<_> = segments
                .iter()
                .filter(|s| s.from <= pos && pos < s.to)
                .collect();

            if expected.is_empty() {
                assert!(
                    containing.is_empty(),
                    "uncovered position {pos} has a segment"
                );
                continue;
            }

            assert_eq!(
                containing.len(),
                1,
                "position {pos} must be in exactly one segment"
            );
            let mut actual: Vec<String> = containing[0]
                .annotations
                .iter()
                .map(|a| a.id.clone())
                .collect();
            actual.sort();
            assert_eq!(actual, expected, "wrong annotation set at {pos}");
        }
    }
}

#[test]
fn test_simultaneous_boundaries_apply_atomically() {
    let segments = to_segments(&[
        Annotation::new("a", 0, 4),
        Annotation::new("b", 4, 8),
        Annotation::new("c", 4, 6),
    ]);
    let shape: Vec<_> = segments
        .iter()
        .map(|s| (s.from, s.to, s.annotations.len()))
        .collect();
    assert_eq!(shape, vec![(0, 4, 1), (4, 6, 2), (6, 8, 1)]);
}
