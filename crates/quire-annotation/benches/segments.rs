use criterion::{Criterion, black_box, criterion_group, criterion_main};
use quire_annotation::{Annotation, AnnotationOptions, AnnotationState, to_segments};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_annotations(count: usize, size: usize) -> Vec<Annotation> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|i| {
            let from = rng.gen_range(0..size);
            let to = (from + rng.gen_range(1..200)).min(size);
            Annotation::new(format!("a{i}"), from, to)
        })
        .collect()
}

fn bench_to_segments(c: &mut Criterion) {
    let annotations = random_annotations(2_000, 100_000);
    c.bench_function("to_segments/2k_annotations", |b| {
        b.iter(|| black_box(to_segments(black_box(&annotations))).len())
    });
}

fn bench_decoration_rebuild(c: &mut Criterion) {
    let annotations = random_annotations(2_000, 100_000);
    let options = AnnotationOptions::default();
    c.bench_function("annotation_state/rebuild_2k", |b| {
        b.iter(|| {
            let state = AnnotationState::new(black_box(annotations.clone()), &options);
            black_box(state.decorations().len())
        })
    });
}

criterion_group!(benches, bench_to_segments, bench_decoration_rebuild);
criterion_main!(benches);
