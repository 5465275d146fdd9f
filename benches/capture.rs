use criterion::{black_box, criterion_group, criterion_main, Criterion};
use photobooth::{
    capture::{Camera, MockCamera, StreamConstraints},
    preview::VideoSurface,
    render::CaptureEngine,
};

fn bench_capture(c: &mut Criterion) {
    let mut group = c.benchmark_group("capture");
    group.sample_size(20);

    for (width, height) in [(640u32, 360u32), (1280, 720)] {
        let mut camera = MockCamera::new();
        let mut stream = camera
            .request_stream(&StreamConstraints::with_dimensions(width, height))
            .expect("mock stream");
        let mut surface = VideoSurface::default();
        surface.set_source(Some(&stream));
        surface.play().expect("play");
        surface.present(&mut stream).expect("frame");

        let mut engine = CaptureEngine::new();
        group.bench_function(format!("mirror_and_encode_{width}x{height}"), |b| {
            b.iter(|| engine.capture(black_box(&surface)).expect("capture"))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_capture);
criterion_main!(benches);
