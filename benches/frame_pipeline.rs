use camfilter_pipeline::frame_pipeline::{
    CameraFacing, ColorImage, FilterEngine, FilterMode, FramePipeline, FrameSource,
    OrientationCorrector, OrientationState, PipelineSnapshot, PixelFormatConverter, Rotation,
    SyntheticCamera,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn gradient_image(width: usize, height: usize) -> ColorImage {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let value = ((x + y) % 256) as u8;
            data.extend_from_slice(&[value, value / 2, 255 - value]);
        }
    }
    ColorImage {
        width,
        height,
        channels: 3,
        data,
    }
}

fn benchmark_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("yuv_to_rgb");

    for (width, height) in [(320, 240), (640, 480), (1280, 720)] {
        let mut camera = SyntheticCamera::new(width, height, CameraFacing::Back);
        let Ok(frame) = camera.next_frame() else {
            continue;
        };
        for parallel in [false, true] {
            let converter = PixelFormatConverter::new(3, parallel);
            let label = format!("{}x{}/{}", width, height, if parallel { "par" } else { "seq" });
            group.bench_with_input(BenchmarkId::from_parameter(label), &frame, |b, frame| {
                b.iter(|| converter.convert(black_box(frame)))
            });
        }
    }

    group.finish();
}

fn benchmark_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters_640x480");
    let engine = FilterEngine::default();
    let image = gradient_image(640, 480);

    for mode in FilterMode::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(mode.name()), &image, |b, image| {
            b.iter(|| engine.apply(mode, black_box(image.clone())))
        });
    }

    group.finish();
}

fn benchmark_rotation(c: &mut Criterion) {
    let corrector = OrientationCorrector::default();
    let image = gradient_image(640, 480);

    c.bench_function("rotate_90_640x480", |b| {
        b.iter(|| corrector.rotate(black_box(image.clone()), Rotation::Deg90))
    });
}

fn benchmark_full_frame(c: &mut Criterion) {
    let pipeline = FramePipeline::default();
    let mut camera = SyntheticCamera::new(640, 480, CameraFacing::Back);

    let mut group = c.benchmark_group("full_frame_640x480");
    group.sample_size(20);

    for mode in [FilterMode::Identity, FilterMode::EdgeDetect] {
        let snapshot = PipelineSnapshot {
            filter: mode,
            orientation: OrientationState::new(Rotation::Deg90, CameraFacing::Back),
        };
        group.bench_function(BenchmarkId::from_parameter(mode.name()), |b| {
            b.iter(|| {
                if let Ok(frame) = camera.next_frame() {
                    let _ = pipeline.process_with_timings(frame, black_box(&snapshot));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_conversion,
    benchmark_filters,
    benchmark_rotation,
    benchmark_full_frame
);
criterion_main!(benches);
