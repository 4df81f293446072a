use std::thread;
use std::time::{Duration, Instant};

use camfilter_pipeline::frame_pipeline::{
    CameraFacing, ColorImage, FilterMode, FramePipeline, FrameScheduler, FrameSource,
    OrientationState, PipelineConfig, PipelineError, PipelineSnapshot, Rotation, SyntheticCamera,
};
use camfilter_pipeline::logger;

use tracing::{info, warn};

const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const FRAMES_PER_STEP: u64 = 30;

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting camera filter demo...");

    let config = PipelineConfig::builder().output_channels(4).build();
    let mut camera = SyntheticCamera::new(640, 480, CameraFacing::Back)
        .with_frame_limit(FRAMES_PER_STEP * FilterMode::ALL.len() as u64);

    let initial = PipelineSnapshot {
        filter: FilterMode::Identity,
        orientation: OrientationState::new(camera.sensor_orientation(), camera.facing()),
    };
    let mut frames_shown = 0u64;
    let sink = move |image: &ColorImage, width: usize, height: usize| {
        frames_shown += 1;
        if frames_shown % FRAMES_PER_STEP == 1 {
            info!(width, height, channels = image.channels, "Frame presented");
        }
    };
    let scheduler =
        FrameScheduler::spawn_with_sink(config.clone(), FramePipeline::new(config), sink, initial)?;
    scheduler.open_session();

    let submitter = scheduler.submitter();
    let started = Instant::now();
    loop {
        let frame = match camera.next_frame() {
            Ok(frame) => frame,
            Err(PipelineError::DeviceUnavailable(reason)) => {
                warn!(%reason, "Camera stopped delivering frames");
                break;
            }
            Err(e) => return Err(e.into()),
        };

        let sequence = frame.sequence();
        if sequence > 0 && sequence % FRAMES_PER_STEP == 0 {
            let step = (sequence / FRAMES_PER_STEP) as u8;
            scheduler.set_filter_mode(FilterMode::from_index(step));
            scheduler.rotate_manual();
        }
        if sequence == FRAMES_PER_STEP * 2 {
            info!("Switching to the front camera");
            scheduler.switch_camera(CameraFacing::Front, Rotation::Deg270);
        }

        submitter.on_raw_frame_available(frame);
        thread::sleep(FRAME_INTERVAL);
    }

    let stats = scheduler.stats();
    scheduler.shutdown();

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        produced = camera.produced_count(),
        released = camera.released_count(),
        presented = stats.presented,
        dropped = stats.dropped_busy,
        "Demo finished"
    );

    Ok(())
}
