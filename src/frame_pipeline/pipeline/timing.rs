use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

/// Pipeline stage a measurement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Convert,
    Release,
    Filter,
    Rotate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::Convert => "convert",
            Stage::Release => "release",
            Stage::Filter => "filter",
            Stage::Rotate => "rotate",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StepTiming {
    pub stage: Stage,
    pub duration: Duration,
}

#[derive(Debug, Default, Clone)]
pub struct PipelineTimings {
    steps: Vec<StepTiming>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self {
            steps: Vec::with_capacity(5),
        }
    }

    pub fn add_step(&mut self, stage: Stage, duration: Duration) {
        self.steps.push(StepTiming { stage, duration });
    }

    /// Runs `f` and records how long it took.
    pub fn measure<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let timer = Timer::start(stage);
        let value = f();
        let (stage, duration) = timer.stop();
        self.add_step(stage, duration);
        value
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn get_step(&self, stage: Stage) -> Option<Duration> {
        let mut matching = self.steps.iter().filter(|s| s.stage == stage).peekable();
        matching.peek()?;
        Some(matching.map(|s| s.duration).sum())
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn log_summary(&self, sequence: u64) {
        let total = self.total_duration();
        for step in &self.steps {
            let percentage = if total.as_secs_f64() > 0.0 {
                (step.duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            debug!(
                sequence,
                stage = %step.stage,
                ms = step.duration.as_secs_f64() * 1000.0,
                percent = percentage,
                "Stage timing"
            );
        }
        debug!(sequence, ms = total.as_secs_f64() * 1000.0, "Frame processed");
    }
}

pub struct Timer {
    start: Instant,
    stage: Stage,
}

impl Timer {
    pub fn start(stage: Stage) -> Self {
        Self {
            start: Instant::now(),
            stage,
        }
    }

    pub fn stop(self) -> (Stage, Duration) {
        (self.stage, self.start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_accumulate() {
        let mut timings = PipelineTimings::new();
        timings.add_step(Stage::Convert, Duration::from_millis(3));
        timings.add_step(Stage::Filter, Duration::from_millis(5));
        timings.add_step(Stage::Filter, Duration::from_millis(1));
        assert_eq!(timings.total_duration(), Duration::from_millis(9));
        assert_eq!(timings.get_step(Stage::Filter), Some(Duration::from_millis(6)));
        assert_eq!(timings.get_step(Stage::Rotate), None);
    }

    #[test]
    fn test_measure_returns_value() {
        let mut timings = PipelineTimings::new();
        let value = timings.measure(Stage::Rotate, || 7);
        assert_eq!(value, 7);
        assert_eq!(timings.steps().len(), 1);
        assert_eq!(timings.steps()[0].stage, Stage::Rotate);
    }
}
