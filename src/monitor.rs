//! Frame-rate and memory monitoring
//!
//! The host calls [`PerformanceMonitor::record_frame`] once per frame. At the
//! end of each sampling window the monitor computes the average fps over the
//! window, reads a memory estimate, attaches alerts and hands the sample to
//! every subscriber. Nothing here blocks or spawns.

use std::fmt;
use std::time::{Duration, Instant};

use crate::config::{DEFAULT_MEMORY_CRITICAL_MB, DEFAULT_MEMORY_WARNING_MB, EngineConfig};

/// Fps below which a warning alert is attached
pub const FPS_WARNING: f32 = 30.0;

/// Fps below which the alert becomes critical
pub const FPS_CRITICAL: f32 = 15.0;

/// Fps below which the engine flags itself as running slowly
pub const LOW_PERFORMANCE_FPS: f32 = 20.0;

/// Shortest sampling window; shorter requests are raised to this
pub const MIN_SAMPLE_WINDOW: Duration = Duration::from_millis(1);

/// Source of the process memory estimate
pub trait MemoryProbe {
    /// Memory in use, in MB, or `None` when the platform exposes nothing
    fn used_mb(&self) -> Option<f32>;
}

/// Resident set size of the current process.
///
/// Read from `/proc/self/status` on Linux; other platforms report `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMemory;

impl MemoryProbe for ProcessMemory {
    #[cfg(target_os = "linux")]
    fn used_mb(&self) -> Option<f32> {
        let status = std::fs::read_to_string("/proc/self/status").ok()?;
        parse_vm_rss_kb(&status).map(|kb| kb as f32 / 1024.0)
    }

    #[cfg(not(target_os = "linux"))]
    fn used_mb(&self) -> Option<f32> {
        None
    }
}

/// Memory probe for hosts without a memory API (always reports nothing)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMemoryApi;

impl MemoryProbe for NoMemoryApi {
    fn used_mb(&self) -> Option<f32> {
        None
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_vm_rss_kb(status: &str) -> Option<u64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmRSS:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|value| value.parse().ok())
}

/// What an alert is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    LowFps,
    HighMemory,
}

/// How bad it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// A threshold crossed during a sampling window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceAlert {
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    /// The measured value (fps or MB)
    pub value: f32,
}

/// Measurements of one sampling window
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerformanceSample {
    /// Average frames per second over the window, rounded
    pub fps: f32,
    /// Memory estimate in MB (0 when unavailable)
    pub memory_mb: f32,
    /// Frames recorded in the window
    pub frames: u32,
    pub alerts: Vec<PerformanceAlert>,
}

impl PerformanceSample {
    /// Highest alert severity, if any alert fired
    pub fn worst_severity(&self) -> Option<AlertSeverity> {
        self.alerts.iter().map(|alert| alert.severity).max()
    }
}

type Subscriber = Box<dyn FnMut(&PerformanceSample)>;

/// Windowed fps counter plus memory sampling
pub struct PerformanceMonitor {
    window: Duration,
    memory_warning_mb: f32,
    memory_critical_mb: f32,
    memory: Box<dyn MemoryProbe>,
    window_start: Option<Instant>,
    frames: u32,
    latest: Option<PerformanceSample>,
    subscribers: Vec<Subscriber>,
}

impl PerformanceMonitor {
    /// Monitor with the given window and the process memory probe
    pub fn new(window: Duration) -> Self {
        Self {
            window: window.max(MIN_SAMPLE_WINDOW),
            memory_warning_mb: DEFAULT_MEMORY_WARNING_MB,
            memory_critical_mb: DEFAULT_MEMORY_CRITICAL_MB,
            memory: Box::new(ProcessMemory),
            window_start: None,
            frames: 0,
            latest: None,
            subscribers: Vec::new(),
        }
    }

    /// Monitor using the window and memory thresholds of `config`
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.sample_window())
            .with_memory_thresholds(config.memory_warning_mb, config.memory_critical_mb)
    }

    /// Replace the memory probe
    pub fn with_memory_probe(mut self, probe: impl MemoryProbe + 'static) -> Self {
        self.memory = Box::new(probe);
        self
    }

    /// Set the memory warning and critical thresholds (MB)
    pub fn with_memory_thresholds(mut self, warning_mb: f32, critical_mb: f32) -> Self {
        self.memory_warning_mb = warning_mb;
        self.memory_critical_mb = critical_mb;
        self
    }

    /// Register a callback invoked with every completed sample
    pub fn subscribe(&mut self, subscriber: impl FnMut(&PerformanceSample) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Most recent completed sample
    pub fn latest(&self) -> Option<&PerformanceSample> {
        self.latest.as_ref()
    }

    /// Length of the sampling window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Count one frame presented at `now`.
    ///
    /// The first call only opens the window. Returns the sample when this
    /// frame closes a window.
    pub fn record_frame(&mut self, now: Instant) -> Option<PerformanceSample> {
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            return None;
        };

        self.frames += 1;
        let elapsed = now.saturating_duration_since(start);
        if elapsed < self.window {
            return None;
        }

        let fps = (self.frames as f64 / elapsed.as_secs_f64()).round() as f32;
        let memory_mb = self.memory.used_mb().unwrap_or(0.0);
        let sample = PerformanceSample {
            fps,
            memory_mb,
            frames: self.frames,
            alerts: self.alerts(fps, memory_mb),
        };

        if memory_mb > self.memory_warning_mb {
            tracing::warn!(
                memory_mb,
                threshold_mb = self.memory_warning_mb,
                "high memory usage"
            );
        }
        tracing::trace!(fps, memory_mb, frames = self.frames, "performance sample");

        self.window_start = Some(now);
        self.frames = 0;
        for subscriber in &mut self.subscribers {
            subscriber(&sample);
        }
        self.latest = Some(sample.clone());
        Some(sample)
    }

    fn alerts(&self, fps: f32, memory_mb: f32) -> Vec<PerformanceAlert> {
        let mut alerts = Vec::new();
        if fps < FPS_WARNING {
            alerts.push(PerformanceAlert {
                kind: AlertKind::LowFps,
                severity: if fps < FPS_CRITICAL {
                    AlertSeverity::Critical
                } else {
                    AlertSeverity::Warning
                },
                value: fps,
            });
        }
        if memory_mb > self.memory_warning_mb {
            alerts.push(PerformanceAlert {
                kind: AlertKind::HighMemory,
                severity: if memory_mb > self.memory_critical_mb {
                    AlertSeverity::Critical
                } else {
                    AlertSeverity::Warning
                },
                value: memory_mb,
            });
        }
        alerts
    }
}

impl fmt::Debug for PerformanceMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerformanceMonitor")
            .field("window", &self.window)
            .field("frames", &self.frames)
            .field("latest", &self.latest)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FixedMemory(f32);

    impl MemoryProbe for FixedMemory {
        fn used_mb(&self) -> Option<f32> {
            Some(self.0)
        }
    }

    fn run_frames(
        monitor: &mut PerformanceMonitor,
        start: Instant,
        fps: u32,
        seconds: u32,
    ) -> Vec<PerformanceSample> {
        let mut samples = Vec::new();
        for k in 0..=(fps * seconds) {
            let now = start + Duration::from_secs_f64(k as f64 / fps as f64);
            if let Some(sample) = monitor.record_frame(now) {
                samples.push(sample);
            }
        }
        samples
    }

    #[test]
    fn test_one_sample_per_window() {
        let mut monitor =
            PerformanceMonitor::new(Duration::from_secs(1)).with_memory_probe(NoMemoryApi);
        let samples = run_frames(&mut monitor, Instant::now(), 60, 3);

        assert_eq!(samples.len(), 3);
        for sample in &samples {
            assert!((sample.fps - 60.0).abs() <= 1.0, "fps {}", sample.fps);
            assert_eq!(sample.memory_mb, 0.0);
            assert!(sample.alerts.is_empty());
        }
    }

    #[test]
    fn test_first_frame_only_opens_window() {
        let mut monitor = PerformanceMonitor::new(Duration::from_secs(1));
        let start = Instant::now();
        assert!(monitor.record_frame(start).is_none());
        assert!(monitor.record_frame(start + Duration::from_millis(500)).is_none());
        assert!(monitor.latest().is_none());
    }

    #[test]
    fn test_slow_frames_raise_fps_alerts() {
        let mut monitor =
            PerformanceMonitor::new(Duration::from_secs(1)).with_memory_probe(NoMemoryApi);
        let samples = run_frames(&mut monitor, Instant::now(), 20, 1);
        assert_eq!(samples[0].worst_severity(), Some(AlertSeverity::Warning));

        let mut monitor =
            PerformanceMonitor::new(Duration::from_secs(1)).with_memory_probe(NoMemoryApi);
        let samples = run_frames(&mut monitor, Instant::now(), 10, 1);
        assert_eq!(
            samples[0].alerts,
            vec![PerformanceAlert {
                kind: AlertKind::LowFps,
                severity: AlertSeverity::Critical,
                value: 10.0,
            }]
        );
    }

    #[test]
    fn test_memory_thresholds() {
        for (used, expected) in [
            (50.0, None),
            (150.0, Some(AlertSeverity::Warning)),
            (250.0, Some(AlertSeverity::Critical)),
        ] {
            let mut monitor = PerformanceMonitor::new(Duration::from_secs(1))
                .with_memory_probe(FixedMemory(used));
            let samples = run_frames(&mut monitor, Instant::now(), 60, 1);
            assert_eq!(samples[0].memory_mb, used);
            assert_eq!(samples[0].worst_severity(), expected);
        }
    }

    #[test]
    fn test_subscribers_receive_samples() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut monitor =
            PerformanceMonitor::new(Duration::from_millis(500)).with_memory_probe(NoMemoryApi);
        monitor.subscribe(move |sample| sink.borrow_mut().push(sample.fps));

        run_frames(&mut monitor, Instant::now(), 40, 2);
        assert_eq!(seen.borrow().len(), 4);
        assert_eq!(monitor.latest().map(|s| s.fps), seen.borrow().last().copied());
    }

    #[test]
    fn test_long_stall_reports_low_fps() {
        let mut monitor =
            PerformanceMonitor::new(Duration::from_secs(1)).with_memory_probe(NoMemoryApi);
        let start = Instant::now();
        monitor.record_frame(start);
        let sample = monitor
            .record_frame(start + Duration::from_secs(4))
            .unwrap();
        assert_eq!(sample.frames, 1);
        assert_eq!(sample.fps, 0.0);
    }

    #[test]
    fn test_zero_window_is_raised_to_minimum() {
        let mut monitor = PerformanceMonitor::new(Duration::ZERO).with_memory_probe(NoMemoryApi);
        assert_eq!(monitor.window(), MIN_SAMPLE_WINDOW);

        let start = Instant::now();
        assert!(monitor.record_frame(start).is_none());
        assert!(monitor.record_frame(start).is_none());
        let sample = monitor
            .record_frame(start + Duration::from_millis(2))
            .unwrap();
        assert!(sample.fps.is_finite());
        assert_eq!(sample.fps, 1000.0);
    }

    #[test]
    fn test_parse_vm_rss() {
        let status = "Name:\tneurograph\nVmPeak:\t  300000 kB\nVmRSS:\t   20480 kB\nThreads:\t1\n";
        assert_eq!(parse_vm_rss_kb(status), Some(20480));
        assert_eq!(parse_vm_rss_kb("Name:\tx\n"), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_process_memory_is_positive_on_linux() {
        let used = ProcessMemory.used_mb().unwrap();
        assert!(used > 0.0);
    }
}
