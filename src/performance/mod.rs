//! # Frame statistics
//!
//! Tracks frame intervals and derives FPS and frame-time figures for the
//! on-screen overlay.
//!
//! ## Usage
//!
//! ```rust
//! use tinyscene::performance::PerformanceMonitor;
//!
//! let mut monitor = PerformanceMonitor::new();
//!
//! // Once per rendered frame, after drawing
//! monitor.update();
//!
//! let fps = monitor.get_metrics().fps;
//! # let _ = fps;
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frame timing figures, refreshed at most every [`PerformanceMonitor`]
/// update interval
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    /// Current frames per second
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    /// Minimum frame time in the current window
    pub min_frame_time_ms: f32,
    /// Maximum frame time in the current window
    pub max_frame_time_ms: f32,
    /// Frames recorded since start
    pub total_frames: u64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            total_frames: 0,
        }
    }
}

/// Performance monitoring system
pub struct PerformanceMonitor {
    /// Ring buffer of recent frame times for averaging
    frame_times: VecDeque<Duration>,
    /// Maximum number of frame times to keep for averaging
    max_samples: usize,
    /// When `update` was last called
    last_tick: Option<Instant>,
    current_metrics: PerformanceMetrics,
    /// Frame time accumulated since the metrics were last recomputed
    since_refresh: Duration,
    update_interval: Duration,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::with_config(120, Duration::from_millis(100))
    }

    /// Create a monitor keeping `max_samples` frames and refreshing its
    /// metrics every `update_interval` of recorded frame time
    pub fn with_config(max_samples: usize, update_interval: Duration) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            last_tick: None,
            current_metrics: PerformanceMetrics::default(),
            since_refresh: Duration::ZERO,
            update_interval,
        }
    }

    /// Marks the end of a frame.
    ///
    /// The first call only starts the clock; every later call records the
    /// time since the previous one.
    pub fn update(&mut self) {
        let now = Instant::now();
        if let Some(previous) = self.last_tick.replace(now) {
            self.record_frame(now - previous);
        }
    }

    /// Adds one frame of the given duration
    pub fn record_frame(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
        self.current_metrics.total_frames += 1;

        self.since_refresh += frame_time;
        if self.since_refresh >= self.update_interval {
            self.update_metrics();
            self.since_refresh = Duration::ZERO;
        }
    }

    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total_time: Duration = self.frame_times.iter().sum();
        let avg_frame_time_ms = total_time.as_secs_f32() * 1000.0 / self.frame_times.len() as f32;

        self.current_metrics.frame_time_ms = avg_frame_time_ms;
        self.current_metrics.fps = if avg_frame_time_ms > 0.0 {
            1000.0 / avg_frame_time_ms
        } else {
            0.0
        };

        if let (Some(min_time), Some(max_time)) = (
            self.frame_times.iter().min(),
            self.frame_times.iter().max(),
        ) {
            self.current_metrics.min_frame_time_ms = min_time.as_secs_f32() * 1000.0;
            self.current_metrics.max_frame_time_ms = max_time.as_secs_f32() * 1000.0;
        }
    }

    pub fn get_metrics(&self) -> &PerformanceMetrics {
        &self.current_metrics
    }

    /// Frame times in milliseconds, oldest first
    pub fn get_frame_time_history(&self) -> Vec<f32> {
        self.frame_times
            .iter()
            .map(|duration| duration.as_secs_f32() * 1000.0)
            .collect()
    }

    /// Reset all metrics and history
    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.current_metrics = PerformanceMetrics::default();
        self.last_tick = None;
        self.since_refresh = Duration::ZERO;
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a compact performance overlay in the top-right corner
pub fn render_overlay(ui: &imgui::Ui, metrics: &PerformanceMetrics) {
    let display_size = ui.io().display_size;

    ui.window("FPS")
        .size([120.0, 60.0], imgui::Condition::Always)
        .position([display_size[0] - 130.0, 10.0], imgui::Condition::Always)
        .no_decoration()
        .no_inputs()
        .bg_alpha(0.3)
        .build(|| {
            ui.text(format!("FPS: {:.0}", metrics.fps));
            ui.text(format!("{:.1}ms", metrics.frame_time_ms));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_update_only_starts_the_clock() {
        let mut monitor = PerformanceMonitor::new();
        monitor.update();
        assert_eq!(monitor.get_metrics().total_frames, 0);
        monitor.update();
        assert_eq!(monitor.get_metrics().total_frames, 1);
    }

    #[test]
    fn metrics_refresh_after_interval() {
        let mut monitor = PerformanceMonitor::with_config(120, Duration::from_millis(100));

        for _ in 0..5 {
            monitor.record_frame(Duration::from_millis(10));
        }
        // 50ms recorded, not refreshed yet
        assert_eq!(monitor.get_metrics().fps, 0.0);

        for _ in 0..5 {
            monitor.record_frame(Duration::from_millis(10));
        }
        let metrics = monitor.get_metrics();
        assert!((metrics.fps - 100.0).abs() < 0.5);
        assert!((metrics.frame_time_ms - 10.0).abs() < 0.01);
        assert_eq!(metrics.total_frames, 10);
    }

    #[test]
    fn min_and_max_track_the_window() {
        let mut monitor = PerformanceMonitor::with_config(8, Duration::ZERO);
        monitor.record_frame(Duration::from_millis(5));
        monitor.record_frame(Duration::from_millis(40));
        monitor.record_frame(Duration::from_millis(15));

        let metrics = monitor.get_metrics();
        assert!((metrics.min_frame_time_ms - 5.0).abs() < 0.01);
        assert!((metrics.max_frame_time_ms - 40.0).abs() < 0.01);
        assert!((metrics.frame_time_ms - 20.0).abs() < 0.01);
    }

    #[test]
    fn history_is_bounded() {
        let mut monitor = PerformanceMonitor::with_config(4, Duration::from_secs(1));
        for ms in 1..=10 {
            monitor.record_frame(Duration::from_millis(ms));
        }
        let history = monitor.get_frame_time_history();
        assert_eq!(history.len(), 4);
        assert!((history[0] - 7.0).abs() < 0.01);
    }

    #[test]
    fn reset_clears_everything() {
        let mut monitor = PerformanceMonitor::with_config(4, Duration::ZERO);
        monitor.record_frame(Duration::from_millis(16));
        monitor.reset();
        assert_eq!(monitor.get_metrics(), &PerformanceMetrics::default());
        assert!(monitor.get_frame_time_history().is_empty());
    }
}
