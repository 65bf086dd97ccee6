//! Integration tests for motion-governor

use motion_governor::capabilities::{
    CapabilityDescriptor, CapabilityProbe, EnvironmentSignals, FixedCapabilitySource,
};
use motion_governor::context::PerformanceContext;
use motion_governor::frame_monitor::{FrameMonitor, FrameStatistics, PerformanceLevel};
use motion_governor::governor::{recompute, AnimationComplexity, Governor};
use motion_governor::props::{AnimationKind, KindProps};
use motion_governor::scheduler::{FrameLoop, ManualScheduler};
use proptest::prelude::*;

fn desktop_signals() -> EnvironmentSignals {
    EnvironmentSignals {
        viewport_width: Some(1920),
        logical_cores: Some(16),
        device_memory_gb: Some(32.0),
        user_agent: Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string()),
        prefers_reduced_motion: false,
    }
}

fn desktop_context() -> PerformanceContext<FixedCapabilitySource> {
    PerformanceContext::new(FixedCapabilitySource(desktop_signals()))
}

fn stats_at(average_fps: u32, frame_drops: u64) -> FrameStatistics {
    FrameStatistics {
        current_fps: average_fps,
        average_fps,
        min_fps: average_fps,
        max_fps: average_fps,
        frame_drops,
        performance_level: PerformanceLevel::from_average_fps(average_fps),
    }
}

/// Drive a context through the frame loop, collecting every snapshot
fn drive(
    context: &mut PerformanceContext<FixedCapabilitySource>,
    deltas: Vec<f64>,
) -> Vec<FrameStatistics> {
    let scheduler = ManualScheduler::from_deltas(0.0, deltas);
    let (mut frame_loop, _cancel) = FrameLoop::start(FrameMonitor::default(), scheduler);

    let mut seen = Vec::new();
    frame_loop.run(|stats| {
        context.on_frame(stats);
        seen.push(stats.clone());
    });
    seen
}

mod monitor_tests {
    use super::*;

    #[test]
    fn test_steady_60fps_is_excellent() {
        let mut context = desktop_context();
        let seen = drive(&mut context, vec![16.67; 60]);

        let last = seen.last().unwrap();
        assert_eq!(seen.len(), 60);
        assert_eq!(last.current_fps, 60);
        assert_eq!(last.performance_level, PerformanceLevel::Excellent);
        assert_eq!(last.frame_drops, 0);
        assert_eq!(
            context.adaptive_settings().animation_complexity,
            AnimationComplexity::High
        );
    }

    #[test]
    fn test_slow_then_fast_recovers() {
        let mut context = desktop_context();
        let mut deltas = vec![40.0; 25];
        deltas.extend(vec![16.0; 35]);
        let seen = drive(&mut context, deltas);

        assert_eq!(seen[24].performance_level, PerformanceLevel::Poor);
        let last = seen.last().unwrap();
        assert_eq!(last.frame_drops, 25);
        assert_eq!(last.average_fps, 47);
        assert_eq!(last.performance_level, PerformanceLevel::Good);

        // Levels only improve once the fast frames start arriving
        let levels: Vec<u8> = seen[24..]
            .iter()
            .map(|s| match s.performance_level {
                PerformanceLevel::Poor => 0,
                PerformanceLevel::Fair => 1,
                PerformanceLevel::Good => 2,
                PerformanceLevel::Excellent => 3,
            })
            .collect();
        assert!(levels.windows(2).all(|w| w[0] <= w[1]));

        // Cumulative drops keep the penalty on even though the tier recovered
        let settings = context.adaptive_settings();
        assert_eq!(settings.particle_count, 10);
        assert!(!settings.enable_blur);
    }

    #[test]
    fn test_reset_clears_drops_but_keeps_capabilities() {
        let mut context = PerformanceContext::new(FixedCapabilitySource(EnvironmentSignals {
            viewport_width: Some(375),
            ..desktop_signals()
        }));
        let mut monitor = FrameMonitor::default();
        monitor.seed(0.0);
        for i in 1..=10 {
            let stats = monitor.record_frame(i as f64 * 50.0).unwrap().clone();
            context.on_frame(&stats);
        }
        assert_eq!(context.frame_statistics().frame_drops, 10);

        context.reset_metrics(&mut monitor);
        assert_eq!(context.frame_statistics().frame_drops, 0);
        assert_eq!(monitor.statistics().frame_drops, 0);
        assert!(context.capabilities().is_mobile);
    }
}

mod governor_tests {
    use super::*;

    #[test]
    fn test_fair_mobile_bundle() {
        let caps = CapabilityDescriptor {
            is_mobile: true,
            is_low_end: false,
            prefers_reduced_motion: false,
        };
        let settings = recompute(&caps, &stats_at(35, 0));
        assert_eq!(settings.particle_count, 3);
        assert!(!settings.enable_blur);
        assert_eq!(settings.max_concurrent_animations, 2);
    }

    #[test]
    fn test_frame_drops_on_excellent_tier() {
        let caps = CapabilityDescriptor::default();
        let base = recompute(&caps, &stats_at(60, 0));
        let penalised = recompute(&caps, &stats_at(60, 25));

        assert_eq!(penalised.particle_count, base.particle_count - 5);
        assert!(!penalised.enable_blur);
        assert_eq!(penalised.animation_complexity, AnimationComplexity::High);
    }

    #[test]
    fn test_alert_fires_once_with_hysteresis() {
        let caps = CapabilityDescriptor::default();
        let mut governor = Governor::new();
        let mut alerts = 0;

        let mut feed = |governor: &mut Governor, fps: u32, times: usize| {
            for _ in 0..times {
                if governor.update(&caps, &stats_at(fps, 0)).is_some() {
                    alerts += 1;
                }
            }
        };

        feed(&mut governor, 45, 30);
        feed(&mut governor, 18, 60);
        assert!(governor.alert_raised());

        // Still below the clear threshold: no re-arm
        feed(&mut governor, 30, 30);
        feed(&mut governor, 18, 30);
        assert!(governor.smoothed_fps() < 20.0);

        // Recover above 40, then collapse again
        feed(&mut governor, 60, 30);
        assert!(!governor.alert_raised());
        feed(&mut governor, 18, 30);

        assert_eq!(alerts, 2);
    }

    #[test]
    fn test_single_collapse_alerts_exactly_once() {
        let mut context = desktop_context();
        for _ in 0..30 {
            context.on_frame(&stats_at(45, 0));
        }
        for _ in 0..60 {
            context.on_frame(&stats_at(18, 0));
        }
        assert_eq!(context.alert_count(), 1);
    }
}

mod consumer_tests {
    use super::*;

    #[test]
    fn test_props_follow_tier() {
        let mut context = desktop_context();
        drive(&mut context, vec![40.0; 60]);

        let particle = context.optimized_props(AnimationKind::Particle);
        assert!(!particle.should_animate);
        assert!(matches!(
            particle.detail,
            KindProps::Particle(ref p) if p.count == 0 && !p.enabled
        ));

        let report = context.performance_report();
        assert_eq!(report.performance_level, PerformanceLevel::Poor);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r == "Particles disabled for better performance"));
    }

    #[test]
    fn test_motion_subscription_lifecycle() {
        let mut probe = CapabilityProbe::new(FixedCapabilitySource(desktop_signals()));
        {
            let sub = probe.subscribe();
            probe.set_reduced_motion(true);
            assert!(sub.latest().unwrap().should_use_simple_animations());
        }
        assert_eq!(probe.listener_count(), 0);
        probe.set_reduced_motion(false);
        assert!(!probe.capabilities().prefers_reduced_motion);
    }

    #[test]
    fn test_report_export_json_shape() {
        let mut context = desktop_context();
        drive(&mut context, vec![16.67; 30]);

        let json = context.export_report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let report = &value["performanceReport"];
        assert_eq!(report["performanceLevel"], "excellent");
        assert_eq!(report["adaptiveSettings"]["animationComplexity"], "high");
        assert!(value["customSettings"].is_null());
    }
}

proptest! {
    #[test]
    fn prop_average_within_extrema(deltas in prop::collection::vec(1.0f64..200.0, 1..150)) {
        let mut monitor = FrameMonitor::default();
        monitor.seed(0.0);
        let mut now = 0.0;
        for delta in deltas {
            now += delta;
            if let Some(stats) = monitor.record_frame(now) {
                prop_assert!(stats.min_fps <= stats.average_fps);
                prop_assert!(stats.average_fps <= stats.max_fps);
            }
        }
    }

    #[test]
    fn prop_frame_drops_monotonic(deltas in prop::collection::vec(-5.0f64..100.0, 1..150)) {
        let mut monitor = FrameMonitor::new(20);
        monitor.seed(0.0);
        let mut now = 0.0;
        let mut last_drops = 0;
        for delta in deltas {
            now += delta;
            monitor.record_frame(now);
            let drops = monitor.statistics().frame_drops;
            prop_assert!(drops >= last_drops);
            last_drops = drops;
        }
        monitor.reset();
        prop_assert_eq!(monitor.statistics().frame_drops, 0);
    }

    #[test]
    fn prop_recompute_is_deterministic(
        average_fps in 0u32..120,
        frame_drops in 0u64..100,
        is_mobile: bool,
        is_low_end: bool,
        prefers_reduced_motion: bool,
    ) {
        let caps = CapabilityDescriptor { is_mobile, is_low_end, prefers_reduced_motion };
        let stats = stats_at(average_fps, frame_drops);

        let first = recompute(&caps, &stats);
        let second = recompute(&caps, &stats);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.max_concurrent_animations >= 1);
        prop_assert!(first.animation_duration > 0.0);
        if caps.should_use_simple_animations() {
            prop_assert_eq!(first.animation_complexity, AnimationComplexity::Minimal);
            prop_assert!(first.should_reduce_motion);
        }
    }
}
