use plotgrid::quality::{QualityConfig, QualityLevel, QualityOptimizer, RenderOptions};

fn optimizer_with(points: usize) -> QualityOptimizer {
    let mut optimizer = QualityOptimizer::new(QualityConfig::default()).expect("optimizer");
    optimizer.set_point_count(points);
    optimizer
}

#[test]
fn large_series_degrades_on_gesture_and_restores_after_debounce() {
    let mut optimizer = optimizer_with(8_000);

    optimizer.on_interaction_start(0.0);
    assert_eq!(optimizer.level(), QualityLevel::Medium);
    let options = optimizer.state().options;
    assert_eq!(options.line_stride, 2);
    assert!(!options.enable_animation);

    optimizer.on_interaction_end(500.0);
    // Debounce window: still degraded right after the gesture ends.
    assert!(!optimizer.poll(600.0));
    assert_eq!(optimizer.level(), QualityLevel::Medium);

    assert!(optimizer.poll(651.0));
    assert_eq!(optimizer.level(), QualityLevel::High);
    assert!(!optimizer.state().is_transitioning);
}

#[test]
fn rapid_gesture_bursts_never_flash_full_quality() {
    let mut optimizer = optimizer_with(50_000);
    let mut now = 0.0;

    // Ten drag bursts with 100ms gaps, all inside the 150ms debounce.
    for _ in 0..10 {
        optimizer.on_interaction_start(now);
        assert_eq!(optimizer.level(), QualityLevel::Low);
        now += 30.0;
        optimizer.on_interaction_end(now);
        now += 100.0;
        assert!(!optimizer.poll(now));
        assert_eq!(optimizer.level(), QualityLevel::Low);
    }

    // Once gestures stop for the full debounce, quality comes back.
    assert!(optimizer.poll(now + 200.0));
    assert_eq!(optimizer.level(), QualityLevel::High);
}

#[test]
fn degradation_tiers_follow_point_count() {
    let mut medium = optimizer_with(7_500);
    medium.on_interaction_start(0.0);
    assert_eq!(medium.level(), QualityLevel::Medium);

    let mut low = optimizer_with(250_000);
    low.on_interaction_start(0.0);
    assert_eq!(low.level(), QualityLevel::Low);
    let options = low.state().options;
    assert!(!options.enable_markers);
    assert_eq!(options.line_stride, 4);
    assert!((options.sampling_rate - 0.25).abs() <= f64::EPSILON);
}

#[test]
fn threshold_is_inclusive_on_the_safe_side() {
    let mut at_threshold = optimizer_with(5_000);
    at_threshold.on_interaction_start(0.0);
    assert_eq!(at_threshold.level(), QualityLevel::High);

    let mut above = optimizer_with(5_001);
    above.on_interaction_start(0.0);
    assert_eq!(above.level(), QualityLevel::Medium);
}

#[test]
fn high_options_are_full_fidelity_regardless_of_size() {
    let options = RenderOptions::for_level(QualityLevel::High, 1_000_000, 5_000);
    assert!(options.enable_markers);
    assert_eq!(options.line_stride, 1);
    assert!((options.sampling_rate - 1.0).abs() <= f64::EPSILON);
    assert!(options.enable_animation);
}
