//! Integration tests for the EMF engine and its pattern tables

use rand::rngs::StdRng;
use rand::SeedableRng;
use specter::core::emf_patterns::ChaosState;
use specter::core::{EmfEngine, EMF_PATTERNS};
use specter::types::{GaugeBand, StopBehavior};
use specter::{EMF_MAX, EMF_MIN, EMF_TICK_SECS};

#[test]
fn test_pattern_durations() {
    let durations: Vec<f64> = EMF_PATTERNS.iter().map(|p| p.duration).collect();
    assert_eq!(durations, vec![120.0, 40.0, 40.0, 45.0, 35.0, 45.0]);
}

#[test]
fn test_every_pattern_finite_and_non_negative_noise() {
    let mut rng = StdRng::seed_from_u64(21);
    for pattern in EMF_PATTERNS.iter() {
        let mut chaos = ChaosState::default();
        let mut t = 0.0;
        while t < pattern.duration {
            let target = pattern.evaluate(t, &mut chaos, &mut rng);
            assert!(target.base.is_finite(), "{} at {}", pattern.name, t);
            assert!(target.noise >= 0.0, "{} at {}", pattern.name, t);
            t += EMF_TICK_SECS;
        }
    }
}

#[test]
fn test_classic_haunt_scenarios() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut chaos = ChaosState::default();
    let classic = &EMF_PATTERNS[0];

    let start = classic.evaluate(0.0, &mut chaos, &mut rng);
    assert_eq!(start.base, 0.0);
    assert_eq!(start.noise, 2.0);

    let spike = classic.evaluate(29.5, &mut chaos, &mut rng);
    assert_eq!(spike.base, 290.0);
    assert_eq!(spike.noise, 20.0);
}

#[test]
fn test_value_clamped_for_all_seeds() {
    for seed in 0..20 {
        let mut engine = EmfEngine::with_rng(StopBehavior::Hold, StdRng::seed_from_u64(seed)).unwrap();
        engine.start();
        for _ in 0..3000 {
            let frame = engine.tick();
            assert!(frame.value >= EMF_MIN && frame.value <= EMF_MAX);
            assert_eq!(frame.band, GaugeBand::from_value(frame.value));
        }
    }
}

#[test]
fn test_spike_drives_needle_into_red() {
    let mut engine = EmfEngine::with_rng(StopBehavior::Hold, StdRng::seed_from_u64(3)).unwrap();
    engine.start();
    engine.select_pattern(0).unwrap();
    // 28 s into the classic pattern, then 1.5 s of the 290 spike
    for _ in 0..((29.5 / EMF_TICK_SECS) as usize) {
        engine.tick();
    }
    assert!(engine.value() > 240.0, "value {}", engine.value());
    assert_eq!(GaugeBand::from_value(engine.value()), GaugeBand::Red);
}

#[test]
fn test_reselection_never_repeats() {
    let mut engine = EmfEngine::with_rng(StopBehavior::Hold, StdRng::seed_from_u64(8)).unwrap();
    engine.start();
    let mut previous = engine.pattern_id();
    let mut wraps = 0;
    // About twenty minutes of simulated time
    for _ in 0..24_000 {
        engine.tick();
        if engine.pattern_id() != previous || engine.elapsed() == 0.0 {
            assert_ne!(engine.pattern_id(), previous);
            previous = engine.pattern_id();
            wraps += 1;
        }
    }
    assert!(wraps > 10);
}
