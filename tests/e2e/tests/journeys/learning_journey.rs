//! Journey: a card from first sight to long-term retention and back.

use studybox_core::{CardStatus, CognitiveStage, Grade, SchedulerConfig};
use studybox_e2e_tests::{StudyHarness, TestDataFactory};

fn rank(stage: CognitiveStage) -> usize {
    match stage {
        CognitiveStage::Acquisition => 0,
        CognitiveStage::Lapse => 1,
        CognitiveStage::Fixation => 2,
        CognitiveStage::Consolidation => 3,
        CognitiveStage::Retention => 4,
    }
}

#[test]
fn test_new_card_learning_steps() {
    let mut h = StudyHarness::new();
    let id = h.add_card("Languages::German", "der Hund", "the dog");

    let hard = h.review(id, Grade::Hard, 6.0);
    assert_eq!(hard.card.stage(), CognitiveStage::Acquisition);
    assert_eq!(hard.card.status(), CardStatus::Learning);
    assert_eq!(hard.message, "Review again in 6 minutes");

    h.advance_minutes(6);
    let good = h.review(id, Grade::Good, 3.0);
    assert_eq!(good.card.stage(), CognitiveStage::Fixation);
    assert_eq!(good.card.metrics().stability(), 1.0);
    assert_eq!(good.card.status(), CardStatus::Review);
    assert_eq!(good.message, "Scheduled for 1 day");
    // 0.3 + 0.10 + 0.01, then - 0.05 + 0.01
    assert!((good.card.metrics().difficulty() - 0.37).abs() < 1e-9);
}

#[test]
fn test_successful_reviews_reach_retention() {
    let mut h = StudyHarness::new();
    let id = h.add_card("Geo", "Kenya", "Nairobi");

    let mut last_stability = 0.0;
    let mut last_rank = 0;
    for _ in 0..20 {
        h.advance_to_due(id);
        let out = h.review(id, Grade::Good, 3.0);
        let card = &out.card;

        assert!(card.metrics().stability() >= last_stability);
        assert!(rank(card.stage()) >= last_rank);
        assert!(card.next_review().unwrap() >= card.metrics().last_review().unwrap());

        last_stability = card.metrics().stability();
        last_rank = rank(card.stage());
        if card.stage() == CognitiveStage::Retention {
            break;
        }
    }

    let card = h.collection.get(id).unwrap();
    assert_eq!(card.stage(), CognitiveStage::Retention);
    assert!(card.metrics().stability() > 60.0);
}

#[test]
fn test_lapse_and_recovery() {
    let mut h = StudyHarness::new();
    let id = h.add_card("Geo", "Peru", "Lima");
    TestDataFactory::review_history(
        &mut h,
        id,
        &[Grade::Good, Grade::Good, Grade::Good, Grade::Good],
    );
    let before = h.collection.get(id).unwrap().metrics().stability();
    assert!(before > 1.0);

    h.advance_to_due(id);
    let lapse = h.review(id, Grade::Fail, 9.0);
    assert_eq!(lapse.card.stage(), CognitiveStage::Lapse);
    assert!(lapse.card.metrics().stability() >= 1.0);
    assert!(lapse.card.metrics().stability() < before);
    assert_eq!(lapse.message, "Reset to learn again");
    assert_eq!(lapse.card.metrics().lapse_count(), 1);

    h.advance_to_due(id);
    let recovered = h.review(id, Grade::Good, 3.0);
    assert_ne!(recovered.card.stage(), CognitiveStage::Lapse);
    assert!(rank(recovered.card.stage()) >= rank(CognitiveStage::Fixation));
}

#[test]
fn test_fatigue_deepens_lapses() {
    let text = "\"Geo\";\"Japan\";\"Tokyo\";\"\";\"20\"\n";

    let mut fresh = StudyHarness::new();
    fresh.engine.import(&mut fresh.collection, text).unwrap();
    let fresh_id = fresh.collection.cards()[0].id;
    let fresh_out = fresh.review(fresh_id, Grade::Fail, 4.0);

    let mut tired = StudyHarness::new();
    tired.engine.import(&mut tired.collection, text).unwrap();
    let tired_id = tired.collection.cards()[0].id;
    // Fifteen failed warm-up cards push fatigue to 0.75
    for i in 0..15 {
        let warmup = tired.add_card("Warmup", &format!("q{i}"), "a");
        tired.review(warmup, Grade::Fail, 2.0);
    }
    assert!(tired.session.fatigue() > tired.engine.config().fatigue_threshold);
    let tired_out = tired.review(tired_id, Grade::Fail, 4.0);

    // 20 * 0.7 * (1 - 0.51), and the same with a further 0.7
    assert!((fresh_out.card.metrics().stability() - 6.86).abs() < 1e-9);
    assert!((tired_out.card.metrics().stability() - 4.802).abs() < 1e-9);

    let entry = tired_out.card.metrics().history().last().unwrap();
    assert!((entry.fatigue - 0.75).abs() < 1e-9);
}

#[test]
fn test_new_session_resets_fatigue() {
    let mut h = StudyHarness::new();
    let id = h.add_card("D", "q", "a");
    h.review(id, Grade::Fail, 2.0);
    assert!(h.session.fatigue() > 0.0);

    h.new_session();
    assert_eq!(h.session.fatigue(), 0.0);
    assert_eq!(h.session.reviews(), 0);
}

#[test]
fn test_custom_target_risk_shortens_intervals() {
    let strict = SchedulerConfig {
        target_risk: 0.05,
        ..Default::default()
    };
    let mut default_h = StudyHarness::new();
    let mut strict_h = StudyHarness::with_config(strict);

    let a = default_h.add_card("D", "q", "a");
    let b = strict_h.add_card("D", "q", "a");
    let out_a = default_h.review(a, Grade::Easy, 2.0);
    let out_b = strict_h.review(b, Grade::Easy, 2.0);

    assert_eq!(out_a.card.metrics().stability(), out_b.card.metrics().stability());
    assert!(out_b.interval_days < out_a.interval_days);
}

#[test]
fn test_easy_streak_plans_within_a_century() {
    let mut h = StudyHarness::new();
    let id = h.add_card("Geo", "Chile", "Santiago");
    let max_days = h.engine.config().max_interval_days;

    for _ in 0..40 {
        h.advance_to_due(id);
        let out = h.review(id, Grade::Easy, 1.0);
        assert!(out.interval_days <= max_days);
        let due = out.card.next_review().unwrap();
        assert!(due <= h.now() + chrono::Duration::days(max_days as i64));
    }

    let card = h.collection.get(id).unwrap();
    assert_eq!(card.interval(), max_days);
    assert_eq!(card.stage(), CognitiveStage::Retention);
}
