//! Journey: building study sessions and watching deck health over time.

use studybox_core::{
    Grade, SessionScope, StageDistribution, VisualCue, session::DEFAULT_SESSION_LIMIT,
};
use studybox_e2e_tests::{StudyHarness, TestDataFactory};

const SEEDED_CAPITALS: &str = "\"Geo::Europe\";\"France\";\"Paris\";\"\";\"10\"\n\
                               \"Geo::Europe\";\"Spain\";\"Madrid\";\"\";\"10\"\n\
                               \"Geo::Asia\";\"Japan\";\"Tokyo\";\"\";\"10\"\n\
                               \"Geo::Asia\";\"Korea\";\"Seoul\";\"\";\"10\"\n";

#[test]
fn test_new_cards_lead_and_limit_applies() {
    let mut h = StudyHarness::new();
    h.engine.import(&mut h.collection, SEEDED_CAPITALS).unwrap();
    for i in 0..30 {
        h.add_card("Vocab", &format!("word {i}"), "meaning");
    }
    h.advance_days(12);

    let queue = h.engine.build_session(h.collection.cards(), &SessionScope::default());
    assert_eq!(queue.len(), DEFAULT_SESSION_LIMIT);
    assert!(queue.iter().all(|e| e.card.is_new()));
    assert!(queue.iter().all(|e| e.explanation.cue == VisualCue::New));

    let everything = h.engine.build_session(h.collection.cards(), &SessionScope::all(100));
    assert_eq!(everything.len(), 34);
    // Overdue reviews follow the new cards, highest priority first
    let reviews = &everything[30..];
    assert!(reviews.iter().all(|e| !e.card.is_new()));
    assert!(reviews.windows(2).all(|w| w[0].priority_score >= w[1].priority_score));
}

#[test]
fn test_suspended_and_out_of_scope_cards_excluded() {
    let mut h = StudyHarness::new();
    let europe = TestDataFactory::add_capitals(&h.engine, &mut h.collection, "Geo::Europe");
    let math = h.add_card("Math", "2 + 2", "4");
    h.collection.set_suspended(europe[0], true).unwrap();

    let scope = h.engine.deck_scope(&h.collection, "Geo", 50).unwrap();
    let queue = h.engine.build_session(h.collection.cards(), &scope);
    let ids: Vec<_> = queue.iter().map(|e| e.card.id).collect();

    assert_eq!(ids.len(), europe.len() - 1);
    assert!(!ids.contains(&europe[0]));
    assert!(!ids.contains(&math));
}

#[test]
fn test_focus_session_skips_new_and_ranks_lapses() {
    let mut h = StudyHarness::new();
    h.engine.import(&mut h.collection, SEEDED_CAPITALS).unwrap();
    h.add_card("Geo::Europe", "Italy", "Rome");

    let scope = SessionScope::all(10);
    assert!(h.engine.build_focus_session(h.collection.cards(), &scope).is_empty());

    // Lapse one card, then let everything fall due
    h.advance_days(10);
    let lapsed = h.collection.cards()[0].id;
    h.review(lapsed, Grade::Fail, 4.0);
    h.advance_days(30);

    let focus = h.engine.build_focus_session(h.collection.cards(), &scope);
    assert_eq!(focus.len(), 4);
    assert!(focus.iter().all(|e| !e.card.is_new()));
    assert_eq!(focus[0].card.id, lapsed);
}

#[test]
fn test_deck_health_degrades_when_cards_go_overdue() {
    let mut h = StudyHarness::new();
    h.engine.import(&mut h.collection, SEEDED_CAPITALS).unwrap();
    h.add_card("Geo::Asia", "Nepal", "Kathmandu");

    let fresh = h.engine.deck_health(&h.collection, "Geo").unwrap();
    assert_eq!(fresh.health_score, 100);
    assert_eq!(fresh.status_message, "Everything is fresh");
    assert_eq!(
        fresh.distribution,
        StageDistribution { new: 1, learning: 0, review: 4, suspended: 0 }
    );

    // Due exactly now: reviews sit at the target risk, but the unseen new
    // card has been decaying on the minutes scale for days
    h.advance_days(10);
    let due = h.engine.deck_health(&h.collection, "Geo").unwrap();
    assert_eq!(due.critical, 1);
    assert_eq!(due.health_score, 80);
    assert_eq!(due.status_message, "Healthy: 1 card needs review");

    // Overdue: every card is critical
    h.advance_days(1);
    let overdue = h.engine.deck_health(&h.collection, "Geo").unwrap();
    assert_eq!(overdue.critical, 5);
    assert_eq!(overdue.total, 5);
    assert_eq!(overdue.health_score, 0);
    assert_eq!(overdue.status_message, "Critical: 5 of 5 cards at risk");

    // Subdeck only sees its own cards
    let asia = h.engine.deck_health(&h.collection, "Geo::Asia").unwrap();
    assert_eq!(asia.total, 3);
    assert_eq!(asia.critical, 3);

    // Studying the deck restores it
    let ids: Vec<_> = h.collection.cards().iter().map(|c| c.id).collect();
    for id in ids {
        h.review(id, Grade::Good, 3.0);
    }
    let restored = h.engine.deck_health(&h.collection, "Geo").unwrap();
    assert_eq!(restored.health_score, 100);
}

#[test]
fn test_session_json_shape() {
    let mut h = StudyHarness::new();
    h.add_card("D", "q", "a");
    let queue = h.engine.build_session(h.collection.cards(), &SessionScope::default());
    let json = serde_json::to_value(&queue).unwrap();

    let entry = &json[0];
    assert_eq!(entry["priorityScore"], 2.0);
    assert_eq!(entry["explanation"]["visualCue"], "new");
    assert_eq!(entry["card"]["status"], "new");
    assert_eq!(entry["card"]["stage"], "ACQUISITION");
}
