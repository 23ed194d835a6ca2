//! Journey: bring a deck in, study it, take it back out.

use std::collections::HashSet;

use studybox_core::{
    CardContent, CardStatus, CognitiveStage, Collection, EngineError, Grade, export_delimited,
};
use studybox_e2e_tests::{StudyHarness, TestDataFactory};

fn keys(collection: &Collection) -> HashSet<(String, String, String, Vec<String>)> {
    collection
        .cards()
        .iter()
        .map(|c| {
            (
                collection.decks().full_path(c.deck_id).unwrap_or_default(),
                c.front.clone(),
                c.back.clone(),
                c.tags.clone(),
            )
        })
        .collect()
}

#[test]
fn test_import_notes_file() {
    let mut h = StudyHarness::new();
    let report = h.engine.import(&mut h.collection, &TestDataFactory::notes_file()).unwrap();

    assert_eq!(report.imported, 6);
    assert_eq!(report.seeded, 3);
    // Languages, German, Nouns, Cloze
    assert_eq!(report.decks_created, 4);

    let by_front = |front: &str| {
        h.collection
            .cards()
            .iter()
            .find(|c| c.front == front)
            .unwrap()
            .clone()
    };

    let hund = by_front("der Hund");
    assert_eq!(hund.stage(), CognitiveStage::Consolidation);
    assert_eq!(hund.metrics().stability(), 5.0);
    assert_eq!(hund.status(), CardStatus::Review);
    assert_eq!(hund.tags, vec!["nouns", "animals"]);

    let blume = by_front("die Blume");
    assert_eq!(blume.stage(), CognitiveStage::Retention);
    assert_eq!(blume.metrics().stability(), 25.0);

    let katze = by_front("die Katze");
    assert!(katze.is_new());
    assert_eq!(katze.status(), CardStatus::New);

    let cloze = h
        .collection
        .cards()
        .iter()
        .find(|c| matches!(c.content, CardContent::Cloze { .. }))
        .unwrap();
    assert_eq!(cloze.content, CardContent::Cloze { index: 1 });
    assert_eq!(
        h.collection.decks().full_path(cloze.deck_id).as_deref(),
        Some("Languages::German::Cloze")
    );
}

#[test]
fn test_seeded_cards_review_on_schedule() {
    let mut h = StudyHarness::new();
    h.engine.import(&mut h.collection, &TestDataFactory::notes_file()).unwrap();
    let hund = h.collection.cards().iter().find(|c| c.front == "der Hund").unwrap().id;

    h.advance_to_due(hund);
    let risk = h.engine.risk(h.collection.get(hund).unwrap());
    assert!((risk - 0.10).abs() < 1e-9);

    let out = h.review(hund, Grade::Good, 3.0);
    assert!(out.card.metrics().stability() > 5.0);
    assert!((out.risk_before - 0.10).abs() < 1e-9);
}

#[test]
fn test_export_after_study_roundtrips() {
    let mut h = StudyHarness::new();
    h.engine.import(&mut h.collection, &TestDataFactory::notes_file()).unwrap();
    let ids: Vec<_> = h.collection.cards().iter().map(|c| c.id).collect();
    for id in &ids {
        h.review(*id, Grade::Good, 2.0);
    }

    let text = h.engine.export(&h.collection, None).unwrap();
    assert!(text.starts_with("#separator:Semicolon\n#html:true\n#deck column:1\n#tags column:4\n"));

    let mut restored = Collection::new();
    h.engine.import(&mut restored, &text).unwrap();
    assert_eq!(keys(&restored), keys(&h.collection));
}

#[test]
fn test_export_single_deck_to_file() {
    let mut h = StudyHarness::new();
    h.engine.import(&mut h.collection, &TestDataFactory::notes_file()).unwrap();
    let cloze_deck = h.collection.deck_id("Languages::German::Cloze").unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("cloze.txt");
    let file = std::fs::File::create(&path).unwrap();
    let rows = export_delimited(&h.collection, Some(cloze_deck), file).unwrap();
    assert_eq!(rows, 1);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.ends_with(
        "\"Languages::German::Cloze\";\"{{c2::Berlin}} is the capital of {{c1::Germany}}\";\"\";\"cloze\"\n"
    ));
}

#[test]
fn test_snapshot_preserves_memory_model() {
    let mut h = StudyHarness::new();
    h.engine.import(&mut h.collection, &TestDataFactory::notes_file()).unwrap();
    let id = h.collection.cards()[1].id;
    h.review(id, Grade::Good, 3.0);
    h.advance_minutes(10);
    h.review(id, Grade::Hard, 20.0);

    h.save_snapshot();
    let loaded = h.load_snapshot();
    assert_eq!(loaded, h.collection);
    assert_eq!(loaded.get(id).unwrap().metrics().history().len(), 2);
}

#[test]
fn test_header_only_file_is_rejected() {
    let mut h = StudyHarness::new();
    let err = h
        .engine
        .import(&mut h.collection, "#separator:Semicolon\n#html:true\n")
        .unwrap_err();
    assert!(matches!(err, EngineError::EmptyImport));
    assert!(h.collection.is_empty());
}
