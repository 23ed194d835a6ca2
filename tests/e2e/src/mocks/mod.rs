//! Test Data Factory
//!
//! Provides utilities for generating realistic test data:
//! - Vocabulary decks with nested paths
//! - Delimited-text import fixtures
//! - Pre-built review histories

use studybox_core::{Collection, Grade, StudyEngine};
use uuid::Uuid;

use crate::StudyHarness;

/// German vocabulary used across journeys: (front, back, tags)
pub const GERMAN_NOUNS: &[(&str, &str, &str)] = &[
    ("der Hund", "the dog", "nouns animals"),
    ("die Katze", "the cat", "nouns animals"),
    ("das Haus", "the house", "nouns"),
    ("der Baum", "the tree", "nouns nature"),
    ("die Blume", "the flower", "nouns nature"),
];

/// Capitals used across journeys: (country, capital)
pub const CAPITALS: &[(&str, &str)] = &[
    ("France", "Paris"),
    ("Japan", "Tokyo"),
    ("Kenya", "Nairobi"),
    ("Peru", "Lima"),
];

/// Factory for creating test data
pub struct TestDataFactory;

impl TestDataFactory {
    /// A notes file in the default layout, some rows with known intervals.
    pub fn notes_file() -> String {
        let mut text = String::from(
            "#separator:Semicolon\n#html:true\n#deck column:1\n#tags column:4\n",
        );
        for (i, (front, back, tags)) in GERMAN_NOUNS.iter().enumerate() {
            // Every other noun carries a known interval
            let interval = if i % 2 == 0 { format!(";\"{}\"", 5 * (i + 1)) } else { String::new() };
            text.push_str(&format!(
                "\"Languages::German::Nouns\";\"{front}\";\"{back}\";\"{tags}\"{interval}\n"
            ));
        }
        text.push_str("\"Languages::German::Cloze\";\"{{c2::Berlin}} is the capital of {{c1::Germany}}\";\"\";\"cloze\"\n");
        text
    }

    /// Fill `deck` with the capitals.
    pub fn add_capitals<C: studybox_core::Clock>(
        engine: &StudyEngine<C>,
        collection: &mut Collection,
        deck: &str,
    ) -> Vec<Uuid> {
        CAPITALS
            .iter()
            .map(|(country, capital)| engine.new_card(collection, deck, *country, *capital))
            .collect()
    }

    /// Answer `grades` for one card, jumping to each due time first.
    pub fn review_history(harness: &mut StudyHarness, id: Uuid, grades: &[Grade]) {
        for &grade in grades {
            harness.advance_to_due(id);
            harness.review(id, grade, 3.0);
        }
    }
}
