//! Studybox end-to-end test support
//!
//! - [`harness`]: an engine on a manual clock, with a collection and a
//!   temporary snapshot directory
//! - [`mocks`]: factories for cards, decks and delimited-text fixtures

pub mod harness;
pub mod mocks;

pub use harness::StudyHarness;
pub use mocks::TestDataFactory;
