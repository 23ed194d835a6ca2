//! Study Harness
//!
//! Provides an isolated study environment for journey tests:
//! - A [`StudyEngine`] driven by a shared [`ManualClock`]
//! - An in-memory [`Collection`]
//! - JSON snapshots in a temporary directory that is removed on drop

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use studybox_core::{
    Collection, Grade, ManualClock, ReviewOutcome, SchedulerConfig, StudyEngine, StudySession,
};
use tempfile::TempDir;
use uuid::Uuid;

/// Instant every harness clock starts at
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()
}

/// Engine, clock and collection for one test.
///
/// # Example
///
/// ```rust,ignore
/// let mut h = StudyHarness::new();
/// let id = h.add_card("Geo", "France", "Paris");
/// h.review(id, Grade::Good, 3.0);
/// h.advance_days(1);
/// ```
pub struct StudyHarness {
    pub engine: StudyEngine<Arc<ManualClock>>,
    pub clock: Arc<ManualClock>,
    pub collection: Collection,
    pub session: StudySession,
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: TempDir,
    snapshot_path: PathBuf,
}

impl StudyHarness {
    /// Harness with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Harness with a custom configuration.
    pub fn with_config(config: SchedulerConfig) -> Self {
        let clock = Arc::new(ManualClock::new(epoch()));
        let engine =
            StudyEngine::with_clock(config, Arc::clone(&clock)).expect("valid test config");
        let session = engine.start_session();
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let snapshot_path = temp_dir.path().join("collection.json");

        Self {
            engine,
            clock,
            collection: Collection::new(),
            session,
            _temp_dir: temp_dir,
            snapshot_path,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        use studybox_core::Clock;
        self.clock.now()
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.clock.advance(Duration::minutes(minutes));
    }

    pub fn advance_days(&self, days: i64) {
        self.clock.advance(Duration::days(days));
    }

    /// Jump the clock to a card's next review (no-op for unscheduled cards).
    pub fn advance_to_due(&self, id: Uuid) {
        let due = self.collection.get(id).and_then(|c| c.next_review());
        if let Some(due) = due.filter(|d| *d > self.now()) {
            self.clock.set(due);
        }
    }

    /// Start a new session (fatigue back to zero).
    pub fn new_session(&mut self) {
        self.session = self.engine.start_session();
    }

    pub fn add_card(&mut self, deck: &str, front: &str, back: &str) -> Uuid {
        self.engine.new_card(&mut self.collection, deck, front, back)
    }

    /// Review a stored card in the current session.
    pub fn review(&mut self, id: Uuid, grade: Grade, seconds: f64) -> ReviewOutcome {
        self.engine
            .review(&mut self.collection, id, grade, seconds, &mut self.session)
            .expect("card exists")
    }

    /// Save the collection to the temporary snapshot file.
    pub fn save_snapshot(&self) {
        let file = File::create(&self.snapshot_path).expect("create snapshot");
        self.collection.write_json(file).expect("write snapshot");
    }

    /// Load the collection from the snapshot file.
    pub fn load_snapshot(&self) -> Collection {
        let file = File::open(&self.snapshot_path).expect("open snapshot");
        Collection::read_json(file).expect("read snapshot")
    }
}

impl Default for StudyHarness {
    fn default() -> Self {
        Self::new()
    }
}
