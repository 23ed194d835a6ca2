//! Study sessions
//!
//! - [`StudySession`]: the per-session fatigue context passed into reviews
//! - [`SessionBuilder`]: ranked, bounded queues with a pluggable
//!   [`SelectionStrategy`] ([`StudyQueue`], [`FocusQueue`])
//! - [`Explanation`]: why each queued card is there

mod builder;
mod context;
mod explain;

pub use builder::{
    FocusQueue, SelectionStrategy, SessionBuilder, SessionCard, SessionScope, StudyQueue,
    DEFAULT_SESSION_LIMIT, NEW_CARD_PRIORITY, OVERDUE_BOOST,
};
pub use context::StudySession;
pub use explain::{explain, Explanation, VisualCue};
