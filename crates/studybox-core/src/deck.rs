//! Deck hierarchy
//!
//! Decks nest. A deck's full path joins the names from the root with `::`
//! (`Languages::German::Verbs`), which is also how the import/export bridges
//! address them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator between deck names in a full path
pub const DECK_PATH_SEPARATOR: &str = "::";

/// Deck used when a path is empty
pub const DEFAULT_DECK_NAME: &str = "Default";

/// A named collection of cards, optionally nested under a parent deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(name: impl Into<String>, parent_id: Option<Uuid>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            parent_id,
            created_at,
        }
    }
}

/// Split a `::` path into trimmed, non-empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(DECK_PATH_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// All decks of a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckTree {
    decks: Vec<Deck>,
}

impl DeckTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Deck> {
        self.decks.iter()
    }

    pub fn get(&self, id: Uuid) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == id)
    }

    fn child(&self, parent: Option<Uuid>, name: &str) -> Option<&Deck> {
        self.decks
            .iter()
            .find(|d| d.parent_id == parent && d.name == name)
    }

    /// Resolve a full path to a deck id.
    pub fn find_path(&self, path: &str) -> Option<Uuid> {
        let segments = split_path(path);
        if segments.is_empty() {
            return None;
        }
        let mut parent = None;
        for name in segments {
            parent = Some(self.child(parent, name)?.id);
        }
        parent
    }

    /// Resolve a full path, creating any missing decks along the way.
    ///
    /// An empty path resolves to the top-level `Default` deck.
    pub fn ensure_path(&mut self, path: &str, now: DateTime<Utc>) -> Uuid {
        let mut segments = split_path(path);
        if segments.is_empty() {
            segments.push(DEFAULT_DECK_NAME);
        }

        let mut parent = None;
        for name in segments {
            let id = match self.child(parent, name) {
                Some(deck) => deck.id,
                None => {
                    let deck = Deck::new(name, parent, now);
                    let id = deck.id;
                    tracing::debug!(deck = name, %id, "Created deck");
                    self.decks.push(deck);
                    id
                }
            };
            parent = Some(id);
        }
        // segments is never empty here
        parent.unwrap_or_default()
    }

    /// Full `::` path of a deck.
    pub fn full_path(&self, id: Uuid) -> Option<String> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            // A malformed parent chain cannot be longer than the tree.
            if names.len() > self.decks.len() {
                return None;
            }
            let deck = self.get(cur)?;
            names.push(deck.name.as_str());
            current = deck.parent_id;
        }
        names.reverse();
        Some(names.join(DECK_PATH_SEPARATOR))
    }

    /// Every deck nested under `id`, at any depth.
    pub fn descendants(&self, id: Uuid) -> Vec<Uuid> {
        let mut found = Vec::new();
        let mut frontier = vec![id];
        while let Some(parent) = frontier.pop() {
            for deck in self.decks.iter().filter(|d| d.parent_id == Some(parent)) {
                if deck.id != id && !found.contains(&deck.id) {
                    found.push(deck.id);
                    frontier.push(deck.id);
                }
            }
        }
        found
    }

    /// `id` plus all of its descendants.
    pub fn subtree(&self, id: Uuid) -> Vec<Uuid> {
        let mut ids = vec![id];
        ids.extend(self.descendants(id));
        ids
    }
}
