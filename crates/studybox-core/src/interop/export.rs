//! Export bridge
//!
//! Writes the header block followed by one row per distinct
//! (deck path, front, back), every field double-quoted:
//!
//! ```text
//! #separator:Semicolon
//! #html:true
//! #deck column:1
//! #tags column:4
//! "<deck path>";"<front>";"<back>";"<tags>"
//! ```

use std::collections::HashSet;
use std::io::Write;

use uuid::Uuid;

use super::{separator_name, DEFAULT_DECK_COLUMN, DEFAULT_SEPARATOR, DEFAULT_TAGS_COLUMN};
use crate::collection::Collection;
use crate::deck::DEFAULT_DECK_NAME;
use crate::error::Result;

/// Write `collection` as delimited text, returning the number of rows.
///
/// With `deck`, only cards in that deck and its descendants are written.
pub fn export_delimited<W: Write>(
    collection: &Collection,
    deck: Option<Uuid>,
    mut writer: W,
) -> Result<usize> {
    writeln!(writer, "#separator:{}", separator_name(DEFAULT_SEPARATOR))?;
    writeln!(writer, "#html:true")?;
    writeln!(writer, "#deck column:{}", DEFAULT_DECK_COLUMN)?;
    writeln!(writer, "#tags column:{}", DEFAULT_TAGS_COLUMN)?;

    let scope: Option<HashSet<Uuid>> = deck.map(|id| collection.decks().subtree(id).into_iter().collect());

    let mut csv = csv::WriterBuilder::new()
        .delimiter(DEFAULT_SEPARATOR)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(&mut writer);

    let mut seen: HashSet<(String, &str, &str)> = HashSet::new();
    let mut written = 0usize;

    for card in collection.cards() {
        if scope.as_ref().is_some_and(|s| !s.contains(&card.deck_id)) {
            continue;
        }

        let path = collection
            .decks()
            .full_path(card.deck_id)
            .unwrap_or_else(|| DEFAULT_DECK_NAME.to_string());

        if !seen.insert((path.clone(), card.front.as_str(), card.back.as_str())) {
            continue;
        }

        let tags = card.tags.join(" ");
        csv.write_record([path.as_str(), card.front.as_str(), card.back.as_str(), tags.as_str()])?;
        written += 1;
    }

    csv.flush()?;

    tracing::info!(rows = written, cards = collection.len(), "Export complete");

    Ok(written)
}

/// [`export_delimited`] into a `String`.
pub fn export_to_string(collection: &Collection, deck: Option<Uuid>) -> Result<String> {
    let mut buf = Vec::new();
    export_delimited(collection, deck, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
