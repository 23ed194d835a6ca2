//! Import bridge
//!
//! Two steps, so hosts can inspect or filter rows before committing them:
//! [`parse_delimited`] turns text into [`ImportRow`]s and [`import_rows`]
//! adds them to a [`Collection`].
//!
//! Column mapping: the deck and tags columns come from the header
//! directives. Every other column, in order, is front, back and an optional
//! interval in days. Columns named by any other `#... column:` directive
//! (note type, guid) are skipped.

use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{separator_byte, DEFAULT_DECK_COLUMN, DEFAULT_SEPARATOR, DEFAULT_TAGS_COLUMN};
use crate::card::{Card, CardContent, CardStatus, CognitiveStage};
use crate::collection::Collection;
use crate::config::SchedulerConfig;
use crate::deck::DEFAULT_DECK_NAME;
use crate::error::{EngineError, Result};
use crate::scheduler::{bounded_interval_days, schedule_after};

/// One card as read from delimited text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    pub deck_path: String,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Known interval in days; seeds the memory model when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<f64>,
}

/// Summary of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Cards added
    pub imported: usize,
    /// Cards whose memory model was seeded from an interval
    pub seeded: usize,
    /// Decks that did not exist before
    pub decks_created: usize,
}

// ============================================================================
// HEADER DIRECTIVES
// ============================================================================

#[derive(Debug, Clone)]
struct Layout {
    separator: u8,
    /// 0-based; `None` when the text has no such column
    deck_column: Option<usize>,
    tags_column: Option<usize>,
    /// 0-based columns claimed by other directives
    reserved: HashSet<usize>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            deck_column: Some(DEFAULT_DECK_COLUMN - 1),
            tags_column: Some(DEFAULT_TAGS_COLUMN - 1),
            reserved: HashSet::new(),
        }
    }
}

impl Layout {
    fn from_header(text: &str) -> Self {
        let mut layout = Layout::default();

        for line in text.lines().take_while(|l| l.starts_with('#')) {
            let Some((key, value)) = line[1..].split_once(':') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            if key == "separator" {
                match separator_byte(value) {
                    Some(byte) => layout.separator = byte,
                    None => tracing::warn!(value, "Unknown separator, keeping default"),
                }
            } else if let Some(name) = key.strip_suffix(" column") {
                let Some(column) = value.parse::<usize>().ok().filter(|c| *c >= 1) else {
                    tracing::warn!(directive = %key, value, "Invalid column number, ignoring");
                    continue;
                };
                match name.trim() {
                    "deck" => layout.deck_column = Some(column - 1),
                    "tags" => layout.tags_column = Some(column - 1),
                    _ => {
                        layout.reserved.insert(column - 1);
                    }
                }
            }
        }
        layout
    }

    fn is_content_column(&self, index: usize) -> bool {
        Some(index) != self.deck_column
            && Some(index) != self.tags_column
            && !self.reserved.contains(&index)
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse delimited text into rows.
///
/// Rows with neither front nor back are skipped with a warning. Intervals
/// that are empty, unparsable or not positive are treated as absent.
pub fn parse_delimited(text: &str) -> Result<Vec<ImportRow>> {
    let layout = Layout::from_header(text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(layout.separator)
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;

        let deck_path = layout
            .deck_column
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_DECK_NAME)
            .to_string();

        let tags = layout
            .tags_column
            .and_then(|i| record.get(i))
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        let mut content = record
            .iter()
            .enumerate()
            .filter(|(i, _)| layout.is_content_column(*i))
            .map(|(_, field)| field);
        let front = content.next().unwrap_or_default().to_string();
        let back = content.next().unwrap_or_default().to_string();
        let interval = content.next().and_then(|raw| parse_interval(raw, index));

        if front.trim().is_empty() && back.trim().is_empty() {
            tracing::warn!(row = index + 1, "Skipping row without front or back");
            continue;
        }

        rows.push(ImportRow {
            deck_path,
            front,
            back,
            tags,
            interval,
        });
    }

    Ok(rows)
}

fn parse_interval(raw: &str, index: usize) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(days) if days.is_finite() && days > 0.0 => Some(days),
        Ok(_) => None,
        Err(_) => {
            tracing::warn!(row = index + 1, value = raw, "Ignoring unparsable interval");
            None
        }
    }
}

fn cloze_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{c(\d+)::").expect("cloze regex must compile"))
}

/// Infer the content variant: `Cloze` with the lowest `{{cN::` index found
/// in front or back, otherwise `Plain`.
pub fn infer_content(front: &str, back: &str) -> CardContent {
    [front, back]
        .into_iter()
        .flat_map(|text| cloze_re().captures_iter(text))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .min()
        .map(|index| CardContent::Cloze { index })
        .unwrap_or_default()
}

// ============================================================================
// IMPORT
// ============================================================================

/// Add parsed rows to `collection`, creating decks as needed.
///
/// A row with an interval is seeded as an already-learned card: stability
/// equals the interval, the stage is consolidation (up to the retention
/// cutoff, 21 days by default) or retention beyond it, and the next review
/// is one interval from `now`. Intervals beyond `max_interval_days` are
/// clamped to it.
pub fn import_rows(
    rows: Vec<ImportRow>,
    collection: &mut Collection,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> Result<ImportReport> {
    if rows.is_empty() {
        return Err(EngineError::EmptyImport);
    }

    let decks_before = collection.decks().len();
    let mut report = ImportReport::default();

    for row in rows {
        let deck_id = collection.decks_mut().ensure_path(&row.deck_path, now);
        let content = infer_content(&row.front, &row.back);
        let mut card = Card::new(deck_id, row.front, row.back, now)
            .with_content(content)
            .with_tags(row.tags);
        card.metrics.difficulty = config.initial_difficulty;

        if let Some(days) = row.interval.filter(|d| *d > 0.0) {
            if days > config.max_interval_days {
                tracing::warn!(
                    front = %card.front,
                    interval = days,
                    max = config.max_interval_days,
                    "Clamping imported interval"
                );
            }
            seed(&mut card, bounded_interval_days(days, config.max_interval_days), now, config);
            report.seeded += 1;
        }

        collection.add_card(card)?;
        report.imported += 1;
    }

    report.decks_created = collection.decks().len() - decks_before;

    tracing::info!(
        imported = report.imported,
        seeded = report.seeded,
        decks_created = report.decks_created,
        "Import complete"
    );

    Ok(report)
}

fn seed(card: &mut Card, days: f64, now: DateTime<Utc>, config: &SchedulerConfig) {
    card.stage = if days <= config.import_retention_cutoff_days {
        CognitiveStage::Consolidation
    } else {
        CognitiveStage::Retention
    };
    card.status = CardStatus::Review;
    card.metrics.stability = days;
    card.metrics.last_review = Some(now);
    card.interval = days;
    card.next_review = Some(schedule_after(now, days));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, 7, 30, 0).unwrap()
    }

    #[test]
    fn test_parse_with_default_layout() {
        let text = "\"Lang::German\";\"der Hund\";\"the dog\";\"nouns animals\"\n";
        let rows = parse_delimited(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].deck_path, "Lang::German");
        assert_eq!(rows[0].front, "der Hund");
        assert_eq!(rows[0].back, "the dog");
        assert_eq!(rows[0].tags, vec!["nouns", "animals"]);
        assert_eq!(rows[0].interval, None);
    }

    #[test]
    fn test_header_directives_change_layout() {
        let text = "#separator:Tab\n#html:false\n#notetype column:1\n#deck column:2\n#tags column:6\n\
                    Basic\tGeo\tFrance\tParis\t30\tcapitals\n";
        let rows = parse_delimited(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].deck_path, "Geo");
        assert_eq!(rows[0].front, "France");
        assert_eq!(rows[0].back, "Paris");
        assert_eq!(rows[0].interval, Some(30.0));
        assert_eq!(rows[0].tags, vec!["capitals"]);
    }

    #[test]
    fn test_missing_deck_and_bad_interval() {
        let text = "\"\";\"q1\";\"a1\";\"\";\"-3\"\n\"D\";\"q2\";\"a2\";\"\";\"soon\"\n\"D\";\"\";\"\";\"\"\n";
        let rows = parse_delimited(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].deck_path, DEFAULT_DECK_NAME);
        assert_eq!(rows[0].interval, None);
        assert_eq!(rows[1].interval, None);
    }

    #[test]
    fn test_quoted_fields_keep_separators_and_quotes() {
        let text = "\"D\";\"a;b\";\"say \"\"hi\"\"\";\"\"\n";
        let rows = parse_delimited(text).unwrap();
        assert_eq!(rows[0].front, "a;b");
        assert_eq!(rows[0].back, "say \"hi\"");
    }

    #[test]
    fn test_cloze_detection_picks_lowest_index() {
        assert_eq!(
            infer_content("{{c3::Paris}} is the capital of {{c2::France}}", ""),
            CardContent::Cloze { index: 2 }
        );
        assert_eq!(infer_content("plain", "{{c1::x}}"), CardContent::Cloze { index: 1 });
        assert_eq!(infer_content("{{notcloze}}", "b"), CardContent::Plain);
    }

    #[test]
    fn test_import_seeds_intervals() {
        let config = SchedulerConfig::default();
        let mut collection = Collection::new();
        let rows = vec![
            ImportRow {
                deck_path: "Geo::Europe".into(),
                front: "France".into(),
                back: "Paris".into(),
                tags: vec![],
                interval: Some(10.0),
            },
            ImportRow {
                deck_path: "Geo::Asia".into(),
                front: "Japan".into(),
                back: "Tokyo".into(),
                tags: vec![],
                interval: Some(45.0),
            },
            ImportRow {
                deck_path: "Geo::Asia".into(),
                front: "{{c1::Seoul}} is in Korea".into(),
                back: String::new(),
                tags: vec!["cloze".into()],
                interval: None,
            },
        ];

        let report = import_rows(rows, &mut collection, t0(), &config).unwrap();
        assert_eq!(report, ImportReport { imported: 3, seeded: 2, decks_created: 3 });

        let cards = collection.cards();
        assert_eq!(cards[0].stage(), CognitiveStage::Consolidation);
        assert_eq!(cards[0].metrics().stability(), 10.0);
        assert_eq!(cards[0].status(), CardStatus::Review);
        assert_eq!(cards[0].metrics().last_review(), Some(t0()));
        assert_eq!(cards[0].next_review(), Some(t0() + Duration::days(10)));

        assert_eq!(cards[1].stage(), CognitiveStage::Retention);

        assert!(cards[2].is_new());
        assert_eq!(cards[2].status(), CardStatus::New);
        assert_eq!(cards[2].content, CardContent::Cloze { index: 1 });
    }

    #[test]
    fn test_exactly_cutoff_is_consolidation() {
        let config = SchedulerConfig::default();
        let mut collection = Collection::new();
        let rows = parse_delimited("\"D\";\"q\";\"a\";\"\";\"21\"\n").unwrap();
        import_rows(rows, &mut collection, t0(), &config).unwrap();
        assert_eq!(collection.cards()[0].stage(), CognitiveStage::Consolidation);
    }

    #[test]
    fn test_huge_interval_is_clamped() {
        let config = SchedulerConfig::default();
        let mut collection = Collection::new();
        let rows = parse_delimited("\"D\";\"q\";\"a\";\"\";\"100000000\"\n\"D\";\"q2\";\"a2\";\"\";\"1e300\"\n")
            .unwrap();
        assert_eq!(rows[0].interval, Some(100_000_000.0));

        let report = import_rows(rows, &mut collection, t0(), &config).unwrap();
        assert_eq!(report.seeded, 2);
        for card in collection.cards() {
            assert_eq!(card.stage(), CognitiveStage::Retention);
            assert_eq!(card.metrics().stability(), config.max_interval_days);
            assert_eq!(card.interval(), config.max_interval_days);
            assert_eq!(card.next_review(), Some(t0() + Duration::days(36_500)));
        }
    }

    #[test]
    fn test_non_positive_row_interval_leaves_card_new() {
        let mut collection = Collection::new();
        let rows = vec![ImportRow {
            deck_path: "D".into(),
            front: "q".into(),
            back: "a".into(),
            tags: vec![],
            interval: Some(f64::NAN),
        }];
        let report = import_rows(rows, &mut collection, t0(), &SchedulerConfig::default()).unwrap();
        assert_eq!(report.seeded, 0);
        assert!(collection.cards()[0].is_new());
    }

    #[test]
    fn test_empty_import_is_an_error() {
        let mut collection = Collection::new();
        let rows = parse_delimited("#separator:Semicolon\n#html:true\n").unwrap();
        assert!(rows.is_empty());
        let err = import_rows(rows, &mut collection, t0(), &SchedulerConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::EmptyImport));
    }
}
