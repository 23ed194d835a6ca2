//! Card content variants

use serde::{Deserialize, Serialize};

/// A rectangle hidden on an image-occlusion card, in image-relative units
/// (0.0 - 1.0 on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OcclusionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// An audio clip embedded in a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioClip {
    /// Media reference understood by the host application
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

/// What kind of card this is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CardContent {
    /// Front shows the question, back the answer
    #[default]
    Plain,
    /// Reviewed back-to-front
    Reversed,
    /// Fill-in-the-blank; `index` is the cloze number (`{{c1::...}}` is 1)
    Cloze { index: u32 },
    /// The answer is typed rather than revealed
    TypedAnswer,
    /// Parts of an image are hidden
    ImageOcclusion { rects: Vec<OcclusionRect> },
    /// Listening card
    Audio { clips: Vec<AudioClip> },
}

impl CardContent {
    /// Audio cards take time to play, so slow answers are not penalized.
    #[inline]
    pub fn is_audio(&self) -> bool {
        matches!(self, CardContent::Audio { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CardContent::Plain => "plain",
            CardContent::Reversed => "reversed",
            CardContent::Cloze { .. } => "cloze",
            CardContent::TypedAnswer => "typed",
            CardContent::ImageOcclusion { .. } => "occlusion",
            CardContent::Audio { .. } => "audio",
        }
    }
}
