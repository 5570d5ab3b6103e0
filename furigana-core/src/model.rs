//! Wire data model for the furigana service response.

use serde::{Deserialize, Serialize};

/// One segmented word of the annotated text.
///
/// `furigana` is absent for words the service considers already readable
/// (kana, punctuation, or kanji below the requested grade). When a word's
/// reading cannot be assigned as one unit the service decomposes it into
/// `subword` entries with per-unit readings.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Word {
    pub surface: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub furigana: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roman: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subword: Option<Vec<Subword>>,
}

/// Sub-unit of a [`Word`] carrying its own reading.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Subword {
    pub surface: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub furigana: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roman: Option<String>,
}

impl Word {
    /// Reading that actually adds information: a furigana equal to the
    /// surface is already phonetic and is treated as absent.
    pub fn distinct_furigana(&self) -> Option<&str> {
        distinct(&self.surface, self.furigana.as_deref())
    }
}

impl Subword {
    pub fn distinct_furigana(&self) -> Option<&str> {
        distinct(&self.surface, self.furigana.as_deref())
    }
}

fn distinct<'a>(surface: &str, furigana: Option<&'a str>) -> Option<&'a str> {
    furigana.filter(|f| *f != surface)
}
