use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The four answer slots of a multiple-choice question.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [
        OptionLabel::A,
        OptionLabel::B,
        OptionLabel::C,
        OptionLabel::D,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
            OptionLabel::D => "D",
        }
    }

    pub fn parse(value: &str) -> Option<OptionLabel> {
        match value {
            "A" => Some(OptionLabel::A),
            "B" => Some(OptionLabel::B),
            "C" => Some(OptionLabel::C),
            "D" => Some(OptionLabel::D),
            _ => None,
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One loaded question. Immutable once created by the ingestor.
///
/// `correct_answer` is kept as the raw trimmed string from the source rather
/// than an `OptionLabel`: the source does not guarantee it is one of the four
/// labels, and scoring compares it exactly as stored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuestionRecord {
    pub id: String,
    pub prompt: String,
    pub options: BTreeMap<OptionLabel, String>,
    pub correct_answer: String,
}

impl QuestionRecord {
    pub fn option_text(&self, label: OptionLabel) -> &str {
        self.options.get(&label).map(String::as_str).unwrap_or("")
    }
}
