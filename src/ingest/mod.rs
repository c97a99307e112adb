use std::collections::BTreeMap;

use log::{debug, warn};
use thiserror::Error;

use crate::bank::{OptionLabel, QuestionBank, QuestionRecord};

mod fetch;

pub use fetch::{candidate_locations, Fetcher, FileFetcher, HttpFetcher};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("question source unreachable")]
    Unreachable(#[source] anyhow::Error),
    #[error("question source contained no usable rows")]
    Empty,
}

/// Loads a question bank from a CSV source through a [`Fetcher`].
pub struct CsvIngestor<F> {
    fetcher: F,
}

impl<F: Fetcher> CsvIngestor<F> {
    pub fn new(fetcher: F) -> Self {
        CsvIngestor { fetcher }
    }

    /// Tries each location variant in turn; the first readable body wins and
    /// its parse result is final. Only when every variant fails to fetch does
    /// this report `Unreachable`, carrying the last underlying error.
    pub fn load(&self, locator: &str) -> Result<QuestionBank, IngestError> {
        let mut last_error = None;
        for location in candidate_locations(locator) {
            match self.fetcher.fetch(&location) {
                Ok(body) => return parse_bank(&body),
                Err(error) => {
                    debug!("question source miss at {}: {:#}", location, error);
                    last_error = Some(error);
                }
            }
        }
        Err(IngestError::Unreachable(last_error.unwrap_or_else(|| {
            anyhow::anyhow!("no candidate locations for {}", locator)
        })))
    }
}

/// Parses CSV bytes into a bank. Columns are positional:
/// `id,question,A,B,C,D,answer`. The header row is discarded without driving
/// any column mapping. Rows with a blank prompt are dropped, not errors.
pub fn parse_bank(body: &[u8]) -> Result<QuestionBank, IngestError> {
    let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body);

    let mut questions = Vec::new();
    for row in reader.records() {
        let record = match row {
            Ok(record) => record,
            Err(error) => {
                warn!("skipping malformed question row: {}", error);
                continue;
            }
        };
        let field = |index: usize| record.get(index).unwrap_or("").to_owned();
        let prompt = field(1);
        if prompt.is_empty() {
            continue;
        }
        let options: BTreeMap<OptionLabel, String> = OptionLabel::ALL
            .iter()
            .enumerate()
            .map(|(offset, label)| (*label, field(2 + offset)))
            .collect();
        questions.push(QuestionRecord {
            id: field(0),
            prompt,
            options,
            correct_answer: field(6),
        });
    }

    if questions.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(QuestionBank::new(questions))
}
