use std::collections::HashMap;

use crate::bank::{OptionLabel, QuestionRecord};
use crate::sink::AnswerDetail;

/// Tallies a finished answer sheet. Unanswered questions count as wrong and
/// appear in the detail with an empty selection. The recorded label is
/// compared against `correct_answer` exactly as stored; the only trimming
/// ever applied happened at ingestion.
pub fn score(
    selected: &[QuestionRecord],
    answers: &HashMap<String, OptionLabel>,
) -> (u32, Vec<AnswerDetail>) {
    let mut tally = 0;
    let mut detail = Vec::with_capacity(selected.len());
    for question in selected {
        let chosen = answers.get(&question.id);
        if chosen.map(|label| label.as_str()) == Some(question.correct_answer.as_str()) {
            tally += 1;
        }
        detail.push(AnswerDetail {
            id: question.id.clone(),
            selected: chosen.map(|label| label.to_string()).unwrap_or_default(),
        });
    }
    (tally, detail)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn question(id: &str, correct: &str) -> QuestionRecord {
        QuestionRecord {
            id: id.to_owned(),
            prompt: format!("prompt for {}", id),
            options: OptionLabel::ALL
                .iter()
                .map(|label| (*label, format!("option {}", label)))
                .collect::<BTreeMap<_, _>>(),
            correct_answer: correct.to_owned(),
        }
    }

    #[test]
    fn unanswered_counts_as_wrong_with_empty_detail() {
        let selected = vec![question("q1", "A"), question("q2", "B")];
        let mut answers = HashMap::new();
        answers.insert("q1".to_owned(), OptionLabel::A);

        let (tally, detail) = score(&selected, &answers);
        assert_eq!(tally, 1);
        assert_eq!(detail.len(), 2);
        assert_eq!(detail[0].id, "q1");
        assert_eq!(detail[0].selected, "A");
        assert_eq!(detail[1].id, "q2");
        assert_eq!(detail[1].selected, "");
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let selected = vec![question("q1", "a")];
        let mut answers = HashMap::new();
        answers.insert("q1".to_owned(), OptionLabel::A);

        let (tally, _) = score(&selected, &answers);
        assert_eq!(tally, 0);
    }

    #[test]
    fn scoring_is_idempotent() {
        let selected = vec![question("q1", "A"), question("q2", "C"), question("q3", "D")];
        let mut answers = HashMap::new();
        answers.insert("q1".to_owned(), OptionLabel::A);
        answers.insert("q2".to_owned(), OptionLabel::B);

        let first = score(&selected, &answers);
        let second = score(&selected, &answers);
        assert_eq!(first, second);
    }

    #[test]
    fn detail_preserves_selection_order() {
        let selected = vec![question("z", "A"), question("a", "B"), question("m", "C")];
        let answers = HashMap::new();

        let (_, detail) = score(&selected, &answers);
        let ids: Vec<&str> = detail.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }
}
