use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

mod question;

pub use question::{OptionLabel, QuestionRecord};

/// Shared handle to the currently loaded bank. The ingest flow replaces the
/// bank wholesale; a running session keeps its own sampled copy and is not
/// affected by a reload.
pub type BankHandle = Arc<RwLock<QuestionBank>>;

/// Ordered collection of loaded questions, in source row order.
#[derive(Clone, Debug, Default)]
pub struct QuestionBank {
    questions: Vec<QuestionRecord>,
}

impl QuestionBank {
    pub fn new(questions: Vec<QuestionRecord>) -> Self {
        QuestionBank { questions }
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Built-in bank used when loading fails and the fallback switch is on.
    pub fn demo() -> Self {
        let demo_rows = [
            (
                "demo-1",
                "Which planet is closest to the sun?",
                ["Mercury", "Venus", "Earth", "Mars"],
                "A",
            ),
            (
                "demo-2",
                "How many minutes are in two hours?",
                ["60", "90", "120", "180"],
                "C",
            ),
            (
                "demo-3",
                "Which ocean is the largest?",
                ["Atlantic", "Pacific", "Indian", "Arctic"],
                "B",
            ),
        ];
        let questions = demo_rows
            .iter()
            .map(|(id, prompt, options, answer)| QuestionRecord {
                id: (*id).to_owned(),
                prompt: (*prompt).to_owned(),
                options: OptionLabel::ALL
                    .iter()
                    .zip(options.iter())
                    .map(|(label, text)| (*label, (*text).to_owned()))
                    .collect::<BTreeMap<_, _>>(),
                correct_answer: (*answer).to_owned(),
            })
            .collect();
        QuestionBank { questions }
    }
}
