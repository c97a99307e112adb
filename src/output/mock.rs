use std::sync::Arc;

use parking_lot::RwLock;

use super::{Notice, SessionOutput};

/// Records every notice so tests can assert on what the presentation layer
/// would have been told.
#[derive(Clone, Default)]
pub struct MockSessionOutput {
    notices: Arc<RwLock<Vec<Notice>>>,
}

impl MockSessionOutput {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn flush(&mut self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.write())
    }

    pub fn contains(&self, notice: &Notice) -> bool {
        self.notices.read().iter().any(|n| n == notice)
    }
}

impl SessionOutput for MockSessionOutput {
    fn notify(&mut self, notice: Notice) {
        self.notices.write().push(notice);
    }
}
