//! Test doubles for the console host

use aasettle_application::ReplySink;
use aasettle_domain::Identity;
use std::cell::RefCell;

/// Collects replies instead of printing them
#[derive(Default)]
pub struct RecordingSink {
    replies: RefCell<Vec<(Identity, String)>>,
}

impl RecordingSink {
    pub fn replies(&self) -> Vec<(Identity, String)> {
        self.replies.borrow().clone()
    }
}

impl ReplySink for RecordingSink {
    fn reply(&self, to: &Identity, text: &str) {
        self.replies
            .borrow_mut()
            .push((to.clone(), text.to_string()));
    }
}
