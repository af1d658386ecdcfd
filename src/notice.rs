//! User-visible notices.
//!
//! Every recovered failure produces exactly one notice, and each failure kind
//! has its own message.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

/// A non-fatal message for the person looking at the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Geolocation failed; the map stays at its default center
    LocationUnavailable { reason: String },
    /// The search succeeded but matched nothing
    NoResults { query: String },
    /// Network or HTTP failure; the user may retry
    SearchFailed { query: String },
    /// The service answered with something we could not read
    SearchUnreadable { query: String },
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::LocationUnavailable { .. } => {
                "Unable to get your location. Map centered on default."
            }
            Notice::NoResults { .. } => "No results found for the search query.",
            Notice::SearchFailed { .. } => "Error fetching search results. Please try again.",
            Notice::SearchUnreadable { .. } => {
                "Search results could not be read. Please try again."
            }
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Delivers notices to the user
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

/// Logs notices at warn level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::LocationUnavailable { reason } => warn!("{} ({})", notice, reason),
            Notice::NoResults { query }
            | Notice::SearchFailed { query }
            | Notice::SearchUnreadable { query } => warn!("{} (query: {:?})", notice, query),
        }
    }
}

/// Keeps every notice so the host can display them later.
///
/// Clones share the same list.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.notices.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.borrow().is_empty()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        TracingNotifier.notify(notice);
        self.notices.borrow_mut().push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_distinct() {
        let q = "plastic".to_string();
        let notices = [
            Notice::LocationUnavailable {
                reason: "denied".into(),
            },
            Notice::NoResults { query: q.clone() },
            Notice::SearchFailed { query: q.clone() },
            Notice::SearchUnreadable { query: q },
        ];

        for (i, a) in notices.iter().enumerate() {
            for b in &notices[i + 1..] {
                assert_ne!(a.message(), b.message());
            }
        }
    }

    #[test]
    fn test_recording_notifier_shares_list() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();

        notifier.notify(&Notice::NoResults {
            query: "eco".into(),
        });

        assert_eq!(handle.len(), 1);
        assert_eq!(handle.notices()[0].to_string(), "No results found for the search query.");
    }
}
