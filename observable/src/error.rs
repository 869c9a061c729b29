use thiserror::Error;

use crate::binding::Category;

/// Raised when a subscriber callback fails partway through a notification.
///
/// Callbacks that ran before the failing one have already observed the change;
/// callbacks after it (including those of later owners) have not.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("{category} callback failed: {source}")]
    Callback {
        category: Category,
        #[source]
        source: anyhow::Error,
    },
}

impl NotifyError {
    pub fn category(&self) -> Category {
        match self {
            NotifyError::Callback { category, .. } => *category,
        }
    }
}
