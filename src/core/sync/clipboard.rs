use std::time::Duration;

use tokio::time::Instant;

use crate::core::model::LinkId;

/// System clipboard seam. The hub only ever writes text to it.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

/// Marks the most recently copied link for a short while.
#[derive(Debug, Clone)]
pub struct CopiedIndicator {
    duration: Duration,
    current: Option<(LinkId, Instant)>,
}

impl CopiedIndicator {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
        }
    }

    pub fn mark(&mut self, link: LinkId) {
        self.current = Some((link, Instant::now()));
    }

    /// The copied link, until the indicator expires.
    pub fn current(&self) -> Option<&LinkId> {
        match &self.current {
            Some((link, copied_at)) if copied_at.elapsed() < self.duration => Some(link),
            _ => None,
        }
    }

    pub fn is_copied(&self, link: &LinkId) -> bool {
        self.current() == Some(link)
    }
}
