//! Encrypted store configuration.

use serde::{Deserialize, Serialize};

use crate::envelope::EnvelopeFormat;
use crate::error::Result;

/// Settings for new encrypted documents.
///
/// Reads do not consult this: every document carries its own format and
/// work factor in its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Envelope format for writes
    #[serde(default)]
    pub format: EnvelopeFormat,

    /// Work factor for writes; the format's default when unset
    #[serde(default)]
    pub work_factor: Option<u8>,
}

impl StoreConfig {
    pub fn new(format: EnvelopeFormat) -> Self {
        Self {
            format,
            work_factor: None,
        }
    }

    pub fn with_work_factor(mut self, work_factor: u8) -> Self {
        self.work_factor = Some(work_factor);
        self
    }

    pub fn effective_work_factor(&self) -> u8 {
        self.work_factor
            .unwrap_or_else(|| self.format.default_work_factor())
    }

    /// Check the work factor against the format's accepted range.
    pub fn validate(&self) -> Result<()> {
        self.format
            .validate_work_factor(self.effective_work_factor())?;
        Ok(())
    }
}
