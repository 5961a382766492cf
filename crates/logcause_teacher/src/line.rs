//! Sample lines and where they were read from.

use serde::{Deserialize, Serialize};

/// Location of the log file a sample line was taken from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineSource {
    /// Host name.
    pub host: String,
    /// Path of the log file on that host.
    pub path: String,
}

impl LineSource {
    /// Creates a new source.
    #[must_use]
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
        }
    }
}

/// One raw log line picked by the user, plus its position in the source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleLine {
    /// Line text without the trailing newline.
    pub content: String,
    /// Byte offset of the line in its file.
    pub offset: u64,
    /// File the line came from.
    pub source: LineSource,
}

impl SampleLine {
    /// Creates a line with an empty source at offset 0.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Builder method to set the offset.
    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Builder method to set the source.
    #[must_use]
    pub fn with_source(mut self, source: LineSource) -> Self {
        self.source = source;
        self
    }
}
