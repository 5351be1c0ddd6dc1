use serde::{Deserialize, Serialize};
use std::fmt;

use crate::movie::MovieRecord;

/// Which tier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Primary,
    Secondary,
    Cache,
    None,
}

impl ResultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Cache => "cache",
            Self::None => "none",
        }
    }
}

impl fmt::Display for ResultSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub source: ResultSource,
    pub items: Vec<MovieRecord>,
    #[serde(default)]
    pub partial: bool,
}

impl ProviderResult {
    pub fn from_provider(source: ResultSource, items: Vec<MovieRecord>) -> Self {
        Self {
            source,
            items,
            partial: false,
        }
    }

    pub fn cached(items: Vec<MovieRecord>) -> Self {
        Self {
            source: ResultSource::Cache,
            items,
            partial: false,
        }
    }

    /// Last-known-good copy served after every live tier failed.
    pub fn stale(items: Vec<MovieRecord>) -> Self {
        Self {
            source: ResultSource::Cache,
            items,
            partial: true,
        }
    }

    /// Total exhaustion. Never carries items.
    pub fn exhausted() -> Self {
        Self {
            source: ResultSource::None,
            items: Vec::new(),
            partial: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
