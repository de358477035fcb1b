//! Provenance-tagged fetch results

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataOrigin {
    /// Live upstream call that succeeded end to end
    LiveProvider,
    /// Deterministic synthetic data or an explicitly empty fallback
    StubFallback,
}

impl DataOrigin {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LiveProvider => "live-provider",
            Self::StubFallback => "stub-fallback",
        }
    }
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload plus its provenance.
///
/// `is_stub` is true exactly when `source` is [`DataOrigin::StubFallback`].
/// Fields are private so that the pairing cannot drift; use [`FetchResult::live`]
/// or [`FetchResult::stub`] to build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResult<T> {
    data: T,
    is_stub: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stub_reason: Option<String>,
    source: DataOrigin,
}

impl<T> FetchResult<T> {
    /// Payload from a successful live call
    pub fn live(data: T) -> Self {
        Self {
            data,
            is_stub: false,
            stub_reason: None,
            source: DataOrigin::LiveProvider,
        }
    }

    /// Fallback payload, optionally recording why the live path was not used
    pub fn stub(data: T, reason: Option<String>) -> Self {
        Self {
            data,
            is_stub: true,
            stub_reason: reason,
            source: DataOrigin::StubFallback,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn is_stub(&self) -> bool {
        self.is_stub
    }

    pub fn stub_reason(&self) -> Option<&str> {
        self.stub_reason.as_deref()
    }

    pub fn source(&self) -> DataOrigin {
        self.source
    }

    /// Transform the payload, keeping provenance untouched
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchResult<U> {
        FetchResult {
            data: f(self.data),
            is_stub: self.is_stub,
            stub_reason: self.stub_reason,
            source: self.source,
        }
    }
}
