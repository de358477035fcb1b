//! Core adapter contract for findata
//!
//! Every data source in the workspace is an adapter that can verify its own
//! operability ([`HealthProbe`]), degrade to deterministic synthetic data
//! ([`StubGenerator`]) and report what it returned ([`FetchResult`]) without
//! callers needing source-specific knowledge.

pub mod adapter;
pub mod error;
pub mod health;
pub mod http;
pub mod result;
pub mod stub;
pub mod ticker;

pub use adapter::{Adapter, AdapterState, HealthCheckPolicy};
pub use error::{AdapterError, ConnectivityKind, Result};
pub use health::{ApiHealthProbe, Credential, HealthProbe, HealthStatus, ProbeOutcome};
pub use http::{
    HttpClient, HttpError, HttpErrorKind, HttpMethod, HttpRequest, HttpResponse,
    ReqwestHttpClient,
};
pub use result::{DataOrigin, FetchResult};
pub use stub::StubGenerator;
pub use ticker::sanitize_ticker;
