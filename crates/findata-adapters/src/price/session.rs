//! Yahoo Finance cookie/crumb session
//!
//! `quoteSummary` rejects requests without a session cookie from
//! `fc.yahoo.com` and the matching crumb from `/v1/test/getcrumb`. The cookie
//! lives in the transport's cookie store; the crumb is cached here until a
//! request is rejected with 401.

use std::time::Duration;

use findata_core::{AdapterError, ConnectivityKind, HttpClient, HttpRequest, Result};
use tokio::sync::Mutex;
use tracing::debug;

pub(crate) const COOKIE_URL: &str = "https://fc.yahoo.com";
pub(crate) const CRUMB_URLS: &[&str] = &[
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const REFERER: &str = "https://finance.yahoo.com/";

/// A crumb is a short token; anything else is an error page
fn valid_crumb(body: &str) -> Option<&str> {
    let body = body.trim();
    let looks_like_html = body.contains("<html") || body.contains("<!DOCTYPE");
    let plausible = !body.is_empty() && body.len() < 100 && !body.contains(' ');
    (plausible && !looks_like_html).then_some(body)
}

#[derive(Debug, Default)]
pub(crate) struct YahooSession {
    crumb: Mutex<Option<String>>,
}

impl YahooSession {
    /// Cached crumb, or a fresh one after the cookie handshake
    pub(crate) async fn crumb(&self, http: &dyn HttpClient, timeout: Duration) -> Result<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // fc.yahoo.com answers 404 but still sets the session cookie
        let cookie_request = HttpRequest::get(COOKIE_URL)
            .with_header("referer", REFERER)
            .with_timeout(timeout);
        http.execute(cookie_request).await?;

        for url in CRUMB_URLS {
            let request = HttpRequest::get(*url)
                .with_header("referer", REFERER)
                .with_timeout(timeout);
            match http.execute(request).await {
                Ok(response) if response.is_success() => {
                    if let Some(crumb) = valid_crumb(&response.body) {
                        debug!(adapter = "PriceAdapter", "obtained Yahoo crumb");
                        *cached = Some(crumb.to_string());
                        return Ok(crumb.to_string());
                    }
                }
                Ok(response) => debug!(url, status = response.status, "crumb endpoint refused"),
                Err(err) => debug!(url, "crumb endpoint failed: {}", err),
            }
        }

        Err(AdapterError::connectivity(
            ConnectivityKind::Request,
            "failed to fetch Yahoo crumb from all endpoints",
        ))
    }

    /// Forget the crumb so the next call repeats the handshake
    pub(crate) async fn invalidate(&self) {
        *self.crumb.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_crumb() {
        assert_eq!(valid_crumb(" aB3.xYz/9 \n"), Some("aB3.xYz/9"));
        assert_eq!(valid_crumb(""), None);
        assert_eq!(valid_crumb("Too Many Requests"), None);
        assert_eq!(valid_crumb("<!DOCTYPE html><html></html>"), None);
    }
}
