//! Client configuration parsed from environment variables.
//!
//! The only parameter the backend contract needs is the API root. Everything
//! else tunes the shared HTTP client or the composition root.

use std::time::Duration;

use url::Url;

use crate::error::ClientError;

/// Fixed sub-path of the hosting page under which the API is mounted.
pub const API_SUB_PATH: &str = "/api/";

/// Optional deadlines applied to the shared HTTP client. `None` means the
/// library imposes no deadline of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkulConfig {
    /// Root every request path is resolved against. `None` leaves the client
    /// unconfigured and every call fails with [`ClientError::MissingBaseUrl`].
    pub api_root: Option<Url>,
    /// Run one session refresh at startup (interactive hosts only).
    pub auto_refresh: bool,
    pub timeouts: HttpTimeouts,
}

impl Default for SkulConfig {
    fn default() -> Self {
        Self { api_root: None, auto_refresh: true, timeouts: HttpTimeouts::default() }
    }
}

impl SkulConfig {
    /// Config rooted at the API of the given hosting page.
    ///
    /// # Errors
    ///
    /// Returns an error if `/api/` cannot be resolved against `page`.
    pub fn for_page(page: &Url) -> Result<Self, ClientError> {
        Ok(Self { api_root: Some(api_root_from_page(page)?), ..Self::default() })
    }

    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `SKUL_API_ROOT`: explicit API root, wins over `SKUL_PAGE_URL`
    /// - `SKUL_PAGE_URL`: hosting page URL; the API lives at its `/api/`
    /// - `SKUL_AUTO_REFRESH`: refresh the session at startup, default true
    /// - `SKUL_REQUEST_TIMEOUT_SECS`: no deadline when absent
    /// - `SKUL_CONNECT_TIMEOUT_SECS`: no deadline when absent
    ///
    /// # Errors
    ///
    /// Returns an error if a URL variable is set but unparsable.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_root = match (env_non_empty("SKUL_API_ROOT"), env_non_empty("SKUL_PAGE_URL")) {
            (Some(root), _) => Some(Url::parse(&root)?),
            (None, Some(page)) => Some(api_root_from_page(&Url::parse(&page)?)?),
            (None, None) => None,
        };
        let auto_refresh = env_bool("SKUL_AUTO_REFRESH").unwrap_or(true);
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64("SKUL_REQUEST_TIMEOUT_SECS"),
            connect_secs: env_parse_u64("SKUL_CONNECT_TIMEOUT_SECS"),
        };
        Ok(Self { api_root, auto_refresh, timeouts })
    }
}

/// Resolve the API root beneath a hosting page URL.
///
/// # Errors
///
/// Returns an error if the page URL cannot be a base (e.g. `data:` URLs).
pub fn api_root_from_page(page: &Url) -> Result<Url, ClientError> {
    Ok(page.join(API_SUB_PATH)?)
}

/// Force the path of `url` to end in exactly one `/`, so relative segments
/// land beneath it instead of replacing its last component.
#[must_use]
pub fn normalize_root(mut url: Url) -> Url {
    let trimmed = url.path().trim_end_matches('/');
    let path = format!("{trimmed}/");
    url.set_path(&path);
    url
}

/// Build the HTTP client shared by every resource client. The backend keeps
/// the session in a cookie, so the client carries a cookie store.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_http_client(timeouts: &HttpTimeouts) -> Result<reqwest::Client, ClientError> {
    let mut builder = reqwest::Client::builder().cookie_store(true);
    if let Some(secs) = timeouts.request_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = timeouts.connect_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<u64>().ok())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
