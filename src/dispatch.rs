//! Request dispatcher shared by every resource client.
//!
//! DESIGN
//! ======
//! A `Dispatcher` is a capability value: a shared `reqwest::Client` plus the
//! base URL it resolves paths against. Resource clients hold one instead of
//! inheriting request logic, and scoping a client beneath a sub-resource is
//! just `scoped("admin/")`.
//!
//! RESPONSE HANDLING
//! =================
//! 429 wins over everything, 204 skips body parsing, anything else must be
//! a JSON envelope: `{ "data": .. }` on success, `{ "message": .. }` on
//! failure.

use reqwest::header::USER_AGENT;
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::channel::LiveChannel;
use crate::config::normalize_root;
use crate::error::ClientError;

/// Identifying `user-agent` sent with every request.
pub const USER_AGENT_VALUE: &str = "skul-client";

/// Outcome of a successful dispatch, before decoding into a typed value.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    /// 204; the body was never read.
    NoContent,
    /// The `data` member of a 2xx envelope (`null` when missing).
    Data(Value),
}

impl Reply {
    #[must_use]
    pub fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }

    /// Payload as JSON, with `NoContent` mapped to `null`.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::NoContent => Value::Null,
            Self::Data(value) => value,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Dispatcher {
    http: reqwest::Client,
    base_url: Option<Url>,
}

impl Dispatcher {
    /// The base is normalised to end in `/`, so `https://h/api` and
    /// `https://h/api/` scope children identically.
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: Option<Url>) -> Self {
        Self { http, base_url: base_url.map(normalize_root) }
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Dispatcher rooted at `segment` resolved against this one's base. The
    /// HTTP client (and its cookie store) is shared. An unconfigured
    /// dispatcher stays unconfigured.
    ///
    /// # Errors
    ///
    /// Returns an error if `segment` cannot be resolved against the base.
    pub fn scoped(&self, segment: &str) -> Result<Self, ClientError> {
        let base_url = self.base_url.as_ref().map(|base| base.join(segment)).transpose()?;
        Ok(Self { http: self.http.clone(), base_url })
    }

    /// Send one request and normalise the response.
    ///
    /// With `GET`, the body's members become query parameters and no body is
    /// sent. With any other method the body is sent as JSON. A JSON `null`
    /// body counts as no body.
    ///
    /// # Errors
    ///
    /// - [`ClientError::MissingBaseUrl`] before any I/O when unconfigured
    /// - [`ClientError::RateLimited`] for 429
    /// - [`ClientError::RequestFailed`] for other non-2xx statuses
    /// - [`ClientError::Transport`] / [`ClientError::Decode`] unchanged
    pub async fn send<B>(&self, path: &str, method: Method, body: Option<&B>) -> Result<Reply, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let base = self.base_url.as_ref().ok_or(ClientError::MissingBaseUrl)?;
        let mut url = base.join(path)?;
        let body = body
            .map(serde_json::to_value)
            .transpose()?
            .filter(|value| !value.is_null());

        let json_body = match body {
            Some(params) if method == Method::GET => {
                set_query_params(&mut url, &params);
                None
            }
            other => other,
        };

        tracing::debug!(%method, %url, "dispatching request");
        let mut request = self
            .http
            .request(method, url)
            .header(USER_AGENT, USER_AGENT_VALUE);
        if let Some(json) = &json_body {
            request = request.json(json);
        }

        let response = request.send().await?;
        read_reply(response).await
    }

    /// [`Dispatcher::send`] followed by decoding the payload into `T`.
    /// A 204 decodes from `null`, so `T = ()` or `Option<_>` accept it.
    ///
    /// # Errors
    ///
    /// Everything [`Dispatcher::send`] returns, plus [`ClientError::Decode`]
    /// when the payload does not match `T`.
    pub async fn fetch<T, B>(&self, path: &str, method: Method, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let reply = self.send(path, method, body).await?;
        Ok(serde_json::from_value(reply.into_value())?)
    }

    /// Body-less `GET` shorthand for [`Dispatcher::fetch`].
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::fetch`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.fetch::<T, Value>(path, Method::GET, None).await
    }

    /// Live channel handle for `path`. Nothing is connected yet.
    ///
    /// # Errors
    ///
    /// Returns an error when unconfigured or when `path` cannot be resolved.
    pub fn websocket(&self, path: &str) -> Result<LiveChannel, ClientError> {
        let base = self.base_url.as_ref().ok_or(ClientError::MissingBaseUrl)?;
        Ok(LiveChannel::new(websocket_url(base, path)?))
    }
}

/// Resolve `path` against `base` and swap the scheme to its WebSocket
/// counterpart: `http` becomes `ws`, anything else `wss`.
///
/// # Errors
///
/// Returns an error if the path or rewritten URL does not parse.
pub fn websocket_url(base: &Url, path: &str) -> Result<Url, ClientError> {
    let mut url = base.join(path)?;
    let scheme = if url.scheme() == "http" { "ws" } else { "wss" };
    if url.set_scheme(scheme).is_ok() {
        return Ok(url);
    }
    // `set_scheme` refuses special/non-special switches; reparse instead.
    let rest = url.as_str().strip_prefix(url.scheme()).unwrap_or_default();
    Ok(Url::parse(&format!("{scheme}{rest}"))?)
}

async fn read_reply(response: Response) -> Result<Reply, ClientError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ClientError::RateLimited { status, headers: response.headers().clone() });
    }
    if status == StatusCode::NO_CONTENT {
        return Ok(Reply::NoContent);
    }

    let headers = response.headers().clone();
    let bytes = response.bytes().await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    if !status.is_success() {
        return Err(ClientError::RequestFailed { message: error_message(status, &body), status, headers, body });
    }

    let data = match body {
        Value::Object(mut envelope) => envelope.remove("data").unwrap_or(Value::Null),
        _ => Value::Null,
    };
    Ok(Reply::Data(data))
}

fn error_message(status: StatusCode, body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map_or_else(|| format!("request failed with status {}", status.as_u16()), ToOwned::to_owned)
}

/// Copy the members of a JSON object into the query string, replacing any
/// existing parameter with the same key.
fn set_query_params(url: &mut Url, params: &Value) {
    let Value::Object(members) = params else {
        tracing::warn!(%url, "ignoring non-object query parameters");
        return;
    };
    for (key, value) in members {
        set_query_param(url, key, &query_text(value));
    }
}

/// Text form of a query value, following browser search-param coercion:
/// arrays join their items with `,` (nulls inside become empty), integral
/// floats drop the fraction, objects collapse to `[object Object]`.
fn query_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.abs() < 1e21 && f.fract().abs() < f64::EPSILON => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| if item.is_null() { String::new() } else { query_text(item) })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (k, v) in &kept {
        pairs.append_pair(k, v);
    }
    pairs.append_pair(key, value);
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod tests;
