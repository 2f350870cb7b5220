//! Aggregate client: the single entry point the application depends on.

use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::config::{SkulConfig, build_http_client};
use crate::dispatch::Dispatcher;
use crate::error::ClientError;
use crate::resources::{AdminClient, ExaminationClient, Resource, StudentClient};
use crate::session::IdentitySource;
use crate::types::UserInfo;

/// Logout is served beside the API root, not beneath it.
const LOGOUT_PATH: &str = "../logout";

/// Root client. Owns one resource client per sub-resource, all sharing a
/// single HTTP client and therefore a single session cookie.
#[derive(Clone, Debug)]
pub struct SkulClient {
    dispatch: Dispatcher,
    admin: AdminClient,
    student: StudentClient,
    examination: ExaminationClient,
}

impl SkulClient {
    /// Build a client rooted at `api_root`. The root is normalised to end in
    /// `/` so `https://h/api` and `https://h/api/` behave the same. `None`
    /// yields a client whose every call fails with
    /// [`ClientError::MissingBaseUrl`].
    ///
    /// # Errors
    ///
    /// Returns an error if a sub-resource segment cannot be resolved.
    pub fn new(http: reqwest::Client, api_root: Option<Url>) -> Result<Self, ClientError> {
        let dispatch = Dispatcher::new(http, api_root);
        Ok(Self {
            admin: AdminClient::new(&dispatch)?,
            student: StudentClient::new(&dispatch)?,
            examination: ExaminationClient::new(&dispatch)?,
            dispatch,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &SkulConfig) -> Result<Self, ClientError> {
        let http = build_http_client(&config.timeouts)?;
        Self::new(http, config.api_root.clone())
    }

    #[must_use]
    pub fn admin(&self) -> &AdminClient {
        &self.admin
    }

    #[must_use]
    pub fn student(&self) -> &StudentClient {
        &self.student
    }

    #[must_use]
    pub fn examination(&self) -> &ExaminationClient {
        &self.examination
    }

    /// `GET health`.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::send`].
    pub async fn health(&self) -> Result<String, ClientError> {
        self.dispatch.get("health").await
    }

    /// `GET /logout`: clears the session cookie.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::send`].
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.dispatch
            .send::<Value>(LOGOUT_PATH, Method::GET, None)
            .await
            .map(|_| ())
    }
}

impl Resource for SkulClient {
    fn dispatcher(&self) -> &Dispatcher {
        &self.dispatch
    }
}

#[async_trait::async_trait]
impl IdentitySource for SkulClient {
    async fn admin_info(&self) -> Result<UserInfo, ClientError> {
        self.admin.info().await
    }

    async fn student_info(&self) -> Result<UserInfo, ClientError> {
        self.student.info().await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
