//! `admin/` endpoints.

use reqwest::Method;
use serde_json::Value;

use super::Resource;
use crate::dispatch::Dispatcher;
use crate::error::ClientError;
use crate::types::{Credentials, ProfileUpdate, UserInfo};

pub const ADMIN_SEGMENT: &str = "admin/";

#[derive(Clone, Debug)]
pub struct AdminClient {
    dispatch: Dispatcher,
}

impl AdminClient {
    /// # Errors
    ///
    /// Returns an error if the `admin/` segment cannot be resolved.
    pub fn new(parent: &Dispatcher) -> Result<Self, ClientError> {
        Ok(Self { dispatch: parent.scoped(ADMIN_SEGMENT)? })
    }

    /// `POST admin/login`. On success the backend sets the session cookie
    /// and answers 204; any payload is discarded.
    ///
    /// # Errors
    ///
    /// Invalid credentials surface as [`ClientError::RequestFailed`].
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let credentials = Credentials { username, password };
        self.dispatch
            .send("login", Method::POST, Some(&credentials))
            .await
            .map(|_| ())
    }

    /// `GET admin/info` for the logged-in admin.
    ///
    /// # Errors
    ///
    /// Fails with the backend's error (typically 401) when not logged in as
    /// an admin.
    pub async fn info(&self) -> Result<UserInfo, ClientError> {
        self.dispatch.get("info").await
    }

    /// `PUT admin/info`; returns the updated profile.
    ///
    /// # Errors
    ///
    /// Validation failures surface as [`ClientError::RequestFailed`].
    pub async fn update(&self, update: &ProfileUpdate) -> Result<UserInfo, ClientError> {
        self.dispatch.fetch("info", Method::PUT, Some(update)).await
    }

    /// `DELETE admin/info`: removes the logged-in admin account.
    ///
    /// # Errors
    ///
    /// See [`crate::dispatch::Dispatcher::send`].
    pub async fn delete(&self) -> Result<(), ClientError> {
        self.dispatch
            .send::<Value>("info", Method::DELETE, None)
            .await
            .map(|_| ())
    }
}

impl Resource for AdminClient {
    fn dispatcher(&self) -> &Dispatcher {
        &self.dispatch
    }
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
