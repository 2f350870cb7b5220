//! `student/` endpoints.

use reqwest::Method;

use super::Resource;
use crate::dispatch::Dispatcher;
use crate::error::ClientError;
use crate::types::{Credentials, UserInfo};

pub const STUDENT_SEGMENT: &str = "student/";

#[derive(Clone, Debug)]
pub struct StudentClient {
    dispatch: Dispatcher,
}

impl StudentClient {
    /// # Errors
    ///
    /// Returns an error if the `student/` segment cannot be resolved.
    pub fn new(parent: &Dispatcher) -> Result<Self, ClientError> {
        Ok(Self { dispatch: parent.scoped(STUDENT_SEGMENT)? })
    }

    /// `POST student/login`.
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

    /// `GET student/info` for the logged-in student.
    ///
    /// # Errors
    ///
    /// Fails with the backend's error when not logged in as a student.
    pub async fn info(&self) -> Result<UserInfo, ClientError> {
        self.dispatch.get("info").await
    }
}

impl Resource for StudentClient {
    fn dispatcher(&self) -> &Dispatcher {
        &self.dispatch
    }
}

#[cfg(test)]
#[path = "student_test.rs"]
mod tests;
