//! `examination/` endpoints.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::Resource;
use crate::dispatch::Dispatcher;
use crate::error::ClientError;
use crate::types::Examination;

pub const EXAMINATION_SEGMENT: &str = "examination/";
pub const FIRST_PAGE: u32 = 1;

#[derive(Serialize)]
struct PageQuery {
    page: u32,
}

#[derive(Clone, Debug)]
pub struct ExaminationClient {
    dispatch: Dispatcher,
}

impl ExaminationClient {
    /// # Errors
    ///
    /// Returns an error if the `examination/` segment cannot be resolved.
    pub fn new(parent: &Dispatcher) -> Result<Self, ClientError> {
        Ok(Self { dispatch: parent.scoped(EXAMINATION_SEGMENT)? })
    }

    /// `GET examination/list?page=N`. The page shape belongs to the backend
    /// and is passed through unvalidated.
    ///
    /// # Errors
    ///
    /// See [`crate::dispatch::Dispatcher::send`].
    pub async fn list(&self, page: u32) -> Result<Value, ClientError> {
        self.dispatch
            .fetch("list", Method::GET, Some(&PageQuery { page }))
            .await
    }

    /// `GET examination/{id}`. Ids are backend-issued and path-safe.
    ///
    /// # Errors
    ///
    /// A missing examination surfaces as a 404 [`ClientError::RequestFailed`].
    pub async fn get(&self, id: &str) -> Result<Examination, ClientError> {
        self.dispatch.get(id).await
    }

    /// `DELETE examination/{id}`.
    ///
    /// # Errors
    ///
    /// See [`crate::dispatch::Dispatcher::send`].
    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.dispatch
            .send::<Value>(id, Method::DELETE, None)
            .await
            .map(|_| ())
    }
}

impl Resource for ExaminationClient {
    fn dispatcher(&self) -> &Dispatcher {
        &self.dispatch
    }
}

#[cfg(test)]
#[path = "examination_test.rs"]
mod tests;
