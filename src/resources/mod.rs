//! Endpoint-specific clients scoped beneath the API root.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each client owns a [`Dispatcher`] re-rooted at its sub-resource
//! (`admin/`, `student/`, `examination/`) and only names operations. All
//! request and response rules live in `dispatch`.

pub mod admin;
pub mod examination;
pub mod student;

use url::Url;

use crate::channel::LiveChannel;
use crate::dispatch::Dispatcher;
use crate::error::ClientError;

pub use admin::AdminClient;
pub use examination::ExaminationClient;
pub use student::StudentClient;

/// Capability shared by every client: it can dispatch typed requests.
pub trait Resource {
    fn dispatcher(&self) -> &Dispatcher;

    /// Base URL this client resolves paths against.
    fn base_url(&self) -> Option<&Url> {
        self.dispatcher().base_url()
    }

    /// Live channel handle for `path`, relative to this client's base.
    ///
    /// # Errors
    ///
    /// Returns an error when unconfigured or when `path` cannot be resolved.
    fn websocket(&self, path: &str) -> Result<LiveChannel, ClientError> {
        self.dispatcher().websocket(path)
    }
}
