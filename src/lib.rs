//! # skul
//!
//! Typed client for the skul examination backend: authenticates admins and
//! students, fetches profiles and examinations, derives live channel
//! endpoints, and keeps a reactive "who is logged in" session for UI layers.
//!
//! ```no_run
//! # async fn demo() -> Result<(), skul::ClientError> {
//! let config = skul::SkulConfig::from_env()?;
//! let skul = skul::Skul::start(&config)?;
//! skul.client().admin().login("root", "password123").await?;
//! skul.refresh().await;
//! assert!(skul.session().admin().get());
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod client;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod resources;
pub mod session;
pub mod types;

#[cfg(test)]
mod test_support;

pub use channel::{LiveChannel, LiveConnection};
pub use client::SkulClient;
pub use config::{HttpTimeouts, SkulConfig};
pub use context::Skul;
pub use dispatch::{Dispatcher, Reply};
pub use error::ClientError;
pub use resources::{AdminClient, ExaminationClient, Resource, StudentClient};
pub use session::{IdentitySource, Projection, RefreshReport, Session, SessionSnapshot};
pub use types::{Examination, Role, UserInfo};
