//! Composition root: one aggregate client plus one session.
//!
//! SYSTEM CONTEXT
//! ==============
//! Interactive hosts start with `auto_refresh` on, which spawns exactly one
//! background refresh so observers learn who is logged in without asking.
//! Build-time and scripted hosts turn it off and refresh on demand.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::client::SkulClient;
use crate::config::SkulConfig;
use crate::error::ClientError;
use crate::session::{RefreshReport, Session, SessionSnapshot};

pub struct Skul {
    client: Arc<SkulClient>,
    session: Session,
    startup_refresh: Option<JoinHandle<RefreshReport>>,
}

impl Skul {
    /// Build the client and session from `config`. The startup refresh is
    /// skipped when no tokio runtime is running.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn start(config: &SkulConfig) -> Result<Self, ClientError> {
        let client = SkulClient::from_config(config)?;
        Ok(Self::with_client(client, Session::new(), config.auto_refresh))
    }

    /// Assemble from parts, e.g. to share one session between hosts.
    #[must_use]
    pub fn with_client(client: SkulClient, session: Session, auto_refresh: bool) -> Self {
        let client = Arc::new(client);
        let startup_refresh = if auto_refresh {
            spawn_startup_refresh(&client, &session)
        } else {
            None
        };
        Self { client, session, startup_refresh }
    }

    #[must_use]
    pub fn client(&self) -> &SkulClient {
        &self.client
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Refresh the session on demand, e.g. right after a login.
    pub async fn refresh(&self) -> RefreshReport {
        self.session.refresh(self.client.as_ref()).await
    }

    /// Wait for the startup refresh, if one was spawned. Returns `None` when
    /// auto refresh was off or the report was already taken.
    pub async fn startup_refresh(&mut self) -> Option<RefreshReport> {
        let handle = self.startup_refresh.take()?;
        match handle.await {
            Ok(report) => Some(report),
            Err(error) => {
                tracing::warn!(%error, "startup refresh task failed");
                None
            }
        }
    }
}

fn spawn_startup_refresh(client: &Arc<SkulClient>, session: &Session) -> Option<JoinHandle<RefreshReport>> {
    let Ok(runtime) = Handle::try_current() else {
        tracing::warn!("no tokio runtime; skipping startup refresh");
        return None;
    };
    let client = Arc::clone(client);
    let session = session.clone();
    Some(runtime.spawn(async move { session.refresh(client.as_ref()).await }))
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
