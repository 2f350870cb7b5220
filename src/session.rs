//! Reactive session state: who is logged in, and whether we know yet.
//!
//! DESIGN
//! ======
//! `Session` is an injectable container over a `tokio::sync::watch`
//! channel. Observers read snapshots or derived role projections and never
//! write; the only write path is [`Session::refresh`].
//!
//! REFRESH
//! =======
//! The admin and student lookups run concurrently through [`settle_all`],
//! which yields outcomes in completion order and never short-circuits. Each
//! success is written as it settles, so when both succeed the later one is
//! what remains. Failures are logged and dropped. `loading` is cleared once
//! both have settled.

use std::sync::Arc;

use futures_util::stream::{FuturesUnordered, Stream, StreamExt};
use tokio::sync::watch;

use crate::error::ClientError;
use crate::types::{Role, UserInfo};

/// Source of the two "who am I" lookups a refresh races.
#[async_trait::async_trait]
pub trait IdentitySource: Send + Sync {
    async fn admin_info(&self) -> Result<UserInfo, ClientError>;
    async fn student_info(&self) -> Result<UserInfo, ClientError>;
}

/// Point-in-time view of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<UserInfo>,
    /// True until the first refresh has settled.
    pub loading: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self { user: None, loading: true }
    }
}

impl SessionSnapshot {
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(UserInfo::role)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    #[must_use]
    pub fn is_student(&self) -> bool {
        self.role() == Some(Role::Student)
    }

    /// Loading finished and nobody is logged in.
    #[must_use]
    pub fn is_logged_out(&self) -> bool {
        !self.loading && self.user.is_none()
    }
}

/// One task's result from [`settle_all`], tagged with its label.
#[derive(Debug)]
pub struct Settled<L, T, E = ClientError> {
    pub label: L,
    pub outcome: Result<T, E>,
}

/// Drive every task concurrently and yield each outcome as it completes.
/// Failures do not cancel the remaining tasks.
pub fn settle_all<L, T, E, F>(tasks: impl IntoIterator<Item = (L, F)>) -> impl Stream<Item = Settled<L, T, E>> + Unpin
where
    F: Future<Output = Result<T, E>>,
{
    tasks
        .into_iter()
        .map(|(label, task)| async move { Settled { label, outcome: task.await } })
        .collect::<FuturesUnordered<_>>()
}

/// What a refresh observed, in completion order.
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub settled: Vec<Settled<Role, UserInfo>>,
}

impl RefreshReport {
    /// The user written last, i.e. the latest successful lookup.
    #[must_use]
    pub fn user(&self) -> Option<&UserInfo> {
        self.settled.iter().rev().find_map(|s| s.outcome.as_ref().ok())
    }

    /// Lookups that failed and were swallowed.
    pub fn failures(&self) -> impl Iterator<Item = (Role, &ClientError)> {
        self.settled
            .iter()
            .filter_map(|s| s.outcome.as_ref().err().map(|e| (s.label, e)))
    }
}

/// A boolean recomputed from the session on every read.
#[derive(Clone, Debug)]
pub struct Projection {
    rx: watch::Receiver<SessionSnapshot>,
    derive: fn(&SessionSnapshot) -> bool,
}

impl Projection {
    #[must_use]
    pub fn get(&self) -> bool {
        (self.derive)(&*self.rx.borrow())
    }

    /// Wait for the next session change and return the recomputed value.
    /// `None` once the session is gone.
    pub async fn changed(&mut self) -> Option<bool> {
        self.rx.changed().await.ok()?;
        Some(self.get())
    }
}

/// Shared session container. Clones observe and refresh the same state.
#[derive(Clone, Debug)]
pub struct Session {
    state: Arc<watch::Sender<SessionSnapshot>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Fresh session: no user, loading.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self { state: Arc::new(state) }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserInfo> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// True while the current user is an admin.
    #[must_use]
    pub fn admin(&self) -> Projection {
        Projection { rx: self.subscribe(), derive: SessionSnapshot::is_admin }
    }

    /// True while the current user is a student.
    #[must_use]
    pub fn student(&self) -> Projection {
        Projection { rx: self.subscribe(), derive: SessionSnapshot::is_student }
    }

    /// Resolve once loading has finished.
    pub async fn wait_loaded(&self) -> SessionSnapshot {
        let mut rx = self.subscribe();
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if !snapshot.loading {
                    return snapshot.clone();
                }
            }
            if rx.changed().await.is_err() {
                return self.snapshot();
            }
        }
    }

    /// Race the admin and student lookups, write each success as it
    /// settles, then clear `loading`. Never fails; if both lookups fail the
    /// user is left as it was.
    pub async fn refresh<S>(&self, source: &S) -> RefreshReport
    where
        S: IdentitySource + ?Sized,
    {
        let lookups = [(Role::Admin, source.admin_info()), (Role::Student, source.student_info())];
        let mut pending = settle_all(lookups);
        let mut report = RefreshReport::default();

        while let Some(done) = pending.next().await {
            match &done.outcome {
                Ok(user) => {
                    tracing::debug!(role = %done.label, user_id = %user.id, "identity lookup succeeded");
                    let user = user.clone();
                    self.state.send_modify(|s| s.user = Some(user));
                }
                Err(error) => {
                    tracing::debug!(role = %done.label, %error, "identity lookup failed");
                }
            }
            report.settled.push(done);
        }

        self.state.send_modify(|s| s.loading = false);
        report
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
