//! Cancellable institution search.
//!
//! A search runs as its own tokio task so a type-ahead caller can drop
//! stale queries. Dropping the handle detaches the task; call `cancel()`
//! to stop it.

use crate::{
    error::{PlaidError, PlaidResult},
    model::SearchInstitution,
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

pub type SearchResult = PlaidResult<Vec<SearchInstitution>>;

pub struct SearchHandle {
    task: JoinHandle<SearchResult>,
}

impl SearchHandle {
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn<F>(search: F) -> Self
    where
        F: Future<Output = SearchResult> + Send + 'static,
    {
        Self { task: tokio::spawn(search) }
    }

    /// Abort the in-flight search. Awaiting the handle afterwards yields
    /// `PlaidError::Cancelled` unless the search had already finished.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Future for SearchHandle {
    type Output = SearchResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.task).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(PlaidError::Cancelled),
            Err(e) => Err(PlaidError::Unknown(anyhow::anyhow!("search task failed: {e}"))),
        })
    }
}

impl std::fmt::Debug for SearchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHandle")
            .field("finished", &self.task.is_finished())
            .finish()
    }
}
