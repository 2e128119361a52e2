//! Cursor-based pagination over the launch catalog.
//!
//! The pager is an explicit state machine owned by a single control flow
//! (one listing screen). Page requests complete on the runtime and are
//! handed back to the owner through the `deliver` callback; the owner then
//! feeds them to [`LaunchListPager::apply`], which discards any completion
//! that is no longer the active request.

use std::sync::Arc;

use rocket_domain::{CachePolicy, Launch, LaunchConnection, LaunchListData, LaunchListQuery, RequestId};
use thiserror::Error;

use crate::session::{Completion, RequestHandle, SessionClient};

/// Pagination state for one listing session.
#[derive(Debug, Clone, Default)]
pub struct PagerState {
    /// Every launch received so far, in arrival order. Only ever appended to.
    pub accumulated: Vec<Launch>,
    /// The most recently received page.
    pub last_connection: Option<LaunchConnection>,
    /// The page request in flight, if any.
    pub active_request: Option<RequestHandle>,
}

impl PagerState {
    /// Returns true while a page request is in flight.
    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.active_request.is_some()
    }

    /// Returns false once the server reported the last page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.last_connection.as_ref().is_none_or(|c| c.has_more)
    }
}

/// A finished page request, addressed to the pager that issued it.
#[derive(Debug)]
pub struct PageCompletion {
    /// Id of the request this completion belongs to.
    pub request_id: RequestId,
    /// What the session client delivered.
    pub result: Completion<LaunchListData>,
}

/// What `request_more` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMore {
    /// A page request was issued.
    Issued(RequestHandle),
    /// A request is already in flight; nothing was issued.
    AlreadyFetching,
    /// The last page was already received; nothing was issued.
    Exhausted,
}

/// Why a page could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PagerError {
    /// The server returned errors and no page.
    #[error("GraphQL Error(s): {}", .0.join("\n"))]
    GraphQL(Vec<String>),

    /// The request failed before a response was obtained.
    #[error("Network Error: {0}")]
    Transport(String),

    /// The server returned neither a page nor errors.
    #[error("The server returned no launches")]
    MissingData,
}

impl PagerError {
    /// Human-readable messages for display.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::GraphQL(messages) => messages.clone(),
            Self::Transport(message) => vec![message.clone()],
            Self::MissingData => vec![self.to_string()],
        }
    }
}

/// Effect of applying a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageUpdate {
    /// The completion was not for the active request and was ignored.
    Stale,
    /// A page was appended. `errors` holds any GraphQL errors that came with it.
    Loaded {
        /// Number of launches appended.
        appended: usize,
        /// Whether another page can be requested.
        has_more: bool,
        /// GraphQL error messages delivered alongside the page.
        errors: Vec<String>,
    },
    /// No page was appended; state is unchanged apart from the cleared request.
    Failed(PagerError),
}

/// Accumulates launch pages across successive fetches.
pub struct LaunchListPager {
    client: Arc<SessionClient>,
    state: PagerState,
}

impl LaunchListPager {
    /// Creates an idle pager with no pages loaded.
    #[must_use]
    pub fn new(client: Arc<SessionClient>) -> Self {
        Self {
            client,
            state: PagerState::default(),
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub const fn state(&self) -> &PagerState {
        &self.state
    }

    /// Launches loaded so far.
    #[must_use]
    pub fn launches(&self) -> &[Launch] {
        &self.state.accumulated
    }

    /// Requests the next page, unless one is in flight or none remain.
    ///
    /// `deliver` is called once, off the caller's control flow, with the
    /// completion to pass back to [`apply`](Self::apply).
    pub fn request_more<F>(&mut self, deliver: F) -> RequestMore
    where
        F: FnOnce(PageCompletion) + Send + 'static,
    {
        if self.state.is_fetching() {
            return RequestMore::AlreadyFetching;
        }
        if !self.state.has_more() {
            return RequestMore::Exhausted;
        }

        let query = LaunchListQuery {
            cursor: self
                .state
                .last_connection
                .as_ref()
                .and_then(|c| c.cursor.clone()),
        };
        tracing::debug!(cursor = ?query.cursor, "requesting launch page");

        let handle = self.client.fetch_tagged(
            &query,
            CachePolicy::ReturnCacheDataElseFetch,
            move |request_id, result| deliver(PageCompletion { request_id, result }),
        );

        self.state.active_request = Some(handle.clone());
        RequestMore::Issued(handle)
    }

    /// Applies a completion delivered through `request_more`.
    ///
    /// Completions for anything but the active request are ignored.
    pub fn apply(&mut self, completion: PageCompletion) -> PageUpdate {
        let is_current = self
            .state
            .active_request
            .as_ref()
            .is_some_and(|active| active.id() == completion.request_id);
        if !is_current {
            tracing::debug!(request_id = %completion.request_id, "ignoring stale page");
            return PageUpdate::Stale;
        }
        self.state.active_request = None;

        match completion.result {
            Ok(result) => {
                let errors = result.error_messages();
                match result.data {
                    Some(data) => {
                        let connection = data.launches;
                        let appended = connection.items.len();
                        let has_more = connection.has_more;
                        self.state
                            .accumulated
                            .extend(connection.items.iter().cloned());
                        self.state.last_connection = Some(connection);
                        tracing::debug!(appended, has_more, "launch page loaded");
                        PageUpdate::Loaded {
                            appended,
                            has_more,
                            errors,
                        }
                    }
                    None if errors.is_empty() => PageUpdate::Failed(PagerError::MissingData),
                    None => PageUpdate::Failed(PagerError::GraphQL(errors)),
                }
            }
            Err(error) => {
                tracing::warn!(%error, "launch page failed");
                PageUpdate::Failed(PagerError::Transport(error.to_string()))
            }
        }
    }

    /// Cancels the in-flight request, if any, returning the pager to idle.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.state.active_request.take() {
            handle.cancel();
        }
    }
}

impl Drop for LaunchListPager {
    fn drop(&mut self) {
        self.cancel();
    }
}
