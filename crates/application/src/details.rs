//! Launch detail loading with cache-policy selection.

use std::sync::Arc;

use rocket_domain::{
    CachePolicy, LaunchDetails, LaunchDetailsData, LaunchDetailsQuery, LaunchId, RequestId,
};

use crate::session::{Completion, RequestHandle, SessionClient};

/// A finished detail request.
#[derive(Debug)]
pub struct DetailsCompletion {
    /// Id of the request this completion belongs to.
    pub request_id: RequestId,
    /// What the session client delivered.
    pub result: Completion<LaunchDetailsData>,
}

/// Effect of applying a detail completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsUpdate {
    /// The completion did not belong to this loader and was ignored.
    Stale,
    /// The displayed launch was replaced. `errors` holds accompanying GraphQL errors.
    Updated {
        /// GraphQL error messages delivered alongside the launch.
        errors: Vec<String>,
    },
    /// Nothing was replaced.
    Failed {
        /// Human-readable reasons.
        messages: Vec<String>,
    },
}

/// Loads and holds the details of one launch.
pub struct LaunchDetailsLoader {
    client: Arc<SessionClient>,
    launch_id: LaunchId,
    launch: Option<LaunchDetails>,
    active_request: Option<RequestHandle>,
}

impl LaunchDetailsLoader {
    /// Creates a loader for `launch_id`. Nothing is fetched until `load`.
    #[must_use]
    pub const fn new(client: Arc<SessionClient>, launch_id: LaunchId) -> Self {
        Self {
            client,
            launch_id,
            launch: None,
            active_request: None,
        }
    }

    /// The launch this loader is bound to.
    #[must_use]
    pub const fn launch_id(&self) -> &LaunchId {
        &self.launch_id
    }

    /// The launch currently displayed, if loaded.
    #[must_use]
    pub const fn launch(&self) -> Option<&LaunchDetails> {
        self.launch.as_ref()
    }

    /// Returns true while a detail request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.active_request.is_some()
    }

    /// Loads the launch details.
    ///
    /// Without `force_reload`, this is a no-op once the bound launch is
    /// displayed, and the cache may answer. With it, the cache is bypassed
    /// and any request already in flight is superseded.
    pub fn load<F>(&mut self, force_reload: bool, deliver: F) -> Option<RequestHandle>
    where
        F: FnOnce(DetailsCompletion) + Send + 'static,
    {
        let displayed = self.launch.as_ref().is_some_and(|l| l.id == self.launch_id);
        if !force_reload && (displayed || self.is_loading()) {
            return None;
        }
        if let Some(previous) = self.active_request.take() {
            previous.cancel();
        }

        let handle = self.client.fetch_tagged(
            &LaunchDetailsQuery {
                id: self.launch_id.clone(),
            },
            CachePolicy::for_reload(force_reload),
            move |request_id, result| deliver(DetailsCompletion { request_id, result }),
        );
        self.active_request = Some(handle.clone());
        Some(handle)
    }

    /// Applies a completion delivered through `load`.
    pub fn apply(&mut self, completion: DetailsCompletion) -> DetailsUpdate {
        let is_current = self
            .active_request
            .as_ref()
            .is_some_and(|active| active.id() == completion.request_id);
        if !is_current {
            return DetailsUpdate::Stale;
        }
        self.active_request = None;
        self.absorb(completion.result)
    }

    /// Applies a detail result obtained elsewhere, e.g. the forced refresh
    /// issued after a booking. Results for another launch are ignored.
    pub fn absorb(&mut self, result: Completion<LaunchDetailsData>) -> DetailsUpdate {
        match result {
            Ok(result) => {
                let errors = result.error_messages();
                match result.data.and_then(|d| d.launch) {
                    Some(launch) if launch.id == self.launch_id => {
                        self.launch = Some(launch);
                        DetailsUpdate::Updated { errors }
                    }
                    Some(_) => DetailsUpdate::Stale,
                    None => {
                        tracing::warn!(launch_id = %self.launch_id, ?errors, "launch details unavailable");
                        DetailsUpdate::Failed { messages: errors }
                    }
                }
            }
            Err(error) => {
                tracing::warn!(launch_id = %self.launch_id, %error, "launch details failed");
                DetailsUpdate::Failed {
                    messages: vec![error.to_string()],
                }
            }
        }
    }
}
