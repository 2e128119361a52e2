//! Booking and cancellation of trips.
//!
//! The controller never flips `is_booked` itself. After the server
//! accepts a change it issues a cache-bypassing detail fetch and reports
//! the fresh launch through its event channel.

use std::sync::Arc;

use rocket_domain::{
    BookTripsMutation, CachePolicy, CancelTripMutation, GraphQLResult, LaunchDetails,
    LaunchDetailsData, LaunchDetailsQuery, LaunchId, SESSION_KEY, TripUpdateResponse,
};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::ports::{CredentialStore, TransportError};
use crate::session::{Completion, RequestHandle, SessionClient};

/// Fallback message when a booking succeeds without a server message.
pub const BOOKED_MESSAGE: &str = "Trip booked successfully";
/// Fallback message when a cancellation succeeds without a server message.
pub const CANCELLED_MESSAGE: &str = "Your trip has been officially cancelled.";
/// Fallback message when the server rejects a change without explanation.
pub const UNKNOWN_FAILURE_MESSAGE: &str = "Unknown failure.";

/// Which change was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    /// Book a seat.
    Book,
    /// Cancel a booking.
    Cancel,
}

impl BookingAction {
    const fn success_fallback(self) -> &'static str {
        match self {
            Self::Book => BOOKED_MESSAGE,
            Self::Cancel => CANCELLED_MESSAGE,
        }
    }

    /// Title to show with a failure.
    #[must_use]
    pub const fn failure_title(self) -> &'static str {
        match self {
            Self::Book => "Could not book trip",
            Self::Cancel => "Could not cancel trip",
        }
    }
}

/// A booking change the server accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSuccess {
    /// Server message, or the fallback for the action.
    pub message: String,
    /// The forced detail refresh issued for the launch.
    pub refresh: RequestHandle,
}

/// Why a booking change did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingFailure {
    /// The server reported `success == false`.
    #[error("{message}")]
    Rejected {
        /// Server message, or the generic fallback.
        message: String,
    },

    /// The server returned GraphQL errors and no result.
    #[error("GraphQL Error(s): {}", .0.join("\n"))]
    GraphQL(Vec<String>),

    /// The request failed at the transport level.
    #[error("Network Error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors raised before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// No session token is stored; the user has to log in first.
    #[error("login required")]
    LoginRequired,
}

/// Messages emitted by the controller.
///
/// A `DetailsRefreshed` may arrive before the `Completed` that issued it.
#[derive(Debug)]
pub enum BookingEvent {
    /// A book or cancel request finished.
    Completed {
        /// Launch the change was for.
        launch_id: LaunchId,
        /// Requested change.
        action: BookingAction,
        /// What happened.
        outcome: Result<BookingSuccess, BookingFailure>,
        /// GraphQL errors that accompanied a response carrying a result.
        errors: Vec<String>,
    },
    /// The forced detail refresh after a successful change finished.
    DetailsRefreshed {
        /// Launch that was refreshed.
        launch_id: LaunchId,
        /// The refreshed details.
        result: Completion<LaunchDetailsData>,
    },
}

/// Issues booking and cancellation mutations.
///
/// Repeated calls for the same launch are not de-duplicated; callers
/// should disable their trigger while a request is outstanding.
pub struct BookingController {
    client: Arc<SessionClient>,
    credentials: Arc<dyn CredentialStore>,
    events: mpsc::UnboundedSender<BookingEvent>,
}

impl BookingController {
    /// Creates a controller reporting through `events`.
    #[must_use]
    pub fn new(
        client: Arc<SessionClient>,
        credentials: Arc<dyn CredentialStore>,
        events: mpsc::UnboundedSender<BookingEvent>,
    ) -> Self {
        Self {
            client,
            credentials,
            events,
        }
    }

    /// Returns true if a session token is stored.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.credentials.contains(SESSION_KEY)
    }

    /// Books a seat on `launch_id`.
    pub fn book(&self, launch_id: LaunchId) -> RequestHandle {
        tracing::info!(%launch_id, "booking trip");
        let mutation = BookTripsMutation::single(launch_id.clone());
        let reporter = self.reporter(launch_id, BookingAction::Book);
        self.client
            .perform(&mutation, move |result| {
                reporter.finish(result.map(|r| map_data(r, |d| d.book_trips)));
            })
    }

    /// Cancels the booking on `launch_id`.
    pub fn cancel(&self, launch_id: LaunchId) -> RequestHandle {
        tracing::info!(%launch_id, "cancelling trip");
        let mutation = CancelTripMutation {
            launch_id: launch_id.clone(),
        };
        let reporter = self.reporter(launch_id, BookingAction::Cancel);
        self.client
            .perform(&mutation, move |result| {
                reporter.finish(result.map(|r| map_data(r, |d| d.cancel_trip)));
            })
    }

    /// Books or cancels depending on the launch's current state.
    ///
    /// # Errors
    /// Returns `BookingError::LoginRequired` without issuing a request when
    /// no session token is stored.
    pub fn toggle(&self, launch: &LaunchDetails) -> Result<RequestHandle, BookingError> {
        if !self.is_logged_in() {
            return Err(BookingError::LoginRequired);
        }
        Ok(if launch.is_booked {
            self.cancel(launch.id.clone())
        } else {
            self.book(launch.id.clone())
        })
    }

    fn reporter(&self, launch_id: LaunchId, action: BookingAction) -> Reporter {
        Reporter {
            client: Arc::clone(&self.client),
            events: self.events.clone(),
            launch_id,
            action,
        }
    }
}

fn map_data<A, B>(result: GraphQLResult<A>, f: impl FnOnce(A) -> B) -> GraphQLResult<B> {
    GraphQLResult {
        data: result.data.map(f),
        errors: result.errors,
    }
}

/// Completion side of one booking request.
struct Reporter {
    client: Arc<SessionClient>,
    events: mpsc::UnboundedSender<BookingEvent>,
    launch_id: LaunchId,
    action: BookingAction,
}

impl Reporter {
    fn finish(self, result: Completion<TripUpdateResponse>) {
        let (outcome, errors) = match result {
            Ok(result) => {
                let errors = result.error_messages();
                match result.data {
                    Some(response) if response.success => {
                        let refresh = self.refresh();
                        let message = response
                            .message
                            .unwrap_or_else(|| self.action.success_fallback().to_string());
                        (Ok(BookingSuccess { message, refresh }), errors)
                    }
                    Some(response) => {
                        let message = response
                            .message
                            .unwrap_or_else(|| UNKNOWN_FAILURE_MESSAGE.to_string());
                        (Err(BookingFailure::Rejected { message }), errors)
                    }
                    None => (Err(BookingFailure::GraphQL(errors)), Vec::new()),
                }
            }
            Err(error) => (Err(BookingFailure::Transport(error)), Vec::new()),
        };

        if let Err(failure) = &outcome {
            tracing::warn!(launch_id = %self.launch_id, action = ?self.action, %failure, "booking change failed");
        }

        let _ = self.events.send(BookingEvent::Completed {
            launch_id: self.launch_id,
            action: self.action,
            outcome,
            errors,
        });
    }

    fn refresh(&self) -> RequestHandle {
        let events = self.events.clone();
        let launch_id = self.launch_id.clone();
        self.client.fetch(
            &LaunchDetailsQuery {
                id: self.launch_id.clone(),
            },
            CachePolicy::FetchIgnoringCacheCompletely,
            move |result| {
                let _ = events.send(BookingEvent::DetailsRefreshed { launch_id, result });
            },
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;
    use crate::test_support::{ScriptedTransport, client_with_store, recv};
    use pretty_assertions::assert_eq;
    use rocket_domain::{GraphQLError, GraphQLResponse, Token};
    use serde_json::json;
    use std::time::Duration;

    struct Fixture {
        transport: Arc<ScriptedTransport>,
        store: Arc<MemoryCredentialStore>,
        controller: BookingController,
        events: mpsc::UnboundedReceiver<BookingEvent>,
    }

    fn fixture() -> Fixture {
        let transport = Arc::new(ScriptedTransport::new());
        let store = Arc::new(MemoryCredentialStore::new());
        let client = Arc::new(client_with_store(&transport, Arc::clone(&store)));
        let (tx, events) = mpsc::unbounded_channel();
        let controller = BookingController::new(client, Arc::clone(&store) as Arc<dyn CredentialStore>, tx);
        Fixture {
            transport,
            store,
            controller,
            events,
        }
    }

    fn id(raw: &str) -> LaunchId {
        LaunchId::parse(raw).unwrap()
    }

    async fn no_more_events(events: &mut mpsc::UnboundedReceiver<BookingEvent>) {
        let next = tokio::time::timeout(Duration::from_millis(50), events.recv()).await;
        assert!(next.is_err(), "unexpected event: {next:?}");
    }

    #[tokio::test]
    async fn test_successful_booking_refreshes_once() {
        let mut f = fixture();
        f.transport
            .push_data(json!({ "bookTrips": { "success": true, "message": null } }));
        f.transport
            .push_data(json!({ "launch": { "id": "42", "isBooked": true } }));

        f.controller.book(id("42"));

        let BookingEvent::Completed {
            launch_id, outcome, ..
        } = recv(&mut f.events).await
        else {
            panic!("expected completion first");
        };
        assert_eq!(launch_id, id("42"));
        assert_eq!(outcome.unwrap().message, BOOKED_MESSAGE);

        let BookingEvent::DetailsRefreshed { result, .. } = recv(&mut f.events).await else {
            panic!("expected refresh");
        };
        assert!(result.unwrap().data.unwrap().launch.unwrap().is_booked);

        no_more_events(&mut f.events).await;
        let sent = f.transport.sent();
        assert_eq!(f.transport.sent_names(), vec!["BookTrips", "LaunchDetails"]);
        assert_eq!(sent[1].cache_policy(), CachePolicy::FetchIgnoringCacheCompletely);
        assert_eq!(sent[1].variables(), &json!({ "id": "42" }));
    }

    #[tokio::test]
    async fn test_rejected_booking_does_not_refresh() {
        let mut f = fixture();
        f.transport.push_data(
            json!({ "bookTrips": { "success": false, "message": "No seats left" } }),
        );

        f.controller.book(id("42"));

        let BookingEvent::Completed { outcome, .. } = recv(&mut f.events).await else {
            panic!("expected completion");
        };
        assert_eq!(
            outcome,
            Err(BookingFailure::Rejected {
                message: "No seats left".to_string()
            })
        );
        no_more_events(&mut f.events).await;
        assert_eq!(f.transport.sent_names(), vec!["BookTrips"]);
    }

    #[tokio::test]
    async fn test_rejection_without_message_uses_fallback() {
        let mut f = fixture();
        f.transport
            .push_data(json!({ "cancelTrip": { "success": false } }));

        f.controller.cancel(id("42"));

        let BookingEvent::Completed { action, outcome, .. } = recv(&mut f.events).await else {
            panic!("expected completion");
        };
        assert_eq!(action, BookingAction::Cancel);
        assert_eq!(
            outcome.unwrap_err().to_string(),
            UNKNOWN_FAILURE_MESSAGE.to_string()
        );
    }

    #[tokio::test]
    async fn test_successful_cancel_uses_cancel_fallback() {
        let mut f = fixture();
        f.transport
            .push_data(json!({ "cancelTrip": { "success": true } }));
        f.transport
            .push_data(json!({ "launch": { "id": "42", "isBooked": false } }));

        f.controller.cancel(id("42"));

        let BookingEvent::Completed { outcome, .. } = recv(&mut f.events).await else {
            panic!("expected completion");
        };
        assert_eq!(outcome.unwrap().message, CANCELLED_MESSAGE);
        assert!(matches!(
            recv(&mut f.events).await,
            BookingEvent::DetailsRefreshed { .. }
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_is_surfaced() {
        let mut f = fixture();
        f.transport
            .push_error(TransportError::ConnectionFailed("offline".to_string()));

        f.controller.book(id("42"));

        let BookingEvent::Completed { outcome, .. } = recv(&mut f.events).await else {
            panic!("expected completion");
        };
        assert_eq!(
            outcome,
            Err(BookingFailure::Transport(TransportError::ConnectionFailed(
                "offline".to_string()
            )))
        );
        no_more_events(&mut f.events).await;
    }

    #[tokio::test]
    async fn test_graphql_errors_forwarded_with_result() {
        let mut f = fixture();
        f.transport.push_response(GraphQLResponse {
            data: Some(json!({ "bookTrips": { "success": false, "message": null } })),
            errors: vec![GraphQLError::new("not authorised")],
        });

        f.controller.book(id("42"));

        let BookingEvent::Completed { outcome, errors, .. } = recv(&mut f.events).await else {
            panic!("expected completion");
        };
        assert!(outcome.is_err());
        assert_eq!(errors, vec!["not authorised".to_string()]);
    }

    #[tokio::test]
    async fn test_toggle_requires_login() {
        let mut f = fixture();
        let launch = LaunchDetails {
            id: id("42"),
            site: None,
            mission: None,
            rocket: None,
            is_booked: false,
        };

        assert_eq!(f.controller.toggle(&launch), Err(BookingError::LoginRequired));
        assert!(f.transport.sent().is_empty());

        f.store.set(SESSION_KEY, Token::new("token")).unwrap();
        f.transport
            .push_data(json!({ "cancelTrip": { "success": false } }));
        let booked = LaunchDetails {
            is_booked: true,
            ..launch
        };
        assert!(f.controller.toggle(&booked).is_ok());
        recv(&mut f.events).await;
        assert_eq!(f.transport.sent_names(), vec!["CancelTrip"]);
        assert_eq!(
            f.transport.sent()[0].header("Authorization"),
            Some("token")
        );
    }

    #[tokio::test]
    async fn test_concurrent_bookings_are_not_deduplicated() {
        let mut f = fixture();
        f.transport
            .push_data(json!({ "bookTrips": { "success": false } }));
        f.transport
            .push_data(json!({ "bookTrips": { "success": false } }));

        let first = f.controller.book(id("42"));
        let second = f.controller.book(id("42"));
        assert_ne!(first, second);

        recv(&mut f.events).await;
        recv(&mut f.events).await;
        assert_eq!(f.transport.sent_names(), vec!["BookTrips", "BookTrips"]);
    }
}
