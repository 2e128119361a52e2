//! Typed GraphQL operations.
//!
//! Each operation is an immutable value that knows its document, its
//! name and how to render its variables. The associated `Data` type is
//! what a successful response decodes into.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::launch::{LaunchConnection, LaunchDetails, LaunchId, PageCursor, TripUpdateResponse};
use crate::session::EmailAddress;

/// Whether an operation reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Read operation.
    Query,
    /// Write operation.
    Mutation,
}

/// Name and kind of an operation, without its variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationDescriptor {
    /// Operation name as it appears in the document.
    pub name: &'static str,
    /// Read or write.
    pub kind: OperationKind,
}

/// A named GraphQL operation with typed result data.
pub trait Operation: Send + Sync + 'static {
    /// Shape of the response `data` member.
    type Data: DeserializeOwned + Send + 'static;

    /// Operation name.
    const NAME: &'static str;
    /// Read or write.
    const KIND: OperationKind;
    /// Full GraphQL document.
    const DOCUMENT: &'static str;

    /// Renders the operation's variables.
    fn variables(&self) -> Value;

    /// Returns the operation's descriptor.
    fn descriptor(&self) -> OperationDescriptor {
        OperationDescriptor {
            name: Self::NAME,
            kind: Self::KIND,
        }
    }
}

/// Marker for read operations.
pub trait Query: Operation {}

/// Marker for write operations.
pub trait Mutation: Operation {}

/// Fetches one page of launches after `cursor`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchListQuery {
    /// Resume position; `None` starts from the first page.
    pub cursor: Option<PageCursor>,
}

/// Data returned by [`LaunchListQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LaunchListData {
    /// The requested page.
    pub launches: LaunchConnection,
}

impl Operation for LaunchListQuery {
    type Data = LaunchListData;

    const NAME: &'static str = "LaunchList";
    const KIND: OperationKind = OperationKind::Query;
    const DOCUMENT: &'static str = "query LaunchList($cursor: String) { launches(after: $cursor) { __typename cursor hasMore launches { __typename id site isBooked mission { __typename name missionPatch(size: SMALL) } } } }";

    fn variables(&self) -> Value {
        json!({ "cursor": self.cursor })
    }
}

impl Query for LaunchListQuery {}

/// Fetches the full details of one launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchDetailsQuery {
    /// Launch to load.
    pub id: LaunchId,
}

/// Data returned by [`LaunchDetailsQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LaunchDetailsData {
    /// The launch, or `None` if the server does not know the id.
    #[serde(default)]
    pub launch: Option<LaunchDetails>,
}

impl Operation for LaunchDetailsQuery {
    type Data = LaunchDetailsData;

    const NAME: &'static str = "LaunchDetails";
    const KIND: OperationKind = OperationKind::Query;
    const DOCUMENT: &'static str = "query LaunchDetails($id: ID!) { launch(id: $id) { __typename id site mission { __typename name missionPatch(size: LARGE) } rocket { __typename name type } isBooked } }";

    fn variables(&self) -> Value {
        json!({ "id": self.id })
    }
}

impl Query for LaunchDetailsQuery {}

/// Books seats on the given launches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookTripsMutation {
    /// Launches to book.
    pub launch_ids: Vec<LaunchId>,
}

impl BookTripsMutation {
    /// Books a single launch.
    #[must_use]
    pub fn single(launch_id: LaunchId) -> Self {
        Self {
            launch_ids: vec![launch_id],
        }
    }
}

/// Data returned by [`BookTripsMutation`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTripsData {
    /// Outcome of the booking.
    pub book_trips: TripUpdateResponse,
}

impl Operation for BookTripsMutation {
    type Data = BookTripsData;

    const NAME: &'static str = "BookTrips";
    const KIND: OperationKind = OperationKind::Mutation;
    const DOCUMENT: &'static str = "mutation BookTrips($launchIds: [ID]!) { bookTrips(launchIds: $launchIds) { __typename success message } }";

    fn variables(&self) -> Value {
        json!({ "launchIds": self.launch_ids })
    }
}

impl Mutation for BookTripsMutation {}

/// Cancels the booking on a launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelTripMutation {
    /// Launch to cancel.
    pub launch_id: LaunchId,
}

/// Data returned by [`CancelTripMutation`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelTripData {
    /// Outcome of the cancellation.
    pub cancel_trip: TripUpdateResponse,
}

impl Operation for CancelTripMutation {
    type Data = CancelTripData;

    const NAME: &'static str = "CancelTrip";
    const KIND: OperationKind = OperationKind::Mutation;
    const DOCUMENT: &'static str = "mutation CancelTrip($id: ID!) { cancelTrip(launchId: $id) { __typename success message } }";

    fn variables(&self) -> Value {
        json!({ "id": self.launch_id })
    }
}

impl Mutation for CancelTripMutation {}

/// Exchanges an email address for a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginMutation {
    /// Address to log in with.
    pub email: EmailAddress,
}

/// Data returned by [`LoginMutation`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginData {
    /// The session token, if login succeeded.
    #[serde(default)]
    pub login: Option<String>,
}

impl Operation for LoginMutation {
    type Data = LoginData;

    const NAME: &'static str = "Login";
    const KIND: OperationKind = OperationKind::Mutation;
    const DOCUMENT: &'static str = "mutation Login($email: String) { login(email: $email) }";

    fn variables(&self) -> Value {
        json!({ "email": self.email.as_str() })
    }
}

impl Mutation for LoginMutation {}
