//! Rocket Reserver Domain - Core client types
//!
//! This crate defines the data model shared by the session layer of the
//! Rocket Reserver client: launches, pagination cursors, session tokens,
//! GraphQL envelopes and the typed operations sent to the server.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod graphql;
pub mod id;
pub mod launch;
pub mod operation;
pub mod session;

pub use error::{DomainError, DomainResult};
pub use graphql::{CachePolicy, GraphQLError, GraphQLRequestBody, GraphQLResponse, GraphQLResult};
pub use id::RequestId;
pub use launch::{
    Launch, LaunchConnection, LaunchDetails, LaunchId, Mission, PageCursor, Rocket,
    TripUpdateResponse,
};
pub use operation::{
    BookTripsData, BookTripsMutation, CancelTripData, CancelTripMutation, LaunchDetailsData,
    LaunchDetailsQuery, LaunchListData, LaunchListQuery, LoginData, LoginMutation, Mutation,
    Operation, OperationDescriptor, OperationKind, Query,
};
pub use session::{EmailAddress, SESSION_KEY, Token};
