//! Rocket Reserver Application - Session layer
//!
//! This crate holds the network access and session logic of the client:
//! - Port traits for the transport and the credential store
//! - The interceptor chain that injects the session token
//! - `SessionClient`, the single entry point for queries and mutations
//! - Launch pagination, detail loading, booking and login

pub mod booking;
pub mod credentials;
pub mod details;
pub mod error;
pub mod interceptor;
pub mod login;
pub mod network;
pub mod pager;
pub mod ports;
pub mod session;

#[cfg(test)]
mod test_support;

pub use booking::{
    BOOKED_MESSAGE, BookingAction, BookingController, BookingError, BookingEvent, BookingFailure,
    BookingSuccess, CANCELLED_MESSAGE, UNKNOWN_FAILURE_MESSAGE,
};
pub use credentials::{MemoryCredentialStore, SessionStatus};
pub use details::{DetailsCompletion, DetailsUpdate, LaunchDetailsLoader};
pub use error::{ApplicationError, ApplicationResult};
pub use interceptor::{
    AUTHORIZATION_HEADER, Interceptor, InterceptorChainFactory, InterceptorProvider, Next,
    RequestContext, TokenInjectingInterceptor,
};
pub use login::{LoginFailure, LoginOutcome, LoginService};
pub use network::Network;
pub use pager::{LaunchListPager, PageCompletion, PageUpdate, PagerError, PagerState, RequestMore};
pub use ports::{
    CancellationReceiver, CancellationToken, CredentialError, CredentialStore, Transport,
    TransportError,
};
pub use session::{Completion, RequestHandle, SessionClient};
