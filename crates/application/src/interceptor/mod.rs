//! Request interception.
//!
//! Every operation runs through an ordered chain of interceptors before
//! it reaches the transport:
//! - `RequestContext` is the per-request header/metadata bag
//! - `Interceptor` and `Next` drive the chain
//! - `TokenInjectingInterceptor` attaches the session token
//! - `InterceptorChainFactory` puts the injector in front of the base chain

mod chain;
mod context;
mod factory;
mod token;

pub use chain::{Interceptor, InterceptorProvider, Next};
pub use context::RequestContext;
pub use factory::InterceptorChainFactory;
pub use token::{AUTHORIZATION_HEADER, TokenInjectingInterceptor};
