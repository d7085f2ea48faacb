//! HTTP clients for the tandem backend collaborators, plus the process-wide
//! session context.
//!
//! Two external services are consumed here: the hosted record store
//! (collections `things` and `users`) and the hosted identity provider.
//! Everything above this crate talks to them through the
//! [`tandem_core::store::RecordStore`] trait and the auth-state stream.

pub mod auth;
pub mod error;
pub mod session;
pub mod store;

pub use auth::{AuthClient, AuthConfig, Authenticator};
pub use error::{AuthError, AuthErrorCode, StoreError};
pub use session::SessionContext;
pub use store::{StoreClient, StoreConfig};
