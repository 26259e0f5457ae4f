//! External-collaborator clients for the Panacea app core.
//!
//! The data service is GraphQL-shaped and consumed as two single-shot
//! calls (`searchStudies`, `submitResponses`); the identity provider is a
//! seam whose token the transport attaches as a bearer credential. Token
//! refresh, push delivery, and retry policy all live outside this crate.

pub mod error;
pub mod graphql;
pub mod identity;

pub use error::{ClientError, Result};
pub use graphql::GraphQlClient;
pub use identity::{AuthSession, Credentials, Identity, IdentityProvider, StaticTokenProvider};
