//! Pet Admin Guard - Route authentication gate
//!
//! Runs in front of every request:
//! - Paths under the protected prefix need a resolved session
//! - Without one the request is redirected to the login path on the same origin
//! - Resolver failures count as "no session" (fail closed)
//!
//! The decision itself is pure ([`RouteGuard::decide`]); [`filter`] wires it
//! into `warp` and [`recover`] turns the rejection into a redirect.
//!
//! ```rust,ignore
//! let guard = Arc::new(RouteGuard::new(&settings, Arc::new(resolver)));
//! let app = pet_admin_guard::filter(guard)
//!     .and(login.or(admin))
//!     .recover(pet_admin_guard::recover);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod decision;
pub mod filter;
pub mod session;

pub use decision::{GuardDecision, GuardRequest, Origin, RouteGuard};
pub use filter::{filter, recover, Unauthenticated};
pub use session::{session_token, AuthError, CookieSessionResolver, Session, SessionResolver};
