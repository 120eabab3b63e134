//! Server-side API routing and the client-side hash router.
//!
//! Both sides resolve paths with [`particle_router::RouteTable`]: an exact
//! pattern match first, then `:param` patterns in registration order.

pub mod api;
pub mod client;

pub use api::{ApiRoutes, HandlerFn, Reply, ResolvedRoute};
pub use client::{ClientRouter, Guard};
