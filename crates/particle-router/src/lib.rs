//! # Particle Router
//!
//! Path pattern matching shared by the server-side API table and the
//! client-side page table.
//!
//! - Static routes (`/about`)
//! - Dynamic parameters (`/users/:id`), URL-decoded on capture
//!
//! ## Matching rules
//!
//! 1. An exact string match on the pattern always wins.
//! 2. Otherwise every pattern with a `:param` segment is tried in
//!    registration order. Pattern and path are split on `/`, segment counts
//!    must be equal, literal segments must be equal, parameter segments bind.
//! 3. The first pattern satisfying all segments wins. There is no priority
//!    ranking beyond insertion order.
//!
//! ## Example
//!
//! ```
//! use particle_router::RouteTable;
//!
//! let mut table = RouteTable::new();
//! table.insert("/users/:id", "show");
//! table.insert("/users/:id/edit", "edit");
//!
//! let m = table.match_path("/users/42/edit").unwrap();
//! assert_eq!(*m.value, "edit");
//! assert_eq!(m.params.get("id"), Some(&"42".to_string()));
//! assert!(table.match_path("/users").is_none());
//! ```

use std::collections::HashMap;

pub mod pattern;
pub mod table;

pub use pattern::{classify_segment, decode_segment, RoutePattern, Segment};
pub use table::{RouteMatch, RouteTable};

/// Parameters captured from a matched path (param name → decoded value)
pub type Params = HashMap<String, String>;
