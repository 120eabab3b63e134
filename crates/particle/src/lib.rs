//! # Particle
//!
//! A minimal full-stack web framework. UI is described as a tree of virtual
//! elements and rendered to HTML on the server; event handlers are declared
//! as statement lists and compiled to inline JS; API requests and page loads
//! go through one middleware pipeline.
//!
//! ```
//! use particle::prelude::*;
//!
//! let counter = div()
//!     .child(span().id("count").text("0"))
//!     .child(button().on("click", on_click(|s| s.increment_counter("count"))).text("+"));
//!
//! let app = App::new(move || counter.clone());
//! app.use_cors();
//!
//! let res = app.handle(RawRequest::new(Method::OPTIONS, "/api/anything"));
//! assert_eq!(res.status(), StatusCode::NO_CONTENT);
//! ```

pub mod app;
pub mod component;
pub mod config;
pub mod context;
pub mod cookie;
pub mod document;
pub mod envelope;
pub mod escape;
pub mod forms;
pub mod middleware;
pub mod multipart;
pub mod request;
pub mod response;
pub mod routing;
pub mod script;
pub mod session;
pub mod static_files;
pub mod store;
pub mod value;
pub mod vdom;

pub use app::App;
pub use component::Component;
pub use config::Config;
pub use envelope::JsonEnvelope;
pub use request::{RawRequest, Request};
pub use response::Response;
pub use routing::{ClientRouter, Reply};
pub use session::SessionStore;
pub use store::Store;

/// Re-exports for application code
pub mod prelude {
    pub use crate::app::App;
    pub use crate::component::{with_props, Component, ComponentProps};
    pub use crate::config::Config;
    pub use crate::context::{create_context, Context};
    pub use crate::cookie::{CookieOptions, SameSite};
    pub use crate::envelope::{error_response, JsonEnvelope};
    pub use crate::forms::{form_component, validate_form, FieldSpec, FormValidator, Rule, ValidationError};
    pub use crate::middleware::{AuthMiddleware, CorsMiddleware, LoggingMiddleware, Middleware};
    pub use crate::multipart::{FormField, UploadedFile};
    pub use crate::request::{QueryValue, RawRequest, Request};
    pub use crate::response::Response;
    pub use crate::routing::{ClientRouter, Reply};
    pub use crate::script::{on_click, on_click_prevent, on_submit_prevent, EventHandler, Script};
    pub use crate::session::{SessionData, SessionStore};
    pub use crate::store::{create_store, use_store, Action, Store};
    pub use crate::value::AttrValue;
    pub use crate::vdom::*;
    pub use axum::http::{Method, StatusCode};
}
