//! Request middleware: authentication extractors and request IDs.

pub mod auth;
pub mod request_id;

pub use auth::RequireAuth;
pub use request_id::{make_span, request_id_middleware};
