//! HTTP surface of the service.
//!
//! | Method | Path                 | Handler                         |
//! |--------|----------------------|---------------------------------|
//! | GET    | `/`                  | [`handlers::service_info`]      |
//! | GET    | `/health`            | [`handlers::health`]            |
//! | GET    | `/supported-formats` | [`handlers::supported_formats`] |
//! | POST   | `/convert`           | [`handlers::convert`]           |
//!
//! Errors are rendered as `{"detail": ..., "suggestion": ...}` by
//! [`ApiError`].

pub mod error;
pub mod handlers;
pub mod request_id;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use routes::create_router;
pub use state::AppState;
