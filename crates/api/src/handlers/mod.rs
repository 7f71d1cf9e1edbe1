//! Request handlers.
//!
//! Handlers delegate persistence to `dermalens-db` repositories and the
//! external collaborators to the clients carried in [`crate::state::AppState`],
//! mapping failures via [`crate::error::AppError`].

pub mod detection;
