//! JSON REST API for Streamfair.
//!
//! Exposes an axum [`Router`] backed by any
//! [`streamfair_core::store::CatalogStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(streamfair_api::api_router(store.clone(), Duration::from_secs(5)))
//! ```

pub mod accounts;
pub mod error;
pub mod health;
pub mod songs;

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use streamfair_core::store::CatalogStore;

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:        Arc<S>,
  /// Deadline for the readiness probe's database ping.
  pub ping_timeout: Duration,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), ping_timeout: self.ping_timeout }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, ping_timeout: Duration) -> Router<()>
where
  S: CatalogStore + 'static,
{
  Router::new()
    // Health
    .route("/readiness", get(health::readiness::<S>))
    // Accounts
    .route("/accounts", get(accounts::list::<S>).post(accounts::create::<S>))
    .route(
      "/accounts/{id}",
      get(accounts::get_one::<S>)
        .put(accounts::update::<S>)
        .delete(accounts::delete::<S>),
    )
    .route("/accounts/owner/{owner}", get(accounts::get_by_owner::<S>))
    .route("/account-types", get(accounts::list_types::<S>))
    .route("/account-types/{id}", get(accounts::get_type::<S>))
    // Songs
    .route("/songs", get(songs::list::<S>).post(songs::create::<S>))
    .route(
      "/songs/{id}",
      get(songs::get_one::<S>)
        .put(songs::update::<S>)
        .delete(songs::delete::<S>),
    )
    .with_state(ApiState { store, ping_timeout })
}
