//! Handlers for `/songs` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/songs` | Body: [`SongDraft`]; 409 on a duplicate draft |
//! | `GET`    | `/songs?limit=<n>&offset=<n>` | Song rows only |
//! | `GET`    | `/songs/:id` | Song with its credit rows |
//! | `PUT`    | `/songs/:id` | Body: [`SongRevision`]; credits fully replaced |
//! | `DELETE` | `/songs/:id?account_id=<id>` | |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use streamfair_core::{
  song::{Song, SongAggregate, SongDetail, SongDraft, SongRevision},
  store::{CatalogStore, Page},
};

use crate::{ApiState, error::ApiError};

/// `POST /songs`
pub async fn create<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  Json(draft): Json<SongDraft>,
) -> Result<impl IntoResponse, ApiError> {
  let aggregate = state.store.create_song(draft).await?;
  Ok((StatusCode::CREATED, Json(aggregate)))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit:  Option<u32>,
  pub offset: Option<u32>,
}

/// `GET /songs[?limit=<n>][&offset=<n>]`
pub async fn list<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Song>>, ApiError> {
  let defaults = Page::default();
  let page = Page {
    limit:  params.limit.unwrap_or(defaults.limit),
    offset: params.offset.unwrap_or(defaults.offset),
  };
  Ok(Json(state.store.list_songs(page).await?))
}

/// `GET /songs/:id`
pub async fn get_one<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<SongDetail>, ApiError> {
  let detail = state
    .store
    .get_song(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("song {id} not found")))?;
  Ok(Json(detail))
}

/// `PUT /songs/:id`
pub async fn update<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(revision): Json<SongRevision>,
) -> Result<Json<SongAggregate>, ApiError> {
  Ok(Json(state.store.update_song(id, revision).await?))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  pub account_id: i64,
}

/// `DELETE /songs/:id?account_id=<id>`
pub async fn delete<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Query(params): Query<DeleteParams>,
) -> Result<StatusCode, ApiError> {
  state.store.delete_song(params.account_id, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
