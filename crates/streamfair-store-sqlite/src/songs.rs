//! Song aggregate ingestion: create, update and delete a song together with
//! its credit associations.
//!
//! Every write first checks that the acting account holds a publishing
//! capability. Creation is additionally gated by the draft's content
//! fingerprint, admitted inside the same unit of work as the song insert: a
//! duplicate draft is rejected before anything is written, and a failed
//! ingestion does not consume its fingerprint.

use chrono::Utc;
use streamfair_core::{
  Error, Result,
  account::has_publishing_capability,
  fingerprint::fingerprint_draft,
  song::{SongAggregate, SongDetail, SongDraft, SongRevision},
};

use crate::{Queries, SqliteStore};

fn ensure_can_publish(q: &Queries<'_>, account_id: i64, action: &'static str) -> Result<()> {
  let types = q.account_types_for_account(account_id)?;
  if has_publishing_capability(&types) {
    Ok(())
  } else {
    Err(Error::Forbidden { account_id, action })
  }
}

pub(crate) async fn create(store: &SqliteStore, draft: SongDraft) -> Result<SongAggregate> {
  let fingerprint = fingerprint_draft(&draft)?;

  let aggregate = store
    .execute(move |q| {
      ensure_can_publish(q, draft.account_id, "create songs")?;

      let now = Utc::now();
      if !q.admit_fingerprint(&fingerprint, now)? {
        tracing::info!(
          %fingerprint,
          account_id = draft.account_id,
          "duplicate song draft rejected"
        );
        return Err(Error::Conflict(format!(
          "a song with these parameters already exists ({fingerprint})"
        )));
      }

      let song = q.create_song(&draft.song, now)?;
      let credits = q.attach_all_credits(song.id, &draft.credits)?;
      Ok(SongAggregate { song, credits })
    })
    .await?;

  tracing::info!(song_id = aggregate.song.id, "song created");
  Ok(aggregate)
}

/// Replace the song's scalar fields and resynchronise its credits: every
/// existing association is removed and the revision's lists are linked anew.
pub(crate) async fn update(
  store: &SqliteStore,
  song_id: i64,
  revision: SongRevision,
) -> Result<SongAggregate> {
  store
    .execute(move |q| {
      ensure_can_publish(q, revision.account_id, "update songs")?;

      let song = q
        .update_song(song_id, &revision.song, Utc::now())?
        .ok_or_else(|| Error::not_found("song", song_id))?;
      q.detach_all_credits(song_id)?;
      let credits = q.attach_all_credits(song_id, &revision.credits)?;
      Ok(SongAggregate { song, credits })
    })
    .await
}

/// Unlink every credit category before removing the song row, so no junction
/// row outlives its song.
pub(crate) async fn delete(store: &SqliteStore, account_id: i64, song_id: i64) -> Result<()> {
  let detached = store
    .execute(move |q| {
      ensure_can_publish(q, account_id, "delete songs")?;

      let detached = q.detach_all_credits(song_id)?;
      if q.delete_song(song_id)? == 0 {
        return Err(Error::not_found("song", song_id));
      }
      Ok(detached)
    })
    .await?;

  tracing::info!(song_id, detached, "song deleted");
  Ok(())
}

pub(crate) async fn get(store: &SqliteStore, song_id: i64) -> Result<Option<SongDetail>> {
  store
    .execute(move |q| {
      let Some(song) = q.get_song(song_id)? else {
        return Ok(None);
      };
      let credits = q.credits_for_song(song_id)?;
      Ok(Some(SongDetail { song, credits }))
    })
    .await
}
