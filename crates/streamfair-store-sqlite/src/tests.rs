//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::Duration;

use chrono::NaiveDate;
use streamfair_core::{
  Error, ErrorKind,
  account::{
    ARTIST_ACCOUNT, AccountUpdate, LABEL_ACCOUNT, NewAccount, USER_ACCOUNT, WRITER_ACCOUNT,
    catalog,
  },
  credit::{CreditLists, NewAlbum, NewArtist, NewGenre, NewProducer, NewWriter},
  song::{NewSong, SongDraft, SongRevision, SongUpdate},
  store::{CatalogStore, Page},
};

use crate::{Association, SqliteStore};

async fn store() -> SqliteStore {
  let s = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  s.seed_account_types(catalog()).await.expect("seed account types");
  s
}

fn owner(name: &str) -> NewAccount {
  NewAccount { owner: name.into(), avatar_uri: Some("https://example.com/a.png".into()) }
}

async fn artist_account(s: &SqliteStore, name: &str) -> i64 {
  s.create_account(owner(name), vec![ARTIST_ACCOUNT])
    .await
    .unwrap()
    .account
    .id
}

async fn junction_rows(s: &SqliteStore, assoc: Association, left_id: i64) -> Vec<i64> {
  s.execute(move |q| q.list_by_left(assoc, left_id)).await.unwrap()
}

fn draft(account_id: i64, title: &str) -> SongDraft {
  SongDraft {
    account_id,
    song: NewSong {
      title:         title.into(),
      duration_secs: 201,
      release_date:  NaiveDate::from_ymd_opt(2023, 11, 17).unwrap(),
      cover_uri:     Some("https://cdn.example.com/cover.png".into()),
      audio_uri:     "https://cdn.example.com/audio.flac".into(),
    },
    credits: CreditLists {
      genres:    vec![NewGenre { name: "Synthwave".into(), description: None }],
      artists:   vec![
        NewArtist { name: "Alice".into(), bio: None, country_code: "DE".into() },
        NewArtist { name: "Bob".into(), bio: Some("Bass".into()), country_code: "FR".into() },
      ],
      albums:    vec![NewAlbum { title: "Neon Nights".into(), cover_uri: None }],
      producers: vec![NewProducer { name: "Carol".into(), country_code: "US".into() }],
      writers:   vec![NewWriter { name: "Dave".into(), country_code: "US".into() }],
      labels:    vec![],
    },
  }
}

fn revision(account_id: i64, title: &str, credits: CreditLists) -> SongRevision {
  SongRevision {
    account_id,
    song: SongUpdate {
      title:         title.into(),
      duration_secs: 180,
      release_date:  NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
      cover_uri:     None,
      audio_uri:     "https://cdn.example.com/remaster.flac".into(),
      plays:         10,
      likes:         3,
      shares:        1,
    },
    credits,
  }
}

// ─── Unit of work ────────────────────────────────────────────────────────────

#[tokio::test]
async fn execute_rolls_back_and_returns_original_error() {
  let s = store().await;

  let err = s
    .execute(|q| {
      q.create_account(&owner("mallory"), chrono::Utc::now())?;
      Err::<(), _>(Error::Conflict("abort".into()))
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(ref m) if m == "abort"));

  let accounts = s.list_accounts("mallory".into(), Page::default()).await.unwrap();
  assert!(accounts.is_empty());
}

// ─── Account types ───────────────────────────────────────────────────────────

#[tokio::test]
async fn seeding_is_idempotent() {
  let s = store().await;
  assert_eq!(s.seed_account_types(catalog()).await.unwrap(), 0);

  let types = s.list_account_types(Page::default()).await.unwrap();
  assert_eq!(types, catalog());
}

#[tokio::test]
async fn seeding_inserts_only_missing_entries() {
  let s = SqliteStore::open_in_memory().await.unwrap();
  let partial: Vec<_> = catalog().into_iter().take(2).collect();
  assert_eq!(s.seed_account_types(partial).await.unwrap(), 2);
  assert_eq!(s.seed_account_types(catalog()).await.unwrap(), 3);
  assert_eq!(s.list_account_types(Page::default()).await.unwrap().len(), 5);
}

// ─── Associations ────────────────────────────────────────────────────────────

#[tokio::test]
async fn association_is_symmetric() {
  let s = store().await;
  let account_id = artist_account(&s, "alice").await;
  let assoc = Association::ACCOUNT_TYPES;

  let (by_left, by_right) = s
    .execute(move |q| {
      q.link(assoc, account_id, LABEL_ACCOUNT)?;
      Ok((q.list_by_left(assoc, account_id)?, q.list_by_right(assoc, LABEL_ACCOUNT)?))
    })
    .await
    .unwrap();
  assert_eq!(by_left, vec![ARTIST_ACCOUNT, LABEL_ACCOUNT]);
  assert_eq!(by_right, vec![account_id]);

  let (by_left, by_right) = s
    .execute(move |q| {
      assert_eq!(q.unlink_all_by_left(assoc, account_id)?, 2);
      Ok((q.list_by_left(assoc, account_id)?, q.list_by_right(assoc, LABEL_ACCOUNT)?))
    })
    .await
    .unwrap();
  assert!(by_left.is_empty());
  assert!(by_right.is_empty());
}

#[tokio::test]
async fn unlink_all_by_right_clears_every_member() {
  let s = store().await;
  let alice = artist_account(&s, "alice").await;
  let bob = artist_account(&s, "bob").await;
  let assoc = Association::ACCOUNT_TYPES;

  let removed = s
    .execute(move |q| q.unlink_all_by_right(assoc, ARTIST_ACCOUNT))
    .await
    .unwrap();
  assert_eq!(removed, 2);
  assert!(junction_rows(&s, assoc, alice).await.is_empty());
  assert!(junction_rows(&s, assoc, bob).await.is_empty());

  let artist = s.get_account_type(ARTIST_ACCOUNT).await.unwrap().unwrap();
  assert!(artist.is_artist);
}

#[tokio::test]
async fn link_rejects_missing_parent_and_duplicate_pair() {
  let s = store().await;
  let account_id = artist_account(&s, "alice").await;
  let assoc = Association::ACCOUNT_TYPES;

  let err = s.execute(move |q| q.link(assoc, account_id, 999)).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::ConstraintViolation);

  let err = s.execute(move |q| q.link(assoc, 999, ARTIST_ACCOUNT)).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::ConstraintViolation);

  let err = s
    .execute(move |q| q.link(assoc, account_id, ARTIST_ACCOUNT))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::DuplicateAssociation);
}

#[tokio::test]
async fn unlink_is_idempotent() {
  let s = store().await;
  let account_id = artist_account(&s, "alice").await;
  let assoc = Association::ACCOUNT_TYPES;

  let removed = s
    .execute(move |q| {
      let first = q.unlink(assoc, account_id, ARTIST_ACCOUNT)?;
      let second = q.unlink(assoc, account_id, ARTIST_ACCOUNT)?;
      Ok((first, second))
    })
    .await
    .unwrap();
  assert_eq!(removed, (1, 0));
}

// ─── Account lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_delete_account_round_trip() {
  let s = store().await;

  let created = s
    .create_account(owner("alice"), vec![ARTIST_ACCOUNT, WRITER_ACCOUNT])
    .await
    .unwrap();
  assert_eq!(created.type_ids, vec![ARTIST_ACCOUNT, WRITER_ACCOUNT]);
  assert_eq!(created.account.owner, "alice");
  assert_eq!(created.account.plays, 0);

  let id = created.account.id;
  let types: Vec<i64> = s
    .account_types_for_account(id)
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.id)
    .collect();
  assert_eq!(types, vec![ARTIST_ACCOUNT, WRITER_ACCOUNT]);

  s.delete_account(id).await.unwrap();
  assert!(s.account_types_for_account(id).await.unwrap().is_empty());
  assert!(s.get_account(id).await.unwrap().is_none());
  assert!(junction_rows(&s, Association::ACCOUNT_TYPES, id).await.is_empty());
}

#[tokio::test]
async fn failed_membership_link_leaves_nothing_behind() {
  let s = store().await;

  let err = s
    .create_account(owner("bob"), vec![ARTIST_ACCOUNT, 999])
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::ConstraintViolation);

  let err = s
    .create_account(owner("bob"), vec![ARTIST_ACCOUNT, ARTIST_ACCOUNT])
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::DuplicateAssociation);

  assert!(s.list_accounts("bob".into(), Page::default()).await.unwrap().is_empty());
  let orphans = s
    .execute(|q| q.list_by_right(Association::ACCOUNT_TYPES, ARTIST_ACCOUNT))
    .await
    .unwrap();
  assert!(orphans.is_empty());
}

#[tokio::test]
async fn account_without_types_is_accepted() {
  let s = store().await;
  let created = s.create_account(owner("carol"), vec![]).await.unwrap();
  assert!(created.type_ids.is_empty());
  assert!(s.account_types_for_account(created.account.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn recreate_after_delete_gets_fresh_id() {
  let s = store().await;
  let first = s.create_account(owner("dave"), vec![ARTIST_ACCOUNT]).await.unwrap();
  s.delete_account(first.account.id).await.unwrap();

  let second = s.create_account(owner("dave"), vec![ARTIST_ACCOUNT]).await.unwrap();
  assert_ne!(first.account.id, second.account.id);
  assert_eq!(
    s.get_account_by_owner("dave".into()).await.unwrap().map(|a| a.id),
    Some(second.account.id)
  );
}

#[tokio::test]
async fn delete_missing_account_is_not_found() {
  let s = store().await;
  let err = s.delete_account(4242).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn update_account_replaces_profile_and_counters() {
  let s = store().await;
  let id = artist_account(&s, "erin").await;

  let updated = s
    .update_account(id, AccountUpdate {
      avatar_uri: None,
      plays:      5,
      likes:      4,
      follows:    3,
      shares:     2,
    })
    .await
    .unwrap();
  assert_eq!(updated.avatar_uri, None);
  assert_eq!((updated.plays, updated.likes, updated.follows, updated.shares), (5, 4, 3, 2));
  assert!(updated.updated_at >= updated.created_at);

  let err = s.update_account(4242, AccountUpdate::default()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn list_accounts_paginates_by_owner() {
  let s = store().await;
  for _ in 0..3 {
    s.create_account(owner("frank"), vec![]).await.unwrap();
  }
  s.create_account(owner("grace"), vec![]).await.unwrap();

  let page = s
    .list_accounts("frank".into(), Page { limit: 2, offset: 1 })
    .await
    .unwrap();
  assert_eq!(page.len(), 2);
  assert!(page.iter().all(|a| a.owner == "frank"));
}

// ─── Song ingestion ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_song_links_every_credit() {
  let s = store().await;
  let account_id = artist_account(&s, "alice").await;

  let aggregate = s.create_song(draft(account_id, "My Song")).await.unwrap();
  assert_eq!(aggregate.song.title, "My Song");
  assert_eq!(aggregate.credits.genres.len(), 1);
  assert_eq!(aggregate.credits.artists.len(), 2);
  assert_eq!(aggregate.credits.albums.len(), 1);
  assert_eq!(aggregate.credits.producers.len(), 1);
  assert_eq!(aggregate.credits.writers.len(), 1);
  assert!(aggregate.credits.labels.is_empty());

  let song_id = aggregate.song.id;
  let linked = s.execute(move |q| q.credit_ids_for_song(song_id)).await.unwrap();
  let mut expected = aggregate.credits.clone();
  expected.artists.sort();
  assert_eq!(linked, expected);

  let detail = s.get_song(song_id).await.unwrap().unwrap();
  assert_eq!(detail.song, aggregate.song);
  let names: Vec<_> = detail.credits.artists.iter().map(|a| a.fields.name.as_str()).collect();
  assert_eq!(names, ["Alice", "Bob"]);
  assert_eq!(detail.credits.albums[0].fields.title, "Neon Nights");
}

#[tokio::test]
async fn duplicate_song_draft_is_rejected() {
  let s = store().await;
  let account_id = artist_account(&s, "alice").await;

  let first = s.create_song(draft(account_id, " My Song ")).await.unwrap();
  assert!(first.song.id > 0);

  let err = s.create_song(draft(account_id, " My Song ")).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);

  let err = s.create_song(draft(account_id, "MY SONG")).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);

  let songs = s.execute(|q| q.list_songs(Page::default())).await.unwrap();
  assert_eq!(songs.len(), 1);
}

#[tokio::test]
async fn concurrent_equivalent_drafts_admit_exactly_one() {
  let s = store().await;
  let account_id = artist_account(&s, "alice").await;

  let (a, b) = tokio::join!(
    s.create_song(draft(account_id, " My Song ")),
    s.create_song(draft(account_id, "my song")),
  );
  let (created, rejected) = match (a, b) {
    (Ok(created), Err(rejected)) | (Err(rejected), Ok(created)) => (created, rejected),
    (a, b) => panic!("expected exactly one success, got {a:?} and {b:?}"),
  };
  assert!(created.song.id > 0);
  assert_eq!(rejected.kind(), ErrorKind::Conflict);

  let songs = s.list_songs(Page::default()).await.unwrap();
  assert_eq!(songs.len(), 1);
  assert_eq!(songs[0].id, created.song.id);
}

#[tokio::test]
async fn account_without_capability_is_forbidden() {
  let s = store().await;
  let listener = s.create_account(owner("henry"), vec![USER_ACCOUNT]).await.unwrap().account.id;

  let err = s.create_song(draft(listener, "Nope")).await.unwrap_err();
  assert!(matches!(err, Error::Forbidden { account_id, .. } if account_id == listener));

  let err = s.create_song(draft(9999, "Ghost")).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Forbidden);

  // A rejected attempt must not consume the fingerprint.
  s.execute(move |q| q.link(Association::ACCOUNT_TYPES, listener, LABEL_ACCOUNT))
    .await
    .unwrap();
  s.create_song(draft(listener, "Nope")).await.unwrap();
}

#[tokio::test]
async fn failed_ingestion_does_not_consume_fingerprint() {
  let s = store().await;
  let account_id = artist_account(&s, "alice").await;
  let d = draft(account_id, "Retry Me");
  let fp = streamfair_core::fingerprint::fingerprint_draft(&d).unwrap();

  let err = s
    .execute(move |q| {
      assert!(q.admit_fingerprint(&fp, chrono::Utc::now())?);
      Err::<(), _>(Error::internal("simulated failure"))
    })
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Internal);
  assert!(!s.execute(move |q| q.fingerprint_exists(&fp)).await.unwrap());

  s.create_song(d).await.unwrap();
  assert!(s.execute(move |q| q.fingerprint_exists(&fp)).await.unwrap());
}

#[tokio::test]
async fn credits_are_reused_by_normalized_name() {
  let s = store().await;
  let account_id = artist_account(&s, "alice").await;

  let first = s.create_song(draft(account_id, "One")).await.unwrap();

  let mut second_draft = draft(account_id, "Two");
  second_draft.credits.artists = vec![
    NewArtist { name: "  ALICE ".into(), bio: None, country_code: "DE".into() },
    NewArtist { name: "alice".into(), bio: None, country_code: "DE".into() },
  ];
  let second = s.create_song(second_draft).await.unwrap();

  assert_eq!(second.credits.artists.len(), 1);
  assert!(first.credits.artists.contains(&second.credits.artists[0]));
  assert_eq!(first.credits.genres, second.credits.genres);

  let alice = second.credits.artists[0];
  let songs = s
    .execute(move |q| q.list_by_right(Association::SONG_ARTISTS, alice))
    .await
    .unwrap();
  assert_eq!(songs, vec![first.song.id, second.song.id]);
}

#[tokio::test]
async fn update_song_resyncs_credits() {
  let s = store().await;
  let account_id = artist_account(&s, "alice").await;
  let created = s.create_song(draft(account_id, "Draft")).await.unwrap();
  let song_id = created.song.id;

  let credits = CreditLists {
    genres: vec![NewGenre { name: "Ambient".into(), description: Some("calm".into()) }],
    ..Default::default()
  };
  let updated = s
    .update_song(song_id, revision(account_id, "Final", credits))
    .await
    .unwrap();

  assert_eq!(updated.song.id, song_id);
  assert_eq!(updated.song.title, "Final");
  assert_eq!(updated.song.plays, 10);
  assert_eq!(updated.credits.genres.len(), 1);
  assert_ne!(updated.credits.genres, created.credits.genres);
  assert!(updated.credits.artists.is_empty());

  let linked = s.execute(move |q| q.credit_ids_for_song(song_id)).await.unwrap();
  assert_eq!(linked, updated.credits);
}

#[tokio::test]
async fn update_missing_song_is_not_found() {
  let s = store().await;
  let account_id = artist_account(&s, "alice").await;
  let err = s
    .update_song(777, revision(account_id, "x", CreditLists::default()))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn delete_song_removes_every_association() {
  let s = store().await;
  let account_id = artist_account(&s, "alice").await;
  let created = s.create_song(draft(account_id, "Doomed")).await.unwrap();
  let song_id = created.song.id;

  s.delete_song(account_id, song_id).await.unwrap();

  let linked = s.execute(move |q| q.credit_ids_for_song(song_id)).await.unwrap();
  assert!(linked.is_empty());
  assert!(s.get_song(song_id).await.unwrap().is_none());

  // Shared credit rows survive; only the junction rows are gone.
  let genre = created.credits.genres[0];
  let songs = s
    .execute(move |q| q.list_by_right(Association::SONG_GENRES, genre))
    .await
    .unwrap();
  assert!(songs.is_empty());

  let err = s.delete_song(account_id, song_id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn delete_song_requires_capability() {
  let s = store().await;
  let account_id = artist_account(&s, "alice").await;
  let listener = s.create_account(owner("ivan"), vec![USER_ACCOUNT]).await.unwrap().account.id;
  let song_id = s.create_song(draft(account_id, "Keep")).await.unwrap().song.id;

  let err = s.delete_song(listener, song_id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Forbidden);
  assert!(s.get_song(song_id).await.unwrap().is_some());
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ping_succeeds_on_live_store() {
  let s = store().await;
  s.ping(Duration::from_secs(5)).await.unwrap();
}

#[tokio::test]
async fn ping_times_out_while_connection_is_busy() {
  let s = store().await;

  let busy = s.clone();
  let blocker = tokio::spawn(async move {
    busy
      .execute(|_| {
        std::thread::sleep(Duration::from_millis(300));
        Ok(())
      })
      .await
  });
  tokio::time::sleep(Duration::from_millis(20)).await;

  let err = s.ping(Duration::from_millis(50)).await.unwrap_err();
  assert!(matches!(err, Error::Timeout(d) if d == Duration::from_millis(50)));

  blocker.await.unwrap().unwrap();
  s.ping(Duration::from_secs(5)).await.unwrap();
}

#[tokio::test]
async fn ping_reports_closed_connection() {
  let s = store().await;
  s.clone().close().await.unwrap();

  let err = s.ping(Duration::from_secs(5)).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Connectivity);
}
