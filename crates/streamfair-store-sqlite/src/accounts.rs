//! Account lifecycle: atomic create/delete against the account ↔ account-type
//! relation, plus boot-time seeding of the account-type catalog.

use std::collections::HashSet;

use chrono::Utc;
use streamfair_core::{
  Error, Result,
  account::{Account, AccountType, AccountUpdate, AccountWithTypes, NewAccount},
  store::Page,
};

use crate::{Association, SqliteStore};

/// Insert the account row and link it to every id in `type_ids`, all in one
/// unit of work. The first failing link aborts the whole unit, so an account
/// never exists with only part of its requested memberships.
///
/// An empty `type_ids` is accepted and yields an account with no memberships.
pub(crate) async fn create(
  store: &SqliteStore,
  account: NewAccount,
  type_ids: Vec<i64>,
) -> Result<AccountWithTypes> {
  let created = store
    .execute(move |q| {
      let account = q.create_account(&account, Utc::now())?;
      for &type_id in &type_ids {
        q.link(Association::ACCOUNT_TYPES, account.id, type_id)?;
      }
      Ok(AccountWithTypes { account, type_ids })
    })
    .await?;

  tracing::info!(
    account_id = created.account.id,
    type_ids = ?created.type_ids,
    "account created"
  );
  Ok(created)
}

/// Remove every membership of the account, then the account row itself.
pub(crate) async fn delete(store: &SqliteStore, account_id: i64) -> Result<()> {
  let memberships = store
    .execute(move |q| {
      let memberships = q.unlink_all_by_left(Association::ACCOUNT_TYPES, account_id)?;
      if q.delete_account(account_id)? == 0 {
        return Err(Error::not_found("account", account_id));
      }
      Ok(memberships)
    })
    .await?;

  tracing::info!(account_id, memberships, "account deleted");
  Ok(())
}

pub(crate) async fn update(
  store: &SqliteStore,
  account_id: i64,
  update: AccountUpdate,
) -> Result<Account> {
  store
    .execute(move |q| {
      q.update_account(account_id, &update, Utc::now())?
        .ok_or_else(|| Error::not_found("account", account_id))
    })
    .await
}

/// Insert the entries of `catalog` whose ids are not persisted yet.
/// Running it again against an up-to-date store inserts nothing.
pub(crate) async fn seed_types(store: &SqliteStore, catalog: Vec<AccountType>) -> Result<usize> {
  let inserted = store
    .execute(move |q| {
      let persisted: HashSet<i64> = q
        .list_account_types(Page { limit: u32::MAX, offset: 0 })?
        .into_iter()
        .map(|t| t.id)
        .collect();

      let mut inserted = 0;
      for account_type in catalog.iter().filter(|t| !persisted.contains(&t.id)) {
        q.create_account_type(account_type)?;
        inserted += 1;
      }
      Ok(inserted)
    })
    .await?;

  if inserted > 0 {
    tracing::info!(inserted, "seeded account types");
  }
  Ok(inserted)
}
