//! [`SqliteStore`] — the SQLite implementation of [`ItemStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use findit_core::{
  item::{Item, NewItem},
  store::ItemStore,
  user::User,
};

use crate::{
  encode::{
    ITEM_COLUMNS, RawItem, RawUser, decode_dt, encode_dt, encode_region, encode_status,
    encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A FindIt item store backed by a single SQLite file.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Column values for one `items` insert, already encoded.
struct ItemRow {
  item_id:       String,
  name:          String,
  description:   String,
  status:        &'static str,
  image_url:     String,
  latitude:      f64,
  longitude:     f64,
  location_text: String,
  author_id:     String,
  region:        &'static str,
}

impl ItemRow {
  fn from_new(item_id: Uuid, input: &NewItem) -> Self {
    Self {
      item_id:       encode_uuid(item_id),
      name:          input.name.clone(),
      description:   input.description.clone(),
      status:        encode_status(input.status),
      image_url:     input.image_url.clone(),
      latitude:      input.location.latitude(),
      longitude:     input.location.longitude(),
      location_text: input.location.text().to_owned(),
      author_id:     input.author_id.clone(),
      region:        encode_region(input.region),
    }
  }

  fn insert(&self, conn: &rusqlite::Connection, reported_at: &str) -> rusqlite::Result<()> {
    conn.execute(
      "INSERT INTO items (
         item_id, name, description, status, image_url,
         latitude, longitude, location_text, reported_at, author_id, region
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
      rusqlite::params![
        self.item_id,
        self.name,
        self.description,
        self.status,
        self.image_url,
        self.latitude,
        self.longitude,
        self.location_text,
        reported_at,
        self.author_id,
        self.region,
      ],
    )?;
    Ok(())
  }
}

fn select_user(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<Option<RawUser>> {
  conn
    .query_row(
      "SELECT user_id, username, avatar_url, email, phone FROM users WHERE user_id = ?1",
      rusqlite::params![id],
      RawUser::from_row,
    )
    .optional()
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a throwaway in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-formed item, keeping its id and timestamp. Used to load
  /// fixtures; regular reports go through [`ItemStore::append_item`].
  pub async fn import_item(&self, item: Item) -> Result<()> {
    let new = NewItem {
      name:        item.name,
      description: item.description,
      status:      item.status,
      image_url:   item.image_url,
      location:    item.location,
      region:      item.region,
      author_id:   item.author.id,
    };
    let row = ItemRow::from_new(item.item_id, &new);
    let reported_at = encode_dt(item.reported_at);

    self
      .conn
      .call(move |conn| {
        if select_user(conn, &row.author_id)?.is_none() {
          return Ok(Err(Error::UserNotFound(row.author_id)));
        }
        let taken: bool = conn
          .query_row(
            "SELECT 1 FROM items WHERE item_id = ?1",
            rusqlite::params![row.item_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(Err(Error::ItemExists(item.item_id)));
        }
        row.insert(conn, &reported_at)?;
        Ok(Ok(()))
      })
      .await?
  }
}

// ─── ItemStore impl ──────────────────────────────────────────────────────────

impl ItemStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, user: User) -> Result<User> {
    let stored = user.clone();
    let inserted = self
      .conn
      .call(move |conn| {
        if select_user(conn, &user.id)?.is_some() {
          return Ok(false);
        }
        conn.execute(
          "INSERT INTO users (user_id, username, avatar_url, email, phone)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![user.id, user.username, user.avatar_url, user.email, user.phone],
        )?;
        Ok(true)
      })
      .await?;

    if inserted {
      Ok(stored)
    } else {
      Err(Error::UserExists(stored.id))
    }
  }

  async fn get_user(&self, id: &str) -> Result<Option<User>> {
    let id = id.to_owned();
    let raw = self.conn.call(move |conn| Ok(select_user(conn, &id)?)).await?;
    Ok(raw.map(RawUser::into_user))
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, username, avatar_url, email, phone FROM users ORDER BY user_id",
        )?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(raws.into_iter().map(RawUser::into_user).collect())
  }

  // ── Items ─────────────────────────────────────────────────────────────────

  async fn append_item(&self, input: NewItem) -> Result<Item> {
    let item_id = Uuid::new_v4();
    let row = ItemRow::from_new(item_id, &input);
    let now_str = encode_dt(Utc::now());

    // Author lookup, clamp and insert happen in one call on the connection
    // thread, so no other append can interleave.
    let outcome: Option<(RawUser, String)> = self
      .conn
      .call(move |conn| {
        let Some(author) = select_user(conn, &row.author_id)? else {
          return Ok(None);
        };
        let newest: Option<String> =
          conn.query_row("SELECT MAX(reported_at) FROM items", [], |r| r.get(0))?;
        let reported_at = match newest {
          Some(newest) if newest > now_str => newest,
          _ => now_str,
        };
        row.insert(conn, &reported_at)?;
        Ok(Some((author, reported_at)))
      })
      .await?;

    let (author, reported_at) =
      outcome.ok_or_else(|| Error::UserNotFound(input.author_id.clone()))?;
    Ok(input.into_item(item_id, decode_dt(&reported_at)?, author.into_user()))
  }

  async fn get_item(&self, id: Uuid) -> Result<Option<Item>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawItem> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {ITEM_COLUMNS}
           FROM items i JOIN users u ON u.user_id = i.author_id
           WHERE i.item_id = ?1"
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawItem::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawItem::into_item).transpose()
  }

  async fn list_items(&self) -> Result<Vec<Item>> {
    let raws: Vec<RawItem> = self
      .conn
      .call(|conn| {
        let sql = format!(
          "SELECT {ITEM_COLUMNS}
           FROM items i JOIN users u ON u.user_id = i.author_id
           ORDER BY i.reported_at DESC, i.seq DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawItem::into_item).collect()
  }

  async fn count_items(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM items", [], |r| r.get(0))?))
      .await?;
    Ok(count as usize)
  }
}
