//! [`StoreClient`] — typed HTTP accessors for the hosted record store.
//!
//! Translates between the store's wire representation (camelCase JSON
//! documents, epoch-millisecond timestamps) and the application entities.
//! Documents are addressed by collection (`things`, `users`) plus string id.
//! All reads are point-in-time snapshots.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tandem_core::{
  profile::{ProfileUpsert, UserProfile},
  store::RecordStore,
  thing::{DonePolicy, NewThing, Thing, ThingStatus},
};

use crate::error::StoreError;

// ─── Config ──────────────────────────────────────────────────────────────────

/// Connection settings for the record store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
  pub base_url:    String,
  /// Project API key, sent as `x-api-key` on every request.
  pub api_key:     String,
  /// Repeat-mark-done behavior; see [`DonePolicy`].
  pub done_policy: DonePolicy,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async HTTP client for the record store.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct StoreClient {
  client: Client,
  config: StoreConfig,
}

impl StoreClient {
  pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/v1{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn request(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    req.header("x-api-key", &self.config.api_key)
  }

  async fn list_things(&self, query: &ListQuery<'_>) -> Result<Vec<Thing>, StoreError> {
    let resp = self
      .request(self.client.get(self.url("/things")))
      .query(query)
      .send()
      .await?;
    let docs: Vec<ThingDoc> = check(resp).await?.json().await?;
    docs.into_iter().map(ThingDoc::into_thing).collect()
  }
}

/// Reject non-success responses, carrying the body for the error state.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(StoreError::Status { status, body })
}

// ─── Wire shapes ─────────────────────────────────────────────────────────────

/// Millisecond timestamps are opaque until resolved to a point in time here.
fn from_millis(ms: i64) -> Result<DateTime<Utc>, StoreError> {
  DateTime::from_timestamp_millis(ms)
    .ok_or_else(|| StoreError::InvalidDocument(format!("timestamp out of range: {ms}")))
}

/// A `things` document as stored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThingDoc {
  id:         String,
  title:      String,
  #[serde(default)]
  notes:      Option<String>,
  status:     ThingStatus,
  created_at: i64,
  #[serde(default)]
  done_at:    Option<i64>,
  #[serde(default)]
  photo_url:  Option<String>,
  added_by:   String,
}

impl ThingDoc {
  fn into_thing(self) -> Result<Thing, StoreError> {
    Ok(Thing {
      id:         self.id,
      title:      self.title,
      notes:      self.notes,
      status:     self.status,
      created_at: from_millis(self.created_at)?,
      done_at:    self.done_at.map(from_millis).transpose()?,
      photo_url:  self.photo_url,
      added_by:   self.added_by,
    })
  }
}

#[derive(Serialize)]
struct ListQuery<'a> {
  status:   ThingStatus,
  #[serde(rename = "orderBy")]
  order_by: &'a str,
  dir:      &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateThingBody<'a> {
  title:    &'a str,
  notes:    Option<&'a str>,
  added_by: &'a str,
}

/// The create acknowledgment carries only the assigned id; status and
/// `createdAt` are resolved server-side.
#[derive(Deserialize)]
struct CreateAck {
  id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkDoneBody<'a> {
  status:    ThingStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  photo_url: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileDoc {
  uid:          String,
  email:        String,
  display_name: String,
  partner_name: String,
  created_at:   i64,
}

impl ProfileDoc {
  fn into_profile(self) -> Result<UserProfile, StoreError> {
    Ok(UserProfile {
      uid:          self.uid,
      email:        self.email,
      display_name: self.display_name,
      partner_name: self.partner_name,
      created_at:   from_millis(self.created_at)?,
    })
  }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfilePutBody<'a> {
  email:        &'a str,
  display_name: &'a str,
  partner_name: &'a str,
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for StoreClient {
  type Error = StoreError;

  fn create_thing(
    &self,
    input: &NewThing,
  ) -> impl Future<Output = Result<String, StoreError>> + Send + '_ {
    // Built eagerly so the returned future borrows only `self`, as the
    // trait's `+ '_` bound requires.
    let body = CreateThingBody {
      title:    input.title(),
      notes:    input.notes(),
      added_by: input.added_by(),
    };
    let req = self
      .request(self.client.post(self.url("/things")))
      .json(&body);
    async move {
      let resp = req.send().await?;
      let ack: CreateAck = check(resp).await?.json().await?;
      Ok(ack.id)
    }
  }

  async fn list_planned(&self) -> Result<Vec<Thing>, StoreError> {
    self
      .list_things(&ListQuery {
        status:   ThingStatus::Planned,
        order_by: "createdAt",
        dir:      "desc",
      })
      .await
  }

  async fn list_done(&self) -> Result<Vec<Thing>, StoreError> {
    self
      .list_things(&ListQuery {
        status:   ThingStatus::Done,
        order_by: "doneAt",
        dir:      "desc",
      })
      .await
  }

  async fn get_thing(&self, id: &str) -> Result<Option<Thing>, StoreError> {
    let resp = self
      .request(self.client.get(self.url(&format!("/things/{id}"))))
      .send()
      .await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let doc: ThingDoc = check(resp).await?.json().await?;
    doc.into_thing().map(Some)
  }

  async fn mark_done(
    &self,
    id: &str,
    photo_url: Option<&str>,
  ) -> Result<(), StoreError> {
    // Under KeepFirst a photo-less repeat call is a no-op, preserving the
    // original completion time. A photo backfill always writes.
    if self.config.done_policy == DonePolicy::KeepFirst && photo_url.is_none() {
      if let Some(existing) = self.get_thing(id).await? {
        if existing.is_done() {
          return Ok(());
        }
      }
    }

    let body = MarkDoneBody {
      status: ThingStatus::Done,
      photo_url,
    };
    let resp = self
      .request(self.client.patch(self.url(&format!("/things/{id}"))))
      .json(&body)
      .send()
      .await?;
    check(resp).await?;
    Ok(())
  }

  async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
    let resp = self
      .request(self.client.get(self.url(&format!("/users/{uid}"))))
      .send()
      .await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let doc: ProfileDoc = check(resp).await?.json().await?;
    doc.into_profile().map(Some)
  }

  async fn upsert_profile(
    &self,
    input: &ProfileUpsert,
  ) -> Result<UserProfile, StoreError> {
    let body = ProfilePutBody {
      email:        input.email(),
      display_name: input.display_name(),
      partner_name: input.partner_name(),
    };
    let resp = self
      .request(self.client.put(self.url(&format!("/users/{}", input.uid()))))
      .json(&body)
      .send()
      .await?;
    check(resp).await?;

    // The write acknowledgment carries no server-resolved timestamps;
    // re-read for the authoritative stored value.
    self.get_profile(input.uid()).await?.ok_or_else(|| {
      StoreError::InvalidDocument(format!(
        "profile {} missing after upsert",
        input.uid()
      ))
    })
  }
}
