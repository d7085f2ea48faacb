//! The `RecordStore` trait.
//!
//! Implemented by `tandem-client` over the hosted document store. Higher
//! layers (the session context, the view controllers) depend on this
//! abstraction, not on any concrete transport, so they can be tested against
//! an in-memory fake.

use std::future::Future;

use crate::{
  profile::{ProfileUpsert, UserProfile},
  thing::{NewThing, Thing},
};

/// Abstraction over the hosted record store.
///
/// All reads are point-in-time snapshots — there is no streaming; callers
/// must re-invoke a list operation to observe another actor's writes. Every
/// method can fail with a transport-level error; callers must not assume the
/// underlying write landed when a call errors.
///
/// All methods return `Send` futures so implementations can be driven from
/// spawned tokio tasks.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Things ────────────────────────────────────────────────────────────

  /// Insert a new thing in `planned` state. The store assigns the id and
  /// the creation timestamp; the acknowledgment carries only the id.
  fn create_thing(
    &self,
    input: &NewThing,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;

  /// All `planned` things, most recently created first.
  fn list_planned(
    &self,
  ) -> impl Future<Output = Result<Vec<Thing>, Self::Error>> + Send + '_;

  /// All `done` things, most recently completed first.
  fn list_done(
    &self,
  ) -> impl Future<Output = Result<Vec<Thing>, Self::Error>> + Send + '_;

  /// Retrieve a thing by id. Returns `None` if no such document exists.
  fn get_thing<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Thing>, Self::Error>> + Send + 'a;

  /// Transition a thing to `done`, stamping `done_at` with server time and
  /// setting `photo_url` only when one is provided.
  ///
  /// Repeat-call behavior is governed by the implementation's
  /// [`DonePolicy`](crate::thing::DonePolicy).
  fn mark_done<'a>(
    &'a self,
    id: &'a str,
    photo_url: Option<&'a str>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Retrieve a profile by uid. Returns `None` if none was provisioned.
  fn get_profile<'a>(
    &'a self,
    uid: &'a str,
  ) -> impl Future<Output = Result<Option<UserProfile>, Self::Error>> + Send + 'a;

  /// Merge profile fields into any existing document keyed on uid,
  /// preserving an existing `created_at`, and return the authoritative
  /// stored value (re-read after the write — the write acknowledgment does
  /// not carry server-resolved timestamps).
  fn upsert_profile<'a>(
    &'a self,
    input: &'a ProfileUpsert,
  ) -> impl Future<Output = Result<UserProfile, Self::Error>> + Send + 'a;
}
