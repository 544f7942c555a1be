//! Domain model and pure logic for FindIt, a lost-and-found listing service.
//!
//! Items, users and locations live here together with the feed query, the
//! profile view and the report workflow. Storage is reached only through the
//! [`store::ItemStore`] trait; [`memory::MemoryStore`] is the in-process
//! implementation. No HTTP or SQL code belongs in this crate.

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// trait signatures instead.
#![allow(async_fn_in_trait)]

pub mod age;
pub mod error;
pub mod feed;
pub mod item;
pub mod lookup;
pub mod memory;
pub mod profile;
pub mod report;
pub mod store;
pub mod user;

pub use error::{Error, Result};
