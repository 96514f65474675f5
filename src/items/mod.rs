//! Item models accepted and returned by the item and product endpoints.
//!
//! This module handles:
//! - The `Item` request body
//! - Response shaping (`ResponseItem`, echo mapping)
//! - Selecting between the two `POST /items/` response variants

pub mod types;

pub use types::{Item, ItemEcho, ItemReply, ItemsResponseMode, ResponseItem};
