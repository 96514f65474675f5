//! Item request and response types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Item submitted in a request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Item name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price.
    pub price: f64,
    /// Tax amount. Defaults to zero when omitted; an explicit `null` is kept.
    #[serde(default = "default_tax")]
    pub tax: Option<f64>,
}

fn default_tax() -> Option<f64> {
    Some(0.0)
}

impl Item {
    /// An item is on offer when it carries a positive tax.
    pub fn is_offer(&self) -> bool {
        self.tax.is_some_and(|tax| tax > 0.0)
    }
}

/// Typed response shape of `POST /items/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResponseItem {
    /// Item name.
    pub name: String,
    /// Unit price.
    pub price: f64,
    /// True exactly when the submitted tax was positive.
    #[serde(default)]
    pub is_offer: bool,
}

impl From<&Item> for ResponseItem {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price,
            is_offer: item.is_offer(),
        }
    }
}

/// Echo response shape of `POST /items/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemEcho {
    /// Item name.
    pub name: String,
    /// Unit price.
    pub price: f64,
}

impl From<&Item> for ItemEcho {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price,
        }
    }
}

/// Which response shape `POST /items/` produces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ItemsResponseMode {
    /// Reply with a [`ResponseItem`].
    #[default]
    Typed,
    /// Reply with an [`ItemEcho`].
    Echo,
}

/// Body returned by `POST /items/`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ItemReply {
    /// Typed variant.
    Typed(ResponseItem),
    /// Echo variant.
    Echo(ItemEcho),
}

impl ItemReply {
    /// Shape `item` according to `mode`.
    pub fn for_mode(mode: ItemsResponseMode, item: &Item) -> Self {
        match mode {
            ItemsResponseMode::Typed => ItemReply::Typed(item.into()),
            ItemsResponseMode::Echo => ItemReply::Echo(item.into()),
        }
    }
}
