//! Free-form JSON request bodies.

use mongodb::bson::{Bson, Document};
use serde::Deserialize;

/// Any JSON object; stored as given.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct DocumentBody(pub Document);

/// One element or an array of elements.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct ItemsBody(pub Bson);
