//! Data types for album rows.

use serde::{Deserialize, Serialize};

use crate::schema::SEED_ALBUMS;

/// An album row. Missing JSON fields fall back to their zero values;
/// no further validation is applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub price: f64,
}

impl Album {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            price,
        }
    }

    /// The fixed catalogue used to seed an empty table.
    pub fn seed_set() -> Vec<Album> {
        SEED_ALBUMS
            .iter()
            .map(|&(id, title, artist, price)| Album::new(id, title, artist, price))
            .collect()
    }
}
