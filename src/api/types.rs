use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed page size of the remote catalog. List endpoints never return more
/// than this many results per page.
pub const PAGE_SIZE: usize = 20;

/// Life status as reported by the catalog. The wire format capitalizes the
/// first two variants but not the third.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterStatus {
    #[serde(rename = "Alive")]
    Alive,
    #[serde(rename = "Dead")]
    Dead,
    #[serde(rename = "unknown")]
    Unknown,
}

impl fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterStatus::Alive => write!(f, "Alive"),
            CharacterStatus::Dead => write!(f, "Dead"),
            CharacterStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// A named reference to another catalog entity. The `url` encodes the
/// entity's integer id and can be resolved with a follow-up fetch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResourceRef {
    pub name: String,
    pub url: String,
}

/// One character as served by `/character`. Immutable once fetched; a new
/// fetch replaces rather than mutates a held value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub status: CharacterStatus,
    pub species: String,
    #[serde(default)]
    pub gender: Option<String>,
    pub origin: ResourceRef,
    pub location: ResourceRef,
    pub image: String,
    /// Ordered episode locators, each of the form `.../episode/<id>`.
    pub episode: Vec<String>,
    /// Creation timestamp, kept as the opaque string the API serves.
    #[serde(default)]
    pub created: String,
}

/// One episode as served by `/episode`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Episode {
    pub id: u32,
    pub name: String,
    /// Season/episode code, e.g. `S01E05`.
    pub episode: String,
    /// Air date, kept as the opaque string the API serves.
    pub air_date: String,
    #[serde(default)]
    pub characters: Vec<String>,
}

/// One location as served by `/location`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    pub id: u32,
    pub name: String,
    pub dimension: String,
    #[serde(default)]
    pub residents: Vec<String>,
}

/// Pagination block attached to every list response. `next` is `None`
/// exactly when the requested page is the last one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PageInfo {
    pub count: u32,
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// One page of list results.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub info: PageInfo,
    pub results: Vec<T>,
}
