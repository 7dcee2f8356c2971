use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One raw entry of a list page, kept schema-less until normalization.
pub type RawItem = serde_json::Value;

/// A cleaned, immutable venue row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: String,
    pub rating: Option<f64>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub city_state: String,
}

impl Venue {
    pub fn url(&self) -> String {
        venue_url(&self.id)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

pub fn venue_url(venue_id: &str) -> String {
    format!("https://www.foursquare.com/v/{}", venue_id)
}

/// The cleaned venue relation: one row per identifier, in fetch order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Venue>", into = "Vec<Venue>")]
pub struct VenueTable {
    rows: Vec<Venue>,
    index: HashMap<String, usize>,
}

impl From<Vec<Venue>> for VenueTable {
    fn from(rows: Vec<Venue>) -> Self {
        Self::from_rows(rows)
    }
}

impl From<VenueTable> for Vec<Venue> {
    fn from(table: VenueTable) -> Self {
        table.rows
    }
}

impl VenueTable {
    /// Later rows with an identifier already present are ignored.
    pub fn from_rows(rows: Vec<Venue>) -> Self {
        let mut table = Self::default();
        for venue in rows {
            table.insert(venue);
        }
        table
    }

    fn insert(&mut self, venue: Venue) -> bool {
        if self.index.contains_key(&venue.id) {
            return false;
        }
        self.index.insert(venue.id.clone(), self.rows.len());
        self.rows.push(venue);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Venue> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Venue> {
        self.rows.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|v| v.id.as_str())
    }

    /// Rows whose identifier is not in `handled`, order preserved.
    pub fn excluding(&self, handled: &BTreeSet<String>) -> Vec<Venue> {
        self.rows
            .iter()
            .filter(|v| !handled.contains(&v.id))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub venues: VenueTable,
    pub csv_output: String,
}

/// A list as returned by `users/{id}/lists`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserList {
    pub id: String,
    pub name: Option<String>,
}

/// A target for re-filing, from the destination-lists document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationList {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationLists {
    pub lists: Vec<DestinationList>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub user_id: String,
}
