use crate::domain::model::{RawItem, Venue, VenueTable};
use serde_json::Value;
use std::collections::HashSet;

pub const UNKNOWN_PRICE: &str = "unknown";
pub const PRICE_SYMBOL: char = '$';
pub const MAX_PRICE_TIER: u64 = 4;

/// Placeholder rendered for an absent `city_state` component.
pub const MISSING_COMPONENT: &str = "None";

/// Cleans raw list items into the venue relation.
///
/// Items without a venue (or without a venue id) are dropped, duplicates keep
/// the first occurrence, and closed venues are removed after deduplication.
/// Never fails: unexpected shapes produce absent fields.
pub fn clean_venues(items: &[RawItem]) -> VenueTable {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    let mut dropped_closed = 0;

    for venue in items.iter().filter_map(|item| item.get("venue")) {
        let Some(id) = venue.get("id").and_then(Value::as_str) else {
            continue;
        };
        if !seen.insert(id.to_string()) {
            continue;
        }
        if is_closed(venue) {
            dropped_closed += 1;
            continue;
        }
        rows.push(venue_row(id, venue));
    }

    tracing::info!(
        "🔄 Cleaned {} raw items into {} venues ({} closed dropped)",
        items.len(),
        rows.len(),
        dropped_closed
    );
    VenueTable::from_rows(rows)
}

fn is_closed(venue: &Value) -> bool {
    venue.get("closed").and_then(Value::as_bool).unwrap_or(false)
}

fn venue_row(id: &str, venue: &Value) -> Venue {
    let location = venue.get("location").filter(|l| l.is_object());
    let text = |field: &str| {
        location
            .and_then(|l| l.get(field))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let number = |field: &str| location.and_then(|l| l.get(field)).and_then(Value::as_f64);

    let city = text("city");
    let state = text("state");
    let postal_code = text("postalCode");
    let city_state = format_city_state(city.as_deref(), state.as_deref(), postal_code.as_deref());

    Venue {
        id: id.to_string(),
        name: venue.get("name").and_then(Value::as_str).map(str::to_string),
        category: first_category(venue),
        price: price_symbol(venue.get("price")),
        rating: venue.get("rating").and_then(Value::as_f64),
        address: location.and_then(formatted_address),
        lat: number("lat"),
        lng: number("lng"),
        city,
        state,
        postal_code,
        city_state,
    }
}

fn first_category(venue: &Value) -> Option<String> {
    venue
        .get("categories")?
        .as_array()?
        .first()?
        .get("name")?
        .as_str()
        .map(str::to_string)
}

fn formatted_address(location: &Value) -> Option<String> {
    let lines: Vec<&str> = location
        .get("formattedAddress")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .collect();
    Some(lines.join("\n"))
}

/// `"$"` repeated per tier (capped at four), `unknown` without a positive tier.
pub fn price_symbol(price: Option<&Value>) -> String {
    match price.and_then(|p| p.get("tier")).and_then(Value::as_u64) {
        Some(tier) if tier > 0 => PRICE_SYMBOL
            .to_string()
            .repeat(tier.min(MAX_PRICE_TIER) as usize),
        _ => UNKNOWN_PRICE.to_string(),
    }
}

/// `"{city}, {state} {postal_code}"`, absent parts rendered as `None`.
pub fn format_city_state(city: Option<&str>, state: Option<&str>, postal_code: Option<&str>) -> String {
    format!(
        "{}, {} {}",
        city.unwrap_or(MISSING_COMPONENT),
        state.unwrap_or(MISSING_COMPONENT),
        postal_code.unwrap_or(MISSING_COMPONENT)
    )
}

/// Renders the relation as a CSV table, one row per venue.
pub fn venues_to_csv(venues: &VenueTable) -> crate::utils::error::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for venue in venues.iter() {
        writer.serialize(venue)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| crate::utils::error::RefileError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}
