//! Core logic for resolving free-text location descriptions to buildings.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// The campus buildings a location can resolve to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Building {
    #[serde(rename = "Main Building")]
    Main,
    #[serde(rename = "Science Building")]
    Science,
    #[serde(rename = "North Building")]
    North,
    #[serde(rename = "South Building")]
    South,
    Library,
    Cafeteria,
    #[serde(rename = "Student Center")]
    StudentCenter,
    Gymnasium,
    Auditorium,
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Building::Main => "Main Building",
            Building::Science => "Science Building",
            Building::North => "North Building",
            Building::South => "South Building",
            Building::Library => "Library",
            Building::Cafeteria => "Cafeteria",
            Building::StudentCenter => "Student Center",
            Building::Gymnasium => "Gymnasium",
            Building::Auditorium => "Auditorium",
        };
        write!(f, "{}", name)
    }
}

/// A resolved location: the inferred building, plus the room token when the
/// input contained one (kept verbatim for display).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDescriptor {
    pub building: Building,
    pub room: Option<String>,
}

// Known locations, checked by substring in this order.
const KNOWN_LOCATIONS: &[(&str, Building)] = &[
    ("main entrance", Building::Main),
    ("entrance", Building::Main),
    ("library", Building::Library),
    ("cafeteria", Building::Cafeteria),
    ("science building", Building::Science),
    ("gym", Building::Gymnasium),
    ("auditorium", Building::Auditorium),
    ("student center", Building::StudentCenter),
];

fn room_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?:room\s*)?([A-Za-z]?-?\d{3,4})").expect("room pattern is valid")
    })
}

/// Extracts a room token (e.g. "201", "N-123") and infers its building.
///
/// The token keeps the case it had in the input. Letter prefixes map to the
/// North/South buildings; bare numbers map by range (100-199 Main, 200-299
/// Science); anything else lands in the Main Building.
pub(crate) fn extract_room(text: &str) -> Option<(Building, String)> {
    let captures = room_pattern().captures(text)?;
    let token = captures[1].to_string();

    let building = match token.chars().next() {
        Some('n' | 'N') => Building::North,
        Some('s' | 'S') => Building::South,
        _ => match token.parse::<i32>() {
            Ok(number) if (100..200).contains(&number) => Building::Main,
            // Rooms 2xx and 3xx are both in the Science Building.
            Ok(number) if (200..400).contains(&number) => Building::Science,
            _ => Building::Main,
        },
    };

    Some((building, token))
}

/// Maps an arbitrary location description to a building.
///
/// Total over all inputs: a room token wins over any keyword, then the known
/// location table, then loose keyword fallbacks, and finally the Main
/// Building as the default.
pub fn resolve(text: &str) -> LocationDescriptor {
    let trimmed = text.trim();

    if let Some((building, room)) = extract_room(trimmed) {
        return LocationDescriptor {
            building,
            room: Some(room),
        };
    }

    let normalized = trimmed.to_lowercase();

    for (key, building) in KNOWN_LOCATIONS {
        if normalized.contains(key) {
            return LocationDescriptor {
                building: *building,
                room: None,
            };
        }
    }

    let building = if normalized.contains("science") || normalized.contains("lab") {
        Building::Science
    } else if normalized.contains("north") || normalized.contains("n-") {
        Building::North
    } else if normalized.contains("south") || normalized.contains("s-") {
        Building::South
    } else {
        Building::Main
    };

    LocationDescriptor {
        building,
        room: None,
    }
}

/// Whether the text names something the campus data knows about.
pub fn is_recognized(text: &str) -> bool {
    let trimmed = text.trim();
    let normalized = trimmed.to_lowercase();

    extract_room(trimmed).is_some()
        || KNOWN_LOCATIONS
            .iter()
            .any(|(key, _)| normalized.contains(key))
        || normalized.contains("building")
        || normalized.contains("room")
}
