//! Route planning: resolve both endpoints, synthesize steps, estimate cost.

use serde::{Deserialize, Serialize};

use crate::resolver::{resolve, Building};
use crate::steps::{synthesize, NavigationStep};

/// A complete route between two described locations.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationRoute {
    pub steps: Vec<NavigationStep>,
    pub estimated_time: String,
    pub distance: String,
    /// The resolved [from, to] building pair.
    pub buildings: [Building; 2],
}

/// Rough walking estimate: two minutes per step, plus three minutes when a
/// building change is involved. The distance label is a fixed placeholder,
/// not derived from geometry.
pub fn estimate(step_count: usize, same_building: bool) -> (String, String) {
    let minutes = step_count * 2 + if same_building { 0 } else { 3 };
    let distance = if same_building {
        "Same building"
    } else {
        "~200-500 meters between buildings"
    };
    (format!("{} min", minutes), distance.to_string())
}

/// Plans a route between two free-text locations.
///
/// Pure and deterministic: identical inputs always produce an identical
/// route, which is what makes this side of the product trivially testable.
pub fn plan(current_location: &str, destination: &str) -> NavigationRoute {
    let from = resolve(current_location).building;
    let to = resolve(destination).building;

    let steps = synthesize(from, to, destination);
    let (estimated_time, distance) = estimate(steps.len(), from == to);

    NavigationRoute {
        steps,
        estimated_time,
        distance,
        buildings: [from, to],
    }
}
