//! Core logic for turning a building pair into walkable directions.

use serde::{Deserialize, Serialize};

use crate::resolver::{self, Building};

/// A single human-readable direction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NavigationStep {
    pub instruction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn step(instruction: impl Into<String>, details: impl Into<String>) -> NavigationStep {
    NavigationStep {
        instruction: instruction.into(),
        details: Some(details.into()),
    }
}

/// Produces the ordered direction steps from one building to another.
///
/// Curated scripts exist for a handful of directed pairs; everything else
/// gets the generic exit/walk/enter script. The table is intentionally not
/// symmetric. A final step pointing at the concrete destination is always
/// appended, so the result never has fewer than two steps across buildings.
pub fn synthesize(from: Building, to: Building, destination: &str) -> Vec<NavigationStep> {
    let mut steps = Vec::new();

    if from == to {
        steps.push(step(
            format!("You're already in the {}", to),
            "Look for room signs or ask for directions to your specific room.",
        ));
    } else {
        match (from, to) {
            (Building::Main, Building::Science) => {
                steps.push(step(
                    "Exit the Main Building through the east exit",
                    "Head towards the main hallway on the first floor",
                ));
                steps.push(step(
                    "Walk straight across the courtyard",
                    "The Science Building will be directly ahead",
                ));
                steps.push(step(
                    "Enter the Science Building through the main entrance",
                    "Look for the building labeled \"Science\"",
                ));
            }
            (Building::Main, Building::North) => {
                steps.push(step(
                    "Exit the Main Building through the north exit",
                    "Head towards the north side of the building",
                ));
                steps.push(step(
                    "Cross the walkway to the North Building",
                    "Follow the covered walkway",
                ));
                steps.push(step(
                    "Enter the North Building",
                    "The entrance will be on your right",
                ));
            }
            (Building::Main, Building::South) => {
                steps.push(step(
                    "Exit the Main Building through the south exit",
                    "Head towards the south side of the building",
                ));
                steps.push(step(
                    "Cross the walkway to the South Building",
                    "Follow the covered walkway",
                ));
                steps.push(step(
                    "Enter the South Building",
                    "The entrance will be on your left",
                ));
            }
            (Building::Science, Building::Main) => {
                steps.push(step(
                    "Exit the Science Building through the main entrance",
                    "Head towards the west side of the building",
                ));
                steps.push(step(
                    "Walk straight across the courtyard",
                    "The Main Building will be directly ahead",
                ));
                steps.push(step(
                    "Enter the Main Building through the east entrance",
                    "Look for the main entrance doors",
                ));
            }
            _ => {
                steps.push(step(
                    format!("Exit the {}", from),
                    "Head towards the main exit",
                ));
                steps.push(step(
                    format!("Walk to the {}", to),
                    "Follow the campus pathways and signs",
                ));
                steps.push(step(
                    format!("Enter the {}", to),
                    "Look for the main entrance",
                ));
            }
        }
    }

    if let Some((_, room)) = resolver::extract_room(destination) {
        steps.push(step(
            format!("Find Room {}", room),
            format!(
                "Check the room numbers on each floor. Room {} should be clearly marked.",
                room
            ),
        ));
    } else {
        steps.push(step(
            format!("Locate your destination: {}", destination),
            "Look for signs or ask for directions if needed",
        ));
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_building_is_a_single_step_plus_destination() {
        let steps = synthesize(Building::Library, Building::Library, "the library");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].instruction, "You're already in the Library");
        assert_eq!(
            steps[1].instruction,
            "Locate your destination: the library"
        );
    }

    #[test]
    fn curated_script_main_to_science() {
        let steps = synthesize(Building::Main, Building::Science, "Room 305");
        assert_eq!(steps.len(), 4);
        assert_eq!(
            steps[0].instruction,
            "Exit the Main Building through the east exit"
        );
        assert_eq!(steps[1].instruction, "Walk straight across the courtyard");
        assert_eq!(
            steps[2].instruction,
            "Enter the Science Building through the main entrance"
        );
        assert_eq!(steps[3].instruction, "Find Room 305");
    }

    #[test]
    fn curated_table_is_directional() {
        // Science -> Main is curated; North -> Main is not and falls back to
        // the generic script.
        let curated = synthesize(Building::Science, Building::Main, "entrance");
        assert_eq!(
            curated[0].instruction,
            "Exit the Science Building through the main entrance"
        );

        let generic = synthesize(Building::North, Building::Main, "entrance");
        assert_eq!(generic[0].instruction, "Exit the North Building");
        assert_eq!(generic[1].instruction, "Walk to the Main Building");
        assert_eq!(generic[2].instruction, "Enter the Main Building");
    }

    #[test]
    fn room_token_in_destination_becomes_find_room_step() {
        let steps = synthesize(Building::Main, Building::North, "N-201");
        let last = steps.last().unwrap();
        assert_eq!(last.instruction, "Find Room N-201");
        assert!(last.details.as_deref().unwrap().contains("N-201"));
    }

    #[test]
    fn destination_text_is_kept_verbatim() {
        let steps = synthesize(Building::Main, Building::Cafeteria, "the Cafeteria");
        assert_eq!(
            steps.last().unwrap().instruction,
            "Locate your destination: the Cafeteria"
        );
    }
}
