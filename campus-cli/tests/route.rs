use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn route_prints_the_curated_script_with_estimates() {
    Command::cargo_bin("campus")
        .unwrap()
        .args(["route", "Main entrance", "Room 305"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Exit the Main Building through the east exit",
        ))
        .stdout(predicate::str::contains("Find Room 305"))
        .stdout(predicate::str::contains("11 min"))
        .stdout(predicate::str::contains("~200-500 meters between buildings"));
}

#[test]
fn route_same_building() {
    Command::cargo_bin("campus")
        .unwrap()
        .args(["route", "library", "the library"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You're already in the Library"))
        .stdout(predicate::str::contains("Same building"));
}

#[test]
fn route_json_output_is_machine_readable() {
    let output = Command::cargo_bin("campus")
        .unwrap()
        .args(["route", "--json", "Main entrance", "Room 305"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let route: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(route["estimatedTime"], "11 min");
    assert_eq!(route["buildings"][0], "Main Building");
    assert_eq!(route["buildings"][1], "Science Building");
    assert_eq!(route["steps"].as_array().unwrap().len(), 4);
}
