use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;

fn taskflow(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("taskflow").unwrap();
    cmd.env_remove("TASKFLOW_DEBUG_LOG")
        .args(["--data-dir", dir.to_str().unwrap()]);
    cmd
}

fn run_ok(dir: &Path, args: &[&str]) -> Value {
    let output = taskflow(dir)
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    parse_json_output(&String::from_utf8_lossy(&output))
}

fn run_err(dir: &Path, args: &[&str]) -> Value {
    let output = taskflow(dir)
        .args(args)
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&output);
    let line = stderr
        .lines()
        .find(|line| line.starts_with('{'))
        .expect("no JSON error on stderr");
    parse_json_output(line)
}

fn parse_json_output(output: &str) -> Value {
    serde_json::from_str(output).expect("Failed to parse JSON output")
}

fn extract_id(json: &Value) -> String {
    json["data"]["id"].as_str().unwrap().to_string()
}

fn messages(json: &Value) -> Vec<String> {
    json["notifications"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|n| n["message"].as_str().unwrap().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Ids of the starter board's lists, in order.
fn starter_lists(dir: &Path) -> Vec<String> {
    let json = run_ok(dir, &["board", "get"]);
    json["data"]["lists"]
        .as_array()
        .unwrap()
        .iter()
        .map(|list| list["id"].as_str().unwrap().to_string())
        .collect()
}

mod first_run_tests {
    use super::*;

    #[test]
    fn test_view_seeds_starter_board() {
        let dir = tempdir().unwrap();

        let json = run_ok(dir.path(), &["view"]);

        assert!(json["success"].as_bool().unwrap());
        assert_eq!(json["data"]["active_project"]["title"], "My Project");
        assert_eq!(json["data"]["active_board"]["title"], "My First Board");
        let lists = json["data"]["active_board"]["lists"].as_array().unwrap();
        assert_eq!(lists.len(), 3);
        assert_eq!(lists[0]["cards"].as_array().unwrap().len(), 2);
        assert_eq!(json["data"]["labels"].as_array().unwrap().len(), 5);
        assert!(dir.path().join("projects.json").exists());
        assert!(dir.path().join("active-board-id.json").exists());
    }

    #[test]
    fn test_no_seed_starts_empty() {
        let dir = tempdir().unwrap();

        let json = run_ok(dir.path(), &["--no-seed", "project", "list"]);

        assert_eq!(json["data"]["count"], 0);
        assert!(!dir.path().join("projects.json").exists());
    }

    #[test]
    fn test_flat_layout_is_migrated() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("boards.json"),
            r#"[{"id":"board-1","title":"Roadmap","createdAt":"2024-03-01T10:00:00.000Z"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("lists-board-1.json"),
            r#"[{"id":"list-1","title":"Backlog","cards":[{"id":"card-1","title":"Ship it","description":"","labels":["Bug"]}]}]"#,
        )
        .unwrap();

        let json = run_ok(dir.path(), &["view"]);

        assert_eq!(json["data"]["active_project"]["title"], "My Boards");
        assert_eq!(json["data"]["active_board"]["title"], "Roadmap");
        let card = &json["data"]["active_board"]["lists"][0]["cards"][0];
        assert_eq!(card["title"], "Ship it");
        assert!(card["description"].is_null());
        assert!(dir.path().join("boards.json").exists());
    }
}

mod project_tests {
    use super::*;

    #[test]
    fn test_project_create_and_list() {
        let dir = tempdir().unwrap();

        let json = run_ok(dir.path(), &["project", "create", "--title", "Side project"]);
        assert_eq!(json["data"]["title"], "Side project");
        assert_eq!(messages(&json), vec!["New project created!"]);

        let json = run_ok(dir.path(), &["project", "list"]);
        assert_eq!(json["data"]["count"], 2);
        assert_eq!(json["data"]["items"][1]["title"], "Side project");
        assert_eq!(json["data"]["items"][1]["board_count"], 0);
    }

    #[test]
    fn test_project_create_rejects_blank_title() {
        let dir = tempdir().unwrap();

        let json = run_err(dir.path(), &["project", "create", "--title", "   "]);

        assert!(!json["success"].as_bool().unwrap());
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("Please enter a project title"));
        assert_eq!(messages(&json), vec!["Please enter a project title"]);
    }

    #[test]
    fn test_project_expand_toggles() {
        let dir = tempdir().unwrap();
        let project = extract_id(&run_ok(dir.path(), &["project", "create", "--title", "Other"]));

        let starter = run_ok(dir.path(), &["project", "list"])["data"]["items"][0]["id"]
            .as_str()
            .unwrap()
            .to_string();

        // Only the project holding the active board starts expanded
        let json = run_ok(dir.path(), &["project", "expand", "--id", &project]);
        assert_eq!(json["data"]["expanded"], true);

        let json = run_ok(dir.path(), &["project", "expand", "--id", &starter]);
        assert_eq!(json["data"]["expanded"], false);
    }

    #[test]
    fn test_project_delete_removes_boards() {
        let dir = tempdir().unwrap();
        let project = extract_id(&run_ok(dir.path(), &["project", "create", "--title", "Temp"]));
        run_ok(
            dir.path(),
            &["board", "create", "--project-id", &project, "--title", "Scratch"],
        );

        let json = run_ok(dir.path(), &["project", "delete", "--id", &project]);
        assert_eq!(json["data"]["deleted"], project.as_str());

        let json = run_ok(dir.path(), &["board", "list"]);
        assert_eq!(json["data"]["count"], 1);
        assert_eq!(json["data"]["items"][0]["title"], "My First Board");
    }

    #[test]
    fn test_project_delete_unknown_fails() {
        let dir = tempdir().unwrap();

        let json = run_err(dir.path(), &["project", "delete", "--id", "project-missing"]);

        assert!(json["error"].as_str().unwrap().contains("Not found"));
    }
}

mod board_tests {
    use super::*;

    fn starter_project(dir: &Path) -> String {
        let json = run_ok(dir, &["project", "list"]);
        json["data"]["items"][0]["id"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_board_create_does_not_activate() {
        let dir = tempdir().unwrap();
        let project = starter_project(dir.path());

        let json = run_ok(
            dir.path(),
            &["board", "create", "--project-id", &project, "--title", "Release"],
        );
        assert_eq!(json["data"]["title"], "Release");
        assert!(json["data"]["lists"].as_array().unwrap().is_empty());
        assert_eq!(messages(&json), vec!["New board created!"]);

        let json = run_ok(dir.path(), &["board", "get"]);
        assert_eq!(json["data"]["title"], "My First Board");
    }

    #[test]
    fn test_board_backgrounds_rotate() {
        let dir = tempdir().unwrap();
        let project = starter_project(dir.path());

        let first = run_ok(
            dir.path(),
            &["board", "create", "--project-id", &project, "--title", "A"],
        );
        let second = run_ok(
            dir.path(),
            &["board", "create", "--project-id", &project, "--title", "B"],
        );

        assert_ne!(first["data"]["background"], second["data"]["background"]);
    }

    #[test]
    fn test_board_activate_persists() {
        let dir = tempdir().unwrap();
        let project = starter_project(dir.path());
        let board = extract_id(&run_ok(
            dir.path(),
            &["board", "create", "--project-id", &project, "--title", "Release"],
        ));

        let json = run_ok(dir.path(), &["board", "activate", "--id", &board]);
        assert_eq!(json["data"]["board"]["id"], board.as_str());

        let json = run_ok(dir.path(), &["board", "get"]);
        assert_eq!(json["data"]["id"], board.as_str());

        let json = run_ok(dir.path(), &["board", "list", "--project-id", &project]);
        let active: Vec<&Value> = json["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|b| b["active"] == true)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0]["id"], board.as_str());
    }

    #[test]
    fn test_board_activate_unknown_fails() {
        let dir = tempdir().unwrap();

        run_err(dir.path(), &["board", "activate", "--id", "board-missing"]);

        let json = run_ok(dir.path(), &["board", "get"]);
        assert_eq!(json["data"]["title"], "My First Board");
    }

    #[test]
    fn test_deleting_active_board_falls_back() {
        let dir = tempdir().unwrap();
        let project = starter_project(dir.path());
        let starter = extract_id(&run_ok(dir.path(), &["board", "get"]));
        run_ok(
            dir.path(),
            &["board", "create", "--project-id", &project, "--title", "Next"],
        );

        let json = run_ok(dir.path(), &["board", "delete", "--id", &starter]);
        assert_eq!(messages(&json), vec!["Board deleted"]);

        let json = run_ok(dir.path(), &["board", "get"]);
        assert_eq!(json["data"]["title"], "Next");
    }

    #[test]
    fn test_board_list_marks_resolved_board_active() {
        let dir = tempdir().unwrap();
        let project = extract_id(&run_ok(
            dir.path(),
            &["--no-seed", "project", "create", "--title", "Fresh"],
        ));
        let board = extract_id(&run_ok(
            dir.path(),
            &["--no-seed", "board", "create", "--project-id", &project, "--title", "Only"],
        ));

        let json = run_ok(dir.path(), &["--no-seed", "board", "list"]);
        assert_eq!(json["data"]["items"][0]["id"], board.as_str());
        assert_eq!(json["data"]["items"][0]["active"], true);

        let json = run_ok(dir.path(), &["--no-seed", "board", "get"]);
        assert_eq!(json["data"]["id"], board.as_str());
    }

    #[test]
    fn test_board_get_without_boards_fails() {
        let dir = tempdir().unwrap();

        let json = run_err(dir.path(), &["--no-seed", "board", "get"]);

        assert!(json["error"].as_str().unwrap().contains("no active board"));
    }
}

mod list_tests {
    use super::*;

    #[test]
    fn test_list_create_appends() {
        let dir = tempdir().unwrap();
        let board = extract_id(&run_ok(dir.path(), &["board", "get"]));

        let json = run_ok(
            dir.path(),
            &["list", "create", "--board-id", &board, "--title", "Review"],
        );
        assert_eq!(json["data"]["title"], "Review");
        assert_eq!(messages(&json), vec!["New list added!"]);

        let lists = starter_lists(dir.path());
        assert_eq!(lists.len(), 4);
        assert_eq!(lists[3], extract_id(&json));
    }

    #[test]
    fn test_list_delete_cascades_to_cards() {
        let dir = tempdir().unwrap();
        let todo = starter_lists(dir.path())[0].clone();
        let card = run_ok(dir.path(), &["board", "get"])["data"]["lists"][0]["cards"][0]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let json = run_ok(dir.path(), &["list", "delete", "--id", &todo]);
        assert_eq!(messages(&json), vec!["List deleted"]);

        run_err(dir.path(), &["card", "get", "--id", &card]);
    }
}

mod card_tests {
    use super::*;

    #[test]
    fn test_card_create_with_labels() {
        let dir = tempdir().unwrap();
        let todo = starter_lists(dir.path())[0].clone();

        let json = run_ok(
            dir.path(),
            &[
                "card",
                "create",
                "--list-id",
                &todo,
                "--title",
                "  Write docs  ",
                "--description",
                "Usage section",
                "--labels",
                "UX,Design",
            ],
        );

        assert_eq!(json["data"]["title"], "Write docs");
        assert_eq!(json["data"]["list_id"], todo.as_str());
        assert_eq!(json["data"]["description"], "Usage section");
        let labels: Vec<&str> = json["data"]["labels"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["name"].as_str().unwrap())
            .collect();
        assert_eq!(labels, vec!["Design", "UX"]);
        assert_eq!(messages(&json), vec!["New card added!"]);
    }

    #[test]
    fn test_card_create_rejects_empty_title() {
        let dir = tempdir().unwrap();
        let todo = starter_lists(dir.path())[0].clone();

        let json = run_err(
            dir.path(),
            &["card", "create", "--list-id", &todo, "--title", ""],
        );

        assert_eq!(messages(&json), vec!["Please enter a card title"]);
    }

    #[test]
    fn test_card_update_and_clear_description() {
        let dir = tempdir().unwrap();
        let todo = starter_lists(dir.path())[0].clone();
        let card = extract_id(&run_ok(
            dir.path(),
            &[
                "card",
                "create",
                "--list-id",
                &todo,
                "--title",
                "Draft",
                "--description",
                "Old",
            ],
        ));

        let json = run_ok(
            dir.path(),
            &["card", "update", "--id", &card, "--title", "Final", "--clear-description"],
        );
        assert_eq!(json["data"]["title"], "Final");
        assert!(json["data"]["description"].is_null());
        assert_eq!(messages(&json), vec!["Card updated successfully"]);

        let json = run_err(dir.path(), &["card", "update", "--id", &card, "--title", " "]);
        assert_eq!(messages(&json), vec!["Card title cannot be empty"]);
    }

    #[test]
    fn test_card_move_between_lists() {
        let dir = tempdir().unwrap();
        let lists = starter_lists(dir.path());
        let card = extract_id(&run_ok(
            dir.path(),
            &["card", "create", "--list-id", &lists[0], "--title", "Mover"],
        ));

        let json = run_ok(dir.path(), &["card", "move", "--id", &card, "--list-id", &lists[2]]);
        assert_eq!(json["data"]["outcome"], "moved");
        assert_eq!(json["data"]["target_list_title"], "Done");
        assert_eq!(messages(&json), vec!["Card moved to Done"]);

        let json = run_ok(dir.path(), &["card", "get", "--id", &card]);
        assert_eq!(json["data"]["list_id"], lists[2].as_str());

        let board = run_ok(dir.path(), &["board", "get"]);
        let done_cards = board["data"]["lists"][2]["cards"].as_array().unwrap();
        assert_eq!(done_cards.last().unwrap()["id"], card.as_str());
    }

    #[test]
    fn test_card_move_to_same_list_is_noop() {
        let dir = tempdir().unwrap();
        let lists = starter_lists(dir.path());
        let before = run_ok(dir.path(), &["board", "get"]);
        let card = before["data"]["lists"][0]["cards"][0]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let json = run_ok(dir.path(), &["card", "move", "--id", &card, "--list-id", &lists[0]]);
        assert_eq!(json["data"]["outcome"], "same_list");
        assert!(messages(&json).is_empty());

        let after = run_ok(dir.path(), &["board", "get"]);
        assert_eq!(before["data"]["lists"], after["data"]["lists"]);
    }

    #[test]
    fn test_card_move_across_boards_fails() {
        let dir = tempdir().unwrap();
        let lists = starter_lists(dir.path());
        let project = run_ok(dir.path(), &["project", "list"])["data"]["items"][0]["id"]
            .as_str()
            .unwrap()
            .to_string();
        let other_board = extract_id(&run_ok(
            dir.path(),
            &["board", "create", "--project-id", &project, "--title", "Other"],
        ));
        let other_list = extract_id(&run_ok(
            dir.path(),
            &["list", "create", "--board-id", &other_board, "--title", "Inbox"],
        ));
        let card = extract_id(&run_ok(
            dir.path(),
            &["card", "create", "--list-id", &lists[0], "--title", "Stay"],
        ));

        let json = run_err(
            dir.path(),
            &["card", "move", "--id", &card, "--list-id", &other_list],
        );
        assert!(json["error"].as_str().unwrap().contains("Validation"));

        let json = run_ok(dir.path(), &["card", "get", "--id", &card]);
        assert_eq!(json["data"]["list_id"], lists[0].as_str());
    }

    #[test]
    fn test_card_toggle_label() {
        let dir = tempdir().unwrap();
        let todo = starter_lists(dir.path())[0].clone();
        let card = extract_id(&run_ok(
            dir.path(),
            &["card", "create", "--list-id", &todo, "--title", "Tag me"],
        ));

        let json = run_ok(
            dir.path(),
            &["card", "toggle-label", "--id", &card, "--label-id", "label-5"],
        );
        assert_eq!(json["data"]["assigned"], true);

        let json = run_ok(dir.path(), &["card", "get", "--id", &card]);
        assert_eq!(json["data"]["labels"][0]["name"], "Bug");

        let json = run_ok(
            dir.path(),
            &["card", "toggle-label", "--id", &card, "--label-id", "label-5"],
        );
        assert_eq!(json["data"]["assigned"], false);

        run_err(
            dir.path(),
            &["card", "toggle-label", "--id", &card, "--label-id", "label-99"],
        );
    }

    #[test]
    fn test_card_delete() {
        let dir = tempdir().unwrap();
        let todo = starter_lists(dir.path())[0].clone();
        let card = extract_id(&run_ok(
            dir.path(),
            &["card", "create", "--list-id", &todo, "--title", "Gone soon"],
        ));

        let json = run_ok(dir.path(), &["card", "delete", "--id", &card]);
        assert_eq!(json["data"]["deleted"], card.as_str());
        assert_eq!(messages(&json), vec!["Card deleted"]);

        run_err(dir.path(), &["card", "delete", "--id", &card]);
    }
}

mod misc_tests {
    use super::*;

    #[test]
    fn test_label_list() {
        let dir = tempdir().unwrap();

        let json = run_ok(dir.path(), &["label", "list"]);

        assert_eq!(json["data"]["count"], 5);
        assert_eq!(json["data"]["items"][0]["name"], "Design");
        assert_eq!(json["data"]["items"][4]["name"], "Bug");
    }

    #[test]
    fn test_completions_skip_data_dir() {
        let dir = tempdir().unwrap();

        taskflow(dir.path())
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("taskflow"));

        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        let dir = tempdir().unwrap();

        taskflow(dir.path())
            .args(["sprint", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unrecognized subcommand"));
    }

    #[test]
    fn test_envelope_on_disk() {
        let dir = tempdir().unwrap();
        run_ok(dir.path(), &["view"]);

        let raw = std::fs::read_to_string(dir.path().join("projects.json")).unwrap();
        let json = parse_json_output(&raw);

        assert_eq!(json["version"], 2);
        assert_eq!(json["metadata"]["format_version"], 2);
        assert_eq!(json["data"][0]["title"], "My Project");
    }
}
