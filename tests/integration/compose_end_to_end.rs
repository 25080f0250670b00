//! Byte-exact composition of a two-level library

use super::helpers::{composer, create_placeholder_library, strings, temp_root, write_file};

const TEMPLATE: &str = "name: template\nowner: ((owner))\n";
const EXPECTED: &str =
    "name: template\nowner: composer\nbasic: basic_from_placeholder\nfixed: placed\n";

#[test]
fn test_placeholder_scenario_composes_exactly() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_placeholder_library(root);
    let template = write_file(root, "template.yml", TEMPLATE);

    let composer = composer(&[library], root, false);
    let result = composer
        .compose(&template, &strings(&["placeholder"]), &[], &mut Vec::new())
        .unwrap();

    assert_eq!(result, EXPECTED);
}

#[test]
fn test_dependency_alone_uses_its_default() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_placeholder_library(root);

    let composer = composer(&[library], root, false);
    let result = composer
        .compose_document("name: template\n", &strings(&["basic"]), &[], &mut Vec::new())
        .unwrap();

    assert_eq!(result, "name: template\nbasic: basic_default\n");
}

#[test]
fn test_preview_and_diff_do_not_change_result() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_placeholder_library(root);

    let mut side_channel = Vec::new();
    let result = composer(&[library], root, true)
        .compose_document(TEMPLATE, &strings(&["placeholder"]), &[], &mut side_channel)
        .unwrap();
    assert_eq!(result, EXPECTED);

    let side_channel = String::from_utf8(side_channel).unwrap();
    assert!(side_channel.contains("# step 1/2"));
    assert!(side_channel.contains("# step 2/2"));
    assert!(side_channel.contains("snippet: snippets/basic.yml"));
    assert!(side_channel.contains("value2: basic_from_placeholder"));
    assert!(side_channel.contains("+fixed: placed"));
}

#[test]
fn test_no_scenarios_returns_template_bytes() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_placeholder_library(root);
    let template = "# untouched\nname:    template\n";

    let result = composer(&[library], root, true)
        .compose_document(template, &[], &[], &mut Vec::new())
        .unwrap();
    assert_eq!(result, template);
}

#[test]
fn test_scenarios_apply_in_request_order() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_placeholder_library(root);

    let result = composer(&[library], root, false)
        .compose_document(
            TEMPLATE,
            &strings(&["basic", "placeholder"]),
            &[],
            &mut Vec::new(),
        )
        .unwrap();

    // The second run of basic replaces the first value
    assert_eq!(result, EXPECTED);
}

#[test]
fn test_missing_snippet_aborts_composition() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_placeholder_library(root);
    std::fs::remove_file(root.join("snippets/basic.yml")).unwrap();

    let err = composer(&[library], root, false)
        .compose_document(TEMPLATE, &strings(&["placeholder"]), &[], &mut Vec::new())
        .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Step 1/2 (snippets/basic.yml) failed"));
    assert!(message.contains("basic.yml"));
}

#[test]
fn test_library_args_read_files_next_to_library() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    write_file(root, "libs/vars/owner.yml", "owner: from-args-file\n");
    write_file(
        root,
        "libs/owner.yml",
        "- type: replace\n  path: /owner\n  value: ((owner))\n",
    );
    let library = write_file(
        root,
        "libs/library.yml",
        r#"type: patch
scenarios:
  - name: owned
    snippets:
      - path: owner.yml
    params:
      args: ["-l", "vars/owner.yml"]
"#,
    );

    let result = composer(&[library], root, false)
        .compose_document(TEMPLATE, &strings(&["owned"]), &[], &mut Vec::new())
        .unwrap();
    assert_eq!(result, "name: template\nowner: from-args-file\n");
}
