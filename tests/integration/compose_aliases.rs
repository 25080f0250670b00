//! Composition across aliased and multiple top-level libraries

use super::helpers::{composer, create_aliased_libraries, strings, temp_root, write_file};

const TEMPLATE: &str = "metadata:\n  name: app\n";

#[test]
fn test_aliased_scenario_from_top_level() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_aliased_libraries(root);

    let result = composer(&[library], root, false)
        .compose_document(TEMPLATE, &strings(&["shared.labels"]), &[], &mut Vec::new())
        .unwrap();

    assert_eq!(result, "metadata:\n  name: app\n  labels:\n    team: core\n");
}

#[test]
fn test_dependency_through_alias_mixes_processors() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_aliased_libraries(root);

    let result = composer(&[library], root, false)
        .compose_document(TEMPLATE, &strings(&["app"]), &[], &mut Vec::new())
        .unwrap();

    assert_eq!(
        result,
        "metadata:\n  name: app\n  labels:\n    team: platform\nkind: Deployment\n"
    );
}

#[test]
fn test_unknown_alias_names_original_scenario() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_aliased_libraries(root);

    let err = composer(&[library], root, false)
        .compose_document(TEMPLATE, &strings(&["nope.labels"]), &[], &mut Vec::new())
        .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("library alias 'nope' not found"));
    assert!(message.contains("'nope.labels'"));
}

#[test]
fn test_first_top_level_library_wins() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    write_file(
        root,
        "set.yml",
        "- type: replace\n  path: /from?\n  value: ((from))\n",
    );
    let first = write_file(
        root,
        "first.yml",
        "type: patch\nscenarios:\n  - name: common\n    snippets:\n      - path: set.yml\n    params:\n      vars:\n        from: first\n",
    );
    let second = write_file(
        root,
        "second.yml",
        "type: patch\nscenarios:\n  - name: common\n    snippets:\n      - path: set.yml\n    params:\n      vars:\n        from: second\n  - name: only-second\n    snippets:\n      - path: set.yml\n    params:\n      vars:\n        from: only-second\n",
    );

    let composer = composer(&[first, second], root, false);
    let common = composer
        .compose_document("a: 1\n", &strings(&["common"]), &[], &mut Vec::new())
        .unwrap();
    assert_eq!(common, "a: 1\nfrom: first\n");

    let fallback = composer
        .compose_document("a: 1\n", &strings(&["only-second"]), &[], &mut Vec::new())
        .unwrap();
    assert_eq!(fallback, "a: 1\nfrom: only-second\n");
}

#[test]
fn test_shared_library_loaded_once() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_aliased_libraries(root);
    let shared = root.join("shared/library.yml");

    let composer = composer(&[library, shared], root, false);
    assert_eq!(composer.store().len(), 2);
}
