//! Command-line passthrough arguments

use serial_test::serial;

use super::helpers::{composer, create_placeholder_library, strings, temp_root, write_file};

const TEMPLATE: &str = "name: template\nowner: ((owner))\n";

#[test]
fn test_passthrough_var_overrides_library_global() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_placeholder_library(root);

    let result = composer(&[library], root, false)
        .compose_document(
            TEMPLATE,
            &strings(&["placeholder"]),
            &strings(&["--var=owner=cli"]),
            &mut Vec::new(),
        )
        .unwrap();

    assert_eq!(
        result,
        "name: template\nowner: cli\nbasic: basic_from_placeholder\nfixed: placed\n"
    );
}

#[test]
fn test_ops_file_applied_after_scenarios() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_placeholder_library(root);
    write_file(
        root,
        "ops/extra.yml",
        "- type: replace\n  path: /basic\n  value: ((extra))\n- type: remove\n  path: /fixed\n",
    );

    let result = composer(&[library], root, false)
        .compose_document(
            TEMPLATE,
            &strings(&["placeholder"]),
            &strings(&["-o", "ops/extra.yml", "-v", "extra=from_ops"]),
            &mut Vec::new(),
        )
        .unwrap();

    assert_eq!(result, "name: template\nowner: composer\nbasic: from_ops\n");
}

#[test]
fn test_passthrough_only_without_scenarios() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_placeholder_library(root);
    write_file(root, "vars.yml", "owner: from-file\n");

    let result = composer(&[library], root, false)
        .compose_document(
            TEMPLATE,
            &[],
            &strings(&["-l", &root.join("vars.yml").display().to_string()]),
            &mut Vec::new(),
        )
        .unwrap();

    assert_eq!(result, "name: template\nowner: from-file\n");
}

#[test]
#[serial]
fn test_vars_env_prefix() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_placeholder_library(root);
    std::env::set_var("YCOMPOSE_IT_owner", "from-env");

    let result = composer(&[library], root, false).compose_document(
        TEMPLATE,
        &[],
        &strings(&["--vars-env", "YCOMPOSE_IT"]),
        &mut Vec::new(),
    );
    std::env::remove_var("YCOMPOSE_IT_owner");

    assert_eq!(result.unwrap(), "name: template\nowner: from-env\n");
}

#[test]
fn test_unknown_flag_is_rejected() {
    let temp_dir = temp_root();
    let root = temp_dir.path();
    let library = create_placeholder_library(root);

    let err = composer(&[library], root, false)
        .compose_document(TEMPLATE, &[], &strings(&["--nope"]), &mut Vec::new())
        .unwrap_err();
    assert!(format!("{err:#}").contains("unknown passthrough flag '--nope'"));
}
