use pretty_assertions::assert_eq;

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

#[test]
fn defaults_need_only_an_input() {
    let options = parse_args(&args(&["game.json"])).unwrap();
    assert_eq!(options.input, PathBuf::from("game.json"));
    assert_eq!(options.format, OutputFormat::Text);
    assert_eq!(options.pass.platform, "Windows");
    assert!(options.pass.frozen_profiles.is_empty());
}

#[test]
fn flags_map_onto_pass_options() {
    let options = parse_args(&args(&[
        "--platform=Android",
        "--freeze=Fast",
        "--freeze=Fast",
        "--freeze=Content",
        "--system-prefix=Unity",
        "--key-container=Game.Key`1",
        "--format=json",
        "game.json",
    ]))
    .unwrap();

    assert_eq!(options.format, OutputFormat::Json);
    assert_eq!(options.pass.platform, "Android");
    assert_eq!(options.pass.frozen_profiles, vec!["Fast", "Content"]);
    assert!(options.pass.is_system_module("Unity.Engine"));
    assert!(options.pass.is_system_module("System"));
    assert_eq!(options.pass.key_containers.last().unwrap(), "Game.Key`1");
}

#[test]
fn usage_errors() {
    let cases: &[&[&str]] = &[
        &[],
        &["--format=xml", "game.json"],
        &["--verbose", "game.json"],
        &["game.json", "other.json"],
    ];
    for case in cases {
        let err = parse_args(&args(case)).unwrap_err();
        assert!(matches!(err, DriverError::Usage(_)), "{case:?}: {err}");
    }
}
