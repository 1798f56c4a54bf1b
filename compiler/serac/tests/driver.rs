// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end driver tests over `fixtures/game.json`.
//!
//! The fixture has a `Game` module with a generic `Foo<T>` contract and a
//! `Player` contract exercising primitives, a `List<String>`, an array, a
//! closed `Foo<Int32>` and two non-serializable members; `Sera.Core` with the
//! serializer bases, `List<T>` and primitive registrations; and `mscorlib`.

use std::error::Error;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use sera_resolve::{PassOptions, ResolveError};
use serac::render::render_text;
use serac::{process, run, DriverError, DriverOptions, OutputFormat};

const FIXTURE: &str = include_str!("fixtures/game.json");

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/game.json")
}

#[test]
fn fixture_registrations() {
    let manifest = process(FIXTURE, &PassOptions::default()).unwrap();

    let default = &manifest.profiles[0];
    let concrete: Vec<&str> = default.concrete.iter().map(|e| e.data_type.as_str()).collect();
    assert_eq!(
        concrete,
        vec![
            "Game.Foo<System.Int32>",
            "Game.Player",
            "Sera.Collections.List<System.String>",
            "System.Int32[]",
        ]
    );
    let templates: Vec<&str> = default.templates.iter().map(|e| e.data_type.as_str()).collect();
    assert_eq!(templates, vec!["Game.Foo<T>", "Sera.Collections.List<T>"]);
    assert_eq!(manifest.referenced_modules, vec!["Sera.Core".to_string()]);
    assert_eq!(manifest.imports, vec!["System.String".to_string()]);
    assert!(manifest.warnings.is_empty());
}

#[test]
fn fixture_member_plans() {
    let manifest = process(FIXTURE, &PassOptions::default()).unwrap();

    let complex: Vec<&str> = manifest.complex.iter().map(|p| p.data_type.as_str()).collect();
    assert_eq!(complex, vec!["Game.Foo<T>", "Game.Player"]);

    let player = &manifest.complex[1];
    let members: Vec<(&str, Option<&str>)> = player
        .members
        .iter()
        .map(|m| (m.name.as_str(), m.serializer.as_deref()))
        .collect();
    assert_eq!(
        members,
        vec![
            ("Health", Some("Sera.Serialization.Serializers.Int32Serializer")),
            ("Name", Some("Sera.Serialization.Serializers.StringSerializer")),
            ("Tags", Some("Sera.Collections.ListSerializer<System.String>")),
            ("Scores", Some("Sera.Serialization.Serializers.ArraySerializer<System.Int32>")),
            ("Inventory", Some("Sera.DataSerializers.Game_FooSerializer<System.Int32>")),
        ]
    );

    let instances: Vec<&str> = manifest
        .instantiations
        .iter()
        .map(|p| p.data_type.as_str())
        .collect();
    assert_eq!(instances, vec!["Game.Foo<System.Int32>"]);
}

#[test]
fn text_output() {
    let manifest = process(FIXTURE, &PassOptions::default()).unwrap();
    let text = render_text(&manifest);

    for line in [
        "platform Windows",
        "profile Default",
        "  Game.Player => Sera.DataSerializers.Game_PlayerSerializer [LOCAL, COMPLEX]",
        "  template Sera.Collections.List<T> => Sera.Collections.ListSerializer<T> (GenericArguments) [LOCAL]",
        "complex Game.Foo<T> => Sera.DataSerializers.Game_FooSerializer<T>",
        "  Payload: T (deferred)",
        "instance Game.Foo<System.Int32> => Sera.DataSerializers.Game_FooSerializer<System.Int32>",
        "alias PlayerData = Game.Player",
        "referenced Sera.Core",
        "import System.String",
    ] {
        assert!(text.lines().any(|l| l == line), "missing `{line}` in:\n{text}");
    }
}

#[test]
fn json_output_with_frozen_profile() {
    let options = DriverOptions {
        input: fixture_path(),
        format: OutputFormat::Json,
        pass: PassOptions {
            frozen_profiles: vec!["Fast".to_string()],
            platform: "Android".to_string(),
            ..PassOptions::default()
        },
    };
    let output = run(&options).unwrap();
    let value: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["platform"], "Android");
    assert_eq!(value["profiles"][0]["name"], "Default");
    assert_eq!(value["profiles"][1], json!({
        "name": "Fast",
        "frozen": true,
        "concrete": [],
        "templates": [],
    }));
    assert_eq!(value["aliases"][0]["alias"], "PlayerData");
    assert_eq!(value["complex"][1]["members"][2]["outcome"], "resolved");
}

#[test]
fn output_is_deterministic() {
    let first = process(FIXTURE, &PassOptions::default()).unwrap();
    let second = process(FIXTURE, &PassOptions::default()).unwrap();
    assert_eq!(render_text(&first), render_text(&second));
    assert_eq!(first.fingerprint, second.fingerprint);
}

// ── Failures ────────────────────────────────────────────────

#[test]
fn missing_input_is_a_read_error() {
    let options = DriverOptions {
        input: PathBuf::from("does/not/exist.json"),
        format: OutputFormat::Text,
        pass: PassOptions::default(),
    };
    let err = run(&options).unwrap_err();
    assert!(matches!(err, DriverError::Read { .. }), "{err}");
    assert!(err.source().is_some());
}

#[test]
fn pass_errors_keep_their_cause() {
    let mut description: Value = serde_json::from_str(FIXTURE).unwrap();
    let game = &mut description["modules"][0];
    game["types"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "namespace": "Game", "name": "Opaque" }));
    game["attributes"] = json!([{
        "name": "DataSerializerGlobal",
        "args": [null, { "type": "Game.Opaque" }],
    }]);

    let err = process(&description.to_string(), &PassOptions::default()).unwrap_err();
    assert!(
        matches!(&err, DriverError::Resolve(ResolveError::Unresolved { ty, .. }) if ty == "Game.Opaque"),
        "{err}"
    );
    assert_eq!(
        err.source().unwrap().to_string(),
        "could not find a serializer for `Game.Opaque` (registered in profile `Default`)"
    );
}

#[test]
fn malformed_description_is_a_load_error() {
    let err = process("{ \"current\": ", &PassOptions::default()).unwrap_err();
    assert!(matches!(err, DriverError::Load(_)), "{err}");
}
