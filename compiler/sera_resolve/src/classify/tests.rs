use pretty_assertions::assert_eq;

use sera_model::{AttrValue, DefFlags, GenericMode, RawAttribute, TypeKind, Visibility};

use crate::test_helpers::{data_contract, data_serializer_attr, resolver, serializer_name, World};
use crate::{InfoFlags, MemberOutcome, ResolveError};

const DEFAULT: &str = "Default";

fn inherited(attribute: RawAttribute) -> RawAttribute {
    attribute.named("Inherited", AttrValue::Bool(true))
}

// ── Not classifiable ────────────────────────────────────────

#[test]
fn root_object_value_marker_and_parameters_are_skipped() {
    let mut w = World::new();
    let object = w.object;
    let value_type = w.model.find_type("System.ValueType").unwrap();
    let value_type = w.ty(value_type);
    let holder = w.declare(w.class("Holder").generic("T"));
    let t = w.param(holder, 0);
    let mut r = resolver(&mut w.model, &w.options);

    for ty in [object, value_type, t] {
        assert_eq!(r.classify(ty, false).unwrap(), None);
    }
}

#[test]
fn restricted_nested_types_are_skipped() {
    let mut w = World::new();
    let outer = w.opaque("Outer");
    let hidden = w.declare(
        w.class("Hidden")
            .nested_in(outer)
            .visibility(Visibility::Private)
            .attribute(data_contract()),
    );
    let hidden = w.ty(hidden);
    let shared = w.declare(
        w.class("Shared")
            .nested_in(outer)
            .visibility(Visibility::Internal)
            .attribute(data_contract()),
    );
    let shared = w.ty(shared);
    let mut r = resolver(&mut w.model, &w.options);

    assert_eq!(r.classify(hidden, false).unwrap(), None);
    assert!(r.classify(shared, false).unwrap().is_some());
}

// ── Enums and declared serializers ──────────────────────────

#[test]
fn enums_get_the_enum_serializer() {
    let mut w = World::new();
    let state = w.declare(w.class("State").kind(TypeKind::Enum).attribute(data_contract()));
    let state = w.ty(state);
    let mut r = resolver(&mut w.model, &w.options);

    let id = r.classify(state, false).unwrap().unwrap();
    assert_eq!(
        serializer_name(&r, id),
        "Sera.Serialization.Serializers.EnumSerializer<Game.State>"
    );
    assert!(!r.info(id).is_complex());
}

#[test]
fn declared_serializer_is_registered_as_is() {
    let mut w = World::new();
    let serializer = w.opaque("WeaponSerializer");
    let serializer = w.ty(serializer);
    let weapon = w.declare(
        w.class("Weapon")
            .attribute(data_serializer_attr(serializer, GenericMode::None)),
    );
    let weapon = w.ty(weapon);
    let mut r = resolver(&mut w.model, &w.options);

    let id = r.classify(weapon, false).unwrap().unwrap();
    let info = r.info(id);
    assert_eq!(info.serializer, Some(serializer));
    assert_eq!(info.mode, GenericMode::None);
    assert_eq!(info.flags, InfoFlags::LOCAL);
}

#[test]
fn type_mode_registers_template_and_closed_form() {
    let mut w = World::new();
    let serializer = w.serializer_template("TextureSerializer", 1);
    let serializer_ty = w.ty(serializer);
    let texture = w.declare(
        w.class("Texture")
            .attribute(data_serializer_attr(serializer_ty, GenericMode::Type)),
    );
    let texture = w.ty(texture);
    let mut r = resolver(&mut w.model, &w.options);

    let closed = r.classify(texture, false).unwrap().unwrap();
    let profile = r.store().default_profile();
    let template = profile.template(texture).unwrap();
    assert_eq!(profile.concrete(texture), Some(closed));
    assert_eq!(
        serializer_name(&r, closed),
        "Game.TextureSerializer<Game.Texture>"
    );
    assert_eq!(r.info(template).mode, GenericMode::Type);
    assert!(r.info(template).is_inherited());
    assert_eq!(r.resolve(texture, false, DEFAULT, true).unwrap(), Some(template));
}

#[test]
fn type_and_generic_arguments_mode_appends_arguments() {
    let mut w = World::new();
    let (int, string) = (w.int, w.string);
    let serializer = w.serializer_template("DictionarySerializer", 3);
    let serializer = w.ty(serializer);
    let dictionary = w.declare(
        w.class("Dictionary")
            .generic("K")
            .generic("V")
            .attribute(data_serializer_attr(
                serializer,
                GenericMode::TypeAndGenericArguments,
            )),
    );
    let closed = w.instance(dictionary, &[int, string]);
    let mut r = resolver(&mut w.model, &w.options);

    let id = r.resolve(closed, false, DEFAULT, false).unwrap().unwrap();
    assert_eq!(
        serializer_name(&r, id),
        "Game.DictionarySerializer<Game.Dictionary<System.Int32, System.String>, \
         System.Int32, System.String>"
    );
}

// ── Inheritance ─────────────────────────────────────────────

#[test]
fn inherited_contract_gives_derived_its_own_complex_serializer() {
    let mut w = World::new();
    let int = w.int;
    let entity = w.declare(w.class("Entity").attribute(inherited(data_contract())));
    w.field(entity, "Id", int);
    let entity_ty = w.ty(entity);
    let monster = w.declare(w.class("Monster").base(entity_ty));
    w.field(monster, "Hp", int);
    let monster = w.ty(monster);
    let mut r = resolver(&mut w.model, &w.options);

    let id = r.resolve(monster, false, DEFAULT, false).unwrap().unwrap();
    let base_id = r.resolve(entity_ty, false, DEFAULT, false).unwrap().unwrap();
    assert_ne!(id, base_id);
    assert_eq!(
        serializer_name(&r, id),
        "Sera.DataSerializers.Game_MonsterSerializer"
    );
    let info = r.info(id);
    assert!(info.is_complex() && info.is_inherited());
    assert!(info.flags.contains(InfoFlags::PROCESS_PARENT));
    assert_eq!(r.member_plan(monster).unwrap().len(), 1);
}

#[test]
fn contract_without_inherited_does_not_propagate() {
    let mut w = World::new();
    let entity = w.contract("Entity", &[]);
    let entity = w.ty(entity);
    let monster = w.declare(w.class("Monster").base(entity));
    let monster = w.ty(monster);
    let mut r = resolver(&mut w.model, &w.options);

    assert_eq!(r.resolve(monster, false, DEFAULT, false).unwrap(), None);
}

#[test]
fn type_mode_template_propagates_to_derived_types() {
    let mut w = World::new();
    let serializer = w.serializer_template("TextureSerializer", 1);
    let serializer = w.ty(serializer);
    let texture = w.declare(
        w.class("Texture")
            .attribute(data_serializer_attr(serializer, GenericMode::Type)),
    );
    let texture = w.ty(texture);
    let normal_map = w.declare(w.class("NormalMap").base(texture));
    let normal_map = w.ty(normal_map);
    let mut r = resolver(&mut w.model, &w.options);

    let id = r.resolve(normal_map, false, DEFAULT, false).unwrap().unwrap();
    assert_eq!(
        serializer_name(&r, id),
        "Game.TextureSerializer<Game.NormalMap>"
    );
    let template = r.store().default_profile().template(normal_map).unwrap();
    let template = r.info(template);
    assert_eq!(template.mode, GenericMode::Type);
    assert_eq!(template.inherited_from, Some(texture));
    assert!(template.is_inherited());
}

#[test]
fn type_and_generic_arguments_propagate_base_arguments() {
    let mut w = World::new();
    let (int, string) = (w.int, w.string);
    let serializer = w.serializer_template("DictionarySerializer", 3);
    let serializer = w.ty(serializer);
    let dictionary = w.declare(
        w.class("Dictionary")
            .generic("K")
            .generic("V")
            .attribute(inherited(data_serializer_attr(
                serializer,
                GenericMode::TypeAndGenericArguments,
            ))),
    );
    let base = w.instance(dictionary, &[string, int]);
    let inventory = w.declare(w.class("Inventory").base(base));
    let inventory = w.ty(inventory);
    let mut r = resolver(&mut w.model, &w.options);

    let id = r.resolve(inventory, false, DEFAULT, false).unwrap().unwrap();
    assert_eq!(
        serializer_name(&r, id),
        "Game.DictionarySerializer<Game.Inventory, System.String, System.Int32>"
    );
}

#[test]
fn placeholders_are_not_inherited() {
    let mut w = World::new();
    let shape = w.declare(w.class("Shape").flags(DefFlags::ABSTRACT));
    let shape = w.ty(shape);
    let circle = w.declare(w.class("Circle").base(shape));
    let circle = w.ty(circle);
    let mut r = resolver(&mut w.model, &w.options);

    let placeholder = r.resolve(shape, true, DEFAULT, false).unwrap().unwrap();
    assert!(r.info(placeholder).is_inherited());
    assert_eq!(r.resolve(circle, false, DEFAULT, false).unwrap(), None);
}

#[test]
fn forced_base_does_not_fail_derived_members() {
    let mut w = World::new();
    let shape = w.declare(w.class("Shape").flags(DefFlags::ABSTRACT));
    let shape = w.ty(shape);
    let circle = w.declare(w.class("Circle").base(shape));
    let circle = w.ty(circle);
    let canvas = w.contract("Canvas", &[("Outline", shape), ("Dot", circle)]);
    let canvas = w.ty(canvas);
    let mut r = resolver(&mut w.model, &w.options);

    r.resolve(canvas, false, DEFAULT, false).unwrap().unwrap();
    let placeholder = r.store().default_profile().concrete(shape).unwrap();
    let outcomes: Vec<MemberOutcome> = r
        .member_plan(canvas)
        .unwrap()
        .iter()
        .map(|m| m.outcome)
        .collect();
    assert_eq!(
        outcomes,
        vec![MemberOutcome::Resolved(placeholder), MemberOutcome::Ignored]
    );
    assert_eq!(r.warnings().len(), 1);
}

#[test]
fn inherited_plain_serializer_cannot_propagate() {
    let mut w = World::new();
    let serializer = w.opaque("WeaponSerializer");
    let serializer = w.ty(serializer);
    let weapon = w.declare(
        w.class("Weapon")
            .attribute(inherited(data_serializer_attr(serializer, GenericMode::None))),
    );
    let weapon = w.ty(weapon);
    let sword = w.declare(w.class("Sword").base(weapon));
    let sword = w.ty(sword);
    let mut r = resolver(&mut w.model, &w.options);

    let err = r.resolve(sword, false, DEFAULT, false).unwrap_err();
    assert!(
        matches!(
            &err,
            ResolveError::UnsupportedInheritance { ty, base, serializer, mode: "None" }
                if ty == "Game.Sword" && base == "Game.Weapon" && serializer == "Game.WeaponSerializer"
        ),
        "{err}"
    );
}
