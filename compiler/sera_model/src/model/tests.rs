use pretty_assertions::assert_eq;

use super::*;
use crate::{AttrValue, GenericMode, MemberKind, TypeDefBuilder, TypeKind, Visibility};

fn sample() -> (Model, DefId, DefId, DefId) {
    let mut model = Model::new("Game");
    let module = model.current_module();
    let int = TypeDefBuilder::new("System", "Int32", module)
        .kind(TypeKind::Struct)
        .declare(&mut model)
        .unwrap();
    let list = TypeDefBuilder::new("Game", "List", module)
        .generic("T")
        .declare(&mut model)
        .unwrap();
    let holder = TypeDefBuilder::new("Game", "Holder", module)
        .generic("T")
        .declare(&mut model)
        .unwrap();
    (model, int, list, holder)
}

// ── Definitions ─────────────────────────────────────────────

#[test]
fn define_indexes_by_full_name() {
    let (model, _, list, _) = sample();
    assert_eq!(model.find_type("Game.List`1"), Some(list));
    assert_eq!(model.find_type("Game.List"), None);
    assert_eq!(model.find_type_in(model.current_module(), "Game.List`1"), Some(list));
}

#[test]
fn duplicate_names_in_one_module_are_rejected() {
    let (mut model, _, _, _) = sample();
    let module = model.current_module();
    let err = TypeDefBuilder::new("System", "Int32", module)
        .declare(&mut model)
        .unwrap_err();
    assert_eq!(
        err,
        ModelError::DuplicateType {
            name: "System.Int32".to_owned(),
            module: "Game".to_owned()
        }
    );
}

#[test]
fn same_name_in_two_modules_is_allowed() {
    let (mut model, int, _, _) = sample();
    let other = model.add_module("Other").unwrap();
    let copy = TypeDefBuilder::new("System", "Int32", other)
        .declare(&mut model)
        .unwrap();
    assert_eq!(model.find_type("System.Int32"), Some(int));
    assert_eq!(model.find_type_in(other, "System.Int32"), Some(copy));
}

#[test]
fn nested_types_hang_off_their_parent() {
    let mut model = Model::new("Game");
    let module = model.current_module();
    let outer = TypeDefBuilder::new("Game", "Outer", module)
        .declare(&mut model)
        .unwrap();
    let inner = TypeDefBuilder::new("Game", "Inner", module)
        .nested_in(outer)
        .declare(&mut model)
        .unwrap();
    let after = TypeDefBuilder::new("Game", "After", module)
        .declare(&mut model)
        .unwrap();

    assert_eq!(model.module(module).types, vec![outer, after]);
    assert_eq!(model.all_types_of(module), vec![outer, inner, after]);
    assert_eq!(model.find_type("Game.Outer/Inner"), Some(inner));
}

#[test]
fn modules_and_references() {
    let mut model = Model::new("Game");
    let core = model.add_module("Core").unwrap();
    let current = model.current_module();
    model.add_reference(current, core);
    model.add_reference(current, core);
    assert_eq!(model.module(current).references, vec![core]);
    assert_eq!(model.module_by_name("Core"), Some(core));
    assert_eq!(model.module_by_name("Nope"), None);
    assert_eq!(model.module_ids().count(), 2);
}

#[test]
fn attributes_are_lowered_on_declare() {
    let mut model = Model::new("Game");
    let module = model.current_module();
    let serializer = TypeDefBuilder::new("Game", "ListSerializer", module)
        .generic("T")
        .declare(&mut model)
        .unwrap();
    let serializer_ref = model.def_ref(serializer);
    let list = TypeDefBuilder::new("Game", "List", module)
        .generic("T")
        .attribute(
            RawAttribute::new("DataSerializerAttribute")
                .arg(AttrValue::Type(serializer_ref))
                .named("Mode", AttrValue::Mode(GenericMode::Type)),
        )
        .declare(&mut model)
        .unwrap();
    let list_ref = model.def_ref(list);
    assert_eq!(
        model.attributes(list_ref),
        &[Attribute::DataSerializer {
            serializer: serializer_ref,
            mode: GenericMode::Type,
            inherited: None,
        }]
    );
}

// ── Types ───────────────────────────────────────────────────

#[test]
fn openness() {
    let (mut model, int, list, _) = sample();
    let int_ref = model.def_ref(int);
    let list_def = model.def_ref(list);
    let t = model.param(list, 0);
    let list_t = model.instance(list, &[t]);
    let list_int = model.instance(list, &[int_ref]);

    assert!(!model.is_open(int_ref));
    assert!(model.is_open(list_def));
    assert!(model.is_open(t));
    assert!(model.is_open(list_t));
    assert!(!model.is_open(list_int));
    assert!(model.is_generic_param(t));
}

#[test]
fn contains_walks_arguments_and_elements() {
    let (mut model, int, list, holder) = sample();
    let int_ref = model.def_ref(int);
    let list_int = model.instance(list, &[int_ref]);
    let arr = model.array(list_int);
    let nested = model.instance(holder, &[arr]);

    assert!(model.contains(nested, int_ref));
    assert!(model.contains(nested, list_int));
    assert!(model.contains(nested, nested));
    let holder_ref = model.def_ref(holder);
    assert!(!model.contains(nested, holder_ref));
}

#[test]
fn substitution_closes_members_and_base() {
    let (mut model, int, list, holder) = sample();
    let t = model.param(holder, 0);
    let list_t = model.instance(list, &[t]);
    model.set_base(holder, list_t);
    model.add_member(holder, Member::field("Items", list_t));
    model.add_member(holder, Member::field("First", t));
    model.add_member(holder, Member::field("Hidden", t).with_visibility(Visibility::Private));
    model.add_member(holder, Member::property("Count", t).read_only());

    let int_ref = model.def_ref(int);
    let holder_int = model.instance(holder, &[int_ref]);
    let list_int = model.instance(list, &[int_ref]);

    assert_eq!(model.base_type(holder_int), Some(list_int));
    let members = model.serializable_members(holder_int);
    let types: Vec<TypeRef> = members.iter().map(|&(_, ty)| ty).collect();
    assert_eq!(types, vec![list_int, int_ref]);
    assert_eq!(model.member(members[1].0).name, "First");
}

#[test]
fn close_in_context_ignores_non_instances() {
    let (mut model, int, list, _) = sample();
    let t = model.param(list, 0);
    let int_ref = model.def_ref(int);
    assert_eq!(model.close_in_context(int_ref, t), t);
    let list_int = model.instance(list, &[int_ref]);
    assert_eq!(model.close_in_context(list_int, t), int_ref);
}

#[test]
fn self_instance_uses_owner_params() {
    let (mut model, int, list, holder) = sample();
    let t = model.param(holder, 0);
    let expected = model.instance(list, &[t]);
    assert_eq!(model.self_instance(list, holder), expected);
    let int_ref = model.def_ref(int);
    assert_eq!(model.self_instance(int, int), int_ref);
}

#[test]
fn static_fields_only_public_fields() {
    let (mut model, int, _, holder) = sample();
    let int_ref = model.def_ref(int);
    let key = model.add_member(holder, Member::field("Key", int_ref).static_member());
    model.add_member(
        holder,
        Member::field("Secret", int_ref)
            .static_member()
            .with_visibility(Visibility::Private),
    );
    model.add_member(holder, Member::property("Prop", int_ref).static_member());
    model.add_member(holder, Member::field("Instance", int_ref));
    assert_eq!(model.static_fields(holder), vec![(key, int_ref)]);
    assert_eq!(model.member(key).kind, MemberKind::Field);
}

#[test]
fn imports_are_deduplicated_in_order() {
    let (mut model, int, list, _) = sample();
    let int_ref = model.def_ref(int);
    let list_int = model.instance(list, &[int_ref]);
    model.import(list_int);
    model.import(int_ref);
    model.import(list_int);
    let current = model.current_module();
    assert_eq!(model.module(current).imports, vec![list_int, int_ref]);
}
