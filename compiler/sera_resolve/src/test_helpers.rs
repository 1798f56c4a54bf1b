//! Fixture world for resolver unit tests.
//!
//! [`World::new`] builds a model with three modules:
//!
//! - `Game`: the current module, empty; tests add their own types
//! - `mscorlib`: `System.Object`, `System.ValueType`, `System.Int32`,
//!   `System.String` (skipped by the referenced-module scan)
//! - `Sera.Core`: the serializer bases and templates, `List<T>` with its
//!   `ListSerializer<T>`, and global registrations for `Int32` and `String`

#![allow(clippy::unwrap_used)]

use sera_model::{
    AttrValue, DefFlags, DefId, GenericMode, Member, MemberRef, Model, ModuleId, RawAttribute,
    TypeDefBuilder, TypeKind, TypeRef,
};

use crate::process::{ReferencedModuleProcessor, SerializerProcessor};
use crate::{InfoId, PassOptions, Resolver};

pub struct World {
    pub model: Model,
    pub options: PassOptions,
    pub game: ModuleId,
    pub core: ModuleId,
    pub mscorlib: ModuleId,
    pub object: TypeRef,
    pub int: TypeRef,
    pub string: TypeRef,
    pub data_serializer: DefId,
    pub list: DefId,
    pub list_serializer: DefId,
}

impl World {
    pub fn new() -> Self {
        let mut model = Model::new("Game");
        let game = model.current_module();
        let mscorlib = model.add_module("mscorlib").unwrap();
        let core = model.add_module("Sera.Core").unwrap();
        model.add_reference(game, core);
        model.add_reference(game, mscorlib);
        model.add_reference(core, mscorlib);

        let object = TypeDefBuilder::new("System", "Object", mscorlib)
            .flags(DefFlags::DEFAULT_CTOR)
            .declare(&mut model)
            .unwrap();
        let object = model.def_ref(object);
        let value_type = TypeDefBuilder::new("System", "ValueType", mscorlib)
            .flags(DefFlags::ABSTRACT)
            .base(object)
            .declare(&mut model)
            .unwrap();
        let value_type = model.def_ref(value_type);
        let int = TypeDefBuilder::new("System", "Int32", mscorlib)
            .kind(TypeKind::Struct)
            .base(value_type)
            .declare(&mut model)
            .unwrap();
        let int = model.def_ref(int);
        let string = TypeDefBuilder::new("System", "String", mscorlib)
            .flags(DefFlags::SEALED)
            .base(object)
            .declare(&mut model)
            .unwrap();
        let string = model.def_ref(string);

        let serialization = "Sera.Serialization";
        let serializers = "Sera.Serialization.Serializers";
        let data_serializer = TypeDefBuilder::new(serialization, "DataSerializer", core)
            .generic("T")
            .flags(DefFlags::ABSTRACT)
            .base(object)
            .declare(&mut model)
            .unwrap();
        let class_data_serializer = generic_serializer(&mut model, serialization, "ClassDataSerializer", core);
        let own = model.param(class_data_serializer, 0);
        serializes(&mut model, class_data_serializer, data_serializer, own);

        let enum_serializer = generic_serializer(&mut model, serializers, "EnumSerializer", core);
        let own = model.param(enum_serializer, 0);
        serializes(&mut model, enum_serializer, data_serializer, own);

        let array_serializer = generic_serializer(&mut model, serializers, "ArraySerializer", core);
        let own = model.param(array_serializer, 0);
        let own = model.array(own);
        serializes(&mut model, array_serializer, data_serializer, own);

        let int_serializer = TypeDefBuilder::new(serializers, "Int32Serializer", core)
            .declare(&mut model)
            .unwrap();
        serializes(&mut model, int_serializer, data_serializer, int);
        let string_serializer = TypeDefBuilder::new(serializers, "StringSerializer", core)
            .declare(&mut model)
            .unwrap();
        serializes(&mut model, string_serializer, data_serializer, string);

        let list_serializer = generic_serializer(&mut model, "Sera.Collections", "ListSerializer", core);
        let list_serializer_ref = model.def_ref(list_serializer);
        let list = TypeDefBuilder::new("Sera.Collections", "List", core)
            .generic("T")
            .flags(DefFlags::DEFAULT_CTOR)
            .base(object)
            .attribute(data_serializer_attr(list_serializer_ref, GenericMode::GenericArguments))
            .declare(&mut model)
            .unwrap();
        let own = model.param(list_serializer, 0);
        let own_list = model.instance(list, &[own]);
        serializes(&mut model, list_serializer, data_serializer, own_list);
        model.set_generic_dependencies(list_serializer, vec![own]);

        let int_serializer = model.def_ref(int_serializer);
        let string_serializer = model.def_ref(string_serializer);
        model
            .add_module_attribute(core, &global(Some(int_serializer), None))
            .unwrap();
        model
            .add_module_attribute(core, &global(Some(string_serializer), Some(string)))
            .unwrap();

        Self {
            model,
            options: PassOptions::default(),
            game,
            core,
            mscorlib,
            object,
            int,
            string,
            data_serializer,
            list,
            list_serializer,
        }
    }

    /// A public, default-constructible `Game.<name>` class deriving from
    /// `System.Object`; finish it with `.declare`.
    pub fn class(&self, name: &str) -> TypeDefBuilder {
        TypeDefBuilder::new("Game", name, self.game)
            .flags(DefFlags::DEFAULT_CTOR)
            .base(self.object)
    }

    pub fn declare(&mut self, builder: TypeDefBuilder) -> DefId {
        builder.declare(&mut self.model).unwrap()
    }

    /// `[DataContract] class Game.<name>` with public fields.
    pub fn contract(&mut self, name: &str, fields: &[(&str, TypeRef)]) -> DefId {
        let def = self.declare(self.class(name).attribute(data_contract()));
        for &(field, ty) in fields {
            self.field(def, field, ty);
        }
        def
    }

    /// A plain `Game.<name>` class without annotations or members.
    pub fn opaque(&mut self, name: &str) -> DefId {
        self.declare(self.class(name))
    }

    /// A generic `Game.<name>` serializer definition with `arity` parameters.
    pub fn serializer_template(&mut self, name: &str, arity: usize) -> DefId {
        let builder = (0..arity).fold(TypeDefBuilder::new("Game", name, self.game), |b, i| {
            b.generic(format!("T{i}"))
        });
        self.declare(builder)
    }

    pub fn field(&mut self, def: DefId, name: &str, ty: TypeRef) -> MemberRef {
        self.model.add_member(def, Member::field(name, ty))
    }

    pub fn ty(&mut self, def: DefId) -> TypeRef {
        self.model.def_ref(def)
    }

    pub fn instance(&mut self, def: DefId, args: &[TypeRef]) -> TypeRef {
        self.model.instance(def, args)
    }

    pub fn param(&mut self, def: DefId, index: u32) -> TypeRef {
        self.model.param(def, index)
    }

    pub fn array(&mut self, elem: TypeRef) -> TypeRef {
        self.model.array(elem)
    }

    pub fn list_of(&mut self, elem: TypeRef) -> TypeRef {
        self.model.instance(self.list, &[elem])
    }
}

fn generic_serializer(model: &mut Model, namespace: &str, name: &str, module: ModuleId) -> DefId {
    TypeDefBuilder::new(namespace, name, module)
        .generic("T")
        .declare(model)
        .unwrap()
}

/// Make `serializer` derive from `DataSerializer<data>`.
fn serializes(model: &mut Model, serializer: DefId, data_serializer: DefId, data: TypeRef) {
    let base = model.instance(data_serializer, &[data]);
    model.set_base(serializer, base);
}

pub fn data_contract() -> RawAttribute {
    RawAttribute::new("Sera.Serialization.DataContractAttribute")
}

pub fn data_serializer_attr(serializer: TypeRef, mode: GenericMode) -> RawAttribute {
    RawAttribute::new("Sera.Serialization.DataSerializerAttribute")
        .arg(AttrValue::Type(serializer))
        .named("Mode", AttrValue::Mode(mode))
}

/// `DataSerializerGlobal(serializer, data_type)` in the default profile.
pub fn global(serializer: Option<TypeRef>, data_type: Option<TypeRef>) -> RawAttribute {
    let value = |ty: Option<TypeRef>| ty.map_or(AttrValue::Null, AttrValue::Type);
    RawAttribute::new("Sera.Serialization.DataSerializerGlobalAttribute")
        .arg(value(serializer))
        .arg(value(data_type))
}

/// A resolver with the global registrations of the fixture already applied.
pub fn resolver<'a>(model: &'a mut Model, options: &'a PassOptions) -> Resolver<'a> {
    let mut resolver = Resolver::new(model, options).unwrap();
    ReferencedModuleProcessor::default()
        .process(&mut resolver)
        .unwrap();
    resolver
}

/// Display name of the serializer behind `id`, `-` for placeholders.
pub fn serializer_name(resolver: &Resolver<'_>, id: InfoId) -> String {
    resolver
        .info(id)
        .serializer
        .map_or_else(|| "-".to_string(), |s| resolver.model().display(s))
}
