//! JSON model descriptions.
//!
//! The driver does not read assemblies itself. A metadata backend dumps the
//! modules of a compilation as JSON and [`load`] turns that into a
//! [`Model`]. The module named by `current` is the one being processed.
//!
//! Types are written as one of:
//!
//! - `"Ns.Name"`: a definition by full name (`Ns.Outer/Inner`, `` Ns.Name`1 ``).
//!   Inside a generic definition, its parameter names take precedence.
//! - `{"array": <type>}`
//! - `{"generic": "Ns.Name", "args": [<type>, ...]}`: the `` `N `` arity suffix
//!   may be left out
//!
//! Attribute arguments are JSON scalars, `{"type": <type>}` for `typeof`
//! arguments and `{"mode": "GenericArguments"}` for generic modes.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::Deserialize;

use sera_model::{
    AttrValue, DefFlags, DefId, GenericMode, Member, Model, ModelError, ModuleId, RawAttribute,
    TypeDefBuilder, TypeKind, TypeRef, Visibility,
};

/// Failure to turn a description into a model.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("malformed model description")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("current module `{0}` is not described")]
    MissingCurrentModule(String),

    #[error("module `{0}` is described twice")]
    DuplicateModule(String),

    #[error("unknown type `{name}` referenced from {context}")]
    UnknownType { name: String, context: String },

    #[error("`{name}` takes {expected} generic argument(s), {found} given")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown generic mode `{0}`")]
    UnknownMode(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDescription {
    /// Name of the module being processed.
    pub current: String,
    pub modules: Vec<ModuleDescription>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDescription {
    pub name: String,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeDescription>,
    #[serde(default)]
    pub types: Vec<TypeDescription>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDescription {
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub kind: KindDescription,
    #[serde(default)]
    pub visibility: AccessDescription,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub sealed: bool,
    #[serde(default = "yes")]
    pub default_ctor: bool,
    /// Generic parameter names.
    #[serde(default)]
    pub generic: Vec<String>,
    #[serde(default)]
    pub base: Option<TypeExpr>,
    #[serde(default)]
    pub attributes: Vec<AttributeDescription>,
    #[serde(default)]
    pub members: Vec<MemberDescription>,
    /// Generic instantiations the serializer needs (dependency marker).
    #[serde(default)]
    pub dependencies: Option<Vec<TypeExpr>>,
    #[serde(default)]
    pub nested: Vec<TypeDescription>,
}

#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindDescription {
    #[default]
    Class,
    Struct,
    Enum,
    Interface,
}

#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessDescription {
    #[default]
    Public,
    Internal,
    Protected,
    Private,
}

#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKindDescription {
    #[default]
    Field,
    Property,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub kind: MemberKindDescription,
    /// Properties only.
    #[serde(default = "yes")]
    pub settable: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub visibility: AccessDescription,
    #[serde(default)]
    pub attributes: Vec<AttributeDescription>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeDescription {
    pub name: String,
    #[serde(default)]
    pub args: Vec<ArgDescription>,
    #[serde(default)]
    pub named: BTreeMap<String, ArgDescription>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ArgDescription {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Type {
        #[serde(rename = "type")]
        ty: TypeExpr,
    },
    Mode {
        mode: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TypeExpr {
    Named(String),
    Array {
        array: Box<TypeExpr>,
    },
    Generic {
        generic: String,
        #[serde(default)]
        args: Vec<TypeExpr>,
    },
}

fn yes() -> bool {
    true
}

impl From<KindDescription> for TypeKind {
    fn from(kind: KindDescription) -> Self {
        match kind {
            KindDescription::Class => TypeKind::Class,
            KindDescription::Struct => TypeKind::Struct,
            KindDescription::Enum => TypeKind::Enum,
            KindDescription::Interface => TypeKind::Interface,
        }
    }
}

impl From<AccessDescription> for Visibility {
    fn from(access: AccessDescription) -> Self {
        match access {
            AccessDescription::Public => Visibility::Public,
            AccessDescription::Internal => Visibility::Internal,
            AccessDescription::Protected => Visibility::Protected,
            AccessDescription::Private => Visibility::Private,
        }
    }
}

/// Parse a JSON description and build its model.
pub fn load(json: &str) -> Result<Model, LoadError> {
    let description: ModelDescription = serde_json::from_str(json)?;
    build(&description)
}

/// Build the model of a parsed description.
///
/// Definitions are declared before any base type, member or attribute is
/// attached, so descriptions may refer to types in any order.
#[tracing::instrument(level = "debug", skip_all, fields(current = %description.current))]
pub fn build(description: &ModelDescription) -> Result<Model, LoadError> {
    if !description
        .modules
        .iter()
        .any(|module| module.name == description.current)
    {
        return Err(LoadError::MissingCurrentModule(description.current.clone()));
    }

    let mut model = Model::new(description.current.clone());
    let mut seen = FxHashSet::default();
    let mut modules = Vec::with_capacity(description.modules.len());
    for module in &description.modules {
        if !seen.insert(module.name.as_str()) {
            return Err(LoadError::DuplicateModule(module.name.clone()));
        }
        let id = if module.name == description.current {
            model.current_module()
        } else {
            model.add_module(module.name.clone())?
        };
        modules.push((id, module));
    }

    for &(id, module) in &modules {
        for reference in &module.references {
            let to = model
                .module_by_name(reference)
                .ok_or_else(|| ModelError::UnknownModule(reference.clone()))?;
            model.add_reference(id, to);
        }
    }

    let mut declared = Vec::new();
    for &(id, module) in &modules {
        for ty in &module.types {
            declare(&mut model, ty, id, None, &mut declared)?;
        }
    }
    for &(def, ty) in &declared {
        complete(&mut model, def, ty)?;
    }

    for &(id, module) in &modules {
        for attribute in &module.attributes {
            let raw = raw_attribute(&mut model, attribute, None)?;
            model.add_module_attribute(id, &raw)?;
        }
    }

    tracing::debug!(
        modules = modules.len(),
        types = declared.len(),
        "model description loaded"
    );
    Ok(model)
}

fn declare<'d>(
    model: &mut Model,
    ty: &'d TypeDescription,
    module: ModuleId,
    declaring: Option<DefId>,
    declared: &mut Vec<(DefId, &'d TypeDescription)>,
) -> Result<(), LoadError> {
    let mut flags = DefFlags::empty();
    flags.set(DefFlags::ABSTRACT, ty.is_abstract);
    flags.set(DefFlags::SEALED, ty.sealed);
    flags.set(DefFlags::DEFAULT_CTOR, ty.default_ctor);

    let builder = TypeDefBuilder::new(&ty.namespace, &ty.name, module)
        .kind(ty.kind.into())
        .visibility(ty.visibility.into())
        .flags(flags);
    let builder = ty
        .generic
        .iter()
        .fold(builder, |builder, param| builder.generic(param));
    let builder = match declaring {
        Some(parent) => builder.nested_in(parent),
        None => builder,
    };
    let def = builder.declare(model)?;
    declared.push((def, ty));

    for nested in &ty.nested {
        declare(model, nested, module, Some(def), declared)?;
    }
    Ok(())
}

fn complete(model: &mut Model, def: DefId, ty: &TypeDescription) -> Result<(), LoadError> {
    let scope = Some(def);
    if let Some(base) = &ty.base {
        let base = resolve_type(model, base, scope)?;
        model.set_base(def, base);
    }
    for attribute in &ty.attributes {
        let raw = raw_attribute(model, attribute, scope)?;
        model.add_attribute(def, &raw)?;
    }
    for member in &ty.members {
        let member_ty = resolve_type(model, &member.ty, scope)?;
        let mut built = match member.kind {
            MemberKindDescription::Field => Member::field(&member.name, member_ty),
            MemberKindDescription::Property if member.settable => {
                Member::property(&member.name, member_ty)
            }
            MemberKindDescription::Property => Member::property(&member.name, member_ty).read_only(),
        };
        if member.is_static {
            built = built.static_member();
        }
        built = built.with_visibility(member.visibility.into());
        for attribute in &member.attributes {
            let raw = raw_attribute(model, attribute, scope)?;
            built = built.with_attribute(&raw);
        }
        model.add_member(def, built);
    }
    if let Some(dependencies) = &ty.dependencies {
        let dependencies = dependencies
            .iter()
            .map(|dependency| resolve_type(model, dependency, scope))
            .collect::<Result<Vec<_>, _>>()?;
        model.set_generic_dependencies(def, dependencies);
    }
    Ok(())
}

fn resolve_type(
    model: &mut Model,
    expr: &TypeExpr,
    scope: Option<DefId>,
) -> Result<TypeRef, LoadError> {
    match expr {
        TypeExpr::Named(name) => {
            if let Some((owner, index)) = scope.and_then(|def| generic_param(model, def, name)) {
                return Ok(model.param(owner, index));
            }
            let def = find_definition(model, name, None, scope)?;
            Ok(model.def_ref(def))
        }
        TypeExpr::Array { array } => {
            let elem = resolve_type(model, array, scope)?;
            Ok(model.array(elem))
        }
        TypeExpr::Generic { generic, args } => {
            let def = find_definition(model, generic, Some(args.len()), scope)?;
            let expected = model.def(def).generic_params.len();
            if expected != args.len() {
                return Err(LoadError::Arity {
                    name: generic.clone(),
                    expected,
                    found: args.len(),
                });
            }
            let args = args
                .iter()
                .map(|arg| resolve_type(model, arg, scope))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(model.instance(def, &args))
        }
    }
}

/// Generic parameter `name` of `scope` or of one of its declaring types.
fn generic_param(model: &Model, scope: DefId, name: &str) -> Option<(DefId, u32)> {
    let mut current = Some(scope);
    while let Some(def) = current {
        let data = model.def(def);
        if let Some(index) = data.generic_params.iter().position(|param| param.name == name) {
            return u32::try_from(index).ok().map(|index| (def, index));
        }
        current = data.declaring;
    }
    None
}

fn find_definition(
    model: &Model,
    name: &str,
    arity: Option<usize>,
    scope: Option<DefId>,
) -> Result<DefId, LoadError> {
    model
        .find_type(name)
        .or_else(|| {
            arity
                .filter(|&arity| arity > 0 && !name.contains('`'))
                .and_then(|arity| model.find_type(&format!("{name}`{arity}")))
        })
        .ok_or_else(|| LoadError::UnknownType {
            name: name.to_string(),
            context: scope.map_or_else(
                || "module attributes".to_string(),
                |def| format!("`{}`", model.full_name(def)),
            ),
        })
}

fn raw_attribute(
    model: &mut Model,
    attribute: &AttributeDescription,
    scope: Option<DefId>,
) -> Result<RawAttribute, LoadError> {
    let mut raw = RawAttribute::new(&attribute.name);
    for arg in &attribute.args {
        raw = raw.arg(attr_value(model, arg, scope)?);
    }
    for (name, arg) in &attribute.named {
        raw = raw.named(name, attr_value(model, arg, scope)?);
    }
    Ok(raw)
}

fn attr_value(
    model: &mut Model,
    arg: &ArgDescription,
    scope: Option<DefId>,
) -> Result<AttrValue, LoadError> {
    Ok(match arg {
        ArgDescription::Null => AttrValue::Null,
        ArgDescription::Bool(value) => AttrValue::Bool(*value),
        ArgDescription::Int(value) => AttrValue::Int(*value),
        ArgDescription::Str(value) => AttrValue::Str(value.clone()),
        ArgDescription::Type { ty } => AttrValue::Type(resolve_type(model, ty, scope)?),
        ArgDescription::Mode { mode } => AttrValue::Mode(
            GenericMode::from_name(mode).ok_or_else(|| LoadError::UnknownMode(mode.clone()))?,
        ),
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
