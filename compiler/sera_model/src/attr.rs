//! Metadata annotations.
//!
//! Annotations arrive from the metadata reader as [`RawAttribute`]s (a name
//! plus constructor and named argument values). They are lowered exactly once,
//! when the definition enters the model, into the typed [`Attribute`] and
//! [`MemberAttribute`] enums. The resolver only ever matches on those enums.

use crate::{ModelError, TypeRef};

pub const DEFAULT_PROFILE: &str = "Default";

/// How a generic serializer template is combined with the serialized type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenericMode {
    /// Non-generic, or an already closed serializer.
    #[default]
    None,
    /// `Serializer<TData>`.
    Type,
    /// `Serializer<TData, TArgs...>`.
    TypeAndGenericArguments,
    /// `Serializer<TArgs...>`.
    GenericArguments,
}

impl GenericMode {
    /// Registrations with a generic mode live in the template map.
    #[inline]
    pub fn is_generic(self) -> bool {
        self != GenericMode::None
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.rsplit('.').next().unwrap_or(name);
        match name {
            "None" => Some(GenericMode::None),
            "Type" => Some(GenericMode::Type),
            "TypeAndGenericArguments" => Some(GenericMode::TypeAndGenericArguments),
            "GenericArguments" => Some(GenericMode::GenericArguments),
            _ => None,
        }
    }

    fn from_ordinal(value: i64) -> Option<Self> {
        match value {
            0 => Some(GenericMode::None),
            1 => Some(GenericMode::Type),
            2 => Some(GenericMode::TypeAndGenericArguments),
            3 => Some(GenericMode::GenericArguments),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenericMode::None => "None",
            GenericMode::Type => "Type",
            GenericMode::TypeAndGenericArguments => "TypeAndGenericArguments",
            GenericMode::GenericArguments => "GenericArguments",
        }
    }
}

/// An untyped attribute argument value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Type(TypeRef),
    Mode(GenericMode),
}

/// An annotation as read from metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawAttribute {
    /// Attribute type name, possibly namespace-qualified.
    pub name: String,
    /// Constructor arguments, in order.
    pub args: Vec<AttrValue>,
    /// Named (property/field) arguments.
    pub named: Vec<(String, AttrValue)>,
}

impl RawAttribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            named: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, value: AttrValue) -> Self {
        self.args.push(value);
        self
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.named.push((name.into(), value));
        self
    }

    fn named_value(&self, name: &str) -> Option<&AttrValue> {
        self.named
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Attribute name without namespace or `Attribute` suffix.
    fn short_name(&self) -> &str {
        let name = self.name.rsplit('.').next().unwrap_or(&self.name);
        name.strip_suffix("Attribute").unwrap_or(name)
    }
}

/// A module- or type-level "global serializer registration".
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlobalRegistration {
    /// Explicit serializer; `None` means "derive one with the resolver".
    pub serializer: Option<TypeRef>,
    /// Serialized type; `None` means "deduce it from the serializer".
    pub data_type: Option<TypeRef>,
    pub mode: GenericMode,
    pub inherited: bool,
    pub complex: bool,
    pub profile: String,
}

/// Typed type/module-level annotation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Explicit "use this serializer" declaration.
    DataSerializer {
        serializer: TypeRef,
        mode: GenericMode,
        /// `None` when the annotation does not say; the resolver then applies
        /// the default for the registration shape.
        inherited: Option<bool>,
    },
    /// Member-wise serializable type.
    DataContract {
        alias: Option<String>,
        inherited: bool,
    },
    DataSerializerGlobal(GlobalRegistration),
    Other(String),
}

/// Typed member-level annotation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberAttribute {
    DataMemberIgnore,
    /// The member is serialized by a custom serializer chosen elsewhere.
    DataMemberCustomSerializer,
    Other(String),
}

fn invalid(attribute: &str, reason: impl Into<String>) -> ModelError {
    ModelError::InvalidAttribute {
        attribute: attribute.to_string(),
        reason: reason.into(),
    }
}

fn as_bool(attribute: &str, what: &str, value: &AttrValue) -> Result<bool, ModelError> {
    match value {
        AttrValue::Bool(b) => Ok(*b),
        other => Err(invalid(attribute, format!("{what} must be a bool, got {other:?}"))),
    }
}

fn as_mode(attribute: &str, value: &AttrValue) -> Result<GenericMode, ModelError> {
    let mode = match value {
        AttrValue::Mode(mode) => Some(*mode),
        AttrValue::Int(ordinal) => GenericMode::from_ordinal(*ordinal),
        AttrValue::Str(name) => GenericMode::from_name(name),
        _ => None,
    };
    mode.ok_or_else(|| invalid(attribute, format!("invalid generic mode {value:?}")))
}

fn as_optional_type(
    attribute: &str,
    what: &str,
    value: Option<&AttrValue>,
) -> Result<Option<TypeRef>, ModelError> {
    match value {
        None | Some(AttrValue::Null) => Ok(None),
        Some(AttrValue::Type(ty)) => Ok(Some(*ty)),
        Some(other) => Err(invalid(attribute, format!("{what} must be a type, got {other:?}"))),
    }
}

impl Attribute {
    /// Lower a raw annotation into its typed form.
    pub fn lower(raw: &RawAttribute) -> Result<Self, ModelError> {
        let short = raw.short_name();
        match short {
            "DataSerializer" => {
                let serializer = as_optional_type(short, "serializer", raw.args.first())?
                    .ok_or_else(|| invalid(short, "missing serializer type"))?;
                let mode = match raw.named_value("Mode") {
                    Some(value) => as_mode(short, value)?,
                    None => GenericMode::None,
                };
                let inherited = raw
                    .named_value("Inherited")
                    .map(|value| as_bool(short, "Inherited", value))
                    .transpose()?;
                Ok(Attribute::DataSerializer {
                    serializer,
                    mode,
                    inherited,
                })
            }
            "DataContract" => {
                let alias = match raw.args.first().or_else(|| raw.named_value("Alias")) {
                    None | Some(AttrValue::Null) => None,
                    Some(AttrValue::Str(alias)) => Some(alias.clone()),
                    Some(other) => {
                        return Err(invalid(short, format!("alias must be a string, got {other:?}")))
                    }
                };
                let inherited = match raw.named_value("Inherited") {
                    Some(value) => as_bool(short, "Inherited", value)?,
                    None => false,
                };
                Ok(Attribute::DataContract { alias, inherited })
            }
            "DataSerializerGlobal" => {
                if raw.args.len() > 5 {
                    return Err(invalid(short, "expected at most 5 constructor arguments"));
                }
                let serializer = as_optional_type(short, "serializer", raw.args.first())?;
                let data_type = as_optional_type(short, "data type", raw.args.get(1))?;
                let mode = match raw.args.get(2) {
                    Some(value) => as_mode(short, value)?,
                    None => GenericMode::None,
                };
                let inherited = match raw.args.get(3) {
                    Some(value) => as_bool(short, "inherited", value)?,
                    None => false,
                };
                let complex = match raw.args.get(4) {
                    Some(value) => as_bool(short, "complex", value)?,
                    None => false,
                };
                let profile = match raw.named_value("Profile") {
                    None | Some(AttrValue::Null) => DEFAULT_PROFILE.to_string(),
                    Some(AttrValue::Str(profile)) => profile.clone(),
                    Some(other) => {
                        return Err(invalid(short, format!("profile must be a string, got {other:?}")))
                    }
                };
                if serializer.is_none() && data_type.is_none() {
                    return Err(invalid(short, "needs a serializer type or a data type"));
                }
                Ok(Attribute::DataSerializerGlobal(GlobalRegistration {
                    serializer,
                    data_type,
                    mode,
                    inherited,
                    complex,
                    profile,
                }))
            }
            _ => Ok(Attribute::Other(raw.name.clone())),
        }
    }
}

impl MemberAttribute {
    pub fn lower(raw: &RawAttribute) -> Self {
        match raw.short_name() {
            "DataMemberIgnore" => MemberAttribute::DataMemberIgnore,
            "DataMemberCustomSerializer" => MemberAttribute::DataMemberCustomSerializer,
            _ => MemberAttribute::Other(raw.name.clone()),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
