//! Names of synthesized serializers.
//!
//! Pure functions of the data type's identity, so rerunning the pass on the
//! same input produces the same names.

use sera_model::{DefId, Model};

const SUFFIX: &str = "Serializer";

/// Simple name of the complex serializer for `def`: the qualified name with
/// every character outside `[A-Za-z0-9_]` replaced by `_`, plus `Serializer`.
///
/// `Game.Items.Sword` becomes `Game_Items_SwordSerializer`. The generic arity
/// is carried by the cloned parameters, not by the simple name: `Game.Foo`
/// and `Game.Foo<T>` share it and are told apart by their full names
/// (`` Sera.DataSerializers.Game_FooSerializer `` and
/// `` Sera.DataSerializers.Game_FooSerializer`1 ``, see [`qualified_name`]),
/// which is the identity lookups and emission go through.
pub fn serializer_type_name(model: &Model, def: DefId) -> String {
    let mut segments = Vec::new();
    let mut current = Some(def);
    while let Some(id) = current {
        let data = model.def(id);
        segments.push(data.name.as_str());
        if data.declaring.is_none() && !data.namespace.is_empty() {
            segments.push(data.namespace.as_str());
        }
        current = data.declaring;
    }
    segments.reverse();

    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push('_');
        }
        out.extend(segment.chars().map(sanitize));
    }
    out.push_str(SUFFIX);
    out
}

/// Lookup name of a serializer called `name` with `arity` generic
/// parameters inside `namespace`.
pub fn qualified_name(namespace: &str, name: &str, arity: usize) -> String {
    match (namespace.is_empty(), arity) {
        (true, 0) => name.to_string(),
        (true, n) => format!("{name}`{n}"),
        (false, 0) => format!("{namespace}.{name}"),
        (false, n) => format!("{namespace}.{name}`{n}"),
    }
}

fn sanitize(c: char) -> char {
    if c.is_ascii_alphanumeric() || c == '_' {
        c
    } else {
        '_'
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
