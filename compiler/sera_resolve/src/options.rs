//! Pass configuration.

use sera_model::DEFAULT_PROFILE;

/// Full names of the types the pass relies on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellKnownNames {
    /// Root of the class hierarchy.
    pub object: String,
    /// Base marker of value types.
    pub value_type: String,
    pub enum_serializer: String,
    pub array_serializer: String,
    /// Base of synthesized serializers for default-constructible classes.
    pub class_data_serializer: String,
    /// Base of every other serializer.
    pub data_serializer: String,
}

impl Default for WellKnownNames {
    fn default() -> Self {
        Self {
            object: "System.Object".to_string(),
            value_type: "System.ValueType".to_string(),
            enum_serializer: "Sera.Serialization.Serializers.EnumSerializer`1".to_string(),
            array_serializer: "Sera.Serialization.Serializers.ArraySerializer`1".to_string(),
            class_data_serializer: "Sera.Serialization.ClassDataSerializer`1".to_string(),
            data_serializer: "Sera.Serialization.DataSerializer`1".to_string(),
        }
    }
}

/// Options for one run of the serializer pass.
#[derive(Clone, Debug)]
pub struct PassOptions {
    /// Target platform tag. Carried through to the manifest untouched.
    pub platform: String,
    /// Profile every other profile falls back to.
    pub default_profile: String,
    /// Namespace of synthesized complex serializers.
    pub synthetic_namespace: String,
    pub well_known: WellKnownNames,
    /// Referenced modules whose name starts with one of these prefixes are not
    /// scanned for global registrations.
    pub system_prefixes: Vec<String>,
    /// Generic containers whose public static fields are key declarations.
    pub key_containers: Vec<String>,
    /// Profiles frozen once referenced registrations are loaded.
    pub frozen_profiles: Vec<String>,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            platform: "Windows".to_string(),
            default_profile: DEFAULT_PROFILE.to_string(),
            synthetic_namespace: "Sera.DataSerializers".to_string(),
            well_known: WellKnownNames::default(),
            system_prefixes: ["System", "mscorlib", "netstandard", "Microsoft"]
                .map(String::from)
                .to_vec(),
            key_containers: [
                "Sera.Rendering.ParameterKey`1",
                "Sera.Rendering.PermutationParameterKey`1",
                "Sera.Rendering.ValueParameterKey`1",
                "Sera.Rendering.ObjectParameterKey`1",
            ]
            .map(String::from)
            .to_vec(),
            frozen_profiles: Vec::new(),
        }
    }
}

impl PassOptions {
    /// Is `module` a system/runtime module by name?
    pub fn is_system_module(&self, module: &str) -> bool {
        self.system_prefixes.iter().any(|prefix| {
            module
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
        })
    }
}
