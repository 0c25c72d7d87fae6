use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name carrying a module's type definitions.
pub const TYPES_FIELD: &str = "types";

/// A single interface-definition module (`types`, `rpc`, `runtime`, ...).
///
/// The descriptor is kept as an opaque, ordered bag of fields. Only `types`
/// is ever read; everything else rides along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleDescriptor {
    fields: IndexMap<String, Value>,
}

impl ModuleDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor whose only field is `types`.
    pub fn with_types(types: Value) -> Self {
        Self::new().with_field(TYPES_FIELD, types)
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// The `types` attribute. An explicit `null` is `Some(&Value::Null)`,
    /// only a missing field yields `None`.
    pub fn types(&self) -> Option<&Value> {
        self.fields.get(TYPES_FIELD)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl From<IndexMap<String, Value>> for ModuleDescriptor {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Self { fields }
    }
}

/// Ordered mapping of module name to descriptor.
///
/// Enumeration order is insertion order, which for JSON sources is document
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleRegistry {
    modules: IndexMap<String, ModuleDescriptor>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module. Re-inserting a name replaces the descriptor but keeps
    /// the original position.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: ModuleDescriptor) {
        self.modules.insert(name.into(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleDescriptor)> {
        self.modules.iter().map(|(name, desc)| (name.as_str(), desc))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, ModuleDescriptor)> for ModuleRegistry {
    fn from_iter<I: IntoIterator<Item = (N, ModuleDescriptor)>>(iter: I) -> Self {
        Self {
            modules: iter
                .into_iter()
                .map(|(name, desc)| (name.into(), desc))
                .collect(),
        }
    }
}

/// Module name to `types` value, in registry order. This is what ends up in
/// `schema.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedSchema {
    modules: IndexMap<String, Value>,
}

impl ExtractedSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, types: Value) {
        self.modules.insert(name.into(), types);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.modules.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.modules.iter().map(|(name, types)| (name.as_str(), types))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Number of type definitions a module contributes: the key count when
    /// its `types` is an object, zero otherwise.
    pub fn type_count(&self, name: &str) -> usize {
        match self.modules.get(name) {
            Some(Value::Object(defs)) => defs.len(),
            _ => 0,
        }
    }
}

/// What to do with a module whose descriptor has no `types` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTypesPolicy {
    /// Keep the key with a JSON `null` value
    #[default]
    Null,

    /// Leave the module out of the schema
    Omit,

    /// Abort extraction
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_preserves_document_order() {
        let registry: ModuleRegistry = serde_json::from_str(
            r#"{"zeta": {"types": {}}, "alpha": {"types": {}}, "mid": {"types": {}}}"#,
        )
        .unwrap();

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_descriptor_distinguishes_null_from_missing() {
        let explicit = ModuleDescriptor::with_types(Value::Null);
        assert_eq!(explicit.types(), Some(&Value::Null));

        let missing = ModuleDescriptor::new().with_field("rpc", json!({}));
        assert_eq!(missing.types(), None);
    }

    #[test]
    fn test_descriptor_keeps_extra_fields() {
        let desc: ModuleDescriptor =
            serde_json::from_value(json!({"rpc": {"a": 1}, "types": {"X": "u32"}})).unwrap();

        assert_eq!(desc.types(), Some(&json!({"X": "u32"})));
        assert_eq!(desc.field("rpc"), Some(&json!({"a": 1})));
        assert_eq!(desc.field_names().collect::<Vec<_>>(), vec!["rpc", "types"]);
    }

    #[test]
    fn test_type_count() {
        let mut schema = ExtractedSchema::new();
        schema.insert("a", json!({"X": "u8", "Y": "u16"}));
        schema.insert("b", json!("Text"));
        schema.insert("c", Value::Null);

        assert_eq!(schema.type_count("a"), 2);
        assert_eq!(schema.type_count("b"), 0);
        assert_eq!(schema.type_count("c"), 0);
        assert_eq!(schema.type_count("nope"), 0);
    }

    #[test]
    fn test_missing_types_policy_serialization() {
        assert_eq!(
            serde_json::to_string(&MissingTypesPolicy::Omit).unwrap(),
            "\"omit\""
        );
        let policy: MissingTypesPolicy = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(policy, MissingTypesPolicy::Error);
        assert_eq!(MissingTypesPolicy::default(), MissingTypesPolicy::Null);
    }
}
