//! Body-schema → DTO class generation, deduplicated by option-hash.

use std::collections::HashMap;

use ymir_ast::option_value::{option_hash, OptionMap, OptionValue};
use ymir_ast::path::{capitalize_first, sanitize_identifier};

use crate::errors::EmissionError;
use crate::ir::{ClassBuilder, FieldBuilder};
use crate::types::body_field_java_type;

/// Accumulates generated DTO classes across the whole emission, keyed by
/// `option_hash` so two routes with an identical nested body schema share
/// one class.
#[derive(Default)]
pub struct DtoRegistry {
    by_hash: HashMap<String, String>,
    pub classes: Vec<ClassBuilder>,
}

impl DtoRegistry {
    /// Returns the DTO class name for `schema`, generating it (and any
    /// nested DTOs) under `dto_package` if this exact schema hasn't been
    /// seen before. `name_hint` seeds the class name when a fresh DTO is
    /// needed; it is disambiguated with a numeric suffix on collision.
    pub fn dto_for(
        &mut self,
        schema: &OptionMap,
        name_hint: &str,
        dto_package: &str,
    ) -> Result<String, EmissionError> {
        let hash = option_hash(schema);
        if let Some(existing) = self.by_hash.get(&hash) {
            return Ok(existing.clone());
        }

        let class_name = self.unique_class_name(name_hint);
        let mut class = ClassBuilder::new(dto_package, class_name.clone(), false);

        for (key, value) in schema {
            let field_name = sanitize_identifier(key);
            match value {
                OptionValue::Map(nested) => {
                    let inner_hint = format!("{class_name}{}", capitalize_first(&field_name));
                    let inner_name = self.dto_for(nested, &inner_hint, dto_package)?;
                    class.add_field(FieldBuilder::new(inner_name, field_name));
                }
                OptionValue::String(type_name) => {
                    let java_type = body_field_java_type(type_name).ok_or_else(|| EmissionError::UnknownBodyFieldType {
                        field: key.clone(),
                        type_name: type_name.clone(),
                    })?;
                    class.add_field(FieldBuilder::new(java_type, field_name));
                }
                OptionValue::List(_) => {
                    class.add_field(FieldBuilder::new("java.util.List<Object>", field_name));
                }
                _ => {
                    class.add_field(FieldBuilder::new("Object", field_name));
                }
            }
        }

        self.classes.push(class);
        self.by_hash.insert(hash, class_name.clone());
        Ok(class_name)
    }

    fn unique_class_name(&self, hint: &str) -> String {
        let base = format!("{}Dto", capitalize_first(&sanitize_identifier(hint)));
        if !self.classes.iter().any(|c| c.name == base) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}{n}");
            if !self.classes.iter().any(|c| c.name == candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn flat_schema() -> OptionMap {
        let mut m = IndexMap::new();
        m.insert("name".to_string(), OptionValue::String("string".to_string()));
        m.insert("age".to_string(), OptionValue::String("int".to_string()));
        m
    }

    #[test]
    fn identical_schemas_reuse_one_dto() {
        let mut registry = DtoRegistry::default();
        let a = registry.dto_for(&flat_schema(), "CreateUser", "com.ymir.generated.dto").unwrap();
        let b = registry.dto_for(&flat_schema(), "UpdateUser", "com.ymir.generated.dto").unwrap();
        assert_eq!(a, b);
        assert_eq!(registry.classes.len(), 1);
    }

    #[test]
    fn nested_object_becomes_inner_dto_reference() {
        let mut registry = DtoRegistry::default();
        let mut schema = IndexMap::new();
        let mut address = IndexMap::new();
        address.insert("city".to_string(), OptionValue::String("string".to_string()));
        schema.insert("address".to_string(), OptionValue::Map(address));

        let name = registry.dto_for(&schema, "CreateUser", "com.ymir.generated.dto").unwrap();
        assert_eq!(registry.classes.len(), 2);
        let outer = registry.classes.iter().find(|c| c.name == name).unwrap();
        assert_eq!(outer.fields[0].name, "address");
    }

    #[test]
    fn unknown_body_field_type_errors() {
        let mut registry = DtoRegistry::default();
        let mut schema = IndexMap::new();
        schema.insert("weird".to_string(), OptionValue::String("bignum".to_string()));
        let err = registry.dto_for(&schema, "Thing", "com.ymir.generated.dto").unwrap_err();
        assert!(matches!(err, EmissionError::UnknownBodyFieldType { .. }));
    }
}
