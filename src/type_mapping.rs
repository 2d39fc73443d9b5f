//! # Type Mapping
//!
//! Maps spec-level type tokens to the Java types used in generated sources.
//!
//! | spec token                     | Java type                      |
//! |--------------------------------|--------------------------------|
//! | `string`                       | `String` (`Date` for dates)    |
//! | `integer`                      | `Long` (`Integer` for `int32`) |
//! | `number`                       | `Double` (`Float` for `float`) |
//! | `boolean`                      | `Boolean`                      |
//! | `object`                       | `Object`                       |
//! | `array` of X                   | `X[]`                          |
//! | `#/components/schemas/Foo`     | `FooDTO`                       |
//!
//! Anything else aborts generation with [`GeneratorError::UnknownType`].

use crate::error::{GeneratorError, GeneratorResult};
use crate::naming::model_class_name;
use crate::spec::SpecType;
use std::collections::HashSet;

/// Prefix of a reference to a component schema
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Prefix of a reference to a reusable parameter
pub const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";

/// Resolves [`SpecType`]s against the set of declared component schemas.
#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    schemas: HashSet<String>,
}

impl TypeMapper {
    /// Create a mapper that accepts references to the given schema names
    pub fn new<I, S>(schemas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeMapper {
            schemas: schemas.into_iter().map(Into::into).collect(),
        }
    }

    /// Map a spec type to its Java type.
    ///
    /// `location` names the property or parameter being mapped and ends up
    /// in the error.
    ///
    /// # Errors
    ///
    /// - [`GeneratorError::UnresolvedReference`] for a reference that does not
    ///   name a declared schema
    /// - [`GeneratorError::UnknownType`] for any other unrecognized token
    pub fn map_type(&self, spec_type: &SpecType, location: &str) -> GeneratorResult<String> {
        if spec_type.is_reference() {
            let name = self.resolve_reference(&spec_type.token, location)?;
            return Ok(model_class_name(name));
        }
        let format = spec_type.format.as_deref();
        let ty = match spec_type.token.as_str() {
            "string" => match format {
                Some("date") | Some("date-time") => "Date",
                _ => "String",
            },
            "integer" => match format {
                Some("int32") => "Integer",
                _ => "Long",
            },
            "number" => match format {
                Some("float") => "Float",
                _ => "Double",
            },
            "boolean" => "Boolean",
            "object" => "Object",
            "array" => {
                let items = spec_type.items.as_deref().ok_or_else(|| GeneratorError::UnknownType {
                    token: "array without items".to_string(),
                    location: location.to_string(),
                })?;
                return Ok(format!("{}[]", self.map_type(items, location)?));
            }
            other => {
                return Err(GeneratorError::UnknownType {
                    token: other.to_string(),
                    location: location.to_string(),
                })
            }
        };
        Ok(ty.to_string())
    }

    /// Return the schema name a `#/components/schemas/...` reference points at.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::UnresolvedReference`] when the reference targets
    /// another section or an undeclared schema.
    pub fn resolve_reference<'r>(&self, reference: &'r str, location: &str) -> GeneratorResult<&'r str> {
        reference
            .strip_prefix(SCHEMA_REF_PREFIX)
            .filter(|name| self.schemas.contains(*name))
            .ok_or_else(|| GeneratorError::unresolved(reference, location))
    }
}

/// Whether a mapped type needs `import java.util.Date;`
pub fn needs_date_import(target_type: &str) -> bool {
    target_type.trim_end_matches("[]") == "Date"
}
