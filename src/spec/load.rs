use super::build::build_definition;
use super::types::Definition;
use crate::error::{GeneratorError, GeneratorResult};
use serde::de::{
    self, DeserializeSeed, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Parse a raw YAML or JSON document into an order-preserving JSON value.
///
/// Text starting with `{` is read as JSON, anything else as YAML. Both go
/// through the same visitor, which keeps declaration order, turns unquoted
/// `200:` keys into strings and rejects a key declared twice in one mapping
/// or a non-finite number, naming where it happened
/// (`components.schemas.Product`).
pub fn parse_document(raw: &str) -> GeneratorResult<Value> {
    let problem = RefCell::new(None);
    let seed = DocumentSeed {
        location: String::new(),
        problem: &problem,
    };
    let parsed = if raw.trim_start().starts_with('{') {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        seed.deserialize(&mut deserializer)
            .and_then(|value| deserializer.end().map(|()| value))
            .map_err(|e| e.to_string())
    } else {
        seed.deserialize(serde_yaml::Deserializer::from_str(raw))
            .map_err(|e| e.to_string())
    };
    let value = parsed.map_err(|message| match problem.take() {
        Some((location, reason)) => GeneratorError::malformed(location, reason),
        None => GeneratorError::malformed("document", message),
    })?;
    if !value.is_object() {
        return Err(GeneratorError::malformed(
            "document",
            "root is not a mapping",
        ));
    }
    Ok(value)
}

/// Builds a [`Value`] for the node at `location`, recording the first
/// structural problem in `problem`
struct DocumentSeed<'p> {
    location: String,
    problem: &'p RefCell<Option<(String, String)>>,
}

impl DocumentSeed<'_> {
    fn at(&self, location: String) -> Self {
        DocumentSeed {
            location,
            problem: self.problem,
        }
    }

    fn key_location(&self, key: &str) -> String {
        if self.location.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.location)
        }
    }

    fn fail<E: de::Error>(&self, location: String, reason: String) -> E {
        let message = format!("{location}: {reason}");
        let mut problem = self.problem.borrow_mut();
        if problem.is_none() {
            *problem = Some((location, reason));
        }
        E::custom(message)
    }
}

impl<'de, 'p> DeserializeSeed<'de> for DocumentSeed<'p> {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de, 'p> Visitor<'de> for DocumentSeed<'p> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML or JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        match Number::from_f64(v) {
            Some(n) => Ok(Value::Number(n)),
            None => Err(self.fail(self.location.clone(), format!("non-finite number {v}"))),
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(item) =
            seq.next_element_seed(self.at(format!("{}[{}]", self.location, items.len())))?
        {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut object = Map::new();
        while let Some(MapKey(key)) = map.next_key()? {
            let location = self.key_location(&key);
            if object.contains_key(&key) {
                return Err(self.fail(location, "declared twice".to_string()));
            }
            let value = map.next_value_seed(self.at(location))?;
            object.insert(key, value);
        }
        Ok(Value::Object(object))
    }

    // YAML tags (`!Thing value`) are dropped, keeping the tagged value
    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (MapKey(_tag), variant) = data.variant::<MapKey>()?;
        variant.newtype_variant_seed(self)
    }
}

/// A mapping key; YAML allows numbers and booleans, which become strings
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MapKeyVisitor)
    }
}

struct MapKeyVisitor;

impl<'de> Visitor<'de> for MapKeyVisitor {
    type Value = MapKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number or boolean mapping key")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<MapKey, E> {
        Ok(MapKey(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }
}

/// Import a raw spec document into a [`Definition`].
///
/// Pure: reads nothing from disk and writes nothing.
///
/// # Errors
///
/// [`GeneratorError::MalformedSpec`], [`GeneratorError::UnresolvedReference`]
/// or [`GeneratorError::UnknownType`].
pub fn import(raw: &str) -> GeneratorResult<Definition> {
    let document = parse_document(raw)?;
    let definition = build_definition(&document)?;
    debug!(
        version = %definition.version,
        paths = definition.paths.len(),
        components = definition.component_definitions.len(),
        "Imported spec"
    );
    Ok(definition)
}

/// Read and import a spec file.
pub fn import_file(path: &Path) -> GeneratorResult<Definition> {
    let raw = std::fs::read_to_string(path).map_err(|source| GeneratorError::SpecUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    import(&raw)
}
