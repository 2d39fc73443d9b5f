use super::types::{
    ComponentDefinition, Definition, HttpVerb, Method, Parameter, ParameterLocation,
    PathDefinition, PropertyDefinition, SchemaRef, SpecType,
};
use crate::error::{GeneratorError, GeneratorResult};
use crate::naming::{java_identifier, to_camel_case, unique_method_name, upper_case_first};
use crate::type_mapping::{TypeMapper, PARAMETER_REF_PREFIX};
use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

const DEFAULT_VERSION: &str = "1.0";

/// A parameter as declared, before its type is mapped
#[derive(Debug, Clone)]
struct RawParameter {
    name: String,
    location: Option<ParameterLocation>,
    required: bool,
    spec_type: SpecType,
}

/// Build a [`Definition`] from a parsed document.
///
/// Components are read first so that every reference made by a path or a
/// property can be resolved; nothing is returned unless the whole document
/// resolves.
pub fn build_definition(document: &Value) -> GeneratorResult<Definition> {
    let root = as_object(document, "document")?;

    let version = match root.get("info").and_then(|info| info.get("version")) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => DEFAULT_VERSION.to_string(),
    };

    let (schemas, parameters) = collect_components(root.get("components"))?;
    let mapper = TypeMapper::new(schemas.keys().cloned());

    let mut component_definitions = IndexMap::new();
    for (name, properties) in &schemas {
        let mut property_definitions = Vec::with_capacity(properties.len());
        for (property, spec_type) in properties {
            let location = format!("component {name} property {property}");
            property_definitions.push(PropertyDefinition {
                name: property.clone(),
                target_type: mapper.map_type(spec_type, &location)?,
                spec_type: spec_type.clone(),
            });
        }
        component_definitions.insert(
            name.clone(),
            ComponentDefinition {
                name: name.clone(),
                is_parameter: false,
                property_definitions,
            },
        );
    }
    for (name, raw) in &parameters {
        let location = format!("parameter component {name}");
        component_definitions.insert(
            name.clone(),
            ComponentDefinition {
                name: name.clone(),
                is_parameter: true,
                property_definitions: vec![PropertyDefinition {
                    name: raw.name.clone(),
                    target_type: mapper.map_type(&raw.spec_type, &location)?,
                    spec_type: raw.spec_type.clone(),
                }],
            },
        );
    }

    let paths = match root.get("paths") {
        Some(paths) => build_paths(as_object(paths, "paths")?, &parameters, &mapper)?,
        None => Vec::new(),
    };

    Ok(Definition {
        version,
        paths,
        component_definitions,
    })
}

type SchemaTable = IndexMap<String, Vec<(String, SpecType)>>;
type ParameterTable = IndexMap<String, RawParameter>;

fn collect_components(components: Option<&Value>) -> GeneratorResult<(SchemaTable, ParameterTable)> {
    let mut schemas = SchemaTable::new();
    let mut parameters = ParameterTable::new();
    let Some(components) = components else {
        return Ok((schemas, parameters));
    };
    let components = as_object(components, "components")?;

    if let Some(declared) = components.get("schemas") {
        for (name, schema) in as_object(declared, "components.schemas")? {
            let location = format!("components.schemas.{name}");
            let schema = as_object(schema, &location)?;
            let mut properties = Vec::new();
            if let Some(props) = schema.get("properties") {
                let props_location = format!("{location}.properties");
                for (property, prop_schema) in as_object(props, &props_location)? {
                    let prop_location = format!("{props_location}.{property}");
                    properties.push((property.clone(), parse_spec_type(prop_schema, &prop_location)?));
                }
            }
            schemas.insert(name.clone(), properties);
        }
    }

    if let Some(declared) = components.get("parameters") {
        for (name, parameter) in as_object(declared, "components.parameters")? {
            let location = format!("components.parameters.{name}");
            if schemas.contains_key(name) {
                return Err(GeneratorError::malformed(
                    location,
                    "component name is already declared as a schema",
                ));
            }
            parameters.insert(name.clone(), parse_raw_parameter(parameter, &location)?);
        }
    }

    Ok((schemas, parameters))
}

fn build_paths(
    paths: &Map<String, Value>,
    parameters: &ParameterTable,
    mapper: &TypeMapper,
) -> GeneratorResult<Vec<PathDefinition>> {
    let mut grouped: IndexMap<String, PathDefinition> = IndexMap::new();
    let mut seen_methods: HashMap<String, HashSet<String>> = HashMap::new();

    for (url, item) in paths {
        let item_location = format!("paths.{url}");
        let item = as_object(item, &item_location)?;
        let (name, relative_path) = split_url(url)
            .ok_or_else(|| GeneratorError::malformed(&item_location, "cannot derive a resource name from the URL"))?;

        let shared = match item.get("parameters") {
            Some(list) => parse_parameter_list(list, &format!("{item_location}.parameters"), parameters)?,
            None => Vec::new(),
        };

        for (key, operation) in item {
            let Some(verb) = HttpVerb::from_key(key) else {
                continue;
            };
            let location = format!("{item_location}.{key}");
            let operation = as_object(operation, &location)?;

            let method_name = match operation.get("operationId").and_then(Value::as_str) {
                Some(id) if !id.is_empty() => java_identifier(id),
                _ => format!("{}{}", verb.as_prefix(), upper_case_first(&name)),
            };
            let method_name = unique_method_name(seen_methods.entry(name.clone()).or_default(), &method_name);

            let own = match operation.get("parameters") {
                Some(list) => parse_parameter_list(list, &format!("{location}.parameters"), parameters)?,
                None => Vec::new(),
            };
            let merged = merge_parameters(&shared, own);

            let path = grouped.entry(name.clone()).or_insert_with(|| PathDefinition {
                name: name.clone(),
                methods: Vec::new(),
                referenced_models: IndexSet::new(),
            });

            let mut path_parameters = Vec::new();
            let mut query_parameters = Vec::new();
            for raw in merged {
                let Some(param_location) = raw.location else {
                    continue;
                };
                let where_used = format!("{location} parameter {}", raw.name);
                let parameter = Parameter {
                    target_type: mapper.map_type(&raw.spec_type, &where_used)?,
                    required: raw.required || param_location == ParameterLocation::Path,
                    name: raw.name,
                    location: param_location,
                    spec_type: raw.spec_type,
                };
                if let Some(model) = referenced_schema(&parameter.spec_type, mapper, &where_used)? {
                    path.referenced_models.insert(model);
                }
                match param_location {
                    ParameterLocation::Path => path_parameters.push(parameter),
                    ParameterLocation::Query => query_parameters.push(parameter),
                }
            }

            let request = match operation.get("requestBody") {
                Some(body) => body_schema_ref(body, &format!("{location}.requestBody"), mapper)?,
                None => None,
            };
            let response = match operation.get("responses") {
                Some(responses) => response_schema_ref(responses, &format!("{location}.responses"), mapper)?,
                None => None,
            };
            for body in request.iter().chain(response.iter()) {
                path.referenced_models.insert(body.model.clone());
            }

            path.methods.push(Method {
                name: method_name,
                verb,
                relative_path: relative_path.clone(),
                path_parameters,
                query_parameters,
                request,
                response,
            });
        }
    }

    Ok(grouped.into_values().collect())
}

/// Split `/productOption/{id}/value` into (`productOption`, `/{id}/value`).
fn split_url(url: &str) -> Option<(String, String)> {
    let trimmed = url.trim_start_matches('/');
    let (first, rest) = match trimmed.split_once('/') {
        Some((first, rest)) => (first, rest),
        None => (trimmed, ""),
    };
    let name = to_camel_case(first.trim_matches(|c| c == '{' || c == '}'));
    if name.is_empty() {
        return None;
    }
    Some((name, format!("/{rest}")))
}

/// Operation-level parameters replace path-level ones with the same name and location.
fn merge_parameters(shared: &[RawParameter], own: Vec<RawParameter>) -> Vec<RawParameter> {
    let mut merged: Vec<RawParameter> = shared
        .iter()
        .filter(|s| !own.iter().any(|o| o.name == s.name && o.location == s.location))
        .cloned()
        .collect();
    merged.extend(own);
    merged
}

fn parse_parameter_list(
    list: &Value,
    location: &str,
    components: &ParameterTable,
) -> GeneratorResult<Vec<RawParameter>> {
    let Value::Array(items) = list else {
        return Err(GeneratorError::malformed(location, "parameters is not a list"));
    };
    let mut parameters = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item_location = format!("{location}[{index}]");
        let item_obj = as_object(item, &item_location)?;
        let raw = match item_obj.get("$ref").and_then(Value::as_str) {
            Some(reference) => reference
                .strip_prefix(PARAMETER_REF_PREFIX)
                .and_then(|name| components.get(name))
                .cloned()
                .ok_or_else(|| GeneratorError::unresolved(reference, &item_location))?,
            None => parse_raw_parameter(item, &item_location)?,
        };
        parameters.push(raw);
    }
    Ok(parameters)
}

fn parse_raw_parameter(value: &Value, location: &str) -> GeneratorResult<RawParameter> {
    let obj = as_object(value, location)?;
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| GeneratorError::malformed(location, "parameter has no name"))?;
    let parameter_location = match obj.get("in").and_then(Value::as_str) {
        Some("path") => Some(ParameterLocation::Path),
        Some("query") => Some(ParameterLocation::Query),
        _ => None,
    };
    let spec_type = match obj.get("schema") {
        Some(schema) => parse_spec_type(schema, &format!("{location}.schema"))?,
        None => SpecType::primitive("string"),
    };
    Ok(RawParameter {
        name: name.to_string(),
        location: parameter_location,
        required: obj.get("required").and_then(Value::as_bool).unwrap_or(false),
        spec_type,
    })
}

/// Read a schema's type token, format and array items.
fn parse_spec_type(schema: &Value, location: &str) -> GeneratorResult<SpecType> {
    let obj = as_object(schema, location)?;
    if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
        return Ok(SpecType::primitive(reference));
    }
    let token = match obj.get("type") {
        Some(Value::String(token)) => token.clone(),
        // OpenAPI 3.1 allows `type: [string, "null"]`
        Some(Value::Array(tokens)) => tokens
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null")
            .map(str::to_string)
            .ok_or_else(|| GeneratorError::malformed(location, "type list has no non-null entry"))?,
        Some(_) => return Err(GeneratorError::malformed(location, "type is not a string")),
        None => return Err(GeneratorError::malformed(location, "schema has neither type nor $ref")),
    };
    let items = match (token.as_str(), obj.get("items")) {
        ("array", Some(items)) => Some(Box::new(parse_spec_type(items, &format!("{location}.items"))?)),
        _ => None,
    };
    Ok(SpecType {
        token,
        format: obj.get("format").and_then(Value::as_str).map(str::to_string),
        items,
    })
}

/// Schema name referenced by a type, looking through arrays.
fn referenced_schema(spec_type: &SpecType, mapper: &TypeMapper, location: &str) -> GeneratorResult<Option<String>> {
    if spec_type.is_reference() {
        return Ok(Some(mapper.resolve_reference(&spec_type.token, location)?.to_string()));
    }
    match spec_type.items.as_deref() {
        Some(items) => referenced_schema(items, mapper, location),
        None => Ok(None),
    }
}

/// First media type's schema of a `content` map, if any
fn content_schema(container: &Map<String, Value>) -> Option<&Value> {
    container
        .get("content")
        .and_then(Value::as_object)
        .and_then(|content| content.values().next())
        .and_then(|media| media.get("schema"))
}

fn body_schema_ref(body: &Value, location: &str, mapper: &TypeMapper) -> GeneratorResult<Option<SchemaRef>> {
    let body = as_object(body, location)?;
    if let Some(reference) = body.get("$ref").and_then(Value::as_str) {
        return Err(GeneratorError::unresolved(reference, location));
    }
    match content_schema(body) {
        Some(schema) => schema_ref(schema, location, mapper),
        None => Ok(None),
    }
}

fn response_schema_ref(responses: &Value, location: &str, mapper: &TypeMapper) -> GeneratorResult<Option<SchemaRef>> {
    let responses = as_object(responses, location)?;
    let success = responses
        .iter()
        .find(|(code, _)| code.starts_with('2'));
    let Some((code, response)) = success else {
        return Ok(None);
    };
    let response_location = format!("{location}.{code}");
    let response = as_object(response, &response_location)?;
    if let Some(reference) = response.get("$ref").and_then(Value::as_str) {
        return Err(GeneratorError::unresolved(reference, &response_location));
    }
    match content_schema(response) {
        Some(schema) => schema_ref(schema, &response_location, mapper),
        None => Ok(None),
    }
}

/// A body is bound to a model when it is a `$ref`, or an array of `$ref`.
/// Inline object bodies are not bound.
fn schema_ref(schema: &Value, location: &str, mapper: &TypeMapper) -> GeneratorResult<Option<SchemaRef>> {
    if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
        let model = mapper.resolve_reference(reference, location)?;
        return Ok(Some(SchemaRef {
            model: model.to_string(),
            collection: false,
        }));
    }
    let is_array = schema.get("type").and_then(Value::as_str) == Some("array");
    let item_ref = schema
        .get("items")
        .and_then(|items| items.get("$ref"))
        .and_then(Value::as_str);
    match (is_array, item_ref) {
        (true, Some(reference)) => {
            let model = mapper.resolve_reference(reference, location)?;
            Ok(Some(SchemaRef {
                model: model.to_string(),
                collection: true,
            }))
        }
        _ => Ok(None),
    }
}

fn as_object<'v>(value: &'v Value, location: &str) -> GeneratorResult<&'v Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| GeneratorError::malformed(location, "expected a mapping"))
}
