use crate::type_mapping::SCHEMA_REF_PREFIX;
use indexmap::{IndexMap, IndexSet};
use std::fmt;

/// HTTP verbs a resource method can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpVerb {
    /// Parse a path-item key (`get`, `post`, ...). Keys that are not verbs
    /// (`summary`, `parameters`, `x-*`) yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(HttpVerb::Get),
            "post" => Some(HttpVerb::Post),
            "put" => Some(HttpVerb::Put),
            "delete" => Some(HttpVerb::Delete),
            "patch" => Some(HttpVerb::Patch),
            "head" => Some(HttpVerb::Head),
            "options" => Some(HttpVerb::Options),
            _ => None,
        }
    }

    /// Upper-case name, which is also the JAX-RS annotation name
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Head => "HEAD",
            HttpVerb::Options => "OPTIONS",
        }
    }

    /// Lower-case prefix used to derive a method name when `operationId` is absent
    pub fn as_prefix(&self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Delete => "delete",
            HttpVerb::Patch => "patch",
            HttpVerb::Head => "head",
            HttpVerb::Options => "options",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "Path"),
            ParameterLocation::Query => write!(f, "Query"),
        }
    }
}

/// A raw type as declared in the spec.
///
/// `token` is the `type` keyword or the full `$ref` string
/// (`#/components/schemas/Foo`); `items` is set for arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecType {
    pub token: String,
    pub format: Option<String>,
    pub items: Option<Box<SpecType>>,
}

impl SpecType {
    pub fn primitive(token: impl Into<String>) -> Self {
        SpecType {
            token: token.into(),
            format: None,
            items: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn array_of(items: SpecType) -> Self {
        SpecType {
            token: "array".to_string(),
            format: None,
            items: Some(Box::new(items)),
        }
    }

    pub fn is_reference(&self) -> bool {
        self.token.starts_with("#/")
    }

    /// Component schema this type points at, directly or as array items
    pub fn schema_name(&self) -> Option<&str> {
        match self.token.strip_prefix(SCHEMA_REF_PREFIX) {
            Some(name) => Some(name),
            None => self.items.as_deref().and_then(SpecType::schema_name),
        }
    }
}

impl fmt::Display for SpecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.items, &self.format) {
            (Some(items), _) => write!(f, "{}<{}>", self.token, items),
            (None, Some(format)) => write!(f, "{}({})", self.token, format),
            (None, None) => f.write_str(&self.token),
        }
    }
}

/// A request or response body bound to a component schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRef {
    /// Name of the referenced component
    pub model: String,
    /// `true` when the body is an array of the component
    pub collection: bool,
}

/// A path or query parameter of a method
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub spec_type: SpecType,
    /// Java type resolved by the type mapper
    pub target_type: String,
}

/// One HTTP operation inside a [`PathDefinition`]
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// Java method name (`operationId` or derived)
    pub name: String,
    pub verb: HttpVerb,
    /// URL below the path's own segment, always starting with `/`
    pub relative_path: String,
    pub path_parameters: Vec<Parameter>,
    pub query_parameters: Vec<Parameter>,
    pub request: Option<SchemaRef>,
    pub response: Option<SchemaRef>,
}

impl Method {
    pub fn is_collection(&self) -> bool {
        self.response.as_ref().is_some_and(|r| r.collection)
    }
}

/// A resource grouping: every URL sharing the same first segment
#[derive(Debug, Clone, PartialEq)]
pub struct PathDefinition {
    /// Identifier derived from the first URL segment (e.g. `productOption`)
    pub name: String,
    pub methods: Vec<Method>,
    /// Schemas used by any method, in order of first reference
    pub referenced_models: IndexSet<String>,
}

/// A named record declared under `components`
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDefinition {
    pub name: String,
    /// Declared under `components.parameters`; never emitted as a model
    pub is_parameter: bool,
    /// Declaration order, which becomes field and accessor order
    pub property_definitions: Vec<PropertyDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    pub name: String,
    pub spec_type: SpecType,
    /// Java type resolved by the type mapper
    pub target_type: String,
}

/// Root of an imported spec. Immutable once the importer returns it.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    /// `info.version`
    pub version: String,
    /// Declaration order
    pub paths: Vec<PathDefinition>,
    /// Keyed by component name, declaration order
    pub component_definitions: IndexMap<String, ComponentDefinition>,
}

impl Definition {
    pub fn component(&self, name: &str) -> Option<&ComponentDefinition> {
        self.component_definitions.get(name)
    }

    /// Components that produce a model file
    pub fn model_components(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.component_definitions
            .values()
            .filter(|c| !c.is_parameter)
    }

    /// `roots` plus every component reachable from them through property
    /// types, roots first and the rest in discovery order
    pub fn reachable_models<'a, I>(&self, roots: I) -> IndexSet<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut reachable: IndexSet<String> = roots.into_iter().cloned().collect();
        let mut next = 0;
        while let Some(name) = reachable.get_index(next).cloned() {
            next += 1;
            let Some(component) = self.component(&name) else {
                continue;
            };
            for property in &component.property_definitions {
                if let Some(target) = property.spec_type.schema_name() {
                    reachable.insert(target.to_string());
                }
            }
        }
        reachable
    }
}
