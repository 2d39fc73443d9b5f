//! Resource interface and resource implementation emitters.
//!
//! Both files of a path share the signature rendering below, so the stub
//! always implements exactly what the interface declares.

use super::templates::{
    Placeholders, TemplateEngine, TEMPLATE_RESOURCE_IMPLEMENTATION, TEMPLATE_RESOURCE_INTERFACE,
};
use super::unit::{Protection, RenderedUnit};
use crate::config::ModuleConfig;
use crate::error::GeneratorResult;
use crate::naming::{
    java_identifier, lower_case_first, model_class_name, resource_implementation_name,
    resource_interface_name, unique_name,
};
use crate::spec::{Method, PathDefinition, SchemaRef};
use std::collections::{BTreeSet, HashSet};

const MEDIA_RANGE: &str = "application/*";

/// Render `<Path>Resource.java`.
pub fn render_resource_interface(
    path: &PathDefinition,
    version: &str,
    config: &ModuleConfig,
    templates: &TemplateEngine,
) -> GeneratorResult<RenderedUnit> {
    let class_name = resource_interface_name(&path.name);

    let methods = path
        .methods
        .iter()
        .map(interface_method)
        .collect::<Vec<_>>()
        .join("\n\n");

    let placeholders = Placeholders::from([
        ("PACKAGE", config.resource_interface_package_path.clone()),
        (
            "MODEL_IMPORT_STATEMENTS",
            model_import_statements(&config.model_package_path, path),
        ),
        (
            "CORE_IMPORT_STATEMENTS",
            core_import_statements(&config.core_package_path, &path.methods),
        ),
        (
            "MODEL_IMPORT_STATEMENTS_JAVAX",
            to_import_lines(&interface_javax_imports(&path.methods)),
        ),
        ("API_VERSION", version.to_string()),
        ("AUTHOR", config.author.clone()),
        ("PATH", path.name.clone()),
        ("MODEL_RESOURCE_INTERFACE_CLASS", class_name.clone()),
        ("METHODS", methods),
    ]);
    let contents = templates.render(TEMPLATE_RESOURCE_INTERFACE, &placeholders)?;

    let file = config
        .package_dir(&config.resource_interface_package_path)
        .join(format!("{class_name}.java"));
    Ok(RenderedUnit::new(file, contents))
}

/// Render `<Path>ResourceImpl.java`, protected by `overwrite_implementation`.
pub fn render_resource_implementation(
    path: &PathDefinition,
    version: &str,
    config: &ModuleConfig,
    templates: &TemplateEngine,
) -> GeneratorResult<RenderedUnit> {
    let class_name = resource_implementation_name(&path.name);
    let interface_name = resource_interface_name(&path.name);

    let import_statements = format!(
        "{}{}import {}.{};",
        model_import_statements(&config.model_package_path, path),
        core_import_statements(&config.core_package_path, &path.methods),
        config.resource_interface_package_path,
        interface_name
    );
    let javax = if path.methods.iter().any(|m| m.response.is_none()) {
        "import javax.ws.rs.core.Response;\n\n"
    } else {
        ""
    };

    let methods = path
        .methods
        .iter()
        .map(implementation_method)
        .collect::<Vec<_>>()
        .join("\n\n");

    let placeholders = Placeholders::from([
        ("PACKAGE", config.resource_package_path.clone()),
        ("IMPORT_STATEMENTS", import_statements),
        ("MODEL_IMPORT_STATEMENTS_JAVAX", javax.to_string()),
        ("API_VERSION", version.to_string()),
        ("AUTHOR", config.author.clone()),
        ("APPLICATION_NAME", config.application_name.clone()),
        ("PATH", path.name.clone()),
        ("MODEL_RESOURCE_INTERFACE_CLASS", interface_name),
        ("MODEL_RESOURCE_IMPLEMENTATION_CLASS", class_name.clone()),
        ("METHODS", methods),
    ]);
    let contents = templates.render(TEMPLATE_RESOURCE_IMPLEMENTATION, &placeholders)?;

    let file = config
        .package_dir(&config.resource_package_path)
        .join(format!("{class_name}.java"));
    Ok(RenderedUnit::new(file, contents).protected(Protection::Implementation))
}

/// One `import <model package>.<Name>DTO;` line per referenced model, in
/// order of first reference
pub fn model_import_statements(model_package: &str, path: &PathDefinition) -> String {
    path.referenced_models
        .iter()
        .map(|model| format!("import {model_package}.{};\n", model_class_name(model)))
        .collect()
}

fn core_import_statements(core_package: &str, methods: &[Method]) -> String {
    let mut out = format!("import {core_package}.context.Language;\n");
    if methods.iter().any(Method::is_collection) {
        out.push_str(&format!("import {core_package}.context.Pagination;\n"));
        out.push_str(&format!("import {core_package}.model.CollectionDTO;\n"));
    }
    out
}

/// Fully qualified javax types used by the interface, sorted
fn interface_javax_imports(methods: &[Method]) -> BTreeSet<String> {
    let mut imports = BTreeSet::new();
    imports.insert("javax.ws.rs.Path".to_string());
    imports.insert("javax.ws.rs.core.Context".to_string());
    for method in methods {
        imports.insert(format!("javax.ws.rs.{}", method.verb.as_str()));
        if !method.path_parameters.is_empty() {
            imports.insert("javax.ws.rs.PathParam".to_string());
        }
        if !method.query_parameters.is_empty() {
            imports.insert("javax.ws.rs.QueryParam".to_string());
        }
        if method.request.is_some() {
            imports.insert("javax.ws.rs.Consumes".to_string());
        }
        if method.response.is_some() {
            imports.insert("javax.ws.rs.Produces".to_string());
        } else {
            imports.insert("javax.ws.rs.core.Response".to_string());
        }
    }
    imports
}

fn to_import_lines(imports: &BTreeSet<String>) -> String {
    imports
        .iter()
        .map(|i| format!("import {i};"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Method annotations, sorted case-insensitively
fn method_annotations(method: &Method) -> Vec<String> {
    let mut annotations = vec![
        format!("@{}", method.verb.as_str()),
        format!("@Path(\"{}\")", method.relative_path),
    ];
    if method.request.is_some() {
        annotations.push(format!("@Consumes(\"{MEDIA_RANGE}\")"));
    }
    if method.response.is_some() {
        annotations.push(format!("@Produces(\"{MEDIA_RANGE}\")"));
    }
    annotations.sort_by_key(|a| a.to_lowercase());
    annotations
}

pub fn return_type(method: &Method) -> String {
    match &method.response {
        Some(SchemaRef {
            model,
            collection: true,
        }) => format!("CollectionDTO<{}>", model_class_name(model)),
        Some(SchemaRef {
            model,
            collection: false,
        }) => model_class_name(model),
        None => "Response".to_string(),
    }
}

fn request_argument(request: &SchemaRef) -> (String, String) {
    let class_name = model_class_name(&request.model);
    let variable = lower_case_first(&class_name);
    if request.collection {
        (format!("{class_name}[]"), format!("{variable}s"))
    } else {
        (class_name, variable)
    }
}

/// Method arguments in declaration order: path parameters, query parameters,
/// request body, language, then pagination for collection responses.
/// JAX-RS annotations are included when `annotated`.
///
/// Parameter variables are Java identifiers distinct from the request,
/// `language` and `pagination` arguments; the annotation keeps the spec name.
fn arguments(method: &Method, annotated: bool) -> Vec<String> {
    let request = method.request.as_ref().map(request_argument);
    let mut taken = HashSet::from(["language".to_string()]);
    if method.is_collection() {
        taken.insert("pagination".to_string());
    }
    if let Some((_, name)) = &request {
        taken.insert(name.clone());
    }

    let context = if annotated { "@Context " } else { "" };
    let mut args: Vec<String> = method
        .path_parameters
        .iter()
        .map(|p| ("PathParam", p))
        .chain(method.query_parameters.iter().map(|p| ("QueryParam", p)))
        .map(|(annotation, p)| {
            let variable = unique_name(&mut taken, &java_identifier(&p.name));
            if annotated {
                format!("@{annotation}(\"{}\") {} {variable}", p.name, p.target_type)
            } else {
                format!("{} {variable}", p.target_type)
            }
        })
        .collect();
    if let Some((ty, name)) = request {
        args.push(format!("{ty} {name}"));
    }
    args.push(format!("{context}Language language"));
    if method.is_collection() {
        args.push(format!("{context}Pagination pagination"));
    }
    args
}

fn interface_method(method: &Method) -> String {
    let annotations: String = method_annotations(method)
        .iter()
        .map(|a| format!("\t{a}\n"))
        .collect();
    format!(
        "{annotations}\tpublic {} {}(\n\t\t\t{})\n\t\tthrows Exception;",
        return_type(method),
        method.name,
        arguments(method, true).join(", ")
    )
}

fn implementation_method(method: &Method) -> String {
    let ty = return_type(method);
    let body = if method.response.is_none() {
        "return Response.ok().build();"
    } else {
        "return null;"
    };
    format!(
        "\t@Override\n\tpublic {ty} {}(\n\t\t\t{})\n\t\tthrows Exception {{\n\n\t\t{body}\n\t}}",
        method.name,
        arguments(method, false).join(", ")
    )
}
