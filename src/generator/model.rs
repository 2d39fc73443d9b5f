use super::templates::{Placeholders, TemplateEngine, TEMPLATE_MODEL};
use super::unit::RenderedUnit;
use crate::config::ModuleConfig;
use crate::error::GeneratorResult;
use crate::naming::{java_identifier, model_class_name, upper_case_first};
use crate::spec::{ComponentDefinition, PropertyDefinition};
use crate::type_mapping::needs_date_import;
use std::collections::HashSet;

/// Render the DTO class of a component.
///
/// One private field and one getter/setter pair per property, both in
/// declaration order.
pub fn render_model(
    component: &ComponentDefinition,
    config: &ModuleConfig,
    templates: &TemplateEngine,
) -> GeneratorResult<RenderedUnit> {
    let class_name = model_class_name(&component.name);
    let properties = &component.property_definitions;

    let imports = if properties.iter().any(|p| needs_date_import(&p.target_type)) {
        "import java.util.Date;\n\n"
    } else {
        ""
    };
    let identifiers = property_identifiers(properties);
    let methods = properties
        .iter()
        .zip(&identifiers)
        .map(|(p, name)| accessor_pair(p, name))
        .collect::<Vec<_>>()
        .join("\n\n");
    let variables = properties
        .iter()
        .zip(&identifiers)
        .map(|(p, name)| format!("\tprivate {} _{name};", p.target_type))
        .collect::<Vec<_>>()
        .join("\n");

    let placeholders = Placeholders::from([
        ("PACKAGE", config.model_package_path.clone()),
        ("AUTHOR", config.author.clone()),
        ("MODEL_CLASS", class_name.clone()),
        ("IMPORTS", imports.to_string()),
        ("METHODS", methods),
        ("VARIABLES", variables),
    ]);
    let contents = templates.render(TEMPLATE_MODEL, &placeholders)?;

    let path = config
        .package_dir(&config.model_package_path)
        .join(format!("{class_name}.java"));
    Ok(RenderedUnit::new(path, contents))
}

/// Java names of the properties, unique per accessor so `name` and `Name`
/// do not both produce `getName()`.
fn property_identifiers(properties: &[PropertyDefinition]) -> Vec<String> {
    let mut accessors = HashSet::new();
    properties
        .iter()
        .map(|p| {
            let base = java_identifier(&p.name);
            let mut name = base.clone();
            let mut counter = 1;
            while !accessors.insert(upper_case_first(&name)) {
                name = format!("{base}_{counter}");
                counter += 1;
            }
            name
        })
        .collect()
}

fn accessor_pair(property: &PropertyDefinition, name: &str) -> String {
    let ty = &property.target_type;
    let suffix = upper_case_first(name);
    format!(
        "\tpublic {ty} get{suffix}() {{\n\t\treturn _{name};\n\t}}\n\n\
         \tpublic void set{suffix}({ty} {name}) {{\n\t\t_{name} = {name};\n\t}}"
    )
}
