use super::templates::{
    Placeholders, TemplateEngine, TEMPLATE_APPLICATION, TEMPLATE_BASIC_AUTHENTICATION,
    TEMPLATE_BND, TEMPLATE_GRADLE,
};
use super::unit::{Protection, RenderedUnit};
use crate::config::ModuleConfig;
use crate::error::GeneratorResult;
use crate::naming::resource_interface_name;
use crate::spec::Definition;

/// Render the JAX-RS application class serving every path's resource.
pub fn render_application(
    definition: &Definition,
    config: &ModuleConfig,
    templates: &TemplateEngine,
) -> GeneratorResult<RenderedUnit> {
    let basic_authentication = if config.basic_security_allowed {
        templates.load(TEMPLATE_BASIC_AUTHENTICATION)?.to_string()
    } else {
        String::new()
    };
    let resources = definition
        .paths
        .iter()
        .map(|p| resource_interface_name(&p.name))
        .collect::<Vec<_>>()
        .join(", ");

    let placeholders = Placeholders::from([
        ("PACKAGE", config.api_package_path.clone()),
        ("AUTHOR", config.author.clone()),
        ("APPLICATION_BASE", config.application_base.clone()),
        ("APPLICATION_NAME", config.application_name.clone()),
        ("BASIC_AUTHENTICATION", basic_authentication),
        ("APPLICATION_CLASS", config.application_class_name.clone()),
        ("RESOURCES", resources),
    ]);
    let contents = templates.render(TEMPLATE_APPLICATION, &placeholders)?;

    let path = config
        .package_dir(&config.api_package_path)
        .join(format!("{}.java", config.application_class_name));
    Ok(RenderedUnit::new(path, contents))
}

/// Render `bnd.bnd`, protected by `overwrite_metadata`.
pub fn render_bnd(config: &ModuleConfig, templates: &TemplateEngine) -> GeneratorResult<RenderedUnit> {
    let placeholders = Placeholders::from([
        ("BUNDLE_NAME", config.bundle_name.clone()),
        ("BUNDLE_SYMBOLIC_NAME", config.bundle_symbolic_name.clone()),
        ("BUNDLE_VERSION", config.bundle_version.clone()),
    ]);
    let contents = templates.render(TEMPLATE_BND, &placeholders)?;
    Ok(RenderedUnit::new(config.module_output_path.join("bnd.bnd"), contents)
        .protected(Protection::Metadata))
}

/// Render `build.gradle`. Always rewritten.
pub fn render_gradle(config: &ModuleConfig, templates: &TemplateEngine) -> GeneratorResult<RenderedUnit> {
    let contents = templates.render(TEMPLATE_GRADLE, &Placeholders::new())?;
    Ok(RenderedUnit::new(
        config.module_output_path.join("build.gradle"),
        contents,
    ))
}
