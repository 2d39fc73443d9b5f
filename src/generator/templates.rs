//! Template loading and `${NAME}` placeholder substitution.

use crate::error::{GeneratorError, GeneratorResult};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

pub const TEMPLATE_APPLICATION: &str = "Application.java.tpl";
pub const TEMPLATE_BASIC_AUTHENTICATION: &str = "basic.authentication.tpl";
pub const TEMPLATE_BND: &str = "bnd.bnd.tpl";
pub const TEMPLATE_GRADLE: &str = "build.gradle.tpl";
pub const TEMPLATE_MODEL: &str = "Model.java.tpl";
pub const TEMPLATE_RESOURCE_IMPLEMENTATION: &str = "ResourceImpl.java.tpl";
pub const TEMPLATE_RESOURCE_INTERFACE: &str = "Resource.java.tpl";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Z0-9_]+)\}").expect("placeholder regex should be valid")
});

/// Built-in template set, compiled into the binary
fn builtin(name: &str) -> Option<&'static str> {
    let text = match name {
        TEMPLATE_APPLICATION => include_str!("../../templates/Application.java.tpl"),
        TEMPLATE_BASIC_AUTHENTICATION => include_str!("../../templates/basic.authentication.tpl"),
        TEMPLATE_BND => include_str!("../../templates/bnd.bnd.tpl"),
        TEMPLATE_GRADLE => include_str!("../../templates/build.gradle.tpl"),
        TEMPLATE_MODEL => include_str!("../../templates/Model.java.tpl"),
        TEMPLATE_RESOURCE_IMPLEMENTATION => include_str!("../../templates/ResourceImpl.java.tpl"),
        TEMPLATE_RESOURCE_INTERFACE => include_str!("../../templates/Resource.java.tpl"),
        _ => return None,
    };
    Some(text)
}

/// Placeholder name -> rendered text
pub type Placeholders = HashMap<&'static str, String>;

/// Loads templates and renders them.
///
/// Templates are looked up in the override directory first, then in the
/// built-in set. Each template is read at most once per engine.
#[derive(Debug, Default)]
pub struct TemplateEngine {
    override_dir: Option<PathBuf>,
    cache: RefCell<HashMap<String, Rc<str>>>,
}

impl TemplateEngine {
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        TemplateEngine {
            override_dir,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Engine using only the built-in templates
    pub fn builtin() -> Self {
        Self::new(None)
    }

    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    /// Load a template by file name.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::TemplateMissing`] when the name is neither in the
    /// override directory nor built in, [`GeneratorError::TemplateUnreadable`]
    /// when an override exists but cannot be read.
    pub fn load(&self, name: &str) -> GeneratorResult<Rc<str>> {
        if let Some(text) = self.cache.borrow().get(name) {
            return Ok(Rc::clone(text));
        }

        let text: Rc<str> = match self.override_dir.as_ref().map(|dir| dir.join(name)) {
            Some(path) if path.is_file() => {
                debug!(template = name, path = %path.display(), "Loading template override");
                std::fs::read_to_string(&path)
                    .map_err(|source| GeneratorError::TemplateUnreadable { path, source })?
                    .into()
            }
            _ => builtin(name)
                .ok_or_else(|| GeneratorError::TemplateMissing {
                    name: name.to_string(),
                })?
                .into(),
        };

        self.cache
            .borrow_mut()
            .insert(name.to_string(), Rc::clone(&text));
        Ok(text)
    }

    /// Render a template, replacing each `${NAME}` with its value.
    ///
    /// Substitution is a single pass: values are inserted verbatim and never
    /// re-scanned. Tokens without a value are left as they are.
    pub fn render(&self, name: &str, placeholders: &Placeholders) -> GeneratorResult<String> {
        let template = self.load(name)?;
        Ok(substitute(&template, placeholders))
    }

    /// Distinct placeholder names used by a template, in order of appearance
    pub fn placeholders(&self, name: &str) -> GeneratorResult<Vec<String>> {
        let template = self.load(name)?;
        Ok(placeholder_names(&template))
    }
}

fn substitute(template: &str, placeholders: &Placeholders) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            placeholders
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Distinct `${NAME}` tokens in `text`, in order of appearance
pub fn placeholder_names(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
