//! Module configuration for a generation run.
//!
//! Loaded once from a TOML file (conventionally `module.toml`) and passed by
//! reference to the orchestrator and every emitter:
//!
//! ```toml
//! api_package_path = "com.example.commerce.openapi.admin.application"
//! application_base = "/commerce-admin"
//! application_class_name = "CommerceAdminApplication"
//! application_name = "CommerceAdmin"
//! author = "Jane Doe"
//! basic_security_allowed = true
//! bundle_name = "Commerce OpenAPI Admin"
//! bundle_symbolic_name = "com.example.commerce.openapi.admin"
//! bundle_version = "1.0.0"
//! model_package_path = "com.example.commerce.openapi.admin.model.v1_0"
//! module_output_path = "../modules/commerce-openapi-admin"
//! resource_interface_package_path = "com.example.commerce.openapi.admin.resource.v1_0"
//! resource_package_path = "com.example.commerce.openapi.admin.internal.resource.v1_0"
//! ```

use crate::error::{GeneratorError, GeneratorResult};
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Package holding `context.Language`, `context.Pagination` and `model.CollectionDTO`
pub const DEFAULT_CORE_PACKAGE_PATH: &str = "com.liferay.commerce.openapi.core";

fn default_core_package_path() -> String {
    DEFAULT_CORE_PACKAGE_PATH.to_string()
}

/// Everything a run needs besides the spec itself
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleConfig {
    /// Package of the JAX-RS application class
    pub api_package_path: String,
    /// `osgi.jaxrs.application.base` of the application
    pub application_base: String,
    pub application_class_name: String,
    /// `osgi.jaxrs.name` of the application; resources select it by this name
    pub application_name: String,
    pub author: String,
    /// Add the basic-auth verifier property to the application
    #[serde(default)]
    pub basic_security_allowed: bool,
    pub bundle_name: String,
    pub bundle_symbolic_name: String,
    pub bundle_version: String,
    #[serde(default = "default_core_package_path")]
    pub core_package_path: String,
    pub model_package_path: String,
    pub module_output_path: PathBuf,
    /// Regenerate `*ResourceImpl.java` even when it already exists
    #[serde(default)]
    pub overwrite_implementation: bool,
    /// Regenerate `bnd.bnd` even when it already exists
    #[serde(default)]
    pub overwrite_metadata: bool,
    pub resource_interface_package_path: String,
    pub resource_package_path: String,
}

impl ModuleConfig {
    /// Parse a configuration from TOML text. Relative `module_output_path`
    /// values are left as written.
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let config: ModuleConfig =
            toml::from_str(contents).context("Failed to parse module configuration")?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// A relative `module_output_path` is resolved against the directory
    /// holding the file, so a config can be used from any working directory.
    pub fn from_toml_file(config_path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(config_path).with_context(|| {
            format!("Failed to read module config: {}", config_path.display())
        })?;
        let mut config: ModuleConfig = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse module config: {}", config_path.display())
        })?;
        if config.module_output_path.is_relative() {
            if let Some(dir) = config_path.parent() {
                config.module_output_path = dir.join(&config.module_output_path);
            }
        }
        Ok(config)
    }

    /// Check required values before anything is written.
    pub fn validate(&self) -> GeneratorResult<()> {
        let required: [(&'static str, &str); 8] = [
            ("application_base", self.application_base.as_str()),
            ("application_class_name", self.application_class_name.as_str()),
            ("application_name", self.application_name.as_str()),
            ("author", self.author.as_str()),
            ("bundle_name", self.bundle_name.as_str()),
            ("bundle_symbolic_name", self.bundle_symbolic_name.as_str()),
            ("bundle_version", self.bundle_version.as_str()),
            ("core_package_path", self.core_package_path.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(GeneratorError::InvalidConfig {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
        }

        let packages: [(&'static str, &str); 5] = [
            ("api_package_path", self.api_package_path.as_str()),
            ("core_package_path", self.core_package_path.as_str()),
            ("model_package_path", self.model_package_path.as_str()),
            ("resource_interface_package_path", self.resource_interface_package_path.as_str()),
            ("resource_package_path", self.resource_package_path.as_str()),
        ];
        for (field, value) in packages {
            if !is_package_path(value) {
                return Err(GeneratorError::InvalidConfig {
                    field,
                    reason: format!("'{value}' is not a dotted Java package name"),
                });
            }
        }

        if !is_java_identifier(&self.application_class_name) {
            return Err(GeneratorError::InvalidConfig {
                field: "application_class_name",
                reason: format!("'{}' is not a Java identifier", self.application_class_name),
            });
        }

        if self.module_output_path.as_os_str().is_empty() {
            return Err(GeneratorError::InvalidConfig {
                field: "module_output_path",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Directory a package's sources go to: `<out>/src/main/java/<pkg/as/dirs>`
    pub fn package_dir(&self, package: &str) -> PathBuf {
        package
            .split('.')
            .fold(self.java_source_root(), |dir, segment| dir.join(segment))
    }

    pub fn java_source_root(&self) -> PathBuf {
        self.module_output_path.join("src").join("main").join("java")
    }

    pub fn resource_root(&self) -> PathBuf {
        self.module_output_path.join("src").join("main").join("resources")
    }
}

fn is_java_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn is_package_path(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_java_identifier)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_config(out: &Path) -> ModuleConfig {
        ModuleConfig {
            api_package_path: "com.example.api".into(),
            application_base: "/commerce".into(),
            application_class_name: "CommerceApplication".into(),
            application_name: "Commerce".into(),
            author: "Test Author".into(),
            basic_security_allowed: false,
            bundle_name: "Commerce OpenAPI".into(),
            bundle_symbolic_name: "com.example.commerce.openapi".into(),
            bundle_version: "1.0.0".into(),
            core_package_path: DEFAULT_CORE_PACKAGE_PATH.into(),
            model_package_path: "com.example.model.v1_0".into(),
            module_output_path: out.to_path_buf(),
            overwrite_implementation: false,
            overwrite_metadata: false,
            resource_interface_package_path: "com.example.resource.v1_0".into(),
            resource_package_path: "com.example.internal.resource.v1_0".into(),
        }
    }

    const MINIMAL: &str = r#"
api_package_path = "com.example.api"
application_base = "/commerce"
application_class_name = "CommerceApplication"
application_name = "Commerce"
author = "Test Author"
bundle_name = "Commerce OpenAPI"
bundle_symbolic_name = "com.example.commerce.openapi"
bundle_version = "1.0.0"
model_package_path = "com.example.model.v1_0"
module_output_path = "out/commerce"
resource_interface_package_path = "com.example.resource.v1_0"
resource_package_path = "com.example.internal.resource.v1_0"
"#;

    #[test]
    fn test_defaults_are_safe() {
        let config = ModuleConfig::from_toml_str(MINIMAL).unwrap();
        assert!(!config.overwrite_implementation);
        assert!(!config.overwrite_metadata);
        assert!(!config.basic_security_allowed);
        assert_eq!(config.core_package_path, DEFAULT_CORE_PACKAGE_PATH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overwrite_flags_are_independent() {
        let text = format!("{MINIMAL}overwrite_implementation = true\n");
        let config = ModuleConfig::from_toml_str(&text).unwrap();
        assert!(config.overwrite_implementation);
        assert!(!config.overwrite_metadata);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let text = format!("{MINIMAL}colour = \"blue\"\n");
        assert!(ModuleConfig::from_toml_str(&text).is_err());
    }

    #[test]
    fn test_relative_output_resolved_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("module.toml");
        std::fs::write(&path, MINIMAL).unwrap();
        let config = ModuleConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.module_output_path, dir.path().join("out/commerce"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = sample_config(Path::new("/tmp/out"));
        config.author = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(GeneratorError::InvalidConfig { field: "author", .. })
        ));

        let mut config = sample_config(Path::new("/tmp/out"));
        config.model_package_path = "com.example..model".into();
        assert!(matches!(
            config.validate(),
            Err(GeneratorError::InvalidConfig { field: "model_package_path", .. })
        ));
    }

    #[test]
    fn test_package_dir() {
        let config = sample_config(Path::new("/tmp/out"));
        assert_eq!(
            config.package_dir("com.example.model"),
            Path::new("/tmp/out/src/main/java/com/example/model")
        );
    }
}
