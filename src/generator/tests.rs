#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::config::tests::sample_config;
use crate::config::ModuleConfig;
use crate::error::GeneratorError;
use crate::spec::{self, Definition};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};

const SPEC: &str = r##"
openapi: 3.0.1
info:
  title: Commerce Admin
  version: "1.0"
paths:
  "/productOption/{id}":
    get:
      operationId: getProductOption
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: string
      responses:
        200:
          description: found
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/productOption"
    put:
      operationId: updateProductOption
      parameters:
        - $ref: "#/components/parameters/groupId"
        - name: id
          in: path
          schema:
            type: string
      requestBody:
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/productOption"
      responses:
        204:
          description: updated
  "/productOption/":
    get:
      operationId: getProductOptions
      parameters:
        - $ref: "#/components/parameters/groupId"
      responses:
        200:
          description: page
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: "#/components/schemas/productOption"
components:
  parameters:
    groupId:
      name: groupId
      in: query
      schema:
        type: integer
  schemas:
    productOption:
      properties:
        id:
          type: string
        name:
          type: string
        createDate:
          type: string
          format: date-time
        values:
          type: array
          items:
            $ref: "#/components/schemas/productOptionValue"
    productOptionValue:
      properties:
        key:
          type: string
        priority:
          type: number
"##;

/// In-memory filesystem for write-policy tests
#[derive(Debug, Default)]
struct MemoryFs {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, String>,
    writes: usize,
    fail_writes: bool,
}

impl OutputFs for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.dirs.contains(path)
    }

    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        self.dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.writes += 1;
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

fn out_dir() -> PathBuf {
    PathBuf::from("/virtual/commerce-openapi-admin")
}

fn config() -> ModuleConfig {
    sample_config(&out_dir())
}

fn definition() -> Definition {
    spec::import(SPEC).unwrap()
}

fn generator(config: ModuleConfig) -> Generator {
    Generator::new(config, TemplateEngine::builtin())
}

fn file<'f>(fs: &'f MemoryFs, relative: &str) -> &'f str {
    let path = out_dir().join(relative);
    fs.files
        .get(&path)
        .unwrap_or_else(|| panic!("{} was not written", path.display()))
}

// ---------------------------------------------------------------------------
// Template engine
// ---------------------------------------------------------------------------

#[test]
fn test_builtin_templates_all_load() {
    let engine = TemplateEngine::builtin();
    for name in [
        TEMPLATE_APPLICATION,
        TEMPLATE_BASIC_AUTHENTICATION,
        TEMPLATE_BND,
        TEMPLATE_GRADLE,
        TEMPLATE_MODEL,
        TEMPLATE_RESOURCE_IMPLEMENTATION,
        TEMPLATE_RESOURCE_INTERFACE,
    ] {
        assert!(!engine.load(name).unwrap().is_empty(), "{name} is empty");
    }
}

#[test]
fn test_missing_template() {
    let err = TemplateEngine::builtin().load("Nope.java.tpl").unwrap_err();
    assert!(matches!(err, GeneratorError::TemplateMissing { name } if name == "Nope.java.tpl"));
}

#[test]
fn test_model_template_placeholders() {
    let names = TemplateEngine::builtin().placeholders(TEMPLATE_MODEL).unwrap();
    assert_eq!(
        names,
        ["PACKAGE", "IMPORTS", "AUTHOR", "MODEL_CLASS", "METHODS", "VARIABLES"]
    );
}

#[test]
fn test_render_is_single_pass_and_keeps_unknown_tokens() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("t.tpl"), "${A} ${B} ${MISSING} $NOT {X}").unwrap();
    let engine = TemplateEngine::new(Some(dir.path().to_path_buf()));

    let placeholders = HashMap::from([
        ("A", "${B}".to_string()),
        ("B", "b".to_string()),
    ]);
    let rendered = engine.render("t.tpl", &placeholders).unwrap();
    assert_eq!(rendered, "${B} b ${MISSING} $NOT {X}");
}

#[test]
fn test_override_dir_takes_precedence_and_is_cached() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(TEMPLATE_BND);
    std::fs::write(&path, "Bundle: ${BUNDLE_NAME}\n").unwrap();
    let engine = TemplateEngine::new(Some(dir.path().to_path_buf()));

    let unit = render_bnd(&config(), &engine).unwrap();
    assert_eq!(unit.contents, "Bundle: Commerce OpenAPI\n");

    // Cached: later changes on disk are not seen by this engine
    std::fs::write(&path, "changed").unwrap();
    assert_eq!(&*engine.load(TEMPLATE_BND).unwrap(), "Bundle: ${BUNDLE_NAME}\n");

    // Names absent from the override dir fall back to the built-in set
    assert!(engine.load(TEMPLATE_GRADLE).is_ok());
}

// ---------------------------------------------------------------------------
// Emitters
// ---------------------------------------------------------------------------

#[test]
fn test_model_accessors_follow_declaration_order() {
    let definition = definition();
    let component = definition.component("productOption").unwrap();
    let unit = render_model(component, &config(), &TemplateEngine::builtin()).unwrap();

    assert_eq!(
        unit.path,
        out_dir().join("src/main/java/com/example/model/v1_0/ProductOptionDTO.java")
    );
    assert_eq!(unit.protection, Protection::Unprotected);

    let text = &unit.contents;
    assert!(text.starts_with("package com.example.model.v1_0;\n\nimport java.util.Date;\n"));
    assert!(text.contains("public class ProductOptionDTO {"));
    assert!(text.contains(
        "\tpublic Date getCreateDate() {\n\t\treturn _createDate;\n\t}\n\n\
         \tpublic void setCreateDate(Date createDate) {\n\t\t_createDate = createDate;\n\t}"
    ));
    assert!(text.contains("\tprivate ProductOptionValueDTO[] _values;"));

    let getters: Vec<usize> = ["getId()", "getName()", "getCreateDate()", "getValues()"]
        .iter()
        .map(|g| text.find(g).unwrap())
        .collect();
    assert!(getters.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(text.matches("public void set").count(), 4);
    assert_eq!(text.matches(" get").count(), 4);
}

#[test]
fn test_model_without_dates_has_no_date_import() {
    let definition = definition();
    let component = definition.component("productOptionValue").unwrap();
    let unit = render_model(component, &config(), &TemplateEngine::builtin()).unwrap();
    assert!(!unit.contents.contains("java.util.Date"));
    assert!(unit.contents.contains("\tprivate Double _priority;"));
}

#[test]
fn test_resource_interface_methods() {
    let definition = definition();
    let path = &definition.paths[0];
    let unit = render_resource_interface(path, "1.0", &config(), &TemplateEngine::builtin()).unwrap();

    assert_eq!(
        unit.path,
        out_dir().join("src/main/java/com/example/resource/v1_0/ProductOptionResource.java")
    );
    let text = &unit.contents;
    assert!(text.contains("@Path(\"/v1.0/productOption\")\npublic interface ProductOptionResource {"));
    assert!(text.contains(
        "\t@GET\n\t@Path(\"/{id}\")\n\t@Produces(\"application/*\")\n\
         \tpublic ProductOptionDTO getProductOption(\n\
         \t\t\t@PathParam(\"id\") String id, @Context Language language)\n\
         \t\tthrows Exception;"
    ));
    assert!(text.contains(
        "\t@Consumes(\"application/*\")\n\t@Path(\"/{id}\")\n\t@PUT\n\
         \tpublic Response updateProductOption(\n\
         \t\t\t@PathParam(\"id\") String id, @QueryParam(\"groupId\") Long groupId, \
         ProductOptionDTO productOptionDTO, @Context Language language)\n\
         \t\tthrows Exception;"
    ));
    assert!(text.contains(
        "\tpublic CollectionDTO<ProductOptionDTO> getProductOptions(\n\
         \t\t\t@QueryParam(\"groupId\") Long groupId, @Context Language language, \
         @Context Pagination pagination)"
    ));
}

#[test]
fn test_resource_interface_imports() {
    let definition = definition();
    let path = &definition.paths[0];
    let text = render_resource_interface(path, "1.0", &config(), &TemplateEngine::builtin())
        .unwrap()
        .contents;

    let model_imports: Vec<&str> = text
        .lines()
        .filter(|l| l.starts_with("import com.example.model.v1_0."))
        .collect();
    assert_eq!(model_imports, ["import com.example.model.v1_0.ProductOptionDTO;"]);

    let javax: Vec<&str> = text
        .lines()
        .filter(|l| l.starts_with("import javax.ws.rs"))
        .collect();
    assert_eq!(
        javax,
        [
            "import javax.ws.rs.Consumes;",
            "import javax.ws.rs.GET;",
            "import javax.ws.rs.PUT;",
            "import javax.ws.rs.Path;",
            "import javax.ws.rs.PathParam;",
            "import javax.ws.rs.Produces;",
            "import javax.ws.rs.QueryParam;",
            "import javax.ws.rs.core.Context;",
            "import javax.ws.rs.core.Response;",
        ]
    );
    assert!(text.contains("import com.liferay.commerce.openapi.core.context.Pagination;"));
    assert!(text.contains("import com.liferay.commerce.openapi.core.model.CollectionDTO;"));
}

#[test]
fn test_resource_implementation_stubs() {
    let definition = definition();
    let path = &definition.paths[0];
    let unit =
        render_resource_implementation(path, "1.0", &config(), &TemplateEngine::builtin()).unwrap();

    assert_eq!(unit.protection, Protection::Implementation);
    assert_eq!(
        unit.path,
        out_dir().join("src/main/java/com/example/internal/resource/v1_0/ProductOptionResourceImpl.java")
    );
    let text = &unit.contents;
    assert!(text.contains("import com.example.resource.v1_0.ProductOptionResource;"));
    assert!(text.contains("import javax.ws.rs.core.Response;"));
    assert!(text.contains("\"osgi.jaxrs.application.select=(osgi.jaxrs.name=Commerce)\""));
    assert!(text.contains("public class ProductOptionResourceImpl\n\timplements ProductOptionResource {"));
    assert!(text.contains(
        "\t@Override\n\tpublic ProductOptionDTO getProductOption(\n\
         \t\t\tString id, Language language)\n\
         \t\tthrows Exception {\n\n\t\treturn null;\n\t}"
    ));
    assert!(text.contains("\t\treturn Response.ok().build();"));
    assert_eq!(text.matches("@Override").count(), 3);
}

const NAMES_SPEC: &str = r##"
paths:
  /customer:
    get:
      operationId: searchCustomers
      parameters:
        - name: page-size
          in: query
          schema:
            type: integer
        - name: language
          in: query
          schema:
            type: string
        - name: class
          in: query
          schema:
            type: string
      responses:
        200:
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: "#/components/schemas/customer-record"
components:
  schemas:
    customer-record:
      properties:
        first-name:
          type: string
        class:
          type: string
        name:
          type: string
        Name:
          type: string
"##;

#[test]
fn test_parameter_names_become_java_identifiers() {
    let definition = spec::import(NAMES_SPEC).unwrap();
    let path = &definition.paths[0];
    let engine = TemplateEngine::builtin();

    let interface = render_resource_interface(path, "1.0", &config(), &engine).unwrap();
    assert!(interface.contents.contains(
        "\tpublic CollectionDTO<CustomerRecordDTO> searchCustomers(\n\
         \t\t\t@QueryParam(\"page-size\") Long pageSize, \
         @QueryParam(\"language\") String language_1, \
         @QueryParam(\"class\") String _class, \
         @Context Language language, @Context Pagination pagination)"
    ));
    assert!(interface
        .contents
        .contains("import com.example.model.v1_0.CustomerRecordDTO;"));

    let implementation = render_resource_implementation(path, "1.0", &config(), &engine).unwrap();
    assert!(implementation.contents.contains(
        "\t\t\tLong pageSize, String language_1, String _class, \
         Language language, Pagination pagination)"
    ));
}

#[test]
fn test_property_names_become_java_identifiers() {
    let definition = spec::import(NAMES_SPEC).unwrap();
    let component = definition.component("customer-record").unwrap();
    let unit = render_model(component, &config(), &TemplateEngine::builtin()).unwrap();
    let text = &unit.contents;

    assert!(unit.path.ends_with("CustomerRecordDTO.java"));
    assert!(text.contains("public class CustomerRecordDTO {"));
    assert!(text.contains(
        "\tprivate String _firstName;\n\tprivate String __class;\n\
         \tprivate String _name;\n\tprivate String _Name_1;"
    ));
    assert!(text.contains(
        "\tpublic void setFirstName(String firstName) {\n\t\t_firstName = firstName;\n\t}"
    ));
    assert!(text.contains("\tpublic void set_class(String _class) {\n\t\t__class = _class;\n\t}"));
    assert!(text.contains("\tpublic String getName() {"));
    assert!(text.contains("\tpublic String getName_1() {"));
    assert!(!text.contains("first-name"));
    assert!(!text.contains(" class)"));
}

#[test]
fn test_application_basic_authentication_toggle() {
    let definition = definition();
    let mut config = config();
    let engine = TemplateEngine::builtin();

    let plain = render_application(&definition, &config, &engine).unwrap();
    assert_eq!(
        plain.path,
        out_dir().join("src/main/java/com/example/api/CommerceApplication.java")
    );
    assert!(!plain.contents.contains("BasicAuthHeaderAuthVerifier"));
    assert!(plain.contents.contains("\"osgi.jaxrs.application.base=/commerce\","));
    assert!(plain.contents.contains("\"osgi.jaxrs.name=Commerce\""));
    assert!(plain.contents.contains("Serves: ProductOptionResource"));

    config.basic_security_allowed = true;
    let secured = render_application(&definition, &config, &engine).unwrap();
    assert!(secured.contents.contains("BasicAuthHeaderAuthVerifier"));
}

#[test]
fn test_packaging_units() {
    let engine = TemplateEngine::builtin();
    let bnd = render_bnd(&config(), &engine).unwrap();
    assert_eq!(bnd.path, out_dir().join("bnd.bnd"));
    assert_eq!(bnd.protection, Protection::Metadata);
    assert!(bnd.contents.starts_with(
        "Bundle-Name: Commerce OpenAPI\n\
         Bundle-SymbolicName: com.example.commerce.openapi\n\
         Bundle-Version: 1.0.0\n"
    ));

    let gradle = render_gradle(&config(), &engine).unwrap();
    assert_eq!(gradle.path, out_dir().join("build.gradle"));
    assert_eq!(gradle.protection, Protection::Unprotected);
}

// ---------------------------------------------------------------------------
// Write decisions
// ---------------------------------------------------------------------------

#[test]
fn test_decide_matrix() {
    let path = out_dir().join("X.java");
    let mut fs = MemoryFs::default();
    fs.files.insert(path.clone(), "hand written".into());
    let absent = RenderedUnit::new(out_dir().join("Y.java"), String::new());

    let mut config = config();
    for protection in [Protection::Unprotected, Protection::Implementation, Protection::Metadata] {
        let existing = RenderedUnit::new(path.clone(), String::new()).protected(protection);
        let expected = if protection == Protection::Unprotected {
            WriteDecision::Write
        } else {
            WriteDecision::Skip
        };
        assert_eq!(decide(&existing, &config, &fs), expected, "{protection:?}");
        assert_eq!(
            decide(&absent.clone().protected(protection), &config, &fs),
            WriteDecision::Write
        );
    }

    config.overwrite_implementation = true;
    let implementation = RenderedUnit::new(path.clone(), String::new()).protected(Protection::Implementation);
    let metadata = RenderedUnit::new(path, String::new()).protected(Protection::Metadata);
    assert_eq!(decide(&implementation, &config, &fs), WriteDecision::Write);
    assert_eq!(decide(&metadata, &config, &fs), WriteDecision::Skip);
}

#[test]
fn test_write_unit_skip_leaves_contents() {
    let path = out_dir().join("bnd.bnd");
    let mut fs = MemoryFs::default();
    fs.files.insert(path.clone(), "edited".into());

    let unit = RenderedUnit::new(path.clone(), "generated".into()).protected(Protection::Metadata);
    let outcome = write_unit(unit, &config(), &mut fs).unwrap();
    assert_eq!(
        outcome,
        WriteOutcome::Skipped(SkippedFile {
            path: path.clone(),
            protection: Protection::Metadata
        })
    );
    assert_eq!(fs.files[&path], "edited");
    assert_eq!(fs.writes, 0);
}

#[test]
fn test_write_unit_failure_names_file() {
    let mut fs = MemoryFs {
        fail_writes: true,
        ..MemoryFs::default()
    };
    let path = out_dir().join("build.gradle");
    let err = write_unit(RenderedUnit::new(path.clone(), "x".into()), &config(), &mut fs).unwrap_err();
    assert!(matches!(err, GeneratorError::OutputPath { path: p, .. } if p == path));
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

#[test]
fn test_run_writes_every_unit() {
    let mut fs = MemoryFs::default();
    let report = generator(config()).run(SPEC, &mut fs).unwrap();

    // bnd, gradle, interface, implementation, two models, application
    assert_eq!(report.written.len(), 7);
    assert!(report.skipped.is_empty());
    assert_eq!(report.written[0], out_dir().join("bnd.bnd"));
    assert_eq!(report.written[1], out_dir().join("build.gradle"));
    assert!(report.written[6].ends_with("CommerceApplication.java"));
    assert!(fs.dirs.contains(&out_dir().join("src/main/resources")));
    assert!(fs.dirs.contains(&out_dir().join("src/main/java")));

    let referenced: Vec<&str> = report.referenced_models.iter().map(String::as_str).collect();
    assert_eq!(referenced, ["productOption"]);
    // productOptionValue is only reached through ProductOptionDTO.values
    assert!(report.unreferenced_components.is_empty());
    assert!(fs.files.keys().any(|p| p.ends_with("ProductOptionValueDTO.java")));
    assert!(!fs.files.keys().any(|p| p.ends_with("GroupIdDTO.java")));

    for (path, contents) in &fs.files {
        assert!(
            !contents.contains("${"),
            "{} has an unrendered placeholder",
            path.display()
        );
    }
}

#[test]
fn test_unreachable_components_are_reported_and_still_emitted() {
    let spec = format!("{SPEC}    orphan:\n      properties:\n        note:\n          type: string\n");
    let mut fs = MemoryFs::default();
    let report = generator(config()).run(&spec, &mut fs).unwrap();

    assert_eq!(report.unreferenced_components, ["orphan"]);
    assert!(fs.files.keys().any(|p| p.ends_with("OrphanDTO.java")));
}

#[test]
fn test_second_run_skips_protected_files() {
    let mut fs = MemoryFs::default();
    let generator = generator(config());
    generator.run(SPEC, &mut fs).unwrap();
    let impl_path = "src/main/java/com/example/internal/resource/v1_0/ProductOptionResourceImpl.java";
    fs.files
        .insert(out_dir().join(impl_path), "// business logic".into());
    let first = fs.files.clone();

    let report = generator.run(SPEC, &mut fs).unwrap();
    let skipped: Vec<_> = report.skipped.iter().map(|s| s.protection).collect();
    assert_eq!(skipped, [Protection::Metadata, Protection::Implementation]);
    assert_eq!(report.written.len(), 5);
    assert_eq!(file(&fs, impl_path), "// business logic");
    assert_eq!(fs.files, first);
}

#[test]
fn test_overwrite_flags_apply_independently() {
    let mut fs = MemoryFs::default();
    generator(config()).run(SPEC, &mut fs).unwrap();

    let mut config = config();
    config.overwrite_metadata = true;
    let report = generator(config).run(SPEC, &mut fs).unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].protection, Protection::Implementation);
    assert!(report.written.contains(&out_dir().join("bnd.bnd")));
}

#[test]
fn test_import_errors_abort_before_any_write() {
    let unknown_type = SPEC.replace("type: number", "type: decimal");
    let mut fs = MemoryFs::default();
    let err = generator(config()).run(&unknown_type, &mut fs).unwrap_err();
    assert!(matches!(err, GeneratorError::UnknownType { ref token, .. } if token == "decimal"));
    assert_eq!(fs.writes, 0);
    assert!(fs.dirs.is_empty());

    let unresolved = SPEC.replace(
        "$ref: \"#/components/schemas/productOption\"\n    put:",
        "$ref: \"#/components/schemas/ghost\"\n    put:",
    );
    assert_ne!(unresolved, SPEC);
    let err = generator(config()).run(&unresolved, &mut fs).unwrap_err();
    assert!(matches!(err, GeneratorError::UnresolvedReference { .. }));
    assert_eq!(fs.writes, 0);

    let err = generator(config()).run("paths: [", &mut fs).unwrap_err();
    assert!(matches!(err, GeneratorError::MalformedSpec { .. }));
    assert_eq!(fs.writes, 0);
}

#[test]
fn test_invalid_config_aborts_run() {
    let mut config = config();
    config.bundle_version = String::new();
    let mut fs = MemoryFs::default();
    let err = generator(config).run(SPEC, &mut fs).unwrap_err();
    assert!(matches!(err, GeneratorError::InvalidConfig { field: "bundle_version", .. }));
    assert_eq!(fs.writes, 0);
}

#[test]
fn test_write_failure_aborts_run() {
    let mut fs = MemoryFs {
        fail_writes: true,
        ..MemoryFs::default()
    };
    let err = generator(config()).run(SPEC, &mut fs).unwrap_err();
    assert!(matches!(err, GeneratorError::OutputPath { ref path, .. } if path.ends_with("bnd.bnd")));
}
