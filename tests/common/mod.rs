#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

pub mod fixtures {
    /// One component `Product{name, price}` and one path `product` whose GET
    /// returns it
    pub const PRODUCT_SPEC: &str = r##"
openapi: 3.0.1
info:
  title: Product API
  version: "1.0"
paths:
  /product/{id}:
    get:
      operationId: getProduct
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: string
      responses:
        "200":
          description: the product
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Product"
components:
  schemas:
    Product:
      type: object
      properties:
        name:
          type: string
        price:
          type: number
"##;

    /// Two paths sharing models, a reusable parameter, and a component no
    /// path uses
    pub const CATALOG_SPEC: &str = r##"
openapi: 3.0.1
info:
  title: Catalog API
  version: "2.1"
paths:
  /catalog/{id}:
    get:
      operationId: getCatalog
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: integer
            format: int32
      responses:
        "200":
          description: the catalog
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Catalog"
  /catalog/{id}/product:
    get:
      operationId: getCatalogProducts
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: integer
            format: int32
        - $ref: "#/components/parameters/languageId"
      responses:
        "200":
          description: page of products
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: "#/components/schemas/Product"
    post:
      operationId: addCatalogProduct
      requestBody:
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/Product"
      responses:
        "201":
          description: created
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Product"
  /product-option/:
    delete:
      parameters:
        - $ref: "#/components/parameters/languageId"
      responses:
        "204":
          description: removed
components:
  parameters:
    languageId:
      name: languageId
      in: query
      schema:
        type: string
  schemas:
    Catalog:
      properties:
        id:
          type: integer
          format: int32
        title:
          type: string
        modified:
          type: string
          format: date-time
    Product:
      properties:
        sku:
          type: string
        tags:
          type: array
          items:
            type: string
    Legacy:
      properties:
        code:
          type: string
"##;

    /// Module configuration writing to `<config dir>/generated`
    pub const MODULE_TOML: &str = r#"
api_package_path = "com.example.catalog.api"
application_base = "/catalog"
application_class_name = "CatalogApplication"
application_name = "Catalog"
author = "Test Author"
bundle_name = "Catalog OpenAPI"
bundle_symbolic_name = "com.example.catalog.openapi"
bundle_version = "1.0.0"
model_package_path = "com.example.catalog.model.v1_0"
module_output_path = "generated"
resource_interface_package_path = "com.example.catalog.resource.v1_0"
resource_package_path = "com.example.catalog.internal.resource.v1_0"
"#;
}

pub mod temp_files {
    use restmodgen::config::ModuleConfig;
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use walkdir::WalkDir;

    /// A temporary directory holding a spec, a module.toml and the output
    pub struct Workspace {
        pub dir: TempDir,
        pub spec: PathBuf,
        pub config: PathBuf,
    }

    impl Workspace {
        pub fn new(spec: &str) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let spec_path = dir.path().join("openapi.yaml");
            let config_path = dir.path().join("module.toml");
            std::fs::write(&spec_path, spec).unwrap();
            std::fs::write(&config_path, super::fixtures::MODULE_TOML).unwrap();
            Workspace {
                dir,
                spec: spec_path,
                config: config_path,
            }
        }

        pub fn module_config(&self) -> ModuleConfig {
            ModuleConfig::from_toml_file(&self.config).unwrap()
        }

        pub fn output(&self) -> PathBuf {
            self.dir.path().join("generated")
        }

        pub fn java(&self, package: &str, class: &str) -> PathBuf {
            self.module_config()
                .package_dir(package)
                .join(format!("{class}.java"))
        }

        pub fn read(&self, path: &Path) -> String {
            std::fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
        }

        /// Every file under the output directory with its contents
        pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
            WalkDir::new(self.output())
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| {
                    let contents = std::fs::read_to_string(entry.path()).unwrap();
                    (entry.into_path(), contents)
                })
                .collect()
        }
    }
}
