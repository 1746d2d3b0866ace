//! Project metadata collected before the pipeline runs.
//!
//! [`ProjectConfig`] is the only data the templates are rendered against.
//! Each field is exposed to templates under a fixed placeholder name:
//!
//! | Field        | Placeholder                       | Example                |
//! |--------------|-----------------------------------|------------------------|
//! | `bin_file`   | `{{.BinFile}}`                    | `blog`                 |
//! | `module`     | `{{.Module}}`                     | `github.com/acme/blog` |
//! | `env_prefix` | `{{.EnvironmentVariablesPrefix}}` | `APP`                  |

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, ScaffoldError};

/// Field names used in [`ScaffoldError::EmptyField`].
pub const MODULE_FIELD: &str = "module";
pub const BIN_FILE_FIELD: &str = "binary name";
pub const ENV_PREFIX_FIELD: &str = "environment variable prefix";

/// Binary name, module identifier and environment-variable prefix.
///
/// Built once through [`ProjectConfig::new`], which rejects empty fields,
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    #[serde(rename = "BinFile")]
    bin_file: String,
    #[serde(rename = "Module")]
    module: String,
    #[serde(rename = "EnvironmentVariablesPrefix")]
    env_prefix: String,
}

impl ProjectConfig {
    /// Validate and normalize raw user input.
    ///
    /// Every field is trimmed; an empty field is an input error. The prefix
    /// is upper-cased.
    pub fn new(module: &str, bin_file: &str, env_prefix: &str) -> Result<Self> {
        let module = require_field(MODULE_FIELD, module)?;
        let bin_file = require_field(BIN_FILE_FIELD, bin_file)?;
        let env_prefix = require_field(ENV_PREFIX_FIELD, env_prefix)?.to_uppercase();

        Ok(Self {
            bin_file,
            module,
            env_prefix,
        })
    }

    pub fn bin_file(&self) -> &str {
        &self.bin_file
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Name of the finished project directory: the last `/` segment of the module.
    pub fn project_name(&self) -> &str {
        crate::finalize::project_dir_name(&self.module)
    }

    /// Template context binding the three placeholder names.
    pub fn template_context(&self) -> Value {
        serde_json::json!({
            "BinFile": self.bin_file,
            "Module": self.module,
            "EnvironmentVariablesPrefix": self.env_prefix,
        })
    }
}

impl fmt::Display for ProjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "module={} bin={} env_prefix={}",
            self.module, self.bin_file, self.env_prefix
        )
    }
}

/// Trim `raw`, failing with [`ScaffoldError::EmptyField`] if nothing is left.
pub fn require_field(field: &'static str, raw: &str) -> Result<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ScaffoldError::EmptyField { field });
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_new_trims_and_uppercases() {
        let project = ProjectConfig::new("github.com/acme/blog\n", " blog\n", "app\n").unwrap();
        assert_eq!(project.module(), "github.com/acme/blog");
        assert_eq!(project.bin_file(), "blog");
        assert_eq!(project.env_prefix(), "APP");
        assert_eq!(project.project_name(), "blog");
    }

    #[test]
    fn test_new_rejects_empty_fields() {
        for (module, bin, prefix, field) in [
            ("\n", "blog", "APP", "module"),
            ("github.com/acme/blog", "", "APP", "binary name"),
            ("github.com/acme/blog", "blog", "  \n", "environment variable prefix"),
        ] {
            let err = ProjectConfig::new(module, bin, prefix).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Input);
            assert!(
                matches!(err, ScaffoldError::EmptyField { field: f } if f == field),
                "expected empty {field}"
            );
        }
    }

    #[test]
    fn test_template_context_uses_placeholder_names() {
        let project = ProjectConfig::new("github.com/acme/blog", "blog", "APP").unwrap();
        let context = project.template_context();
        assert_eq!(context["BinFile"], "blog");
        assert_eq!(context["Module"], "github.com/acme/blog");
        assert_eq!(context["EnvironmentVariablesPrefix"], "APP");
        assert_eq!(serde_json::to_value(&project).unwrap(), context);
    }

    #[test]
    fn test_display() {
        let project = ProjectConfig::new("singleword", "svc", "svc").unwrap();
        assert_eq!(project.to_string(), "module=singleword bin=svc env_prefix=SVC");
    }
}
