//! Secrets section builder.
//!
//! Secrets are never typed from schemas; each one is a string injected
//! through an environment variable. The builder validates the identifiers
//! and emits the `Secrets` type plus the env-var name map.

use crate::error::CodegenError;
use crate::generate::INDEX_FILE;
use crate::module::Module;
use crate::util::is_screaming_snake_case;
use std::collections::BTreeMap;

/// The environment variable a secret's value is injected through.
pub fn secret_env_variable_name(name: &str) -> String {
    format!("SECRET_{name}")
}

/// Check that secret identifiers are SCREAMING_SNAKE_CASE and unique.
pub fn validate(secrets: &[String]) -> Result<(), CodegenError> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for name in secrets {
        if !is_screaming_snake_case(name) {
            return Err(CodegenError::InvalidSecretFormat { name: name.clone() });
        }
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }
    for (name, count) in counts {
        if count > 1 {
            return Err(CodegenError::DuplicateSecret {
                name: name.to_string(),
                count,
            });
        }
    }
    Ok(())
}

/// Build the secrets subtree: an `index.ts` re-export over a `secrets.ts`
/// holding the `Secrets` type and `SECRET_ENV_VARIABLE_NAMES` const.
pub fn create(secrets: &[String]) -> Result<Module, CodegenError> {
    validate(secrets)?;

    let mut sorted: Vec<&String> = secrets.iter().collect();
    sorted.sort();

    let mut source = String::new();
    if sorted.is_empty() {
        source.push_str("export type Secrets = {};\n");
        source.push_str("\nexport const SECRET_ENV_VARIABLE_NAMES = {} as const;\n");
    } else {
        source.push_str("export type Secrets = {\n");
        for name in &sorted {
            source.push_str(&format!("  {name}: string;\n"));
        }
        source.push_str("};\n");
        source.push_str("\nexport const SECRET_ENV_VARIABLE_NAMES = {\n");
        for name in &sorted {
            source.push_str(&format!(
                "  {name}: \"{}\",\n",
                secret_env_variable_name(name)
            ));
        }
        source.push_str("} as const;\n");
    }

    let mut index = Module::re_export("secrets", Some(INDEX_FILE.to_string()));
    index.push_dep(Module::content("Secrets", "secrets.ts", source))?;
    Ok(index)
}
