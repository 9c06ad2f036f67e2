//! Pipeline configuration loader.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{info, warn};
use root_access_data::{PipelineDef, validate_pipeline};

/// Load the pipeline configuration from `toml_path`.
///
/// Never fails: a missing, unreadable, malformed or invalid file is logged and
/// the built-in defaults are returned.
pub fn load_pipeline_config(toml_path: &Path) -> PipelineDef {
    match try_load_pipeline_config(toml_path) {
        Ok(def) => {
            info!(
                "pipeline config loaded from '{}' (profile '{}', {} behavior override(s))",
                toml_path.display(),
                def.throttle.profile,
                def.behaviors.len()
            );
            def
        },
        Err(e) => {
            warn!(
                "Could not load pipeline config from '{}': {e:#}. Using built-in defaults.",
                toml_path.display()
            );
            PipelineDef::default()
        },
    }
}

/// Read, parse and validate a pipeline config file.
///
/// # Errors
/// - if the file cannot be read or parsed, or fails validation
fn try_load_pipeline_config(toml_path: &Path) -> Result<PipelineDef> {
    let text = fs::read_to_string(toml_path)
        .with_context(|| format!("reading pipeline config from '{}'", toml_path.display()))?;
    let def: PipelineDef =
        toml::from_str(&text).with_context(|| format!("parsing pipeline config '{}'", toml_path.display()))?;
    let errors = validate_pipeline(&def);
    if !errors.is_empty() {
        let details = errors
            .into_iter()
            .map(|err| format!("- {err}"))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("pipeline config validation failed:\n{details}");
    }
    Ok(def)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn missing_file_gives_defaults() {
        let def = load_pipeline_config(Path::new("/definitely/not/here/pipeline.toml"));
        assert_eq!(def.throttle.profile, "standard");
        assert!(def.npcs_enabled);
    }

    #[test]
    fn valid_file_is_used() {
        let file = write_temp(
            r#"
            npcs_enabled = false

            [throttle]
            profile = "strict"

            [behaviors.fight]
            frequency = 0.5
            "#,
        );
        let def = load_pipeline_config(file.path());
        assert!(!def.npcs_enabled);
        assert_eq!(def.throttle.profile, "strict");
        assert_eq!(def.behaviors["fight"].frequency, Some(0.5));
    }

    #[test]
    fn malformed_or_invalid_file_falls_back() {
        let file = write_temp("this is = = not toml");
        assert_eq!(load_pipeline_config(file.path()).throttle.profile, "standard");

        let file = write_temp("[throttle]\nprofile = \"chatty\"\n");
        assert_eq!(load_pipeline_config(file.path()).throttle.profile, "standard");
    }
}
