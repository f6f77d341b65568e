use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use shared::config::client::Config;

/// Write a configuration file holding the defaults.
///
/// # Arguments
/// * `format` - "yaml", "json" or "toml".
/// * `output` - Destination; `prok.<format>` in the working directory when omitted.
///
/// # Errors
/// Returns an error if the format is unsupported or if writing the file fails.
pub fn generate_config(format: &str, output: Option<&Path>) -> Result<PathBuf> {
    let config = Config::with_defaults();
    let serialized = match format {
        "yaml" => serde_yml::to_string(&config)?,
        "json" => serde_json::to_string_pretty(&config)?,
        "toml" => toml::to_string_pretty(&config)?,
        _ => bail!("Unsupported format. Use 'yaml', 'json' or 'toml'."),
    };

    let path = output.map_or_else(|| PathBuf::from(format!("prok.{format}")), Path::to_path_buf);
    fs::write(&path, serialized)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("Configuration file '{}' generated successfully.", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn generated_files_load_back() {
        let dir = TempDir::new().unwrap();
        for format in ["yaml", "json", "toml"] {
            let target = dir.path().join(format!("prok.{format}"));
            let written = generate_config(format, Some(&target)).unwrap();
            assert_eq!(written, target);

            let content = fs::read_to_string(&target).unwrap();
            assert!(content.contains("http://localhost:5001"), "{format}: {content}");
        }
    }

    #[test]
    fn unknown_format_is_refused() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("prok.ini");
        let err = generate_config("ini", Some(&target)).unwrap_err();
        assert!(err.to_string().contains("Unsupported format"));
        assert!(!target.exists());
    }
}
