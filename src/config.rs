use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the command-line front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tickets file read by menu option [1] (`.json` or `.csv`).
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    /// Rows shown per summary table on the console.
    pub preview_rows: usize,
    /// Also write `summary.json` next to the workbook.
    pub write_summary: bool,
    /// Tickets generated by the demo option.
    pub sample_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("tickets.json"),
            output_dir: PathBuf::from("."),
            preview_rows: 5,
            write_summary: true,
            sample_size: 250,
        }
    }
}

/// Defaults, then `path` if it exists, then `REPORTE_*` environment variables.
pub fn load_config(path: &Path) -> Result<AppConfig, figment::Error> {
    Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("REPORTE_"))
        .extract()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        figment::Jail::expect_with(|_jail| {
            let config = load_config(Path::new("missing.toml"))?;
            assert_eq!(config, AppConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_layering() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "reporte.toml",
                r#"
                    input_path = "data/tickets.csv"
                    preview_rows = 10
                "#,
            )?;
            jail.set_env("REPORTE_PREVIEW_ROWS", "3");
            jail.set_env("REPORTE_WRITE_SUMMARY", "false");
            let config = load_config(Path::new("reporte.toml"))?;
            assert_eq!(config.input_path, PathBuf::from("data/tickets.csv"));
            assert_eq!(config.preview_rows, 3);
            assert!(!config.write_summary);
            assert_eq!(config.sample_size, 250);
            Ok(())
        });
    }
}
