pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::{RegistrarError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "registrar")]
#[command(about = "Course registration engine: cart, confirm, drop and degree progress")]
pub struct CliConfig {
    /// Path to the TOML session file
    #[arg(short, long, default_value = "session.toml")]
    pub config: String,

    /// Write the resulting schedule to a .csv or .tsv file
    #[arg(long)]
    pub export: Option<String>,

    /// Include pending courses in the export
    #[arg(long)]
    pub include_pending: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    /// Validate configuration and list the scripted actions without running them
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("config", &self.config)?;

        if let Some(export) = &self.export {
            validate_path("export", export)?;
            if crate::app::export::ExportFormat::from_path(export).is_none() {
                return Err(RegistrarError::InvalidConfigValueError {
                    field: "export".to_string(),
                    value: export.clone(),
                    reason: "Unsupported format. Valid formats: csv, tsv".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_export_extension_is_checked() {
        let config = CliConfig::parse_from(["registrar", "--export", "schedule.xlsx"]);
        assert!(matches!(
            config.validate(),
            Err(RegistrarError::InvalidConfigValueError { .. })
        ));

        let config = CliConfig::parse_from(["registrar", "-c", "demo.toml", "--export", "out.TSV"]);
        assert!(config.validate().is_ok());
        assert!(!config.include_pending);
    }
}
