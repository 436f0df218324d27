pub mod config_cmd;
pub mod run;

use std::path::PathBuf;

use quanta_config::SynapseSettings;

/// Load settings from an explicit path, or the default lookup.
///
/// Environment overrides apply either way.
pub fn load_settings(path: Option<PathBuf>) -> Result<SynapseSettings, Box<dyn std::error::Error>> {
    let settings = match path {
        Some(path) => SynapseSettings::load_from(&path).map(|mut settings| {
            settings.apply_env_overrides();
            settings
        }),
        None => SynapseSettings::load(),
    }
    .map_err(|e| format!("Failed to load config: {e}"))?;
    Ok(settings)
}
