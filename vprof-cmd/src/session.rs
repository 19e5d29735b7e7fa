//! Startup: configuration, dataset cache and explorer.

use crate::DataArgs;
use anyhow::Context;
use vprof_core::AppConfig;
use vprof_data::Explorer;
use vprof_store::DatasetCache;

/// Resolve the configuration for a command: config file (or defaults),
/// then the `--data` override.
pub fn load_config(args: &DataArgs) -> anyhow::Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(data) = &args.data {
        config.data_path = data.clone();
    }
    Ok(config)
}

/// Load the dataset through `cache` and wrap it with the configured policies.
pub fn open_explorer(config: &AppConfig, cache: &DatasetCache) -> anyhow::Result<Explorer> {
    let dataset = cache
        .get_or_load(&config.data_path)
        .with_context(|| format!("Failed to load dataset {}", config.data_path.display()))?;
    Ok(Explorer::new(dataset, config))
}

/// Configuration plus explorer for a one-shot command.
pub fn open(args: &DataArgs) -> anyhow::Result<Explorer> {
    let config = load_config(args)?;
    let cache = DatasetCache::new(config.load_options());
    open_explorer(&config, &cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn data_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("vprof.toml");
        std::fs::write(
            &config_path,
            "data-path = \"from-config.csv\"\nposition-policy = \"first-seen\"\n",
        )
        .unwrap();

        let args = DataArgs {
            config: Some(config_path.clone()),
            ..DataArgs::default()
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.data_path, PathBuf::from("from-config.csv"));

        let args = DataArgs {
            config: Some(config_path),
            data: Some(PathBuf::from("override.csv")),
            output: None,
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.data_path, PathBuf::from("override.csv"));
        assert_eq!(config.position_policy, vprof_core::PositionPolicy::FirstSeen);
    }

    #[test]
    fn missing_dataset_is_reported() {
        let args = DataArgs {
            data: Some(PathBuf::from("/nonexistent/profiles.csv")),
            ..DataArgs::default()
        };
        let err = open(&args).err().unwrap();
        assert!(err.to_string().contains("Failed to load dataset"));
        assert!(err.downcast_ref::<vprof_core::DataLoadError>().is_some());
    }
}
