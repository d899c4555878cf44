use anyhow::{Context, Result};
use conduit_lib::Config;
use std::{collections::HashMap, env, fs};

/// Prefix shared by every configuration variable.
pub const ENV_PREFIX: &str = "CONDUIT_";

/// Reads environment variables prefixed with CONDUIT_
pub fn read_env() -> Config {
    read_env_from(&env::vars().collect())
}

pub fn read_env_from(vars: &HashMap<String, String>) -> Config {
    let get = |key: &str| vars.get(&format!("{ENV_PREFIX}{key}")).cloned();
    let flag = |key: &str| get(key).map(|v| v == "true" || v == "1" || v.eq_ignore_ascii_case("yes"));

    Config {
        config: get("CONFIG"),
        root: get("ROOT"),
        archive: get("ARCHIVE"),
        upload_url: get("UPLOAD_URL"),
        check_url: get("CHECK_URL"),
        skip: get("SKIP").map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }),
        compress: flag("COMPRESS"),
        dry: flag("DRY"),
        log_level: get("LOG_LEVEL"),
    }
}

/// Reads YAML or JSON config from file
pub fn read_config_file(path: &str) -> Result<Config> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading config file {path}"))?;
    let cfg = if path.to_lowercase().ends_with(".json") {
        serde_json::from_str(&content).with_context(|| format!("parsing JSON config {path}"))?
    } else {
        serde_yaml::from_str(&content).with_context(|| format!("parsing YAML config {path}"))?
    };
    Ok(cfg)
}

/// Layer env < file < cli. The file location itself may come from the cli or env.
pub fn load(cli: Config) -> Result<Config> {
    let env_config = read_env();
    let file_config = match cli.config.clone().or_else(|| env_config.config.clone()) {
        Some(path) => read_config_file(&path)?,
        None => Config::default(),
    };
    Ok(Config::merge(env_config, file_config, cli).with_defaults())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn env_variables_are_parsed() {
        let vars: HashMap<String, String> = [
            ("CONDUIT_UPLOAD_URL", "http://deploy/upload"),
            ("CONDUIT_SKIP", "target, *.log,,"),
            ("CONDUIT_COMPRESS", "yes"),
            ("CONDUIT_DRY", "0"),
            ("UNRELATED", "ignored"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let cfg = read_env_from(&vars);

        assert_eq!(cfg.upload_url.as_deref(), Some("http://deploy/upload"));
        assert_eq!(
            cfg.skip,
            Some(vec!["target".to_string(), "*.log".to_string()])
        );
        assert_eq!(cfg.compress, Some(true));
        assert_eq!(cfg.dry, Some(false));
        assert!(cfg.archive.is_none());
    }

    #[test]
    fn yaml_and_json_files_are_both_accepted() {
        let temp_dir = TempDir::new().unwrap();
        let yaml = temp_dir.path().join("conduit.yaml");
        let json = temp_dir.path().join("conduit.json");
        fs::write(&yaml, "archive: out/app.zip\nskip:\n  - target\ncompress: true\n").unwrap();
        fs::write(&json, r#"{"upload_url": "http://json/upload"}"#).unwrap();

        let from_yaml = read_config_file(yaml.to_str().unwrap()).unwrap();
        let from_json = read_config_file(json.to_str().unwrap()).unwrap();

        assert_eq!(from_yaml.archive.as_deref(), Some("out/app.zip"));
        assert_eq!(from_yaml.skip, Some(vec!["target".to_string()]));
        assert_eq!(from_yaml.compress, Some(true));
        assert_eq!(from_json.upload_url.as_deref(), Some("http://json/upload"));
    }

    #[test]
    fn broken_config_file_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_config_file(path.to_str().unwrap()).unwrap_err();

        assert!(format!("{err:#}").contains("broken.json"));
    }
}
