use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::types::AppConfig;

/// Discover and load the app config.
///
/// Priority:
/// 1. `--config` flag (explicit path)
/// 2. `$GH_MY_CONFIG` environment variable
/// 3. `$XDG_CONFIG_HOME/gh-my/config.toml` (or `config.json`)
/// 4. `~/.config/gh-my/config.toml` (or `config.json`)
///
/// Without any of these the defaults are used. An explicit path must exist.
pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit_path {
        return load_config_file(&expand_tilde(path));
    }
    match find_config_with(|name| std::env::var(name).ok()) {
        Some(path) => load_config_file(&path),
        None => {
            tracing::debug!("config: no file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load one config file. Files ending in `.json` are parsed as JSON,
/// everything else as TOML.
pub fn load_config_file(path: &Path) -> Result<AppConfig> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    tracing::debug!("config: loading {}", path.display());
    if is_json(path) {
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing JSON from {}", path.display()))
    } else {
        toml::from_str(&contents).with_context(|| format!("parsing TOML from {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Locate a config file using `var` to read environment variables.
pub fn find_config_with(var: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    // $GH_MY_CONFIG
    if let Some(path) = var("GH_MY_CONFIG") {
        let p = expand_tilde(Path::new(&path));
        if p.is_file() {
            return Some(p);
        }
    }

    // $XDG_CONFIG_HOME/gh-my/
    if let Some(xdg) = var("XDG_CONFIG_HOME")
        && let Some(p) = find_in_dir(&PathBuf::from(xdg).join("gh-my"))
    {
        return Some(p);
    }

    // ~/.config/gh-my/
    var("HOME")
        .map(PathBuf::from)
        .and_then(|home| find_in_dir(&home.join(".config/gh-my")))
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    ["config.toml", "config.json"]
        .into_iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Ok(home) = std::env::var("HOME")
    {
        return PathBuf::from(home).join(rest);
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_detection_uses_extension() {
        assert!(is_json(Path::new("/tmp/config.json")));
        assert!(is_json(Path::new("/tmp/CONFIG.JSON")));
        assert!(!is_json(Path::new("/tmp/config.toml")));
        assert!(!is_json(Path::new("/tmp/config")));
    }

    #[test]
    fn discovery_prefers_env_then_xdg_then_home() {
        let dir = tempfile::tempdir().unwrap();
        let xdg = dir.path().join("xdg");
        let home = dir.path().join("home");
        std::fs::create_dir_all(xdg.join("gh-my")).unwrap();
        std::fs::create_dir_all(home.join(".config/gh-my")).unwrap();
        let home_cfg = home.join(".config/gh-my/config.json");
        std::fs::write(&home_cfg, "{}").unwrap();

        let env = |xdg: &Path, home: &Path, explicit: Option<&Path>| {
            let (xdg, home) = (xdg.to_path_buf(), home.to_path_buf());
            let explicit = explicit.map(Path::to_path_buf);
            move |name: &str| match name {
                "XDG_CONFIG_HOME" => Some(xdg.display().to_string()),
                "HOME" => Some(home.display().to_string()),
                "GH_MY_CONFIG" => explicit.as_ref().map(|p| p.display().to_string()),
                _ => None,
            }
        };

        assert_eq!(find_config_with(env(&xdg, &home, None)), Some(home_cfg.clone()));

        let xdg_cfg = xdg.join("gh-my/config.toml");
        std::fs::write(&xdg_cfg, "").unwrap();
        assert_eq!(find_config_with(env(&xdg, &home, None)), Some(xdg_cfg));

        let env_cfg = dir.path().join("custom.toml");
        std::fs::write(&env_cfg, "").unwrap();
        assert_eq!(
            find_config_with(env(&xdg, &home, Some(&env_cfg))),
            Some(env_cfg)
        );
    }

    #[test]
    fn missing_env_file_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let found = find_config_with(|name| match name {
            "GH_MY_CONFIG" => Some(dir.path().join("nope.toml").display().to_string()),
            "HOME" => Some(dir.path().display().to_string()),
            _ => None,
        });
        assert_eq!(found, None);
    }
}
