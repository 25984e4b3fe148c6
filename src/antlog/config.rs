use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    pub remove_archive: bool,
    pub remove_extracted: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            remove_archive: true,
            remove_extracted: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub scratch_prefix: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            scratch_prefix: "ingest".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AntlogConfig {
    pub cleanup: CleanupConfig,
    pub extract: ExtractConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialAntlogConfig {
    cleanup: Option<CleanupConfig>,
    extract: Option<ExtractConfig>,
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => {
            let trimmed = v.trim();
            match trimmed {
                "1" | "true" | "TRUE" | "yes" | "on" => true,
                "0" | "false" | "FALSE" | "no" | "off" => false,
                _ => fallback,
            }
        }
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn validate(cfg: &AntlogConfig) -> Result<()> {
    let prefix = cfg.extract.scratch_prefix.trim();
    if prefix.is_empty() {
        return Err(anyhow!("invalid scratch prefix: cannot be empty"));
    }
    if prefix.contains('/') || prefix.contains('\\') {
        return Err(anyhow!(
            "invalid scratch prefix: must not contain path separators"
        ));
    }
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("ANTLOG_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let home = dirs::home_dir()?;
    Some(home.join(".antlog").join("antlog.toml"))
}

fn merge_file_config(base: &mut AntlogConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    let parsed: PartialAntlogConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse antlog config {}: {err}", path.display()))?;
    if let Some(cleanup) = parsed.cleanup {
        base.cleanup = cleanup;
    }
    if let Some(extract) = parsed.extract {
        base.extract = extract;
    }
    Ok(())
}

pub fn load_config() -> Result<AntlogConfig> {
    let mut cfg = AntlogConfig::default();
    merge_file_config(&mut cfg)?;

    cfg.cleanup.remove_archive =
        env_or_bool("ANTLOG_CLEANUP_REMOVE_ARCHIVE", cfg.cleanup.remove_archive);
    cfg.cleanup.remove_extracted = env_or_bool(
        "ANTLOG_CLEANUP_REMOVE_EXTRACTED",
        cfg.cleanup.remove_extracted,
    );
    cfg.extract.scratch_prefix =
        env_or_string("ANTLOG_SCRATCH_PREFIX", &cfg.extract.scratch_prefix);

    validate(&cfg)?;
    Ok(cfg)
}
