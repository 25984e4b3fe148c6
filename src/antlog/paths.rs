use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AntlogPaths {
    pub antlog_home: PathBuf,
    pub uploads_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub store_dir: PathBuf,
    pub logs_dir: PathBuf,
}

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths() -> Result<AntlogPaths> {
    let home = required_home_dir()?;
    let antlog_home = env_or_default_path("ANTLOG_HOME", home.join(".antlog"));

    let uploads_dir = env_or_default_path("ANTLOG_UPLOADS_DIR", antlog_home.join("uploads"));
    let scratch_dir = env_or_default_path("ANTLOG_SCRATCH_DIR", antlog_home.join("extracted"));
    let store_dir = env_or_default_path("ANTLOG_STORE_DIR", antlog_home.join("store"));
    let logs_dir = env_or_default_path("ANTLOG_LOGS_DIR", antlog_home.join("logs"));

    Ok(AntlogPaths {
        antlog_home,
        uploads_dir,
        scratch_dir,
        store_dir,
        logs_dir,
    })
}
