use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "ANTLOG_";

fn rust_sources(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut pending = vec![root.to_path_buf()];
    let mut sources = Vec::new();
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext.to_str() == Some("rs")) {
                sources.push(path);
            }
        }
    }
    Ok(sources)
}

fn is_key_char(ch: char) -> bool {
    ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_'
}

/// Env keys are whole `ANTLOG_*` tokens. Identifiers that merely embed the
/// prefix (generated constant names and the like) are not keys.
fn collect_env_keys(source: &str, keys: &mut BTreeSet<String>) {
    for token in source.split(|ch: char| !is_key_char(ch)) {
        if token.len() > ENV_PREFIX.len() && token.starts_with(ENV_PREFIX) {
            keys.insert(token.to_string());
        }
    }
}

fn main() -> io::Result<()> {
    let mut keys = BTreeSet::new();
    for path in rust_sources(Path::new("src"))? {
        collect_env_keys(&fs::read_to_string(&path)?, &mut keys);
    }

    let rows: String = keys.iter().map(|key| format!("    \"{key}\",\n")).collect();
    let generated = format!("pub const GENERATED_ANTLOG_ENV_ALLOWLIST: &[&str] = &[\n{rows}];\n");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    fs::write(Path::new(&out_dir).join("antlog_env_allowlist.rs"), generated)?;

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src");
    Ok(())
}
