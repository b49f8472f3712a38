use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Кладёт config.toml из корня workspace рядом с собранным бинарником,
/// чтобы `shared::config::load_config` нашёл его без `--config`.
fn main() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .ancestors()
        .nth(2)
        .expect("stock-sync lives in <workspace>/crates/stock-sync");
    let source_config = workspace_root.join("config.toml");
    println!("cargo:rerun-if-changed={}", source_config.display());

    // OUT_DIR: target/<profile>/build/stock-sync-xxx/out
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let profile = env::var("PROFILE").expect("PROFILE is set by cargo");
    let Some(target_dir) = out_dir.ancestors().find(|p| p.ends_with(&profile)) else {
        println!("cargo:warning=Target profile directory not found, config.toml not copied");
        return;
    };

    if !source_config.exists() {
        println!(
            "cargo:warning=config.toml not found at {:?}, the binary will use its embedded default",
            source_config
        );
        return;
    }

    copy_config(&source_config, &target_dir.join("config.toml"));
}

fn copy_config(from: &Path, to: &Path) {
    match fs::copy(from, to) {
        Ok(_) => println!("cargo:warning=Copied config.toml to {:?}", to),
        Err(e) => panic!("Failed to copy config.toml to {:?}: {}", to, e),
    }
}
