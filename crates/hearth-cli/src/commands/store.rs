use std::path::PathBuf;

use anyhow::{Result, bail};
use hearth_core::Category;

use super::Env;

pub fn seed(env: &Env, dir: Option<PathBuf>) -> Result<()> {
    let dir = dir
        .or_else(|| env.config.seed.as_ref().map(|s| s.dir.clone()))
        .unwrap_or_else(|| PathBuf::from("load"));
    if !dir.is_dir() {
        bail!("seed directory {} does not exist", dir.display());
    }

    let store = env.open_store()?;
    let reports = store.load_seed_dir(&dir)?;
    for report in &reports {
        println!(
            "✓ {:<12} loaded {:>6}  skipped {:>4}",
            report.namespace.name(),
            report.loaded,
            report.skipped
        );
    }
    if reports.is_empty() {
        println!("No seed files found in {}", dir.display());
    }
    store.close();
    Ok(())
}

pub fn put(env: &Env, category: Category, key: &str, value: &str) -> Result<()> {
    let store = env.open_store()?;
    store.put(category, key, value)?;
    println!("✓ {category}: {key} = {value}");
    Ok(())
}

pub fn get(env: &Env, category: Category, key: &str) -> Result<()> {
    let store = env.open_store()?;
    match store.get(category, key)? {
        Some(value) => println!("{value}"),
        None => bail!("{key} not found in {category}"),
    }
    Ok(())
}

pub fn scan(env: &Env, category: Category, prefix: &str, format: &str) -> Result<()> {
    let store = env.open_store()?;
    let mut entries = Vec::new();
    for entry in store.scan_by_prefix(category, prefix)? {
        entries.push(entry?);
    }

    match format {
        "json" => {
            let rows: Vec<_> = entries
                .iter()
                .map(|e| serde_json::json!({ "key": e.key, "value": e.value }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        _ => {
            for e in &entries {
                println!("{}: {}", e.key, e.value);
            }
            println!("--- {} records in {category} with prefix {prefix:?} ---", entries.len());
        }
    }
    Ok(())
}
