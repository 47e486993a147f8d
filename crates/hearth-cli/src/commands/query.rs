use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use hearth_core::Category;
use hearth_query::{AssetResult, InMemoryCatalog, Resolver};
use hearth_state::Timestamp;

use super::Env;

pub fn query(
    env: &Env,
    asset: &str,
    channel: &str,
    category: Category,
    from: Option<&str>,
    to: Option<&str>,
    format: &str,
) -> Result<()> {
    let from = from.map(parse_bound).transpose()?;
    let to = to.map(parse_bound).transpose()?;

    // Single-channel reads need no catalog.
    let resolver = Resolver::new(env.open_store()?, Arc::new(InMemoryCatalog::default()));
    let values = resolver.get_operational_data_between(asset, channel, category, from, to)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&values)?),
        _ => {
            for v in &values {
                println!("{}  {}", v.timestamp, v.value);
            }
            println!("--- {} values for {asset}{channel} in {category} ---", values.len());
        }
    }
    Ok(())
}

pub async fn resolve(
    env: &Env,
    asset: Option<&str>,
    location: Option<&str>,
    category: Option<Category>,
    format: &str,
) -> Result<()> {
    let resolver = env.resolver()?;
    let Some(mut result) = resolver.resolve(asset, location).await? else {
        println!("No matching asset");
        return Ok(());
    };
    if let Some(category) = category {
        result.category = result.category.filtered(category);
    }

    match format {
        "text" => print!("{}", render_asset(&result)),
        _ => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

pub async fn assets(env: &Env, location: Option<&str>, format: &str) -> Result<()> {
    let resolver = env.resolver()?;
    let results = resolver.resolve_all(location).await?;

    match format {
        "text" => {
            for result in &results {
                print!("{}", render_asset(result));
            }
            println!("--- {} assets ---", results.len());
        }
        _ => println!("{}", serde_json::to_string_pretty(&results)?),
    }
    Ok(())
}

fn parse_bound(s: &str) -> Result<Timestamp> {
    s.parse::<Timestamp>()
        .with_context(|| format!("invalid time bound {s:?} (expected YYYYMMDDTHHMMSSZ)"))
}

fn render_asset(result: &AssetResult) -> String {
    let asset = &result.asset;
    let mut out = String::new();
    let _ = writeln!(out, "{} {} @ {} [{}]", asset.id, asset.name, asset.location, result.category.name);
    for stream in &result.category.streams {
        let _ = writeln!(
            out,
            "  {} {} ({}, {}) {} values",
            stream.stream.id,
            stream.stream.name,
            stream.category,
            stream.stream.unit_of_measure,
            stream.values.len()
        );
        for v in &stream.values {
            let _ = writeln!(out, "    {}  {}", v.timestamp, v.value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::{Asset, Stream};
    use hearth_query::{CategoryResult, OperationalValue, Reading, StreamResult};

    #[test]
    fn render_asset_tree() {
        let result = AssetResult {
            asset: Asset {
                id: "NT01".to_string(),
                name: "Nest Thermostat".to_string(),
                location: "Living Room".to_string(),
                asset_type: "thermostat".to_string(),
                class: "automation".to_string(),
                parent_id: None,
                category: Category::Utilization,
            },
            category: CategoryResult {
                name: Category::Utilization,
                streams: vec![StreamResult {
                    stream: Stream {
                        id: "NT01.T02".to_string(),
                        name: "Actual temperature".to_string(),
                        asset_id: "NT01".to_string(),
                        unit_of_measure: "F".to_string(),
                        category: None,
                    },
                    category: Category::Utilization,
                    values: vec![OperationalValue {
                        timestamp: "20250725T103258Z".to_string(),
                        value: "75".to_string(),
                        reading: Reading::Number(75.0),
                    }],
                }],
            },
        };

        let text = render_asset(&result);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "NT01 Nest Thermostat @ Living Room [utilization]");
        assert_eq!(lines[1], "  NT01.T02 Actual temperature (utilization, F) 1 values");
        assert_eq!(lines[2], "    20250725T103258Z  75");
    }

    #[test]
    fn time_bounds_must_be_compact() {
        assert!(parse_bound("20250725T103258Z").is_ok());
        assert!(parse_bound("2025-07-25T10:32:58Z").is_err());
    }
}
