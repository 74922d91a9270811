use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, bail};
use log::info;
use record_query::screens::{SCREEN_NAMES, schema_for};
use record_query::{Criteria, DynamicRecord, Screen, load_records};

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let (Some(screen_name), Some(path)) = (args.next(), args.next().map(PathBuf::from)) else {
        bail!("usage: record-query <{}> <records.json> [search]", SCREEN_NAMES.join("|"));
    };
    let search = args.next().unwrap_or_default();

    let schema = schema_for(&screen_name)?;
    let start = Instant::now();
    let records: Vec<DynamicRecord> = load_records(&path, &schema)
        .with_context(|| format!("Failed to load {} records from {}", screen_name, path.display()))?;

    let mut screen = Screen::new(schema, records).context("Invalid record collection")?;
    screen.set_criteria(Criteria::new().search(search))?;

    let view = screen.view()?;
    info!(
        "{} of {} records match in {:?}",
        view.len(),
        view.total(),
        start.elapsed()
    );

    let fields: Vec<&str> = screen
        .schema()
        .fields()
        .iter()
        .map(|field| field.name.as_str())
        .collect();
    let exported = screen.export(&fields)?;
    println!("{}", serde_json::to_string_pretty(&exported)?);

    for (label, value) in screen.summary().iter() {
        info!("{label}: {}", serde_json::to_string(value)?);
    }

    Ok(())
}
