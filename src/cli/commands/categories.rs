//! List categories command handler

use std::collections::HashMap;

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_categories(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let names = store.list_categories().await?;
    let counts: HashMap<String, i64> = store
        .approved_category_counts()
        .await?
        .into_iter()
        .map(|c| (c.category, c.count))
        .collect();

    if names.is_empty() {
        println!("No categories defined.");
        return Ok(());
    }

    println!("Categories ({} total)", names.len());
    println!("{:-<40}", "");

    for name in names {
        let count = counts.get(&name).copied().unwrap_or(0);
        println!("{name:<30} {count:>5} approved");
    }

    Ok(())
}
