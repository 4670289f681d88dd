//! `lectio context`: context windows for a commentary entry or document.

use anyhow::Result;

use lectio_core::router::ContextRequest;

use crate::config::Config;
use crate::engine::Engine;

pub async fn run_context(
    config: &Config,
    query: Option<String>,
    id: Option<i64>,
    file_path: Option<String>,
    json: bool,
) -> Result<()> {
    let req = ContextRequest {
        query,
        file_path,
        id,
    };

    let engine = Engine::open(config).await?;
    let result = engine.context(&req).await;
    engine.close().await;
    let response = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("--- {} ---", response.h1_text);
    println!("{}", response.breadcrumb_text);
    println!();
    for (i, text) in response.contexts.iter().enumerate() {
        println!("[context {}]", i + 1);
        println!("{}", text.trim());
        println!();
    }
    Ok(())
}
