//! CLI command implementations

pub mod build;
pub mod call;
pub mod endpoints;
pub mod lookup;
pub mod ping;
pub mod save;
pub mod serve;

use crate::Context;
use anyhow::Result;
use order_entry_api_client::OrderEntryClient;
use order_entry_web::WebConfig;
use serde::Serialize;
use std::path::Path;

/// Build a client from the context's configuration
pub fn client(ctx: &Context) -> Result<OrderEntryClient> {
    Ok(OrderEntryClient::with_config(ctx.api.clone())?)
}

/// Load the web config, letting `--api-url` win over file and environment
pub fn web_config(ctx: &Context, path: Option<&Path>) -> Result<WebConfig> {
    let config = WebConfig::load(path)?;
    Ok(match &ctx.api_url {
        Some(url) => config.with_api_url(url.clone()),
        None => config,
    })
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
