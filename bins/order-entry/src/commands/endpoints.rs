//! Endpoint listing and URL resolution

use super::print_json;
use crate::{Context, OutputFormat};
use anyhow::Result;
use order_entry_api_client::Endpoint;
use order_entry_cli::output::{Status, Table};
use serde_json::json;

/// List every endpoint with its path and full URL
pub fn list(ctx: &Context) -> Result<()> {
    let rows: Vec<_> = ctx
        .api
        .endpoints
        .iter()
        .map(|(endpoint, path)| (endpoint, path, ctx.api.build_api_url(path)))
        .collect();

    if ctx.format == OutputFormat::Json {
        let entries: Vec<_> = rows
            .iter()
            .map(|(endpoint, path, url)| json!({"key": endpoint.key(), "path": path, "url": url}))
            .collect();
        return print_json(&json!({"base_url": ctx.api.base_url, "endpoints": entries}));
    }

    Status::header(&format!("Endpoints ({})", ctx.api.base_url));
    let mut table = Table::new(["KEY", "PATH", "URL"]);
    for (endpoint, path, url) in &rows {
        table.row([endpoint.key(), *path, url.as_str()]);
    }
    table.print();
    Ok(())
}

/// Print the full URL for one endpoint
pub fn url(ctx: &Context, endpoint: Endpoint) -> Result<()> {
    let url = ctx.api.url_for(endpoint);
    if ctx.format == OutputFormat::Json {
        return print_json(&json!({"key": endpoint.key(), "url": url}));
    }
    println!("{url}");
    Ok(())
}
