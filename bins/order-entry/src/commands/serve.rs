//! Dev and preview server commands

use super::web_config;
use crate::Context;
use anyhow::Result;
use order_entry_cli::output::Status;
use order_entry_web::{dev_router, preview_router, serve, WebConfig};
use owo_colors::OwoColorize;
use std::path::Path;

/// Run the dev server over the static root
pub async fn dev(ctx: &Context, config_path: Option<&Path>, port: Option<u16>) -> Result<()> {
    let mut config = web_config(ctx, config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    if !config.root.is_dir() {
        Status::warning(&format!(
            "Static root {} does not exist; only the proxy will answer",
            config.root.display()
        ));
    }
    announce("Dev server", &config.server.host, config.server.port, &config);

    let router = dev_router(&config)?;
    serve(router, &config.server.host, config.server.port).await?;
    Ok(())
}

/// Serve the build output
pub async fn preview(ctx: &Context, config_path: Option<&Path>, port: Option<u16>) -> Result<()> {
    let mut config = web_config(ctx, config_path)?;
    if let Some(port) = port {
        config.preview.port = port;
    }

    if !config.build.out_dir.is_dir() {
        anyhow::bail!(
            "Build output {} not found; run `order-entry build` first",
            config.build.out_dir.display()
        );
    }
    announce("Preview", &config.preview.host, config.preview.port, &config);

    let router = preview_router(&config)?;
    serve(router, &config.preview.host, config.preview.port).await?;
    Ok(())
}

fn announce(label: &str, host: &str, port: u16, config: &WebConfig) {
    Status::header(label);
    println!("  Local:   {}", format!("http://{host}:{port}/").cyan());
    println!(
        "  Proxy:   {}* -> {}",
        config.proxy.prefix,
        config.proxy.target.cyan()
    );
    println!();
}
