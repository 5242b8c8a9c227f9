//! Connectivity test command

use super::{client, print_json};
use crate::{Context, OutputFormat};
use anyhow::Result;
use order_entry_api_client::Endpoint;
use order_entry_cli::output::format_duration;
use order_entry_cli::progress::{finish_error, finish_success, spinner};
use order_entry_telemetry::Timer;
use serde_json::json;

/// Call the test endpoint and report the reply
pub async fn run(ctx: &Context, post: bool) -> Result<()> {
    let client = client(ctx)?;
    let url = ctx.api.url_for(Endpoint::Test);
    let pb = spinner(&format!("Contacting {url}"), ctx.interactive());

    let timer = Timer::start("ping");
    let result = if post {
        client.diagnostics().test_post().await
    } else {
        client.diagnostics().test().await
    };
    let elapsed = timer.stop();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            finish_error(&pb, &format!("{url} unreachable"));
            return Err(e.into());
        }
    };

    if ctx.format == OutputFormat::Json {
        pb.finish_and_clear();
        return print_json(&json!({
            "url": url,
            "message": response.message,
            "elapsed_ms": elapsed.as_millis(),
        }));
    }

    let timing = if ctx.verbose {
        format!(" ({})", format_duration(elapsed))
    } else {
        String::new()
    };
    finish_success(&pb, &format!("{}{timing}", response.message));
    Ok(())
}
