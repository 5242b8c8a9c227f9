//! Raw request command

use super::{client, print_json};
use crate::Context;
use anyhow::{anyhow, Result};
use order_entry_api_client::{Method, RequestOptions};
use order_entry_cli::progress::spinner;
use serde_json::Value;

/// Send one request to `path` and print the decoded JSON reply
pub async fn run(
    ctx: &Context,
    path: &str,
    method: &str,
    headers: &[String],
    data: Option<String>,
) -> Result<()> {
    let options = build_options(method, headers, data)?;
    let client = client(ctx)?;

    let pb = spinner(
        &format!("{} {}", options.method, ctx.api.build_api_url(path)),
        ctx.interactive(),
    );
    let result: Result<Value, _> = client.api_call(path, options).await;
    pb.finish_and_clear();

    print_json(&result?)
}

fn build_options(method: &str, headers: &[String], data: Option<String>) -> Result<RequestOptions> {
    let method = method
        .to_uppercase()
        .parse::<Method>()
        .map_err(|_| anyhow!("Invalid HTTP method '{method}'"))?;
    let mut options = RequestOptions::get().method(method);

    for header in headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| anyhow!("Header must look like 'Name: value', got '{header}'"))?;
        options = options.header(name.trim(), value.trim())?;
    }

    if let Some(body) = data {
        options = options.body(body);
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_entry_api_client::merge_headers;

    #[test]
    fn test_build_options() {
        let options = build_options(
            "post",
            &["X-Trace: abc".to_string(), "Content-Type: text/plain".to_string()],
            Some("hello".to_string()),
        )
        .unwrap();

        assert_eq!(options.method.as_str(), "POST");
        assert_eq!(options.body.as_deref(), Some(b"hello".as_slice()));
        let merged = merge_headers(&options.headers);
        assert_eq!(merged.get("content-type").unwrap(), "text/plain");
        assert_eq!(merged.get("x-trace").unwrap(), "abc");
    }

    #[test]
    fn test_build_options_rejects_bad_header() {
        assert!(build_options("GET", &["no-colon".to_string()], None).is_err());
    }
}
