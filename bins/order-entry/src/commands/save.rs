//! Order save command

use super::{client, print_json};
use crate::{Context, OutputFormat};
use anyhow::{Context as _, Result};
use order_entry_api_client::Order;
use order_entry_cli::output::{format_amount, Status, Table};
use order_entry_cli::progress::spinner;
use std::io::Read;
use std::path::Path;

/// Read an order from `file` ("-" for stdin) and save it
pub async fn run(ctx: &Context, file: &Path) -> Result<()> {
    let order = read_order(file)?;
    tracing::debug!(
        customer = %order.customer_code,
        lines = order.details.len(),
        "saving order"
    );

    let client = client(ctx)?;
    let pb = spinner("Saving order", ctx.interactive());
    let result = client.orders().save(&order).await;
    pb.finish_and_clear();
    let saved = result?;

    if ctx.format == OutputFormat::Json {
        return print_json(&saved);
    }

    let id = saved
        .order_id
        .map_or_else(|| "(unassigned)".to_string(), |id| id.to_string());
    Status::success(&format!("Order {id} saved for {}", saved.customer_code));

    let mut table = Table::new(["NO", "PRODUCT", "NAME", "QTY", "PRICE", "SUBTOTAL"]);
    for line in &saved.details {
        table.row([
            line.order_no.to_string(),
            line.product_code.clone(),
            line.product_name.clone(),
            line.qty.to_string(),
            format_amount(line.unit_price),
            format_amount(line.subtotal.unwrap_or_else(|| line.line_total())),
        ]);
    }
    table.print();

    let total = saved.total.unwrap_or_else(|| saved.computed_total());
    println!();
    println!("Total: {}", format_amount(total));
    Ok(())
}

fn read_order(file: &Path) -> Result<Order> {
    let content = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read order from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read order file {}", file.display()))?
    };

    serde_json::from_str(&content).context("Order file is not a valid order")
}
