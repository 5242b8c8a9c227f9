//! Customer and product lookup commands

use super::{client, print_json};
use crate::{Context, OutputFormat};
use anyhow::Result;
use order_entry_api_client::{LookupQuery, LookupResponse};
use order_entry_cli::output::{format_amount, format_count, Status, Table};
use order_entry_cli::progress::spinner;

fn query(name: Option<String>, page: Option<u32>) -> LookupQuery {
    let mut query = LookupQuery::new();
    if let Some(name) = name {
        query = query.with_name(name);
    }
    if let Some(page) = page {
        query = query.with_page(page);
    }
    query
}

/// Look up customers by name prefix
pub async fn customers(ctx: &Context, name: Option<String>, page: Option<u32>) -> Result<()> {
    let client = client(ctx)?;
    let pb = spinner("Looking up customers", ctx.interactive());
    let result = client.lookup().customers(&query(name, page)).await;
    pb.finish_and_clear();
    let response = result?;

    if ctx.format == OutputFormat::Json {
        return print_json(&response);
    }

    let mut table = Table::new(["CODE", "NAME"]);
    for customer in &response.data {
        table.row([customer.customer_code.as_str(), customer.customer_name.as_str()]);
    }
    print_page(&response, &table, page, ("customer", "customers"));
    Ok(())
}

/// Look up products by name prefix
pub async fn products(ctx: &Context, name: Option<String>, page: Option<u32>) -> Result<()> {
    let client = client(ctx)?;
    let pb = spinner("Looking up products", ctx.interactive());
    let result = client.lookup().products(&query(name, page)).await;
    pb.finish_and_clear();
    let response = result?;

    if ctx.format == OutputFormat::Json {
        return print_json(&response);
    }

    let mut table = Table::new(["CODE", "NAME", "PRICE"]);
    for product in &response.data {
        table.row([
            product.product_code.clone(),
            product.product_name.clone(),
            format_amount(product.product_price),
        ]);
    }
    print_page(&response, &table, page, ("product", "products"));
    Ok(())
}

fn print_page<T>(
    response: &LookupResponse<T>,
    table: &Table,
    page: Option<u32>,
    (singular, plural): (&str, &str),
) {
    if table.is_empty() {
        Status::info(&format!("No {plural} found"));
        return;
    }

    table.print();
    let page = page.unwrap_or(1);
    println!();
    Status::info(&format!(
        "{} on page {page} of {}",
        format_count(table.len(), singular, plural),
        response.total_pages
    ));
    if response.has_next_page(page) {
        Status::info(&format!("More results: --page {}", page + 1));
    }
}
