//! Plain-text rendering of listing and detail state.

use std::fmt::Write as _;

use client_core::{DetailLoader, DetailState, ListingController, ListingState, PaginationControls, RecordTarget};
use serde_json::Value;
use shared::domain::{Item, Resource};

pub fn format_price(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${value:.2}")
    }
}

fn number(item: &Item, key: &str) -> Option<f64> {
    match item.field(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Retail price minus cost, and that difference as a percentage of retail.
pub fn profit(item: &Item) -> Option<(f64, f64)> {
    let retail = number(item, "retailPrice").filter(|v| *v != 0.0)?;
    let cost = number(item, "cost").filter(|v| *v != 0.0)?;
    let profit = retail - cost;
    Some((profit, profit / retail * 100.0))
}

pub fn item_line(item: &Item) -> String {
    let mut line = format!("#{:<6} {}", item.id, item.name().unwrap_or("(unnamed)"));
    if let Some(brand) = item.text("brand") {
        let _ = write!(line, " | Brand: {brand}");
    }
    if let Some(category) = item.text("category") {
        let _ = write!(line, " | Category: {category}");
    }
    if let Some(price) = number(item, "retailPrice") {
        let _ = write!(line, " | {}", format_price(price));
    }
    if let Some(count) = item.field("productCount").and_then(Value::as_u64) {
        let _ = write!(line, " | {count} Products");
    }
    line
}

/// Page buttons are shown 1-based; slots that clamp onto the same page are
/// collapsed into one button.
pub fn pagination_line(controls: &PaginationControls) -> String {
    let mut pages = controls.pages.clone();
    pages.dedup();
    let buttons: Vec<String> = pages
        .iter()
        .map(|page| {
            if *page == controls.current {
                format!("[{}]", page + 1)
            } else {
                (page + 1).to_string()
            }
        })
        .collect();
    let prev = if controls.prev_enabled { "< Prev" } else { "  ----" };
    let next = if controls.next_enabled { "Next >" } else { "----  " };
    format!("{prev} | {} | {next}", buttons.join(" "))
}

fn empty_hint(resource: &Resource, context: Option<&Item>) -> String {
    match resource {
        Resource::ProductSearch(_) => "Try a different search term.".to_string(),
        Resource::Departments => "No departments are currently available.".to_string(),
        Resource::ProductsByDepartment(_) => format!(
            "No products are currently available in the {} department.",
            context.and_then(Item::name).unwrap_or("selected")
        ),
        _ => "No products available.".to_string(),
    }
}

pub fn listing(listing: &ListingController) -> String {
    let mut out = String::new();
    match listing.state() {
        ListingState::Idle => {}
        ListingState::Loading(_) => out.push_str("Loading...\n"),
        ListingState::Failed(_, err) => {
            let message = listing
                .failure_message()
                .unwrap_or("Failed to load. Please try again later.");
            let _ = writeln!(out, "Error! {message}");
            let _ = writeln!(out, "  ({err})");
        }
        ListingState::Loaded(request, result) => {
            if let Some(header) = &result.context {
                let _ = writeln!(out, "== {} ==", header.name().unwrap_or("Department"));
                if let Some(description) = header.text("description") {
                    let _ = writeln!(out, "{description}");
                }
                let _ = writeln!(
                    out,
                    "{} Products | Page {} of {}",
                    result.total_items,
                    result.page_index + 1,
                    result.total_pages
                );
            }

            if result.is_empty() {
                let what = if request.resource.is_product_listing() {
                    "products"
                } else {
                    "departments"
                };
                let _ = writeln!(out, "No {what} found");
                let _ = writeln!(out, "{}", empty_hint(&request.resource, result.context.as_ref()));
                return out;
            }

            for item in &result.items {
                let _ = writeln!(out, "{}", item_line(item));
            }

            let controls = listing.pagination();
            if controls.visible() {
                let _ = writeln!(out, "{}", pagination_line(&controls));
            }
            if let Some(summary) = listing.summary() {
                let _ = writeln!(out, "{summary}");
            }
        }
    }
    out
}

pub fn detail(loader: &DetailLoader) -> String {
    let mut out = String::new();
    match loader.state() {
        DetailState::Idle => {}
        DetailState::Loading => out.push_str("Loading...\n"),
        DetailState::Failed(_) if loader.is_not_found() => {
            let what = match loader.target() {
                RecordTarget::Product(_) => "Product",
                _ => "Department",
            };
            let _ = writeln!(out, "{what} not found");
        }
        DetailState::Failed(err) => {
            let message = loader
                .failure_message()
                .unwrap_or("Failed to load. Please try again later.");
            let _ = writeln!(out, "Error! {message}");
            let _ = writeln!(out, "  ({err})");
        }
        DetailState::Loaded(item) => {
            let _ = writeln!(out, "{}", item.name().unwrap_or("(unnamed)"));
            for (label, key) in [
                ("Brand", "brand"),
                ("Category", "category"),
                ("SKU", "sku"),
                ("Description", "description"),
            ] {
                if let Some(value) = item.text(key) {
                    let _ = writeln!(out, "  {label}: {value}");
                }
            }
            if let Some(price) = number(item, "retailPrice") {
                let _ = writeln!(out, "  Retail price: {}", format_price(price));
            }
            if let Some(cost) = number(item, "cost") {
                let _ = writeln!(out, "  Cost: {}", format_price(cost));
            }
            if let Some((profit, margin)) = profit(item) {
                let _ = writeln!(out, "  Profit: {} ({margin:.2}%)", format_price(profit));
            }
            if let Some(department) = item
                .field("department")
                .and_then(|d| d.get("name"))
                .and_then(Value::as_str)
            {
                let _ = writeln!(out, "  Department: {department}");
            }
        }
    }
    out
}
