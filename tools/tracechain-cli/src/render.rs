//! Plain-text rendering of dashboard views.

use std::fmt::Write;

use tracechain_common::format::{
    format_date_from_seconds, format_price, initials, shorten_address,
};
use tracechain_common::product::Product;
use tracechain_common::role::ViewerRole;
use tracechain_common::scan::{ScanCard, ScanPayload};
use tracechain_common::status::{classify, DisplayStatus};
use tracechain_common::summary::DashboardSummary;
use tracechain_common::timeline::TimelineEntry;

pub fn product_table(products: &[&Product], now: u64) -> String {
    if products.is_empty() {
        return "No products\n".into();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<4} {:<24} {:>16} {:<15} {}",
        "ID", "", "NAME", "PRICE", "STATUS", "OWNER"
    );
    for p in products {
        let _ = writeln!(
            out,
            "{:<6} {:<4} {:<24} {:>16} {:<15} {}",
            format!("#{}", p.id),
            initials(&p.name),
            p.name,
            format_price(p.price),
            classify(p, now).label(),
            shorten_address(&p.owner.to_string()),
        );
    }
    out
}

pub fn product_detail(
    product: &Product,
    role: ViewerRole,
    timeline: &[TimelineEntry],
    now: u64,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", product.id, product.name);
    let _ = writeln!(out, "  Status:       {}", classify(product, now));
    let _ = writeln!(out, "  Price:        {}", format_price(product.price));
    let _ = writeln!(
        out,
        "  Description:  {}",
        product.description.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "  Ingredients:  {}",
        product.ingredients.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "  Manufactured: {}",
        format_date_from_seconds(product.manufacture_date)
    );
    let _ = writeln!(
        out,
        "  Expires:      {}",
        format_date_from_seconds(product.expiry_date)
    );
    let _ = writeln!(out, "  Owner:        {}", product.owner);
    let _ = writeln!(out, "  Viewing as:   {role:?}");
    let actions: Vec<String> = role.actions().iter().map(|a| format!("{a:?}")).collect();
    let _ = writeln!(out, "  Actions:      {}", actions.join(", "));

    let _ = writeln!(out, "Timeline:");
    for entry in timeline {
        let _ = write!(
            out,
            "  {:<10} {}",
            format_date_from_seconds(entry.timestamp),
            entry.title
        );
        if let Some(by) = &entry.by {
            let _ = write!(out, " by {}", shorten_address(&by.to_string()));
        }
        if let Some(note) = &entry.note {
            let _ = write!(out, " ({note})");
        }
        out.push('\n');
    }
    out
}

pub fn scan_card(card: &ScanCard, payload: &ScanPayload) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Product traceability");
    let _ = writeln!(out, "  {} [{}]", card.name, card.status);
    let _ = writeln!(out, "  {}", card.price);
    let _ = writeln!(out, "  Product code:  #{}", card.id);
    let _ = writeln!(out, "  Created:       {}", card.created);
    let _ = writeln!(out, "  Manufactured:  {}", card.manufactured);
    let _ = writeln!(out, "  Expires:       {}", card.expires);
    let _ = writeln!(out, "  Owner:         {}", card.owner);
    if let Some(description) = &card.description {
        let _ = writeln!(out, "  Description:   {description}");
    }
    if let Some(ingredients) = &card.ingredients {
        let _ = writeln!(out, "  Ingredients:   {ingredients}");
    }
    let _ = writeln!(out, "QR payload:");
    let _ = writeln!(out, "  {}", payload.to_json());
    out
}

pub fn summary(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {}", "Total", summary.total);
    for status in DisplayStatus::all() {
        let _ = writeln!(out, "{:<16} {}", status.label(), summary.count(*status));
    }
    out
}
