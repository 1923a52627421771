//! Terminal tables for deal listings

use std::io;

use jiff::Timestamp;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

use crate::{
    affiliate::affiliate_link,
    deals::Deal,
    display::{format_price, net_score, time_ago},
    numeric::Numeric,
};

/// Write the public listing table.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_deal_table(mut out: impl io::Write, deals: &[&Deal], now: Timestamp) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record([
        "", "Id", "Deal", "Brand", "Price", "Was", "Off", "Score", "Merchant", "Posted",
    ]);

    for deal in deals {
        builder.push_record([
            promoted_marker(deal).to_string(),
            deal.id.to_string(),
            deal.title.clone(),
            deal.brand.clone(),
            format_price(deal.deal_price),
            format_price(deal.original_price),
            percentage(deal.discount_percentage),
            net_score(deal).to_string(),
            deal.merchant.clone(),
            posted(deal, now),
        ]);
    }

    let mut table = builder.build();

    table
        .with(Style::rounded())
        .modify(Columns::new(4..8), Alignment::right())
        .modify(Rows::first(), Alignment::center());

    writeln!(out, "{table}")?;
    writeln!(out, "{} deals found", deals.len())
}

/// Write the admin table.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_admin_table(mut out: impl io::Write, deals: &[&Deal], total: usize) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record([
        "Id", "Deal", "Price", "Votes", "Verified", "Promoted", "Order",
    ]);

    for deal in deals {
        builder.push_record([
            deal.id.to_string(),
            format!("{}\n{} · {}", deal.title, deal.brand, deal.category),
            format_price(deal.deal_price),
            format!("+{} / -{}", deal.upvotes, deal.downvotes),
            yes_no(deal.is_verified).to_string(),
            yes_no(deal.is_promoted).to_string(),
            if deal.is_promoted {
                deal.promotion_order.to_string()
            } else {
                String::new()
            },
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern());

    writeln!(out, "{table}")?;
    writeln!(out, "{} of {total} deals", deals.len())
}

/// Write the detail view of a single deal.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_deal_detail(mut out: impl io::Write, deal: &Deal, now: Timestamp) -> io::Result<()> {
    if deal.is_promoted {
        writeln!(out, "★ Promoted")?;
    }

    writeln!(out, "{}", deal.title)?;

    match &deal.model_number {
        Some(model) => writeln!(out, "{} · {} · Model {model}", deal.brand, deal.category)?,
        None => writeln!(out, "{} · {}", deal.brand, deal.category)?,
    }

    writeln!(
        out,
        "{}  (was {}, {} off)",
        format_price(deal.deal_price),
        format_price(deal.original_price),
        percentage(deal.discount_percentage)
    )?;

    writeln!(
        out,
        "{} at {}: {}",
        if deal.is_verified { "Verified deal" } else { "Deal" },
        deal.merchant,
        affiliate_link(&deal.deal_url, &deal.merchant)
    )?;

    if let Some(store) = &deal.store_name {
        writeln!(out, "Store: {store}")?;
    }

    let location: Vec<&str> = [&deal.address, &deal.city, &deal.state, &deal.pincode]
        .into_iter()
        .filter_map(Option::as_deref)
        .collect();

    if !location.is_empty() {
        writeln!(out, "Location: {}", location.join(", "))?;
    }

    if let Some(warranty) = &deal.warranty_info {
        writeln!(out, "Warranty: {warranty}")?;
    }

    if let Some(expires_at) = deal.expires_at {
        writeln!(out, "Expires: {expires_at}")?;
    }

    writeln!(
        out,
        "Votes: +{} / -{} (score {}), posted {}",
        deal.upvotes,
        deal.downvotes,
        net_score(deal),
        posted(deal, now)
    )?;

    if !deal.specs.is_empty() {
        let mut builder = Builder::default();

        for (name, value) in deal.specs.entries() {
            builder.push_record([name, value]);
        }

        let mut table = builder.build();
        table.with(Style::psql());

        writeln!(out, "{table}")?;
    }

    if !deal.description.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", deal.description)?;
    }

    Ok(())
}

fn promoted_marker(deal: &Deal) -> &'static str {
    if deal.is_promoted { "★" } else { "" }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn percentage(value: Numeric) -> String {
    match value.value() {
        Some(percent) => format!("{percent}%"),
        None => "-".to_string(),
    }
}

fn posted(deal: &Deal, now: Timestamp) -> String {
    deal.created_at
        .map_or_else(|| "-".to_string(), |created_at| time_ago(created_at, now))
}
