use std::io::{self, Write};

use clap::Args;
use dealfeed::{
    deals::DealId,
    display::format_price,
    listing::write_deal_detail,
};
use dealfeed_app::{context::AppContext, domain::deals::DealsServiceError, feed::DealFeed};
use jiff::Timestamp;

use super::write_failed;

#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    /// Deal id
    id: DealId,
}

pub(crate) async fn run(args: ShowArgs, context: &AppContext) -> Result<(), String> {
    let feed = DealFeed::new(context.deals.clone());

    let deal = feed.detail(&args.id).await.map_err(|error| match error {
        DealsServiceError::NotFound => format!("deal {} not found", args.id),
        other => format!("failed to fetch deal: {other}"),
    })?;

    let history = feed
        .price_history(&args.id)
        .await
        .map_err(|error| format!("failed to fetch price history: {error}"))?;

    let mut out = io::stdout().lock();

    write_deal_detail(&mut out, &deal, Timestamp::now()).map_err(write_failed)?;

    if !history.is_empty() {
        writeln!(out).map_err(write_failed)?;
        writeln!(out, "Price history").map_err(write_failed)?;

        for entry in history {
            let recorded_at = entry
                .recorded_at
                .map_or_else(|| "-".to_string(), |at| at.to_string());

            writeln!(out, "  {recorded_at}  {}", format_price(entry.price)).map_err(write_failed)?;
        }
    }

    Ok(())
}
