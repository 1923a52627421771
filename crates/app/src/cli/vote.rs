use std::io::{self, Write};

use clap::Args;
use dealfeed::{deals::DealId, display::net_score, votes::VoteDirection};
use dealfeed_app::{context::AppContext, feed::DealFeed};

use super::write_failed;

#[derive(Debug, Args)]
pub(crate) struct VoteArgs {
    /// Deal id
    id: DealId,

    /// Vote direction
    #[arg(value_enum)]
    direction: VoteDirection,
}

pub(crate) async fn run(args: VoteArgs, context: &AppContext) -> Result<(), String> {
    let mut feed = DealFeed::new(context.deals.clone());

    feed.refresh()
        .await
        .map_err(|error| format!("failed to fetch deals: {error}"))?;

    feed.vote(&args.id, args.direction)
        .await
        .map_err(|error| format!("vote on deal {} failed: {error}", args.id))?;

    let mut out = io::stdout().lock();

    let written = match feed.deal(&args.id) {
        Some(deal) => writeln!(
            out,
            "{}: +{} / -{} (score {})",
            deal.title,
            deal.upvotes,
            deal.downvotes,
            net_score(deal)
        ),
        None => writeln!(out, "{} vote recorded for deal {}", args.direction.as_str(), args.id),
    };

    written.map_err(write_failed)
}
