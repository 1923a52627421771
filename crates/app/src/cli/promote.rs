use std::io::{self, Write};

use clap::Args;
use dealfeed::deals::DealId;
use dealfeed_app::{admin::AdminDesk, context::AppContext, domain::deals::DealsServiceError};

use super::write_failed;

#[derive(Debug, Args)]
pub(crate) struct PromoteArgs {
    /// Deal id
    id: DealId,

    /// Promotion rank, lower first; defaults to after the last promoted deal
    #[arg(long)]
    order: Option<i64>,
}

#[derive(Debug, Args)]
pub(crate) struct DemoteArgs {
    /// Deal id
    id: DealId,
}

async fn desk(context: &AppContext) -> Result<AdminDesk, String> {
    let mut desk = AdminDesk::new(context.deals.clone());

    desk.load()
        .await
        .map_err(|error| format!("failed to fetch deals: {error}"))?;

    Ok(desk)
}

fn promotion_failed(id: &DealId, error: DealsServiceError) -> String {
    match error {
        DealsServiceError::NotFound => format!("deal {id} not found"),
        other => format!("failed to update promotion of deal {id}: {other}"),
    }
}

pub(crate) async fn promote(args: PromoteArgs, context: &AppContext) -> Result<(), String> {
    let mut desk = desk(context).await?;
    let order = args.order.unwrap_or_else(|| desk.next_promotion_order());

    desk.promote_at(&args.id, order)
        .await
        .map_err(|error| promotion_failed(&args.id, error))?;

    writeln!(io::stdout().lock(), "deal {} promoted at rank {order}", args.id).map_err(write_failed)
}

pub(crate) async fn demote(args: DemoteArgs, context: &AppContext) -> Result<(), String> {
    let mut desk = desk(context).await?;

    desk.demote(&args.id)
        .await
        .map_err(|error| promotion_failed(&args.id, error))?;

    writeln!(io::stdout().lock(), "deal {} is no longer promoted", args.id).map_err(write_failed)
}
