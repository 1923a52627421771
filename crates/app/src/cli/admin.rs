use std::io;

use clap::Args;
use dealfeed::{admin::AdminStatus, listing::write_admin_table};
use dealfeed_app::{admin::AdminDesk, context::AppContext};

use super::write_failed;

#[derive(Debug, Args)]
pub(crate) struct AdminArgs {
    /// Search title, brand or category
    #[arg(long, short, default_value = "")]
    query: String,

    /// Only promoted or verified deals
    #[arg(long, value_enum, default_value_t = AdminStatus::All)]
    status: AdminStatus,
}

pub(crate) async fn run(args: AdminArgs, context: &AppContext) -> Result<(), String> {
    let mut desk = AdminDesk::new(context.deals.clone());

    desk.load()
        .await
        .map_err(|error| format!("failed to fetch deals: {error}"))?;

    desk.set_query(&args.query);
    desk.set_status(args.status);

    write_admin_table(io::stdout().lock(), &desk.view(), desk.deals().len()).map_err(write_failed)
}
