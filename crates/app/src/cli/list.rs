use std::io;

use clap::Args;
use dealfeed::{
    filters::{DealFilters, DealTypeFilter, SortBy},
    listing::write_deal_table,
};
use dealfeed_app::{context::AppContext, feed::DealFeed};
use jiff::Timestamp;
use rust_decimal::Decimal;

use super::write_failed;

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    /// Only deals in this category
    #[arg(long)]
    category: Option<String>,

    /// Only deals of this brand
    #[arg(long)]
    brand: Option<String>,

    /// Only deals available in this city
    #[arg(long)]
    city: Option<String>,

    /// Online or in-store deals
    #[arg(long, value_enum)]
    deal_type: Option<DealTypeFilter>,

    /// Lowest deal price
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Highest deal price
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Listing order
    #[arg(long, value_enum, default_value_t = SortBy::Newest)]
    sort: SortBy,

    /// Free-text search on title and brand
    #[arg(long, short)]
    query: Option<String>,

    /// Hide deals with non-numeric prices
    #[arg(long)]
    well_formed: bool,
}

impl ListArgs {
    fn filters(&self) -> DealFilters {
        DealFilters {
            category: self.category.clone(),
            brand: self.brand.clone(),
            city: self.city.clone(),
            deal_type: self.deal_type,
            min_price: self.min_price,
            max_price: self.max_price,
            sort_by: Some(self.sort),
        }
    }
}

pub(crate) async fn run(args: ListArgs, context: &AppContext) -> Result<(), String> {
    let mut feed = DealFeed::new(context.deals.clone());

    if args.well_formed {
        feed = feed.well_formed_only();
    }

    feed.set_filters(args.filters());

    if let Some(query) = &args.query {
        feed.search(query);
    }

    feed.refresh()
        .await
        .map_err(|error| format!("failed to fetch deals: {error}"))?;

    write_deal_table(io::stdout().lock(), &feed.visible(), Timestamp::now()).map_err(write_failed)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        args: ListArgs,
    }

    #[test]
    fn flags_become_filters() -> TestResult {
        let harness = Harness::try_parse_from([
            "list",
            "--category",
            "Mobiles",
            "--deal-type",
            "physical",
            "--min-price",
            "100",
            "--sort",
            "price_low",
        ])?;

        assert_eq!(
            harness.args.filters(),
            DealFilters {
                category: Some("Mobiles".to_string()),
                deal_type: Some(DealTypeFilter::Physical),
                min_price: Some(Decimal::from(100)),
                sort_by: Some(SortBy::PriceLow),
                ..DealFilters::default()
            }
        );

        Ok(())
    }
}
