use std::io::{self, Write};

use clap::Args;
use dealfeed_app::{
    context::AppContext,
    domain::users::{UsersService, UsersServiceError, data::LocationUpdate},
};

use super::write_failed;

#[derive(Debug, Args)]
pub(crate) struct LocationArgs {
    /// Preferred city
    #[arg(long)]
    city: Option<String>,

    /// Preferred postal code
    #[arg(long)]
    pincode: Option<String>,

    /// Current latitude
    #[arg(long, requires = "longitude", allow_negative_numbers = true)]
    latitude: Option<f64>,

    /// Current longitude
    #[arg(long, requires = "latitude", allow_negative_numbers = true)]
    longitude: Option<f64>,
}

fn users(context: &AppContext) -> Result<&dyn UsersService, String> {
    context
        .users
        .as_deref()
        .ok_or_else(|| "user accounts need the backend; drop --fixture".to_string())
}

pub(crate) async fn whoami(context: &AppContext) -> Result<(), String> {
    let user = users(context)?
        .current_user()
        .await
        .map_err(|error| format!("failed to fetch user: {error}"))?;

    let mut out = io::stdout().lock();

    let written = match user {
        Some(user) if user.name.is_empty() => writeln!(out, "{} ({})", user.email, user.id),
        Some(user) => writeln!(out, "{} <{}> ({})", user.name, user.email, user.id),
        None => writeln!(out, "not signed in"),
    };

    written.map_err(write_failed)
}

pub(crate) async fn location(args: LocationArgs, context: &AppContext) -> Result<(), String> {
    let update = LocationUpdate {
        preferred_city: args.city,
        preferred_pincode: args.pincode,
        last_known_latitude: args.latitude,
        last_known_longitude: args.longitude,
    };

    if update == LocationUpdate::default() {
        return Err("nothing to update; pass --city, --pincode or a position".to_string());
    }

    users(context)?
        .update_location(update)
        .await
        .map_err(|error| match error {
            UsersServiceError::NotSignedIn => {
                "sign in first; set DEALS_ACCESS_TOKEN or pass --access-token".to_string()
            }
            other => format!("failed to update location: {other}"),
        })?;

    writeln!(io::stdout().lock(), "location updated").map_err(write_failed)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        args: LocationArgs,
    }

    #[test]
    fn position_needs_both_coordinates() {
        assert!(Harness::try_parse_from(["location", "--latitude", "18.5"]).is_err());
    }

    #[test]
    fn negative_coordinates_parse() -> TestResult {
        let harness =
            Harness::try_parse_from(["location", "--latitude", "-33.9", "--longitude", "18.4"])?;

        assert!(harness.args.latitude.is_some_and(|at| (at + 33.9).abs() < f64::EPSILON));
        assert!(harness.args.longitude.is_some_and(|at| (at - 18.4).abs() < f64::EPSILON));

        Ok(())
    }
}
