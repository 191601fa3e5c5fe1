//! plaidster: command-line front end for the aggregation API client.
//!
//! Usage:
//!   plaidster categories
//!   plaidster institutions
//!   plaidster longtail --count 50 --offset 0
//!   plaidster search --query "bank of" [--product auth]
//!   plaidster search --id 5301a93ac140de84910000e0
//!   plaidster balances --token test_wells
//!   plaidster transactions --token test_wells [--pending] [--from 2016-01-01] [--to 2016-01-31]
//!   plaidster connect --username plaid_test --password plaid_good --type wells [--pin 1234]
//!   plaidster mfa --token test_bofa --answer tomato
//!   plaidster remove --token test_wells
//!
//! Global: `--config plaid.json` (otherwise sandbox defaults), then
//! PLAID_CLIENT_ID / PLAID_SECRET / PLAID_ENV / PLAID_TIMEOUT_SECS.
//! Results print as pretty JSON on stdout.

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, NaiveDate, Utc};
use plaidster_core::{
    ClientConfig, Credentials, MfaResponse, PlaidClient, Product, TransactionQuery,
};
use serde::Serialize;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args
        .get(1)
        .filter(|a| !a.starts_with("--"))
        .ok_or_else(|| anyhow!("missing command (try `plaidster categories`)"))?;

    let config = match flag(&args, "--config") {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default_test(),
    }
    .with_env_overrides()?;
    log::info!("environment: {:?}, timeout {}s", config.environment, config.connection_timeout_secs);

    let client = PlaidClient::new(config)?;

    match command.as_str() {
        "categories" => print(&client.fetch_categories().await?),
        "institutions" => print(&client.fetch_institutions().await?),
        "longtail" => {
            let count = parse_arg(&args, "--count", 50u32);
            let offset = parse_arg(&args, "--offset", 0u32);
            print(&client.fetch_longtail_institutions(count, offset).await?)
        }
        "search" => {
            let found = match (flag(&args, "--id"), flag(&args, "--query")) {
                (Some(id), _) => client.search_institution_by_id(id).await?,
                (None, Some(query)) => {
                    let product = flag(&args, "--product")
                        .map(str::parse::<Product>)
                        .transpose()
                        .map_err(|e| anyhow!(e))?;
                    client.search_institutions(query, product).await?
                }
                (None, None) => bail!("search needs --query or --id"),
            };
            print(&found)
        }
        "balances" => print(&client.fetch_balances(required(&args, "--token")?).await?),
        "transactions" => {
            let mut query = TransactionQuery::new(args.iter().any(|a| a == "--pending"));
            if let Some(from) = flag(&args, "--from") {
                query = query.since(day_start(from)?);
            }
            if let Some(to) = flag(&args, "--to") {
                query = query.until(day_end(to)?);
            }
            print(&client.fetch_transactions(required(&args, "--token")?, &query).await?)
        }
        "connect" => {
            let mut credentials = Credentials::new(
                required(&args, "--username")?,
                required(&args, "--password")?,
            );
            if let Some(pin) = flag(&args, "--pin") {
                credentials = credentials.with_pin(pin);
            }
            print(&client.add_user(&credentials, required(&args, "--type")?).await?)
        }
        "mfa" => {
            let token = required(&args, "--token")?;
            print(&client.submit_mfa(token, &mfa_response(&args)?).await?)
        }
        "remove" => print(&client.remove_user(required(&args, "--token")?).await?),
        other => bail!("unknown command '{other}'"),
    }
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn mfa_response(args: &[String]) -> Result<MfaResponse> {
    if let Some(code) = flag(args, "--code") {
        Ok(MfaResponse::Code(code.to_string()))
    } else if let Some(answer) = flag(args, "--answer") {
        Ok(MfaResponse::Answer(answer.to_string()))
    } else if let Some(device) = flag(args, "--device-type") {
        Ok(MfaResponse::DeviceType(device.to_string()))
    } else if let Some(mask) = flag(args, "--device-mask") {
        Ok(MfaResponse::DeviceMask(mask.to_string()))
    } else {
        bail!("mfa needs one of --code, --answer, --device-type, --device-mask")
    }
}

fn day_start(text: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| anyhow!("invalid date '{text}': {e}"))?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| anyhow!("invalid date '{text}'"))
}

fn day_end(text: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| anyhow!("invalid date '{text}': {e}"))?;
    date.and_hms_milli_opt(23, 59, 59, 999)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| anyhow!("invalid date '{text}'"))
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn required<'a>(args: &'a [String], name: &str) -> Result<&'a str> {
    flag(args, name).ok_or_else(|| anyhow!("missing {name}"))
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
