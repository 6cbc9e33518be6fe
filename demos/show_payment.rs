//! Look up a payment and print its status and instructions.
//!
//! Requires `ZAYPAY_PRICE_SETTING_ID` and `ZAYPAY_API_KEY` environment
//! variables (a `.env` file works too).
//!
//! Run: `cargo run --example show_payment --features blocking -- <payment-id>`

use std::process::ExitCode;

use zaypay_rs::client::ZaypayBlockingClient;
use zaypay_rs::models::{PaymentId, PriceSettingId};
use zaypay_rs::price_setting::BlockingPriceSetting;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _dotenv = dotenvy::dotenv();

    let id: PriceSettingId = std::env::var("ZAYPAY_PRICE_SETTING_ID")
        .map_err(|_| "ZAYPAY_PRICE_SETTING_ID environment variable not set")?
        .parse()?;
    let api_key = std::env::var("ZAYPAY_API_KEY")
        .map_err(|_| "ZAYPAY_API_KEY environment variable not set")?;
    let payment_id: PaymentId = std::env::args()
        .nth(1)
        .ok_or("usage: show_payment <payment-id>")?
        .parse()?;

    let client = ZaypayBlockingClient::builder().build()?;
    let price_setting = BlockingPriceSetting::new(client, id, api_key)?;

    println!("Fetching payment {payment_id}...");
    let result = price_setting.show_payment(payment_id)?;
    println!("Status: {}", result.status().unwrap_or("unknown"));
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
