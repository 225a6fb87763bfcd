//! Dataset curve CLI
//!
//! Prints JSON on stdout; logs go to stderr.
//!
//! ```text
//! dataset_curve price <supply>
//! dataset_curve quote-buy <supply> <amount>
//! dataset_curve quote-sell <supply> <amount>
//! dataset_curve buy <dataset> <amount> [max_total]
//! dataset_curve sell <dataset> <amount> [min_total]
//! dataset_curve markets
//! ```
//!
//! # Environment Variables
//! - `CURVE_CONFIG`: YAML configuration (default `config.yaml`, optional)
//! - `MARKET_STATE_FILE`: persisted market book (default `data/markets.json`)
//! - `CURVE_K`: curve constant override
//! - `QUOTE_DECIMAL_PLACES`: rounding of printed values (default 8)
//! - `LOG_FORMAT` / `RUST_LOG`: see `config::logging`

use anyhow::{bail, Context};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, warn};

use dataset_curve::config::{self, constants, AppConfig};
use dataset_curve::core::{InputPolicy, MarketBook, TradeReceipt};

const USAGE: &str = "usage: dataset_curve <price|quote-buy|quote-sell|buy|sell|markets> [args]";

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    config::init_logging();
    constants::log_configuration();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!(USAGE);
    };

    let config = load_app_config()?;
    let policy = config.curve.input_policy;
    let engine = config.curve.engine()?;
    let dp = constants::quote_decimal_places();

    let output = match command.as_str() {
        "price" => {
            let supply = policy.parse("supply", arg(&args, 1)?)?;
            let curve = engine.curve();
            json!({
                "supply": supply,
                "k": curve.k(),
                "price": curve.price_at(supply)?.round_dp(dp),
                "market_cap": curve.market_cap(supply)?.round_dp(dp),
            })
        }
        "quote-buy" => {
            let supply = policy.parse("supply", arg(&args, 1)?)?;
            let amount = policy.parse("amount", arg(&args, 2)?)?;
            serde_json::to_value(engine.quote_buy(supply, amount)?.rounded(dp))?
        }
        "quote-sell" => {
            let supply = policy.parse("supply", arg(&args, 1)?)?;
            let amount = policy.parse("amount", arg(&args, 2)?)?;
            serde_json::to_value(engine.quote_sell(supply, amount)?.rounded(dp))?
        }
        "buy" | "sell" => {
            let dataset = arg(&args, 1)?;
            let amount = policy.parse("amount", arg(&args, 2)?)?;
            let limit = optional_limit(&args, policy)?;

            let state_file = constants::market_state_file();
            let mut book = MarketBook::load_or_default(&state_file, &config)?;
            let receipt = if command == "buy" {
                book.buy(dataset, amount, limit)?
            } else {
                book.sell(dataset, amount, limit)?
            };
            book.save(&state_file)?;

            info!(
                trade_id = %receipt.id,
                dataset_id = %receipt.dataset_id,
                side = %receipt.side,
                total = %receipt.total,
                "Trade executed"
            );
            serde_json::to_value(round_receipt(receipt, dp))?
        }
        "markets" => {
            let book = MarketBook::load_or_default(&constants::market_state_file(), &config)?;
            serde_json::to_value(book.snapshots()?)?
        }
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Config file is optional; without it the default curve and no markets are used
fn load_app_config() -> anyhow::Result<AppConfig> {
    let path = constants::config_path();
    let config = if path.exists() {
        config::load_config(&path).with_context(|| format!("loading {}", path.display()))?
    } else {
        warn!(path = %path.display(), "No configuration file, using defaults");
        AppConfig::default()
    };
    Ok(config.with_env_overrides()?)
}

fn arg(args: &[String], index: usize) -> anyhow::Result<&str> {
    args.get(index)
        .map(String::as_str)
        .with_context(|| format!("missing argument #{}\n{}", index, USAGE))
}

fn optional_limit(args: &[String], policy: InputPolicy) -> anyhow::Result<Option<Decimal>> {
    match args.get(3) {
        Some(raw) => Ok(Some(policy.parse("limit", raw)?)),
        None => Ok(None),
    }
}

fn round_receipt(receipt: TradeReceipt, dp: u32) -> TradeReceipt {
    TradeReceipt {
        gross: receipt.gross.round_dp(dp),
        fee: receipt.fee.round_dp(dp),
        total: receipt.total.round_dp(dp),
        price_after: receipt.price_after.round_dp(dp),
        ..receipt
    }
}
