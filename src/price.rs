// File: price.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::config::Endpoints;
use crate::fetcher::Fetcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriceProvider {
    Binance,
    CoinGecko,
    Coinbase,
}

impl PriceProvider {
    /// Lookup order. The first provider yielding a usable price wins.
    pub const PRIORITY: [PriceProvider; 3] = [
        PriceProvider::Binance,
        PriceProvider::CoinGecko,
        PriceProvider::Coinbase,
    ];

    pub fn url(&self, endpoints: &Endpoints) -> String {
        match self {
            PriceProvider::Binance => endpoints.binance_ticker(),
            PriceProvider::CoinGecko => endpoints.coingecko_simple_price(),
            PriceProvider::Coinbase => endpoints.coinbase_spot(),
        }
    }

    pub fn parse(&self, body: &Value) -> Option<f64> {
        let field = match self {
            PriceProvider::Binance => body.get("price"),
            PriceProvider::CoinGecko => body.get("bitcoin").and_then(|b| b.get("usd")),
            PriceProvider::Coinbase => body.get("data").and_then(|d| d.get("amount")),
        };
        field.and_then(numeric)
    }
}

impl std::fmt::Display for PriceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceProvider::Binance => write!(f, "Binance"),
            PriceProvider::CoinGecko => write!(f, "CoinGecko"),
            PriceProvider::Coinbase => write!(f, "Coinbase"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceQuote {
    pub provider: PriceProvider,
    pub usd: f64,
}

fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|p| p.is_finite())
}

pub async fn fetch_price(fetcher: &mut Fetcher, endpoints: &Endpoints) -> Option<PriceQuote> {
    for provider in PriceProvider::PRIORITY {
        let Some(body) = fetcher.fetch_json(&provider.url(endpoints)).await else {
            debug!("{} unavailable, trying next provider", provider);
            continue;
        };

        match provider.parse(&body) {
            Some(usd) => {
                info!("BTC price {:.2} USD from {}", usd, provider);
                return Some(PriceQuote { provider, usd });
            }
            None => warn!("{} returned an unexpected response shape", provider),
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_binance() {
        let body = json!({"symbol": "BTCUSDT", "price": "67123.45000000"});
        assert_eq!(PriceProvider::Binance.parse(&body), Some(67123.45));
    }

    #[test]
    fn test_parse_coingecko() {
        let body = json!({"bitcoin": {"usd": 67000}});
        assert_eq!(PriceProvider::CoinGecko.parse(&body), Some(67000.0));
    }

    #[test]
    fn test_parse_coinbase() {
        let body = json!({"data": {"base": "BTC", "currency": "USD", "amount": "66999.01"}});
        assert_eq!(PriceProvider::Coinbase.parse(&body), Some(66999.01));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert_eq!(PriceProvider::Binance.parse(&json!({"code": -1121})), None);
        assert_eq!(PriceProvider::CoinGecko.parse(&json!({"bitcoin": "67000"})), None);
        assert_eq!(PriceProvider::Coinbase.parse(&json!({"data": {"amount": null}})), None);
        assert_eq!(PriceProvider::Binance.parse(&json!({"price": "n/a"})), None);
        assert_eq!(PriceProvider::Binance.parse(&json!([1, 2])), None);
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert_eq!(PriceProvider::Binance.parse(&json!({"price": "inf"})), None);
        assert_eq!(PriceProvider::Binance.parse(&json!({"price": "NaN"})), None);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            PriceProvider::PRIORITY,
            [
                PriceProvider::Binance,
                PriceProvider::CoinGecko,
                PriceProvider::Coinbase
            ]
        );
    }
}
