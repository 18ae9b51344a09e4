// File: fetcher.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use log::{debug, warn};
use serde_json::Value;
use std::time::Duration;

use crate::config::ConfigParameter;
use crate::errors::{FetchError, FetchResult};
use crate::getstate::GetState;

/// Sequential JSON fetcher with per-request timeout and exponential backoff.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    max_retries: u32,
    timeout: Duration,
    backoff_base: Duration,
    state: GetState,
}

impl Fetcher {
    pub fn new(config: &ConfigParameter) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            max_retries: config.max_retries(),
            timeout: Duration::from_secs(config.timeout()),
            backoff_base: config.backoff_base(),
            state: GetState::new(),
        })
    }

    pub fn state(&self) -> &GetState {
        &self.state
    }

    /// Delay slept after a failed `attempt` (zero based) when another attempt follows.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.backoff_base.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// Returns the decoded body of the first successful attempt, or `None` once
    /// every attempt has failed.
    pub async fn fetch_json(&mut self, url: &str) -> Option<Value> {
        for attempt in 0..self.max_retries {
            match self.attempt(url).await {
                Ok(body) => {
                    self.state.add_success();
                    debug!("GET {} succeeded on attempt {}", url, attempt + 1);
                    return Some(body);
                }
                Err(e) => {
                    self.state.add_failure();
                    debug!("GET {} attempt {} failed: {}", url, attempt + 1, e);
                }
            }

            if attempt + 1 < self.max_retries {
                tokio::time::sleep(self.backoff_delay(attempt)).await;
            }
        }

        self.state.add_exhausted();
        warn!("Giving up on {} after {} attempts", url, self.max_retries);
        None
    }

    async fn attempt(&self, url: &str) -> FetchResult<Value> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(FetchError::Status(status));
        }

        Ok(response.json::<Value>().await?)
    }
}
