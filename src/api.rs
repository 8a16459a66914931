use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::calendar::{BookingRequest, ScheduledEvent};
use crate::config::NetworkConfig;
use crate::records::RawVisit;

/// Token identifying one calendar fetch cycle.
///
/// A newer fetch supersedes older ones: the client only considers the
/// most recently issued token current, and callers discard any
/// response carrying a stale token (the user moved the month cursor
/// while the request was in flight).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

/// Both activity streams for one month view, resolved together.
#[derive(Debug, Clone, Default)]
pub struct MonthData {
    pub bookings: Vec<BookingRequest>,
    pub events: Vec<ScheduledEvent>,
}

/// Client for the document store's HTTP collection endpoints.
///
/// Each collection is a GET returning a JSON array; everything beyond
/// that (auth, storage layout) belongs to the store.
#[derive(Clone, Debug)]
pub struct StoreClient {
    client: reqwest::Client,
    base_url: String,
    generation: Arc<AtomicU64>,
}

impl StoreClient {
    /// Create a new client with configurable timeouts.
    pub fn new(base_url: String, network_config: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(network_config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(network_config.connect_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            generation: Arc::new(AtomicU64::new(0)),
        })
    }

    async fn fetch_collection<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to request {path} collection"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Store returned error status {status} for {path}");
        }

        response
            .json::<Vec<T>>()
            .await
            .with_context(|| format!("Failed to parse {path} collection"))
    }

    /// Fetch the raw daily visit records.
    pub async fn fetch_visits(&self) -> Result<Vec<RawVisit>> {
        self.fetch_collection("visits").await
    }

    /// Fetch the booking-request collection.
    pub async fn fetch_bookings(&self) -> Result<Vec<BookingRequest>> {
        self.fetch_collection("bookings").await
    }

    /// Fetch the scheduled-event collection.
    pub async fn fetch_events(&self) -> Result<Vec<ScheduledEvent>> {
        self.fetch_collection("events").await
    }

    /// Issue a token for a new fetch cycle, superseding all earlier
    /// tokens.
    pub fn begin_fetch(&self) -> FetchToken {
        FetchToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `token` still belongs to the newest fetch cycle.
    pub fn is_current(&self, token: FetchToken) -> bool {
        token.0 == self.generation.load(Ordering::SeqCst)
    }

    /// Fetch both calendar streams concurrently.
    ///
    /// Resolves only once both collections have arrived, so the caller
    /// never builds a grid from half the data. The returned token lets
    /// the caller drop the result if another cycle started meanwhile.
    pub async fn fetch_month_data(&self) -> Result<(MonthData, FetchToken)> {
        let token = self.begin_fetch();
        let (bookings, events) = tokio::try_join!(self.fetch_bookings(), self.fetch_events())?;
        Ok((MonthData { bookings, events }, token))
    }
}
