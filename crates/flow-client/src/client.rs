use std::time::Duration;

use async_trait::async_trait;
use flowdex_types::{Address, AddressError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::{
    cadence, json, AccountStorageApi, ApiStatus, CadenceError, ChainAccount, ChainBlock,
    ChainCollection, ChainTransaction, ChainTransactionStatus, GatewayApi, StorageItem,
    TxStatusSubscription,
};

const STORAGE_SCRIPT: &str = include_str!("scripts/account_storage.cdc");

/// Default period between two status requests of a transaction subscription.
pub const DEFAULT_STATUS_POLLING_PERIOD: Duration = Duration::from_millis(500);

/// Consecutive failed status requests after which a subscription gives up.
const MAX_STATUS_POLLING_FAILURES: u32 = 10;

/// The error type for errors produced in this library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("access API is unavailable: {0}")]
    Unavailable(reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Cadence(#[from] CadenceError),
    #[error("access API responded with {code}: {message}")]
    Status { code: u16, message: String },
    #[error("the response had an unexpected structure: {0}")]
    UnexpectedStructure(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    fn from_request(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::Unavailable(err)
        } else {
            Error::Http(err)
        }
    }
}

/// Access API REST client. Cheap to clone, clones share the connection pool.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    url: String,
    status_polling_period: Duration,
}

impl Client {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            url: url.into().trim_end_matches('/').to_owned(),
            status_polling_period: DEFAULT_STATUS_POLLING_PERIOD,
        })
    }

    pub fn with_status_polling_period(mut self, period: Duration) -> Self {
        self.status_polling_period = period;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        trace!(target: "flow_client", "GET {}", path);

        let response = self
            .http
            .get(format!("{}{}", self.url, path))
            .send()
            .await
            .map_err(Error::from_request)?;

        Self::handle_response(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        trace!(target: "flow_client", "POST {}", path);

        let response = self
            .http
            .post(format!("{}{}", self.url, path))
            .json(body)
            .send()
            .await
            .map_err(Error::from_request)?;

        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(Error::from_request)?;

        if !status.is_success() {
            let message = serde_json::from_str::<json::ErrorResponse>(&body)
                .map(|err| err.message)
                .unwrap_or(body);

            return Err(Error::Status {
                code: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn get_single_block(&self, height: &str) -> Result<ChainBlock> {
        let blocks: Vec<json::Block> = self
            .get(&format!("/v1/blocks?height={height}&expand=payload"))
            .await?;

        blocks
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| Error::UnexpectedStructure(format!("no block at height {height}")))
    }

    /// Polls the status of a transaction and publishes every change until the status is final,
    /// every receiver is gone or the access API keeps failing.
    async fn poll_transaction_status(
        self,
        transaction_id: String,
        sender: watch::Sender<Option<ChainTransactionStatus>>,
    ) {
        let mut timer = tokio::time::interval(self.status_polling_period);
        let mut failures = 0;

        loop {
            tokio::select! {
                _ = timer.tick() => {},
                _ = sender.closed() => {
                    trace!(target: "flow_client", "No status listeners left for {}", transaction_id);
                    return;
                }
            }

            match self.get_transaction_status_by_id(&transaction_id).await {
                Ok(status) => {
                    failures = 0;
                    let is_final = status.execution_status.is_final();

                    sender.send_if_modified(|current| {
                        if current.as_ref() == Some(&status) {
                            return false;
                        }

                        *current = Some(status);
                        true
                    });

                    if is_final {
                        return;
                    }
                }
                Err(err) => {
                    failures += 1;
                    debug!(
                        target: "flow_client",
                        "Failed to get status of {} ({}/{}): {}",
                        transaction_id, failures, MAX_STATUS_POLLING_FAILURES, err
                    );

                    if failures >= MAX_STATUS_POLLING_FAILURES {
                        return;
                    }
                }
            }
        }
    }
}

#[async_trait]
impl GatewayApi for Client {
    async fn get_api_status(&self) -> ApiStatus {
        match self.get::<Value>("/v1/network/parameters").await {
            Ok(_) => ApiStatus::Online,
            Err(err) => {
                debug!(target: "flow_client", "Access API is offline: {}", err);
                ApiStatus::Offline
            }
        }
    }

    async fn get_latest_block(&self) -> Result<ChainBlock> {
        self.get_single_block("sealed").await
    }

    async fn get_block_by_height(&self, height: u64) -> Result<ChainBlock> {
        self.get_single_block(&height.to_string()).await
    }

    async fn get_collection_by_id(&self, id: &str) -> Result<ChainCollection> {
        let collection: json::Collection = self
            .get(&format!("/v1/collections/{id}?expand=transactions"))
            .await?;

        Ok(collection.into())
    }

    async fn get_transaction_by_id(&self, id: &str) -> Result<ChainTransaction> {
        let transaction: json::Transaction = self.get(&format!("/v1/transactions/{id}")).await?;

        transaction.try_into()
    }

    async fn get_transaction_status_by_id(&self, id: &str) -> Result<ChainTransactionStatus> {
        let result: json::TransactionResult = self
            .get(&format!("/v1/transaction_results/{id}"))
            .await?;

        result.try_into()
    }

    async fn get_account(&self, address: &Address) -> Result<ChainAccount> {
        let account: json::Account = self
            .get(&format!("/v1/accounts/{address}?expand=keys,contracts"))
            .await?;

        account.try_into()
    }

    async fn get_tx_status_subscription(&self, id: &str) -> Result<TxStatusSubscription> {
        let (sender, receiver) = watch::channel(None);

        tokio::spawn(
            self.clone()
                .poll_transaction_status(id.to_owned(), sender),
        );

        Ok(TxStatusSubscription::new(id, receiver))
    }
}

#[async_trait]
impl AccountStorageApi for Client {
    async fn get_account_storage_items(&self, address: &Address) -> Result<Vec<StorageItem>> {
        let request = json::ScriptRequest::new(STORAGE_SCRIPT, &[cadence::encode_address(address)]);

        let encoded: String = self
            .post("/v1/scripts?block_height=sealed", &request)
            .await?;

        let result: Value = serde_json::from_slice(&base64::decode(encoded)?)?;
        let entries: Vec<json::StorageEntry> = serde_json::from_value(cadence::decode(&result)?)?;

        entries.into_iter().map(TryInto::try_into).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_is_normalized() {
        let client = Client::new("http://localhost:8888/", None).unwrap();

        assert_eq!(client.url(), "http://localhost:8888");
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_offline() {
        let client = Client::new("http://127.0.0.1:1", Some(Duration::from_millis(200))).unwrap();

        assert_eq!(client.get_api_status().await, ApiStatus::Offline);
    }

    #[test]
    fn test_storage_script_is_embedded() {
        assert!(STORAGE_SCRIPT.contains("forEachStored"));
    }
}
