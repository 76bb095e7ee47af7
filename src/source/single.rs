//! Source backed by one request.

use super::ItemSource;
use crate::api::{extract_list, JsonApi, PayloadShape};
use crate::error::FetchError;
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Fetches one endpoint once. After the first successful fetch every call
/// returns an empty block without touching the network. A failed fetch
/// leaves the source unconsumed, so calling again retries.
pub struct SingleRequestSource {
    api: Arc<dyn JsonApi>,
    endpoint: String,
    shape: PayloadShape,
    consumed: bool,
}

impl SingleRequestSource {
    pub fn new(api: Arc<dyn JsonApi>, endpoint: impl Into<String>, shape: PayloadShape) -> Self {
        Self {
            api,
            endpoint: endpoint.into(),
            shape,
            consumed: false,
        }
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

impl fmt::Debug for SingleRequestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleRequestSource")
            .field("endpoint", &self.endpoint)
            .field("shape", &self.shape)
            .field("consumed", &self.consumed)
            .finish_non_exhaustive()
    }
}

impl ItemSource<Value> for SingleRequestSource {
    fn fetch(&mut self) -> BoxFuture<'_, Result<Vec<Value>, FetchError>> {
        async move {
            if self.consumed {
                return Ok(Vec::new());
            }

            let payload = self.api.request(&self.endpoint).await?;
            let items = extract_list(payload, &self.shape)?;
            self.consumed = true;

            debug!("{} returned {} items", self.endpoint, items.len());
            Ok(items)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeApi;
    use serde_json::json;
    use tokio_test::block_on;

    #[test]
    fn test_fetches_once() {
        let api = Arc::new(FakeApi::new().with_payload(
            "exchangerates/tables/c/2020-01-02",
            json!([{"table": "C", "rates": [{"code": "USD", "bid": 3.7}, {"code": "EUR", "bid": 4.2}]}]),
        ));
        let mut source = SingleRequestSource::new(
            api.clone(),
            "exchangerates/tables/c/2020-01-02",
            PayloadShape::list_at("/0/rates"),
        );

        let first = block_on(source.fetch()).unwrap();
        assert_eq!(first.len(), 2);
        assert!(source.is_consumed());

        assert!(block_on(source.fetch()).unwrap().is_empty());
        assert!(block_on(source.fetch()).unwrap().is_empty());
        assert_eq!(api.requests().len(), 1);
    }

    #[test]
    fn test_failed_first_fetch_allows_retry() {
        let api = Arc::new(
            FakeApi::new()
                .with_status("cenyzlota/2020-01-02", 503)
                .with_payload("cenyzlota/2020-01-02", json!([{"cena": 201.5}])),
        );
        let mut source =
            SingleRequestSource::new(api.clone(), "cenyzlota/2020-01-02", PayloadShape::list());

        let err = block_on(source.fetch()).unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert!(!source.is_consumed());

        assert_eq!(block_on(source.fetch()).unwrap(), vec![json!({"cena": 201.5})]);
        assert!(source.is_consumed());
        assert!(block_on(source.fetch()).unwrap().is_empty());
        assert_eq!(api.requests().len(), 2);
    }

    #[test]
    fn test_extraction_failure_leaves_source_unconsumed() {
        let api = Arc::new(FakeApi::new().with_payload("x", json!({"rates": []})));
        let mut source = SingleRequestSource::new(api, "x", PayloadShape::list());

        assert!(matches!(block_on(source.fetch()), Err(FetchError::Extract { .. })));
        assert!(!source.is_consumed());
    }

    #[test]
    fn test_empty_payload_still_consumes() {
        let api = Arc::new(FakeApi::new().with_payload("x", json!([])));
        let mut source = SingleRequestSource::new(api.clone(), "x", PayloadShape::list());

        assert!(block_on(source.fetch()).unwrap().is_empty());
        assert!(source.is_consumed());
        assert!(block_on(source.fetch()).unwrap().is_empty());
        assert_eq!(api.requests().len(), 1);
    }
}
