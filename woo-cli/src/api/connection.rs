//! Stateful connection to one WooCommerce store
//!
//! A [`Connection`] holds the shared [`WooClient`] once initialized and an
//! ordered request queue. Pushing only records work; nothing is sent until the
//! queue is executed, and every execution empties the queue.

use std::mem;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};

use super::auth::Credentials;
use super::client::WooClient;
use super::constants::{
    CATEGORIES_ENDPOINT, CATEGORY_PAGE_SIZE, PRODUCTS_BATCH_ENDPOINT, PRODUCTS_ENDPOINT,
};
use super::error::{Result, WooError};
use super::models::{Category, Product, WooItem};
use super::operations::{Request, plan_creates, plan_deletes, plan_updates};
use super::progress::ProgressBar;
use super::query::{PageQuery, collect_pages, plan_pages};
use super::queue::{DispatchOptions, QueueExecutor, QueueOutcome};
use super::resilience::ResilienceConfig;
use super::transport::{ReqwestTransport, Transport};

#[derive(Debug, Default)]
pub struct Connection {
    client: Option<Arc<WooClient>>,
    queue: Vec<Request>,
}

impl Connection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize against the real backend over HTTP
    pub fn init(&mut self, credentials: Credentials, config: ResilienceConfig) -> Result<()> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        self.init_with_transport(credentials, config, Arc::new(transport))
    }

    /// Initialize with any transport implementation
    pub fn init_with_transport(
        &mut self,
        credentials: Credentials,
        config: ResilienceConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<()> {
        info!(
            "Connecting to {} ({} worker(s), {} attempt(s) per request, {} per batch)",
            credentials.domain(),
            config.max_concurrent_requests(),
            config.max_retries(),
            config.batch_stride_size()
        );
        let client = WooClient::new(credentials, config, transport)?;
        self.client = Some(Arc::new(client));
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Result<&Arc<WooClient>> {
        self.client.as_ref().ok_or_else(WooError::not_initialized)
    }

    pub fn push_to_queue(&mut self, request: Request) -> Result<()> {
        self.client()?;
        self.queue.push(request);
        Ok(())
    }

    pub fn extend_queue<I>(&mut self, requests: I) -> Result<()>
    where
        I: IntoIterator<Item = Request>,
    {
        self.client()?;
        self.queue.extend(requests);
        Ok(())
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    /// Serialized form of every queued request; the queue is left untouched
    pub fn view_request_queue(&self) -> Result<Vec<Vec<u8>>> {
        let mut output = Vec::with_capacity(self.queue.len());
        let mut failed = 0;
        let mut last_error = None;

        for (index, request) in self.queue.iter().enumerate() {
            match request.describe().and_then(|value| Ok(serde_json::to_vec(&value)?)) {
                Ok(bytes) => output.push(bytes),
                Err(err) => {
                    debug!("Queued request {} cannot be serialized: {}", index, err);
                    failed += 1;
                    last_error = Some(err);
                    output.push(Vec::new());
                }
            }
        }

        match last_error {
            None => Ok(output),
            Some(err) => Err(WooError::Validation(format!(
                "encountered {} error(s) in {} request(s); last: {}",
                failed,
                self.queue.len(),
                err
            ))),
        }
    }

    /// Execute and empty the queue
    ///
    /// The queue is cleared whether the pass succeeds or fails.
    pub async fn execute_queue(&mut self, options: &DispatchOptions) -> Result<QueueOutcome> {
        let client = Arc::clone(self.client()?);
        let requests = mem::take(&mut self.queue);
        run(client, requests, options).await
    }

    /// Execute the queue and return the raw response slots
    pub async fn execute_request_queue(
        &mut self,
        strict: bool,
        verbose: bool,
    ) -> Result<Vec<Option<Vec<u8>>>> {
        let options = dispatch_options(strict, verbose);
        Ok(self.execute_queue(&options).await?.into_responses())
    }

    pub async fn count_items(&self, endpoint: &str) -> Result<u64> {
        self.client()?.count_items(endpoint).await
    }

    /// Fetch every product, one offset page per request
    pub async fn get_all_products(&self, verbose: bool) -> Result<Vec<Product>> {
        let client = Arc::clone(self.client()?);
        let query = PageQuery::offset(PRODUCTS_ENDPOINT, client.config().batching.page_size);
        let plan = plan_pages(&client, &query).await?;
        if plan.requests.is_empty() {
            return Ok(Vec::new());
        }

        let outcome = run(client, plan.requests, &dispatch_options(true, verbose)).await?;
        let products: Vec<Product> = collect_pages(outcome.into_responses());
        info!("Loaded {} of {} product(s)", products.len(), plan.total);
        Ok(products)
    }

    /// Delete every product on the store, returning how many were scheduled
    ///
    /// Image assets referenced by the products stay on the server.
    pub async fn purge_products(&self, verbose: bool) -> Result<usize> {
        let client = Arc::clone(self.client()?);
        let ids: Vec<u64> = self
            .get_all_products(verbose)
            .await?
            .iter()
            .filter_map(|product| product.id())
            .collect();
        if ids.is_empty() {
            info!("No products to purge");
            return Ok(0);
        }

        let requests = plan_deletes(
            PRODUCTS_BATCH_ENDPOINT,
            &ids,
            client.config().batch_stride_size(),
        )?;
        run(client, requests, &dispatch_options(true, verbose)).await?;
        info!("Purged {} product(s)", ids.len());
        Ok(ids.len())
    }

    /// List categories, narrowed by a raw query filter such as `&search=shirt`
    pub async fn query_categories(&self, search_filter: &str) -> Result<Vec<Category>> {
        let client = Arc::clone(self.client()?);
        let query = PageQuery::page_number(CATEGORIES_ENDPOINT, CATEGORY_PAGE_SIZE)
            .with_filter(search_filter);
        let plan = plan_pages(&client, &query).await?;
        if plan.requests.is_empty() {
            return Ok(Vec::new());
        }

        let outcome = run(client, plan.requests, &dispatch_options(true, false)).await?;
        Ok(collect_pages(outcome.into_responses()))
    }

    /// Create products through batch requests
    pub async fn create_products(
        &self,
        products: Vec<Product>,
        options: &DispatchOptions,
    ) -> Result<QueueOutcome> {
        let client = Arc::clone(self.client()?);
        let requests = plan_creates(
            PRODUCTS_BATCH_ENDPOINT,
            products,
            client.config().batch_stride_size(),
        )?;
        run(client, requests, options).await
    }

    /// Update existing products through batch requests
    pub async fn update_products(
        &self,
        products: Vec<Product>,
        options: &DispatchOptions,
    ) -> Result<QueueOutcome> {
        let client = Arc::clone(self.client()?);
        let requests = plan_updates(
            PRODUCTS_BATCH_ENDPOINT,
            products,
            client.config().batch_stride_size(),
        )?;
        run(client, requests, options).await
    }
}

fn dispatch_options(strict: bool, verbose: bool) -> DispatchOptions {
    DispatchOptions {
        strict,
        progress: verbose.then(ProgressBar::callback),
        cancel: None,
    }
}

async fn run(
    client: Arc<WooClient>,
    requests: Vec<Request>,
    options: &DispatchOptions,
) -> Result<QueueOutcome> {
    let start = Instant::now();
    let outcome = QueueExecutor::new(client)?.execute(requests, options).await;
    debug!("Dispatch pass took {:.2}s", start.elapsed().as_secs_f64());
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{
        ScriptedTransport, ok, ok_with_total, status, test_config,
    };
    use serde_json::{Value, json};

    fn connected(transport: Arc<ScriptedTransport>) -> Connection {
        let credentials = Credentials::new("http://shop.test", "ck_test", "cs_test").unwrap();
        let mut connection = Connection::new();
        connection
            .init_with_transport(credentials, test_config(), transport)
            .unwrap();
        connection
    }

    fn products_page(ids: std::ops::Range<u64>) -> Vec<u8> {
        let items: Vec<Value> = ids.map(|id| json!({"id": id, "name": format!("P{id}")})).collect();
        serde_json::to_vec(&items).unwrap()
    }

    fn query_value(url: &url::Url, key: &str) -> Option<u64> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.parse().ok())
    }

    #[tokio::test]
    async fn test_operations_require_init() {
        let mut connection = Connection::new();

        assert!(!connection.is_initialized());
        assert!(matches!(
            connection.push_to_queue(Request::get("/x")),
            Err(WooError::Configuration(_))
        ));
        assert!(matches!(
            connection.get_all_products(false).await,
            Err(WooError::Configuration(_))
        ));
        assert!(matches!(
            connection.execute_request_queue(true, false).await,
            Err(WooError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_queue_clears_queue_even_on_failure() {
        let transport = ScriptedTransport::new(|request, _| {
            if request.url.path() == "/bad" {
                status(500, b"nope")
            } else {
                ok(b"fine")
            }
        });
        let mut connection = connected(transport);
        connection.push_to_queue(Request::get("/good")).unwrap();
        connection.push_to_queue(Request::get("/bad")).unwrap();

        let err = connection.execute_request_queue(true, false).await.unwrap_err();

        assert!(matches!(err, WooError::DispatchFailed { index: 1, .. }));
        assert_eq!(connection.queue_len(), 0);
    }

    #[tokio::test]
    async fn test_next_pass_after_failure_is_independent() {
        let transport = ScriptedTransport::new(|request, _| {
            if request.url.path() == "/bad" {
                status(500, b"nope")
            } else {
                ok(request.url.path().as_bytes())
            }
        });
        let mut connection = connected(transport.clone());
        connection.push_to_queue(Request::get("/a")).unwrap();
        connection.push_to_queue(Request::get("/bad")).unwrap();

        let first = connection.execute_request_queue(false, false).await.unwrap();
        assert_eq!(first, vec![Some(b"/a".to_vec()), None]);
        assert_eq!(connection.queue_len(), 0);

        connection.push_to_queue(Request::get("/b")).unwrap();
        let second = connection.execute_request_queue(true, false).await.unwrap();

        assert_eq!(second, vec![Some(b"/b".to_vec())]);
        // one call for /a, three attempts for /bad, one for /b
        assert_eq!(transport.call_count(), 5);
    }

    #[tokio::test]
    async fn test_execute_empty_queue() {
        let transport = ScriptedTransport::new(|_, _| ok(b""));
        let mut connection = connected(transport.clone());

        let slots = connection.execute_request_queue(true, true).await.unwrap();

        assert!(slots.is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_view_request_queue_leaves_queue_intact() {
        let transport = ScriptedTransport::new(|_, _| ok(b""));
        let mut connection = connected(transport.clone());
        connection
            .extend_queue([
                Request::get("/wp-json/wc/v3/products"),
                Request::post(PRODUCTS_ENDPOINT, Product::new("Mug")),
            ])
            .unwrap();

        let views = connection.view_request_queue().unwrap();

        assert_eq!(views.len(), 2);
        let post: Value = serde_json::from_slice(&views[1]).unwrap();
        assert_eq!(post["method"], "POST");
        assert_eq!(post["body"]["name"], "Mug");
        assert_eq!(connection.queue_len(), 2);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_get_all_products_pages_by_offset() {
        let transport = ScriptedTransport::new(|request, _| {
            let per_page = query_value(&request.url, "per_page").unwrap_or(0);
            if per_page == 1 {
                return ok_with_total(b"[]", "250");
            }
            let offset = query_value(&request.url, "offset").unwrap_or(0);
            let end = (offset + per_page).min(250);
            ok(&products_page(offset + 1..end + 1))
        });
        let connection = connected(transport.clone());

        let products = connection.get_all_products(false).await.unwrap();

        assert_eq!(products.len(), 250);
        let ids: Vec<u64> = products.iter().filter_map(|p| p.id).collect();
        assert_eq!(ids, (1..=250).collect::<Vec<_>>());
        // one count request plus three pages of 100
        assert_eq!(transport.call_count(), 4);
    }

    #[tokio::test]
    async fn test_get_all_products_on_empty_store() {
        let transport = ScriptedTransport::new(|_, _| ok_with_total(b"[]", "0"));
        let connection = connected(transport.clone());

        let products = connection.get_all_products(false).await.unwrap();

        assert!(products.is_empty());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_purge_products_chunks_deletes() {
        let transport = ScriptedTransport::new(|request, _| {
            if request.url.path().ends_with("/batch") {
                return ok(b"{}");
            }
            let per_page = query_value(&request.url, "per_page").unwrap_or(0);
            if per_page == 1 {
                return ok_with_total(b"[]", "37");
            }
            ok(&products_page(1..38))
        });
        let connection = connected(transport.clone());

        let purged = connection.purge_products(false).await.unwrap();

        assert_eq!(purged, 37);
        let deletes: Vec<Value> = transport
            .calls()
            .iter()
            .filter(|call| call.url.path() == PRODUCTS_BATCH_ENDPOINT)
            .map(|call| serde_json::from_slice(&call.body).unwrap())
            .collect();
        let mut sizes: Vec<usize> = deletes
            .iter()
            .map(|body| body["delete"].as_array().unwrap().len())
            .collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![5, 16, 16]);
    }

    #[tokio::test]
    async fn test_query_categories_pages_by_number() {
        let transport = ScriptedTransport::new(|request, _| {
            let per_page = query_value(&request.url, "per_page").unwrap_or(0);
            if per_page == 1 {
                return ok_with_total(b"[]", "12");
            }
            let page = query_value(&request.url, "page").unwrap_or(1);
            let items: Vec<Value> = (0..per_page)
                .map(|i| (page - 1) * per_page + i + 1)
                .filter(|id| *id <= 12)
                .map(|id| json!({"id": id, "name": format!("C{id}")}))
                .collect();
            ok(&serde_json::to_vec(&items).unwrap())
        });
        let connection = connected(transport.clone());

        let categories = connection.query_categories("&search=shirt").await.unwrap();

        assert_eq!(categories.len(), 12);
        assert_eq!(categories[11].name, "C12");
        let targets: Vec<String> = transport.calls().iter().map(|c| c.target.clone()).collect();
        assert!(targets.contains(&"/wp-json/wc/v3/products/categories?per_page=1&search=shirt".to_string()));
        assert!(targets.contains(&"/wp-json/wc/v3/products/categories?per_page=10&search=shirt&page=2".to_string()));
    }

    #[tokio::test]
    async fn test_create_products_batches_by_stride() {
        let transport = ScriptedTransport::new(|_, _| ok(b"{}"));
        let connection = connected(transport.clone());
        let products: Vec<Product> = (0..20).map(|i| Product::new(format!("New {i}"))).collect();

        let outcome = connection
            .create_products(products, &DispatchOptions::strict())
            .await
            .unwrap();

        assert_eq!(outcome.len(), 2);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_update_products_rejects_missing_ids() {
        let transport = ScriptedTransport::new(|_, _| ok(b"{}"));
        let connection = connected(transport.clone());

        let err = connection
            .update_products(vec![Product::new("No id")], &DispatchOptions::strict())
            .await
            .unwrap_err();

        assert!(matches!(err, WooError::DispatchFailed { .. }));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_count_items_passthrough() {
        let transport = ScriptedTransport::new(|_, _| ok_with_total(b"[]", "7"));
        let connection = connected(transport);
        assert_eq!(connection.count_items("/wp-json/wc/v3/products?per_page=1").await.unwrap(), 7);
    }
}
