//! Pagination planner
//!
//! Turns "fetch every item of a collection" into a list of page requests.
//! The total comes from the count header of a one-item page; the page size is
//! always an explicit argument, never shared state.

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::api::client::WooClient;
use crate::api::error::{Result, WooError};
use crate::api::operations::Request;

/// How the backend addresses pages of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStyle {
    /// `offset=k*page_size&per_page=page_size`
    Offset,
    /// `per_page=page_size&page=k+1`
    PageNumber,
}

/// A collection to page through
#[derive(Debug, Clone)]
pub struct PageQuery {
    pub endpoint: String,
    /// Extra query parameters appended verbatim, e.g. `&search=shirt`
    pub filter: String,
    pub page_size: u64,
    pub style: PageStyle,
}

impl PageQuery {
    pub fn offset(endpoint: impl Into<String>, page_size: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            filter: String::new(),
            page_size,
            style: PageStyle::Offset,
        }
    }

    pub fn page_number(endpoint: impl Into<String>, page_size: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            filter: String::new(),
            page_size,
            style: PageStyle::PageNumber,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Endpoint used to read the collection's total
    pub fn count_endpoint(&self) -> String {
        format!("{}per_page=1{}", with_query_separator(&self.endpoint), self.filter)
    }
}

fn with_query_separator(endpoint: &str) -> String {
    if endpoint.contains('?') {
        format!("{}&", endpoint)
    } else {
        format!("{}?", endpoint)
    }
}

/// Page requests covering a whole collection
#[derive(Debug, Clone)]
pub struct PagePlan {
    pub total: u64,
    /// Effective page size after clamping to the total
    pub page_size: u64,
    pub requests: Vec<Request>,
}

/// Build the page requests for a known total
pub fn plan_from_total(query: &PageQuery, total: u64) -> Result<PagePlan> {
    if query.page_size == 0 {
        return Err(WooError::Configuration("page size must be at least 1".into()));
    }
    if total == 0 {
        return Ok(PagePlan {
            total,
            page_size: query.page_size,
            requests: Vec::new(),
        });
    }

    let page_size = query.page_size.min(total);
    let pages = total.div_ceil(page_size);
    let base = with_query_separator(&query.endpoint);

    let requests = (0..pages)
        .map(|k| {
            let endpoint = match query.style {
                PageStyle::Offset => format!(
                    "{}offset={}&per_page={}{}",
                    base,
                    k * page_size,
                    page_size,
                    query.filter
                ),
                PageStyle::PageNumber => format!(
                    "{}per_page={}{}&page={}",
                    base,
                    page_size,
                    query.filter,
                    k + 1
                ),
            };
            Request::get(endpoint)
        })
        .collect();

    Ok(PagePlan {
        total,
        page_size,
        requests,
    })
}

/// Count the collection, then plan its pages
pub async fn plan_pages(client: &WooClient, query: &PageQuery) -> Result<PagePlan> {
    if query.page_size == 0 {
        return Err(WooError::Configuration("page size must be at least 1".into()));
    }

    let total = client.count_items(&query.count_endpoint()).await?;
    let plan = plan_from_total(query, total)?;
    debug!(
        "{}: {} item(s) across {} page(s) of {}",
        query.endpoint,
        plan.total,
        plan.requests.len(),
        plan.page_size
    );
    Ok(plan)
}

/// Concatenate decoded pages in slot order
///
/// A missing, empty or undecodable page is logged and skipped so one bad page
/// does not void the whole fetch.
pub fn collect_pages<T: DeserializeOwned>(pages: Vec<Option<Vec<u8>>>) -> Vec<T> {
    let mut items = Vec::new();

    for (index, page) in pages.into_iter().enumerate() {
        let Some(bytes) = page else {
            warn!("Page {} has no response; skipping", index);
            continue;
        };
        if bytes.is_empty() {
            warn!("Page {} is empty; skipping", index);
            continue;
        }
        match serde_json::from_slice::<Vec<T>>(&bytes) {
            Ok(decoded) => items.extend(decoded),
            Err(err) => warn!("Page {} could not be decoded: {}; skipping", index, err),
        }
    }

    items
}
