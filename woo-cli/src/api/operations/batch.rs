//! Batch planner
//!
//! Splits large create/update/delete lists into `/batch` requests of at most
//! `chunk_size` operations each. Chunks are strict fixed-size slices in the
//! input order; a partial final chunk is always flushed.

use std::sync::Arc;

use log::debug;

use super::request::{BatchPost, Payload, Request};
use crate::api::error::{Result, WooError};

fn check_chunk_size(chunk_size: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(WooError::Configuration("batch chunk size must be at least 1".into()));
    }
    Ok(())
}

/// One batch delete per chunk of ids
pub fn plan_deletes(endpoint: &str, ids: &[u64], chunk_size: usize) -> Result<Vec<Request>> {
    check_chunk_size(chunk_size)?;

    let requests: Vec<Request> = ids
        .chunks(chunk_size)
        .map(|chunk| {
            Request::batch(BatchPost {
                delete: chunk.to_vec(),
                ..BatchPost::new(endpoint)
            })
        })
        .collect();

    debug!(
        "Planned {} delete batch(es) for {} id(s) on {}",
        requests.len(),
        ids.len(),
        endpoint
    );
    Ok(requests)
}

/// One batch create per chunk of new items
pub fn plan_creates<T>(endpoint: &str, items: Vec<T>, chunk_size: usize) -> Result<Vec<Request>>
where
    T: Payload + 'static,
{
    check_chunk_size(chunk_size)?;
    let items = erase(items);

    let requests: Vec<Request> = items
        .chunks(chunk_size)
        .map(|chunk| {
            Request::batch(BatchPost {
                create: chunk.to_vec(),
                ..BatchPost::new(endpoint)
            })
        })
        .collect();

    debug!(
        "Planned {} create batch(es) for {} item(s) on {}",
        requests.len(),
        items.len(),
        endpoint
    );
    Ok(requests)
}

/// One batch update per chunk of existing items
pub fn plan_updates<T>(endpoint: &str, items: Vec<T>, chunk_size: usize) -> Result<Vec<Request>>
where
    T: Payload + 'static,
{
    check_chunk_size(chunk_size)?;
    let items = erase(items);

    let requests: Vec<Request> = items
        .chunks(chunk_size)
        .map(|chunk| {
            Request::batch(BatchPost {
                update: chunk.to_vec(),
                ..BatchPost::new(endpoint)
            })
        })
        .collect();

    debug!(
        "Planned {} update batch(es) for {} item(s) on {}",
        requests.len(),
        items.len(),
        endpoint
    );
    Ok(requests)
}

fn erase<T: Payload + 'static>(items: Vec<T>) -> Vec<Arc<dyn Payload>> {
    items
        .into_iter()
        .map(|item| Arc::new(item) as Arc<dyn Payload>)
        .collect()
}
