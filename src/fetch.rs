//! Fan-out over the configured API keys: one request per key, all awaited
//! together, first failure wins.

use crate::{
    api::{
        payload,
        Transport,
        REQUIRED_SECTIONS,
    },
    error::Error,
    record::{
        self,
        HostRecord,
    },
};
use futures::future::join_all;
use tracing::{
    debug,
    info,
};

/// Fetch and normalize one record per API key.
///
/// All requests run concurrently and every in-flight call completes before
/// this returns. On any transport or validation failure the whole batch
/// fails: the first error in key order is surfaced and the partial results
/// are dropped. `now` is the staleness reference point in epoch seconds.
pub async fn fetch_all<T: Transport + Sync>(
    transport: &T,
    api_keys: &[String],
    now: i64,
) -> Result<Vec<HostRecord>, Error> {
    debug!(keys = api_keys.len(), "dispatching batch requests");

    let calls = api_keys.iter().map(|key| async move {
        let body = transport.fetch(key).await?;
        let payload = payload::decode(&body, REQUIRED_SECTIONS)
            .map_err(|source| Error::malformed(key, source))?;
        Ok(record::build(&payload, now))
    });

    let mut records = Vec::with_capacity(api_keys.len());
    for result in join_all(calls).await {
        records.push(result?);
    }

    info!(hosts = records.len(), "collected all host records");
    Ok(records)
}
