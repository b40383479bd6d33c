use crate::core::{
    CacheMode, CacheOptions, HeaderParams, QueryParams, ResponseBody, TsClient, TsError,
};
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub(super) const MULTI_SEARCH_PATH: &str = "/multi_search";

pub(super) fn apply_server_side_cache(client: &TsClient, params: &mut QueryParams) {
    if client.config().use_server_side_search_cache {
        params.insert("usecache".into(), "true".into());
    }
}

pub(super) fn ttl_for(client: &TsClient, per_call: Option<Duration>) -> Duration {
    per_call.unwrap_or(client.config().cache_search_results_for)
}

pub(super) async fn cached_get(
    client: &TsClient,
    path: &str,
    params: &QueryParams,
    cache_mode: CacheMode,
    ttl: Duration,
    signal: Option<&CancellationToken>,
) -> Result<ResponseBody, TsError> {
    // the signal is not part of the key
    let key = ("GET", path, params);
    let options = CacheOptions::with_ttl(ttl);
    let call = || client.get_raw(path, params, signal);

    match cache_mode {
        CacheMode::Use => client.search_cache().perform(&key, options, call).await,
        CacheMode::Refresh => client.search_cache().refresh(&key, options, call).await,
        CacheMode::Bypass => call().await,
    }
}

pub(super) async fn cached_multi_search(
    client: &TsClient,
    body: &Value,
    params: &QueryParams,
    headers: &HeaderParams,
    cache_mode: CacheMode,
    ttl: Duration,
) -> Result<ResponseBody, TsError> {
    let key = ("POST", MULTI_SEARCH_PATH, body, params, headers);
    let options = CacheOptions::with_ttl(ttl);
    let call = || client.post_raw(MULTI_SEARCH_PATH, body, params, headers);

    match cache_mode {
        CacheMode::Use => client.search_cache().perform(&key, options, call).await,
        CacheMode::Refresh => client.search_cache().refresh(&key, options, call).await,
        CacheMode::Bypass => call().await,
    }
}
