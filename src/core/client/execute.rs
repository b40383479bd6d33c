//! A single HTTP attempt against one node, and the health bookkeeping around it.

use super::constants::{API_KEY_HEADER, API_KEY_QUERY_PARAM};
use crate::core::classify::classify;
use crate::core::net::ReadResponse;
use crate::core::{HeaderParams, Node, QueryParams, RequestBody, ResponseBody, TsError};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Everything about a logical call except the verb and endpoint.
pub(crate) struct RequestParts<'a> {
    pub(crate) query: &'a QueryParams,
    pub(crate) body: Option<RequestBody>,
    pub(crate) headers: Option<&'a HeaderParams>,
    pub(crate) signal: Option<&'a CancellationToken>,
}

impl<'a> RequestParts<'a> {
    pub(crate) const fn new(query: &'a QueryParams) -> Self {
        Self {
            query,
            body: None,
            headers: None,
            signal: None,
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.signal.is_some_and(CancellationToken::is_cancelled)
    }
}

/// How one attempt ended.
pub(crate) enum AttemptOutcome {
    /// 2xx.
    Success(ResponseBody),
    /// Stop retrying: 1xx-4xx, cancellation or a local construction error.
    Terminal(TsError),
    /// 5xx or a transport failure; the node has been marked unhealthy.
    Retryable(TsError),
}

fn header_value(v: &str) -> Result<HeaderValue, TsError> {
    HeaderValue::from_str(v).map_err(|e| TsError::Data(format!("invalid header value: {e}")))
}

impl super::TsClient {
    /// The absolute URL of `endpoint` on `node`, query parameters attached.
    pub(crate) fn uri_for(
        &self,
        node: &Node,
        endpoint: &str,
        query: &QueryParams,
    ) -> Result<Url, TsError> {
        let mut url = Url::parse(&format!("{}{endpoint}", node.base_url()))?;
        let key_in_query = self
            .config
            .api_key
            .as_deref()
            .filter(|_| self.config.send_api_key_as_query_param);

        if !query.is_empty() || key_in_query.is_some() {
            let mut qp = url.query_pairs_mut();
            for (k, v) in query
                .iter()
                .filter(|(k, _)| key_in_query.is_none() || k.as_str() != API_KEY_QUERY_PARAM)
            {
                qp.append_pair(k, v);
            }
            if let Some(key) = key_in_query {
                qp.append_pair(API_KEY_QUERY_PARAM, key);
            }
        }
        Ok(url)
    }

    /// Default headers, then per-call headers, then the configured additional headers.
    fn headers_for(&self, extra: Option<&HeaderParams>) -> Result<HeaderMap, TsError> {
        let mut headers = HeaderMap::new();
        if !self.config.send_api_key_as_query_param
            && let Some(key) = &self.config.api_key
        {
            headers.insert(API_KEY_HEADER, header_value(key)?);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (k, v) in extra.into_iter().flatten().chain(&self.config.additional_headers) {
            let name = HeaderName::from_bytes(k.as_bytes())
                .map_err(|e| TsError::Data(format!("invalid header name {k}: {e}")))?;
            headers.insert(name, header_value(v)?);
        }
        Ok(headers)
    }

    fn mark(&self, node: &Node, healthy: bool) {
        self.selector.registry().set_health(node.index(), healthy);
    }

    /// Performs one attempt against `node`.
    ///
    /// Without a caller signal the attempt is bounded by the connection timeout; with one it runs
    /// until the response arrives or the signal fires.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub(crate) async fn execute_attempt(
        &self,
        node: &Node,
        method: &Method,
        endpoint: &str,
        parts: &RequestParts<'_>,
        request_number: u64,
    ) -> AttemptOutcome {
        if parts.is_cancelled() {
            return AttemptOutcome::Terminal(TsError::Cancelled);
        }

        let url = match self.uri_for(node, endpoint, parts.query) {
            Ok(u) => u,
            Err(e) => return AttemptOutcome::Terminal(e),
        };
        let headers = match self.headers_for(parts.headers) {
            Ok(h) => h,
            Err(e) => return AttemptOutcome::Terminal(e),
        };

        let mut req = self.http.request(method.clone(), url).headers(headers);
        if let Some(body) = &parts.body {
            req = req.body(body.clone().into_string());
        }
        let exchange = ReadResponse::send(req);

        let read = match parts.signal {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => return AttemptOutcome::Terminal(TsError::Cancelled),
                r = exchange => r,
            },
            None => match tokio::time::timeout(self.config.connection_timeout, exchange).await {
                Ok(r) => r,
                Err(_) => {
                    self.mark(node, false);
                    return AttemptOutcome::Retryable(TsError::Timeout(
                        self.config.connection_timeout,
                    ));
                }
            },
        };

        let resp = match read {
            Ok(r) => r,
            Err(e) => {
                self.mark(node, false);
                return AttemptOutcome::Retryable(TsError::Transport(e));
            }
        };

        let status = resp.status;
        // 0 is what some transports report for a failed exchange; it is no proof of life
        if (1..=499).contains(&status) {
            self.mark(node, true);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            request = request_number,
            node = %node.index(),
            status,
            "request to node was made"
        );

        if (200..300).contains(&status) {
            return match resp.into_body() {
                Ok(body) => AttemptOutcome::Success(body),
                Err(e) => {
                    self.mark(node, false);
                    AttemptOutcome::Retryable(e.into())
                }
            };
        }

        let err = classify(status, resp.server_message().as_deref());
        if (1..500).contains(&status) {
            AttemptOutcome::Terminal(err)
        } else {
            self.mark(node, false);
            AttemptOutcome::Retryable(err)
        }
    }
}
