use crate::core::ResponseBody;
use reqwest::header::CONTENT_TYPE;

/// A response whose body has been fully read.
pub(crate) struct ReadResponse {
    pub(crate) status: u16,
    pub(crate) is_json: bool,
    pub(crate) text: String,
}

impl ReadResponse {
    /// Reads the status, content type and body text.
    pub(crate) async fn read(resp: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = resp.status().as_u16();
        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));
        let text = resp.text().await?;
        Ok(Self {
            status,
            is_json,
            text,
        })
    }

    /// Sends the request and reads the whole response.
    pub(crate) async fn send(req: reqwest::RequestBuilder) -> Result<Self, reqwest::Error> {
        let resp = req.send().await?;
        Self::read(resp).await
    }

    /// JSON-decodes the body if the server declared JSON, otherwise keeps it as text.
    pub(crate) fn into_body(self) -> Result<ResponseBody, serde_json::Error> {
        if self.is_json {
            serde_json::from_str(&self.text).map(ResponseBody::Json)
        } else {
            Ok(ResponseBody::Text(self.text))
        }
    }

    /// The `message` field of a JSON error body.
    pub(crate) fn server_message(&self) -> Option<String> {
        if !self.is_json {
            return None;
        }
        let value: serde_json::Value = serde_json::from_str(&self.text).ok()?;
        value.get("message")?.as_str().map(str::to_owned)
    }
}
