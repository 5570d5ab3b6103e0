//! Blocking client for the Yahoo! JLP furigana service.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use furigana_core::{Annotate, ApiError, Word};

const ENDPOINT: &str = "https://jlp.yahooapis.jp/FuriganaService/V2/furigana";
const METHOD: &str = "jlp.furiganaservice.furigana";

/// Application identifier for the service, read from the environment once
/// at startup and injected here. Core logic never touches the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub appid: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let appid = std::env::var("YAHOO_APPID")
            .map_err(|_| anyhow::anyhow!("YAHOO_APPID is not set; get an app ID from the Yahoo developer console"))?;
        Ok(Config { appid })
    }
}

/// The app ID rides in the `User-Agent` header (`Yahoo AppID: ...`), which
/// is the service's authentication scheme, so it is baked into the client
/// at construction.
pub struct JlpClient {
    client: Client,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<RpcResult>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcResult {
    #[serde(default)]
    word: Vec<Word>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl JlpClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // One call per chunk, sequential; the transport timeout is the only
        // timeout in the pipeline.
        let client = Client::builder()
            .user_agent(format!("Yahoo AppID: {}", config.appid))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(12))
            .build()?;
        Ok(JlpClient { client })
    }

    /// JSON-RPC body for one fragment. `grade` outside 1..=8 is dropped.
    fn build_request(&self, fragment: &str, grade: Option<u8>) -> serde_json::Value {
        let mut params = json!({ "q": fragment });
        if let Some(g) = grade.filter(|g| (1..=8).contains(g)) {
            params["grade"] = json!(g);
        }
        json!({
            "id": "1",
            "jsonrpc": "2.0",
            "method": METHOD,
            "params": params,
        })
    }
}

impl Annotate for JlpClient {
    fn annotate(&self, fragment: &str, grade: Option<u8>) -> Result<Vec<Word>, ApiError> {
        let body = self.build_request(fragment, grade);
        let resp = self
            .client
            .post(ENDPOINT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .map_err(|e| ApiError::Network {
                message: e.to_string(),
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Transport {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            });
        }
        let parsed: RpcResponse = resp.json().map_err(|e| ApiError::Network {
            message: format!("invalid response body: {}", e),
        })?;
        if let Some(err) = parsed.error {
            return Err(ApiError::Service {
                code: err.code,
                message: err.message,
            });
        }
        match parsed.result {
            Some(r) => Ok(r.word),
            None => Err(ApiError::EmptyResult),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> JlpClient {
        JlpClient::new(&Config {
            appid: "test-appid".into(),
        })
        .unwrap()
    }

    #[test]
    fn request_body_shape() {
        let c = test_client();
        let body = c.build_request("漢字", Some(3));
        assert_eq!(body["id"], "1");
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["method"], METHOD);
        assert_eq!(body["params"]["q"], "漢字");
        assert_eq!(body["params"]["grade"], 3);
    }

    #[test]
    fn grade_outside_range_is_omitted() {
        let c = test_client();
        assert!(c.build_request("字", None)["params"].get("grade").is_none());
        assert!(c.build_request("字", Some(0))["params"].get("grade").is_none());
        assert!(c.build_request("字", Some(9))["params"].get("grade").is_none());
        assert_eq!(c.build_request("字", Some(8))["params"]["grade"], 8);
    }

    #[test]
    fn response_without_result_or_error_parses() {
        let r: RpcResponse = serde_json::from_str(r#"{"id":"1","jsonrpc":"2.0"}"#).unwrap();
        assert!(r.result.is_none());
        assert!(r.error.is_none());
    }
}
