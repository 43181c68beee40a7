//! Web page fetching tool.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use valet_core::tool::Tool;
use valet_types::tool::{ToolError, ToolSpec};

const INSTRUCTION: &str = "\
# Fetch Web Page Content:
- Use this tool to fetch the content of a web page by URL.
";

#[derive(Debug, Deserialize, JsonSchema)]
struct FetchWebPageParams {
    /// The URL of the web page to fetch.
    url: String,
}

/// Fetches a web page and returns its body as text.
pub struct FetchWebPage {
    spec: ToolSpec,
    client: reqwest::Client,
}

impl FetchWebPage {
    pub fn new() -> Self {
        Self {
            spec: ToolSpec {
                name: "fetch_web_page_content".to_string(),
                instruction: INSTRUCTION.to_string(),
                parameters: serde_json::to_value(schemars::schema_for!(FetchWebPageParams))
                    .unwrap_or_default(),
            },
            client: reqwest::Client::new(),
        }
    }
}

impl Default for FetchWebPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for FetchWebPage {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let params: FetchWebPageParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::new(format!("invalid arguments: {e}")))?;

        debug!(url = %params.url, "fetching web page");
        let response = self
            .client
            .get(&params.url)
            .send()
            .await
            .map_err(|e| ToolError::new(format!("fetch failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::new(format!("fetch failed: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ToolError::new(format!("failed to read body: {e}")))?;
        Ok(serde_json::Value::String(body))
    }
}
