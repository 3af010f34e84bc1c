use crate::config::Settings;
use crate::error::{PrupError, Result};
use crate::utils::logging::verbose;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Blocking GitHub GraphQL client
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
    host: String,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
    /// Set by the REST-style error bodies GitHub sends with non-2xx statuses.
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

impl GitHubClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("prup/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.graphql_endpoint(),
            token: settings.token.clone(),
            host: settings.host.clone(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Run a GraphQL operation and decode its `data` payload.
    pub fn graphql<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<T> {
        verbose(format!("GraphQL {} -> {}", operation, self.endpoint));

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();
        verbose(format!("GraphQL {} status: {}", operation, status));

        let body = response.text()?;
        decode_body(status, &self.endpoint, &body)
    }
}

fn decode_body<T: DeserializeOwned>(status: StatusCode, endpoint: &str, body: &str) -> Result<T> {
    let parsed: GraphQLResponse<T> = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) if !status.is_success() => return Err(http_error(status, endpoint, None)),
        Err(e) => return Err(e.into()),
    };

    // GraphQL errors explain more than the status does, so they take precedence.
    if !status.is_success() && parsed.errors.is_empty() {
        return Err(http_error(status, endpoint, parsed.message.as_deref()));
    }
    decode_response(parsed)
}

fn http_error(status: StatusCode, endpoint: &str, message: Option<&str>) -> PrupError {
    match message.map(str::trim).filter(|m| !m.is_empty()) {
        Some(message) => {
            PrupError::Api(format!("HTTP {} from {}: {}", status, endpoint, message))
        }
        None => PrupError::Api(format!("HTTP {} from {}", status, endpoint)),
    }
}

fn decode_response<T>(response: GraphQLResponse<T>) -> Result<T> {
    if !response.errors.is_empty() {
        let messages: Vec<&str> = response
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect();
        return Err(PrupError::Api(messages.join("; ")));
    }

    response
        .data
        .ok_or_else(|| PrupError::Api("response contained no data".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Viewer {
        login: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct ViewerData {
        viewer: Viewer,
    }

    #[test]
    fn decodes_data_payload() {
        let response: GraphQLResponse<ViewerData> =
            serde_json::from_str(r#"{"data":{"viewer":{"login":"octocat"}}}"#).unwrap();
        let data = decode_response(response).unwrap();
        assert_eq!(data.viewer.login, "octocat");
    }

    #[test]
    fn joins_error_messages() {
        let response: GraphQLResponse<ViewerData> = serde_json::from_str(
            r#"{"data":null,"errors":[{"message":"first"},{"message":"second"}]}"#,
        )
        .unwrap();
        let err = decode_response(response).unwrap_err();
        assert_eq!(err.to_string(), "GraphQL: first; second");
    }

    #[test]
    fn missing_data_is_an_error() {
        let response: GraphQLResponse<ViewerData> = serde_json::from_str("{}").unwrap();
        assert!(matches!(decode_response(response), Err(PrupError::Api(_))));
    }

    #[test]
    fn unauthorized_body_reports_http_status() {
        let body = r#"{"message":"This endpoint requires you to be authenticated.","documentation_url":"https://docs.github.com/graphql/guides/forming-calls-with-graphql#authenticating-with-graphql"}"#;
        let err = decode_body::<ViewerData>(
            StatusCode::UNAUTHORIZED,
            "https://api.github.com/graphql",
            body,
        )
        .unwrap_err();
        assert!(matches!(err, PrupError::Api(_)));
        assert_eq!(
            err.to_string(),
            "GraphQL: HTTP 401 Unauthorized from https://api.github.com/graphql: This endpoint requires you to be authenticated."
        );
    }

    #[test]
    fn non_json_error_body_reports_http_status() {
        let err = decode_body::<ViewerData>(
            StatusCode::BAD_GATEWAY,
            "https://ghe.example.com/api/graphql",
            "<html>Bad Gateway</html>",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "GraphQL: HTTP 502 Bad Gateway from https://ghe.example.com/api/graphql"
        );
    }

    #[test]
    fn graphql_errors_win_over_http_status() {
        let err = decode_body::<ViewerData>(
            StatusCode::FORBIDDEN,
            "https://api.github.com/graphql",
            r#"{"errors":[{"message":"Resource not accessible by integration"}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "GraphQL: Resource not accessible by integration");
    }

    #[test]
    fn client_uses_settings_endpoint() {
        let settings = Settings {
            api_url: Some("http://127.0.0.1:1/graphql".into()),
            ..Settings::default()
        };
        let client = GitHubClient::new(&settings).unwrap();
        assert_eq!(client.endpoint, "http://127.0.0.1:1/graphql");
        assert_eq!(client.host(), "github.com");
    }
}
