//! GitHub OAuth authorization-code exchange.

use serde::{Deserialize, Serialize};

use crate::gateway::{required, Gateway, InboundRequest};
use crate::http::response::GatewayError;
use crate::upstream::Upstream;

const EXCHANGE_FAILED: &str = "Failed to exchange authorization code";

#[derive(Debug, Default, Deserialize)]
struct CodeRequest {
    #[serde(default)]
    code: Option<String>,
}

#[derive(Serialize)]
struct TokenExchange<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// GitHub answers both outcomes with HTTP 200, so every field is optional.
#[derive(Debug, Deserialize)]
struct GitHubTokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    scope: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Success shape returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
}

impl Gateway {
    pub(crate) async fn exchange_oauth_code(
        &self,
        request: &InboundRequest,
    ) -> Result<TokenGrant, GatewayError> {
        let body: CodeRequest = request.json_body()?;
        let code = required(&body.code, "Authorization code is required")?;

        let github = &self.config().github;
        let (client_id, client_secret) = github
            .credentials()
            .ok_or(GatewayError::NotConfigured("GitHub OAuth not configured"))?;

        let exchange = TokenExchange {
            client_id: client_id.expose(),
            client_secret: client_secret.expose(),
            code,
        };
        let response = self
            .client()
            .post_json(Upstream::GitHubOAuth, &github.token_url, None, &exchange)
            .await
            .map_err(|e| GatewayError::transport(EXCHANGE_FAILED, e))?;

        let payload: GitHubTokenResponse = response
            .json()
            .map_err(|e| GatewayError::transport(EXCHANGE_FAILED, e))?;

        if let Some(error) = payload.error {
            let message = payload
                .error_description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(error);
            return Err(GatewayError::rejected(response.status, message, None));
        }

        match payload.access_token {
            Some(access_token) if response.is_success() => Ok(TokenGrant {
                access_token,
                token_type: payload.token_type.unwrap_or_else(|| "bearer".to_string()),
                scope: payload.scope.unwrap_or_default(),
            }),
            _ => Err(GatewayError::transport(
                EXCHANGE_FAILED,
                format!(
                    "token endpoint answered {} without a token or an error",
                    response.status
                ),
            )),
        }
    }
}
