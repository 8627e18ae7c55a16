//! Google service-account key file.

use serde::Deserialize;

use resqroute_core::AppError;

/// The fields of a service-account JSON key the OAuth grant needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Project the key belongs to.
    #[serde(default)]
    pub project_id: String,
    /// Service-account email, used as the JWT issuer.
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// OAuth token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Parse a key from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json)
            .map_err(|e| AppError::configuration(format!("Invalid service-account key: {e}")))
    }

    /// Read and parse a key file.
    pub async fn from_file(path: &str) -> Result<Self, AppError> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::configuration(format!("Cannot read service-account key '{path}': {e}"))
        })?;
        Self::from_json(&json)
    }
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}
