// ABOUTME: Venafi TPP credential sets and the seed file built from them.
// ABOUTME: The seed keeps the PascalCase keys the Lambda handlers read.

use serde::{Deserialize, Serialize};

/// Object key of the credential seed inside the managed bucket.
pub const CREDENTIALS_KEY: &str = "credentials.json";

#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all(deserialize = "camelCase", serialize = "PascalCase"))]
pub struct VenafiConfig {
    #[serde(alias = "URL")]
    pub url: String,

    #[serde(alias = "accesstoken")]
    pub access_token: String,

    #[serde(default, alias = "accesstokenexpires")]
    pub access_token_expires: String,

    #[serde(default, alias = "refreshtoken")]
    pub refresh_token: String,
}

impl std::fmt::Debug for VenafiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VenafiConfig")
            .field("url", &self.url)
            .field("access_token_expires", &self.access_token_expires)
            .finish_non_exhaustive()
    }
}

/// JSON array written to [`CREDENTIALS_KEY`].
pub fn credentials_seed(venafi: &[VenafiConfig]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(venafi)
}
