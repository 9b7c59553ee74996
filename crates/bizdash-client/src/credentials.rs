//! # Credential Providers
//!
//! The API client never reads a token on its own. It asks an injected
//! [`CredentialProvider`] right before each request, so a token saved by
//! `token set` is picked up without rebuilding the client.
//!
//! ```text
//! ┌────────────────────┐   token()   ┌──────────────────────────────┐
//! │    InvoiceApi      │ ──────────► │ dyn CredentialProvider       │
//! │ Authorization:     │ ◄────────── │  ├── StaticToken             │
//! │   Bearer <token>   │  Option<..> │  ├── EnvToken(BIZDASH_TOKEN) │
//! └────────────────────┘             │  ├── TokenFile (token.json)  │
//!                                    │  └── ChainedProvider         │
//!                                    └──────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Default environment variable read by [`EnvToken::default`].
pub const ENV_TOKEN: &str = "BIZDASH_TOKEN";

/// Supplies the bearer token for outbound calls.
pub trait CredentialProvider: Send + Sync {
    /// The current token, or `None` to send the request unauthenticated.
    fn token(&self) -> Option<String>;
}

/// Blank tokens count as no token.
fn non_blank(token: &str) -> Option<String> {
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

// =============================================================================
// Static
// =============================================================================

/// A fixed token, mostly for tests and one-off scripts.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken(token.into())
    }
}

impl CredentialProvider for StaticToken {
    fn token(&self) -> Option<String> {
        non_blank(&self.0)
    }
}

/// No token at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl CredentialProvider for Anonymous {
    fn token(&self) -> Option<String> {
        None
    }
}

// =============================================================================
// Environment
// =============================================================================

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        EnvToken { var: var.into() }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        EnvToken::new(ENV_TOKEN)
    }
}

impl CredentialProvider for EnvToken {
    fn token(&self) -> Option<String> {
        std::env::var(&self.var).ok().as_deref().and_then(non_blank)
    }
}

// =============================================================================
// Token File
// =============================================================================

/// On-disk shape of the persisted token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    /// Unix seconds when the token was saved.
    #[serde(default)]
    pub saved_at: u64,
}

impl StoredToken {
    pub fn new(token: impl Into<String>) -> Self {
        let saved_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        StoredToken {
            token: token.into(),
            saved_at,
        }
    }
}

/// JSON token file: the persisted local auth store.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Writes the token, creating parent directories.
    pub fn save(&self, token: &str) -> ClientResult<()> {
        let token = non_blank(token)
            .ok_or_else(|| ClientError::TokenStore("token must not be empty".into()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ClientError::TokenStore(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&StoredToken::new(token))?;
        fs::write(&self.path, json).map_err(|e| ClientError::TokenStore(e.to_string()))?;

        debug!(path = ?self.path, "Token saved");
        Ok(())
    }

    /// Reads the token. Missing or unreadable files give `None`.
    pub fn load(&self) -> Option<StoredToken> {
        if !self.path.exists() {
            return None;
        }
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Token file unreadable");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(stored) => Some(stored),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Token file is not valid JSON");
                None
            }
        }
    }

    /// Removes the token file. A missing file is not an error.
    pub fn clear(&self) -> ClientResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| ClientError::TokenStore(e.to_string()))?;
            debug!(path = ?self.path, "Token cleared");
        }
        Ok(())
    }
}

impl CredentialProvider for TokenFile {
    fn token(&self) -> Option<String> {
        self.load().as_ref().and_then(|stored| non_blank(&stored.token))
    }
}

// =============================================================================
// Chain
// =============================================================================

/// Asks each provider in order and returns the first token found.
#[derive(Default)]
pub struct ChainedProvider {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl ChainedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl CredentialProvider for ChainedProvider {
    fn token(&self) -> Option<String> {
        self.providers.iter().find_map(|p| p.token())
    }
}
