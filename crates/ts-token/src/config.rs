use serde::{Deserialize, Serialize};

use crate::error::{TokenError, TokenResult};

/// Token codec settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// 32-byte tag key, hex encoded. `None` mints and accepts untagged
    /// tokens.
    pub signing_key: Option<String>,
}

impl TokenConfig {
    pub fn keyed(key: &[u8; 32]) -> Self {
        Self {
            signing_key: Some(hex::encode(key)),
        }
    }

    /// Parse the configured key, if any.
    pub fn key(&self) -> TokenResult<Option<[u8; 32]>> {
        let Some(raw) = self.signing_key.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        parse_key(raw).map(Some)
    }
}

/// Parse a hex-encoded 32-byte key.
pub fn parse_key(raw: &str) -> TokenResult<[u8; 32]> {
    let bytes = hex::decode(raw.trim()).map_err(|e| TokenError::InvalidKey(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| TokenError::InvalidKey(format!("expected 32 bytes, got {}", b.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unkeyed() {
        assert_eq!(TokenConfig::default().key().unwrap(), None);
        let blank = TokenConfig {
            signing_key: Some("  ".into()),
        };
        assert_eq!(blank.key().unwrap(), None);
    }

    #[test]
    fn keyed_roundtrips_through_hex() {
        let key = [7u8; 32];
        assert_eq!(TokenConfig::keyed(&key).key().unwrap(), Some(key));
    }

    #[test]
    fn rejects_short_or_non_hex_keys() {
        assert!(matches!(parse_key("abcd"), Err(TokenError::InvalidKey(_))));
        assert!(matches!(parse_key("zz"), Err(TokenError::InvalidKey(_))));
    }
}
