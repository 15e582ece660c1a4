use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use ts_types::{ShiftId, UserId};

use crate::claims::TokenClaims;
use crate::config::TokenConfig;
use crate::error::{TokenError, TokenResult};

/// Upper bound on accepted token length, checked before any decoding.
pub const MAX_TOKEN_LEN: usize = 4096;

const TAG_SEPARATOR: char = '.';

/// Encodes and decodes trust tokens.
///
/// An unkeyed codec emits bare payloads and ignores any tag on input. A
/// keyed codec appends a BLAKE3 keyed tag and refuses tokens whose tag is
/// missing or wrong.
#[derive(Clone, Default)]
pub struct TokenCodec {
    key: Option<[u8; 32]>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("keyed", &self.key.is_some())
            .finish()
    }
}

impl TokenCodec {
    pub fn unkeyed() -> Self {
        Self { key: None }
    }

    pub fn keyed(key: [u8; 32]) -> Self {
        Self { key: Some(key) }
    }

    pub fn from_config(config: &TokenConfig) -> TokenResult<Self> {
        Ok(Self { key: config.key()? })
    }

    pub fn is_keyed(&self) -> bool {
        self.key.is_some()
    }

    /// Mint a token for a shift.
    pub fn encode_shift(
        &self,
        shift_id: ShiftId,
        worker_id: UserId,
        employer: &str,
        start_time: DateTime<Utc>,
        issued_at: DateTime<Utc>,
    ) -> TokenResult<String> {
        self.encode(&TokenClaims::new(shift_id, worker_id, employer, start_time, issued_at))
    }

    pub fn encode(&self, claims: &TokenClaims) -> TokenResult<String> {
        let json =
            serde_json::to_vec(claims).map_err(|e| TokenError::Serialization(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let token = match &self.key {
            Some(key) => {
                let tag = blake3::keyed_hash(key, payload.as_bytes());
                format!("{payload}{TAG_SEPARATOR}{}", URL_SAFE_NO_PAD.encode(tag.as_bytes()))
            }
            None => payload,
        };
        if token.len() > MAX_TOKEN_LEN {
            return Err(TokenError::TooLong {
                len: token.len(),
                max: MAX_TOKEN_LEN,
            });
        }
        Ok(token)
    }

    /// Decode and, when keyed, authenticate a token. Surrounding whitespace
    /// is ignored.
    pub fn decode(&self, token: &str) -> TokenResult<TokenClaims> {
        let token = token.trim();
        if token.len() > MAX_TOKEN_LEN {
            return Err(TokenError::TooLong {
                len: token.len(),
                max: MAX_TOKEN_LEN,
            });
        }
        if token.is_empty() {
            return Err(TokenError::Empty);
        }

        let (payload, tag) = match token.split_once(TAG_SEPARATOR) {
            Some((payload, tag)) => (payload, Some(tag)),
            None => (token, None),
        };

        if let Some(key) = &self.key {
            let tag = tag.ok_or(TokenError::MissingTag)?;
            verify_tag(key, payload, tag)?;
        }

        let json = decode_base64(payload)?;
        serde_json::from_slice(&json).map_err(|e| TokenError::Malformed(e.to_string()))
    }
}

fn verify_tag(key: &[u8; 32], payload: &str, tag: &str) -> TokenResult<()> {
    let raw = URL_SAFE_NO_PAD.decode(tag).map_err(|_| TokenError::BadTag)?;
    let raw: [u8; 32] = raw.try_into().map_err(|_| TokenError::BadTag)?;
    // blake3::Hash equality is constant time.
    if blake3::keyed_hash(key, payload.as_bytes()) == blake3::Hash::from(raw) {
        Ok(())
    } else {
        Err(TokenError::BadTag)
    }
}

fn decode_base64(payload: &str) -> TokenResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD.decode(payload))
        .map_err(|e| TokenError::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn sample() -> TokenClaims {
        let at = Utc.with_ymd_and_hms(2024, 4, 4, 8, 30, 0).unwrap();
        TokenClaims::new(ShiftId::new(), UserId::new(), "CafeX", at, at)
    }

    #[test]
    fn unkeyed_roundtrip() {
        let codec = TokenCodec::unkeyed();
        let claims = sample();
        let token = codec.encode(&claims).unwrap();
        assert!(!token.contains(TAG_SEPARATOR));
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(codec.decode(&token).unwrap(), claims);
    }

    #[test]
    fn decode_is_stateless_and_repeatable() {
        let codec = TokenCodec::unkeyed();
        let token = codec.encode(&sample()).unwrap();
        assert_eq!(codec.decode(&token).unwrap(), codec.decode(&token).unwrap());
    }

    #[test]
    fn accepts_standard_padded_base64() {
        let claims = sample();
        let legacy = STANDARD.encode(serde_json::to_vec(&claims).unwrap());
        assert_eq!(TokenCodec::unkeyed().decode(&legacy).unwrap(), claims);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let codec = TokenCodec::unkeyed();
        let claims = sample();
        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&format!("  {token}\n")).unwrap(), claims);
    }

    #[test]
    fn rejects_garbage() {
        let codec = TokenCodec::unkeyed();
        assert_eq!(codec.decode(""), Err(TokenError::Empty));
        assert!(matches!(codec.decode("not base64!!"), Err(TokenError::Encoding(_))));
        // valid base64, not JSON
        let text = URL_SAFE_NO_PAD.encode("hello world");
        assert!(matches!(codec.decode(&text), Err(TokenError::Malformed(_))));
        // valid JSON, missing claims
        let partial = URL_SAFE_NO_PAD.encode(r#"{"shift_id":"x"}"#);
        assert!(matches!(codec.decode(&partial), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn rejects_overlong_input() {
        let long = "A".repeat(MAX_TOKEN_LEN + 1);
        assert!(matches!(
            TokenCodec::unkeyed().decode(&long),
            Err(TokenError::TooLong { .. })
        ));
    }

    #[test]
    fn truncated_token_fails() {
        let codec = TokenCodec::unkeyed();
        let token = codec.encode(&sample()).unwrap();
        for cut in [1, 4, token.len() / 2] {
            assert!(codec.decode(&token[..token.len() - cut]).is_err());
        }
    }

    #[test]
    fn keyed_roundtrip_and_tamper_detection() {
        let codec = TokenCodec::keyed([9u8; 32]);
        let claims = sample();
        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&token).unwrap(), claims);

        let (payload, _) = token.split_once(TAG_SEPARATOR).unwrap();
        assert_eq!(codec.decode(payload), Err(TokenError::MissingTag));

        let forged = TokenClaims {
            employer: "Elsewhere".into(),
            ..claims
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        let (_, tag) = token.split_once(TAG_SEPARATOR).unwrap();
        assert_eq!(
            codec.decode(&format!("{forged_payload}.{tag}")),
            Err(TokenError::BadTag)
        );

        let other = TokenCodec::keyed([1u8; 32]);
        assert_eq!(other.decode(&token), Err(TokenError::BadTag));
    }

    #[test]
    fn unkeyed_codec_ignores_tag() {
        let claims = sample();
        let token = TokenCodec::keyed([3u8; 32]).encode(&claims).unwrap();
        assert_eq!(TokenCodec::unkeyed().decode(&token).unwrap(), claims);
    }

    #[test]
    fn from_config_honours_key() {
        let codec = TokenCodec::from_config(&TokenConfig::keyed(&[5u8; 32])).unwrap();
        assert!(codec.is_keyed());
        assert!(!TokenCodec::from_config(&TokenConfig::default()).unwrap().is_keyed());
    }

    #[test]
    fn errors_classify_as_decode() {
        assert_eq!(TokenError::BadTag.kind(), ts_types::ErrorKind::Decode);
        assert_eq!(TokenError::Empty.kind(), ts_types::ErrorKind::Decode);
    }

    fn arb_time() -> impl Strategy<Value = DateTime<Utc>> {
        (0i64..4_102_444_800, 0u32..1_000_000_000)
            .prop_map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap())
    }

    proptest! {
        #[test]
        fn roundtrip_any_claims(
            employer in ".{0,64}",
            start in arb_time(),
            issued in arb_time(),
            keyed in any::<bool>(),
        ) {
            let codec = if keyed { TokenCodec::keyed([42u8; 32]) } else { TokenCodec::unkeyed() };
            let claims = TokenClaims::new(ShiftId::new(), UserId::new(), employer, start, issued);
            let token = codec.encode(&claims).unwrap();
            prop_assert_eq!(codec.decode(&token).unwrap(), claims);
        }

        #[test]
        fn random_text_never_decodes(input in "[ -~]{0,200}") {
            prop_assert!(TokenCodec::unkeyed().decode(&input).is_err());
        }
    }
}
