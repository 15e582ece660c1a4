/// Domain-separated BLAKE3 digest of a biometric capture.
///
/// Raw captures never reach the store; only these hex digests do. The
/// domain tag keeps a face capture and an identity document with the same
/// bytes from producing the same digest.
pub struct BiometricDigest {
    domain: &'static str,
}

impl BiometricDigest {
    pub const FACE: Self = Self {
        domain: "trustshift-face-v1",
    };
    pub const ID_DOCUMENT: Self = Self {
        domain: "trustshift-id-document-v1",
    };

    /// Hex digest of `capture`, or an empty string when there is nothing to
    /// hash.
    pub fn digest(&self, capture: Option<&str>) -> String {
        match capture {
            Some(data) if !data.is_empty() => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(self.domain.as_bytes());
                hasher.update(b":");
                hasher.update(data.as_bytes());
                hasher.finalize().to_hex().to_string()
            }
            _ => String::new(),
        }
    }
}
