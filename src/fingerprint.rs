use sha2::{Digest, Sha256};

use crate::{Value, WriteOptions};

impl Value {
    /// Compute the SHA-256 digest of the compact GDVN form.
    ///
    /// Equal values always produce the same text, so the digest identifies
    /// the value independently of how it was originally formatted.
    #[cfg_attr(docsrs, doc(cfg(feature = "sha2")))]
    #[must_use]
    pub fn sha256(&self) -> [u8; 32] {
        let mut h = Sha256::new();
        h.update(self.to_gdvn_bytes(&WriteOptions::default()));
        let out = h.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(out.as_slice());
        digest
    }

    /// The [`Value::sha256`] digest as lowercase hex.
    #[cfg_attr(docsrs, doc(cfg(feature = "sha2")))]
    #[must_use]
    pub fn sha256_hex(&self) -> String {
        use std::fmt::Write as _;
        self.sha256().iter().fold(String::with_capacity(64), |mut s, b| {
            let _ = write!(s, "{b:02x}");
            s
        })
    }
}
