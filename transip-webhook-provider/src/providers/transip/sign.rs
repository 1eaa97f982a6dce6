//! TransIP 请求签名
//!
//! Token requests are signed with the account's RSA key: PKCS#1 v1.5 padding over SHA-512,
//! base64 encoded into the `Signature` header.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use ring::rand::SystemRandom;
use ring::signature::{self, RsaKeyPair};
use rustls_pki_types::PrivateKeyDer;
use rustls_pki_types::pem::PemObject;

use crate::error::{ProviderError, Result};

use super::PROVIDER_NAME;

/// Signs request bodies with the account private key.
pub(crate) struct RequestSigner {
    key_pair: RsaKeyPair,
    rng: SystemRandom,
}

impl RequestSigner {
    /// Parse a PEM private key as handed out by the TransIP control panel.
    ///
    /// Both `BEGIN PRIVATE KEY` (PKCS#8) and `BEGIN RSA PRIVATE KEY` (PKCS#1) are accepted;
    /// the first key block wins, text around it is ignored.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let key = PrivateKeyDer::from_pem_slice(pem)
            .map_err(|e| key_error(format!("no usable PEM private key: {e}")))?;

        let key_pair = match &key {
            PrivateKeyDer::Pkcs8(der) => RsaKeyPair::from_pkcs8(der.secret_pkcs8_der()),
            PrivateKeyDer::Pkcs1(der) => RsaKeyPair::from_der(der.secret_pkcs1_der()),
            PrivateKeyDer::Sec1(_) => {
                return Err(key_error("'EC PRIVATE KEY' is not an RSA key"));
            }
            _ => return Err(key_error("unsupported private key format")),
        }
        .map_err(|e| key_error(format!("rejected RSA key: {e}")))?;

        Ok(Self {
            key_pair,
            rng: SystemRandom::new(),
        })
    }

    /// Sign `body` and return the base64 signature.
    pub fn sign(&self, body: &[u8]) -> Result<String> {
        let mut signature = vec![0u8; self.key_pair.public().modulus_len()];
        self.key_pair
            .sign(&signature::RSA_PKCS1_SHA512, &self.rng, body, &mut signature)
            .map_err(|_| key_error("RSA-SHA512 signing failed"))?;
        Ok(STANDARD.encode(signature))
    }

    #[cfg(test)]
    pub fn public_key_der(&self) -> Vec<u8> {
        use ring::signature::KeyPair as _;
        self.key_pair.public_key().as_ref().to_vec()
    }
}

fn key_error(detail: impl ToString) -> ProviderError {
    ProviderError::InvalidPrivateKey {
        provider: PROVIDER_NAME.to_string(),
        detail: detail.to_string(),
    }
}
