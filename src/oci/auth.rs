//! OCI Authentication
//!
//! Credential payload parsing, transient private-key material, and HTTP
//! request signing (OCI signature version 1, `rsa-sha256`).

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use serde::Deserialize;
use sha2::Sha256;
use std::fmt;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Headers covered by the signature of a GET request, in signing order
pub const SIGNED_HEADERS: &[&str] = &["date", "(request-target)", "host"];

/// Tenancy credentials as supplied on the command line
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub tenancy_id: String,
    pub user_id: String,
    pub fingerprint: String,
    pub private_key: String,
    pub region: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Security: never print key material
        f.debug_struct("Credentials")
            .field("tenancy_id", &self.tenancy_id)
            .field("user_id", &self.user_id)
            .field("fingerprint", &self.fingerprint)
            .field("private_key", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

impl Credentials {
    /// Parse credentials from a file path or an inline JSON document
    pub fn load(source: &str) -> Result<Self> {
        let path = Path::new(source);
        let content = if path.is_file() {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read credentials file {}", path.display()))?
        } else {
            source.to_string()
        };

        let credentials: Credentials =
            serde_json::from_str(&content).context("Malformed credentials JSON")?;
        credentials.validate()?;
        Ok(credentials)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("tenancyId", &self.tenancy_id),
            ("userId", &self.user_id),
            ("fingerprint", &self.fingerprint),
            ("privateKey", &self.private_key),
            ("region", &self.region),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                anyhow::bail!("Credential field {} is empty", name);
            }
        }
        Ok(())
    }

    /// Key identifier used in the Authorization header
    pub fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenancy_id, self.user_id, self.fingerprint)
    }

    /// Shortened tenancy id for log lines
    pub fn tenancy_hint(&self) -> &str {
        let end = self
            .tenancy_id
            .char_indices()
            .nth(20)
            .map(|(i, _)| i)
            .unwrap_or(self.tenancy_id.len());
        &self.tenancy_id[..end]
    }
}

/// Private key written to an owner-only temporary file.
///
/// The file is removed when this value is dropped, on every exit path.
pub struct KeyFile {
    file: NamedTempFile,
}

impl KeyFile {
    pub fn materialize(pem: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("ocinv-key-")
            .suffix(".pem")
            .tempfile()
            .context("Failed to create temporary key file")?;
        file.write_all(pem.as_bytes())
            .context("Failed to write temporary key file")?;
        file.flush().context("Failed to flush temporary key file")?;
        tracing::debug!("Private key materialized at {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Produces the signature for a request signing string
pub trait RequestSigner: Send + Sync {
    /// `<tenancy>/<user>/<fingerprint>`
    fn key_id(&self) -> &str;

    /// Base64 signature over the signing string
    fn sign(&self, signing_string: &str) -> Result<String>;
}

/// RSA PKCS#1 v1.5 / SHA-256 signer backed by an API signing key
pub struct RsaSigner {
    key_id: String,
    signing_key: SigningKey<Sha256>,
}

impl RsaSigner {
    /// Load the signing key from a PEM file (PKCS#8 or PKCS#1)
    pub fn from_key_file(key_id: String, path: &Path) -> Result<Self> {
        let pem = std::fs::read_to_string(path).context("Failed to read private key file")?;
        let key = RsaPrivateKey::from_pkcs8_pem(&pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(&pem))
            .map_err(|_| anyhow::anyhow!("Private key is not a valid unencrypted RSA PEM key"))?;

        Ok(Self {
            key_id,
            signing_key: SigningKey::<Sha256>::new(key),
        })
    }
}

impl RequestSigner for RsaSigner {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    fn sign(&self, signing_string: &str) -> Result<String> {
        let signature = self
            .signing_key
            .try_sign(signing_string.as_bytes())
            .context("Failed to sign request")?;
        Ok(STANDARD.encode(signature.to_bytes()))
    }
}

/// Build the signing string for a request
pub fn signing_string(date: &str, method: &str, path_and_query: &str, host: &str) -> String {
    format!(
        "date: {}\n(request-target): {} {}\nhost: {}",
        date,
        method.to_lowercase(),
        path_and_query,
        host
    )
}

/// Build the Authorization header value
pub fn authorization_header(key_id: &str, signature: &str) -> String {
    format!(
        "Signature version=\"1\",keyId=\"{}\",algorithm=\"rsa-sha256\",headers=\"{}\",signature=\"{}\"",
        key_id,
        SIGNED_HEADERS.join(" "),
        signature
    )
}
