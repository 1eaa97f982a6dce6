use serde::{Deserialize, Serialize};

// ============ DNS Entries ============

/// A single DNS entry as the TransIP API models it.
///
/// `name` is relative to the domain (`"www"`, `"_acme-challenge"`, `"@"` for the apex)
/// and `expire` is the TTL in seconds.
///
/// Equality is structural over all four fields. Two TXT entries with the same name but a
/// different token or TTL are different entries, which is what lets several validations for
/// the same name run side by side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DnsEntry {
    /// Record name relative to the domain.
    pub name: String,
    /// TTL in seconds.
    pub expire: u32,
    /// Record type, e.g. `"TXT"`.
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Record content.
    pub content: String,
}

impl DnsEntry {
    /// Creates a new entry.
    pub fn new(
        name: impl Into<String>,
        expire: u32,
        entry_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            expire,
            entry_type: entry_type.into(),
            content: content.into(),
        }
    }
}

impl std::fmt::Display for DnsEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {:?}",
            self.name, self.expire, self.entry_type, self.content
        )
    }
}

// ============ Domains ============

/// A domain hosted in the TransIP account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Registrable domain name, e.g. `example.com`.
    pub name: String,
    /// Whether the domain only uses TransIP for DNS (registered elsewhere).
    #[serde(default)]
    pub is_dns_only: bool,
    /// Whether the domain is flagged as transfer-locked.
    #[serde(default)]
    pub is_transfer_locked: bool,
    /// Registration date as reported by the API (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
    /// Renewal date as reported by the API (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal_date: Option<String>,
}

// ============ Client configuration ============

/// Whether the client may change anything.
///
/// Selected once when the client is built. `ReadOnly` requests a read-only token and
/// refuses every non-GET request locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiMode {
    /// Only reads are allowed.
    ReadOnly,
    /// Reads and writes are allowed.
    #[default]
    ReadWrite,
}

impl ApiMode {
    /// Maps a dry-run flag to a mode.
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run { Self::ReadOnly } else { Self::ReadWrite }
    }

    /// Whether mutating requests are refused.
    pub fn is_read_only(self) -> bool {
        matches!(self, Self::ReadOnly)
    }
}

/// Everything needed to open an authenticated TransIP session.
#[derive(Clone, Default)]
pub struct ClientConfiguration {
    /// TransIP account (login) name.
    pub account_name: String,
    /// PEM encoded RSA private key registered for the account.
    pub private_key: Vec<u8>,
    /// Read-only or read-write.
    pub mode: ApiMode,
}

impl ClientConfiguration {
    pub fn new(account_name: impl Into<String>, private_key: impl Into<Vec<u8>>) -> Self {
        Self {
            account_name: account_name.into(),
            private_key: private_key.into(),
            mode: ApiMode::ReadWrite,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ApiMode) -> Self {
        self.mode = mode;
        self
    }
}

impl std::fmt::Debug for ClientConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfiguration")
            .field("account_name", &self.account_name)
            .field("private_key", &"<****>")
            .field("mode", &self.mode)
            .finish()
    }
}
