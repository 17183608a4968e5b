use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The identity that owns a note: either an email address or a wallet
/// address. The original backend kept two divergent note models around
/// (one keyed by email, one by wallet address); here they collapse into
/// one tagged variant.
///
/// Emails are normalized to lower-case at the boundary and compared
/// case-insensitively. Wallet addresses are stored verbatim and compared
/// case-sensitively. Identities of different kinds never match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AuthorIdentity {
    Email(String),
    Wallet(String),
}

impl AuthorIdentity {
    /// Classifies a raw identity string. Anything containing `@` is an
    /// email; any other non-blank string is a wallet address. Blank input
    /// carries no identity at all.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.contains('@') {
            Some(Self::Email(normalize_email(raw)))
        } else {
            Some(Self::Wallet(raw.to_string()))
        }
    }

    /// Reassembles an identity from its stored `author_kind` and
    /// `author_identity` columns.
    pub fn from_parts(kind: &str, value: String) -> Option<Self> {
        match kind {
            "email" => Some(Self::Email(value)),
            "wallet" => Some(Self::Wallet(value)),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Wallet(_) => "wallet",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Email(value) | Self::Wallet(value) => value,
        }
    }

    /// Ownership equality. There is no cryptographic proof here — no
    /// signature check for wallets, no session check for emails. Plain
    /// string equality is all the original ever did.
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Email(a), Self::Email(b)) => a.eq_ignore_ascii_case(b),
            (Self::Wallet(a), Self::Wallet(b)) => a == b,
            _ => false,
        }
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Display name fallback: the part of the email before the first `@`,
/// with the original casing intact.
pub fn derive_name(email: &str) -> String {
    email.trim().split('@').next().unwrap_or_default().to_string()
}
