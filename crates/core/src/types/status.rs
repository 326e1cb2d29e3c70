//! Status enums for orders and payments.

use serde::{Deserialize, Serialize};

/// Order lifecycle status, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Payment lifecycle status.
///
/// Status is the only payment field that changes server-side without a
/// local re-submission; the poller exists to observe these transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    /// Whether no further transition is expected from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// Mobile money provider (phone-carrier payment rail).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobileMoneyProvider {
    Mtn,
    Airtel,
}

impl MobileMoneyProvider {
    /// Local three-digit operator prefixes owned by this provider.
    #[must_use]
    pub const fn prefixes(self) -> &'static [&'static str] {
        match self {
            Self::Mtn => &["077", "078", "076", "039"],
            Self::Airtel => &["070", "075", "074"],
        }
    }

    /// Whether a local prefix (e.g. `077`) belongs to this provider.
    #[must_use]
    pub fn owns_prefix(self, prefix: &str) -> bool {
        self.prefixes().contains(&prefix)
    }

    /// Short marketing name, e.g. `MTN`.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Mtn => "MTN",
            Self::Airtel => "Airtel",
        }
    }

    /// Wire name used by the payments backend.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Mtn => "mtn_momo",
            Self::Airtel => "airtel_money",
        }
    }

    /// Human-readable provider name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Mtn => "MTN Mobile Money",
            Self::Airtel => "Airtel Money",
        }
    }
}

impl std::fmt::Display for MobileMoneyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for MobileMoneyProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mtn" | "mtn_momo" => Ok(Self::Mtn),
            "airtel" | "airtel_money" => Ok(Self::Airtel),
            _ => Err(format!("unknown mobile money provider: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(PaymentStatus::Completed.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(PaymentStatus::Cancelled.is_terminal());
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(!PaymentStatus::Processing.is_terminal());
    }

    #[test]
    fn test_provider_prefixes_are_exclusive() {
        for prefix in MobileMoneyProvider::Mtn.prefixes() {
            assert!(MobileMoneyProvider::Mtn.owns_prefix(prefix));
            assert!(!MobileMoneyProvider::Airtel.owns_prefix(prefix));
        }
        for prefix in MobileMoneyProvider::Airtel.prefixes() {
            assert!(MobileMoneyProvider::Airtel.owns_prefix(prefix));
            assert!(!MobileMoneyProvider::Mtn.owns_prefix(prefix));
        }
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!(
            "mtn_momo".parse::<MobileMoneyProvider>().unwrap(),
            MobileMoneyProvider::Mtn
        );
        assert_eq!(
            "airtel".parse::<MobileMoneyProvider>().unwrap(),
            MobileMoneyProvider::Airtel
        );
        assert!("mpesa".parse::<MobileMoneyProvider>().is_err());
    }

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&PaymentStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let status: PaymentStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, PaymentStatus::Completed);
    }
}
