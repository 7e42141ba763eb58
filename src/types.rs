/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Account roles. Stored as lowercase text in `accounts.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Customer,
    Business,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Customer => "customer",
            AccountRole::Business => "business",
            AccountRole::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(AccountRole::Customer),
            "business" => Some(AccountRole::Business),
            "admin" => Some(AccountRole::Admin),
            _ => None,
        }
    }
}

/// Business lifecycle. Stored as text in `businesses.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessStatus {
    Pending,
    Approved,
    Suspended,
}

impl BusinessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessStatus::Pending => "pending",
            BusinessStatus::Approved => "approved",
            BusinessStatus::Suspended => "suspended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BusinessStatus::Pending),
            "approved" => Some(BusinessStatus::Approved),
            "suspended" => Some(BusinessStatus::Suspended),
            _ => None,
        }
    }
}

/// Receipt review lifecycle. `pending -> approved | rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReceiptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptStatus::Pending => "pending",
            ReceiptStatus::Approved => "approved",
            ReceiptStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReceiptStatus::Pending),
            "approved" => Some(ReceiptStatus::Approved),
            "rejected" => Some(ReceiptStatus::Rejected),
            _ => None,
        }
    }
}

/// Redemption code lifecycle. A code is consumed at most once:
/// the `issued -> used` transition happens in a single guarded UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedemptionStatus {
    Issued,
    Used,
    Cancelled,
}

impl RedemptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedemptionStatus::Issued => "issued",
            RedemptionStatus::Used => "used",
            RedemptionStatus::Cancelled => "cancelled",
        }
    }
}

/// What a redemption was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedemptionSource {
    Reward,
    DiscountOffer,
    ExclusiveOffer,
    PunchCard,
}

impl RedemptionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedemptionSource::Reward => "reward",
            RedemptionSource::DiscountOffer => "discount_offer",
            RedemptionSource::ExclusiveOffer => "exclusive_offer",
            RedemptionSource::PunchCard => "punch_card",
        }
    }
}

/// Why a ledger entry exists. Stored as text in `point_entries.reason`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointReason {
    SignupBonus,
    QrScan,
    Receipt,
    Redemption,
    AffiliateBonus,
    AdminAdjustment,
}

impl PointReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointReason::SignupBonus => "signup_bonus",
            PointReason::QrScan => "qr_scan",
            PointReason::Receipt => "receipt",
            PointReason::Redemption => "redemption",
            PointReason::AffiliateBonus => "affiliate_bonus",
            PointReason::AdminAdjustment => "admin_adjustment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips() {
        for role in [AccountRole::Customer, AccountRole::Business, AccountRole::Admin] {
            assert_eq!(AccountRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(AccountRole::parse("superuser"), None);
    }

    #[test]
    fn business_status_round_trips() {
        for status in [BusinessStatus::Pending, BusinessStatus::Approved, BusinessStatus::Suspended] {
            assert_eq!(BusinessStatus::parse(status.as_str()), Some(status));
        }
    }
}
