use crate::{checks::domain::DomainName, products::unexpected::ProbeError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};


/// Report is the full list of check results of one run
pub type Report = Vec<CertificateCheckResult>;


#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Expiry details of a certificate read during a successful probe
pub struct Expiry {
    /// Whole days left until expiry (negative once expired)
    #[serde(rename = "daysLeft")]
    pub days_left: i64,

    /// Certificate notAfter instant
    #[serde(rename = "expiryTimestamp")]
    pub not_after: DateTime<Utc>,
}


#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status")]
/// Status of a single certificate check, each status carries only its own fields
pub enum CheckStatus {
    /// Certificate valid for at least the threshold
    #[serde(rename = "OK")]
    Ok(Expiry),

    /// Certificate valid, but for fewer days than the threshold
    ExpiringSoon(Expiry),

    /// Certificate expired
    Expired(Expiry),

    /// Probe failed
    Error {
        /// Failure category followed by details
        #[serde(rename = "errorMessage")]
        message: String,
    },
}


impl CheckStatus {
    /// Status name as published in the report
    pub fn name(&self) -> &'static str {
        match self {
            CheckStatus::Ok(_) => "OK",
            CheckStatus::ExpiringSoon(_) => "ExpiringSoon",
            CheckStatus::Expired(_) => "Expired",
            CheckStatus::Error { .. } => "Error",
        }
    }


    /// Expiry details, None for failed probes
    pub fn expiry(&self) -> Option<&Expiry> {
        match self {
            CheckStatus::Ok(expiry)
            | CheckStatus::ExpiringSoon(expiry)
            | CheckStatus::Expired(expiry) => Some(expiry),
            CheckStatus::Error { .. } => None,
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Result of a certificate check of one domain
pub struct CertificateCheckResult {
    /// Checked domain
    pub domain: DomainName,

    /// Check status with its status-specific fields
    #[serde(flatten)]
    pub status: CheckStatus,
}


impl CertificateCheckResult {
    /// Classify a certificate expiring at `not_after`, as seen at `now`
    pub fn from_expiry(
        domain: DomainName,
        not_after: DateTime<Utc>,
        now: DateTime<Utc>,
        threshold_days: i64,
    ) -> CertificateCheckResult {
        CertificateCheckResult {
            domain,
            status: classify(not_after, now, threshold_days),
        }
    }


    /// Error result of a failed probe
    pub fn error(domain: DomainName, error: &ProbeError) -> CertificateCheckResult {
        CertificateCheckResult {
            domain,
            status: CheckStatus::Error {
                message: error.to_string(),
            },
        }
    }


    /// Whole days left, None for failed probes
    pub fn days_left(&self) -> Option<i64> {
        self.status.expiry().map(|expiry| expiry.days_left)
    }


    /// Certificate notAfter instant, None for failed probes
    pub fn expiry_timestamp(&self) -> Option<DateTime<Utc>> {
        self.status.expiry().map(|expiry| expiry.not_after)
    }


    /// Failure message, present only for failed probes
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            CheckStatus::Error { message } => Some(message),
            _ => None,
        }
    }
}


/// Whole 24h periods between now and expiry, rounded toward more-expired
pub fn days_until(not_after: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let left = not_after.signed_duration_since(now);
    let whole_days = left.num_days();
    if left < Duration::days(whole_days) {
        whole_days - 1
    } else {
        whole_days
    }
}


/// Classify certificate expiry against the expiring-soon threshold
pub fn classify(not_after: DateTime<Utc>, now: DateTime<Utc>, threshold_days: i64) -> CheckStatus {
    let expiry = Expiry {
        days_left: days_until(not_after, now),
        not_after,
    };
    match expiry.days_left {
        days if days < 0 => CheckStatus::Expired(expiry),
        days if days < threshold_days => CheckStatus::ExpiringSoon(expiry),
        _ => CheckStatus::Ok(expiry),
    }
}
