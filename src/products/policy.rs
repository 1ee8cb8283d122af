use crate::{
    configuration::CHECK_MINIMUM_DAYS_OF_TLSCERT_VALIDITY,
    products::check_result::{CertificateCheckResult, CheckStatus, Report},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Decides the expiring-soon band and which results are worth a notification
pub struct AlertPolicy {
    /// Certificates valid for fewer days are expiring soon
    pub threshold_days: i64,

    /// Notify about expiring certificates only on these exact days-left values.
    /// Empty set means every expiring certificate is notified
    pub exact_day_triggers: BTreeSet<i64>,

    /// Expired certificates and failed probes are always notified
    pub always_alert_failures: bool,
}


impl Default for AlertPolicy {
    fn default() -> AlertPolicy {
        AlertPolicy::new(CHECK_MINIMUM_DAYS_OF_TLSCERT_VALIDITY)
    }
}


impl AlertPolicy {
    /// Policy notifying about every expiring, expired and failed certificate
    pub fn new(threshold_days: i64) -> AlertPolicy {
        AlertPolicy {
            threshold_days,
            exact_day_triggers: BTreeSet::new(),
            always_alert_failures: true,
        }
    }


    /// Replace exact day triggers
    pub fn with_triggers<I: IntoIterator<Item = i64>>(self, triggers: I) -> AlertPolicy {
        AlertPolicy {
            exact_day_triggers: triggers.into_iter().collect(),
            ..self
        }
    }


    /// Set whether expired and failed results are always notified
    pub fn always_alert_failures(self, always: bool) -> AlertPolicy {
        AlertPolicy {
            always_alert_failures: always,
            ..self
        }
    }


    /// Whether the result deserves a notification
    pub fn is_critical(&self, result: &CertificateCheckResult) -> bool {
        match &result.status {
            CheckStatus::Ok(_) => false,
            CheckStatus::Expired(_) | CheckStatus::Error { .. } if self.always_alert_failures => true,
            status => self.triggered(status.expiry().map(|expiry| expiry.days_left)),
        }
    }


    fn triggered(&self, days_left: Option<i64>) -> bool {
        self.exact_day_triggers.is_empty()
            || days_left.map_or(false, |days| self.exact_day_triggers.contains(&days))
    }
}


/// Select results requiring a notification, keeping report order
pub fn select(report: &[CertificateCheckResult], policy: &AlertPolicy) -> Report {
    report
        .iter()
        .filter(|result| policy.is_critical(result))
        .cloned()
        .collect()
}
