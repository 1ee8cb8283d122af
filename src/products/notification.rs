use crate::products::check_result::{CertificateCheckResult, CheckStatus};
use chrono::{DateTime, Utc};


const SECTION_SEPARATOR: &str = "----------------------------------------";


#[derive(Debug, Clone, PartialEq, Eq)]
/// Human readable summary of critical check results
pub struct Notification {
    /// One line summary
    pub subject: String,

    /// Report body, one section per result
    pub body: String,
}


impl Notification {
    /// Render notification about given results, dated `now`
    pub fn render(results: &[CertificateCheckResult], now: DateTime<Utc>) -> Notification {
        let mut lines = vec![
            format!("SSL monitoring report of {}", now.format("%d/%m/%Y")),
            String::new(),
        ];
        for result in results {
            lines.push(SECTION_SEPARATOR.to_string());
            lines.push(format!("Domain: {}", result.domain));
            lines.push(format!("Status: {}", result.status.name()));
            match &result.status {
                CheckStatus::Error { message } => {
                    lines.push(format!("Error: {}", message));
                }
                CheckStatus::Ok(expiry)
                | CheckStatus::ExpiringSoon(expiry)
                | CheckStatus::Expired(expiry) => {
                    lines.push(format!("Days left: {}", expiry.days_left));
                    lines.push(format!(
                        "Expiry date: {}",
                        expiry.not_after.format("%d/%m/%Y")
                    ));
                }
            }
            lines.push(String::new());
        }

        Notification {
            subject: format!(
                "SSL report: {} certificate(s) require your attention",
                results.len()
            ),
            body: lines.join("\n"),
        }
    }
}
