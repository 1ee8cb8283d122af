//
// Default configuration and default values:
//


/// Configuration file locations, first existing one wins:
pub const CONFIG_PATHS: [&str; 3] = [
    "/etc/certwarden/certwarden.conf",
    "/Services/Certwarden/service.conf",
    "certwarden.conf",
];

/// Default glob pattern of domain list files:
pub const DEFAULT_DOMAINS_PATTERN: &str = "domains.json";

/// Default location of the published status report:
pub const DEFAULT_STATUS_FILE: &str = "data/ssl_status.json";


/// Port used for TLS certificate probes
pub const TLS_PORT: u16 = 443;

/// Probe timeout in seconds (connect and handshake)
pub const CHECK_TIMEOUT: u64 = 10;

/// Certificates valid for fewer days than this are expiring soon
pub const CHECK_MINIMUM_DAYS_OF_TLSCERT_VALIDITY: i64 = 30;


/// Default notification author name
pub const DEFAULT_SLACK_NAME: &str = "Certwarden";

/// Default notification icon
pub const DEFAULT_FAILURE_ICON: &str = ":rotating_light:";

/// Attachment color of failure notifications
pub const DEFAULT_SLACK_FAILURE_COLOR: &str = "danger";

/// Additional delivery attempts per notifier
pub const NOTIFY_RETRIES: usize = 2;

/// Pause between delivery attempts in milliseconds
pub const NOTIFY_RETRY_DELAY_MS: u64 = 500;
