/// Check results and their classification:
pub mod check_result;

/// Alert policy and critical results selection:
pub mod policy;

/// Notification rendering:
pub mod notification;

/// Errors:
pub mod unexpected;
