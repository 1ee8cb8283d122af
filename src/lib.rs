//! Certwarden - TLS certificate expiry watcher

//! Crate docs

#![forbid(unsafe_code)]
#![deny(
    missing_docs,
    unstable_features,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    bad_style,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    while_true,
    unused_extern_crates
)]
#![warn(dead_code, unused_imports, unused_variables, unused_qualifications)]

// For development:
// #![allow(dead_code, unused_imports, unused_variables, deprecated)]


/// Use MiMalloc as default allocator:
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;


pub use crate::actors::notificator::{NotificationChannel, Notificator, NotifyOutcome};
pub use crate::api::{check_domain, run_cycle, RunSummary, StatusCounts};
pub use crate::checks::domain::{DomainName, Domains};
pub use crate::checks::probe::{CertificateProbe, TlsProbe};
pub use crate::checks::scanner::scan;
pub use crate::config::{Config, Notifiers};
pub use crate::products::check_result::{CertificateCheckResult, CheckStatus, Expiry, Report};
pub use crate::products::notification::Notification;
pub use crate::products::policy::{select, AlertPolicy};
pub use crate::products::unexpected::*;
pub use crate::publisher::publish;
pub use tracing::{debug, error, info, instrument, trace, warn};


//
// Public modules:
//

/// Configuration defaults:
pub mod configuration;

/// Dynamic config:
pub mod config;

/// Utilities and helpers:
pub mod utilities;

/// Monitored domains input:
pub mod inputs;

/// Checks:
pub mod checks;

/// Check products:
pub mod products;

/// Status report publishing:
pub mod publisher;

/// Checks API functions:
pub mod api;

/// Actors:
pub mod actors;

//
// Private modules:
//
