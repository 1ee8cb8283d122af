//! Certwarden daemon

//! Runs one scan-publish-notify cycle over configured domains, meant to be triggered by a scheduler.
//! With `check <domain>` arguments probes a single domain and prints the result as JSON.

#![forbid(unsafe_code)]
#![deny(
    missing_docs,
    unstable_features,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    bad_style,
    unused_extern_crates
)]
// For development:
// #![allow(dead_code, unused_imports, unused_variables, deprecated)]


use certwarden::*;
use chrono::Local;
use std::{env, process};
use tracing_subscriber::EnvFilter;


/// Initial setup of the tracing subscriber. RUST_LOG overrides configured log level
fn setup_logger(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(config.get_log_level().into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}


/// On-demand check of a single domain
fn check_single(domain: &str, config: &Config) -> i32 {
    match check_domain(domain, config) {
        Ok(result) => {
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{}", json),
                Err(err) => error!("Couldn't serialize result: {}", err),
            }
            0
        }
        Err(err) => {
            error!("{}", err);
            2
        }
    }
}


#[actix_macros::main]
async fn main() {
    let loaded = Config::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    setup_logger(&config);
    if let Err(err) = loaded {
        error!("{}. Falling back to default configuration.", err);
    }

    let arguments = env::args().skip(1).collect::<Vec<String>>();
    if let [command, domain] = &arguments[..] {
        if command == "check" {
            process::exit(check_single(domain, &config));
        }
    }

    info!("Starting Certwarden v{}", env!("CARGO_PKG_VERSION"));
    let start = Local::now();
    match run_cycle(&config).await {
        Ok(summary) => {
            let diff = Local::now() - start;
            info!(
                "Certificate checks took: {}s. Results: {}. Critical: {}. Report: {:?}. Notification: {:?}.",
                diff.num_seconds(),
                summary.scanned,
                summary.critical,
                summary.report,
                summary.notification
            );
        }
        Err(err) => {
            error!("Run failed: {}", err);
            process::exit(1);
        }
    }
}
