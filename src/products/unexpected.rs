use std::{io, path::PathBuf, time::Duration};
use thiserror::Error;


#[derive(Debug, Clone, Error, PartialEq, Eq, Hash)]
/// Failure of a single certificate probe. Never escapes the probe, it becomes an Error result
pub enum ProbeError {
    /// Domain name couldn't be resolved (domain, details)
    #[error("resolve: {0} couldn't be resolved. Details: {1}")]
    Resolve(String, String),

    /// TCP connection refused or failed (domain, details)
    #[error("connect: connection to {0} failed. Details: {1}")]
    Connect(String, String),

    /// Connection or handshake exceeded the probe timeout
    #[error("timeout: {stage} with {domain} exceeded {timeout:?}")]
    Timeout {
        /// Probed domain
        domain: String,

        /// Probe stage that timed out
        stage: &'static str,

        /// Probe timeout
        timeout: Duration,
    },

    /// TLS handshake or certificate verification failed (domain, details)
    #[error("handshake: TLS handshake with {0} failed. Details: {1}")]
    Handshake(String, String),

    /// Peer certificate missing or its expiry unreadable (domain, details)
    #[error("certificate: unusable certificate of {0}. Details: {1}")]
    Certificate(String, String),
}


impl ProbeError {
    /// Machine-stable failure category, the prefix of the rendered error message
    pub fn category(&self) -> &'static str {
        match self {
            ProbeError::Resolve(..) => "resolve",
            ProbeError::Connect(..) => "connect",
            ProbeError::Timeout { .. } => "timeout",
            ProbeError::Handshake(..) => "handshake",
            ProbeError::Certificate(..) => "certificate",
        }
    }
}


#[derive(Debug, Clone, Error, PartialEq, Eq)]
/// Rejected domain name
pub enum DomainError {
    /// Name doesn't match the hostname grammar
    #[error("Invalid domain name: \"{0}\"")]
    Invalid(String),
}


#[derive(Debug, Error)]
/// Domain list couldn't be read
pub enum DomainListError {
    /// Malformed glob pattern
    #[error("Invalid domain list pattern: \"{pattern}\". Details: {source}")]
    Pattern {
        /// Configured pattern
        pattern: String,

        /// Glob failure
        source: glob::PatternError,
    },

    /// Domain list file unreadable
    #[error("Couldn't read domain list: {path:?}. Details: {source}")]
    Read {
        /// Domain list file
        path: PathBuf,

        /// I/O failure
        source: io::Error,
    },

    /// Domain list file isn't a JSON array of strings
    #[error("Couldn't parse domain list: {path:?}. Details: {source}")]
    Parse {
        /// Domain list file
        path: PathBuf,

        /// JSON failure
        source: serde_json::Error,
    },
}


#[derive(Debug, Error)]
/// Report couldn't be published. The previously published report stays intact
pub enum PublishError {
    /// Report serialization failed
    #[error("Couldn't serialize report. Details: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Temporary report file couldn't be written
    #[error("Couldn't write report file: {path:?}. Details: {source}")]
    Write {
        /// File being written
        path: PathBuf,

        /// I/O failure
        source: io::Error,
    },

    /// Temporary report file couldn't replace the destination
    #[error("Couldn't move report {from:?} to {to:?}. Details: {source}")]
    Rename {
        /// Temporary report file
        from: PathBuf,

        /// Report destination
        to: PathBuf,

        /// I/O failure
        source: io::Error,
    },
}


#[derive(Debug, Error)]
/// Configuration file couldn't be loaded
pub enum ConfigError {
    /// Configuration file unreadable
    #[error("Couldn't read configuration file: {path:?}. Details: {source}")]
    Read {
        /// Configuration file
        path: PathBuf,

        /// I/O failure
        source: io::Error,
    },

    /// Configuration file isn't valid JSON
    #[error("Configuration error in file: {path:?}. Details: {source}")]
    Parse {
        /// Configuration file
        path: PathBuf,

        /// JSON failure
        source: serde_json::Error,
    },
}


#[derive(Debug, Error)]
/// Failed scan-publish-notify cycle
pub enum RunError {
    /// Domain set couldn't be loaded
    #[error(transparent)]
    DomainList(#[from] DomainListError),

    /// Report couldn't be published
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// Pipeline actor didn't answer
    #[error("Pipeline actor failure: {0}")]
    Mailbox(#[from] actix::MailboxError),
}
