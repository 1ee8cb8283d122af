/// Domain names:
pub mod domain;

/// Single TLS certificate probe:
pub mod probe;

/// Concurrent scan of many domains:
pub mod scanner;
