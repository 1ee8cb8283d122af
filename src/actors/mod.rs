/// Actors module

/// sync concurrent certificate scan actor
pub mod scanner;

/// sync status report writer actor
pub mod report_publisher;

/// sync notification delivery actor
pub mod notificator;
