use crate::{
    actors::{
        notificator::{Notificator, Notify, NotifyOutcome},
        report_publisher::{Publish, ReportPublisher},
        scanner::{Scan, Scanner},
    },
    checks::{
        domain::{DomainName, Domains},
        probe::{CertificateProbe, TlsProbe},
    },
    config::Config,
    inputs::domains::read_domain_list,
    products::{
        check_result::{CertificateCheckResult, CheckStatus},
        policy::{select, AlertPolicy},
        unexpected::{DomainError, RunError},
    },
    *,
};
use actix::prelude::*;
use std::path::{Path, PathBuf};


/**
    Public library API for Certwarden checks
 **/


#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
/// Number of results per status
pub struct StatusCounts {
    /// OK results
    pub ok: usize,

    /// ExpiringSoon results
    pub expiring_soon: usize,

    /// Expired results
    pub expired: usize,

    /// Error results
    pub error: usize,
}


impl StatusCounts {
    /// Count statuses of given results
    pub fn of(results: &[CertificateCheckResult]) -> StatusCounts {
        results
            .iter()
            .fold(StatusCounts::default(), |mut counts, result| {
                match result.status {
                    CheckStatus::Ok(_) => counts.ok += 1,
                    CheckStatus::ExpiringSoon(_) => counts.expiring_soon += 1,
                    CheckStatus::Expired(_) => counts.expired += 1,
                    CheckStatus::Error { .. } => counts.error += 1,
                }
                counts
            })
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
/// Summary of a completed scan-publish-notify cycle
pub struct RunSummary {
    /// Scanned domains
    pub scanned: usize,

    /// Results per status
    pub counts: StatusCounts,

    /// Results selected for notification
    pub critical: usize,

    /// Published status report
    pub report: PathBuf,

    /// Notification outcome
    pub notification: NotifyOutcome,
}


/// Check a single domain right away, bypassing the scan and the status report
pub fn check_domain(raw: &str, config: &Config) -> Result<CertificateCheckResult, DomainError> {
    let domain: DomainName = raw.parse()?;
    debug!("On-demand check of: {}", domain);
    Ok(TlsProbe::new(config.probe_timeout(), config.policy()).check(&domain))
}


/// Run full scan-publish-notify cycle over configured domains.
/// Has to be called from within a running actix System
pub async fn run_cycle(config: &Config) -> Result<RunSummary, RunError> {
    let domains = read_domain_list(&config.domains_pattern())?;
    let policy = config.policy();

    let probe = TlsProbe::new(config.probe_timeout(), policy.clone());
    let max_in_flight = config.max_in_flight;
    let notifiers_config = config.clone();

    let scanner = SyncArbiter::start(1, move || Scanner::new(probe.clone(), max_in_flight));
    let report_publisher = SyncArbiter::start(1, || ReportPublisher);
    let notificator = SyncArbiter::start(1, move || Notificator::from_config(&notifiers_config));

    run_pipeline(
        domains,
        &config.status_file(),
        &policy,
        &scanner,
        &report_publisher,
        &notificator,
    )
    .await
}


/// Drive given pipeline actors through one cycle
pub async fn run_pipeline<P>(
    domains: Domains,
    status_file: &Path,
    policy: &AlertPolicy,
    scanner: &Addr<Scanner<P>>,
    report_publisher: &Addr<ReportPublisher>,
    notificator: &Addr<Notificator>,
) -> Result<RunSummary, RunError>
where
    P: CertificateProbe + Sync + Unpin + 'static,
{
    let report = scanner.send(Scan(domains)).await?;
    let counts = StatusCounts::of(&report);
    info!(
        "Scanned {} domains: {} OK, {} expiring soon, {} expired, {} errors",
        report.len(),
        counts.ok,
        counts.expiring_soon,
        counts.expired,
        counts.error
    );

    report_publisher
        .send(Publish {
            report: report.clone(),
            destination: status_file.to_path_buf(),
        })
        .await??;

    let critical = select(&report, policy);
    let critical_count = critical.len();
    let notification = if critical.is_empty() {
        info!("No certificate matches alert criteria. Nothing to notify.");
        NotifyOutcome::NothingToSend
    } else {
        notificator
            .send(Notify(critical))
            .await
            .unwrap_or_else(|err| {
                error!("Notificator unavailable: {}", err);
                NotifyOutcome::Failed {
                    delivered: 0,
                    failures: vec![format!("notificator: {}", err)],
                }
            })
    };

    Ok(RunSummary {
        scanned: report.len(),
        counts,
        critical: critical_count,
        report: status_file.to_path_buf(),
        notification,
    })
}
