use crate::{
    checks::{domain::DomainName, probe::CertificateProbe},
    products::check_result::Report,
    *,
};
use rayon::{prelude::*, ThreadPoolBuilder};
use std::collections::HashSet;


/// Probe every domain concurrently, one probe worker per domain unless capped by `max_in_flight`.
/// Results keep the order of (deduplicated) input domains, exactly one result per domain.
pub fn scan<P>(probe: &P, domains: &[DomainName], max_in_flight: Option<usize>) -> Report
where
    P: CertificateProbe + Sync,
{
    let mut seen = HashSet::new();
    let domains = domains
        .iter()
        .filter(|domain| seen.insert(*domain))
        .collect::<Vec<_>>();
    if domains.is_empty() {
        debug!("No domains to check.");
        return Report::new();
    }

    let workers = max_in_flight
        .map_or(domains.len(), |cap| cap.clamp(1, domains.len()));
    debug!("Probing {} domains with {} workers", domains.len(), workers);

    // each worker writes its own indexed slot of the collected vector
    let probe_all = || {
        domains
            .par_iter()
            .with_max_len(1)
            .map(|domain| probe.check(domain))
            .collect::<Report>()
    };
    match ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("certwarden-probe-{}", index))
        .build()
    {
        Ok(pool) => pool.install(probe_all),
        Err(err) => {
            warn!(
                "Couldn't start probe workers: {}. Falling back to shared pool.",
                err
            );
            probe_all()
        }
    }
}
