use crate::{
    checks::{domain::Domains, probe::CertificateProbe, scanner::scan},
    products::check_result::Report,
    *,
};
use actix::prelude::*;


/// Scanner actor probing all domains of a run
#[derive(Debug, Clone)]
pub struct Scanner<P> {
    probe: P,
    max_in_flight: Option<usize>,
}


/// Domains to scan
#[derive(Message, Debug, Clone)]
#[rtype(result = "Report")]
pub struct Scan(pub Domains);


impl<P> Scanner<P> {
    /// New scanner using given probe
    pub fn new(probe: P, max_in_flight: Option<usize>) -> Scanner<P> {
        Scanner {
            probe,
            max_in_flight,
        }
    }
}


impl<P> Actor for Scanner<P>
where
    P: CertificateProbe + Sync + Unpin + 'static,
{
    type Context = SyncContext<Self>;
}


impl<P> Handler<Scan> for Scanner<P>
where
    P: CertificateProbe + Sync + Unpin + 'static,
{
    type Result = Report;

    fn handle(&mut self, domains: Scan, _ctx: &mut Self::Context) -> Self::Result {
        info!("Scanner probes {} domains…", domains.0.len());
        let report = scan(&self.probe, &domains.0, self.max_in_flight);
        debug!("Scanner collected {} results", report.len());
        report
    }
}
