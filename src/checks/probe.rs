use crate::{
    checks::domain::DomainName,
    configuration::{CHECK_TIMEOUT, TLS_PORT},
    products::{
        check_result::CertificateCheckResult, policy::AlertPolicy, unexpected::ProbeError,
    },
    *,
};
use chrono::{DateTime, TimeZone, Utc};
use openssl::{
    asn1::{Asn1Time, Asn1TimeRef},
    ssl::{HandshakeError, SslConnector, SslMethod},
    x509::X509VerifyResult,
};
use std::{
    io::{self, ErrorKind, Read, Write},
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};


/// Checks certificate of a single domain. Failures are reported as Error results, never returned
pub trait CertificateProbe {
    /// Probe given domain once
    fn check(&self, domain: &DomainName) -> CertificateCheckResult;
}


#[derive(Debug, Clone)]
/// Probe performing a single TLS handshake, verified against the platform trust store
pub struct TlsProbe {
    timeout: Duration,
    port: u16,
    policy: AlertPolicy,
}


impl Default for TlsProbe {
    fn default() -> TlsProbe {
        TlsProbe::new(Duration::from_secs(CHECK_TIMEOUT), AlertPolicy::default())
    }
}


impl CertificateProbe for TlsProbe {
    #[instrument(skip_all, fields(domain = %domain))]
    fn check(&self, domain: &DomainName) -> CertificateCheckResult {
        match self.fetch_not_after(domain.as_str()) {
            Ok(not_after) => {
                let result = CertificateCheckResult::from_expiry(
                    domain.clone(),
                    not_after,
                    Utc::now(),
                    self.policy.threshold_days,
                );
                debug!("Certificate of {} is {}", domain, result.status.name());
                result
            }
            Err(err) => {
                warn!("{}", err);
                CertificateCheckResult::error(domain.clone(), &err)
            }
        }
    }
}


impl TlsProbe {
    /// New probe with timeout bounding connect and handshake together
    pub fn new(timeout: Duration, policy: AlertPolicy) -> TlsProbe {
        TlsProbe {
            timeout,
            port: TLS_PORT,
            policy,
        }
    }


    /// Probe another port than 443
    pub fn on_port(self, port: u16) -> TlsProbe {
        TlsProbe { port, ..self }
    }


    /// Resolve, connect and verify peer within the probe timeout, then read notAfter
    /// of its leaf certificate
    pub fn fetch_not_after(&self, domain: &str) -> Result<DateTime<Utc>, ProbeError> {
        let deadline = Instant::now() + self.timeout;
        let addresses = self.resolve(domain, deadline)?;
        let stream = self.connect(domain, &addresses, deadline)?;

        let connector = SslConnector::builder(SslMethod::tls())
            .map_err(|err| ProbeError::Handshake(domain.to_string(), err.to_string()))?
            .build();
        let tls_stream = connector
            .connect(domain, DeadlineStream { stream, deadline })
            .map_err(|err| self.handshake_failure(domain, err))?;

        let certificate = tls_stream.ssl().peer_certificate().ok_or_else(|| {
            ProbeError::Certificate(domain.to_string(), String::from("no peer certificate"))
        })?;
        asn1_to_utc(certificate.not_after())
            .ok_or_else(|| {
                ProbeError::Certificate(
                    domain.to_string(),
                    format!("unreadable notAfter: {}", certificate.not_after()),
                )
            })
    }


    /// System resolver lookup, abandoned once the deadline passes
    fn resolve(&self, domain: &str, deadline: Instant) -> Result<Vec<SocketAddr>, ProbeError> {
        let (sender, receiver) = mpsc::channel();
        let target = (domain.to_string(), self.port);
        thread::Builder::new()
            .name(format!("certwarden-resolve-{}", domain))
            .spawn(move || {
                let found = target
                    .to_socket_addrs()
                    .map(|addresses| addresses.collect::<Vec<_>>());
                // receiver is gone when the lookup outlived the deadline
                let _ = sender.send(found);
            })
            .map_err(|err| ProbeError::Resolve(domain.to_string(), err.to_string()))?;

        match receiver.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(Ok(addresses)) if !addresses.is_empty() => Ok(addresses),
            Ok(Ok(_)) => {
                Err(ProbeError::Resolve(domain.to_string(), String::from("no address found")))
            }
            Ok(Err(err)) => Err(ProbeError::Resolve(domain.to_string(), err.to_string())),
            Err(RecvTimeoutError::Timeout) => Err(self.timed_out(domain, "resolve")),
            Err(RecvTimeoutError::Disconnected) => {
                Err(ProbeError::Resolve(domain.to_string(), String::from("resolver gone")))
            }
        }
    }


    /// Single connection attempt walking all resolved addresses in order.
    /// Each address gets an even share of the time left before the deadline
    fn connect(
        &self,
        domain: &str,
        addresses: &[SocketAddr],
        deadline: Instant,
    ) -> Result<TcpStream, ProbeError> {
        let mut last_failure = None;
        for (index, address) in addresses.iter().enumerate() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(self.timed_out(domain, "connect"));
            }
            let addresses_left = u32::try_from(addresses.len() - index).unwrap_or(u32::MAX);
            trace!("Connecting to {} ({})", domain, address);
            let share = (remaining / addresses_left).max(Duration::from_millis(1));
            match TcpStream::connect_timeout(address, share) {
                Ok(stream) => return Ok(stream),
                Err(err) => {
                    debug!("Connection to {} ({}) failed: {}", domain, address, err);
                    last_failure = Some(err);
                }
            }
        }
        match last_failure {
            Some(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                Err(self.timed_out(domain, "connect"))
            }
            Some(err) => Err(ProbeError::Connect(domain.to_string(), err.to_string())),
            None => Err(ProbeError::Resolve(domain.to_string(), String::from("no address found"))),
        }
    }


    fn timed_out(&self, domain: &str, stage: &'static str) -> ProbeError {
        ProbeError::Timeout {
            domain: domain.to_string(),
            stage,
            timeout: self.timeout,
        }
    }


    fn handshake_failure(&self, domain: &str, err: HandshakeError<DeadlineStream>) -> ProbeError {
        match err {
            HandshakeError::WouldBlock(_) => self.timed_out(domain, "handshake"),
            HandshakeError::SetupFailure(stack) => {
                ProbeError::Handshake(domain.to_string(), stack.to_string())
            }
            HandshakeError::Failure(mid_handshake) => {
                let timed_out = mid_handshake
                    .error()
                    .io_error()
                    .map_or(false, |io| {
                        matches!(io.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock)
                    });
                if timed_out {
                    return self.timed_out(domain, "handshake");
                }
                let verify_result = mid_handshake.ssl().verify_result();
                let details = if verify_result == X509VerifyResult::OK {
                    mid_handshake.error().to_string()
                } else {
                    format!("certificate verify failed: {}", verify_result.error_string())
                };
                ProbeError::Handshake(domain.to_string(), details)
            }
        }
    }
}


/// TCP stream whose every read and write is bounded by the time left before the deadline
#[derive(Debug)]
struct DeadlineStream {
    stream: TcpStream,
    deadline: Instant,
}


impl DeadlineStream {
    fn remaining(&self) -> io::Result<Duration> {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            Err(io::Error::new(ErrorKind::TimedOut, "probe deadline exceeded"))
        } else {
            Ok(remaining)
        }
    }
}


impl Read for DeadlineStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining()?;
        self.stream.set_read_timeout(Some(remaining))?;
        self.stream.read(buf)
    }
}


impl Write for DeadlineStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let remaining = self.remaining()?;
        self.stream.set_write_timeout(Some(remaining))?;
        self.stream.write(buf)
    }


    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}


/// Convert ASN.1 certificate time to UTC instant
fn asn1_to_utc(time: &Asn1TimeRef) -> Option<DateTime<Utc>> {
    let epoch = Asn1Time::from_unix(0).ok()?;
    let since_epoch = epoch.diff(time).ok()?;
    let seconds = i64::from(since_epoch.days) * 86_400 + i64::from(since_epoch.secs);
    Utc.timestamp_opt(seconds, 0).single()
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;


    #[test]
    fn test_asn1_time_conversion() {
        let time = Asn1Time::from_unix(1_700_000_000).unwrap();
        assert_eq!(
            asn1_to_utc(&time),
            Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
        );
        let before_epoch = Asn1Time::from_str("19691231000000Z").unwrap();
        assert_eq!(asn1_to_utc(&before_epoch).map(|t| t.timestamp()), Some(-86_400));
    }


    #[test]
    fn test_silent_peer_times_out() {
        // never accepting is fine: the kernel completes the TCP handshake from the backlog
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let probe = TlsProbe::new(Duration::from_millis(300), AlertPolicy::default()).on_port(port);

        let started = Instant::now();
        let err = probe.fetch_not_after("127.0.0.1").unwrap_err();
        assert_eq!(err.category(), "timeout", "unexpected error: {}", err);
        assert!(err.to_string().starts_with("timeout: handshake with 127.0.0.1"));
        assert!(started.elapsed() < Duration::from_secs(5));
        drop(listener);
    }


    #[test]
    fn test_refused_connection_is_connect_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let probe = TlsProbe::new(Duration::from_secs(2), AlertPolicy::default()).on_port(port);
        let err = probe.fetch_not_after("127.0.0.1").unwrap_err();
        assert_eq!(err.category(), "connect", "unexpected error: {}", err);
    }


    #[test]
    fn test_non_tls_peer_is_handshake_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let _ = stream.write_all(b"HTTP/1.1 400 Bad Request\r\n\r\n");
            }
        });
        let probe = TlsProbe::new(Duration::from_secs(5), AlertPolicy::default()).on_port(port);
        let err = probe.fetch_not_after("127.0.0.1").unwrap_err();
        assert_eq!(err.category(), "handshake", "unexpected error: {}", err);
        server.join().unwrap();
    }


    #[test]
    fn test_trickling_peer_cant_outlast_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                // TLS record header announcing a 16KiB handshake, then a byte per 100ms
                let mut sent = stream.write_all(&[0x16, 0x03, 0x03, 0x40, 0x00]);
                for _ in 0..40 {
                    if sent.is_err() {
                        break;
                    }
                    thread::sleep(Duration::from_millis(100));
                    sent = stream.write_all(&[0]);
                }
            }
        });
        let probe = TlsProbe::new(Duration::from_millis(500), AlertPolicy::default()).on_port(port);

        let started = Instant::now();
        let err = probe.fetch_not_after("127.0.0.1").unwrap_err();
        let elapsed = started.elapsed();
        assert_eq!(err.category(), "timeout", "unexpected error: {}", err);
        assert!(elapsed < Duration::from_millis(1500), "took {:?}", elapsed);
        server.join().unwrap();
    }


    #[test]
    fn test_connect_walks_all_resolved_addresses() {
        let refused: SocketAddr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let reachable = listener.local_addr().unwrap();
        let probe = TlsProbe::new(Duration::from_secs(2), AlertPolicy::default());
        let deadline = Instant::now() + Duration::from_secs(2);

        let stream = probe
            .connect("dual.example", &[refused, reachable], deadline)
            .unwrap();
        assert_eq!(stream.peer_addr().unwrap(), reachable);

        let err = probe
            .connect("dual.example", &[refused], deadline)
            .unwrap_err();
        assert_eq!(err.category(), "connect", "unexpected error: {}", err);
    }


    #[test]
    fn test_expired_deadline_stops_connecting() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let reachable = listener.local_addr().unwrap();
        let probe = TlsProbe::new(Duration::from_secs(2), AlertPolicy::default());
        let err = probe
            .connect("late.example", &[reachable], Instant::now())
            .unwrap_err();
        assert_eq!(
            err,
            ProbeError::Timeout {
                domain: String::from("late.example"),
                stage: "connect",
                timeout: Duration::from_secs(2),
            }
        );
    }
}
