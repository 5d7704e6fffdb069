use crate::addr::validate_ip;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::{self, Interface};
use crate::transport::{Link, Transport};
use arping_packets::{ArpFrame, MacAddr};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::{debug, trace};

// Replies waiting for the aggregator. It drains them as fast as they come, this only has to
// absorb a burst.
const EVENT_QUEUE: usize = 16;

// Stand-in deadline for timeouts that do not fit in an Instant, same horizon tokio's timer uses.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// One answer to a ping: who answered, and how long after the request went out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PingResult {
    pub hw_addr: MacAddr,
    pub duration: Duration,
}

/// Entry point for pings and gratuitous announcements.
///
/// ```no_run
/// # async fn run() -> arping::Result<()> {
/// use arping::{Arping, Config};
/// use std::net::Ipv4Addr;
///
/// let arping = Arping::new(Config::default());
/// for result in arping.ping(Ipv4Addr::new(192, 168, 1, 1)).await? {
///     println!("{} {:?}", result.hw_addr, result.duration);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Arping<L> {
    config: Config,
    pub(crate) link: L,
}

#[cfg(target_os = "linux")]
impl Arping<crate::transport::AfPacketLink> {
    /// An `Arping` using raw `AF_PACKET` sockets. Needs root or `CAP_NET_RAW`.
    pub fn new(config: Config) -> Self {
        Arping::with_link(config, crate::transport::AfPacketLink)
    }
}

impl<L: Link> Arping<L> {
    pub fn with_link(config: Config, link: L) -> Self {
        Arping { config, link }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Pings `dst` over the first interface that is directly connected to it.
    ///
    /// Listens for the whole timeout and returns every answer, in arrival order. Several hosts
    /// may claim the same address. No answer at all is [`Error::Timeout`].
    pub async fn ping(&self, dst: impl Into<IpAddr>) -> Result<Vec<PingResult>> {
        let started = Instant::now();
        let dst = validate_ip(dst)?;
        let iface = interface::find_usable_interface(dst)?;
        self.ping_from(started, dst, &iface).await
    }

    /// Pings `dst` over the interface called `iface_name`.
    pub async fn ping_over_interface_by_name(
        &self,
        dst: impl Into<IpAddr>,
        iface_name: &str,
    ) -> Result<Vec<PingResult>> {
        let started = Instant::now();
        let dst = validate_ip(dst)?;
        let iface = Interface::by_name(iface_name)?;
        self.ping_from(started, dst, &iface).await
    }

    /// Pings `dst` over `iface`, which must have an address in `dst`'s network.
    pub async fn ping_over_interface(
        &self,
        dst: impl Into<IpAddr>,
        iface: &Interface,
    ) -> Result<Vec<PingResult>> {
        let started = Instant::now();
        let dst = validate_ip(dst)?;
        self.ping_from(started, dst, iface).await
    }

    async fn ping_from(
        &self,
        started: Instant,
        dst: Ipv4Addr,
        iface: &Interface,
    ) -> Result<Vec<PingResult>> {
        let src_mac = iface.hardware_addr()?;
        let src_ip = iface.ip_in_network_of(dst)?;
        let request = ArpFrame::request(src_mac, src_ip, dst);

        let transport = self.link.open(iface)?;
        debug!(
            "arping '{}' over interface: '{}' with address: '{}'",
            dst, iface.name, src_ip
        );

        let session = Session {
            request,
            deadline: started
                .checked_add(self.config.timeout())
                .unwrap_or_else(|| started + FAR_FUTURE),
            verbose: self.config.verbose(),
        };
        session.run(transport).await
    }
}

/// What a received frame means for the outstanding request.
#[derive(Debug)]
pub(crate) enum Inbound {
    Reply(ArpFrame),
    Unrelated(ArpFrame),
    NotArp,
}

pub(crate) fn classify(request: &ArpFrame, bytes: &[u8]) -> Inbound {
    match ArpFrame::decode(bytes) {
        Some(frame) if frame.is_response_of(request) => Inbound::Reply(frame),
        Some(frame) => Inbound::Unrelated(frame),
        None => Inbound::NotArp,
    }
}

/// State of one ping call. Never shared between calls.
struct Session {
    request: ArpFrame,
    deadline: Instant,
    verbose: bool,
}

impl Session {
    /// Runs the listener on its own task and collects its replies until the deadline.
    async fn run<T: Transport + 'static>(self, transport: T) -> Result<Vec<PingResult>> {
        let (events_tx, mut events) = mpsc::channel(EVENT_QUEUE);
        let listener = tokio::spawn(listen(transport, self.request, events_tx, self.verbose));

        let deadline = time::sleep_until(self.deadline);
        tokio::pin!(deadline);

        let mut results = Vec::new();
        let mut listening = true;
        let outcome = loop {
            tokio::select! {
                event = events.recv(), if listening => match event {
                    Some(Ok(result)) => results.push(result),
                    Some(Err(e)) => break Err(e),
                    // listener gave up without an error; still wait out the window
                    None => listening = false,
                },
                _ = &mut deadline => {
                    break if results.is_empty() {
                        Err(Error::Timeout)
                    } else {
                        Ok(results)
                    };
                }
            }
        };

        // Closing the channel is the listener's stop signal. Its receive is cancellable, so it
        // closes the transport and exits promptly.
        drop(events);
        if let Err(e) = listener.await {
            if e.is_panic() {
                std::panic::resume_unwind(e.into_panic());
            }
        }

        outcome
    }
}

/// Owns the transport for the whole exchange and releases it exactly once on the way out.
async fn listen<T: Transport>(
    mut transport: T,
    request: ArpFrame,
    events: mpsc::Sender<Result<PingResult>>,
    verbose: bool,
) {
    let outcome = exchange(&mut transport, &request, &events, verbose).await;
    transport.close();
    if let Err(e) = outcome {
        // nobody is listening any more if the deadline already passed
        let _ = events.send(Err(e)).await;
    }
}

async fn exchange<T: Transport>(
    transport: &mut T,
    request: &ArpFrame,
    events: &mpsc::Sender<Result<PingResult>>,
    verbose: bool,
) -> Result<()> {
    let frame = request.to_bytes();
    let sent_at = tokio::select! {
        _ = events.closed() => return Ok(()),
        sent = transport.send(&frame) => sent?,
    };

    loop {
        let (bytes, received_at) = tokio::select! {
            _ = events.closed() => return Ok(()),
            received = transport.receive() => received?,
        };

        match classify(request, &bytes) {
            Inbound::Reply(reply) => {
                log_frame(verbose, "process", &reply);
                let result = PingResult {
                    hw_addr: reply.sender_mac(),
                    duration: received_at.saturating_duration_since(sent_at),
                };
                if events.send(Ok(result)).await.is_err() {
                    return Ok(());
                }
            }
            Inbound::Unrelated(frame) => log_frame(verbose, "ignore", &frame),
            Inbound::NotArp => trace!("ignore non-arp frame of {} bytes", bytes.len()),
        }
    }
}

fn log_frame(verbose: bool, action: &str, frame: &ArpFrame) {
    if verbose {
        debug!(
            "{} received arp: srcIP: '{}', srcMac: '{}'",
            action,
            frame.sender_ip(),
            frame.sender_mac()
        );
    } else {
        trace!(
            "{} received arp: srcIP: '{}', srcMac: '{}'",
            action,
            frame.sender_ip(),
            frame.sender_mac()
        );
    }
}
