//! Live metrics dashboard
//!
//! [`Dashboard`] holds the simulated metrics and advances them on fixed
//! periods when told how much time passed. [`Ticker`] drives a dashboard on a
//! background thread and broadcasts snapshots to subscribers.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta};
use crossbeam_channel::{Receiver, Sender};
use rand::Rng;
use tracing::{debug, trace};

use crate::clock::{Sleeper, ThreadSleeper};
use crate::report::ThreatLevel;
use crate::scanner::CancellationToken;

/// Hourly samples kept in the activity window
pub const ACTIVITY_WINDOW: usize = 24;

const METRICS_PERIOD: Duration = Duration::from_secs(5);
const NETWORK_PERIOD: Duration = Duration::from_secs(3);
const LIVE_STATS_PERIOD: Duration = Duration::from_secs(10);
const THREAT_ROTATION_PERIOD: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct SystemMetrics {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub network_latency: f64,
    pub quantum_efficiency: f64,
    pub threats_blocked: u64,
    pub scan_speed: f64,
}

impl SystemMetrics {
    fn seeded<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            cpu_usage: rng.gen_range(23.0..33.0),
            memory_usage: rng.gen_range(67.0..82.0),
            disk_usage: rng.gen_range(45.0..65.0),
            network_latency: rng.gen_range(12.0..20.0),
            quantum_efficiency: rng.gen_range(94.0..99.0),
            threats_blocked: rng.gen_range(1847..1947),
            scan_speed: rng.gen_range(2.4..3.2),
        }
    }

    fn drift<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cpu_usage = (self.cpu_usage + rng.gen_range(-5.0..5.0)).clamp(15.0, 85.0);
        self.memory_usage = (self.memory_usage + rng.gen_range(-4.0..4.0)).clamp(40.0, 90.0);
        self.network_latency =
            (self.network_latency + rng.gen_range(-2.5..2.5)).clamp(5.0, 50.0);
        self.threats_blocked += rng.gen_range(0..=2);
    }
}

/// One point of the network activity chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySample {
    pub label: String,
    pub threats: u32,
    pub scans: u32,
    pub blocked: u32,
}

impl ActivitySample {
    fn random<R: Rng + ?Sized>(label: String, rng: &mut R) -> Self {
        Self {
            label,
            threats: rng.gen_range(10..60),
            scans: rng.gen_range(50..250),
            blocked: rng.gen_range(5..35),
        }
    }
}

/// Running counters shown on the landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveStats {
    pub scans_today: u64,
    pub threats_blocked: u64,
    pub quantum_detections: u64,
}

impl Default for LiveStats {
    fn default() -> Self {
        Self {
            scans_today: 15847,
            threats_blocked: 2934,
            quantum_detections: 847,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreatIntel {
    pub name: &'static str,
    pub severity: ThreatLevel,
    pub kind: &'static str,
    pub description: &'static str,
    pub affected_apps: u32,
    pub origin: &'static str,
}

/// Threat intelligence entries the dashboard rotates through
pub const THREAT_FEED: [ThreatIntel; 5] = [
    ThreatIntel {
        name: "QUANTUM_MALWARE_X7",
        severity: ThreatLevel::Critical,
        kind: "Advanced Persistent Threat",
        description: "Sophisticated banking trojan with quantum encryption bypass",
        affected_apps: 847,
        origin: "Eastern Europe",
    },
    ThreatIntel {
        name: "NEURAL_SPYWARE_V3",
        severity: ThreatLevel::High,
        kind: "Spyware Campaign",
        description: "AI-powered data exfiltration targeting financial apps",
        affected_apps: 412,
        origin: "Unknown",
    },
    ThreatIntel {
        name: "CRYPTO_MINER_SWARM",
        severity: ThreatLevel::Medium,
        kind: "Cryptojacking",
        description: "Distributed cryptocurrency mining through infected APKs",
        affected_apps: 1247,
        origin: "Asia-Pacific",
    },
    ThreatIntel {
        name: "PHANTOM_ROOTKIT_2.0",
        severity: ThreatLevel::Critical,
        kind: "Rootkit",
        description: "Stealth rootkit with anti-detection quantum algorithms",
        affected_apps: 89,
        origin: "Classified",
    },
    ThreatIntel {
        name: "SOCIAL_HARVESTER_PRO",
        severity: ThreatLevel::High,
        kind: "Data Harvester",
        description: "Social media credential theft with ML-powered attacks",
        affected_apps: 634,
        origin: "North America",
    },
];

/// Point-in-time copy of the dashboard, sent to subscribers
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub metrics: SystemMetrics,
    pub activity: Vec<ActivitySample>,
    pub live: LiveStats,
    pub current_threat: usize,
    /// Simulated time since the dashboard started
    pub elapsed: Duration,
}

impl DashboardSnapshot {
    pub fn threat(&self) -> &'static ThreatIntel {
        &THREAT_FEED[self.current_threat % THREAT_FEED.len()]
    }
}

/// Accumulates elapsed time and reports how many periods completed
#[derive(Debug, Clone)]
struct Periodic {
    period: Duration,
    pending: Duration,
}

impl Periodic {
    fn new(period: Duration) -> Self {
        Self {
            period,
            pending: Duration::ZERO,
        }
    }

    fn due(&mut self, elapsed: Duration) -> u32 {
        self.pending += elapsed;
        let fired = (self.pending.as_nanos() / self.period.as_nanos()) as u32;
        self.pending -= self.period * fired;
        fired
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    start: DateTime<Local>,
    elapsed: Duration,
    metrics: SystemMetrics,
    activity: Vec<ActivitySample>,
    live: LiveStats,
    current_threat: usize,
    metrics_timer: Periodic,
    network_timer: Periodic,
    live_timer: Periodic,
    rotation_timer: Periodic,
}

impl Dashboard {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_start(Local::now(), rng)
    }

    /// Seed the dashboard as if it were opened at `start`
    pub fn with_start<R: Rng + ?Sized>(start: DateTime<Local>, rng: &mut R) -> Self {
        let metrics = SystemMetrics::seeded(rng);
        let activity = (0..ACTIVITY_WINDOW as i64)
            .rev()
            .map(|hours_ago| {
                let at = start - TimeDelta::hours(hours_ago);
                ActivitySample::random(at.format("%-H:00").to_string(), rng)
            })
            .collect();

        Self {
            start,
            elapsed: Duration::ZERO,
            metrics,
            activity,
            live: LiveStats::default(),
            current_threat: 0,
            metrics_timer: Periodic::new(METRICS_PERIOD),
            network_timer: Periodic::new(NETWORK_PERIOD),
            live_timer: Periodic::new(LIVE_STATS_PERIOD),
            rotation_timer: Periodic::new(THREAT_ROTATION_PERIOD),
        }
    }

    pub fn metrics(&self) -> &SystemMetrics {
        &self.metrics
    }

    pub fn activity(&self) -> &[ActivitySample] {
        &self.activity
    }

    pub fn live(&self) -> LiveStats {
        self.live
    }

    pub fn current_threat(&self) -> &'static ThreatIntel {
        &THREAT_FEED[self.current_threat]
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Move simulated time forward, running every update whose period came due
    ///
    /// An update fires once per completed period, so a long `elapsed` can run
    /// the same update several times. Returns whether anything changed.
    pub fn advance<R: Rng + ?Sized>(&mut self, elapsed: Duration, rng: &mut R) -> bool {
        self.elapsed += elapsed;
        let mut changed = false;

        for _ in 0..self.metrics_timer.due(elapsed) {
            self.metrics.drift(rng);
            changed = true;
        }

        for _ in 0..self.network_timer.due(elapsed) {
            self.push_activity(rng);
            changed = true;
        }

        for _ in 0..self.live_timer.due(elapsed) {
            self.live.scans_today += rng.gen_range(1..=5);
            self.live.threats_blocked += rng.gen_range(0..=1);
            self.live.quantum_detections += rng.gen_range(0..=2);
            changed = true;
        }

        for _ in 0..self.rotation_timer.due(elapsed) {
            self.current_threat = (self.current_threat + 1) % THREAT_FEED.len();
            debug!(threat = THREAT_FEED[self.current_threat].name, "rotated threat feed");
            changed = true;
        }

        changed
    }

    fn push_activity<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.activity.len() >= ACTIVITY_WINDOW {
            self.activity.remove(0);
        }
        let now = TimeDelta::from_std(self.elapsed)
            .ok()
            .and_then(|delta| self.start.checked_add_signed(delta))
            .unwrap_or(self.start);
        self.activity
            .push(ActivitySample::random(now.format("%-H:%M").to_string(), rng));
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            metrics: self.metrics.clone(),
            activity: self.activity.clone(),
            live: self.live,
            current_threat: self.current_threat,
            elapsed: self.elapsed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TickerConfig {
    /// How much simulated time passes per tick
    pub interval: Duration,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

/// Runs a [`Dashboard`] on a background thread
pub struct Ticker {
    config: TickerConfig,
    cancel_token: CancellationToken,
    sleeper: Arc<dyn Sleeper>,
    subscribers: Vec<Sender<DashboardSnapshot>>,
}

impl Ticker {
    pub fn new(config: TickerConfig) -> Self {
        Self {
            config,
            cancel_token: CancellationToken::new(),
            sleeper: Arc::new(ThreadSleeper),
            subscribers: Vec::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Register a receiver; it gets the initial snapshot and every change
    pub fn subscribe(&mut self) -> Receiver<DashboardSnapshot> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Start ticking. The thread stops when the token is cancelled or every
    /// subscriber has gone away, and hands the dashboard back.
    pub fn spawn<R>(mut self, mut dashboard: Dashboard, mut rng: R) -> JoinHandle<Dashboard>
    where
        R: Rng + Send + 'static,
    {
        std::thread::spawn(move || {
            self.broadcast(&dashboard);

            while !self.subscribers.is_empty() && !self.cancel_token.is_cancelled() {
                self.sleeper.sleep(self.config.interval);
                if self.cancel_token.is_cancelled() {
                    break;
                }

                if dashboard.advance(self.config.interval, &mut rng) {
                    self.broadcast(&dashboard);
                }
            }

            debug!(elapsed = ?dashboard.elapsed(), "dashboard ticker stopped");
            dashboard
        })
    }

    fn broadcast(&mut self, dashboard: &Dashboard) {
        let snapshot = dashboard.snapshot();
        self.subscribers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
        trace!(subscribers = self.subscribers.len(), "broadcast dashboard snapshot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{NoopSleeper, RecordingSleeper};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn dashboard(seed: u64) -> (Dashboard, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        (Dashboard::new(&mut rng), rng)
    }

    #[test]
    fn test_initial_state() {
        let (dash, _) = dashboard(1);
        let m = dash.metrics();
        assert!((23.0..33.0).contains(&m.cpu_usage));
        assert!((67.0..82.0).contains(&m.memory_usage));
        assert!((12.0..20.0).contains(&m.network_latency));
        assert!((1847..1947).contains(&m.threats_blocked));
        assert_eq!(dash.activity().len(), ACTIVITY_WINDOW);
        assert!(dash.activity().iter().all(|s| s.label.ends_with(":00")));
        assert_eq!(dash.live(), LiveStats::default());
        assert_eq!(dash.current_threat().name, "QUANTUM_MALWARE_X7");
    }

    #[test]
    fn test_nothing_fires_before_first_period() {
        let (mut dash, mut rng) = dashboard(2);
        let before = dash.snapshot();
        assert!(!dash.advance(Duration::from_secs(2), &mut rng));
        assert_eq!(dash.snapshot().metrics, before.metrics);
        assert_eq!(dash.snapshot().activity, before.activity);
    }

    #[test]
    fn test_periods() {
        let (mut dash, mut rng) = dashboard(3);
        let blocked = dash.metrics().threats_blocked;

        // 3 s: network only
        let first_label = dash.activity()[0].label.clone();
        assert!(dash.advance(Duration::from_secs(3), &mut rng));
        assert_eq!(dash.activity().len(), ACTIVITY_WINDOW);
        assert_ne!(dash.activity()[0].label, first_label);
        assert_eq!(dash.live(), LiveStats::default());

        // 10 s total: live stats have ticked once
        dash.advance(Duration::from_secs(7), &mut rng);
        assert!(dash.live().scans_today > LiveStats::default().scans_today);
        assert!(dash.metrics().threats_blocked >= blocked);
        assert_eq!(dash.current_threat, 0);

        // 30 s total: threat feed rotated
        dash.advance(Duration::from_secs(20), &mut rng);
        assert_eq!(dash.current_threat().name, "NEURAL_SPYWARE_V3");
        assert_eq!(dash.elapsed(), Duration::from_secs(30));
    }

    #[test]
    fn test_long_advance_fires_repeatedly() {
        let (mut dash, mut rng) = dashboard(4);
        dash.advance(Duration::from_secs(150), &mut rng);
        assert_eq!(dash.current_threat, 0);

        let live = dash.live();
        // 15 live-stat updates, each adding at least one scan
        assert!(live.scans_today >= LiveStats::default().scans_today + 15);
        assert!(live.scans_today <= LiveStats::default().scans_today + 75);
    }

    #[test]
    fn test_metrics_stay_clamped() {
        let (mut dash, mut rng) = dashboard(5);
        for _ in 0..2_000 {
            dash.advance(Duration::from_secs(1), &mut rng);
            let m = dash.metrics();
            assert!((15.0..=85.0).contains(&m.cpu_usage));
            assert!((40.0..=90.0).contains(&m.memory_usage));
            assert!((5.0..=50.0).contains(&m.network_latency));
            assert_eq!(dash.activity().len(), ACTIVITY_WINDOW);
        }
        for sample in dash.activity() {
            assert!((10..60).contains(&sample.threats));
            assert!((50..250).contains(&sample.scans));
            assert!((5..35).contains(&sample.blocked));
        }
    }

    #[test]
    fn test_ticker_broadcasts_until_cancelled() {
        let (dash, rng) = dashboard(6);
        let token = CancellationToken::new();
        let mut ticker = Ticker::new(TickerConfig::default())
            .with_cancellation(token.clone())
            .with_sleeper(Arc::new(NoopSleeper));
        let rx = ticker.subscribe();
        let handle = ticker.spawn(dash, rng);

        let initial = rx.recv().unwrap();
        assert_eq!(initial.elapsed, Duration::ZERO);
        let next = rx.recv().unwrap();
        assert!(next.elapsed >= Duration::from_secs(3));

        token.cancel();
        let dash = handle.join().unwrap();
        assert!(dash.elapsed() >= next.elapsed);
    }

    #[test]
    fn test_ticker_stops_without_subscribers() {
        let (dash, rng) = dashboard(7);
        let sleeper = Arc::new(RecordingSleeper::new());
        let mut ticker = Ticker::new(TickerConfig::default()).with_sleeper(sleeper.clone());
        let rx = ticker.subscribe();
        drop(rx);

        let dash = ticker.spawn(dash, rng).join().unwrap();
        assert_eq!(dash.elapsed(), Duration::ZERO);
        assert!(sleeper.sleeps().is_empty());
    }

    #[test]
    fn test_ticker_uses_interval() {
        let (dash, rng) = dashboard(8);
        let sleeper = Arc::new(RecordingSleeper::new());
        let token = CancellationToken::new();
        let mut ticker = Ticker::new(TickerConfig {
            interval: Duration::from_millis(500),
        })
        .with_cancellation(token.clone())
        .with_sleeper(sleeper.clone());
        let rx = ticker.subscribe();
        let handle = ticker.spawn(dash, rng);

        rx.recv().unwrap();
        let first_change = rx.recv().unwrap();
        assert_eq!(first_change.elapsed, Duration::from_secs(3));

        token.cancel();
        handle.join().unwrap();
        assert!(sleeper.sleeps().iter().all(|d| *d == Duration::from_millis(500)));
    }
}
