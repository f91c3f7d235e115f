//! Live race statistics and the empirical complexity experiment.
//!
//! [BenchmarkState] follows agents of every algorithm from spawn to goal: it records arrivals,
//! keeps first/last/average arrival times and ranks algorithms in the order their last agent
//! arrives. Time is wall-clock time since [start](BenchmarkState::start) minus every paused
//! interval. Every time-dependent method has an `_at` variant taking the current [Instant]
//! explicitly, which the plain variant calls with `Instant::now()`.
use fxhash::FxHashSet;
use log::{debug, info};
use std::time::{Duration, Instant};

use crate::solver::Algorithm;

pub mod doubling;
pub mod lanes;

pub use doubling::{classify_ratio, ComplexityAnalyzer, ComplexityClass, DoublingResult};
pub use lanes::spawn_position;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BenchmarkPhase {
    Idle,
    Active,
    Paused,
    Complete,
}

/// Arrival statistics of one algorithm. Times are seconds of benchmark time.
#[derive(Clone, Debug, PartialEq)]
pub struct AlgorithmStats {
    pub algorithm: Algorithm,
    pub total_agents: usize,
    pub arrived_agents: usize,
    pub first_arrival: Option<f64>,
    pub last_arrival: Option<f64>,
    pub avg_arrival: f64,
    /// 1 for the first algorithm to bring all its agents home.
    pub rank: Option<usize>,
    pub finished: bool,
}

impl AlgorithmStats {
    fn new(algorithm: Algorithm) -> AlgorithmStats {
        AlgorithmStats {
            algorithm,
            total_agents: 0,
            arrived_agents: 0,
            first_arrival: None,
            last_arrival: None,
            avg_arrival: 0.0,
            rank: None,
            finished: false,
        }
    }

    fn clear_arrivals(&mut self) {
        *self = AlgorithmStats {
            total_agents: self.total_agents,
            ..AlgorithmStats::new(self.algorithm)
        };
    }

    fn record(&mut self, t: f64) {
        self.arrived_agents += 1;
        let n = self.arrived_agents as f64;
        self.first_arrival = Some(self.first_arrival.map_or(t, |first| first.min(t)));
        self.last_arrival = Some(self.last_arrival.map_or(t, |last| last.max(t)));
        self.avg_arrival = (self.avg_arrival * (n - 1.0) + t) / n;
    }
}

/// One row of the stat panel.
#[derive(Clone, Debug, PartialEq)]
pub struct StatSnapshot {
    pub name: &'static str,
    pub color: [u8; 3],
    pub arrived: usize,
    pub total: usize,
    pub first_arrival: Option<f64>,
    pub last_arrival: Option<f64>,
    pub avg_arrival: f64,
    pub rank: Option<usize>,
    pub finished: bool,
}

#[derive(Clone, Debug)]
pub struct BenchmarkState {
    phase: BenchmarkPhase,
    started_at: Option<Instant>,
    paused_at: Option<Instant>,
    paused_total: Duration,
    completed_at: Option<Instant>,
    stats: Vec<AlgorithmStats>,
    arrived: FxHashSet<(usize, u64)>,
    next_rank: usize,
    /// Distance in pixels within which an agent counts as arrived.
    pub goal_radius: f32,
}

impl BenchmarkState {
    pub fn new(goal_radius: f32) -> BenchmarkState {
        BenchmarkState {
            phase: BenchmarkPhase::Idle,
            started_at: None,
            paused_at: None,
            paused_total: Duration::ZERO,
            completed_at: None,
            stats: Algorithm::ALL.iter().map(|&a| AlgorithmStats::new(a)).collect(),
            arrived: FxHashSet::default(),
            next_rank: 1,
            goal_radius,
        }
    }

    pub fn phase(&self) -> BenchmarkPhase {
        self.phase
    }

    /// Number of agents `algorithm` races with. Algorithms with zero agents are not tracked.
    pub fn set_total_agents(&mut self, algorithm: Algorithm, total: usize) {
        if let Some(stats) = self.stats.get_mut(algorithm.index()) {
            stats.total_agents = total;
        }
    }

    pub fn stats(&self, algorithm_index: usize) -> Option<&AlgorithmStats> {
        self.stats.get(algorithm_index)
    }

    /// Starts the clock. Only effective from `Idle`; returns whether it started.
    pub fn start(&mut self) -> bool {
        self.start_at(Instant::now())
    }
    pub fn start_at(&mut self, now: Instant) -> bool {
        if self.phase != BenchmarkPhase::Idle {
            return false;
        }
        self.phase = BenchmarkPhase::Active;
        self.started_at = Some(now);
        info!("Benchmark started");
        true
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now())
    }
    pub fn pause_at(&mut self, now: Instant) {
        if self.phase == BenchmarkPhase::Active {
            self.phase = BenchmarkPhase::Paused;
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now())
    }
    pub fn resume_at(&mut self, now: Instant) {
        if self.phase != BenchmarkPhase::Paused {
            return;
        }
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += now.saturating_duration_since(paused_at);
        }
        self.phase = BenchmarkPhase::Active;
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            BenchmarkPhase::Active => self.pause(),
            BenchmarkPhase::Paused => self.resume(),
            _ => {}
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    /// Benchmark time at `now`, excluding paused intervals including one still open. Frozen
    /// once the benchmark is complete.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        let Some(started_at) = self.started_at else {
            return Duration::ZERO;
        };
        let end = self.completed_at.unwrap_or(now);
        let open_pause = self
            .paused_at
            .map_or(Duration::ZERO, |p| end.saturating_duration_since(p));
        end.saturating_duration_since(started_at)
            .saturating_sub(self.paused_total)
            .saturating_sub(open_pause)
    }

    pub fn record_arrival(&mut self, algorithm_index: usize, agent_id: u64) -> bool {
        self.record_arrival_at(algorithm_index, agent_id, Instant::now())
    }

    /// Records that an agent reached the goal. Ignored unless the benchmark is active, for
    /// untracked or finished algorithms, and for an agent that already arrived. Returns whether
    /// the arrival counted.
    pub fn record_arrival_at(&mut self, algorithm_index: usize, agent_id: u64, now: Instant) -> bool {
        if self.phase != BenchmarkPhase::Active {
            return false;
        }
        let t = self.elapsed_at(now).as_secs_f64();
        let Some(stats) = self.stats.get_mut(algorithm_index) else {
            return false;
        };
        if stats.total_agents == 0 || stats.finished {
            return false;
        }
        if !self.arrived.insert((algorithm_index, agent_id)) {
            return false;
        }
        stats.record(t);
        debug!(
            "{} agent {} arrived at {:.2}s ({}/{})",
            stats.algorithm, agent_id, t, stats.arrived_agents, stats.total_agents
        );
        if stats.arrived_agents == stats.total_agents {
            stats.finished = true;
            stats.rank = Some(self.next_rank);
            info!("{} finished in rank {}", stats.algorithm, self.next_rank);
            self.next_rank += 1;
        }
        true
    }

    pub fn check_arrival(
        &mut self,
        algorithm_index: usize,
        agent_id: u64,
        position: (f32, f32),
        goal: (f32, f32),
    ) -> bool {
        self.check_arrival_at(algorithm_index, agent_id, position, goal, Instant::now())
    }

    /// Records an arrival if `position` lies within the goal radius of `goal`.
    pub fn check_arrival_at(
        &mut self,
        algorithm_index: usize,
        agent_id: u64,
        position: (f32, f32),
        goal: (f32, f32),
        now: Instant,
    ) -> bool {
        let (dx, dy) = (position.0 - goal.0, position.1 - goal.1);
        if dx.hypot(dy) > self.goal_radius {
            return false;
        }
        self.record_arrival_at(algorithm_index, agent_id, now)
    }

    pub fn update(&mut self) -> BenchmarkPhase {
        self.update_at(Instant::now())
    }

    /// Completes the benchmark once every tracked algorithm has finished. Safe to call every
    /// tick.
    pub fn update_at(&mut self, now: Instant) -> BenchmarkPhase {
        if self.phase == BenchmarkPhase::Active {
            let mut tracked = self.stats.iter().filter(|s| s.total_agents > 0).peekable();
            if tracked.peek().is_some() && tracked.all(|s| s.finished) {
                self.phase = BenchmarkPhase::Complete;
                self.completed_at = Some(now);
                info!(
                    "Benchmark complete after {:.2}s",
                    self.elapsed_at(now).as_secs_f64()
                );
            }
        }
        self.phase
    }

    /// Back to `Idle` with every arrival forgotten. Agent totals are kept.
    pub fn reset(&mut self) {
        self.phase = BenchmarkPhase::Idle;
        self.started_at = None;
        self.paused_at = None;
        self.paused_total = Duration::ZERO;
        self.completed_at = None;
        self.arrived.clear();
        self.next_rank = 1;
        self.stats.iter_mut().for_each(AlgorithmStats::clear_arrivals);
    }

    /// Stat rows of the tracked algorithms, in registry order.
    pub fn snapshot(&self) -> Vec<StatSnapshot> {
        self.stats
            .iter()
            .filter(|s| s.total_agents > 0)
            .map(|s| {
                let info = s.algorithm.info();
                StatSnapshot {
                    name: info.name,
                    color: info.color,
                    arrived: s.arrived_agents,
                    total: s.total_agents,
                    first_arrival: s.first_arrival,
                    last_arrival: s.last_arrival,
                    avg_arrival: s.avg_arrival,
                    rank: s.rank,
                    finished: s.finished,
                }
            })
            .collect()
    }
}
