//! Periodic refresh scheduler.
//!
//! A single owned ticker fires immediately on [`RefreshScheduler::start`] and
//! then once per interval until [`SchedulerHandle::stop`]. Every fire does
//! two things:
//!
//! 1. launch one [`RefreshTask`] on its own tokio task, unless the previous
//!    launch is still running;
//! 2. re-arm: the next fire is `fire time + interval`, where a late fire
//!    counts from the moment it actually ran.
//!
//! A refresh failure is logged and has no effect on later fires.

use std::{sync::Arc, time::Duration};

use tokio::{
  sync::{Semaphore, watch},
  task::JoinHandle,
  time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{Result, refresh::RefreshTask};

/// Shortest interval the ticker accepts.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Longest interval the ticker accepts. Anything longer could overflow
/// `Instant` arithmetic when re-arming.
pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// What a single fire did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fire {
  /// `false` when the launch was skipped because a refresh was in flight.
  pub launched:  bool,
  pub next_fire: Instant,
}

pub struct RefreshScheduler<T> {
  task:      Arc<T>,
  interval:  Duration,
  in_flight: Arc<Semaphore>,
  next_fire: watch::Sender<Option<Instant>>,
}

impl<T: RefreshTask> RefreshScheduler<T> {
  pub fn new(task: Arc<T>, interval: Duration) -> Self {
    if interval < MIN_INTERVAL {
      tracing::warn!(?interval, "refresh interval too short; using {MIN_INTERVAL:?}");
    } else if interval > MAX_INTERVAL {
      tracing::warn!(?interval, "refresh interval too long; using {MAX_INTERVAL:?}");
    }
    Self {
      task,
      interval: interval.clamp(MIN_INTERVAL, MAX_INTERVAL),
      in_flight: Arc::new(Semaphore::new(1)),
      next_fire: watch::Sender::new(None),
    }
  }

  pub fn interval(&self) -> Duration { self.interval }

  /// When the next fire is due, or `None` before the first fire.
  pub fn next_fire(&self) -> Option<Instant> { *self.next_fire.borrow() }

  /// Fire once at `at`: launch a refresh if none is running, and re-arm.
  ///
  /// A fire that comes late (the ticker delays missed ticks) re-arms from
  /// the current instant rather than from `at`.
  pub fn fire(&self, at: Instant) -> Fire {
    let launched = match Arc::clone(&self.in_flight).try_acquire_owned() {
      Ok(permit) => {
        let task = Arc::clone(&self.task);
        tokio::spawn(async move {
          let _permit = permit;
          match task.refresh().await {
            Ok(()) => tracing::debug!("refresh finished"),
            Err(e) => tracing::warn!(error = %e, "refresh failed"),
          }
        });
        true
      }
      Err(_) => {
        tracing::warn!("previous refresh still running; skipping this one");
        false
      }
    };

    let next_fire = at.max(Instant::now()) + self.interval;
    self.next_fire.send_replace(Some(next_fire));
    Fire { launched, next_fire }
  }

  /// Start ticking on a background task. The first fire happens at once.
  pub fn start(self) -> SchedulerHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let next_fire = self.next_fire.subscribe();

    let join = tokio::spawn(async move {
      let mut ticker = tokio::time::interval(self.interval);
      ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
      tracing::info!(interval = ?self.interval, "refresh scheduler started");

      loop {
        tokio::select! {
          _ = token.cancelled() => break,
          at = ticker.tick() => {
            let fire = self.fire(at);
            tracing::debug!(launched = fire.launched, "scheduler fired");
          }
        }
      }

      tracing::info!("refresh scheduler stopped");
    });

    SchedulerHandle { cancel, join, next_fire }
  }
}

/// Owner of a running scheduler.
pub struct SchedulerHandle {
  cancel:    CancellationToken,
  join:      JoinHandle<()>,
  next_fire: watch::Receiver<Option<Instant>>,
}

impl SchedulerHandle {
  pub fn next_fire(&self) -> Option<Instant> { *self.next_fire.borrow() }

  /// Stop future fires and wait for the ticker to exit. A refresh that is
  /// already running is left to finish on its own.
  pub async fn stop(self) -> Result<()> {
    self.cancel.cancel();
    self.join.await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use tokio::sync::{Notify, mpsc};

  use super::*;
  use crate::error::Error;

  const EIGHT_HOURS: Duration = Duration::from_secs(8 * 60 * 60);

  struct Recorder {
    runs: mpsc::UnboundedSender<()>,
    fail: bool,
  }

  impl RefreshTask for Recorder {
    async fn refresh(&self) -> Result<()> {
      let _ = self.runs.send(());
      if self.fail { Err(Error::NoLocationSelected) } else { Ok(()) }
    }
  }

  struct Gated {
    started: mpsc::UnboundedSender<()>,
    release: Arc<Notify>,
  }

  impl RefreshTask for Gated {
    async fn refresh(&self) -> Result<()> {
      let _ = self.started.send(());
      self.release.notified().await;
      Ok(())
    }
  }

  /// Wait until the in-flight refresh has released its permit.
  async fn settle<T>(scheduler: &RefreshScheduler<T>) {
    while scheduler.in_flight.available_permits() == 0 {
      tokio::task::yield_now().await;
    }
  }

  fn recorder(fail: bool) -> (Arc<Recorder>, mpsc::UnboundedReceiver<()>) {
    let (runs, rx) = mpsc::unbounded_channel();
    (Arc::new(Recorder { runs, fail }), rx)
  }

  #[tokio::test(start_paused = true)]
  async fn one_fire_one_launch_one_rearm() {
    let (task, mut runs) = recorder(false);
    let scheduler = RefreshScheduler::new(task, EIGHT_HOURS);
    assert_eq!(scheduler.next_fire(), None);

    let at = Instant::now();
    let fire = scheduler.fire(at);
    assert!(fire.launched);
    assert_eq!(fire.next_fire, at + EIGHT_HOURS);
    assert_eq!(scheduler.next_fire(), Some(at + EIGHT_HOURS));

    runs.recv().await.unwrap();
    tokio::task::yield_now().await;
    assert!(runs.try_recv().is_err());
  }

  #[tokio::test(start_paused = true)]
  async fn failures_do_not_stop_rearming() {
    let (task, mut runs) = recorder(true);
    let scheduler = RefreshScheduler::new(task, EIGHT_HOURS);

    let first = scheduler.fire(Instant::now());
    runs.recv().await.unwrap();
    settle(&scheduler).await;

    let second = scheduler.fire(first.next_fire);
    assert!(second.launched);
    assert_eq!(second.next_fire, first.next_fire + EIGHT_HOURS);
    runs.recv().await.unwrap();
  }

  #[tokio::test(start_paused = true)]
  async fn overlapping_fire_rearms_without_launch() {
    let (started, mut started_rx) = mpsc::unbounded_channel();
    let release = Arc::new(Notify::new());
    let task = Arc::new(Gated { started, release: Arc::clone(&release) });
    let scheduler = RefreshScheduler::new(task, EIGHT_HOURS);

    let at = Instant::now();
    assert!(scheduler.fire(at).launched);
    started_rx.recv().await.unwrap();

    let busy = scheduler.fire(at + EIGHT_HOURS);
    assert!(!busy.launched);
    assert_eq!(busy.next_fire, at + EIGHT_HOURS * 2);

    release.notify_one();
    settle(&scheduler).await;

    assert!(scheduler.fire(at + EIGHT_HOURS * 2).launched);
    started_rx.recv().await.unwrap();
    release.notify_one();
  }

  #[tokio::test(start_paused = true)]
  async fn started_scheduler_ticks_until_stopped() {
    let (task, mut runs) = recorder(false);
    let t0 = Instant::now();
    let handle = RefreshScheduler::new(task, EIGHT_HOURS).start();

    runs.recv().await.unwrap();
    assert_eq!(handle.next_fire(), Some(t0 + EIGHT_HOURS));

    tokio::time::sleep(EIGHT_HOURS).await;
    runs.recv().await.unwrap();
    assert_eq!(handle.next_fire(), Some(t0 + EIGHT_HOURS * 2));

    handle.stop().await.unwrap();
    tokio::time::sleep(EIGHT_HOURS * 3).await;
    assert!(runs.try_recv().is_err());
  }

  #[test]
  fn interval_has_a_floor() {
    let (task, _runs) = recorder(false);
    let scheduler = RefreshScheduler::new(task, Duration::ZERO);
    assert_eq!(scheduler.interval(), MIN_INTERVAL);
  }

  #[test]
  fn interval_has_a_ceiling() {
    let (task, _runs) = recorder(false);
    let scheduler = RefreshScheduler::new(task, Duration::from_secs(u64::MAX));
    assert_eq!(scheduler.interval(), MAX_INTERVAL);
  }

  #[tokio::test(start_paused = true)]
  async fn huge_interval_keeps_ticker_alive() {
    let (task, mut runs) = recorder(false);
    let t0 = Instant::now();
    let handle = RefreshScheduler::new(task, Duration::from_secs(u64::MAX)).start();

    runs.recv().await.unwrap();
    assert_eq!(handle.next_fire(), Some(t0 + MAX_INTERVAL));
    handle.stop().await.unwrap();
  }

  #[tokio::test(start_paused = true)]
  async fn late_fire_rearms_from_now() {
    let (task, mut runs) = recorder(false);
    let scheduler = RefreshScheduler::new(task, EIGHT_HOURS);

    let due = Instant::now();
    tokio::time::advance(Duration::from_secs(3600)).await;
    let fire = scheduler.fire(due);
    assert_eq!(fire.next_fire, Instant::now() + EIGHT_HOURS);
    assert!(fire.next_fire > due + EIGHT_HOURS);
    runs.recv().await.unwrap();
  }
}
