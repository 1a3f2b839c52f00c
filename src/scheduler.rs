//! Poll scheduler
//!
//! Runs one stats cycle immediately and then one per interval for as long
//! as the returned [`PollHandle`] lives. Each tick spawns its own cycle, so a
//! slow fetch can overlap the next tick; whichever cycle finishes last wins
//! the view.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;
use uuid::Uuid;

use crate::chart::ChartAdapter;
use crate::fetcher::SummaryFetcher;
use crate::reconciler::ViewReconciler;
use crate::reporter::ErrorReporter;
use crate::view::{NoticeId, View};

/// Time between cycle starts
pub const POLL_INTERVAL: Duration = Duration::from_millis(30_000);

/// Shortest interval the scheduler accepts
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What a single cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The summary was written into the view and chart
    Reconciled,
    /// The fetch failed; `notice` is the mounted notice, if the page had an anchor
    Reported { notice: Option<NoticeId> },
}

/// One fetch → reconcile → chart update (or error report) pass
pub struct SyncCycle<F, V> {
    fetcher: Arc<F>,
    view: Arc<V>,
    reconciler: Arc<ViewReconciler>,
    chart: Arc<ChartAdapter>,
    reporter: Arc<ErrorReporter>,
}

impl<F, V> Clone for SyncCycle<F, V> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            view: Arc::clone(&self.view),
            reconciler: Arc::clone(&self.reconciler),
            chart: Arc::clone(&self.chart),
            reporter: Arc::clone(&self.reporter),
        }
    }
}

impl<F, V> SyncCycle<F, V>
where
    F: SummaryFetcher + 'static,
    V: View + Send + Sync + 'static,
{
    pub fn new(
        fetcher: Arc<F>,
        view: Arc<V>,
        reconciler: ViewReconciler,
        chart: ChartAdapter,
        reporter: ErrorReporter,
    ) -> Self {
        Self {
            fetcher,
            view,
            reconciler: Arc::new(reconciler),
            chart: Arc::new(chart),
            reporter: Arc::new(reporter),
        }
    }

    pub fn view(&self) -> &Arc<V> {
        &self.view
    }

    /// Run one cycle to completion
    pub async fn run(&self) -> CycleOutcome {
        let cycle_id = Uuid::new_v4();

        async {
            match self.fetcher.fetch_summary().await {
                Ok(record) => {
                    self.reconciler.reconcile(self.view.as_ref(), &record);
                    self.chart.update_chart(self.view.as_ref(), &record);
                    tracing::info!(
                        total_channels = record.total_channels,
                        pending = record.pending_applications,
                        "Stats reconciled"
                    );
                    CycleOutcome::Reconciled
                }
                Err(e) => CycleOutcome::Reported {
                    notice: self.reporter.report(&self.view, &e),
                },
            }
        }
        .instrument(tracing::debug_span!("stats_cycle", %cycle_id))
        .await
    }
}

/// Timer state owned by the scheduler
#[derive(Debug)]
pub struct PollState {
    interval: Duration,
    timer: Option<JoinHandle<()>>,
}

impl PollState {
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it
    pub fn new(interval: Duration) -> Self {
        let interval = if interval < MIN_POLL_INTERVAL {
            tracing::warn!(
                requested_ms = millis(interval),
                "Poll interval too short, using {:?}",
                MIN_POLL_INTERVAL
            );
            MIN_POLL_INTERVAL
        } else {
            interval
        };

        Self {
            interval,
            timer: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.timer.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }
}

impl Default for PollState {
    fn default() -> Self {
        Self::new(POLL_INTERVAL)
    }
}

/// Drives [`SyncCycle`]s on a fixed cadence
pub struct PollScheduler<F, V> {
    cycle: SyncCycle<F, V>,
    state: PollState,
}

impl<F, V> PollScheduler<F, V>
where
    F: SummaryFetcher + 'static,
    V: View + Send + Sync + 'static,
{
    pub fn new(cycle: SyncCycle<F, V>, state: PollState) -> Self {
        Self { cycle, state }
    }

    /// Start polling. Consumes the scheduler, so it can only be started once.
    ///
    /// The first cycle fires right away. Failures never stop the timer.
    pub fn start(mut self) -> PollHandle {
        let interval = self.state.interval;
        let cycle = self.cycle;

        tracing::info!(
            interval_ms = millis(interval),
            "Starting stats polling"
        );

        let timer = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let cycle = cycle.clone();
                tokio::spawn(async move {
                    if let CycleOutcome::Reported { .. } = cycle.run().await {
                        tracing::warn!("Stats cycle failed, retrying on next tick");
                    }
                });
            }
        });

        self.state.timer = Some(timer);
        PollHandle { state: self.state }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Keeps polling alive; dropping it stops the timer
#[derive(Debug)]
pub struct PollHandle {
    state: PollState,
}

impl PollHandle {
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn interval(&self) -> Duration {
        self.state.interval
    }

    /// Stop the timer. Cycles already in flight run to completion.
    pub fn shutdown(self) {
        tracing::info!("Stopping stats polling");
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if let Some(timer) = self.state.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::DEFAULT_CHART_NAME;
    use crate::phrases::Phrasebook;
    use crate::reporter::NOTICE_EXPIRY;
    use crate::summary::{FetchError, FetchResult, NetworkFailure, Scope, SummaryRecord};
    use crate::view::{MemoryView, SlotId};
    use async_trait::async_trait;
    use chrono::FixedOffset;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays scripted results; repeats the last one when the script runs out
    struct ScriptedFetcher {
        script: Mutex<VecDeque<FetchResult<SummaryRecord>>>,
        last: Mutex<Option<FetchResult<SummaryRecord>>>,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn new(script: Vec<FetchResult<SummaryRecord>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                last: Mutex::new(None),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SummaryFetcher for ScriptedFetcher {
        async fn fetch_summary(&self) -> FetchResult<SummaryRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(result) => {
                    *self.last.lock().unwrap() = Some(result.clone());
                    result
                }
                None => self
                    .last
                    .lock()
                    .unwrap()
                    .clone()
                    .unwrap_or_else(|| Err(NetworkFailure::Unavailable.into())),
            }
        }
    }

    /// Answers call `n` with entry `n` of the script after its delay;
    /// repeats the last entry once the script runs out
    struct DelayedFetcher {
        script: Vec<(Duration, SummaryRecord)>,
        calls: AtomicUsize,
    }

    impl DelayedFetcher {
        fn new(script: Vec<(Duration, SummaryRecord)>) -> Arc<Self> {
            Arc::new(Self {
                script,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SummaryFetcher for DelayedFetcher {
        async fn fetch_summary(&self) -> FetchResult<SummaryRecord> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, record) = self.script[n.min(self.script.len() - 1)].clone();
            tokio::time::sleep(delay).await;
            Ok(record)
        }
    }

    fn cycle<F: SummaryFetcher + 'static>(fetcher: Arc<F>) -> SyncCycle<F, MemoryView> {
        let phrases = Phrasebook::default();
        SyncCycle::new(
            fetcher,
            Arc::new(MemoryView::dashboard(DEFAULT_CHART_NAME)),
            ViewReconciler::new(phrases.clone(), FixedOffset::east_opt(0).unwrap()),
            ChartAdapter::new(DEFAULT_CHART_NAME, phrases.clone()),
            ErrorReporter::new(phrases.fetch_error),
        )
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_successful_cycle_updates_view_and_chart() {
        let record = SummaryRecord::new(50, 3, 40, 10, 1000).scope(Scope::Own);
        let cycle = cycle(ScriptedFetcher::new(vec![Ok(record)]));

        assert_eq!(cycle.run().await, CycleOutcome::Reconciled);

        let view = cycle.view();
        assert_eq!(view.text(SlotId::PendingBadge).as_deref(), Some("3"));
        assert_eq!(view.is_visible(SlotId::PendingBadge), Some(true));
        assert_eq!(view.text(SlotId::TotalChannels).as_deref(), Some("50"));
        assert_eq!(
            view.text(SlotId::Subtitle).as_deref(),
            Some(Phrasebook::default().own_subtitle.as_str())
        );
        let chart = view.chart_snapshot().unwrap();
        assert_eq!(chart.series, vec![40, 10]);
        assert_eq!(chart.redraws, 1);
        assert!(view.notices().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failure_shows_expiring_notice() {
        let cycle = cycle(ScriptedFetcher::new(vec![Err(
            NetworkFailure::Timeout.into()
        )]));
        cycle.view().preset_text(SlotId::TotalChannels, "12");

        let outcome = cycle.run().await;
        assert!(matches!(outcome, CycleOutcome::Reported { notice: Some(_) }));
        assert_eq!(cycle.view().notices().len(), 1);
        assert_eq!(
            cycle.view().text(SlotId::TotalChannels).as_deref(),
            Some("12")
        );

        tokio::time::sleep(NOTICE_EXPIRY + Duration::from_millis(1)).await;
        assert!(cycle.view().notices().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_decode_failure_shows_expiring_notice() {
        let cycle = cycle(ScriptedFetcher::new(vec![Err(FetchError::Decode(
            "expected value at line 1 column 1".into(),
        ))]));

        cycle.run().await;
        assert_eq!(cycle.view().notices().len(), 1);

        tokio::time::sleep(NOTICE_EXPIRY + Duration::from_millis(1)).await;
        assert!(cycle.view().notices().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_failures_show_one_notice() {
        let cycle = cycle(ScriptedFetcher::new(vec![
            Err(NetworkFailure::Unavailable.into()),
            Err(FetchError::Decode("truncated".into())),
        ]));

        cycle.run().await;
        cycle.run().await;

        assert_eq!(cycle.view().notices().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_runs_immediately_then_every_interval() {
        let fetcher = ScriptedFetcher::new(vec![Ok(SummaryRecord::new(1, 0, 1, 0, 1))]);
        let handle = PollScheduler::new(cycle(Arc::clone(&fetcher)), PollState::default()).start();
        assert_eq!(handle.interval(), POLL_INTERVAL);

        settle().await;
        assert_eq!(fetcher.calls(), 1);

        tokio::time::sleep(POLL_INTERVAL - Duration::from_millis(1)).await;
        assert_eq!(fetcher.calls(), 1);

        tokio::time::sleep(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(fetcher.calls(), 2);
        assert!(handle.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_keeps_polling_after_failures() {
        let fetcher = ScriptedFetcher::new(vec![
            Err(NetworkFailure::Unavailable.into()),
            Err(NetworkFailure::Status(500).into()),
            Ok(SummaryRecord::new(4, 1, 3, 1, 9)),
        ]);
        let cycle = cycle(Arc::clone(&fetcher));
        let view = Arc::clone(cycle.view());
        let handle = PollScheduler::new(cycle, PollState::new(Duration::from_secs(10))).start();

        settle().await;
        tokio::time::sleep(Duration::from_secs(20)).await;
        settle().await;

        assert_eq!(fetcher.calls(), 3);
        assert_eq!(view.text(SlotId::TotalChannels).as_deref(), Some("4"));
        assert!(handle.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_timer() {
        let fetcher = ScriptedFetcher::new(vec![Ok(SummaryRecord::new(1, 0, 1, 0, 1))]);
        let handle = PollScheduler::new(cycle(Arc::clone(&fetcher)), PollState::default()).start();
        settle().await;

        handle.shutdown();
        tokio::time::sleep(POLL_INTERVAL * 3).await;
        settle().await;

        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_cycle_overlaps_next_tick_and_last_writer_wins() {
        let fetcher = DelayedFetcher::new(vec![
            (Duration::from_secs(45), SummaryRecord::new(1, 0, 1, 0, 1)),
            (Duration::ZERO, SummaryRecord::new(2, 0, 1, 1, 1)),
        ]);
        let cycle = cycle(Arc::clone(&fetcher));
        let view = Arc::clone(cycle.view());
        let _handle = PollScheduler::new(cycle, PollState::default()).start();

        // second tick starts while the first fetch is still pending
        tokio::time::sleep(Duration::from_secs(31)).await;
        settle().await;
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(view.text(SlotId::TotalChannels).as_deref(), Some("2"));

        // the slow first cycle finishes last and overwrites the view
        tokio::time::sleep(Duration::from_secs(15)).await;
        settle().await;
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(view.text(SlotId::TotalChannels).as_deref(), Some("1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_clamped_and_keeps_polling() {
        assert_eq!(PollState::new(Duration::ZERO).interval(), MIN_POLL_INTERVAL);

        let fetcher = ScriptedFetcher::new(vec![Ok(SummaryRecord::new(1, 0, 1, 0, 1))]);
        let handle = PollScheduler::new(
            cycle(Arc::clone(&fetcher)),
            PollState::new(Duration::ZERO),
        )
        .start();

        settle().await;
        assert!(handle.is_running());
        assert_eq!(fetcher.calls(), 1);

        tokio::time::sleep(MIN_POLL_INTERVAL).await;
        settle().await;
        assert_eq!(fetcher.calls(), 2);
    }

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(POLL_INTERVAL), 30_000);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }
}
