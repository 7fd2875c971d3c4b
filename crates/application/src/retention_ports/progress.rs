use logreap_domain::ProgressPercent;

/// Receiver for incremental progress reports.
///
/// Values reported during one run never decrease and the last one is 100.
pub trait ProgressSink: Send + Sync {
    /// Records a progress value.
    fn report(&self, progress: ProgressPercent);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressPercent) + Send + Sync,
{
    fn report(&self, progress: ProgressPercent) {
        self(progress);
    }
}
