//! Real-time clock adapter

pub trait Rtc {
    /// Perform one bounded time-synchronization exchange and write the
    /// result to the RTC chip. Requires a live network connection;
    /// failures are non-fatal and swallowed by the adapter.
    async fn sync_time(&mut self);
}
