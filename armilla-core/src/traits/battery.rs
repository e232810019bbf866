//! Battery and charger status

pub trait Battery {
    /// Whether the charger is currently active. Sampled once at sleep
    /// entry and cached by the power manager.
    fn charging(&self) -> bool;
}
