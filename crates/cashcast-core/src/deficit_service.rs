/// Folds a negative prior-month balance into the current month.
pub struct DeficitService;

impl DeficitService {
    /// `max(0, -previous)`; the first projected month has no previous month and carries nothing.
    pub fn carried_over(previous_ending: Option<f64>) -> f64 {
        match previous_ending {
            Some(balance) if balance < 0.0 => -balance,
            _ => 0.0,
        }
    }
}
