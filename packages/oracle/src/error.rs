#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OracleError {
    /// The buffer has no slots yet
    NotInitialized,
    /// The requested time predates the oldest retained observation
    TargetTooOld,
}
