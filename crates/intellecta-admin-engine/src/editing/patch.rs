/// Result of applying a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    /// False when the command left the draft untouched (e.g. a boundary move)
    pub changed: bool,
    pub version: u64,
}
