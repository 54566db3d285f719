/// Aggregated view of session progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub asked: usize,
    pub remaining: usize,
    pub score: u32,
    pub is_complete: bool,
}
