// Configuration for key validation and the block pipeline

/// Miller-Rabin rounds used when none are configured (error ≤ 4^-20)
pub const DEFAULT_PRIMALITY_ROUNDS: u32 = 20;

/// Blocks needed before the pipeline fans out over the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 8;

/// Configuration for RSA operations
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaConfig {
    pub primality_rounds: u32,
    pub parallel_threshold: usize,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            primality_rounds: DEFAULT_PRIMALITY_ROUNDS,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl RsaConfig {
    pub fn with_primality_rounds(mut self, rounds: u32) -> Self {
        self.primality_rounds = rounds;
        self
    }

    /// Use `usize::MAX` to keep every message on the calling thread
    pub fn with_parallel_threshold(mut self, blocks: usize) -> Self {
        self.parallel_threshold = blocks;
        self
    }

    /// Whether a message of `block_count` blocks should be processed in parallel
    pub(crate) fn fan_out(&self, block_count: usize) -> bool {
        cfg!(feature = "parallel") && block_count >= self.parallel_threshold
    }
}
