/// Largest board edge the engine (and the text protocol) supports.
pub const MAX_BOARD_SIZE: usize = 25;

/// Board size used when no other size has been requested.
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Playouts per generated move unless configured otherwise.
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;
