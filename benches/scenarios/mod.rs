//! Scenario benchmarks: the supervisor as the device drives it.

mod block;

pub use block::bench_block;
