#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! Benchmark harness for pkgmap.
//!
//! Run benchmarks with: `cargo bench -p pkgmap-bench`
