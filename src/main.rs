//! limpar binary - Data Cleaning Evaluation in Pure Rust.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::process::ExitCode;

fn main() -> ExitCode {
    limpar::cli::run()
}
