//! Main entry point for the order book simulator
//!
//! This serves as a thin wrapper that delegates to the interfaces layer.
//! The actual application logic is implemented in `interfaces::cli`.

use limit_book::interfaces::cli;

// 全局内存分配器：使用 jemalloc
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[tokio::main]
async fn main() {
    if let Err(err) = cli::run().await {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
