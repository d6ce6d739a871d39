//! CLI Interface Module
//!
//! Command-line simulator for the order book: it starts a `BookService`,
//! drives a synthetic order flow through it and reports the final state.
//!
//! ## Responsibilities
//! - Parse command-line arguments
//! - Initialize logging
//! - Drive the order flow, feeding the middle price back after each trade
//! - Print the summary, depth snapshot, optional book dump and metrics

use crate::application::services::{BookService, ServiceError};
use crate::domain::{Amount, Book, Fixed, OrderValidator, Price, ValidationConfig};
use crate::interfaces::tools::OrderFlow;
use crate::shared::metrics::METRICS;
use clap::Parser;
use serde::Serialize;
use std::time::{Duration, Instant};

/// 订单簿模拟器命令行配置
#[derive(Parser, Debug, Clone)]
#[command(name = "limit-book")]
#[command(version = "0.1.0")]
#[command(about = "单品种限价订单簿模拟器", long_about = None)]
pub struct CliConfig {
    /// 模拟订单数量
    #[arg(short = 'n', long, default_value_t = 100_000)]
    pub orders: u64,

    /// 随机种子（缺省时使用系统熵）
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// 初始参考价格
    #[arg(short = 'P', long, default_value_t = 10.0)]
    pub start_price: f64,

    /// 深度快照的价格层数
    #[arg(short, long, default_value_t = 10)]
    pub depth: usize,

    /// 单笔订单最大数量（缺省不限制）
    #[arg(long)]
    pub max_amount: Option<f64>,

    /// 日志级别
    #[arg(short = 'l', long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: String,

    /// 输出格式
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// 打印完整订单簿
    #[arg(long, default_value_t = false)]
    pub dump: bool,

    /// 打印Prometheus指标
    #[arg(long, default_value_t = false)]
    pub metrics: bool,

    /// 仅显示配置不运行模拟（用于调试）
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl CliConfig {
    pub fn validation_config(&self) -> ValidationConfig {
        let mut config = ValidationConfig::default();
        if let Some(max_amount) = self.max_amount {
            config.max_amount = Fixed::from_f64(max_amount);
        }
        config
    }
}

/// Aggregate results of one simulation run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub orders: u64,
    /// Orders that matched at least one counterparty
    pub matched_orders: u64,
    /// Resting orders touched across all matches
    pub counterparties: u64,
    pub rejected: u64,
    /// Sum of incoming filled quantity
    pub volume: Amount,
    pub last_price: Price,
    pub middle_price: Price,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Runs the CLI application
pub async fn run() -> Result<(), ServiceError> {
    // 解析命令行参数
    let config = CliConfig::parse();

    // 初始化日志系统
    init_logging(&config.log_level);

    tracing::info!("订单簿模拟器启动");
    tracing::info!("配置: {:?}", config);

    if config.dry_run {
        print_config(&config);
        println!("\nDry-run 模式 - 不运行模拟");
        return Ok(());
    }

    let validator = OrderValidator::with_config(config.validation_config());
    let (handle, owner) = BookService::spawn(Book::new(), validator).map_err(|err| {
        tracing::error!("无法启动订单簿线程: {}", err);
        ServiceError::Closed
    })?;

    let mut flow = match config.seed {
        Some(seed) => OrderFlow::seeded(Fixed::from_f64(config.start_price), seed),
        None => OrderFlow::new(Fixed::from_f64(config.start_price)),
    };

    let summary = simulate(&handle, &mut flow, config.orders).await?;
    let depth = handle.depth(config.depth).await?;
    let dump = if config.dump { Some(handle.dump().await?) } else { None };

    // 关闭通道，等待订单簿线程退出
    drop(handle);
    if owner.join().is_err() {
        tracing::error!("订单簿线程异常退出");
        return Err(ServiceError::Closed);
    }

    if config.format == "json" {
        let report = serde_json::json!({ "summary": summary, "depth": depth });
        println!("{}", report);
    } else {
        print_summary(&summary);
        println!("\n{}", depth);
    }

    if let Some(dump) = dump {
        println!("{}", dump);
    }

    if config.metrics {
        println!("{}", METRICS.export());
    }

    Ok(())
}

/// Submits `orders` orders from `flow`, repricing the flow from the book's
/// middle price after each one
pub async fn simulate(
    handle: &crate::application::services::BookHandle,
    flow: &mut OrderFlow,
    orders: u64,
) -> Result<SimulationSummary, ServiceError> {
    let started = Instant::now();
    let mut summary = SimulationSummary {
        orders: 0,
        matched_orders: 0,
        counterparties: 0,
        rejected: 0,
        volume: Fixed::ZERO,
        last_price: Fixed::ZERO,
        middle_price: Fixed::ZERO,
        elapsed: Duration::ZERO,
    };

    for _ in 0..orders {
        let order = flow.next_order();
        summary.orders += 1;

        match handle.trade(order).await {
            Ok(Some(fills)) => {
                summary.matched_orders += 1;
                summary.counterparties += (fills.len() - 1) as u64;
                summary.volume += fills[0].filled;
            }
            Ok(None) => {}
            Err(ServiceError::Rejected(err)) => {
                tracing::debug!("订单被拒绝: {}", err);
                summary.rejected += 1;
            }
            Err(err) => return Err(err),
        }

        flow.reprice(handle.middle_price().await?);
    }

    summary.last_price = handle.last_price().await?;
    summary.middle_price = handle.middle_price().await?;
    summary.elapsed = started.elapsed();

    tracing::info!(
        orders = summary.orders,
        matched = summary.matched_orders,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "模拟完成"
    );

    Ok(summary)
}

fn print_config(config: &CliConfig) {
    println!("========================================");
    println!("  单品种限价订单簿模拟器 v0.1.0");
    println!("========================================");
    println!("订单数量:     {}", config.orders);
    println!(
        "随机种子:     {}",
        config.seed.map_or_else(|| "entropy".to_string(), |seed| seed.to_string())
    );
    println!("初始价格:     {}", config.start_price);
    println!("深度层数:     {}", config.depth);
    println!("输出格式:     {}", config.format);
    println!("日志级别:     {}", config.log_level);
    println!("========================================");
}

fn print_summary(summary: &SimulationSummary) {
    let seconds = summary.elapsed.as_secs_f64();
    let throughput = if seconds > 0.0 {
        summary.orders as f64 / seconds
    } else {
        0.0
    };

    println!("\n--- 模拟结果 ---");
    println!("订单数:       {}", summary.orders);
    println!("成交订单数:   {}", summary.matched_orders);
    println!("对手挂单数:   {}", summary.counterparties);
    println!("拒单数:       {}", summary.rejected);
    println!("成交量:       {}", summary.volume);
    println!("最新成交价:   {}", summary.last_price);
    println!("中间价:       {}", summary.middle_price);
    println!("吞吐量:       {:.2} orders/s", throughput);
}

/// 初始化日志系统
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
