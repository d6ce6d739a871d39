//! Prometheus Metrics Module
//!
//! 订单簿服务的核心指标
//!
//! ## 指标类型
//! - **Counter**: 订单数、成交对手数、撤单数、拒单数
//! - **Histogram**: 撮合延迟
//! - **Gauge**: 挂单数量 (买/卖)
//!
//! Only `BookService` records into these; the domain layer stays metric-free.
//!
//! ## 使用示例
//! ```rust,ignore
//! use limit_book::shared::metrics::METRICS;
//!
//! METRICS.orders_total.with_label_values(&["bid"]).inc();
//!
//! let timer = METRICS.matching_duration.start_timer();
//! // ... 执行撮合 ...
//! timer.observe_duration();
//! ```

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram, CounterVec, Encoder, GaugeVec,
    Histogram, TextEncoder,
};

lazy_static! {
    /// 全局Metrics实例
    pub static ref METRICS: Metrics = Metrics::new();
}

/// 订单簿核心指标
pub struct Metrics {
    /// 入场订单数 (按方向: ask/bid)
    pub orders_total: CounterVec,

    /// 被撮合的对手挂单数 (按对手方向)
    pub fills_total: CounterVec,

    /// 撤单数 (found / not_found)
    pub cancellations_total: CounterVec,

    /// 拒单数 (按原因)
    pub rejections_total: CounterVec,

    /// 撮合延迟分布 (微秒)
    pub matching_duration: Histogram,

    /// 当前挂单数量 (ask/bid)
    pub resting_orders: GaugeVec,
}

impl Metrics {
    /// 创建并注册到默认 registry
    ///
    /// Registration only fails on duplicate metric names, which the single
    /// `METRICS` instance rules out.
    pub fn new() -> Self {
        Self {
            orders_total: register_counter_vec!(
                "limit_book_orders_total",
                "Total number of incoming orders",
                &["side"]
            )
            .unwrap(),

            fills_total: register_counter_vec!(
                "limit_book_fills_total",
                "Total number of resting orders touched by matches",
                &["side"]
            )
            .unwrap(),

            cancellations_total: register_counter_vec!(
                "limit_book_cancellations_total",
                "Total number of cancel requests",
                &["status"]
            )
            .unwrap(),

            rejections_total: register_counter_vec!(
                "limit_book_rejections_total",
                "Total number of rejected incoming orders",
                &["reason"]
            )
            .unwrap(),

            matching_duration: register_histogram!(
                "limit_book_matching_duration_microseconds",
                "Order matching duration in microseconds",
                vec![1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0]
            )
            .unwrap(),

            resting_orders: register_gauge_vec!(
                "limit_book_resting_orders",
                "Current number of resting orders",
                &["side"]
            )
            .unwrap(),
        }
    }

    /// 导出Prometheus文本格式的指标
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        let mut buffer = vec![];
        if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
            tracing::warn!("metrics encoding failed: {}", err);
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}
