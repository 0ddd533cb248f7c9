use prometrics::metrics::MetricBuilder;
use slog::{Discard, Logger};

use super::SlotAllocator;
use crate::metrics::SlotAllocatorMetrics;
use crate::{ErrorKind, Result};

/// `SlotAllocator`のビルダ.
#[derive(Debug, Clone)]
pub struct SlotAllocatorBuilder {
    logger: Logger,
    metrics: MetricBuilder,
    seed: Option<u64>,
}
impl SlotAllocatorBuilder {
    /// 新しい`SlotAllocatorBuilder`インスタンスを生成する.
    pub fn new() -> Self {
        SlotAllocatorBuilder {
            logger: Logger::root(Discard, o!()),
            metrics: MetricBuilder::new(),
            seed: None,
        }
    }

    /// アロケータ用の logger を登録する.
    pub fn logger(&mut self, logger: Logger) -> &mut Self {
        self.logger = logger;
        self
    }

    /// メトリクス用の共通設定を登録する.
    ///
    /// デフォルト値は`MetricBuilder::new()`.
    pub fn metrics(&mut self, metrics: MetricBuilder) -> &mut Self {
        self.metrics = metrics;
        self
    }

    /// 乱数源のシードを固定する.
    ///
    /// 指定された場合には、`SlotAllocator::init()`の度に同じシードで乱数源が初期化されるため、
    /// 初期化後のスロットの内容や割当位置の系列が再現可能となる.
    ///
    /// 本メソッドが呼ばれていない場合は、初期化の度に現在時刻がシードとして使われる.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    /// 容量`MAX_SLOTS`の`SlotAllocator`を生成する.
    ///
    /// 生成されたアロケータは初期化済みであり、全てのスロットは未使用となっている.
    ///
    /// # Errors
    ///
    /// `MAX_SLOTS`が`0`の場合には、種類が`ErrorKind::InvalidInput`のエラーが返される.
    pub fn finish<const MAX_SLOTS: usize>(&self) -> Result<SlotAllocator<MAX_SLOTS>> {
        track_assert_ne!(MAX_SLOTS, 0, ErrorKind::InvalidInput);
        let metrics = SlotAllocatorMetrics::new(&self.metrics, MAX_SLOTS);
        let logger = self.logger.new(o!("capacity" => MAX_SLOTS));
        Ok(SlotAllocator::new(logger, metrics, self.seed))
    }
}
impl Default for SlotAllocatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use prometrics::metrics::MetricBuilder;
    use trackable::result::TestResult;

    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        let e = SlotAllocatorBuilder::new()
            .finish::<0>()
            .err()
            .map(|e| *e.kind());
        assert_eq!(e, Some(ErrorKind::InvalidInput));
    }

    #[test]
    fn metrics_are_registered() -> TestResult {
        let mut a = track!(SlotAllocatorBuilder::new()
            .metrics(MetricBuilder::new())
            .seed(0)
            .finish::<16>())?;
        track!(a.allocate(3))?;
        assert_eq!(a.metrics().allocated_blocks(), 1);
        assert_eq!(a.metrics().capacity_slots(), 16);
        assert!(a.metrics().probes() >= 1);
        Ok(())
    }
}
