//! [Prometheus][prometheus]用のメトリクス.
//!
//! [prometheus]: https://prometheus.io/
use prometrics::metrics::{Counter, MetricBuilder};

/// [`SlotAllocator`]のメトリクス.
///
/// [`SlotAllocator`]: ../allocator/struct.SlotAllocator.html
#[derive(Debug, Clone)]
pub struct SlotAllocatorMetrics {
    pub(crate) inits: Counter,
    pub(crate) allocated_blocks: Counter,
    pub(crate) allocated_slots: Counter,
    pub(crate) free_calls: Counter,
    pub(crate) released_slots: Counter,
    pub(crate) probes: Counter,
    pub(crate) nospace_failures: Counter,
    pub(crate) capacity_slots: usize,
}
impl SlotAllocatorMetrics {
    /// スロットストアの容量(スロット数).
    pub fn capacity_slots(&self) -> usize {
        self.capacity_slots
    }

    /// 初期化の回数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// slotmalloc_allocator_inits_total <COUNTER>
    /// ```
    pub fn inits(&self) -> u64 {
        self.inits.value() as u64
    }

    /// ブロックの割当回数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// slotmalloc_allocator_allocated_blocks_total <COUNTER>
    /// ```
    pub fn allocated_blocks(&self) -> u64 {
        self.allocated_blocks.value() as u64
    }

    /// これまでに割り当てたペイロードスロットの数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// slotmalloc_allocator_allocated_slots_total <COUNTER>
    /// ```
    pub fn allocated_slots(&self) -> u64 {
        self.allocated_slots.value() as u64
    }

    /// 解放操作の呼び出し回数.
    ///
    /// 二重解放等の不正な呼び出しも含まれる.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// slotmalloc_allocator_free_calls_total <COUNTER>
    /// ```
    pub fn free_calls(&self) -> u64 {
        self.free_calls.value() as u64
    }

    /// これまでに解放されたスロットの数.
    ///
    /// 再初期化によって未使用に戻されたスロットも含まれる.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// slotmalloc_allocator_released_slots_total <COUNTER>
    /// ```
    pub fn released_slots(&self) -> u64 {
        self.released_slots.value() as u64
    }

    /// 割当時に検査した候補開始位置の数の合計.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// slotmalloc_allocator_probes_total <COUNTER>
    /// ```
    pub fn probes(&self) -> u64 {
        self.probes.value() as u64
    }

    /// 空き領域不足による割当失敗回数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// slotmalloc_allocator_nospace_failures_total <COUNTER>
    /// ```
    pub fn nospace_failures(&self) -> u64 {
        self.nospace_failures.value() as u64
    }

    /// 現在使用中のスロット数.
    ///
    /// 割当スロット数と解放スロット数の差分.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// slotmalloc_allocator_allocated_slots_total - slotmalloc_allocator_released_slots_total
    /// ```
    pub fn usage_slots(&self) -> u64 {
        self.allocated_slots() - self.released_slots()
    }

    pub(crate) fn new(builder: &MetricBuilder, capacity_slots: usize) -> Self {
        let mut builder = builder.clone();
        builder.namespace("slotmalloc").subsystem("allocator");
        SlotAllocatorMetrics {
            inits: builder
                .counter("inits_total")
                .help("Number of (re-)initializations")
                .finish()
                .expect("Never fails"),
            allocated_blocks: builder
                .counter("allocated_blocks_total")
                .help("Number of allocated blocks")
                .finish()
                .expect("Never fails"),
            allocated_slots: builder
                .counter("allocated_slots_total")
                .help("Number of allocated payload slots")
                .finish()
                .expect("Never fails"),
            free_calls: builder
                .counter("free_calls_total")
                .help("Number of free calls")
                .finish()
                .expect("Never fails"),
            released_slots: builder
                .counter("released_slots_total")
                .help("Number of released slots")
                .finish()
                .expect("Never fails"),
            probes: builder
                .counter("probes_total")
                .help("Number of candidate start slots inspected by allocations")
                .finish()
                .expect("Never fails"),
            nospace_failures: builder
                .counter("nospace_failures_total")
                .help("Number of allocation failures caused by no available space")
                .finish()
                .expect("Never fails"),
            capacity_slots,
        }
    }

    pub(crate) fn count_allocation(&self, slots: usize, probes: usize) {
        self.allocated_blocks.increment();
        self.allocated_slots.add_u64(slots as u64);
        self.probes.add_u64(probes as u64);
    }

    pub(crate) fn count_failure(&self, probes: usize) {
        self.nospace_failures.increment();
        self.probes.add_u64(probes as u64);
    }

    pub(crate) fn count_release(&self, slots: usize) {
        self.free_calls.increment();
        self.released_slots.add_u64(slots as u64);
    }

    pub(crate) fn count_init(&self, discarded_slots: usize) {
        self.inits.increment();
        self.released_slots.add_u64(discarded_slots as u64);
    }
}
