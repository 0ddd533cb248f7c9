//! Slot Allocator.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slog::Logger;
use std::ops::Range;
use std::time::{SystemTime, UNIX_EPOCH};

use super::probe::find_free_run;
use crate::grid::{OccupancyGrid, ValueGrid};
use crate::metrics::SlotAllocatorMetrics;
use crate::slot::{slot_count, Occupancy, SlotPtr, SlotSnapshot};
use crate::store::SlotStore;
use crate::{ErrorKind, Result};

/// スロットストアの容量(スロット数)のデフォルト値.
pub const DEFAULT_MAX_SLOTS: usize = 450;

/// 固定長のスロットストア上で動作する、教育用のアロケータ.
///
/// 容量`MAX_SLOTS`はコンパイル時に決定され、実行時に変更することはできない.
/// インスタンスの構築には[`SlotAllocatorBuilder`]を使用する.
///
/// # 割当戦略
///
/// 割当要求が発行されると、まず要求バイト数を必要なスロット数`n`に切り上げた上で、
/// ランダムに選ばれた位置を起点として、`n + 2`スロット分連続した空き領域を線形に探索する.
///
/// 見つかった領域の先頭と末尾の一スロットずつは"番兵"であり、
/// 実際に使用中となるのはその間の`n`スロットのみである.
/// 番兵は割当時点で隣接ブロックとの間に最低一つの空きスロットがあることを保証するためだけに存在し、
/// 割当後は即座に別の割当の番兵として再利用され得る.
/// 番兵の位置は常に未使用でなければならないため、生存中の二つのブロックのペイロードの間には
/// 必ず一つ以上の空きスロットが残る.
///
/// # ブロックの管理
///
/// ブロックのサイズは記録されない.
/// 解放時には、指定された位置から「使用中のスロットが続く限り」前方に向かって解放が行われる.
///
/// 正しいポインタの解放では、ブロック直後の空きスロットで走査が止まるため、ちょうどそのブロックだけが解放される.
/// 一方で、以下のような不正な解放は検出されず、無関係なスロットを解放してしまうことがある:
///
/// - 二重解放: 解放済みの領域が別のブロックに再利用されていると、そのブロックが解放される
/// - ブロックの途中や、任意の位置を指すポインタの解放
///
/// # 並行性
///
/// 全ての操作は単一のスレッドから、`&mut self`経由で逐次的に行われることを前提としている.
/// 内部でのロック等は一切行わない.
///
/// [`SlotAllocatorBuilder`]: ./struct.SlotAllocatorBuilder.html
#[derive(Debug)]
pub struct SlotAllocator<const MAX_SLOTS: usize = DEFAULT_MAX_SLOTS> {
    store: SlotStore<MAX_SLOTS>,
    rng: ChaCha8Rng,
    fixed_seed: Option<u64>,
    logger: Logger,
    metrics: SlotAllocatorMetrics,
}
impl<const MAX_SLOTS: usize> SlotAllocator<MAX_SLOTS> {
    pub(crate) fn new(
        logger: Logger,
        metrics: SlotAllocatorMetrics,
        fixed_seed: Option<u64>,
    ) -> Self {
        let mut allocator = SlotAllocator {
            store: SlotStore::new(),
            rng: ChaCha8Rng::seed_from_u64(0),
            fixed_seed,
            logger,
            metrics,
        };
        allocator.init();
        allocator
    }

    /// アロケータを初期化する.
    ///
    /// 乱数源を現在時刻(ビルダでシードが固定されている場合にはその値)で初期化し、
    /// 全てのスロットを未使用にした上で、各スロットの内容をランダムなバイト列で上書きする.
    ///
    /// 構築時に一度呼び出されているので、明示的に呼び出す必要があるのはアロケータを再利用したい場合のみ.
    /// それまでに割り当てられていたポインタは、全て無効となる.
    pub fn init(&mut self) {
        let seed = self.fixed_seed.unwrap_or_else(seed_from_clock);
        self.rng = ChaCha8Rng::seed_from_u64(seed);

        let discarded = self.store.used_count();
        self.store.scramble(&mut self.rng);
        self.metrics.count_init(discarded);
        info!(self.logger, "Initialized slot allocator";
              "seed" => seed, "capacity" => MAX_SLOTS, "discarded_slots" => discarded);
    }

    /// `n_bytes`分のペイロードを格納可能なブロックを割り当てる.
    ///
    /// 返り値は、ブロックの先頭ペイロードスロットを指すポインタ.
    /// 割り当てられたスロットは全て使用中となり、ポインタのタグは外される.
    ///
    /// `0`バイトの要求は、`1`スロットの要求として扱われる.
    ///
    /// # Errors
    ///
    /// 容量全体を探索しても十分な空き領域が見つからなかった場合には、
    /// 種類が`ErrorKind::OutOfMemory`のエラーが返される.
    /// この場合、スロットの状態は一切変更されない.
    pub fn allocate(&mut self, n_bytes: usize) -> Result<SlotPtr> {
        let slots = slot_count(n_bytes);
        let origin = self.rng.gen_range(0..MAX_SLOTS);
        let outcome = find_free_run(self.store.used_slots(), origin, slots + 2);

        let start = if let Some(start) = outcome.start {
            start
        } else {
            self.metrics.count_failure(outcome.probes);
            warn!(self.logger, "Out of memory";
                  "bytes" => n_bytes, "slots" => slots, "origin" => origin,
                  "used_slots" => self.store.used_count());
            track_panic!(
                ErrorKind::OutOfMemory,
                "No free run of {} slots: bytes={}, capacity={}",
                slots + 2,
                n_bytes,
                MAX_SLOTS
            );
        };

        // 前後の番兵(`start`と`start + slots + 1`)は未使用のまま残す
        for i in start + 1..=start + slots {
            self.store.set_used(i, true);
            self.store.set_pointer(i, false);
        }
        self.metrics.count_allocation(slots, outcome.probes);

        let ptr = SlotPtr::from(start + 1);
        debug!(self.logger, "Allocated {} slots at {}", slots, ptr;
               "bytes" => n_bytes, "origin" => origin, "probes" => outcome.probes);
        Ok(ptr)
    }

    /// `ptr`から`count`スロット分を、ポインタとして表示されるようにタグ付けする.
    ///
    /// 表示上の区別のためだけのものであり、割当や解放の挙動には影響しない.
    ///
    /// `count`が元々割り当てられたブロックのサイズを超えていないかどうかの検査は行われない.
    ///
    /// # Errors
    ///
    /// 対象範囲がスロットストアの範囲外にはみ出す場合には、種類が`ErrorKind::InvalidInput`のエラーが返される.
    /// この場合、タグは一切変更されない.
    pub fn tag_as_pointer_block(&mut self, ptr: SlotPtr, count: usize) -> Result<()> {
        let range = track!(self.range(ptr, count))?;
        for i in range {
            self.store.set_pointer(i, true);
        }
        Ok(())
    }

    /// `ptr`が指すブロックを解放する.
    ///
    /// `ptr`の位置から、スロットストアの終端に達するか、未使用のスロットに出会うまで、
    /// 前方に向かってスロットを未使用にしていく.
    ///
    /// `ptr`が以前に`allocate`が返したものかどうかの検証は行われず、エラーも返さない.
    /// 不正なポインタが渡された場合の挙動については[`SlotAllocator`]のドキュメントを参照のこと.
    ///
    /// [`SlotAllocator`]: ./struct.SlotAllocator.html
    pub fn free(&mut self, ptr: SlotPtr) {
        let mut i = ptr.index();
        while i < MAX_SLOTS && self.store.is_used(i) {
            self.store.set_used(i, false);
            i += 1;
        }
        let released = i.saturating_sub(ptr.index());
        self.metrics.count_release(released);
        debug!(self.logger, "Released {} slots at {}", released, ptr);
    }

    /// スロット毎の占有状態を、先頭から順に列挙する.
    pub fn occupancy_snapshot(&self) -> impl Iterator<Item = Occupancy> + '_ {
        (0..MAX_SLOTS).map(move |i| self.store.snapshot(i).occupancy())
    }

    /// スロット毎の状態(使用中か、ポインタか、値あるいは参照先インデックス)を、先頭から順に列挙する.
    pub fn value_snapshot(&self) -> impl Iterator<Item = SlotSnapshot> + '_ {
        (0..MAX_SLOTS).map(move |i| self.store.snapshot(i))
    }

    /// `index`番目のスロットの状態を返す.
    ///
    /// 範囲外の場合には`None`が返される.
    pub fn snapshot(&self, index: usize) -> Option<SlotSnapshot> {
        if index < MAX_SLOTS {
            Some(self.store.snapshot(index))
        } else {
            None
        }
    }

    /// スロットの占有状態を表示するためのグリッドを返す.
    pub fn occupancy_grid(&self) -> OccupancyGrid<'_, MAX_SLOTS> {
        OccupancyGrid::new(self)
    }

    /// スロットの値を表示するためのグリッドを返す.
    pub fn value_grid(&self) -> ValueGrid<'_, MAX_SLOTS> {
        ValueGrid::new(self)
    }

    /// `ptr`から`len`スロット分の値を返す.
    pub fn values(&self, ptr: SlotPtr, len: usize) -> Result<&[f64]> {
        let range = track!(self.range(ptr, len))?;
        Ok(self.store.cells(range))
    }

    /// `ptr`から`len`スロット分の値への可変参照を返す.
    pub fn values_mut(&mut self, ptr: SlotPtr, len: usize) -> Result<&mut [f64]> {
        let range = track!(self.range(ptr, len))?;
        Ok(self.store.cells_mut(range))
    }

    /// `ptr`の位置に格納されている値を返す.
    pub fn read_value(&self, ptr: SlotPtr) -> Result<f64> {
        let values = track!(self.values(ptr, 1))?;
        Ok(values[0])
    }

    /// `ptr`の位置に値を書き込む.
    pub fn write_value(&mut self, ptr: SlotPtr, value: f64) -> Result<()> {
        let values = track!(self.values_mut(ptr, 1))?;
        values[0] = value;
        Ok(())
    }

    /// `at`の位置に、`target`への参照を書き込む.
    ///
    /// 参照は`target`のスロットインデックスとして格納される.
    /// `at`がポインタとしてタグ付けされていれば、値の表示では`target`のインデックスが表示される.
    pub fn write_pointer(&mut self, at: SlotPtr, target: SlotPtr) -> Result<()> {
        let range = track!(self.range(at, 1))?;
        self.store.set_cell_bits(range.start, target.as_u64());
        Ok(())
    }

    /// `at`の位置に格納されている参照を返す.
    ///
    /// 何も書き込まれていないスロットの場合には、初期化時のランダムな値がそのまま解釈される.
    pub fn read_pointer(&self, at: SlotPtr) -> Result<SlotPtr> {
        let range = track!(self.range(at, 1))?;
        Ok(SlotPtr::from(self.store.cell_bits(range.start) as usize))
    }

    /// スロットストアの容量を返す.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// 現在使用中のスロット数を返す.
    pub fn used_slots(&self) -> usize {
        self.store.used_count()
    }

    /// `index`番目のスロットが使用中かどうかを返す.
    ///
    /// 範囲外の場合には`false`が返される.
    pub fn is_used(&self, index: usize) -> bool {
        index < MAX_SLOTS && self.store.is_used(index)
    }

    /// `index`番目のスロットがポインタとしてタグ付けされているかどうかを返す.
    ///
    /// 範囲外の場合には`false`が返される.
    pub fn is_pointer(&self, index: usize) -> bool {
        index < MAX_SLOTS && self.store.is_pointer(index)
    }

    /// アロケータ用のメトリクスを返す.
    pub fn metrics(&self) -> &SlotAllocatorMetrics {
        &self.metrics
    }

    fn range(&self, ptr: SlotPtr, len: usize) -> Result<Range<usize>> {
        let end = track_assert_some!(
            ptr.index().checked_add(len),
            ErrorKind::InvalidInput,
            "Too large range: ptr={}, len={}",
            ptr,
            len
        );
        track_assert!(end <= MAX_SLOTS, ErrorKind::InvalidInput; ptr, len, MAX_SLOTS);
        Ok(ptr.index()..end)
    }
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
