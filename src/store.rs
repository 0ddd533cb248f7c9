//! Slot Store.
use byteorder::{ByteOrder, LittleEndian};
use rand::Rng;
use std::ops::Range;

use crate::slot::{SlotContent, SlotSnapshot, SLOT_WIDTH};

/// 固定長のスロット群と、スロット毎のメタデータ(使用中フラグ・ポインタタグ)を保持する構造体.
///
/// 単なるデータの入れ物であり、割当や解放のロジックは持たない.
/// 全てのインデックスは`0..N`の範囲内であることが呼び出し側によって保証される.
#[derive(Debug)]
pub(crate) struct SlotStore<const N: usize> {
    cells: [f64; N],
    used: [bool; N],
    is_pointer: [bool; N],
}
impl<const N: usize> SlotStore<N> {
    pub fn new() -> Self {
        SlotStore {
            cells: [0.0; N],
            used: [false; N],
            is_pointer: [false; N],
        }
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// 全スロットを未使用にした上で、各スロットの内容をランダムなビット列で上書きする.
    ///
    /// 生成されるのは妥当な数値の分布ではなく、単なるバイト列のかき混ぜであり、
    /// 「未初期化のメモリ」の見た目を再現するためのもの.
    pub fn scramble<R: Rng>(&mut self, rng: &mut R) {
        let mut bytes = [0; SLOT_WIDTH];
        for i in 0..N {
            for b in bytes.iter_mut() {
                *b = rng.gen::<u8>() % u8::MAX;
            }
            self.cells[i] = f64::from_bits(LittleEndian::read_u64(&bytes));
            self.used[i] = false;
            self.is_pointer[i] = false;
        }
    }

    pub fn is_used(&self, i: usize) -> bool {
        self.used[i]
    }

    pub fn set_used(&mut self, i: usize, used: bool) {
        self.used[i] = used;
    }

    pub fn is_pointer(&self, i: usize) -> bool {
        self.is_pointer[i]
    }

    pub fn set_pointer(&mut self, i: usize, is_pointer: bool) {
        self.is_pointer[i] = is_pointer;
    }

    pub fn used_slots(&self) -> &[bool] {
        &self.used[..]
    }

    pub fn cells(&self, range: Range<usize>) -> &[f64] {
        &self.cells[range]
    }

    pub fn cells_mut(&mut self, range: Range<usize>) -> &mut [f64] {
        &mut self.cells[range]
    }

    pub fn cell_bits(&self, i: usize) -> u64 {
        self.cells[i].to_bits()
    }

    pub fn set_cell_bits(&mut self, i: usize, bits: u64) {
        self.cells[i] = f64::from_bits(bits);
    }

    pub fn used_count(&self) -> usize {
        self.used.iter().filter(|&&u| u).count()
    }

    /// `i`番目のスロットのスナップショットを返す.
    ///
    /// ポインタとしてタグ付けされたスロットの内容は、参照先のインデックス
    /// (格納値からベースアドレスを引いたもの)として解釈される.
    /// ポインタは、ベースアドレスを`0`としたスロットインデックスとして格納されている.
    pub fn snapshot(&self, i: usize) -> SlotSnapshot {
        let used = self.used[i];
        let is_pointer = self.is_pointer[i];
        let content = if !used {
            None
        } else if is_pointer {
            Some(SlotContent::Reference(self.cell_bits(i) as i64))
        } else {
            Some(SlotContent::Value(self.cells[i]))
        };
        SlotSnapshot {
            index: i,
            used,
            is_pointer,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn it_works() {
        let mut store = SlotStore::<4>::new();
        assert_eq!(store.capacity(), 4);
        assert_eq!(store.used_count(), 0);

        store.set_used(1, true);
        store.set_cell_bits(1, 3);
        store.set_pointer(1, true);
        assert_eq!(store.used_count(), 1);
        assert_eq!(
            store.snapshot(1).content,
            Some(SlotContent::Reference(3))
        );

        store.set_pointer(1, false);
        store.cells_mut(1..2)[0] = 1.5;
        assert_eq!(store.snapshot(1).content, Some(SlotContent::Value(1.5)));
        assert_eq!(store.snapshot(0).content, None);
    }

    #[test]
    fn scramble_resets_metadata() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut store = SlotStore::<16>::new();
        for i in 0..16 {
            store.set_used(i, true);
            store.set_pointer(i, true);
        }
        store.scramble(&mut rng);
        assert_eq!(store.used_count(), 0);
        assert!((0..16).all(|i| !store.is_pointer(i)));

        // 各バイトは`0xFF`未満に収まっている
        for i in 0..16 {
            let mut bytes = [0; SLOT_WIDTH];
            LittleEndian::write_u64(&mut bytes, store.cell_bits(i));
            assert!(bytes.iter().all(|&b| b < 0xFF));
        }
        assert!((1..16).any(|i| store.cell_bits(i) != store.cell_bits(0)));
    }
}
