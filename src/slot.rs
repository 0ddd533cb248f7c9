//! スロット(割当の最小単位)関連の構成要素.
use std::fmt;
use std::ops::Add;

/// 一つのスロットのバイト幅.
///
/// 一つのスロットには、`f64`の値一つ、あるいは他のスロットへの参照一つを格納可能.
pub const SLOT_WIDTH: usize = 8;

/// 要求バイト数を、それを格納するのに必要なスロット数に変換する.
///
/// `0`バイトの要求は、最小単位である`1`スロットに切り上げられる.
///
/// # Examples
///
/// ```
/// use slotmalloc::slot::slot_count;
///
/// assert_eq!(slot_count(0), 1);
/// assert_eq!(slot_count(1), 1);
/// assert_eq!(slot_count(8), 1);
/// assert_eq!(slot_count(9), 2);
/// assert_eq!(slot_count(16), 2);
/// ```
pub fn slot_count(n_bytes: usize) -> usize {
    n_bytes.saturating_sub(1) / SLOT_WIDTH + 1
}

/// アロケータが返すポインタ.
///
/// 実体は、スロットストア内のスロットの位置(0始まりのインデックス).
///
/// 割当の結果として返される値は、常にブロックの先頭ペイロードスロットを指している.
#[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct SlotPtr(usize);
impl SlotPtr {
    /// スロットのインデックスを返す.
    pub fn index(self) -> usize {
        self.0
    }

    /// スロットのインデックスを、スロットストア内の要素として保持可能な64bitの値に変換する.
    pub fn as_u64(self) -> u64 {
        self.0 as u64
    }

    /// `offset`スロット分だけ後方を指すポインタを返す.
    ///
    /// # Panics
    ///
    /// 結果がオーバーフローする場合には、現在のスレッドがパニックする.
    pub fn offset(self, offset: usize) -> Self {
        SlotPtr(self.0.checked_add(offset).expect("slot index overflow"))
    }
}
impl From<usize> for SlotPtr {
    fn from(from: usize) -> Self {
        SlotPtr(from)
    }
}
impl Add<usize> for SlotPtr {
    type Output = Self;
    fn add(self, rhs: usize) -> Self {
        self.offset(rhs)
    }
}
impl fmt::Display for SlotPtr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// スロットの占有状態.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupancy {
    /// 未使用.
    Empty,

    /// 使用中、かつポインタとして表示される.
    Pointer,

    /// 使用中(数値).
    Used,
}
impl Occupancy {
    /// 表示用の一文字を返す.
    pub fn glyph(self) -> char {
        match self {
            Occupancy::Empty => '.',
            Occupancy::Pointer => 'p',
            Occupancy::Used => 'x',
        }
    }
}

/// 使用中のスロットに格納されている内容の解釈.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotContent {
    /// 数値として解釈された内容.
    Value(f64),

    /// 他のスロットへの参照として解釈された内容(参照先のインデックス).
    ///
    /// ポインタとしてタグ付けされたが、まだ何も書き込まれていないスロットの場合には、
    /// 初期化時のランダムなビット列がそのまま(符号付き整数として)現れる.
    Reference(i64),
}

/// 一つのスロットの状態のスナップショット.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotSnapshot {
    /// スロットのインデックス.
    pub index: usize,

    /// ブロックの一部として使用中かどうか.
    pub used: bool,

    /// ポインタとしてタグ付けされているかどうか.
    ///
    /// `used`が`false`の場合には意味を持たない.
    pub is_pointer: bool,

    /// 使用中のスロットの内容.
    ///
    /// 未使用のスロットの場合は`None`.
    pub content: Option<SlotContent>,
}
impl SlotSnapshot {
    /// スロットの占有状態を返す.
    pub fn occupancy(&self) -> Occupancy {
        match (self.used, self.is_pointer) {
            (false, _) => Occupancy::Empty,
            (true, true) => Occupancy::Pointer,
            (true, false) => Occupancy::Used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_count_rounds_up() {
        assert_eq!(slot_count(0), 1);
        for n in 1..=8 {
            assert_eq!(slot_count(n), 1);
        }
        assert_eq!(slot_count(9), 2);
        assert_eq!(slot_count(17 * 8), 17);
        assert_eq!(slot_count(17 * 8 + 1), 18);
    }

    #[test]
    fn ptr_works() {
        let p = SlotPtr::from(10);
        assert_eq!(p.index(), 10);
        assert_eq!(p.as_u64(), 10);
        assert_eq!(p + 2, SlotPtr::from(12));
        assert_eq!(p.to_string(), "#10");
    }

    #[test]
    #[should_panic]
    fn ptr_overflow() {
        let _ = SlotPtr::from(usize::MAX) + 1;
    }

    #[test]
    fn occupancy_of_snapshot() {
        let mut s = SlotSnapshot {
            index: 0,
            used: false,
            is_pointer: true,
            content: None,
        };
        assert_eq!(s.occupancy(), Occupancy::Empty);
        s.used = true;
        assert_eq!(s.occupancy(), Occupancy::Pointer);
        s.is_pointer = false;
        assert_eq!(s.occupancy(), Occupancy::Used);
        assert_eq!(s.occupancy().glyph(), 'x');
    }
}
