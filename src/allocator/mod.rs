//! スロットストア用のアロケータ.
//!
//! アロケータは、固定長のスロットストアを排他的に所有し、
//! 割当要求に対して、その中から必要なサイズの連続したスロット群(ブロック)を割り当てる責務を負っている.
//!
//! 利用者が受け取るのはスロットのインデックスを表す[SlotPtr]のみであり、
//! スロットのメタデータ(使用中フラグやポインタタグ)を直接操作することはできない.
//!
//! [SlotPtr]: ../slot/struct.SlotPtr.html
pub use self::builder::SlotAllocatorBuilder;
pub use self::slot_allocator::{SlotAllocator, DEFAULT_MAX_SLOTS};

mod builder;
mod probe;
mod slot_allocator;
