//! Slot Memory Allocator.
//!
//! `slotmalloc`は、アロケータの割当状況とメモリの内容を可視化するための、教育用のメモリアロケータ.
//!
//! # 特徴
//!
//! - 固定長(コンパイル時に決定)のスロット列を唯一の記憶領域として使用する
//!   - 一つのスロットは8バイトで、`f64`の値一つ、あるいは他のスロットへの参照一つを格納可能
//!   - 割当の単位はバイトではなくスロット
//! - 空き領域の探索は、ランダムに選ばれた位置を起点とした線形探索で行われる
//!   - 常に先頭から詰めていくのではなく、断片化の様子を観察しやすくするため
//! - 各ブロックの前後には"番兵"スロットが要求され、割当時点で隣接ブロックとの間に隙間が保証される
//! - ブロックのサイズは記録されず、解放時には使用中のスロットが続く限り解放が行われる
//!   - 不正な解放(二重解放等)は検出されない
//! - スロットの占有状態と内容を、行単位のテキストグリッドとして表示可能
//! - 並行アクセスはサポートしない(全ての操作は単一スレッドから`&mut`経由で行う)
//!
//! # モジュールの依存関係
//!
//! ```text
//! grid => allocator => slot
//! ```
//!
//! - [allocator]モジュール:
//!   - 主に[SlotAllocator]構造体とそのビルダを提供
//!   - `slotmalloc`の利用者が直接触るのはこの構造体
//! - [grid]モジュール:
//!   - アロケータの状態を表示するための[OccupancyGrid]と[ValueGrid]を提供
//! - [slot]モジュール:
//!   - ポインタ([SlotPtr])やスロットの状態のスナップショット等の、基本的な型を提供
//!
//! # Examples
//!
//! ```
//! use slotmalloc::allocator::{SlotAllocator, SlotAllocatorBuilder};
//!
//! # fn main() -> slotmalloc::Result<()> {
//! let mut allocator: SlotAllocator = SlotAllocatorBuilder::new().finish()?;
//!
//! // 長さ17の`f64`配列
//! let x = allocator.allocate(8 * 17)?;
//! allocator.values_mut(x, 17)?[0] = 1.0;
//!
//! // `f64`配列へのポインタ二つ
//! let y = allocator.allocate(8 * 2)?;
//! allocator.tag_as_pointer_block(y, 2)?;
//! let y0 = allocator.allocate(8 * 2)?;
//! allocator.write_pointer(y, y0)?;
//!
//! println!("{}", allocator.occupancy_grid());
//! println!("{}", allocator.value_grid());
//!
//! allocator.free(x);
//! allocator.free(y0);
//! allocator.free(y);
//! assert_eq!(allocator.used_slots(), 0);
//! # Ok(())
//! # }
//! ```
//!
//! [allocator]: ./allocator/index.html
//! [SlotAllocator]: ./allocator/struct.SlotAllocator.html
//! [grid]: ./grid/index.html
//! [OccupancyGrid]: ./grid/struct.OccupancyGrid.html
//! [ValueGrid]: ./grid/struct.ValueGrid.html
//! [slot]: ./slot/index.html
//! [SlotPtr]: ./slot/struct.SlotPtr.html
#![warn(missing_docs)]
extern crate byteorder;
extern crate prometrics;
extern crate rand;
extern crate rand_chacha;
#[macro_use]
extern crate trackable;
#[macro_use]
extern crate slog;

pub use crate::error::{Error, ErrorKind};

macro_rules! track_io {
    ($expr:expr) => {
        $expr.map_err(|e: ::std::io::Error| track!(crate::Error::from(e)))
    };
}

pub mod allocator;
pub mod grid;
pub mod metrics;
pub mod slot;

mod error;
mod store;

/// crate固有の`Result`型.
pub type Result<T> = std::result::Result<T, Error>;
