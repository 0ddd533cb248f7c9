//! アロケータの典型的な使い方を実演し、その状態を表示するプログラム.
//!
//! 空き領域が不足した場合には`Out of memory!`を表示して、終了コード`1`で終了する.
extern crate slotmalloc;
#[macro_use]
extern crate trackable;

use slotmalloc::allocator::{SlotAllocator, SlotAllocatorBuilder};
use slotmalloc::slot::SlotPtr;
use slotmalloc::{ErrorKind, Result};
use std::process;

fn run(allocator: &mut SlotAllocator) -> Result<()> {
    // 長さ17の配列
    let n = 17;
    let x = track!(allocator.allocate(8 * n))?;
    for (i, v) in track!(allocator.values_mut(x, n))?.iter_mut().enumerate() {
        *v = i as f64 * 0.5;
    }

    // 配列へのポインタ二つ
    let y = track!(allocator.allocate(8 * 2))?;
    track!(allocator.tag_as_pointer_block(y, 2))?;

    // それぞれのポインタが指す先を割り当てる
    let y0 = track!(allocator.allocate(8 * 2))?;
    let y1 = track!(allocator.allocate(8 * 3))?;
    track!(allocator.write_pointer(y, y0))?;
    track!(allocator.write_pointer(y + 1, y1))?;
    track!(allocator.values_mut(y0, 2))?.copy_from_slice(&[1.0, 2.0]);
    track!(allocator.values_mut(y1, 3))?.copy_from_slice(&[3.0, 4.0, 5.0]);

    print!("{}", allocator.occupancy_grid());
    print!("{}", allocator.value_grid());

    // 全て解放する
    allocator.free(x);
    for i in 0..2 {
        let p: SlotPtr = track!(allocator.read_pointer(y + i))?;
        allocator.free(p);
    }
    allocator.free(y);

    print!("{}", allocator.occupancy_grid());
    Ok(())
}

fn main() {
    let mut allocator: SlotAllocator = track_try_unwrap!(SlotAllocatorBuilder::new().finish());
    if let Err(e) = run(&mut allocator) {
        if *e.kind() == ErrorKind::OutOfMemory {
            println!("Out of memory!");
        } else {
            eprintln!("{}", e);
        }
        process::exit(1);
    }
}
