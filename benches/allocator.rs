#![feature(test)]
extern crate slotmalloc;
extern crate test;
#[macro_use]
extern crate trackable;

use slotmalloc::allocator::{SlotAllocator, SlotAllocatorBuilder};
use test::Bencher;

#[bench]
fn allocate_and_free_small(b: &mut Bencher) {
    let mut allocator: SlotAllocator = track_try_unwrap!(SlotAllocatorBuilder::new().finish());
    b.iter(|| {
        let p = track_try_unwrap!(allocator.allocate(8));
        allocator.free(p);
    });
}

#[bench]
fn allocate_and_free_large(b: &mut Bencher) {
    let mut allocator: SlotAllocator = track_try_unwrap!(SlotAllocatorBuilder::new().finish());
    b.iter(|| {
        let p = track_try_unwrap!(allocator.allocate(8 * 100));
        allocator.free(p);
    });
}

#[bench]
fn allocate_until_exhausted(b: &mut Bencher) {
    let mut allocator: SlotAllocator = track_try_unwrap!(SlotAllocatorBuilder::new().finish());
    b.iter(|| {
        allocator.init();
        while allocator.allocate(16).is_ok() {}
    });
}

#[bench]
fn render_value_grid(b: &mut Bencher) {
    let mut allocator: SlotAllocator = track_try_unwrap!(SlotAllocatorBuilder::new().finish());
    for _ in 0..20 {
        track_try_unwrap!(allocator.allocate(8 * 5));
    }
    b.iter(|| allocator.value_grid().to_string());
}
