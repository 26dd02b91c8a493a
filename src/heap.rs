//! Heap for firmware builds.
//!
//! The registry and task handles live on the heap. Boards without an
//! allocator enable the `global-heap` feature, which registers this
//! linked_list_allocator as the #[global_allocator], and call [`init`]
//! with a RAM region before creating any task.

use core::mem::MaybeUninit;
use linked_list_allocator::LockedHeap;

use crate::log_info;

#[cfg_attr(feature = "global-heap", global_allocator)]
static ALLOCATOR: LockedHeap = LockedHeap::empty();

/// Heap usage snapshot, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
    pub size: usize,
    pub used: usize,
    pub free: usize,
}

/// Hand `region` to the allocator. Call once, before the first allocation.
///
/// # Panics
/// If the heap has already been initialized.
pub fn init(region: &'static mut [MaybeUninit<u8>]) {
    ALLOCATOR.lock().init_from_slice(region);
    log_info!("[OK] Heap initialized ({} KiB)", stats().size / 1024);
}

pub fn stats() -> HeapStats {
    let heap = ALLOCATOR.lock();
    HeapStats {
        size: heap.size(),
        used: heap.used(),
        free: heap.free(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use alloc::vec;

    // Only test touching ALLOCATOR: init may run once per process.
    #[test]
    fn init_reports_region() {
        assert_eq!(stats().size, 0);

        let region = Box::leak(vec![MaybeUninit::<u8>::uninit(); 4096].into_boxed_slice());
        init(region);

        let stats = stats();
        assert!(stats.size > 4000 && stats.size <= 4096);
        assert_eq!(stats.used, 0);
        assert_eq!(stats.free, stats.size);
    }
}
