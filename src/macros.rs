macro_rules! auto_increment {
    () => {{
        use std::sync::atomic::{AtomicU32, Ordering};

        static COUNTER: AtomicU32 = AtomicU32::new(1);
        // Skip 0 after wrapping around.
        std::num::NonZeroU32::new(COUNTER.fetch_add(1, Ordering::Relaxed))
            .unwrap_or(std::num::NonZeroU32::MIN)
    }};
}
