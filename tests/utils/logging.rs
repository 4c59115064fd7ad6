use std::sync::Once;

static INIT: Once = Once::new();

/// Routes the crate's `debug!`/`trace!` output to the test harness. Run with
/// `RUST_LOG=rdkafka_conf=trace` to see teardown steps.
pub fn init_test_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .try_init()
            .expect("Failed to initialize env_logger");
    });
}
