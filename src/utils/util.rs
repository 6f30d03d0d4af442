use crate::error::SnpxResult;
use log;
use std::{fmt::Display, sync::Once};

pub type Result<T> = SnpxResult<T>;

/// htslib sentinel for a missing integer value in INFO/FORMAT arrays.
pub const MISSING_INTEGER: i32 = i32::MIN;
/// htslib sentinel padding integer FORMAT arrays up to their fixed width.
pub const VECTOR_END_INTEGER: i32 = i32::MIN + 1;
/// htslib bit pattern for a missing float value (a tagged NaN).
pub const MISSING_FLOAT: f32 = f32::from_bits(0x7F80_0001);

#[allow(unused)]
static INIT_LOG: Once = Once::new();

#[allow(unused)]
pub fn init_logger() {
    INIT_LOG.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .init();
    });
}

pub fn handle_error_and_exit(err: impl Display) -> ! {
    log::error!("{err}");
    std::process::exit(1);
}
