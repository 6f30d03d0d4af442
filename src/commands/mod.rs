mod extract;
mod info;

pub use extract::extract;
pub use info::info;
