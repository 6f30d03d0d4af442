pub mod cli;
pub mod commands;
pub mod error;

pub mod core {
    pub mod extractor;
    pub mod record;
    pub mod snp;
}

pub mod io {
    pub mod snp_writer;
    pub mod vcf_reader;
}

pub mod utils {
    pub mod util;
}

pub mod constants;

pub use constants::*;
