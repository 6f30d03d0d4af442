/// Base symbols accepted for the reference and alternate allele of an
/// extracted SNP. Case-sensitive; `.` is the spanning-deletion placeholder.
pub const BASE_ALPHABET: [u8; 5] = *b"ATGC.";

/// Raw QUAL is divided by this factor before truncation to one byte.
pub const QUAL_DIVISOR: f32 = 10.0;

/// Upper bound of the one-byte quality scale.
pub const QUAL_CODE_MAX: u32 = 255;

/// Flag bit 0: SNP is present in the reference SNP database.
pub const FLAG_IN_DB: u8 = 0b01;

/// Flag bit 1: SNP falls in the P region of the strict mask.
pub const FLAG_P_REGION: u8 = 0b10;

/// Flag assigned to every extracted SNP. The P-region bit is set by default;
/// a database annotation step downstream may set [`FLAG_IN_DB`] later.
pub const DEFAULT_SNP_FLAG: u8 = FLAG_P_REGION;

/// Added to the genotype code when the call is phased, so unphased codes
/// occupy 0-3 and phased codes 4-7.
pub const GT_PHASED_OFFSET: u8 = 4;

/// Filter name a record must carry to be extracted.
pub const PASS_FILTER: &str = "PASS";
