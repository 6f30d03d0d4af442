use crate::{
    constants::{
        BASE_ALPHABET, DEFAULT_SNP_FLAG, GT_PHASED_OFFSET, PASS_FILTER, QUAL_CODE_MAX, QUAL_DIVISOR,
    },
    core::record::VariantRecord,
    error::SnpxError,
    utils::util::Result,
};

/// One accepted record after field encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnpEntry {
    pub pos: i64,
    pub ref_base: u8,
    pub alt_base: u8,
    pub nref: i32,
    pub nalt: i32,
    pub gt: u8,
    pub flag: u8,
    pub qual: u8,
}

/// The eight parallel sequences describing the accepted SNPs of one
/// chromosome, in file order. Entry `i` of every vector describes the same
/// source record, so all vectors always have equal length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnpTrack {
    pub pos: Vec<i64>,
    pub ref_base: Vec<u8>,
    pub alt_base: Vec<u8>,
    pub nref: Vec<i32>,
    pub nalt: Vec<i32>,
    pub gt: Vec<u8>,
    pub flag: Vec<u8>,
    pub qual: Vec<u8>,
}

impl SnpTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    pub fn push(&mut self, entry: SnpEntry) {
        self.pos.push(entry.pos);
        self.ref_base.push(entry.ref_base);
        self.alt_base.push(entry.alt_base);
        self.nref.push(entry.nref);
        self.nalt.push(entry.nalt);
        self.gt.push(entry.gt);
        self.flag.push(entry.flag);
        self.qual.push(entry.qual);
    }
}

fn is_base_symbol(allele: &str) -> bool {
    allele.len() == 1 && BASE_ALPHABET.contains(&allele.as_bytes()[0])
}

/// Components 0 and 1 must exist and carry usable values. Uncalled genotype
/// alleles and the htslib missing-integer sentinel are both negative.
fn has_usable_pair(values: &[i32]) -> bool {
    values.len() >= 2 && values[0] >= 0 && values[1] >= 0
}

/// Genotype code `2*a + b`, plus [`GT_PHASED_OFFSET`] for a phased call:
/// 0/0, 0/1, 1/0, 1/1 map to 0-3 and 0|0, 0|1, 1|0, 1|1 to 4-7.
pub fn encode_genotype(allele0: i32, allele1: i32, phased: bool) -> u8 {
    let code = (2 * allele0 + allele1) as u8;
    if phased {
        code + GT_PHASED_OFFSET
    } else {
        code
    }
}

/// One-byte quality code: raw QUAL divided by [`QUAL_DIVISOR`], truncated
/// toward zero, capped at [`QUAL_CODE_MAX`]. Callers reject missing and
/// negative values before encoding.
pub fn encode_qual(qual: f32) -> u8 {
    ((qual / QUAL_DIVISOR) as u32).min(QUAL_CODE_MAX) as u8
}

/// Apply the acceptance filter to one record and encode it.
///
/// `Ok(None)` means the record is skipped: not PASS, not bi-allelic, the
/// alleles are not single base symbols, or the genotype/allele-depth fields
/// are absent or too short. Skipping is silent; only a missing or negative
/// QUAL on an otherwise accepted record is an error, since the quality of an
/// extracted SNP cannot be fabricated.
pub fn encode_record(record: &VariantRecord) -> Result<Option<SnpEntry>> {
    if !record.filters.iter().any(|f| f == PASS_FILTER) || record.alt_alleles.len() != 1 {
        return Ok(None);
    }
    let alt_allele = &record.alt_alleles[0];
    if !is_base_symbol(&record.ref_allele) || !is_base_symbol(alt_allele) {
        return Ok(None);
    }
    let (Some(genotype), Some(depths)) = (record.genotype.as_deref(), record.allele_depths.as_deref())
    else {
        return Ok(None);
    };
    if !has_usable_pair(genotype) || !has_usable_pair(depths) {
        return Ok(None);
    }

    let qual = record.qual.ok_or_else(|| SnpxError::MissingQuality {
        chrom: record.chrom.clone(),
        pos: record.pos,
    })?;
    if qual < 0.0 {
        return Err(SnpxError::NegativeQuality {
            chrom: record.chrom.clone(),
            pos: record.pos,
            qual,
        });
    }

    // Allele-depth components beyond REF and the single ALT are ignored.
    Ok(Some(SnpEntry {
        pos: record.pos,
        ref_base: record.ref_allele.as_bytes()[0],
        alt_base: alt_allele.as_bytes()[0],
        nref: depths[0],
        nalt: depths[1],
        gt: encode_genotype(genotype[0], genotype[1], record.phased),
        flag: DEFAULT_SNP_FLAG,
        qual: encode_qual(qual),
    }))
}
