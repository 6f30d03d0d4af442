use crate::utils::util::Result;

/// Allele index of an uncalled genotype component (`.` in the call).
pub const MISSING_ALLELE: i32 = -1;

/// Read-only view of one variant record, with per-sample fields already
/// resolved for the designated sample. This is all the extractor ever sees
/// of the underlying container.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    pub chrom: String,
    /// 1-based position.
    pub pos: i64,
    pub ref_allele: String,
    pub alt_alleles: Vec<String>,
    /// FILTER entries by name; empty when the column is `.`.
    pub filters: Vec<String>,
    /// QUAL, `None` when the file stores no value.
    pub qual: Option<f32>,
    /// Genotype allele indices, `None` when the record carries no genotype
    /// for the sample. Uncalled components are [`MISSING_ALLELE`].
    pub genotype: Option<Vec<i32>>,
    pub phased: bool,
    /// Allele-depth counts ordered REF then ALT alleles, `None` when absent.
    pub allele_depths: Option<Vec<i32>>,
}

/// Capability interface over a variant container: header metadata plus a
/// visitor-driven scan of its records. Implemented by the htslib-backed
/// [`crate::io::vcf_reader::VcfReader`] and by in-memory fakes in tests.
pub trait VariantSource {
    /// Header-declared contig order.
    fn chromosomes(&self) -> &[String];

    /// Header-declared sample order.
    fn samples(&self) -> &[String];

    /// Visit every record of `chromosome` (or of the whole file, in on-disk
    /// order, when `None`), resolving per-sample fields for the sample at
    /// `sample`. The first error from the source or from `visit` aborts the
    /// scan.
    fn scan<F>(&mut self, chromosome: Option<&str>, sample: usize, visit: F) -> Result<()>
    where
        F: FnMut(VariantRecord) -> Result<()>;
}
