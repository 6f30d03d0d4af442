use crate::{
    core::{
        record::VariantSource,
        snp::{encode_record, SnpTrack},
    },
    error::SnpxError,
    utils::util::Result,
};
use std::mem;

/// Streams records out of a [`VariantSource`] and accumulates the accepted
/// ones into per-chromosome [`SnpTrack`]s. A single forward pass, no
/// backtracking; the source is re-scanned from the start on every call, so
/// repeated extraction from the same file is possible and idempotent.
pub struct SnpExtractor<S> {
    source: S,
}

impl<S: VariantSource> SnpExtractor<S> {
    pub fn new(source: S) -> Self {
        SnpExtractor { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// An unset or empty sample name selects the first header sample.
    fn resolve_sample(&self, sample: Option<&str>) -> Result<usize> {
        let samples = self.source.samples();
        match sample {
            Some(name) if !name.is_empty() => samples
                .iter()
                .position(|s| s == name)
                .ok_or_else(|| SnpxError::UnknownSample {
                    name: name.to_string(),
                }),
            _ if samples.is_empty() => Err(SnpxError::NoSamples),
            _ => Ok(0),
        }
    }

    /// Extract the accepted SNPs of one chromosome, in file order.
    ///
    /// The track may be empty when the chromosome has no records or none
    /// pass the filter. When the underlying iteration cannot proceed (for
    /// example a missing or corrupted index) the whole operation fails; no
    /// partial track is returned.
    pub fn extract_chromosome(&mut self, chromosome: &str, sample: Option<&str>) -> Result<SnpTrack> {
        let sample = self.resolve_sample(sample)?;
        let mut track = SnpTrack::new();
        self.source.scan(Some(chromosome), sample, |record| {
            if let Some(entry) = encode_record(&record)? {
                track.push(entry);
            }
            Ok(())
        })?;
        log::debug!("{chromosome}: extracted {} SNPs", track.len());
        Ok(track)
    }

    /// Single pass over the whole file in on-disk order, invoking `callback`
    /// with the finished (possibly empty) track every time the chromosome
    /// changes, and once more at the end when entries remain accumulated.
    /// Relies on the file already being chromosome-grouped, as sorted
    /// variant files are. Returns the number of callback invocations.
    ///
    /// Iteration failures abort the pass with no delivery guarantee for
    /// chromosomes not yet flushed.
    pub fn extract_all<F>(&mut self, mut callback: F, sample: Option<&str>) -> Result<usize>
    where
        F: FnMut(&str, SnpTrack),
    {
        let sample = self.resolve_sample(sample)?;
        let mut track = SnpTrack::new();
        let mut current: Option<String> = None;
        let mut count = 0usize;
        self.source.scan(None, sample, |record| {
            match current.take() {
                Some(chrom) if chrom == record.chrom => current = Some(chrom),
                Some(chrom) => {
                    // The record behind a chromosome boundary still belongs
                    // to the new accumulators, not the flushed ones.
                    callback(&chrom, mem::take(&mut track));
                    count += 1;
                    current = Some(record.chrom.clone());
                }
                None => current = Some(record.chrom.clone()),
            }
            if let Some(entry) = encode_record(&record)? {
                track.push(entry);
            }
            Ok(())
        })?;
        if !track.is_empty() {
            if let Some(chrom) = current {
                callback(&chrom, track);
                count += 1;
            }
        }
        Ok(count)
    }
}
