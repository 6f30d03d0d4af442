use crate::{
    core::record::{VariantRecord, VariantSource, MISSING_ALLELE},
    error::SnpxError,
    utils::util::{Result, MISSING_INTEGER, VECTOR_END_INTEGER},
};
use rust_htslib::bcf::{self, record::GenotypeAllele, Read};
use std::path::PathBuf;

/// Variant-file collaborator backed by rust-htslib.
///
/// Header metadata is read once on open; every scan opens a fresh underlying
/// htslib reader, so one `VcfReader` supports any number of extractions.
/// Callers wanting parallel extraction across chromosomes open one
/// `VcfReader` per worker.
pub struct VcfReader {
    path: PathBuf,
    chromosomes: Vec<String>,
    samples: Vec<String>,
}

impl VcfReader {
    /// Opens the file and reads chromosome and sample names from its header.
    pub fn new(path: PathBuf) -> Result<Self> {
        log::trace!("Start loading variant file {:?}", &path);
        let reader = bcf::Reader::from_path(&path).map_err(|e| SnpxError::Open {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let header = reader.header();

        let mut chromosomes = Vec::with_capacity(header.contig_count() as usize);
        for rid in 0..header.contig_count() {
            let name = header.rid2name(rid).map_err(|e| SnpxError::Open {
                path: path.clone(),
                message: format!("malformed contig declarations: {e}"),
            })?;
            chromosomes.push(std::str::from_utf8(name)?.to_string());
        }

        let samples = header
            .samples()
            .iter()
            .map(|sample| std::str::from_utf8(sample).map(str::to_string))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        log::info!("File {} successfully opened", path.display());
        log::debug!("Header contigs: {}", chromosomes.join(", "));
        log::debug!("Header samples: {}", samples.join(", "));

        Ok(VcfReader {
            path,
            chromosomes,
            samples,
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Flattens one htslib record into the per-sample view the extractor
    /// consumes. Field absence is represented, never guessed: a record
    /// without GT or AD for the sample yields `None` for that field.
    fn decode_record(record: &bcf::Record, sample: usize) -> Result<VariantRecord> {
        let header = record.header();
        let rid = record
            .rid()
            .ok_or_else(|| SnpxError::read("record without contig"))?;
        let chrom = std::str::from_utf8(
            header
                .rid2name(rid)
                .map_err(|e| SnpxError::read(format!("record contig unknown to header: {e}")))?,
        )?
        .to_string();

        let alleles = record.alleles();
        let (ref_allele, alt_alleles) = match alleles.split_first() {
            Some((ref_bytes, alts)) => (
                String::from_utf8_lossy(ref_bytes).into_owned(),
                alts.iter()
                    .map(|alt| String::from_utf8_lossy(alt).into_owned())
                    .collect(),
            ),
            None => (String::new(), Vec::new()),
        };

        let filters = record
            .filters()
            .map(|id| String::from_utf8_lossy(&header.id_to_name(id)).into_owned())
            .collect();

        // htslib stores a missing QUAL as a tagged NaN (MISSING_FLOAT).
        let qual = record.qual();
        let qual = if qual.is_nan() { None } else { Some(qual) };

        let (genotype, phased) = match record.genotypes() {
            Ok(genotypes) => {
                let call = genotypes.get(sample);
                if call.is_empty() {
                    (None, false)
                } else {
                    let allele_indices = call
                        .iter()
                        .map(|allele| allele.index().map_or(MISSING_ALLELE, |idx| idx as i32))
                        .collect::<Vec<i32>>();
                    // The separator before each later allele carries the
                    // phasing; the leading allele never does.
                    let phased = call.iter().skip(1).all(|allele| {
                        matches!(
                            allele,
                            GenotypeAllele::Phased(_) | GenotypeAllele::PhasedMissing
                        )
                    });
                    (Some(allele_indices), phased)
                }
            }
            Err(_) => (None, false),
        };

        let allele_depths = match record.format(b"AD").integer() {
            Ok(depths) => depths.get(sample).map(|row| {
                row.iter()
                    .copied()
                    .take_while(|&value| value != VECTOR_END_INTEGER)
                    .collect::<Vec<i32>>()
            }),
            Err(_) => None,
        }
        .filter(|depths| !depths.iter().all(|&value| value == MISSING_INTEGER));

        Ok(VariantRecord {
            chrom,
            pos: record.pos() + 1,
            ref_allele,
            alt_alleles,
            filters,
            qual,
            genotype,
            phased,
            allele_depths,
        })
    }

    fn drain<R, F>(reader: &mut R, sample: usize, visit: &mut F) -> Result<()>
    where
        R: bcf::Read,
        F: FnMut(VariantRecord) -> Result<()>,
    {
        let mut record = reader.empty_record();
        loop {
            match reader.read(&mut record) {
                Some(Ok(())) => visit(Self::decode_record(&record, sample)?)?,
                Some(Err(e)) => {
                    return Err(SnpxError::read(format!("error reading record: {e}")))
                }
                None => return Ok(()),
            }
        }
    }
}

impl VariantSource for VcfReader {
    fn chromosomes(&self) -> &[String] {
        &self.chromosomes
    }

    fn samples(&self) -> &[String] {
        &self.samples
    }

    fn scan<F>(&mut self, chromosome: Option<&str>, sample: usize, mut visit: F) -> Result<()>
    where
        F: FnMut(VariantRecord) -> Result<()>,
    {
        match chromosome {
            Some(name) => {
                let mut reader = bcf::IndexedReader::from_path(&self.path).map_err(|e| {
                    SnpxError::read(format!(
                        "failed to open {} for indexed access; the index file is probably missing or corrupted: {e}",
                        self.path.display()
                    ))
                })?;
                let rid = reader.header().name2rid(name.as_bytes()).map_err(|e| {
                    SnpxError::read(format!(
                        "chromosome {name} not found in {}: {e}",
                        self.path.display()
                    ))
                })?;
                reader.fetch(rid, 0, None).map_err(|e| {
                    SnpxError::read(format!("error fetching chromosome {name}: {e}"))
                })?;
                Self::drain(&mut reader, sample, &mut visit)
            }
            None => {
                let mut reader = bcf::Reader::from_path(&self.path).map_err(|e| {
                    SnpxError::read(format!("failed to reopen {}: {e}", self.path.display()))
                })?;
                Self::drain(&mut reader, sample, &mut visit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractor::SnpExtractor;
    use rust_htslib::bcf::Header;
    use std::{
        fs,
        sync::atomic::{AtomicU64, Ordering},
        time::SystemTime,
    };
    use tempdir::TempDir;

    static TEMP_VCF_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn make_temp_vcf(contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let counter = TEMP_VCF_COUNTER.fetch_add(1, Ordering::Relaxed);
        path.push(format!("snpx_test_{nanos}_{counter}.vcf"));
        fs::write(&path, contents).unwrap();
        path
    }

    const TEST_HEADER: &str = "\
##fileformat=VCFv4.2
##contig=<ID=chr1>
##contig=<ID=chr2>
##FILTER=<ID=q10,Description=\"Low quality\">
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">
##FORMAT=<ID=AD,Number=R,Type=Integer,Description=\"Allele depths\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tsample1
";

    fn collect_whole_file(path: PathBuf) -> Vec<VariantRecord> {
        let mut reader = VcfReader::new(path).unwrap();
        let mut records = Vec::new();
        reader
            .scan(None, 0, |record| {
                records.push(record);
                Ok(())
            })
            .unwrap();
        records
    }

    #[test]
    fn header_metadata_is_read_on_open() {
        let path = make_temp_vcf(TEST_HEADER);
        let reader = VcfReader::new(path).unwrap();
        assert_eq!(reader.chromosomes(), ["chr1", "chr2"]);
        assert_eq!(reader.samples(), ["sample1"]);
    }

    #[test]
    fn open_fails_on_missing_file() {
        let err = VcfReader::new(PathBuf::from("/nonexistent/input.vcf")).unwrap_err();
        assert!(matches!(err, SnpxError::Open { .. }));
    }

    #[test]
    fn whole_file_scan_decodes_per_sample_fields() {
        let vcf = format!(
            "{TEST_HEADER}\
chr1\t100\t.\tA\tT\t100\tPASS\t.\tGT:AD\t0/1:10,5
chr1\t200\t.\tA\tT\t.\tPASS\t.\tGT:AD\t0|1:10,5
chr1\t300\t.\tA\tT,G\t50\tq10\t.\tGT:AD\t0/1:10,5,2
chr1\t400\t.\tA\tT\t50\tPASS\t.\tGT\t0/1
chr2\t10\t.\tA\tT\t50\tPASS\t.\tGT:AD\t./.:.,.
"
        );
        let records = collect_whole_file(make_temp_vcf(&vcf));
        assert_eq!(records.len(), 5);

        assert_eq!(records[0].chrom, "chr1");
        assert_eq!(records[0].pos, 100);
        assert_eq!(records[0].ref_allele, "A");
        assert_eq!(records[0].alt_alleles, ["T"]);
        assert_eq!(records[0].filters, ["PASS"]);
        assert_eq!(records[0].qual, Some(100.0));
        assert_eq!(records[0].genotype.as_deref(), Some(&[0, 1][..]));
        assert!(!records[0].phased);
        assert_eq!(records[0].allele_depths.as_deref(), Some(&[10, 5][..]));

        assert_eq!(records[1].qual, None);
        assert!(records[1].phased);

        assert_eq!(records[2].filters, ["q10"]);
        assert_eq!(records[2].alt_alleles, ["T", "G"]);
        assert_eq!(records[2].allele_depths.as_deref(), Some(&[10, 5, 2][..]));

        assert_eq!(records[3].allele_depths, None);

        assert_eq!(records[4].chrom, "chr2");
        assert_eq!(
            records[4].genotype.as_deref(),
            Some(&[MISSING_ALLELE, MISSING_ALLELE][..])
        );
        assert_eq!(records[4].allele_depths, None);
    }

    #[test]
    fn extract_all_over_a_real_file_encodes_expected_tracks() {
        let vcf = format!(
            "{TEST_HEADER}\
chr1\t1001\t.\tA\tT\t100\tPASS\t.\tGT:AD\t0/0:10,0
chr1\t1002\t.\tG\tC\t2550\tPASS\t.\tGT:AD\t0|1:5,5
chr1\t1003\t.\tT\tA\t7\tPASS\t.\tGT:AD\t1/1:0,12
"
        );
        let reader = VcfReader::new(make_temp_vcf(&vcf)).unwrap();
        let mut extractor = SnpExtractor::new(reader);
        let mut tracks = Vec::new();
        let count = extractor
            .extract_all(
                |chrom, track| tracks.push((chrom.to_string(), track)),
                None,
            )
            .unwrap();

        assert_eq!(count, 1);
        let (chrom, track) = &tracks[0];
        assert_eq!(chrom, "chr1");
        assert_eq!(track.pos, vec![1001, 1002, 1003]);
        assert_eq!(track.ref_base, vec![b'A', b'G', b'T']);
        assert_eq!(track.alt_base, vec![b'T', b'C', b'A']);
        assert_eq!(track.nref, vec![10, 5, 0]);
        assert_eq!(track.nalt, vec![0, 5, 12]);
        assert_eq!(track.gt, vec![0, 5, 3]);
        assert_eq!(track.flag, vec![2, 2, 2]);
        assert_eq!(track.qual, vec![10, 255, 0]);
    }

    #[test]
    fn extract_chromosome_without_an_index_is_a_read_error() {
        let path = make_temp_vcf(TEST_HEADER);
        let reader = VcfReader::new(path).unwrap();
        let mut extractor = SnpExtractor::new(reader);
        let err = extractor.extract_chromosome("chr1", None).unwrap_err();
        assert!(matches!(err, SnpxError::Read { .. }));
    }

    fn write_indexed_vcf(temp_dir: &TempDir) -> PathBuf {
        let vcf_path = temp_dir.path().join("test.vcf");
        let mut header = Header::new();
        header.push_sample(b"sample1");
        header.push_record(br#"##contig=<ID=chr1,length=1000000>"#);
        header.push_record(br#"##FORMAT=<ID=GT,Number=1,Type=String,Description="Genotype">"#);
        header.push_record(br#"##FORMAT=<ID=AD,Number=R,Type=Integer,Description="Allele depths">"#);

        {
            let mut writer =
                bcf::Writer::from_path(&vcf_path, &header, false, bcf::Format::Vcf).unwrap();

            let mut record = writer.empty_record();
            record.set_rid(Some(0));
            record.set_pos(99);
            record.set_alleles(&[b"A", b"T"]).unwrap();
            record.set_qual(120.0);
            record.push_filter("PASS".as_bytes()).unwrap();
            record
                .push_genotypes(&[GenotypeAllele::Unphased(0), GenotypeAllele::Unphased(1)])
                .unwrap();
            record.push_format_integer(b"AD", &[7, 9]).unwrap();
            writer.write(&record).unwrap();

            let mut record = writer.empty_record();
            record.set_rid(Some(0));
            record.set_pos(199);
            record.set_alleles(&[b"G", b"C"]).unwrap();
            record.set_qual(40.0);
            record.push_filter("PASS".as_bytes()).unwrap();
            record
                .push_genotypes(&[GenotypeAllele::Unphased(1), GenotypeAllele::Phased(1)])
                .unwrap();
            record.push_format_integer(b"AD", &[1, 20]).unwrap();
            writer.write(&record).unwrap();
        }

        bcf::index::build(&vcf_path, None, 1, bcf::index::Type::Tbx).unwrap();
        vcf_path
    }

    #[test]
    fn extract_chromosome_uses_the_positional_index() {
        let temp_dir = TempDir::new("snpx_indexed").unwrap();
        let vcf_path = write_indexed_vcf(&temp_dir);

        let reader = VcfReader::new(vcf_path).unwrap();
        let mut extractor = SnpExtractor::new(reader);
        let track = extractor.extract_chromosome("chr1", Some("sample1")).unwrap();

        assert_eq!(track.pos, vec![100, 200]);
        assert_eq!(track.nref, vec![7, 1]);
        assert_eq!(track.nalt, vec![9, 20]);
        assert_eq!(track.gt, vec![1, 7]);
        assert_eq!(track.qual, vec![12, 4]);
    }

    #[test]
    fn unknown_chromosome_is_a_read_error() {
        let temp_dir = TempDir::new("snpx_unknown_chrom").unwrap();
        let vcf_path = write_indexed_vcf(&temp_dir);

        let reader = VcfReader::new(vcf_path).unwrap();
        let mut extractor = SnpExtractor::new(reader);
        let err = extractor.extract_chromosome("chr9", None).unwrap_err();
        assert!(matches!(err, SnpxError::Read { .. }));
    }
}
