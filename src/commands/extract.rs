use crate::{
    cli::ExtractArgs,
    core::extractor::SnpExtractor,
    io::{snp_writer::SnpWriter, vcf_reader::VcfReader},
    utils::util::Result,
};

pub fn extract(args: ExtractArgs) -> Result<()> {
    let reader = VcfReader::new(args.vcf)?;
    let mut writer = SnpWriter::from_path(args.output.as_deref())?;
    let mut extractor = SnpExtractor::new(reader);
    let sample = args.sample.as_deref();

    match args.chromosomes {
        Some(chromosomes) => {
            for chromosome in &chromosomes {
                let track = extractor.extract_chromosome(chromosome, sample)?;
                log::info!("{chromosome}: {} SNPs", track.len());
                writer.write_track(chromosome, &track)?;
            }
        }
        None => {
            // The callback has no error channel; remember the first write
            // failure and surface it after the pass.
            let mut write_error = None;
            let count = extractor.extract_all(
                |chromosome, track| {
                    log::info!("{chromosome}: {} SNPs", track.len());
                    if write_error.is_none() {
                        if let Err(e) = writer.write_track(chromosome, &track) {
                            write_error = Some(e);
                        }
                    }
                },
                sample,
            )?;
            if let Some(e) = write_error {
                return Err(e);
            }
            log::info!("Processed {count} chromosomes");
        }
    }

    writer.finish()
}
