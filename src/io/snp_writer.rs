use crate::{core::snp::SnpTrack, utils::util::Result};
use flate2::{write::GzEncoder, Compression};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".gzip")
}

/// Tab-separated writer for extracted SNP tracks, one row per SNP.
///
/// Output goes to standard output by default; a path ending in `.gz` or
/// `.gzip` is gzip-compressed.
pub struct SnpWriter {
    out: BufWriter<Box<dyn Write>>,
}

impl SnpWriter {
    pub fn from_path(path: Option<&str>) -> Result<Self> {
        let out: Box<dyn Write> = match path {
            Some(path) => {
                let file = File::create(path).map_err(|e| {
                    crate::snpx_error!("Failed to create output file {path}: {e}")
                })?;
                if is_gzipped(Path::new(path)) {
                    Box::new(GzEncoder::new(file, Compression::default()))
                } else {
                    Box::new(file)
                }
            }
            None => Box::new(io::stdout()),
        };
        let mut writer = SnpWriter {
            out: BufWriter::new(out),
        };
        writer.write_header()?;
        Ok(writer)
    }

    fn write_header(&mut self) -> Result<()> {
        writeln!(self.out, "#chrom\tpos\tref\talt\tnref\tnalt\tgt\tflag\tqual")?;
        Ok(())
    }

    pub fn write_track(&mut self, chromosome: &str, track: &SnpTrack) -> Result<()> {
        for i in 0..track.len() {
            writeln!(
                self.out,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                chromosome,
                track.pos[i],
                track.ref_base[i] as char,
                track.alt_base[i] as char,
                track.nref[i],
                track.nalt[i],
                track.gt[i],
                track.flag[i],
                track.qual[i],
            )?;
        }
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
