use crate::{
    cli::InfoArgs, core::record::VariantSource, io::vcf_reader::VcfReader, utils::util::Result,
};

/// Prints the header-declared chromosome and sample lists.
pub fn info(args: InfoArgs) -> Result<()> {
    let reader = VcfReader::new(args.vcf)?;
    println!("chromosomes: {}", reader.chromosomes().join(" "));
    println!("samples: {}", reader.samples().join(" "));
    Ok(())
}
