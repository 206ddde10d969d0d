use anyhow::Context;
use clap::*;
use cnehg::libs::pairwise::PairwiseFile;
use cnehg::libs::species::{CanonicalBuilder, GroupingMode};
use std::path::Path;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("ids")
        .about("Merge CNE calls of all pairwise comparisons into canonical CNEs")
        .after_help(
            r###"
Calls of one species coming from every pairwise file are grouped by overlap, extended to
the envelope of each group, then merged again until no two CNEs overlap.

Input files are named `{ref}_vs_{query}.out` and hold 11 tab-separated columns:
ref_chrom ref_start ref_end ref_strand query_chrom query_start query_end query_strand
ref_length query_length sim

Notes:
* Directories are expanded to the files they contain.
* Files are processed in file name order. With `--mode first-match` a call joins the
  first existing CNE it overlaps, so the order matters.
* `--mode sweep` groups all overlapping calls regardless of order.
* Every species gets the placeholder `{species}_cne_0` = [0, 0]. It isn't a real CNE
  unless calls start at 0.
* Output is a JSON document: {species: {id: [start, end]}}.

Examples:
1. Canonical CNEs of a directory of pairwise files:
   cnehg ids cnefinder/ -o cnes.json

2. Also write one coordinate table per species:
   cnehg ids cnefinder/ -o cnes.json --coords-dir coords/

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Pairwise comparison files, or directories of them"),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .num_args(1)
                .value_parser(["first-match", "sweep"])
                .default_value("first-match")
                .help("How calls are grouped"),
        )
        .arg(
            Arg::new("coords_dir")
                .long("coords-dir")
                .num_args(1)
                .help("Write {species}_cne_coords.tsv files into this directory"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let inputs: Vec<String> = args.get_many::<String>("infiles").unwrap().cloned().collect();
    let mode: GroupingMode = args
        .get_one::<String>("mode")
        .unwrap()
        .parse()
        .map_err(anyhow::Error::msg)?;
    let outfile = args.get_one::<String>("outfile").unwrap();

    let files = cnehg::list_files(&inputs)?;
    if files.is_empty() {
        log::warn!("No pairwise files found");
    }

    //----------------------------
    // Ingest
    //----------------------------
    let mut builder = CanonicalBuilder::new(mode);
    for infile in &files {
        let file = PairwiseFile::read(infile)?;
        log::info!(
            "Processing {} ({} vs {}, {} calls)",
            infile,
            file.ref_species,
            file.query_species,
            file.calls.len()
        );
        builder.ingest_file(&file);
    }
    for species in builder.species() {
        log::info!("{}: {} groups", species.species(), species.len());
    }

    //----------------------------
    // Merge
    //----------------------------
    let canonical = builder.finish();
    for (species, set) in &canonical.species {
        if set.has_data() {
            log::info!("{}: {} canonical CNEs", species, set.len());
        } else {
            log::warn!("{}: no calls, only the placeholder CNE", species);
        }
    }

    //----------------------------
    // Output
    //----------------------------
    // the canonical set goes last, it only exists when every table was written
    if let Some(dir) = args.get_one::<String>("coords_dir") {
        std::fs::create_dir_all(dir).with_context(|| format!("could not create {}", dir))?;
        for (species, set) in &canonical.species {
            let path = Path::new(dir).join(format!("{}_cne_coords.tsv", species));
            cnehg::write_atomic(&path.to_string_lossy(), |writer| {
                set.write_coords(writer)?;
                Ok(())
            })?;
        }
    }

    cnehg::write_atomic(outfile, |writer| {
        canonical.write_to(writer)?;
        Ok(())
    })?;

    Ok(())
}
