use clap::*;
use cnehg::libs::links::{self, FileLinks, LinkExtractor, LinkStats};
use cnehg::libs::overlap::OverlapSet;
use cnehg::libs::pairwise::PairwiseFile;
use cnehg::libs::species::CanonicalSet;
use rayon::prelude::*;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("links")
        .about("Link canonical CNE IDs observed together")
        .after_help(
            r###"
Both intervals of every call are looked up among the canonical CNEs of their species.
The first CNE overlapping the interval gives the ID. Calls with an interval matching no
CNE, or naming a species absent from the canonical set, are dropped and counted.

Output is a JSON list of links, e.g. [["aaur_cne_12", "epal_cne_3"], ...]. Links are
deduplicated within each input file.

With `--overlaps`, records written by `cnehg overlap join/merge` give one link holding
the CNE IDs of all their species.

Examples:
1. Pairwise links:
   cnehg links cnes.json cnefinder/ -o pairwise_links.json

2. Multi-species links from overlap records only:
   cnehg links cnes.json --overlaps overlaps/ -o threeway_links.json

"###,
        )
        .arg(
            Arg::new("canonical")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Canonical CNE set written by `cnehg ids`"),
        )
        .arg(
            Arg::new("infiles")
                .num_args(0..)
                .index(2)
                .help("Pairwise comparison files, or directories of them"),
        )
        .arg(
            Arg::new("overlaps")
                .long("overlaps")
                .num_args(1..)
                .help("Overlap record files, or directories of them"),
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
    let canonical = CanonicalSet::read(args.get_one::<String>("canonical").unwrap())?;
    let outfile = args.get_one::<String>("outfile").unwrap();
    let inputs: Vec<String> = args
        .get_many::<String>("infiles")
        .map(|v| v.cloned().collect())
        .unwrap_or_default();
    let overlap_inputs: Vec<String> = args
        .get_many::<String>("overlaps")
        .map(|v| v.cloned().collect())
        .unwrap_or_default();

    let extractor = LinkExtractor::new(&canonical);

    // results keep the file order
    let pairwise_files = cnehg::list_files(&inputs)?;
    let mut results: Vec<FileLinks> = pairwise_files
        .par_iter()
        .map(|infile| -> anyhow::Result<FileLinks> {
            let file = PairwiseFile::read(infile)?;
            Ok(extractor.pairwise(&file))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let overlap_files = cnehg::list_files(&overlap_inputs)?;
    let overlap_results: Vec<FileLinks> = overlap_files
        .par_iter()
        .map(|infile| -> anyhow::Result<FileLinks> {
            let set = OverlapSet::read(infile)?;
            Ok(extractor.higher_order(&set, infile))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    results.extend(overlap_results);

    let mut total = LinkStats::default();
    let mut all_links = vec![];
    for result in results {
        total += result.stats;
        all_links.extend(result.links);
    }

    if total.unresolved > 0 || total.unknown_species > 0 {
        log::warn!(
            "{} of {} records dropped: {} unresolved, {} with unknown species",
            total.unresolved + total.unknown_species,
            total.calls,
            total.unresolved,
            total.unknown_species
        );
    }
    log::info!("{} links from {} files", all_links.len(), pairwise_files.len() + overlap_files.len());

    cnehg::write_atomic(outfile, |writer| {
        links::write_links(&all_links, writer)?;
        Ok(())
    })?;

    Ok(())
}
