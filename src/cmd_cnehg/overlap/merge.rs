use clap::*;
use cnehg::libs::overlap::{self, OverlapSet};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("merge")
        .about("Combine overlap records from several join runs")
        .after_help(
            r###"
Records of all inputs are concatenated in file name order and renumbered
`{species}_cne_1`, `{species}_cne_2`, ... with a single counter.

Examples:
1. Combine the results of chunked joins:
   cnehg overlap merge overlap_files/ -o aaur_overlap_epal_hsym.json

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Overlap JSON files, or directories of them"),
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
    let outfile = args.get_one::<String>("outfile").unwrap();

    let files = cnehg::list_files(&inputs)?;
    log::info!("Found {} overlap files", files.len());

    let mut sets = vec![];
    for infile in &files {
        let set = OverlapSet::read(infile)?;
        log::debug!("{}: {} records", infile, set.len());
        sets.push(set);
    }
    let combined = overlap::combine(sets);

    cnehg::write_atomic(outfile, |writer| {
        combined.write_to(writer)?;
        Ok(())
    })?;

    Ok(())
}
