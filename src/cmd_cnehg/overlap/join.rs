use clap::*;
use cnehg::libs::overlap;
use cnehg::libs::pairwise::PairwiseFile;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("join")
        .about("Join two pairwise comparisons on their common species")
        .after_help(
            r###"
The two files must share exactly one species, e.g. `aaur_vs_epal.out` and
`aaur_vs_hsym.out` share `aaur`.

Every pair of calls whose intervals on the common species overlap becomes one record:

    {"aaur_cne_1": {"aaur": [start, end], "epal": [start, end], "hsym": [start, end]}, ...}

The common species gets the envelope of both intervals, the other two species keep
their own interval. Records are numbered from 1, first file in the outer loop.

Examples:
1. Join two comparisons:
   cnehg overlap join aaur_vs_epal.out aaur_vs_hsym.out -o aaur_overlap_epal_hsym.json

"###,
        )
        .arg(
            Arg::new("file1")
                .required(true)
                .num_args(1)
                .index(1)
                .help("First pairwise file"),
        )
        .arg(
            Arg::new("file2")
                .required(true)
                .num_args(1)
                .index(2)
                .help("Second pairwise file"),
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
    let file1 = PairwiseFile::read(args.get_one::<String>("file1").unwrap())?;
    let file2 = PairwiseFile::read(args.get_one::<String>("file2").unwrap())?;
    let outfile = args.get_one::<String>("outfile").unwrap();

    let set = overlap::join(&file1, &file2)?;

    cnehg::write_atomic(outfile, |writer| {
        set.write_to(writer)?;
        Ok(())
    })?;

    Ok(())
}
