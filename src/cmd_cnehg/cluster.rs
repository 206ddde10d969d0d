use clap::*;
use cnehg::libs::cluster;
use cnehg::libs::links::read_links;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("cluster")
        .about("Merge links into homology clusters")
        .after_help(
            r###"
All link lists are read (pairwise and multi-species links alike) and IDs connected
through any chain of links end up in the same cluster.

Output has one cluster per line, members sorted and joined by `--sep`. IDs that appear
in no link are not reported.

Examples:
1. Cluster pairwise and three-way links:
   cnehg cluster pairwise_links.json threeway_links/ -o clusters.csv

2. Tab-separated output:
   cnehg cluster pairwise_links.json --sep tab

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Link list files, or directories of them"),
        )
        .arg(
            Arg::new("sep")
                .long("sep")
                .num_args(1)
                .default_value(",")
                .help("Member separator, `tab` for a tab"),
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
    let sep = match args.get_one::<String>("sep").unwrap().as_str() {
        "tab" => "\t",
        s => s,
    };

    let files = cnehg::list_files(&inputs)?;
    log::info!("Reading {} link files", files.len());

    let mut lists = vec![];
    for infile in &files {
        let links = read_links(cnehg::reader(infile)?)
            .map_err(|e| anyhow::anyhow!("could not parse {}: {}", infile, e))?;
        log::debug!("{}: {} links", infile, links.len());
        lists.push(links);
    }

    let clusters = cluster::merge_links(&lists);

    cnehg::write_atomic(outfile, |writer| {
        cluster::write_clusters(&clusters, sep, writer)?;
        Ok(())
    })?;

    Ok(())
}
