extern crate clap;
use clap::*;

mod cmd_cnehg;

fn main() -> anyhow::Result<()> {
    let app = Command::new("cnehg")
        .version(crate_version!())
        .about("`cnehg` - CNE Homology Groups")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log progress, repeat for more detail (-vv)"),
        )
        .subcommand(cmd_cnehg::ids::make_subcommand())
        .subcommand(cmd_cnehg::overlap::make_subcommand())
        .subcommand(cmd_cnehg::remap::make_subcommand())
        .subcommand(cmd_cnehg::links::make_subcommand())
        .subcommand(cmd_cnehg::cluster::make_subcommand())
        .after_help(
            r###"Subcommand groups:

* Canonical CNEs:
    * ids     - merge calls of all pairwise files into canonical CNEs per species
    * remap   - convert canonical CNE coordinates back to scaffold coordinates

* Homology groups:
    * overlap - join two comparisons sharing a species, combine join chunks
    * links   - link canonical CNE IDs observed together
    * cluster - merge all links into homology clusters

A typical run:
    cnehg ids cnefinder/ -o cnes.json --coords-dir coords/
    cnehg remap coords/ --fasta-dir padded/ --outdir orig/
    cnehg links cnes.json cnefinder/ -o pairwise_links.json
    cnehg cluster pairwise_links.json -o clusters.csv

"###,
        );

    let matches = app.get_matches();

    env_logger::Builder::new()
        .filter_level(match matches.get_count("verbose") {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .parse_default_env()
        .init();

    // Check which subcommand the user ran...
    match matches.subcommand() {
        Some(("ids", sub_matches)) => cmd_cnehg::ids::execute(sub_matches),
        Some(("overlap", sub_matches)) => cmd_cnehg::overlap::execute(sub_matches),
        Some(("remap", sub_matches)) => cmd_cnehg::remap::execute(sub_matches),
        Some(("links", sub_matches)) => cmd_cnehg::links::execute(sub_matches),
        Some(("cluster", sub_matches)) => cmd_cnehg::cluster::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
