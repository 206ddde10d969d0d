pub mod join;
pub mod merge;

pub fn make_subcommand() -> clap::Command {
    clap::Command::new("overlap")
        .about("Overlaps between comparisons sharing a species")
        .after_help(
            r###"Subcommands:

* join  - join two pairwise files on their common species
* merge - combine join results computed on chunks of the inputs

"###,
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(join::make_subcommand())
        .subcommand(merge::make_subcommand())
}

pub fn execute(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("join", sub_matches)) => join::execute(sub_matches),
        Some(("merge", sub_matches)) => merge::execute(sub_matches),
        _ => Ok(()),
    }
}
