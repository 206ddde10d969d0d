use anyhow::Context;
use clap::*;
use cnehg::libs::remap::{self, ScaffoldIndex};
use cnehg::libs::species::read_coords;
use std::path::Path;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("remap")
        .about("Convert CNE coordinates back to the original scaffolds")
        .after_help(
            r###"
The pairwise comparisons ran on one padded sequence per species, made of all scaffolds
joined end to end. This command finds the scaffold holding each CNE and reports its
position on that scaffold.

Inputs:
* Coordinate tables named `{species}_cne_coords.tsv` (id, start, end), as written by
  `cnehg ids --coords-dir`.
* For each species, one of `{species}_pad.fa`, `{species}_pad.fa.gz` or
  `{species}.sizes` (name<TAB>length) in `--fasta-dir`, scaffolds in the order they
  were concatenated.

Output is `{species}_orig_coords.tsv` in `--outdir` with the columns
interval_id padded_start padded_end scaffold_id original_start original_end

Notes:
* A CNE ending past the last scaffold, or starting in an earlier scaffold than it ends,
  fails its species. The other species are still processed, and the command exits with
  an error at the end.

Examples:
1. Remap every species:
   cnehg remap coords/ --fasta-dir padded/ --outdir orig/

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Coordinate tables, or directories of them"),
        )
        .arg(
            Arg::new("fasta_dir")
                .long("fasta-dir")
                .required(true)
                .num_args(1)
                .help("Directory of padded FASTA files or .sizes tables"),
        )
        .arg(
            Arg::new("outdir")
                .long("outdir")
                .num_args(1)
                .default_value(".")
                .help("Output directory"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let inputs: Vec<String> = args.get_many::<String>("infiles").unwrap().cloned().collect();
    let fasta_dir = args.get_one::<String>("fasta_dir").unwrap();
    let outdir = args.get_one::<String>("outdir").unwrap();

    std::fs::create_dir_all(outdir).with_context(|| format!("could not create {}", outdir))?;

    let files: Vec<String> = cnehg::list_files(&inputs)?
        .into_iter()
        .filter(|f| f.ends_with(".tsv"))
        .collect();
    log::info!("Found {} coordinate files", files.len());

    let mut failed = vec![];
    for infile in &files {
        if let Err(err) = remap_file(infile, fasta_dir, outdir) {
            log::error!("{}: {:#}", infile, err);
            failed.push(infile.clone());
        }
    }

    if !failed.is_empty() {
        anyhow::bail!(
            "{} of {} species failed: {}",
            failed.len(),
            files.len(),
            failed.join(", ")
        );
    }

    Ok(())
}

fn remap_file(infile: &str, fasta_dir: &str, outdir: &str) -> anyhow::Result<()> {
    let species = remap::species_of_coords(infile)
        .with_context(|| format!("expected {{species}}_cne_coords.tsv, got {}", infile))?;
    let scaffold_file = remap::find_scaffold_file(fasta_dir, &species)
        .with_context(|| format!("no scaffold file for {} in {}", species, fasta_dir))?;

    log::info!("Processing {} with {}", infile, scaffold_file);
    let coords = read_coords(cnehg::reader(infile)?, infile)?;
    let index = ScaffoldIndex::load(&scaffold_file)?;
    let rows = index.remap_all(&coords)?;

    let outfile = Path::new(outdir).join(format!("{}_orig_coords.tsv", species));
    cnehg::write_atomic(&outfile.to_string_lossy(), |writer| {
        remap::write_remapped(&rows, writer)?;
        Ok(())
    })?;

    Ok(())
}
