//! Links between canonical CNE IDs.
//!
//! Each side of a call is resolved against the canonical set of its species by
//! [`IntervalLookup`]: the first ID whose interval overlaps, touch-inclusive. Calls with a
//! side that resolves to nothing were filtered out earlier and are dropped. Links are
//! deduplicated within one input file only.

use crate::libs::error::{CneError, Result};
use crate::libs::overlap::OverlapSet;
use crate::libs::pairwise::PairwiseFile;
use crate::libs::species::{CanonicalSet, IntervalLookup};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::io::{BufRead, Write};

/// Two or more IDs observed together.
pub type Link = Vec<String>;

/// What happened to the calls (or overlap records) of one input file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub calls: usize,
    pub emitted: usize,
    pub duplicates: usize,
    /// A side overlapping no canonical interval
    pub unresolved: usize,
    /// A side whose species isn't in the canonical set
    pub unknown_species: usize,
}

impl std::ops::AddAssign for LinkStats {
    fn add_assign(&mut self, other: Self) {
        self.calls += other.calls;
        self.emitted += other.emitted;
        self.duplicates += other.duplicates;
        self.unresolved += other.unresolved;
        self.unknown_species += other.unknown_species;
    }
}

/// Links of one file, in call order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLinks {
    pub links: Vec<Link>,
    pub stats: LinkStats,
}

impl FileLinks {
    fn push(&mut self, link: Link, seen: &mut HashSet<Link>) {
        if seen.contains(&link) {
            self.stats.duplicates += 1;
        } else {
            seen.insert(link.clone());
            self.links.push(link);
            self.stats.emitted += 1;
        }
    }
}

enum Resolved<'a> {
    Id(&'a str),
    Unresolved,
    UnknownSpecies,
}

pub struct LinkExtractor<'a> {
    lookups: IndexMap<&'a str, IntervalLookup<'a>>,
}

impl<'a> LinkExtractor<'a> {
    pub fn new(canonical: &'a CanonicalSet) -> Self {
        let lookups = canonical
            .species
            .iter()
            .map(|(species, set)| (species.as_str(), set.lookup()))
            .collect();

        Self { lookups }
    }

    fn resolve(&self, species: &str, iv: &crate::libs::interval::Interval) -> Resolved<'a> {
        match self.lookups.get(species) {
            None => Resolved::UnknownSpecies,
            Some(lookup) => match lookup.resolve(iv) {
                Some(id) => Resolved::Id(id),
                None => Resolved::Unresolved,
            },
        }
    }

    fn report_unknown(&self, label: &str, species: &[&str], count: usize) {
        for s in species {
            if !self.lookups.contains_key(*s) {
                let err = CneError::UnknownSpeciesReference(s.to_string());
                log::warn!("{}: {}, {} records skipped", label, err, count);
            }
        }
    }

    /// `[ref_id, query_id]` for every call with both sides resolved.
    pub fn pairwise(&self, file: &PairwiseFile) -> FileLinks {
        let mut result = FileLinks::default();
        let mut seen: HashSet<Link> = HashSet::new();

        for call in &file.calls {
            result.stats.calls += 1;

            let ref_id = self.resolve(&file.ref_species, &call.ref_range);
            let query_id = self.resolve(&file.query_species, &call.query_range);
            match (ref_id, query_id) {
                (Resolved::Id(r), Resolved::Id(q)) => {
                    result.push(vec![r.to_string(), q.to_string()], &mut seen);
                }
                (Resolved::UnknownSpecies, _) | (_, Resolved::UnknownSpecies) => {
                    result.stats.unknown_species += 1;
                }
                _ => result.stats.unresolved += 1,
            }
        }

        if result.stats.unknown_species > 0 {
            self.report_unknown(&file.path, &file.species(), result.stats.unknown_species);
        }
        log_stats(&file.path, &result.stats);

        result
    }

    /// One link per overlap record whose species all resolve, IDs in record order.
    pub fn higher_order(&self, set: &OverlapSet, label: &str) -> FileLinks {
        let mut result = FileLinks::default();
        let mut seen: HashSet<Link> = HashSet::new();
        let mut unknown: Vec<&str> = vec![];

        for record in set.records.values() {
            result.stats.calls += 1;

            let mut link: Link = Vec::with_capacity(record.len());
            let mut unknown_species = false;
            let mut unresolved = false;
            for (species, iv) in record {
                match self.resolve(species, iv) {
                    Resolved::Id(id) => link.push(id.to_string()),
                    Resolved::Unresolved => unresolved = true,
                    Resolved::UnknownSpecies => {
                        unknown_species = true;
                        if !unknown.contains(&species.as_str()) {
                            unknown.push(species.as_str());
                        }
                    }
                }
            }

            if unknown_species {
                result.stats.unknown_species += 1;
            } else if unresolved {
                result.stats.unresolved += 1;
            } else {
                result.push(link, &mut seen);
            }
        }

        if result.stats.unknown_species > 0 {
            self.report_unknown(label, &unknown, result.stats.unknown_species);
        }
        log_stats(label, &result.stats);

        result
    }
}

fn log_stats(label: &str, stats: &LinkStats) {
    log::info!(
        "{}: {} records, {} links, {} duplicates, {} unresolved, {} unknown species",
        label,
        stats.calls,
        stats.emitted,
        stats.duplicates,
        stats.unresolved,
        stats.unknown_species
    );
}

pub fn read_links<R: BufRead>(reader: R) -> Result<Vec<Link>> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn write_links(links: &[Link], writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer(&mut *writer, links)?;
    writeln!(writer)?;
    Ok(())
}
