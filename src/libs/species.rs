//! Per-species grouping of calls into canonical, non-overlapping CNE intervals.
//!
//! # Phases
//!
//! 1. **Seed** - every species starts with the placeholder `{species}_cne_0 = [0, 0]`.
//! 2. **Ingest** - each call interval joins the *first* group (in creation order) holding an
//!    interval it overlaps, touch-inclusive; otherwise it opens `{species}_cne_{n}` with
//!    `n` the number of existing groups. Grouping depends on file order.
//! 3. **Envelope** - every group collapses to `[min(starts), max(ends)]`.
//! 4. **Recursive merge** - envelopes grown in phase 2 may now overlap each other; they are
//!    sorted and merged under the strict boundary, then renumbered `0..k` in sorted order.
//!
//! [`GroupingMode::Sweep`] replaces phases 2 and 3 by one touch-inclusive sweep over all
//! intervals, which doesn't depend on the input order.

use crate::libs::error::{CneError, Result};
use crate::libs::interval::{self, overlaps, Boundary, Interval};
use crate::libs::pairwise::PairwiseFile;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// The placeholder registered as `{species}_cne_0` before any call is seen.
pub const SEED: Interval = Interval { start: 0, end: 0 };

pub fn cne_id(species: &str, n: usize) -> String {
    format!("{}_cne_{}", species, n)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupingMode {
    #[default]
    FirstMatch,
    Sweep,
}

impl std::str::FromStr for GroupingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "first-match" => Ok(GroupingMode::FirstMatch),
            "sweep" => Ok(GroupingMode::Sweep),
            _ => Err(format!("unknown grouping mode {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
struct Group {
    envelope: Interval,
    members: Vec<Interval>,
}

impl Group {
    fn new(iv: Interval) -> Self {
        Self {
            envelope: iv,
            members: vec![iv],
        }
    }

    fn accepts(&self, iv: &Interval) -> bool {
        // a member can only overlap when the envelope does
        overlaps(&self.envelope, iv) && self.members.iter().any(|m| overlaps(m, iv))
    }

    fn push(&mut self, iv: Interval) {
        self.envelope = self.envelope.envelope_with(&iv);
        self.members.push(iv);
    }
}

/// Builds the canonical interval set of one species.
#[derive(Debug, Clone)]
pub struct SpeciesClusterBuilder {
    species: String,
    mode: GroupingMode,
    groups: Vec<Group>,
}

impl SpeciesClusterBuilder {
    pub fn new(species: &str, mode: GroupingMode) -> Self {
        Self {
            species: species.to_string(),
            mode,
            groups: vec![Group::new(SEED)],
        }
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    /// Number of groups so far, the seed included.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn ingest(&mut self, iv: Interval) {
        match self.mode {
            GroupingMode::FirstMatch => {
                match self.groups.iter_mut().find(|g| g.accepts(&iv)) {
                    Some(group) => group.push(iv),
                    None => self.groups.push(Group::new(iv)),
                }
            }
            GroupingMode::Sweep => self.groups.push(Group::new(iv)),
        }
    }

    /// Ingest-phase groups as `(id, members)`.
    pub fn groups(&self) -> impl Iterator<Item = (String, &[Interval])> + '_ {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, g)| (cne_id(&self.species, i), g.members.as_slice()))
    }

    /// Envelope pass followed by the recursive merge.
    pub fn finalize(self) -> SpeciesIntervalSet {
        let envelopes: Vec<Interval> = match self.mode {
            GroupingMode::FirstMatch => self.groups.iter().map(|g| g.envelope).collect(),
            GroupingMode::Sweep => interval::merge_sorted(
                self.groups.iter().map(|g| g.envelope).collect(),
                Boundary::Inclusive,
            ),
        };
        let n_groups = envelopes.len();

        let merged = interval::recursive_merge(envelopes);
        log::debug!(
            "{}: {} groups, {} canonical intervals",
            self.species,
            n_groups,
            merged.len()
        );

        let intervals = merged
            .into_iter()
            .enumerate()
            .map(|(i, iv)| (cne_id(&self.species, i), iv))
            .collect();

        SpeciesIntervalSet { intervals }
    }
}

/// `interval_id -> [start, end]` of one species.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesIntervalSet {
    pub intervals: IndexMap<String, Interval>,
}

impl SpeciesIntervalSet {
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// False when only the seed placeholder is present.
    pub fn has_data(&self) -> bool {
        self.intervals.values().any(|iv| *iv != SEED)
    }

    pub fn lookup(&self) -> IntervalLookup<'_> {
        IntervalLookup::new(self)
    }

    /// `id<TAB>start<TAB>end`, no header.
    pub fn write_coords(&self, writer: &mut dyn Write) -> std::io::Result<()> {
        for (id, iv) in &self.intervals {
            writeln!(writer, "{}\t{}\t{}", id, iv.start, iv.end)?;
        }
        Ok(())
    }
}

/// Reads a coordinate table written by [`SpeciesIntervalSet::write_coords`].
pub fn read_coords<R: BufRead>(reader: R, label: &str) -> Result<Vec<(String, Interval)>> {
    let mut coords = vec![];

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 3 {
            return Err(CneError::malformed(
                label,
                idx + 1,
                format!("expected 3 columns, found {}", fields.len()),
            ));
        }
        let iv = crate::libs::pairwise::parse_range(fields[1], fields[2], label, idx + 1)?;
        coords.push((fields[0].to_string(), iv));
    }

    Ok(coords)
}

/// `species -> SpeciesIntervalSet`, the canonical set document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalSet {
    pub species: IndexMap<String, SpeciesIntervalSet>,
}

impl CanonicalSet {
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn read(path: &str) -> anyhow::Result<Self> {
        let reader = crate::reader(path)?;
        let set = Self::from_reader(reader)
            .map_err(|e| anyhow::anyhow!("could not parse {}: {}", path, e))?;
        Ok(set)
    }

    pub fn write_to(&self, writer: &mut dyn Write) -> Result<()> {
        serde_json::to_writer(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }

    pub fn get(&self, species: &str) -> Option<&SpeciesIntervalSet> {
        self.species.get(species)
    }
}

/// Holds one builder per species, created in order of first appearance.
#[derive(Debug, Default)]
pub struct CanonicalBuilder {
    mode: GroupingMode,
    builders: IndexMap<String, SpeciesClusterBuilder>,
}

impl CanonicalBuilder {
    pub fn new(mode: GroupingMode) -> Self {
        Self {
            mode,
            builders: IndexMap::new(),
        }
    }

    fn builder(&mut self, species: &str) -> &mut SpeciesClusterBuilder {
        let mode = self.mode;
        self.builders
            .entry(species.to_string())
            .or_insert_with(|| SpeciesClusterBuilder::new(species, mode))
    }

    /// Feeds every call of `file`, row by row, reference side before query side.
    pub fn ingest_file(&mut self, file: &PairwiseFile) {
        for species in file.species() {
            self.builder(species);
        }

        for call in &file.calls {
            self.builder(&file.ref_species).ingest(call.ref_range);
            self.builder(&file.query_species).ingest(call.query_range);
        }
    }

    pub fn species(&self) -> impl Iterator<Item = &SpeciesClusterBuilder> {
        self.builders.values()
    }

    pub fn finish(self) -> CanonicalSet {
        let builders: Vec<(String, SpeciesClusterBuilder)> = self.builders.into_iter().collect();
        let finished: Vec<(String, SpeciesIntervalSet)> = builders
            .into_par_iter()
            .map(|(species, builder)| (species, builder.finalize()))
            .collect();

        CanonicalSet {
            species: finished.into_iter().collect(),
        }
    }
}

/// Resolves an interval to the first canonical ID (in set order) it overlaps,
/// touch-inclusive.
///
/// Sets whose starts and ends both never decrease, which is what
/// [`SpeciesClusterBuilder::finalize`] produces, are searched by bisection; any other
/// order falls back to a linear scan with the same answer.
#[derive(Debug)]
pub struct IntervalLookup<'a> {
    ids: Vec<&'a str>,
    ranges: Vec<Interval>,
    sorted: bool,
}

impl<'a> IntervalLookup<'a> {
    pub fn new(set: &'a SpeciesIntervalSet) -> Self {
        let ids: Vec<&str> = set.intervals.keys().map(|k| k.as_str()).collect();
        let ranges: Vec<Interval> = set.intervals.values().copied().collect();
        let sorted = ranges
            .windows(2)
            .all(|w| w[0].start <= w[1].start && w[0].end <= w[1].end);

        Self {
            ids,
            ranges,
            sorted,
        }
    }

    pub fn resolve(&self, iv: &Interval) -> Option<&'a str> {
        if self.sorted {
            let idx = self.ranges.partition_point(|r| r.end < iv.start);
            match self.ranges.get(idx) {
                Some(r) if overlaps(r, iv) => Some(self.ids[idx]),
                _ => None,
            }
        } else {
            self.ranges
                .iter()
                .position(|r| overlaps(r, iv))
                .map(|idx| self.ids[idx])
        }
    }
}
