//! Joins two pairwise comparisons sharing one species.
//!
//! For `a_vs_b.out` and `a_vs_c.out` the common species is `a`. Every pair of calls whose
//! `a` intervals overlap (touch-inclusive) becomes a record
//! `{a: envelope, b: interval, c: interval}` keyed `a_cne_{n}`, `n` counting from 1 in
//! outer-then-inner call order.

use crate::libs::error::{CneError, Result};
use crate::libs::interval::{overlaps, Interval};
use crate::libs::pairwise::{PairwiseFile, RawCall, Side};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// `species -> interval` for one joined CNE, common species first.
pub type OverlapRecord = IndexMap<String, Interval>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlapSet {
    pub records: IndexMap<String, OverlapRecord>,
}

impl OverlapSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

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
}

/// Which species is shared, and which side of each file holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPlan {
    pub common: String,
    pub specific: [String; 2],
    common_sides: [Side; 2],
}

impl JoinPlan {
    pub fn new(file1: &PairwiseFile, file2: &PairwiseFile) -> Result<Self> {
        let species1 = file1.species();
        let species2 = file2.species();

        if species1[0] == species1[1] || species2[0] == species2[1] {
            return Err(CneError::SpeciesMismatch(format!(
                "self comparisons can't be joined ({} and {})",
                file1.path, file2.path
            )));
        }

        let shared: Vec<&str> = species1
            .iter()
            .filter(|s| species2.contains(*s))
            .copied()
            .collect();
        if shared.len() != 1 {
            return Err(CneError::SpeciesMismatch(format!(
                "{} and {} share {} species, expected exactly one",
                file1.path,
                file2.path,
                shared.len()
            )));
        }
        let common = shared[0];

        let side = |species: [&str; 2]| {
            if species[0] == common {
                (Side::Ref, species[1].to_string())
            } else {
                (Side::Query, species[0].to_string())
            }
        };
        let (side1, specific1) = side(species1);
        let (side2, specific2) = side(species2);

        Ok(Self {
            common: common.to_string(),
            specific: [specific1, specific2],
            common_sides: [side1, side2],
        })
    }

    fn other(side: Side) -> Side {
        match side {
            Side::Ref => Side::Query,
            Side::Query => Side::Ref,
        }
    }

    fn record(&self, call1: &RawCall, call2: &RawCall) -> OverlapRecord {
        let common1 = call1.range(self.common_sides[0]);
        let common2 = call2.range(self.common_sides[1]);

        let mut record = OverlapRecord::new();
        record.insert(self.common.clone(), common1.envelope_with(common2));
        record.insert(
            self.specific[0].clone(),
            *call1.range(Self::other(self.common_sides[0])),
        );
        record.insert(
            self.specific[1].clone(),
            *call2.range(Self::other(self.common_sides[1])),
        );
        record
    }
}

/// Common-species intervals of the inner file, sorted by start.
///
/// No interval is longer than `max_len`, so anything overlapping `[s, e]` starts in
/// `[s - max_len, e]` and a query costs two bisections plus the hits.
struct SortedIndex {
    entries: Vec<(Interval, usize)>,
    max_len: u64,
}

impl SortedIndex {
    fn new(ranges: impl Iterator<Item = Interval>) -> Self {
        let mut entries: Vec<(Interval, usize)> = ranges.enumerate().map(|(i, r)| (r, i)).collect();
        entries.sort_unstable();
        let max_len = entries.iter().map(|(r, _)| r.len()).max().unwrap_or(0);

        Self { entries, max_len }
    }

    /// Indices of every overlapping entry, in input order.
    fn query(&self, iv: &Interval) -> Vec<usize> {
        let lo_start = iv.start.saturating_sub(self.max_len);
        let lo = self.entries.partition_point(|(r, _)| r.start < lo_start);
        let hi = self.entries.partition_point(|(r, _)| r.start <= iv.end);

        let mut hits: Vec<usize> = self.entries[lo..hi]
            .iter()
            .filter(|(r, _)| overlaps(r, iv))
            .map(|(_, i)| *i)
            .collect();
        hits.sort_unstable();
        hits
    }
}

/// Every overlapping pair of calls, outer loop over `file1`, inner over `file2`.
pub fn join(file1: &PairwiseFile, file2: &PairwiseFile) -> Result<OverlapSet> {
    let plan = JoinPlan::new(file1, file2)?;
    let index = SortedIndex::new(
        file2
            .calls
            .iter()
            .map(|c| *c.range(plan.common_sides[1])),
    );

    let mut set = OverlapSet::default();
    for call1 in &file1.calls {
        for idx in index.query(call1.range(plan.common_sides[0])) {
            let id = crate::libs::species::cne_id(&plan.common, set.len() + 1);
            set.records.insert(id, plan.record(call1, &file2.calls[idx]));
        }
    }

    log::info!(
        "{} x {}: {} overlapping pairs on {}",
        file1.path,
        file2.path,
        set.len(),
        plan.common
    );

    Ok(set)
}

/// Concatenates chunked join results, re-keying records `{prefix}_cne_{n}` with one
/// counter from 1 across all sets. `prefix` is the old ID up to `_cne_`.
pub fn combine(sets: impl IntoIterator<Item = OverlapSet>) -> OverlapSet {
    let mut combined = OverlapSet::default();

    for set in sets {
        for (id, record) in set.records {
            let prefix = id.split("_cne_").next().unwrap_or(&id);
            let new_id = crate::libs::species::cne_id(prefix, combined.len() + 1);
            combined.records.insert(new_id, record);
        }
    }

    combined
}
