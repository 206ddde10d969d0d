//! Pairwise comparison files.
//!
//! One tab-separated row per candidate CNE with 11 columns:
//!
//! ```text
//! ref_chrom ref_start ref_end ref_strand query_chrom query_start query_end query_strand ref_length query_length sim
//! ```
//!
//! Species come from the file name, `{ref}_vs_{query}.out`. Anything after the first
//! `.out` is ignored, so chunks such as `aaur_vs_epal.out_3` keep their species.

use crate::libs::error::{CneError, Result};
use crate::libs::interval::Interval;
use std::io::BufRead;

pub const N_COLUMNS: usize = 11;

/// One row of a pairwise file. Only the two intervals are used by the clustering,
/// everything else is carried along.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCall {
    pub ref_chrom: String,
    pub ref_range: Interval,
    pub ref_strand: String,
    pub query_chrom: String,
    pub query_range: Interval,
    pub query_strand: String,
    pub ref_length: String,
    pub query_length: String,
    pub sim: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Ref,
    Query,
}

impl RawCall {
    pub fn range(&self, side: Side) -> &Interval {
        match side {
            Side::Ref => &self.ref_range,
            Side::Query => &self.query_range,
        }
    }
}

/// A parsed pairwise file.
#[derive(Debug, Clone)]
pub struct PairwiseFile {
    pub path: String,
    pub ref_species: String,
    pub query_species: String,
    pub calls: Vec<RawCall>,
}

impl PairwiseFile {
    pub fn read(path: &str) -> anyhow::Result<Self> {
        let (ref_species, query_species) = species_from_filename(path)?;
        let reader = crate::reader(path)?;
        let calls = parse_calls(reader, path)?;

        Ok(Self {
            path: path.to_string(),
            ref_species,
            query_species,
            calls,
        })
    }

    pub fn species(&self) -> [&str; 2] {
        [&self.ref_species, &self.query_species]
    }
}

/// ```
/// use cnehg::libs::pairwise::species_from_filename;
/// assert_eq!(
///     species_from_filename("dir/aaur_vs_epal.out").unwrap(),
///     ("aaur".to_string(), "epal".to_string())
/// );
/// assert_eq!(
///     species_from_filename("aaur_vs_epal.out_12").unwrap(),
///     ("aaur".to_string(), "epal".to_string())
/// );
/// assert!(species_from_filename("aaur_epal.out").is_err());
/// assert!(species_from_filename("a_vs_b_vs_c.out").is_err());
/// ```
pub fn species_from_filename(path: &str) -> Result<(String, String)> {
    let name = crate::libs::io::file_name(path);
    let stem = match name.find(".out") {
        Some(idx) => &name[..idx],
        None => return Err(CneError::MalformedFileName(name)),
    };

    let parts: Vec<&str> = stem.split("_vs_").collect();
    if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(CneError::MalformedFileName(name));
    }

    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// Parses every row. The first non-empty line is a header when it has all 11 columns and
/// none of its four coordinates is a number; any other line that doesn't parse aborts
/// the whole file, since skipped rows would shift the IDs assigned downstream.
pub fn parse_calls<R: BufRead>(reader: R, label: &str) -> Result<Vec<RawCall>> {
    let mut calls = vec![];
    let mut first = true;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if first {
            first = false;
            if is_header(&fields) {
                continue;
            }
        }

        calls.push(parse_row(&fields, label, idx + 1)?);
    }

    Ok(calls)
}

/// A full-width row with no numeric coordinate at all.
fn is_header(fields: &[&str]) -> bool {
    fields.len() == N_COLUMNS
        && [1, 2, 5, 6]
            .iter()
            .all(|&i| fields[i].trim().parse::<u64>().is_err())
}

fn parse_row(fields: &[&str], label: &str, line: usize) -> Result<RawCall> {
    if fields.len() != N_COLUMNS {
        return Err(CneError::malformed(
            label,
            line,
            format!("expected {} columns, found {}", N_COLUMNS, fields.len()),
        ));
    }

    let ref_range = parse_range(fields[1], fields[2], label, line)?;
    let query_range = parse_range(fields[5], fields[6], label, line)?;

    Ok(RawCall {
        ref_chrom: fields[0].to_string(),
        ref_range,
        ref_strand: fields[3].to_string(),
        query_chrom: fields[4].to_string(),
        query_range,
        query_strand: fields[7].to_string(),
        ref_length: fields[8].to_string(),
        query_length: fields[9].to_string(),
        sim: fields[10].to_string(),
    })
}

pub(crate) fn parse_range(start: &str, end: &str, label: &str, line: usize) -> Result<Interval> {
    let parse = |s: &str| {
        s.trim().parse::<u64>().map_err(|_| {
            CneError::malformed(label, line, format!("non-numeric coordinate '{}'", s))
        })
    };
    let (start, end) = (parse(start)?, parse(end)?);

    Interval::new(start, end).ok_or_else(|| {
        CneError::malformed(label, line, format!("start {} is after end {}", start, end))
    })
}
