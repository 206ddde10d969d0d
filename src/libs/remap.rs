//! Maps intervals on a padded, concatenated sequence back to scaffold coordinates.
//!
//! The pairwise aligner saw each species as one sequence made of its scaffolds joined end
//! to end. Scaffold `i` covers `[cumul[i] - len[i], cumul[i])` of that sequence, where
//! `cumul` is the running total of lengths in concatenation order.

use crate::libs::error::{CneError, Result};
use crate::libs::interval::Interval;
use std::io::{BufRead, Write};
use std::path::Path;

/// Scaffold names and lengths in concatenation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldIndex {
    names: Vec<String>,
    lengths: Vec<u64>,
    cumul: Vec<u64>,
}

/// One remapped interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remapped {
    pub id: String,
    pub padded: Interval,
    pub scaffold: String,
    pub local: Interval,
}

impl ScaffoldIndex {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut index = Self::default();
        let mut total = 0u64;
        for (name, len) in pairs {
            total += len;
            index.names.push(name.into());
            index.lengths.push(len);
            index.cumul.push(total);
        }
        index
    }

    /// Names and sequence lengths of a FASTA file.
    pub fn from_fasta(infile: &str) -> anyhow::Result<Self> {
        let reader = crate::reader(infile)?;
        let mut fa_in = noodles_fasta::io::Reader::new(reader);

        let mut pairs = vec![];
        for result in fa_in.records() {
            let record = result?;
            let name = String::from_utf8(record.name().into())?;
            pairs.push((name, record.sequence().len() as u64));
        }

        Ok(Self::from_pairs(pairs))
    }

    /// `name<TAB>length` lines.
    pub fn from_sizes<R: BufRead>(reader: R, label: &str) -> Result<Self> {
        let mut pairs = vec![];

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 2 {
                return Err(CneError::malformed(label, idx + 1, "expected name and length"));
            }
            let len = fields[1].trim().parse::<u64>().map_err(|_| {
                CneError::malformed(label, idx + 1, format!("non-numeric length '{}'", fields[1]))
            })?;
            pairs.push((fields[0].to_string(), len));
        }

        Ok(Self::from_pairs(pairs))
    }

    /// Size tables end with `.sizes`, everything else is read as FASTA.
    pub fn load(infile: &str) -> anyhow::Result<Self> {
        if infile.ends_with(".sizes") {
            let reader = crate::reader(infile)?;
            Ok(Self::from_sizes(reader, infile)?)
        } else {
            Self::from_fasta(infile)
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.cumul.last().copied().unwrap_or(0)
    }

    /// The scaffold holding `iv.end`, with both ends converted to its local coordinates.
    ///
    /// ```
    /// use cnehg::libs::interval::Interval;
    /// use cnehg::libs::remap::ScaffoldIndex;
    ///
    /// let index = ScaffoldIndex::from_pairs(vec![("scf1", 100), ("scf2", 50)]);
    /// let hit = index.remap("A_cne_1", &Interval::new(110, 120).unwrap()).unwrap();
    /// assert_eq!(hit.scaffold, "scf2");
    /// assert_eq!(hit.local, Interval::new(10, 20).unwrap());
    ///
    /// assert!(index.remap("A_cne_2", &Interval::new(140, 150).unwrap()).is_err());
    /// ```
    pub fn remap(&self, id: &str, iv: &Interval) -> Result<Remapped> {
        // first scaffold whose running total exceeds the end
        let idx = self.cumul.partition_point(|&c| c <= iv.end);
        if idx == self.cumul.len() {
            return Err(CneError::OutOfRange {
                id: id.to_string(),
                end: iv.end,
                total: self.total(),
            });
        }

        let offset = self.cumul[idx] - self.lengths[idx];
        if iv.start < offset {
            return Err(CneError::StraddlingInterval {
                id: id.to_string(),
                start: iv.start,
                end: iv.end,
                scaffold: self.names[idx].clone(),
            });
        }

        Ok(Remapped {
            id: id.to_string(),
            padded: *iv,
            scaffold: self.names[idx].clone(),
            local: Interval {
                start: iv.start - offset,
                end: iv.end - offset,
            },
        })
    }

    /// All or nothing: the first failing interval fails the whole set.
    pub fn remap_all(&self, coords: &[(String, Interval)]) -> Result<Vec<Remapped>> {
        coords.iter().map(|(id, iv)| self.remap(id, iv)).collect()
    }
}

pub fn write_remapped(rows: &[Remapped], writer: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        writer,
        "interval_id\tpadded_start\tpadded_end\tscaffold_id\toriginal_start\toriginal_end"
    )?;
    for row in rows {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            row.id, row.padded.start, row.padded.end, row.scaffold, row.local.start, row.local.end
        )?;
    }
    Ok(())
}

/// Species name of a coordinate table, `{species}_cne_coords.tsv`.
///
/// ```
/// use cnehg::libs::remap::species_of_coords;
/// assert_eq!(species_of_coords("out/aaur_cne_coords.tsv"), Some("aaur".to_string()));
/// assert_eq!(species_of_coords("aaur.tsv"), None);
/// ```
pub fn species_of_coords(path: &str) -> Option<String> {
    let name = crate::libs::io::file_name(path);
    name.strip_suffix("_cne_coords.tsv")
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// The scaffold source of `species` in `dir`: `{species}_pad.fa`, `{species}_pad.fa.gz`
/// or `{species}.sizes`, first one present.
pub fn find_scaffold_file(dir: &str, species: &str) -> Option<String> {
    [
        format!("{}_pad.fa", species),
        format!("{}_pad.fa.gz", species),
        format!("{}.sizes", species),
    ]
    .iter()
    .map(|name| Path::new(dir).join(name))
    .find(|p| p.is_file())
    .map(|p| p.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: u64, end: u64) -> Interval {
        Interval::new(start, end).unwrap()
    }

    fn index() -> ScaffoldIndex {
        ScaffoldIndex::from_pairs(vec![("scf1", 100), ("scf2", 50), ("scf3", 200)])
    }

    #[test]
    fn test_remap_boundaries() {
        let index = index();
        assert_eq!(index.total(), 350);

        let first = index.remap("x", &iv(0, 99)).unwrap();
        assert_eq!((first.scaffold.as_str(), first.local), ("scf1", iv(0, 99)));

        // the running total must exceed the end, so 100 is already in scf2
        let second = index.remap("x", &iv(100, 100)).unwrap();
        assert_eq!((second.scaffold.as_str(), second.local), ("scf2", iv(0, 0)));

        let last = index.remap("x", &iv(300, 349)).unwrap();
        assert_eq!((last.scaffold.as_str(), last.local), ("scf3", iv(150, 199)));
        assert_eq!(last.padded, iv(300, 349));
    }

    #[test]
    fn test_remap_errors() {
        let index = index();
        assert!(matches!(
            index.remap("x", &iv(300, 350)),
            Err(CneError::OutOfRange { end: 350, total: 350, .. })
        ));
        match index.remap("x", &iv(90, 110)) {
            Err(CneError::StraddlingInterval { scaffold, .. }) => assert_eq!(scaffold, "scf2"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(ScaffoldIndex::default().remap("x", &iv(0, 0)).is_err());
    }

    #[test]
    fn test_remap_all_fails_as_a_whole() {
        let index = index();
        let coords = vec![("a".to_string(), iv(5, 10)), ("b".to_string(), iv(400, 410))];
        assert!(index.remap_all(&coords).is_err());
        assert_eq!(index.remap_all(&coords[..1]).unwrap().len(), 1);
    }

    #[test]
    fn test_from_sizes() {
        let text = "scf1\t100\n\nscf2\t50\n";
        let index = ScaffoldIndex::from_sizes(text.as_bytes(), "a.sizes").unwrap();
        assert_eq!(index, ScaffoldIndex::from_pairs(vec![("scf1", 100), ("scf2", 50)]));
        assert!(ScaffoldIndex::from_sizes("scf1\tabc\n".as_bytes(), "a.sizes").is_err());
    }

    #[test]
    fn test_write_remapped() {
        let rows = vec![index().remap("A_cne_1", &iv(110, 120)).unwrap()];
        let mut buf = vec![];
        write_remapped(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().nth(1), Some("A_cne_1\t110\t120\tscf2\t10\t20"));
    }
}
