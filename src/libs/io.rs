use anyhow::Context;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Opens `input` for buffered reading, `stdin` reads standard input and `.gz` files are
/// decompressed on the fly.
///
/// ```
/// use std::io::BufRead;
/// let reader = cnehg::reader("tests/cne/pairwise/aaur_vs_epal.out").unwrap();
/// assert_eq!(reader.lines().count(), 4);
///
/// assert!(cnehg::reader("tests/cne/missing.out").is_err());
/// ```
pub fn reader(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = Path::new(input);
        let file = std::fs::File::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

pub fn writer(output: &str) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output)
            .with_context(|| format!("could not create {}", output))?;
        Box::new(BufWriter::new(file))
    };

    Ok(writer)
}

/// Writes `output` only once `write` has produced all of it.
///
/// Content goes to a temporary file next to the destination, which is renamed over
/// `output` after `write` returns `Ok`. A failing run leaves no truncated file behind.
/// `stdout` is written directly.
pub fn write_atomic<F>(output: &str, write: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut dyn Write) -> anyhow::Result<()>,
{
    if output == "stdout" {
        let mut writer = writer(output)?;
        write(&mut writer)?;
        writer.flush()?;
        return Ok(());
    }

    let path = Path::new(output);
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("could not create a temporary file in {}", dir.display()))?;

    {
        let mut writer = BufWriter::new(tmp.as_file());
        write(&mut writer)?;
        writer.flush()?;
    }

    tmp.persist(path)
        .with_context(|| format!("could not write {}", path.display()))?;

    Ok(())
}

/// Expands directories into the regular files they contain (not recursive) and sorts
/// everything by file name, then by full path.
///
/// The order matters: calls are grouped first-match, so the same inputs must always be
/// read in the same order.
pub fn list_files(inputs: &[String]) -> anyhow::Result<Vec<String>> {
    let mut files: Vec<PathBuf> = vec![];

    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            for entry in std::fs::read_dir(path)
                .with_context(|| format!("could not read directory {}", path.display()))?
            {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    files.push(entry.path());
                }
            }
        } else {
            files.push(path.to_path_buf());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
    files.dedup();

    Ok(files
        .into_iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect())
}

/// File name without directories.
pub fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
