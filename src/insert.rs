//! Search-and-insert editing of text files.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsertError {
    #[error("placement of zero is not valid; use +1 for after or -1 for before the match")]
    ZeroPlacement,

    #[error("skip = -1 (insert at every match) is not supported")]
    AllMatchesUnsupported,

    #[error("skip must be -1 or a non-negative count, got {0}")]
    InvalidSkip(i64),

    #[error("'{search}' found {found} time(s), cannot skip {skip}")]
    NotEnoughMatches {
        search: String,
        found: usize,
        skip: usize,
    },

    #[error("target line {target} is outside the file (0..={len})")]
    TargetOutOfRange { target: i64, len: usize },

    #[error("environment variable '{0}' is not set")]
    MissingEnvVar(String),

    #[error("I/O error on {path}: {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One insertion request.
#[derive(Debug, Clone)]
pub struct InsertRequest {
    /// Literal substring to look for.
    pub search: String,
    /// Matches to pass over before the one used; `-1` means every match.
    pub skip: i64,
    /// Signed offset from the matched line; never zero.
    pub placement: i64,
    /// Text to insert as a new line.
    pub pattern: String,
}

impl InsertRequest {
    /// Check the parameters that do not depend on file contents.
    pub fn validate(&self) -> Result<usize, InsertError> {
        if self.placement == 0 {
            return Err(InsertError::ZeroPlacement);
        }
        match self.skip {
            -1 => Err(InsertError::AllMatchesUnsupported),
            s if s < 0 => Err(InsertError::InvalidSkip(s)),
            s => Ok(s as usize),
        }
    }
}

/// Replace `placeholder` in `pattern` with the value of the environment
/// variable it names (`$angle` and `angle` both read `angle`).
pub fn substitute_env(pattern: &str, placeholder: &str) -> Result<String, InsertError> {
    let name = placeholder.trim_start_matches('$').trim_matches(|c| c == '{' || c == '}');
    let value = std::env::var(name).map_err(|_| InsertError::MissingEnvVar(name.to_string()))?;
    Ok(pattern.replace(placeholder, &value))
}

/// Insert the pattern into `lines` (each keeping its line terminator) and
/// return the zero-based index it was inserted at.
pub fn insert_line(lines: &mut Vec<String>, request: &InsertRequest) -> Result<usize, InsertError> {
    let skip = request.validate()?;

    let matches: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(&request.search))
        .map(|(i, _)| i)
        .collect();

    let matched = *matches.get(skip).ok_or_else(|| InsertError::NotEnoughMatches {
        search: request.search.clone(),
        found: matches.len(),
        skip,
    })?;

    let target = matched as i64 + request.placement;
    if target < 0 || target > lines.len() as i64 {
        return Err(InsertError::TargetOutOfRange {
            target,
            len: lines.len(),
        });
    }
    let target = target as usize;

    // the line before the insertion point may be the unterminated last line
    if target == lines.len() {
        if let Some(last) = lines.last_mut() {
            if !last.ends_with('\n') {
                last.push('\n');
            }
        }
    }

    let mut new_line = request.pattern.clone();
    if !new_line.ends_with('\n') {
        new_line.push('\n');
    }
    lines.insert(target, new_line);
    Ok(target)
}

/// Split text into lines that keep their `\n` terminators.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// Read `input`, insert the pattern, write `output`.
///
/// When both paths name the same file the result is written to a temporary
/// file in the same directory and then moved over the input.
pub fn insert_into_file(input: &Path, output: &Path, request: &InsertRequest) -> Result<usize, InsertError> {
    request.validate()?;

    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| InsertError::Io { path, source }
    };

    let text = std::fs::read_to_string(input).map_err(io_err(input))?;
    let mut lines = split_lines(&text);
    let target = insert_line(&mut lines, request)?;
    log::info!("Inserting pattern at line {target}");

    if same_file(input, output) {
        let dir = input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err(dir))?;
        write_lines(tmp.as_file_mut(), &lines).map_err(io_err(tmp.path()))?;
        tmp.persist(output)
            .map_err(|e| InsertError::Io {
                path: output.to_path_buf(),
                source: e.error,
            })?;
    } else {
        let mut file = std::fs::File::create(output).map_err(io_err(output))?;
        write_lines(&mut file, &lines).map_err(io_err(output))?;
    }
    Ok(target)
}

fn write_lines(out: &mut impl Write, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        out.write_all(line.as_bytes())?;
    }
    out.flush()
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
