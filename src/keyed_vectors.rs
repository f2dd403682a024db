// src/keyed_vectors.rs

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};

// 1. Define Data Structures

/// A loaded word-embedding model: an ordered vocabulary plus a lookup from
/// each word to its embedding vector. The vocabulary order is the order the
/// words appeared in the input file, and enumeration over `index_to_word`
/// is the one deterministic iteration order callers may rely on.
pub struct KeyedVectors {
    pub index_to_word: Vec<String>,
    pub vectors: HashMap<String, Vec<f32>>,
    pub dim: usize,
}

// 2. Error Handling
#[derive(Debug)]
pub enum KeyedVectorsError {
    IoError(io::Error),
    HeaderError(String),
    FormatError(String),
    TruncatedFile(String),
    DuplicateWord(String),
    InvalidUtf8(String),
}

impl std::fmt::Display for KeyedVectorsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyedVectorsError::IoError(e) => write!(f, "IO error: {}", e),
            KeyedVectorsError::HeaderError(s) => write!(f, "Invalid header: {}", s),
            KeyedVectorsError::FormatError(s) => write!(f, "Invalid format: {}", s),
            KeyedVectorsError::TruncatedFile(s) => write!(f, "Truncated file: {}", s),
            KeyedVectorsError::DuplicateWord(s) => write!(f, "Duplicate word in vocabulary: {}", s),
            KeyedVectorsError::InvalidUtf8(s) => write!(f, "Invalid UTF-8 in word: {}", s),
        }
    }
}

impl std::error::Error for KeyedVectorsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KeyedVectorsError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for KeyedVectorsError {
    fn from(err: io::Error) -> KeyedVectorsError {
        KeyedVectorsError::IoError(err)
    }
}

impl KeyedVectors {
    /// Builds a model from `(word, vector)` pairs in vocabulary order.
    /// Every vector must have exactly `dim` components and words must be
    /// unique.
    pub fn from_entries(
        entries: Vec<(String, Vec<f32>)>,
        dim: usize,
    ) -> Result<KeyedVectors, KeyedVectorsError> {
        let mut index_to_word = Vec::with_capacity(entries.len());
        let mut vectors = HashMap::with_capacity(entries.len());
        for (word, vector) in entries {
            if vector.len() != dim {
                return Err(KeyedVectorsError::FormatError(format!(
                    "word '{}' has {} vector components, expected {}",
                    word,
                    vector.len(),
                    dim
                )));
            }
            if vectors.insert(word.clone(), vector).is_some() {
                return Err(KeyedVectorsError::DuplicateWord(word));
            }
            index_to_word.push(word);
        }
        Ok(KeyedVectors {
            index_to_word,
            vectors,
            dim,
        })
    }

    /// Looks up the embedding vector for `word`, if present.
    pub fn vector(&self, word: &str) -> Option<&[f32]> {
        self.vectors.get(word).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.index_to_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_word.is_empty()
    }
}

// 3. Header Parsing (shared by both serializations)

// The first line of a word2vec file is "<vocab_size> <dim>".
fn parse_header(line: &str) -> Result<(usize, usize), KeyedVectorsError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(KeyedVectorsError::HeaderError(format!(
            "expected '<vocab_size> <dim>', got '{}'",
            line.trim_end()
        )));
    }
    let vocab_size = parts[0].parse::<usize>().map_err(|_| {
        KeyedVectorsError::HeaderError(format!("vocabulary size is not a number: '{}'", parts[0]))
    })?;
    let dim = parts[1].parse::<usize>().map_err(|_| {
        KeyedVectorsError::HeaderError(format!("dimensionality is not a number: '{}'", parts[1]))
    })?;
    Ok((vocab_size, dim))
}

// 4. Implement the word2vec Text Parser
pub fn load_word2vec_text(path: &str) -> Result<KeyedVectors, KeyedVectorsError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header = lines.next().ok_or_else(|| {
        KeyedVectorsError::HeaderError(format!("file '{}' is empty", path))
    })??;
    let (vocab_size, dim) = parse_header(&header)?;

    let mut entries = Vec::with_capacity(vocab_size);
    for row in 0..vocab_size {
        let line = lines.next().ok_or_else(|| {
            KeyedVectorsError::TruncatedFile(format!(
                "header promised {} words but the file ends after {}",
                vocab_size, row
            ))
        })??;
        let mut fields = line.split_whitespace();
        let word = fields.next().ok_or_else(|| {
            KeyedVectorsError::FormatError(format!("row {} is empty", row))
        })?;
        let mut components = Vec::with_capacity(dim);
        for field in fields {
            let value = field.parse::<f32>().map_err(|_| {
                KeyedVectorsError::FormatError(format!(
                    "row {} ('{}'): invalid vector component '{}'",
                    row, word, field
                ))
            })?;
            components.push(value);
        }
        if components.len() != dim {
            return Err(KeyedVectorsError::FormatError(format!(
                "row {} ('{}') has {} vector components, expected {}",
                row,
                word,
                components.len(),
                dim
            )));
        }
        entries.push((word.to_string(), components));
    }

    KeyedVectors::from_entries(entries, dim)
}

// 5. Implement the word2vec Binary Parser
//
// Layout produced by the original word2vec C tool: the text header line,
// then for each word its bytes up to a 0x20 separator followed by `dim`
// little-endian f32 values. A '\n' written after the previous vector is
// skipped when it precedes the next word.
pub fn load_word2vec_binary(path: &str) -> Result<KeyedVectors, KeyedVectorsError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut header_bytes = Vec::new();
    reader.read_until(b'\n', &mut header_bytes)?;
    let header = std::str::from_utf8(&header_bytes)
        .map_err(|_| KeyedVectorsError::HeaderError("header is not valid UTF-8".to_string()))?;
    let (vocab_size, dim) = parse_header(header)?;

    let mut entries = Vec::with_capacity(vocab_size);
    for row in 0..vocab_size {
        let mut word_bytes = Vec::new();
        loop {
            let mut byte = [0u8; 1];
            reader.read_exact(&mut byte).map_err(|e| {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    KeyedVectorsError::TruncatedFile(format!(
                        "header promised {} words but the file ends after {}",
                        vocab_size, row
                    ))
                } else {
                    KeyedVectorsError::IoError(e)
                }
            })?;
            match byte[0] {
                b' ' => break,
                b'\n' if word_bytes.is_empty() => continue,
                b => word_bytes.push(b),
            }
        }
        let word = String::from_utf8(word_bytes).map_err(|e| {
            KeyedVectorsError::InvalidUtf8(format!(
                "row {}: {:?}",
                row,
                e.as_bytes()
            ))
        })?;

        let mut vector_bytes = vec![0u8; dim * std::mem::size_of::<f32>()];
        reader.read_exact(&mut vector_bytes).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                KeyedVectorsError::TruncatedFile(format!(
                    "vector for row {} ('{}') is cut short",
                    row, word
                ))
            } else {
                KeyedVectorsError::IoError(e)
            }
        })?;
        let mut components = Vec::with_capacity(dim);
        for chunk in vector_bytes.chunks_exact(std::mem::size_of::<f32>()) {
            components.push(f32::from_le_bytes(chunk.try_into().unwrap())); // unwrap is safe due to chunks_exact
        }
        entries.push((word, components));
    }

    KeyedVectors::from_entries(entries, dim)
}

// 6. Format Dispatch
pub fn load_word2vec_format(path: &str, binary: bool) -> Result<KeyedVectors, KeyedVectorsError> {
    if binary {
        load_word2vec_binary(path)
    } else {
        load_word2vec_text(path)
    }
}
