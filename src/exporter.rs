// src/exporter.rs

use crate::keyed_vectors::KeyedVectors;
use std::fs::File;
use std::io::{self, BufWriter, Write};

// 1. Define Data Structures

/// Paths of the two files a successful export produced, returned so the
/// caller can log them.
pub struct ExportArtifacts {
    pub tensor_path: String,
    pub metadata_path: String,
}

// 2. Error Handling
#[derive(Debug)]
pub enum ExporterError {
    IoError(io::Error),
    EmptyPrefix,
    VectorMissing(String),
}

impl std::fmt::Display for ExporterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExporterError::IoError(e) => write!(f, "IO error: {}", e),
            ExporterError::EmptyPrefix => write!(f, "Output prefix must not be empty"),
            ExporterError::VectorMissing(word) => {
                write!(f, "Vocabulary word '{}' has no vector", word)
            }
        }
    }
}

impl std::error::Error for ExporterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExporterError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ExporterError {
    fn from(err: io::Error) -> ExporterError {
        ExporterError::IoError(err)
    }
}

// 3. Implement the Export

/// Writes `<prefix>_tensor.tsv` and `<prefix>_metadata.tsv` for the given
/// model, truncating any existing files at those paths.
///
/// Line `i` of the metadata file is the word at vocabulary position `i`;
/// line `i` of the tensor file is its vector, components tab-separated and
/// rendered with `f32`'s `Display` (shortest round-trip decimal), so
/// repeated exports of the same model are byte-identical. Words containing
/// tab or newline characters are written as-is and will corrupt the line
/// alignment; the TSV format has no escaping.
///
/// A write failure leaves whatever partial output was already flushed; the
/// files are not cleaned up.
pub fn export(model: &KeyedVectors, output_prefix: &str) -> Result<ExportArtifacts, ExporterError> {
    if output_prefix.is_empty() {
        return Err(ExporterError::EmptyPrefix);
    }

    let tensor_path = format!("{}_tensor.tsv", output_prefix);
    let metadata_path = format!("{}_metadata.tsv", output_prefix);

    // Handles are dropped on every exit path, error returns included.
    let mut tensor_file = BufWriter::new(File::create(&tensor_path)?);
    let mut metadata_file = BufWriter::new(File::create(&metadata_path)?);

    for word in &model.index_to_word {
        let vector = model
            .vector(word)
            .ok_or_else(|| ExporterError::VectorMissing(word.clone()))?;
        metadata_file.write_all(word.as_bytes())?;
        metadata_file.write_all(b"\n")?;
        let row: Vec<String> = vector.iter().map(|x| x.to_string()).collect();
        tensor_file.write_all(row.join("\t").as_bytes())?;
        tensor_file.write_all(b"\n")?;
    }

    tensor_file.flush()?;
    metadata_file.flush()?;

    Ok(ExportArtifacts {
        tensor_path,
        metadata_path,
    })
}

// 4. Unit Tests
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn cat_dog_model() -> KeyedVectors {
        KeyedVectors::from_entries(
            vec![
                ("cat".to_string(), vec![0.1, 0.2, 0.3]),
                ("dog".to_string(), vec![0.4, 0.5, 0.6]),
            ],
            3,
        )
        .unwrap()
    }

    #[test]
    fn test_export_cat_dog_example() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("out").to_str().unwrap().to_string();

        let artifacts = export(&cat_dog_model(), &prefix).unwrap();

        assert_eq!(artifacts.tensor_path, format!("{}_tensor.tsv", prefix));
        assert_eq!(artifacts.metadata_path, format!("{}_metadata.tsv", prefix));
        assert_eq!(
            fs::read_to_string(&artifacts.metadata_path).unwrap(),
            "cat\ndog\n"
        );
        assert_eq!(
            fs::read_to_string(&artifacts.tensor_path).unwrap(),
            "0.1\t0.2\t0.3\n0.4\t0.5\t0.6\n"
        );
    }

    #[test]
    fn test_export_row_and_column_counts() {
        let entries: Vec<(String, Vec<f32>)> = (0..50)
            .map(|i| (format!("word{}", i), vec![i as f32, -(i as f32), 0.5]))
            .collect();
        let model = KeyedVectors::from_entries(entries, 3).unwrap();

        let dir = tempdir().unwrap();
        let prefix = dir.path().join("counts").to_str().unwrap().to_string();
        let artifacts = export(&model, &prefix).unwrap();

        let metadata = fs::read_to_string(&artifacts.metadata_path).unwrap();
        let tensor = fs::read_to_string(&artifacts.tensor_path).unwrap();
        let metadata_lines: Vec<&str> = metadata.lines().collect();
        let tensor_lines: Vec<&str> = tensor.lines().collect();

        assert_eq!(metadata_lines.len(), model.len());
        assert_eq!(tensor_lines.len(), model.len());
        for line in &tensor_lines {
            assert_eq!(line.split('\t').count(), 3);
        }
    }

    #[test]
    fn test_export_lines_align_with_model_lookup() {
        let model = cat_dog_model();
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("align").to_str().unwrap().to_string();
        let artifacts = export(&model, &prefix).unwrap();

        let metadata = fs::read_to_string(&artifacts.metadata_path).unwrap();
        let tensor = fs::read_to_string(&artifacts.tensor_path).unwrap();

        for (word_line, vector_line) in metadata.lines().zip(tensor.lines()) {
            let expected = model.vector(word_line).unwrap();
            let parsed: Vec<f32> = vector_line
                .split('\t')
                .map(|s| s.parse::<f32>().unwrap())
                .collect();
            assert_eq!(parsed.as_slice(), expected);
        }
    }

    #[test]
    fn test_export_is_deterministic() {
        let model = cat_dog_model();
        let dir = tempdir().unwrap();
        let prefix_a = dir.path().join("a").to_str().unwrap().to_string();
        let prefix_b = dir.path().join("b").to_str().unwrap().to_string();

        let first = export(&model, &prefix_a).unwrap();
        let second = export(&model, &prefix_b).unwrap();

        assert_eq!(
            fs::read(&first.tensor_path).unwrap(),
            fs::read(&second.tensor_path).unwrap()
        );
        assert_eq!(
            fs::read(&first.metadata_path).unwrap(),
            fs::read(&second.metadata_path).unwrap()
        );
    }

    #[test]
    fn test_export_overwrites_previous_output() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("same").to_str().unwrap().to_string();

        let big: Vec<(String, Vec<f32>)> = (0..20)
            .map(|i| (format!("w{}", i), vec![i as f32]))
            .collect();
        export(&KeyedVectors::from_entries(big, 1).unwrap(), &prefix).unwrap();

        let small = KeyedVectors::from_entries(vec![("only".to_string(), vec![9.0])], 1).unwrap();
        let artifacts = export(&small, &prefix).unwrap();

        assert_eq!(
            fs::read_to_string(&artifacts.metadata_path).unwrap(),
            "only\n"
        );
        assert_eq!(fs::read_to_string(&artifacts.tensor_path).unwrap(), "9\n");
    }

    #[test]
    fn test_export_empty_prefix_rejected() {
        let result = export(&cat_dog_model(), "");
        assert!(matches!(result, Err(ExporterError::EmptyPrefix)));
    }

    #[test]
    fn test_export_unwritable_directory() {
        let model = cat_dog_model();
        let result = export(&model, "no_such_dir/deeper/out");
        assert!(matches!(result, Err(ExporterError::IoError(_))));
    }

    #[test]
    fn test_export_missing_vector_surfaced() {
        let mut model = cat_dog_model();
        model.vectors.remove("dog");
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("broken").to_str().unwrap().to_string();

        let result = export(&model, &prefix);
        assert!(
            matches!(result, Err(ExporterError::VectorMissing(ref w)) if w == "dog")
        );
    }

    #[test]
    fn test_export_empty_vocabulary() {
        let model = KeyedVectors::from_entries(Vec::new(), 4).unwrap();
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("empty").to_str().unwrap().to_string();

        let artifacts = export(&model, &prefix).unwrap();
        assert_eq!(fs::read_to_string(&artifacts.metadata_path).unwrap(), "");
        assert_eq!(fs::read_to_string(&artifacts.tensor_path).unwrap(), "");
    }
}
