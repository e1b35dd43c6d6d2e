// ============================================================
// BUNDLE DECODER
// ============================================================
// Zip archives: every supported entry is decoded independently

use std::io::{Cursor, Read};

use zip::ZipArchive;

use super::decode_file;
use crate::domain::batch::{DecodedFile, FileFormat};
use crate::domain::error::AppError;

/// Decode every supported entry of a zip archive. Failures are captured
/// per entry; an unreadable archive yields a single failed entry.
pub fn decode_bundle(bundle_name: &str, bytes: &[u8], max_entry_bytes: u64) -> Vec<DecodedFile> {
    let mut archive = match ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => archive,
        Err(e) => {
            return vec![DecodedFile::failed(
                bundle_name,
                AppError::DecodeError(format!("Failed to open zip archive: {}", e)),
            )]
        }
    };

    let mut files = Vec::new();

    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                files.push(DecodedFile::failed(
                    format!("{}#{}", bundle_name, index),
                    AppError::DecodeError(format!("Failed to read zip entry: {}", e)),
                ));
                continue;
            }
        };

        // Skip directories
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        if !should_process(&name) {
            continue;
        }

        let Some(format) = FileFormat::from_file_name(&name) else {
            tracing::debug!(bundle = bundle_name, entry = %name, "ignoring unsupported bundle entry");
            continue;
        };

        if format == FileFormat::Bundle {
            files.push(DecodedFile::failed(
                name,
                AppError::DecodeError("Nested bundles are not supported".to_string()),
            ));
            continue;
        }

        if entry.size() > max_entry_bytes {
            files.push(DecodedFile::failed(
                name,
                AppError::DecodeError(format!("Entry exceeds {} bytes", max_entry_bytes)),
            ));
            continue;
        }

        let mut buffer = Vec::new();
        if let Err(e) = (&mut entry).take(max_entry_bytes).read_to_end(&mut buffer) {
            files.push(DecodedFile::failed(
                name,
                AppError::DecodeError(format!("Failed to extract entry: {}", e)),
            ));
            continue;
        }

        files.push(decode_file(&name, &buffer, format));
    }

    tracing::info!(bundle = bundle_name, entries = files.len(), "extracted bundle");
    files
}

fn should_process(name: &str) -> bool {
    if name.starts_with("__MACOSX/") || name.contains("/__MACOSX/") {
        return false;
    }

    let base = name.rsplit('/').next().unwrap_or(name);
    !base.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::CompressionMethod;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options: FileOptions<'_, ()> =
                FileOptions::default().compression_method(CompressionMethod::Stored);
            for (name, content) in entries {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_good_and_corrupt_entries_are_isolated() {
        let bytes = build_zip(&[
            ("people.csv", b"Name,Phone\nAnn,5551234\n".as_slice()),
            ("broken.xlsx", b"not a workbook".as_slice()),
            ("readme.md", b"ignored".as_slice()),
        ]);

        let files = decode_bundle("upload.zip", &bytes, 1024 * 1024);
        assert_eq!(files.len(), 2);

        let good = files.iter().find(|f| f.file == "people.csv").unwrap();
        assert_eq!(good.tables.as_ref().unwrap()[0].records.len(), 1);

        let bad = files.iter().find(|f| f.file == "broken.xlsx").unwrap();
        assert!(bad.tables.is_err());
    }

    #[test]
    fn test_metadata_entries_skipped() {
        let bytes = build_zip(&[
            ("__MACOSX/._people.csv", b"junk".as_slice()),
            ("data/.hidden.csv", b"junk".as_slice()),
            ("data/people.csv", b"Name\nAnn\n".as_slice()),
        ]);

        let files = decode_bundle("upload.zip", &bytes, 1024 * 1024);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file, "data/people.csv");
    }

    #[test]
    fn test_nested_bundle_is_skipped() {
        let inner = build_zip(&[("a.csv", b"Name\nAnn\n".as_slice())]);
        let bytes = build_zip(&[("inner.zip", inner.as_slice())]);

        let files = decode_bundle("outer.zip", &bytes, 1024 * 1024);
        assert_eq!(files.len(), 1);
        assert!(files[0].tables.is_err());
    }

    #[test]
    fn test_oversized_entry_is_skipped() {
        let bytes = build_zip(&[("big.csv", b"Name\nAnn\nBob\nCy\n".as_slice())]);
        let files = decode_bundle("upload.zip", &bytes, 4);
        assert!(files[0].tables.is_err());
    }

    #[test]
    fn test_unreadable_archive() {
        let files = decode_bundle("upload.zip", b"not a zip", 1024);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file, "upload.zip");
        assert!(files[0].tables.is_err());
    }
}
