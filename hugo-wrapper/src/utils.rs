use crate::error::{Result, WrapperError};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Extract archive to a temporary directory
pub fn extract_archive(archive_path: &Path) -> Result<tempfile::TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let archive_name = archive_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| WrapperError::ArchiveExtraction {
            file: archive_path.display().to_string(),
            reason: "Invalid archive path".to_string(),
        })?;

    if archive_name.ends_with(".tar.gz") || archive_name.ends_with(".tgz") {
        extract_tar_gz(archive_path, temp_dir.path())?;
    } else if archive_name.ends_with(".zip") {
        extract_zip(archive_path, temp_dir.path())?;
    } else {
        return Err(WrapperError::ArchiveExtraction {
            file: archive_name.to_string(),
            reason: "Unsupported archive format".to_string(),
        });
    }

    Ok(temp_dir)
}

/// Extract tar.gz archive
fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)?;
    let gz_decoder = flate2::read::GzDecoder::new(file);
    let mut archive = tar::Archive::new(gz_decoder);
    archive.unpack(dest_dir)?;
    Ok(())
}

/// Extract zip archive
fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let zip_error = |e: zip::result::ZipError| WrapperError::ArchiveExtraction {
        file: archive_path.display().to_string(),
        reason: e.to_string(),
    };

    let file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(zip_error)?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(zip_error)?;
        let outpath = dest_dir.join(file.mangled_name());

        if file.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = fs::File::create(&outpath)?;
            io::copy(&mut file, &mut outfile)?;
        }

        // Set executable permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = file.unix_mode() {
                fs::set_permissions(&outpath, fs::Permissions::from_mode(mode))?;
            }
        }
    }

    Ok(())
}

/// Find a file named `name` anywhere below `dir`
pub fn find_binary(dir: &Path, name: &str) -> Result<Option<PathBuf>> {
    for entry in walkdir::WalkDir::new(dir) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() && entry.file_name() == name {
            return Ok(Some(entry.into_path()));
        }
    }
    Ok(None)
}

/// Make a file executable (Unix only)
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(windows)]
pub fn make_executable(_path: &Path) -> Result<()> {
    // No-op on Windows
    Ok(())
}

/// Calculate SHA256 hash of a file
pub fn calculate_sha256(path: &Path) -> Result<String> {
    use sha2::{Digest, Sha256};

    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Find the checksum of `filename` in `<checksum>  <filename>` formatted content
pub fn parse_checksum(content: &str, filename: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let checksum = parts.next()?;
        let file = parts.collect::<Vec<_>>().join(" ");

        if file == filename || file.ends_with(&format!("/{filename}")) {
            Some(checksum.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_tar_gz(path: &Path, entry: &str, content: &[u8]) {
        let file = fs::File::create(path).unwrap();
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);

        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, entry, content).unwrap();
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_extract_tar_gz_and_find_binary() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("hugo_0.73.0_Linux-64bit.tar.gz");
        write_tar_gz(&archive, "hugo", b"#!/bin/sh\necho hugo");

        let extracted = extract_archive(&archive).unwrap();
        let binary = find_binary(extracted.path(), "hugo").unwrap().unwrap();

        assert_eq!(fs::read(&binary).unwrap(), b"#!/bin/sh\necho hugo");
        assert!(find_binary(extracted.path(), "hugo.exe").unwrap().is_none());
    }

    #[test]
    fn test_extract_zip() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("hugo_0.73.0_Windows-64bit.zip");
        {
            let file = fs::File::create(&archive).unwrap();
            let mut zip = zip::ZipWriter::new(file);
            zip.start_file("hugo.exe", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"MZ").unwrap();
            zip.finish().unwrap();
        }

        let extracted = extract_archive(&archive).unwrap();
        let binary = find_binary(extracted.path(), "hugo.exe").unwrap().unwrap();

        assert_eq!(fs::read(binary).unwrap(), b"MZ");
    }

    #[test]
    fn test_unsupported_archive() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("hugo.tar.xz");
        fs::write(&archive, b"").unwrap();

        let result = extract_archive(&archive);
        assert!(matches!(result, Err(WrapperError::ArchiveExtraction { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_make_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let file = dir.path().join("hugo");
        fs::write(&file, "test").unwrap();

        make_executable(&file).unwrap();
        assert!(fs::metadata(&file).unwrap().permissions().mode() & 0o111 != 0);
    }

    #[test]
    fn test_calculate_sha256() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");
        fs::write(&file_path, b"Hello, World!").unwrap();

        let hash = calculate_sha256(&file_path).unwrap();
        assert_eq!(
            hash,
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn test_parse_checksum() {
        let content = r#"
abc123def456  hugo_0.73.0_Linux-64bit.tar.gz
789ghi012jkl  hugo_extended_0.73.0_Linux-64bit.tar.gz
mno345pqr678  ./dist/hugo_0.73.0_Windows-64bit.zip
"#;

        assert_eq!(
            parse_checksum(content, "hugo_0.73.0_Linux-64bit.tar.gz"),
            Some("abc123def456".to_string())
        );
        assert_eq!(
            parse_checksum(content, "hugo_extended_0.73.0_Linux-64bit.tar.gz"),
            Some("789ghi012jkl".to_string())
        );
        assert_eq!(
            parse_checksum(content, "hugo_0.73.0_Windows-64bit.zip"),
            Some("mno345pqr678".to_string())
        );
        assert_eq!(parse_checksum(content, "hugo_0.73.0_macOS-64bit.tar.gz"), None);
        assert_eq!(parse_checksum("jkl012\tfile.tar.gz", "file.tar.gz"), Some("jkl012".to_string()));
    }
}
