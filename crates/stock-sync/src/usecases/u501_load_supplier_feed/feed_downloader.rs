use anyhow::Context;
use std::io::{Cursor, Read};
use std::path::Path;

/// Верхняя граница предварительного выделения под файл из архива
const MAX_PREALLOC_BYTES: u64 = 16 * 1024 * 1024;

/// Файл выгрузки поставщика: имя определяет формат разбора
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFile {
    pub name: String,
    pub contents: Vec<u8>,
}

/// Скачать архив с остатками поставщика целиком в память
pub async fn download(client: &reqwest::Client, url: &str) -> anyhow::Result<Vec<u8>> {
    tracing::info!("Downloading supplier feed: {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download supplier feed from {}", url))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("Supplier feed download failed: HTTP {} for {}", status, url);
    }

    let bytes = response
        .bytes()
        .await
        .context("Failed to read supplier feed body")?;
    tracing::debug!("Supplier feed downloaded: {} bytes", bytes.len());
    Ok(bytes.to_vec())
}

/// Прочитать локальную выгрузку: архив или уже распакованный файл
pub fn read_local(
    path: &Path,
    entry: Option<&str>,
    extension: &str,
) -> anyhow::Result<FeedFile> {
    tracing::info!("Reading supplier feed from: {}", path.display());
    let bytes =
        std::fs::read(path).with_context(|| format!("Cannot read feed file {}", path.display()))?;

    let is_zip = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"));
    if is_zip {
        extract(bytes, entry, extension)
    } else {
        Ok(FeedFile {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            contents: bytes,
        })
    }
}

/// Достать файл выгрузки из zip-архива, не распаковывая его на диск
///
/// Если имя файла не задано, берётся первый файл с расширением `extension`.
pub fn extract(
    archive: Vec<u8>,
    entry: Option<&str>,
    extension: &str,
) -> anyhow::Result<FeedFile> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(archive)).context("Supplier feed is not a valid zip")?;

    let index = match entry {
        Some(name) => archive
            .index_for_name(name)
            .with_context(|| format!("Entry '{}' not found in supplier archive", name))?,
        None => find_by_extension(&mut archive, extension)?,
    };

    let mut file = archive
        .by_index(index)
        .with_context(|| format!("Cannot open archive entry #{}", index))?;
    tracing::info!("Extracting '{}' ({} bytes)", file.name(), file.size());

    let name = file.name().to_string();
    let mut contents = Vec::with_capacity(preallocation(file.size()));
    file.read_to_end(&mut contents)
        .with_context(|| format!("Cannot read archive entry '{}'", name))?;
    Ok(FeedFile { name, contents })
}

/// Размер из заголовка архива не проверен: выделяем не больше лимита
fn preallocation(declared_size: u64) -> usize {
    usize::try_from(declared_size.min(MAX_PREALLOC_BYTES)).unwrap_or(0)
}

fn find_by_extension(
    archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>,
    extension: &str,
) -> anyhow::Result<usize> {
    let suffix = format!(".{}", extension.trim_start_matches('.').to_lowercase());
    for i in 0..archive.len() {
        let file = archive
            .by_index(i)
            .with_context(|| format!("Cannot open archive entry #{}", i))?;
        if !file.is_dir() && file.name().to_lowercase().ends_with(&suffix) {
            return Ok(i);
        }
    }
    anyhow::bail!("No '{}' file found in supplier archive", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn archive(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, body) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_first_file_with_extension() {
        let bytes = archive(&[("readme.txt", "hello"), ("ostatki.CSV", "Код;Цена")]);
        let file = extract(bytes, None, "csv").unwrap();
        assert_eq!(file.name, "ostatki.CSV");
        assert_eq!(file.contents, "Код;Цена".as_bytes());
    }

    #[test]
    fn test_extract_named_entry() {
        let bytes = archive(&[("a.csv", "first"), ("b.csv", "second")]);
        let file = extract(bytes, Some("b.csv"), "csv").unwrap();
        assert_eq!(file.contents, b"second");
    }

    #[test]
    fn test_missing_entry_is_error() {
        let bytes = archive(&[("a.txt", "x")]);
        assert!(extract(bytes.clone(), None, "csv").is_err());
        assert!(extract(bytes, Some("b.csv"), "csv").is_err());
    }

    #[test]
    fn test_declared_size_does_not_drive_allocation() {
        assert_eq!(preallocation(1024), 1024);
        assert_eq!(preallocation(u64::MAX), MAX_PREALLOC_BYTES as usize);
    }

    #[test]
    fn test_local_plain_file_keeps_its_name() {
        let path = std::env::temp_dir().join(format!("ostatki-{}.xls", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"raw").unwrap();

        let file = read_local(&path, None, "xls").unwrap();
        std::fs::remove_file(&path).ok();

        assert!(file.name.ends_with(".xls"));
        assert_eq!(file.contents, b"raw");
    }

    #[test]
    fn test_garbage_is_not_a_zip() {
        assert!(extract(b"not a zip".to_vec(), None, "csv").is_err());
    }
}
