use anyhow::Context;
use calamine::{Data, Reader};
use contracts::domain::a001_supplier_feed::FeedRecord;
use std::borrow::Cow;
use std::io::Cursor;

use super::feed_downloader::FeedFile;

const CODE_COLUMN: &str = "Код";
const QUANTITY_COLUMN: &str = "Количество";
const PRICE_COLUMN: &str = "Цена";

/// Формат выгрузки, определяется по имени файла
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    /// Книга Excel/ODS: читается первый лист
    Workbook,
    /// Текст с разделителем (CSV-экспорт листа)
    Delimited,
}

impl FeedFormat {
    pub fn from_file_name(name: &str) -> anyhow::Result<Self> {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Ok(Self::Workbook),
            "csv" | "txt" => Ok(Self::Delimited),
            _ => anyhow::bail!("Unsupported supplier feed file '{}'", name),
        }
    }
}

/// Разобрать выгрузку остатков поставщика
///
/// Первые `header_row` строк листа (считая от первой строки, как в Excel)
/// пропускаются, следующая строка содержит заголовки колонок. Значения
/// остаются строками; строки без кода пропускаются.
pub fn parse_feed(
    file: &FeedFile,
    header_row: usize,
    delimiter: char,
) -> anyhow::Result<Vec<FeedRecord>> {
    let format = FeedFormat::from_file_name(&file.name)?;
    tracing::debug!("Parsing '{}' as {:?}", file.name, format);

    let (headers, rows) = match format {
        FeedFormat::Workbook => workbook_rows(&file.contents, header_row)?,
        FeedFormat::Delimited => delimited_rows(&file.contents, header_row, delimiter)?,
    };
    collect_records(&headers, rows)
}

fn workbook_rows(
    contents: &[u8],
    header_row: usize,
) -> anyhow::Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(contents))
        .context("Supplier feed is not a readable workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("Supplier workbook has no sheets")?
        .context("Cannot read the first sheet of the supplier workbook")?;

    // Диапазон начинается с первой заполненной ячейки, а не с A1
    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    let skip = header_row.checked_sub(first_row).with_context(|| {
        format!(
            "Supplier sheet starts at row {}, after header row {}",
            first_row, header_row
        )
    })?;

    let mut rows = range
        .rows()
        .skip(skip)
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let headers = rows
        .next()
        .with_context(|| format!("Supplier sheet has no header at row {}", header_row))?;
    Ok((headers, rows.collect()))
}

/// Значение ячейки в виде строки: `5.0` → `"5"`, `5990.5` → `"5990.5"`
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => value.to_string(),
        other => other.to_string(),
    }
}

fn delimited_rows(
    contents: &[u8],
    header_row: usize,
    delimiter: char,
) -> anyhow::Result<(Vec<String>, Vec<Vec<String>>)> {
    if !delimiter.is_ascii() {
        anyhow::bail!("Feed delimiter must be an ASCII character, got {:?}", delimiter);
    }

    let text = decode_text(contents);
    let table = skip_lines(&text, header_row).with_context(|| {
        format!(
            "Supplier feed has fewer than {} lines before the header",
            header_row
        )
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter as u8)
        .from_reader(table.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read feed headers")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Malformed feed row {}", row + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok((headers, rows))
}

/// UTF-8 (BOM снимается), иначе Windows-1251, как сохраняет русский Excel
fn decode_text(contents: &[u8]) -> Cow<'_, str> {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(contents);
    if !had_errors {
        return text;
    }
    tracing::debug!("Feed is not UTF-8, decoding as windows-1251");
    encoding_rs::WINDOWS_1251.decode_with_bom_removal(contents).0
}

fn collect_records(headers: &[String], rows: Vec<Vec<String>>) -> anyhow::Result<Vec<FeedRecord>> {
    tracing::debug!("Feed headers: {:?}", headers);

    // Get column by header name (trimmed, case-insensitive)
    let column = |name: &str| -> anyhow::Result<usize> {
        let wanted = name.to_lowercase();
        headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
            .with_context(|| format!("Column '{}' not found in supplier feed", name))
    };
    let code_idx = column(CODE_COLUMN)?;
    let quantity_idx = column(QUANTITY_COLUMN)?;
    let price_idx = column(PRICE_COLUMN)?;

    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for row in &rows {
        let field = |idx: usize| row.get(idx).map(|v| v.trim()).unwrap_or_default();

        let code = field(code_idx);
        if code.is_empty() {
            skipped += 1;
            continue;
        }
        records.push(FeedRecord::new(code, field(quantity_idx), field(price_idx)));
    }

    tracing::info!(
        "Supplier feed parsed: {} records, {} rows without code skipped",
        records.len(),
        skipped
    );
    Ok(records)
}

fn skip_lines(text: &str, count: usize) -> Option<&str> {
    if count == 0 {
        return Some(text);
    }
    text.match_indices('\n')
        .nth(count - 1)
        .map(|(pos, _)| &text[pos + 1..])
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Ячейка листа: текст или число
    pub(crate) enum Cell<'a> {
        Text(&'a str),
        Number(&'a str),
    }

    /// Минимальная книга .xlsx с одним листом; `rows` — (номер строки с 1, ячейки)
    pub(crate) fn xlsx_fixture(rows: &[(u32, Vec<Cell>)]) -> Vec<u8> {
        let mut sheet = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        for (row, cells) in rows {
            sheet.push_str(&format!(r#"<row r="{}">"#, row));
            for (col, cell) in cells.iter().enumerate() {
                let reference = format!("{}{}", (b'A' + col as u8) as char, row);
                match cell {
                    Cell::Text(text) => sheet.push_str(&format!(
                        r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                        reference, text
                    )),
                    Cell::Number(value) => sheet.push_str(&format!(
                        r#"<c r="{}"><v>{}</v></c>"#,
                        reference, value
                    )),
                }
            }
            sheet.push_str("</row>");
        }
        sheet.push_str("</sheetData></worksheet>");

        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#.to_string(),
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#.to_string(),
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Остатки" sheetId="1" r:id="rId1"/></sheets></workbook>"#.to_string(),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#.to_string(),
            ),
            ("xl/worksheets/sheet1.xml", sheet),
        ];

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, body) in parts {
            writer.start_file(name, options).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    pub(crate) fn supplier_sheet() -> Vec<u8> {
        use Cell::{Number, Text};
        xlsx_fixture(&[
            (1, vec![Text("Остатки на складе")]),
            (2, vec![Text("Дата: 01.03.2024")]),
            (
                4,
                vec![Text(" Код "), Text("Наименование"), Text("КОЛИЧЕСТВО"), Text("Цена")],
            ),
            (
                5,
                vec![Text("A-1"), Text("Часы"), Text(">10"), Text("5'990.00 руб.")],
            ),
            (6, vec![Text(""), Text("Итого по группе")]),
            (
                7,
                vec![Number("1002"), Text("Ремешок"), Number("5"), Number("450.5")],
            ),
        ])
    }

    fn file(name: &str, contents: &[u8]) -> FeedFile {
        FeedFile {
            name: name.to_string(),
            contents: contents.to_vec(),
        }
    }

    const SHEET: &str = "\u{FEFF}Остатки на складе\r\n\
Дата: 01.03.2024\r\n\
\r\n\
 Код ;Наименование;КОЛИЧЕСТВО;Цена\r\n\
A-1;Часы;>10;5'990.00 руб.\r\n\
;Итого по группе;;\r\n\
B-2;Ремешок;1;450.00 руб.\r\n";

    #[test]
    fn test_parse_workbook_with_preamble() {
        let records = parse_feed(&file("ostatki.xlsx", &supplier_sheet()), 3, ';').unwrap();

        assert_eq!(
            records,
            vec![
                FeedRecord::new("A-1", ">10", "5'990.00 руб."),
                FeedRecord::new("1002", "5", "450.5"),
            ]
        );
    }

    #[test]
    fn test_workbook_rows_count_from_sheet_top() {
        use Cell::{Number, Text};
        // Первая заполненная строка — вторая на листе
        let book = xlsx_fixture(&[
            (2, vec![Text("Остатки")]),
            (4, vec![Text("Код"), Text("Количество"), Text("Цена")]),
            (5, vec![Text("A"), Number("3"), Number("10")]),
        ]);

        let records = parse_feed(&file("ostatki.xlsx", &book), 3, ';').unwrap();
        assert_eq!(records, vec![FeedRecord::new("A", "3", "10")]);
    }

    #[test]
    fn test_workbook_missing_column_is_error() {
        use Cell::Text;
        let book = xlsx_fixture(&[(1, vec![Text("Код"), Text("Количество")])]);
        let err = parse_feed(&file("ostatki.xlsx", &book), 0, ';').unwrap_err();
        assert!(err.to_string().contains("Цена"));
    }

    #[test]
    fn test_cell_text_drops_integral_fraction() {
        assert_eq!(cell_text(&Data::Float(5.0)), "5");
        assert_eq!(cell_text(&Data::Float(5990.5)), "5990.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_parse_delimited_with_preamble() {
        let records = parse_feed(&file("ostatki.csv", SHEET.as_bytes()), 3, ';').unwrap();

        assert_eq!(
            records,
            vec![
                FeedRecord::new("A-1", ">10", "5'990.00 руб."),
                FeedRecord::new("B-2", "1", "450.00 руб."),
            ]
        );
    }

    #[test]
    fn test_short_rows_get_empty_fields() {
        let text = "Код,Количество,Цена\nA,3\n";
        let records = parse_feed(&file("feed.csv", text.as_bytes()), 0, ',').unwrap();
        assert_eq!(records, vec![FeedRecord::new("A", "3", "")]);
    }

    #[test]
    fn test_delimited_missing_column_is_error() {
        let text = "Код;Количество\nA;3\n";
        let err = parse_feed(&file("feed.csv", text.as_bytes()), 0, ';').unwrap_err();
        assert!(err.to_string().contains("Цена"));
    }

    #[test]
    fn test_windows_1251_export_is_decoded() {
        let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode("Код;Количество;Цена\nА1;7;100.00\n");
        let records = parse_feed(&file("feed.csv", &bytes), 0, ';').unwrap();
        assert_eq!(records, vec![FeedRecord::new("А1", "7", "100.00")]);
    }

    #[test]
    fn test_preamble_longer_than_file_is_error() {
        assert!(parse_feed(&file("feed.csv", b"one line\n"), 5, ';').is_err());
    }

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(FeedFormat::from_file_name("ostatki.xls").unwrap(), FeedFormat::Workbook);
        assert_eq!(FeedFormat::from_file_name("OSTATKI.XLSX").unwrap(), FeedFormat::Workbook);
        assert_eq!(FeedFormat::from_file_name("ostatki.csv").unwrap(), FeedFormat::Delimited);
        assert!(FeedFormat::from_file_name("ostatki.pdf").is_err());
        assert!(FeedFormat::from_file_name("ostatki").is_err());
    }

    #[test]
    fn test_skip_lines() {
        assert_eq!(skip_lines("a\nb\nc", 0), Some("a\nb\nc"));
        assert_eq!(skip_lines("a\nb\nc", 2), Some("c"));
        assert_eq!(skip_lines("a\nb", 2), None);
    }
}
