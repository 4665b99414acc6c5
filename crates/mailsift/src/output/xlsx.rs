//! XLSX generation for filtered tables.
//!
//! Produces a minimal single-sheet SpreadsheetML package. Every cell is an
//! inline string, so text that looks numeric stays text.

use std::io::{Cursor, Seek, Write};

use quick_xml::escape::escape;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{MailsiftError, Result};

use super::table::OutputTable;

/// Sheet name used when none is configured.
pub const DEFAULT_SHEET_NAME: &str = "Filtered";

/// Row limit of a single worksheet.
const MAX_SHEET_ROWS: usize = 1_048_576;

/// Longest text a single cell may hold.
const MAX_CELL_CHARS: usize = 32_767;

/// Longest sheet name a workbook accepts.
const MAX_SHEET_NAME_LEN: usize = 31;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// XLSX document writer.
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    sheet_name: String,
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self::new(DEFAULT_SHEET_NAME)
    }
}

impl XlsxWriter {
    /// Create a writer whose single sheet has the given name.
    pub fn new(sheet_name: &str) -> Self {
        Self {
            sheet_name: sanitize_sheet_name(sheet_name),
        }
    }

    /// Name the sheet will be written with.
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Generate the workbook as bytes.
    pub fn generate(&self, table: &OutputTable) -> Result<Vec<u8>> {
        let total_rows = table.row_count() + 1;
        if total_rows > MAX_SHEET_ROWS {
            return Err(MailsiftError::Spreadsheet(format!(
                "{} rows exceed the worksheet limit of {}",
                total_rows, MAX_SHEET_ROWS
            )));
        }

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        // Fixed timestamps keep identical tables byte-identical.
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        self.write_content_types(&mut zip, options)?;
        self.write_root_rels(&mut zip, options)?;
        self.write_workbook(&mut zip, options)?;
        self.write_workbook_rels(&mut zip, options)?;
        self.write_styles(&mut zip, options)?;
        self.write_sheet(&mut zip, options, table)?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    /// Write [Content_Types].xml
    fn write_content_types<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("[Content_Types].xml", options)?;

        let content = format!(
            r#"{XML_DECLARATION}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
  <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
  <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#
        );

        write_part(zip, &content)
    }

    /// Write _rels/.rels
    fn write_root_rels<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("_rels/.rels", options)?;

        let content = format!(
            r#"{XML_DECLARATION}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
        );

        write_part(zip, &content)
    }

    /// Write xl/workbook.xml
    fn write_workbook<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("xl/workbook.xml", options)?;

        let content = format!(
            r#"{XML_DECLARATION}
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="{}" sheetId="1" r:id="rId1"/>
  </sheets>
</workbook>"#,
            escape(self.sheet_name.as_str())
        );

        write_part(zip, &content)
    }

    /// Write xl/_rels/workbook.xml.rels
    fn write_workbook_rels<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;

        let content = format!(
            r#"{XML_DECLARATION}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#
        );

        write_part(zip, &content)
    }

    /// Write xl/styles.xml with the single default cell format.
    fn write_styles<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("xl/styles.xml", options)?;

        let content = format!(
            r#"{XML_DECLARATION}
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
  <fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
  <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
  <cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
  <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
</styleSheet>"#
        );

        write_part(zip, &content)
    }

    /// Write xl/worksheets/sheet1.xml, header first.
    fn write_sheet<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        table: &OutputTable,
    ) -> Result<()> {
        zip.start_file("xl/worksheets/sheet1.xml", options)?;

        write_part(
            zip,
            &format!(
                "{XML_DECLARATION}\n<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\"><sheetData>"
            ),
        )?;

        for (row_idx, row) in table.all_rows().enumerate() {
            let row_ref = row_idx + 1;
            let mut xml = format!("<row r=\"{}\">", row_ref);

            for (col_idx, cell) in row.iter().enumerate() {
                let text = strip_invalid_xml_chars(cell);
                if text.is_empty() {
                    continue;
                }
                let chars = text.chars().count();
                if chars > MAX_CELL_CHARS {
                    return Err(MailsiftError::Spreadsheet(format!(
                        "cell {}{} holds {} characters, over the cell limit of {}",
                        column_name(col_idx),
                        row_ref,
                        chars,
                        MAX_CELL_CHARS
                    )));
                }
                xml.push_str(&format!(
                    "<c r=\"{}{}\" t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                    column_name(col_idx),
                    row_ref,
                    escape(text.as_str())
                ));
            }

            xml.push_str("</row>");
            write_part(zip, &xml)?;
        }

        write_part(zip, "</sheetData></worksheet>")
    }
}

fn write_part<W: Write + Seek>(zip: &mut ZipWriter<W>, content: &str) -> Result<()> {
    zip.write_all(content.as_bytes())
        .map_err(|e| MailsiftError::Archive(e.into()))
}

/// Convert a zero-based column index to letters (0 = A, 25 = Z, 26 = AA).
fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Drop characters XML 1.0 cannot represent.
fn strip_invalid_xml_chars(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r')
                || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
        })
        .collect()
}

fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim().to_string();

    if cleaned.is_empty() {
        DEFAULT_SHEET_NAME.to_string()
    } else {
        cleaned
    }
}
