//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::{attr_value, read_styles_xml};
use ivs_core::style::Style;
use ivs_core::{CellAddress, CellValue, Worksheet};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }

        let mut hex_chars = String::new();
        let mut saw_x = false;
        let mut decoded = None;

        if chars.peek() == Some(&'x') {
            chars.next();
            saw_x = true;

            while hex_chars.len() < 4 {
                match chars.peek() {
                    Some(&ch) if ch.is_ascii_hexdigit() => {
                        hex_chars.push(ch);
                        chars.next();
                    }
                    _ => break,
                }
            }

            if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
                chars.next();
                decoded = u32::from_str_radix(&hex_chars, 16)
                    .ok()
                    .and_then(char::from_u32);
            }
        }

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                // Not an escape, keep what was consumed
                result.push('_');
                if saw_x {
                    result.push('x');
                }
                result.push_str(&hex_chars);
            }
        }
    }

    result
}

/// XLSX file reader
///
/// Loads the first worksheet of a workbook: values, formulas, fonts,
/// number formats and column widths.
pub struct XlsxReader;

impl XlsxReader {
    /// Read the first worksheet from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Worksheet> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read the first worksheet from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Worksheet> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let cell_styles = Self::read_styles(&mut archive)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let (name, r_id) = sheet_info
            .into_iter()
            .next()
            .ok_or_else(|| XlsxError::InvalidFormat("workbook has no sheets".into()))?;
        let path = sheet_paths
            .get(&r_id)
            .ok_or_else(|| XlsxError::MissingPart(format!("worksheet for {}", r_id)))?;

        let mut worksheet = Worksheet::new(name);
        Self::read_worksheet(
            &mut archive,
            path,
            &mut worksheet,
            &shared_strings,
            &cell_styles,
        )?;

        Ok(worksheet)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"t" if in_si => {
                        in_t = true;
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"t" => {
                        in_t = false;
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    if let Ok(text) = e.unescape() {
                        current_string.push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    fn read_styles<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<Vec<Style>> {
        match archive.by_name("xl/styles.xml") {
            Ok(file) => read_styles_xml(file),
            Err(_) => Ok(vec![Style::default()]),
        }
    }

    /// Read workbook.xml to get sheet names and rIds
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    let name = attr_value(&e, b"name")?;
                    let r_id = attr_value(&e, b"r:id")?;
                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id")?;
                    let target = attr_value(&e, b"Target")?;
                    let rel_type = attr_value(&e, b"Type")?;

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ folder
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read a worksheet from the archive
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
        shared_strings: &[String],
        cell_styles: &[Style],
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut cell = PendingCell::default();
        let mut in_value = false;
        let mut in_formula = false;
        let mut in_inline_text = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"c" => cell = PendingCell::from_start(&e)?,
                    b"v" => in_value = true,
                    b"f" => in_formula = true,
                    b"t" => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"c" => {
                        PendingCell::from_start(&e)?.apply(
                            worksheet,
                            shared_strings,
                            cell_styles,
                        )?;
                    }
                    b"col" => Self::apply_column_width(worksheet, &e)?,
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        std::mem::take(&mut cell).apply(worksheet, shared_strings, cell_styles)?;
                    }
                    b"v" => in_value = false,
                    b"f" => in_formula = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if let Ok(text) = e.unescape() {
                        if in_value {
                            cell.value = Some(text.trim().to_string());
                        } else if in_formula {
                            cell.formula = Some(text.trim().to_string());
                        } else if in_inline_text {
                            cell.inline.push_str(&text);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    /// Apply a `<col min max width/>` entry
    fn apply_column_width(worksheet: &mut Worksheet, e: &BytesStart<'_>) -> XlsxResult<()> {
        let min = attr_value(e, b"min")?.and_then(|s| s.parse::<u16>().ok());
        let max = attr_value(e, b"max")?.and_then(|s| s.parse::<u16>().ok());
        let width = attr_value(e, b"width")?.and_then(|s| s.parse::<f64>().ok());

        if let (Some(min), Some(width)) = (min, width) {
            let max = max.unwrap_or(min);
            for col in min.max(1)..=max {
                worksheet.set_column_width_at(col - 1, width)?;
            }
        }
        Ok(())
    }
}

/// Cell state collected between `<c>` and `</c>`
#[derive(Debug, Default)]
struct PendingCell {
    reference: Option<String>,
    cell_type: Option<String>,
    style: Option<u32>,
    value: Option<String>,
    formula: Option<String>,
    inline: String,
}

impl PendingCell {
    fn from_start(e: &BytesStart<'_>) -> XlsxResult<Self> {
        Ok(Self {
            reference: attr_value(e, b"r")?,
            cell_type: attr_value(e, b"t")?,
            style: attr_value(e, b"s")?.and_then(|s| s.parse().ok()),
            ..Self::default()
        })
    }

    fn apply(
        self,
        worksheet: &mut Worksheet,
        shared_strings: &[String],
        cell_styles: &[Style],
    ) -> XlsxResult<()> {
        let Some(reference) = self.reference else {
            return Ok(());
        };
        let addr = CellAddress::parse(&reference)?;

        let value = if let Some(formula) = self.formula {
            CellValue::formula(formula)
        } else {
            match (self.cell_type.as_deref(), self.value) {
                (Some("inlineStr"), _) => CellValue::String(decode_excel_escapes(&self.inline)),
                (Some("s"), Some(v)) => {
                    let idx: usize = v
                        .parse()
                        .map_err(|_| XlsxError::Parse(format!("bad shared string index {}", v)))?;
                    let s = shared_strings.get(idx).ok_or_else(|| {
                        XlsxError::Parse(format!("shared string {} out of range", idx))
                    })?;
                    CellValue::String(s.clone())
                }
                (Some("str"), Some(v)) => CellValue::String(decode_excel_escapes(&v)),
                (Some("b"), Some(v)) => CellValue::Boolean(v == "1"),
                (_, Some(v)) => match v.parse::<f64>() {
                    Ok(n) => CellValue::Number(n),
                    Err(_) => CellValue::String(v),
                },
                (_, None) => CellValue::Empty,
            }
        };

        if let Some(style) = self.style.and_then(|idx| cell_styles.get(idx as usize)) {
            if *style != Style::default() {
                worksheet.set_cell_style_at(addr.row, addr.col, style)?;
            }
        }
        if !value.is_empty() {
            worksheet.set_cell_value_at(addr.row, addr.col, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_decode_excel_escapes_carriage_return() {
        assert_eq!(decode_excel_escapes("hello_x000d_world"), "hello\rworld");
    }

    #[test]
    fn test_decode_excel_escapes_multiple() {
        assert_eq!(
            decode_excel_escapes("line1_x000d__x000a_line2"),
            "line1\r\nline2"
        );
    }

    #[test]
    fn test_decode_excel_escapes_underscore() {
        assert_eq!(decode_excel_escapes("under_x005f_score"), "under_score");
    }

    #[test]
    fn test_decode_excel_escapes_partial_sequence() {
        // Incomplete sequences should be left as-is
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x000d"), "_x000d");
        assert_eq!(decode_excel_escapes("PART_NO"), "PART_NO");
        assert_eq!(decode_excel_escapes("A_xB"), "A_xB");
    }

    #[test]
    fn test_decode_excel_escapes_uppercase() {
        assert_eq!(decode_excel_escapes("_x000D_"), "\r");
    }

    fn minimal_xlsx(sheet_xml: &[u8], shared_strings: Option<&[u8]>) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let cursor = Cursor::new(&mut buf);
            let mut zip = zip::ZipWriter::new(cursor);
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#).unwrap();

            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Inventory" sheetId="1" r:id="rId1"/></sheets></workbook>"#).unwrap();

            zip.start_file("xl/_rels/workbook.xml.rels", options)
                .unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#).unwrap();

            if let Some(sst) = shared_strings {
                zip.start_file("xl/sharedStrings.xml", options).unwrap();
                zip.write_all(sst).unwrap();
            }

            zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
            zip.write_all(sheet_xml).unwrap();

            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_read_empty_xlsx() {
        let bytes = minimal_xlsx(
            br#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData></sheetData></worksheet>"#,
            None,
        );

        let sheet = XlsxReader::read(Cursor::new(bytes)).unwrap();
        assert_eq!(sheet.name(), "Inventory");
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_read_cell_types() {
        let bytes = minimal_xlsx(
            br#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<cols><col min="2" max="3" width="34.25" customWidth="1"/></cols>
<sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>Bolt_x000a_M6</t></is></c></row>
<row r="2"><c r="D2"><v>12.5</v></c><c r="E2" t="b"><v>1</v></c><c r="G2"><f>SUM(D2*F2)</f><v>0</v></c></row>
</sheetData></worksheet>"#,
            Some(br#"<?xml version="1.0"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>Location</t></si></sst>"#),
        );

        let sheet = XlsxReader::read(Cursor::new(bytes)).unwrap();
        assert_eq!(sheet.get_value("A1").unwrap().as_string(), Some("Location"));
        assert_eq!(sheet.get_value("B1").unwrap().as_string(), Some("Bolt\nM6"));
        assert_eq!(sheet.get_value("D2").unwrap().as_number(), Some(12.5));
        assert_eq!(sheet.get_value("E2").unwrap().as_bool(), Some(true));
        assert_eq!(
            sheet.get_value("G2").unwrap().formula_text(),
            Some("=SUM(D2*F2)")
        );
        assert!((sheet.column_width_at(1) - 34.25).abs() < 0.001);
        assert!((sheet.column_width_at(2) - 34.25).abs() < 0.001);
    }

    #[test]
    fn test_read_not_a_zip() {
        assert!(matches!(
            XlsxReader::read(Cursor::new(b"Location,Part".to_vec())),
            Err(XlsxError::Zip(_))
        ));
    }
}
