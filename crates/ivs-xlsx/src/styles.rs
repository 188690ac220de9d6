//! XLSX styles (styles.xml) read/write helpers

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use ivs_core::{FontStyle, NumberFormat, Style, Worksheet};

// === Writing ===

/// Custom number formats are numbered from here; lower ids are built-in
const FIRST_CUSTOM_NUMFMT_ID: u32 = 164;

#[derive(Debug)]
pub(crate) struct XlsxStyleTable {
    /// Deduplicated styles. Index corresponds to the cellXfs index (xfId).
    styles: Vec<Style>,
    /// Worksheet style index -> xfId
    xf_map: HashMap<u32, u32>,
}

#[derive(Debug, Clone, Copy)]
struct ResolvedXfIds {
    font_id: u32,
    num_fmt_id: u32,
}

impl XlsxStyleTable {
    pub(crate) fn build(sheet: &Worksheet) -> Self {
        let mut styles: Vec<Style> = Vec::new();
        let mut style_to_xf: HashMap<Style, u32> = HashMap::new();

        // Index 0 is always default style
        let default = Style::default();
        styles.push(default.clone());
        style_to_xf.insert(default, 0);

        let mut xf_map: HashMap<u32, u32> = HashMap::new();
        xf_map.insert(0, 0);

        for (_row, _col, cell) in sheet.iter_cells() {
            let local_idx = cell.style_index;
            if xf_map.contains_key(&local_idx) {
                continue;
            }

            let style = sheet
                .style_by_index(local_idx)
                .cloned()
                .unwrap_or_default();

            let xf_id = match style_to_xf.get(&style) {
                Some(&id) => id,
                None => {
                    let id = styles.len() as u32;
                    styles.push(style.clone());
                    style_to_xf.insert(style, id);
                    id
                }
            };

            xf_map.insert(local_idx, xf_id);
        }

        Self { styles, xf_map }
    }

    pub(crate) fn xf_id_for(&self, local_style_index: u32) -> u32 {
        self.xf_map.get(&local_style_index).copied().unwrap_or(0)
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        let mut font_ids: HashMap<FontStyle, u32> = HashMap::new();
        let mut fonts: Vec<FontStyle> = Vec::new();

        let default_font = FontStyle::default();
        fonts.push(default_font.clone());
        font_ids.insert(default_font, 0);

        let mut numfmt_ids: HashMap<String, u32> = HashMap::new();
        let mut numfmts: Vec<(u32, String)> = Vec::new();
        let mut next_numfmt_id = FIRST_CUSTOM_NUMFMT_ID;

        let mut resolved: Vec<ResolvedXfIds> = Vec::with_capacity(self.styles.len());

        for style in &self.styles {
            let font_id = match font_ids.get(&style.font) {
                Some(&id) => id,
                None => {
                    let id = fonts.len() as u32;
                    fonts.push(style.font.clone());
                    font_ids.insert(style.font.clone(), id);
                    id
                }
            };

            let num_fmt_id = match &style.number_format {
                NumberFormat::Custom(code) => match numfmt_ids.get(code) {
                    Some(&id) => id,
                    None => {
                        let id = next_numfmt_id;
                        next_numfmt_id += 1;
                        numfmt_ids.insert(code.clone(), id);
                        numfmts.push((id, code.clone()));
                        id
                    }
                },
                builtin => builtin.builtin_id().unwrap_or(0),
            };

            resolved.push(ResolvedXfIds {
                font_id,
                num_fmt_id,
            });
        }

        let mut xml = String::new();
        xml.push_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !numfmts.is_empty() {
            xml.push_str(&format!("\n  <numFmts count=\"{}\">", numfmts.len()));
            for (id, code) in &numfmts {
                xml.push_str(&format!(
                    "\n    <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                    id,
                    escape_xml_attr(code)
                ));
            }
            xml.push_str("\n  </numFmts>");
        }

        xml.push_str(&format!("\n  <fonts count=\"{}\">", fonts.len()));
        for font in &fonts {
            xml.push_str("\n    ");
            xml.push_str(&write_font(font));
        }
        xml.push_str("\n  </fonts>");

        // Excel requires the first two fills to be: none and gray125
        xml.push_str(
            r#"
  <fills count="2">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>
  </fills>
  <borders count="1">
    <border><left/><right/><top/><bottom/><diagonal/></border>
  </borders>
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", self.styles.len()));
        for ids in &resolved {
            xml.push_str("\n    ");
            xml.push_str(&write_xf(*ids));
        }
        xml.push_str("\n  </cellXfs>");

        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>
</styleSheet>"#,
        );
        xml
    }
}

fn escape_xml_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn write_font(font: &FontStyle) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    s.push_str(&format!("<name val=\"{}\"/>", escape_xml_attr(&font.name)));
    s.push_str("</font>");
    s
}

fn write_xf(ids: ResolvedXfIds) -> String {
    let mut attrs = String::new();
    if ids.num_fmt_id != 0 {
        attrs.push_str(" applyNumberFormat=\"1\"");
    }
    if ids.font_id != 0 {
        attrs.push_str(" applyFont=\"1\"");
    }

    format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"0\" borderId=\"0\" xfId=\"0\"{}/>",
        ids.num_fmt_id, ids.font_id, attrs
    )
}

// === Reading ===

/// Parse styles.xml into the list of cell styles, indexed by xfId
pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<Vec<Style>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut state = StylesState::default();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => state.open(&e, false)?,
            Ok(Event::Empty(e)) => state.open(&e, true)?,
            Ok(Event::End(e)) => state.close(e.name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let mut cell_xfs = state.cell_xfs;
    if cell_xfs.is_empty() {
        cell_xfs.push(Style::default());
    }

    Ok(cell_xfs)
}

#[derive(Default)]
struct StylesState {
    numfmts: HashMap<u32, String>,
    fonts: Vec<FontStyle>,
    cell_xfs: Vec<Style>,
    current_font: Option<FontStyle>,
    in_cell_xfs: bool,
}

impl StylesState {
    fn open(&mut self, e: &BytesStart<'_>, is_empty: bool) -> XlsxResult<()> {
        match e.name().as_ref() {
            b"numFmt" => {
                let id = attr_value(e, b"numFmtId")?.and_then(|s| s.parse::<u32>().ok());
                let code = attr_value(e, b"formatCode")?;
                if let (Some(id), Some(code)) = (id, code) {
                    self.numfmts.insert(id, code);
                }
            }
            b"font" => {
                let font = FontStyle {
                    name: String::new(),
                    ..FontStyle::default()
                };
                if is_empty {
                    self.fonts.push(font);
                } else {
                    self.current_font = Some(font);
                }
            }
            b"b" => {
                let bold = attr_value(e, b"val")?.map_or(true, |v| v != "0");
                if let Some(font) = self.current_font.as_mut() {
                    font.bold = bold;
                }
            }
            b"i" => {
                let italic = attr_value(e, b"val")?.map_or(true, |v| v != "0");
                if let Some(font) = self.current_font.as_mut() {
                    font.italic = italic;
                }
            }
            b"sz" => {
                let size = attr_value(e, b"val")?.and_then(|v| v.parse::<f64>().ok());
                if let (Some(font), Some(size)) = (self.current_font.as_mut(), size) {
                    font.size = size;
                }
            }
            b"name" => {
                let name = attr_value(e, b"val")?;
                if let (Some(font), Some(name)) = (self.current_font.as_mut(), name) {
                    font.name = name;
                }
            }
            b"cellXfs" => self.in_cell_xfs = !is_empty,
            b"xf" if self.in_cell_xfs => {
                let num_fmt_id = attr_value(e, b"numFmtId")?
                    .and_then(|s| s.parse::<u32>().ok())
                    .unwrap_or(0);
                let font_id = attr_value(e, b"fontId")?
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(0);
                let style = resolve_style(num_fmt_id, font_id, &self.numfmts, &self.fonts);
                self.cell_xfs.push(style);
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"font" => {
                if let Some(font) = self.current_font.take() {
                    self.fonts.push(font);
                }
            }
            b"cellXfs" => self.in_cell_xfs = false,
            _ => {}
        }
    }
}

/// Read an attribute by key, unescaped
pub(crate) fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> XlsxResult<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.to_string()));
        }
    }
    Ok(None)
}

fn resolve_style(
    num_fmt_id: u32,
    font_id: usize,
    numfmts: &HashMap<u32, String>,
    fonts: &[FontStyle],
) -> Style {
    let number_format = match numfmts.get(&num_fmt_id) {
        Some(code) => NumberFormat::from_string(code.clone()),
        None => NumberFormat::from_id(num_fmt_id),
    };

    Style {
        font: fonts.get(font_id).cloned().unwrap_or_default(),
        number_format,
    }
}
