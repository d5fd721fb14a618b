//! XLSX styles (styles.xml) read/write helpers

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::escape_xml;
use cellfix_core::style::{FontStyle, Style, Underline};
use cellfix_core::Workbook;

// === Writing ===

#[derive(Debug)]
pub(crate) struct XlsxStyleTable {
    /// Global, deduplicated styles. Index corresponds to the cellXfs index (xfId).
    styles: Vec<Style>,
    /// Per-worksheet mapping: local worksheet style index -> global xfId.
    sheet_maps: Vec<HashMap<u32, u32>>,
}

impl XlsxStyleTable {
    /// Collect the workbook's styles, rejecting fonts Excel cannot size.
    pub(crate) fn build(workbook: &Workbook) -> XlsxResult<Self> {
        let mut styles: Vec<Style> = Vec::new();
        let mut style_to_xf: HashMap<Style, u32> = HashMap::new();

        // Index 0 is always default style
        let default = Style::default();
        styles.push(default.clone());
        style_to_xf.insert(default, 0);

        let mut sheet_maps: Vec<HashMap<u32, u32>> = Vec::with_capacity(workbook.sheet_count());

        for sheet in workbook.worksheets() {
            let mut map: HashMap<u32, u32> = HashMap::new();
            map.insert(0, 0);

            for (_row, _col, cell) in sheet.iter_cells() {
                let local_idx = cell.style_index;
                if map.contains_key(&local_idx) {
                    continue;
                }

                let style = sheet
                    .style_by_index(local_idx)
                    .cloned()
                    .unwrap_or_default();
                if !(style.font.size.is_finite() && style.font.size > 0.0) {
                    return Err(XlsxError::Unwritable(format!(
                        "font size {} on sheet '{}' must be a positive number",
                        style.font.size,
                        sheet.name()
                    )));
                }

                let xf_id = *style_to_xf.entry(style.clone()).or_insert_with(|| {
                    styles.push(style);
                    (styles.len() - 1) as u32
                });

                map.insert(local_idx, xf_id);
            }

            sheet_maps.push(map);
        }

        Ok(Self { styles, sheet_maps })
    }

    pub(crate) fn xf_id_for(&self, sheet_index: usize, local_style_index: u32) -> u32 {
        self.sheet_maps
            .get(sheet_index)
            .and_then(|m| m.get(&local_style_index).copied())
            .unwrap_or(0)
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        let mut font_ids: HashMap<&FontStyle, u32> = HashMap::new();
        let mut fonts: Vec<&FontStyle> = Vec::new();
        let mut xf_font_ids: Vec<u32> = Vec::with_capacity(self.styles.len());

        for style in &self.styles {
            let font_id = *font_ids.entry(&style.font).or_insert_with(|| {
                fonts.push(&style.font);
                (fonts.len() - 1) as u32
            });
            xf_font_ids.push(font_id);
        }

        let mut xml = String::new();
        xml.push_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

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
        for (style, font_id) in self.styles.iter().zip(&xf_font_ids) {
            xml.push_str("\n    ");
            xml.push_str(&write_xf(style, *font_id));
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

fn write_font(font: &FontStyle) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    match font.underline {
        Underline::None => {}
        Underline::Single => s.push_str("<u/>"),
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    s.push_str(&format!("<name val=\"{}\"/>", escape_xml(&font.name)));
    s.push_str("</font>");
    s
}

fn write_xf(style: &Style, font_id: u32) -> String {
    let apply_font = if style.font != FontStyle::default() {
        " applyFont=\"1\""
    } else {
        ""
    };
    format!(
        "<xf numFmtId=\"0\" fontId=\"{}\" fillId=\"0\" borderId=\"0\" xfId=\"0\"{}/>",
        font_id, apply_font
    )
}

// === Reading ===

/// Read the value of an attribute by local name.
pub(crate) fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> XlsxResult<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Boolean font flags like `<b/>` may carry `val="0"` to switch them off.
fn flag_value(e: &BytesStart<'_>) -> XlsxResult<bool> {
    Ok(!matches!(
        attr_value(e, b"val")?.as_deref(),
        Some("0") | Some("false")
    ))
}

fn str_to_underline(s: Option<&str>) -> Underline {
    match s {
        Some("none") => Underline::None,
        // Double and accounting underlines have no counterpart; they still underline
        _ => Underline::Single,
    }
}

/// Read styles.xml and resolve each `cellXfs` entry into a [`Style`].
///
/// The returned vector is indexed by the `s` attribute of worksheet cells.
pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<Vec<Style>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();

    let mut fonts: Vec<FontStyle> = Vec::new();
    let mut xf_font_ids: Vec<usize> = Vec::new();

    let mut in_fonts = false;
    let mut in_cell_xfs = false;
    let mut current_font: Option<FontStyle> = None;

    loop {
        let event = xml_reader.read_event_into(&mut buf)?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.local_name().as_ref() {
                    b"fonts" if !is_empty => in_fonts = true,
                    b"cellXfs" if !is_empty => in_cell_xfs = true,

                    b"font" if in_fonts => {
                        if is_empty {
                            fonts.push(FontStyle::default());
                        } else {
                            current_font = Some(FontStyle::default());
                        }
                    }
                    b"b" => {
                        if let Some(font) = current_font.as_mut() {
                            font.bold = flag_value(e)?;
                        }
                    }
                    b"i" => {
                        if let Some(font) = current_font.as_mut() {
                            font.italic = flag_value(e)?;
                        }
                    }
                    b"u" => {
                        if let Some(font) = current_font.as_mut() {
                            font.underline = str_to_underline(attr_value(e, b"val")?.as_deref());
                        }
                    }
                    b"sz" => {
                        if let Some(font) = current_font.as_mut() {
                            if let Some(v) = attr_value(e, b"val")? {
                                font.size = v.parse().map_err(|_| {
                                    XlsxError::BadValue(format!("invalid font size '{}'", v))
                                })?;
                            }
                        }
                    }
                    b"name" => {
                        if let Some(font) = current_font.as_mut() {
                            if let Some(v) = attr_value(e, b"val")? {
                                font.name = v;
                            }
                        }
                    }

                    b"xf" if in_cell_xfs => {
                        let font_id = match attr_value(e, b"fontId")? {
                            Some(v) => v.parse().map_err(|_| {
                                XlsxError::BadValue(format!("invalid fontId '{}'", v))
                            })?,
                            None => 0,
                        };
                        xf_font_ids.push(font_id);
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"fonts" => in_fonts = false,
                b"cellXfs" => in_cell_xfs = false,
                b"font" if in_fonts => {
                    if let Some(font) = current_font.take() {
                        fonts.push(font);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    xf_font_ids
        .into_iter()
        .map(|font_id| {
            fonts
                .get(font_id)
                .cloned()
                .map(Style::from_font)
                .ok_or_else(|| XlsxError::BadValue(format!("cellXfs references missing font {}", font_id)))
        })
        .collect()
}
