//! XLSX reader
//!
//! Reads the subset of SpreadsheetML the writer produces, plus shared
//! strings, which other writers use for text: sheet names and order, text,
//! number and boolean cells, column widths and whole-cell fonts.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::debug;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::decode_excel_escapes;
use crate::styles::{attr_value, read_styles_xml};
use cellfix_core::{CellAddress, CellValue, Style, Workbook, Worksheet};

/// Sheet entry from workbook.xml
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::NotXlsx("no [Content_Types].xml".into()));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)
            .map_err(|e| e.in_part("xl/sharedStrings.xml"))?;
        let cell_styles =
            Self::read_styles(&mut archive).map_err(|e| e.in_part("xl/styles.xml"))?;
        let sheet_info =
            Self::read_workbook_xml(&mut archive).map_err(|e| e.in_part("xl/workbook.xml"))?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)
            .map_err(|e| e.in_part("xl/_rels/workbook.xml.rels"))?;

        let mut workbook = Workbook::empty();

        for info in sheet_info {
            let path = sheet_paths.get(&info.rel_id).ok_or_else(|| {
                XlsxError::MissingPart(format!(
                    "relationship {} for sheet '{}'",
                    info.rel_id, info.name
                ))
            })?;

            let file = archive
                .by_name(path)
                .map_err(|_| XlsxError::MissingPart(path.clone()))?;

            let mut worksheet = Worksheet::new(&info.name);
            Self::read_worksheet(file, &mut worksheet, &shared_strings, &cell_styles)
                .map_err(|e| e.in_part(path))?;
            debug!(
                sheet = %info.name,
                cells = worksheet.cell_count(),
                "worksheet read"
            );
            workbook.add_existing_worksheet(worksheet)?;
        }

        Ok(workbook)
    }

    fn read_entry_if_present<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        name: &str,
    ) -> XlsxResult<Option<Vec<u8>>> {
        let mut file = match archive.by_name(name) {
            Ok(f) => f,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }

    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let bytes = match Self::read_entry_if_present(archive, "xl/sharedStrings.xml")? {
            Some(b) => b,
            None => return Ok(Vec::new()),
        };

        let mut xml_reader = Reader::from_reader(bytes.as_slice());
        let mut buf = Vec::new();
        let mut strings = Vec::new();

        let mut current: Option<String> = None;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"si" => current = Some(String::new()),
                    b"rPh" => in_phonetic = true,
                    b"t" if !in_phonetic => in_t = true,
                    _ => {}
                },
                Event::Empty(e) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Event::Text(t) if in_t => {
                    if let Some(s) = current.as_mut() {
                        s.push_str(&t.unescape()?);
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"si" => {
                        if let Some(s) = current.take() {
                            strings.push(decode_excel_escapes(&s));
                        }
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    fn read_styles<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<Vec<Style>> {
        match Self::read_entry_if_present(archive, "xl/styles.xml")? {
            Some(bytes) => read_styles_xml(bytes.as_slice()),
            None => Ok(Vec::new()),
        }
    }

    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<SheetInfo>> {
        let bytes = Self::read_entry_if_present(archive, "xl/workbook.xml")?
            .ok_or_else(|| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(bytes.as_slice());
        xml_reader.trim_text(true);
        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                    let name = attr_value(&e, b"name")?
                        .ok_or_else(|| XlsxError::BadValue("sheet without name".into()))?;
                    let rel_id = attr_value(&e, b"id")?.ok_or_else(|| {
                        XlsxError::BadValue(format!("sheet '{}' without r:id", name))
                    })?;
                    sheets.push(SheetInfo { name, rel_id });
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Map relationship ids to archive paths of worksheet parts
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let bytes = Self::read_entry_if_present(archive, "xl/_rels/workbook.xml.rels")?
            .ok_or_else(|| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(bytes.as_slice());
        xml_reader.trim_text(true);
        let mut buf = Vec::new();
        let mut paths = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e)
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    if let (Some(id), Some(target)) =
                        (attr_value(&e, b"Id")?, attr_value(&e, b"Target")?)
                    {
                        let path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("xl/{}", target),
                        };
                        paths.insert(id, path);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(paths)
    }

    fn read_worksheet<R: Read>(
        reader: R,
        worksheet: &mut Worksheet,
        shared_strings: &[String],
        cell_styles: &[Style],
    ) -> XlsxResult<()> {
        let mut xml_reader = Reader::from_reader(BufReader::new(reader));
        // Whitespace inside <t> is content; only text inside <t>/<v> is kept
        xml_reader.trim_text(false);
        let mut buf = Vec::new();

        // xf id -> index in this worksheet's style pool
        let mut style_map: HashMap<u32, u32> = HashMap::new();

        let mut current_row: u32 = 0;
        let mut seen_row = false;
        let mut next_col: u16 = 0;

        let mut cell_addr: Option<CellAddress> = None;
        let mut cell_type: Option<String> = None;
        let mut cell_xf: u32 = 0;
        let mut value_text = String::new();
        let mut inline_text = String::new();
        let mut in_v = false;
        let mut in_inline_t = false;
        let mut in_is = false;
        let mut in_phonetic = false;

        loop {
            let event = xml_reader.read_event_into(&mut buf)?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    match e.local_name().as_ref() {
                        b"row" => {
                            if let Some(r) = attr_value(e, b"r")? {
                                current_row = r
                                    .parse::<u32>()
                                    .ok()
                                    .and_then(|r| r.checked_sub(1))
                                    .ok_or_else(|| {
                                        XlsxError::BadValue(format!("invalid row number '{}'", r))
                                    })?;
                            } else if seen_row {
                                current_row += 1;
                            }
                            seen_row = true;
                            next_col = 0;
                        }
                        b"col" => {
                            let min = attr_value(e, b"min")?.and_then(|v| v.parse::<u16>().ok());
                            let max = attr_value(e, b"max")?.and_then(|v| v.parse::<u16>().ok());
                            let width = attr_value(e, b"width")?.and_then(|v| v.parse::<f64>().ok());
                            if let (Some(min), Some(max), Some(width)) = (min, max, width) {
                                for col in min.max(1)..=max {
                                    worksheet.set_column_width(col - 1, width);
                                }
                            }
                        }
                        b"c" => {
                            let addr = match attr_value(e, b"r")? {
                                Some(r) => CellAddress::parse(&r)?,
                                None => CellAddress::new(current_row, next_col),
                            };
                            next_col = addr.col.saturating_add(1);
                            cell_type = attr_value(e, b"t")?;
                            cell_xf = match attr_value(e, b"s")? {
                                Some(s) => s.parse().map_err(|_| {
                                    XlsxError::BadValue(format!("invalid style index '{}'", s))
                                })?,
                                None => 0,
                            };
                            value_text.clear();
                            inline_text.clear();

                            if is_empty {
                                Self::store_cell(
                                    worksheet,
                                    addr,
                                    None,
                                    cell_xf,
                                    cell_styles,
                                    &mut style_map,
                                )?;
                            } else {
                                cell_addr = Some(addr);
                            }
                        }
                        b"v" if cell_addr.is_some() && !is_empty => in_v = true,
                        b"is" if cell_addr.is_some() && !is_empty => in_is = true,
                        b"rPh" if in_is && !is_empty => in_phonetic = true,
                        b"t" if in_is && !in_phonetic && !is_empty => in_inline_t = true,
                        _ => {}
                    }
                }
                Event::Text(ref t) => {
                    if in_v {
                        value_text.push_str(&t.unescape()?);
                    } else if in_inline_t {
                        inline_text.push_str(&t.unescape()?);
                    }
                }
                Event::End(ref e) => match e.local_name().as_ref() {
                    b"v" => in_v = false,
                    b"t" => in_inline_t = false,
                    b"rPh" => in_phonetic = false,
                    b"is" => in_is = false,
                    b"c" => {
                        if let Some(addr) = cell_addr.take() {
                            let value = Self::cell_value(
                                addr,
                                cell_type.as_deref(),
                                &value_text,
                                &inline_text,
                                shared_strings,
                            )?;
                            Self::store_cell(
                                worksheet,
                                addr,
                                value,
                                cell_xf,
                                cell_styles,
                                &mut style_map,
                            )?;
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    fn cell_value(
        addr: CellAddress,
        cell_type: Option<&str>,
        value_text: &str,
        inline_text: &str,
        shared_strings: &[String],
    ) -> XlsxResult<Option<CellValue>> {
        let value = match cell_type {
            Some("inlineStr") => Some(CellValue::String(decode_excel_escapes(inline_text))),
            Some("s") => {
                let idx: usize = value_text.trim().parse().map_err(|_| {
                    XlsxError::BadValue(format!("invalid shared string index in {}", addr))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::BadValue(format!("shared string {} out of range in {}", idx, addr))
                })?;
                Some(CellValue::String(s.clone()))
            }
            Some("str") => Some(CellValue::String(decode_excel_escapes(value_text))),
            Some("b") => Some(CellValue::Boolean(value_text.trim() == "1")),
            _ if value_text.is_empty() => None,
            _ => {
                let n: f64 = value_text.trim().parse().map_err(|_| {
                    XlsxError::BadValue(format!("invalid number '{}' in {}", value_text, addr))
                })?;
                Some(CellValue::Number(n))
            }
        };
        Ok(value)
    }

    fn store_cell(
        worksheet: &mut Worksheet,
        addr: CellAddress,
        value: Option<CellValue>,
        xf_id: u32,
        cell_styles: &[Style],
        style_map: &mut HashMap<u32, u32>,
    ) -> XlsxResult<()> {
        if let Some(value) = value {
            worksheet.set_cell_value_at(addr.row, addr.col, value)?;
        }

        if xf_id == 0 {
            return Ok(());
        }

        let local = match style_map.get(&xf_id) {
            Some(&idx) => idx,
            None => {
                let style = cell_styles.get(xf_id as usize).cloned().ok_or_else(|| {
                    XlsxError::BadValue(format!("cell {} references missing style {}", addr, xf_id))
                })?;
                let idx = worksheet.register_style(style);
                style_map.insert(xf_id, idx);
                idx
            }
        };

        if local != 0 {
            worksheet.set_cell_style_index_at(addr.row, addr.col, local)?;
        }
        Ok(())
    }
}
