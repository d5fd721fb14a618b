//! XLSX writer

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::{encode_excel_escapes, escape_xml, needs_space_preserve};
use crate::styles::XlsxStyleTable;
use cellfix_core::{CellAddress, CellValue, Workbook, Worksheet};

/// XLSX file writer
///
/// Output is deterministic: every package entry carries the same fixed
/// timestamp, so an unchanged workbook always serializes to the same bytes.
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(workbook, file)
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        if workbook.is_empty() {
            return Err(XlsxError::Unwritable(
                "a workbook needs at least one worksheet".into(),
            ));
        }

        // Build a workbook-wide style table.
        let style_table = XlsxStyleTable::build(workbook)?;

        let mut zip = ZipWriter::new(writer);

        Self::write_content_types(&mut zip, workbook)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, workbook)?;
        Self::write_workbook_rels(&mut zip, workbook)?;
        Self::write_styles_xml(&mut zip, &style_table)?;

        for (i, sheet) in workbook.worksheets().enumerate() {
            Self::write_worksheet(&mut zip, sheet, i, &style_table)?;
        }

        zip.finish()?;
        debug!(sheets = workbook.sheet_count(), "xlsx package written");
        Ok(())
    }

    fn entry_options() -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
    }

    fn write_entry<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        name: String,
        content: &str,
    ) -> XlsxResult<()> {
        zip.start_file(name, Self::entry_options())?;
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");
        Self::write_entry(zip, "[Content_Types].xml".to_string(), &content)
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut ZipWriter<W>) -> XlsxResult<()> {
        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;
        Self::write_entry(zip, "_rels/.rels".to_string(), content)
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <bookViews><workbookView activeTab="0"/></bookViews>
    <sheets>"#,
        );

        for (i, sheet) in workbook.worksheets().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(sheet.name()),
                i + 1,
                i + 1
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );
        Self::write_entry(zip, "xl/workbook.xml".to_string(), &content)
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        let styles_rid = workbook.sheet_count() + 1;
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            styles_rid
        ));

        content.push_str("\n</Relationships>");
        Self::write_entry(zip, "xl/_rels/workbook.xml.rels".to_string(), &content)
    }

    fn write_styles_xml<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<()> {
        Self::write_entry(zip, "xl/styles.xml".to_string(), &style_table.to_styles_xml())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        sheet: &Worksheet,
        index: usize,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<()> {
        let content = Self::worksheet_xml(sheet, index, style_table)?;
        Self::write_entry(zip, format!("xl/worksheets/sheet{}.xml", index + 1), &content)
    }

    fn worksheet_xml(
        sheet: &Worksheet,
        index: usize,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<String> {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if let Some(dimension) = Self::dimension_ref(sheet) {
            content.push_str(&format!("\n    <dimension ref=\"{}\"/>", dimension));
        }

        let widths = sheet.custom_column_widths();
        if !widths.is_empty() {
            content.push_str("\n    <cols>");
            for (&col, &width) in widths {
                content.push_str(&format!(
                    "\n        <col min=\"{}\" max=\"{}\" width=\"{}\" customWidth=\"1\"/>",
                    col + 1,
                    col + 1,
                    width
                ));
            }
            content.push_str("\n    </cols>");
        }

        content.push_str("\n    <sheetData>");

        // Write cell data (sparse, row-major)
        let mut current_row: Option<u32> = None;
        for (row, col, cell) in sheet.iter_cells() {
            if current_row != Some(row) {
                if current_row.is_some() {
                    content.push_str("\n        </row>");
                }
                content.push_str(&format!("\n        <row r=\"{}\">", row + 1));
                current_row = Some(row);
            }

            let cell_ref = CellAddress::new(row, col).to_a1_string();

            let xf_id = style_table.xf_id_for(index, cell.style_index);
            let style_attr = if xf_id != 0 {
                format!(" s=\"{}\"", xf_id)
            } else {
                String::new()
            };

            match &cell.value {
                CellValue::String(s) => {
                    // Always an inline string: the text is never parsed as a number or date
                    let space = if needs_space_preserve(s) {
                        " xml:space=\"preserve\""
                    } else {
                        ""
                    };
                    content.push_str(&format!(
                        "\n            <c r=\"{}\"{} t=\"inlineStr\"><is><t{}>{}</t></is></c>",
                        cell_ref,
                        style_attr,
                        space,
                        escape_xml(&encode_excel_escapes(s))
                    ));
                }
                CellValue::Number(n) => {
                    if !n.is_finite() {
                        return Err(XlsxError::Unwritable(format!(
                            "cell {} holds a non-finite number",
                            cell_ref
                        )));
                    }
                    content.push_str(&format!(
                        "\n            <c r=\"{}\"{}><v>{}</v></c>",
                        cell_ref, style_attr, n
                    ));
                }
                CellValue::Boolean(b) => {
                    content.push_str(&format!(
                        "\n            <c r=\"{}\"{} t=\"b\"><v>{}</v></c>",
                        cell_ref,
                        style_attr,
                        if *b { 1 } else { 0 }
                    ));
                }
                CellValue::Empty => {
                    // Preserve style-only cells
                    if xf_id != 0 {
                        content.push_str(&format!(
                            "\n            <c r=\"{}\"{}/>",
                            cell_ref, style_attr
                        ));
                    }
                }
            }
        }

        if current_row.is_some() {
            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>\n</worksheet>");
        Ok(content)
    }

    /// Bounding range of all stored cells, e.g. "A1:B6"
    fn dimension_ref(sheet: &Worksheet) -> Option<String> {
        let mut cells = sheet.iter_cells();
        let (first_row, first_col, _) = cells.next()?;
        let (mut min_col, mut max_row, mut max_col) = (first_col, first_row, first_col);
        for (row, col, _) in cells {
            min_col = min_col.min(col);
            max_col = max_col.max(col);
            max_row = max_row.max(row);
        }

        let start = CellAddress::new(first_row, min_col);
        let end = CellAddress::new(max_row, max_col);
        Some(if start == end {
            start.to_a1_string()
        } else {
            format!("{}:{}", start, end)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellfix_core::Style;
    use std::io::{Cursor, Read};

    fn entry_text(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut text = String::new();
        file.read_to_string(&mut text).unwrap();
        text
    }

    fn write_to_vec(wb: &Workbook) -> Vec<u8> {
        let mut buf = Vec::new();
        XlsxWriter::write(wb, Cursor::new(&mut buf)).unwrap();
        buf
    }

    #[test]
    fn test_package_parts_present() {
        let mut wb = Workbook::with_sheet("Data").unwrap();
        wb.worksheet_mut(0)
            .unwrap()
            .set_cell_value("A1", "x")
            .unwrap();
        let bytes = write_to_vec(&wb);

        let archive = zip::ZipArchive::new(Cursor::new(&bytes)).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "xl/_rels/workbook.xml.rels",
                "xl/styles.xml",
                "xl/workbook.xml",
                "xl/worksheets/sheet1.xml",
            ]
        );
    }

    #[test]
    fn test_text_cells_are_inline_strings() {
        let mut wb = Workbook::with_sheet("Data").unwrap();
        let sheet = wb.worksheet_mut(0).unwrap();
        sheet.set_cell_value("A1", "2x10⁹").unwrap();
        sheet.set_cell_value("A2", "12345").unwrap();
        sheet.set_cell_value("B2", " padded ").unwrap();

        let xml = entry_text(&write_to_vec(&wb), "xl/worksheets/sheet1.xml");
        assert!(xml.contains(r#"<c r="A1" t="inlineStr"><is><t>2x10⁹</t></is></c>"#));
        assert!(xml.contains(r#"<c r="A2" t="inlineStr"><is><t>12345</t></is></c>"#));
        assert!(xml.contains(r#"<t xml:space="preserve"> padded </t>"#));
        assert!(xml.contains(r#"<dimension ref="A1:B2"/>"#));
    }

    #[test]
    fn test_styled_cell_gets_xf_index() {
        let mut wb = Workbook::with_sheet("Data").unwrap();
        let sheet = wb.worksheet_mut(0).unwrap();
        sheet.set_cell_value("A1", "bold").unwrap();
        sheet.set_cell_style("A1", &Style::new().bold(true)).unwrap();
        sheet.set_cell_value("B1", "plain").unwrap();

        let xml = entry_text(&write_to_vec(&wb), "xl/worksheets/sheet1.xml");
        assert!(xml.contains(r#"<c r="A1" s="1" t="inlineStr">"#));
        assert!(xml.contains(r#"<c r="B1" t="inlineStr">"#));
    }

    #[test]
    fn test_sheet_name_and_text_escaped() {
        let mut wb = Workbook::with_sheet("R&D").unwrap();
        wb.worksheet_mut(0)
            .unwrap()
            .set_cell_value("A1", "<tag> & 'q'")
            .unwrap();
        let bytes = write_to_vec(&wb);

        assert!(entry_text(&bytes, "xl/workbook.xml").contains(r#"name="R&amp;D""#));
        assert!(entry_text(&bytes, "xl/worksheets/sheet1.xml")
            .contains("&lt;tag&gt; &amp; &apos;q&apos;"));
    }

    #[test]
    fn test_column_widths_written() {
        let mut wb = Workbook::with_sheet("Data").unwrap();
        let sheet = wb.worksheet_mut(0).unwrap();
        sheet.set_cell_value("A1", "x").unwrap();
        sheet.set_column_width(1, 20.5);

        let xml = entry_text(&write_to_vec(&wb), "xl/worksheets/sheet1.xml");
        assert!(xml.contains(r#"<col min="2" max="2" width="20.5" customWidth="1"/>"#));
    }

    #[test]
    fn test_output_is_deterministic() {
        let mut wb = Workbook::with_sheet("Data").unwrap();
        let sheet = wb.worksheet_mut(0).unwrap();
        sheet.set_cell_value("A1", "H₂O").unwrap();
        sheet.set_cell_style("A1", &Style::new().italic(true)).unwrap();

        assert_eq!(write_to_vec(&wb), write_to_vec(&wb));
    }

    #[test]
    fn test_rejects_empty_workbook_and_non_finite_numbers() {
        let mut buf = Vec::new();
        assert!(matches!(
            XlsxWriter::write(&Workbook::empty(), Cursor::new(&mut buf)),
            Err(XlsxError::Unwritable(_))
        ));

        let mut wb = Workbook::with_sheet("Data").unwrap();
        wb.worksheet_mut(0)
            .unwrap()
            .set_cell_value("A1", f64::NAN)
            .unwrap();
        let mut buf = Vec::new();
        assert!(XlsxWriter::write(&wb, Cursor::new(&mut buf)).is_err());
    }
}
