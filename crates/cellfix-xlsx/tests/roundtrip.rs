//! Write workbooks with XlsxWriter and read them back with XlsxReader.

use std::io::{Cursor, Read};

use cellfix_core::cell::CellStorage;
use cellfix_core::{CellValue, FontStyle, Style, Underline, Workbook};
use cellfix_xlsx::{XlsxReader, XlsxWriter};
use pretty_assertions::assert_eq;

fn round_trip(wb: &Workbook) -> Workbook {
    let mut buf = Vec::new();
    XlsxWriter::write(wb, Cursor::new(&mut buf)).expect("write workbook");
    XlsxReader::read(Cursor::new(&buf)).expect("read workbook")
}

#[test]
fn unicode_text_survives() {
    let texts = [
        ("A1", "2x10⁹"),
        ("A2", "H₂O"),
        ("A3", "测试粗体"),
        ("A4", "  leading and trailing  "),
        ("A5", "a < b & \"c\""),
        ("A6", "line\nbreak"),
        ("A7", "_x0041_ literal"),
    ];

    let mut wb = Workbook::with_sheet("测试数据").unwrap();
    let ws = wb.worksheet_mut(0).unwrap();
    for (addr, text) in texts {
        ws.set_cell_value(addr, text).unwrap();
    }

    let back = round_trip(&wb);
    let ws = back.worksheet_by_name("测试数据").expect("sheet by title");
    for (addr, text) in texts {
        assert_eq!(
            ws.get_value(addr).unwrap(),
            CellValue::string(text),
            "text mismatch at {}",
            addr
        );
    }
}

#[test]
fn xml_forbidden_characters_are_escaped() {
    let text = "a\u{FFFE}b\u{FFFF}c\u{1}";

    let mut wb = Workbook::with_sheet("Sheet1").unwrap();
    wb.worksheet_mut(0)
        .unwrap()
        .set_cell_value("A1", text)
        .unwrap();

    let mut buf = Vec::new();
    XlsxWriter::write(&wb, Cursor::new(&mut buf)).unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(&buf)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    assert!(
        !xml.contains(['\u{FFFE}', '\u{FFFF}', '\u{1}']),
        "raw forbidden characters in sheet XML"
    );
    assert!(xml.contains("<t>a_xFFFE_b_xFFFF_c_x0001_</t>"), "{}", xml);

    let back = XlsxReader::read(Cursor::new(&buf)).unwrap();
    assert_eq!(
        back.worksheet(0).unwrap().get_value("A1").unwrap(),
        CellValue::string(text)
    );
}

#[test]
fn numeric_looking_text_stays_text() {
    let mut wb = Workbook::with_sheet("Sheet1").unwrap();
    let ws = wb.worksheet_mut(0).unwrap();
    ws.set_cell_value("A1", "2e9").unwrap();
    ws.set_cell_value("A2", "0012").unwrap();
    ws.set_cell_value("A3", "TRUE").unwrap();
    ws.set_cell_value("B1", 42.0).unwrap();
    ws.set_cell_value("B2", false).unwrap();

    let back = round_trip(&wb);
    let ws = back.worksheet(0).unwrap();
    assert_eq!(ws.get_value("A1").unwrap(), CellValue::string("2e9"));
    assert_eq!(ws.get_value("A2").unwrap(), CellValue::string("0012"));
    assert_eq!(ws.get_value("A3").unwrap(), CellValue::string("TRUE"));
    assert_eq!(ws.get_value("B1").unwrap(), CellValue::Number(42.0));
    assert_eq!(ws.get_value("B2").unwrap(), CellValue::Boolean(false));
}

#[test]
fn font_styles_survive() {
    let cases = [
        ("A1", FontStyle::new().with_bold(true)),
        ("A2", FontStyle::new().with_italic(true)),
        ("A3", FontStyle::new().with_underline(Underline::Single)),
        ("A4", FontStyle::new().with_bold(true).with_italic(true)),
        ("A5", FontStyle::new().with_name("Arial").with_size(14.0)),
    ];

    let mut wb = Workbook::with_sheet("Styles").unwrap();
    let ws = wb.worksheet_mut(0).unwrap();
    for (addr, font) in &cases {
        ws.set_cell_value(addr, "styled").unwrap();
        ws.set_cell_style(addr, &Style::from_font(font.clone())).unwrap();
    }
    ws.set_cell_value("A6", "plain").unwrap();

    let back = round_trip(&wb);
    let ws = back.worksheet(0).unwrap();
    for (addr, font) in &cases {
        let style = ws
            .cell_style(addr)
            .unwrap()
            .unwrap_or_else(|| panic!("{} should carry a style", addr));
        assert_eq!(&style.font, font, "font mismatch at {}", addr);
    }
    assert!(
        ws.cell_style("A6").unwrap().is_none(),
        "plain cell should have no style"
    );
}

#[test]
fn shared_style_is_written_once() {
    let bold = Style::from_font(FontStyle::new().with_bold(true));

    let mut wb = Workbook::with_sheet("Sheet1").unwrap();
    let ws = wb.worksheet_mut(0).unwrap();
    for addr in ["A1", "A2", "A3"] {
        ws.set_cell_value(addr, "b").unwrap();
        ws.set_cell_style(addr, &bold).unwrap();
    }

    let back = round_trip(&wb);
    let ws = back.worksheet(0).unwrap();
    let indices: Vec<u32> = (0..3).map(|row| ws.cell_style_index_at(row, 0)).collect();
    assert_eq!(indices, vec![indices[0]; 3]);
    assert_ne!(indices[0], 0);
}

#[test]
fn column_widths_survive() {
    let mut wb = Workbook::with_sheet("Sheet1").unwrap();
    let ws = wb.worksheet_mut(0).unwrap();
    ws.set_cell_value("A1", "x").unwrap();
    ws.set_column_width(0, 18.5);
    ws.set_column_width(1, 24.0);

    let back = round_trip(&wb);
    let ws = back.worksheet(0).unwrap();
    assert_eq!(ws.column_width(0), 18.5);
    assert_eq!(ws.column_width(1), 24.0);
    assert_eq!(ws.column_width(2), CellStorage::DEFAULT_COLUMN_WIDTH);
}

#[test]
fn sheet_order_is_kept() {
    let mut wb = Workbook::empty();
    for name in ["First", "第二", "O'Brien & Co"] {
        wb.add_worksheet_with_name(name).unwrap();
    }

    let back = round_trip(&wb);
    let names: Vec<&str> = back.worksheets().map(|ws| ws.name()).collect();
    assert_eq!(names, vec!["First", "第二", "O'Brien & Co"]);
}

#[test]
fn write_file_and_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xlsx");

    let mut wb = Workbook::with_sheet("测试数据").unwrap();
    wb.worksheet_mut(0)
        .unwrap()
        .set_cell_value("A1", "H₂O")
        .unwrap();

    XlsxWriter::write_file(&wb, &path).unwrap();
    let back = XlsxReader::read_file(&path).unwrap();
    assert_eq!(
        back.worksheet(0).unwrap().get_value("A1").unwrap(),
        CellValue::string("H₂O")
    );
}
