use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use calamine::{open_workbook, Reader, Xlsx};
use quick_xml::events::Event;
use serde::Serialize;

#[derive(Serialize)]
struct LedgerLine {
    #[serde(rename = "ORDER ID")]
    order_id: &'static str,
    #[serde(rename = "ITEM NUMBER")]
    item_number: &'static str,
    #[serde(rename = "PRODUCT LINE")]
    product_line: &'static str,
    #[serde(rename = "ITEM QUANTITY")]
    item_quantity: &'static str,
    #[serde(rename = "ITEM PRICE")]
    item_price: &'static str,
    #[serde(rename = "ADDRESS")]
    address: &'static str,
    #[serde(rename = "CITY")]
    city: &'static str,
    #[serde(rename = "STATE")]
    state: &'static str,
    #[serde(rename = "POSTAL CODE")]
    postal_code: &'static str,
    #[serde(rename = "COUNTRY")]
    country: &'static str,
}

impl LedgerLine {
    fn new(row: [&'static str; 5]) -> Self {
        Self {
            order_id: row[0],
            item_number: row[1],
            product_line: row[2],
            item_quantity: row[3],
            item_price: row[4],
            address: "897 Long Airport Avenue",
            city: "NYC",
            state: "NY",
            postal_code: "10022",
            country: "USA",
        }
    }
}

// Only used during testing so no need to return result
/// Builds a ledger with columns ORDER ID, ITEM NUMBER, PRODUCT LINE, ITEM QUANTITY, ITEM PRICE
/// followed by the five location columns.
pub fn create_ledger_csv(rows: Vec<[&'static str; 5]>) -> String {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for line in rows.into_iter().map(LedgerLine::new) {
        wtr.serialize(line).unwrap();
    }
    wtr.flush().unwrap();
    String::from_utf8(wtr.into_inner().unwrap()).unwrap()
}

/// Writes `contents` as `sales_data.csv` inside `dir` and returns its path.
pub fn write_ledger(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("sales_data.csv");
    fs::write(&path, contents).unwrap();
    path
}

/// Every cell of the named worksheet as display text, row by row. Empty cells read as "".
pub fn read_sheet(path: &Path, sheet_name: &str) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range(sheet_name).unwrap();
    range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

pub fn sheet_names(path: &Path) -> Vec<String> {
    let workbook: Xlsx<_> = open_workbook(path).unwrap();
    workbook.sheet_names()
}

/// File names inside `dir`, sorted.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Raw text of one part of a written workbook, e.g. `xl/worksheets/sheet1.xml`.
pub fn read_part(path: &Path, part_name: &str) -> String {
    let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut part = archive.by_name(part_name).unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

/// Attributes of every `tag` element in `xml`, in document order.
pub fn xml_elements(xml: &str, tag: &str) -> Vec<HashMap<String, String>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut found = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == tag.as_bytes() => {
                let attrs = e
                    .attributes()
                    .flatten()
                    .map(|a| {
                        (
                            String::from_utf8(a.key.as_ref().to_vec()).unwrap(),
                            String::from_utf8(a.value.into_owned()).unwrap(),
                        )
                    })
                    .collect();
                found.push(attrs);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    found
}

// <col min max> elements cover ranges of 1-based columns
fn per_column(sheet_xml: &str, attr: &str) -> BTreeMap<u32, String> {
    let mut columns = BTreeMap::new();
    for col in xml_elements(sheet_xml, "col") {
        if let Some(value) = col.get(attr) {
            let min: u32 = col["min"].parse().unwrap();
            let max: u32 = col["max"].parse().unwrap();
            for idx in min..=max {
                columns.insert(idx, value.clone());
            }
        }
    }
    columns
}

/// Stored width of every sized column, keyed by 1-based column number.
pub fn column_widths(sheet_xml: &str) -> BTreeMap<u32, f64> {
    per_column(sheet_xml, "width")
        .into_iter()
        .map(|(idx, width)| (idx, width.parse().unwrap()))
        .collect()
}

/// Cell format index of every column that has a default format, keyed by 1-based column number.
pub fn column_styles(sheet_xml: &str) -> BTreeMap<u32, String> {
    per_column(sheet_xml, "style")
}

/// Cell format index of every styled cell, keyed by reference such as `C2`.
pub fn cell_styles(sheet_xml: &str) -> HashMap<String, String> {
    xml_elements(sheet_xml, "c")
        .into_iter()
        .filter_map(|mut c| Some((c.remove("r")?, c.remove("s")?)))
        .collect()
}

/// Index within `cellXfs` of the first cell format using number format `format_code`.
pub fn cell_format_index(styles_xml: &str, format_code: &str) -> Option<String> {
    let num_fmt_id = xml_elements(styles_xml, "numFmt")
        .into_iter()
        .find(|f| f.get("formatCode").map(String::as_str) == Some(format_code))?
        .remove("numFmtId")?;

    let start = styles_xml.find("<cellXfs")?;
    let end = styles_xml[start..].find("</cellXfs>")? + start;
    xml_elements(&styles_xml[start..end], "xf")
        .iter()
        .position(|xf| xf.get("numFmtId") == Some(&num_fmt_id))
        .map(|idx| idx.to_string())
}

#[cfg(test)]
mod tests {
    use crate::{
        cell_format_index, cell_styles, column_widths, create_ledger_csv, list_files,
        write_ledger,
    };

    const HEADER: &str =
        "ORDER ID,ITEM NUMBER,PRODUCT LINE,ITEM QUANTITY,ITEM PRICE,ADDRESS,CITY,STATE,POSTAL CODE,COUNTRY\n";

    #[test]
    fn create_ledger_csv_creates_single_row() {
        let sut = create_ledger_csv(vec![["A1", "1", "Planes", "2", "5.00"]]);
        let expected = format!(
            "{}A1,1,Planes,2,5.00,897 Long Airport Avenue,NYC,NY,10022,USA\n",
            HEADER
        );
        assert_eq!(sut, expected);
    }

    #[test]
    fn create_ledger_csv_creates_multiple_rows() {
        let sut = create_ledger_csv(vec![
            ["A1", "1", "Planes", "2", "5.00"],
            ["A2", "1", "Trains", "4", "1.50"],
        ]);
        assert_eq!(sut.lines().count(), 3);
        assert!(sut.lines().nth(2).unwrap().starts_with("A2,1,Trains,4,1.50,"));
    }

    #[test]
    fn write_ledger_lands_in_the_given_directory() {
        let dir = std::env::temp_dir().join(format!("test_utils_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = write_ledger(&dir, "ORDER ID\n");
        assert_eq!(list_files(&dir), vec!["sales_data.csv"]);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "ORDER ID\n");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn column_ranges_expand_to_each_column() {
        let xml = r#"<worksheet><cols><col min="1" max="1" width="11.7109375" customWidth="1"/><col min="4" max="5" width="15.7109375" style="2" customWidth="1"/></cols></worksheet>"#;
        let sut = column_widths(xml);
        assert_eq!(sut.keys().copied().collect::<Vec<_>>(), vec![1, 4, 5]);
        assert_eq!(sut[&5], 15.7109375);
    }

    #[test]
    fn cell_format_index_follows_the_number_format() {
        let xml = r#"<styleSheet><numFmts count="1"><numFmt numFmtId="164" formatCode="$#,##0.00"/></numFmts><cellXfs count="3"><xf numFmtId="0" fontId="0"/><xf numFmtId="0" fontId="1"/><xf numFmtId="164" fontId="0"/></cellXfs></styleSheet>"#;
        assert_eq!(cell_format_index(xml, "$#,##0.00"), Some("2".to_string()));
        assert_eq!(cell_format_index(xml, "0.00%"), None);
    }

    #[test]
    fn cell_styles_skip_unstyled_cells() {
        let xml = r#"<sheetData><row r="1"><c r="A1" s="1" t="s"><v>0</v></c><c r="B1"><v>2</v></c></row></sheetData>"#;
        let sut = cell_styles(xml);
        assert_eq!(sut.len(), 1);
        assert_eq!(sut["A1"], "1");
    }
}
