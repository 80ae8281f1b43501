use std::fmt::Write as _;
use std::sync::Arc;

use super::cell_for;
use crate::domain::config::ExportColumn;
use crate::domain::record::Record;

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(ch),
        }
    }
    out
}

/// Single-sheet workbook as an HTML table, the format spreadsheet
/// applications open as `.xls`
pub fn render_workbook(sheet_name: &str, columns: &[ExportColumn], records: &[Arc<Record>]) -> String {
    let mut out = String::new();

    out.push_str(
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
         xmlns:x=\"urn:schemas-microsoft-com:office:excel\" \
         xmlns=\"http://www.w3.org/TR/REC-html40\">\n",
    );
    out.push_str("<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(
        out,
        "<!--[if gte mso 9]><xml><x:ExcelWorkbook><x:ExcelWorksheets><x:ExcelWorksheet>\
         <x:Name>{}</x:Name><x:WorksheetOptions><x:DisplayGridlines/></x:WorksheetOptions>\
         </x:ExcelWorksheet></x:ExcelWorksheets></x:ExcelWorkbook></xml><![endif]-->",
        escape_html(sheet_name)
    );
    out.push_str(
        "<style>table { border-collapse: collapse; } \
         th, td { border: 1px solid #ddd; padding: 8px; text-align: left; } \
         th { background-color: #f2f2f2; }</style>\n",
    );
    out.push_str("</head>\n<body>\n<table>\n<thead>\n<tr>");
    for column in columns {
        let _ = write!(out, "<th>{}</th>", escape_html(&column.header));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for (index, record) in records.iter().enumerate() {
        out.push_str("<tr>");
        for column in columns {
            let cell = cell_for(column, record, index + 1);
            let _ = write!(out, "<td>{}</td>", escape_html(cell.as_str()));
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    out
}
