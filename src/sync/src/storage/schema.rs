//! Sheet layout of the draw history workbook
//!
//! Columns:
//! - 期号: draw code
//! - 开奖日期: draw date (YYYY年MM月DD日)
//! - 红球1..红球6: red balls, zero-padded
//! - 蓝球: blue ball, zero-padded
//!
//! Header names match workbooks produced by earlier versions of the tool so
//! existing files keep loading.

use rust_xlsxwriter::{Format, FormatAlign, Worksheet, XlsxError};

pub const CODE_COLUMN: &str = "期号";
pub const DATE_COLUMN: &str = "开奖日期";
pub const RED_COLUMNS: [&str; 6] = ["红球1", "红球2", "红球3", "红球4", "红球5", "红球6"];
pub const BLUE_COLUMN: &str = "蓝球";

/// Header row in write order
pub fn header_row() -> Vec<&'static str> {
    let mut header = Vec::with_capacity(9);
    header.push(CODE_COLUMN);
    header.push(DATE_COLUMN);
    header.extend(RED_COLUMNS);
    header.push(BLUE_COLUMN);
    header
}

/// Column width for the column at `index`
pub fn column_width(index: usize) -> f64 {
    match index {
        0 => 12.0,
        1 => 15.0,
        _ => 8.0,
    }
}

/// Centered horizontally and vertically
pub fn cell_format() -> Format {
    Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

/// Apply column widths to a worksheet
pub fn apply_layout(worksheet: &mut Worksheet) -> Result<(), XlsxError> {
    for index in 0..header_row().len() {
        worksheet.set_column_width(index as u16, column_width(index))?;
    }
    Ok(())
}
