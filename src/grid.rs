//! スロットストアの状態を、行単位のテキストグリッドとして表示するための構成要素.
//!
//! ここで提供される表示器は、アロケータのスナップショットを読み取るだけであり、
//! アロケータの状態を変更することはない.
//!
//! # Examples
//!
//! ```
//! use slotmalloc::allocator::{SlotAllocator, SlotAllocatorBuilder};
//! use slotmalloc::grid::GridFormat;
//!
//! # fn main() -> slotmalloc::Result<()> {
//! let mut allocator: SlotAllocator<10> = SlotAllocatorBuilder::new().seed(0).finish()?;
//! let ptr = allocator.allocate(8)?;
//! allocator.write_value(ptr, 1.5)?;
//!
//! let format = GridFormat::new(5)?;
//! let occupancy = allocator.occupancy_grid().format(format).to_string();
//! assert!(occupancy.starts_with("Current memory usage:\n     0: "));
//! assert!(occupancy.contains('x'));
//!
//! let values = allocator.value_grid().format(format).to_string();
//! assert!(values.contains("   1.5"));
//! # Ok(())
//! # }
//! ```
use std::fmt;
use std::io::Write;

use crate::allocator::SlotAllocator;
use crate::slot::SlotContent;
use crate::{ErrorKind, Result};

/// グリッドの一行に表示するスロット数のデフォルト値.
pub const DEFAULT_COLUMNS: usize = 25;

/// 数値を表示する際の有効桁数.
const VALUE_PRECISION: usize = 2;

/// グリッドの書式.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridFormat {
    columns: usize,
}
impl GridFormat {
    /// 一行に`columns`スロットを表示する書式を生成する.
    ///
    /// # Errors
    ///
    /// `columns`が`0`の場合には、種類が`ErrorKind::InvalidInput`のエラーが返される.
    pub fn new(columns: usize) -> Result<Self> {
        track_assert_ne!(columns, 0, ErrorKind::InvalidInput);
        Ok(GridFormat { columns })
    }

    /// 一行に表示するスロット数を返す.
    pub fn columns(self) -> usize {
        self.columns
    }

    fn is_row_head(self, index: usize) -> bool {
        index % self.columns == 0
    }
}
impl Default for GridFormat {
    fn default() -> Self {
        GridFormat {
            columns: DEFAULT_COLUMNS,
        }
    }
}

/// スロットの占有状態を表示するグリッド.
///
/// 未使用のスロットは`.`、ポインタとしてタグ付けされたスロットは`p`、
/// それ以外の使用中のスロットは`x`で表示される.
#[derive(Debug)]
pub struct OccupancyGrid<'a, const N: usize> {
    allocator: &'a SlotAllocator<N>,
    format: GridFormat,
}
impl<'a, const N: usize> OccupancyGrid<'a, N> {
    /// デフォルトの書式で、新しい`OccupancyGrid`インスタンスを生成する.
    pub fn new(allocator: &'a SlotAllocator<N>) -> Self {
        OccupancyGrid {
            allocator,
            format: GridFormat::default(),
        }
    }

    /// 書式を設定する.
    pub fn format(mut self, format: GridFormat) -> Self {
        self.format = format;
        self
    }

    /// グリッドを`writer`に書き込む.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        track_io!(write!(writer, "{}", self))
    }
}
impl<'a, const N: usize> fmt::Display for OccupancyGrid<'a, N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Current memory usage:")?;
        for (i, occupancy) in self.allocator.occupancy_snapshot().enumerate() {
            if self.format.is_row_head(i) {
                write!(f, "\n{:6}: ", i)?;
            }
            write!(f, "{}", occupancy.glyph())?;
        }
        writeln!(f)
    }
}

/// スロットの値を表示するグリッド.
///
/// 未使用のスロットは空白、数値は有効数字二桁(`%5.2g`相当)、
/// ポインタとしてタグ付けされたスロットは参照先のスロットインデックスで表示される.
#[derive(Debug)]
pub struct ValueGrid<'a, const N: usize> {
    allocator: &'a SlotAllocator<N>,
    format: GridFormat,
}
impl<'a, const N: usize> ValueGrid<'a, N> {
    /// デフォルトの書式で、新しい`ValueGrid`インスタンスを生成する.
    pub fn new(allocator: &'a SlotAllocator<N>) -> Self {
        ValueGrid {
            allocator,
            format: GridFormat::default(),
        }
    }

    /// 書式を設定する.
    pub fn format(mut self, format: GridFormat) -> Self {
        self.format = format;
        self
    }

    /// グリッドを`writer`に書き込む.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        track_io!(write!(writer, "{}", self))
    }
}
impl<'a, const N: usize> fmt::Display for ValueGrid<'a, N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Current memory values:")?;
        for snapshot in self.allocator.value_snapshot() {
            if self.format.is_row_head(snapshot.index) {
                write!(f, "\n{:6}:", snapshot.index)?;
            }
            match snapshot.content {
                None => write!(f, "      ")?,
                Some(SlotContent::Reference(index)) => write!(f, " {:5}", index)?,
                Some(SlotContent::Value(value)) => {
                    write!(f, " {:>5}", general_format(value, VALUE_PRECISION))?
                }
            }
        }
        writeln!(f)
    }
}

/// `value`を、有効桁数`precision`の"一般"書式(C言語の`%.*g`相当)で文字列化する.
///
/// 指数が`-4`未満あるいは`precision`以上の場合には指数表記、それ以外の場合には固定小数点表記となり、
/// いずれの場合も小数部末尾の`0`は取り除かれる.
///
/// # Examples
///
/// ```
/// use slotmalloc::grid::general_format;
///
/// assert_eq!(general_format(0.5, 2), "0.5");
/// assert_eq!(general_format(12.0, 2), "12");
/// assert_eq!(general_format(123.0, 2), "1.2e+02");
/// assert_eq!(general_format(0.000123, 2), "0.00012");
/// assert_eq!(general_format(-1e-300, 2), "-1e-300");
/// ```
pub fn general_format(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }

    // 丸め後の指数を得るために、まずは指数表記で整形する
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.find('e') {
        Some(i) => (&scientific[..i], scientific[i + 1..].parse::<i32>().unwrap_or(0)),
        None => (&scientific[..], 0),
    };
    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_owned()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use trackable::result::TestResult;

    use super::*;
    use crate::allocator::{SlotAllocator, SlotAllocatorBuilder};

    #[test]
    fn general_format_works() {
        assert_eq!(general_format(0.0, 2), "0");
        assert_eq!(general_format(-0.0, 2), "-0");
        assert_eq!(general_format(1.0, 2), "1");
        assert_eq!(general_format(2.5, 2), "2.5");
        assert_eq!(general_format(-3.26, 2), "-3.3");
        assert_eq!(general_format(99.9, 2), "1e+02");
        assert_eq!(general_format(1.5e10, 2), "1.5e+10");
        assert_eq!(general_format(1e-5, 2), "1e-05");
        assert_eq!(general_format(0.0001, 2), "0.0001");
        assert_eq!(general_format(f64::NAN, 2), "nan");
        assert_eq!(general_format(f64::NEG_INFINITY, 2), "-inf");
        assert_eq!(general_format(123.456, 4), "123.5");
        assert_eq!(general_format(7.0, 0), "7");
    }

    #[test]
    fn format_rejects_zero_columns() {
        let e = GridFormat::new(0).err().map(|e| *e.kind());
        assert_eq!(e, Some(ErrorKind::InvalidInput));
        assert_eq!(GridFormat::default().columns(), DEFAULT_COLUMNS);
    }

    #[test]
    fn occupancy_grid_works() -> TestResult {
        let mut a: SlotAllocator<12> = track!(SlotAllocatorBuilder::new().seed(3).finish())?;
        assert_eq!(
            a.occupancy_grid().format(track!(GridFormat::new(5))?).to_string(),
            "Current memory usage:\n     0: .....\n     5: .....\n    10: ..\n"
        );

        let p = track!(a.allocate(16))?;
        track!(a.tag_as_pointer_block(p + 1, 1))?;
        let mut expected = vec!['.'; 12];
        expected[p.index()] = 'x';
        expected[p.index() + 1] = 'p';
        let expected: String = expected.into_iter().collect();
        assert_eq!(
            a.occupancy_grid().to_string(),
            format!("Current memory usage:\n     0: {}\n", expected)
        );
        Ok(())
    }

    #[test]
    fn value_grid_works() -> TestResult {
        let mut a: SlotAllocator<6> = track!(SlotAllocatorBuilder::new().seed(4).finish())?;
        assert_eq!(
            a.value_grid().format(track!(GridFormat::new(3))?).to_string(),
            format!("Current memory values:\n     0:{0}\n     3:{0}\n", " ".repeat(18))
        );

        let y = track!(a.allocate(16))?;
        track!(a.tag_as_pointer_block(y, 1))?;
        track!(a.write_pointer(y, y + 1))?;
        track!(a.write_value(y + 1, 0.25))?;

        let mut cells = vec!["      ".to_owned(); 6];
        cells[y.index()] = format!(" {:5}", y.index() + 1);
        cells[y.index() + 1] = "  0.25".to_owned();
        assert_eq!(
            a.value_grid().to_string(),
            format!("Current memory values:\n     0:{}\n", cells.concat())
        );

        let mut buf = Vec::new();
        track!(a.value_grid().write_to(&mut buf))?;
        assert_eq!(buf, a.value_grid().to_string().into_bytes());
        Ok(())
    }
}
