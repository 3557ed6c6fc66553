//! Column layout engine for runa-ls.
//!
//! Packs the cell widths of an ordered listing into as many columns as fit the terminal. All
//! candidate column counts are evaluated in a single pass over the entries: each candidate
//! keeps its own column widths and running line length, and is dropped for good as soon as the
//! line reaches the width budget.

/// Narrowest column: one character of content plus the separator.
pub const MIN_COLUMN_WIDTH: usize = 3;
/// Space between two columns.
pub const COLUMN_PADDING: usize = 2;

/// The order in which entries fill the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillOrder {
    /// Fill column 0 top to bottom, then column 1 (`ls -C`).
    #[default]
    Down,
    /// Fill row 0 left to right, then row 1 (`ls -x`).
    Across,
}

impl FillOrder {
    /// The column that entry `index` lands in when `count` entries are laid out in `columns`
    /// columns.
    #[inline]
    pub fn column_of(self, index: usize, count: usize, columns: usize) -> usize {
        match self {
            FillOrder::Down => index / count.div_ceil(columns),
            FillOrder::Across => index % columns,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ColumnInfo {
    valid: bool,
    line_len: usize,
    widths: Vec<usize>,
}

/// Reusable working memory of the layout computation.
///
/// The candidate buffer only ever grows. Each call resets the part it needs in place, so a
/// recursive listing does not reallocate per directory.
#[derive(Debug, Default)]
pub struct LayoutEngine {
    candidates: Vec<ColumnInfo>,
}

/// The result of a layout computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    columns: usize,
    rows: usize,
    count: usize,
    fill: FillOrder,
    /// Width of each column, including the padding after every column but the last.
    widths: Vec<usize>,
    line_len: usize,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of candidate column counts the buffer currently holds.
    pub fn capacity(&self) -> usize {
        self.candidates.len()
    }

    /// Finds the largest column count whose line fits in `width`.
    ///
    /// `cells` are the cell widths of the entries in view order. A `width` of 0 means no limit:
    /// every entry goes into one row. The result always has at least one column, even for no
    /// entries or for an entry wider than `width`.
    pub fn compute(&mut self, cells: &[usize], width: usize, fill: FillOrder) -> Layout {
        let count = cells.len();
        if count == 0 {
            return Layout {
                columns: 1,
                rows: 0,
                count,
                fill,
                widths: vec![0],
                line_len: 0,
            };
        }
        if width == 0 {
            return Layout::single_row(cells, fill);
        }

        let max_cols = width.div_ceil(MIN_COLUMN_WIDTH).min(count);
        self.reset(max_cols, width);

        for (index, &cell) in cells.iter().enumerate() {
            for (i, info) in self.candidates[..max_cols].iter_mut().enumerate() {
                if !info.valid {
                    continue;
                }
                let col = fill.column_of(index, count, i + 1);
                let real = if col == i { cell } else { cell + COLUMN_PADDING };
                if info.widths[col] < real {
                    info.line_len += real - info.widths[col];
                    info.widths[col] = real;
                    info.valid = info.line_len < width;
                }
            }
        }

        let columns = (1..=max_cols)
            .rev()
            .find(|&cols| self.candidates[cols - 1].valid)
            .unwrap_or(1);
        let info = &self.candidates[columns - 1];

        Layout {
            columns,
            rows: count.div_ceil(columns),
            count,
            fill,
            widths: info.widths.clone(),
            line_len: info.line_len,
        }
    }

    /// Prepares the first `max_cols` candidates. A candidate whose minimum line already
    /// reaches `width` starts out invalid.
    fn reset(&mut self, max_cols: usize, width: usize) {
        if self.candidates.len() < max_cols {
            self.candidates.resize_with(max_cols, ColumnInfo::default);
        }
        for (i, info) in self.candidates[..max_cols].iter_mut().enumerate() {
            info.line_len = (i + 1) * MIN_COLUMN_WIDTH;
            info.valid = info.line_len < width;
            info.widths.clear();
            info.widths.resize(i + 1, MIN_COLUMN_WIDTH);
        }
    }
}

impl Layout {
    fn single_row(cells: &[usize], fill: FillOrder) -> Self {
        let last = cells.len() - 1;
        let widths: Vec<usize> = cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| if i == last { cell } else { cell + COLUMN_PADDING })
            .collect();
        Layout {
            columns: cells.len(),
            rows: 1,
            count: cells.len(),
            fill,
            line_len: widths.iter().sum(),
            widths,
        }
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Total width of a full line.
    #[inline]
    pub fn line_len(&self) -> usize {
        self.line_len
    }

    /// Position in the ordering view of the entry shown at (`row`, `col`), if any.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        let index = match self.fill {
            FillOrder::Down => col * self.rows + row,
            FillOrder::Across => row * self.columns + col,
        };
        (index < self.count).then_some(index)
    }

    /// (row, column) of the entry at position `index` of the ordering view.
    pub fn position(&self, index: usize) -> (usize, usize) {
        match self.fill {
            FillOrder::Down => (index % self.rows, index / self.rows),
            FillOrder::Across => (index / self.columns, index % self.columns),
        }
    }

    /// Offset of the first character of column `col`.
    pub fn column_start(&self, col: usize) -> usize {
        self.widths[..col.min(self.widths.len())].iter().sum()
    }
}
