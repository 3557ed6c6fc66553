//! Renderer glue between the layout engine and the output.
//!
//! The functions here only compute which entry goes where. All text is produced by a
//! [GridSink], which knows how wide an entry is and how to print and pad it.

use crate::core::fm::{FileEntry, Listing};
use crate::core::layout::Layout;

use std::io;

/// Output primitives used by the renderers.
pub trait GridSink {
    /// Screen columns the entry occupies when printed, prefixes and indicator included.
    fn cell_width(&self, entry: &FileEntry) -> usize;

    /// Prints the entry starting at screen column `start`.
    fn print_entry(&mut self, entry: &FileEntry, start: usize) -> io::Result<()>;

    /// Moves the cursor from column `from` to column `to`.
    fn pad(&mut self, from: usize, to: usize) -> io::Result<()>;

    /// Prints `sep` followed by a space, or by a line break when `wrap` is set.
    fn separator(&mut self, sep: char, wrap: bool) -> io::Result<()>;

    fn end_row(&mut self) -> io::Result<()>;

    /// Called after every entry. A safe point for handling pending interrupts.
    fn checkpoint(&mut self) {}
}

/// Prints `listing` as a grid using a layout computed for it.
pub fn render<S: GridSink>(listing: &Listing, layout: &Layout, sink: &mut S) -> io::Result<()> {
    for row in 0..layout.rows() {
        let mut pos = 0;
        let mut col = 0;
        while let Some(index) = layout.cell_at(row, col) {
            let entry = listing.get(index);
            sink.print_entry(entry, pos)?;
            sink.checkpoint();

            let width = layout.widths()[col];
            col += 1;
            if layout.cell_at(row, col).is_none() {
                break;
            }
            sink.pad(pos + sink.cell_width(entry), pos + width)?;
            pos += width;
        }
        sink.end_row()?;
    }
    Ok(())
}

/// Prints `listing` as one stream of names joined by `sep`, wrapping before `width`.
/// A `width` of 0 never wraps.
pub fn render_separated<S: GridSink>(
    listing: &Listing,
    width: usize,
    sep: char,
    sink: &mut S,
) -> io::Result<()> {
    if listing.is_empty() {
        return Ok(());
    }

    let mut pos = 0;
    for (i, entry) in listing.ordered().enumerate() {
        let len = if width == 0 { 0 } else { sink.cell_width(entry) };
        if i != 0 {
            let fits = width == 0 || pos + len + 2 < width;
            if fits {
                pos += 2;
            } else {
                pos = 0;
            }
            sink.separator(sep, !fits)?;
        }
        sink.print_entry(entry, pos)?;
        sink.checkpoint();
        pos += len;
    }
    sink.end_row()
}

/// Prints one entry per row.
pub fn render_lines<S: GridSink>(listing: &Listing, sink: &mut S) -> io::Result<()> {
    for entry in listing.ordered() {
        sink.print_entry(entry, 0)?;
        sink.checkpoint();
        sink.end_row()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::{FillOrder, LayoutEngine};

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Entry(String, usize),
        Pad(usize, usize),
        Sep(char, bool),
        EndRow,
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
        checkpoints: usize,
    }

    impl GridSink for Recorder {
        fn cell_width(&self, entry: &FileEntry) -> usize {
            entry.display_width()
        }

        fn print_entry(&mut self, entry: &FileEntry, start: usize) -> io::Result<()> {
            self.events
                .push(Event::Entry(entry.display_name().into_owned(), start));
            Ok(())
        }

        fn pad(&mut self, from: usize, to: usize) -> io::Result<()> {
            self.events.push(Event::Pad(from, to));
            Ok(())
        }

        fn separator(&mut self, sep: char, wrap: bool) -> io::Result<()> {
            self.events.push(Event::Sep(sep, wrap));
            Ok(())
        }

        fn end_row(&mut self) -> io::Result<()> {
            self.events.push(Event::EndRow);
            Ok(())
        }

        fn checkpoint(&mut self) {
            self.checkpoints += 1;
        }
    }

    fn listing_of(names: &[&str]) -> Listing {
        let mut listing = Listing::new();
        for name in names {
            listing.push(FileEntry::new(*name, 0));
        }
        listing
    }

    fn entry(name: &str, start: usize) -> Event {
        Event::Entry(name.to_string(), start)
    }

    #[test]
    fn grid_down_then_across() -> io::Result<()> {
        let listing = listing_of(&["aaa", "bbbbbbbbbb", "ccc", "ddd", "eee", "fff", "ggg"]);
        let mut sink = Recorder::default();
        let cells: Vec<usize> = listing.ordered().map(|e| sink.cell_width(e)).collect();
        let layout = LayoutEngine::new().compute(&cells, 20, FillOrder::Down);

        render(&listing, &layout, &mut sink)?;

        assert_eq!(
            sink.events,
            [
                entry("aaa", 0),
                Event::Pad(3, 12),
                entry("eee", 12),
                Event::EndRow,
                entry("bbbbbbbbbb", 0),
                Event::Pad(10, 12),
                entry("fff", 12),
                Event::EndRow,
                entry("ccc", 0),
                Event::Pad(3, 12),
                entry("ggg", 12),
                Event::EndRow,
                entry("ddd", 0),
                Event::EndRow,
            ]
        );
        assert_eq!(sink.checkpoints, 7);
        Ok(())
    }

    #[test]
    fn grid_across_then_down() -> io::Result<()> {
        let listing = listing_of(&["a", "b", "c", "d", "e"]);
        let mut sink = Recorder::default();
        let layout = LayoutEngine::new().compute(&[1; 5], 10, FillOrder::Across);
        assert_eq!(layout.columns(), 3);

        render(&listing, &layout, &mut sink)?;

        assert_eq!(
            sink.events,
            [
                entry("a", 0),
                Event::Pad(1, 3),
                entry("b", 3),
                Event::Pad(4, 6),
                entry("c", 6),
                Event::EndRow,
                entry("d", 0),
                Event::Pad(1, 3),
                entry("e", 3),
                Event::EndRow,
            ]
        );
        Ok(())
    }

    #[test]
    fn empty_listing_emits_no_rows() -> io::Result<()> {
        let listing = Listing::new();
        let mut sink = Recorder::default();
        let layout = LayoutEngine::new().compute(&[], 80, FillOrder::Down);
        render(&listing, &layout, &mut sink)?;
        render_separated(&listing, 80, ',', &mut sink)?;
        assert!(sink.events.is_empty());
        Ok(())
    }

    #[test]
    fn separated_wraps_before_width() -> io::Result<()> {
        let listing = listing_of(&["alpha", "beta", "gamma"]);
        let mut sink = Recorder::default();
        render_separated(&listing, 14, ',', &mut sink)?;

        assert_eq!(
            sink.events,
            [
                entry("alpha", 0),
                Event::Sep(',', false),
                entry("beta", 7),
                Event::Sep(',', true),
                entry("gamma", 0),
                Event::EndRow,
            ]
        );
        Ok(())
    }

    #[test]
    fn lines_one_per_row() -> io::Result<()> {
        let listing = listing_of(&["x", "y"]);
        let mut sink = Recorder::default();
        render_lines(&listing, &mut sink)?;
        assert_eq!(
            sink.events,
            [entry("x", 0), Event::EndRow, entry("y", 0), Event::EndRow]
        );
        Ok(())
    }
}
