//! Tab-separated export of the display grid
//!
//! One line per row label: the label followed by its cells, tab separated.
//! No header line and no trailing newline.

use super::grid::{DisplayGrid, RowLabel};

/// Serialize the grid as TSV in label order
pub fn to_tsv(grid: &DisplayGrid) -> String {
    grid.rows()
        .iter()
        .map(|row| {
            std::iter::once(row.label.as_str())
                .chain(row.cells.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read TSV produced by [`to_tsv`] back into label/cell pairs
///
/// Lines with an unknown label are ignored.
pub fn parse_tsv(text: &str) -> Vec<(RowLabel, Vec<String>)> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let label = RowLabel::from_label(fields.next()?)?;
            Some((label, fields.map(str::to_string).collect()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tsv_layout() {
        let grid = DisplayGrid::from_rows(vec![
            (RowLabel::WinOdds, cells(&["1.10", "2.50"])),
            (RowLabel::WinHorses, cells(&["02", "01"])),
        ]);
        let tsv = to_tsv(&grid);
        let lines: Vec<&str> = tsv.split('\n').collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "単勝_オッズ\t1.10\t2.50");
        assert_eq!(lines[1], "単勝_馬番\t02\t01");
        assert_eq!(lines[2], "複勝_オッズ\t\t");
        assert!(!tsv.ends_with('\n'));
    }

    #[test]
    fn test_tsv_round_trip() {
        let grid = DisplayGrid::from_rows(vec![
            (RowLabel::WinOdds, cells(&["1.10", "2.50", "7.80"])),
            (RowLabel::WinHorses, cells(&["02", "01", "03"])),
            (RowLabel::PlaceOdds, cells(&["1.00"])),
            (RowLabel::PlaceHorses, cells(&["02"])),
            (RowLabel::QuinellaOdds, cells(&["1.20", "4.00"])),
            (RowLabel::QuinellaHorses, cells(&["1-2", "1-3"])),
        ]);
        let parsed = parse_tsv(&to_tsv(&grid));
        assert_eq!(parsed.len(), 6);
        for (row, (label, values)) in grid.rows().iter().zip(parsed) {
            assert_eq!(row.label, label);
            assert_eq!(row.cells, values);
        }
    }

    #[test]
    fn test_tsv_empty_grid_round_trip() {
        let grid = DisplayGrid::from_rows(Vec::new());
        let tsv = to_tsv(&grid);
        assert_eq!(tsv.lines().count(), 6);
        assert_eq!(DisplayGrid::from_rows(parse_tsv(&tsv)), grid);
    }
}
