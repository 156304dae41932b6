/// Fixed-width text rendering of a table.
///
/// Layout: a header line, a line of dashes under each header name, then one
/// line per selected row. Every cell is left-justified and padded to the
/// column width, which is the widest of the header and the *selected* cells,
/// plus two spaces. Dash runs are as long as the header name, not the column.
/// Every line ends with `'\n'`.

use crate::table::Table;

/// Which rows to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowSelection {
    #[default]
    All,
    /// The first `n` rows.
    Head(usize),
    /// The last `n` rows.
    Tail(usize),
}

impl RowSelection {
    fn positions(self, len: usize) -> std::ops::Range<usize> {
        match self {
            RowSelection::All => 0..len,
            RowSelection::Head(n) => 0..n.min(len),
            RowSelection::Tail(n) => len - n.min(len)..len,
        }
    }
}

const COLUMN_GAP: usize = 2;

pub fn render_table(table: &Table, selection: RowSelection) -> String {
    let rows = selection.positions(table.len());

    // (header, cells, width) per column
    let layout: Vec<(&str, Vec<String>, usize)> = table
        .columns()
        .map(|(name, column)| {
            let cells: Vec<String> = column.values()[rows.clone()]
                .iter()
                .map(ToString::to_string)
                .collect();
            let width = cells
                .iter()
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
                + COLUMN_GAP;
            (name, cells, width)
        })
        .collect();

    let mut out = String::new();
    for (name, _, width) in &layout {
        push_padded(&mut out, name, *width);
    }
    out.push('\n');
    for (name, _, width) in &layout {
        push_padded(&mut out, &"-".repeat(name.chars().count()), *width);
    }
    out.push('\n');
    for line in 0..rows.len() {
        for (_, cells, width) in &layout {
            push_padded(&mut out, &cells[line], *width);
        }
        out.push('\n');
    }
    out
}

fn push_padded(out: &mut String, text: &str, width: usize) {
    out.push_str(&format!("{:<width$}", text, width = width));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    fn table(columns: Vec<(&str, Vec<&str>)>) -> Table {
        Table::new(
            columns
                .into_iter()
                .map(|(name, values)| (name, Column::from_strings(values))),
        )
        .unwrap()
    }

    fn four_rows() -> Table {
        table(vec![
            ("Nom", vec!["Alice", "Bob", "Justine", "Lisa"]),
            ("Age", vec!["10", "20", "21", "21"]),
            ("Ville", vec!["Grenoble", "Lyon", "Grenoble", "Le Cheylas"]),
        ])
    }

    #[test]
    fn test_render_all_two_columns() {
        let t = table(vec![("Nom", vec!["Alice", "Bob"]), ("Age", vec!["10", "20"])]);
        let expected = "Index  Nom    Age  \n\
                        -----  ---    ---  \n\
                        0      Alice  10   \n\
                        1      Bob    20   \n";
        assert_eq!(t.render(RowSelection::All), expected);
    }

    #[test]
    fn test_render_all_single_column() {
        let t = table(vec![("Nom", vec!["Justine", "Lisa"])]);
        let expected = "Index  Nom      \n\
                        -----  ---      \n\
                        0      Justine  \n\
                        1      Lisa     \n";
        assert_eq!(t.render(RowSelection::All), expected);
    }

    #[test]
    fn test_render_all_three_columns() {
        let t = table(vec![
            ("Nom", vec!["Alice", "Bob"]),
            ("Age", vec!["10", "20"]),
            ("Ville", vec!["Grenoble", "Lyon"]),
        ]);
        let expected = "Index  Nom    Age  Ville     \n\
                        -----  ---    ---  -----     \n\
                        0      Alice  10   Grenoble  \n\
                        1      Bob    20   Lyon      \n";
        assert_eq!(t.render(RowSelection::All), expected);
        assert_eq!(t.to_string(), expected);
    }

    #[test]
    fn test_render_head() {
        let expected = "Index  Nom    Age  Ville     \n\
                        -----  ---    ---  -----     \n\
                        0      Alice  10   Grenoble  \n\
                        1      Bob    20   Lyon      \n";
        assert_eq!(four_rows().render(RowSelection::Head(2)), expected);
    }

    #[test]
    fn test_render_tail_widths_follow_selected_rows() {
        let expected = "Index  Nom      Age  Ville       \n\
                        -----  ---      ---  -----       \n\
                        2      Justine  21   Grenoble    \n\
                        3      Lisa     21   Le Cheylas  \n";
        assert_eq!(four_rows().render(RowSelection::Tail(2)), expected);
    }

    #[test]
    fn test_render_single_row_head_equals_tail() {
        let t = table(vec![
            ("Nom", vec!["Justine"]),
            ("Age", vec!["21"]),
            ("Ville", vec!["Grenoble"]),
        ]);
        let expected = "Index  Nom      Age  Ville     \n\
                        -----  ---      ---  -----     \n\
                        0      Justine  21   Grenoble  \n";
        assert_eq!(t.render(RowSelection::Head(1)), expected);
        assert_eq!(t.render(RowSelection::Tail(1)), expected);
    }

    #[test]
    fn test_render_limits_larger_than_table() {
        let t = four_rows();
        assert_eq!(t.render(RowSelection::Head(10)), t.render(RowSelection::All));
        assert_eq!(t.render(RowSelection::Tail(10)), t.render(RowSelection::All));
    }

    #[test]
    fn test_render_no_rows() {
        let t = table(vec![("Nom", vec![])]);
        assert_eq!(t.render(RowSelection::All), "Index  Nom  \n-----  ---  \n");
        assert_eq!(four_rows().render(RowSelection::Head(0)).lines().count(), 2);
    }
}
