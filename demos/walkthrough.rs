/// TabFrame Walkthrough
///
/// This example demonstrates:
/// - Building a table from columns and printing all, head and tail rows
/// - Selecting rows by label, after relabelling with `set_index`
/// - Positional slicing
/// - Closure and expression filters
/// - Column statistics, as text and JSON

use tabframe::{Column, RowSelection, Table};

fn main() -> tabframe::Result<()> {
    println!("=== TabFrame Walkthrough ===\n");

    let table = Table::new(vec![
        (
            "Nom",
            Column::from_strings(["Justine", "Colin", "Yoann", "Eva", "Rudy", "Lisa"]),
        ),
        ("Age", vec![21, 14, 21, 26, 24, 21].into_iter().collect::<Column>()),
    ])?;

    // 1. Display
    println!("1. Full table:");
    print!("{}", table);
    println!("\n   First two rows:");
    print!("{}", table.render(RowSelection::Head(2)));
    println!("\n   Last three rows:");
    print!("{}", table.render(RowSelection::Tail(3)));

    // 2. Selection
    println!("\n2. Rows labelled 0 and 2:");
    print!("{}", table.loc(["0", "2"])?);

    let mut by_name = table.clone();
    by_name.set_index("Nom")?;
    println!("\n   Nom as the index:");
    print!("{}", by_name);

    println!("\n   Rows labelled Justine and Colin:");
    print!("{}", by_name.loc(["Justine", "Colin"])?);

    println!("\n   Rows 1 to 4 by position:");
    print!("{}", table.iloc(1..5, 1..1)?);

    // 3. Filtering
    println!("\n3. Age strictly above 23:");
    print!(
        "{}",
        table.filter(|row| row.number("Age").map_or(false, |age| age > 23.0))
    );

    println!("\n   Age equal to 21:");
    print!("{}", table.filter_expr("Age == 21")?);

    println!("\n   Nom is Justine:");
    print!(
        "{}",
        table.try_filter(|row| Ok(row.text("Nom")? == "Justine"))?
    );

    // 4. Statistics
    let report = table.statistics("Age")?;
    println!("\n4. {}", report);
    println!("   As JSON:\n{}", report.to_json()?);

    Ok(())
}
