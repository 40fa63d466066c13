use super::ui;
use crate::core::CurrencyCatalog;
use comfy_table::{Cell, Table};

pub fn catalog_table(catalog: &CurrencyCatalog) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
    ]);
    for (code, info) in catalog.iter() {
        table.add_row(vec![
            Cell::new(code.as_str()),
            Cell::new(&info.name),
            Cell::new(&info.symbol),
        ]);
    }
    table
}

pub fn run(catalog: &CurrencyCatalog) {
    println!(
        "{} ({})",
        ui::style_text("Supported currencies", ui::StyleType::Title),
        catalog.len()
    );
    println!("{}", catalog_table(catalog));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_table_lists_every_currency() {
        let catalog = CurrencyCatalog::builtin();
        let table = catalog_table(&catalog);
        assert_eq!(table.row_iter().count(), catalog.len());

        let rendered = table.to_string();
        assert!(rendered.contains("EUR"));
        assert!(rendered.contains("Japanese Yen"));
    }
}
