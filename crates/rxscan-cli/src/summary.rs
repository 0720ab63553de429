use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use rxscan_model::{CatalogEntry, EntrySource, MatchKind, MatchResult};
use rxscan_resolve::SimilarityHit;

pub fn print_matches(results: &[MatchResult]) {
    if results.is_empty() {
        println!("No drug mentions found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Mention"),
        header_cell("Match"),
        header_cell("Score"),
        header_cell("Brand"),
        header_cell("Generic"),
        header_cell("Product"),
        header_cell("Via"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (position, result) in results.iter().enumerate() {
        let record = &result.entry.record;
        table.add_row(vec![
            dim_cell(position + 1),
            Cell::new(&result.name).add_attribute(Attribute::Bold),
            kind_cell(result.kind),
            score_cell(result),
            text_cell(&record.brand_name),
            text_cell(&record.generic_name),
            text_cell(&record.product_code),
            Cell::new(source_label(result.entry.source)),
        ]);
    }
    println!("{table}");
    println!("{} mention(s)", results.len());
}

pub fn print_entry(identifier: &str, entry: Option<&CatalogEntry>) {
    let Some(entry) = entry else {
        println!("No catalog entry for {identifier}.");
        return;
    };
    let record = &entry.record;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    let ingredients = record
        .active_ingredients
        .iter()
        .map(|ingredient| match &ingredient.strength {
            Some(strength) => format!("{} ({strength})", ingredient.name),
            None => ingredient.name.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    for (field, value) in [
        ("Brand", record.brand_name.as_str()),
        ("Generic", record.generic_name.as_str()),
        ("Product code", record.product_code.as_str()),
        ("Labeler", record.labeler_name.as_str()),
        ("Dosage form", record.dosage_form.as_str()),
        ("Product type", record.product_type.as_str()),
        ("Ingredients", ingredients.as_str()),
        ("Matched via", source_label(entry.source)),
    ] {
        table.add_row(vec![Cell::new(field).add_attribute(Attribute::Bold), text_cell(value)]);
    }
    println!("{table}");
}

pub fn print_hits(term: &str, hits: &[(SimilarityHit, Option<CatalogEntry>)]) {
    if hits.is_empty() {
        println!("No similar catalog names for {term}.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Identifier"),
        header_cell("Distance"),
        header_cell("Brand"),
        header_cell("Generic"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (hit, entry) in hits {
        let (brand, generic) = match entry {
            Some(entry) => (
                text_cell(&entry.record.brand_name),
                text_cell(&entry.record.generic_name),
            ),
            None => (dim_cell("not in catalog"), dim_cell("-")),
        };
        table.add_row(vec![
            Cell::new(&hit.identifier),
            Cell::new(format!("{:.1}", hit.distance)),
            brand,
            generic,
        ]);
    }
    println!("{table}");
}

pub fn print_checks(checks: &[(String, Option<String>)]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Term"), header_cell("Verdict"), header_cell("Rule")]);
    apply_table_style(&mut table);
    for (term, rule) in checks {
        let (verdict, rule) = match rule {
            Some(rule) => (
                Cell::new("excluded").fg(Color::Red),
                Cell::new(rule),
            ),
            None => (Cell::new("kept").fg(Color::Green), dim_cell("-")),
        };
        table.add_row(vec![Cell::new(term), verdict, rule]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() >= 8 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(3)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::LowerBoundary(Width::Fixed(13)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn kind_cell(kind: MatchKind) -> Cell {
    let color = match kind {
        MatchKind::ExactFull => Color::Green,
        MatchKind::ExactPartial => Color::Cyan,
        MatchKind::Approximate => Color::Yellow,
    };
    Cell::new(kind.as_str()).fg(color)
}

fn score_cell(result: &MatchResult) -> Cell {
    match result.kind {
        MatchKind::ExactFull => dim_cell("exact"),
        MatchKind::ExactPartial | MatchKind::Approximate => {
            Cell::new(format!("{:.1}", result.confidence))
        }
    }
}

fn source_label(source: EntrySource) -> &'static str {
    match source {
        EntrySource::Brand => "brand",
        EntrySource::Generic => "generic",
        EntrySource::Ingredient => "ingredient",
        EntrySource::ProductCode => "product code",
    }
}

fn text_cell(value: &str) -> Cell {
    if value.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
