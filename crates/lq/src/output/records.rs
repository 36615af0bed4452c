//! Record output formatting.

use ledger_filter::filter::Filter;
use ledger_filter::TaggedTransaction;
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{format_amount, format_tags, truncate_str};

/// JSON output structure for the filter command.
#[derive(Serialize)]
pub struct RecordsOutput<'a> {
    /// The filter that was evaluated, in canonical form.
    pub filter: &'a Filter,
    pub search: bool,
    pub total: usize,
    pub matched: usize,
    pub records: &'a [&'a TaggedTransaction],
}

/// Formats matching records as JSON.
pub fn format_records_json(
    filter: &Filter,
    search: bool,
    records: &[&TaggedTransaction],
    total: usize,
) -> Result<String, serde_json::Error> {
    let output = RecordsOutput {
        filter,
        search,
        total,
        matched: records.len(),
        records,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats matching records as a table with a summary line.
pub fn format_records_table(
    records: &[&TaggedTransaction],
    total: usize,
    search: bool,
    description_width: usize,
    use_colors: bool,
) -> String {
    let mut output = String::new();

    if !records.is_empty() {
        let header = format!(
            "{:<10} {:>12} {:<16} {:<width$} {}",
            "Date",
            "Amount",
            "Category",
            "Description",
            "Tags",
            width = description_width
        );
        if use_colors {
            output.push_str(&format!("{}\n", header.dimmed()));
        } else {
            output.push_str(&header);
            output.push('\n');
        }
    }

    for record in records {
        let txn = &record.transaction;
        let date = truncate_str(&txn.date, 10);
        let amount = format_amount(txn.amount, 12, use_colors);
        let category = truncate_str(&txn.category, 16);
        let description = truncate_str(&txn.description, description_width);
        let tags = format_tags(&record.tags, 30);

        let line = format!(
            "{:<10} {} {:<16} {:<width$} {}",
            date,
            amount,
            category,
            description,
            tags,
            width = description_width
        );
        output.push_str(line.trim_end());
        output.push('\n');
    }

    let kind = if search { " (free-text search)" } else { "" };
    output.push_str(&format!("{} of {} records match{}\n", records.len(), total, kind));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_filter::filter::FilterParser;
    use ledger_filter::Transaction;

    fn record(description: &str, amount: f64, tags: &[&str]) -> TaggedTransaction {
        TaggedTransaction {
            transaction: Transaction {
                description: description.to_string(),
                category: "Food".to_string(),
                account: String::new(),
                amount,
                date: "2025-03-15".to_string(),
                notes: String::new(),
            },
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_format_records_table() {
        let coffee = record("Coffee Shop", -120.5, &["treat"]);
        let table = format_records_table(&[&coffee], 3, false, 12, false);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Date"));
        assert_eq!(
            lines[1],
            "2025-03-15      -120.50 Food             Coffee Shop  #treat"
        );
        assert_eq!(lines[2], "1 of 3 records match");
    }

    #[test]
    fn test_format_records_table_empty_search() {
        let table = format_records_table(&[], 5, true, 40, false);
        assert_eq!(table, "0 of 5 records match (free-text search)\n");
    }

    #[test]
    fn test_format_records_json() {
        let coffee = record("Coffee Shop", -120.5, &[]);
        let filter = FilterParser::parse_strict("desc:coffee").unwrap();
        let json = format_records_json(&filter, false, &[&coffee], 2).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["filter"], "desc:coffee");
        assert_eq!(value["search"], false);
        assert_eq!(value["total"], 2);
        assert_eq!(value["matched"], 1);
        assert_eq!(value["records"][0]["description"], "Coffee Shop");
        assert_eq!(value["records"][0]["amount"], -120.5);
    }
}
