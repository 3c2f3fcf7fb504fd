use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context;
use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{DatedSale, MonthlyPoint, SalesRow};

/// Date formats seen in the wild for this dataset: the raw export uses
/// day-first dates, cleaned exports use ISO.
const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];

fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Load the dataset, coercing order dates. Rows whose date parses under no
/// known format are dropped; the count of dropped rows is returned so the
/// CLI can surface it.
pub fn load_rows(path: &Path) -> anyhow::Result<(Vec<DatedSale>, usize)> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open dataset at {}", path.display()))?;

    let mut sales = Vec::new();
    let mut skipped = 0usize;

    for result in reader.deserialize::<SalesRow>() {
        let row = result.context("malformed dataset row")?;
        match parse_order_date(&row.order_date) {
            Some(order_date) => sales.push(DatedSale {
                order_date,
                sub_category: row.sub_category.trim().to_string(),
                sales: row.sales,
            }),
            None => skipped += 1,
        }
    }

    Ok((sales, skipped))
}

/// Distinct sub-category labels present in the data, sorted.
pub fn sub_categories(rows: &[DatedSale]) -> Vec<String> {
    let set: BTreeSet<&str> = rows.iter().map(|row| row.sub_category.as_str()).collect();
    set.into_iter().map(str::to_string).collect()
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    // First of next month always exists.
    NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap() - Duration::days(1)
}

fn next_month_end(month: NaiveDate) -> NaiveDate {
    month_end(month + Duration::days(1))
}

/// Monthly total sales for one sub-category, keyed by month-end date.
/// The month range is continuous from the first to the last observed month;
/// months with no orders carry a 0.0 total.
pub fn monthly_sales(rows: &[DatedSale], sub_category: &str) -> Vec<MonthlyPoint> {
    let mut by_month: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for row in rows.iter().filter(|row| row.sub_category == sub_category) {
        *by_month.entry(month_end(row.order_date)).or_insert(0.0) += row.sales;
    }

    let (first, last) = match (by_month.keys().next(), by_month.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Vec::new(),
    };

    let mut points = Vec::new();
    let mut month = first;
    loop {
        points.push(MonthlyPoint {
            month,
            sales: by_month.get(&month).copied().unwrap_or(0.0),
        });
        if month == last {
            break;
        }
        month = next_month_end(month);
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(date: (i32, u32, u32), sub_category: &str, sales: f64) -> DatedSale {
        DatedSale {
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            sub_category: sub_category.to_string(),
            sales,
        }
    }

    #[test]
    fn parses_day_first_and_iso_dates() {
        assert_eq!(
            parse_order_date("25/12/2017"),
            NaiveDate::from_ymd_opt(2017, 12, 25)
        );
        assert_eq!(
            parse_order_date("2017-12-25"),
            NaiveDate::from_ymd_opt(2017, 12, 25)
        );
        assert_eq!(parse_order_date("not a date"), None);
        assert_eq!(parse_order_date(""), None);
    }

    #[test]
    fn month_end_handles_year_boundary() {
        let dec = NaiveDate::from_ymd_opt(2017, 12, 3).unwrap();
        assert_eq!(month_end(dec), NaiveDate::from_ymd_opt(2017, 12, 31).unwrap());
        let feb = NaiveDate::from_ymd_opt(2016, 2, 10).unwrap();
        assert_eq!(month_end(feb), NaiveDate::from_ymd_opt(2016, 2, 29).unwrap());
    }

    #[test]
    fn monthly_sales_sums_within_month() {
        let rows = vec![
            sale((2017, 1, 5), "Chairs", 100.0),
            sale((2017, 1, 20), "Chairs", 50.0),
            sale((2017, 2, 1), "Chairs", 30.0),
            sale((2017, 1, 5), "Tables", 999.0),
        ];
        let points = monthly_sales(&rows, "Chairs");
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].month, NaiveDate::from_ymd_opt(2017, 1, 31).unwrap());
        assert!((points[0].sales - 150.0).abs() < 1e-9);
        assert!((points[1].sales - 30.0).abs() < 1e-9);
    }

    #[test]
    fn monthly_sales_fills_gap_months_with_zero() {
        let rows = vec![
            sale((2017, 1, 5), "Labels", 10.0),
            sale((2017, 4, 5), "Labels", 40.0),
        ];
        let points = monthly_sales(&rows, "Labels");
        assert_eq!(points.len(), 4);
        assert_eq!(points[1].sales, 0.0);
        assert_eq!(points[2].sales, 0.0);
        assert_eq!(points[3].month, NaiveDate::from_ymd_opt(2017, 4, 30).unwrap());
    }

    #[test]
    fn unknown_sub_category_yields_empty_series() {
        let rows = vec![sale((2017, 1, 5), "Chairs", 100.0)];
        assert!(monthly_sales(&rows, "Copiers").is_empty());
    }

    #[test]
    fn sub_categories_are_distinct_and_sorted() {
        let rows = vec![
            sale((2017, 1, 5), "Tables", 1.0),
            sale((2017, 1, 6), "Chairs", 1.0),
            sale((2017, 1, 7), "Tables", 1.0),
        ];
        assert_eq!(sub_categories(&rows), vec!["Chairs", "Tables"]);
    }
}
