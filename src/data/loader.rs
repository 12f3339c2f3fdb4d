use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use super::model::{Gender, PaymentMethod, RawTransaction};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Column projection
// ---------------------------------------------------------------------------

pub const COL_GENDER: &str = "gender";
pub const COL_INVOICE_DATE: &str = "invoice_date";
pub const COL_PRICE: &str = "price";
pub const COL_QUANTITY: &str = "quantity";
pub const COL_AGE: &str = "age";
pub const COL_CATEGORY: &str = "category";
pub const COL_SHOPPING_MALL: &str = "shopping_mall";
pub const COL_PAYMENT_METHOD: &str = "payment_method";

/// Cell spellings pandas would read as NaN.
const MISSING_MARKERS: [&str; 7] = ["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Day-first layouts tried in order; ISO year-first is handled separately.
const DAY_FIRST_FORMATS: [&str; 9] = [
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
];

/// Rows produced by the loader plus what the header told us.
#[derive(Debug, Clone)]
pub struct LoadedRows {
    pub rows: Vec<RawTransaction>,
    /// `false` for files without a `quantity` column.
    pub has_quantity: bool,
}

/// Header positions of the projected columns.
struct Projection {
    gender: usize,
    invoice_date: usize,
    price: usize,
    quantity: Option<usize>,
    age: usize,
    category: usize,
    shopping_mall: usize,
    payment_method: usize,
}

impl Projection {
    fn from_headers(headers: &[String]) -> Result<Self, DataError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| find(name).ok_or_else(|| DataError::missing_column(name));

        Ok(Projection {
            gender: require(COL_GENDER)?,
            invoice_date: require(COL_INVOICE_DATE)?,
            price: require(COL_PRICE)?,
            quantity: find(COL_QUANTITY),
            age: require(COL_AGE)?,
            category: require(COL_CATEGORY)?,
            shopping_mall: require(COL_SHOPPING_MALL)?,
            payment_method: require(COL_PAYMENT_METHOD)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the transactions file at `path`.
pub fn load_csv(path: &Path) -> Result<LoadedRows, DataError> {
    let file = File::open(path).map_err(|source| DataError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file)
}

/// Parse transactions from any CSV source with a header row.
pub fn read_csv<R: Read>(source: R) -> Result<LoadedRows, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::SchemaMismatch {
            row: None,
            column: "<header>".to_string(),
            reason: e.to_string(),
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let proj = Projection::from_headers(&headers)?;
    let mut rows = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row_no = i + 1;
        let record = result.map_err(|e| DataError::SchemaMismatch {
            row: Some(row_no),
            column: "<record>".to_string(),
            reason: e.to_string(),
        })?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let gender = Gender::parse(cell(proj.gender)).ok_or_else(|| {
            DataError::bad_cell(row_no, COL_GENDER, format!("unknown gender '{}'", cell(proj.gender)))
        })?;
        let invoice_date = parse_day_first(cell(proj.invoice_date)).ok_or_else(|| {
            DataError::bad_cell(
                row_no,
                COL_INVOICE_DATE,
                format!("'{}' is not a day-first date", cell(proj.invoice_date)),
            )
        })?;
        let unit_price = parse_price(cell(proj.price), row_no)?;
        let quantity = proj
            .quantity
            .map(|idx| parse_count(cell(idx), row_no, COL_QUANTITY))
            .transpose()?;
        let age = parse_count(cell(proj.age), row_no, COL_AGE)?;
        let category = cell(proj.category);
        if category.is_empty() {
            return Err(DataError::bad_cell(row_no, COL_CATEGORY, "empty category"));
        }
        let payment_method = PaymentMethod::parse(cell(proj.payment_method)).ok_or_else(|| {
            DataError::bad_cell(
                row_no,
                COL_PAYMENT_METHOD,
                format!("unknown payment method '{}'", cell(proj.payment_method)),
            )
        })?;

        rows.push(RawTransaction {
            gender,
            invoice_date,
            unit_price,
            quantity,
            age,
            category: category.to_string(),
            shopping_mall: optional_text(cell(proj.shopping_mall)),
            payment_method,
        });
    }

    log::debug!("Parsed {} rows (quantity column: {})", rows.len(), proj.quantity.is_some());

    Ok(LoadedRows {
        rows,
        has_quantity: proj.quantity.is_some(),
    })
}

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

/// Parse an invoice date with day-first convention. A leading 4-digit year
/// (`2021-11-05`) is read as ISO year-month-day. The year must have exactly
/// four digits in either layout.
pub fn parse_day_first(s: &str) -> Option<NaiveDate> {
    let looks_iso = s.len() >= 10 && s.as_bytes()[..4].iter().all(u8::is_ascii_digit) && s.as_bytes()[4] == b'-';
    if looks_iso {
        let date_part = s.get(..10)?;
        if !is_time_suffix(s.get(10..)?) {
            return None;
        }
        return NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok();
    }

    let date_part = s.split(' ').next().unwrap_or("");
    let year = date_part.rsplit(['/', '-', '.']).next().unwrap_or("");
    if year.len() != 4 {
        return None;
    }
    DAY_FIRST_FORMATS.iter().find_map(|fmt| {
        if fmt.contains("%H") {
            chrono::NaiveDateTime::parse_from_str(s, fmt)
                .ok()
                .map(|dt| dt.date())
        } else {
            NaiveDate::parse_from_str(s, fmt).ok()
        }
    })
}

/// What may follow an ISO date: nothing, or ` HH:MM[:SS]` / `THH:MM[:SS][Z]`.
fn is_time_suffix(rest: &str) -> bool {
    let Some(time) = rest.strip_prefix(' ').or_else(|| rest.strip_prefix('T')) else {
        return rest.is_empty();
    };
    let time = time.strip_suffix('Z').unwrap_or(time);
    ["%H:%M", "%H:%M:%S", "%H:%M:%S%.f"]
        .iter()
        .any(|fmt| chrono::NaiveTime::parse_from_str(time, fmt).is_ok())
}

fn parse_price(s: &str, row: usize) -> Result<f64, DataError> {
    let value: f64 = s
        .parse()
        .map_err(|_| DataError::bad_cell(row, COL_PRICE, format!("'{s}' is not a number")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(DataError::bad_cell(row, COL_PRICE, format!("'{s}' is not a non-negative amount")));
    }
    Ok(value)
}

fn parse_count(s: &str, row: usize, column: &str) -> Result<u32, DataError> {
    s.parse::<u32>()
        .map_err(|_| DataError::bad_cell(row, column, format!("'{s}' is not a non-negative integer")))
}

fn optional_text(s: &str) -> Option<String> {
    if s.is_empty() || MISSING_MARKERS.contains(&s) {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use std::io::Write;

    const HEADER: &str =
        "invoice_no,customer_id,gender,age,category,quantity,price,payment_method,invoice_date,shopping_mall";

    fn parse(body: &str) -> Result<LoadedRows, DataError> {
        read_csv(format!("{HEADER}\n{body}").as_bytes())
    }

    #[test]
    fn parses_a_full_row() {
        let loaded = parse("I138884,C241288,Female,28,Clothing,5,1500.40,Credit Card,5/8/2022,Kanyon\n").unwrap();
        assert!(loaded.has_quantity);
        let row = &loaded.rows[0];
        assert_eq!(row.gender, Gender::Female);
        assert_eq!(row.age, 28);
        assert_eq!(row.quantity, Some(5));
        assert_eq!(row.unit_price, 1500.40);
        assert_eq!(row.payment_method, PaymentMethod::CreditCard);
        // day-first: 5 August
        assert_eq!(row.invoice_date, NaiveDate::from_ymd_opt(2022, 8, 5).unwrap());
        assert_eq!(row.shopping_mall.as_deref(), Some("Kanyon"));
    }

    #[test]
    fn quantity_column_is_optional() {
        let csv = "gender,invoice_date,price,age,category,shopping_mall,payment_method\n\
                   Male,12/11/2021,40.0,51,Books,Metrocity,Cash\n";
        let loaded = read_csv(csv.as_bytes()).unwrap();
        assert!(!loaded.has_quantity);
        assert_eq!(loaded.rows[0].quantity, None);
    }

    #[test]
    fn blank_and_nan_malls_are_missing() {
        let loaded = parse(
            "a,b,Male,40,Toys,1,10,Cash,01/01/2023,\n\
             a,b,Male,40,Toys,1,10,Cash,01/01/2023,NaN\n",
        )
        .unwrap();
        assert!(loaded.rows.iter().all(|r| r.shopping_mall.is_none()));
    }

    #[test]
    fn missing_required_column_is_schema_mismatch() {
        let err = read_csv("gender,invoice_date,price\nMale,01/01/2021,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::SchemaMismatch { row: None, ref column, .. } if column == "age"));
    }

    #[test]
    fn unparsable_price_fails_the_load() {
        let err = parse("a,b,Male,40,Toys,1,ten,Cash,01/01/2023,Kanyon\n").unwrap_err();
        assert!(matches!(err, DataError::SchemaMismatch { row: Some(1), ref column, .. } if column == "price"));
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = parse("a,b,Male,40,Toys,1,-3.5,Cash,01/01/2023,Kanyon\n").unwrap_err();
        assert!(matches!(err, DataError::SchemaMismatch { ref column, .. } if column == "price"));
    }

    #[test]
    fn unknown_payment_method_reports_row() {
        let err = parse(
            "a,b,Male,40,Toys,1,3,Cash,01/01/2023,Kanyon\n\
             a,b,Male,40,Toys,1,3,Voucher,01/01/2023,Kanyon\n",
        )
        .unwrap_err();
        assert!(matches!(err, DataError::SchemaMismatch { row: Some(2), .. }));
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable { .. }));
    }

    #[test]
    fn load_csv_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "a,b,Male,22,Shoes,2,600.17,Debit Card,24/02/2021,Istinye Park").unwrap();
        let loaded = load_csv(file.path()).unwrap();
        assert_eq!(loaded.rows.len(), 1);
    }

    #[test]
    fn iso_dates_keep_their_year() {
        let d = parse_day_first("2021-11-05").unwrap();
        assert_eq!(d.year(), 2021);
        assert_eq!(d.month(), 11);
        assert_eq!(d.day(), 5);
    }

    #[test]
    fn short_or_long_years_are_rejected() {
        assert_eq!(parse_day_first("05/11/21"), None);
        assert_eq!(parse_day_first("05-11-21 10:15"), None);
        assert_eq!(parse_day_first("05/11/20211"), None);

        let err = parse("a,b,Male,40,Toys,1,3,Cash,05/11/21,Kanyon\n").unwrap_err();
        assert!(matches!(
            err,
            DataError::SchemaMismatch { row: Some(1), ref column, .. } if column == "invoice_date"
        ));
    }

    #[test]
    fn iso_dates_allow_only_a_time_suffix() {
        let expected = NaiveDate::from_ymd_opt(2021, 11, 5).unwrap();
        assert_eq!(parse_day_first("2021-11-05 08:30"), Some(expected));
        assert_eq!(parse_day_first("2021-11-05T08:30:00"), Some(expected));
        assert_eq!(parse_day_first("2021-11-05T08:30:00Z"), Some(expected));
        assert_eq!(parse_day_first("2021-11-05garbage"), None);
        assert_eq!(parse_day_first("2021-11-05 soon"), None);

        let err = parse("a,b,Male,40,Toys,1,3,Cash,2021-11-05garbage,Kanyon\n").unwrap_err();
        assert!(matches!(err, DataError::SchemaMismatch { ref column, .. } if column == "invoice_date"));
    }

    #[test]
    fn day_first_variants() {
        let expected = NaiveDate::from_ymd_opt(2021, 11, 5).unwrap();
        assert_eq!(parse_day_first("05/11/2021"), Some(expected));
        assert_eq!(parse_day_first("5-11-2021"), Some(expected));
        assert_eq!(parse_day_first("05.11.2021"), Some(expected));
        assert_eq!(parse_day_first("05/11/2021 14:30"), Some(expected));
        assert_eq!(parse_day_first("13/13/2021"), None);
        assert_eq!(parse_day_first("yesterday"), None);
    }
}
