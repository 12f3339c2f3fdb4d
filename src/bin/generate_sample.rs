use std::path::Path;

use anyhow::{Context, Result};

const CATEGORIES: [&str; 6] = ["Books", "Clothing", "Cosmetics", "Shoes", "Technology", "Toys"];
const MALLS: [&str; 5] = ["Cevahir AVM", "Istinye Park", "Kanyon", "Mall of Istanbul", "Metrocity"];
const PAYMENTS: [&str; 3] = ["Cash", "Credit Card", "Debit Card"];

/// (category, typical unit price) in TRY
const BASE_PRICES: [(&str, f64); 6] = [
    ("Books", 15.15),
    ("Clothing", 300.08),
    ("Cosmetics", 40.66),
    ("Shoes", 600.17),
    ("Technology", 1050.0),
    ("Toys", 35.84),
];

/// Minimal deterministic PRNG (splitmix64)
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    let mut rng = SampleRng(42);
    let output_path = Path::new("data/data.csv");
    if let Some(dir) = output_path.parent() {
        std::fs::create_dir_all(dir).context("creating data directory")?;
    }

    let mut writer = csv::Writer::from_path(output_path).context("creating output CSV")?;
    writer.write_record([
        "invoice_no",
        "customer_id",
        "gender",
        "age",
        "category",
        "quantity",
        "price",
        "payment_method",
        "invoice_date",
        "shopping_mall",
    ])?;

    let n_rows = 2_000;
    let mut written = 0usize;
    let mut previous: Option<Vec<String>> = None;

    for i in 0..n_rows {
        // every 97th row repeats the previous one verbatim
        if i % 97 == 96 {
            if let Some(row) = &previous {
                writer.write_record(row)?;
                written += 1;
                continue;
            }
        }

        let category = rng.pick(&CATEGORIES);
        let base = BASE_PRICES
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(100.0, |(_, p)| *p);
        let quantity = 1 + rng.below(5);
        // every 53rd row has no mall
        let mall = if i % 53 == 52 { "" } else { rng.pick(&MALLS) };

        let row = vec![
            format!("I{}", 100_000 + i),
            format!("C{}", 200_000 + rng.below(99_999)),
            if rng.below(5) < 3 { "Female" } else { "Male" }.to_string(),
            (18 + rng.below(52)).to_string(),
            category.to_string(),
            quantity.to_string(),
            format!("{base:.2}"),
            rng.pick(&PAYMENTS).to_string(),
            format!("{}/{}/{}", 1 + rng.below(28), 1 + rng.below(12), 2021 + rng.below(3)),
            mall.to_string(),
        ];
        writer.write_record(&row)?;
        written += 1;
        previous = Some(row);
    }
    writer.flush().context("flushing output CSV")?;

    println!("Wrote {written} transactions to {}", output_path.display());
    Ok(())
}
