//! Core types for Shopcheck

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::price::PricePolicy;

/// One rendered product: its display name and parsed price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub price: f64,
}

impl ProductRecord {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Build a record from the raw text of a rendered item.
    ///
    /// The name is trimmed; the price text is resolved under `policy`.
    pub fn from_rendered(
        name: &str,
        price_text: Option<&str>,
        policy: PricePolicy,
    ) -> Result<Self> {
        Ok(Self {
            name: name.trim().to_string(),
            price: policy.resolve(price_text)?,
        })
    }

    /// Whether the name contains anything besides alphanumerics and spaces
    pub fn has_special_characters(&self) -> bool {
        self.name.chars().any(|c| !c.is_alphanumeric() && c != ' ')
    }

    fn name_key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl fmt::Display for ProductRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (${:.2})", self.name, self.price)
    }
}

/// A listing as rendered in one pass, in display order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductSequence(Vec<ProductRecord>);

impl ProductSequence {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        Self(records)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductRecord> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ProductRecord> {
        self.0.get(index)
    }

    pub fn prices(&self) -> Vec<f64> {
        self.0.iter().map(|r| r.price).collect()
    }

    /// Numbered table for logs, one record per line
    pub fn to_table(&self) -> String {
        self.0
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{:2}. {:<35} ${:6.2}", i + 1, r.name, r.price))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<ProductRecord> for ProductSequence {
    fn from_iter<I: IntoIterator<Item = ProductRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ProductSequence {
    type Item = ProductRecord;
    type IntoIter = std::vec::IntoIter<ProductRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ProductSequence {
    type Item = &'a ProductRecord;
    type IntoIter = std::slice::Iter<'a, ProductRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Ordering rule selectable from the listing's sort control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    #[serde(rename = "az")]
    NameAscending,
    #[serde(rename = "za")]
    NameDescending,
    #[serde(rename = "lohi")]
    PriceAscending,
    #[serde(rename = "hilo")]
    PriceDescending,
}

impl SortMode {
    /// Every mode, in the order the sort control lists them
    pub const ALL: [SortMode; 4] = [
        SortMode::NameAscending,
        SortMode::NameDescending,
        SortMode::PriceAscending,
        SortMode::PriceDescending,
    ];

    /// The `<option value>` the storefront uses for this mode
    pub fn option_value(&self) -> &'static str {
        match self {
            SortMode::NameAscending => "az",
            SortMode::NameDescending => "za",
            SortMode::PriceAscending => "lohi",
            SortMode::PriceDescending => "hilo",
        }
    }

    /// The option's visible label
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::NameAscending => "Name (A to Z)",
            SortMode::NameDescending => "Name (Z to A)",
            SortMode::PriceAscending => "Price (low to high)",
            SortMode::PriceDescending => "Price (high to low)",
        }
    }

    /// Whether `left` may be displayed immediately before `right`.
    ///
    /// Name modes compare lowercased text; price modes compare numerically.
    /// Both are non-strict, so equal keys are always permitted.
    pub fn allows(&self, left: &ProductRecord, right: &ProductRecord) -> bool {
        match self {
            SortMode::NameAscending => left.name_key() <= right.name_key(),
            SortMode::NameDescending => left.name_key() >= right.name_key(),
            SortMode::PriceAscending => left.price <= right.price,
            SortMode::PriceDescending => left.price >= right.price,
        }
    }

    /// Canonical display order of `records` under this mode.
    ///
    /// The sort is stable; records with equal keys keep their input order.
    pub fn sort(&self, records: &mut [ProductRecord]) {
        records.sort_by(|a, b| self.compare(a, b));
    }

    /// Total order behind [`SortMode::sort`]
    pub fn compare(&self, a: &ProductRecord, b: &ProductRecord) -> Ordering {
        match self {
            SortMode::NameAscending => a.name_key().cmp(&b.name_key()),
            SortMode::NameDescending => b.name_key().cmp(&a.name_key()),
            SortMode::PriceAscending => a.price.total_cmp(&b.price),
            SortMode::PriceDescending => b.price.total_cmp(&a.price),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.option_value())
    }
}

impl FromStr for SortMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.option_value() == s)
            .ok_or_else(|| Error::UnknownSortMode(s.to_string()))
    }
}

/// Login credentials for the storefront
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("standard_user", "secret_sauce")
    }
}

/// Buyer details entered on the first checkout step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub first_name: String,
    pub last_name: String,
    pub postal_code: String,
}

impl CheckoutDetails {
    /// Randomized details: names with a numeric suffix, six-digit postal code
    pub fn random() -> Self {
        Self::random_with(&mut rand::thread_rng())
    }

    pub fn random_with<R: Rng>(rng: &mut R) -> Self {
        let postal_code: String = (0..6)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();

        Self {
            first_name: format!("Ivan{}", rng.gen_range(1..=100)),
            last_name: format!("Ivanov{}", rng.gen_range(1..=100)),
            postal_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_case::test_case;

    #[test_case(SortMode::NameAscending, "az")]
    #[test_case(SortMode::NameDescending, "za")]
    #[test_case(SortMode::PriceAscending, "lohi")]
    #[test_case(SortMode::PriceDescending, "hilo")]
    fn sort_mode_maps_to_option_value(mode: SortMode, value: &str) {
        assert_eq!(mode.option_value(), value);
        assert_eq!(value.parse::<SortMode>().unwrap(), mode);
        assert_eq!(serde_json::to_string(&mode).unwrap(), format!("\"{}\"", value));
    }

    #[test]
    fn unknown_sort_mode_is_rejected() {
        assert_eq!(
            "price".parse::<SortMode>(),
            Err(Error::UnknownSortMode("price".to_string()))
        );
        assert!("AZ".parse::<SortMode>().is_err());
    }

    #[test]
    fn default_sort_mode_is_name_ascending() {
        assert_eq!(SortMode::default(), SortMode::NameAscending);
    }

    #[test]
    fn from_rendered_trims_name_and_parses_price() {
        let record = ProductRecord::from_rendered(
            "  Sauce Labs Onesie \n",
            Some("$7.99"),
            PricePolicy::Lenient,
        )
        .unwrap();
        assert_eq!(record, ProductRecord::new("Sauce Labs Onesie", 7.99));
    }

    #[test]
    fn from_rendered_defaults_malformed_price_when_lenient() {
        let record = ProductRecord::from_rendered("Mystery Item", Some("N/A"), PricePolicy::Lenient)
            .unwrap();
        assert_eq!(record.price, 0.0);
    }

    #[test]
    fn special_characters_are_detected() {
        let red = ProductRecord::new("Test.allTheThings() T-Shirt (Red)", 15.99);
        assert!(red.has_special_characters());
        assert!(!ProductRecord::new("Sauce Labs Backpack", 29.99).has_special_characters());
    }

    #[test]
    fn price_sort_is_stable_for_ties() {
        let mut records = vec![
            ProductRecord::new("Sauce Labs Bolt T-Shirt", 15.99),
            ProductRecord::new("Sauce Labs Onesie", 7.99),
            ProductRecord::new("Test.allTheThings() T-Shirt (Red)", 15.99),
        ];
        SortMode::PriceAscending.sort(&mut records);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Sauce Labs Onesie",
                "Sauce Labs Bolt T-Shirt",
                "Test.allTheThings() T-Shirt (Red)"
            ]
        );
    }

    #[test]
    fn name_sort_ignores_case() {
        let mut records = vec![
            ProductRecord::new("banana", 1.0),
            ProductRecord::new("Apple", 2.0),
            ProductRecord::new("cherry", 3.0),
        ];
        SortMode::NameAscending.sort(&mut records);
        assert_eq!(records[0].name, "Apple");
        assert_eq!(records[2].name, "cherry");
    }

    #[test]
    fn random_checkout_details_have_expected_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let details = CheckoutDetails::random_with(&mut rng);
            assert!(details.first_name.starts_with("Ivan"));
            assert!(details.last_name.starts_with("Ivanov"));
            assert_eq!(details.postal_code.len(), 6);
            assert!(details.postal_code.chars().all(|c| c.is_ascii_digit()));

            let suffix: u32 = details.first_name["Ivan".len()..].parse().unwrap();
            assert!((1..=100).contains(&suffix));
        }
    }

    #[test]
    fn sequence_table_numbers_rows() {
        let seq = ProductSequence::new(vec![
            ProductRecord::new("Sauce Labs Backpack", 29.99),
            ProductRecord::new("Sauce Labs Bike Light", 9.99),
        ]);
        let table = seq.to_table();
        assert!(table.starts_with(" 1. Sauce Labs Backpack"));
        assert!(table.contains(" 2. Sauce Labs Bike Light"));
        assert!(table.contains("$  9.99"));
    }
}
