//! Mesh brand lookup by vendor prefix.
//!
//! The table is parsed once from the embedded `data/mesh_oui.txt` and never
//! mutated afterwards. Several prefixes appear under more than one brand;
//! lookups resolve to the brand declared first in the file.

use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::debug;

use crate::model::{Bssid, Oui};

const BUILTIN_MESH_OUI: &str = include_str!("../data/mesh_oui.txt");

static BUILTIN: LazyLock<BrandTable> = LazyLock::new(|| BrandTable::parse(BUILTIN_MESH_OUI));

/// Immutable prefix → brand table.
#[derive(Debug, Clone, Default)]
pub struct BrandTable {
    brands: Vec<String>,
    /// Prefix → index into `brands` of the first brand declaring it.
    by_oui: HashMap<Oui, usize>,
}

impl BrandTable {
    /// The built-in table of known mesh and WiFi-system vendors.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Build a table from `(brand, prefixes)` pairs, in priority order.
    pub fn from_entries<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, P)>,
        P: IntoIterator<Item = Oui>,
    {
        let mut table = Self::default();
        for (brand, ouis) in entries {
            table.push_brand(brand, ouis);
        }
        table
    }

    /// Parse the `[brand]` / whitespace-separated-prefix text format.
    ///
    /// Lines starting with `#` are comments. Malformed prefixes and prefixes
    /// listed before any `[brand]` header are skipped.
    pub fn parse(text: &str) -> Self {
        let mut table = Self::default();
        let mut current: Option<usize> = None;

        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current = Some(table.push_brand(name.trim().to_owned(), []));
                continue;
            }
            let Some(idx) = current else {
                debug!(line = lineno + 1, "prefix line outside any brand section");
                continue;
            };
            for token in line.split_whitespace() {
                match token.to_ascii_uppercase().parse::<Oui>() {
                    Ok(oui) => {
                        table.by_oui.entry(oui).or_insert(idx);
                    }
                    Err(_) => debug!(line = lineno + 1, token, "skipping malformed OUI"),
                }
            }
        }
        table
    }

    fn push_brand(&mut self, brand: String, ouis: impl IntoIterator<Item = Oui>) -> usize {
        let idx = self.brands.len();
        self.brands.push(brand);
        for oui in ouis {
            self.by_oui.entry(oui).or_insert(idx);
        }
        idx
    }

    /// Brand keys in declaration order.
    pub fn brands(&self) -> impl Iterator<Item = &str> {
        self.brands.iter().map(String::as_str)
    }

    pub fn brand_for(&self, oui: Oui) -> Option<&str> {
        self.by_oui
            .get(&oui)
            .and_then(|&idx| self.brands.get(idx))
            .map(String::as_str)
    }

    /// First brand matched by any BSSID, walking BSSIDs in the order given.
    pub fn identify<'a>(&self, bssids: impl IntoIterator<Item = &'a Bssid>) -> Option<&str> {
        bssids.into_iter().find_map(|b| self.brand_for(b.oui()))
    }

    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn oui(s: &str) -> Oui {
        s.parse().unwrap()
    }

    #[test]
    fn builtin_table_knows_common_mesh_vendors() {
        let table = BrandTable::builtin();
        assert!(table.len() > 20);
        assert_eq!(table.brand_for(oui("F8:BB:BF")), Some("eero"));
        assert_eq!(table.brand_for(oui("98:97:9A")), Some("orbi_netgear"));
        assert_eq!(table.brand_for(oui("78:8A:20")), Some("ubiquiti"));
        assert_eq!(table.brand_for(oui("00:00:01")), None);
    }

    #[test]
    fn earliest_declared_brand_wins_shared_prefix() {
        // 88:1F:A1 is listed under eero, asus and ubiquiti.
        let table = BrandTable::builtin();
        assert_eq!(table.brand_for(oui("88:1F:A1")), Some("eero"));
        // 84:1B:5E is listed under orbi_netgear before mikrotik and ruckus.
        assert_eq!(table.brand_for(oui("84:1B:5E")), Some("orbi_netgear"));
    }

    #[test]
    fn identify_walks_bssids_in_order() {
        let table = BrandTable::from_entries([
            ("alpha".to_owned(), vec![oui("11:11:11")]),
            ("beta".to_owned(), vec![oui("22:22:22"), oui("11:11:11")]),
        ]);
        let unknown: Bssid = "00:00:00:00:00:01".parse().unwrap();
        let beta: Bssid = "22:22:22:00:00:01".parse().unwrap();
        let alpha: Bssid = "11:11:11:00:00:01".parse().unwrap();
        assert_eq!(table.identify([&unknown, &beta, &alpha]), Some("beta"));
        assert_eq!(table.identify([&alpha]), Some("alpha"));
        assert_eq!(table.identify([&unknown]), None);
        assert_eq!(table.identify(std::iter::empty::<&Bssid>()), None);
    }

    #[test]
    fn parse_skips_malformed_entries() {
        let table = BrandTable::parse(
            "# comment\n00:11:22\n[first]\nAA:BB:CC R0:48:7A bogus\n\n[second]\naa:bb:cc 01:02:03\n",
        );
        assert_eq!(table.brands().collect::<Vec<_>>(), ["first", "second"]);
        assert_eq!(table.brand_for(oui("AA:BB:CC")), Some("first"));
        assert_eq!(table.brand_for(oui("01:02:03")), Some("second"));
        assert_eq!(table.brand_for(oui("00:11:22")), None);
    }
}
