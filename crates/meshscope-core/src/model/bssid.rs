// ── Radio identity types ──
//
// Bssid is the identity of every scanned radio. Oui and BaseId are the two
// prefixes the clustering heuristics key on: the vendor prefix and the
// "same physical device" prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ── Bssid ───────────────────────────────────────────────────────────

/// A radio's MAC address in canonical `XX:XX:XX:XX:XX:XX` form.
///
/// Parsing is strict about shape (six two-digit hex octets separated by
/// exactly five colons) and rejects dashes, dots and bare hex. Hex digits
/// must be uppercase; callers holding scanner output uppercase it first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bssid([u8; 6]);

impl Bssid {
    pub const fn from_octets(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// The 24-bit vendor prefix.
    pub const fn oui(&self) -> Oui {
        Oui([self.0[0], self.0[1], self.0[2]])
    }

    /// The BSSID with its final octet stripped.
    pub const fn base_id(&self) -> BaseId {
        BaseId([self.0[0], self.0[1], self.0[2], self.0[3], self.0[4]])
    }
}

impl fmt::Display for Bssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_octets(f, &self.0)
    }
}

impl FromStr for Bssid {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let octets = parse_octets::<6>(s).ok_or_else(|| CoreError::invalid_bssid(s))?;
        Ok(Self(octets))
    }
}

impl TryFrom<String> for Bssid {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Bssid> for String {
    fn from(bssid: Bssid) -> Self {
        bssid.to_string()
    }
}

// ── Oui ─────────────────────────────────────────────────────────────

/// Organizationally unique identifier: the first three octets of a MAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oui([u8; 3]);

impl Oui {
    pub const fn from_octets(octets: [u8; 3]) -> Self {
        Self(octets)
    }
}

impl fmt::Display for Oui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_octets(f, &self.0)
    }
}

impl FromStr for Oui {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let octets = parse_octets::<3>(s).ok_or_else(|| CoreError::invalid_bssid(s))?;
        Ok(Self(octets))
    }
}

// ── BaseId ──────────────────────────────────────────────────────────

/// Physical-device grouping key: a BSSID minus its last octet.
///
/// Mesh nodes usually derive every radio's BSSID from one hardware base
/// address and only vary the final byte per band/VAP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaseId([u8; 5]);

impl BaseId {
    pub const fn oui(&self) -> Oui {
        Oui([self.0[0], self.0[1], self.0[2]])
    }

    /// Short display label built from the last three octets (`CC:11:22`).
    pub fn short_label(&self) -> String {
        let mut out = String::with_capacity(8);
        for (i, octet) in self.0[2..].iter().enumerate() {
            if i > 0 {
                out.push(':');
            }
            out.push_str(&format!("{octet:02X}"));
        }
        out
    }
}

impl fmt::Display for BaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_octets(f, &self.0)
    }
}

impl FromStr for BaseId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let octets = parse_octets::<5>(s).ok_or_else(|| CoreError::invalid_bssid(s))?;
        Ok(Self(octets))
    }
}

impl TryFrom<String> for BaseId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BaseId> for String {
    fn from(id: BaseId) -> Self {
        id.to_string()
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn write_octets(f: &mut fmt::Formatter<'_>, octets: &[u8]) -> fmt::Result {
    for (i, octet) in octets.iter().enumerate() {
        if i > 0 {
            f.write_str(":")?;
        }
        write!(f, "{octet:02X}")?;
    }
    Ok(())
}

/// Parse `N` uppercase hex octets separated by single colons.
fn parse_octets<const N: usize>(s: &str) -> Option<[u8; N]> {
    if s.len() != N * 3 - 1 {
        return None;
    }
    let mut octets = [0_u8; N];
    let mut parts = s.split(':');
    for slot in &mut octets {
        let part = parts.next()?;
        let valid = part.len() == 2
            && part
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b));
        if !valid {
            return None;
        }
        *slot = u8::from_str_radix(part, 16).ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(octets)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bssid_round_trips_canonical_form() {
        let bssid: Bssid = "AA:BB:CC:11:22:30".parse().unwrap();
        assert_eq!(bssid.to_string(), "AA:BB:CC:11:22:30");
        assert_eq!(bssid.octets(), [0xAA, 0xBB, 0xCC, 0x11, 0x22, 0x30]);
    }

    #[test]
    fn bssid_rejects_non_canonical_forms() {
        for raw in [
            "",
            "AA-BB-CC-11-22-30",
            "AABBCC112230",
            "AA:BB:CC:11:22",
            "AA:BB:CC:11:22:30:40",
            "AA:BB:CC:11:22:3",
            "AA:BB:CC:11:22:GG",
            "aa:bb:cc:11:22:30",
            "AA:BB:CC:11:22::3",
            " AA:BB:CC:11:22:30",
        ] {
            assert!(raw.parse::<Bssid>().is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn base_id_strips_last_octet() {
        let a: Bssid = "AA:BB:CC:11:22:30".parse().unwrap();
        let b: Bssid = "AA:BB:CC:11:22:31".parse().unwrap();
        assert_eq!(a.base_id(), b.base_id());
        assert_eq!(a.base_id().to_string(), "AA:BB:CC:11:22");
        assert_eq!(a.base_id().short_label(), "CC:11:22");
    }

    #[test]
    fn oui_is_first_three_octets() {
        let bssid: Bssid = "A0:21:B7:01:02:03".parse().unwrap();
        assert_eq!(bssid.oui().to_string(), "A0:21:B7");
        assert_eq!(bssid.oui(), bssid.base_id().oui());
        assert_eq!(bssid.oui(), "A0:21:B7".parse::<Oui>().unwrap());
    }

    #[test]
    fn bssid_serializes_as_string() {
        let bssid: Bssid = "AA:BB:CC:11:22:30".parse().unwrap();
        let json = serde_json::to_string(&bssid).unwrap();
        assert_eq!(json, "\"AA:BB:CC:11:22:30\"");
        let back: Bssid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bssid);
        assert!(serde_json::from_str::<Bssid>("\"not-a-mac\"").is_err());
    }
}
