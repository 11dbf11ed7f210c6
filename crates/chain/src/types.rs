use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use hex::{encode as hex_encode, decode as hex_decode};
use anyhow::Result;

/// Seconds in one day; the unit of the consumption budget and of the payment cadence rules.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Maximum account name length in bytes.
pub const MAX_ACCOUNT_NAME_LENGTH: usize = 16;

/// Maximum permlink length in bytes.
pub const MAX_PERMLINK_LENGTH: usize = 256;

// ════════════════════════════════════════════════════════════════════════════
// ACCOUNT NAME
// ════════════════════════════════════════════════════════════════════════════

/// Account name as it appears on chain. Empty means "no account" where a field allows it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountName(String);

impl AccountName {
    pub fn new(s: impl Into<String>) -> Self { AccountName(s.into()) }
    pub fn empty() -> Self { AccountName(String::new()) }
    pub fn as_str(&self) -> &str { &self.0 }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Non-empty and within `MAX_ACCOUNT_NAME_LENGTH`.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.len() <= MAX_ACCOUNT_NAME_LENGTH
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
impl fmt::Debug for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccountName").field(&self.0).finish()
    }
}
impl From<&str> for AccountName {
    fn from(s: &str) -> Self { AccountName(s.to_string()) }
}

/* --- serde for AccountName as plain string --- */
impl Serialize for AccountName {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where S: Serializer {
        serializer.serialize_str(&self.0)
    }
}
impl<'de> Deserialize<'de> for AccountName {
    fn deserialize<D>(deserializer: D) -> std::result::Result<AccountName, D::Error>
    where D: Deserializer<'de> {
        let s = String::deserialize(deserializer)?;
        Ok(AccountName(s))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// POST REFERENCE
// ════════════════════════════════════════════════════════════════════════════

/// Identity of a post: author account plus permlink.
///
/// Ordered by author first, then permlink, which makes every map keyed by
/// `PostRef` iterate in the same order on every node.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostRef {
    pub author: AccountName,
    pub permlink: String,
}

impl PostRef {
    pub fn new(author: impl Into<String>, permlink: impl Into<String>) -> Self {
        PostRef { author: AccountName::new(author), permlink: permlink.into() }
    }

    /// Canonical bytes used by the state root: len-prefixed author and permlink.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        let a = self.author.as_str().as_bytes();
        let p = self.permlink.as_bytes();
        out.extend_from_slice(&(a.len() as u32).to_be_bytes());
        out.extend_from_slice(a);
        out.extend_from_slice(&(p.len() as u32).to_be_bytes());
        out.extend_from_slice(p);
    }
}

impl fmt::Display for PostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}/{}", self.author, self.permlink)
    }
}
impl fmt::Debug for PostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PostRef").field(&self.to_string()).finish()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ASSET
// ════════════════════════════════════════════════════════════════════════════

/// Token denominations known to the chain. Only `Golos` is accepted for worker costs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum AssetSymbol {
    /// Primary fungible token
    Golos,
    /// Debt token
    Gbg,
    /// Vesting shares
    Gests,
}

impl AssetSymbol {
    pub fn decimals(&self) -> u32 {
        match self {
            AssetSymbol::Golos | AssetSymbol::Gbg => 3,
            AssetSymbol::Gests => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AssetSymbol::Golos => "GOLOS",
            AssetSymbol::Gbg => "GBG",
            AssetSymbol::Gests => "GESTS",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "GOLOS" => Some(AssetSymbol::Golos),
            "GBG" => Some(AssetSymbol::Gbg),
            "GESTS" => Some(AssetSymbol::Gests),
            _ => None,
        }
    }

    fn tag(&self) -> u8 {
        match self {
            AssetSymbol::Golos => 0,
            AssetSymbol::Gbg => 1,
            AssetSymbol::Gests => 2,
        }
    }
}

/// The primary token; all worker costs and the consumption budget use it.
pub const PRIMARY_SYMBOL: AssetSymbol = AssetSymbol::Golos;

/// Amount in minimal units of a symbol (1 GOLOS = 1000 units).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Asset {
    pub amount: i64,
    pub symbol: AssetSymbol,
}

impl Asset {
    pub fn new(amount: i64, symbol: AssetSymbol) -> Self { Asset { amount, symbol } }
    pub fn zero(symbol: AssetSymbol) -> Self { Asset { amount: 0, symbol } }

    /// Primary token amount in minimal units.
    pub fn golos(units: i64) -> Self { Asset { amount: units, symbol: PRIMARY_SYMBOL } }

    /// Primary token amount in whole tokens (`golos_whole(6)` == "6.000 GOLOS").
    pub fn golos_whole(tokens: i64) -> Self {
        Asset::golos(tokens * 10i64.pow(PRIMARY_SYMBOL.decimals()))
    }

    /// `None` on symbol mismatch or overflow.
    pub fn checked_add(self, rhs: Asset) -> Option<Asset> {
        if self.symbol != rhs.symbol { return None; }
        self.amount.checked_add(rhs.amount).map(|a| Asset::new(a, self.symbol))
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.amount.to_be_bytes());
        out.push(self.symbol.tag());
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = 10u64.pow(self.symbol.decimals());
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        write!(
            f,
            "{}{}.{:0width$} {}",
            sign,
            abs / precision,
            abs % precision,
            self.symbol.name(),
            width = self.symbol.decimals() as usize
        )
    }
}

impl FromStr for Asset {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, sym) = s.trim().split_once(' ')
            .ok_or_else(|| anyhow::anyhow!("asset must be '<amount> <SYMBOL>': {}", s))?;
        let symbol = AssetSymbol::from_name(sym.trim())
            .ok_or_else(|| anyhow::anyhow!("unknown asset symbol: {}", sym))?;
        let decimals = symbol.decimals() as usize;

        let (negative, digits) = match num.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, num),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty()
            || frac_part.len() > decimals
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            anyhow::bail!("invalid asset amount: {}", num);
        }
        let int_val: i64 = int_part.parse()?;
        let mut frac_val: i64 = if frac_part.is_empty() { 0 } else { frac_part.parse()? };
        for _ in frac_part.len()..decimals {
            frac_val *= 10;
        }
        let units = int_val
            .checked_mul(10i64.pow(decimals as u32))
            .and_then(|v| v.checked_add(frac_val))
            .ok_or_else(|| anyhow::anyhow!("asset amount overflow: {}", num))?;
        Ok(Asset::new(if negative { -units } else { units }, symbol))
    }
}

/* serde impls for Asset as "1.000 GOLOS" */
impl Serialize for Asset {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where S: Serializer {
        serializer.serialize_str(&self.to_string())
    }
}
impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Asset, D::Error>
    where D: Deserializer<'de> {
        let s = String::deserialize(deserializer)?;
        Asset::from_str(&s).map_err(serde::de::Error::custom)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TIME
// ════════════════════════════════════════════════════════════════════════════

/// Chain time in whole seconds since the unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct TimePointSec(pub u32);

impl TimePointSec {
    /// Sentinel meaning "never".
    pub const MAXIMUM: TimePointSec = TimePointSec(u32::MAX);

    pub fn is_never(&self) -> bool { *self == Self::MAXIMUM }
}

// ════════════════════════════════════════════════════════════════════════════
// HASH
// ════════════════════════════════════════════════════════════════════════════

/// Hash type: sha3-512 digest wrapper (64 bytes)
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash(pub [u8; 64]);

impl Hash {
    pub fn from_bytes(b: [u8;64]) -> Self { Hash(b) }
    pub fn as_bytes(&self) -> &[u8;64] { &self.0 }
    pub fn to_hex(&self) -> String { hex_encode(self.0) }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Hash").field(&self.to_hex()).finish()
    }
}

impl FromStr for Hash {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let v = hex_decode(s)?;
        if v.len() != 64 { anyhow::bail!("invalid sha3-512 length"); }
        let mut arr = [0u8;64];
        arr.copy_from_slice(&v);
        Ok(Hash(arr))
    }
}

/* serde impls for Hash as hex string */
impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where S: Serializer {
        serializer.serialize_str(&self.to_hex())
    }
}
impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Hash, D::Error>
    where D: Deserializer<'de> {
        let s = String::deserialize(deserializer)?;
        Hash::from_str(&s).map_err(serde::de::Error::custom)
    }
}
