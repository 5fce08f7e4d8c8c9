//! Injected reference data: ticker universe, curated company-name→ticker
//! dictionary, exclusion lists, asset-type codes, and the known-bad-record
//! override table.
//!
//! Loaded once at startup and passed by shared reference into the parse
//! pass; nothing here mutates after loading. Callers may extend the curated
//! defaults from CSV (`name,ticker` rows for companies, one symbol per row
//! for the ticker universe).

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::amount::AmountBracket;
use crate::error::ReferenceError;

/// One curated company entry: display name as it should appear in a
/// repaired record, plus its ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyEntry {
    pub name: String,
    pub ticker: String,
}

/// Field fixes for one individually verified bad record. Only the fields the
/// curation actually corrects are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownBadFix {
    pub ticker: Option<String>,
    pub asset_description: Option<String>,
    pub transaction_type: Option<String>,
    pub amount: Option<String>,
}

/// Key + fixes for one historical parsing failure. These are manual
/// curation, not general rules; every hit is logged distinctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownBadOverride {
    pub doc_id: String,
    pub ticker_was: String,
    pub fix: KnownBadFix,
}

/// Read-only reference data shared across a parse pass.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    tickers: HashSet<String>,
    companies: Vec<CompanyEntry>,
    company_index: HashMap<String, usize>,
    exclusions: HashSet<&'static str>,
    asset_types: HashMap<&'static str, &'static str>,
    known_bad: Vec<KnownBadOverride>,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::curated()
    }
}

impl ReferenceData {
    /// Built-in curated data: the company dictionary below, a ticker
    /// universe seeded from it, the non-ticker exclusion list, asset-type
    /// codes, and the default known-bad overrides.
    pub fn curated() -> Self {
        let companies: Vec<CompanyEntry> = COMPANY_TICKERS
            .iter()
            .map(|(name, ticker)| CompanyEntry {
                name: (*name).to_string(),
                ticker: (*ticker).to_string(),
            })
            .collect();

        let mut company_index = HashMap::with_capacity(companies.len());
        for (i, entry) in companies.iter().enumerate() {
            company_index.insert(normalize_company_name(&entry.name), i);
        }

        let tickers = companies.iter().map(|e| e.ticker.clone()).collect();

        Self {
            tickers,
            companies,
            company_index,
            exclusions: NON_TICKER_WORDS.iter().copied().collect(),
            asset_types: ASSET_TYPE_CODES.iter().copied().collect(),
            known_bad: default_known_bad(),
        }
    }

    /// True if `symbol` is in the ticker universe.
    pub fn is_known_ticker(&self, symbol: &str) -> bool {
        self.tickers.contains(symbol.trim().to_ascii_uppercase().as_str())
    }

    /// True if `token` is on the non-ticker exclusion list (company
    /// suffixes, month/day names, generic finance nouns).
    pub fn is_excluded_token(&self, token: &str) -> bool {
        self.exclusions
            .contains(token.trim().to_ascii_uppercase().as_str())
    }

    /// Exact lookup by normalized company name.
    pub fn company_by_name(&self, raw_name: &str) -> Option<&CompanyEntry> {
        self.company_index
            .get(&normalize_company_name(raw_name))
            .map(|&i| &self.companies[i])
    }

    /// Partial lookup: the normalized raw name is a token-prefix of a
    /// dictionary name or vice versa. Prefers the longest dictionary name
    /// so "goldman sachs group" beats a shorter accidental prefix.
    pub fn company_by_partial_name(&self, raw_name: &str) -> Option<&CompanyEntry> {
        let needle = normalize_company_name(raw_name);
        if needle.is_empty() {
            return None;
        }
        self.companies
            .iter()
            .filter(|entry| {
                let name = normalize_company_name(&entry.name);
                token_prefix(&needle, &name) || token_prefix(&name, &needle)
            })
            .max_by_key(|entry| entry.name.len())
    }

    /// Companies whose first normalized word matches `word` (used by the
    /// ticker/company cross-reference correction).
    pub fn company_by_first_word(&self, word: &str) -> Option<&CompanyEntry> {
        let word = word.to_lowercase();
        if word.len() < 4 {
            // One-to-three-letter first words ("the", "new") cross-match
            // far too many names.
            return None;
        }
        self.companies.iter().find(|entry| {
            normalize_company_name(&entry.name)
                .split_whitespace()
                .next()
                .is_some_and(|first| first == word)
        })
    }

    /// Iterate curated entries (used by fuzzy matching).
    pub fn companies(&self) -> impl Iterator<Item = &CompanyEntry> {
        self.companies.iter()
    }

    /// Display name for a two/three-letter asset-type code, if known.
    pub fn asset_type_name(&self, code: &str) -> Option<&'static str> {
        self.asset_types
            .get(code.trim().to_ascii_uppercase().as_str())
            .copied()
    }

    /// Matching manual override for `(doc_id, ticker)`, if curated.
    pub fn known_bad_for(&self, doc_id: &str, ticker: &str) -> Option<&KnownBadOverride> {
        self.known_bad.iter().find(|o| {
            o.doc_id == doc_id && o.ticker_was.eq_ignore_ascii_case(ticker.trim())
        })
    }

    /// The range substituted for the literal `Spouse/DC` amount placeholder.
    pub fn placeholder_bracket(&self) -> AmountBracket {
        AmountBracket::Range1Kto15K
    }

    /// Add one company entry (curation hook for callers).
    pub fn add_company(&mut self, name: impl Into<String>, ticker: impl Into<String>) {
        let entry = CompanyEntry {
            name: name.into(),
            ticker: ticker.into().to_ascii_uppercase(),
        };
        let key = normalize_company_name(&entry.name);
        self.tickers.insert(entry.ticker.clone());
        self.companies.push(entry);
        self.company_index.insert(key, self.companies.len() - 1);
    }

    /// Add one known-bad override (curation hook for callers).
    pub fn add_known_bad(&mut self, entry: KnownBadOverride) {
        self.known_bad.push(entry);
    }

    /// Extend the ticker universe from CSV: one symbol per row, first
    /// column; a leading `ticker`/`symbol` header row is skipped.
    pub fn extend_tickers_from_csv(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let file = std::fs::File::open(path.as_ref())
            .with_context(|| format!("opening {}", path.as_ref().display()))?;
        let added = self
            .extend_tickers_from_reader(file)
            .with_context(|| format!("reading {}", path.as_ref().display()))?;
        info!(added, path = %path.as_ref().display(), "extended ticker universe");
        Ok(added)
    }

    /// Reader-based ticker loader, returning how many symbols were added.
    pub fn extend_tickers_from_reader<R: Read>(
        &mut self,
        reader: R,
    ) -> std::result::Result<usize, ReferenceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_reader(reader);

        let mut added = 0;
        for (row, result) in rdr.records().enumerate() {
            let record = result?;
            let raw = record.get(0).unwrap_or("").trim();
            if raw.is_empty() {
                continue;
            }
            if row == 0 && matches!(raw.to_ascii_lowercase().as_str(), "ticker" | "symbol") {
                continue;
            }
            let symbol = raw.to_ascii_uppercase();
            if !symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') {
                return Err(ReferenceError::bad_row(
                    row + 1,
                    format!("not a ticker symbol: {raw:?}"),
                ));
            }
            if self.tickers.insert(symbol) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Extend the company dictionary from CSV `name,ticker` rows; a leading
    /// `name,ticker` header row is skipped.
    pub fn extend_companies_from_csv(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let file = std::fs::File::open(path.as_ref())
            .with_context(|| format!("opening {}", path.as_ref().display()))?;
        let added = self
            .extend_companies_from_reader(file)
            .with_context(|| format!("reading {}", path.as_ref().display()))?;
        info!(added, path = %path.as_ref().display(), "extended company dictionary");
        Ok(added)
    }

    /// Reader-based company loader, returning how many entries were added.
    pub fn extend_companies_from_reader<R: Read>(
        &mut self,
        reader: R,
    ) -> std::result::Result<usize, ReferenceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_reader(reader);

        let mut added = 0;
        for (row, result) in rdr.records().enumerate() {
            let record = result?;
            let name = record.get(0).unwrap_or("").trim();
            let ticker = record.get(1).unwrap_or("").trim();
            if name.is_empty() && ticker.is_empty() {
                continue;
            }
            if row == 0 && name.eq_ignore_ascii_case("name") {
                continue;
            }
            if name.is_empty() || ticker.is_empty() {
                return Err(ReferenceError::bad_row(
                    row + 1,
                    "company rows need both name and ticker",
                ));
            }
            self.add_company(name, ticker);
            added += 1;
        }
        Ok(added)
    }
}

/// Lowercase, strip punctuation, drop a leading "the" and trailing corporate
/// suffix tokens. The result is the dictionary lookup key.
pub fn normalize_company_name(raw: &str) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    let lowered = raw.to_lowercase();
    for tok in lowered.split(|c: char| !c.is_alphanumeric()) {
        if !tok.is_empty() {
            tokens.push(tok);
        }
    }
    if tokens.first() == Some(&"the") {
        tokens.remove(0);
    }
    while tokens.len() > 1 {
        match tokens.last() {
            Some(last) if COMPANY_SUFFIXES.contains(last) => {
                tokens.pop();
            }
            _ => break,
        }
    }
    tokens.join(" ")
}

fn token_prefix(shorter: &str, longer: &str) -> bool {
    if shorter.is_empty() {
        return false;
    }
    let s: Vec<&str> = shorter.split_whitespace().collect();
    let l: Vec<&str> = longer.split_whitespace().collect();
    s.len() <= l.len() && s.iter().zip(l.iter()).all(|(a, b)| a == b)
}

const COMPANY_SUFFIXES: &[&str] = &[
    "inc", "incorporated", "corp", "corporation", "company", "companies", "co", "plc", "ltd",
    "limited", "lp", "llc", "sa", "nv", "se", "ag", "group", "holdings", "international",
];

/// Tokens that look like tickers but never are. Uppercase.
const NON_TICKER_WORDS: &[&str] = &[
    // corporate suffixes
    "INC", "CORP", "CO", "LLC", "LP", "LTD", "PLC", "SA", "NV", "AG", "HLDG",
    // months and weekdays (date fragments leak into the ticker column)
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    "MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN",
    // generic finance nouns
    "ETF", "FUND", "TRUST", "BOND", "BONDS", "NOTE", "NOTES", "CASH", "STOCK", "SHARE",
    "CLASS", "IRA", "DIV", "CALL", "CALLS", "PUT", "PUTS", "BUY", "SELL", "SALE", "NYSE",
    "USD", "REIT", "MUNI", "CD", "GROUP", "NEW", "THE", "AND", "FOR", "VIA", "PER",
    // checkbox glyph runs the text extractor leaves behind
    "GFEDC", "GFEDCB", "FEDC",
];

/// Asset-type codes printed in brackets when an entry has no ticker.
const ASSET_TYPE_CODES: &[(&str, &str)] = &[
    ("ST", "Stock"),
    ("OP", "Options"),
    ("OT", "Other Securities"),
    ("MF", "Mutual Fund"),
    ("EF", "Exchange-Traded Fund"),
    ("ETF", "Exchange-Traded Fund"),
    ("GS", "Government Securities"),
    ("CS", "Corporate Bond"),
    ("BND", "Bond"),
    ("PS", "Preferred Stock"),
    ("RE", "Real Estate"),
    ("CT", "Cryptocurrency"),
    ("SA", "Stock Appreciation Right"),
];

/// Individually verified historical failures: `(doc_id, ticker_was)` keys
/// with the curated fixes. Kept deliberately small; a growing table here
/// means the general correction rules have a gap.
fn default_known_bad() -> Vec<KnownBadOverride> {
    vec![
        KnownBadOverride {
            doc_id: "20016962".to_string(),
            ticker_was: "BRK/B".to_string(),
            fix: KnownBadFix {
                ticker: Some("BRK.B".to_string()),
                asset_description: Some("Berkshire Hathaway Inc. - Class B".to_string()),
                ..KnownBadFix::default()
            },
        },
        KnownBadOverride {
            doc_id: "20019637".to_string(),
            ticker_was: "FB".to_string(),
            fix: KnownBadFix {
                ticker: Some("META".to_string()),
                asset_description: Some("Meta Platforms, Inc. - Class A".to_string()),
                ..KnownBadFix::default()
            },
        },
        KnownBadOverride {
            doc_id: "20013406".to_string(),
            ticker_was: "AAPL".to_string(),
            fix: KnownBadFix {
                amount: Some("$1,001 - $15,000".to_string()),
                ..KnownBadFix::default()
            },
        },
    ]
}

/// Curated company-name→ticker dictionary: issuers that appear repeatedly
/// in filings plus the broad-market ETFs. Display names are replacement
/// candidates, so they carry real punctuation.
const COMPANY_TICKERS: &[(&str, &str)] = &[
    // mega-cap tech
    ("Apple Inc.", "AAPL"),
    ("Microsoft Corporation", "MSFT"),
    ("Amazon.com, Inc.", "AMZN"),
    ("Alphabet Inc.", "GOOGL"),
    ("Meta Platforms, Inc.", "META"),
    ("Tesla, Inc.", "TSLA"),
    ("NVIDIA Corporation", "NVDA"),
    ("Netflix, Inc.", "NFLX"),
    ("Intel Corporation", "INTC"),
    ("Advanced Micro Devices, Inc.", "AMD"),
    ("Micron Technology, Inc.", "MU"),
    ("QUALCOMM Incorporated", "QCOM"),
    ("Broadcom Inc.", "AVGO"),
    ("Texas Instruments Incorporated", "TXN"),
    ("Applied Materials, Inc.", "AMAT"),
    ("Lam Research Corporation", "LRCX"),
    ("Analog Devices, Inc.", "ADI"),
    ("Cisco Systems, Inc.", "CSCO"),
    ("Oracle Corporation", "ORCL"),
    ("Salesforce, Inc.", "CRM"),
    ("Adobe Inc.", "ADBE"),
    ("International Business Machines Corporation", "IBM"),
    ("Accenture plc", "ACN"),
    ("ServiceNow, Inc.", "NOW"),
    ("Intuit Inc.", "INTU"),
    ("PayPal Holdings, Inc.", "PYPL"),
    ("Block, Inc.", "SQ"),
    ("Shopify Inc.", "SHOP"),
    ("Palantir Technologies Inc.", "PLTR"),
    ("Snowflake Inc.", "SNOW"),
    ("Zoom Video Communications, Inc.", "ZM"),
    ("Uber Technologies, Inc.", "UBER"),
    ("Lyft, Inc.", "LYFT"),
    ("Airbnb, Inc.", "ABNB"),
    ("DoorDash, Inc.", "DASH"),
    ("Snap Inc.", "SNAP"),
    ("Pinterest, Inc.", "PINS"),
    ("Spotify Technology S.A.", "SPOT"),
    ("Roblox Corporation", "RBLX"),
    ("Electronic Arts Inc.", "EA"),
    ("Take-Two Interactive Software, Inc.", "TTWO"),
    ("Dell Technologies Inc.", "DELL"),
    ("HP Inc.", "HPQ"),
    ("Motorola Solutions, Inc.", "MSI"),
    ("Corning Incorporated", "GLW"),
    // financials
    ("Berkshire Hathaway Inc.", "BRK.B"),
    ("JPMorgan Chase & Co.", "JPM"),
    ("Bank of America Corporation", "BAC"),
    ("Wells Fargo & Company", "WFC"),
    ("Citigroup Inc.", "C"),
    ("The Goldman Sachs Group, Inc.", "GS"),
    ("Morgan Stanley", "MS"),
    ("The Charles Schwab Corporation", "SCHW"),
    ("BlackRock, Inc.", "BLK"),
    ("Blackstone Inc.", "BX"),
    ("KKR & Co. Inc.", "KKR"),
    ("American Express Company", "AXP"),
    ("Visa Inc.", "V"),
    ("Mastercard Incorporated", "MA"),
    ("Discover Financial Services", "DFS"),
    ("Capital One Financial Corporation", "COF"),
    ("U.S. Bancorp", "USB"),
    ("The PNC Financial Services Group, Inc.", "PNC"),
    ("Truist Financial Corporation", "TFC"),
    ("Coinbase Global, Inc.", "COIN"),
    ("Robinhood Markets, Inc.", "HOOD"),
    ("MetLife, Inc.", "MET"),
    ("Prudential Financial, Inc.", "PRU"),
    ("Aflac Incorporated", "AFL"),
    ("Chubb Limited", "CB"),
    ("The Progressive Corporation", "PGR"),
    ("The Allstate Corporation", "ALL"),
    // healthcare
    ("Johnson & Johnson", "JNJ"),
    ("Pfizer Inc.", "PFE"),
    ("Moderna, Inc.", "MRNA"),
    ("Merck & Co., Inc.", "MRK"),
    ("AbbVie Inc.", "ABBV"),
    ("Bristol-Myers Squibb Company", "BMY"),
    ("Eli Lilly and Company", "LLY"),
    ("Amgen Inc.", "AMGN"),
    ("Gilead Sciences, Inc.", "GILD"),
    ("Regeneron Pharmaceuticals, Inc.", "REGN"),
    ("Vertex Pharmaceuticals Incorporated", "VRTX"),
    ("UnitedHealth Group Incorporated", "UNH"),
    ("CVS Health Corporation", "CVS"),
    ("The Cigna Group", "CI"),
    ("Humana Inc.", "HUM"),
    ("HCA Healthcare, Inc.", "HCA"),
    ("Abbott Laboratories", "ABT"),
    ("Thermo Fisher Scientific Inc.", "TMO"),
    ("Danaher Corporation", "DHR"),
    ("Medtronic plc", "MDT"),
    ("Stryker Corporation", "SYK"),
    ("Intuitive Surgical, Inc.", "ISRG"),
    ("Zoetis Inc.", "ZTS"),
    // consumer
    ("Walmart Inc.", "WMT"),
    ("Target Corporation", "TGT"),
    ("Costco Wholesale Corporation", "COST"),
    ("The Home Depot, Inc.", "HD"),
    ("Lowe's Companies, Inc.", "LOW"),
    ("NIKE, Inc.", "NKE"),
    ("Lululemon Athletica Inc.", "LULU"),
    ("Starbucks Corporation", "SBUX"),
    ("McDonald's Corporation", "MCD"),
    ("Chipotle Mexican Grill, Inc.", "CMG"),
    ("The Coca-Cola Company", "KO"),
    ("PepsiCo, Inc.", "PEP"),
    ("Mondelez International, Inc.", "MDLZ"),
    ("The Procter & Gamble Company", "PG"),
    ("Colgate-Palmolive Company", "CL"),
    ("Kimberly-Clark Corporation", "KMB"),
    ("The Estee Lauder Companies Inc.", "EL"),
    ("General Mills, Inc.", "GIS"),
    ("The Kraft Heinz Company", "KHC"),
    ("Tyson Foods, Inc.", "TSN"),
    ("Constellation Brands, Inc.", "STZ"),
    ("Altria Group, Inc.", "MO"),
    ("Philip Morris International Inc.", "PM"),
    ("The Walt Disney Company", "DIS"),
    ("Comcast Corporation", "CMCSA"),
    ("Warner Bros. Discovery, Inc.", "WBD"),
    ("Paramount Global", "PARA"),
    ("Booking Holdings Inc.", "BKNG"),
    ("Marriott International, Inc.", "MAR"),
    ("Hilton Worldwide Holdings Inc.", "HLT"),
    ("Las Vegas Sands Corp.", "LVS"),
    ("MGM Resorts International", "MGM"),
    ("DraftKings Inc.", "DKNG"),
    ("Royal Caribbean Cruises Ltd.", "RCL"),
    ("Carnival Corporation", "CCL"),
    ("Delta Air Lines, Inc.", "DAL"),
    ("United Airlines Holdings, Inc.", "UAL"),
    ("American Airlines Group Inc.", "AAL"),
    ("Southwest Airlines Co.", "LUV"),
    // industrials and energy
    ("The Boeing Company", "BA"),
    ("Lockheed Martin Corporation", "LMT"),
    ("RTX Corporation", "RTX"),
    ("Northrop Grumman Corporation", "NOC"),
    ("General Dynamics Corporation", "GD"),
    ("L3Harris Technologies, Inc.", "LHX"),
    ("Honeywell International Inc.", "HON"),
    ("General Electric Company", "GE"),
    ("3M Company", "MMM"),
    ("Caterpillar Inc.", "CAT"),
    ("Deere & Company", "DE"),
    ("Emerson Electric Co.", "EMR"),
    ("Eaton Corporation plc", "ETN"),
    ("Illinois Tool Works Inc.", "ITW"),
    ("Union Pacific Corporation", "UNP"),
    ("CSX Corporation", "CSX"),
    ("Norfolk Southern Corporation", "NSC"),
    ("FedEx Corporation", "FDX"),
    ("United Parcel Service, Inc.", "UPS"),
    ("Ford Motor Company", "F"),
    ("General Motors Company", "GM"),
    ("Rivian Automotive, Inc.", "RIVN"),
    ("Exxon Mobil Corporation", "XOM"),
    ("Chevron Corporation", "CVX"),
    ("ConocoPhillips", "COP"),
    ("Occidental Petroleum Corporation", "OXY"),
    ("Devon Energy Corporation", "DVN"),
    ("EOG Resources, Inc.", "EOG"),
    ("Phillips 66", "PSX"),
    ("Valero Energy Corporation", "VLO"),
    ("Marathon Petroleum Corporation", "MPC"),
    ("Kinder Morgan, Inc.", "KMI"),
    ("The Williams Companies, Inc.", "WMB"),
    ("Halliburton Company", "HAL"),
    ("Schlumberger Limited", "SLB"),
    ("Baker Hughes Company", "BKR"),
    ("NextEra Energy, Inc.", "NEE"),
    ("Duke Energy Corporation", "DUK"),
    ("The Southern Company", "SO"),
    ("Dominion Energy, Inc.", "D"),
    ("American Electric Power Company, Inc.", "AEP"),
    ("Sempra", "SRE"),
    // telecom and materials
    ("Verizon Communications Inc.", "VZ"),
    ("AT&T Inc.", "T"),
    ("T-Mobile US, Inc.", "TMUS"),
    ("Linde plc", "LIN"),
    ("Dow Inc.", "DOW"),
    ("DuPont de Nemours, Inc.", "DD"),
    ("Freeport-McMoRan Inc.", "FCX"),
    ("Newmont Corporation", "NEM"),
    ("Nucor Corporation", "NUE"),
    ("Alcoa Corporation", "AA"),
    // broad-market ETFs
    ("SPDR S&P 500 ETF Trust", "SPY"),
    ("Invesco QQQ Trust", "QQQ"),
    ("Vanguard Total Stock Market ETF", "VTI"),
    ("Vanguard S&P 500 ETF", "VOO"),
    ("iShares Core S&P 500 ETF", "IVV"),
    ("SPDR Dow Jones Industrial Average ETF Trust", "DIA"),
    ("iShares Russell 2000 ETF", "IWM"),
    ("iShares MSCI Emerging Markets ETF", "EEM"),
    ("iShares MSCI EAFE ETF", "EFA"),
    ("SPDR Gold Shares", "GLD"),
    ("iShares Silver Trust", "SLV"),
    ("United States Oil Fund", "USO"),
    ("iShares 20+ Year Treasury Bond ETF", "TLT"),
    ("iShares iBoxx High Yield Corporate Bond ETF", "HYG"),
    ("iShares iBoxx Investment Grade Corporate Bond ETF", "LQD"),
    ("Financial Select Sector SPDR Fund", "XLF"),
    ("Energy Select Sector SPDR Fund", "XLE"),
    ("Technology Select Sector SPDR Fund", "XLK"),
    ("Health Care Select Sector SPDR Fund", "XLV"),
    ("ARK Innovation ETF", "ARKK"),
    ("Schwab U.S. Dividend Equity ETF", "SCHD"),
    ("Vanguard Dividend Appreciation ETF", "VIG"),
    ("Vanguard High Dividend Yield ETF", "VYM"),
    ("Vanguard Total Bond Market ETF", "BND"),
    ("iShares Core U.S. Aggregate Bond ETF", "AGG"),
    ("Vanguard Total International Stock ETF", "VXUS"),
    ("Vanguard FTSE Developed Markets ETF", "VEA"),
    ("Vanguard FTSE Emerging Markets ETF", "VWO"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curated_dictionary_size() {
        let data = ReferenceData::curated();
        assert!(data.companies().count() >= 150);
    }

    #[test]
    fn test_normalize_company_name() {
        assert_eq!(normalize_company_name("Apple Inc."), "apple");
        assert_eq!(normalize_company_name("The Walt Disney Company"), "walt disney");
        assert_eq!(
            normalize_company_name("The Goldman Sachs Group, Inc."),
            "goldman sachs"
        );
        assert_eq!(normalize_company_name("Lowe's Companies, Inc."), "lowe s");
    }

    #[test]
    fn test_company_lookup_exact_and_partial() {
        let data = ReferenceData::curated();
        assert_eq!(data.company_by_name("APPLE INC").unwrap().ticker, "AAPL");
        assert_eq!(
            data.company_by_partial_name("Goldman Sachs").unwrap().ticker,
            "GS"
        );
        assert!(data.company_by_name("Definitely Not A Company").is_none());
    }

    #[test]
    fn test_company_by_first_word_needs_length() {
        let data = ReferenceData::curated();
        assert_eq!(data.company_by_first_word("chipotle").unwrap().ticker, "CMG");
        // Short connective words never cross-reference.
        assert!(data.company_by_first_word("the").is_none());
    }

    #[test]
    fn test_exclusion_and_universe() {
        let data = ReferenceData::curated();
        assert!(data.is_excluded_token("INC"));
        assert!(data.is_excluded_token("jan"));
        assert!(data.is_known_ticker("aapl"));
        assert!(!data.is_known_ticker("ZZZZZ"));
    }

    #[test]
    fn test_asset_type_codes() {
        let data = ReferenceData::curated();
        assert_eq!(data.asset_type_name("st"), Some("Stock"));
        assert_eq!(data.asset_type_name("ETF"), Some("Exchange-Traded Fund"));
        assert_eq!(data.asset_type_name("ZZ"), None);
    }

    #[test]
    fn test_extend_companies_from_reader() {
        let mut data = ReferenceData::curated();
        let csv = "name,ticker\nExample Robotics Inc.,EXR\n";
        let added = data.extend_companies_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(added, 1);
        assert_eq!(data.company_by_name("Example Robotics").unwrap().ticker, "EXR");
        assert!(data.is_known_ticker("EXR"));
    }

    #[test]
    fn test_extend_companies_rejects_half_rows() {
        let mut data = ReferenceData::curated();
        let err = data
            .extend_companies_from_reader("OnlyAName,\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, ReferenceError::BadRow { .. }));
    }

    #[test]
    fn test_extend_tickers_from_reader() {
        let mut data = ReferenceData::curated();
        let added = data
            .extend_tickers_from_reader("symbol\nZZZT\nBRK.A\n".as_bytes())
            .unwrap();
        assert_eq!(added, 2);
        assert!(data.is_known_ticker("ZZZT"));
        assert!(data.is_known_ticker("brk.a"));
    }

    #[test]
    fn test_known_bad_lookup() {
        let data = ReferenceData::curated();
        let hit = data.known_bad_for("20016962", "BRK/B").unwrap();
        assert_eq!(hit.fix.ticker.as_deref(), Some("BRK.B"));
        assert!(data.known_bad_for("20016962", "AAPL").is_none());
    }
}
