//! Built-in pattern catalog.
//!
//! Named, immutable regex patterns for artifacts commonly searched for in
//! forensic images. Catalog names can be used anywhere a filter pattern is
//! accepted. Patterns are stored as source text and compiled by the filter
//! with the same options as user-supplied patterns (case-insensitive,
//! free-spacing). Free-spacing mode strips unescaped whitespace everywhere,
//! character classes included, so literal spaces are written `\x20`.

use lazy_static::lazy_static;

/// One catalog entry: a stable name, a short description and the pattern text
#[derive(Debug, Clone, Copy)]
pub struct CatalogPattern {
    pub name: &'static str,
    pub description: &'static str,
    pub pattern: &'static str,
}

lazy_static! {
    static ref CATALOG: Vec<CatalogPattern> = vec![
        CatalogPattern {
            name: "aeon",
            description: "Finds Aeon wallet addresses",
            pattern: r"Wm[st]{1}[0-9a-zA-Z]{94}",
        },
        CatalogPattern {
            name: "b64",
            description: "Finds valid formatted base 64 strings",
            pattern: r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=|[A-Za-z0-9+/]{4})$",
        },
        CatalogPattern {
            name: "bitcoin",
            description: "Finds BitCoin wallet addresses",
            pattern: r"\b[13][a-km-zA-HJ-NP-Z1-9]{25,34}\b",
        },
        CatalogPattern {
            name: "bitlocker",
            description: "Finds Bitlocker recovery keys",
            pattern: r"[0-9]{6}?-[0-9]{6}-[0-9]{6}-[0-9]{6}-[0-9]{6}-[0-9]{6}-[0-9]{6}-[0-9]{6}",
        },
        CatalogPattern {
            name: "bytecoin",
            description: "Finds ByteCoin wallet addresses",
            pattern: r"2[0-9AB][0-9a-zA-Z]{93}",
        },
        CatalogPattern {
            name: "cc",
            description: "Finds credit card numbers",
            pattern: r"^[\x20-]*(?:4[\x20-]*(?:\d[\x20-]*){11}(?:(?:\d[\x20-]*){3})?\d|5[\x20-]*[1-5](?:[\x20-]*[0-9]){14}|6[\x20-]*(?:0[\x20-]*1[\x20-]*1|5[\x20-]*\d[\x20-]*\d)(?:[\x20-]*[0-9]){12}|3[\x20-]*[47](?:[\x20-]*[0-9]){13}|3[\x20-]*(?:0[\x20-]*[0-5]|[68][\x20-]*[0-9])(?:[\x20-]*[0-9]){11}|(?:2[\x20-]*1[\x20-]*3[\x20-]*1|1[\x20-]*8[\x20-]*0[\x20-]*0|3[\x20-]*5(?:[\x20-]*[0-9]){3})(?:[\x20-]*[0-9]){11})[\x20-]*$",
        },
        CatalogPattern {
            name: "dashcoin",
            description: "Finds DashCoin wallet addresses (D*)",
            pattern: r"D[0-9a-zA-Z]{94}",
        },
        CatalogPattern {
            name: "dashcoin2",
            description: "Finds DashCoin wallet addresses (7|X)*",
            pattern: r"(7|X)[a-zA-Z0-9]{33}",
        },
        CatalogPattern {
            name: "email",
            description: "Finds embedded email addresses",
            pattern: r"\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,6}\b",
        },
        CatalogPattern {
            name: "fantomcoin",
            description: "Finds Fantomcoin wallet addresses",
            pattern: r"6[0-9a-zA-Z]{94}",
        },
        CatalogPattern {
            name: "guid",
            description: "Finds GUIDs",
            pattern: r"\b[A-F0-9]{8}(?:-[A-F0-9]{4}){3}-[A-F0-9]{12}\b",
        },
        CatalogPattern {
            name: "ipv4",
            description: "Finds IP version 4 addresses",
            pattern: r"\b(?:(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\b",
        },
        CatalogPattern {
            name: "ipv6",
            // Word boundaries instead of lookarounds, which the regex
            // engine does not support
            description: "Finds IP version 6 addresses",
            pattern: r"\b(?:[A-F0-9]{1,4}:){7}[A-F0-9]{1,4}\b",
        },
        CatalogPattern {
            name: "mac",
            // No backreference tying the two separators together
            description: "Finds MAC addresses",
            pattern: r"\b[0-9A-F]{2}(?:[-:]?[0-9A-F]{2}){5}\b",
        },
        CatalogPattern {
            name: "monero",
            description: "Finds Monero wallet addresses",
            pattern: r"4[0-9AB][0-9a-zA-Z]{93}|4[0-9AB][0-9a-zA-Z]{104}",
        },
        CatalogPattern {
            name: "reg_path",
            description: "Finds paths related to Registry hives",
            pattern: r"([a-z0-9]\\)*(software\\)|(sam\\)|(system\\)|(security\\)[a-z0-9\\]+",
        },
        CatalogPattern {
            name: "sid",
            description: "Finds Microsoft Security Identifiers (SID)",
            pattern: r"^S-\d-\d+-(\d+-){1,14}\d+$",
        },
        CatalogPattern {
            name: "ssn",
            // The invalid-prefix exclusions (000, 666) need lookaheads,
            // so this form accepts them
            description: "Finds US Social Security Numbers",
            pattern: r"\b[0-8][0-9]{2}[-\x20][0-9]{2}[-\x20][0-9]{4}\b",
        },
        CatalogPattern {
            name: "sumokoin",
            description: "Finds SumoKoin wallet addresses",
            pattern: r"Sumoo[0-9a-zA-Z]{94}",
        },
        CatalogPattern {
            name: "unc",
            description: "Finds UNC paths",
            pattern: r"^\\\\(?P<server>[a-z0-9\x20%._-]+)\\(?P<share>[a-z0-9\x20$%._-]+)",
        },
        CatalogPattern {
            name: "url3986",
            description: "Finds URLs according to RFC 3986",
            pattern: r"^
		[a-z][a-z0-9+\-.]*://                       # Scheme
		([a-z0-9\-._~%!$&'()*+,;=]+@)?              # User
		(?P<host>[a-z0-9\-._~%]+                    # Named host
		|\[[a-f0-9:.]+\]                            # IPv6 host
		|\[v[a-f0-9][a-z0-9\-._~%!$&'()*+,;=:]+\])  # IPvFuture host
		(:[0-9]+)?                                  # Port
		(/[a-z0-9\-._~%!$&'()*+,;=:@]+)*/?          # Path
		(\?[a-z0-9\-._~%!$&'()*+,;=:@/?]*)?         # Query
		(\#[a-z0-9\-._~%!$&'()*+,;=:@/?]*)?         # Fragment
		$",
        },
        CatalogPattern {
            name: "urlUser",
            description: "Finds usernames in URLs",
            pattern: r"^[a-z0-9+\-.]+://(?P<user>[a-z0-9\-._~%!$&'()*+,;=]+)@",
        },
        CatalogPattern {
            name: "usPhone",
            description: "Finds US phone numbers",
            pattern: r"\(?\b[2-9][0-9]{2}\)?[-.\x20]?[2-9][0-9]{2}[-.\x20]?[0-9]{4}\b",
        },
        CatalogPattern {
            name: "var_set",
            description: "Finds environment variables being set (OS=Windows_NT)",
            pattern: r"^[a-z_0-9]+=[\\/:\*\?<>|;\-\x20_a-z0-9]+",
        },
        CatalogPattern {
            name: "win_path",
            description: r"Finds Windows style paths (C:\folder1\folder2\file.txt)",
            pattern: r#"(?:"?[a-zA-Z]\:|\\\\[^\\/\:\*\?<>\|]+\\[^\\/\:\*\?<>\|]*)\\(?:[^\\/\:\*\?<>\|]+\\)*\w([^\\/\:\*\?<>\|])*"#,
        },
        CatalogPattern {
            name: "xml",
            // The closing tag is not tied to the opener; backreferences
            // are unavailable
            description: "Finds XML/HTML tags",
            pattern: r"\A<([A-Z][A-Z0-9]*)\b[^>]*>(.*?)</[A-Z][A-Z0-9]*>\z",
        },
        CatalogPattern {
            name: "zip",
            description: "Finds zip codes",
            pattern: r"\A\b[0-9]{5}(?:-[0-9]{4})?\b\z",
        },
    ];
}

/// All catalog entries, sorted by name
pub fn all() -> &'static [CatalogPattern] {
    &CATALOG
}

/// Look up a catalog entry by its exact name
pub fn lookup(name: &str) -> Option<&'static CatalogPattern> {
    CATALOG.iter().find(|p| p.name == name)
}
