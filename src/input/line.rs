//! Parsing of a single input line into CIDR blocks.
//!
//! A line is either a bare token or a CSV row. Address columns are
//! `address[/length]` for IPv4 or IPv6, every other column is ignored:
//! - the first address column with a length gives that block
//! - two address columns give an inclusive range, decomposed into blocks
//! - a lone address gives a single-address block

use crate::error::CidrError;
use crate::models::{AddressFamily, Cidr, Cidr4, Cidr6, V4, V6};
use crate::processing::decompose_addrs;
use regex::Regex;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

static IPV4_REGEX: OnceLock<Regex> = OnceLock::new();
static IPV6_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_ipv4_regex() -> &'static Regex {
    IPV4_REGEX.get_or_init(|| {
        Regex::new(r"^(?P<address>(\d{1,3}\.){3}\d{1,3})(/(?P<suffix>\d+))?$")
            .expect("Invalid Regex")
    })
}

fn get_ipv6_regex() -> &'static Regex {
    IPV6_REGEX.get_or_init(|| {
        Regex::new(
            r"^(?P<address>([0-9A-Fa-f]{0,4}:){2,7}[0-9A-Fa-f]{0,4})(/(?P<suffix>\d+))?$",
        )
        .expect("Invalid Regex")
    })
}

/// Blocks produced by one line, all of one family.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    V4(Vec<Cidr4>),
    V6(Vec<Cidr6>),
}

/// Exactly one block of either family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Block {
    V4(Cidr4),
    V6(Cidr6),
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Block::V4(c) => write!(f, "{c}"),
            Block::V6(c) => write!(f, "{c}"),
        }
    }
}

impl ParsedLine {
    pub fn len(&self) -> usize {
        match self {
            ParsedLine::V4(blocks) => blocks.len(),
            ParsedLine::V6(blocks) => blocks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One address column of a line.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    V4(Ipv4Addr, Option<u8>),
    V6(Ipv6Addr, Option<u8>),
}

impl Column {
    fn suffix(&self) -> Option<u8> {
        match self {
            Column::V4(_, suffix) | Column::V6(_, suffix) => *suffix,
        }
    }
}

fn parse_column(line: &str, column: &str) -> Result<Option<Column>, CidrError> {
    let column = column.trim();
    if let Some(caps) = get_ipv4_regex().captures(column) {
        let address: Ipv4Addr = caps["address"].parse().map_err(|_| {
            CidrError::malformed(line, format!("invalid IPv4 address {}", &caps["address"]))
        })?;
        let suffix = parse_suffix(line, caps.name("suffix").map(|m| m.as_str()))?;
        return Ok(Some(Column::V4(address, suffix)));
    }
    if let Some(caps) = get_ipv6_regex().captures(column) {
        let address: Ipv6Addr = caps["address"].parse().map_err(|_| {
            CidrError::malformed(line, format!("invalid IPv6 address {}", &caps["address"]))
        })?;
        let suffix = parse_suffix(line, caps.name("suffix").map(|m| m.as_str()))?;
        return Ok(Some(Column::V6(address, suffix)));
    }
    Ok(None)
}

fn parse_suffix(line: &str, suffix: Option<&str>) -> Result<Option<u8>, CidrError> {
    suffix
        .map(|s| {
            s.parse::<u8>()
                .map_err(|_| CidrError::malformed(line, format!("invalid length /{s}")))
        })
        .transpose()
}

fn block<F: AddressFamily>(
    line: &str,
    addr: F::Addr,
    length: u8,
) -> Result<Vec<Cidr<F>>, CidrError> {
    let cidr = Cidr::from_addr(addr, length)
        .map_err(|e| CidrError::malformed(line, e.to_string()))?;
    Ok(vec![cidr])
}

fn range<F: AddressFamily>(
    line: &str,
    start: F::Addr,
    end: F::Addr,
) -> Result<Vec<Cidr<F>>, CidrError> {
    if F::to_bits(start) > F::to_bits(end) {
        return Err(CidrError::malformed(
            line,
            format!("range start {start} is after end {end}"),
        ));
    }
    Ok(decompose_addrs::<F>(start, end))
}

fn single(line: &str, column: Column) -> Result<ParsedLine, CidrError> {
    Ok(match column {
        Column::V4(addr, Some(len)) => ParsedLine::V4(block::<V4>(line, addr, len)?),
        Column::V6(addr, Some(len)) => ParsedLine::V6(block::<V6>(line, addr, len)?),
        Column::V4(addr, None) => ParsedLine::V4(vec![Cidr::host(addr)]),
        Column::V6(addr, None) => ParsedLine::V6(vec![Cidr::host(addr)]),
    })
}

/// Parse one line into the blocks it describes.
///
/// Returns `Ok(None)` for blank lines and `#` comments.
pub fn parse_line(line: &str) -> Result<Option<ParsedLine>, CidrError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let mut first: Option<Column> = None;
    for item in trimmed.split(',') {
        let Some(column) = parse_column(trimmed, item)? else {
            continue;
        };
        let Some(start) = first else {
            if column.suffix().is_some() {
                return single(trimmed, column).map(Some);
            }
            first = Some(column);
            continue;
        };
        // look for a 2nd address
        let parsed = match (start, column) {
            (Column::V4(a, None), Column::V4(b, None)) => {
                ParsedLine::V4(range::<V4>(trimmed, a, b)?)
            }
            (Column::V6(a, None), Column::V6(b, None)) => {
                ParsedLine::V6(range::<V6>(trimmed, a, b)?)
            }
            (_, c) if c.suffix().is_some() => {
                return Err(CidrError::malformed(
                    trimmed,
                    "range end must not carry a length",
                ))
            }
            _ => {
                return Err(CidrError::malformed(
                    trimmed,
                    "range mixes IPv4 and IPv6 addresses",
                ))
            }
        };
        return Ok(Some(parsed));
    }

    match first {
        Some(column) => single(trimmed, column).map(Some),
        None => Err(CidrError::malformed(trimmed, "no IPv4 or IPv6 address found")),
    }
}

/// Parse a line that must describe exactly one block.
pub fn parse_single_block(line: &str) -> Result<Block, CidrError> {
    let parsed = parse_line(line)?
        .ok_or_else(|| CidrError::malformed(line, "no IPv4 or IPv6 address found"))?;
    let strings: Vec<String> = match &parsed {
        ParsedLine::V4(blocks) => blocks.iter().take(2).map(|b| b.to_string()).collect(),
        ParsedLine::V6(blocks) => blocks.iter().take(2).map(|b| b.to_string()).collect(),
    };
    match parsed {
        ParsedLine::V4(blocks) if blocks.len() == 1 => Ok(Block::V4(blocks[0])),
        ParsedLine::V6(blocks) if blocks.len() == 1 => Ok(Block::V6(blocks[0])),
        _ => Err(CidrError::MultipleBlocks {
            line: line.trim().to_string(),
            first: strings[0].clone(),
            second: strings[1].clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(parsed: &ParsedLine) -> Vec<String> {
        match parsed {
            ParsedLine::V4(blocks) => blocks.iter().map(|b| b.to_string()).collect(),
            ParsedLine::V6(blocks) => blocks.iter().map(|b| b.to_string()).collect(),
        }
    }

    #[test]
    fn test_ipv4_patterns() {
        let caps = get_ipv4_regex().captures("192.168.1.1").unwrap();
        assert_eq!(&caps["address"], "192.168.1.1");
        assert!(caps.name("suffix").is_none());
        let caps = get_ipv4_regex().captures("192.168.1.1/24").unwrap();
        assert_eq!(&caps["address"], "192.168.1.1");
        assert_eq!(&caps["suffix"], "24");
        assert!(get_ipv4_regex().captures("CZ").is_none());
    }

    #[test]
    fn test_ipv6_patterns() {
        for ip in [
            "::1",
            "2a03:6921:2::",
            "2a03:6947:1800::",
            "2a01:afc0:0:2::",
            "2a03:4a80:3:ffff:ffff:ffff:ffff:ffff",
            "2a03:b600:291::3fff:ffff",
        ] {
            let caps = get_ipv6_regex().captures(ip).unwrap();
            assert_eq!(&caps["address"], ip);
            match parse_single_block(&format!("{ip}/128")).unwrap() {
                Block::V6(block) => assert_eq!(block.network().to_string(), ip),
                other => panic!("expected IPv6 block, got {other}"),
            }
        }
    }

    #[test]
    fn test_parse_cidr_literal() {
        let parsed = parse_line("192.168.0.1/24").unwrap().unwrap();
        assert_eq!(strings(&parsed), vec!["192.168.0.1/24"]);
        match parsed {
            ParsedLine::V4(blocks) => {
                assert_eq!(blocks[0].normalized().to_string(), "192.168.0.0/24")
            }
            ParsedLine::V6(_) => panic!("expected IPv4"),
        }
    }

    #[test]
    fn test_parse_csv_range() {
        let line = "2.16.25.0         ,2.16.25.255                            ,CZ\n";
        assert_eq!(parse_single_block(line).unwrap().to_string(), "2.16.25.0/24");

        let line = "5.39.55.24        ,5.39.55.255                            ,CZ\n";
        let err = parse_single_block(line).unwrap_err();
        assert!(matches!(err, CidrError::MultipleBlocks { .. }));
        assert!(err.to_string().contains("5.39.55.24/29, 5.39.55.32/27"));

        let parsed = parse_line(line).unwrap().unwrap();
        assert_eq!(
            strings(&parsed),
            vec![
                "5.39.55.24/29",
                "5.39.55.32/27",
                "5.39.55.64/26",
                "5.39.55.128/25"
            ]
        );
    }

    #[test]
    fn test_parse_ipv6_range() {
        let line = "2a03:6921:2::,2a03:6921:2:ffff:ffff:ffff:ffff:ffff,CZ";
        assert_eq!(
            parse_single_block(line).unwrap().to_string(),
            "2a03:6921:2::/48"
        );
    }

    #[test]
    fn test_parse_single_address() {
        let parsed = parse_line("10.6.2.80").unwrap().unwrap();
        assert_eq!(strings(&parsed), vec!["10.6.2.80/32"]);
        let parsed = parse_line("::1, loopback").unwrap().unwrap();
        assert_eq!(strings(&parsed), vec!["::1/128"]);
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   \n").unwrap(), None);
        assert_eq!(parse_line("# 10.0.0.0/8").unwrap(), None);
    }

    #[test]
    fn test_parse_malformed() {
        for line in [
            "hello world",
            "CZ,SK",
            "300.1.1.1/24",
            "10.0.0.0/33",
            "10.0.0.0/x",
            "2a03::/129",
            "10.0.0.5,10.0.0.1",
            "10.0.0.0,2a03::",
            "10.0.0.0,10.0.0.255/24",
        ] {
            let err = parse_line(line).unwrap_err();
            assert!(
                matches!(err, CidrError::Malformed { .. }),
                "'{line}' gave {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_malformed_keeps_context() {
        let err = parse_line("10.0.0.5,10.0.0.1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed input '10.0.0.5,10.0.0.1': range start 10.0.0.5 is after end 10.0.0.1"
        );
    }
}
