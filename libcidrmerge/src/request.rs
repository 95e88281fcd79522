use std::fmt;
use std::io;
use std::net::{AddrParseError, IpAddr};
use std::num::ParseIntError;
use std::str::FromStr;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::derange::ip_range_to_subnets;
use crate::error::Error;
use crate::family::Family;
use crate::masks::MaskTable;
use crate::subnet::Subnet;
use crate::uint128::Uint128;


static WITH_MASK_REGEX: Lazy<Regex> = Lazy::new(||
    Regex::new("^(?P<addr>[^/]+)/(?P<mask>[^/]+)$").expect("mask regex is valid")
);
static RANGE_REGEX: Lazy<Regex> = Lazy::new(||
    Regex::new("^(?P<begin>[^-]+)-(?P<end>[^-]+)$").expect("range regex is valid")
);
static CIDR_PREFIX_REGEX: Lazy<Regex> = Lazy::new(||
    Regex::new("^[0-9]+$").expect("CIDR prefix regex is valid")
);


/// A single line of input: an address, a network or a range of addresses.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Request {
    Address(IpAddr),
    Cidr { addr: IpAddr, cidr_prefix: usize },
    Range { begin: IpAddr, end: IpAddr },
}

impl Request {
    /// Converts the request into the networks it covers.
    ///
    /// An address becomes a single network of the maximum prefix length, a CIDR literal becomes the
    /// network containing its address and a range is split into the equivalent networks.
    pub fn to_subnets(&self, masks: &MaskTable) -> crate::Result<Vec<Subnet>> {
        match *self {
            Request::Address(addr) => Ok(vec![Subnet::single(addr)]),
            Request::Cidr { addr, cidr_prefix } => Ok(vec![Subnet::from_ip(addr, cidr_prefix, masks)?]),
            Request::Range { begin, end } => ip_range_to_subnets(begin, end, masks),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Address(addr) => write!(f, "{}", addr),
            Request::Cidr { addr, cidr_prefix } => write!(f, "{}/{}", addr, cidr_prefix),
            Request::Range { begin, end } => write!(f, "{}-{}", begin, end),
        }
    }
}

impl FromStr for Request {
    type Err = ParseRequestError;

    /// Parses a request leniently, using the shared mask table.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_request(s, false, MaskTable::shared())
    }
}


/// An error that occurs when attempting to parse a request.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseRequestError {
    /// The format of the request was not recognized. The contained string is the request text.
    #[error("unrecognized network specification: {0:?}")]
    Unrecognized(String),

    /// An IP address could not be parsed. The contained string is the offending literal.
    #[error("failed to parse address {0:?}: {1}")]
    Address(String, #[source] AddrParseError),

    /// The CIDR prefix could not be parsed.
    #[error("failed to parse CIDR prefix {0:?}: {1}")]
    CidrParse(String, #[source] ParseIntError),

    /// The parsed CIDR prefix is out of range. The first value is the CIDR prefix that was parsed
    /// and the second value is the maximum CIDR prefix for the given IP address type.
    #[error("CIDR prefix {0} is greater than the maximum ({1})")]
    CidrRange(usize, usize),

    /// The subnet mask is of the wrong address family or its one-bits are not contiguous.
    #[error("invalid subnet mask {0:?}")]
    Mask(String),

    /// The address of a CIDR literal has host bits set and strict parsing was requested.
    #[error("{literal:?} is not a network address; did you mean {expected}?")]
    NotNetworkAddress { literal: String, expected: Subnet },

    /// The ends of a range belong to different address families.
    #[error("range {0}-{1} mixes IPv4 and IPv6")]
    MixedFamilies(IpAddr, IpAddr),

    /// The beginning of a range lies after its end.
    #[error("range {0}-{1} is inverted: the beginning lies after the end")]
    InvertedRange(IpAddr, IpAddr),

    /// The request could not be converted into networks.
    #[error(transparent)]
    Conversion(#[from] Error),
}


fn parse_addr(literal: &str) -> Result<IpAddr, ParseRequestError> {
    let literal = literal.trim();
    literal.parse()
        .map_err(|e| ParseRequestError::Address(literal.to_owned(), e))
}

/// Parses an address that stands on its own (a single address or the end of a range). IPv4-mapped
/// IPv6 addresses (`::ffff:a.b.c.d`) are taken as IPv4.
fn parse_standalone_addr(literal: &str) -> Result<IpAddr, ParseRequestError> {
    Ok(parse_addr(literal)?.to_canonical())
}

fn parse_mask(mask_str: &str, family: Family, masks: &MaskTable) -> Result<usize, ParseRequestError> {
    let mask_str = mask_str.trim();
    if CIDR_PREFIX_REGEX.is_match(mask_str) {
        let cidr_prefix: usize = mask_str.parse()
            .map_err(|e| ParseRequestError::CidrParse(mask_str.to_owned(), e))?;
        if cidr_prefix > family.width() {
            return Err(ParseRequestError::CidrRange(cidr_prefix, family.width()));
        }
        return Ok(cidr_prefix);
    }

    if mask_str.contains('.') || mask_str.contains(':') {
        // subnet mask notation
        let mask_addr = parse_addr(mask_str)?;
        if Family::of(&mask_addr) != family {
            return Err(ParseRequestError::Mask(mask_str.to_owned()));
        }
        return masks.prefix_of(Uint128::from(mask_addr), family)
            .ok_or_else(|| ParseRequestError::Mask(mask_str.to_owned()));
    }

    // produce the integer parse error
    match mask_str.parse::<usize>() {
        Ok(_) => Err(ParseRequestError::Unrecognized(mask_str.to_owned())),
        Err(e) => Err(ParseRequestError::CidrParse(mask_str.to_owned(), e)),
    }
}

/// Attempts to parse a single request.
///
/// `a/p` (or `a/m` with a subnet mask `m`) is a CIDR literal, `b-e` is an inclusive range of
/// addresses and anything else must be a single address. Surrounding whitespace is ignored. If
/// `strict` is set, the address of a CIDR literal must be the network address.
///
/// IPv4-mapped IPv6 addresses count as IPv4 when they appear as a single address or as the end of
/// a range; a CIDR literal keeps the family it is written in.
pub fn parse_request(text: &str, strict: bool, masks: &MaskTable) -> Result<Request, ParseRequestError> {
    let text = text.trim();

    if let Some(caps) = WITH_MASK_REGEX.captures(text) {
        let addr_str = caps.name("addr").expect("'addr' captured").as_str();
        let mask_str = caps.name("mask").expect("'mask' captured").as_str();

        let addr = parse_addr(addr_str)?;
        let cidr_prefix = parse_mask(mask_str, Family::of(&addr), masks)?;

        if strict {
            let net = Subnet::from_ip(addr, cidr_prefix, masks)?;
            if net.network_addr() != addr {
                return Err(ParseRequestError::NotNetworkAddress {
                    literal: text.to_owned(),
                    expected: net,
                });
            }
        }
        Ok(Request::Cidr { addr, cidr_prefix })
    } else if let Some(caps) = RANGE_REGEX.captures(text) {
        let begin = parse_standalone_addr(caps.name("begin").expect("'begin' captured").as_str())?;
        let end = parse_standalone_addr(caps.name("end").expect("'end' captured").as_str())?;

        if Family::of(&begin) != Family::of(&end) {
            return Err(ParseRequestError::MixedFamilies(begin, end));
        }
        if Uint128::from(begin) > Uint128::from(end) {
            return Err(ParseRequestError::InvertedRange(begin, end));
        }
        Ok(Request::Range { begin, end })
    } else if text.contains('/') || text.contains('-') {
        Err(ParseRequestError::Unrecognized(text.to_owned()))
    } else {
        Ok(Request::Address(parse_standalone_addr(text)?))
    }
}


/// Options controlling [`scan_requests`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ScanOptions {
    /// Reject CIDR literals whose address is not the network address.
    pub strict: bool,

    /// Log and skip lines that cannot be parsed instead of failing.
    pub skip_invalid: bool,
}

/// An error that occurs while scanning requests line by line.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    /// A line could not be parsed or converted. The line number is 1-based.
    #[error("line {line_number}: {source}")]
    Line {
        line_number: usize,
        #[source] source: ParseRequestError,
    },
}

/// Parses each line of input as a request and collects the networks the requests cover.
///
/// Blank lines and lines starting with `#` are skipped. The networks are returned in input order;
/// pass them to [`crate::merge::merge_all`] to merge them.
pub fn scan_requests<I, S>(lines: I, options: &ScanOptions, masks: &MaskTable) -> Result<Vec<Subnet>, ScanError>
where
    I: IntoIterator<Item = io::Result<S>>,
    S: AsRef<str>,
{
    let mut ret = Vec::new();
    for (index, line_res) in lines.into_iter().enumerate() {
        let line_number = index + 1;
        let line = line_res?;
        let text = line.as_ref().trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let subnets_res = parse_request(text, options.strict, masks)
            .and_then(|req| Ok(req.to_subnets(masks)?));
        match subnets_res {
            Ok(subnets) => ret.extend(subnets),
            Err(e) if options.skip_invalid => {
                warn!("skipping line {}: {}", line_number, e);
            },
            Err(e) => return Err(ScanError::Line { line_number, source: e }),
        }
    }
    Ok(ret)
}
