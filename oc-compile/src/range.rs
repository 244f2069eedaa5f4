//! Mask-length range conversion.
//!
//! Prefix-set entries carry a `masklength-range` of either `exact` or
//! `start..end`. The bounds are checked against the entry's own prefix: the
//! start may not be shorter than the prefix mask and neither bound may exceed
//! the address width (32 for IPv4, 128 for IPv6).

use ipnet::IpNet;

use crate::error::CompileError;
use crate::vendor::RangeDialect;

const EXACT: &str = "exact";

/// Convert a range to the dialect's syntax.
pub fn convert_range(
    dialect: RangeDialect,
    range: &str,
    prefix: &IpNet,
) -> Result<String, CompileError> {
    match dialect {
        RangeDialect::CiscoLike => convert_range_cisco_like(range, prefix),
        RangeDialect::Junos => convert_range_junos(range, prefix),
    }
}

/// Convert a range to `ge`/`le` syntax. `exact` yields an empty string.
///
/// # Examples
///
/// ```
/// let prefix = "192.0.2.0/24".parse().unwrap();
/// let out = oc_compile::range::convert_range_cisco_like("25..28", &prefix).unwrap();
/// assert_eq!(out, "ge 25 le 28");
/// ```
pub fn convert_range_cisco_like(range: &str, prefix: &IpNet) -> Result<String, CompileError> {
    if range == EXACT {
        return Ok(String::new());
    }
    let (start, end) = parse_bounds(range, prefix)?;
    let max = prefix.max_prefix_len();

    Ok(if start == max {
        format!("ge {max}")
    } else if start == prefix.prefix_len() {
        format!("le {end}")
    } else {
        format!("ge {start} le {end}")
    })
}

/// Convert a range to `prefix-length-range /start-/end` syntax.
pub fn convert_range_junos(range: &str, prefix: &IpNet) -> Result<String, CompileError> {
    if range == EXACT {
        return Ok(EXACT.to_string());
    }
    let (start, end) = parse_bounds(range, prefix)?;
    Ok(format!("prefix-length-range /{start}-/{end}"))
}

/// Parse and bound-check `start..end`.
pub fn parse_bounds(range: &str, prefix: &IpNet) -> Result<(u8, u8), CompileError> {
    let invalid = |reason: String| CompileError::RangeValidation {
        range: range.to_string(),
        prefix: prefix.to_string(),
        reason,
    };

    let (start, end) = range
        .split_once("..")
        .ok_or_else(|| invalid("expected 'exact' or 'start..end'".to_string()))?;
    let start: i64 = start
        .trim()
        .parse()
        .map_err(|_| invalid(format!("start '{start}' is not an integer")))?;
    let end: i64 = end
        .trim()
        .parse()
        .map_err(|_| invalid(format!("end '{end}' is not an integer")))?;

    let max = i64::from(prefix.max_prefix_len());
    let mask = i64::from(prefix.prefix_len());
    if start < 0 {
        return Err(invalid("start is negative".to_string()));
    }
    if start > max || end > max {
        return Err(invalid(format!("bounds exceed /{max}")));
    }
    if start > end {
        return Err(invalid("start is greater than end".to_string()));
    }
    if start < mask {
        return Err(invalid(format!("start is shorter than the prefix mask /{mask}")));
    }

    // Both values are within 0..=128 at this point.
    Ok((start as u8, end as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(text: &str) -> IpNet {
        text.parse().expect("prefix")
    }

    /// Recover (start, end) from `ge`/`le` output.
    fn reparse_cisco(text: &str, prefix: &IpNet) -> (u8, u8) {
        let words: Vec<&str> = text.split_whitespace().collect();
        let max = prefix.max_prefix_len();
        match words.as_slice() {
            ["ge", s] => (s.parse().expect("ge"), max),
            ["le", e] => (prefix.prefix_len(), e.parse().expect("le")),
            ["ge", s, "le", e] => (s.parse().expect("ge"), e.parse().expect("le")),
            other => panic!("unexpected range output {other:?}"),
        }
    }

    #[test]
    fn cisco_like_examples() {
        let prefix = net("192.0.2.0/24");
        assert_eq!(
            convert_range_cisco_like("25..28", &prefix).expect("range"),
            "ge 25 le 28"
        );
        assert_eq!(
            convert_range_cisco_like("32..32", &prefix).expect("range"),
            "ge 32"
        );
        assert_eq!(
            convert_range_cisco_like("24..30", &prefix).expect("range"),
            "le 30"
        );
        assert_eq!(convert_range_cisco_like("exact", &prefix).expect("range"), "");
    }

    #[test]
    fn ipv6_uses_128_bit_bounds() {
        let prefix = net("2001:db8::/32");
        assert_eq!(
            convert_range_cisco_like("128..128", &prefix).expect("range"),
            "ge 128"
        );
        assert_eq!(
            convert_range_junos("48..64", &prefix).expect("range"),
            "prefix-length-range /48-/64"
        );
        assert!(convert_range_cisco_like("64..129", &prefix).is_err());
    }

    #[test]
    fn junos_exact_is_kept() {
        let prefix = net("10.0.0.0/8");
        assert_eq!(convert_range_junos("exact", &prefix).expect("range"), "exact");
        assert_eq!(
            convert_range(RangeDialect::Junos, "8..16", &prefix).expect("range"),
            "prefix-length-range /8-/16"
        );
    }

    #[test]
    fn rejects_invalid_ranges() {
        let prefix = net("192.0.2.0/24");
        for bad in ["16..24", "28..25", "-1..24", "25..33", "33..33", "abc", "25..x", ""] {
            let err = convert_range_cisco_like(bad, &prefix).expect_err(bad);
            assert!(matches!(err, CompileError::RangeValidation { .. }), "{bad}");
        }
    }

    #[test]
    fn cisco_output_reparses_to_same_bounds() {
        let prefix = net("192.0.2.0/24");
        for (start, end) in [(24u8, 24u8), (24, 32), (25, 28), (26, 32), (32, 32)] {
            let text = convert_range_cisco_like(&format!("{start}..{end}"), &prefix)
                .expect("valid range");
            assert_eq!(reparse_cisco(&text, &prefix), (start, end), "{text}");
        }
    }
}
