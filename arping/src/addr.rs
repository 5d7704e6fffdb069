use crate::error::{Error, Result};
use std::net::{IpAddr, Ipv4Addr};

/// Accepts IPv4 addresses, including IPv4-mapped IPv6 ones (`::ffff:10.0.0.1`).
pub fn validate_ip(ip: impl Into<IpAddr>) -> Result<Ipv4Addr> {
    match ip.into() {
        IpAddr::V4(v4) => Ok(v4),
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .ok_or_else(|| Error::InvalidAddress(v6.to_string())),
    }
}

/// Parses user input into an IPv4 address, with the same rules as [`validate_ip`].
pub fn parse_ipv4(input: &str) -> Result<Ipv4Addr> {
    let ip: IpAddr = input
        .trim()
        .parse()
        .map_err(|_| Error::InvalidAddress(input.to_string()))?;
    validate_ip(ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    #[test]
    fn v4_passes() {
        assert_eq!(
            validate_ip(Ipv4Addr::new(192, 168, 0, 1)).unwrap(),
            Ipv4Addr::new(192, 168, 0, 1)
        );
    }

    #[test]
    fn v6_rejected() {
        let err = validate_ip(Ipv6Addr::LOCALHOST).unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(ref s) if s == "::1"));
        assert_eq!(err.to_string(), "not a valid v4 address: ::1");
    }

    #[test]
    fn v4_mapped_v6_passes() {
        let mapped = Ipv4Addr::new(10, 0, 0, 7).to_ipv6_mapped();
        assert_eq!(validate_ip(mapped).unwrap(), Ipv4Addr::new(10, 0, 0, 7));
    }

    #[test]
    fn parse() {
        assert_eq!(parse_ipv4("10.1.2.3").unwrap(), Ipv4Addr::new(10, 1, 2, 3));
        assert_eq!(parse_ipv4(" 10.1.2.3\n").unwrap(), Ipv4Addr::new(10, 1, 2, 3));
        assert!(matches!(parse_ipv4("10.1.2"), Err(Error::InvalidAddress(_))));
        assert!(matches!(parse_ipv4("fe80::1"), Err(Error::InvalidAddress(_))));
        assert!(matches!(parse_ipv4("host.local"), Err(Error::InvalidAddress(_))));
    }
}
