//! Best-effort syntactic checks for named string formats
//!
//! Format validation is advisory: a recognized name is checked against a
//! dedicated pattern (or algorithm, for `credit-card`), an unrecognized name
//! passes unconditionally. None of the checks claim full RFC coverage.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

// RFC 3339 shape: YYYY-MM-DDThh:mm:ss[.frac](Z|±hh:mm)
static DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+\-]\d{2}:\d{2})$")
        .expect("valid regex")
});

static DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

static TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+\-]\d{2}:\d{2})?$").expect("valid regex")
});

// RFC 1123 labels; the 253-octet total cap is checked separately
static HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid regex")
});

static IPV4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((25[0-5]|2[0-4]\d|[01]?\d?\d)\.){3}(25[0-5]|2[0-4]\d|[01]?\d?\d)$")
        .expect("valid regex")
});

// Simplified: the full 8-group form plus the common '::' compressed forms.
// Not exhaustive per RFC 4291 (no embedded IPv4, no zone indices).
static IPV6: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)^(
            ([0-9A-Fa-f]{1,4}:){7}[0-9A-Fa-f]{1,4}
          | ([0-9A-Fa-f]{1,4}:){1,7}:
          | :(:[0-9A-Fa-f]{1,4}){1,7}
          | ([0-9A-Fa-f]{1,4}:){1,6}(:[0-9A-Fa-f]{1,4}){1,6}
          | ::
        )$",
    )
    .expect("valid regex")
});

// scheme://authority[/path]; loose on purpose
static URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+\-.]*:/{1,2}[^\s/]+(/\S*)?$").expect("valid regex")
});

// 8-4-4-4-12 hex
static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$",
    )
    .expect("valid regex")
});

// Very permissive: digits plus the usual separators
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+\-()0-9\s]+$").expect("valid regex"));

static CREDIT_CARD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{13,19}$").expect("valid regex"));

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));

/// Check a string against a named format.
///
/// Returns `Err` with a short reason when a recognized format does not match;
/// unknown format names always pass.
pub fn check_format(value: &str, format: &str) -> Result<(), String> {
    match format {
        "email" => check(&EMAIL, value, "not a valid email address"),
        "date-time" => check(&DATE_TIME, value, "not a valid RFC 3339 date-time"),
        "date" => check(&DATE, value, "not a valid date (YYYY-MM-DD)"),
        "time" => check(&TIME, value, "not a valid time"),
        "hostname" => {
            if value.len() > 253 {
                return Err("hostname exceeds 253 characters".to_string());
            }
            check(&HOSTNAME, value, "not a valid hostname")
        }
        "ipv4" => check(&IPV4, value, "not a valid IPv4 address"),
        "ipv6" => check(&IPV6, value, "not a valid IPv6 address"),
        "uri" => check(&URI, value, "not a valid URI"),
        "uuid" => check(&UUID, value, "not a valid UUID"),
        "phone" => check(&PHONE, value, "not a valid phone number"),
        "credit-card" => {
            if !CREDIT_CARD.is_match(value) {
                return Err("credit card number must be 13-19 digits".to_string());
            }
            if !luhn_check(value) {
                return Err("credit card number fails the Luhn checksum".to_string());
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn check(re: &Regex, value: &str, reason: &str) -> Result<(), String> {
    if re.is_match(value) {
        Ok(())
    } else {
        Err(reason.to_string())
    }
}

/// Luhn checksum over a card-like digit string.
///
/// Spaces and hyphens are stripped first; every second digit from the right is
/// doubled, digits above 9 are reduced by 9, and the total must be a multiple
/// of 10.
pub(crate) fn luhn_check(input: &str) -> bool {
    let digits: String = input.chars().filter(|c| *c != ' ' && *c != '-').collect();
    if !DIGITS.is_match(&digits) {
        return false;
    }
    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let mut sum = 0u32;
    let mut double = false;
    for c in digits.chars().rev() {
        let mut n = c.to_digit(10).unwrap_or(0);
        if double {
            n *= 2;
            if n > 9 {
                n -= 9;
            }
        }
        sum += n;
        double = !double;
    }
    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Email / URI / UUID Tests ====================

    #[test]
    fn test_email_format() {
        assert!(check_format("user@example.com", "email").is_ok());
        assert!(check_format("first.last+tag@sub.example.org", "email").is_ok());
        assert!(check_format("not-an-email", "email").is_err());
        assert!(check_format("user@nodot", "email").is_err());
    }

    #[test]
    fn test_uri_format() {
        assert!(check_format("https://example.com/path", "uri").is_ok());
        assert!(check_format("ftp://files.example.com", "uri").is_ok());
        assert!(check_format("just words", "uri").is_err());
    }

    #[test]
    fn test_uuid_format() {
        assert!(check_format("123e4567-e89b-12d3-a456-426614174000", "uuid").is_ok());
        assert!(check_format("123e4567-e89b-12d3-a456-42661417400", "uuid").is_err());
        assert!(check_format("123e4567e89b12d3a456426614174000", "uuid").is_err());
    }

    // ==================== Date / Time Tests ====================

    #[test]
    fn test_date_time_format() {
        assert!(check_format("2024-03-01T12:30:45Z", "date-time").is_ok());
        assert!(check_format("2024-03-01T12:30:45.250+02:00", "date-time").is_ok());
        assert!(check_format("2024-03-01 12:30:45", "date-time").is_err());
        assert!(check_format("2024-03-01T12:30:45", "date-time").is_err());
    }

    #[test]
    fn test_date_and_time_formats() {
        assert!(check_format("2024-03-01", "date").is_ok());
        assert!(check_format("2024-3-1", "date").is_err());
        assert!(check_format("12:30", "time").is_ok());
        assert!(check_format("12:30:45.5Z", "time").is_ok());
        assert!(check_format("noon", "time").is_err());
    }

    // ==================== Network Formats ====================

    #[test]
    fn test_hostname_format() {
        assert!(check_format("example.com", "hostname").is_ok());
        assert!(check_format("a-1.b-2.c", "hostname").is_ok());
        assert!(check_format("-leading.example.com", "hostname").is_err());
        let long = "a".repeat(254);
        assert!(check_format(&long, "hostname").is_err());
    }

    #[test]
    fn test_ipv4_format() {
        assert!(check_format("192.168.0.1", "ipv4").is_ok());
        assert!(check_format("255.255.255.255", "ipv4").is_ok());
        assert!(check_format("256.0.0.1", "ipv4").is_err());
        assert!(check_format("1.2.3", "ipv4").is_err());
    }

    #[test]
    fn test_ipv6_format() {
        assert!(check_format("2001:0db8:85a3:0000:0000:8a2e:0370:7334", "ipv6").is_ok());
        assert!(check_format("2001:db8::1", "ipv6").is_ok());
        assert!(check_format("::1", "ipv6").is_ok());
        assert!(check_format("::", "ipv6").is_ok());
        assert!(check_format("not:an:address:zz", "ipv6").is_err());
    }

    // ==================== Phone / Credit Card Tests ====================

    #[test]
    fn test_phone_format() {
        assert!(check_format("+33 (0)1 23 45 67 89", "phone").is_ok());
        assert!(check_format("phone me", "phone").is_err());
    }

    #[test]
    fn test_credit_card_luhn() {
        // A classic test number that satisfies Luhn
        assert!(check_format("4111111111111111", "credit-card").is_ok());
        // Same digits, last one bumped: checksum breaks
        assert!(check_format("4111111111111112", "credit-card").is_err());
        // Too short to be a card number
        assert!(check_format("411111", "credit-card").is_err());
    }

    #[test]
    fn test_luhn_strips_separators() {
        assert!(luhn_check("4111 1111 1111 1111"));
        assert!(luhn_check("4111-1111-1111-1111"));
        assert!(!luhn_check("4111 1111 1111 111x"));
    }

    #[test]
    fn test_unknown_format_passes() {
        assert!(check_format("anything at all", "no-such-format").is_ok());
    }
}
