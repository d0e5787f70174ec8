//! Display formatting for money and plain numbers

/// Format as pounds with thousands separators and no pence, e.g. `£55,000`
pub fn format_currency(amount: f64) -> String {
    format!("£{}", group_thousands(amount, 0))
}

/// Format as pounds and pence, e.g. `£11,851.85`
pub fn format_currency_pence(amount: f64) -> String {
    format!("£{}", group_thousands(amount, 2))
}

/// Shortest plain rendering of a number (`20` rather than `20.0`)
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

fn group_thousands(amount: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, amount.abs());
    let (whole, fraction) = match rendered.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = amount < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(0.0), "£0");
        assert_eq!(format_currency(999.4), "£999");
        assert_eq!(format_currency(40_000.0), "£40,000");
        assert_eq!(format_currency(1_234_567.8), "£1,234,568");
        assert_eq!(format_currency(-2_500.0), "£-2,500");
    }

    #[test]
    fn test_currency_pence() {
        assert_eq!(format_currency_pence(11_851.851_851), "£11,851.85");
        assert_eq!(format_currency_pence(100.0), "£100.00");
    }

    #[test]
    fn test_plain_number() {
        assert_eq!(format_number(20.0), "20");
        assert_eq!(format_number(2.5), "2.5");
    }
}
