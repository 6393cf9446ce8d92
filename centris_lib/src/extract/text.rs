//! Text normalization shared by the extractors.
//!
//! Page text mixes English and French conventions: prices like "549 000 $"
//! with non-breaking spaces as thousands separators, decimal commas, and
//! accented place names. Everything here is tolerant of both.

/// Collapses all whitespace runs (including NBSP and narrow NBSP) to single
/// spaces and trims the ends.
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses a localized money string into whole dollars.
///
/// Handles "549 000 $", "$349,000", "349 000,50 $" and plain digits. A
/// trailing decimal part is dropped. Returns `None` when no digits are
/// present, so values are never negative.
pub fn parse_money(raw: &str) -> Option<i64> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$')
        .collect();
    let start = compact.find(|c: char| c.is_ascii_digit())?;
    let lead: String = compact[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    // A separator followed by one or two trailing digits is a decimal
    // mark; everything else is a thousands mark.
    let main = match lead.rfind(|c| c == ',' || c == '.') {
        Some(idx) if lead.len() - idx - 1 <= 2 => &lead[..idx],
        _ => lead.as_str(),
    };

    let digits: String = main.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parses the first run of digits in the string.
pub fn parse_count(raw: &str) -> Option<u32> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let digits: String = raw[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Replaces French accented characters with their bare ASCII equivalents.
pub fn fold_accents(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' | 'á' => 'a',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'î' | 'ï' | 'í' => 'i',
            'ô' | 'ö' | 'ó' => 'o',
            'ù' | 'û' | 'ü' | 'ú' => 'u',
            'ç' => 'c',
            'À' | 'Â' | 'Ä' | 'Á' => 'A',
            'È' | 'É' | 'Ê' | 'Ë' => 'E',
            'Î' | 'Ï' | 'Í' => 'I',
            'Ô' | 'Ö' | 'Ó' => 'O',
            'Ù' | 'Û' | 'Ü' | 'Ú' => 'U',
            'Ç' => 'C',
            _ => c,
        })
        .collect()
}

/// Lowercases, folds accents, and collapses whitespace. "MONTRÉAL" and
/// "montreal" normalize to the same string.
pub fn normalize_for_match(raw: &str) -> String {
    clean_text(&fold_accents(&raw.to_lowercase()))
}
