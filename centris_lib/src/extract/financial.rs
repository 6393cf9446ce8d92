//! Financial figures from the characteristics table.

use crate::listing::Financials;

use super::detail::find_characteristic;
use super::text;

const MUNICIPAL_TAX_KEYS: &[&str] = &["municipal tax", "taxes municipales"];
const SCHOOL_TAX_KEYS: &[&str] = &["school tax", "taxes scolaires"];
const ASSESSMENT_KEYS: &[&str] = &["municipal assessment", "evaluation municipale"];
const REVENUE_KEYS: &[&str] = &["gross revenue", "revenus bruts"];

/// Assembles the financial block from the page's price element and its
/// characteristics table. Figures that are absent or unparseable stay
/// `None`.
pub(crate) fn extract_financials(
    price_text: Option<&str>,
    characteristics: &[(String, String)],
) -> Financials {
    let money = |keys| {
        find_characteristic(characteristics, keys)
            .as_deref()
            .and_then(text::parse_money)
    };
    Financials {
        price: price_text.and_then(text::parse_money),
        municipal_tax: money(MUNICIPAL_TAX_KEYS),
        school_tax: money(SCHOOL_TAX_KEYS),
        assessment: money(ASSESSMENT_KEYS),
        gross_revenue: money(REVENUE_KEYS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caracs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(title, value)| (title.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn figures_from_bilingual_titles() {
        let table = caracs(&[
            ("Municipal tax", "4 326 $"),
            ("Taxes scolaires (2024)", "512 $"),
            ("Évaluation municipale", "487 000 $"),
            ("Potential gross revenue", "40 920 $"),
        ]);
        let financials = extract_financials(Some("549 000 $"), &table);
        assert_eq!(financials.price, Some(549_000));
        assert_eq!(financials.municipal_tax, Some(4_326));
        assert_eq!(financials.school_tax, Some(512));
        assert_eq!(financials.assessment, Some(487_000));
        assert_eq!(financials.gross_revenue, Some(40_920));
    }

    #[test]
    fn missing_figures_stay_none() {
        let table = caracs(&[("Municipal tax", "4 326 $")]);
        let financials = extract_financials(None, &table);
        assert_eq!(financials.price, None);
        assert_eq!(financials.municipal_tax, Some(4_326));
        assert_eq!(financials.school_tax, None);
        assert_eq!(financials.assessment, None);
        assert_eq!(financials.gross_revenue, None);
    }

    #[test]
    fn unparseable_value_stays_none() {
        let table = caracs(&[("Municipal tax", "included")]);
        let financials = extract_financials(None, &table);
        assert_eq!(financials.municipal_tax, None);
    }
}
