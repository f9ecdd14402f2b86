//! Set membership rules and ISO code lists.

use serde_json::Value;

use crate::context::RuleContext;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleOutcome, Verdict};

use super::{describe_given, scalar_to_string};

pub(super) fn register(registry: &mut RuleRegistry) {
    registry.register_rule(Rule::new("in", is_in));
    registry.register_rule(Rule::new("notIn", not_in));
    registry.register_rule(Rule::new("alpha2Country", |ctx| {
        Ok(code_in(ctx, "Must be a valid alpha-2 country code", ALPHA2_COUNTRIES))
    }));
    registry.register_rule(Rule::new("alpha3Currency", |ctx| {
        Ok(code_in(ctx, "Must be a valid alpha-3 currency code", ALPHA3_CURRENCIES))
    }));
}

fn is_in(ctx: &RuleContext<'_>) -> RuleOutcome {
    let set = ctx.params();
    let ok = ctx
        .value()
        .and_then(scalar_to_string)
        .is_some_and(|actual| set.contains(&actual));

    Ok(Verdict::check(ok, || {
        format!("Value must be in set: [{}]{}", set.join(", "), describe_given(ctx.value()))
    }))
}

/// Null, arrays and objects have no scalar form and always fail.
fn not_in(ctx: &RuleContext<'_>) -> RuleOutcome {
    let set = ctx.params();
    let ok = ctx
        .value()
        .and_then(scalar_to_string)
        .is_some_and(|actual| !set.contains(&actual));

    Ok(Verdict::check(ok, || {
        format!("Value must not be in set: [{}]{}", set.join(", "), describe_given(ctx.value()))
    }))
}

fn code_in(ctx: &RuleContext<'_>, message: &str, codes: &[&str]) -> Verdict {
    let ok = match ctx.value() {
        Some(Value::String(code)) => codes.binary_search(&code.as_str()).is_ok(),
        _ => false,
    };
    Verdict::check(ok, || format!("{}{}", message, describe_given(ctx.value())))
}

/// ISO 3166-1 alpha-2, sorted.
const ALPHA2_COUNTRIES: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX", "AZ",
    "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS",
    "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE",
    "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF",
    "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM",
    "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC",
    "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA",
    "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG",
    "PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS",
    "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO",
    "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// ISO 4217 active codes, sorted.
const ALPHA3_CURRENCIES: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT", "BGN",
    "BHD", "BIF", "BMD", "BND", "BOB", "BOV", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD", "CAD", "CDF",
    "CHE", "CHF", "CHW", "CLF", "CLP", "CNY", "COP", "COU", "CRC", "CUP", "CVE", "CZK", "DJF", "DKK",
    "DOP", "DZD", "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP", "GEL", "GHS", "GIP", "GMD", "GNF",
    "GTQ", "GYD", "HKD", "HNL", "HTG", "HUF", "IDR", "ILS", "INR", "IQD", "IRR", "ISK", "JMD", "JOD",
    "JPY", "KES", "KGS", "KHR", "KMF", "KPW", "KRW", "KWD", "KYD", "KZT", "LAK", "LBP", "LKR", "LRD",
    "LSL", "LYD", "MAD", "MDL", "MGA", "MKD", "MMK", "MNT", "MOP", "MRU", "MUR", "MVR", "MWK", "MXN",
    "MXV", "MYR", "MZN", "NAD", "NGN", "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP",
    "PKR", "PLN", "PYG", "QAR", "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD",
    "SHP", "SLE", "SOS", "SRD", "SSP", "STN", "SVC", "SYP", "SZL", "THB", "TJS", "TMT", "TND", "TOP",
    "TRY", "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "USN", "UYI", "UYU", "UYW", "UZS", "VED", "VES",
    "VND", "VUV", "WST", "XAF", "XAG", "XAU", "XCD", "XDR", "XOF", "XPD", "XPF", "XPT", "XSU", "XUA",
    "YER", "ZAR", "ZMW", "ZWG",
];

#[cfg(test)]
mod tests {
    use super::super::testing::{assert_fails, assert_passes, run};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_code_lists_are_sorted() {
        assert!(ALPHA2_COUNTRIES.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(ALPHA3_CURRENCIES.windows(2).all(|pair| pair[0] < pair[1]));
    }

    record!(Choice { "Data" => "in:a,12,12.45,true" });
    record!(Exclusion { "Data" => "notIn:a,12" });

    #[test]
    fn test_in_compares_scalar_forms() {
        for data in [json!("a"), json!(12), json!(12.45), json!(true)] {
            assert_passes::<Choice>(json!({"Data": data}));
        }
        for data in [json!("b"), json!(13), json!(false), json!(null), json!([]), json!({})] {
            assert_fails::<Choice>(json!({"Data": data}), "Data", "in");
        }

        let bag = run::<Choice>(json!({"Data": null})).unwrap();
        assert_eq!(
            bag.errors_for("Data"),
            ["[in]: Value must be in set: [a, 12, 12.45, true] - [NULL] given".to_string()]
        );
        let bag = run::<Choice>(json!({"Data": {}})).unwrap();
        assert_eq!(
            bag.errors_for("Data"),
            ["[in]: Value must be in set: [a, 12, 12.45, true] - Object given".to_string()]
        );
    }

    #[test]
    fn test_not_in() {
        assert_passes::<Exclusion>(json!({"Data": "b"}));
        assert_passes::<Exclusion>(json!({"Data": 13}));
        for data in [json!("a"), json!(12), json!(null), json!([]), json!({})] {
            assert_fails::<Exclusion>(json!({"Data": data}), "Data", "notIn");
        }

        let bag = run::<Exclusion>(json!({"Data": 12})).unwrap();
        assert_eq!(
            bag.errors_for("Data"),
            ["[notIn]: Value must not be in set: [a, 12] - [12] given".to_string()]
        );
    }

    record!(Country { "Data" => "alpha2Country" });
    record!(Currency { "Data" => "alpha3Currency" });

    #[test]
    fn test_alpha2_country() {
        for code in ["DK", "SE", "NO"] {
            assert_passes::<Country>(json!({"Data": code}));
        }
        for data in [json!("DKK"), json!("dk"), json!(""), json!(null), json!(true), json!({}), json!([]), json!(123)] {
            assert_fails::<Country>(json!({"Data": data}), "Data", "alpha2Country");
        }
    }

    #[test]
    fn test_alpha3_currency() {
        for code in ["DKK", "SEK", "NOK"] {
            assert_passes::<Currency>(json!({"Data": code}));
        }
        for data in [json!("DK"), json!("DKKK"), json!(""), json!(null), json!(true), json!({}), json!([]), json!(123)] {
            assert_fails::<Currency>(json!({"Data": data}), "Data", "alpha3Currency");
        }

        let bag = run::<Currency>(json!({"Data": "XYZ"})).unwrap();
        assert_eq!(
            bag.errors_for("Data"),
            ["[alpha3Currency]: Must be a valid alpha-3 currency code - [XYZ] given".to_string()]
        );
    }
}
