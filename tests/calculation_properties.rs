// ============================================================================
// Calculation Properties
// Algebraic and determinism properties of the engine, checked with proptest
// ============================================================================

use calculation_engine::engine::calculations::*;
use calculation_engine::prelude::*;
use proptest::prelude::*;

/// Money-like decimals: up to 16 significant digits, of which up to 6
/// are fractional.
fn amount() -> impl Strategy<Value = DecimalValue> {
    (-9_999_999_999_999_999i64..=9_999_999_999_999_999i64, 0u32..=6)
        .prop_map(|(unscaled, scale)| DecimalValue::from_parts(unscaled as i128, scale).unwrap())
}

/// Revenue of at least one whole unit, so ratios stay well inside the bound.
fn revenue() -> impl Strategy<Value = DecimalValue> {
    (1i64..=1_000_000_000, 0u32..=2, any::<bool>()).prop_map(|(whole, scale, negative)| {
        let unscaled = whole as i128 * 10i128.pow(scale);
        let unscaled = if negative { -unscaled } else { unscaled };
        DecimalValue::from_parts(unscaled, scale).unwrap()
    })
}

fn rounding_rule() -> impl Strategy<Value = RoundingRule> {
    (
        0u32..=8,
        prop_oneof![
            Just(RoundingMode::HalfUp),
            Just(RoundingMode::HalfEven),
            Just(RoundingMode::Down),
            Just(RoundingMode::Up),
        ],
    )
        .prop_map(|(places, mode)| RoundingRule::new(places, mode))
}

proptest! {
    #[test]
    fn margin_amount_over_revenue_is_margin_percentage(
        revenue in revenue(),
        cost in amount(),
    ) {
        let via_amount = margin_amount(revenue, cost).unwrap().checked_div(revenue).unwrap();
        prop_assert_eq!(via_amount, margin_percentage(revenue, cost).unwrap());
    }

    #[test]
    fn compare_amounts_is_total_over_valid_amounts(
        expected in amount(),
        actual in amount(),
        tolerance in amount().prop_map(|t| t.abs()),
    ) {
        let forward = compare_amounts(expected, actual, tolerance).unwrap();
        prop_assert_eq!(forward, compare_amounts(actual, expected, tolerance).unwrap());
    }

    #[test]
    fn rounding_near_the_bound_never_yields_unparseable_output(
        fraction in 0u32..10,
        rule in rounding_rule().prop_filter("keeps six places or fewer", |r| r.places <= 6),
    ) {
        // 9999999999999999999999.f
        let unscaled = 99_999_999_999_999_999_999_990i128 + fraction as i128;
        let value = DecimalValue::from_parts(unscaled, 1).unwrap();
        if let Ok(rendered) = rule.apply(value) {
            prop_assert!(rendered.parse::<DecimalValue>().is_ok());
        }
    }

    #[test]
    fn rounding_is_idempotent(value in amount(), rule in rounding_rule()) {
        let once = rule.apply(value).unwrap();
        let twice = rule.apply(once.parse().unwrap()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn rounded_string_has_exact_places(value in amount(), rule in rounding_rule()) {
        let rendered = rule.apply(value).unwrap();
        let fraction_digits = rendered.split_once('.').map_or(0, |(_, f)| f.len());
        prop_assert_eq!(fraction_digits as u32, rule.places);
        prop_assert!(!rendered.contains('e') && !rendered.contains('E'));
    }

    #[test]
    fn compare_amounts_is_reflexive(
        value in amount(),
        tolerance in amount().prop_map(|t| t.abs()),
    ) {
        prop_assert!(compare_amounts(value, value, tolerance).unwrap());
    }

    #[test]
    fn negative_margins_are_not_clamped(revenue in 1i64..1_000_000, extra in 1i64..1_000_000) {
        let revenue = DecimalValue::from_integer(revenue).unwrap();
        let cost = revenue.checked_add(DecimalValue::from_integer(extra).unwrap()).unwrap();
        prop_assert!(margin_percentage(revenue, cost).unwrap().is_negative());
        prop_assert!(margin_amount(revenue, cost).unwrap().is_negative());
    }

    #[test]
    fn calculation_is_deterministic(revenue in revenue(), cost in amount()) {
        let engine = create_default_engine().unwrap();
        let first = engine.calculate(MARGIN_PERCENTAGE, Some(VERSION_1_0_0), &[revenue, cost]).unwrap();
        let second = engine.calculate(MARGIN_PERCENTAGE, Some(VERSION_1_0_0), &[revenue, cost]).unwrap();

        let (a, b) = (first.amount().unwrap(), second.amount().unwrap());
        prop_assert_eq!(a.mantissa(), b.mantissa());
        prop_assert_eq!(a.scale(), b.scale());
    }

    #[test]
    fn aggregate_matches_pairwise_sum(items in proptest::collection::vec(amount(), 0..50)) {
        let total = aggregate_plan_cost(&items).unwrap();
        let expected = items
            .iter()
            .fold(DecimalValue::ZERO, |acc, v| acc.checked_add(*v).unwrap());
        prop_assert_eq!(total, expected);
    }

    #[test]
    fn with_precision_leaves_source_untouched(revenue in revenue(), cost in amount()) {
        let engine = create_default_engine().unwrap();
        let result = engine.calculate(MARGIN_PERCENTAGE, None, &[revenue, cost]).unwrap();
        let before = result.clone();

        for context in ["storage", "display", "unit.cost", "percentage"] {
            let rounded = engine.with_precision(&result, context).unwrap();
            prop_assert_eq!(&rounded.source_result, &before);
        }
        prop_assert_eq!(result, before);
    }
}
