// ============================================================================
// Calculation Functions
// Campaign margin, unit cost, pacing and aggregate formulas, by version
// ============================================================================
//
// Every function here is pure and works on whatever sign its inputs carry.
// Nothing is clamped at zero: negative margins and overspent budgets are
// legitimate line items. Division by a zero denominator is the only
// failure besides magnitude overflow.

use crate::domain::{CalculatedValue, CalculationVersion};
use crate::interfaces::{Arity, Calculation, FormulaFn};
use crate::numeric::{CalcError, CalcResult, DecimalValue};
use chrono::NaiveDate;
use std::sync::Arc;

// ============================================================================
// Calculation Names
// ============================================================================

pub const MARGIN_PERCENTAGE: &str = "marginPercentage";
pub const MARGIN_AMOUNT: &str = "marginAmount";
pub const ACTUAL_UNIT_COST: &str = "actualUnitCost";
pub const PACING_INDEX: &str = "pacingIndex";
pub const COMPARE_AMOUNTS: &str = "compareAmounts";
pub const AGGREGATE_PLAN_COST: &str = "aggregatePlanCost";
pub const ON_PACE_TARGET: &str = "onPaceTarget";
pub const DELIVERY_PACING: &str = "deliveryPacing";
pub const SPEND_PACING: &str = "spendPacing";
pub const COST_PER_THOUSAND: &str = "costPerThousand";
pub const REMAINING_BUDGET: &str = "remainingBudget";
pub const BUDGET_UTILIZATION: &str = "budgetUtilization";

/// Tolerance used by `compareAmounts` when none is given: one cent.
pub const DEFAULT_TOLERANCE: DecimalValue = DecimalValue::ONE_CENT;

// ============================================================================
// Pure Formulas
// ============================================================================

fn nonzero(denominator: DecimalValue, calculation: &str) -> CalcResult<DecimalValue> {
    if denominator.is_zero() {
        Err(CalcError::division_by_zero(calculation))
    } else {
        Ok(denominator)
    }
}

/// `revenue - cost`
pub fn margin_amount(revenue: DecimalValue, cost: DecimalValue) -> CalcResult<DecimalValue> {
    revenue.checked_sub(cost)
}

/// `(revenue - cost) / revenue`, as a ratio (0.25 is a 25% margin).
///
/// # Errors
/// `DivisionByZero` when revenue is zero.
pub fn margin_percentage(revenue: DecimalValue, cost: DecimalValue) -> CalcResult<DecimalValue> {
    let revenue_divisor = nonzero(revenue, MARGIN_PERCENTAGE)?;
    margin_amount(revenue, cost)?.checked_div(revenue_divisor)
}

/// `spend / units`
pub fn actual_unit_cost(spend: DecimalValue, units: DecimalValue) -> CalcResult<DecimalValue> {
    spend.checked_div(nonzero(units, ACTUAL_UNIT_COST)?)
}

/// `actual / onPaceTarget`; 1.0 means exactly on schedule.
pub fn pacing_index(
    actual: DecimalValue,
    on_pace_target: DecimalValue,
) -> CalcResult<DecimalValue> {
    actual.checked_div(nonzero(on_pace_target, PACING_INDEX)?)
}

/// `|expected - actual| <= tolerance`.
///
/// Monetary sums are never compared for exact equality; the tolerance
/// absorbs rounding drift across many line items.
///
/// # Errors
/// `InvalidArguments` for a negative tolerance.
pub fn compare_amounts(
    expected: DecimalValue,
    actual: DecimalValue,
    tolerance: DecimalValue,
) -> CalcResult<bool> {
    if tolerance.is_negative() {
        return Err(CalcError::InvalidArguments {
            calculation: COMPARE_AMOUNTS.to_string(),
            expected: "a non-negative tolerance".to_string(),
            got: tolerance.to_string(),
        });
    }
    // The difference may exceed the amount bound; it is only compared.
    let difference = expected
        .as_decimal()
        .checked_sub(actual.as_decimal())
        .ok_or_else(|| CalcError::overflow("sub"))?;
    Ok(difference.abs() <= tolerance.as_decimal())
}

/// Sum of every item, with no intermediate rounding. Empty is zero.
pub fn aggregate_plan_cost(items: &[DecimalValue]) -> CalcResult<DecimalValue> {
    DecimalValue::sum(items)
}

/// Amount expected by now on a linear schedule:
/// `planned * elapsedDays / totalDays`.
pub fn on_pace_target(
    planned: DecimalValue,
    elapsed_days: DecimalValue,
    total_days: DecimalValue,
) -> CalcResult<DecimalValue> {
    let total_days = nonzero(total_days, ON_PACE_TARGET)?;
    planned.checked_mul(elapsed_days)?.checked_div(total_days)
}

/// Delivered units against the units expected by now.
pub fn delivery_pacing(
    delivered_units: DecimalValue,
    planned_units: DecimalValue,
    elapsed_days: DecimalValue,
    total_days: DecimalValue,
) -> CalcResult<DecimalValue> {
    let expected_units = on_pace_target(planned_units, elapsed_days, total_days)?;
    delivered_units.checked_div(nonzero(expected_units, DELIVERY_PACING)?)
}

/// Actual spend against the budget expected to be spent by now.
pub fn spend_pacing(
    actual_spend: DecimalValue,
    planned_budget: DecimalValue,
    elapsed_days: DecimalValue,
    total_days: DecimalValue,
) -> CalcResult<DecimalValue> {
    let expected_spend = on_pace_target(planned_budget, elapsed_days, total_days)?;
    actual_spend.checked_div(nonzero(expected_spend, SPEND_PACING)?)
}

/// `spend * 1000 / impressions`
pub fn cost_per_thousand(
    spend: DecimalValue,
    impressions: DecimalValue,
) -> CalcResult<DecimalValue> {
    let impressions = nonzero(impressions, COST_PER_THOUSAND)?;
    spend
        .checked_mul(DecimalValue::ONE_THOUSAND)?
        .checked_div(impressions)
}

/// `budget - spent`; negative when overspent.
pub fn remaining_budget(budget: DecimalValue, spent: DecimalValue) -> CalcResult<DecimalValue> {
    budget.checked_sub(spent)
}

/// `spent / budget`
pub fn budget_utilization(spent: DecimalValue, budget: DecimalValue) -> CalcResult<DecimalValue> {
    spent.checked_div(nonzero(budget, BUDGET_UTILIZATION)?)
}

// ============================================================================
// Adapters
// ============================================================================

fn exact<const N: usize>(name: &str, args: &[DecimalValue]) -> CalcResult<[DecimalValue; N]> {
    <[DecimalValue; N]>::try_from(args).map_err(|_| CalcError::InvalidArguments {
        calculation: name.to_string(),
        expected: Arity::Exactly(N).to_string(),
        got: args.len().to_string(),
    })
}

fn eval_margin_percentage(args: &[DecimalValue]) -> CalcResult<CalculatedValue> {
    let [revenue, cost] = exact(MARGIN_PERCENTAGE, args)?;
    margin_percentage(revenue, cost).map(Into::into)
}

fn eval_margin_amount(args: &[DecimalValue]) -> CalcResult<CalculatedValue> {
    let [revenue, cost] = exact(MARGIN_AMOUNT, args)?;
    margin_amount(revenue, cost).map(Into::into)
}

fn eval_actual_unit_cost(args: &[DecimalValue]) -> CalcResult<CalculatedValue> {
    let [spend, units] = exact(ACTUAL_UNIT_COST, args)?;
    actual_unit_cost(spend, units).map(Into::into)
}

fn eval_pacing_index(args: &[DecimalValue]) -> CalcResult<CalculatedValue> {
    let [actual, target] = exact(PACING_INDEX, args)?;
    pacing_index(actual, target).map(Into::into)
}

fn eval_compare_amounts(args: &[DecimalValue]) -> CalcResult<CalculatedValue> {
    let (expected, actual, tolerance) = match *args {
        [expected, actual] => (expected, actual, DEFAULT_TOLERANCE),
        [expected, actual, tolerance] => (expected, actual, tolerance),
        _ => {
            return Err(CalcError::InvalidArguments {
                calculation: COMPARE_AMOUNTS.to_string(),
                expected: Arity::Between(2, 3).to_string(),
                got: args.len().to_string(),
            })
        }
    };
    compare_amounts(expected, actual, tolerance).map(Into::into)
}

fn eval_aggregate_plan_cost(args: &[DecimalValue]) -> CalcResult<CalculatedValue> {
    aggregate_plan_cost(args).map(Into::into)
}

fn eval_on_pace_target(args: &[DecimalValue]) -> CalcResult<CalculatedValue> {
    let [planned, elapsed, total] = exact(ON_PACE_TARGET, args)?;
    on_pace_target(planned, elapsed, total).map(Into::into)
}

fn eval_delivery_pacing(args: &[DecimalValue]) -> CalcResult<CalculatedValue> {
    let [delivered, planned, elapsed, total] = exact(DELIVERY_PACING, args)?;
    delivery_pacing(delivered, planned, elapsed, total).map(Into::into)
}

fn eval_spend_pacing(args: &[DecimalValue]) -> CalcResult<CalculatedValue> {
    let [spend, budget, elapsed, total] = exact(SPEND_PACING, args)?;
    spend_pacing(spend, budget, elapsed, total).map(Into::into)
}

fn eval_cost_per_thousand(args: &[DecimalValue]) -> CalcResult<CalculatedValue> {
    let [spend, impressions] = exact(COST_PER_THOUSAND, args)?;
    cost_per_thousand(spend, impressions).map(Into::into)
}

fn eval_remaining_budget(args: &[DecimalValue]) -> CalcResult<CalculatedValue> {
    let [budget, spent] = exact(REMAINING_BUDGET, args)?;
    remaining_budget(budget, spent).map(Into::into)
}

fn eval_budget_utilization(args: &[DecimalValue]) -> CalcResult<CalculatedValue> {
    let [spent, budget] = exact(BUDGET_UTILIZATION, args)?;
    budget_utilization(spent, budget).map(Into::into)
}

// ============================================================================
// Built-in Versions
// ============================================================================

pub const VERSION_1_0_0: &str = "1.0.0";
pub const VERSION_1_1_0: &str = "1.1.0";

fn formulas_1_0_0() -> [FormulaFn; 6] {
    [
        FormulaFn::new(
            MARGIN_PERCENTAGE,
            "(revenue - cost) / revenue",
            Arity::Exactly(2),
            eval_margin_percentage,
        ),
        FormulaFn::new(
            MARGIN_AMOUNT,
            "revenue - cost",
            Arity::Exactly(2),
            eval_margin_amount,
        ),
        FormulaFn::new(
            ACTUAL_UNIT_COST,
            "spend / units",
            Arity::Exactly(2),
            eval_actual_unit_cost,
        ),
        FormulaFn::new(
            PACING_INDEX,
            "actual / onPaceTarget",
            Arity::Exactly(2),
            eval_pacing_index,
        ),
        FormulaFn::new(
            COMPARE_AMOUNTS,
            "|expected - actual| <= tolerance (default 0.01)",
            Arity::Between(2, 3),
            eval_compare_amounts,
        ),
        FormulaFn::new(
            AGGREGATE_PLAN_COST,
            "sum(items)",
            Arity::Variadic,
            eval_aggregate_plan_cost,
        ),
    ]
}

fn formulas_1_1_0() -> [FormulaFn; 6] {
    [
        FormulaFn::new(
            ON_PACE_TARGET,
            "planned * elapsedDays / totalDays",
            Arity::Exactly(3),
            eval_on_pace_target,
        ),
        FormulaFn::new(
            DELIVERY_PACING,
            "deliveredUnits / (plannedUnits * elapsedDays / totalDays)",
            Arity::Exactly(4),
            eval_delivery_pacing,
        ),
        FormulaFn::new(
            SPEND_PACING,
            "actualSpend / (plannedBudget * elapsedDays / totalDays)",
            Arity::Exactly(4),
            eval_spend_pacing,
        ),
        FormulaFn::new(
            COST_PER_THOUSAND,
            "spend * 1000 / impressions",
            Arity::Exactly(2),
            eval_cost_per_thousand,
        ),
        FormulaFn::new(
            REMAINING_BUDGET,
            "budget - spent",
            Arity::Exactly(2),
            eval_remaining_budget,
        ),
        FormulaFn::new(
            BUDGET_UTILIZATION,
            "spent / budget",
            Arity::Exactly(2),
            eval_budget_utilization,
        ),
    ]
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, String> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("Invalid effective date {}-{}-{}", year, month, day))
}

/// Margin, unit cost, pacing index, tolerance comparison and plan totals.
pub fn version_1_0_0() -> Result<CalculationVersion, String> {
    formulas_1_0_0()
        .into_iter()
        .fold(
            CalculationVersion::builder(
                VERSION_1_0_0,
                date(2024, 1, 1)?,
                "Core margin, unit cost, pacing and plan cost formulas",
            ),
            |builder, formula| builder.with_calculation(Arc::new(formula) as Arc<dyn Calculation>),
        )
        .build()
}

/// Everything in 1.0.0 plus schedule-based pacing, CPM and budget tracking.
pub fn version_1_1_0(previous: &CalculationVersion) -> Result<CalculationVersion, String> {
    formulas_1_1_0()
        .into_iter()
        .fold(
            CalculationVersion::builder(
                VERSION_1_1_0,
                date(2025, 1, 1)?,
                "Adds schedule pacing, CPM and budget utilization",
            )
            .inherit(previous),
            |builder, formula| builder.with_calculation(Arc::new(formula) as Arc<dyn Calculation>),
        )
        .build()
}
