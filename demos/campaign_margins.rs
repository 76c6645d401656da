// ============================================================================
// Campaign Margins Example
// ============================================================================

use calculation_engine::engine::calculations::*;
use calculation_engine::numeric::DecimalValue;
use calculation_engine::prelude::*;
use std::sync::Arc;

fn d(s: &str) -> DecimalValue {
    s.parse().expect("valid decimal literal")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Campaign Calculation Example ===\n");

    let engine = CalculationEngineBuilder::new()
        .with_event_handler(Arc::new(LoggingEventHandler))
        .build()?;

    let current = engine.get_version(None)?;
    println!(
        "Current calculation version: {} (effective {})\n",
        current.version_id(),
        current.effective_date()
    );

    // Plan total from line items
    println!("=== Plan Total ===");
    let line_items = [d("4200.00"), d("3150.50"), d("1875.25")];
    let plan_cost = engine.calculate(AGGREGATE_PLAN_COST, None, &line_items)?;
    println!(
        "  {} line items -> {}",
        line_items.len(),
        engine.with_precision(&plan_cost, "display.dollars")?
    );

    // Margin, shown as a percentage and stored at full storage precision
    println!("\n=== Margin ===");
    let revenue = d("12000.00");
    let margin = engine.calculate_in_context(
        MARGIN_PERCENTAGE,
        None,
        &[revenue, plan_cost.amount()?],
        "campaign.update",
    )?;
    println!("  formula:    {}", margin.formula);
    println!("  version:    {}", margin.calculation_version);
    println!("  unrounded:  {}", margin.value);
    println!("  display:    {}%", engine.with_precision(&margin, "percentage")?);
    println!("  storage:    {}", engine.to_storage(&margin)?);

    // Unit costs with a platform override
    println!("\n=== Unit Cost ===");
    let unit_cost = engine.calculate(ACTUAL_UNIT_COST, None, &[d("100"), d("8000")])?;
    println!(
        "  generic:        {}",
        engine.with_precision(&unit_cost, "display.subcent")?
    );
    println!(
        "  youtube views:  {}",
        engine.with_precision_for(&unit_cost, "display.subcent", "youtube", "views")?
    );

    // Pacing
    println!("\n=== Pacing (day 10 of 30) ===");
    let delivery = engine.calculate(
        DELIVERY_PACING,
        None,
        &[d("1200"), d("3000"), d("10"), d("30")],
    )?;
    let spend = engine.calculate(SPEND_PACING, None, &[d("400"), d("1500"), d("10"), d("30")])?;
    println!("  delivery: {}%", engine.with_precision(&delivery, "percentage")?);
    println!("  spend:    {}%", engine.with_precision(&spend, "percentage")?);

    // Reconciliation against the stated budget
    println!("\n=== Reconciliation ===");
    let check = engine.calculate(
        COMPARE_AMOUNTS,
        None,
        &[d("9225.75"), plan_cost.amount()?],
    )?;
    println!("  plan matches stated budget: {}", check.value);

    // Historical replay
    println!("\n=== Replay under {} ===", VERSION_1_0_0);
    let replay = engine.calculate(
        margin.calculation_name.as_str(),
        Some(VERSION_1_0_0),
        &margin.inputs,
    )?;
    println!("  same value: {}", replay.value == margin.value);

    // Errors are values, never silent defaults
    println!("\n=== Errors ===");
    match engine.calculate(MARGIN_PERCENTAGE, None, &[d("0"), d("10")]) {
        Ok(result) => println!("  unexpected: {}", result.value),
        Err(e) => println!("  {:?}: {}", e.kind(), e),
    }
    match engine.calculate(ON_PACE_TARGET, Some(VERSION_1_0_0), &[d("1"), d("1"), d("1")]) {
        Ok(result) => println!("  unexpected: {}", result.value),
        Err(e) => println!("  {:?}: {}", e.kind(), e),
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
