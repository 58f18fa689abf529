//! Merit-order example: clear one offer and print the stack.
//!
//! Builds a seven-block offer against the standard catalog, shows how the
//! blocks are ranked and allocated, then shrinks the offer below demand to
//! show the undersupply outcome.
//!
//! Run with: `cargo run -p meritorder-examples --example merit_order`
//!
//! Or clear your own offer: a demand followed by `KIND:OUTPUT` blocks,
//! e.g. `... --example merit_order -- 900 nuclear:600 gas:400`.

use std::error::Error;

use meritorder_core::fixed::fixed64_to_f64;
use meritorder_core::*;

fn print_stack(order: &MeritOrder) {
    println!(
        "  {:<14} {:>8} {:>8} {:>10} {:>10}",
        "kind", "price", "output", "cumulative", "dispatched"
    );
    for a in order.allocations() {
        println!(
            "  {:<14} {:>8.1} {:>8.1} {:>10.1} {:>10.1}{}",
            a.kind.name(),
            fixed64_to_f64(a.spec.price),
            fixed64_to_f64(a.output),
            fixed64_to_f64(a.cumulative),
            fixed64_to_f64(a.dispatched),
            if a.marginal { "  <- marginal" } else { "" },
        );
    }
}

fn print_result(result: &DispatchResult) {
    println!("  clearing price : {:.2}", fixed64_to_f64(result.clearing_price));
    println!("  total cost     : {:.2}", fixed64_to_f64(result.total_cost));
    println!("  total expense  : {:.2}", fixed64_to_f64(result.total_expense));
    println!("  total profit   : {:.2}", fixed64_to_f64(result.total_profit));
    println!("  co2 released   : {:.2}", fixed64_to_f64(result.co2_released));
    println!("  stability      : {:.2}", fixed64_to_f64(result.stability_score));
    println!("  shortfall      : {:.2}", fixed64_to_f64(result.shortfall));
}

/// Parse `DEMAND KIND:OUTPUT...` from the command line.
fn offer_from_args(args: &[String]) -> Result<DispatchRequest, Box<dyn Error>> {
    let (demand, blocks) = args.split_first().ok_or("missing demand")?;
    let productions = blocks
        .iter()
        .map(|block| -> Result<(PlantKind, f64), Box<dyn Error>> {
            let (kind, output) = block
                .split_once(':')
                .ok_or_else(|| format!("expected KIND:OUTPUT, got `{block}`"))?;
            Ok((kind.parse::<PlantKind>()?, output.parse::<f64>()?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DispatchRequest::from_pairs(&productions, demand.parse()?))
}

fn main() -> Result<(), Box<dyn Error>> {
    let catalog = PlantCatalog::standard();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        let offer = offer_from_args(&args)?;
        let order = merit_order(&offer, &catalog)?;
        print_stack(&order);
        print_result(&order.result()?);
        return Ok(());
    }

    let offer = DispatchRequest::from_pairs(
        &[
            (PlantKind::Coal, 300.0),
            (PlantKind::Coal, 400.0),
            (PlantKind::Gas, 200.0),
            (PlantKind::Nuclear, 1000.0),
            (PlantKind::Water, 50.0),
            (PlantKind::Wind, 100.0),
            (PlantKind::Photovoltaic, 50.0),
        ],
        1201.0,
    );

    println!("=== Offer covering 1201 MWh ===");
    let order = merit_order(&offer, &catalog)?;
    print_stack(&order);
    print_result(&order.result()?);

    // Same plants, but only 600 MWh offered against 1201.
    let short = DispatchRequest::from_pairs(
        &[(PlantKind::Coal, 300.0), (PlantKind::Nuclear, 300.0)],
        1201.0,
    );

    println!();
    println!("=== Undersupplied offer ===");
    let order = merit_order(&short, &catalog)?;
    print_stack(&order);
    print_result(&order.result()?);

    Ok(())
}
