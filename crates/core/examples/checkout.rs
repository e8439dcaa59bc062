//! Checkout Quote Example
//!
//! Prices a cart fixture end to end and prints the totals breakdown.
//!
//! Use `-f` to load a fixture YAML file

use anyhow::Result;
use clap::Parser;

use tiffin::{
    coupons::{calculate_discount, validate_coupon},
    fixtures::Fixture,
    pricing::{Totals, calculate_delivery_charge, calculate_item_total},
    restaurants::min_order_shortfalls,
};

/// Checkout Quote Example
#[derive(Debug, Parser)]
struct Args {
    /// Fixture YAML file describing the cart, settings and coupon
    #[clap(short, long)]
    fixture: String,
}

#[expect(clippy::print_stdout, reason = "Example program output to user")]
pub fn main() -> Result<()> {
    let args = Args::parse();
    let fixture = Fixture::from_path(&args.fixture)?;

    let item_total = calculate_item_total(&fixture.items);
    let quote = calculate_delivery_charge(
        &fixture.items,
        fixture.settings.as_ref(),
        None,
        fixture.user.as_ref(),
    );

    if let Some(coupon) = fixture.coupon.as_ref() {
        match validate_coupon(coupon, item_total) {
            Ok(()) => println!("coupon {}: ok", coupon.code),
            Err(rejection) => println!("coupon {}: {rejection}", coupon.code),
        }
    }

    let discount = calculate_discount(fixture.coupon.as_ref(), &fixture.items, item_total);
    let totals = Totals::new(item_total, quote.delivery_charge, discount);

    for shortfall in min_order_shortfalls(&fixture.items, &fixture.restaurants) {
        println!(
            "{} needs {} more to reach its minimum of {}",
            shortfall.restaurant_name, shortfall.shortfall, shortfall.min_amount
        );
    }

    println!("item total:      {}", totals.item_total);
    println!(
        "delivery charge: {} (campus {})",
        totals.delivery_charge, quote.campus_delivery_charge
    );
    println!("discount:        {}", totals.discount);
    println!("payable:         {}", totals.final_total);

    Ok(())
}
