//! Cart command handlers.
//!
//! There is no server-side cart: adding only resolves the product,
//! clamps the quantity and raises the "added" notice.

use serde::Serialize;

use storefront_core::{ProductId, QuantityStepper, Storefront};

use crate::cli::{CartArgs, CartCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct CartLine {
    id: String,
    title: String,
    quantity: u32,
    unit_price: f64,
    total: f64,
}

fn detail(line: &CartLine) -> String {
    util::detail_lines(&[
        ("Product", format!("{} ({})", line.title, line.id)),
        ("Quantity", line.quantity.to_string()),
        ("Unit price", format!("${:.2}", line.unit_price)),
        ("Total", format!("${:.2}", line.total)),
    ])
}

pub async fn handle(
    storefront: &Storefront,
    args: CartArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CartCommand::Add { id, quantity } => {
            let scope = storefront.scope();
            let product = storefront
                .product_detail(&ProductId::from(id), &scope)
                .await?
                .product;

            let mut stepper = QuantityStepper::new();
            stepper.set_input(&quantity);
            let notice = stepper.add_to_cart();

            let line = CartLine {
                id: product.id.to_string(),
                title: product.display_title().to_owned(),
                quantity: notice.quantity,
                unit_price: product.price,
                total: product.price * f64::from(notice.quantity),
            };
            output::success(global, notice.message);
            let out = output::render_single(&global.output, &line, detail, |l| {
                format!("{} {}", l.id, l.quantity)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
