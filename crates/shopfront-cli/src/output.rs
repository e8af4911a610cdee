use serde::Serialize;
use shopfront_core::Product;

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One product per line: id, price, title, and stock when known.
pub(crate) fn product_line(product: &Product) -> String {
    let stock = product
        .inventory
        .map(|units| format!("  ({units} in stock)"))
        .unwrap_or_default();
    format!(
        "{:<32} ${:>9.2}  {}{stock}",
        product.id, product.price, product.title
    )
}

pub(crate) fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("no products");
        return;
    }
    for product in products {
        println!("{}", product_line(product));
    }
}
