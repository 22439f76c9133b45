use lote::LoteSession;

use super::clip;

pub fn run(session: &LoteSession, json: bool) -> anyhow::Result<()> {
    let summary = session.summary()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!("Batches in history: {}", summary.total_entries);
    if summary.by_product.is_empty() {
        return Ok(());
    }
    println!();
    println!("{:<30} {:>12}", "PRODUCT", "QUANTITY");
    for stock in &summary.by_product {
        println!("{:<30} {:>12}", clip(&stock.product, 30), stock.quantity);
    }
    Ok(())
}
