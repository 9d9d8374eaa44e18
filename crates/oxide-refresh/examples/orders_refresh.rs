//! Example: Refreshing an orders table as its model evolves
//!
//! This example refreshes one table four times from a changing query and
//! shows which strategy each refresh picks and whether the table kept its
//! storage.
//!
//! Run with: cargo run --example orders_refresh -p oxide-refresh

use oxide_refresh::prelude::*;

// =============================================================================
// Model Versions
// =============================================================================

const MODEL_V1: &str = "SELECT id, customer FROM raw_orders";

/// Same columns as v1, projected in another order.
const MODEL_V2: &str = "SELECT customer, id FROM raw_orders";

/// Adds the total column.
const MODEL_V3: &str = "SELECT id, customer, total FROM raw_orders";

/// Replaces every column.
const MODEL_V4: &str = "SELECT id AS order_id, total AS amount FROM raw_orders";

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("{}", "=".repeat(70));
    println!(" OXIDE-REFRESH: Orders Example");
    println!("{}", "=".repeat(70));
    println!();

    // Create in-memory SQLite database
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;
    let store = SqliteStore::new(pool);

    println!("[1] Seeding raw_orders...");
    store
        .execute("CREATE TABLE raw_orders (id INTEGER, customer TEXT, total REAL)")
        .await?;
    store
        .execute("INSERT INTO raw_orders VALUES (1, 'ada', 12.5), (2, 'grace', 7.25)")
        .await?;
    println!("    2 rows\n");

    let orders = RelationName::new("", "main", "orders");
    let ctx = RefreshContext::new(orders.clone()).announce(false);
    let refresher = Refresher::new(&store);

    for (step, model) in [MODEL_V1, MODEL_V2, MODEL_V3, MODEL_V4].iter().enumerate() {
        println!("[{}] Refreshing from: {model}", step + 2);

        let before = store.get_relation(&orders).await?.and_then(|r| r.location);
        let outcome = refresher
            .refresh(&ctx, &QuerySource::Sql((*model).to_string()))
            .await?;
        let after = store.get_relation(&orders).await?.and_then(|r| r.location);

        println!("    Strategy: {}", outcome.strategy);
        for name in outcome.diff.columns_to_drop() {
            println!("    - {name}");
        }
        for addition in outcome.diff.columns_to_add() {
            println!("    + {} {}", addition.name(), addition.definition);
        }
        println!("    Columns:  {}", outcome.final_columns.join(", "));
        println!("    Rows:     {}", store.row_count(&orders).await?);
        if before.is_some() {
            let kept = if before == after { "kept" } else { "replaced" };
            println!("    Storage:  {kept}");
        }
        println!();
    }

    // Show what a refresh would do without doing it
    println!("[6] Planned statements for the v1 model (dry run):");
    println!("{}", "-".repeat(70));
    let outcome = Refresher::new(&store)
        .dry_run(true)
        .refresh(&ctx, &QuerySource::Sql(MODEL_V1.to_string()))
        .await?;
    println!("-- {}", outcome.strategy);
    for sql in &outcome.statements {
        println!("{sql};");
    }
    println!("{}", "-".repeat(70));
    println!();

    println!("{}", "=".repeat(70));
    println!(" Example completed successfully!");
    println!("{}", "=".repeat(70));

    Ok(())
}
