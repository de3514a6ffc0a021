//! Database seeder for Khata development and testing.
//!
//! Seeds a demo business with its chart of accounts, trading partners, a
//! small product catalog, and enough trading activity that the financial
//! statements have something to show.
//!
//! Usage: cargo run --bin seeder

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::str::FromStr;
use uuid::Uuid;

use khata_core::documents::PaymentMethod;
use khata_db::entities::{businesses, customers, products, purchases, vendors, warehouses};
use khata_db::repositories::{ChartInit, ChartRepository, CounterRepository};
use khata_engine::{
    CheckoutInput, CreateInvoiceInput, CreatePurchaseInput, ExpenseAdapter, InvoiceAdapter,
    InvoiceItemInput, PosAdapter, PosItemInput, PurchaseAdapter, PurchaseItemInput,
    RecordExpenseInput, SettleInput,
};
use khata_shared::ActorContext;

/// Demo business ID (consistent for all seeds)
const TEST_BUSINESS_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo owner ID (consistent for all seeds)
const TEST_OWNER_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = khata_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo business...");
    seed_business(&db).await;

    println!("Seeding chart of accounts...");
    seed_chart(&db).await;

    println!("Seeding customers and vendors...");
    seed_parties(&db).await;

    println!("Seeding product catalog...");
    seed_catalog(&db).await;

    println!("Seeding trading activity...");
    seed_activity(&db).await;

    println!("Reconciling counters against history...");
    reconcile_counters(&db).await;

    println!("Seeding complete!");
}

fn test_business_id() -> Uuid {
    Uuid::parse_str(TEST_BUSINESS_ID).unwrap()
}

fn test_owner_id() -> Uuid {
    Uuid::parse_str(TEST_OWNER_ID).unwrap()
}

fn actor() -> ActorContext {
    ActorContext::new(test_owner_id(), test_business_id())
}

fn day(year: i32, month: u32, date: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, date).unwrap()
}

fn money(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

/// Seeds the demo business tenant.
async fn seed_business(db: &DatabaseConnection) {
    // Check if the business already exists
    if businesses::Entity::find_by_id(test_business_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo business already exists, skipping...");
        return;
    }

    let business = businesses::ActiveModel {
        id: Set(test_business_id()),
        name: Set("Khata Demo Traders".to_string()),
        owner_id: Set(test_owner_id()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = business.insert(db).await {
        eprintln!("Failed to insert demo business: {e}");
    } else {
        println!("  Created demo business: Khata Demo Traders");
    }
}

/// Seeds the default chart of accounts for the demo business.
async fn seed_chart(db: &DatabaseConnection) {
    let chart = ChartRepository::new(db.clone());
    match chart.initialize_chart(test_business_id()).await {
        Ok(ChartInit::Created { count }) => println!("  Created {count} accounts"),
        Ok(ChartInit::AlreadyInitialized) => {
            println!("  Chart already initialized, skipping...");
        }
        Err(e) => eprintln!("Failed to initialize chart: {e}"),
    }
}

/// Seeds sample customers and vendors.
async fn seed_parties(db: &DatabaseConnection) {
    let business_id = test_business_id();

    let existing = customers::Entity::find()
        .filter(customers::Column::BusinessId.eq(business_id))
        .one(db)
        .await
        .ok()
        .flatten();
    if existing.is_some() {
        println!("  Parties already seeded, skipping...");
        return;
    }

    let customer_rows = [
        ("Asha Traders", Some("+91 98000 11111")),
        ("Bharat Stores", None),
    ];
    let mut inserted = 0;
    for (name, phone) in customer_rows {
        let customer = customers::ActiveModel {
            id: Set(Uuid::new_v4()),
            business_id: Set(business_id),
            name: Set(name.to_string()),
            phone: Set(phone.map(ToString::to_string)),
            outstanding_balance: Set(Decimal::ZERO),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };
        if let Err(e) = customer.insert(db).await {
            eprintln!("Failed to insert customer {name}: {e}");
        } else {
            inserted += 1;
        }
    }
    println!("  Inserted {inserted} customers");

    let vendor_rows = [
        ("Sharma Wholesale", Some("+91 98000 22222")),
        ("Gupta Distribution", None),
    ];
    let mut inserted = 0;
    for (name, phone) in vendor_rows {
        let vendor = vendors::ActiveModel {
            id: Set(Uuid::new_v4()),
            business_id: Set(business_id),
            name: Set(name.to_string()),
            phone: Set(phone.map(ToString::to_string)),
            outstanding_balance: Set(Decimal::ZERO),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };
        if let Err(e) = vendor.insert(db).await {
            eprintln!("Failed to insert vendor {name}: {e}");
        } else {
            inserted += 1;
        }
    }
    println!("  Inserted {inserted} vendors");
}

/// Seeds the default warehouse and a small product catalog.
async fn seed_catalog(db: &DatabaseConnection) {
    let business_id = test_business_id();

    let existing = products::Entity::find()
        .filter(products::Column::BusinessId.eq(business_id))
        .one(db)
        .await
        .ok()
        .flatten();
    if existing.is_some() {
        println!("  Catalog already seeded, skipping...");
        return;
    }

    let warehouse = warehouses::ActiveModel {
        id: Set(Uuid::new_v4()),
        business_id: Set(business_id),
        name: Set("Main Store".to_string()),
        is_default: Set(true),
        created_at: Set(Utc::now().into()),
    };
    if let Err(e) = warehouse.insert(db).await {
        eprintln!("Failed to insert warehouse: {e}");
    } else {
        println!("  Created warehouse: Main Store");
    }

    let product_rows = [
        ("TEA-250", "Masala Tea 250g", "pcs", "90.00", false),
        ("TEA-500", "Green Tea 500g", "pcs", "130.00", false),
        ("GIFT-BOX", "Tea Gift Box", "box", "450.00", true),
    ];
    let mut inserted = 0;
    for (sku, name, unit, price, is_manufactured) in product_rows {
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            business_id: Set(business_id),
            sku: Set(sku.to_string()),
            name: Set(name.to_string()),
            unit: Set(unit.to_string()),
            selling_price: Set(money(price)),
            is_manufactured: Set(is_manufactured),
            stock_quantity: Set(Decimal::ZERO),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };
        if let Err(e) = product.insert(db).await {
            eprintln!("Failed to insert product {sku}: {e}");
        } else {
            inserted += 1;
        }
    }
    println!("  Inserted {inserted} products");
}

async fn find_product(db: &DatabaseConnection, sku: &str) -> products::Model {
    products::Entity::find()
        .filter(products::Column::BusinessId.eq(test_business_id()))
        .filter(products::Column::Sku.eq(sku))
        .one(db)
        .await
        .expect("Failed to query products")
        .unwrap_or_else(|| panic!("Product {sku} not seeded"))
}

/// Seeds one month of trading: a stocked purchase, an invoice with a part
/// payment, a rent expense, and a counter sale.
async fn seed_activity(db: &DatabaseConnection) {
    let business_id = test_business_id();
    let ctx = actor();

    let existing = purchases::Entity::find()
        .filter(purchases::Column::BusinessId.eq(business_id))
        .one(db)
        .await
        .ok()
        .flatten();
    if existing.is_some() {
        println!("  Trading activity already seeded, skipping...");
        return;
    }

    let customer = customers::Entity::find()
        .filter(customers::Column::BusinessId.eq(business_id))
        .filter(customers::Column::Name.eq("Asha Traders"))
        .one(db)
        .await
        .expect("Failed to query customers")
        .expect("Customer Asha Traders not seeded");
    let vendor = vendors::Entity::find()
        .filter(vendors::Column::BusinessId.eq(business_id))
        .filter(vendors::Column::Name.eq("Sharma Wholesale"))
        .one(db)
        .await
        .expect("Failed to query vendors")
        .expect("Vendor Sharma Wholesale not seeded");
    let warehouse = warehouses::Entity::find()
        .filter(warehouses::Column::BusinessId.eq(business_id))
        .one(db)
        .await
        .expect("Failed to query warehouses")
        .expect("Warehouse not seeded");
    let tea_250 = find_product(db, "TEA-250").await;
    let tea_500 = find_product(db, "TEA-500").await;

    // Stock the shelves first so the invoice and the counter sale have
    // lots to draw from.
    let purchase_adapter = PurchaseAdapter::new(db.clone());
    let purchase = purchase_adapter
        .create(
            &ctx,
            CreatePurchaseInput {
                vendor_id: vendor.id,
                purchase_number: "PO-2026-001".to_string(),
                purchase_date: day(2026, 7, 5),
                items: vec![
                    PurchaseItemInput {
                        product_id: tea_250.id,
                        warehouse_id: warehouse.id,
                        quantity: Decimal::from(40),
                        unit_cost: money("55.00"),
                        tax_amount: money("396.00"),
                        manufacturing_date: Some(day(2026, 6, 20)),
                        expiry_date: Some(day(2027, 6, 20)),
                    },
                    PurchaseItemInput {
                        product_id: tea_500.id,
                        warehouse_id: warehouse.id,
                        quantity: Decimal::from(25),
                        unit_cost: money("80.00"),
                        tax_amount: money("360.00"),
                        manufacturing_date: Some(day(2026, 6, 25)),
                        expiry_date: None,
                    },
                ],
            },
        )
        .await
        .expect("Failed to create purchase");
    purchase_adapter
        .receive(&ctx, purchase.id)
        .await
        .expect("Failed to receive purchase");
    println!("  Received purchase PO-2026-001 (total {})", purchase.total);

    let invoice_adapter = InvoiceAdapter::new(db.clone());
    let invoice = invoice_adapter
        .create(
            &ctx,
            CreateInvoiceInput {
                customer_id: customer.id,
                invoice_number: "INV-2026-001".to_string(),
                invoice_date: day(2026, 7, 18),
                items: vec![
                    InvoiceItemInput {
                        product_id: tea_250.id,
                        warehouse_id: warehouse.id,
                        batch_id: None,
                        quantity: Decimal::from(12),
                        unit_price: money("90.00"),
                        tax_amount: money("97.20"),
                    },
                    InvoiceItemInput {
                        product_id: tea_500.id,
                        warehouse_id: warehouse.id,
                        batch_id: None,
                        quantity: Decimal::from(5),
                        unit_price: money("130.00"),
                        tax_amount: money("117.00"),
                    },
                ],
            },
        )
        .await
        .expect("Failed to create invoice");
    invoice_adapter
        .issue(&ctx, invoice.id)
        .await
        .expect("Failed to issue invoice");
    invoice_adapter
        .record_payment(
            &ctx,
            invoice.id,
            SettleInput {
                amount: money("500.00"),
                method: PaymentMethod::Cash,
                payment_date: day(2026, 7, 25),
                notes: Some("Part payment on delivery".to_string()),
            },
        )
        .await
        .expect("Failed to record invoice payment");
    println!("  Issued invoice INV-2026-001 (total {})", invoice.total);

    ExpenseAdapter::new(db.clone())
        .record(
            &ctx,
            RecordExpenseInput {
                account_code: "6200".to_string(),
                expense_date: day(2026, 7, 31),
                description: "Shop rent for July".to_string(),
                amount: money("1500.00"),
                tax_amount: Decimal::ZERO,
                payment_method: PaymentMethod::Cash,
                on_credit: false,
                vendor_id: None,
            },
        )
        .await
        .expect("Failed to record expense");
    println!("  Recorded rent expense (1500.00)");

    let sale = PosAdapter::new(db.clone())
        .checkout(
            &ctx,
            CheckoutInput {
                warehouse_id: warehouse.id,
                sale_number: "POS-2026-0001".to_string(),
                sale_date: day(2026, 8, 2),
                method: PaymentMethod::Cash,
                items: vec![PosItemInput {
                    product_id: tea_250.id,
                    quantity: Decimal::from(3),
                    unit_price: money("90.00"),
                    tax_amount: Decimal::ZERO,
                }],
            },
        )
        .await
        .expect("Failed to check out counter sale");
    println!("  Checked out counter sale POS-2026-0001 (total {})", sale.sale.total);
}

/// Replays document history into the counter caches and reports any drift.
async fn reconcile_counters(db: &DatabaseConnection) {
    let counters = CounterRepository::new(db.clone());
    match counters.recompute_from_ledger(test_business_id()).await {
        Ok(drifts) if drifts.is_empty() => println!("  Counters consistent with history"),
        Ok(drifts) => {
            for drift in drifts {
                println!(
                    "  Repaired {} for {}: {} -> {}",
                    drift.kind, drift.entity_id, drift.stored, drift.expected
                );
            }
        }
        Err(e) => eprintln!("Failed to reconcile counters: {e}"),
    }
}
