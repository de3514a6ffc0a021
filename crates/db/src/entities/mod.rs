//! `SeaORM` entity definitions for all tables.

pub mod sea_orm_active_enums;

pub mod accounts;
pub mod batches;
pub mod businesses;
pub mod customers;
pub mod expenses;
pub mod gl_entries;
pub mod invoice_items;
pub mod invoices;
pub mod journal_entries;
pub mod lot_draws;
pub mod payments;
pub mod pos_sale_items;
pub mod pos_sales;
pub mod production_components;
pub mod production_orders;
pub mod products;
pub mod purchase_items;
pub mod purchases;
pub mod vendors;
pub mod warehouses;
