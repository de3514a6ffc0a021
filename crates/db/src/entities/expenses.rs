//! `SeaORM` Entity for the expenses table.
//!
//! `account_code` names the expense-type ledger account the net amount is
//! debited to. `amount` is the net figure; `tax_amount` goes to input tax
//! credit. A credit expense requires `vendor_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentMethod;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub business_id: Uuid,
    pub account_code: String,
    pub expense_date: Date,
    pub description: String,
    pub amount: Decimal,
    pub tax_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub on_credit: bool,
    pub vendor_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendors::Entity",
        from = "Column::VendorId",
        to = "super::vendors::Column::Id"
    )]
    Vendors,
}

impl Related<super::vendors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
