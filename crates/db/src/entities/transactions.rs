//! `SeaORM` Entity for transactions table.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use stockdesk_core::workflow::Transaction;

use super::sea_orm_active_enums::{TransactionStatus, TransactionType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub stock_symbol: String,
    pub stock_name: String,
    pub transaction_type: TransactionType,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub status: TransactionStatus,
    pub decided_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            stock_symbol: model.stock_symbol,
            stock_name: model.stock_name,
            kind: model.transaction_type.into(),
            quantity: model.quantity,
            unit_price: model.unit_price,
            total_amount: model.total_amount,
            status: model.status.into(),
            decided_by: model.decided_by,
            rejection_reason: model.rejection_reason,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
