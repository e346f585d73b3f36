//! Shared row-to-domain conversions for the Postgres adapters.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::catalog::{Beat, BeatFile, ContractTemplate, FileType, SoundPack};
use crate::domain::foundation::{
    BeatFileId, BeatId, ContractId, ContractTemplateId, DiscountId, DomainError, ErrorCode,
    PaymentId, Role, SaleId, SoundPackId, UserId, WishlistId,
};
use crate::domain::payment::{Contract, Payment, PaymentStatus, Sale};
use crate::domain::pricing::{Discount, DiscountScope};
use crate::domain::users::User;

pub(super) fn parse_file_type(s: &str) -> Result<FileType, DomainError> {
    s.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid file_type value: {}", s),
        )
    })
}

pub(super) fn parse_opt_file_type(s: Option<&str>) -> Result<Option<FileType>, DomainError> {
    s.map(parse_file_type).transpose()
}

pub(super) fn parse_status(s: &str) -> Result<PaymentStatus, DomainError> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "success" => Ok(PaymentStatus::Success),
        "failed" => Ok(PaymentStatus::Failed),
        other => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payment status: {}", other),
        )),
    }
}

pub(super) fn parse_scope(s: &str) -> Result<DiscountScope, DomainError> {
    match s {
        "global" => Ok(DiscountScope::Global),
        "beat" => Ok(DiscountScope::Beat),
        "soundpack" => Ok(DiscountScope::SoundPack),
        other => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid discount scope: {}", other),
        )),
    }
}

#[derive(Debug, FromRow)]
pub(super) struct BeatRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub bpm: Option<i32>,
    pub key: Option<String>,
    pub price: f64,
    pub cover_url: Option<String>,
    pub preview_url: Option<String>,
    pub exclusive_available: bool,
    pub is_sold_exclusive: bool,
    pub producer_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<BeatRow> for Beat {
    fn from(row: BeatRow) -> Self {
        Beat {
            id: BeatId::new(row.id),
            title: row.title,
            description: row.description,
            genre: row.genre,
            bpm: row.bpm,
            key: row.key,
            price: row.price,
            cover_url: row.cover_url,
            preview_url: row.preview_url,
            exclusive_available: row.exclusive_available,
            is_sold_exclusive: row.is_sold_exclusive,
            producer_id: UserId::new(row.producer_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct BeatFileRow {
    pub id: i64,
    pub beat_id: i64,
    pub file_type: String,
    pub price: f64,
    pub file_url: String,
}

impl TryFrom<BeatFileRow> for BeatFile {
    type Error = DomainError;

    fn try_from(row: BeatFileRow) -> Result<Self, Self::Error> {
        Ok(BeatFile {
            id: BeatFileId::new(row.id),
            beat_id: BeatId::new(row.beat_id),
            file_type: parse_file_type(&row.file_type)?,
            price: row.price,
            file_url: row.file_url,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct SoundPackRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub cover_url: Option<String>,
    pub file_url: Option<String>,
    pub producer_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<SoundPackRow> for SoundPack {
    fn from(row: SoundPackRow) -> Self {
        SoundPack {
            id: SoundPackId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            cover_url: row.cover_url,
            file_url: row.file_url,
            producer_id: UserId::new(row.producer_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct ContractTemplateRow {
    pub id: i64,
    pub beat_id: i64,
    pub file_type: String,
    pub contract_type: String,
    pub terms: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ContractTemplateRow> for ContractTemplate {
    type Error = DomainError;

    fn try_from(row: ContractTemplateRow) -> Result<Self, Self::Error> {
        Ok(ContractTemplate {
            id: ContractTemplateId::new(row.id),
            beat_id: BeatId::new(row.beat_id),
            file_type: parse_file_type(&row.file_type)?,
            contract_type: row.contract_type,
            terms: row.terms,
            price: row.price,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct DiscountRow {
    pub id: i64,
    pub code: String,
    pub percentage: f64,
    pub applicable_to: String,
    pub item_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DiscountRow> for Discount {
    type Error = DomainError;

    fn try_from(row: DiscountRow) -> Result<Self, Self::Error> {
        Ok(Discount {
            id: DiscountId::new(row.id),
            code: row.code,
            percentage: row.percentage,
            scope: parse_scope(&row.applicable_to)?,
            item_id: row.item_id,
            name: row.name,
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
            max_uses: row.max_uses,
            used_count: row.used_count,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct PaymentRow {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub currency: String,
    pub method: String,
    pub status: String,
    pub transaction_ref: Option<String>,
    pub paid_amount: Option<f64>,
    pub paid_currency: Option<String>,
    pub beat_id: Option<i64>,
    pub soundpack_id: Option<i64>,
    pub discount_id: Option<i64>,
    pub file_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: PaymentId::new(row.id),
            user_id: UserId::new(row.user_id),
            amount: row.amount,
            currency: row.currency,
            method: row.method,
            status: parse_status(&row.status)?,
            transaction_ref: row.transaction_ref,
            paid_amount: row.paid_amount,
            paid_currency: row.paid_currency,
            beat_id: row.beat_id.map(BeatId::new),
            soundpack_id: row.soundpack_id.map(SoundPackId::new),
            discount_id: row.discount_id.map(DiscountId::new),
            file_type: parse_opt_file_type(row.file_type.as_deref())?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct SaleRow {
    pub id: i64,
    pub buyer_id: i64,
    pub producer_id: Option<i64>,
    pub beat_id: Option<i64>,
    pub soundpack_id: Option<i64>,
    pub contract_id: Option<i64>,
    pub amount: f64,
    pub file_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SaleRow> for Sale {
    type Error = DomainError;

    fn try_from(row: SaleRow) -> Result<Self, Self::Error> {
        Ok(Sale {
            id: SaleId::new(row.id),
            buyer_id: UserId::new(row.buyer_id),
            producer_id: row.producer_id.map(UserId::new),
            beat_id: row.beat_id.map(BeatId::new),
            soundpack_id: row.soundpack_id.map(SoundPackId::new),
            contract_id: row.contract_id.map(ContractId::new),
            amount: row.amount,
            file_type: parse_opt_file_type(row.file_type.as_deref())?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct ContractRow {
    pub id: i64,
    pub buyer_id: i64,
    pub beat_id: i64,
    pub file_type: String,
    pub contract_type: String,
    pub terms: Option<String>,
    pub price: f64,
    pub status: String,
    pub contract_url: Option<String>,
    pub contract_template_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ContractRow> for Contract {
    type Error = DomainError;

    fn try_from(row: ContractRow) -> Result<Self, Self::Error> {
        Ok(Contract {
            id: ContractId::new(row.id),
            buyer_id: UserId::new(row.buyer_id),
            beat_id: BeatId::new(row.beat_id),
            file_type: parse_file_type(&row.file_type)?,
            contract_type: row.contract_type,
            terms: row.terms,
            price: row.price,
            status: row.status,
            contract_url: row.contract_url,
            contract_template_id: row.contract_template_id.map(ContractTemplateId::new),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct UserRow {
    pub id: i64,
    pub firebase_uid: Option<String>,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            firebase_uid: row.firebase_uid,
            name: row.name,
            email: row.email,
            role: Role::normalize(Some(&row.role)),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct WishlistRow {
    pub id: i64,
    pub user_id: i64,
    pub item_type: String,
    pub item_id: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<WishlistRow> for crate::ports::WishlistEntry {
    type Error = DomainError;

    fn try_from(row: WishlistRow) -> Result<Self, Self::Error> {
        Ok(crate::ports::WishlistEntry {
            id: WishlistId::new(row.id),
            user_id: UserId::new(row.user_id),
            item_type: row.item_type.parse().map_err(|_| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid item_type value: {}", row.item_type),
                )
            })?,
            item_id: row.item_id,
            created_at: row.created_at,
        })
    }
}

/// Maps an sqlx error to a DomainError, surfacing a dedicated code when the
/// failure is a named unique constraint.
pub(super) fn map_db_error(err: sqlx::Error, context: &str) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, err))
}

/// Returns the violated constraint name, if this is a constraint violation.
pub(super) fn violated_constraint(err: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.constraint().map(|c| c.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_round_trips() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Success,
            PaymentStatus::Failed,
        ] {
            assert_eq!(parse_status(status.as_str()).unwrap(), status);
        }
        assert!(parse_status("refunded").is_err());
    }

    #[test]
    fn scope_parsing_round_trips() {
        for scope in [
            DiscountScope::Global,
            DiscountScope::Beat,
            DiscountScope::SoundPack,
        ] {
            assert_eq!(parse_scope(scope.as_str()).unwrap(), scope);
        }
        assert!(parse_scope("bundle").is_err());
    }

    #[test]
    fn unknown_file_type_is_a_database_error() {
        let err = parse_file_type("flac").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
