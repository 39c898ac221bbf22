//! Data access layer repositories.
//!
//! One repository per table, generic over [`ConnectionTrait`] so the same code
//! runs against a pooled connection or inside a transaction.

pub mod document;
pub mod expense;
pub mod invitation;
pub mod lease;
pub mod lease_tenant;
pub mod login_code;
pub mod maintenance;
pub mod notification;
pub mod property;
pub mod rent_payment;
pub mod unit;
pub mod user;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, ItemsAndPagesNumber,
    PaginatorTrait, QueryFilter, Select, SqlErr,
};

use crate::model::api::PaginationDto;

/// Whether the database rejected a write on a unique index.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Restricts a query to the rows a caller may see.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    /// No restriction
    All,
    /// Only rows whose scoping column is one of these ids
    Only(Vec<i32>),
}

impl Scope {
    /// Filter `select` on `column` according to the scope.
    pub fn apply<E, Col>(&self, select: Select<E>, column: Col) -> Select<E>
    where
        E: EntityTrait,
        Col: ColumnTrait,
    {
        match self {
            Self::All => select,
            Self::Only(ids) => select.filter(column.is_in(ids.iter().copied())),
        }
    }

    /// Whether a row with the given scoping id is visible.
    pub fn allows(&self, id: i32) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(&id),
        }
    }
}

/// One page of a paginated listing.
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
        }
    }

    pub fn try_map<U, E, F: FnMut(T) -> Result<U, E>>(self, f: F) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
        })
    }

    pub fn pagination(&self) -> PaginationDto {
        PaginationDto {
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Fetch one page of `select`; `page` starts at 1.
pub async fn fetch_page<'db, C, E>(
    db: &'db C,
    select: Select<E>,
    page: u64,
    limit: u64,
) -> Result<Page<E::Model>, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: FromQueryResult + Sized + Send + Sync + 'db,
{
    let paginator = select.paginate(db, limit);
    let ItemsAndPagesNumber {
        number_of_items,
        number_of_pages,
    } = paginator.num_items_and_pages().await?;
    let items = paginator.fetch_page(page.saturating_sub(1)).await?;

    Ok(Page {
        items,
        page,
        limit,
        total: number_of_items,
        total_pages: number_of_pages,
    })
}
