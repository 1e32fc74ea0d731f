use crate::config::PriceMatch;
use crate::domain::SaleMonth;
use crate::entities::{prelude::*, transactions};
use crate::models::Transaction;
use anyhow::Result;
use sea_orm::sea_query::{Alias, Expr, Func};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};

/// Rows per INSERT statement, keeps bound parameters well under SQLite's limit.
const INSERT_CHUNK_SIZE: usize = 200;

/// Prices are compared with this tolerance in exact mode.
const PRICE_EPSILON: f64 = 0.005;

/// Predicates for the listing query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub month: Option<SaleMonth>,
    pub search: Option<String>,
    pub price_match: PriceMatch,
}

/// One page of a listing plus the totals needed to page through the rest.
#[derive(Debug, Clone)]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    pub total: u64,
    pub total_pages: u64,
}

pub struct TransactionRepository {
    conn: DatabaseConnection,
}

impl TransactionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: transactions::Model) -> Transaction {
        Transaction {
            id: model.id,
            title: model.title,
            price: model.price,
            description: model.description,
            category: model.category,
            image: model.image,
            sold: model.sold,
            date_of_sale: model.date_of_sale,
            sold_at: model.sold_at,
        }
    }

    fn to_active_model(transaction: &Transaction) -> transactions::ActiveModel {
        transactions::ActiveModel {
            id: Set(transaction.id),
            title: Set(transaction.title.clone()),
            price: Set(transaction.price),
            description: Set(transaction.description.clone()),
            category: Set(transaction.category.clone()),
            image: Set(transaction.image.clone()),
            sold: Set(transaction.sold),
            date_of_sale: Set(transaction.date_of_sale.clone()),
            sold_at: Set(transaction.sold_at),
            sale_month: Set(transaction.sale_month().number() as i32),
        }
    }

    /// Inserts every record inside one database transaction.
    ///
    /// Nothing is written if any row fails, e.g. on a duplicate `id`.
    pub async fn insert_all(&self, records: &[Transaction]) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let txn = self.conn.begin().await?;

        for chunk in records.chunks(INSERT_CHUNK_SIZE) {
            let models = chunk.iter().map(Self::to_active_model);
            Transactions::insert_many(models).exec(&txn).await?;
        }

        txn.commit().await?;

        info!("Inserted {} transactions", records.len());
        Ok(records.len() as u64)
    }

    pub async fn existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>> {
        let mut found = Vec::new();

        for chunk in ids.chunks(INSERT_CHUNK_SIZE) {
            let mut rows: Vec<i32> = Transactions::find()
                .select_only()
                .column(transactions::Column::Id)
                .filter(transactions::Column::Id.is_in(chunk.iter().copied()))
                .into_tuple()
                .all(&self.conn)
                .await?;
            found.append(&mut rows);
        }

        found.sort_unstable();
        Ok(found)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Transactions::find().count(&self.conn).await?)
    }

    /// All records sold in `month` of any year, ordered by id.
    pub async fn list_by_month(&self, month: SaleMonth) -> Result<Vec<Transaction>> {
        let rows = Transactions::find()
            .filter(transactions::Column::SaleMonth.eq(month.number() as i32))
            .order_by_asc(transactions::Column::Id)
            .all(&self.conn)
            .await?;

        debug!("Loaded {} transactions for {}", rows.len(), month);
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Filters, then returns page `page` (1-based) of `per_page` rows.
    ///
    /// Pages past the end come back empty rather than as an error.
    pub async fn search(
        &self,
        filter: &TransactionFilter,
        page: u64,
        per_page: u64,
    ) -> Result<TransactionPage> {
        let mut query = Transactions::find().order_by_asc(transactions::Column::Id);

        if let Some(month) = filter.month {
            query = query.filter(transactions::Column::SaleMonth.eq(month.number() as i32));
        }

        if let Some(term) = filter.search.as_deref() {
            query = query.filter(Self::search_condition(term, filter.price_match));
        }

        let paginator = query.paginate(&self.conn, per_page);
        let totals = paginator.num_items_and_pages().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok(TransactionPage {
            items: items.into_iter().map(Self::map_model).collect(),
            total: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }

    /// SQLite's LIKE is case-insensitive for ASCII, which gives the
    /// case-insensitive containment on text columns.
    fn search_condition(term: &str, price_match: PriceMatch) -> Condition {
        let mut condition = Condition::any()
            .add(transactions::Column::Title.contains(term))
            .add(transactions::Column::Description.contains(term));

        match price_match {
            PriceMatch::Substring => {
                let price_text =
                    Func::cast_as(Expr::col(transactions::Column::Price), Alias::new("TEXT"));
                condition = condition.add(Expr::expr(price_text).like(format!("%{term}%")));
            }
            PriceMatch::Exact => {
                if let Ok(price) = term.parse::<f64>() {
                    condition = condition.add(
                        transactions::Column::Price
                            .between(price - PRICE_EPSILON, price + PRICE_EPSILON),
                    );
                }
            }
        }

        condition
    }
}
