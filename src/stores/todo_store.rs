use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use crate::errors::InternalError;
use crate::types::db::{todo_item, todo_list};
use crate::types::internal::pagination::{PageRequest, PaginatedList};

/// Data access for todo lists and items
///
/// Writes of audited rows go through `UnitOfWork`; this store covers the
/// reads and the bulk deletes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TodoStore;

impl TodoStore {
    pub fn new() -> Self {
        Self
    }

    /// Every list with its items, lists by title and items in creation order
    pub async fn lists_with_items(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<(todo_list::Model, Vec<todo_item::Model>)>, InternalError> {
        let lists = todo_list::Entity::find()
            .order_by_asc(todo_list::Column::Title)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_todo_lists", e))?;
        let mut items = todo_item::Entity::find()
            .order_by_asc(todo_item::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_todo_items", e))?;

        Ok(lists
            .into_iter()
            .map(|list| {
                let (own, rest): (Vec<_>, Vec<_>) = items.drain(..).partition(|i| i.list_id == list.id);
                items = rest;
                (list, own)
            })
            .collect())
    }

    pub async fn find_list(&self, conn: &impl ConnectionTrait, id: i64) -> Result<Option<todo_list::Model>, InternalError> {
        todo_list::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_todo_list", e))
    }

    pub async fn find_item(&self, conn: &impl ConnectionTrait, id: i64) -> Result<Option<todo_item::Model>, InternalError> {
        todo_item::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_todo_item", e))
    }

    /// Whether another list already uses `title`
    pub async fn title_exists(
        &self,
        conn: &impl ConnectionTrait,
        title: &str,
        excluding: Option<i64>,
    ) -> Result<bool, InternalError> {
        let mut select = todo_list::Entity::find().filter(todo_list::Column::Title.eq(title));
        if let Some(id) = excluding {
            select = select.filter(todo_list::Column::Id.ne(id));
        }
        let count = select
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_todo_lists_by_title", e))?;
        Ok(count > 0)
    }

    /// Items of one list ordered by title
    pub async fn items_page(
        &self,
        conn: &impl ConnectionTrait,
        list_id: i64,
        page: PageRequest,
    ) -> Result<PaginatedList<todo_item::Model>, InternalError> {
        let paginator = todo_item::Entity::find()
            .filter(todo_item::Column::ListId.eq(list_id))
            .order_by_asc(todo_item::Column::Title)
            .order_by_asc(todo_item::Column::Id)
            .paginate(conn, page.page_size);

        let total_count = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_todo_items", e))?;
        let items = paginator
            .fetch_page(page.page_number - 1)
            .await
            .map_err(|e| InternalError::database("page_todo_items", e))?;

        Ok(PaginatedList::new(items, page.page_number, page.page_size, total_count))
    }

    pub async fn delete_items_of_list(&self, conn: &impl ConnectionTrait, list_id: i64) -> Result<u64, InternalError> {
        let result = todo_item::Entity::delete_many()
            .filter(todo_item::Column::ListId.eq(list_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_todo_items_of_list", e))?;
        Ok(result.rows_affected)
    }

    /// Delete every list and item; returns the number of lists removed
    pub async fn purge(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        todo_item::Entity::delete_many()
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("purge_todo_items", e))?;
        let result = todo_list::Entity::delete_many()
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("purge_todo_lists", e))?;
        Ok(result.rows_affected)
    }
}
