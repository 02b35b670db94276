use std::sync::Arc;

use sea_orm::{DatabaseConnection, IntoActiveModel, Set};

use crate::app_data::AppData;
use crate::errors::{DomainError, DomainErrors, DomainResult};
use crate::providers::validation::todo::{
    validate_create_item, validate_items_page, validate_update_item, validate_update_item_detail,
};
use crate::providers::{Clock, DomainEventDispatcher};
use crate::stores::{AuditStamper, TodoStore, UnitOfWork};
use crate::types::db::todo_item::{self, PriorityLevel};
use crate::types::internal::pagination::PaginatedList;
use crate::types::internal::todo::{
    CompleteTodoItem, CreateTodoItem, DeleteTodoItem, GetTodoItemsWithPagination, TodoItemView, UpdateTodoItem,
    UpdateTodoItemDetail,
};
use crate::types::internal::{DomainEvent, RequestContext};

fn item_not_found(id: i64) -> DomainErrors {
    DomainError::not_found("TodoItem.NotFound", format!("Todo item with id {} was not found", id)).into()
}

fn list_not_found(id: i64) -> DomainErrors {
    DomainError::not_found("TodoList.NotFound", format!("Todo list with id {} was not found", id)).into()
}

/// Command and query handlers for todo items
pub struct TodoItemCoordinator {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
    audit_stamper: Arc<AuditStamper>,
    event_dispatcher: Arc<DomainEventDispatcher>,
    todo_store: TodoStore,
}

impl TodoItemCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.connections.main.clone(),
            clock: app_data.clock.clone(),
            audit_stamper: app_data.audit_stamper.clone(),
            event_dispatcher: app_data.event_dispatcher.clone(),
            todo_store: TodoStore::new(),
        }
    }

    async fn begin(&self, ctx: &RequestContext) -> DomainResult<UnitOfWork> {
        Ok(UnitOfWork::begin(&self.db, self.audit_stamper.clone(), self.event_dispatcher.clone(), ctx).await?)
    }

    async fn find_item(&self, uow: &UnitOfWork, id: i64) -> DomainResult<todo_item::Model> {
        self.todo_store
            .find_item(uow.conn(), id)
            .await?
            .ok_or_else(|| item_not_found(id))
    }

    /// Create an item in an existing list; returns its id
    pub async fn create(&self, ctx: &RequestContext, command: CreateTodoItem) -> DomainResult<i64> {
        validate_create_item(&command)?;

        let mut uow = self.begin(ctx).await?;
        if self.todo_store.find_list(uow.conn(), command.list_id).await?.is_none() {
            return Err(list_not_found(command.list_id));
        }

        let item = uow
            .add(todo_item::ActiveModel {
                list_id: Set(command.list_id),
                title: Set(command.title),
                note: Set(None),
                priority: Set(PriorityLevel::None),
                reminder: Set(None),
                done: Set(false),
                done_at: Set(None),
                ..Default::default()
            })
            .await?;
        uow.raise(DomainEvent::TodoItemCreated {
            item_id: item.id,
            list_id: item.list_id,
            title: item.title.clone(),
        });
        uow.commit().await?;

        tracing::info!(actor = %ctx.actor_id, "Todo item {} created in list {}", item.id, item.list_id);
        Ok(item.id)
    }

    /// Change title and done flag
    ///
    /// Marking an open item done records `done_at` and raises a completion
    /// event; reopening clears `done_at`.
    pub async fn update(&self, ctx: &RequestContext, command: UpdateTodoItem) -> DomainResult<()> {
        validate_update_item(&command)?;

        let mut uow = self.begin(ctx).await?;
        let item = self.find_item(&uow, command.id).await?;
        let was_done = item.done;

        let mut model = item.into_active_model();
        model.title = Set(command.title);
        if command.done && !was_done {
            model.done = Set(true);
            model.done_at = Set(Some(self.clock.now_utc()));
        } else if !command.done && was_done {
            model.done = Set(false);
            model.done_at = Set(None);
        }

        let item = uow.modify(model).await?;
        if command.done && !was_done {
            uow.raise(completed_event(&item, ctx));
        }
        uow.commit().await?;
        Ok(())
    }

    /// Move to another list and change priority, note and reminder
    pub async fn update_detail(&self, ctx: &RequestContext, command: UpdateTodoItemDetail) -> DomainResult<()> {
        validate_update_item_detail(&command)?;

        let mut uow = self.begin(ctx).await?;
        let item = self.find_item(&uow, command.id).await?;
        if item.list_id != command.list_id
            && self.todo_store.find_list(uow.conn(), command.list_id).await?.is_none()
        {
            return Err(list_not_found(command.list_id));
        }

        let mut model = item.into_active_model();
        model.list_id = Set(command.list_id);
        model.priority = Set(command.priority);
        model.note = Set(command.note);
        model.reminder = Set(command.reminder);
        uow.modify(model).await?;
        uow.commit().await?;
        Ok(())
    }

    /// Mark an item done; completing it twice is a conflict
    pub async fn complete(&self, ctx: &RequestContext, command: CompleteTodoItem) -> DomainResult<()> {
        let mut uow = self.begin(ctx).await?;
        let item = self.find_item(&uow, command.id).await?;
        if item.done {
            return Err(DomainError::conflict(
                "TodoItem.AlreadyCompleted",
                format!("Todo item with id {} is already completed", command.id),
            )
            .into());
        }

        let mut model = item.into_active_model();
        model.done = Set(true);
        model.done_at = Set(Some(self.clock.now_utc()));
        let item = uow.modify(model).await?;
        uow.raise(completed_event(&item, ctx));
        uow.commit().await?;

        tracing::info!(actor = %ctx.actor_id, "Todo item {} completed", item.id);
        Ok(())
    }

    pub async fn delete(&self, ctx: &RequestContext, command: DeleteTodoItem) -> DomainResult<()> {
        let mut uow = self.begin(ctx).await?;
        let item = self.find_item(&uow, command.id).await?;

        let event = DomainEvent::TodoItemDeleted {
            item_id: item.id,
            list_id: item.list_id,
        };
        uow.remove(item.into_active_model()).await?;
        uow.raise(event);
        uow.commit().await?;
        Ok(())
    }

    /// One page of a list's items, ordered by title
    pub async fn items_page(
        &self,
        _ctx: &RequestContext,
        query: GetTodoItemsWithPagination,
    ) -> DomainResult<PaginatedList<TodoItemView>> {
        validate_items_page(&query)?;

        if self.todo_store.find_list(&self.db, query.list_id).await?.is_none() {
            return Err(list_not_found(query.list_id));
        }
        let page = self.todo_store.items_page(&self.db, query.list_id, query.page()).await?;
        Ok(page.map(TodoItemView::from))
    }
}

fn completed_event(item: &todo_item::Model, ctx: &RequestContext) -> DomainEvent {
    DomainEvent::TodoItemCompleted {
        item_id: item.id,
        list_id: item.list_id,
        title: item.title.clone(),
        done_at: item.done_at.unwrap_or_default(),
        completed_by: ctx.actor_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinators::TodoListCoordinator;
    use crate::test::utils::setup_test_app;
    use crate::types::internal::todo::CreateTodoList;
    use chrono::Duration;

    fn ctx() -> RequestContext {
        RequestContext::new().with_actor_id("user-1")
    }

    async fn create_list(app_data: Arc<AppData>, title: &str) -> i64 {
        TodoListCoordinator::new(app_data)
            .create(
                &ctx(),
                CreateTodoList {
                    title: title.to_string(),
                    colour: None,
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_item_in_missing_list_persists_nothing() {
        let app = setup_test_app().await;
        let coordinator = TodoItemCoordinator::new(app.app_data.clone());

        let result = coordinator
            .create(
                &ctx(),
                CreateTodoItem {
                    list_id: 99,
                    title: "Steam the samples".to_string(),
                },
            )
            .await;

        let errors = result.unwrap_err();
        assert_eq!(errors.first().code, "TodoList.NotFound");
        assert!(app.events.events().is_empty());
        assert!(
            TodoStore::new()
                .find_item(&app.app_data.connections.main, 1)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_complete_twice_is_conflict_and_keeps_done_at() {
        let app = setup_test_app().await;
        let list_id = create_list(app.app_data.clone(), "Autumn drop").await;
        let coordinator = TodoItemCoordinator::new(app.app_data.clone());
        let item_id = coordinator
            .create(
                &ctx(),
                CreateTodoItem {
                    list_id,
                    title: "Approve fabric swatches".to_string(),
                },
            )
            .await
            .unwrap();

        coordinator.complete(&ctx(), CompleteTodoItem { id: item_id }).await.unwrap();
        let first_done_at = app.clock.now_utc();

        app.clock.advance(Duration::hours(2));
        let errors = coordinator
            .complete(&ctx(), CompleteTodoItem { id: item_id })
            .await
            .unwrap_err();
        assert_eq!(errors.first().code, "TodoItem.AlreadyCompleted");

        let item = TodoStore::new()
            .find_item(&app.app_data.connections.main, item_id)
            .await
            .unwrap()
            .unwrap();
        assert!(item.done);
        assert_eq!(item.done_at, Some(first_done_at));

        let completions = app
            .events
            .events()
            .into_iter()
            .filter(|e| matches!(e, DomainEvent::TodoItemCompleted { .. }))
            .count();
        assert_eq!(completions, 1);
    }

    #[tokio::test]
    async fn test_update_reopening_clears_done_at() {
        let app = setup_test_app().await;
        let list_id = create_list(app.app_data.clone(), "Resort").await;
        let coordinator = TodoItemCoordinator::new(app.app_data.clone());
        let item_id = coordinator
            .create(
                &ctx(),
                CreateTodoItem {
                    list_id,
                    title: "Book studio".to_string(),
                },
            )
            .await
            .unwrap();

        coordinator
            .update(
                &ctx(),
                UpdateTodoItem {
                    id: item_id,
                    title: "Book studio".to_string(),
                    done: true,
                },
            )
            .await
            .unwrap();
        coordinator
            .update(
                &ctx(),
                UpdateTodoItem {
                    id: item_id,
                    title: "Book studio for March".to_string(),
                    done: false,
                },
            )
            .await
            .unwrap();

        let item = TodoStore::new()
            .find_item(&app.app_data.connections.main, item_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!item.done);
        assert!(item.done_at.is_none());
        assert_eq!(item.title, "Book studio for March");
    }

    #[tokio::test]
    async fn test_items_page_is_ordered_by_title() {
        let app = setup_test_app().await;
        let list_id = create_list(app.app_data.clone(), "Winter").await;
        let coordinator = TodoItemCoordinator::new(app.app_data.clone());
        for title in ["Fit session", "Approve labels", "Cost sheet"] {
            coordinator
                .create(
                    &ctx(),
                    CreateTodoItem {
                        list_id,
                        title: title.to_string(),
                    },
                )
                .await
                .unwrap();
        }

        let page = coordinator
            .items_page(
                &ctx(),
                GetTodoItemsWithPagination {
                    list_id,
                    page_number: 1,
                    page_size: 2,
                },
            )
            .await
            .unwrap();

        let titles: Vec<&str> = page.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Approve labels", "Cost sheet"]);
        assert_eq!(page.total_count, 3);
        assert!(page.has_next_page());
    }
}
