use std::sync::Arc;

use sea_orm::{DatabaseConnection, IntoActiveModel, Iterable, Set};

use crate::app_data::AppData;
use crate::errors::{DomainError, DomainErrors, DomainResult};
use crate::providers::validation::todo::{validate_create_list, validate_update_list};
use crate::providers::DomainEventDispatcher;
use crate::stores::{AuditStamper, TodoStore, UnitOfWork};
use crate::types::db::todo_item::PriorityLevel;
use crate::types::db::todo_list;
use crate::types::internal::todo::{CreateTodoList, DeleteTodoList, TodoListView, TodosView, UpdateTodoList};
use crate::types::internal::{Colour, DomainEvent, RequestContext};

fn list_not_found(id: i64) -> DomainErrors {
    DomainError::not_found("TodoList.NotFound", format!("Todo list with id {} was not found", id)).into()
}

fn resolve_colour(code: &str) -> DomainResult<Colour> {
    Colour::from_code(code).map_err(|e| DomainError::validation("Colour.Unsupported", e.to_string()).into())
}

fn title_taken(title: &str) -> DomainErrors {
    DomainError::validation("Title.Unique", format!("A todo list titled \"{}\" already exists", title)).into()
}

/// Command and query handlers for todo lists
pub struct TodoListCoordinator {
    db: DatabaseConnection,
    audit_stamper: Arc<AuditStamper>,
    event_dispatcher: Arc<DomainEventDispatcher>,
    todo_store: TodoStore,
}

impl TodoListCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.connections.main.clone(),
            audit_stamper: app_data.audit_stamper.clone(),
            event_dispatcher: app_data.event_dispatcher.clone(),
            todo_store: TodoStore::new(),
        }
    }

    async fn begin(&self, ctx: &RequestContext) -> DomainResult<UnitOfWork> {
        Ok(UnitOfWork::begin(&self.db, self.audit_stamper.clone(), self.event_dispatcher.clone(), ctx).await?)
    }

    /// Lists with their items, plus the priority levels and colours a client can choose from
    pub async fn get_todos(&self, _ctx: &RequestContext) -> DomainResult<TodosView> {
        let lists = self.todo_store.lists_with_items(&self.db).await?;

        Ok(TodosView {
            priority_levels: PriorityLevel::iter().collect(),
            colours: Colour::supported(),
            lists: lists
                .into_iter()
                .map(|(list, items)| TodoListView::from_model(list, items))
                .collect(),
        })
    }

    /// Create a list; returns its id
    pub async fn create(&self, ctx: &RequestContext, command: CreateTodoList) -> DomainResult<i64> {
        validate_create_list(&command)?;

        let mut uow = self.begin(ctx).await?;
        if self.todo_store.title_exists(uow.conn(), &command.title, None).await? {
            return Err(title_taken(&command.title));
        }

        let colour = match command.colour.as_deref() {
            Some(code) => resolve_colour(code)?,
            None => Colour::white(),
        };

        let list = uow
            .add(todo_list::ActiveModel {
                title: Set(command.title),
                colour: Set(colour.code().to_string()),
                ..Default::default()
            })
            .await?;
        uow.raise(DomainEvent::TodoListCreated {
            list_id: list.id,
            title: list.title.clone(),
        });
        uow.commit().await?;

        tracing::info!(actor = %ctx.actor_id, "Todo list {} created", list.id);
        Ok(list.id)
    }

    pub async fn update(&self, ctx: &RequestContext, command: UpdateTodoList) -> DomainResult<()> {
        validate_update_list(&command)?;

        let mut uow = self.begin(ctx).await?;
        let Some(list) = self.todo_store.find_list(uow.conn(), command.id).await? else {
            return Err(list_not_found(command.id));
        };
        if self.todo_store.title_exists(uow.conn(), &command.title, Some(list.id)).await? {
            return Err(title_taken(&command.title));
        }

        let mut model = list.into_active_model();
        model.title = Set(command.title);
        // no colour keeps the current one
        if let Some(code) = command.colour.as_deref() {
            model.colour = Set(resolve_colour(code)?.code().to_string());
        }
        uow.modify(model).await?;
        uow.commit().await?;
        Ok(())
    }

    /// Delete a list and its items
    pub async fn delete(&self, ctx: &RequestContext, command: DeleteTodoList) -> DomainResult<()> {
        let mut uow = self.begin(ctx).await?;
        let Some(list) = self.todo_store.find_list(uow.conn(), command.id).await? else {
            return Err(list_not_found(command.id));
        };

        self.todo_store.delete_items_of_list(uow.conn(), list.id).await?;
        let list_id = list.id;
        uow.remove(list.into_active_model()).await?;
        uow.raise(DomainEvent::TodoListDeleted { list_id });
        uow.commit().await?;

        tracing::info!(actor = %ctx.actor_id, "Todo list {} deleted", list_id);
        Ok(())
    }

    /// Delete every list and item; returns the number of lists removed
    pub async fn purge(&self, ctx: &RequestContext) -> DomainResult<u64> {
        let uow = self.begin(ctx).await?;
        let purged = self.todo_store.purge(uow.conn()).await?;
        uow.commit().await?;

        tracing::warn!(actor = %ctx.actor_id, "Purged {} todo list(s)", purged);
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_app;

    fn ctx() -> RequestContext {
        RequestContext::new().with_actor_id("user-1")
    }

    fn create(title: &str, colour: Option<&str>) -> CreateTodoList {
        CreateTodoList {
            title: title.to_string(),
            colour: colour.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_white_and_raises_event() {
        let app = setup_test_app().await;
        let coordinator = TodoListCoordinator::new(app.app_data.clone());

        let id = coordinator.create(&ctx(), create("Spring drop", None)).await.unwrap();

        let todos = coordinator.get_todos(&ctx()).await.unwrap();
        assert_eq!(todos.lists.len(), 1);
        assert_eq!(todos.lists[0].colour, "#FFFFFF");
        assert_eq!(todos.colours, Colour::supported());
        assert_eq!(
            app.events.events(),
            vec![DomainEvent::TodoListCreated {
                list_id: id,
                title: "Spring drop".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_duplicate_title_and_bad_colour_are_rejected() {
        let app = setup_test_app().await;
        let coordinator = TodoListCoordinator::new(app.app_data.clone());
        coordinator.create(&ctx(), create("Spring drop", None)).await.unwrap();

        let errors = coordinator
            .create(&ctx(), create("Spring drop", None))
            .await
            .unwrap_err();
        assert_eq!(errors.first().code, "Title.Unique");

        let errors = coordinator
            .create(&ctx(), create("Summer drop", Some("#123456")))
            .await
            .unwrap_err();
        assert_eq!(errors.first().code, "Colour.Unsupported");
    }

    #[tokio::test]
    async fn test_update_without_colour_keeps_current_colour() {
        let app = setup_test_app().await;
        let coordinator = TodoListCoordinator::new(app.app_data.clone());
        let id = coordinator
            .create(&ctx(), create("Spring drop", Some("#ff5733")))
            .await
            .unwrap();

        coordinator
            .update(
                &ctx(),
                UpdateTodoList {
                    id,
                    title: "Spring drop v2".to_string(),
                    colour: None,
                },
            )
            .await
            .unwrap();

        let todos = coordinator.get_todos(&ctx()).await.unwrap();
        assert_eq!(todos.lists[0].title, "Spring drop v2");
        assert_eq!(todos.lists[0].colour, "#FF5733");
    }

    #[tokio::test]
    async fn test_delete_missing_list_raises_no_event() {
        let app = setup_test_app().await;
        let coordinator = TodoListCoordinator::new(app.app_data.clone());

        let errors = coordinator.delete(&ctx(), DeleteTodoList { id: 42 }).await.unwrap_err();

        assert_eq!(errors.first().code, "TodoList.NotFound");
        assert!(app.events.events().is_empty());
    }

    #[tokio::test]
    async fn test_purge_removes_every_list() {
        let app = setup_test_app().await;
        let coordinator = TodoListCoordinator::new(app.app_data.clone());
        coordinator.create(&ctx(), create("One", None)).await.unwrap();
        coordinator.create(&ctx(), create("Two", None)).await.unwrap();

        assert_eq!(coordinator.purge(&ctx()).await.unwrap(), 2);
        assert!(coordinator.get_todos(&ctx()).await.unwrap().lists.is_empty());
    }
}
