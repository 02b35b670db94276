use crate::errors::DomainResult;
use crate::types::internal::Colour;
use crate::types::internal::pagination::PageRequest;
use crate::types::internal::todo::{
    CreateTodoItem, CreateTodoList, GetTodoItemsWithPagination, UpdateTodoItem, UpdateTodoItemDetail,
    UpdateTodoList,
};

use super::{ValidationErrors, check_max_length, check_required_text};

pub const TITLE_MAX_LENGTH: usize = 200;
pub const NOTE_MAX_LENGTH: usize = 2000;

fn check_colour(errors: &mut ValidationErrors, colour: Option<&str>) {
    if let Some(code) = colour {
        errors.check(
            Colour::from_code(code).is_ok(),
            "Colour.Unsupported",
            format!("Colour \"{}\" is unsupported", code),
        );
    }
}

fn check_id(errors: &mut ValidationErrors, field: &str, id: i64) {
    errors.check(id > 0, &format!("{}.Required", field), format!("{} is required", field));
}

pub fn validate_create_list(command: &CreateTodoList) -> DomainResult<()> {
    let mut errors = ValidationErrors::new();
    check_required_text(&mut errors, "Title", &command.title, TITLE_MAX_LENGTH);
    check_colour(&mut errors, command.colour.as_deref());
    errors.finish()
}

pub fn validate_update_list(command: &UpdateTodoList) -> DomainResult<()> {
    let mut errors = ValidationErrors::new();
    check_id(&mut errors, "Id", command.id);
    check_required_text(&mut errors, "Title", &command.title, TITLE_MAX_LENGTH);
    check_colour(&mut errors, command.colour.as_deref());
    errors.finish()
}

pub fn validate_create_item(command: &CreateTodoItem) -> DomainResult<()> {
    let mut errors = ValidationErrors::new();
    check_id(&mut errors, "ListId", command.list_id);
    check_required_text(&mut errors, "Title", &command.title, TITLE_MAX_LENGTH);
    errors.finish()
}

pub fn validate_update_item(command: &UpdateTodoItem) -> DomainResult<()> {
    let mut errors = ValidationErrors::new();
    check_id(&mut errors, "Id", command.id);
    check_required_text(&mut errors, "Title", &command.title, TITLE_MAX_LENGTH);
    errors.finish()
}

pub fn validate_update_item_detail(command: &UpdateTodoItemDetail) -> DomainResult<()> {
    let mut errors = ValidationErrors::new();
    check_id(&mut errors, "Id", command.id);
    check_id(&mut errors, "ListId", command.list_id);
    if let Some(note) = &command.note {
        check_max_length(&mut errors, "Note", note, NOTE_MAX_LENGTH);
    }
    errors.finish()
}

pub fn validate_items_page(query: &GetTodoItemsWithPagination) -> DomainResult<()> {
    let mut errors = ValidationErrors::new();
    check_id(&mut errors, "ListId", query.list_id);
    errors.check(
        query.page_number >= 1,
        "PageNumber.Invalid",
        "PageNumber must be at least 1",
    );
    errors.check(
        (1..=PageRequest::MAX_PAGE_SIZE).contains(&query.page_size),
        "PageSize.Invalid",
        format!("PageSize must be between 1 and {}", PageRequest::MAX_PAGE_SIZE),
    );
    errors.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_title_and_bad_colour_both_reported() {
        let errors = validate_create_list(&CreateTodoList {
            title: "".to_string(),
            colour: Some("#000000".to_string()),
        })
        .unwrap_err();

        assert!(errors.contains_code("Title.Required"));
        assert!(errors.contains_code("Colour.Unsupported"));
    }

    #[test]
    fn test_title_length_limit() {
        let errors = validate_create_item(&CreateTodoItem {
            list_id: 1,
            title: "x".repeat(TITLE_MAX_LENGTH + 1),
        })
        .unwrap_err();

        assert!(errors.contains_code("Title.TooLong"));
    }

    #[test]
    fn test_page_bounds() {
        let errors = validate_items_page(&GetTodoItemsWithPagination {
            list_id: 1,
            page_number: 0,
            page_size: 0,
        })
        .unwrap_err();

        assert_eq!(errors.len(), 2);
        assert!(validate_items_page(&GetTodoItemsWithPagination {
            list_id: 1,
            page_number: 1,
            page_size: 10,
        })
        .is_ok());
    }
}
