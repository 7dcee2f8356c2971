use crate::domain::model::{RawItem, UserList};
use crate::domain::ports::ListApi;
use crate::utils::error::{RefileError, Result};
use serde_json::Value;

/// Retrieves every item of one list, page by page.
///
/// The page count is derived from the `count` of the first envelope, so a
/// list of `T` items issues `ceil(T / page_size)` requests (one for an empty
/// list). Items keep page order, then in-page order. A zero `page_size` is
/// rejected up front.
pub async fn retrieve_list<A: ListApi + ?Sized>(
    api: &A,
    list_id: &str,
    page_size: usize,
) -> Result<Vec<RawItem>> {
    if page_size == 0 {
        return Err(RefileError::InvalidConfigValueError {
            field: "fetch.page_size".to_string(),
            value: page_size.to_string(),
            reason: "Page size must be at least 1".to_string(),
        });
    }

    let mut offset = 0;
    let first_page = api.list_page(list_id, page_size, offset).await?;
    let (total, mut items) = list_items(&first_page, list_id)?;

    let mut remaining = total.saturating_sub(page_size);
    while remaining > 0 {
        offset += page_size;
        let page = api.list_page(list_id, page_size, offset).await?;
        let (_, page_items) = list_items(&page, list_id)?;
        tracing::debug!(
            "📥 {}: page at offset {} returned {} items",
            list_id,
            offset,
            page_items.len()
        );
        items.extend(page_items);
        remaining = remaining.saturating_sub(page_size);
    }

    tracing::info!("📥 Retrieved {} items from list {}", items.len(), list_id);
    Ok(items)
}

/// Concatenates the items of every list, followed by the user's todos.
pub async fn retrieve_lists<A: ListApi + ?Sized>(
    api: &A,
    user_id: &str,
    list_ids: &[String],
    page_size: usize,
) -> Result<Vec<RawItem>> {
    let mut all_items = Vec::new();
    for list_id in list_ids {
        all_items.extend(retrieve_list(api, list_id, page_size).await?);
    }

    let todos = format!("{}/todos", user_id);
    all_items.extend(retrieve_list(api, &todos, page_size).await?);

    Ok(all_items)
}

/// Extracts `response.lists.items` from a `users/{id}/lists` reply.
pub fn parse_user_lists(response: &Value) -> Result<Vec<UserList>> {
    let items = response
        .pointer("/response/lists/items")
        .ok_or_else(|| malformed("user lists", "response.lists.items"))?;
    Ok(serde_json::from_value(items.clone())?)
}

fn list_items(page: &Value, list_id: &str) -> Result<(usize, Vec<RawItem>)> {
    let envelope = page
        .pointer("/response/list/listItems")
        .ok_or_else(|| malformed(list_id, "response.list.listItems"))?;

    let total = envelope
        .get("count")
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed(list_id, "listItems.count"))? as usize;

    let items = match envelope.get("items") {
        Some(Value::Array(items)) => items.clone(),
        None | Some(Value::Null) => Vec::new(),
        Some(_) => return Err(malformed(list_id, "listItems.items")),
    };

    Ok((total, items))
}

fn malformed(what: &str, field: &str) -> RefileError {
    RefileError::ProcessingError {
        message: format!("Malformed response for {}: missing or invalid {}", what, field),
    }
}
