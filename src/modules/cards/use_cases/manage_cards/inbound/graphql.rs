use async_graphql::{Context, ID, Object, Result as GqlResult};

use crate::shell::state::AppState;

fn gql_error(error: impl std::fmt::Display) -> async_graphql::Error {
    async_graphql::Error::new(error.to_string())
}

pub struct MutationRoot;

/// Mutations resolve once the projection has applied the command; the store
/// write continues in the background.
#[Object]
impl MutationRoot {
    async fn add_card(
        &self,
        context: &Context<'_>,
        list_id: String,
        title: String,
        content: Option<String>,
    ) -> GqlResult<ID> {
        let state = context.data_unchecked::<AppState>();
        let card_id = state.handler.new_card_id();
        state
            .handler
            .add_card(&card_id, &list_id, &title, content.as_deref().unwrap_or(""))
            .await
            .map_err(gql_error)?;
        Ok(ID(card_id))
    }

    async fn rename_card(
        &self,
        context: &Context<'_>,
        card_id: ID,
        title: String,
    ) -> GqlResult<bool> {
        let state = context.data_unchecked::<AppState>();
        state
            .handler
            .rename_card(&card_id, &title)
            .await
            .map_err(gql_error)?;
        Ok(true)
    }

    async fn set_content(
        &self,
        context: &Context<'_>,
        card_id: ID,
        content: String,
    ) -> GqlResult<bool> {
        let state = context.data_unchecked::<AppState>();
        state
            .handler
            .set_content(&card_id, &content)
            .await
            .map_err(gql_error)?;
        Ok(true)
    }

    async fn set_estimated_time(
        &self,
        context: &Context<'_>,
        card_id: ID,
        hours: f64,
    ) -> GqlResult<bool> {
        let state = context.data_unchecked::<AppState>();
        state
            .handler
            .set_estimated_time(&card_id, hours)
            .await
            .map_err(gql_error)?;
        Ok(true)
    }

    async fn set_actual_time(
        &self,
        context: &Context<'_>,
        card_id: ID,
        hours: f64,
    ) -> GqlResult<bool> {
        let state = context.data_unchecked::<AppState>();
        state
            .handler
            .set_actual_time(&card_id, hours)
            .await
            .map_err(gql_error)?;
        Ok(true)
    }

    async fn add_actual_time(
        &self,
        context: &Context<'_>,
        card_id: ID,
        hours: f64,
    ) -> GqlResult<bool> {
        let state = context.data_unchecked::<AppState>();
        state
            .handler
            .add_actual_time(&card_id, hours)
            .await
            .map_err(gql_error)?;
        Ok(true)
    }

    async fn finish_timer(
        &self,
        context: &Context<'_>,
        card_id: ID,
        session_id: String,
        hours: f64,
    ) -> GqlResult<bool> {
        let state = context.data_unchecked::<AppState>();
        state
            .handler
            .on_timer_finished(&card_id, &session_id, hours)
            .await
            .map_err(gql_error)?;
        Ok(true)
    }

    async fn delete_card(
        &self,
        context: &Context<'_>,
        card_id: ID,
        list_id: String,
    ) -> GqlResult<bool> {
        let state = context.data_unchecked::<AppState>();
        state
            .handler
            .delete_card(&card_id, &list_id)
            .await
            .map_err(gql_error)?;
        Ok(true)
    }

    async fn add_sub_task(
        &self,
        context: &Context<'_>,
        card_id: ID,
        title: String,
    ) -> GqlResult<ID> {
        let state = context.data_unchecked::<AppState>();
        let (sub_task_id, _task) = state
            .handler
            .add_sub_task(&card_id, &title)
            .await
            .map_err(gql_error)?;
        Ok(ID(sub_task_id))
    }

    async fn toggle_sub_task(
        &self,
        context: &Context<'_>,
        card_id: ID,
        sub_task_id: ID,
    ) -> GqlResult<bool> {
        let state = context.data_unchecked::<AppState>();
        state
            .handler
            .toggle_sub_task(&card_id, &sub_task_id)
            .await
            .map_err(gql_error)?;
        Ok(true)
    }

    async fn delete_sub_task(
        &self,
        context: &Context<'_>,
        card_id: ID,
        sub_task_id: ID,
    ) -> GqlResult<bool> {
        let state = context.data_unchecked::<AppState>();
        state
            .handler
            .delete_sub_task(&card_id, &sub_task_id)
            .await
            .map_err(gql_error)?;
        Ok(true)
    }

    async fn update_sub_task(
        &self,
        context: &Context<'_>,
        card_id: ID,
        sub_task_id: ID,
        title: String,
    ) -> GqlResult<bool> {
        let state = context.data_unchecked::<AppState>();
        state
            .handler
            .update_sub_task(&card_id, &sub_task_id, &title)
            .await
            .map_err(gql_error)?;
        Ok(true)
    }
}

#[cfg(test)]
mod manage_cards_graphql_inbound_tests {
    use crate::shell::graphql::build_schema;
    use crate::tests::fixtures::handlers::make_test_context;
    use serde_json::json;

    #[tokio::test]
    async fn it_should_add_a_card_and_read_it_back() {
        let ctx = make_test_context();
        let schema = build_schema(ctx.state());

        let added = schema
            .execute(r#"mutation { addCard(listId: "list1", title: "Buy milk") }"#)
            .await;
        assert!(added.errors.is_empty(), "{:?}", added.errors);

        let read = schema
            .execute(
                r#"{
                    card(id: "id-1") { title spentTimeInHour { estimated actual } subTasks { id } }
                }"#,
            )
            .await;
        assert!(read.errors.is_empty(), "{:?}", read.errors);
        assert_eq!(
            read.data.into_json().unwrap(),
            json!({
                "card": {
                    "title": "Buy milk",
                    "spentTimeInHour": { "estimated": 0.0, "actual": 0.0 },
                    "subTasks": []
                }
            })
        );
    }

    #[tokio::test]
    async fn it_should_surface_a_domain_rejection_as_an_error() {
        let ctx = make_test_context();
        let schema = build_schema(ctx.state());

        let response = schema
            .execute(r#"mutation { setEstimatedTime(cardId: "c1", hours: -3) }"#)
            .await;

        assert_eq!(response.errors.len(), 1);
        assert!(response.errors[0].message.contains("estimated time"));
    }

    #[tokio::test]
    async fn it_should_record_a_finished_timer() {
        let ctx = make_test_context();
        ctx.handler.add_card("c1", "list1", "Buy milk", "").await.unwrap();
        let schema = build_schema(ctx.state());

        let response = schema
            .execute(r#"mutation { finishTimer(cardId: "c1", sessionId: "s1", hours: 0.5) }"#)
            .await;

        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let card = ctx.projection.snapshot().await.get("c1").cloned().unwrap();
        assert_eq!(card.spent_time_in_hour.actual, 0.5);
    }
}
