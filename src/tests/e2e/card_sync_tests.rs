// End to end: command handler, projection and in memory document store together.
//
// Every scenario awaits the last persistence task of each card it touched, then
// checks that the store holds exactly what the projection shows.

use crate::modules::cards::adapters::outbound::card_store::PersistOutcome;
use crate::modules::cards::core::state::Card;
use crate::shared::infrastructure::document_store::DocumentStore;
use crate::tests::fixtures::handlers::{TestContext, make_test_context};
use rstest::{fixture, rstest};

#[fixture]
fn before_each() -> TestContext {
    make_test_context()
}

async fn stored_cards(ctx: &TestContext) -> Vec<Card> {
    let mut cards: Vec<Card> = ctx
        .store
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|document| serde_json::from_value(document).unwrap())
        .collect();
    cards.sort_by(|a, b| a.created_time.cmp(&b.created_time).then_with(|| a.id.cmp(&b.id)));
    cards
}

async fn projected_cards(ctx: &TestContext) -> Vec<Card> {
    ctx.projection
        .snapshot()
        .await
        .ordered()
        .into_iter()
        .map(|card| Card::clone(&card))
        .collect()
}

async fn assert_converged(ctx: &TestContext) {
    assert_eq!(projected_cards(ctx).await, stored_cards(ctx).await);
}

#[rstest]
#[tokio::test]
async fn adds_a_card_with_zeroed_time_and_empty_subtasks(before_each: TestContext) {
    let ctx = before_each;

    ctx.handler
        .add_card("c1", "list1", "Buy milk", "")
        .await
        .unwrap()
        .outcome()
        .await
        .unwrap();

    let cards = projected_cards(&ctx).await;
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].title, "Buy milk");
    assert_eq!(cards[0].content, "");
    assert_eq!(cards[0].spent_time_in_hour.estimated, 0.0);
    assert_eq!(cards[0].spent_time_in_hour.actual, 0.0);
    assert_eq!(cards[0].sub_tasks, Some(Vec::new()));
    assert_converged(&ctx).await;
}

#[rstest]
#[tokio::test]
async fn adds_and_toggles_a_subtask(before_each: TestContext) {
    let ctx = before_each;
    ctx.handler.add_card("c1", "list1", "Buy milk", "").await.unwrap();

    let (sub_task_id, _) = ctx.handler.add_sub_task("c1", "wash bottle").await.unwrap();
    let card = ctx.projection.snapshot().await.get("c1").cloned().unwrap();
    assert_eq!(card.sub_tasks.as_ref().map(Vec::len), Some(1));
    assert!(!card.sub_task(&sub_task_id).unwrap().completed);

    let task = ctx.handler.toggle_sub_task("c1", &sub_task_id).await.unwrap();
    let card = ctx.projection.snapshot().await.get("c1").cloned().unwrap();
    assert!(card.sub_task(&sub_task_id).unwrap().completed);

    assert_eq!(task.outcome().await.unwrap(), PersistOutcome::Applied { matched: 1 });
    assert_converged(&ctx).await;
}

#[rstest]
#[tokio::test]
async fn accumulates_timer_sessions(before_each: TestContext) {
    let ctx = before_each;
    ctx.handler.add_card("c1", "list1", "Buy milk", "").await.unwrap();

    ctx.handler.on_timer_finished("c1", "s1", 1.5).await.unwrap();
    let last = ctx.handler.on_timer_finished("c1", "s2", 0.5).await.unwrap();

    let card = ctx.projection.snapshot().await.get("c1").cloned().unwrap();
    assert_eq!(card.session_ids, vec!["s1", "s2"]);
    assert_eq!(card.spent_time_in_hour.actual, 2.0);
    last.outcome().await.unwrap();
    assert_converged(&ctx).await;
}

#[rstest]
#[tokio::test]
async fn converges_when_a_subtask_is_toggled_twice_before_the_store_answers(
    before_each: TestContext,
) {
    let ctx = before_each;
    ctx.handler.add_card("c1", "list1", "Buy milk", "").await.unwrap();
    let (sub_task_id, _) = ctx.handler.add_sub_task("c1", "wash bottle").await.unwrap();
    ctx.store.set_delay_ms(10);

    ctx.handler.toggle_sub_task("c1", &sub_task_id).await.unwrap();
    let second = ctx.handler.toggle_sub_task("c1", &sub_task_id).await.unwrap();

    second.outcome().await.unwrap();
    let card = ctx.projection.snapshot().await.get("c1").cloned().unwrap();
    assert!(!card.sub_task(&sub_task_id).unwrap().completed);
    assert_converged(&ctx).await;
}

#[rstest]
#[tokio::test]
async fn keeps_the_untouched_half_of_spent_time(before_each: TestContext) {
    let ctx = before_each;
    ctx.handler.add_card("c1", "list1", "Buy milk", "").await.unwrap();

    ctx.handler.set_estimated_time("c1", 4.0).await.unwrap();
    ctx.handler.add_actual_time("c1", 0.25).await.unwrap();
    ctx.handler.add_actual_time("c1", 0.5).await.unwrap();
    ctx.handler.set_estimated_time("c1", 0.0).await.unwrap();
    let last = ctx.handler.set_actual_time("c1", 3.0).await.unwrap();

    let card = ctx.projection.snapshot().await.get("c1").cloned().unwrap();
    assert_eq!(card.spent_time_in_hour.estimated, 0.0);
    assert_eq!(card.spent_time_in_hour.actual, 3.0);
    last.outcome().await.unwrap();
    assert_converged(&ctx).await;
}

#[rstest]
#[tokio::test]
async fn ignores_commands_against_a_deleted_card(before_each: TestContext) {
    let ctx = before_each;
    ctx.handler.add_card("c1", "list1", "Buy milk", "").await.unwrap();
    let kept = ctx.handler.add_card("c2", "list1", "Walk dog", "").await.unwrap();
    ctx.handler.delete_card("c1", "list1").await.unwrap();
    let before = ctx.projection.snapshot().await;

    ctx.handler.rename_card("c1", "ghost").await.unwrap();
    ctx.handler.add_actual_time("c1", 1.0).await.unwrap();
    let (_, last) = ctx.handler.add_sub_task("c1", "orphan").await.unwrap();

    assert_eq!(ctx.projection.snapshot().await, before);
    assert_eq!(last.outcome().await.unwrap(), PersistOutcome::NoMatch);
    kept.outcome().await.unwrap();
    assert_eq!(ctx.lists.cards_of("list1").await, vec!["c2"]);
    assert_converged(&ctx).await;
}

#[rstest]
#[tokio::test]
async fn round_trips_an_added_then_deleted_subtask(before_each: TestContext) {
    let ctx = before_each;
    ctx.handler.add_card("c1", "list1", "Buy milk", "").await.unwrap();
    ctx.handler.add_sub_task("c1", "keep me").await.unwrap();
    let before = ctx.projection.snapshot().await.get("c1").cloned().unwrap();

    let (sub_task_id, _) = ctx.handler.add_sub_task("c1", "wash bottle").await.unwrap();
    let last = ctx.handler.delete_sub_task("c1", &sub_task_id).await.unwrap();

    let after = ctx.projection.snapshot().await.get("c1").cloned().unwrap();
    assert_eq!(after.sub_tasks, before.sub_tasks);
    last.outcome().await.unwrap();
    assert_converged(&ctx).await;
}
