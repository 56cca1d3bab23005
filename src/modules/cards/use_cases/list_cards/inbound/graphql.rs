use async_graphql::{Context, ID, Object, Result as GqlResult};

use crate::modules::cards::core::state::{Card, SpentTime, SubTask};
use crate::shell::state::AppState;

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlSubTask {
    pub id: ID,
    pub title: String,
    pub completed: bool,
    pub created_time: i64,
}

impl From<&SubTask> for GqlSubTask {
    fn from(v: &SubTask) -> Self {
        Self {
            id: ID(v.id.clone()),
            title: v.title.clone(),
            completed: v.completed,
            created_time: v.created_time,
        }
    }
}

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlSpentTime {
    pub estimated: f64,
    pub actual: f64,
}

impl From<SpentTime> for GqlSpentTime {
    fn from(v: SpentTime) -> Self {
        Self {
            estimated: v.estimated,
            actual: v.actual,
        }
    }
}

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlCard {
    pub id: ID,
    pub title: String,
    pub content: String,
    pub created_time: i64,
    pub session_ids: Vec<String>,
    pub spent_time_in_hour: GqlSpentTime,
    pub sub_tasks: Vec<GqlSubTask>,
}

impl From<&Card> for GqlCard {
    fn from(v: &Card) -> Self {
        Self {
            id: ID(v.id.clone()),
            title: v.title.clone(),
            content: v.content.clone(),
            created_time: v.created_time,
            session_ids: v.session_ids.clone(),
            spent_time_in_hour: v.spent_time_in_hour.into(),
            sub_tasks: v
                .sub_tasks
                .iter()
                .flatten()
                .map(GqlSubTask::from)
                .collect(),
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn cards(&self, context: &Context<'_>) -> GqlResult<Vec<GqlCard>> {
        let state = context.data_unchecked::<AppState>();
        let cards = state.queries.list_cards().await?;
        Ok(cards.iter().map(|card| GqlCard::from(card.as_ref())).collect())
    }

    async fn card(&self, context: &Context<'_>, id: ID) -> GqlResult<Option<GqlCard>> {
        let state = context.data_unchecked::<AppState>();
        let card = state.queries.get_card(&id).await?;
        Ok(card.map(|card| GqlCard::from(card.as_ref())))
    }
}
