use crate::api::handlers::into_redirect;
use crate::api::models::listing::ListPageQuery;
use crate::api::models::machine_groups::{GroupEditPage, GroupListPage, GroupRow, group_submission_from_pairs};
use crate::db::handlers::{Groups, Repository, groups::GroupFilter};
use crate::db::models::groups::GroupSummaryDBResponse;
use crate::editors::FormOutcome;
use crate::editors::group_membership::{GROUPS_PAGE, GroupFormValues, GroupMembershipEditor};
use crate::errors::{Error, Result};
use crate::types::GroupId;
use crate::AppState;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};

#[tracing::instrument(skip_all)]
pub async fn list_groups(State(state): State<AppState>, Query(query): Query<ListPageQuery>) -> Result<Html<String>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Groups::new(&mut conn);

    let (skip, limit) = (query.skip(), query.limit());
    let groups = repo.list(&GroupFilter::new(skip, limit)).await?;
    let group_ids: Vec<GroupId> = groups.iter().map(|g| g.id).collect();
    let counts = repo.get_member_counts_bulk(&group_ids).await?;

    let groups = groups
        .into_iter()
        .map(|g| {
            GroupRow::from(GroupSummaryDBResponse {
                member_count: counts.get(&g.id).copied().unwrap_or(0),
                id: g.id,
                name: g.name,
                description: g.description,
            })
        })
        .collect();

    state.pages.render(
        "machine_groups/index.html",
        &GroupListPage {
            flash: query.flash(),
            groups,
            skip,
            limit,
        },
    )
}

#[tracing::instrument(skip(state))]
pub async fn edit_group_form(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let editor = GroupMembershipEditor::new(&state.db, state.sanitizer.as_ref(), state.audit.as_ref());

    let loaded = match editor.load(Some(id.as_str())).await {
        Ok(loaded) => loaded,
        Err(outcome) => return Ok(abandon(outcome)),
    };

    let outcome = editor.show(&loaded);
    respond(&state, &editor, loaded.group.id, outcome).await
}

#[tracing::instrument(skip(state, pairs))]
pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let editor = GroupMembershipEditor::new(&state.db, state.sanitizer.as_ref(), state.audit.as_ref());

    let loaded = match editor.load(Some(id.as_str())).await {
        Ok(loaded) => loaded,
        Err(outcome) => return Ok(abandon(outcome)),
    };

    let outcome = editor.submit(&loaded, group_submission_from_pairs(pairs)).await;
    respond(&state, &editor, loaded.group.id, outcome).await
}

/// A failed load never renders the form
fn abandon(outcome: FormOutcome<GroupFormValues>) -> Response {
    into_redirect(outcome)
        .unwrap_or_else(|_| Redirect::to(GROUPS_PAGE))
        .into_response()
}

async fn respond(
    state: &AppState,
    editor: &GroupMembershipEditor<'_>,
    group_id: GroupId,
    outcome: FormOutcome<GroupFormValues>,
) -> Result<Response> {
    let (values, error) = match into_redirect(outcome) {
        Ok(redirect) => return Ok(redirect.into_response()),
        Err(render) => render,
    };

    // A failed machine lookup replaces whatever the form was going to say
    let choices = editor.machine_choices().await;
    let error = choices.error.or(error);

    let page = GroupEditPage::new(group_id, values, choices.items, error);
    Ok(state.pages.render("machine_groups/edit.html", &page)?.into_response())
}
