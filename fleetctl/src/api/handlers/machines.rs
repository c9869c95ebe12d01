use crate::api::handlers::into_redirect;
use crate::api::models::listing::ListPageQuery;
use crate::api::models::machines::{MachineCreateForm, MachineCreatePage, MachineListPage, MachineRow};
use crate::db::handlers::Machines;
use crate::editors::FormOutcome;
use crate::editors::machine_records::{MachineFormValues, MachineRecordCreator};
use crate::errors::{Error, Result};
use crate::AppState;
use axum::{
    Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};

#[tracing::instrument(skip_all)]
pub async fn list_machines(State(state): State<AppState>, Query(query): Query<ListPageQuery>) -> Result<Html<String>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let machines = Machines::new(&mut conn).list_with_names().await?;

    state.pages.render(
        "machines/index.html",
        &MachineListPage {
            flash: query.flash(),
            machines: machines.into_iter().map(MachineRow::from).collect(),
        },
    )
}

#[tracing::instrument(skip_all)]
pub async fn create_machine_form(State(state): State<AppState>) -> Result<Response> {
    let creator = MachineRecordCreator::new(&state.db, state.sanitizer.as_ref(), state.audit.as_ref());
    let outcome = creator.blank();
    respond(&state, &creator, outcome).await
}

#[tracing::instrument(skip_all)]
pub async fn create_machine(State(state): State<AppState>, Form(form): Form<MachineCreateForm>) -> Result<Response> {
    let creator = MachineRecordCreator::new(&state.db, state.sanitizer.as_ref(), state.audit.as_ref());
    let outcome = creator.submit(form.into()).await;
    respond(&state, &creator, outcome).await
}

async fn respond(state: &AppState, creator: &MachineRecordCreator<'_>, outcome: FormOutcome<MachineFormValues>) -> Result<Response> {
    let (values, error) = match into_redirect(outcome) {
        Ok(redirect) => return Ok(redirect.into_response()),
        Err(render) => render,
    };

    let choices = creator.reference_choices().await;
    let page = MachineCreatePage::new(values, error, choices);
    Ok(state.pages.render("machines/create.html", &page)?.into_response())
}
