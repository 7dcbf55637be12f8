use crate::{
    abstract_trait::member::{DynMemberService, LoginOutcome},
    domain::{
        requests::member::{
            IdCheckQuery, IdSearchQuery, JoinMemberRequest, LoginRequest, ModifyMemberRequest,
            PasswordChangeRequest, TempPasswordQuery,
        },
        response::{api::ViewResponse, member::MemberResponse},
    },
    middleware::{auth::require_member, session::CurrentSession, validate::ValidatedForm},
    state::AppState,
};
use axum::{
    Extension, Form, Json, Router,
    extract::Query,
    middleware,
    response::{IntoResponse, Redirect},
    routing::get,
};
use shared::errors::HttpError;
use std::sync::Arc;
use tracing::info;

async fn view(session: &CurrentSession, name: &str) -> Json<ViewResponse<()>> {
    let flash = session.take_flash().await;
    Json(ViewResponse::new(name, flash, ()))
}

/// The logged-in member. Only reachable behind `require_member`.
async fn login_member_id(session: &CurrentSession) -> Result<String, HttpError> {
    session
        .login_auth()
        .await
        .map(|m| m.mbsp_id)
        .ok_or_else(|| HttpError::Unauthorized("Login required".to_string()))
}

fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}

fn success_fail(ok: bool) -> &'static str {
    if ok { "success" } else { "fail" }
}

pub async fn join_form(session: CurrentSession) -> impl IntoResponse {
    view(&session, "member/join").await
}

#[utoipa::path(
    get,
    path = "/member/idCheck",
    tag = "Member",
    params(IdCheckQuery),
    responses((status = 200, description = "`yes` when the id is free, `no` when taken", body = String))
)]
pub async fn id_check(
    Extension(service): Extension<DynMemberService>,
    Query(query): Query<IdCheckQuery>,
) -> Result<&'static str, HttpError> {
    let free = service.id_check(&query.mbsp_id).await?;
    Ok(yes_no(free))
}

pub async fn join(
    Extension(service): Extension<DynMemberService>,
    ValidatedForm(req): ValidatedForm<JoinMemberRequest>,
) -> Result<Redirect, HttpError> {
    service.join(&req).await?;
    Ok(Redirect::to("/member/login"))
}

pub async fn login_form(session: CurrentSession) -> impl IntoResponse {
    view(&session, "member/login").await
}

pub async fn login(
    Extension(service): Extension<DynMemberService>,
    session: CurrentSession,
    Form(req): Form<LoginRequest>,
) -> Result<Redirect, HttpError> {
    let member = match service.login(&req).await? {
        LoginOutcome::Success(member) => member,
        LoginOutcome::UnknownId => {
            session.set_flash("status", "idFail").await;
            return Ok(Redirect::to("/member/login"));
        }
        LoginOutcome::WrongPassword => {
            session.set_flash("status", "pwFail").await;
            return Ok(Redirect::to("/member/login"));
        }
    };

    let destination = session
        .update(|s| {
            s.login_auth = Some(member);
            let target = s.target_url.take();
            let post_data = s.post_data.take();

            match (target, post_data) {
                (Some(target), Some(data)) => format!("{target}?{data}"),
                (Some(target), None) => target,
                (None, _) => "/".to_string(),
            }
        })
        .await;

    info!("🔓 Member logged in, continuing to {destination}");
    Ok(Redirect::to(&destination))
}

pub async fn logout(session: CurrentSession) -> Redirect {
    session.invalidate().await;
    Redirect::to("/")
}

pub async fn modify_form(
    Extension(service): Extension<DynMemberService>,
    session: CurrentSession,
) -> Result<impl IntoResponse, HttpError> {
    let mbsp_id = login_member_id(&session).await?;
    let flash = session.take_flash().await;
    let profile = service.find_profile(&mbsp_id).await?;

    Ok(Json(ViewResponse::new("member/modify", flash, profile)))
}

pub async fn modify(
    Extension(service): Extension<DynMemberService>,
    session: CurrentSession,
    ValidatedForm(req): ValidatedForm<ModifyMemberRequest>,
) -> Result<Redirect, HttpError> {
    let mbsp_id = login_member_id(&session).await?;
    let updated = service.modify(&mbsp_id, &req).await?;

    session
        .update(|s| {
            if let Some(member) = s.login_auth.as_mut() {
                member.mbsp_name = updated.mbsp_name;
                member.mbsp_email = updated.mbsp_email;
                member.mbsp_zipcode = updated.mbsp_zipcode;
                member.mbsp_addr = updated.mbsp_addr;
                member.mbsp_deaddr = updated.mbsp_deaddr;
                member.mbsp_phone = updated.mbsp_phone;
                member.mbsp_nick = updated.mbsp_nick;
                member.mbsp_receive = updated.mbsp_receive;
                member.mbsp_updatedate = updated.mbsp_updatedate;
            }
        })
        .await;

    Ok(Redirect::to("/"))
}

pub async fn mypage(session: CurrentSession) -> impl IntoResponse {
    let flash = session.take_flash().await;
    let member = session.login_auth().await.map(MemberResponse::from);
    Json(ViewResponse::new("member/mypage", flash, member))
}

pub async fn pwchange_form(session: CurrentSession) -> impl IntoResponse {
    view(&session, "member/pwchange").await
}

pub async fn pwchange(
    Extension(service): Extension<DynMemberService>,
    session: CurrentSession,
    ValidatedForm(req): ValidatedForm<PasswordChangeRequest>,
) -> Result<Redirect, HttpError> {
    let mbsp_id = login_member_id(&session).await?;

    if service
        .change_password(&mbsp_id, &req)
        .await?
    {
        session.set_flash("msg", "success").await;
        Ok(Redirect::to("/"))
    } else {
        session.set_flash("msg", "fail").await;
        Ok(Redirect::to("/member/pwchange"))
    }
}

pub async fn lostpass(session: CurrentSession) -> impl IntoResponse {
    view(&session, "member/lostpass").await
}

#[utoipa::path(
    get,
    path = "/member/idsearch",
    tag = "Member",
    params(IdSearchQuery),
    responses(
        (status = 200, description = "`success` when the id was mailed, `fail` when nothing matched", body = String),
        (status = 503, description = "Mail could not be sent")
    )
)]
pub async fn id_search(
    Extension(service): Extension<DynMemberService>,
    Query(query): Query<IdSearchQuery>,
) -> Result<&'static str, HttpError> {
    let found = service
        .id_search(&query.mbsp_name, &query.mbsp_email)
        .await?;
    Ok(success_fail(found))
}

#[utoipa::path(
    get,
    path = "/member/pwtemp",
    tag = "Member",
    params(TempPasswordQuery),
    responses(
        (status = 200, description = "`success` when a temporary password was mailed, `fail` when nothing matched", body = String),
        (status = 503, description = "Mail could not be sent")
    )
)]
pub async fn temp_password(
    Extension(service): Extension<DynMemberService>,
    Query(query): Query<TempPasswordQuery>,
) -> Result<&'static str, HttpError> {
    let issued = service
        .issue_temp_password(&query.mbsp_id, &query.mbsp_email)
        .await?;
    Ok(success_fail(issued))
}

pub fn member_routes(app_state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/member/join", get(join_form).post(join))
        .route("/member/idCheck", get(id_check))
        .route("/member/login", get(login_form).post(login))
        .route("/member/logout", get(logout))
        .route("/member/lostpass", get(lostpass))
        .route("/member/idsearch", get(id_search))
        .route("/member/pwtemp", get(temp_password));

    let protected = Router::new()
        .route("/member/modify", get(modify_form).post(modify))
        .route("/member/mypage", get(mypage))
        .route("/member/pwchange", get(pwchange_form).post(pwchange))
        .route_layer(middleware::from_fn(require_member));

    public
        .merge(protected)
        .layer(Extension(app_state.di_container.member_service.clone()))
}
