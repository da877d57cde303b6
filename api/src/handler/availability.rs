use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use kernel::model::reservation::Reservation;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::{AppSession, MessageKind},
    model::availability::{
        parse_date, AvailabilityJsonQuery, AvailabilityJsonResponse, SearchAvailabilityRequest,
    },
    render::{render_page, TemplateData},
};

pub async fn show_search_availability(
    session: AppSession,
    State(registry): State<AppRegistry>,
) -> AppResult<Html<String>> {
    render_page(
        &session,
        &registry.template_store(),
        "search-availability.page.html",
        TemplateData::default(),
    )
    .await
}

pub async fn post_search_availability(
    session: AppSession,
    State(registry): State<AppRegistry>,
    Form(req): Form<SearchAvailabilityRequest>,
) -> AppResult<Response> {
    session.verify_csrf(&req.csrf_token).await?;

    // 日付の形式が不正、または開始日が終了日以降の場合は検索画面に戻す
    let reservation = match req
        .date_range()
        .and_then(|(start, end)| Reservation::for_range(start, end))
    {
        Ok(reservation) => reservation,
        Err(e) => {
            tracing::debug!(error.message = %e, "invalid search range");
            session
                .put_message(MessageKind::Error, "Please enter a valid date range")
                .await?;
            return Ok(Redirect::to("/search-availability").into_response());
        }
    };

    let rooms = registry
        .room_repository()
        .search_availability(reservation.start_date, reservation.end_date)
        .await?;

    if rooms.is_empty() {
        session
            .put_message(MessageKind::Error, "No availability")
            .await?;
        return Ok(Redirect::to("/search-availability").into_response());
    }

    // 検索した期間をもつ予約をセッションに保存し、部屋の選択に進む
    session.put_reservation(&reservation).await?;

    let td = TemplateData::default().with_data("rooms", &rooms);
    render_page(&session, &registry.template_store(), "choose-room.page.html", td)
        .await
        .map(IntoResponse::into_response)
}

pub async fn availability_json(
    Query(query): Query<AvailabilityJsonQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailabilityJsonResponse>> {
    let start = parse_date(&query.start)?;
    let end = parse_date(&query.end)?;
    if start >= end {
        return Err(AppError::ValidationError(
            "start date must be before end date".into(),
        ));
    }

    let available = registry
        .room_repository()
        .is_room_available(query.room_id, start, end)
        .await?;

    Ok(Json(AvailabilityJsonResponse::new(
        available,
        query.room_id,
        start,
        end,
    )))
}
