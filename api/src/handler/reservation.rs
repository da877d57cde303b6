use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use kernel::model::{id::RoomId, reservation::Reservation};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::{AppSession, MessageKind},
    model::{
        availability::DATE_FORMAT,
        reservation::{apply_contact, validate_reservation_form, CSRF_TOKEN},
    },
    render::{render_page, TemplateData},
};

// 予約フォームとサマリーで共通の表示データ
fn reservation_data(reservation: &Reservation) -> TemplateData {
    TemplateData::default()
        .with_data("reservation", reservation)
        .with_string(
            "start_date",
            reservation.start_date.format(DATE_FORMAT).to_string(),
        )
        .with_string(
            "end_date",
            reservation.end_date.format(DATE_FORMAT).to_string(),
        )
}

pub async fn choose_room(
    session: AppSession,
    Path(room_id): Path<RoomId>,
) -> AppResult<Redirect> {
    let mut reservation = session.reservation().await?;
    reservation.room_id = Some(room_id);
    session.put_reservation(&reservation).await?;

    Ok(Redirect::to("/make-reservation"))
}

pub async fn show_make_reservation(
    session: AppSession,
    State(registry): State<AppRegistry>,
) -> AppResult<Html<String>> {
    let mut reservation = session.reservation().await?;
    let room_id = reservation
        .room_id
        .ok_or_else(|| AppError::MissingOrWrongType("reservation.room_id".into()))?;

    let room = registry
        .room_repository()
        .find_by_id(room_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("room ({room_id}) was not found")))?;
    reservation.room_name = room.room_name;
    session.put_reservation(&reservation).await?;

    let td = reservation_data(&reservation).with_form(Default::default());
    render_page(
        &session,
        &registry.template_store(),
        "make-reservation.page.html",
        td,
    )
    .await
}

pub async fn post_make_reservation(
    session: AppSession,
    State(registry): State<AppRegistry>,
    Form(values): Form<HashMap<String, String>>,
) -> AppResult<Response> {
    let form = validate_reservation_form(values);
    session.verify_csrf(form.get(CSRF_TOKEN)).await?;

    let mut reservation = session.reservation().await?;
    apply_contact(&mut reservation, &form);

    // 入力エラーがある場合は入力値を保持したままフォームを再表示する
    if !form.valid() {
        let td = reservation_data(&reservation).with_form(form);
        return render_page(
            &session,
            &registry.template_store(),
            "make-reservation.page.html",
            td,
        )
        .await
        .map(IntoResponse::into_response);
    }

    let event = reservation.to_create_event()?;
    match registry.reservation_repository().book(event).await {
        Ok(_) => {}
        Err(AppError::UnprocessableEntity(message)) => {
            tracing::warn!(error.message = %message, "room was taken before booking");
            session
                .put_message(
                    MessageKind::Error,
                    "The room is no longer available for these dates",
                )
                .await?;
            return Ok(Redirect::to("/search-availability").into_response());
        }
        // 書き込みに失敗しても、セッション内の予約はそのまま残す
        Err(e) => return Err(e),
    }

    session.put_reservation(&reservation).await?;
    session
        .put_message(MessageKind::Flash, "Reservation submitted")
        .await?;

    Ok(Redirect::to("/reservation-summary").into_response())
}

pub async fn reservation_summary(
    session: AppSession,
    State(registry): State<AppRegistry>,
) -> AppResult<Response> {
    let reservation = match session.take_reservation().await {
        Ok(reservation) => reservation,
        Err(AppError::MissingOrWrongType(key)) => {
            tracing::error!(session.key = %key, "cannot get reservation from session");
            session
                .put_message(MessageKind::Error, "Can't get reservation from session")
                .await?;
            return Ok(Redirect::temporary("/").into_response());
        }
        Err(e) => return Err(e),
    };

    render_page(
        &session,
        &registry.template_store(),
        "reservation-summary.page.html",
        reservation_data(&reservation),
    )
    .await
    .map(IntoResponse::into_response)
}
