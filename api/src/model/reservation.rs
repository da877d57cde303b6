use std::collections::HashMap;

use kernel::model::reservation::Reservation;

use crate::form::Form;

pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const CSRF_TOKEN: &str = "csrf_token";

// 予約フォームの検証ルール
pub fn validate_reservation_form(values: HashMap<String, String>) -> Form {
    let mut form = Form::new(values);
    form.required(&[FIRST_NAME, LAST_NAME, EMAIL, PHONE]);
    form.valid_email(EMAIL);
    form.min_length(FIRST_NAME, 3);
    form
}

// 入力値をそのまま確定前の予約に反映する（不正な値でも再表示のために保持する）
pub fn apply_contact(reservation: &mut Reservation, form: &Form) {
    reservation.first_name = form.get(FIRST_NAME).to_string();
    reservation.last_name = form.get(LAST_NAME).to_string();
    reservation.email = form.get(EMAIL).to_string();
    reservation.phone = form.get(PHONE).to_string();
}
