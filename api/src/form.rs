use std::collections::{BTreeMap, HashMap};

use garde::Validate;
use serde::Serialize;

pub const BLANK_MESSAGE: &str = "This field cannot be blank";
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address";

// フィールド名ごとのエラーメッセージ一覧
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    // 最初に記録されたエラーメッセージを返す
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Validate)]
struct EmailAddress {
    #[garde(email)]
    value: String,
}

// 送信されたフォームの値と、ルールを適用した結果のエラーを保持する
#[derive(Debug, Default, Clone, Serialize)]
pub struct Form {
    values: HashMap<String, String>,
    errors: FormErrors,
}

impl Form {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self {
            values,
            errors: FormErrors::default(),
        }
    }

    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or_default()
    }

    fn trimmed(&self, field: &str) -> &str {
        self.get(field).trim()
    }

    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    pub fn required(&mut self, fields: &[&str]) {
        for field in fields {
            if self.trimmed(field).is_empty() {
                self.errors.add(field, BLANK_MESSAGE);
            }
        }
    }

    pub fn min_length(&mut self, field: &str, length: usize) -> bool {
        if self.trimmed(field).chars().count() < length {
            self.errors.add(
                field,
                format!("This field must be at least {length} characters long"),
            );
            return false;
        }
        true
    }

    // 空の値は required の責務とし、ここでは検査しない
    pub fn valid_email(&mut self, field: &str) {
        let value = self.trimmed(field);
        if value.is_empty() {
            return;
        }
        let address = EmailAddress {
            value: value.to_string(),
        };
        if address.validate(&()).is_err() {
            self.errors.add(field, INVALID_EMAIL_MESSAGE);
        }
    }

    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> Form {
        Form::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn new_form_is_valid() {
        assert!(form(&[]).valid());
    }

    #[test]
    fn required_rejects_blank_values() {
        let mut f = form(&[("a", ""), ("b", "   "), ("c", " x ")]);
        f.required(&["a", "b", "c", "missing"]);

        assert_eq!(f.errors().get("a"), Some(BLANK_MESSAGE));
        assert_eq!(f.errors().get("b"), Some(BLANK_MESSAGE));
        assert_eq!(f.errors().get("c"), None);
        assert_eq!(f.errors().get("missing"), Some(BLANK_MESSAGE));
        assert!(!f.valid());
    }

    #[test]
    fn min_length_boundary() {
        let mut f = form(&[("exact", "Joe"), ("short", "Jo"), ("padded", "  Jo  ")]);

        assert!(f.min_length("exact", 3));
        assert!(!f.min_length("short", 3));
        assert!(!f.min_length("padded", 3));
        assert_eq!(f.errors().get("exact"), None);
        assert_eq!(
            f.errors().get("short"),
            Some("This field must be at least 3 characters long")
        );
    }

    #[test]
    fn valid_email_shapes() {
        let mut f = form(&[("good", "a@b.com"), ("bad", "not-an-email")]);
        f.valid_email("good");
        f.valid_email("bad");

        assert_eq!(f.errors().get("good"), None);
        assert_eq!(f.errors().get("bad"), Some(INVALID_EMAIL_MESSAGE));
    }

    #[test]
    fn empty_email_only_fails_when_required() {
        let mut alone = form(&[("email", "")]);
        alone.valid_email("email");
        assert!(alone.valid());

        let mut combined = form(&[("email", "")]);
        combined.required(&["email"]);
        combined.valid_email("email");
        assert_eq!(combined.errors().messages("email"), [BLANK_MESSAGE]);
    }

    #[test]
    fn rules_accumulate_per_field() {
        let mut f = form(&[("first_name", " ")]);
        f.required(&["first_name"]);
        f.min_length("first_name", 3);

        assert_eq!(
            f.errors().messages("first_name"),
            [
                BLANK_MESSAGE.to_string(),
                "This field must be at least 3 characters long".to_string()
            ]
        );
    }

    #[test]
    fn has_checks_presence() {
        let f = form(&[("a", "x"), ("b", "")]);
        assert!(f.has("a"));
        assert!(!f.has("b"));
        assert!(!f.has("c"));
    }
}
