use std::env;
use strum::EnumString;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

// 環境変数 ENV が未設定、または不正な値の場合はビルドプロファイルから判定する
pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = Environment::Development;
    #[cfg(not(debug_assertions))]
    let default_env = Environment::Production;

    match env::var("ENV") {
        Err(_) => default_env,
        Ok(v) => v.parse().unwrap_or(default_env),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_environment_name() {
        assert_eq!("production".parse(), Ok(Environment::Production));
        assert_eq!("development".parse(), Ok(Environment::Development));
        assert!("staging".parse::<Environment>().is_err());
    }
}
