//! One-shot notices carried across a redirect in a short-lived cookie.
//!
//! The cookie value is `level:percent-encoded-text`. A page that shows the
//! notice also clears the cookie, so a reload does not show it again.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};

use crate::budget::{Notice, NoticeLevel};

pub const NOTICE_COOKIE: &str = "expense_notice";

pub fn notice_cookie(notice: &Notice) -> String {
    format!(
        "{}={}:{}; Path=/; HttpOnly; SameSite=Lax",
        NOTICE_COOKIE,
        notice.level,
        urlencoding::encode(&notice.text)
    )
}

pub fn clear_notice_cookie() -> String {
    format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", NOTICE_COOKIE)
}

/// Finds a pending notice in the request's `Cookie` headers.
pub fn pending_notice(headers: &HeaderMap) -> Option<Notice> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix(NOTICE_COOKIE)?.strip_prefix('='))
        .find_map(decode_notice)
}

fn decode_notice(value: &str) -> Option<Notice> {
    let (level, text) = value.split_once(':')?;
    let level: NoticeLevel = level.parse().ok()?;
    let text = urlencoding::decode(text).ok()?;
    Some(Notice::new(level, text.into_owned()))
}

/// 303 redirect that leaves `notice` for the next page.
pub fn redirect_with_notice(location: &str, notice: &Notice) -> Response {
    ([(SET_COOKIE, notice_cookie(notice))], Redirect::to(location)).into_response()
}
