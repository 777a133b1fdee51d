//! Detection of the session cookie.

use wasm_bindgen::JsCast;

/// Returns the raw session token when one is present in the browser's cookie
/// jar. Presence says nothing about validity, that is the server's call.
///
/// Never errors: outside a browser (server rendering, tests) there is no
/// cookie jar and the answer is simply `None`.
pub fn session_token() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let html_document = document.dyn_into::<web_sys::HtmlDocument>().ok()?;
    let cookies = html_document.cookie().ok()?;
    token_from_cookies(&cookies, mise_api::SESSION_COOKIE_NAME)
}

fn token_from_cookies(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim_start().split_once('='))
        .find_map(|(key, value)| (key == name && !value.is_empty()).then(|| value.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn finds_the_token_among_other_cookies() {
        let cookies = "theme=dark; mise_session=abc123; locale=en";
        let token = token_from_cookies(cookies, "mise_session");
        assert_eq!(token.as_deref(), Some("abc123"));
    }

    #[test]
    fn treats_an_empty_value_as_absent() {
        let token = token_from_cookies("mise_session=; theme=dark", "mise_session");
        assert_eq!(token, None);
    }

    #[test]
    fn ignores_cookies_whose_name_merely_starts_the_same() {
        let token = token_from_cookies("mise_session_old=zzz", "mise_session");
        assert_eq!(token, None);
    }

    #[test]
    fn handles_an_empty_jar() {
        assert_eq!(token_from_cookies("", "mise_session"), None);
    }

    #[test]
    fn keeps_equals_signs_inside_the_value() {
        let token = token_from_cookies("mise_session=a=b=c", "mise_session");
        assert_eq!(token.as_deref(), Some("a=b=c"));
    }
}
